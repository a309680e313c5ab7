use std::{fmt, sync::OnceLock};

use itertools::Itertools;

/// A permutation of `[0, N)`, kept in whichever of its two notations has
/// been asked for; each is derived from the other at most once.
#[derive(Clone)]
pub struct Permutation {
    element_count: usize,
    // One of these two is always populated.
    mapping: OnceLock<Vec<usize>>,
    cycles: OnceLock<Vec<Vec<usize>>>,
}

impl Permutation {
    #[must_use]
    pub fn identity(element_count: usize) -> Permutation {
        Permutation {
            element_count,
            mapping: OnceLock::from((0..element_count).collect::<Vec<_>>()),
            cycles: OnceLock::new(),
        }
    }

    /// Build from mapping notation, where `mapping[i]` is the image of `i`.
    ///
    /// # Panics
    ///
    /// The mapping must be a bijection on `[0, mapping.len())`.
    #[must_use]
    pub fn from_mapping(mapping: Vec<usize>) -> Permutation {
        let element_count = mapping.len();
        assert!(mapping.iter().all(|&image| image < element_count));
        assert!(mapping.iter().all_unique());
        Permutation {
            element_count,
            mapping: OnceLock::from(mapping),
            cycles: OnceLock::new(),
        }
    }

    /// Build from cycles notation over `[0, element_count)`; fixed points may
    /// be omitted.
    #[must_use]
    pub fn from_cycles(element_count: usize, mut cycles: Vec<Vec<usize>>) -> Permutation {
        cycles.retain(|cycle| cycle.len() > 1);
        assert!(cycles.iter().flatten().all(|&i| i < element_count));
        assert!(cycles.iter().flatten().all_unique());
        Permutation {
            element_count,
            mapping: OnceLock::new(),
            cycles: OnceLock::from(cycles),
        }
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Mapping notation: `mapping()[i]` is where `i` goes.
    pub fn mapping(&self) -> &[usize] {
        self.mapping.get_or_init(|| {
            let cycles = self
                .cycles
                .get()
                .expect("either `mapping` or `cycles` to be defined");
            let mut mapping = (0..self.element_count).collect::<Vec<_>>();
            for cycle in cycles {
                for (from, to) in cycle.iter().cycle().tuple_windows().take(cycle.len()) {
                    mapping[*from] = *to;
                }
            }
            mapping
        })
    }

    /// Cycles notation, fixed points omitted.
    pub fn cycles(&self) -> &[Vec<usize>] {
        self.cycles.get_or_init(|| {
            let mapping = self
                .mapping
                .get()
                .expect("either `mapping` or `cycles` to be defined");
            let mut covered = vec![false; self.element_count];
            let mut cycles = vec![];
            for start in 0..self.element_count {
                if covered[start] {
                    continue;
                }
                covered[start] = true;
                let mut cycle = vec![start];
                loop {
                    let next = mapping[*cycle.last().expect("cycles are non-empty")];
                    if next == start {
                        break;
                    }
                    covered[next] = true;
                    cycle.push(next);
                }
                if cycle.len() > 1 {
                    cycles.push(cycle);
                }
            }
            cycles
        })
    }

    /// Compose another permutation into this one (apply `self`, then
    /// `other`).
    ///
    /// # Panics
    ///
    /// Both permutations must act on the same number of elements.
    pub fn compose(&mut self, other: &Permutation) {
        assert_eq!(self.element_count, other.element_count);
        self.mapping();
        let mapping = self.mapping.get_mut().expect("just initialized");
        let other_mapping = other.mapping();
        for image in mapping.iter_mut() {
            *image = other_mapping[*image];
        }
        // Invalidate `cycles`
        self.cycles = OnceLock::new();
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.mapping().iter().enumerate().all(|(i, &image)| i == image)
    }

    /// The order of the element: the least common multiple of its cycle
    /// lengths.
    #[must_use]
    pub fn order(&self) -> u64 {
        self.cycles()
            .iter()
            .map(|cycle| cycle.len() as u64)
            .fold(1, lcm)
    }

    /// The 1-indexed bracket encoding consumed by external algebra systems:
    /// `"[2,3,1]"` sends 1 to 2, 2 to 3, and 3 to 1.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("[{}]", self.mapping().iter().map(|image| image + 1).join(","))
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn lcm(a: u64, b: u64) -> u64 {
    a / gcd(a, b) * b
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.mapping() == other.mapping()
    }
}

impl Eq for Permutation {}

impl fmt::Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permutation({:?})", self.mapping())
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

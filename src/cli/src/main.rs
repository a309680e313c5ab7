use circle_core::{
    fixed::{half_pi, Fixed},
    Permutation,
};
use circle_geometry::{
    planar::{self, Plane},
    spherical::{self, Sphere},
    Move, Puzzle,
};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use env_logger::TimestampPrecision;
use log::LevelFilter;

/// Computes the permutation representation of circle puzzles
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Print engine progress; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a built-in puzzle and print one permutation per move
    Run {
        /// Which puzzle to compute
        example: Example,
    },
    /// List the built-in puzzles
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum Example {
    /// Two planar disks of radius 2.5, centers two apart, a third of a turn
    /// each
    TwoDisks,
    /// Two planar unit disks, centers one apart, a half turn each
    MirroredPair,
    /// A cube face hemisphere (half turn) and vertex hemisphere (third turn)
    SphereCube,
    /// A single planar disk overlapping nothing
    LoneDisk,
}

impl Example {
    fn all() -> &'static [(Example, &'static str, &'static str)] {
        &[
            (Example::TwoDisks, "two-disks", "two planar trisection disks"),
            (Example::MirroredPair, "mirrored-pair", "two planar half-turn disks"),
            (Example::SphereCube, "sphere-cube", "cube face + vertex hemispheres"),
            (Example::LoneDisk, "lone-disk", "one disk, no overlaps"),
        ]
    }
}

fn planar_move(x: f64, radius: f64, increment: u32) -> color_eyre::Result<Move<Plane>> {
    let disk = planar::Circle::new(
        planar::Point::new(Fixed::from(x), Fixed::ZERO),
        Fixed::from(radius),
    );
    Ok(Move::new(disk, increment)?)
}

fn permutations(example: Example) -> color_eyre::Result<Vec<Permutation>> {
    Ok(match example {
        Example::TwoDisks => {
            Puzzle::new(&[planar_move(-1.0, 2.5, 3)?, planar_move(1.0, 2.5, 3)?])
                .part_permutations()
                .to_vec()
        }
        Example::MirroredPair => {
            Puzzle::new(&[planar_move(0.0, 1.0, 2)?, planar_move(1.0, 1.0, 2)?])
                .part_permutations()
                .to_vec()
        }
        Example::LoneDisk => Puzzle::new(&[planar_move(0.0, 1.0, 4)?])
            .part_permutations()
            .to_vec(),
        Example::SphereCube => {
            let face = Move::<Sphere>::new(
                spherical::Disk::new(
                    spherical::Point::new(Fixed::from(1), Fixed::ZERO, Fixed::ZERO),
                    half_pi(),
                ),
                2,
            )?;
            let vertex = Move::<Sphere>::new(
                spherical::Disk::new(
                    spherical::Point::unit(Fixed::from(1), Fixed::from(1), Fixed::from(1)),
                    half_pi(),
                ),
                3,
            )?;
            Puzzle::new(&[face, vertex]).part_permutations().to_vec()
        }
    })
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Run { example } => {
            for permutation in permutations(example)? {
                println!("{permutation}");
            }
        }
        Commands::List => {
            for (_, name, blurb) in Example::all() {
                println!("{name:<14} {blurb}");
            }
        }
    }

    Ok(())
}

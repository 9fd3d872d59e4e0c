#![warn(clippy::pedantic)]

mod config;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::{eyre::eyre, owo_colors::OwoColorize};
use config::{Config, Overrides, Settings};
use itertools::Itertools;
use log::{LevelFilter, debug};
use twisty_core::{
    Coordinate, CubeState, LetterScheme, Metric, Part, PartKind, PuzzleState, SkewbNotation,
    SkewbState, parse_algorithm, parse_commutator,
};

/// Counts, cancels and applies twisty puzzle algorithms
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The configuration file to use instead of the one in the user config directory
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// The cube size, e.g. 4 for the 4x4
    #[arg(long, short = 'n', global = true)]
    size: Option<usize>,

    /// The metric to count moves in: qtm, htm, stm, sqtm or qstm
    #[arg(long, short, global = true)]
    metric: Option<Metric>,

    /// The Skewb notation: "fixed corner", sarah or rubiks
    #[arg(long, global = true)]
    notation: Option<SkewbNotation>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the length of an algorithm in every metric
    Count {
        /// The algorithm, e.g. "R U R' U'"
        algorithm: String,
    },
    /// Cancel as many moves as possible
    Cancel { algorithm: String },
    /// Print the inverse of an algorithm
    Invert { algorithm: String },
    /// Expand commutator notation such as "[R, U]" or "[D : [R, U]]"
    Expand { commutator: String },
    /// Count the moves that cancel when the second algorithm follows the first
    Cancellations {
        /// May be written in commutator notation
        first: String,
        /// May be written in commutator notation
        second: String,
    },
    /// Apply an algorithm to a solved cube and print the result
    Apply { algorithm: String },
    /// Show the catalogue index and the solved stickers of a piece
    Piece {
        kind: KindArg,
        /// The faces of the piece, e.g. UFR
        name: String,
    },
    /// Apply a Skewb algorithm in the configured notation and print the result
    Skewb { algorithm: String },
    /// Show the letters of the configured letter scheme
    Letters {
        kind: KindArg,
        /// A piece such as UF or a letter; every piece is listed if left out
        piece: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Face,
    Edge,
    Midge,
    Wing,
    Corner,
    XCenter,
    TCenter,
}

impl From<KindArg> for PartKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Face => PartKind::Face,
            KindArg::Edge => PartKind::Edge,
            KindArg::Midge => PartKind::Midge,
            KindArg::Wing => PartKind::Wing,
            KindArg::Corner => PartKind::Corner,
            KindArg::XCenter => PartKind::XCenter,
            KindArg::TCenter => PartKind::TCenter,
        }
    }
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
        .init();

    let settings = Config::load(cli.config.as_deref())?.settings(Overrides {
        size: cli.size,
        metric: cli.metric,
        notation: cli.notation,
    })?;

    debug!("Running with {settings:?}");

    run(cli.command, settings)
}

fn run(command: Commands, settings: Settings) -> color_eyre::Result<()> {
    let Settings {
        size,
        metric,
        notation,
        letter_scheme,
    } = settings;

    match command {
        Commands::Count { algorithm } => {
            let algorithm = parse_algorithm(&algorithm)?;
            for metric in Metric::ALL {
                println!("{}: {}", metric.bold(), algorithm.move_count(size, metric)?);
            }
        }
        Commands::Cancel { algorithm } => {
            let algorithm = parse_algorithm(&algorithm)?;
            let cancelled = algorithm.cancelled(size)?;
            println!("{cancelled}");
            debug!(
                "{} -> {} {metric}",
                algorithm.move_count(size, metric)?,
                cancelled.move_count(size, metric)?
            );
        }
        Commands::Invert { algorithm } => {
            println!("{}", parse_algorithm(&algorithm)?.inverse());
        }
        Commands::Expand { commutator } => {
            println!("{}", parse_commutator(&commutator)?.algorithm());
        }
        Commands::Cancellations { first, second } => {
            let first = parse_commutator(&first)?;
            let second = parse_commutator(&second)?;
            println!("{}", first.cancellations(&second, size, metric)?);
        }
        Commands::Apply { algorithm } => {
            let algorithm = parse_algorithm(&algorithm)?;
            let mut state = CubeState::solved(size)?;
            state.apply_algorithm(&algorithm)?;

            println!("{state}");
            if state.is_solved() {
                println!("{}", "solved".green());
            }
        }
        Commands::Piece { kind, name } => {
            let kind = PartKind::from(kind);
            let part = Part::parse(kind, &name)?;
            let incarnations = kind.num_incarnations(size);
            if incarnations == 0 {
                return Err(eyre!("A {size}x{size} cube has no {kind} pieces"));
            }

            println!("{part}: {kind} #{}", part.index());
            for incarnation in 0..incarnations {
                let stickers = Coordinate::solved_positions(part, size, incarnation)?;
                println!("  {incarnation}: {}", stickers.iter().join(" "));
            }
        }
        Commands::Skewb { algorithm } => skewb(&algorithm, notation)?,
        Commands::Letters { kind, piece } => letters(kind.into(), piece.as_deref(), letter_scheme)?,
    }

    Ok(())
}

fn skewb(algorithm: &str, notation: SkewbNotation) -> color_eyre::Result<()> {
    let algorithm = notation.parse_algorithm(algorithm)?;
    let mut state = SkewbState::solved();
    state.apply_algorithm(&algorithm)?;

    println!("{}", notation.algorithm_to_string(&algorithm)?);
    println!("{state}");

    let layers = state.solved_layers();
    if state.is_solved() {
        println!("{}", "solved".green());
    } else if !layers.is_empty() {
        println!("solved layers: {}", layers.iter().join(" "));
    }

    Ok(())
}

fn letters(kind: PartKind, piece: Option<&str>, scheme: LetterScheme) -> color_eyre::Result<()> {
    if let Some(text) = piece {
        let part = scheme.parse_part(kind, text)?;
        let letter = scheme
            .letter(part)
            .ok_or_else(|| eyre!("The {scheme} scheme has no letter for {part}"))?;
        println!("{part}: {letter}");
        return Ok(());
    }

    let buffer = scheme.default_buffer(kind);
    for part in Part::all(kind) {
        let letter = scheme.letter(part).map_or_else(|| "-".to_owned(), |letter| letter.to_string());
        if buffer == Some(part) {
            println!("{part}: {letter} {}", "buffer".bold());
        } else {
            println!("{part}: {letter}");
        }
    }

    Ok(())
}

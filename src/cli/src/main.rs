#![warn(clippy::pedantic)]

use std::{
    fs,
    io::stdin,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use cube_core::{Color, CubeState, Face, facelets};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, debug};
use owo_colors::OwoColorize;
use session::{Session, Solution, SolveBackend, SolveOutcome};
use twophase::{TwophaseBackend, TwophaseConfig};

/// Describe a physical cube, validate it, and get back a move sequence
/// that solves it.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The solver configuration file to use, in TOML format.
    #[arg(
        long,
        short = 'c',
        default_value = "facecube.toml",
        value_name = "CONFIG"
    )]
    config: PathBuf,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit, scramble and solve interactively (the default).
    Repl,
    /// Solve a single facelet string and exit.
    Solve {
        /// 54 facelet letters in U, R, F, D, L, B order, 9 per face.
        facelets: String,
    },
    /// Print one scrambled facelet string and exit.
    Scramble,
}

fn main() -> ExitCode {
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

    let config = load_config(&cli.config);
    let mut session = Session::new(TwophaseBackend::new(config));

    if let Err(err) = session.initialize() {
        eprintln!("failed to start the solver: {err}");
        return ExitCode::FAILURE;
    }

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => run_repl(&mut session),
        Commands::Solve { facelets } => {
            session.replace_all(facelets::from_facelets(&facelets));
            let Some(outcome) = session.solve() else {
                unreachable!();
            };
            print_outcome(outcome);
            match outcome {
                Ok(_) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        Commands::Scramble => match session.scramble() {
            Ok(()) => {
                println!("{}", facelets::to_facelets(session.cube()));
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
    }
}

fn load_config(path: &Path) -> TwophaseConfig {
    if !path.exists() {
        debug!(target: "config", "no configuration at {}; using defaults", path.display());
        return TwophaseConfig::default();
    }

    toml::from_str(&fs::read_to_string(path).expect("Failed to read solver configuration file"))
        .expect("Failed to parse solver configuration file")
}

enum ReplCommand {
    Set(Face, usize, Color),
    Scramble,
    Reset,
    Solve,
    Show,
    Help,
    Quit,
}

fn run_repl<B: SolveBackend>(session: &mut Session<B>) -> ExitCode {
    print_help();

    loop {
        render(session);

        let mut line = String::new();
        if stdin().read_line(&mut line).unwrap() == 0 {
            break;
        }

        match parse_command(line.trim()) {
            Ok(ReplCommand::Quit) => break,
            Ok(ReplCommand::Help) => print_help(),
            Ok(ReplCommand::Show) => {}
            Ok(ReplCommand::Set(face, index, color)) => session.set_sticker(face, index, color),
            Ok(ReplCommand::Reset) => session.reset(),
            Ok(ReplCommand::Scramble) => {
                // failure is displayed through the outcome line
                let _ = session.scramble();
            }
            Ok(ReplCommand::Solve) => {
                if session.is_busy() {
                    eprintln!("a solve is already in flight");
                } else {
                    session.solve();
                }
            }
            Err(msg) => eprintln!("{msg}"),
        }
    }

    ExitCode::SUCCESS
}

fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(ReplCommand::Show);
    };

    let command = match word {
        "set" => {
            let sticker = words.next().ok_or("usage: set <face><index> <color>")?;
            let color = words.next().ok_or("usage: set <face><index> <color>")?;
            let (face, index) = parse_sticker(sticker)?;
            let color = color
                .parse::<Color>()
                .map_err(|()| format!("unknown color {color:?}"))?;
            ReplCommand::Set(face, index, color)
        }
        "scramble" => ReplCommand::Scramble,
        "reset" => ReplCommand::Reset,
        "solve" => ReplCommand::Solve,
        "show" => ReplCommand::Show,
        "help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(format!("unknown command {other:?}; try help")),
    };

    if words.next().is_some() {
        return Err("trailing input; try help".to_owned());
    }

    Ok(command)
}

fn parse_sticker(sticker: &str) -> Result<(Face, usize), String> {
    let sticker = sticker.to_ascii_uppercase();
    let (face, index) = sticker
        .split_at_checked(1)
        .ok_or_else(|| format!("bad sticker {sticker:?}"))?;

    let face = face
        .parse::<Face>()
        .map_err(|()| format!("unknown face {face:?}"))?;
    let index = index
        .parse::<usize>()
        .ok()
        .filter(|&i| i < 9)
        .ok_or_else(|| format!("sticker index must be 0-8, got {index:?}"))?;

    Ok((face, index))
}

fn render<B: SolveBackend>(session: &Session<B>) {
    let state = session.cube();
    println!();

    // unfolded net: U on top, the L F R B strip, D at the bottom
    for row in 0..3 {
        println!("{}{}", " ".repeat(10), face_row(state, Face::U, row));
    }
    for row in 0..3 {
        println!(
            " {} {} {} {}",
            face_row(state, Face::L, row),
            face_row(state, Face::F, row),
            face_row(state, Face::R, row),
            face_row(state, Face::B, row),
        );
    }
    for row in 0..3 {
        println!("{}{}", " ".repeat(10), face_row(state, Face::D, row));
    }

    println!();
    if state.is_solved() {
        println!("{}", "cube is in the solved state".green());
    }

    match session.last_outcome() {
        None => {}
        Some(Ok(solution)) => print_solution(solution),
        Some(Err(err)) => println!("{} {err}", "error:".red()),
    }
}

fn face_row(state: &CubeState, face: Face, row: usize) -> String {
    (0..3)
        .map(|col| {
            let index = row * 3 + col;
            let (r, g, b) = rgb(state.sticker(face, index));
            if index == 4 {
                // the center sticker carries the face letter
                format!("{}", format!("{} ", face.letter()).black().on_truecolor(r, g, b))
            } else {
                format!("{}", "██".truecolor(r, g, b))
            }
        })
        .join(" ")
}

fn rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::White => (255, 255, 255),
        Color::Red => (255, 0, 0),
        Color::Green => (0, 255, 0),
        Color::Yellow => (255, 255, 0),
        Color::Orange => (255, 128, 0),
        Color::Blue => (0, 0, 255),
    }
}

fn print_solution(solution: &Solution) {
    match solution {
        Solution::AlreadySolved => {
            println!("{}", "already solved, nothing to do".green());
        }
        Solution::Moves(moves) => {
            println!("solution found, {} moves:", moves.len());
            for (i, step) in moves.iter().enumerate() {
                println!("  {:>2}. {step}", i + 1);
            }
        }
    }
}

fn print_outcome(outcome: &SolveOutcome) {
    match outcome {
        Ok(Solution::AlreadySolved) => println!("already solved, nothing to do"),
        Ok(Solution::Moves(moves)) => println!("{}", moves.iter().join(" ")),
        Err(err) => eprintln!("{err}"),
    }
}

fn print_help() {
    eprintln!("commands:");
    eprintln!("  set <face><index> <color>   paint one sticker, e.g. `set U3 red`");
    eprintln!("  scramble                    swap in a random legal configuration");
    eprintln!("  reset                       back to the solved state");
    eprintln!("  solve                       ask the solver for a move sequence");
    eprintln!("  show                        redraw the cube");
    eprintln!("  help                        this list");
    eprintln!("  quit");
    eprintln!();
    eprintln!("sticker indices are row-major 0-8; 4 is the center");
    eprintln!(
        "centers: {}",
        Face::ALL
            .iter()
            .map(|face| format!("{}={}", face.letter(), face.label()))
            .join(" ")
    );
    eprintln!("colors: white red green yellow orange blue (or w r g y o b)");
    eprintln!("moves: face letter, ' = counter-clockwise, 2 = half turn");
}

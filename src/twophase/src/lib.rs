//! Adapter for the external `twophase` solver binary.
//!
//! The solver is a separate program driven over a line-oriented
//! stdin/stdout protocol. Its session looks like
//!
//! ```text
//! This is rob-twophase v2.0; copyright Elias Frantar 2020.
//!
//! Loading tables ...
//! Done. 0.518s
//!
//! Enter >>solve FACECUBE<< to solve, >>scramble<< to scramble or >>bench<< to benchmark.
//!
//! Ready!
//! solve LBDLULDDURDRRRFRURBFFRFBFRDLDBDDBDFBBULRLFFBUFLUUBUULL
//! 30.177ms
//! R F2 R' U R U2 F2 U2 F' D' R D2 L2 D2 L' U2 F2 (17)
//! Ready!
//! ```

use std::{
    env, fs,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
    thread::available_parallelism,
};

use cube_core::facelets::SOLVED_FACELETS;
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use session::SolveBackend;
use thiserror::Error;

/// Configuration for the external solver process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwophaseConfig {
    /// The solver executable to spawn.
    pub binary: PathBuf,
    /// Worker threads for the solver; 0 means autodetect.
    pub threads: usize,
    /// Where the solver dumps its pruning tables. Defaults to a
    /// per-user cache directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_dir: Option<PathBuf>,
}

impl Default for TwophaseConfig {
    fn default() -> Self {
        TwophaseConfig {
            binary: PathBuf::from("twophase"),
            threads: 0,
            table_dir: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum TwophaseError {
    #[error("failed to spawn the solver process")]
    Spawn(#[source] io::Error),
    #[error("lost contact with the solver process")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Solver(String),
}

/// Drives the solver binary, spawning it on first use and keeping it
/// alive for the rest of the session so its tables are only loaded once.
pub struct TwophaseBackend {
    config: TwophaseConfig,
    child: Option<SolverChild>,
}

struct SolverChild {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    // kept so the process handle lives as long as the backend
    _child: Child,
}

impl TwophaseBackend {
    pub fn new(config: TwophaseConfig) -> Self {
        TwophaseBackend {
            config,
            child: None,
        }
    }

    fn ensure_spawned(&mut self) -> Result<&mut SolverChild, TwophaseError> {
        if self.child.is_none() {
            self.child = Some(spawn_solver(&self.config)?);
        }

        match self.child.as_mut() {
            Some(child) => Ok(child),
            None => unreachable!(),
        }
    }
}

impl SolveBackend for TwophaseBackend {
    type Error = TwophaseError;

    fn initialize(&mut self) -> Result<(), TwophaseError> {
        // Spawning starts the table load; the Ready! handshake is
        // consumed per request.
        self.ensure_spawned().map(|_| ())
    }

    fn scramble(&mut self) -> Result<String, TwophaseError> {
        let child = self.ensure_spawned()?;
        child.wait_ready()?;

        debug!(target: "twophase", "sent: scramble");
        writeln!(child.stdin, "scramble")?;

        let facelets = child.read_reply_line()?;
        debug!(target: "twophase", "reply: {facelets}");
        if facelets.len() != 54 {
            // hand it over anyway; the facelet mapper normalizes
            warn!(
                target: "twophase",
                "scramble reply is {} characters, expected 54",
                facelets.len()
            );
        }
        Ok(facelets)
    }

    fn solve(&mut self, facelets: &str) -> Result<String, TwophaseError> {
        let child = self.ensure_spawned()?;
        child.wait_ready()?;

        debug!(target: "twophase", "sent: solve {facelets}");
        writeln!(child.stdin, "solve {facelets}")?;

        // Captures `30.177ms`
        let timing = child.read_reply_line()?;
        // Captures the alg
        let reply = child.read_reply_line()?;
        debug!(target: "twophase", "reply: {timing} / {reply}");

        parse_solution_line(&reply)
    }

    fn is_solved(&mut self, facelets: &str) -> Result<bool, TwophaseError> {
        // answered locally; no reason to bother the child
        Ok(facelets == SOLVED_FACELETS)
    }
}

fn spawn_solver(config: &TwophaseConfig) -> Result<SolverChild, TwophaseError> {
    // The solver dumps its tables in its current directory; keep them in
    // a cache so repeated runs skip the expensive generation.
    let table_dir = match &config.table_dir {
        Some(dir) => dir.clone(),
        None => {
            let mut cache = dirs::cache_dir().unwrap_or_else(env::temp_dir);
            cache.push("twophase-tables");
            cache
        }
    };
    fs::create_dir_all(&table_dir)?;

    let threads = if config.threads > 0 {
        config.threads.to_string()
    } else {
        match available_parallelism() {
            Ok(v) => v.to_string(),
            Err(e) => {
                warn!(
                    target: "twophase",
                    "failed to get available parallelism; defaulting to 1: {e}"
                );
                (1).to_string()
            }
        }
    };

    debug!(
        target: "twophase",
        "spawning {} with {threads} threads, tables in {}",
        config.binary.display(),
        table_dir.display()
    );

    let mut child = Command::new(&config.binary)
        .current_dir(table_dir)
        .args(["-c", "-m", "30", "-t"])
        .arg(threads)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(TwophaseError::Spawn)?;

    let stdin = child.stdin.take().unwrap();
    let stdout = BufReader::new(child.stdout.take().unwrap());

    Ok(SolverChild {
        stdin,
        stdout,
        _child: child,
    })
}

impl SolverChild {
    /// Swallow banner and table-load chatter until the solver says it
    /// is ready for the next command.
    fn wait_ready(&mut self) -> Result<(), TwophaseError> {
        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(TwophaseError::Solver(
                    "solver exited before becoming ready".to_owned(),
                ));
            }

            if line == "Ready!\n" {
                return Ok(());
            }
            debug!(target: "twophase", "solver: {}", line.trim_end());
        }
    }

    fn read_reply_line(&mut self) -> Result<String, TwophaseError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(TwophaseError::Solver(
                "solver closed its output".to_owned(),
            ));
        }
        Ok(line.trim_end().to_owned())
    }
}

/// A solution line looks like `R F2 R' U2 (4)`: move tokens followed by
/// the parenthesized move count. Anything without a count is the solver
/// complaining about its input.
fn parse_solution_line(line: &str) -> Result<String, TwophaseError> {
    let line = line.trim();
    if !line.ends_with(')') {
        return Err(TwophaseError::Solver(line.to_owned()));
    }

    let alg = line.replace(['(', ')'], "");

    // Drop the move count, keep the tokens
    Ok(alg
        .split_whitespace()
        .filter(|token| token.chars().next().is_some_and(|c| !c.is_ascii_digit()))
        .join(" "))
}

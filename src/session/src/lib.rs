//! Sequences every transition over the one [`CubeState`]: manual edits,
//! scrambling, resetting, and the solve request lifecycle.

use cube_core::{Color, CubeState, Face, facelets};
use log::{debug, info, warn};
use thiserror::Error;

pub mod backend;

pub use backend::SolveBackend;

/// Outcome of a successful solve request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// The configuration was already solved; there is nothing to do.
    AlreadySolved,
    /// Move tokens in execution order, e.g. `["R", "U'", "F2"]`.
    Moves(Vec<String>),
}

impl Solution {
    pub fn move_count(&self) -> usize {
        match self {
            Solution::AlreadySolved => 0,
            Solution::Moves(moves) => moves.len(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cube configuration is not balanced: each color must appear exactly 9 times")]
    Unbalanced,
    #[error("failed to scramble the cube")]
    Scramble,
    #[error("{0}")]
    Solve(String),
}

pub type SolveOutcome = Result<Solution, SessionError>;

/// A solve request in flight: the facelet snapshot taken when the
/// request was serialized, tagged with the generation it was taken at.
#[derive(Debug, Clone)]
pub struct PendingSolve {
    facelets: String,
    generation: u64,
}

impl PendingSolve {
    pub fn facelets(&self) -> &str {
        &self.facelets
    }
}

/// Owns the one [`CubeState`] and the displayed solve result.
///
/// The frontend never holds a second copy of the state; it renders
/// what [`Session::cube`] borrows and funnels every mutation through
/// the methods here.
pub struct Session<B: SolveBackend> {
    state: CubeState,
    backend: B,
    // Bumped on every mutation so stale solve results can be dropped.
    generation: u64,
    busy: bool,
    last_outcome: Option<SolveOutcome>,
}

impl<B: SolveBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Session {
            state: CubeState::default(),
            backend,
            generation: 0,
            busy: false,
            last_outcome: None,
        }
    }

    pub fn initialize(&mut self) -> Result<(), B::Error> {
        info!(target: "session", "initializing solve backend");
        self.backend.initialize()
    }

    pub fn cube(&self) -> &CubeState {
        &self.state
    }

    /// True while a solve request is in flight. The frontend should
    /// disable its solve trigger while this holds.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_outcome(&self) -> Option<&SolveOutcome> {
        self.last_outcome.as_ref()
    }

    /// Paint one sticker. Discards any displayed result.
    pub fn set_sticker(&mut self, face: Face, index: usize, color: Color) {
        self.state.set_sticker(face, index, color);
        self.mutated();
    }

    /// Atomically swap in a whole configuration.
    pub fn replace_all(&mut self, state: CubeState) {
        self.state = state;
        self.mutated();
    }

    /// Return to the canonical solved configuration.
    pub fn reset(&mut self) {
        self.replace_all(CubeState::default());
        debug!(target: "session", "reset: {}", facelets::to_facelets(&self.state));
    }

    /// Replace the configuration with a fresh random scramble.
    ///
    /// All-or-nothing: the current state is only touched once the
    /// backend has produced a usable scramble. On failure the state is
    /// preserved and the scramble error becomes the displayed outcome.
    pub fn scramble(&mut self) -> Result<(), SessionError> {
        match self.backend.scramble() {
            Ok(facelets) => {
                debug!(target: "session", "scrambled: {facelets}");
                self.replace_all(facelets::from_facelets(&facelets));
                Ok(())
            }
            Err(err) => {
                warn!(target: "session", "scramble failed: {err}");
                self.last_outcome = Some(Err(SessionError::Scramble));
                Err(SessionError::Scramble)
            }
        }
    }

    /// Validate and snapshot the current configuration for solving.
    ///
    /// Returns `None` while a previous request is still in flight
    /// (requests while busy are ignored). A validation failure is
    /// recorded as the displayed outcome and the backend is never
    /// consulted.
    pub fn begin_solve(&mut self) -> Option<Result<PendingSolve, SessionError>> {
        if self.busy {
            debug!(target: "session", "solve request ignored: one already in flight");
            return None;
        }

        if !self.state.is_balanced() {
            debug!(
                target: "session",
                "solve rejected, color counts: {:?}",
                self.state.color_counts()
            );
            self.last_outcome = Some(Err(SessionError::Unbalanced));
            return Some(Err(SessionError::Unbalanced));
        }

        self.busy = true;
        Some(Ok(PendingSolve {
            facelets: facelets::to_facelets(&self.state),
            generation: self.generation,
        }))
    }

    /// Ask the backend about a pending request.
    pub fn query_pending(&mut self, pending: &PendingSolve) -> SolveOutcome {
        match self.backend.is_solved(&pending.facelets) {
            Ok(true) => return Ok(Solution::AlreadySolved),
            Ok(false) => {}
            Err(err) => return Err(solve_error(&err)),
        }

        match self.backend.solve(&pending.facelets) {
            Ok(moves) => {
                let tokens = moves
                    .split_whitespace()
                    .map(str::to_owned)
                    .collect::<Vec<_>>();
                if tokens.is_empty() {
                    Ok(Solution::AlreadySolved)
                } else {
                    Ok(Solution::Moves(tokens))
                }
            }
            Err(err) => Err(solve_error(&err)),
        }
    }

    /// Record the answer for a request started by [`Session::begin_solve`].
    ///
    /// If the cube has been edited, scrambled, or reset since the
    /// request was issued, the result is stale and is dropped rather
    /// than displayed.
    pub fn complete_solve(
        &mut self,
        pending: &PendingSolve,
        outcome: SolveOutcome,
    ) -> Option<&SolveOutcome> {
        self.busy = false;

        if pending.generation != self.generation {
            info!(target: "session", "dropping stale solve result");
            return None;
        }

        self.last_outcome = Some(outcome);
        self.last_outcome.as_ref()
    }

    /// Run a full solve request against the backend synchronously.
    ///
    /// Returns `None` if the request was ignored because one is already
    /// in flight.
    pub fn solve(&mut self) -> Option<&SolveOutcome> {
        let pending = match self.begin_solve()? {
            Ok(pending) => pending,
            Err(_) => return self.last_outcome.as_ref(),
        };

        let outcome = self.query_pending(&pending);
        self.complete_solve(&pending, outcome)
    }

    fn mutated(&mut self) {
        self.generation += 1;
        self.last_outcome = None;
    }
}

fn solve_error(err: &impl std::fmt::Display) -> SessionError {
    let message = err.to_string();
    if message.is_empty() {
        SessionError::Solve("unexpected error while solving".to_owned())
    } else {
        SessionError::Solve(message)
    }
}

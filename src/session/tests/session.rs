use std::{cell::Cell, rc::Rc};

use cube_core::{
    Color, CubeState, Face,
    facelets::{self, SOLVED_FACELETS},
};
use session::{Session, SessionError, SolveBackend, Solution};
use thiserror::Error;

// A real scramble, as the randomizer would emit it.
const SCRAMBLED: &str = "FLLLULFRFRUURRRBBBLDDFFUBRUDFRDDUFLDUFUFLDLBRBDRBBULBD";

#[derive(Error, Debug)]
#[error("{0}")]
struct ScriptError(String);

#[derive(Default, Clone)]
struct Calls {
    scramble: Rc<Cell<usize>>,
    solve: Rc<Cell<usize>>,
    is_solved: Rc<Cell<usize>>,
}

/// Plays back canned collaborator replies and records every call, so
/// tests can observe which paths were (not) taken.
struct ScriptedBackend {
    calls: Calls,
    scramble_reply: Result<String, String>,
    solve_reply: Result<String, String>,
}

impl SolveBackend for ScriptedBackend {
    type Error = ScriptError;

    fn initialize(&mut self) -> Result<(), ScriptError> {
        Ok(())
    }

    fn scramble(&mut self) -> Result<String, ScriptError> {
        self.calls.scramble.set(self.calls.scramble.get() + 1);
        self.scramble_reply.clone().map_err(ScriptError)
    }

    fn solve(&mut self, _facelets: &str) -> Result<String, ScriptError> {
        self.calls.solve.set(self.calls.solve.get() + 1);
        self.solve_reply.clone().map_err(ScriptError)
    }

    fn is_solved(&mut self, facelets: &str) -> Result<bool, ScriptError> {
        self.calls.is_solved.set(self.calls.is_solved.get() + 1);
        Ok(facelets == SOLVED_FACELETS)
    }
}

fn scripted(
    scramble_reply: Result<&str, &str>,
    solve_reply: Result<&str, &str>,
) -> (Session<ScriptedBackend>, Calls) {
    let calls = Calls::default();
    let backend = ScriptedBackend {
        calls: calls.clone(),
        scramble_reply: scramble_reply.map(str::to_owned).map_err(str::to_owned),
        solve_reply: solve_reply.map(str::to_owned).map_err(str::to_owned),
    };
    let mut session = Session::new(backend);
    session.initialize().unwrap();
    (session, calls)
}

#[test_log::test]
fn test_already_solved() {
    let (mut session, calls) = scripted(Ok(SCRAMBLED), Ok("R"));

    assert_eq!(session.solve(), Some(&Ok(Solution::AlreadySolved)));
    assert_eq!(session.last_outcome().unwrap().as_ref().unwrap().move_count(), 0);
    // the solve path never saw a non-trivial request
    assert_eq!(calls.solve.get(), 0);
}

#[test_log::test]
fn test_unbalanced_rejected_without_collaborator() {
    let (mut session, calls) = scripted(Ok(SCRAMBLED), Ok("R"));

    // 10 White, 8 Yellow
    session.set_sticker(Face::D, 3, Color::White);

    assert_eq!(session.solve(), Some(&Err(SessionError::Unbalanced)));
    assert_eq!(calls.is_solved.get(), 0);
    assert_eq!(calls.solve.get(), 0);
    assert!(!session.is_busy());
}

#[test_log::test]
fn test_solve_tokenizes_moves() {
    let (mut session, calls) = scripted(Ok(SCRAMBLED), Ok(" R U  R' U2\tF2 "));
    session.scramble().unwrap();

    let outcome = session.solve().unwrap().clone();
    let solution = outcome.unwrap();
    assert_eq!(
        solution,
        Solution::Moves(
            ["R", "U", "R'", "U2", "F2"].map(str::to_owned).to_vec()
        )
    );
    assert_eq!(solution.move_count(), 5);
    assert_eq!(calls.solve.get(), 1);
}

#[test_log::test]
fn test_scramble_then_reset() {
    let (mut session, _) = scripted(Ok(SCRAMBLED), Ok("R"));

    session.scramble().unwrap();
    assert_eq!(facelets::to_facelets(session.cube()), SCRAMBLED);
    assert!(!session.cube().is_solved());

    session.reset();
    assert_eq!(session.cube(), &CubeState::default());
    assert!(session.last_outcome().is_none());
}

#[test_log::test]
fn test_scramble_failure_preserves_state() {
    let (mut session, _) = scripted(Err("randomizer exploded"), Ok("R"));
    session.replace_all(facelets::from_facelets(SCRAMBLED));

    assert_eq!(session.scramble(), Err(SessionError::Scramble));
    assert_eq!(facelets::to_facelets(session.cube()), SCRAMBLED);
    assert_eq!(session.last_outcome(), Some(&Err(SessionError::Scramble)));
}

#[test_log::test]
fn test_stale_result_is_dropped() {
    let (mut session, _) = scripted(Ok(SCRAMBLED), Ok("R"));
    session.replace_all(facelets::from_facelets(SCRAMBLED));

    let pending = session.begin_solve().unwrap().unwrap();
    assert!(session.is_busy());

    // the user keeps editing while the request is in flight
    session.set_sticker(Face::U, 0, Color::Blue);

    let late = session.complete_solve(&pending, Ok(Solution::Moves(vec!["R".to_owned()])));
    assert_eq!(late, None);
    assert!(session.last_outcome().is_none());
    assert!(!session.is_busy());
}

#[test_log::test]
fn test_second_request_while_busy_is_ignored() {
    let (mut session, _) = scripted(Ok(SCRAMBLED), Ok("R"));
    session.replace_all(facelets::from_facelets(SCRAMBLED));

    let pending = session.begin_solve().unwrap().unwrap();
    assert!(session.begin_solve().is_none());
    assert!(session.solve().is_none());

    let outcome = session.query_pending(&pending);
    assert!(session.complete_solve(&pending, outcome).is_some());
    assert!(!session.is_busy());
}

#[test_log::test]
fn test_collaborator_error_message_is_surfaced() {
    let (mut session, _) = scripted(Ok(SCRAMBLED), Err("this cube is unsolvable"));
    session.replace_all(facelets::from_facelets(SCRAMBLED));

    assert_eq!(
        session.solve(),
        Some(&Err(SessionError::Solve("this cube is unsolvable".to_owned())))
    );
}

#[test_log::test]
fn test_empty_collaborator_message_gets_fallback() {
    let (mut session, _) = scripted(Ok(SCRAMBLED), Err(""));
    session.replace_all(facelets::from_facelets(SCRAMBLED));

    assert_eq!(
        session.solve(),
        Some(&Err(SessionError::Solve(
            "unexpected error while solving".to_owned()
        )))
    );
}

#[test_log::test]
fn test_zero_move_reply_is_already_solved() {
    // Collaborators that answer an empty move sequence instead of
    // flagging the solved state still surface as AlreadySolved.
    let (mut session, calls) = scripted(Ok(SCRAMBLED), Ok(""));
    session.replace_all(facelets::from_facelets(SCRAMBLED));

    assert_eq!(session.solve(), Some(&Ok(Solution::AlreadySolved)));
    assert_eq!(calls.solve.get(), 1);
}

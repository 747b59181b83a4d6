use std::error::Error;

/// The seam to the external solving collaborator.
///
/// Calls are conceptually synchronous CPU-bound computations: each one
/// blocks until the collaborator has answered. No implementation of the
/// solving algorithm itself lives in this repository.
pub trait SolveBackend {
    type Error: Error;

    /// One-time setup, invoked once at process start. Calling it again
    /// after a successful setup must be a no-op rather than a crash.
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Produce the facelet string of a randomly scrambled, legal,
    /// solved-origin cube.
    fn scramble(&mut self) -> Result<String, Self::Error>;

    /// Solve the given facelet string, returning a whitespace-separated
    /// move sequence in standard face-turn notation.
    fn solve(&mut self, facelets: &str) -> Result<String, Self::Error>;

    /// Whether the given facelet string represents the solved state.
    fn is_solved(&mut self, facelets: &str) -> Result<bool, Self::Error>;
}

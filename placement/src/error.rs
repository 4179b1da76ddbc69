use thiserror::Error;

/// Errors surfaced by placement operations.
///
/// Not finding a surface is not an error: it is reported as
/// [`PlacementOutcome::NoIntersection`](crate::types::PlacementOutcome::NoIntersection).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlacementError {
    /// A surface normal was too short to normalize.
    #[error("degenerate surface normal (length {length:e})")]
    DegenerateNormal { length: f32 },
}

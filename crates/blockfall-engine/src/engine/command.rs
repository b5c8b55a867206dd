use serde::{Deserialize, Serialize};

/// Atomic action applied to the active piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    /// Rotate clockwise.
    #[display("rotate")]
    Rotate,
    /// Soft drop by one row.
    #[display("drop")]
    Drop,
    /// Lock the active piece at its current pose.
    #[display("lock")]
    Lock,
}

//! Headless block-stacking game engine.
//!
//! [`core`] holds the field geometry (piece shapes, occupancy, the locked
//! grid) and [`engine`] the rules on top of it. Nothing here knows about
//! rendering or input devices.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting active piece")]
pub struct PieceCollisionError;

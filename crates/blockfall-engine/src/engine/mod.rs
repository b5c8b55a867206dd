//! Game rules and state management.
//!
//! This module builds the playable game on top of the [`core`](crate::core)
//! data structures:
//!
//! - [`Board`] - Full game state with an undoable `push`/`pop` used by search
//! - [`GameSession`] - A board driven by elapsed time, gravity and queued commands
//! - [`GameStats`] - Score and row-clear statistics
//! - [`PieceQueue`] - Seeded piece source with a five-piece lookahead
//! - [`Command`] - Atomic actions applied to the active piece
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (or a bare [`Board`]) from an integer seed
//! 2. A player moves and rotates the active piece, one command at a time
//! 3. The piece locks, full rows are cleared and scored, the next piece spawns
//! 4. Repeat until a locked cell reaches the top row
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, GameSession};
//!
//! let mut session = GameSession::new(7);
//! session.enqueue_command(Command::Left);
//! session.enqueue_command(Command::Rotate);
//!
//! // Each tick applies one queued command and advances gravity.
//! for _ in 0..10 {
//!     session.tick(100);
//! }
//! assert!(!session.is_lost());
//! ```

pub use self::{board::*, command::*, game_session::*, game_stats::*, piece_queue::*};

mod board;
mod command;
mod game_session;
mod game_stats;
mod piece_queue;

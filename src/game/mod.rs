//! Game state
//!
//! Dual-source selection state machine: map taps and list taps feed two
//! independent selection slots, resolved into match/mismatch outcomes with
//! an interaction lock held while feedback animation plays out.

mod board;
mod session;

pub use board::VisualBoard;
pub use session::{
    GameMode, GameSession, InputSource, PresentationSink, RegionId, VisualState, COMPLETION_DELAY,
    HIGHLIGHT_DURATION, MATCH_DELAY, MISMATCH_DELAY,
};

//! Presentation-side state for the egui layer
//!
//! Keeps a direct id -> visual-state mapping per input channel, the record
//! currently shown in the info modal, and the progress count. Implements
//! [`PresentationSink`] so the session can drive it directly.

use std::collections::HashMap;

use super::session::{InputSource, PresentationSink, RegionId, VisualState};
use crate::registry::Region;

#[derive(Default)]
pub struct VisualBoard {
    map_states: HashMap<RegionId, VisualState>,
    list_states: HashMap<RegionId, VisualState>,

    /// Record currently shown in the info modal, if open
    record: Option<Region>,

    progress: usize,

    /// Set when a round completes; consumed by the UI to show the banner
    completion_pending: bool,
}

impl VisualBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, source: InputSource, id: RegionId) -> VisualState {
        let states = match source {
            InputSource::Map => &self.map_states,
            InputSource::List => &self.list_states,
        };
        states.get(&id).copied().unwrap_or_default()
    }

    pub fn map_state(&self, id: RegionId) -> VisualState {
        self.state(InputSource::Map, id)
    }

    pub fn list_state(&self, id: RegionId) -> VisualState {
        self.state(InputSource::List, id)
    }

    /// Record for the open info modal, if any.
    pub fn record(&self) -> Option<&Region> {
        self.record.as_ref()
    }

    pub fn close_record(&mut self) {
        self.record = None;
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Consume the round-completion flag.
    pub fn take_completion(&mut self) -> bool {
        std::mem::take(&mut self.completion_pending)
    }
}

impl PresentationSink for VisualBoard {
    fn show_record(&mut self, region: &Region) {
        self.record = Some(region.clone());
    }

    fn set_visual_state(&mut self, source: InputSource, id: RegionId, state: VisualState) {
        let states = match source {
            InputSource::Map => &mut self.map_states,
            InputSource::List => &mut self.list_states,
        };
        if state == VisualState::None {
            // Removing an already-removed state stays a no-op
            states.remove(&id);
        } else {
            states.insert(id, state);
        }
    }

    fn set_progress(&mut self, cleared: usize) {
        self.progress = cleared;
    }

    fn notify_completion(&mut self) {
        self.completion_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_none() {
        let board = VisualBoard::new();
        assert_eq!(board.map_state(1), VisualState::None);
        assert_eq!(board.list_state(47), VisualState::None);
    }

    #[test]
    fn test_states_are_per_channel() {
        let mut board = VisualBoard::new();
        board.set_visual_state(InputSource::Map, 3, VisualState::Selected);
        assert_eq!(board.map_state(3), VisualState::Selected);
        assert_eq!(board.list_state(3), VisualState::None);

        board.set_visual_state(InputSource::Map, 3, VisualState::None);
        assert_eq!(board.map_state(3), VisualState::None);
    }

    #[test]
    fn test_completion_flag_is_consumed_once() {
        let mut board = VisualBoard::new();
        board.notify_completion();
        assert!(board.take_completion());
        assert!(!board.take_completion());
    }
}

use egui::Pos2;
use serde::{Deserialize, Serialize};

mod egui_input;
pub use egui_input::{MOUSE_CONTACT, TouchInputHandler};

/// Opaque identifier of one physical contact, unique among active contacts.
pub type ContactId = u64;

/// Position of one contact at the time of the event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub id: ContactId,
    pub pos: Pos2,
}

impl TouchSample {
    pub fn new(id: ContactId, x: f32, y: f32) -> Self {
        Self { id, pos: Pos2::new(x, y) }
    }
}

/// Action reported by the display surface, in platform terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    /// First contact went down
    Down,
    /// An additional contact went down while others are active
    PointerDown,
    Move,
    /// A contact went up while others remain active
    PointerUp,
    /// Last contact went up
    Up,
    Cancel,
}

/// What the tracker should do with a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// How platform actions are classified into tracker phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DispatchMode {
    /// `Down` and `PointerUp` start the acting contact, `Up` ends it and
    /// everything else moves all contacts. A secondary contact therefore only
    /// begins drawing after it has been lifted once.
    #[default]
    SecondaryUpRestarts,
    /// Every contact is started by its own down and ended by its own up.
    SecondaryUpEnds,
}

impl DispatchMode {
    pub fn classify(self, action: TouchAction) -> TouchPhase {
        match (self, action) {
            (Self::SecondaryUpRestarts, TouchAction::Down | TouchAction::PointerUp) => TouchPhase::Start,
            (Self::SecondaryUpRestarts, TouchAction::Up) => TouchPhase::End,
            (Self::SecondaryUpRestarts, _) => TouchPhase::Move,

            (Self::SecondaryUpEnds, TouchAction::Down | TouchAction::PointerDown) => TouchPhase::Start,
            (Self::SecondaryUpEnds, TouchAction::Up | TouchAction::PointerUp | TouchAction::Cancel) => {
                TouchPhase::End
            }
            (Self::SecondaryUpEnds, TouchAction::Move) => TouchPhase::Move,
        }
    }
}

/// One input event: every contact currently reported by the surface, plus
/// the action and the index of the sample it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchBatch {
    pub action: TouchAction,
    pub action_index: usize,
    pub samples: Vec<TouchSample>,
}

impl TouchBatch {
    pub fn new(action: TouchAction, action_index: usize, samples: Vec<TouchSample>) -> Self {
        Self {
            action,
            action_index,
            samples,
        }
    }

    /// Single-contact batch, as produced by a mouse or a lone finger
    pub fn single(action: TouchAction, sample: TouchSample) -> Self {
        Self::new(action, 0, vec![sample])
    }

    /// The sample the action applies to
    pub fn acting_sample(&self) -> Option<&TouchSample> {
        self.samples.get(self.action_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classification() {
        let mode = DispatchMode::default();
        assert_eq!(mode.classify(TouchAction::Down), TouchPhase::Start);
        assert_eq!(mode.classify(TouchAction::PointerUp), TouchPhase::Start);
        assert_eq!(mode.classify(TouchAction::Up), TouchPhase::End);
        assert_eq!(mode.classify(TouchAction::PointerDown), TouchPhase::Move);
        assert_eq!(mode.classify(TouchAction::Move), TouchPhase::Move);
        assert_eq!(mode.classify(TouchAction::Cancel), TouchPhase::Move);
    }

    #[test]
    fn test_per_pointer_classification() {
        let mode = DispatchMode::SecondaryUpEnds;
        assert_eq!(mode.classify(TouchAction::Down), TouchPhase::Start);
        assert_eq!(mode.classify(TouchAction::PointerDown), TouchPhase::Start);
        assert_eq!(mode.classify(TouchAction::PointerUp), TouchPhase::End);
        assert_eq!(mode.classify(TouchAction::Up), TouchPhase::End);
        assert_eq!(mode.classify(TouchAction::Cancel), TouchPhase::End);
        assert_eq!(mode.classify(TouchAction::Move), TouchPhase::Move);
    }

    #[test]
    fn test_acting_sample() {
        let batch = TouchBatch::new(
            TouchAction::PointerUp,
            1,
            vec![TouchSample::new(3, 0.0, 0.0), TouchSample::new(7, 5.0, 6.0)],
        );
        assert_eq!(batch.acting_sample().map(|sample| sample.id), Some(7));

        let out_of_range = TouchBatch::new(TouchAction::Up, 4, Vec::new());
        assert!(out_of_range.acting_sample().is_none());
    }
}

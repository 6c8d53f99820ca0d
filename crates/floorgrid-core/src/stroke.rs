//! Paint/erase decision for clicks and drag strokes.

use crate::palette::ColorKey;
use serde::{Deserialize, Serialize};

/// How a paint request was produced by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintMode {
    /// A single click, decided on its own.
    Click,
    /// First cell of a drag; decides the action for the whole stroke.
    StrokeStart,
    /// Subsequent cells of a drag; replays the decided action.
    StrokeContinue,
}

/// What a paint request does to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeAction {
    Paint,
    Erase,
}

impl StrokeAction {
    /// Clicking a cell already carrying the target color erases it.
    pub fn decide(current: Option<&ColorKey>, target: &ColorKey) -> Self {
        if current == Some(target) {
            StrokeAction::Erase
        } else {
            StrokeAction::Paint
        }
    }
}

/// State of the drag stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Active { action: StrokeAction },
}

/// Tracks the action chosen at the start of a stroke so a drag never
/// toggles back and forth over cells it already changed.
#[derive(Debug, Clone, Default)]
pub struct StrokeTracker {
    state: StrokeState,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    /// Resolve the action for one paint request, updating the stroke state.
    pub fn resolve(&mut self, mode: PaintMode, current: Option<&ColorKey>, target: &ColorKey) -> StrokeAction {
        match (mode, self.state) {
            (PaintMode::Click, _) => StrokeAction::decide(current, target),
            (PaintMode::StrokeContinue, StrokeState::Active { action }) => action,
            (PaintMode::StrokeStart, _) | (PaintMode::StrokeContinue, StrokeState::Idle) => {
                let action = StrokeAction::decide(current, target);
                self.state = StrokeState::Active { action };
                action
            }
        }
    }

    /// End the current stroke.
    pub fn end(&mut self) {
        self.state = StrokeState::Idle;
    }
}

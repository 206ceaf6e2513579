//! Input-to-action mapping for viewer shortcuts
//!
//! The orchestrator consumes an explicit mapping table instead of listening
//! to a device directly, so tests can drive actions without real input
//! events. Triggers are edge-driven: one discrete event produces at most one
//! action, never a held-key repeat.

use crate::camera::CameraPreset;
use crate::measure::ToolMode;
use std::collections::HashMap;

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputTrigger {
    Key(char),
    Escape,
}

/// An action the viewer can perform in response to a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    SwitchPreset(CameraPreset),
    SelectTool(ToolMode),
    CancelTool,
    ToggleSmoothing,
    ToggleHeatmap,
    ToggleConfidenceOverlay,
    ToggleComparison,
}

/// Fixed mapping from input triggers to viewer actions
#[derive(Debug, Clone)]
pub struct InputMap {
    bindings: HashMap<InputTrigger, ViewerAction>,
}

impl InputMap {
    /// An empty map with no bindings
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a trigger to an action, replacing any previous binding
    pub fn bind(&mut self, trigger: InputTrigger, action: ViewerAction) {
        self.bindings.insert(trigger, action);
    }

    /// Resolve one discrete trigger to its action, if bound
    pub fn resolve(&self, trigger: InputTrigger) -> Option<ViewerAction> {
        self.bindings.get(&trigger).copied()
    }
}

impl Default for InputMap {
    /// The stock shortcut layout
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(InputTrigger::Key('1'), ViewerAction::SwitchPreset(CameraPreset::Top));
        map.bind(InputTrigger::Key('2'), ViewerAction::SwitchPreset(CameraPreset::Side));
        map.bind(InputTrigger::Key('3'), ViewerAction::SwitchPreset(CameraPreset::Oblique));
        map.bind(InputTrigger::Key('0'), ViewerAction::SwitchPreset(CameraPreset::Reset));
        map.bind(
            InputTrigger::Key('f'),
            ViewerAction::SwitchPreset(CameraPreset::FocusLastPick),
        );
        map.bind(
            InputTrigger::Key('d'),
            ViewerAction::SelectTool(ToolMode::CollectingDistance),
        );
        map.bind(
            InputTrigger::Key('a'),
            ViewerAction::SelectTool(ToolMode::CollectingAngle),
        );
        map.bind(
            InputTrigger::Key('n'),
            ViewerAction::SelectTool(ToolMode::CollectingAnnotation),
        );
        map.bind(InputTrigger::Key('s'), ViewerAction::ToggleSmoothing);
        map.bind(InputTrigger::Key('h'), ViewerAction::ToggleHeatmap);
        map.bind(InputTrigger::Key('o'), ViewerAction::ToggleConfidenceOverlay);
        map.bind(InputTrigger::Key('c'), ViewerAction::ToggleComparison);
        map.bind(InputTrigger::Escape, ViewerAction::CancelTool);
        map
    }
}

//! Keyboard shortcuts and pointer gesture classification.

use std::time::{Duration, Instant};
use winit::keyboard::{KeyCode, ModifiersState};

use crate::editor::EditorCommand;
use crate::gfx::gizmos::GizmoMode;

/// Shortcut for a key press, if it has one.
///
/// W/E/R switch gizmo modes, Delete or Backspace removes the selection, Ctrl (Cmd on macOS)
/// with C/V copies and pastes, and Escape detaches the gizmo.
pub fn command_for_key(key: KeyCode, modifiers: ModifiersState) -> Option<EditorCommand> {
    let command_key = modifiers.control_key() || modifiers.super_key();
    match key {
        KeyCode::KeyC if command_key => Some(EditorCommand::CopySelected),
        KeyCode::KeyV if command_key => Some(EditorCommand::Paste),
        _ if command_key => None,
        KeyCode::KeyW => Some(EditorCommand::SetGizmoMode(GizmoMode::Translate)),
        KeyCode::KeyE => Some(EditorCommand::SetGizmoMode(GizmoMode::Rotate)),
        KeyCode::KeyR => Some(EditorCommand::SetGizmoMode(GizmoMode::Scale)),
        KeyCode::Delete | KeyCode::Backspace => Some(EditorCommand::DeleteSelected),
        KeyCode::Escape => Some(EditorCommand::Select(None)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerGesture {
    Click,
    DoubleClick,
    /// Pointer travelled past the slop; the camera owned this press
    Drag,
}

/// Tells clicks from drags and pairs quick clicks into double-clicks.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    slop: f32,
    double_click: Duration,
    pressed_at: Option<(f32, f32)>,
    dragged: bool,
    last_click: Option<(Instant, (f32, f32))>,
}

impl ClickTracker {
    pub fn new(slop: f32, double_click: Duration) -> Self {
        Self {
            slop: slop.max(0.0),
            double_click,
            pressed_at: None,
            dragged: false,
            last_click: None,
        }
    }

    pub fn press(&mut self, position: (f32, f32)) {
        self.pressed_at = Some(position);
        self.dragged = false;
    }

    /// Track pointer motion. Returns true once the current press has become a drag.
    pub fn moved(&mut self, position: (f32, f32)) -> bool {
        if let Some(start) = self.pressed_at {
            if distance(start, position) > self.slop {
                self.dragged = true;
            }
        }
        self.dragged
    }

    /// Classify the press that ends at `position`. `None` without a matching press.
    pub fn release(&mut self, position: (f32, f32), now: Instant) -> Option<PointerGesture> {
        let start = self.pressed_at.take()?;
        if self.dragged || distance(start, position) > self.slop {
            self.dragged = false;
            self.last_click = None;
            return Some(PointerGesture::Drag);
        }

        let double = self.last_click.is_some_and(|(at, last)| {
            now.saturating_duration_since(at) <= self.double_click
                && distance(last, position) <= self.slop
        });
        if double {
            self.last_click = None;
            Some(PointerGesture::DoubleClick)
        } else {
            self.last_click = Some((now, position));
            Some(PointerGesture::Click)
        }
    }

    /// Forget a press that another handler (a gizmo drag) took over.
    pub fn cancel(&mut self) {
        self.pressed_at = None;
        self.dragged = false;
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys() {
        let none = ModifiersState::empty();
        assert!(matches!(
            command_for_key(KeyCode::KeyE, none),
            Some(EditorCommand::SetGizmoMode(GizmoMode::Rotate))
        ));
        assert!(matches!(
            command_for_key(KeyCode::Backspace, none),
            Some(EditorCommand::DeleteSelected)
        ));
        assert!(matches!(
            command_for_key(KeyCode::Escape, none),
            Some(EditorCommand::Select(None))
        ));
        assert!(command_for_key(KeyCode::KeyC, none).is_none());
    }

    #[test]
    fn test_clipboard_shortcuts_need_modifier() {
        assert!(matches!(
            command_for_key(KeyCode::KeyC, ModifiersState::CONTROL),
            Some(EditorCommand::CopySelected)
        ));
        assert!(matches!(
            command_for_key(KeyCode::KeyV, ModifiersState::SUPER),
            Some(EditorCommand::Paste)
        ));
        // Ctrl+W is not a gizmo switch
        assert!(command_for_key(KeyCode::KeyW, ModifiersState::CONTROL).is_none());
    }

    #[test]
    fn test_click_versus_drag() {
        let start = Instant::now();
        let mut tracker = ClickTracker::new(4.0, Duration::from_millis(300));

        tracker.press((100.0, 100.0));
        assert!(!tracker.moved((102.0, 101.0)));
        assert_eq!(
            tracker.release((102.0, 101.0), start),
            Some(PointerGesture::Click)
        );

        tracker.press((100.0, 100.0));
        assert!(tracker.moved((130.0, 100.0)));
        // Returning to the start does not undo the drag
        tracker.moved((100.0, 100.0));
        assert_eq!(
            tracker.release((100.0, 100.0), start + Duration::from_millis(100)),
            Some(PointerGesture::Drag)
        );

        assert_eq!(tracker.release((0.0, 0.0), start), None);
    }

    #[test]
    fn test_double_click_window() {
        let start = Instant::now();
        let mut tracker = ClickTracker::new(4.0, Duration::from_millis(300));

        tracker.press((50.0, 50.0));
        tracker.release((50.0, 50.0), start);
        tracker.press((51.0, 50.0));
        assert_eq!(
            tracker.release((51.0, 50.0), start + Duration::from_millis(200)),
            Some(PointerGesture::DoubleClick)
        );

        // A third click starts a new pair
        tracker.press((51.0, 50.0));
        assert_eq!(
            tracker.release((51.0, 50.0), start + Duration::from_millis(250)),
            Some(PointerGesture::Click)
        );
        tracker.press((51.0, 50.0));
        assert_eq!(
            tracker.release((51.0, 50.0), start + Duration::from_millis(900)),
            Some(PointerGesture::Click)
        );
    }
}

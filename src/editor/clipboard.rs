//! Single-slot object clipboard.

use super::registry::{ObjectSnapshot, SceneObject};

#[derive(Debug, Default)]
pub struct Clipboard {
    slot: Option<ObjectSnapshot>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `object` into the slot, replacing whatever was there.
    ///
    /// Returns `false` and leaves the slot alone when nothing is selected.
    pub fn copy(&mut self, object: Option<&SceneObject>) -> bool {
        match object {
            Some(object) => {
                self.slot = Some(object.snapshot());
                true
            }
            None => false,
        }
    }

    pub fn peek(&self) -> Option<&ObjectSnapshot> {
        self.slot.as_ref()
    }

    pub fn take(&mut self) -> Option<ObjectSnapshot> {
        self.slot.take()
    }

    /// Put a snapshot back after a failed paste.
    pub fn restore(&mut self, snapshot: ObjectSnapshot) {
        self.slot = Some(snapshot);
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::registry::ObjectRegistry;
    use crate::gfx::geometry::ShapeDescriptor;
    use crate::gfx::resources::material::MaterialDescriptor;
    use crate::gfx::transform::Transform;

    #[test]
    fn test_copy_without_selection_keeps_slot() {
        let mut registry = ObjectRegistry::new();
        let id = registry
            .create(
                ShapeDescriptor::default(),
                MaterialDescriptor::default(),
                Transform::default(),
            )
            .unwrap()
            .id();

        let mut clipboard = Clipboard::new();
        assert!(!clipboard.copy(None));
        assert!(clipboard.is_empty());

        assert!(clipboard.copy(registry.get(id)));
        assert!(!clipboard.copy(None));
        assert_eq!(clipboard.peek().unwrap().shape, ShapeDescriptor::default());

        let snapshot = clipboard.take().unwrap();
        assert!(clipboard.is_empty());
        clipboard.restore(snapshot);
        assert!(!clipboard.is_empty());
    }
}

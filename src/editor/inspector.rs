//! Scene inspector view-model.
//!
//! A read-only listing rebuilt from the registry and uploads whenever the UI asks for it.

use crate::error::EntityId;

use super::registry::ObjectRegistry;
use super::uploads::UploadedMeshes;

#[derive(Debug, Clone, PartialEq)]
pub struct InspectorRow {
    pub entity: EntityId,
    pub label: String,
    pub detail: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneInspector {
    pub objects: Vec<InspectorRow>,
    pub uploads: Vec<InspectorRow>,
}

impl SceneInspector {
    pub fn collect(
        registry: &ObjectRegistry,
        uploads: &UploadedMeshes,
        selection: Option<EntityId>,
    ) -> Self {
        let objects = registry
            .list()
            .iter()
            .map(|object| {
                let entity = EntityId::Object(object.id());
                let position = object.transform().position;
                InspectorRow {
                    entity,
                    label: object.name().to_string(),
                    detail: format!(
                        "{} {} at ({:.2}, {:.2}, {:.2})",
                        object.material().kind,
                        object.material().color,
                        position.x,
                        position.y,
                        position.z
                    ),
                    selected: selection == Some(entity),
                }
            })
            .collect();

        let uploads = uploads
            .list()
            .iter()
            .map(|mesh| {
                let entity = EntityId::Upload(mesh.id());
                InspectorRow {
                    entity,
                    label: mesh.name().to_string(),
                    detail: format!(
                        "{} tris, {}, x{:.2}",
                        mesh.geometry().triangle_count(),
                        mesh.color(),
                        mesh.uniform_scale()
                    ),
                    selected: selection == Some(entity),
                }
            })
            .collect();

        Self { objects, uploads }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.uploads.is_empty()
    }

    pub fn selected(&self) -> Option<&InspectorRow> {
        self.objects
            .iter()
            .chain(self.uploads.iter())
            .find(|row| row.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::ShapeDescriptor;
    use crate::gfx::resources::material::MaterialDescriptor;
    use crate::gfx::transform::Transform;

    #[test]
    fn test_rows_follow_registry_order() {
        let mut registry = ObjectRegistry::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let event = registry
                .create(
                    ShapeDescriptor::default(),
                    MaterialDescriptor::default(),
                    Transform::default(),
                )
                .unwrap();
            ids.push(event.id());
        }

        let inspector = SceneInspector::collect(
            &registry,
            &UploadedMeshes::new(),
            Some(EntityId::Object(ids[1])),
        );
        let listed: Vec<_> = inspector.objects.iter().map(|row| row.entity).collect();
        assert_eq!(
            listed,
            ids.iter().map(|id| EntityId::Object(*id)).collect::<Vec<_>>()
        );
        assert_eq!(
            inspector.selected().map(|row| row.entity),
            Some(EntityId::Object(ids[1]))
        );
    }

    #[test]
    fn test_empty_scene() {
        let inspector = SceneInspector::collect(&ObjectRegistry::new(), &UploadedMeshes::new(), None);
        assert!(inspector.is_empty());
        assert!(inspector.selected().is_none());
    }
}

//! # Object Registry
//!
//! Authoritative list of scene objects. Ids come from a monotonic counter and are never
//! reused, so an id held by the UI or the gizmo either resolves to the same object or
//! to nothing. Objects are kept in insertion order; positions are only looked up at the
//! point of use.
//!
//! Every mutation returns a [`RegistryEvent`] describing what changed. The
//! [`SceneGraph`](super::scene_graph::SceneGraph) consumes those events to keep render
//! nodes in step.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EditorError, EditorResult, EntityId};
use crate::gfx::geometry::{self, Geometry, ShapeDescriptor};
use crate::gfx::picking::Aabb;
use crate::gfx::resources::material::MaterialDescriptor;
use crate::gfx::transform::Transform;

/// Stable identity of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An editable parametric object
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    id: ObjectId,
    name: String,
    shape: ShapeDescriptor,
    material: MaterialDescriptor,
    transform: Transform,
    local_bounds: Aabb,
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &ShapeDescriptor {
        &self.shape
    }

    pub fn material(&self) -> &MaterialDescriptor {
        &self.material
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }

    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transform(&self.transform.matrix())
    }

    /// Descriptor and transform copy, without identity.
    pub fn snapshot(&self) -> ObjectSnapshot {
        ObjectSnapshot {
            shape: self.shape,
            material: self.material,
            transform: self.transform,
        }
    }
}

/// Identity-free copy of an object's descriptors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSnapshot {
    pub shape: ShapeDescriptor,
    pub material: MaterialDescriptor,
    pub transform: Transform,
}

/// Partial update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectUpdate {
    pub shape: Option<ShapeDescriptor>,
    pub material: Option<MaterialDescriptor>,
    pub transform: Option<Transform>,
}

impl ObjectUpdate {
    pub fn shape(shape: ShapeDescriptor) -> Self {
        Self {
            shape: Some(shape),
            ..Self::default()
        }
    }

    pub fn material(material: MaterialDescriptor) -> Self {
        Self {
            material: Some(material),
            ..Self::default()
        }
    }

    pub fn transform(transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..Self::default()
        }
    }
}

/// What a registry mutation changed
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Created {
        id: ObjectId,
        geometry: Geometry,
    },
    Updated {
        id: ObjectId,
        /// Present only when the shape changed
        geometry: Option<Geometry>,
        material_changed: bool,
        transform_changed: bool,
    },
    Removed {
        id: ObjectId,
    },
}

impl RegistryEvent {
    pub fn id(&self) -> ObjectId {
        match self {
            RegistryEvent::Created { id, .. }
            | RegistryEvent::Updated { id, .. }
            | RegistryEvent::Removed { id } => *id,
        }
    }

    /// An update that touched nothing.
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            RegistryEvent::Updated {
                geometry: None,
                material_changed: false,
                transform_changed: false,
                ..
            }
        )
    }
}

#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: Vec<SceneObject>,
    next_id: u64,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, build geometry and insert a new object.
    pub fn create(
        &mut self,
        shape: ShapeDescriptor,
        material: MaterialDescriptor,
        transform: Transform,
    ) -> EditorResult<RegistryEvent> {
        let geometry = geometry::build(&shape)?;

        self.next_id += 1;
        let id = ObjectId(self.next_id);
        let object = SceneObject {
            id,
            name: format!("{} {}", shape.kind().label(), self.next_id),
            shape: geometry.shape,
            material,
            transform,
            local_bounds: geometry.bounds,
        };

        log::debug!("Created {} ({})", object.name, id);
        self.objects.push(object);
        Ok(RegistryEvent::Created { id, geometry })
    }

    /// Apply a partial update. Nothing changes if the new shape fails validation.
    pub fn update(&mut self, id: ObjectId, update: ObjectUpdate) -> EditorResult<RegistryEvent> {
        let index = self.index_of(id)?;
        let current = &self.objects[index];

        let geometry = match update.shape {
            Some(shape) if shape != current.shape => Some(geometry::build(&shape)?),
            _ => None,
        };
        let material = update.material.filter(|m| *m != current.material);
        let transform = update.transform.filter(|t| *t != current.transform);

        let object = &mut self.objects[index];
        if let Some(geometry) = &geometry {
            object.shape = geometry.shape;
            object.local_bounds = geometry.bounds;
        }
        if let Some(material) = material {
            object.material = material;
        }
        if let Some(transform) = transform {
            object.transform = transform;
        }

        Ok(RegistryEvent::Updated {
            id,
            geometry,
            material_changed: material.is_some(),
            transform_changed: transform.is_some(),
        })
    }

    pub fn remove(&mut self, id: ObjectId) -> EditorResult<RegistryEvent> {
        let index = self.index_of(id)?;
        let object = self.objects.remove(index);
        log::debug!("Removed {} ({})", object.name, id);
        Ok(RegistryEvent::Removed { id })
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Objects in insertion order.
    pub fn list(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// World-space bounds of every object, in insertion order, for picking.
    pub fn pick_candidates(&self) -> impl Iterator<Item = (ObjectId, Aabb)> + '_ {
        self.objects
            .iter()
            .map(|object| (object.id, object.world_bounds()))
    }

    fn index_of(&self, id: ObjectId) -> EditorResult<usize> {
        self.objects
            .iter()
            .position(|object| object.id == id)
            .ok_or(EditorError::NotFound(EntityId::Object(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{BoxParams, SphereParams};
    use crate::gfx::resources::material::{Color, MaterialKind};
    use cgmath::Vector3;

    fn unit_box() -> ShapeDescriptor {
        ShapeDescriptor::Box(BoxParams::default())
    }

    #[test]
    fn test_create_assigns_unique_ids_in_order() {
        let mut registry = ObjectRegistry::new();
        let a = registry
            .create(unit_box(), MaterialDescriptor::default(), Transform::default())
            .unwrap()
            .id();
        let b = registry
            .create(unit_box(), MaterialDescriptor::default(), Transform::default())
            .unwrap()
            .id();

        assert_ne!(a, b);
        let ids: Vec<_> = registry.list().iter().map(SceneObject::id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_invalid_shape_creates_nothing() {
        let mut registry = ObjectRegistry::new();
        let result = registry.create(
            ShapeDescriptor::Box(BoxParams::new(0.0, 1.0, 1.0)),
            MaterialDescriptor::default(),
            Transform::default(),
        );
        assert!(matches!(result, Err(EditorError::Validation(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_transform_only_update_skips_geometry_rebuild() {
        let mut registry = ObjectRegistry::new();
        let id = registry
            .create(unit_box(), MaterialDescriptor::default(), Transform::default())
            .unwrap()
            .id();

        let moved = Transform::from_position(Vector3::new(1.0, 2.0, 3.0));
        let event = registry
            .update(
                id,
                ObjectUpdate {
                    shape: Some(unit_box()),
                    transform: Some(moved),
                    ..ObjectUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(
            event,
            RegistryEvent::Updated {
                id,
                geometry: None,
                material_changed: false,
                transform_changed: true,
            }
        );
        assert_eq!(registry.get(id).unwrap().transform(), &moved);
    }

    #[test]
    fn test_shape_update_keeps_identity_and_transform() {
        let mut registry = ObjectRegistry::new();
        let placed = Transform::from_position(Vector3::new(4.0, 0.0, 0.0));
        let id = registry
            .create(unit_box(), MaterialDescriptor::default(), placed)
            .unwrap()
            .id();

        let sphere = ShapeDescriptor::Sphere(SphereParams::default());
        let event = registry.update(id, ObjectUpdate::shape(sphere)).unwrap();
        assert!(matches!(
            event,
            RegistryEvent::Updated {
                geometry: Some(_),
                ..
            }
        ));

        let object = registry.get(id).unwrap();
        assert_eq!(object.shape(), &sphere);
        assert_eq!(object.transform(), &placed);
        assert!((object.local_bounds().size().x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_failed_update_leaves_object_untouched() {
        let mut registry = ObjectRegistry::new();
        let id = registry
            .create(unit_box(), MaterialDescriptor::default(), Transform::default())
            .unwrap()
            .id();
        let before = registry.get(id).unwrap().clone();

        let result = registry.update(
            id,
            ObjectUpdate {
                shape: Some(ShapeDescriptor::Box(BoxParams::new(-1.0, 1.0, 1.0))),
                material: Some(MaterialDescriptor::new(MaterialKind::Phong, Color::RED)),
                transform: None,
            },
        );

        assert!(matches!(result, Err(EditorError::Validation(_))));
        assert_eq!(registry.get(id).unwrap(), &before);
    }

    #[test]
    fn test_removed_id_is_not_found() {
        let mut registry = ObjectRegistry::new();
        let id = registry
            .create(unit_box(), MaterialDescriptor::default(), Transform::default())
            .unwrap()
            .id();

        registry.remove(id).unwrap();
        assert!(registry.get(id).is_none());
        assert!(registry.remove(id).unwrap_err().is_not_found());
        assert!(registry
            .update(id, ObjectUpdate::transform(Transform::default()))
            .unwrap_err()
            .is_not_found());

        // Ids are not recycled
        let next = registry
            .create(unit_box(), MaterialDescriptor::default(), Transform::default())
            .unwrap()
            .id();
        assert_ne!(next, id);
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let mut registry = ObjectRegistry::new();
        let transform = Transform {
            position: Vector3::new(0.0, 1.0, 0.0),
            scale: Vector3::new(2.0, 2.0, 2.0),
            ..Transform::default()
        };
        let id = registry
            .create(unit_box(), MaterialDescriptor::default(), transform)
            .unwrap()
            .id();

        let bounds = registry.get(id).unwrap().world_bounds();
        assert!((bounds.size().x - 2.0).abs() < 1e-5);
        assert!((bounds.center().y - 1.0).abs() < 1e-5);
    }
}

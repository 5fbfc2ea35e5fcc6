//! Meshes brought in from external assets.
//!
//! Uploads live beside the object registry, never inside it: they have no shape
//! descriptor and are edited only through color and uniform scale. Animated uploads
//! replace their pose on every [`UploadedMeshes::animate`]; each plays from the moment it
//! was imported.

use cgmath::Matrix4;
use std::fmt;

use crate::error::{EditorError, EditorResult, EntityId};
use crate::gfx::geometry::{GeometryData, ValidationError};
use crate::gfx::picking::Aabb;
use crate::gfx::resources::material::Color;
use crate::gfx::transform::WorldPose;
use crate::io::animation::MeshAnimation;
use crate::io::import::ImportedMesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadId(u64);

impl UploadId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct UploadedMesh {
    id: UploadId,
    name: String,
    color: Color,
    uniform_scale: f32,
    pose: WorldPose,
    geometry: GeometryData,
    local_bounds: Aabb,
    animation: Option<MeshAnimation>,
    /// Seconds of playback since import
    playhead: f32,
}

impl UploadedMesh {
    pub fn id(&self) -> UploadId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn uniform_scale(&self) -> f32 {
        self.uniform_scale
    }

    /// Current world pose, before the editor's uniform scale.
    pub fn pose(&self) -> &WorldPose {
        &self.pose
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    /// Imported pose followed by the uniform scale.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.pose.matrix() * Matrix4::from_scale(self.uniform_scale)
    }

    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transform(&self.matrix())
    }
}

#[derive(Debug, Default)]
pub struct UploadedMeshes {
    meshes: Vec<UploadedMesh>,
    next_id: u64,
}

impl UploadedMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mesh: ImportedMesh) -> UploadId {
        self.next_id += 1;
        let id = UploadId(self.next_id);
        let local_bounds = mesh.geometry.bounds();
        let name = if mesh.name.is_empty() {
            format!("mesh {}", id.raw())
        } else {
            mesh.name
        };
        self.meshes.push(UploadedMesh {
            id,
            name,
            color: mesh.color,
            uniform_scale: 1.0,
            pose: mesh.pose,
            geometry: mesh.geometry,
            local_bounds,
            animation: mesh.animation,
            playhead: 0.0,
        });
        id
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadedMesh> {
        self.meshes.iter().find(|mesh| mesh.id == id)
    }

    pub fn list(&self) -> &[UploadedMesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn remove(&mut self, id: UploadId) -> EditorResult<UploadedMesh> {
        let index = self.index_of(id)?;
        Ok(self.meshes.remove(index))
    }

    /// Drop every upload, returning the ids that were removed.
    pub fn clear(&mut self) -> Vec<UploadId> {
        self.meshes.drain(..).map(|mesh| mesh.id).collect()
    }

    /// Advance playback of every animated upload by `dt` seconds. Returns the new world
    /// matrix of each mesh that moved.
    pub fn animate(&mut self, dt: f32) -> Vec<(UploadId, Matrix4<f32>)> {
        self.meshes
            .iter_mut()
            .filter_map(|mesh| {
                let animation = mesh.animation.as_ref()?;
                mesh.playhead += dt;
                mesh.pose = animation.pose_at(mesh.playhead);
                Some((mesh.id, mesh.matrix()))
            })
            .collect()
    }

    pub fn set_color(&mut self, id: UploadId, color: Color) -> EditorResult<&UploadedMesh> {
        let index = self.index_of(id)?;
        let mesh = &mut self.meshes[index];
        mesh.color = color.clamped();
        Ok(mesh)
    }

    pub fn set_uniform_scale(&mut self, id: UploadId, scale: f32) -> EditorResult<&UploadedMesh> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ValidationError::NonPositive {
                subject: "uploaded mesh",
                field: "uniform scale",
                value: scale,
            }
            .into());
        }
        let index = self.index_of(id)?;
        let mesh = &mut self.meshes[index];
        mesh.uniform_scale = scale;
        Ok(mesh)
    }

    fn index_of(&self, id: UploadId) -> EditorResult<usize> {
        self.meshes
            .iter()
            .position(|mesh| mesh.id == id)
            .ok_or(EditorError::NotFound(EntityId::Upload(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{build, ShapeDescriptor};
    use cgmath::Vector3;

    fn imported(name: &str) -> ImportedMesh {
        let geometry = build(&ShapeDescriptor::default()).unwrap().data;
        ImportedMesh {
            name: name.to_string(),
            color: Color::WHITE,
            pose: WorldPose {
                translation: Vector3::new(2.0, 0.0, 0.0),
                ..WorldPose::identity()
            },
            geometry,
            animation: None,
        }
    }

    #[test]
    fn test_add_assigns_distinct_ids() {
        let mut uploads = UploadedMeshes::new();
        let a = uploads.add(imported("a"));
        let b = uploads.add(imported(""));
        assert_ne!(a, b);
        assert_eq!(uploads.get(b).unwrap().name(), format!("mesh {}", b.raw()));
        assert_eq!(uploads.len(), 2);
    }

    #[test]
    fn test_uniform_scale_must_be_positive() {
        let mut uploads = UploadedMeshes::new();
        let id = uploads.add(imported("a"));

        assert!(uploads.set_uniform_scale(id, 0.0).is_err());
        assert!(uploads.set_uniform_scale(id, f32::NAN).is_err());
        assert_eq!(uploads.get(id).unwrap().uniform_scale(), 1.0);

        let mesh = uploads.set_uniform_scale(id, 2.0).unwrap();
        let bounds = mesh.world_bounds();
        assert!((bounds.size().x - 2.0).abs() < 1e-5);
        assert!((bounds.center().x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_animate_moves_only_animated_meshes() {
        use crate::io::animation::{AnimatedNode, Interpolation, NodeTracks, Track};

        let mut uploads = UploadedMeshes::new();
        let still = uploads.add(imported("still"));
        let mut animated = imported("bobbing");
        animated.animation = Some(MeshAnimation::new(vec![AnimatedNode {
            rest: WorldPose::identity(),
            tracks: NodeTracks {
                translation: Track::new(
                    vec![0.0, 2.0],
                    vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0)],
                    Interpolation::Linear,
                ),
                ..NodeTracks::default()
            },
        }]));
        let bobbing = uploads.add(animated);
        uploads.set_uniform_scale(bobbing, 3.0).unwrap();

        let moved = uploads.animate(1.0);
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].0, bobbing);
        let mesh = uploads.get(bobbing).unwrap();
        assert_eq!(mesh.pose().translation, Vector3::new(0.0, 1.0, 0.0));
        // Uniform scale survives playback
        assert_eq!(moved[0].1, mesh.matrix());
        assert_eq!(mesh.uniform_scale(), 3.0);
        assert_eq!(uploads.get(still).unwrap().pose().translation.x, 2.0);

        // Playback accumulates across calls
        uploads.animate(0.5);
        let y = uploads.get(bobbing).unwrap().pose().translation.y;
        assert!((y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_clear_and_remove() {
        let mut uploads = UploadedMeshes::new();
        let a = uploads.add(imported("a"));
        let b = uploads.add(imported("b"));

        uploads.remove(a).unwrap();
        assert!(uploads.remove(a).unwrap_err().is_not_found());
        assert_eq!(uploads.clear(), vec![b]);
        assert!(uploads.is_empty());
    }
}

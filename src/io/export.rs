//! # Scene Export
//!
//! Serializes registry objects and uploaded meshes into a single self-contained glTF 2.0
//! JSON document. All vertex data lives in one buffer embedded as a base64 data URI.
//!
//! Objects whose geometry or transform would produce a degenerate mesh are refused up
//! front; nothing is written in that case.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cgmath::{Matrix4, Quaternion};
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::document::*;
use crate::editor::registry::SceneObject;
use crate::editor::uploads::UploadedMesh;
use crate::error::EntityId;
use crate::gfx::geometry::{self, GeometryData};
use crate::gfx::resources::material::Color;

/// Fixed output name inside the chosen directory
pub const EXPORT_FILE_NAME: &str = "modified_model.gltf";

const MIN_SCALE: f32 = 1e-6;
const EXTENT_EPSILON: f32 = 1e-6;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{entity} is degenerate: {reason}")]
    Degenerate { entity: EntityId, reason: String },
    #[error("could not encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build the export document, refusing the whole scene if any entry is degenerate.
pub fn build_document(
    objects: &[SceneObject],
    uploads: &[UploadedMesh],
) -> Result<GltfDocument, ExportError> {
    let mut builder = DocumentBuilder::default();

    for object in objects {
        let entity = EntityId::Object(object.id());
        let geometry = geometry::build(object.shape()).map_err(|err| ExportError::Degenerate {
            entity,
            reason: err.to_string(),
        })?;
        let transform = object.transform();
        check_scale(entity, transform.scale.into())?;
        check_extent(entity, &geometry.data, &transform.matrix())?;

        let material = object.material();
        builder.push(Entry {
            name: object.name(),
            geometry: &geometry.data,
            color: material.color,
            translation: transform.position.into(),
            rotation: quaternion_xyzw(transform.quaternion()),
            scale: transform.scale.into(),
            node_extras: Some(json!({ "shape": object.shape() })),
            material_extras: Some(json!({ "materialKind": material.kind })),
        });
    }

    for mesh in uploads {
        let entity = EntityId::Upload(mesh.id());
        let scale: [f32; 3] = (mesh.pose().scale * mesh.uniform_scale()).into();
        check_scale(entity, scale)?;
        check_extent(entity, mesh.geometry(), &mesh.matrix())?;

        builder.push(Entry {
            name: mesh.name(),
            geometry: mesh.geometry(),
            color: mesh.color(),
            translation: mesh.pose().translation.into(),
            rotation: quaternion_xyzw(mesh.pose().rotation),
            scale,
            node_extras: None,
            material_extras: None,
        });
    }

    Ok(builder.finish())
}

/// Write `document` as `modified_model.gltf` inside `dir`, creating the directory.
pub fn write_document(dir: &Path, document: &GltfDocument) -> Result<PathBuf, ExportError> {
    let path = dir.join(EXPORT_FILE_NAME);
    let json = document.to_json()?;
    std::fs::create_dir_all(dir)
        .and_then(|_| std::fs::write(&path, json))
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
    log::info!("Exported {} node(s) to {}", document.nodes.len(), path.display());
    Ok(path)
}

fn check_scale(entity: EntityId, scale: [f32; 3]) -> Result<(), ExportError> {
    match scale.iter().find(|s| !s.is_finite() || s.abs() < MIN_SCALE) {
        Some(s) => Err(ExportError::Degenerate {
            entity,
            reason: format!("scale component {s} collapses the mesh"),
        }),
        None => Ok(()),
    }
}

fn check_extent(
    entity: EntityId,
    geometry: &GeometryData,
    matrix: &Matrix4<f32>,
) -> Result<(), ExportError> {
    let axes = geometry.bounds().transform(matrix).extent_axes(EXTENT_EPSILON);
    if axes < 2 {
        return Err(ExportError::Degenerate {
            entity,
            reason: format!("world bounds extend along {axes} axis"),
        });
    }
    Ok(())
}

fn quaternion_xyzw(q: Quaternion<f32>) -> [f32; 4] {
    [q.v.x, q.v.y, q.v.z, q.s]
}

struct Entry<'a> {
    name: &'a str,
    geometry: &'a GeometryData,
    color: Color,
    translation: [f32; 3],
    rotation: [f32; 4],
    scale: [f32; 3],
    node_extras: Option<serde_json::Value>,
    material_extras: Option<serde_json::Value>,
}

#[derive(Default)]
struct DocumentBuilder {
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    accessors: Vec<Accessor>,
    buffer_views: Vec<BufferView>,
    bin: Vec<u8>,
}

impl DocumentBuilder {
    fn push(&mut self, entry: Entry<'_>) {
        let data = entry.geometry;
        let bounds = data.bounds();

        let position = self.push_accessor(
            bytemuck::cast_slice(&data.vertices),
            TARGET_ARRAY_BUFFER,
            COMPONENT_FLOAT,
            data.vertices.len(),
            AccessorKind::Vec3,
            Some((bounds.min.into(), bounds.max.into())),
        );
        let normal = (data.normals.len() == data.vertices.len()).then(|| {
            self.push_accessor(
                bytemuck::cast_slice(&data.normals),
                TARGET_ARRAY_BUFFER,
                COMPONENT_FLOAT,
                data.normals.len(),
                AccessorKind::Vec3,
                None,
            )
        });
        let tex_coord = (data.tex_coords.len() == data.vertices.len()).then(|| {
            self.push_accessor(
                bytemuck::cast_slice(&data.tex_coords),
                TARGET_ARRAY_BUFFER,
                COMPONENT_FLOAT,
                data.tex_coords.len(),
                AccessorKind::Vec2,
                None,
            )
        });
        let indices = self.push_accessor(
            bytemuck::cast_slice(&data.indices),
            TARGET_ELEMENT_ARRAY_BUFFER,
            COMPONENT_UNSIGNED_INT,
            data.indices.len(),
            AccessorKind::Scalar,
            None,
        );

        let material = self.materials.len() as u32;
        self.materials.push(Material {
            name: entry.name.to_string(),
            pbr_metallic_roughness: PbrMetallicRoughness {
                base_color_factor: [entry.color.r, entry.color.g, entry.color.b, 1.0],
                metallic_factor: 0.0,
                roughness_factor: 1.0,
            },
            extras: entry.material_extras,
        });

        let mesh = self.meshes.len() as u32;
        self.meshes.push(Mesh {
            name: entry.name.to_string(),
            primitives: vec![Primitive {
                attributes: Attributes {
                    position,
                    normal,
                    tex_coord,
                },
                indices,
                material,
                mode: MODE_TRIANGLES,
            }],
        });

        self.nodes.push(Node {
            name: entry.name.to_string(),
            mesh,
            translation: entry.translation,
            rotation: entry.rotation,
            scale: entry.scale,
            extras: entry.node_extras,
        });
    }

    fn push_accessor(
        &mut self,
        bytes: &[u8],
        target: u32,
        component_type: u32,
        count: usize,
        kind: AccessorKind,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> u32 {
        // Views start on a 4-byte boundary so every component stays aligned
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        let view = self.buffer_views.len() as u32;
        self.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: self.bin.len() as u32,
            byte_length: bytes.len() as u32,
            target,
        });
        self.bin.extend_from_slice(bytes);

        let (min, max) = match bounds {
            Some((min, max)) => (Some(min.to_vec()), Some(max.to_vec())),
            None => (None, None),
        };
        self.accessors.push(Accessor {
            buffer_view: view,
            byte_offset: 0,
            component_type,
            count: count as u32,
            kind,
            min,
            max,
        });
        self.accessors.len() as u32 - 1
    }

    fn finish(self) -> GltfDocument {
        let buffers = if self.bin.is_empty() {
            Vec::new()
        } else {
            vec![Buffer {
                byte_length: self.bin.len() as u32,
                uri: format!(
                    "data:application/octet-stream;base64,{}",
                    STANDARD.encode(&self.bin)
                ),
            }]
        };

        GltfDocument {
            asset: Asset::default(),
            scene: 0,
            scenes: vec![Scene {
                nodes: (0..self.nodes.len() as u32).collect(),
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            materials: self.materials,
            accessors: self.accessors,
            buffer_views: self.buffer_views,
            buffers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::registry::ObjectRegistry;
    use crate::gfx::geometry::{BoxParams, ShapeDescriptor};
    use crate::gfx::resources::material::{MaterialDescriptor, MaterialKind};
    use crate::gfx::transform::Transform;
    use cgmath::Vector3;

    fn registry_with(transforms: &[Transform]) -> ObjectRegistry {
        let mut registry = ObjectRegistry::new();
        for transform in transforms {
            registry
                .create(
                    ShapeDescriptor::Box(BoxParams::new(1.0, 2.0, 3.0)),
                    MaterialDescriptor::new(MaterialKind::Phong, Color::RED),
                    *transform,
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_document_layout() {
        let registry = registry_with(&[Transform::default(), Transform::default()]);
        let document = build_document(registry.list(), &[]).unwrap();

        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.meshes.len(), 2);
        assert_eq!(document.materials.len(), 2);
        assert_eq!(document.scenes[0].nodes, vec![0, 1]);
        assert_eq!(document.buffers.len(), 1);
        assert!(document.buffers[0].uri.starts_with("data:application/octet-stream;base64,"));
        for view in &document.buffer_views {
            assert_eq!(view.byte_offset % 4, 0);
        }

        let position = &document.accessors[document.meshes[0].primitives[0].attributes.position as usize];
        assert_eq!(position.min.as_deref(), Some(&[-0.5, -1.0, -1.5][..]));
        assert_eq!(position.max.as_deref(), Some(&[0.5, 1.0, 1.5][..]));

        let extras = document.materials[0].extras.as_ref().unwrap();
        assert_eq!(extras["materialKind"], "phong");
        let shape = &document.nodes[0].extras.as_ref().unwrap()["shape"];
        assert_eq!(shape["type"], "box");
    }

    #[test]
    fn test_zero_scale_is_refused() {
        let flat = Transform {
            scale: Vector3::new(1.0, 0.0, 1.0),
            ..Transform::default()
        };
        let registry = registry_with(&[Transform::default(), flat]);
        let err = build_document(registry.list(), &[]).unwrap_err();
        assert!(matches!(err, ExportError::Degenerate { .. }));
    }

    #[test]
    fn test_empty_scene_exports_empty_document() {
        let document = build_document(&[], &[]).unwrap();
        assert!(document.nodes.is_empty());
        assert!(document.buffers.is_empty());
    }

    #[test]
    fn test_write_uses_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_with(&[Transform::default()]);
        let document = build_document(registry.list(), &[]).unwrap();

        let path = write_document(dir.path(), &document).unwrap();
        assert_eq!(path, dir.path().join("modified_model.gltf"));
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(GltfDocument::from_json(&text).unwrap(), document);
    }
}

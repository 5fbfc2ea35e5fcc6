//! # Asset Import
//!
//! Loads external meshes into flat [`ImportedMesh`] records. glTF (JSON or binary) goes
//! through the `gltf` crate with the node hierarchy flattened into world poses; Wavefront
//! OBJ goes through `tobj`. glTF animation channels are kept per mesh as a
//! [`MeshAnimation`] for playback.
//!
//! Index data is checked before anything leaves this module: every index must name a
//! vertex and the count must form whole triangles.
//!
//! [`AssetImporter`] runs the same loader on a worker thread so a large file never blocks
//! the event loop. Completions are collected with [`AssetImporter::poll`].

use cgmath::{InnerSpace, Quaternion, Vector3};
use futures::channel::oneshot;
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::animation::{AnimatedNode, Interpolation, MeshAnimation, NodeTracks, Track};
use crate::gfx::geometry::GeometryData;
use crate::gfx::picking::Aabb;
use crate::gfx::resources::material::Color;
use crate::gfx::transform::WorldPose;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("malformed OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("unsupported asset format '{0}'")]
    UnsupportedFormat(String),
    #[error("{0} contains no triangle meshes")]
    Empty(String),
    #[error("primitive in mesh '{0}' has no positions")]
    MissingPositions(String),
    #[error("mesh '{mesh}' index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
    #[error("mesh '{mesh}' has {count} indices, not a whole number of triangles")]
    PartialTriangle { mesh: String, count: usize },
    #[error("import of {0} was abandoned before completing")]
    Abandoned(String),
    #[error("could not start import worker: {0}")]
    Worker(String),
}

/// Where an asset comes from
#[derive(Debug, Clone)]
pub enum AssetSource {
    Path(PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl AssetSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        AssetSource::Path(path.into())
    }

    fn format(&self) -> Result<AssetFormat, LoadError> {
        let name = match self {
            AssetSource::Path(path) => path.to_string_lossy().into_owned(),
            AssetSource::Bytes { name, .. } => name.clone(),
        };
        let extension = Path::new(&name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("gltf") | Some("glb") => Ok(AssetFormat::Gltf),
            Some("obj") => Ok(AssetFormat::Obj),
            _ => match self {
                // Sniff unnamed bytes: binary glTF magic or a JSON object
                AssetSource::Bytes { data, .. }
                    if data.starts_with(b"glTF") || data.trim_ascii_start().starts_with(b"{") =>
                {
                    Ok(AssetFormat::Gltf)
                }
                _ => Err(LoadError::UnsupportedFormat(
                    extension.unwrap_or_else(|| name.clone()),
                )),
            },
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Path(path) => write!(f, "{}", path.display()),
            AssetSource::Bytes { name, data } => write!(f, "{name} ({} bytes)", data.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetFormat {
    Gltf,
    Obj,
}

/// One triangle primitive with its flattened world pose
#[derive(Debug, Clone)]
pub struct ImportedMesh {
    pub name: String,
    pub color: Color,
    /// World pose at the start of playback
    pub pose: WorldPose,
    pub geometry: GeometryData,
    pub animation: Option<MeshAnimation>,
}

impl ImportedMesh {
    pub fn world_bounds(&self) -> Aabb {
        self.geometry.bounds().transform(&self.pose.matrix())
    }
}

/// Move a batch of meshes so their combined bounds are centered on the origin. Returns the
/// offset that was subtracted.
pub fn center_on_bounds(meshes: &mut [ImportedMesh]) -> Vector3<f32> {
    let Some(bounds) = meshes
        .iter()
        .map(ImportedMesh::world_bounds)
        .reduce(|a, b| a.union(&b))
    else {
        return Vector3::new(0.0, 0.0, 0.0);
    };
    let center = bounds.center();
    for mesh in meshes.iter_mut() {
        mesh.pose.translation -= center;
        if let Some(animation) = mesh.animation.as_mut() {
            animation.root.translation -= center;
        }
    }
    center
}

/// Load every triangle mesh in `source`.
pub fn load_asset(source: &AssetSource) -> Result<Vec<ImportedMesh>, LoadError> {
    let format = source.format()?;
    if let AssetSource::Path(path) = source {
        std::fs::metadata(path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
    }

    let meshes = match (format, source) {
        (AssetFormat::Gltf, AssetSource::Path(path)) => {
            let (document, buffers, _images) = gltf::import(path)?;
            gltf_meshes(&document, &buffers)?
        }
        (AssetFormat::Gltf, AssetSource::Bytes { data, .. }) => {
            let (document, buffers, _images) = gltf::import_slice(data)?;
            gltf_meshes(&document, &buffers)?
        }
        (AssetFormat::Obj, AssetSource::Path(path)) => {
            let (models, materials) = tobj::load_obj(path, &obj_options())?;
            obj_meshes(models, materials.unwrap_or_default())?
        }
        (AssetFormat::Obj, AssetSource::Bytes { data, .. }) => {
            let mut reader = Cursor::new(data.as_slice());
            let (models, _) = tobj::load_obj_buf(&mut reader, &obj_options(), |_| {
                Err(tobj::LoadError::OpenFileFailed)
            })?;
            obj_meshes(models, Vec::new())?
        }
    };

    if meshes.is_empty() {
        return Err(LoadError::Empty(source.to_string()));
    }
    log::info!("Loaded {} mesh(es) from {source}", meshes.len());
    Ok(meshes)
}

fn gltf_meshes(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<ImportedMesh>, LoadError> {
    let tracks = read_animations(document, buffers);
    let mut meshes = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            let mut walk = NodeWalk {
                buffers,
                tracks: &tracks,
                chain: Vec::new(),
                out: &mut meshes,
            };
            for node in scene.nodes() {
                walk.visit(&node)?;
            }
        }
        None => {
            for mesh in document.meshes() {
                push_mesh(&mesh, WorldPose::identity(), None, buffers, &mut meshes)?;
            }
        }
    }
    Ok(meshes)
}

/// Every animation channel in the document, grouped by target node. Each track loops over
/// the duration of its own clip.
fn read_animations(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> HashMap<usize, NodeTracks> {
    use gltf::animation::util::ReadOutputs;

    enum Property {
        Translation(Track<Vector3<f32>>),
        Rotation(Track<Quaternion<f32>>),
        Scale(Track<Vector3<f32>>),
    }

    let mut by_node: HashMap<usize, NodeTracks> = HashMap::new();
    for animation in document.animations() {
        let clip = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("animation {}", animation.index()));
        let mut channels = Vec::new();

        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
            else {
                log::warn!("Skipping channel {} of '{clip}': missing keyframes", channel.index());
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };

            let property = match outputs {
                ReadOutputs::Translations(values) => {
                    let values = values.map(Vector3::from).collect();
                    Track::new(times, values, interpolation).map(Property::Translation)
                }
                ReadOutputs::Rotations(values) => {
                    let values = values
                        .into_f32()
                        .map(|[x, y, z, w]| Quaternion::new(w, x, y, z))
                        .collect();
                    Track::new(times, values, interpolation).map(Property::Rotation)
                }
                ReadOutputs::Scales(values) => {
                    let values = values.map(Vector3::from).collect();
                    Track::new(times, values, interpolation).map(Property::Scale)
                }
                ReadOutputs::MorphTargetWeights(_) => {
                    log::debug!("Ignoring morph target weights in '{clip}'");
                    continue;
                }
            };
            match property {
                Some(property) => channels.push((channel.target().node().index(), property)),
                None => log::warn!(
                    "Skipping channel {} of '{clip}': malformed keyframes",
                    channel.index()
                ),
            }
        }

        let duration = channels
            .iter()
            .map(|(_, property)| match property {
                Property::Translation(track) | Property::Scale(track) => track.duration(),
                Property::Rotation(track) => track.duration(),
            })
            .fold(0.0f32, f32::max);

        for (node, property) in channels {
            let tracks = by_node.entry(node).or_default();
            match property {
                Property::Translation(track) => {
                    tracks.translation = Some(track.with_period(duration))
                }
                Property::Rotation(track) => tracks.rotation = Some(track.with_period(duration)),
                Property::Scale(track) => tracks.scale = Some(track.with_period(duration)),
            }
        }
        log::debug!("Animation '{clip}' runs {duration:.2}s");
    }
    by_node
}

/// Depth-first walk carrying the node path from the scene root.
struct NodeWalk<'a> {
    buffers: &'a [gltf::buffer::Data],
    tracks: &'a HashMap<usize, NodeTracks>,
    chain: Vec<AnimatedNode>,
    out: &'a mut Vec<ImportedMesh>,
}

impl NodeWalk<'_> {
    fn visit(&mut self, node: &gltf::Node) -> Result<(), LoadError> {
        let (translation, [x, y, z, w], scale) = node.transform().decomposed();
        self.chain.push(AnimatedNode {
            rest: WorldPose {
                translation: Vector3::from(translation),
                rotation: Quaternion::new(w, x, y, z),
                scale: Vector3::from(scale),
            },
            tracks: self.tracks.get(&node.index()).cloned().unwrap_or_default(),
        });

        let result = self.visit_inner(node);
        self.chain.pop();
        result
    }

    fn visit_inner(&mut self, node: &gltf::Node) -> Result<(), LoadError> {
        if let Some(mesh) = node.mesh() {
            let animated = self.chain.iter().any(|link| !link.tracks.is_empty());
            let animation = animated.then(|| MeshAnimation::new(self.chain.clone()));
            let pose = match &animation {
                Some(animation) => animation.pose_at(0.0),
                None => self
                    .chain
                    .iter()
                    .fold(WorldPose::identity(), |pose, link| pose.then(&link.rest)),
            };
            push_mesh(&mesh, pose, animation, self.buffers, self.out)?;
        }
        for child in node.children() {
            self.visit(&child)?;
        }
        Ok(())
    }
}

fn push_mesh(
    mesh: &gltf::Mesh,
    pose: WorldPose,
    animation: Option<MeshAnimation>,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<ImportedMesh>,
) -> Result<(), LoadError> {
    let mesh_name = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh {}", mesh.index()));
    let primitive_count = mesh.primitives().len();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping {:?} primitive in '{mesh_name}', only triangles are supported",
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
        let vertices: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| LoadError::MissingPositions(mesh_name.clone()))?
            .collect();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };
        check_triangles(&mesh_name, vertices.len(), &indices)?;
        let normals = match reader.read_normals() {
            Some(normals) => normals.collect(),
            None => vertex_normals(&vertices, &indices),
        };
        let tex_coords = match reader.read_tex_coords(0) {
            Some(uvs) => uvs.into_f32().collect(),
            None => vec![[0.0, 0.0]; vertices.len()],
        };

        let [r, g, b, _] = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();
        let name = if primitive_count > 1 {
            format!("{mesh_name}.{}", primitive.index())
        } else {
            mesh_name.clone()
        };

        out.push(ImportedMesh {
            name,
            color: Color::rgb(r, g, b),
            pose,
            geometry: GeometryData {
                vertices,
                tex_coords,
                normals,
                indices,
            },
            animation: animation.clone(),
        });
    }
    Ok(())
}

/// Reject index data that does not describe whole triangles over the given vertices.
fn check_triangles(mesh: &str, vertex_count: usize, indices: &[u32]) -> Result<(), LoadError> {
    if indices.len() % 3 != 0 {
        return Err(LoadError::PartialTriangle {
            mesh: mesh.to_string(),
            count: indices.len(),
        });
    }
    match indices.iter().find(|&&index| index as usize >= vertex_count) {
        Some(&index) => Err(LoadError::IndexOutOfRange {
            mesh: mesh.to_string(),
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

fn obj_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

fn obj_meshes(
    models: Vec<tobj::Model>,
    materials: Vec<tobj::Material>,
) -> Result<Vec<ImportedMesh>, LoadError> {
    models
        .into_iter()
        .filter(|model| !model.mesh.indices.is_empty())
        .map(|model| {
            let mesh = model.mesh;
            let vertices: Vec<[f32; 3]> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect();
            check_triangles(&model.name, vertices.len(), &mesh.indices)?;
            let normals = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect()
            } else {
                vertex_normals(&vertices, &mesh.indices)
            };
            let tex_coords = if mesh.texcoords.len() / 2 == vertices.len() {
                mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
            } else {
                vec![[0.0, 0.0]; vertices.len()]
            };
            let color = mesh
                .material_id
                .and_then(|id| materials.get(id))
                .and_then(|material| material.diffuse)
                .map(Color::from_array)
                .unwrap_or(Color::WHITE);

            Ok(ImportedMesh {
                name: model.name,
                color,
                pose: WorldPose::identity(),
                geometry: GeometryData {
                    vertices,
                    tex_coords,
                    normals,
                    indices: mesh.indices,
                },
                animation: None,
            })
        })
        .collect()
}

/// Area-weighted vertex normals for meshes that ship without them.
fn vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vector3::from(vertices[a]),
            Vector3::from(vertices[b]),
            Vector3::from(vertices[c]),
        );
        let face = (pb - pa).cross(pc - pa);
        for index in [a, b, c] {
            sums[index] += face;
        }
    }
    sums.into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0f32, 1.0, 0.0]
            }
        })
        .collect()
}

type ImportOutcome = Result<Vec<ImportedMesh>, LoadError>;

struct PendingImport {
    label: String,
    receiver: oneshot::Receiver<ImportOutcome>,
}

/// A finished background import
#[derive(Debug)]
pub struct CompletedImport {
    pub label: String,
    pub result: ImportOutcome,
}

/// Parses assets on worker threads; results are collected on the caller's thread.
#[derive(Default)]
pub struct AssetImporter {
    pending: Vec<PendingImport>,
}

impl AssetImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `source` on a worker thread.
    pub fn spawn(&mut self, source: AssetSource) -> Result<(), LoadError> {
        let label = source.to_string();
        let (sender, receiver) = oneshot::channel();

        std::thread::Builder::new()
            .name("asset-import".to_string())
            .spawn(move || {
                // The receiver may already be gone if the editor shut down
                let _ = sender.send(load_asset(&source));
            })
            .map_err(|err| LoadError::Worker(err.to_string()))?;

        log::debug!("Import of {label} started");
        self.pending.push(PendingImport { label, receiver });
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Collect every import that has finished since the last poll, in start order.
    pub fn poll(&mut self) -> Vec<CompletedImport> {
        let mut completed = Vec::new();
        self.pending.retain_mut(|pending| match pending.receiver.try_recv() {
            Ok(Some(result)) => {
                completed.push(CompletedImport {
                    label: pending.label.clone(),
                    result,
                });
                false
            }
            Ok(None) => true,
            Err(oneshot::Canceled) => {
                completed.push(CompletedImport {
                    label: pending.label.clone(),
                    result: Err(LoadError::Abandoned(pending.label.clone())),
                });
                false
            }
        });
        completed
    }

    /// Block until every pending import has finished.
    pub fn wait_all(&mut self) -> Vec<CompletedImport> {
        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .map(|PendingImport { label, receiver }| {
                let result = futures::executor::block_on(receiver)
                    .unwrap_or_else(|_| Err(LoadError::Abandoned(label.clone())));
                CompletedImport { label, result }
            })
            .collect()
    }
}

//! Asset import and scene export.

pub mod animation;
pub mod document;
pub mod export;
pub mod import;

pub use document::GltfDocument;
pub use export::{build_document, write_document, ExportError, EXPORT_FILE_NAME};
pub use animation::MeshAnimation;
pub use import::{
    center_on_bounds, load_asset, AssetImporter, AssetSource, CompletedImport, ImportedMesh,
    LoadError,
};

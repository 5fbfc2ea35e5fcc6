//! Error taxonomy shared by the editor core.
//!
//! Every variant is recoverable: a failed operation leaves the scene in its last valid
//! state. [`EditorError::NotFound`] in particular is expected when UI state lags behind
//! the registry, and command dispatch downgrades it to a logged no-op.

use std::fmt;
use thiserror::Error;

use crate::editor::registry::ObjectId;
use crate::editor::uploads::UploadId;
use crate::gfx::geometry::ValidationError;
use crate::io::{ExportError, LoadError};

/// Identity of anything the editor can address by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Object(ObjectId),
    Upload(UploadId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Object(id) => write!(f, "object {id}"),
            EntityId::Upload(id) => write!(f, "uploaded mesh {id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid parameters: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0} does not exist")]
    NotFound(EntityId),
    #[error("import failed: {0}")]
    Load(#[from] LoadError),
    #[error("export refused: {0}")]
    ExportRefused(#[from] ExportError),
}

impl EditorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditorError::NotFound(_))
    }
}

pub type EditorResult<T> = Result<T, EditorError>;

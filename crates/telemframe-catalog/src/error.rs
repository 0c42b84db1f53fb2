use telemframe_frame::FrameError;

/// Errors that can occur while building a descriptor catalogue.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The definition file could not be loaded.
    #[error("failed to load definitions: {0}")]
    LoadFailed(String),

    /// The definition file is not valid JSON or has the wrong shape.
    #[error("definitions are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A type tag is already registered and overrides are disabled.
    #[error("type {type_tag} already registered as {existing}")]
    DuplicateType { type_tag: u8, existing: String },

    /// A definition is internally inconsistent.
    #[error("invalid definition {name}: {reason}")]
    InvalidDefinition { name: String, reason: String },

    /// The resulting descriptor would not frame correctly.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

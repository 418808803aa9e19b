use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VectorizeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: usize, height: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A stage broke a structural invariant; not caused by the input.
    #[error("internal invariant violated: {0}")]
    Internal(#[from] cb_core::Error),
}

impl VectorizeError {
    /// Unreadable, corrupt or unusable input. Fatal for that image only.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Decode(_) | Self::EmptyImage { .. }
        )
    }
}

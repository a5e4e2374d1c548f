use thiserror::Error;

/// Errors raised while capturing, snapshotting or highlighting a page
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A node handle does not belong to the document it was used with
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A style or element-only property was read from a non-element node
    #[error("Node {node} is not an element (required for {operation})")]
    NotAnElement { node: String, operation: String },

    /// Layout geometry could not be computed (e.g. detached node)
    #[error("Layout unavailable for {node}: {reason}")]
    LayoutUnavailable { node: String, reason: String },

    /// The selection scratch resource failed
    #[error("Selection failed: {0}")]
    SelectionFailed(String),

    /// The reference counter would pass `u32::MAX`
    #[error("References exhausted after {last}")]
    ReferencesExhausted { last: u32 },

    /// The captured page could not be turned into a document
    #[error("Failed to parse captured page: {0}")]
    CaptureParseFailed(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Invalid font data")]
    InvalidFont,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    pub fn not_an_element(node: impl std::fmt::Debug, operation: impl Into<String>) -> Self {
        Self::NotAnElement {
            node: format!("{:?}", node),
            operation: operation.into(),
        }
    }

    pub fn layout_unavailable(node: impl std::fmt::Debug, reason: impl Into<String>) -> Self {
        Self::LayoutUnavailable {
            node: format!("{:?}", node),
            reason: reason.into(),
        }
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, SnapshotError>;

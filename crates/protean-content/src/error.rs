//! Error types for content operations.

/// Errors arising from content-level validation.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The copied object's type may not be constructed in the target.
    #[error("content of type {type_id} can not be added here")]
    PasteNotAllowed { type_id: String },
}

use crate::ids::ProfileId;
use thiserror::Error;

/// Result alias for profile validation and list edits.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Errors raised while validating or editing profiles.
///
/// The compiler never produces these; they belong to the editing side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile name is required")]
    NameRequired,

    #[error("URL regex is required")]
    UrlRegexRequired,

    #[error("invalid URL regex {pattern:?}: {message}")]
    InvalidUrlRegex { pattern: String, message: String },

    #[error("profile needs at least one header with a name and a value")]
    NoHeaders,

    #[error("duplicate profile id: {0}")]
    DuplicateId(ProfileId),

    #[error("profile not found: {0}")]
    ProfileNotFound(ProfileId),

    #[error("index {index} out of range for {len} profiles")]
    IndexOutOfRange { index: usize, len: usize },
}

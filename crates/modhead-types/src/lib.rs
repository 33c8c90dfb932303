//! # modhead-types
//!
//! Data model shared by the modhead crates.
//!
//! - [`Profile`] / [`ProfileList`]: what the user edits. List order is
//!   precedence.
//! - [`Rule`]: what the compiler emits for the host request-modification
//!   engine, serialized in the engine's dynamic rule format.
//! - [`ProfileEdit`] and [`ProfileDraft`]: edits and editor-form input, with
//!   the validation performed before a profile is saved.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod ids;
pub mod profile;
pub mod rule;

pub use error::{ProfileError, Result};
pub use ids::{HeaderId, ProfileId, RuleId};
pub use profile::{
    validate_url_regex, Header, Profile, ProfileDraft, ProfileEdit, ProfileList,
    DEFAULT_URL_REGEX,
};
pub use rule::{
    HeaderOperation, ModifyHeaderInfo, ResourceType, Rule, RuleAction, RuleActionType,
    RuleCondition,
};

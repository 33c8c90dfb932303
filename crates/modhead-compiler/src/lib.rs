//! # modhead-compiler
//!
//! Pure transform from an ordered [`ProfileList`](modhead_types::ProfileList)
//! to the rule batch a browser's request-modification engine installs.
//!
//! ## Rules of compilation
//!
//! - Disabled profiles, profiles with an empty URL regex and profiles without
//!   a single complete header emit nothing.
//! - Headers are grouped case-insensitively; the first spelling of a name is
//!   the one emitted.
//! - Names on the engine's append allow-list compile to `set` followed by
//!   `append`s. Other names are merged into one `set`, joined with `", "`
//!   (`"; "` for `Cookie`).
//! - Priority is `profiles.len() - index`: the first profile wins conflicts.
//! - Rule ids count from 1 across emitted rules only.
//!
//! ## Example
//!
//! ```rust
//! use modhead_compiler::compile;
//! use modhead_types::{Profile, ProfileList};
//!
//! let profiles = ProfileList::from(vec![
//!     Profile::new("Staging", "^https://staging\\.example\\.com/")
//!         .with_header("X-Env", "staging"),
//! ]);
//!
//! let rules = compile(&profiles);
//! assert_eq!(rules.len(), 1);
//! assert_eq!(rules[0].priority, 1);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod compiler;
pub mod strategy;

pub use compiler::{
    compile, compile_with_summary, group_headers, priority_for, skip_reason, CompileSummary,
    HeaderGroup, SkipReason, SkippedProfile,
};
pub use strategy::{
    header_strategy, is_natively_appendable, HeaderStrategy, COOKIE_SEPARATOR, LIST_SEPARATOR,
    NATIVE_APPENDABLE,
};

//! How repeated header names are emitted
//!
//! The host engine can append natively only for a closed set of standard
//! request headers. Everything else is merged into one SET by the compiler.

use serde::Serialize;

/// Request headers the host engine can APPEND to natively, lower-cased.
pub const NATIVE_APPENDABLE: [&str; 21] = [
    "accept",
    "accept-encoding",
    "accept-language",
    "access-control-request-headers",
    "cache-control",
    "connection",
    "content-language",
    "cookie",
    "forwarded",
    "if-match",
    "if-none-match",
    "keep-alive",
    "range",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "user-agent",
    "via",
    "want-digest",
    "x-forwarded-for",
];

/// Separator for merged values of most headers (RFC 9110 list syntax)
pub const LIST_SEPARATOR: &str = ", ";

/// Separator for merged `Cookie` values
pub const COOKIE_SEPARATOR: &str = "; ";

/// Emission strategy for one group of same-named headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// First value SET, every later value APPEND
    Native,
    /// One SET carrying all values joined by `separator`
    Merged { separator: &'static str },
}

/// Whether the host engine supports APPEND for this header name.
pub fn is_natively_appendable(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    NATIVE_APPENDABLE.contains(&lower.as_str())
}

/// Pick the emission strategy for a header name.
///
/// `Cookie` is always merged with `"; "` even though the engine lists it as
/// appendable, so a profile's cookies land in a single SET.
pub fn header_strategy(name: &str) -> HeaderStrategy {
    let lower = name.to_ascii_lowercase();
    if lower == "cookie" {
        HeaderStrategy::Merged {
            separator: COOKIE_SEPARATOR,
        }
    } else if NATIVE_APPENDABLE.contains(&lower.as_str()) {
        HeaderStrategy::Native
    } else {
        HeaderStrategy::Merged {
            separator: LIST_SEPARATOR,
        }
    }
}

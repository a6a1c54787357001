use thiserror::Error;

/// Failures the graph core can signal to callers.
///
/// Everything here is local and recoverable: the caller corrects the input
/// and retries. Enum mismatches and over-long text never reach this enum —
/// the sanitizer coerces and truncates those silently.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node was given a parent whose kind cannot contain it, was given a
    /// parent it requires but didn't get, or references a parent id that
    /// does not exist.
    #[error("invalid containment: {0}")]
    InvalidContainment(String),

    /// An import document is structurally unusable (not JSON, not an
    /// object, or missing the `nodes`/`edges` lists). The live graph is
    /// left untouched.
    #[error("malformed import: {0}")]
    MalformedImport(String),
}

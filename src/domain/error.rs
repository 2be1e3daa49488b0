use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the analysis core and its adapters.
///
/// Every variant is fatal for a run: there is no partial-output recovery.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("package `{0}` is not part of the loaded universe")]
    UnknownPackage(String),

    #[error("package name `{name}` is ambiguous: {candidates:?}")]
    AmbiguousPackage {
        name: String,
        candidates: Vec<String>,
    },

    #[error("invalid universe: {0}")]
    InvalidUniverse(String),

    #[error("type `{0}` is not declared in the loaded universe")]
    UnknownType(String),

    #[error("named type `{0}` resolves to itself")]
    CyclicUnderlying(String),

    #[error("invalid type expression `{input}`: {reason}")]
    InvalidTypeExpr { input: String, reason: String },

    /// A signature element the synthesizer cannot decompose into a forwarding call.
    #[error("cannot forward `{owner}.{method}`: {reason}")]
    Undecomposable {
        owner: String,
        method: String,
        reason: String,
    },

    /// Two root groups would produce the same generated name.
    #[error("`{first}` and `{second}` both generate `{name}`")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("refusing to overwrite non-generated file {}", .0.display())]
    ForeignFile(PathBuf),
}

pub type Result<T, E = ProxyError> = std::result::Result<T, E>;

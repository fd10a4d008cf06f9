//! 运行级错误：仅覆盖必须中止整次生成的情况。
//! 单个成员的问题一律走 `Diagnostic`，不会出现在这里。
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// A host type the generator relies on is absent from the compilation.
    #[error("can't find well-known type {0} in the compilation")]
    MissingWellKnownType(String),
    #[error("malformed compilation snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("duplicate type declaration: {0}")]
    DuplicateType(String),
}

pub type Result<T = ()> = std::result::Result<T, GenError>;

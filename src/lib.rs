pub mod additions;
pub mod attribute;
pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod generator;
pub mod member;
pub mod model;
pub mod resolve;
pub mod source;

// 驱动程序与测试常用的入口
pub mod prelude {
    pub use crate::config::GenConfig;
    pub use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
    pub use crate::emit::GeneratedSource;
    pub use crate::error::{GenError, Result};
    pub use crate::generator::{generate, generate_from_json, GenerationOutput};
    pub use crate::model::{Compilation, Snapshot};
}

pub use generator::{generate, generate_from_json};

mod models;
pub use models::*;
mod upload;
pub use upload::*;
mod service;
pub use service::*;

pub mod providers;
pub use providers::AnalyzerError;

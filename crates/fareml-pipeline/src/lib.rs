pub mod error;
pub mod config;
pub mod features;
pub mod pipeline;
pub mod models;

pub use error::{PipelineError, PipelineResult};
pub use config::*;
pub use features::*;
pub use pipeline::*;
pub use models::*;

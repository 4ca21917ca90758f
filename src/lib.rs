pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, input::InputResolver, ExportConfig};

pub use crate::core::{
    etl::{EtlEngine, RunSummary},
    pipeline::ExportPipeline,
    transformer::RecordTransformer,
};
pub use domain::model::{InputRecord, MalformedDatePolicy, OutputRecord, TransformResult};
pub use utils::error::{EtlError, Result};

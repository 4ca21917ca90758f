pub mod etl;
pub mod pipeline;
pub mod transformer;

pub use crate::domain::model::{
    InputRecord, MalformedDatePolicy, OutputRecord, TransformResult, OUTPUT_HEADER,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

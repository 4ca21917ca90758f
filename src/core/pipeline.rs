use crate::core::transformer::RecordTransformer;
use crate::core::{ConfigProvider, InputRecord, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;

/// Reads the export through `Storage`, reshapes it, and writes the import file.
pub struct ExportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    transformer: RecordTransformer,
}

impl<S: Storage, C: ConfigProvider> ExportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let transformer = RecordTransformer::new(config.date_policy());
        Self {
            storage,
            config,
            transformer,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ExportPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<InputRecord>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading source CSV from: {}", input_path);

        let bytes = self.storage.read_file(input_path).await?;
        let text = String::from_utf8_lossy(&bytes);
        if matches!(text, std::borrow::Cow::Owned(_)) {
            tracing::warn!("⚠️ {} is not valid UTF-8; invalid bytes were replaced", input_path);
        }

        self.transformer.parse(&text)
    }

    async fn transform(&self, data: Vec<InputRecord>) -> Result<TransformResult> {
        self.transformer.apply(data)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            result.accepted,
            result.csv_output.len(),
            output_path
        );
        self.storage
            .write_file(output_path, result.csv_output.as_bytes())
            .await?;

        Ok(output_path.to_string())
    }
}

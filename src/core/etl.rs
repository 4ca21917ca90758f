use crate::core::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub accepted: usize,
    pub rejected: usize,
    pub total: usize,
    pub skipped_dates: usize,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order. Nothing is written unless
    /// the first two phases succeed.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting export cleanup");

        tracing::info!("Extracting rows...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", records.len());

        tracing::info!("Transforming rows...");
        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "Accepted {} of {} rows ({} rejected)",
            result.accepted,
            result.total,
            result.rejected()
        );
        if result.skipped_dates > 0 {
            tracing::warn!(
                "⚠️ {} rows were dropped for an unreadable birthday",
                result.skipped_dates
            );
        }

        let mut summary = RunSummary {
            output_path: String::new(),
            accepted: result.accepted,
            rejected: result.rejected(),
            total: result.total,
            skipped_dates: result.skipped_dates,
        };

        tracing::info!("Loading output...");
        summary.output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", summary.output_path);

        Ok(summary)
    }
}

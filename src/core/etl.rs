use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting survey report run");

        // Extract
        let store = self.pipeline.extract().await?;
        tracing::info!("Loaded {} survey responses", store.len());

        // Transform
        let bundle = self.pipeline.transform(store).await?;
        tracing::info!(
            "Derived {} charts from {} responses",
            bundle.report.charts().len(),
            bundle.report.record_count
        );
        for chart in bundle.report.charts() {
            tracing::debug!(
                "{}: {} entries, total {}",
                chart.key,
                chart.entries.len(),
                chart.total()
            );
        }

        // Load
        let output_path = self.pipeline.load(bundle).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}

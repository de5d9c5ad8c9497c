use crate::core::aggregation::AggregationOptions;
use crate::core::record_store::RecordStore;
use crate::domain::model::ViewBundle;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// Zip archive name, or `None` to write the files uncompressed.
    fn bundle_name(&self) -> Option<&str>;
    fn aggregation_options(&self) -> AggregationOptions;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RecordStore>;
    async fn transform(&self, store: RecordStore) -> Result<ViewBundle>;
    async fn load(&self, bundle: ViewBundle) -> Result<String>;
}

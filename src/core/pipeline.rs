use crate::core::aggregation::AggregationEngine;
use crate::core::record_store::{RecordStore, SourceFormat};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ChartSeries, ViewBundle};
use crate::utils::error::{Result, SurveyError};
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const REPORT_FILE: &str = "dashboard.json";
pub const RESPONSES_FILE: &str = "responses.json";

/// Reads the survey export, derives every chart and writes the view bundle.
pub struct SurveyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SurveyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    /// Serialized files in bundle order: reports first, then one table per chart.
    fn render_files(&self, bundle: &ViewBundle) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();
        let formats = self.config.output_formats();

        if formats.iter().any(|f| f == "json") {
            files.push((
                REPORT_FILE.to_string(),
                serde_json::to_vec_pretty(&bundle.report)?,
            ));
            files.push((
                RESPONSES_FILE.to_string(),
                serde_json::to_vec_pretty(&bundle.responses)?,
            ));
        }

        for (extension, delimiter) in [("csv", b','), ("tsv", b'\t')] {
            if !formats.iter().any(|f| f == extension) {
                continue;
            }
            for chart in bundle.report.charts() {
                files.push((
                    format!("{}.{}", chart.key, extension),
                    chart_table(chart, delimiter)?,
                ));
            }
        }

        Ok(files)
    }
}

fn chart_table(chart: &ChartSeries, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    // explicit header so empty charts still get one
    writer.write_record(["name", "value", "color"])?;
    for slice in &chart.entries {
        writer.serialize(slice)?;
    }

    writer
        .into_inner()
        .map_err(|e| SurveyError::IoError(e.into_error()))
}

fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SurveyPipeline<S, C> {
    async fn extract(&self) -> Result<RecordStore> {
        let source = self.config.source_path();
        let format = SourceFormat::from_path(source)?;

        tracing::debug!("Reading {:?} survey source: {}", format, source);
        let bytes = self.storage.read_file(source).await?;
        let store = RecordStore::from_bytes(&bytes, format)?;

        if store.is_empty() {
            tracing::warn!("Survey source {} has no responses", source);
        }
        Ok(store)
    }

    async fn transform(&self, store: RecordStore) -> Result<ViewBundle> {
        let engine = AggregationEngine::new(self.config.aggregation_options());
        tracing::debug!("Aggregation options: {:?}", engine.options());

        let report = engine.summarize(&store)?;
        let responses = store.response_views();

        Ok(ViewBundle { report, responses })
    }

    async fn load(&self, bundle: ViewBundle) -> Result<String> {
        let files = self.render_files(&bundle)?;

        match self.config.bundle_name() {
            Some(bundle_name) => {
                tracing::debug!("Creating ZIP bundle with {} files", files.len());
                let zip_data = zip_files(&files)?;
                let output_path = self.output_file(bundle_name);

                tracing::debug!("Writing ZIP bundle ({} bytes) to {}", zip_data.len(), output_path);
                self.storage.write_file(&output_path, &zip_data).await?;
                Ok(output_path)
            }
            None => {
                for (name, data) in &files {
                    let path = self.output_file(name);
                    tracing::debug!("Writing {} ({} bytes)", path, data.len());
                    self.storage.write_file(&path, data).await?;
                }
                Ok(self.config.output_path().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregation::{AggregationOptions, BrandPolicy, MissingFieldPolicy};
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SurveyError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        source_path: String,
        output_path: String,
        output_formats: Vec<String>,
        bundle_name: Option<String>,
        options: AggregationOptions,
    }

    impl MockConfig {
        fn new(source_path: &str) -> Self {
            Self {
                source_path: source_path.to_string(),
                output_path: "test_output".to_string(),
                output_formats: vec!["json".to_string(), "csv".to_string()],
                bundle_name: Some("dashboard_bundle.zip".to_string()),
                options: AggregationOptions::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source_path(&self) -> &str {
            &self.source_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn bundle_name(&self) -> Option<&str> {
            self.bundle_name.as_deref()
        }

        fn aggregation_options(&self) -> AggregationOptions {
            self.options
        }
    }

    const RESPONSES: &str = r#"[
        {"timestamp": "2024/10/01", "perfil": "Estudante", "designIdeal": "moderno e simples",
         "marcaCelular": "Samsung", "usaPCparaOfertas": "Sim", "funcionalidades": "busca, filtro"},
        {"timestamp": "2024/10/02", "perfil": "Estudante", "designIdeal": "Moderno",
         "marcaCelular": "Positivo", "usaPCparaOfertas": "não", "funcionalidades": "filtro"},
        {"timestamp": "2024/10/03", "perfil": "Professor",
         "marcaCelular": "samsung ", "usaPCparaOfertas": "talvez"}
    ]"#;

    async fn seeded_storage() -> MockStorage {
        let storage = MockStorage::default();
        storage.put_file("dados.json", RESPONSES.as_bytes()).await;
        storage
    }

    fn read_zip_entry(zip_bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[tokio::test]
    async fn test_extract_json_source() {
        let storage = seeded_storage().await;
        let pipeline = SurveyPipeline::new(storage, MockConfig::new("dados.json"));

        let store = pipeline.extract().await.unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.records()[2].perfil.as_deref(), Some("Professor"));
    }

    #[tokio::test]
    async fn test_extract_missing_source_is_io_error() {
        let pipeline = SurveyPipeline::new(MockStorage::default(), MockConfig::new("dados.json"));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SurveyError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_rejects_unknown_extension() {
        let pipeline = SurveyPipeline::new(MockStorage::default(), MockConfig::new("dados.xlsx"));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SurveyError::InvalidConfigValueError { .. }));
    }

    #[tokio::test]
    async fn test_transform_builds_report_and_responses() {
        let storage = seeded_storage().await;
        let pipeline = SurveyPipeline::new(storage, MockConfig::new("dados.json"));

        let store = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(store).await.unwrap();

        let report = &bundle.report;
        assert_eq!(report.record_count, 3);
        assert_eq!(report.profile.entries[0].name, "Estudante");
        assert_eq!(report.profile.entries[0].value, 2);
        assert_eq!(report.design_features.entries.len(), 1);
        assert_eq!(report.phone_brands.total(), 2);
        assert_eq!(report.pc_usage.entries.len(), 2);
        assert_eq!(report.functionalities.entries[0].name, "filtro");

        assert_eq!(bundle.responses.len(), 3);
        assert_eq!(bundle.responses[2].heading, "Registro 3 - Professor");
    }

    #[tokio::test]
    async fn test_transform_strict_mode_fails_on_missing_design() {
        let storage = seeded_storage().await;
        let mut config = MockConfig::new("dados.json");
        config.options.missing_fields = MissingFieldPolicy::FailFast;
        let pipeline = SurveyPipeline::new(storage, config);

        let store = pipeline.extract().await.unwrap();
        let err = pipeline.transform(store).await.unwrap_err();
        assert!(matches!(
            err,
            SurveyError::MissingRequiredField { record: 3, .. }
        ));
    }

    #[tokio::test]
    async fn test_transform_accept_all_brands() {
        let storage = seeded_storage().await;
        let mut config = MockConfig::new("dados.json");
        config.options.brand_policy = BrandPolicy::AcceptAll;
        let pipeline = SurveyPipeline::new(storage, config);

        let store = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(store).await.unwrap();

        let names: Vec<&str> = bundle
            .report
            .phone_brands
            .entries
            .iter()
            .map(|slice| slice.name.as_str())
            .collect();
        assert_eq!(names, vec!["samsung", "positivo"]);
    }

    #[tokio::test]
    async fn test_load_writes_zip_bundle() {
        let storage = seeded_storage().await;
        let pipeline = SurveyPipeline::new(storage.clone(), MockConfig::new("dados.json"));

        let store = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(store).await.unwrap();
        let output_path = pipeline.load(bundle).await.unwrap();

        assert_eq!(output_path, "test_output/dashboard_bundle.zip");

        let zip_bytes = storage.get_file(&output_path).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes.clone())).unwrap();
        assert_eq!(archive.len(), 7);

        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "dashboard.json",
                "designIdeal.csv",
                "funcionalidades.csv",
                "marcaCelular.csv",
                "perfil.csv",
                "responses.json",
                "usaPCparaOfertas.csv",
            ]
        );

        let perfil_csv = read_zip_entry(&zip_bytes, "perfil.csv");
        assert_eq!(
            perfil_csv,
            "name,value,color\nEstudante,2,#0088FE\nProfessor,1,#00C49F\n"
        );

        let report: serde_json::Value =
            serde_json::from_str(&read_zip_entry(&zip_bytes, "dashboard.json")).unwrap();
        assert_eq!(report["record_count"], 3);
        assert_eq!(report["pc_usage"]["entries"][1]["name"], "não");
    }

    #[tokio::test]
    async fn test_load_uncompressed_tsv() {
        let storage = seeded_storage().await;
        let mut config = MockConfig::new("dados.json");
        config.bundle_name = None;
        config.output_formats = vec!["tsv".to_string()];
        let pipeline = SurveyPipeline::new(storage.clone(), config);

        let store = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(store).await.unwrap();
        let output_path = pipeline.load(bundle).await.unwrap();

        assert_eq!(output_path, "test_output");
        assert_eq!(
            storage.file_names().await,
            vec![
                "dados.json",
                "test_output/designIdeal.tsv",
                "test_output/funcionalidades.tsv",
                "test_output/marcaCelular.tsv",
                "test_output/perfil.tsv",
                "test_output/usaPCparaOfertas.tsv",
            ]
        );

        let brands = storage
            .get_file("test_output/marcaCelular.tsv")
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(brands).unwrap(),
            "name\tvalue\tcolor\nsamsung\t2\t#0088FE\n"
        );
    }

    #[tokio::test]
    async fn test_empty_chart_keeps_header() {
        let storage = MockStorage::default();
        storage.put_file("vazio.json", b"[]").await;
        let mut config = MockConfig::new("vazio.json");
        config.bundle_name = None;
        config.output_formats = vec!["csv".to_string()];
        let pipeline = SurveyPipeline::new(storage.clone(), config);

        let store = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(store).await.unwrap();
        pipeline.load(bundle).await.unwrap();

        let table = storage.get_file("test_output/perfil.csv").await.unwrap();
        assert_eq!(String::from_utf8(table).unwrap(), "name,value,color\n");
    }
}

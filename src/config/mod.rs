pub mod local_storage;
pub mod toml_config;

pub const DEFAULT_BUNDLE_NAME: &str = "dashboard_bundle.zip";
pub const SOURCE_EXTENSIONS: &[&str] = &["json", "csv"];

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::{DEFAULT_BUNDLE_NAME, SOURCE_EXTENSIONS};
    use crate::core::aggregation::{AggregationOptions, BrandPolicy, MissingFieldPolicy};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "survey-etl")]
    #[command(about = "Aggregate survey responses into dashboard charts")]
    pub struct CliConfig {
        /// Survey export to read (.json or .csv)
        #[arg(long, env = "SURVEY_SOURCE", default_value = "data/dados.json")]
        pub source: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_value = "json,csv")]
        pub output_formats: Vec<String>,

        #[arg(long, default_value = DEFAULT_BUNDLE_NAME)]
        pub bundle_name: String,

        #[arg(long, help = "Write loose files instead of a zip bundle")]
        pub no_zip: bool,

        #[arg(long, value_enum, default_value_t = BrandPolicy::KnownBrands)]
        pub brand_policy: BrandPolicy,

        #[arg(long, help = "Fail when a response lacks a required field")]
        pub strict: bool,

        #[arg(long, default_value = "2")]
        pub min_design_mentions: usize,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn source_path(&self) -> &str {
            &self.source
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn bundle_name(&self) -> Option<&str> {
            (!self.no_zip).then_some(self.bundle_name.as_str())
        }

        fn aggregation_options(&self) -> AggregationOptions {
            AggregationOptions {
                brand_policy: self.brand_policy,
                missing_fields: if self.strict {
                    MissingFieldPolicy::FailFast
                } else {
                    MissingFieldPolicy::Skip
                },
                design_min_mentions: self.min_design_mentions,
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_file_extensions(
                "source",
                std::slice::from_ref(&self.source),
                SOURCE_EXTENSIONS,
            )?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_output_formats("output_formats", &self.output_formats)?;
            validation::validate_positive_number("min_design_mentions", self.min_design_mentions, 1)?;
            if !self.no_zip {
                validation::validate_non_empty_string("bundle_name", &self.bundle_name)?;
            }
            Ok(())
        }
    }

}

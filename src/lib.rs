pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{local_storage::LocalStorage, toml_config::TomlConfig};
pub use self::core::{
    aggregation::{
        derive_design_feature_frequency, derive_functionality_frequency,
        derive_pc_usage_distribution, derive_phone_brand_distribution,
        derive_profile_distribution, AggregationEngine, AggregationOptions, BrandPolicy,
        MissingFieldPolicy,
    },
    etl::EtlEngine,
    pipeline::SurveyPipeline,
    record_store::{RecordStore, SourceFormat},
};
pub use domain::model::{DashboardReport, FrequencyEntry, Record};
pub use utils::error::{Result, SurveyError};

pub mod aggregation;
pub mod etl;
pub mod pipeline;
pub mod presentation;
pub mod record_store;

pub use crate::domain::model::{FrequencyEntry, Record, ViewBundle};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

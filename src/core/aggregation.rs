//! Frequency derivations over the survey responses.
//!
//! Each derivation re-scans the full record slice and shares nothing with the
//! others. Tables keep the order in which a name was first seen, except the
//! functionality table, which is ranked by count.

use crate::core::presentation::{
    self, BRAND_KEY, DESIGN_KEY, FUNCTIONALITY_KEY, PC_USAGE_KEY, PROFILE_KEY,
};
use crate::core::record_store::RecordStore;
use crate::domain::model::{DashboardReport, FrequencyEntry, Record};
use crate::utils::error::{Result, SurveyError};
use chrono::{SubsecRound, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Words never counted as design features.
pub const STOP_WORDS: &[&str] = &[
    "nenhum", "chame", "e", "ou", "mas", "a", "o", "de", "da", "do", "em", "para", "com", "sem",
    "por", "que",
];

pub const KNOWN_BRANDS: &[&str] = &[
    "samsung", "iphone", "xiaomi", "motorola", "lg", "nokia", "asus", "sony", "huawei", "google",
];

pub const PC_USAGE_ANSWERS: &[&str] = &["sim", "não"];

pub const DEFAULT_DESIGN_MIN_MENTIONS: usize = 2;

static STANDALONE_E: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\se\s").expect("standalone conjunction pattern"));
static TOKEN_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("token separator pattern"));

/// Which phone brands are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum BrandPolicy {
    /// Only brands in [`KNOWN_BRANDS`].
    #[default]
    KnownBrands,
    /// Any non-empty brand.
    AcceptAll,
}

/// What a derivation does with a record lacking the field it requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    #[default]
    Skip,
    FailFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationOptions {
    pub brand_policy: BrandPolicy,
    pub missing_fields: MissingFieldPolicy,
    pub design_min_mentions: usize,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            brand_policy: BrandPolicy::default(),
            missing_fields: MissingFieldPolicy::default(),
            design_min_mentions: DEFAULT_DESIGN_MIN_MENTIONS,
        }
    }
}

/// Insertion-ordered counter. Empty keys are never recorded.
#[derive(Debug, Default)]
struct FrequencyCounter {
    slots: HashMap<String, usize>,
    entries: Vec<FrequencyEntry>,
}

impl FrequencyCounter {
    fn increment(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        match self.slots.get(key) {
            Some(&slot) => self.entries[slot].value += 1,
            None => {
                self.slots.insert(key.to_string(), self.entries.len());
                self.entries.push(FrequencyEntry::new(key, 1));
            }
        }
    }

    fn into_entries(self) -> Vec<FrequencyEntry> {
        self.entries
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Split a free-text design answer into countable feature tokens.
pub fn design_tokens(text: &str) -> Vec<String> {
    let separated = STANDALONE_E.replace_all(text, ",");
    TOKEN_SEPARATORS
        .split(&separated)
        .map(normalize)
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

/// Split a comma-separated functionality answer into normalized names.
pub fn functionality_tokens(text: &str) -> Vec<String> {
    text.split(',')
        .map(normalize)
        .filter(|token| !token.is_empty())
        .collect()
}

fn count_profiles(records: &[Record]) -> Vec<FrequencyEntry> {
    let mut counter = FrequencyCounter::default();
    for (index, record) in records.iter().enumerate() {
        match record.perfil.as_deref().filter(|perfil| !perfil.is_empty()) {
            Some(perfil) => counter.increment(perfil),
            None => tracing::debug!("Record {} has no perfil, skipped", index + 1),
        }
    }
    counter.into_entries()
}

fn count_design_features(records: &[Record], min_mentions: usize) -> Vec<FrequencyEntry> {
    let mut counter = FrequencyCounter::default();
    for (index, record) in records.iter().enumerate() {
        let Some(text) = record.design_ideal.as_deref() else {
            tracing::debug!("Record {} has no designIdeal, skipped", index + 1);
            continue;
        };
        for token in design_tokens(text) {
            counter.increment(&token);
        }
    }

    counter
        .into_entries()
        .into_iter()
        .filter(|entry| entry.value >= min_mentions)
        .collect()
}

fn count_brands(records: &[Record], policy: BrandPolicy) -> Vec<FrequencyEntry> {
    let mut counter = FrequencyCounter::default();
    for brand in records
        .iter()
        .filter_map(|record| record.marca_celular.as_deref())
        .map(normalize)
    {
        let accepted = match policy {
            BrandPolicy::KnownBrands => KNOWN_BRANDS.contains(&brand.as_str()),
            BrandPolicy::AcceptAll => true,
        };
        if accepted {
            counter.increment(&brand);
        }
    }
    counter.into_entries()
}

fn count_pc_usage(records: &[Record]) -> Vec<FrequencyEntry> {
    let mut counter = FrequencyCounter::default();
    for answer in records
        .iter()
        .filter_map(|record| record.usa_pc_para_ofertas.as_deref())
        .map(normalize)
    {
        if PC_USAGE_ANSWERS.contains(&answer.as_str()) {
            counter.increment(&answer);
        }
    }
    counter.into_entries()
}

fn count_functionalities(records: &[Record]) -> Vec<FrequencyEntry> {
    let mut counter = FrequencyCounter::default();
    for text in records
        .iter()
        .filter_map(|record| record.funcionalidades.as_deref())
    {
        for token in functionality_tokens(text) {
            counter.increment(&token);
        }
    }

    let mut entries = counter.into_entries();
    // sort_by is stable: ties stay in first-seen order
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

/// Respondent profiles, by exact `perfil` value.
pub fn derive_profile_distribution(records: &[Record]) -> Vec<FrequencyEntry> {
    count_profiles(records)
}

/// Design feature tokens mentioned by at least two responses.
pub fn derive_design_feature_frequency(records: &[Record]) -> Vec<FrequencyEntry> {
    count_design_features(records, DEFAULT_DESIGN_MIN_MENTIONS)
}

/// Phone brands restricted to [`KNOWN_BRANDS`].
pub fn derive_phone_brand_distribution(records: &[Record]) -> Vec<FrequencyEntry> {
    count_brands(records, BrandPolicy::KnownBrands)
}

pub fn derive_pc_usage_distribution(records: &[Record]) -> Vec<FrequencyEntry> {
    count_pc_usage(records)
}

/// Functionality names ranked by count, descending.
pub fn derive_functionality_frequency(records: &[Record]) -> Vec<FrequencyEntry> {
    count_functionalities(records)
}

/// Runs the derivations under a fixed set of [`AggregationOptions`].
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    options: AggregationOptions,
}

impl AggregationEngine {
    pub fn new(options: AggregationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AggregationOptions {
        &self.options
    }

    fn require_field<F>(&self, records: &[Record], field: &str, accessor: F) -> Result<()>
    where
        F: Fn(&Record) -> Option<&str>,
    {
        if self.options.missing_fields == MissingFieldPolicy::Skip {
            return Ok(());
        }
        // an empty answer counts as missing, whatever the source format
        match records
            .iter()
            .position(|record| accessor(record).map_or(true, str::is_empty))
        {
            Some(index) => Err(SurveyError::MissingRequiredField {
                field: field.to_string(),
                record: index + 1,
            }),
            None => Ok(()),
        }
    }

    pub fn profile_distribution(&self, records: &[Record]) -> Result<Vec<FrequencyEntry>> {
        self.require_field(records, PROFILE_KEY, |record| record.perfil.as_deref())?;
        Ok(count_profiles(records))
    }

    pub fn design_feature_frequency(&self, records: &[Record]) -> Result<Vec<FrequencyEntry>> {
        self.require_field(records, DESIGN_KEY, |record| record.design_ideal.as_deref())?;
        Ok(count_design_features(
            records,
            self.options.design_min_mentions,
        ))
    }

    pub fn phone_brand_distribution(&self, records: &[Record]) -> Vec<FrequencyEntry> {
        count_brands(records, self.options.brand_policy)
    }

    pub fn pc_usage_distribution(&self, records: &[Record]) -> Vec<FrequencyEntry> {
        count_pc_usage(records)
    }

    pub fn functionality_frequency(&self, records: &[Record]) -> Vec<FrequencyEntry> {
        count_functionalities(records)
    }

    /// All five tables, colored and titled for the dashboard.
    pub fn summarize(&self, store: &RecordStore) -> Result<DashboardReport> {
        let records = store.records();

        let profile = self.profile_distribution(records)?;
        tracing::debug!("Profile distribution: {} entries", profile.len());
        let design_features = self.design_feature_frequency(records)?;
        tracing::debug!("Design features: {} entries", design_features.len());
        let phone_brands = self.phone_brand_distribution(records);
        tracing::debug!(
            "Phone brands ({:?}): {} entries",
            self.options.brand_policy,
            phone_brands.len()
        );
        let pc_usage = self.pc_usage_distribution(records);
        tracing::debug!("PC usage: {} entries", pc_usage.len());
        let functionalities = self.functionality_frequency(records);
        tracing::debug!("Functionalities: {} entries", functionalities.len());

        Ok(DashboardReport {
            title: presentation::DASHBOARD_TITLE.to_string(),
            generated_at: Utc::now().trunc_subsecs(0),
            record_count: store.len(),
            profile: presentation::chart(PROFILE_KEY, profile),
            design_features: presentation::chart(DESIGN_KEY, design_features),
            phone_brands: presentation::chart(BRAND_KEY, phone_brands),
            pc_usage: presentation::chart(PC_USAGE_KEY, pc_usage),
            functionalities: presentation::chart(FUNCTIONALITY_KEY, functionalities),
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One survey response as exported by the questionnaire form.
///
/// Every field is optional; derivations decide which ones they require.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perfil: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_ideal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps_referencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marca_celular: Option<String>,
    #[serde(
        rename = "usaPCparaOfertas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub usa_pc_para_ofertas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funcionalidades: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requisitos_excluir: Option<String>,
}

impl Record {
    /// Answered fields as `(source key, value)` pairs, in declaration order.
    /// Empty answers are left out, as a CSV export leaves them absent.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("timestamp", &self.timestamp),
            ("perfil", &self.perfil),
            ("designIdeal", &self.design_ideal),
            ("appsReferencia", &self.apps_referencia),
            ("marcaCelular", &self.marca_celular),
            ("usaPCparaOfertas", &self.usa_pc_para_ofertas),
            ("funcionalidades", &self.funcionalidades),
            ("requisitosExcluir", &self.requisitos_excluir),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}

/// One row of an aggregate table. `value` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub name: String,
    pub value: usize,
}

impl FrequencyEntry {
    pub fn new(name: impl Into<String>, value: usize) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
    pub color: String,
}

/// A derivation's table ready for charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub key: String,
    pub title: String,
    pub entries: Vec<ChartSlice>,
}

impl ChartSeries {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|slice| slice.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledField {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// One numbered accordion entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseView {
    pub number: usize,
    pub heading: String,
    pub fields: Vec<LabeledField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub profile: ChartSeries,
    pub design_features: ChartSeries,
    pub phone_brands: ChartSeries,
    pub pc_usage: ChartSeries,
    pub functionalities: ChartSeries,
}

impl DashboardReport {
    pub fn charts(&self) -> [&ChartSeries; 5] {
        [
            &self.profile,
            &self.design_features,
            &self.phone_brands,
            &self.pc_usage,
            &self.functionalities,
        ]
    }
}

/// Everything the load step writes out.
#[derive(Debug, Clone)]
pub struct ViewBundle {
    pub report: DashboardReport,
    pub responses: Vec<ResponseView>,
}

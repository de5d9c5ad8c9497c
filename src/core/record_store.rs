use crate::core::presentation;
use crate::domain::model::{LabeledField, Record, ResponseView};
use crate::utils::error::{Result, SurveyError};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(SurveyError::InvalidConfigValueError {
                field: "source".to_string(),
                value: path.display().to_string(),
                reason: "Survey source must be a .json or .csv file".to_string(),
            }),
        }
    }
}

/// The immutable, source-ordered set of responses for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn from_bytes(bytes: &[u8], format: SourceFormat) -> Result<Self> {
        match format {
            SourceFormat::Json => Self::from_json_slice(bytes),
            SourceFormat::Csv => Self::from_csv_reader(bytes),
        }
    }

    /// Parse a JSON array of response objects.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let records: Vec<Record> = serde_json::from_slice(bytes)
            .map_err(|e| SurveyError::malformed(format!("invalid JSON responses: {}", e)))?;

        tracing::debug!("Parsed {} responses from JSON source", records.len());
        Ok(Self::new(records))
    }

    /// Parse a headered CSV export whose column names match the JSON keys.
    /// Empty cells become absent fields.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<Record>().enumerate() {
            let record = row.map_err(|e| {
                SurveyError::malformed(format!("invalid CSV row {}: {}", index + 1, e))
            })?;
            records.push(record);
        }

        tracing::debug!("Parsed {} responses from CSV source", records.len());
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Numbered, labeled entries in source order.
    pub fn response_views(&self) -> Vec<ResponseView> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let number = index + 1;
                let heading = match record.perfil.as_deref().filter(|p| !p.is_empty()) {
                    Some(perfil) => format!("Registro {} - {}", number, perfil),
                    None => format!("Registro {}", number),
                };
                let fields = record
                    .fields()
                    .into_iter()
                    .map(|(key, value)| LabeledField {
                        key: key.to_string(),
                        label: presentation::field_label(key).to_string(),
                        value: value.to_string(),
                    })
                    .collect();

                ResponseView {
                    number,
                    heading,
                    fields,
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

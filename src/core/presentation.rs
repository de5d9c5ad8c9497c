//! Display labels, chart titles and the segment palette.

use crate::domain::model::{ChartSeries, ChartSlice, FrequencyEntry};

pub const DASHBOARD_TITLE: &str = "Dashboard - Formulário de Levantamento de Requisitos";

pub const PALETTE: [&str; 6] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#FF6384", "#36A2EB",
];

pub const PROFILE_KEY: &str = "perfil";
pub const DESIGN_KEY: &str = "designIdeal";
pub const BRAND_KEY: &str = "marcaCelular";
pub const PC_USAGE_KEY: &str = "usaPCparaOfertas";
pub const FUNCTIONALITY_KEY: &str = "funcionalidades";

/// Label for a record field, falling back to the key itself.
pub fn field_label(key: &str) -> &str {
    match key {
        "timestamp" => "Data e Hora",
        "perfil" => "Perfil",
        "funcionalidades" => "Funcionalidades",
        "designIdeal" => "Quais funcionalidades você considera essenciais?",
        "appsReferencia" => "Apps de Referência",
        "marcaCelular" => "Marca do Celular",
        "usaPCparaOfertas" => "Usa PC para Ofertas",
        "requisitosExcluir" => "Requisitos a Excluir",
        other => other,
    }
}

pub fn chart_title(key: &str) -> &str {
    match key {
        PROFILE_KEY => "Você é?",
        DESIGN_KEY => "Preferências de Design",
        BRAND_KEY => "Distribuição por Marca de Celular",
        PC_USAGE_KEY => "Pessoas que usam PC para procurar ofertas",
        FUNCTIONALITY_KEY => "Distribuição de Funcionalidades",
        other => field_label(other),
    }
}

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn colorize(entries: Vec<FrequencyEntry>) -> Vec<ChartSlice> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| ChartSlice {
            name: entry.name,
            value: entry.value,
            color: color_for(index).to_string(),
        })
        .collect()
}

pub fn chart(key: &str, entries: Vec<FrequencyEntry>) -> ChartSeries {
    ChartSeries {
        key: key.to_string(),
        title: chart_title(key).to_string(),
        entries: colorize(entries),
    }
}

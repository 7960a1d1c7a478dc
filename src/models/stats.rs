//! Statistics and catalog payloads served to the dashboard.

use serde::Serialize;

use super::{Manager, Period, Source, Status};

/// Figures derived from a filtered lead selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub new_leads: usize,
    pub won_value: f64,
    /// Whole percentage, rounded half-up.
    pub conversion_rate: u32,
}

/// Filtered stats plus the global KPI total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(flatten)]
    pub stats: LeadStats,
    pub kpi_total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub source: Source,
    pub kpi_weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledStatus {
    pub status: Status,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledPeriod {
    pub period: Period,
    pub label: &'static str,
}

/// The closed domain sets with their display labels.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub managers: Vec<Manager>,
    pub sources: Vec<SourceEntry>,
    pub statuses: Vec<LabeledStatus>,
    pub periods: Vec<LabeledPeriod>,
}

impl Catalog {
    pub fn build() -> Self {
        Self {
            managers: Manager::ALL.to_vec(),
            sources: Source::ALL
                .into_iter()
                .map(|source| SourceEntry {
                    source,
                    kpi_weight: source.kpi_weight(),
                })
                .collect(),
            statuses: Status::ALL
                .into_iter()
                .map(|status| LabeledStatus {
                    status,
                    label: status.label(),
                })
                .collect(),
            periods: Period::ALL
                .into_iter()
                .map(|period| LabeledPeriod {
                    period,
                    label: period.label(),
                })
                .collect(),
        }
    }
}

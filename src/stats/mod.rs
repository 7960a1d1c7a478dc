//! Period/manager filtering and dashboard statistics.
//!
//! Everything here is pure and synchronous; it works on leads already loaded
//! by the repository.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{Dashboard, Lead, LeadBook, LeadStats, ManagerFilter, Period, Status};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whether `lead` falls inside `period` as seen from `now`.
///
/// Elapsed time is plain milliseconds over 24-hour days, not calendar
/// weeks or months. Leads dated after `now` match every period.
pub fn in_period(lead: &Lead, period: Period, now: DateTime<Utc>) -> bool {
    match period.threshold_days() {
        None => true,
        Some(days) => {
            let elapsed = now.signed_duration_since(lead.created_at).num_milliseconds();
            elapsed <= days * MILLIS_PER_DAY
        }
    }
}

pub fn filter_by_period<'a, I>(leads: I, period: Period, now: DateTime<Utc>) -> Vec<&'a Lead>
where
    I: IntoIterator<Item = &'a Lead>,
{
    leads
        .into_iter()
        .filter(|lead| in_period(lead, period, now))
        .collect()
}

pub fn filter_by_manager<'a, I>(leads: I, manager: ManagerFilter) -> Vec<&'a Lead>
where
    I: IntoIterator<Item = &'a Lead>,
{
    leads
        .into_iter()
        .filter(|lead| manager.matches(lead.manager))
        .collect()
}

/// Both selectors at once. Order of application does not matter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LeadFilter {
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub manager: ManagerFilter,
}

impl LeadFilter {
    pub fn apply<'a, I>(&self, leads: I, now: DateTime<Utc>) -> Vec<&'a Lead>
    where
        I: IntoIterator<Item = &'a Lead>,
    {
        filter_by_manager(filter_by_period(leads, self.period, now), self.manager)
    }
}

/// Count, won value and conversion rate of a selection. Empty input yields zeros.
pub fn compute_stats<'a, I>(leads: I) -> LeadStats
where
    I: IntoIterator<Item = &'a Lead>,
{
    let mut total: u64 = 0;
    let mut won: u64 = 0;
    let mut won_value = 0.0;

    for lead in leads {
        total += 1;
        if lead.status == Status::Won {
            won += 1;
            won_value += lead.value;
        }
    }

    LeadStats {
        new_leads: total as usize,
        won_value,
        conversion_rate: conversion_rate(won, total),
    }
}

/// `round(100 * won / total)` with half-up rounding, in integers.
fn conversion_rate(won: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * won + total) / (2 * total)) as u32
}

/// Sum of KPI over the whole collection; filters never apply.
pub fn compute_kpi_total(book: &LeadBook) -> f64 {
    book.iter().map(|lead| lead.kpi).sum()
}

/// Filtered stats plus the global KPI total.
pub fn dashboard(book: &LeadBook, filter: LeadFilter, now: DateTime<Utc>) -> Dashboard {
    Dashboard {
        stats: compute_stats(filter.apply(book.iter(), now)),
        kpi_total: compute_kpi_total(book),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Manager, NewLead, Source};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn lead(
        id: &str,
        age: Duration,
        manager: Manager,
        source: Source,
        status: Status,
        value: f64,
    ) -> Lead {
        NewLead {
            name: id.to_string(),
            email: String::new(),
            phone: String::new(),
            manager,
            source,
            status,
            value,
            source_description: String::new(),
        }
        .into_lead(id.to_string(), now() - age)
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead("w1", Duration::days(1), Manager::Sarkarov, Source::TelegramAi, Status::Won, 100.0),
            lead("w2", Duration::days(10), Manager::Namazov, Source::Website, Status::Won, 50.0),
            lead("l1", Duration::days(45), Manager::Sarkarov, Source::CallCenter, Status::Lost, 0.0),
            lead("n1", Duration::days(200), Manager::Utebaev, Source::Other, Status::New, 0.0),
        ]
    }

    fn ids(leads: &[&Lead]) -> Vec<String> {
        leads.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn test_all_period_keeps_everything() {
        let mut leads = sample();
        leads.push(lead("ancient", Duration::days(10_000), Manager::Gavrilov, Source::Other, Status::New, 0.0));
        leads.push(lead("future", Duration::days(-3), Manager::Gavrilov, Source::Other, Status::New, 0.0));

        assert_eq!(filter_by_period(&leads, Period::All, now()).len(), leads.len());
    }

    #[test]
    fn test_ten_day_old_lead_in_month_not_week() {
        let leads = vec![lead("x", Duration::days(10), Manager::Gavrilov, Source::YandexDirect, Status::New, 0.0)];

        assert_eq!(filter_by_period(&leads, Period::Month, now()).len(), 1);
        assert!(filter_by_period(&leads, Period::Week, now()).is_empty());
    }

    #[test]
    fn test_period_boundary_is_inclusive() {
        let exact = lead("edge", Duration::days(7), Manager::Gavrilov, Source::Other, Status::New, 0.0);
        let past = lead("past", Duration::days(7) + Duration::milliseconds(1), Manager::Gavrilov, Source::Other, Status::New, 0.0);

        assert!(in_period(&exact, Period::Week, now()));
        assert!(!in_period(&past, Period::Week, now()));
    }

    #[test]
    fn test_period_windows() {
        let leads = sample();
        assert_eq!(ids(&filter_by_period(&leads, Period::Week, now())), vec!["w1"]);
        assert_eq!(ids(&filter_by_period(&leads, Period::Month, now())), vec!["w1", "w2"]);
        assert_eq!(ids(&filter_by_period(&leads, Period::Quarter, now())), vec!["w1", "w2", "l1"]);
        assert_eq!(filter_by_period(&leads, Period::Year, now()).len(), 4);
    }

    #[test]
    fn test_manager_filter() {
        let leads = sample();
        assert_eq!(filter_by_manager(&leads, ManagerFilter::All).len(), 4);
        assert_eq!(
            ids(&filter_by_manager(&leads, ManagerFilter::Only(Manager::Sarkarov))),
            vec!["w1", "l1"]
        );
        assert!(filter_by_manager(&leads, ManagerFilter::Only(Manager::Gavrilov)).is_empty());
    }

    #[test]
    fn test_filters_commute() {
        let leads = sample();
        let manager = ManagerFilter::Only(Manager::Sarkarov);

        let a = filter_by_manager(filter_by_period(&leads, Period::Quarter, now()), manager);
        let b = filter_by_period(filter_by_manager(&leads, manager), Period::Quarter, now());
        let combined = LeadFilter { period: Period::Quarter, manager }.apply(&leads, now());

        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&a), ids(&combined));
        assert_eq!(ids(&a), vec!["w1", "l1"]);
    }

    #[test]
    fn test_stats_of_empty_selection() {
        let stats = compute_stats(&[] as &[Lead]);
        assert_eq!(
            stats,
            LeadStats {
                new_leads: 0,
                won_value: 0.0,
                conversion_rate: 0
            }
        );
    }

    #[test]
    fn test_stats_example() {
        let stats = compute_stats(&sample());
        assert_eq!(stats.new_leads, 4);
        assert_eq!(stats.won_value, 150.0);
        assert_eq!(stats.conversion_rate, 50);
    }

    #[test]
    fn test_conversion_rate_rounds_half_up() {
        assert_eq!(conversion_rate(1, 3), 33);
        assert_eq!(conversion_rate(2, 3), 67);
        assert_eq!(conversion_rate(1, 8), 13); // 12.5
        assert_eq!(conversion_rate(1, 200), 1); // 0.5
        assert_eq!(conversion_rate(0, 5), 0);
        assert_eq!(conversion_rate(5, 5), 100);
    }

    #[test]
    fn test_kpi_total_ignores_filters() {
        let book = LeadBook::new(sample());
        // 1.0 + 0.5 + 1.0 + 0.0
        assert_eq!(compute_kpi_total(&book), 2.5);

        let narrow = LeadFilter {
            period: Period::Week,
            manager: ManagerFilter::Only(Manager::Namazov),
        };
        let view = dashboard(&book, narrow, now());
        assert_eq!(view.stats.new_leads, 0);
        assert_eq!(view.kpi_total, 2.5);

        let wide = dashboard(&book, LeadFilter::default(), now());
        assert_eq!(wide.kpi_total, view.kpi_total);
        assert_eq!(wide.stats.new_leads, 4);
    }

    #[test]
    fn test_dashboard_serializes_flat() {
        let book = LeadBook::new(sample());
        let json = serde_json::to_value(dashboard(&book, LeadFilter::default(), now())).unwrap();
        assert_eq!(json["newLeads"], 4);
        assert_eq!(json["wonValue"], 150.0);
        assert_eq!(json["conversionRate"], 50);
        assert_eq!(json["kpiTotal"], 2.5);
    }
}

//! Chart-ready series built from expense entries.
//!
//! The overview groups entries per date and per event (an entry's
//! description) into stacked bar series and pie slices. Drawing them is left
//! to the renderer.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::expense::{AggregatedResult, ExpenseEntry};

/// How many dates the initial chart viewport shows
const VISIBLE_DATES: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSeries {
    pub name: String,
    /// One value per date of the owning `OverviewSeries`
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewSeries {
    pub dates: Vec<NaiveDate>,
    /// `MM/DD` label per date
    pub axis_labels: Vec<String>,
    pub events: Vec<String>,
    pub series: Vec<EventSeries>,
    pub slices: Vec<PieSlice>,
    pub total: f64,
    /// Left edge of the initial viewport, in percent of the date axis
    pub zoom_start_percent: u32,
}

impl OverviewSeries {
    /// Group `entries` per date and event.
    ///
    /// `event_filter = None` keeps every entry; otherwise only entries whose
    /// description is listed are kept. Dates and events appear in the order
    /// they are first met, so date-sorted entries give an ascending axis.
    pub fn build(entries: &[ExpenseEntry], event_filter: Option<&[String]>) -> Self {
        let filtered: Vec<&ExpenseEntry> = entries
            .iter()
            .filter(|entry| event_filter.map_or(true, |events| events.contains(&entry.description)))
            .collect();

        let mut dates = Vec::new();
        let mut date_index = HashMap::new();
        let mut events = Vec::new();
        let mut event_index = HashMap::new();
        for entry in &filtered {
            date_index.entry(entry.date).or_insert_with(|| {
                dates.push(entry.date);
                dates.len() - 1
            });
            event_index.entry(entry.description.as_str()).or_insert_with(|| {
                events.push(entry.description.clone());
                events.len() - 1
            });
        }

        let mut values = vec![vec![0.0; dates.len()]; events.len()];
        for entry in &filtered {
            values[event_index[entry.description.as_str()]][date_index[&entry.date]] += entry.amount;
        }

        let series: Vec<EventSeries> = events
            .iter()
            .zip(values)
            .map(|(name, values)| EventSeries {
                name: name.clone(),
                values,
            })
            .collect();
        let slices = series
            .iter()
            .map(|serie| PieSlice {
                name: serie.name.clone(),
                value: serie.values.iter().sum(),
            })
            .collect();

        Self {
            axis_labels: dates.iter().map(|date| date.format("%m/%d").to_string()).collect(),
            zoom_start_percent: zoom_start_percent(dates.len()),
            total: filtered.iter().map(|entry| entry.amount).sum(),
            dates,
            events,
            series,
            slices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// JSON handed to the chart renderer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn zoom_start_percent(date_count: usize) -> u32 {
    if date_count == 0 {
        return 0;
    }
    let start = 100.0 - 100.0 * (VISIBLE_DATES as f64 / date_count as f64);
    start.floor().clamp(0.0, 100.0) as u32
}

/// Distinct event names in first-seen order
pub fn all_events(entries: &[ExpenseEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.description.as_str()))
        .map(|entry| entry.description.clone())
        .collect()
}

/// Entries of one category, grouped by primary tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub entries: Vec<ExpenseEntry>,
}

/// One breakdown per category that is the primary tag of at least one entry
pub fn category_breakdowns(result: &AggregatedResult) -> Vec<CategoryBreakdown> {
    result
        .categories()
        .iter()
        .map(|category| CategoryBreakdown {
            category: category.clone(),
            entries: result.entries_in_category(category),
        })
        .filter(|breakdown| !breakdown.entries.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, text: &str, tags: &[&str]) -> ExpenseEntry {
        ExpenseEntry::new(
            NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
            text,
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn sample() -> Vec<ExpenseEntry> {
        vec![
            entry("2023-03-01", "3 Coffee", &["Food"]),
            entry("2023-03-01", "2 Bus", &["Transport"]),
            entry("2023-03-01", "4.5 Coffee", &["Food"]),
            entry("2023-03-02", "10 Lunch", &["Food", "Work"]),
            entry("2023-03-03", "2 Bus", &["Transport"]),
        ]
    }

    #[test]
    fn test_overview_stacks_amounts_per_date_and_event() {
        let overview = OverviewSeries::build(&sample(), None);

        assert_eq!(overview.axis_labels, vec!["03/01", "03/02", "03/03"]);
        assert_eq!(overview.events, vec!["Coffee", "Bus", "Lunch"]);
        assert_eq!(
            overview.series,
            vec![
                EventSeries { name: "Coffee".to_string(), values: vec![7.5, 0.0, 0.0] },
                EventSeries { name: "Bus".to_string(), values: vec![2.0, 0.0, 2.0] },
                EventSeries { name: "Lunch".to_string(), values: vec![0.0, 10.0, 0.0] },
            ]
        );
        assert_eq!(
            overview.slices,
            vec![
                PieSlice { name: "Coffee".to_string(), value: 7.5 },
                PieSlice { name: "Bus".to_string(), value: 4.0 },
                PieSlice { name: "Lunch".to_string(), value: 10.0 },
            ]
        );
        assert_eq!(overview.total, 21.5);
    }

    #[test]
    fn test_renderer_json_carries_series() {
        let overview = OverviewSeries::build(&sample(), None);

        let json: serde_json::Value = serde_json::from_str(&overview.to_json().unwrap()).unwrap();

        assert_eq!(json["dates"], serde_json::json!(["2023-03-01", "2023-03-02", "2023-03-03"]));
        assert_eq!(json["axis_labels"][0], "03/01");
        assert_eq!(json["series"][1]["name"], "Bus");
        assert_eq!(json["series"][1]["values"], serde_json::json!([2.0, 0.0, 2.0]));
        assert_eq!(json["total"], 21.5);
        assert_eq!(json["zoom_start_percent"], 0);
    }

    #[test]
    fn test_slices_add_up_to_total() {
        let overview = OverviewSeries::build(&sample(), None);
        let slices: f64 = overview.slices.iter().map(|slice| slice.value).sum();
        assert_eq!(slices, overview.total);
    }

    #[test]
    fn test_event_filter_limits_series_and_dates() {
        let filter = vec!["Bus".to_string()];
        let overview = OverviewSeries::build(&sample(), Some(filter.as_slice()));

        assert_eq!(overview.axis_labels, vec!["03/01", "03/03"]);
        assert_eq!(overview.events, vec!["Bus"]);
        assert_eq!(overview.series[0].values, vec![2.0, 2.0]);
        assert_eq!(overview.total, 4.0);
    }

    #[test]
    fn test_empty_filter_keeps_nothing() {
        let overview = OverviewSeries::build(&sample(), Some(&[][..]));
        assert!(overview.is_empty());
        assert!(overview.series.is_empty());
        assert_eq!(overview.total, 0.0);
        assert_eq!(overview.zoom_start_percent, 0);
    }

    #[test]
    fn test_zoom_shows_last_four_dates() {
        assert_eq!(zoom_start_percent(0), 0);
        assert_eq!(zoom_start_percent(2), 0);
        assert_eq!(zoom_start_percent(4), 0);
        assert_eq!(zoom_start_percent(8), 50);
        assert_eq!(zoom_start_percent(10), 60);
        assert_eq!(zoom_start_percent(30), 86);
    }

    #[test]
    fn test_all_events_first_seen() {
        assert_eq!(all_events(&sample()), vec!["Coffee", "Bus", "Lunch"]);
        assert!(all_events(&[]).is_empty());
    }

    #[test]
    fn test_breakdowns_group_by_primary_tag() {
        let result = AggregatedResult::from_entries(sample());
        let breakdowns = category_breakdowns(&result);

        let categories: Vec<_> = breakdowns.iter().map(|b| b.category.as_str()).collect();
        // "Work" only ever appears as a secondary tag
        assert_eq!(categories, vec!["Food", "Transport"]);
        assert_eq!(breakdowns[0].entries.len(), 3);
        assert_eq!(breakdowns[1].entries.len(), 2);
        assert!(breakdowns[0].entries.iter().all(|e| e.primary_category() == Some("Food")));
    }
}

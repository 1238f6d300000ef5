use std::collections::HashSet;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// First run of digits and decimal points in an entry's text
    static ref AMOUNT_PATTERN: Regex = Regex::new(r"[0-9.]+").expect("amount pattern is valid");
}

/// One normalized expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub date: NaiveDate,
    /// Label exactly as entered upstream, e.g. "15.5 Coffee"
    pub text: String,
    /// Category labels in source order; the first one is the primary category
    pub tags: Vec<String>,
    /// Never negative, 0 when the text carries no amount
    pub amount: f64,
    /// `text` without the amount, e.g. "Coffee"
    pub description: String,
}

impl ExpenseEntry {
    pub fn new(date: NaiveDate, text: impl Into<String>, tags: Vec<String>) -> Self {
        let text = text.into();
        let (amount, description) = split_amount(&text);
        Self {
            date,
            text,
            tags,
            amount,
            description,
        }
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// Split an entry text into its amount and the remaining description.
///
/// Only the first numeric run is removed. A run that is not a number
/// (a lone "." or "1.2.3") counts as 0 but is still removed.
pub fn split_amount(text: &str) -> (f64, String) {
    match AMOUNT_PATTERN.find(text) {
        Some(found) => {
            let amount = found
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .unwrap_or(0.0);
            let mut description = String::with_capacity(text.len());
            description.push_str(&text[..found.start()]);
            description.push_str(&text[found.end()..]);
            (amount, description.trim().to_string())
        }
        None => (0.0, text.trim().to_string()),
    }
}

/// Entries of one view, sorted by date, plus every category seen in them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    entries: Vec<ExpenseEntry>,
    categories: Vec<String>,
}

impl AggregatedResult {
    /// Build the result from entries in arrival order.
    ///
    /// Categories keep first-seen arrival order; the date sort is stable so
    /// entries on the same day stay in arrival order.
    pub fn from_entries(mut entries: Vec<ExpenseEntry>) -> Self {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for tag in entries.iter().flat_map(|entry| entry.tags.iter()) {
            if seen.insert(tag.as_str()) {
                categories.push(tag.clone());
            }
        }

        entries.sort_by_key(|entry| entry.date);

        Self { entries, categories }
    }

    pub fn entries(&self) -> &[ExpenseEntry] {
        &self.entries
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_amount(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    /// Entries whose primary category is `category`
    pub fn entries_in_category(&self, category: &str) -> Vec<ExpenseEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.primary_category() == Some(category))
            .cloned()
            .collect()
    }
}

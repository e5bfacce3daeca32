use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{Dataset, SalesRecord};

// ---------------------------------------------------------------------------
// Filter selection: what the sidebar widgets currently hold
// ---------------------------------------------------------------------------

/// The categorical columns the sidebar filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Country,
    StoreType,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Country => "Country",
            Dimension::StoreType => "Store Type",
        }
    }

    /// The record's value for this column.
    pub fn value_of(self, record: &SalesRecord) -> &str {
        match self {
            Dimension::Country => &record.country,
            Dimension::StoreType => &record.store_type,
        }
    }

    /// All distinct values the dataset holds for this column.
    pub fn universe(self, dataset: &Dataset) -> &BTreeSet<String> {
        match self {
            Dimension::Country => dataset.countries(),
            Dimension::StoreType => dataset.store_types(),
        }
    }
}

/// User-chosen constraints, recomputed on every interaction.
///
/// An empty value set selects nothing; it does not mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub countries: BTreeSet<String>,
    pub store_types: BTreeSet<String>,
    /// Inclusive lower date bound.
    pub start: NaiveDate,
    /// Inclusive upper date bound.
    pub end: NaiveDate,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            countries: BTreeSet::new(),
            store_types: BTreeSet::new(),
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }
}

impl FilterSelection {
    /// Select everything: all countries, all store types, the full date span.
    pub fn all(dataset: &Dataset) -> Self {
        let (start, end) = dataset
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self {
            countries: dataset.countries().clone(),
            store_types: dataset.store_types().clone(),
            start,
            end,
        }
    }

    pub fn values(&self, dim: Dimension) -> &BTreeSet<String> {
        match dim {
            Dimension::Country => &self.countries,
            Dimension::StoreType => &self.store_types,
        }
    }

    pub fn values_mut(&mut self, dim: Dimension) -> &mut BTreeSet<String> {
        match dim {
            Dimension::Country => &mut self.countries,
            Dimension::StoreType => &mut self.store_types,
        }
    }

    /// Whether a single record passes all three predicates.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.countries.contains(Dimension::Country.value_of(record))
            && self.store_types.contains(Dimension::StoreType.value_of(record))
            && self.start <= record.date
            && record.date <= self.end
    }

    /// True when no record can possibly pass.
    fn selects_nothing(&self) -> bool {
        self.countries.is_empty() || self.store_types.is_empty() || self.start > self.end
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Return indices of records that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    if selection.selects_nothing() {
        return Vec::new();
    }
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Borrow the records that pass the selection, in dataset order.
pub fn filter_records<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Vec<&'a SalesRecord> {
    let records = dataset.records();
    filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

use std::collections::BTreeSet;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// SalesRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single validated sales row.
///
/// Decimal columns are guaranteed finite and non-negative by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub country: String,
    pub store_type: String,
    pub store_id: String,
    pub product_category: String,
    pub total_sales: f64,
    pub avg_order_value: f64,
    pub loyalty_member_count: u64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter indices.
///
/// Built once per session and never mutated afterwards; the filter and
/// aggregation layers only ever borrow it.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records in file order.
    records: Vec<SalesRecord>,
    /// Sorted distinct countries.
    countries: BTreeSet<String>,
    /// Sorted distinct store types.
    store_types: BTreeSet<String>,
    /// Earliest and latest record date, `None` for an empty table.
    date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl Dataset {
    /// Build the filter indices from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut countries = BTreeSet::new();
        let mut store_types = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            if !countries.contains(&rec.country) {
                countries.insert(rec.country.clone());
            }
            if !store_types.contains(&rec.store_type) {
                store_types.insert(rec.store_type.clone());
            }
            date_bounds = Some(match date_bounds {
                None => (rec.date, rec.date),
                Some((lo, hi)) => (lo.min(rec.date), hi.max(rec.date)),
            });
        }

        Dataset {
            records,
            countries,
            store_types,
            date_bounds,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn store_types(&self) -> &BTreeSet<String> {
        &self.store_types
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record(
        day: &str,
        country: &str,
        store_type: &str,
        store_id: &str,
        category: &str,
        total_sales: f64,
        avg_order_value: f64,
        loyalty: u64,
    ) -> SalesRecord {
        SalesRecord {
            date: date(day),
            country: country.into(),
            store_type: store_type.into(),
            store_id: store_id.into(),
            product_category: category.into(),
            total_sales,
            avg_order_value,
            loyalty_member_count: loyalty,
        }
    }

    /// The two-row US/UK table used throughout the engine tests.
    pub fn two_rows() -> Dataset {
        Dataset::from_records(vec![
            record("2024-01-01", "US", "Mall", "S1", "Beverage", 100.0, 5.0, 10),
            record("2024-01-02", "UK", "Street", "S2", "Food", 50.0, 4.0, 5),
        ])
    }

    /// A wider table with repeated stores, dates and categories.
    pub fn mixed() -> Dataset {
        Dataset::from_records(vec![
            record("2024-03-02", "US", "Mall", "S1", "Beverage", 120.0, 6.0, 12),
            record("2024-03-01", "US", "Drive-Thru", "S3", "Food", 80.0, 8.0, 4),
            record("2024-03-02", "US", "Mall", "S1", "Food", 30.0, 3.0, 2),
            record("2024-03-03", "Japan", "Street", "S7", "Merchandise", 45.5, 9.5, 7),
            record("2024-03-01", "Japan", "Mall", "S8", "Beverage", 60.0, 5.0, 9),
            record("2024-03-04", "UK", "Street", "S2", "Beverage", 25.0, 2.5, 1),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn indices_are_sorted_and_distinct() {
        let ds = mixed();
        let countries: Vec<_> = ds.countries().iter().cloned().collect();
        assert_eq!(countries, vec!["Japan", "UK", "US"]);
        let types: Vec<_> = ds.store_types().iter().cloned().collect();
        assert_eq!(types, vec!["Drive-Thru", "Mall", "Street"]);
        assert_eq!(ds.len(), 6);
    }

    #[test]
    fn date_bounds_span_unsorted_input() {
        let ds = mixed();
        assert_eq!(
            ds.date_bounds(),
            Some((date("2024-03-01"), date("2024-03-04")))
        );
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_bounds().is_none());
        assert!(ds.countries().is_empty());
    }
}

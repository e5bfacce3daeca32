use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::filter::{FilterSelection, filter_records};
use super::model::{Dataset, SalesRecord};

// ---------------------------------------------------------------------------
// Scalar KPIs
// ---------------------------------------------------------------------------

/// The four headline figures shown above the charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSummary {
    pub total_sales_sum: f64,
    /// Mean of the per-row `avg_order_value` column. `None` when the view is
    /// empty.
    ///
    /// This is a mean of means and is not weighted by order count.
    pub avg_order_value_mean: Option<f64>,
    pub loyalty_member_total: u64,
    pub distinct_store_count: usize,
}

impl KpiSummary {
    pub fn from_view(view: &[&SalesRecord]) -> Self {
        let mut total_sales_sum = 0.0;
        let mut aov_sum = 0.0;
        let mut loyalty_member_total = 0u64;
        let mut stores: BTreeSet<&str> = BTreeSet::new();

        for rec in view {
            total_sales_sum += rec.total_sales;
            aov_sum += rec.avg_order_value;
            loyalty_member_total = loyalty_member_total.saturating_add(rec.loyalty_member_count);
            stores.insert(&rec.store_id);
        }

        let avg_order_value_mean = if view.is_empty() {
            None
        } else {
            Some(aov_sum / view.len() as f64)
        };

        KpiSummary {
            total_sales_sum,
            avg_order_value_mean,
            loyalty_member_total,
            distinct_store_count: stores.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Grouped summaries
// ---------------------------------------------------------------------------

/// Per-group tables feeding the three charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSummaries {
    /// Daily sales, ascending by date.
    pub sales_by_date: Vec<(NaiveDate, f64)>,
    pub sales_by_category: BTreeMap<String, f64>,
    /// Distinct store count per country.
    pub stores_by_country: BTreeMap<String, usize>,
}

impl GroupedSummaries {
    pub fn from_view(view: &[&SalesRecord]) -> Self {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut sales_by_category: BTreeMap<String, f64> = BTreeMap::new();
        let mut country_stores: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for rec in view {
            *by_date.entry(rec.date).or_default() += rec.total_sales;
            *sales_by_category
                .entry(rec.product_category.clone())
                .or_default() += rec.total_sales;
            country_stores
                .entry(&rec.country)
                .or_default()
                .insert(&rec.store_id);
        }

        let stores_by_country = country_stores
            .into_iter()
            .map(|(country, stores)| (country.to_string(), stores.len()))
            .collect();

        GroupedSummaries {
            sales_by_date: by_date.into_iter().collect(),
            sales_by_category,
            stores_by_country,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard – everything the rendering layer consumes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub kpis: KpiSummary,
    pub groups: GroupedSummaries,
    /// Number of records in the filtered view.
    pub visible_rows: usize,
}

impl Dashboard {
    pub fn from_view(view: &[&SalesRecord]) -> Self {
        Dashboard {
            kpis: KpiSummary::from_view(view),
            groups: GroupedSummaries::from_view(view),
            visible_rows: view.len(),
        }
    }
}

/// Filter the dataset and aggregate the result in one pass of the pipeline.
pub fn recompute(dataset: &Dataset, selection: &FilterSelection) -> Dashboard {
    let view = filter_records(dataset, selection);
    let dashboard = Dashboard::from_view(&view);
    log::debug!(
        "recomputed dashboard: {} of {} rows visible, total sales {:.2}",
        dashboard.visible_rows,
        dataset.len(),
        dashboard.kpis.total_sales_sum
    );
    dashboard
}

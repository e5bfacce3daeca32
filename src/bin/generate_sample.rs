use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Store {
    id: String,
    country: &'static str,
    store_type: &'static str,
}

struct Row {
    date: NaiveDate,
    country: &'static str,
    store_type: &'static str,
    store_id: String,
    category: &'static str,
    total_sales: f64,
    avg_order_value: f64,
    loyalty: i64,
}

/// Sales lift by month: summer and December peaks.
fn seasonality(date: NaiveDate) -> f64 {
    match date.month() {
        6..=8 => 1.25,
        12 => 1.4,
        1 | 2 => 0.85,
        _ => 1.0,
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let countries = ["United States", "China", "Canada", "Japan", "United Kingdom", "Germany"];
    let store_types = ["Drive-Thru", "Mall", "Street", "Airport"];
    let categories = [
        ("Beverage", 6.5),
        ("Food", 8.0),
        ("Merchandise", 18.0),
        ("Packaged Coffee", 12.5),
    ];

    let mut stores = Vec::new();
    for (c, country) in countries.iter().enumerate() {
        let n = 3 + c % 3;
        for k in 0..n {
            stores.push(Store {
                id: format!("ST{:02}{:02}", c, k),
                country: *country,
                store_type: *rng.pick(&store_types),
            });
        }
    }

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");
    let mut rows = Vec::new();
    for day in 0..366u64 {
        let date = start.checked_add_days(Days::new(day)).expect("date in range");
        if date.year() != 2024 {
            break;
        }
        // Each day a handful of stores report one category each.
        for _ in 0..6 {
            let store = rng.pick(&stores);
            let &(category, base_aov) = rng.pick(&categories);
            let orders = rng.uniform(40.0, 160.0) * seasonality(date);
            let aov = base_aov * rng.uniform(0.85, 1.15);
            rows.push(Row {
                date,
                country: store.country,
                store_type: store.store_type,
                store_id: store.id.clone(),
                category,
                total_sales: (orders * aov * 100.0).round() / 100.0,
                avg_order_value: (aov * 100.0).round() / 100.0,
                loyalty: (orders * rng.uniform(0.2, 0.6)).round() as i64,
            });
        }
    }

    write_csv("sample_sales.csv", &rows);
    write_parquet("sample_sales.parquet", &rows);

    println!(
        "Wrote {} sales rows for {} stores to sample_sales.csv and sample_sales.parquet",
        rows.len(),
        stores.len()
    );
}

fn write_csv(path: &str, rows: &[Row]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record([
            "date",
            "country",
            "store_type",
            "store_id",
            "product_category",
            "total_sales",
            "avg_order_value",
            "loyalty_member_count",
        ])
        .expect("Failed to write CSV header");
    for r in rows {
        writer
            .write_record([
                r.date.format("%Y-%m-%d").to_string(),
                r.country.to_string(),
                r.store_type.to_string(),
                r.store_id.clone(),
                r.category.to_string(),
                format!("{:.2}", r.total_sales),
                format!("{:.2}", r.avg_order_value),
                r.loyalty.to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

fn write_parquet(path: &str, rows: &[Row]) {
    // Date32 counts days since 1970-01-01, which is `NaiveDate::default()`.
    let dates = Date32Array::from_iter_values(
        rows.iter()
            .map(|r| (r.date - NaiveDate::default()).num_days() as i32),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("store_type", DataType::Utf8, false),
        Field::new("store_id", DataType::Utf8, false),
        Field::new("product_category", DataType::Utf8, false),
        Field::new("total_sales", DataType::Float64, false),
        Field::new("avg_order_value", DataType::Float64, false),
        Field::new("loyalty_member_count", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(dates),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.store_type))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.store_id.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.total_sales))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.avg_order_value))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.loyalty))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

//! DuckDB-backed record store.
//!
//! Records live in a single `product_sales` table. Every [`RecordFilter`] is
//! rendered through [`SqlBuilder`], so user-supplied values are always bound
//! as parameters.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::{params, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ensure_unique_ids, GroupKey, GroupValue, RecordField, RecordStore};
use crate::config::SALES_TABLE;
use crate::error::{Result, SalesError};
use crate::filter::RecordFilter;
use crate::models::record::format_price;
use crate::models::Record;
use crate::sql_builder::SqlBuilder;

const DATE_COLUMN: &str = "\"dateOfSale\"";

const RECORD_COLUMNS: [&str; 8] = [
    "id",
    "title",
    "price",
    "description",
    "category",
    "image",
    "sold",
    "\"dateOfSale\"",
];

/// Largest LIMIT/OFFSET DuckDB accepts.
const MAX_ROW_BOUND: u64 = (1 << 62) - 1;

/// Record store over an embedded DuckDB database.
///
/// Holds one connection as the handle to the database; each query runs on
/// its own clone of it, so concurrent readers do not serialize behind the
/// mutex.
pub struct DuckDbStore {
    conn: Mutex<DuckDbConnection>,
}

impl DuckDbStore {
    /// Open a fresh in-memory database and create the sales table.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(DuckDbConnection::open_in_memory()?)
    }

    /// Open (or create) a database file and ensure the sales table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = DuckDbConnection::open(path.as_ref())?;
        log::info!("Opened DuckDB record store: {}", path.as_ref().display());
        Self::from_connection(conn)
    }

    fn from_connection(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (\
               id BIGINT NOT NULL, \
               title VARCHAR NOT NULL, \
               price DOUBLE NOT NULL, \
               description VARCHAR, \
               category VARCHAR NOT NULL, \
               image VARCHAR, \
               sold BOOLEAN NOT NULL, \
               {} TIMESTAMP NOT NULL)",
            SALES_TABLE, DATE_COLUMN
        ))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A dedicated connection to the shared database.
    fn connection(&self) -> Result<DuckDbConnection> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| SalesError::Store("DuckDB connection lock poisoned".into()))?;
        Ok(guard.try_clone()?)
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Timestamps are rendered as RFC 3339 strings in UTC.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, Value>>> {
        log::debug!("DuckDB query: {} {:?}", sql.replace('\n', " "), params);
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has executed
        let (column_names, column_count) = {
            let executed = rows_result
                .as_ref()
                .ok_or_else(|| SalesError::Store("query produced no statement".into()))?;
            let names: Vec<String> = executed
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, executed.column_count())
        };

        let mut out: Vec<HashMap<String, Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate().take(column_count) {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = Value::Object(row.into_iter().collect::<serde_json::Map<String, Value>>());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[String]) -> Result<Option<Value>> {
        let rows = self.execute(sql, params)?;
        Ok(rows.into_iter().next().and_then(|row| row.into_values().next()))
    }

    /// Load a JSON array of records (the seed file format) and replace the
    /// table contents with it.
    pub fn import_json_file<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let records: Vec<Record> = serde_json::from_str(&raw)?;
        log::info!(
            "Read {} records from {}",
            records.len(),
            path.as_ref().display()
        );
        self.replace_all(&records)
    }

    fn filtered(&self, filter: &RecordFilter) -> Result<SqlBuilder> {
        let mut qb = SqlBuilder::new(SALES_TABLE);
        apply_filter(&mut qb, filter);
        if let Some(term) = &filter.search {
            let prices = self.prices_matching(term)?;
            // Term is already lower-cased by RecordFilter::search
            qb.where_or(&[
                ("contains(LOWER(title), ?)", term.as_str()),
                ("contains(LOWER(COALESCE(description, '')), ?)", term.as_str()),
                ("list_contains(CAST(? AS DOUBLE[]), price)", prices.as_str()),
            ]);
        }
        Ok(qb)
    }

    /// Distinct stored prices whose text form contains `term`, as a DuckDB
    /// list literal (`[15.99, 599]`).
    ///
    /// DuckDB prints large and tiny doubles in scientific notation, so price
    /// text is rendered by [`Record::price_text`] rather than in SQL.
    fn prices_matching(&self, term: &str) -> Result<String> {
        let rows = self.execute(&format!("SELECT DISTINCT price FROM {}", SALES_TABLE), &[])?;
        let matching: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get("price").and_then(|v| v.as_f64()))
            .map(format_price)
            .filter(|text| text.to_lowercase().contains(term))
            .collect();
        Ok(format!("[{}]", matching.join(", ")))
    }
}

impl RecordStore for DuckDbStore {
    fn count(&self, filter: &RecordFilter) -> Result<u64> {
        let (sql, params) = self.filtered(filter)?.select(&["COUNT(*) AS cnt"]).build();
        let cnt = self
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        Ok(cnt)
    }

    fn find(&self, filter: &RecordFilter, skip: usize, limit: usize) -> Result<Vec<Record>> {
        if skip as u64 > MAX_ROW_BOUND {
            return Ok(Vec::new());
        }
        let limit = usize::try_from(MAX_ROW_BOUND).map_or(limit, |max| limit.min(max));
        let (sql, params) = self
            .filtered(filter)?
            .select(&RECORD_COLUMNS)
            .order_by(&["rowid ASC"])
            .limit(limit)
            .offset(skip)
            .build();
        self.execute_into(&sql, &params)
    }

    fn sum_where(&self, filter: &RecordFilter, field: RecordField) -> Result<f64> {
        let total = format!("COALESCE(SUM({}), 0) AS total", field.column());
        let (sql, params) = self.filtered(filter)?.select(&[total.as_str()]).build();
        let total = self
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Ok(total)
    }

    fn group_by(&self, filter: &RecordFilter, key: GroupKey) -> Result<BTreeMap<GroupValue, u64>> {
        let (sql, params) = grouped(self.filtered(filter)?, key, "COUNT(*) AS agg");
        let rows = self.execute(&sql, &params)?;

        let mut out = BTreeMap::new();
        for row in &rows {
            let count = row.get("agg").and_then(|v| v.as_u64()).unwrap_or(0);
            out.insert(group_value(row, key)?, count);
        }
        Ok(out)
    }

    fn group_sum(
        &self,
        filter: &RecordFilter,
        key: GroupKey,
        field: RecordField,
    ) -> Result<BTreeMap<GroupValue, f64>> {
        let agg = format!("COALESCE(SUM({}), 0) AS agg", field.column());
        let (sql, params) = grouped(self.filtered(filter)?, key, &agg);
        let rows = self.execute(&sql, &params)?;

        let mut out = BTreeMap::new();
        for row in &rows {
            let total = row.get("agg").and_then(|v| v.as_f64()).unwrap_or(0.0);
            out.insert(group_value(row, key)?, total);
        }
        Ok(out)
    }

    /// Delete every row and insert `records` in one transaction.
    ///
    /// Record ids must be unique; duplicates are rejected before the table is
    /// touched.
    fn replace_all(&self, records: &[Record]) -> Result<usize> {
        ensure_unique_ids(records)?;

        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute_batch(&format!("DELETE FROM {}", SALES_TABLE))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} VALUES (?, ?, ?, ?, ?, ?, ?, CAST(? AS TIMESTAMP))",
                SALES_TABLE
            ))?;
            for r in records {
                stmt.execute(params![
                    r.id,
                    r.title,
                    r.price,
                    r.description,
                    r.category,
                    r.image,
                    r.sold,
                    sql_timestamp(&r.date_of_sale),
                ])?;
            }
        }
        tx.commit()?;

        log::info!("Imported {} records into {}", records.len(), SALES_TABLE);
        Ok(records.len())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render the structured criteria of a [`RecordFilter`] as WHERE conditions.
///
/// The search term needs the stored prices and is added by `DuckDbStore::filtered`.
fn apply_filter(qb: &mut SqlBuilder, filter: &RecordFilter) {
    if let Some(window) = &filter.window {
        qb.where_typed(DATE_COLUMN, ">=", &sql_timestamp(&window.start), "TIMESTAMP");
        qb.where_typed(DATE_COLUMN, "<", &sql_timestamp(&window.end), "TIMESTAMP");
    }

    if let Some(sold) = filter.sold {
        qb.where_typed("sold", "=", if sold { "true" } else { "false" }, "BOOLEAN");
    }

    if let Some(range) = &filter.price {
        qb.where_typed("price", ">=", &range.min.to_string(), "DOUBLE");
        if let Some(max) = range.max {
            qb.where_typed("price", "<=", &max.to_string(), "DOUBLE");
        }
    }
}

fn grouped(mut qb: SqlBuilder, key: GroupKey, aggregate: &str) -> (String, Vec<String>) {
    match key {
        GroupKey::Category => {
            qb.select(&["category", aggregate])
                .group_by(&["category"])
                .order_by(&["category ASC"]);
        }
        GroupKey::YearMonth => {
            let yr = format!("year({}) AS yr", DATE_COLUMN);
            let mo = format!("month({}) AS mo", DATE_COLUMN);
            qb.select(&[yr.as_str(), mo.as_str(), aggregate])
                .group_by(&["yr", "mo"])
                .order_by(&["yr ASC", "mo ASC"]);
        }
    }
    qb.build()
}

fn group_value(row: &HashMap<String, Value>, key: GroupKey) -> Result<GroupValue> {
    match key {
        GroupKey::Category => Ok(GroupValue::Category(
            row.get("category")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        )),
        GroupKey::YearMonth => {
            let year = row.get("yr").and_then(|v| v.as_i64());
            let month = row.get("mo").and_then(|v| v.as_u64());
            match (year, month) {
                (Some(year), Some(month)) => Ok(GroupValue::YearMonth {
                    year: year as i32,
                    month: month as u32,
                }),
                _ => Err(SalesError::Store(format!(
                    "malformed (year, month) group row: {:?}",
                    row
                ))),
            }
        }
    }
}

/// Timestamp literal DuckDB casts to `TIMESTAMP` (naive, UTC).
fn sql_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> Value {
    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::Number(n.into()),
        ValueRef::SmallInt(n) => Value::Number(n.into()),
        ValueRef::Int(n) => Value::Number(n.into()),
        ValueRef::BigInt(n) => Value::Number(n.into()),
        ValueRef::UTinyInt(n) => Value::Number(n.into()),
        ValueRef::USmallInt(n) => Value::Number(n.into()),
        ValueRef::UInt(n) => Value::Number(n.into()),
        ValueRef::UBigInt(n) => Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fallback to string
            if let Ok(i) = i64::try_from(n) {
                Value::Number(i.into())
            } else {
                Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).to_string()),
        ValueRef::Timestamp(unit, value) => {
            let micros = match unit {
                TimeUnit::Second => value.saturating_mul(1_000_000),
                TimeUnit::Millisecond => value.saturating_mul(1_000),
                TimeUnit::Microsecond => value,
                TimeUnit::Nanosecond => value / 1_000,
            };
            DateTime::<Utc>::from_timestamp_micros(micros)
                .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Micros, true)))
                .unwrap_or(Value::Null)
        }
        // Remaining types (Date, Interval, List, Blob, ...) never appear in
        // the sales table
        _ => Value::Null,
    }
}

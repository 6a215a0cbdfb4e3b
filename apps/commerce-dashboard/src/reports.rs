//! Fixed aggregation reports and the columnar shape the charts consume.
//!
//! Every report is a two-column query whose rows are unzipped into two
//! parallel arrays keyed by chart-facing names, e.g.
//! `{"dates": [...], "counts": [...]}`.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

use crate::db::{Database, SqlParam};
use crate::error::{ReportError, ReportResult};

pub const LOW_STOCK_THRESHOLD: i64 = 20;
pub const TOP_PRODUCTS_LIMIT: i64 = 10;

#[derive(Debug, Clone)]
pub struct ColumnarReport {
    pub name: &'static str,
    pub sql: &'static str,
    pub params: Vec<SqlParam>,
    pub keys: [&'static str; 2],
}

/// Two equal-length arrays serialized under the report's key names.
#[derive(Debug, Clone, PartialEq)]
pub struct Columnar<L, V> {
    keys: [&'static str; 2],
    pub labels: Vec<L>,
    pub values: Vec<V>,
}

impl<L, V> Columnar<L, V> {
    pub fn from_rows(keys: [&'static str; 2], rows: Vec<(L, V)>) -> Self {
        let (labels, values) = rows.into_iter().unzip();
        Self {
            keys,
            labels,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<L: Serialize, V: Serialize> Serialize for Columnar<L, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.keys[0], &self.labels)?;
        map.serialize_entry(self.keys[1], &self.values)?;
        map.end()
    }
}

pub async fn run_columnar<L, V>(
    db: &Database,
    report: &ColumnarReport,
) -> ReportResult<Columnar<L, V>>
where
    (L, V): for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let rows = db
        .fetch_all::<(L, V)>(report.sql, &report.params)
        .await
        .map_err(ReportError::database(report.name))?;
    let columnar = Columnar::from_rows(report.keys, rows);
    tracing::debug!(report = report.name, rows = columnar.len(), "report query finished");
    Ok(columnar)
}

pub fn orders_over_time() -> ColumnarReport {
    ColumnarReport {
        name: "orders_over_time",
        sql: r#"
        SELECT order_date, COUNT(order_id) AS num_orders
        FROM orders
        GROUP BY order_date
        ORDER BY order_date
        "#,
        params: vec![],
        keys: ["dates", "counts"],
    }
}

pub fn low_stock_levels() -> ColumnarReport {
    ColumnarReport {
        name: "low_stock_levels",
        sql: r#"
        SELECT p.product_name, CAST(s.quantity AS INTEGER) AS quantity
        FROM stock_level s
        JOIN products p ON s.product_id = p.product_id
        WHERE s.quantity < ?
        ORDER BY s.quantity ASC, p.product_name ASC
        "#,
        params: vec![SqlParam::Int(LOW_STOCK_THRESHOLD)],
        keys: ["products", "quantities"],
    }
}

pub fn most_popular_products() -> ColumnarReport {
    ColumnarReport {
        name: "most_popular_products",
        sql: r#"
        SELECT p.product_name, CAST(SUM(od.quantity_ordered) AS INTEGER) AS total_quantity
        FROM order_details od
        JOIN products p ON od.product_id = p.product_id
        GROUP BY p.product_id, p.product_name
        ORDER BY total_quantity DESC, p.product_name ASC
        LIMIT ?
        "#,
        params: vec![SqlParam::Int(TOP_PRODUCTS_LIMIT)],
        keys: ["products", "quantities"],
    }
}

pub fn revenue_generation() -> ColumnarReport {
    ColumnarReport {
        name: "revenue_generation",
        sql: r#"
        SELECT o.order_date, CAST(SUM(od.price_at_time * od.quantity_ordered) AS REAL) AS revenue
        FROM orders o
        JOIN order_details od ON o.order_id = od.order_id
        GROUP BY o.order_date
        ORDER BY o.order_date
        "#,
        params: vec![],
        keys: ["dates", "revenues"],
    }
}

pub fn product_category_popularity() -> ColumnarReport {
    ColumnarReport {
        name: "product_category_popularity",
        sql: r#"
        SELECT pc.category_name, CAST(SUM(od.price_at_time * od.quantity_ordered) AS REAL) AS total_sales
        FROM order_details od
        JOIN products p ON od.product_id = p.product_id
        JOIN product_categories pc ON p.category_id = pc.category_id
        GROUP BY pc.category_id, pc.category_name
        ORDER BY total_sales DESC, pc.category_name ASC
        "#,
        params: vec![],
        keys: ["categories", "sales"],
    }
}

pub fn payment_method_popularity() -> ColumnarReport {
    ColumnarReport {
        name: "payment_method_popularity",
        sql: r#"
        SELECT pm.method_name, COUNT(pay.payment_id) AS num_payments
        FROM payments pay
        JOIN payment_methods pm ON pay.method_id = pm.method_id
        GROUP BY pm.method_id, pm.method_name
        ORDER BY num_payments DESC, pm.method_name ASC
        "#,
        params: vec![],
        keys: ["methods", "counts"],
    }
}

pub const ORDER_DATE_BOUNDS_SQL: &str = "SELECT MIN(order_date), MAX(order_date) FROM orders";

pub async fn order_date_bounds(db: &Database) -> ReportResult<(Option<String>, Option<String>)> {
    db.fetch_one::<(Option<String>, Option<String>)>(ORDER_DATE_BOUNDS_SQL)
        .await
        .map_err(ReportError::database("temperature_over_time"))
}

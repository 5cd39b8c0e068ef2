//! DuckDB adapter and dialect implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Dialect, DialectAdapter};
use async_trait::async_trait;
use duckdb::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;

/// DuckDB-backed dialect adapter
pub struct DuckDbAdapter {
    conn: Mutex<Connection>,
}

impl DuckDbAdapter {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Execute a batch of SQL statements (schema setup, fixtures).
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn query_rows_sync(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Vec<Value>>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::QueryError(format!("{}: {}", e, sql)))?;
        let mut rows = stmt.query(duckdb::params_from_iter(params.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let column_count = row.as_ref().column_count();
            let mut record = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let cell: duckdb::types::Value = row.get(i)?;
                record.push(to_json(cell));
            }
            out.push(record);
        }
        Ok(out)
    }
}

#[async_trait]
impl DialectAdapter for DuckDbAdapter {
    async fn query_rows(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Vec<Value>>> {
        self.query_rows_sync(sql, params)
    }

    fn engine(&self) -> &'static str {
        "duckdb"
    }
}

/// Convert a DuckDB cell into a JSON value.
///
/// Catalog queries only produce strings, but the adapter is a general query
/// capability, so the common scalar types map faithfully and anything exotic
/// falls back to its debug rendering.
fn to_json(value: duckdb::types::Value) -> Value {
    use duckdb::types::Value as Db;
    match value {
        Db::Null => Value::Null,
        Db::Boolean(b) => Value::Bool(b),
        Db::TinyInt(v) => Value::from(v),
        Db::SmallInt(v) => Value::from(v),
        Db::Int(v) => Value::from(v),
        Db::BigInt(v) => Value::from(v),
        Db::HugeInt(v) => i64::try_from(v)
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(v.to_string())),
        Db::UTinyInt(v) => Value::from(v),
        Db::USmallInt(v) => Value::from(v),
        Db::UInt(v) => Value::from(v),
        Db::UBigInt(v) => Value::from(v),
        Db::Float(v) => Value::from(v),
        Db::Double(v) => Value::from(v),
        Db::Text(s) => Value::String(s),
        other => Value::String(format!("{:?}", other)),
    }
}

/// Catalog SQL for DuckDB.
///
/// Column facts come from `information_schema.columns`; key and foreign-key
/// facts come from the `duckdb_constraints()` table function, which exposes
/// constraint column lists and the referenced table directly.
pub struct DuckDbDialect;

const COLUMN_ORDER_SQL: &str = "\
select lower(column_name)
from information_schema.columns
where lower(table_name) = lower(?)
order by ordinal_position";

const NOT_NULL_COLUMNS_SQL: &str = "\
select lower(column_name)
from information_schema.columns
where lower(table_name) = lower(?)
  and is_nullable = 'NO'";

// Walks foreign-key edges away from the given table. Depth is capped so a
// genuinely cyclic schema terminates here and is reported as a cycle by the
// graph builder instead of hanging the recursion. Self-edges are excluded;
// the finder reports self-references from the mappings query.
const REFERENCED_TABLES_SQL: &str = "\
with recursive
fk_edges as (
    select distinct
        lower(table_name)       as table_name,
        lower(referenced_table) as ref_table_name
    from duckdb_constraints()
    where constraint_type = 'FOREIGN KEY'
      and lower(table_name) <> lower(referenced_table)
),
ancestry (table_name, ref_table_name, depth) as (
    select table_name, ref_table_name, 1
    from fk_edges
    where table_name = lower(?)
    union all
    select e.table_name, e.ref_table_name, a.depth + 1
    from fk_edges e
    join ancestry a on e.table_name = a.ref_table_name
    where a.depth < 64
)
select ref_table_name
from ancestry
group by ref_table_name
order by max(depth) desc, ref_table_name";

const COLUMNS_MAPPINGS_SQL: &str = "\
select
    lower(table_name),
    lower(column_name),
    lower(ref_table_name),
    lower(ref_column_name)
from (
    select
        table_name,
        unnest(constraint_column_names) as column_name,
        referenced_table                as ref_table_name,
        unnest(referenced_column_names) as ref_column_name
    from duckdb_constraints()
    where constraint_type = 'FOREIGN KEY'
      and lower(table_name) = lower(?)
)";

const PRIMARY_KEY_SQL: &str = "\
select lower(column_name)
from (
    select unnest(constraint_column_names) as column_name
    from duckdb_constraints()
    where constraint_type = 'PRIMARY KEY'
      and lower(table_name) = lower(?)
)";

impl Dialect for DuckDbDialect {
    fn column_order_sql(&self) -> &str {
        COLUMN_ORDER_SQL
    }

    fn not_null_columns_sql(&self) -> &str {
        NOT_NULL_COLUMNS_SQL
    }

    fn referenced_tables_sql(&self) -> &str {
        REFERENCED_TABLES_SQL
    }

    fn columns_mappings_sql(&self) -> &str {
        COLUMNS_MAPPINGS_SQL
    }

    fn primary_key_sql(&self) -> &str {
        PRIMARY_KEY_SQL
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

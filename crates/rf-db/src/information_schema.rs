//! Generic information_schema dialect.
//!
//! Catalog SQL for engines exposing the standard `information_schema` views
//! (H2, PostgreSQL, and friends). The text is engine-agnostic; execution goes
//! through whatever [`DialectAdapter`](crate::traits::DialectAdapter) the
//! caller supplies for the engine, so no driver is bundled here.

use crate::traits::Dialect;

pub struct InformationSchemaDialect;

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

// Recursive ancestor walk over referential constraints. Depth is capped so a
// genuinely cyclic schema terminates here; the cycle is then reported by the
// graph builder. Self-edges are excluded; the finder reports self-references
// from the mappings query.
const REFERENCED_TABLES_SQL: &str = "\
with recursive
fk_edges as (
    select distinct
        lower(kcu.table_name) as table_name,
        lower(pk.table_name)  as ref_table_name
    from information_schema.referential_constraints rc
    join information_schema.key_column_usage kcu
      on kcu.constraint_name = rc.constraint_name
    join information_schema.key_column_usage pk
      on pk.constraint_name = rc.unique_constraint_name
    where lower(kcu.table_name) <> lower(pk.table_name)
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
    lower(kcu.table_name),
    lower(kcu.column_name),
    lower(pk.table_name),
    lower(pk.column_name)
from information_schema.referential_constraints rc
join information_schema.key_column_usage kcu
  on kcu.constraint_name = rc.constraint_name
join information_schema.key_column_usage pk
  on pk.constraint_name = rc.unique_constraint_name
 and pk.ordinal_position = kcu.position_in_unique_constraint
where lower(kcu.table_name) = lower(?)
order by kcu.constraint_name, kcu.ordinal_position";

const PRIMARY_KEY_SQL: &str = "\
select lower(kcu.column_name)
from information_schema.table_constraints tc
join information_schema.key_column_usage kcu
  on kcu.constraint_name = tc.constraint_name
where tc.constraint_type = 'PRIMARY KEY'
  and lower(tc.table_name) = lower(?)
order by kcu.ordinal_position";

impl Dialect for InformationSchemaDialect {
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

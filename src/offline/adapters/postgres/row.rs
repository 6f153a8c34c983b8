//! Dynamic row decoding for raw SQL queries.
//!
//! Diesel's `sql_query` normally loads into a struct with statically known
//! columns. The backend port is statement-agnostic, so rows are decoded by
//! inspecting each column's type OID instead.

use diesel::deserialize::{self, FromSql, QueryableByName};
use diesel::pg::{Pg, PgValue};
use diesel::row::{Field, NamedRow, Row};
use diesel::sql_types::{BigInt, Integer, SmallInt, Text};

use crate::offline::ports::{SqlRow, SqlValue};

const NAME_OID: u32 = 19;
const INT8_OID: u32 = 20;
const INT2_OID: u32 = 21;
const INT4_OID: u32 = 23;
const TEXT_OID: u32 = 25;
const BPCHAR_OID: u32 = 1042;
const VARCHAR_OID: u32 = 1043;

/// A result row whose columns are decoded at runtime.
#[derive(Debug)]
pub(super) struct DynamicRow(pub(super) SqlRow);

impl QueryableByName<Pg> for DynamicRow {
    fn build<'a>(row: &impl NamedRow<'a, Pg>) -> deserialize::Result<Self> {
        let mut decoded = SqlRow::new();
        for index in 0..row.field_count() {
            let field = Row::get(row, index).ok_or_else(|| format!("column {index} is missing"))?;
            let name = field.field_name().unwrap_or_default().to_owned();
            let value = decode_value(field.value())?;
            decoded.push(name, value);
        }
        Ok(Self(decoded))
    }
}

fn decode_value(raw: Option<PgValue<'_>>) -> deserialize::Result<SqlValue> {
    let Some(value) = raw else {
        return Ok(SqlValue::Null);
    };

    match value.get_oid().get() {
        TEXT_OID | VARCHAR_OID | BPCHAR_OID | NAME_OID => Ok(SqlValue::Text(
            <String as FromSql<Text, Pg>>::from_sql(value)?,
        )),
        INT8_OID => Ok(SqlValue::BigInt(<i64 as FromSql<BigInt, Pg>>::from_sql(
            value,
        )?)),
        INT4_OID => Ok(SqlValue::BigInt(i64::from(
            <i32 as FromSql<Integer, Pg>>::from_sql(value)?,
        ))),
        INT2_OID => Ok(SqlValue::BigInt(i64::from(
            <i16 as FromSql<SmallInt, Pg>>::from_sql(value)?,
        ))),
        oid => Err(format!("unsupported column type oid {oid}").into()),
    }
}

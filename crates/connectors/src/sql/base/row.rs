use chrono::{NaiveDate, NaiveDateTime};
use core::fmt;
use model::{
    core::value::{FieldValue, Value},
    records::row::RowData,
};
use mysql_async::{
    Row as MySqlRow,
    consts::{ColumnFlags, ColumnType},
    prelude::FromValue,
};
use rust_decimal::Decimal;
use std::fmt::Formatter;
use tokio_postgres::{
    Row as PgRow,
    types::{FromSqlOwned, Json as PgJson, Type},
};
use tracing::warn;
use uuid::Uuid;

pub enum DbRow<'a> {
    MySqlRow(&'a MySqlRow),
    PostgresRow(&'a PgRow),
}

impl DbRow<'_> {
    pub fn to_row_data(&self, entity: &str) -> RowData {
        let field_values = self
            .columns()
            .into_iter()
            .enumerate()
            .map(|(idx, name)| FieldValue {
                value: self.get_value(idx, &name),
                name,
            })
            .collect();

        RowData::new(entity, field_values)
    }

    pub fn columns(&self) -> Vec<String> {
        match self {
            DbRow::MySqlRow(row) => row
                .columns_ref()
                .iter()
                .map(|col| col.name_str().into_owned())
                .collect(),
            DbRow::PostgresRow(row) => row
                .columns()
                .iter()
                .map(|col| col.name().to_string())
                .collect(),
        }
    }

    /// `None` for SQL NULL and for column types that have no `Value` form.
    pub fn get_value(&self, idx: usize, name: &str) -> Option<Value> {
        match self {
            DbRow::MySqlRow(row) => mysql_value(row, idx, name),
            DbRow::PostgresRow(row) => pg_value(row, idx, name),
        }
    }
}

fn pg_get<T: FromSqlOwned>(row: &PgRow, idx: usize) -> Option<T> {
    row.try_get::<_, Option<T>>(idx).ok().flatten()
}

fn pg_value(row: &PgRow, idx: usize, name: &str) -> Option<Value> {
    let ty = row.columns()[idx].type_();
    match *ty {
        Type::INT2 => pg_get::<i16>(row, idx).map(|v| Value::Int(v.into())),
        Type::INT4 => pg_get::<i32>(row, idx).map(|v| Value::Int(v.into())),
        Type::INT8 => pg_get::<i64>(row, idx).map(Value::Int),
        Type::OID => pg_get::<u32>(row, idx).map(|v| Value::Uint(v.into())),
        Type::FLOAT4 => pg_get::<f32>(row, idx).map(|v| Value::Float(v.into())),
        Type::FLOAT8 => pg_get::<f64>(row, idx).map(Value::Float),
        Type::NUMERIC => pg_get::<Decimal>(row, idx).map(Value::Decimal),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            pg_get::<String>(row, idx).map(Value::String)
        }
        Type::BOOL => pg_get::<bool>(row, idx).map(Value::Boolean),
        Type::UUID => pg_get::<Uuid>(row, idx).map(Value::Uuid),
        Type::JSON | Type::JSONB => {
            pg_get::<PgJson<serde_json::Value>>(row, idx).map(|json| Value::Json(json.0))
        }
        Type::DATE => pg_get::<NaiveDate>(row, idx).map(Value::Date),
        Type::TIMESTAMPTZ => pg_get(row, idx).map(Value::Timestamp),
        Type::TIMESTAMP => pg_get::<NaiveDateTime>(row, idx).map(|v| Value::Timestamp(v.and_utc())),
        _ => {
            warn!("Unsupported Postgres column type {} for {}", ty, name);
            None
        }
    }
}

fn mysql_get<T: FromValue>(row: &MySqlRow, idx: usize) -> Option<T> {
    row.get_opt::<Option<T>, _>(idx).and_then(|res| res.ok()).flatten()
}

fn mysql_value(row: &MySqlRow, idx: usize, name: &str) -> Option<Value> {
    let column = &row.columns_ref()[idx];
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);

    match column.column_type() {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            if unsigned {
                mysql_get::<u64>(row, idx).map(Value::Uint)
            } else {
                mysql_get::<i64>(row, idx).map(Value::Int)
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
            mysql_get::<f64>(row, idx).map(Value::Float)
        }
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            mysql_get::<String>(row, idx).and_then(|v| decimal(&v, name))
        }
        ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_STRING
        | ColumnType::MYSQL_TYPE_ENUM
        | ColumnType::MYSQL_TYPE_SET
        | ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB => mysql_get::<String>(row, idx).map(Value::String),
        ColumnType::MYSQL_TYPE_JSON => mysql_get::<String>(row, idx)
            .and_then(|v| serde_json::from_str(&v).ok())
            .map(Value::Json),
        ColumnType::MYSQL_TYPE_DATE => mysql_get::<NaiveDate>(row, idx).map(Value::Date),
        ColumnType::MYSQL_TYPE_DATETIME | ColumnType::MYSQL_TYPE_TIMESTAMP => {
            mysql_get::<NaiveDateTime>(row, idx).map(|v| Value::Timestamp(v.and_utc()))
        }
        other => {
            warn!("Unsupported MySQL column type {:?} for {}", other, name);
            None
        }
    }
}

/// MySQL sends DECIMAL as text; parsing it straight into `Decimal` keeps it
/// exact.
fn decimal(text: &str, name: &str) -> Option<Value> {
    match text.parse::<Decimal>() {
        Ok(v) => Some(Value::Decimal(v)),
        Err(err) => {
            warn!("Unreadable DECIMAL {} for {}: {}", text, name, err);
            None
        }
    }
}

impl fmt::Debug for DbRow<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DbRow::MySqlRow(row) => write!(f, "{row:?}"),
            DbRow::PostgresRow(row) => write!(f, "{row:?}"),
        }
    }
}

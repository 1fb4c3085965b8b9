use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use model::core::value::Value;
use mysql_async::{Params, Value as MySqlValue};

/// Positional parameters for the `?` placeholders of a rendered statement.
pub fn bind(values: Vec<Value>) -> Params {
    if values.is_empty() {
        return Params::Empty;
    }
    Params::Positional(values.into_iter().map(to_mysql).collect())
}

fn to_mysql(value: Value) -> MySqlValue {
    match value {
        Value::Int(v) => MySqlValue::Int(v),
        Value::Uint(v) => MySqlValue::UInt(v),
        Value::Float(v) => MySqlValue::Double(v),
        Value::Boolean(v) => MySqlValue::Int(i64::from(v)),
        Value::Decimal(v) => MySqlValue::Bytes(v.to_string().into_bytes()),
        Value::String(v) => MySqlValue::Bytes(v.into_bytes()),
        Value::Json(v) => MySqlValue::Bytes(v.to_string().into_bytes()),
        Value::Uuid(v) => MySqlValue::Bytes(v.to_string().into_bytes()),
        Value::Date(v) => datetime(v.and_time(NaiveTime::MIN)),
        Value::Timestamp(v) => datetime(v.naive_utc()),
        Value::Null => MySqlValue::NULL,
    }
}

fn datetime(v: NaiveDateTime) -> MySqlValue {
    MySqlValue::Date(
        v.year() as u16,
        v.month() as u8,
        v.day() as u8,
        v.hour() as u8,
        v.minute() as u8,
        v.second() as u8,
        v.and_utc().timestamp_subsec_micros(),
    )
}

use crate::sql::base::error::DbError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::core::value::Value;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use tokio_postgres::types::{Json as PgJson, ToSql, Type};
use uuid::Uuid;

/// A bound parameter converted to the Rust type the server expects for its
/// placeholder. tokio-postgres refuses e.g. an `i64` for an `int4` slot, so the
/// statement is prepared first and every value is narrowed to its parameter
/// type.
pub struct PgParam(Box<dyn ToSql + Sync + Send>);

impl PgParam {
    pub fn for_type(value: Value, ty: &Type) -> Result<Self, DbError> {
        let param = match value {
            Value::Null => Self::null(ty),
            Value::Int(v) => Self::integer(v as i128, ty)?,
            Value::Uint(v) => Self::integer(v as i128, ty)?,
            Value::Float(v) => match *ty {
                Type::FLOAT4 => PgParam(Box::new(v as f32)),
                Type::NUMERIC => PgParam(Box::new(Decimal::from_f64(v).ok_or_else(|| {
                    DbError::Param(format!("{v} does not fit NUMERIC"))
                })?)),
                _ => PgParam(Box::new(v)),
            },
            Value::Decimal(v) => match *ty {
                Type::FLOAT4 | Type::FLOAT8 => Self::float(v, ty)?,
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => PgParam(Box::new(v.to_string())),
                _ => PgParam(Box::new(v)),
            },
            Value::String(v) => match *ty {
                Type::UUID => PgParam(Box::new(
                    Uuid::parse_str(&v).map_err(|e| DbError::Param(e.to_string()))?,
                )),
                _ => PgParam(Box::new(v)),
            },
            Value::Boolean(v) => PgParam(Box::new(v)),
            Value::Json(v) => PgParam(Box::new(PgJson(v))),
            Value::Uuid(v) => match *ty {
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => PgParam(Box::new(v.to_string())),
                _ => PgParam(Box::new(v)),
            },
            Value::Date(v) => PgParam(Box::new(v)),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMP => PgParam(Box::new(v.naive_utc())),
                _ => PgParam(Box::new(v)),
            },
        };
        Ok(param)
    }

    fn float(v: Decimal, ty: &Type) -> Result<Self, DbError> {
        let v = v
            .to_f64()
            .ok_or_else(|| DbError::Param(format!("{v} does not fit {ty}")))?;
        Ok(match *ty {
            Type::FLOAT4 => PgParam(Box::new(v as f32)),
            _ => PgParam(Box::new(v)),
        })
    }

    fn integer(v: i128, ty: &Type) -> Result<Self, DbError> {
        let out_of_range = || DbError::Param(format!("{v} is out of range for {ty}"));
        let param = match *ty {
            Type::INT2 => PgParam(Box::new(i16::try_from(v).map_err(|_| out_of_range())?)),
            Type::INT4 => PgParam(Box::new(i32::try_from(v).map_err(|_| out_of_range())?)),
            Type::FLOAT4 => PgParam(Box::new(v as f32)),
            Type::FLOAT8 => PgParam(Box::new(v as f64)),
            Type::NUMERIC => PgParam(Box::new(
                Decimal::from_i128(v).ok_or_else(out_of_range)?,
            )),
            _ => PgParam(Box::new(i64::try_from(v).map_err(|_| out_of_range())?)),
        };
        Ok(param)
    }

    fn null(ty: &Type) -> Self {
        match *ty {
            Type::INT2 => PgParam(Box::new(None::<i16>)),
            Type::INT4 => PgParam(Box::new(None::<i32>)),
            Type::INT8 => PgParam(Box::new(None::<i64>)),
            Type::FLOAT4 => PgParam(Box::new(None::<f32>)),
            Type::FLOAT8 => PgParam(Box::new(None::<f64>)),
            Type::NUMERIC => PgParam(Box::new(None::<Decimal>)),
            Type::BOOL => PgParam(Box::new(None::<bool>)),
            Type::UUID => PgParam(Box::new(None::<Uuid>)),
            Type::DATE => PgParam(Box::new(None::<NaiveDate>)),
            Type::TIMESTAMP => PgParam(Box::new(None::<NaiveDateTime>)),
            Type::TIMESTAMPTZ => PgParam(Box::new(None::<DateTime<Utc>>)),
            Type::JSON | Type::JSONB => PgParam(Box::new(None::<PgJson<serde_json::Value>>)),
            _ => PgParam(Box::new(None::<String>)),
        }
    }
}

impl AsRef<dyn ToSql + Sync> for PgParam {
    fn as_ref(&self) -> &(dyn ToSql + Sync + 'static) {
        &*self.0
    }
}

pub struct PgParamStore {
    pub params: Vec<PgParam>,
}

impl PgParamStore {
    /// Pairs each value with the parameter type of a prepared statement.
    pub fn for_statement(values: Vec<Value>, types: &[Type]) -> Result<Self, DbError> {
        if values.len() != types.len() {
            return Err(DbError::Param(format!(
                "statement expects {} parameters, got {}",
                types.len(),
                values.len()
            )));
        }

        let params = values
            .into_iter()
            .zip(types)
            .map(|(value, ty)| PgParam::for_type(value, ty))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { params })
    }

    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|param| param.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_count_must_match_statement() {
        let err = PgParamStore::for_statement(vec![Value::Int(1)], &[]).err();
        assert!(matches!(err, Some(DbError::Param(_))));
    }

    #[test]
    fn test_integer_narrowing_checks_range() {
        assert!(PgParam::for_type(Value::Int(12), &Type::INT2).is_ok());
        assert!(matches!(
            PgParam::for_type(Value::Int(i64::from(i32::MAX) + 1), &Type::INT4),
            Err(DbError::Param(_))
        ));
        assert!(matches!(
            PgParam::for_type(Value::Uint(u64::MAX), &Type::INT8),
            Err(DbError::Param(_))
        ));
    }

    #[test]
    fn test_text_uuid_is_parsed_for_uuid_slot() {
        let id = Uuid::new_v4();
        assert!(PgParam::for_type(Value::String(id.to_string()), &Type::UUID).is_ok());
        assert!(PgParam::for_type(Value::from("nope"), &Type::UUID).is_err());
    }

    #[test]
    fn test_numeric_is_bound_exactly() {
        let exact: Decimal = "12345678901234.1234567891".parse().unwrap();
        let param = PgParam::for_type(Value::Decimal(exact), &Type::NUMERIC).unwrap();
        assert_eq!(format!("{:?}", param.0), format!("{exact:?}"));

        let text = PgParam::for_type(Value::Decimal(exact), &Type::TEXT).unwrap();
        assert_eq!(format!("{:?}", text.0), r#""12345678901234.1234567891""#);
    }

    #[test]
    fn test_store_binds_every_value() {
        let store = PgParamStore::for_statement(
            vec![Value::from("a"), Value::Null, Value::Int(3)],
            &[Type::TEXT, Type::TIMESTAMPTZ, Type::INT8],
        )
        .unwrap();
        assert_eq!(store.as_refs().len(), 3);
    }
}

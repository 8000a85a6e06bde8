use crate::server::model::order::{ColumnValue, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use tokio_postgres::types::{FromSql, Kind, Type};
use tokio_postgres::Row;

type BoxError = Box<dyn Error + Sync + Send>;

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;
/// numeric digits are stored in base 10000
const NUMERIC_DIGIT_WIDTH: usize = 4;

impl<'a> FromSql<'a> for ColumnValue {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => ColumnValue::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => ColumnValue::Int(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => ColumnValue::Int(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => ColumnValue::Int(i64::from_sql(ty, raw)?),
            Type::OID => ColumnValue::Int(u32::from_sql(ty, raw)?.into()),
            // widen through the shortest decimal form so 0.1 stays 0.1
            Type::FLOAT4 => ColumnValue::Float(f32::from_sql(ty, raw)?.to_string().parse()?),
            Type::FLOAT8 => ColumnValue::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => ColumnValue::Decimal(decode_numeric(raw)?),
            Type::TIMESTAMPTZ => ColumnValue::Timestamp(DateTime::<Utc>::from_sql(ty, raw)?),
            Type::TIMESTAMP => ColumnValue::Timestamp(NaiveDateTime::from_sql(ty, raw)?.and_utc()),
            Type::DATE => ColumnValue::Date(NaiveDate::from_sql(ty, raw)?),
            Type::JSON | Type::JSONB => ColumnValue::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::UUID => ColumnValue::Text(uuid::Uuid::from_sql(ty, raw)?.to_string()),
            // an enum value is sent as its label
            ref other if matches!(other.kind(), Kind::Enum(_)) => {
                ColumnValue::Text(std::str::from_utf8(raw)?.to_owned())
            }
            ref other if <&str as FromSql>::accepts(other) => {
                ColumnValue::Text(<&str as FromSql>::from_sql(ty, raw)?.to_owned())
            }
            ref other => return Err(format!("unsupported column type {other}").into()),
        };
        Ok(value)
    }

    fn from_sql_null(_: &Type) -> Result<Self, BoxError> {
        Ok(ColumnValue::Null)
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}

/// Convert a row into a record, one entry per column.
pub(crate) fn to_record(row: &Row) -> Result<Record, tokio_postgres::Error> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let value = row.try_get::<_, ColumnValue>(idx)?;
            Ok::<_, tokio_postgres::Error>((column.name(), value))
        })
        .collect()
}

fn read_u16(raw: &[u8], offset: usize) -> Result<u16, BoxError> {
    raw.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| "truncated numeric value".into())
}

/// Decode the binary `numeric` format into its exact decimal text.
///
/// `rust_decimal` stops at 28 significant digits and has no NaN or infinity,
/// both of which a `numeric` column can hold.
fn decode_numeric(raw: &[u8]) -> Result<String, BoxError> {
    let ndigits = read_u16(raw, 0)? as i16;
    let weight = read_u16(raw, 2)? as i16;
    let sign = read_u16(raw, 4)?;
    let dscale = read_u16(raw, 6)? as usize;

    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        _ => {}
    }
    if ndigits < 0 {
        return Err("invalid numeric digit count".into());
    }

    let digits = (0..ndigits as usize)
        .map(|i| read_u16(raw, 8 + i * 2))
        .collect::<Result<Vec<_>, _>>()?;
    let digit_at = |idx: i32| -> u16 {
        usize::try_from(idx)
            .ok()
            .and_then(|idx| digits.get(idx).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG && digits.iter().any(|d| *d != 0) {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        for idx in 0..=i32::from(weight) {
            if idx == 0 {
                out.push_str(&digit_at(idx).to_string());
            } else {
                out.push_str(&format!("{:04}", digit_at(idx)));
            }
        }
    }

    if dscale > 0 {
        let groups = dscale.div_ceil(NUMERIC_DIGIT_WIDTH);
        let mut fraction = String::with_capacity(groups * NUMERIC_DIGIT_WIDTH);
        for group in 0..groups as i32 {
            fraction.push_str(&format!("{:04}", digit_at(i32::from(weight) + 1 + group)));
        }
        fraction.truncate(dscale);
        out.push('.');
        out.push_str(&fraction);
    }

    Ok(out)
}

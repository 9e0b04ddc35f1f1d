//! Deserializers for Grocy columns that arrive as numbers or strings.
//!
//! Older Grocy releases serialize every database column as a JSON string
//! (`"id": "3"`, `"factor": "2.5"`) and booleans as `0`/`1`. Newer releases
//! send proper numbers. These helpers accept both.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

fn number_from_value<E: de::Error>(value: &Value) -> Result<Option<f64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| E::custom(format!("number out of range: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| E::custom(format!("expected a number, got '{s}'"))),
        Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        other => Err(E::custom(format!("expected a number, got {other}"))),
    }
}

fn id_from_value<E: de::Error>(value: &Value) -> Result<Option<i64>, E> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| E::custom(format!("expected an integer id, got {n}"))),
        Value::String(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| E::custom(format!("expected an integer id, got '{s}'"))),
        _ => number_from_value::<E>(value).map(|n| n.map(|f| f as i64)),
    }
}

pub(crate) fn id<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(d)?;
    id_from_value(&value)?.ok_or_else(|| de::Error::custom("missing id"))
}

pub(crate) fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(d)?;
    id_from_value(&value)
}

pub(crate) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(number_from_value(&value)?.unwrap_or_default())
}

pub(crate) fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(d)?;
    number_from_value(&value)
}

pub(crate) fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    match value {
        Value::Bool(b) => Ok(b),
        Value::String(ref s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(ref s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Ok(number_from_value::<D::Error>(&other)?.is_some_and(|n| n != 0.0)),
    }
}

//! Field validation and normalization contract
//!
//! Applied wherever edits are accepted. The client script mirrors these
//! rules so obvious mistakes are caught before a request is sent, but the
//! server-side pass here is authoritative.
//!
//! Rules:
//! - Date fields: "" or "N/A" (any case) store null; otherwise the value
//!   must be exactly `YYYY-MM-DD` and a real calendar date.
//! - Numeric fields: a JSON number, or a string that fully parses as one.
//! - nombre_receptor: trimmed and upper-cased.
//! - codigo_ddp: non-digit characters stripped.
//! - estado: restricted to the closed status label set.
//! - Everything else: trimmed text, empty coerced to null.

use chrono::NaiveDate;
use serde_json::Value;

use crate::db::models::{FieldKind, FieldValue, ShipmentField, ShipmentStatus};
use crate::{Error, Result};

/// Normalize one submitted value for one mutable column
pub fn normalize(field: ShipmentField, value: &Value) -> Result<FieldValue> {
    match field.kind() {
        FieldKind::Date => normalize_date(field, value),
        FieldKind::Numeric => normalize_numeric(field, value),
        FieldKind::UpperText => Ok(match text_of(field, value)? {
            Some(s) => FieldValue::Text(s.to_uppercase()),
            None => FieldValue::Null,
        }),
        FieldKind::Digits => Ok(match text_of(field, value)? {
            Some(s) => {
                let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.is_empty() {
                    FieldValue::Null
                } else {
                    FieldValue::Text(digits)
                }
            }
            None => FieldValue::Null,
        }),
        FieldKind::Status => normalize_status(value),
        FieldKind::Text => Ok(match text_of(field, value)? {
            Some(s) => FieldValue::Text(s),
            None => FieldValue::Null,
        }),
    }
}

/// Normalize a full submitted record for create/update-full
///
/// Fields absent from the body (or explicitly null) fall back to their
/// defaults rather than being left untouched; this reproduces the original
/// full-replacement semantic.
pub fn normalize_record(body: &Value) -> Result<Vec<(ShipmentField, FieldValue)>> {
    let mut values = Vec::with_capacity(ShipmentField::ALL.len());
    for field in ShipmentField::ALL {
        let value = match body.get(field.column()) {
            None | Some(Value::Null) => FieldValue::default_for(field),
            Some(v) => normalize(field, v)?,
        };
        values.push((field, value));
    }
    Ok(values)
}

/// Extract trimmed text, coercing null/empty to None
fn text_of(field: ShipmentField, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(Error::InvalidInput(format!(
            "Field {} expects text, got: {}",
            field.column(),
            other
        ))),
    }
}

fn normalize_date(field: ShipmentField, value: &Value) -> Result<FieldValue> {
    let raw = match value {
        Value::Null => return Ok(FieldValue::Null),
        Value::String(s) => s.trim(),
        other => {
            return Err(Error::InvalidInput(format!(
                "Field {} expects a YYYY-MM-DD date or N/A, got: {}",
                field.column(),
                other
            )))
        }
    };

    if raw.is_empty() || raw.eq_ignore_ascii_case("N/A") {
        return Ok(FieldValue::Null);
    }

    if !has_date_shape(raw) {
        return Err(Error::InvalidInput(format!(
            "Field {} must be YYYY-MM-DD or N/A: {}",
            field.column(),
            raw
        )));
    }

    // Shape is right; still reject impossible dates like 2024-13-40
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        Error::InvalidInput(format!(
            "Field {} is not a valid calendar date: {}",
            field.column(),
            raw
        ))
    })?;

    Ok(FieldValue::Date(date))
}

/// Exactly 4 digits, hyphen, 2 digits, hyphen, 2 digits
fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

fn normalize_numeric(field: ShipmentField, value: &Value) -> Result<FieldValue> {
    match value {
        Value::Number(n) => n.as_f64().map(FieldValue::Real).ok_or_else(|| {
            Error::InvalidInput(format!("Field {} is out of range", field.column()))
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<f64>().map(FieldValue::Real).map_err(|_| {
                Error::InvalidInput(format!(
                    "Field {} must be numeric: {}",
                    field.column(),
                    trimmed
                ))
            })
        }
        other => Err(Error::InvalidInput(format!(
            "Field {} must be numeric, got: {}",
            field.column(),
            other
        ))),
    }
}

fn normalize_status(value: &Value) -> Result<FieldValue> {
    let raw = match value {
        Value::Null => return Ok(FieldValue::Null),
        Value::String(s) => s.trim(),
        other => {
            return Err(Error::InvalidInput(format!(
                "Field estado expects a status label, got: {}",
                other
            )))
        }
    };

    if raw.is_empty() {
        return Ok(FieldValue::Null);
    }

    match ShipmentStatus::from_label(raw) {
        Some(status) => Ok(FieldValue::Text(status.as_label().to_string())),
        None => Err(Error::InvalidInput(format!("Unknown status: {}", raw))),
    }
}

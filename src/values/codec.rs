//! Canonical string encoding of typed values
//!
//! Scalars render in their natural textual form, integers in base 10 and
//! floats in the shortest form that parses back to the same value. Arrays of
//! every kind render as `[e0, e1, ..., en]`.

use std::fmt::Display;
use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;

use super::{NativeValue, ValueKind};

const ARRAY_SEPARATOR: &str = ", ";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("native type `{found}` does not match value type '{kind}'")]
    KindMismatch {
        kind: ValueKind,
        found: &'static str,
    },
    #[error("value type '{0}' is not supported")]
    UnsupportedKind(String),
    #[error("could not parse '{value}' as value type '{kind}'")]
    Parse { kind: ValueKind, value: String },
}

/// Encode a native value declared as `kind` into its canonical string
///
/// The payload must have exactly the shape `kind` names; no widening,
/// narrowing or cross-kind coercion is applied.
pub fn encode(kind: ValueKind, value: &NativeValue) -> Result<String, CodecError> {
    let encoded = match (kind, value) {
        (ValueKind::Bool, NativeValue::Bool(v)) => v.to_string(),
        (ValueKind::String, NativeValue::String(v)) => v.clone(),
        (ValueKind::Uint8, NativeValue::Uint8(v)) => v.to_string(),
        (ValueKind::Uint16, NativeValue::Uint16(v)) => v.to_string(),
        (ValueKind::Uint32, NativeValue::Uint32(v)) => v.to_string(),
        (ValueKind::Uint64, NativeValue::Uint64(v)) => v.to_string(),
        (ValueKind::Int8, NativeValue::Int8(v)) => v.to_string(),
        (ValueKind::Int16, NativeValue::Int16(v)) => v.to_string(),
        (ValueKind::Int32, NativeValue::Int32(v)) => v.to_string(),
        (ValueKind::Int64, NativeValue::Int64(v)) => v.to_string(),
        (ValueKind::Float32, NativeValue::Float32(v)) => format_float(*v),
        (ValueKind::Float64, NativeValue::Float64(v)) => format_float(*v),

        (ValueKind::BoolArray, NativeValue::BoolArray(v)) => format_array(v, ToString::to_string),
        (ValueKind::StringArray, NativeValue::StringArray(v)) => format_array(v, Clone::clone),
        (ValueKind::Uint8Array, NativeValue::Uint8Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Uint16Array, NativeValue::Uint16Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Uint32Array, NativeValue::Uint32Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Uint64Array, NativeValue::Uint64Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Int8Array, NativeValue::Int8Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Int16Array, NativeValue::Int16Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Int32Array, NativeValue::Int32Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Int64Array, NativeValue::Int64Array(v)) => format_array(v, ToString::to_string),
        (ValueKind::Float32Array, NativeValue::Float32Array(v)) => format_array(v, |f| format_float(*f)),
        (ValueKind::Float64Array, NativeValue::Float64Array(v)) => format_array(v, |f| format_float(*f)),

        (ValueKind::Binary | ValueKind::Object, _) => {
            return Err(CodecError::UnsupportedKind(kind.to_string()));
        }
        (kind, value) => {
            return Err(CodecError::KindMismatch {
                kind,
                found: value.repr(),
            });
        }
    };
    Ok(encoded)
}

/// Encode with the kind given by name, matched case-insensitively
pub fn encode_named(value_type: &str, value: &NativeValue) -> Result<String, CodecError> {
    let kind = ValueKind::normalize(value_type)
        .ok_or_else(|| CodecError::UnsupportedKind(value_type.to_string()))?;
    encode(kind, value)
}

/// Parse a canonical string back into the native representation of `kind`
///
/// Array elements are split on `", "`, so string arrays whose elements contain
/// that separator do not survive a round trip.
pub fn decode(kind: ValueKind, text: &str) -> Result<NativeValue, CodecError> {
    let value = match kind {
        ValueKind::Bool => NativeValue::Bool(parse(kind, text)?),
        ValueKind::String => NativeValue::String(text.to_string()),
        ValueKind::Uint8 => NativeValue::Uint8(parse(kind, text)?),
        ValueKind::Uint16 => NativeValue::Uint16(parse(kind, text)?),
        ValueKind::Uint32 => NativeValue::Uint32(parse(kind, text)?),
        ValueKind::Uint64 => NativeValue::Uint64(parse(kind, text)?),
        ValueKind::Int8 => NativeValue::Int8(parse(kind, text)?),
        ValueKind::Int16 => NativeValue::Int16(parse(kind, text)?),
        ValueKind::Int32 => NativeValue::Int32(parse(kind, text)?),
        ValueKind::Int64 => NativeValue::Int64(parse(kind, text)?),
        ValueKind::Float32 => NativeValue::Float32(parse(kind, text)?),
        ValueKind::Float64 => NativeValue::Float64(parse(kind, text)?),

        ValueKind::BoolArray => NativeValue::BoolArray(parse_array(kind, text)?),
        ValueKind::StringArray => NativeValue::StringArray(
            split_array(kind, text)?
                .into_iter()
                .map(str::to_string)
                .collect(),
        ),
        ValueKind::Uint8Array => NativeValue::Uint8Array(parse_array(kind, text)?),
        ValueKind::Uint16Array => NativeValue::Uint16Array(parse_array(kind, text)?),
        ValueKind::Uint32Array => NativeValue::Uint32Array(parse_array(kind, text)?),
        ValueKind::Uint64Array => NativeValue::Uint64Array(parse_array(kind, text)?),
        ValueKind::Int8Array => NativeValue::Int8Array(parse_array(kind, text)?),
        ValueKind::Int16Array => NativeValue::Int16Array(parse_array(kind, text)?),
        ValueKind::Int32Array => NativeValue::Int32Array(parse_array(kind, text)?),
        ValueKind::Int64Array => NativeValue::Int64Array(parse_array(kind, text)?),
        ValueKind::Float32Array => NativeValue::Float32Array(parse_array(kind, text)?),
        ValueKind::Float64Array => NativeValue::Float64Array(parse_array(kind, text)?),

        ValueKind::Binary | ValueKind::Object => {
            return Err(CodecError::UnsupportedKind(kind.to_string()));
        }
    };
    Ok(value)
}

/// Shared by scalar and array-element formatting. Rust's float `Display`
/// yields the shortest round-trippable digits and never switches to exponent
/// notation.
fn format_float(value: impl Display) -> String {
    value.to_string()
}

fn format_array<T>(values: &[T], format_element: impl Fn(&T) -> String) -> String {
    format!(
        "[{}]",
        values.iter().map(format_element).join(ARRAY_SEPARATOR)
    )
}

fn parse<T: FromStr>(kind: ValueKind, text: &str) -> Result<T, CodecError> {
    text.parse::<T>().map_err(|_| CodecError::Parse {
        kind,
        value: text.to_string(),
    })
}

fn split_array(kind: ValueKind, text: &str) -> Result<Vec<&str>, CodecError> {
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| CodecError::Parse {
            kind,
            value: text.to_string(),
        })?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(ARRAY_SEPARATOR).collect())
}

fn parse_array<T: FromStr>(kind: ValueKind, text: &str) -> Result<Vec<T>, CodecError> {
    split_array(kind, text)?
        .into_iter()
        .map(|element| parse(kind, element))
        .collect()
}

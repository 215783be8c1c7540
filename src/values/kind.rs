use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of value kinds a reading can carry
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ValueKind {
    Bool,
    String,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Binary,
    BoolArray,
    StringArray,
    Uint8Array,
    Uint16Array,
    Uint32Array,
    Uint64Array,
    Int8Array,
    Int16Array,
    Int32Array,
    Int64Array,
    Float32Array,
    Float64Array,
    Object,
}

impl ValueKind {
    pub const ALL: [ValueKind; 26] = [
        ValueKind::Bool,
        ValueKind::String,
        ValueKind::Uint8,
        ValueKind::Uint16,
        ValueKind::Uint32,
        ValueKind::Uint64,
        ValueKind::Int8,
        ValueKind::Int16,
        ValueKind::Int32,
        ValueKind::Int64,
        ValueKind::Float32,
        ValueKind::Float64,
        ValueKind::Binary,
        ValueKind::BoolArray,
        ValueKind::StringArray,
        ValueKind::Uint8Array,
        ValueKind::Uint16Array,
        ValueKind::Uint32Array,
        ValueKind::Uint64Array,
        ValueKind::Int8Array,
        ValueKind::Int16Array,
        ValueKind::Int32Array,
        ValueKind::Int64Array,
        ValueKind::Float32Array,
        ValueKind::Float64Array,
        ValueKind::Object,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "Bool",
            ValueKind::String => "String",
            ValueKind::Uint8 => "Uint8",
            ValueKind::Uint16 => "Uint16",
            ValueKind::Uint32 => "Uint32",
            ValueKind::Uint64 => "Uint64",
            ValueKind::Int8 => "Int8",
            ValueKind::Int16 => "Int16",
            ValueKind::Int32 => "Int32",
            ValueKind::Int64 => "Int64",
            ValueKind::Float32 => "Float32",
            ValueKind::Float64 => "Float64",
            ValueKind::Binary => "Binary",
            ValueKind::BoolArray => "BoolArray",
            ValueKind::StringArray => "StringArray",
            ValueKind::Uint8Array => "Uint8Array",
            ValueKind::Uint16Array => "Uint16Array",
            ValueKind::Uint32Array => "Uint32Array",
            ValueKind::Uint64Array => "Uint64Array",
            ValueKind::Int8Array => "Int8Array",
            ValueKind::Int16Array => "Int16Array",
            ValueKind::Int32Array => "Int32Array",
            ValueKind::Int64Array => "Int64Array",
            ValueKind::Float32Array => "Float32Array",
            ValueKind::Float64Array => "Float64Array",
            ValueKind::Object => "Object",
        }
    }

    /// Resolve a kind name regardless of letter case (`"int32"` -> `Int32`)
    pub fn normalize(name: &str) -> Option<ValueKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    pub fn is_array(&self) -> bool {
        self.as_str().ends_with("Array")
    }

    /// Binary and Object payloads are carried as-is and never stringified
    pub fn is_opaque(&self) -> bool {
        matches!(self, ValueKind::Binary | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValueKind {
    type Err = &'static str;
    fn from_str(value: &str) -> Result<Self, &'static str> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or("invalid value")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ignores_case() {
        assert_eq!(ValueKind::normalize("int32"), Some(ValueKind::Int32));
        assert_eq!(ValueKind::normalize("FLOAT64ARRAY"), Some(ValueKind::Float64Array));
        assert_eq!(ValueKind::normalize("Int128"), None);
    }

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!("Uint16".parse::<ValueKind>(), Ok(ValueKind::Uint16));
        assert!("uint16".parse::<ValueKind>().is_err());
    }

    #[test]
    fn test_array_and_opaque_kinds() {
        assert!(ValueKind::BoolArray.is_array());
        assert!(!ValueKind::Bool.is_array());
        assert!(ValueKind::Binary.is_opaque());
        assert!(ValueKind::Object.is_opaque());
        assert!(!ValueKind::String.is_opaque());
    }

    #[test]
    fn test_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&ValueKind::Uint8Array).unwrap(),
            "\"Uint8Array\""
        );
    }
}

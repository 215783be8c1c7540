use super::{Schema, ValidationError};

/// A record the engine can validate: it names its compiled schema and hands
/// out field values by name
pub trait Record {
    fn schema(&self) -> Result<&Schema, ValidationError>;

    /// Value of the field called `name`; unknown names read as `Absent`
    fn field(&self, name: &str) -> FieldValue<'_>;
}

/// Borrowed view of one field of a record
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// An optional field that is unset
    Absent,
    Bool(bool),
    Int(i64),
    Text(&'a str),
    Bytes(&'a [u8]),
    Json(&'a serde_json::Value),
    List(Vec<FieldValue<'a>>),
    Record(&'a dyn Record),
    Records(Vec<&'a dyn Record>),
}

impl<'a> FieldValue<'a> {
    /// Zero values count as empty, mirroring what "required" rejects
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Int(i) => *i == 0,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bytes(b) => b.is_empty(),
            FieldValue::Json(v) => v.is_null(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Record(_) => false,
            FieldValue::Records(records) => records.is_empty(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Length for strings (in characters) and collections, the value itself
    /// for numbers
    pub(crate) fn magnitude(&self) -> Option<f64> {
        match self {
            FieldValue::Absent => Some(0.0),
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Text(s) => Some(s.chars().count() as f64),
            FieldValue::Bytes(b) => Some(b.len() as f64),
            FieldValue::List(items) => Some(items.len() as f64),
            FieldValue::Records(records) => Some(records.len() as f64),
            FieldValue::Bool(_) | FieldValue::Json(_) | FieldValue::Record(_) => None,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Text(value)
    }
}

impl<'a, T> From<Option<T>> for FieldValue<'a>
where
    T: Into<FieldValue<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Absent, Into::into)
    }
}

impl<'a> From<&'a [String]> for FieldValue<'a> {
    fn from(values: &'a [String]) -> Self {
        FieldValue::List(values.iter().map(FieldValue::from).collect())
    }
}

impl<'a> From<&'a [u8]> for FieldValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl<'a, R: Record> From<&'a [R]> for FieldValue<'a> {
    fn from(records: &'a [R]) -> Self {
        FieldValue::Records(records.iter().map(|r| r as &dyn Record).collect())
    }
}

/// Read-only access to the other fields of the record being validated
#[derive(Clone, Copy)]
pub struct Siblings<'a> {
    record: &'a dyn Record,
}

impl<'a> Siblings<'a> {
    pub fn new(record: &'a dyn Record) -> Self {
        Self { record }
    }

    pub fn value(&self, name: &str) -> FieldValue<'a> {
        self.record.field(name)
    }
}

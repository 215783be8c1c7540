//! Typed reading values and their canonical string form
//!
//! `ValueKind` is the closed set of kinds a reading may declare; `NativeValue`
//! carries the measurement in its native representation. The codec is the only
//! place that knows how the two map onto each other.

mod codec;
mod kind;
mod native;

pub use codec::{decode, encode, encode_named, CodecError};
pub use kind::ValueKind;
pub use native::NativeValue;

/// A kind tag paired with its payload, built right before encoding
#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    pub kind: ValueKind,
    pub value: NativeValue,
}

impl TypedValue {
    pub fn new(kind: ValueKind, value: impl Into<NativeValue>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        encode(self.kind, &self.value)
    }
}

/// A measurement in its native Rust representation, before encoding
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    Bool(bool),
    String(String),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    BoolArray(Vec<bool>),
    StringArray(Vec<String>),
    Uint8Array(Vec<u8>),
    Uint16Array(Vec<u16>),
    Uint32Array(Vec<u32>),
    Uint64Array(Vec<u64>),
    Int8Array(Vec<i8>),
    Int16Array(Vec<i16>),
    Int32Array(Vec<i32>),
    Int64Array(Vec<i64>),
    Float32Array(Vec<f32>),
    Float64Array(Vec<f64>),
}

impl NativeValue {
    /// Name of the native representation, used in mismatch errors
    pub fn repr(&self) -> &'static str {
        match self {
            NativeValue::Bool(_) => "bool",
            NativeValue::String(_) => "String",
            NativeValue::Uint8(_) => "u8",
            NativeValue::Uint16(_) => "u16",
            NativeValue::Uint32(_) => "u32",
            NativeValue::Uint64(_) => "u64",
            NativeValue::Int8(_) => "i8",
            NativeValue::Int16(_) => "i16",
            NativeValue::Int32(_) => "i32",
            NativeValue::Int64(_) => "i64",
            NativeValue::Float32(_) => "f32",
            NativeValue::Float64(_) => "f64",
            NativeValue::BoolArray(_) => "Vec<bool>",
            NativeValue::StringArray(_) => "Vec<String>",
            NativeValue::Uint8Array(_) => "Vec<u8>",
            NativeValue::Uint16Array(_) => "Vec<u16>",
            NativeValue::Uint32Array(_) => "Vec<u32>",
            NativeValue::Uint64Array(_) => "Vec<u64>",
            NativeValue::Int8Array(_) => "Vec<i8>",
            NativeValue::Int16Array(_) => "Vec<i16>",
            NativeValue::Int32Array(_) => "Vec<i32>",
            NativeValue::Int64Array(_) => "Vec<i64>",
            NativeValue::Float32Array(_) => "Vec<f32>",
            NativeValue::Float64Array(_) => "Vec<f64>",
        }
    }
}

macro_rules! impl_from_native {
    ($($native:ty => $variant:ident, $array:ident;)*) => {
        $(
            impl From<$native> for NativeValue {
                fn from(value: $native) -> Self {
                    NativeValue::$variant(value)
                }
            }

            impl From<Vec<$native>> for NativeValue {
                fn from(value: Vec<$native>) -> Self {
                    NativeValue::$array(value)
                }
            }
        )*
    };
}

impl_from_native! {
    bool => Bool, BoolArray;
    String => String, StringArray;
    u8 => Uint8, Uint8Array;
    u16 => Uint16, Uint16Array;
    u32 => Uint32, Uint32Array;
    u64 => Uint64, Uint64Array;
    i8 => Int8, Int8Array;
    i16 => Int16, Int16Array;
    i32 => Int32, Int32Array;
    i64 => Int64, Int64Array;
    f32 => Float32, Float32Array;
    f64 => Float64, Float64Array;
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::String(value.to_string())
    }
}

impl From<Vec<&str>> for NativeValue {
    fn from(value: Vec<&str>) -> Self {
        NativeValue::StringArray(value.into_iter().map(str::to_string).collect())
    }
}

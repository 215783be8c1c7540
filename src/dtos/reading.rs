use chrono::Utc;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::common::base64_bytes;
use super::{check, compiled, LazySchema};
use crate::errors::ContractError;
use crate::models;
use crate::validation::{rules, FieldSchema, FieldValue, Record, Rule, Schema, ValidationError, RULES};
use crate::values::{self, CodecError, NativeValue, ValueKind};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimpleReading {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BinaryReading {
    #[serde(skip_serializing_if = "Vec::is_empty", with = "base64_bytes")]
    pub binary_value: Vec<u8>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub media_type: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectReading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_value: Option<Value>,
}

/// One measurement of a device resource. Which payload section is meaningful
/// depends on `value_type`: `Binary` and `Object` have their own, every other
/// kind uses the canonical string in `value`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseReading {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub origin: i64,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub profile_name: String,
    #[serde(default)]
    pub value_type: String,
    #[serde(flatten)]
    pub binary: BinaryReading,
    #[serde(flatten)]
    pub simple: SimpleReading,
    #[serde(flatten)]
    pub object: ObjectReading,
}

fn reading_schema(
    name: &'static str,
    payload: impl IntoIterator<Item = FieldSchema>,
) -> Result<Schema, ValidationError> {
    let mut builder = Schema::builder(name)
        .field(FieldSchema::new("Origin").rule(Rule::Required))
        .field(
            FieldSchema::new("DeviceName")
                .label("Device name")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("ResourceName")
                .label("Resource name")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("ProfileName")
                .label("Profile name")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("ValueType")
                .label("Value type")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::VALUE_TYPE)),
        );
    for field in payload {
        builder = builder.field(field);
    }
    builder.build(&RULES)
}

static SIMPLE_READING_SCHEMA: LazySchema = Lazy::new(|| {
    reading_schema(
        "SimpleReading",
        [FieldSchema::new("Value").rule(Rule::Required)],
    )
});

static BINARY_READING_SCHEMA: LazySchema = Lazy::new(|| {
    reading_schema(
        "BinaryReading",
        [
            FieldSchema::new("BinaryValue")
                .label("Binary value")
                .rule(Rule::Required)
                .rule(Rule::GreaterThan(0)),
            FieldSchema::new("MediaType")
                .label("Media type")
                .rule(Rule::Required),
        ],
    )
});

static OBJECT_READING_SCHEMA: LazySchema = Lazy::new(|| {
    reading_schema(
        "ObjectReading",
        [FieldSchema::new("ObjectValue")
            .label("Object value")
            .rule(Rule::Required)],
    )
});

impl Record for BaseReading {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(match self.kind() {
            Some(ValueKind::Binary) => &BINARY_READING_SCHEMA,
            Some(ValueKind::Object) => &OBJECT_READING_SCHEMA,
            _ => &SIMPLE_READING_SCHEMA,
        })
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => (&self.id).into(),
            "Origin" => self.origin.into(),
            "DeviceName" => (&self.device_name).into(),
            "ResourceName" => (&self.resource_name).into(),
            "ProfileName" => (&self.profile_name).into(),
            "ValueType" => (&self.value_type).into(),
            "Value" => (&self.simple.value).into(),
            "BinaryValue" => self.binary.binary_value.as_slice().into(),
            "MediaType" => (&self.binary.media_type).into(),
            "ObjectValue" => self
                .object
                .object_value
                .as_ref()
                .map_or(FieldValue::Absent, FieldValue::Json),
            _ => FieldValue::Absent,
        }
    }
}

impl BaseReading {
    fn new(profile_name: &str, device_name: &str, resource_name: &str, kind: ValueKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            origin: Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            device_name: device_name.to_string(),
            resource_name: resource_name.to_string(),
            profile_name: profile_name.to_string(),
            value_type: kind.to_string(),
            ..Default::default()
        }
    }

    /// Reading whose payload is `value` encoded as `kind`
    pub fn new_simple_reading(
        profile_name: &str,
        device_name: &str,
        resource_name: &str,
        kind: ValueKind,
        value: impl Into<NativeValue>,
    ) -> Result<Self, CodecError> {
        let value = values::encode(kind, &value.into())?;
        let mut reading = Self::new(profile_name, device_name, resource_name, kind);
        reading.simple = SimpleReading { value };
        Ok(reading)
    }

    pub fn new_binary_reading(
        profile_name: &str,
        device_name: &str,
        resource_name: &str,
        binary_value: Vec<u8>,
        media_type: &str,
    ) -> Self {
        let mut reading = Self::new(profile_name, device_name, resource_name, ValueKind::Binary);
        reading.binary = BinaryReading {
            binary_value,
            media_type: media_type.to_string(),
        };
        reading
    }

    pub fn new_object_reading(
        profile_name: &str,
        device_name: &str,
        resource_name: &str,
        object_value: Value,
    ) -> Self {
        let mut reading = Self::new(profile_name, device_name, resource_name, ValueKind::Object);
        reading.object = ObjectReading {
            object_value: Some(object_value),
        };
        reading
    }

    /// Declared value kind, if it names one
    pub fn kind(&self) -> Option<ValueKind> {
        ValueKind::normalize(&self.value_type)
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }
}

impl From<BaseReading> for models::Reading {
    fn from(dto: BaseReading) -> Self {
        let kind = dto.kind();
        let base = models::BaseReading {
            id: dto.id,
            origin: dto.origin,
            device_name: dto.device_name,
            resource_name: dto.resource_name,
            profile_name: dto.profile_name,
            value_type: dto.value_type,
        };
        match kind {
            Some(ValueKind::Binary) => models::Reading::Binary {
                base,
                binary_value: dto.binary.binary_value,
                media_type: dto.binary.media_type,
            },
            Some(ValueKind::Object) => models::Reading::Object {
                base,
                object_value: dto.object.object_value.unwrap_or_default(),
            },
            _ => models::Reading::Simple {
                base,
                value: dto.simple.value,
            },
        }
    }
}

impl From<models::Reading> for BaseReading {
    fn from(model: models::Reading) -> Self {
        let (base, binary, simple, object) = match model {
            models::Reading::Simple { base, value } => (
                base,
                BinaryReading::default(),
                SimpleReading { value },
                ObjectReading::default(),
            ),
            models::Reading::Binary {
                base,
                binary_value,
                media_type,
            } => (
                base,
                BinaryReading {
                    binary_value,
                    media_type,
                },
                SimpleReading::default(),
                ObjectReading::default(),
            ),
            models::Reading::Object { base, object_value } => (
                base,
                BinaryReading::default(),
                SimpleReading::default(),
                ObjectReading {
                    object_value: Some(object_value),
                },
            ),
        };
        Self {
            id: base.id,
            origin: base.origin,
            device_name: base.device_name,
            resource_name: base.resource_name,
            profile_name: base.profile_name,
            value_type: base.value_type,
            binary,
            simple,
            object,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::ErrorKind;

    const PROFILE: &str = "meter-profile";
    const DEVICE: &str = "meter-01";
    const RESOURCE: &str = "ActivePower";

    #[test]
    fn test_new_simple_reading() {
        let reading =
            BaseReading::new_simple_reading(PROFILE, DEVICE, RESOURCE, ValueKind::Float32, 1.5f32)
                .unwrap();
        assert_eq!(reading.value_type, "Float32");
        assert_eq!(reading.simple.value, "1.5");
        assert!(Uuid::parse_str(&reading.id).is_ok());
        assert!(reading.origin > 0);
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_new_simple_reading_rejects_wrong_shape() {
        let err = BaseReading::new_simple_reading(PROFILE, DEVICE, RESOURCE, ValueKind::Int32, 7i64)
            .unwrap_err();
        assert!(matches!(err, CodecError::KindMismatch { found: "i64", .. }));
    }

    #[test]
    fn test_binary_reading_validation() {
        let reading = BaseReading::new_binary_reading(PROFILE, DEVICE, RESOURCE, vec![], "");
        let err = reading.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid);
        assert_eq!(err.to_string(), "Binary value is required; Media type is required");

        let reading =
            BaseReading::new_binary_reading(PROFILE, DEVICE, RESOURCE, vec![0xca, 0xfe], "image/png");
        assert!(reading.validate().is_ok());
    }

    #[test]
    fn test_object_reading_validation() {
        let mut reading =
            BaseReading::new_object_reading(PROFILE, DEVICE, RESOURCE, json!({"a": 1}));
        assert!(reading.validate().is_ok());
        reading.object.object_value = None;
        assert_eq!(
            reading.validate().unwrap_err().to_string(),
            "Object value is required"
        );
    }

    #[test]
    fn test_base_fields_are_checked() {
        let mut reading =
            BaseReading::new_simple_reading(PROFILE, "meter 01", RESOURCE, ValueKind::Bool, true)
                .unwrap();
        reading.origin = 0;
        assert_eq!(
            reading.validate().unwrap_err().to_string(),
            "Origin is required; Device name must consist only of letters, digits, '-', '_', '~'"
        );
    }

    #[test]
    fn test_wire_format() {
        let reading = BaseReading::new_binary_reading(PROFILE, DEVICE, RESOURCE, b"hi".to_vec(), "text/plain");
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["binaryValue"], "aGk=");
        assert_eq!(json["valueType"], "Binary");
        assert!(json.get("value").is_none());
        assert!(json.get("objectValue").is_none());

        let parsed: BaseReading = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, reading);
    }

    #[test]
    fn test_model_conversion() {
        let reading =
            BaseReading::new_simple_reading(PROFILE, DEVICE, RESOURCE, ValueKind::Int16Array, vec![1i16, -2])
                .unwrap();
        let model = models::Reading::from(reading.clone());
        assert!(matches!(&model, models::Reading::Simple { value, .. } if value == "[1, -2]"));
        assert_eq!(model.base().device_name, DEVICE);
        assert_eq!(BaseReading::from(model), reading);
    }
}

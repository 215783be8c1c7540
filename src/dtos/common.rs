use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{check, compiled, LazySchema};
use crate::errors::ContractError;
use crate::models;
use crate::validation::{
    rules, FieldSchema, FieldValue, Record, Rule, Schema, ValidationError, RULES,
};

pub const REST: &str = "REST";
pub const MQTT: &str = "MQTT";
pub const EMAIL: &str = "EMAIL";

const ADDRESS_TYPES: &[&str] = &[REST, MQTT, EMAIL];
const HTTP_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "TRACE", "CONNECT",
];

pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

pub(crate) fn is_false(value: &bool) -> bool {
    !value
}

/// Creation and last modification time in milliseconds, set by the storing
/// service
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct DbTimestamp {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub created: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub modified: i64,
}

impl From<DbTimestamp> for models::DbTimestamp {
    fn from(dto: DbTimestamp) -> Self {
        Self {
            created: dto.created,
            modified: dto.modified,
        }
    }
}

impl From<models::DbTimestamp> for DbTimestamp {
    fn from(model: models::DbTimestamp) -> Self {
        Self {
            created: model.created,
            modified: model.modified,
        }
    }
}

/// Envelope every service response carries
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaseResponse {
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub status_code: u16,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestAddress {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub http_method: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MqttPubAddress {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub publisher: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub topic: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub qos: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub keep_alive: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub retained: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_reconnect: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub connect_timeout: i64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct EmailAddress {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
}

/// Notification channel. `type` selects which of the protocol sections apply.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "type")]
    pub address_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: i64,
    #[serde(flatten)]
    pub rest: RestAddress,
    #[serde(flatten)]
    pub mqtt: MqttPubAddress,
    #[serde(flatten)]
    pub email: EmailAddress,
}

fn address_type_field() -> FieldSchema {
    FieldSchema::new("Type")
        .label("Address type")
        .rule(Rule::Required)
        .rule(Rule::OneOf(ADDRESS_TYPES))
}

fn endpoint_fields() -> [FieldSchema; 2] {
    [
        FieldSchema::new("Host").rule(Rule::Required),
        FieldSchema::new("Port").rule(Rule::Required),
    ]
}

static ADDRESS_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("Address")
        .field(address_type_field())
        .build(&RULES)
});

static REST_ADDRESS_SCHEMA: LazySchema = Lazy::new(|| {
    let [host, port] = endpoint_fields();
    Schema::builder("RESTAddress")
        .field(address_type_field())
        .field(host)
        .field(port)
        .field(
            FieldSchema::new("HTTPMethod")
                .label("HTTP method")
                .rule(Rule::Required)
                .rule(Rule::OneOf(HTTP_METHODS)),
        )
        .build(&RULES)
});

static MQTT_ADDRESS_SCHEMA: LazySchema = Lazy::new(|| {
    let [host, port] = endpoint_fields();
    Schema::builder("MQTTPubAddress")
        .field(address_type_field())
        .field(host)
        .field(port)
        .field(FieldSchema::new("Publisher").rule(Rule::Required))
        .field(FieldSchema::new("Topic").rule(Rule::Required))
        .build(&RULES)
});

static EMAIL_ADDRESS_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("EmailAddress")
        .field(address_type_field())
        .field(
            FieldSchema::new("Recipients")
                .rule(Rule::Required)
                .each(Rule::Custom(rules::NON_EMPTY_STRING)),
        )
        .build(&RULES)
});

impl Record for Address {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(match self.address_type.as_str() {
            REST => &REST_ADDRESS_SCHEMA,
            MQTT => &MQTT_ADDRESS_SCHEMA,
            EMAIL => &EMAIL_ADDRESS_SCHEMA,
            _ => &ADDRESS_SCHEMA,
        })
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Type" => (&self.address_type).into(),
            "Host" => (&self.host).into(),
            "Port" => self.port.into(),
            "HTTPMethod" => (&self.rest.http_method).into(),
            "Publisher" => (&self.mqtt.publisher).into(),
            "Topic" => (&self.mqtt.topic).into(),
            "Recipients" => self.email.recipients.as_slice().into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Address {
    pub fn rest(host: &str, port: i64, http_method: &str) -> Self {
        Self {
            address_type: REST.to_string(),
            host: host.to_string(),
            port,
            rest: RestAddress {
                path: String::new(),
                http_method: http_method.to_string(),
            },
            ..Default::default()
        }
    }

    pub fn mqtt(host: &str, port: i64, publisher: &str, topic: &str) -> Self {
        Self {
            address_type: MQTT.to_string(),
            host: host.to_string(),
            port,
            mqtt: MqttPubAddress {
                publisher: publisher.to_string(),
                topic: topic.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn email(recipients: Vec<String>) -> Self {
        Self {
            address_type: EMAIL.to_string(),
            email: EmailAddress { recipients },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }
}

impl TryFrom<Address> for models::Address {
    type Error = ContractError;

    fn try_from(dto: Address) -> Result<Self, Self::Error> {
        match dto.address_type.as_str() {
            REST => Ok(models::Address::Rest {
                host: dto.host,
                port: dto.port,
                path: dto.rest.path,
                http_method: dto.rest.http_method,
            }),
            MQTT => Ok(models::Address::Mqtt {
                host: dto.host,
                port: dto.port,
                publisher: dto.mqtt.publisher,
                topic: dto.mqtt.topic,
                qos: dto.mqtt.qos,
                keep_alive: dto.mqtt.keep_alive,
                retained: dto.mqtt.retained,
                auto_reconnect: dto.mqtt.auto_reconnect,
                connect_timeout: dto.mqtt.connect_timeout,
            }),
            EMAIL => Ok(models::Address::Email {
                recipients: dto.email.recipients,
            }),
            other => Err(ContractError::contract_invalid(format!(
                "unknown address type '{other}'"
            ))),
        }
    }
}

impl From<models::Address> for Address {
    fn from(model: models::Address) -> Self {
        match model {
            models::Address::Rest {
                host,
                port,
                path,
                http_method,
            } => Self {
                address_type: REST.to_string(),
                host,
                port,
                rest: RestAddress { path, http_method },
                ..Default::default()
            },
            models::Address::Mqtt {
                host,
                port,
                publisher,
                topic,
                qos,
                keep_alive,
                retained,
                auto_reconnect,
                connect_timeout,
            } => Self {
                address_type: MQTT.to_string(),
                host,
                port,
                mqtt: MqttPubAddress {
                    publisher,
                    topic,
                    qos,
                    keep_alive,
                    retained,
                    auto_reconnect,
                    connect_timeout,
                },
                ..Default::default()
            },
            models::Address::Email { recipients } => Self::email(recipients),
        }
    }
}

/// Binary payloads travel as standard base64 strings
pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::validate;

    #[test]
    fn test_address_wire_format() {
        let address = Address::rest("localhost", 48080, "POST");
        assert_eq!(
            serde_json::to_value(&address).unwrap(),
            json!({"type": "REST", "host": "localhost", "port": 48080, "httpMethod": "POST"})
        );
        let parsed: Address = serde_json::from_value(json!({
            "type": "MQTT", "host": "broker", "port": 1883,
            "publisher": "notifier", "topic": "alerts", "qos": 1
        }))
        .unwrap();
        assert_eq!(parsed.mqtt.qos, 1);
        assert_eq!(parsed.mqtt.topic, "alerts");
    }

    #[test]
    fn test_address_schema_follows_type() {
        assert_eq!(validate(&Address::rest("localhost", 48080, "POST")), Ok(()));

        let err = validate(&Address::rest("localhost", 0, "FETCH")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Port is required; HTTP method must be one of GET, HEAD, POST, PUT, PATCH, DELETE, TRACE, CONNECT"
        );

        let err = validate(&Address::mqtt("broker", 1883, "", "alerts")).unwrap_err();
        assert_eq!(err.to_string(), "Publisher is required");

        let err = validate(&Address::email(vec!["ops@example.com".into(), " ".into()])).unwrap_err();
        assert_eq!(err.to_string(), "Recipients must not be empty");
    }

    #[test]
    fn test_unknown_address_type() {
        let address = Address {
            address_type: "ZIGBEE".into(),
            ..Default::default()
        };
        let err = validate(&address).unwrap_err();
        assert_eq!(err.to_string(), "Address type must be one of REST, MQTT, EMAIL");
        assert!(models::Address::try_from(address).is_err());
    }

    #[test]
    fn test_model_conversion() {
        let dto = Address::mqtt("broker", 1883, "notifier", "alerts");
        let model = models::Address::try_from(dto.clone()).unwrap();
        assert!(matches!(&model, models::Address::Mqtt { topic, .. } if topic == "alerts"));
        assert_eq!(Address::from(model), dto);
    }
}

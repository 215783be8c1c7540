use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::common::is_zero;
use super::{check, compiled, Address, LazySchema};
use crate::errors::ContractError;
use crate::models;
use crate::validation::{rules, FieldSchema, FieldValue, Record, Rule, Schema, ValidationError, RULES};

const STATUSES: &[&str] = &["ACKNOWLEDGED", "FAILED", "SENT", "ESCALATED", "RESENDING"];

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransmissionRecord {
    pub status: String,
    pub response: String,
    pub sent: i64,
}

/// Delivery of one notification over one channel, with its attempt history
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transmission {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub created: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub channel: Address,
    #[serde(default)]
    pub notification_id: String,
    #[serde(default)]
    pub subscription_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<TransmissionRecord>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub resend_count: i64,
    #[serde(default)]
    pub status: String,
}

static TRANSMISSION_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("Transmission")
        .field(FieldSchema::new("Id").omit_zero().rule(Rule::Uuid))
        .field(FieldSchema::new("Channel").rule(Rule::Required))
        .field(
            FieldSchema::new("NotificationId")
                .label("Notification id")
                .rule(Rule::Required),
        )
        .field(
            FieldSchema::new("SubscriptionName")
                .label("Subscription name")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::NON_EMPTY_STRING))
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("Status")
                .rule(Rule::Required)
                .rule(Rule::OneOf(STATUSES)),
        )
        .build(&RULES)
});

impl Record for Transmission {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&TRANSMISSION_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => (&self.id).into(),
            "Channel" => FieldValue::Record(&self.channel),
            "NotificationId" => (&self.notification_id).into(),
            "SubscriptionName" => (&self.subscription_name).into(),
            "Status" => (&self.status).into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Transmission {
    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }
}

impl From<TransmissionRecord> for models::TransmissionRecord {
    fn from(dto: TransmissionRecord) -> Self {
        Self {
            status: dto.status,
            response: dto.response,
            sent: dto.sent,
        }
    }
}

impl From<models::TransmissionRecord> for TransmissionRecord {
    fn from(model: models::TransmissionRecord) -> Self {
        Self {
            status: model.status,
            response: model.response,
            sent: model.sent,
        }
    }
}

impl TryFrom<Transmission> for models::Transmission {
    type Error = ContractError;

    fn try_from(dto: Transmission) -> Result<Self, Self::Error> {
        Ok(Self {
            channel: dto.channel.try_into()?,
            status: dto.status.parse()?,
            created: dto.created,
            id: dto.id,
            notification_id: dto.notification_id,
            subscription_name: dto.subscription_name,
            records: dto.records.into_iter().map(Into::into).collect(),
            resend_count: dto.resend_count,
        })
    }
}

impl From<models::Transmission> for Transmission {
    fn from(model: models::Transmission) -> Self {
        Self {
            created: model.created,
            id: model.id,
            channel: model.channel.into(),
            notification_id: model.notification_id,
            subscription_name: model.subscription_name,
            records: model.records.into_iter().map(Into::into).collect(),
            resend_count: model.resend_count,
            status: model.status.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn transmission() -> Transmission {
        Transmission {
            channel: Address::rest("notify.local", 443, "POST"),
            notification_id: "b9a6b2a6-5c6d-4b0c-a53b-6a3e1a2b9d41".into(),
            subscription_name: "ops-alerts".into(),
            status: "SENT".into(),
            records: vec![TransmissionRecord {
                status: "SENT".into(),
                response: "ok".into(),
                sent: 1_600_000_000_000,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_transmission() {
        assert!(transmission().validate().is_ok());
    }

    #[test]
    fn test_status_and_channel() {
        let trans = Transmission {
            channel: Address::rest("notify.local", 443, ""),
            status: "QUEUED".into(),
            ..transmission()
        };
        assert_eq!(
            trans.validate().unwrap_err().to_string(),
            "HTTP method is required; Status must be one of ACKNOWLEDGED, FAILED, SENT, ESCALATED, RESENDING"
        );
    }

    #[test]
    fn test_parse_and_convert() {
        let trans: Transmission = serde_json::from_value(json!({
            "channel": {"type": "EMAIL", "recipients": ["ops@example.com"]},
            "notificationId": "n-1",
            "subscriptionName": "ops-alerts",
            "status": "ESCALATED"
        }))
        .unwrap();
        assert!(trans.validate().is_ok());

        let model = models::Transmission::try_from(trans.clone()).unwrap();
        assert_eq!(model.status, models::TransmissionStatus::Escalated);
        assert_eq!(Transmission::from(model), trans);
    }
}

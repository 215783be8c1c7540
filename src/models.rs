//! Storage-side models. DTOs convert to and from these by copying fields;
//! no validation happens here.

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;

use crate::errors::ContractError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DbTimestamp {
    pub created: i64,
    pub modified: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseReading {
    pub id: String,
    pub origin: i64,
    pub device_name: String,
    pub resource_name: String,
    pub profile_name: String,
    pub value_type: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reading {
    Simple {
        base: BaseReading,
        value: String,
    },
    Binary {
        base: BaseReading,
        binary_value: Vec<u8>,
        media_type: String,
    },
    Object {
        base: BaseReading,
        object_value: Value,
    },
}

impl Reading {
    pub fn base(&self) -> &BaseReading {
        match self {
            Reading::Simple { base, .. }
            | Reading::Binary { base, .. }
            | Reading::Object { base, .. } => base,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interval {
    pub timestamps: DbTimestamp,
    pub id: String,
    pub name: String,
    pub start: String,
    pub end: String,
    pub interval: String,
}

/// Where a notification is delivered, with the settings of its protocol
#[derive(Clone, Debug, PartialEq)]
pub enum Address {
    Rest {
        host: String,
        port: i64,
        path: String,
        http_method: String,
    },
    Mqtt {
        host: String,
        port: i64,
        publisher: String,
        topic: String,
        qos: i64,
        keep_alive: i64,
        retained: bool,
        auto_reconnect: bool,
        connect_timeout: i64,
    },
    Email {
        recipients: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminState {
    Locked,
    Unlocked,
}

impl AdminState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminState::Locked => "LOCKED",
            AdminState::Unlocked => "UNLOCKED",
        }
    }
}

impl FromStr for AdminState {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCKED" => Ok(AdminState::Locked),
            "UNLOCKED" => Ok(AdminState::Unlocked),
            _ => Err(ContractError::contract_invalid(format!(
                "unknown admin state '{s}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Subscription {
    pub timestamps: DbTimestamp,
    pub id: String,
    pub name: String,
    pub channels: Vec<Address>,
    pub receiver: String,
    pub categories: Vec<String>,
    pub labels: Vec<String>,
    pub description: String,
    pub resend_limit: i64,
    pub resend_interval: String,
    pub admin_state: AdminState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransmissionStatus {
    Acknowledged,
    Failed,
    Sent,
    Escalated,
    Resending,
}

impl TransmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransmissionStatus::Acknowledged => "ACKNOWLEDGED",
            TransmissionStatus::Failed => "FAILED",
            TransmissionStatus::Sent => "SENT",
            TransmissionStatus::Escalated => "ESCALATED",
            TransmissionStatus::Resending => "RESENDING",
        }
    }
}

impl FromStr for TransmissionStatus {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACKNOWLEDGED" => Ok(TransmissionStatus::Acknowledged),
            "FAILED" => Ok(TransmissionStatus::Failed),
            "SENT" => Ok(TransmissionStatus::Sent),
            "ESCALATED" => Ok(TransmissionStatus::Escalated),
            "RESENDING" => Ok(TransmissionStatus::Resending),
            _ => Err(ContractError::contract_invalid(format!(
                "unknown transmission status '{s}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransmissionRecord {
    pub status: String,
    pub response: String,
    pub sent: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transmission {
    pub created: i64,
    pub id: String,
    pub channel: Address,
    pub notification_id: String,
    pub subscription_name: String,
    pub records: Vec<TransmissionRecord>,
    pub resend_count: i64,
    pub status: TransmissionStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceProperties {
    pub value_type: String,
    pub read_write: String,
    pub units: String,
    pub minimum: String,
    pub maximum: String,
    pub default_value: String,
    pub mask: String,
    pub shift: String,
    pub scale: String,
    pub offset: String,
    pub base: String,
    pub assertion: String,
    pub media_type: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceResource {
    pub description: String,
    pub name: String,
    pub is_hidden: bool,
    pub tag: String,
    pub properties: ResourceProperties,
    pub attributes: HashMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceOperation {
    pub device_resource: String,
    pub default_value: String,
    pub mappings: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceCommand {
    pub name: String,
    pub is_hidden: bool,
    pub read_write: String,
    pub resource_operations: Vec<ResourceOperation>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceProfile {
    pub timestamps: DbTimestamp,
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub description: String,
    pub model: String,
    pub labels: Vec<String>,
    pub device_service: String,
    pub device_resources: Vec<DeviceResource>,
    pub device_commands: Vec<DeviceCommand>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_state_names() {
        for state in [AdminState::Locked, AdminState::Unlocked] {
            assert_eq!(state.as_str().parse::<AdminState>().unwrap(), state);
        }
        assert!("locked".parse::<AdminState>().is_err());
    }

    #[test]
    fn test_unknown_transmission_status() {
        let err = "LOST".parse::<TransmissionStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown transmission status 'LOST'");
    }
}

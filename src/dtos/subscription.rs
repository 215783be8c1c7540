use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::common::is_zero;
use super::{check, compiled, Address, DbTimestamp, LazySchema};
use crate::errors::ContractError;
use crate::models;
use crate::validation::{rules, FieldSchema, FieldValue, Record, Rule, Schema, ValidationError, RULES};

const ADMIN_STATES: &[&str] = &["LOCKED", "UNLOCKED"];

/// Who gets notified, over which channels, for which categories or labels
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(flatten)]
    pub timestamps: DbTimestamp,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channels: Vec<Address>,
    #[serde(default)]
    pub receiver: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub resend_limit: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resend_interval: String,
    #[serde(default)]
    pub admin_state: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscription {
    pub id: Option<String>,
    pub name: Option<String>,
    pub channels: Option<Vec<Address>>,
    pub receiver: Option<String>,
    pub categories: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub description: Option<String>,
    pub resend_limit: Option<i64>,
    pub resend_interval: Option<String>,
    pub admin_state: Option<String>,
}

fn name_rules() -> [Rule; 2] {
    [
        Rule::Custom(rules::NON_EMPTY_STRING),
        Rule::Custom(rules::UNRESERVED_CHARS),
    ]
}

fn tag_list(name: &'static str, other: &'static str) -> FieldSchema {
    FieldSchema::new(name)
        .rule(Rule::RequiredWithout(other))
        .omit_zero()
        .rule(Rule::GreaterThan(0))
        .each(Rule::Custom(rules::NON_EMPTY_STRING))
        .each(Rule::Custom(rules::UNRESERVED_CHARS))
}

static SUBSCRIPTION_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("Subscription")
        .field(FieldSchema::new("Id").omit_zero().rule(Rule::Uuid))
        .field(FieldSchema::new("Name").rule(Rule::Required).rules(name_rules()))
        .field(
            FieldSchema::new("Channels")
                .rule(Rule::Required)
                .rule(Rule::GreaterThan(0)),
        )
        .field(FieldSchema::new("Receiver").rule(Rule::Required).rules(name_rules()))
        .field(tag_list("Categories", "Labels"))
        .field(tag_list("Labels", "Categories"))
        .field(
            FieldSchema::new("ResendInterval")
                .label("Resend interval")
                .omit_zero()
                .rule(Rule::Custom(rules::DURATION)),
        )
        .field(
            FieldSchema::new("AdminState")
                .label("Admin state")
                .rule(Rule::OneOf(ADMIN_STATES)),
        )
        .build(&RULES)
});

static UPDATE_SUBSCRIPTION_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("UpdateSubscription")
        .field(
            FieldSchema::new("Id")
                .rule(Rule::RequiredWithout("Name"))
                .rule(Rule::Custom(rules::UUID_OR_NAME)),
        )
        .field(
            FieldSchema::new("Name")
                .rule(Rule::RequiredWithout("Id"))
                .rules(name_rules()),
        )
        .field(
            FieldSchema::new("Channels")
                .omit_empty()
                .rule(Rule::GreaterThan(0)),
        )
        .field(FieldSchema::new("Receiver").omit_empty().rules(name_rules()))
        .field(
            FieldSchema::new("Categories")
                .omit_empty()
                .each(Rule::Custom(rules::NON_EMPTY_STRING))
                .each(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("Labels")
                .omit_empty()
                .each(Rule::Custom(rules::NON_EMPTY_STRING))
                .each(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("ResendInterval")
                .label("Resend interval")
                .omit_empty()
                .rule(Rule::Custom(rules::DURATION)),
        )
        .field(
            FieldSchema::new("AdminState")
                .label("Admin state")
                .omit_empty()
                .rule(Rule::OneOf(ADMIN_STATES)),
        )
        .build(&RULES)
});

impl Record for Subscription {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&SUBSCRIPTION_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => (&self.id).into(),
            "Name" => (&self.name).into(),
            "Channels" => self.channels.as_slice().into(),
            "Receiver" => (&self.receiver).into(),
            "Categories" => self.categories.as_slice().into(),
            "Labels" => self.labels.as_slice().into(),
            "ResendInterval" => (&self.resend_interval).into(),
            "AdminState" => (&self.admin_state).into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for UpdateSubscription {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&UPDATE_SUBSCRIPTION_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => self.id.as_ref().into(),
            "Name" => self.name.as_ref().into(),
            "Channels" => self.channels.as_deref().into(),
            "Receiver" => self.receiver.as_ref().into(),
            "Categories" => self.categories.as_deref().into(),
            "Labels" => self.labels.as_deref().into(),
            "ResendInterval" => self.resend_interval.as_ref().into(),
            "AdminState" => self.admin_state.as_ref().into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Subscription {
    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }
}

impl UpdateSubscription {
    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }

    /// Overwrite the fields of `model` that this update sets
    pub fn apply(&self, model: &mut models::Subscription) -> Result<(), ContractError> {
        if let Some(channels) = &self.channels {
            model.channels = channels
                .iter()
                .cloned()
                .map(models::Address::try_from)
                .collect::<Result<_, _>>()?;
        }
        if let Some(admin_state) = &self.admin_state {
            model.admin_state = admin_state.parse()?;
        }
        if let Some(name) = &self.name {
            model.name.clone_from(name);
        }
        if let Some(receiver) = &self.receiver {
            model.receiver.clone_from(receiver);
        }
        if let Some(categories) = &self.categories {
            model.categories.clone_from(categories);
        }
        if let Some(labels) = &self.labels {
            model.labels.clone_from(labels);
        }
        if let Some(description) = &self.description {
            model.description.clone_from(description);
        }
        if let Some(resend_limit) = self.resend_limit {
            model.resend_limit = resend_limit;
        }
        if let Some(resend_interval) = &self.resend_interval {
            model.resend_interval.clone_from(resend_interval);
        }
        Ok(())
    }
}

impl TryFrom<Subscription> for models::Subscription {
    type Error = ContractError;

    fn try_from(dto: Subscription) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamps: dto.timestamps.into(),
            admin_state: dto.admin_state.parse()?,
            channels: dto
                .channels
                .into_iter()
                .map(models::Address::try_from)
                .collect::<Result<_, _>>()?,
            id: dto.id,
            name: dto.name,
            receiver: dto.receiver,
            categories: dto.categories,
            labels: dto.labels,
            description: dto.description,
            resend_limit: dto.resend_limit,
            resend_interval: dto.resend_interval,
        })
    }
}

impl From<models::Subscription> for Subscription {
    fn from(model: models::Subscription) -> Self {
        Self {
            timestamps: model.timestamps.into(),
            id: model.id,
            name: model.name,
            channels: model.channels.into_iter().map(Address::from).collect(),
            receiver: model.receiver,
            categories: model.categories,
            labels: model.labels,
            description: model.description,
            resend_limit: model.resend_limit,
            resend_interval: model.resend_interval,
            admin_state: model.admin_state.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, ValidationError};

    fn subscription() -> Subscription {
        Subscription {
            name: "ops-alerts".into(),
            channels: vec![Address::email(vec!["ops@example.com".into()])],
            receiver: "ops-team".into(),
            categories: vec!["health-check".into()],
            resend_interval: "5m".into(),
            admin_state: "UNLOCKED".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_subscription() {
        assert!(subscription().validate().is_ok());
    }

    #[test]
    fn test_categories_or_labels_required() {
        let sub = Subscription {
            categories: vec![],
            ..subscription()
        };
        assert_eq!(
            sub.validate().unwrap_err().to_string(),
            "Categories is required unless Labels is set; Labels is required unless Categories is set"
        );

        let sub = Subscription {
            categories: vec![],
            labels: vec!["power".into()],
            ..subscription()
        };
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn test_channels_are_validated() {
        let sub = Subscription {
            channels: vec![
                Address::email(vec!["ops@example.com".into()]),
                Address::rest("", 80, "POST"),
            ],
            ..subscription()
        };
        let Err(ValidationError::ContractInvalid(violations)) = validate(&sub) else {
            panic!("expected violations");
        };
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["Channels[1].Host"]);
    }

    #[test]
    fn test_bad_elements_and_state() {
        let sub = Subscription {
            categories: vec!["ok".into(), "not ok".into()],
            admin_state: "PAUSED".into(),
            ..subscription()
        };
        assert_eq!(
            sub.validate().unwrap_err().to_string(),
            "Categories must consist only of letters, digits, '-', '_', '~'; \
             Admin state must be one of LOCKED, UNLOCKED"
        );
    }

    #[test]
    fn test_update_subscription() {
        let update = UpdateSubscription {
            name: Some("ops-alerts".into()),
            admin_state: Some("LOCKED".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let mut model = models::Subscription::try_from(subscription()).unwrap();
        update.apply(&mut model).unwrap();
        assert_eq!(model.admin_state, models::AdminState::Locked);

        let update = UpdateSubscription {
            name: Some("ops-alerts".into()),
            resend_interval: Some("often".into()),
            ..Default::default()
        };
        assert_eq!(
            update.validate().unwrap_err().to_string(),
            "Resend interval must match the ISO-8601 duration grammar"
        );
    }

    #[test]
    fn test_update_unset_fields_are_skipped_but_empty_ones_checked() {
        let unset = UpdateSubscription {
            name: Some("ops-alerts".into()),
            ..Default::default()
        };
        assert!(unset.validate().is_ok());

        let cases = [
            (
                UpdateSubscription {
                    receiver: Some("".into()),
                    ..unset.clone()
                },
                "Receiver must not be empty",
            ),
            (
                UpdateSubscription {
                    admin_state: Some("".into()),
                    ..unset.clone()
                },
                "Admin state must be one of LOCKED, UNLOCKED",
            ),
            (
                UpdateSubscription {
                    resend_interval: Some("".into()),
                    ..unset.clone()
                },
                "Resend interval must match the ISO-8601 duration grammar",
            ),
            (
                UpdateSubscription {
                    channels: Some(vec![]),
                    ..unset.clone()
                },
                "Channels must be greater than 0",
            ),
        ];
        for (update, expected) in cases {
            assert_eq!(update.validate().unwrap_err().to_string(), expected);
        }
    }

    #[test]
    fn test_model_round_trip() {
        let model = models::Subscription::try_from(subscription()).unwrap();
        assert_eq!(model.admin_state, models::AdminState::Unlocked);
        assert_eq!(Subscription::from(model), subscription());
    }
}

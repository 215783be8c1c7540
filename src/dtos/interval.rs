use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{check, compiled, DbTimestamp, LazySchema};
use crate::errors::ContractError;
use crate::models;
use crate::validation::{rules, FieldSchema, FieldValue, Record, Rule, Schema, ValidationError, RULES};

/// A schedule: from `start` to `end`, every `interval`
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    #[serde(flatten)]
    pub timestamps: DbTimestamp,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end: String,
    #[serde(default)]
    pub interval: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInterval {
    pub id: Option<String>,
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub interval: Option<String>,
}

fn window_fields() -> [FieldSchema; 2] {
    [
        FieldSchema::new("Start").rule(Rule::Custom(rules::INTERVAL_DATETIME)),
        FieldSchema::new("End").rule(Rule::Custom(rules::INTERVAL_DATETIME)),
    ]
}

static INTERVAL_SCHEMA: LazySchema = Lazy::new(|| {
    let [start, end] = window_fields().map(FieldSchema::omit_zero);
    Schema::builder("Interval")
        .field(FieldSchema::new("Id").omit_zero().rule(Rule::Uuid))
        .field(
            FieldSchema::new("Name")
                .rule(Rule::Custom(rules::NON_EMPTY_STRING))
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(start)
        .field(end)
        .field(
            FieldSchema::new("Interval")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::DURATION)),
        )
        .build(&RULES)
});

static UPDATE_INTERVAL_SCHEMA: LazySchema = Lazy::new(|| {
    let [start, end] = window_fields().map(FieldSchema::omit_empty);
    Schema::builder("UpdateInterval")
        .field(
            FieldSchema::new("Id")
                .rule(Rule::RequiredWithout("Name"))
                .rule(Rule::Custom(rules::UUID_OR_NAME)),
        )
        .field(
            FieldSchema::new("Name")
                .rule(Rule::RequiredWithout("Id"))
                .rule(Rule::Custom(rules::NON_EMPTY_STRING))
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(start)
        .field(end)
        .field(
            FieldSchema::new("Interval")
                .omit_empty()
                .rule(Rule::Custom(rules::DURATION)),
        )
        .build(&RULES)
});

impl Record for Interval {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&INTERVAL_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => (&self.id).into(),
            "Name" => (&self.name).into(),
            "Start" => (&self.start).into(),
            "End" => (&self.end).into(),
            "Interval" => (&self.interval).into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for UpdateInterval {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&UPDATE_INTERVAL_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => self.id.as_ref().into(),
            "Name" => self.name.as_ref().into(),
            "Start" => self.start.as_ref().into(),
            "End" => self.end.as_ref().into(),
            "Interval" => self.interval.as_ref().into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Interval {
    pub fn new(name: &str, interval: &str) -> Self {
        Self {
            name: name.to_string(),
            interval: interval.to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }
}

impl UpdateInterval {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }

    /// Overwrite the fields of `model` that this update sets
    pub fn apply(&self, model: &mut models::Interval) {
        if let Some(name) = &self.name {
            model.name.clone_from(name);
        }
        if let Some(start) = &self.start {
            model.start.clone_from(start);
        }
        if let Some(end) = &self.end {
            model.end.clone_from(end);
        }
        if let Some(interval) = &self.interval {
            model.interval.clone_from(interval);
        }
    }
}

impl From<Interval> for models::Interval {
    fn from(dto: Interval) -> Self {
        Self {
            timestamps: dto.timestamps.into(),
            id: dto.id,
            name: dto.name,
            start: dto.start,
            end: dto.end,
            interval: dto.interval,
        }
    }
}

impl From<models::Interval> for Interval {
    fn from(model: models::Interval) -> Self {
        Self {
            timestamps: model.timestamps.into(),
            id: model.id,
            name: model.name,
            start: model.start,
            end: model.end,
            interval: model.interval,
        }
    }
}

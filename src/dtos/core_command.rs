use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::common::is_false;
use super::{check, compiled, LazySchema};
use crate::errors::ContractError;
use crate::validation::{rules, FieldSchema, FieldValue, Record, Rule, Schema, ValidationError, RULES};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreCommandParameter {
    pub resource_name: String,
    pub resource_description: String,
    pub value_type: String,
}

/// A command as exposed by the command service, reachable at `url` + `path`
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreCommand {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "is_false")]
    pub get: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub set: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<CoreCommandParameter>,
}

/// The commands available on one device
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceCoreCommand {
    pub device_name: String,
    pub profile_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub core_commands: Vec<CoreCommand>,
}

static CORE_COMMAND_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("CoreCommand")
        .field(
            FieldSchema::new("Name")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::NON_EMPTY_STRING))
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("Get")
                .label("Readable")
                .rule(Rule::RequiredWithout("Set")),
        )
        .field(
            FieldSchema::new("Set")
                .label("Writable")
                .rule(Rule::RequiredWithout("Get")),
        )
        .build(&RULES)
});

static DEVICE_CORE_COMMAND_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("DeviceCoreCommand")
        .field(
            FieldSchema::new("DeviceName")
                .label("Device name")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(
            FieldSchema::new("ProfileName")
                .label("Profile name")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .field(FieldSchema::new("CoreCommands").label("Core commands"))
        .build(&RULES)
});

impl Record for CoreCommand {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&CORE_COMMAND_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Name" => (&self.name).into(),
            "Get" => self.get.into(),
            "Set" => self.set.into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for DeviceCoreCommand {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&DEVICE_CORE_COMMAND_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "DeviceName" => (&self.device_name).into(),
            "ProfileName" => (&self.profile_name).into(),
            "CoreCommands" => self.core_commands.as_slice().into(),
            _ => FieldValue::Absent,
        }
    }
}

impl CoreCommand {
    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }
}

impl DeviceCoreCommand {
    pub fn validate(&self) -> Result<(), ContractError> {
        check(self)
    }
}

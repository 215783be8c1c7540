use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::is_false;
use super::{compiled, DbTimestamp, LazySchema};
use crate::errors::{ContractError, ErrorKind};
use crate::models;
use crate::validation::{
    self, rules, FieldSchema, FieldValue, Record, Rule, Schema, ValidationError, RULES,
};
use crate::values::ValueKind;

const READ_WRITE: &[&str] = &["R", "W", "RW", "WR"];
const READ_WRITE_RW: &str = "RW";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceProperties {
    pub value_type: String,
    pub read_write: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub units: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub minimum: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub maximum: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_value: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mask: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub shift: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scale: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub offset: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub assertion: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub media_type: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceResource {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_hidden: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    pub properties: ResourceProperties,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceOperation {
    pub device_resource: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_value: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub mappings: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceCommand {
    pub name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_hidden: bool,
    pub read_write: String,
    pub resource_operations: Vec<ResourceOperation>,
}

/// Template for a class of devices: the resources they expose and the
/// commands that read or write groups of those resources
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceProfile {
    #[serde(flatten)]
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

fn name_field() -> FieldSchema {
    FieldSchema::new("Name")
        .rule(Rule::Required)
        .rule(Rule::Custom(rules::NON_EMPTY_STRING))
        .rule(Rule::Custom(rules::UNRESERVED_CHARS))
}

fn read_write_field() -> FieldSchema {
    FieldSchema::new("ReadWrite")
        .label("Read/write")
        .rule(Rule::Required)
        .rule(Rule::OneOf(READ_WRITE))
}

static PROPERTIES_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("ResourceProperties")
        .field(
            FieldSchema::new("ValueType")
                .label("Value type")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::VALUE_TYPE)),
        )
        .field(read_write_field())
        .build(&RULES)
});

static RESOURCE_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("DeviceResource")
        .field(name_field())
        .field(FieldSchema::new("Properties"))
        .build(&RULES)
});

static OPERATION_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("ResourceOperation")
        .field(
            FieldSchema::new("DeviceResource")
                .label("Device resource")
                .rule(Rule::Required)
                .rule(Rule::Custom(rules::UNRESERVED_CHARS)),
        )
        .build(&RULES)
});

static COMMAND_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("DeviceCommand")
        .field(name_field())
        .field(read_write_field())
        .field(
            FieldSchema::new("ResourceOperations")
                .label("Resource operations")
                .rule(Rule::Required)
                .rule(Rule::GreaterThan(0)),
        )
        .build(&RULES)
});

static PROFILE_SCHEMA: LazySchema = Lazy::new(|| {
    Schema::builder("DeviceProfile")
        .field(FieldSchema::new("Id").omit_zero().rule(Rule::Uuid))
        .field(name_field())
        .field(
            FieldSchema::new("DeviceResources")
                .label("Device resources")
                .rule(Rule::Required)
                .rule(Rule::GreaterThan(0)),
        )
        .field(FieldSchema::new("DeviceCommands").label("Device commands"))
        .build(&RULES)
});

impl Record for ResourceProperties {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&PROPERTIES_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "ValueType" => (&self.value_type).into(),
            "ReadWrite" => (&self.read_write).into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for DeviceResource {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&RESOURCE_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Name" => (&self.name).into(),
            "Properties" => FieldValue::Record(&self.properties),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for ResourceOperation {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&OPERATION_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "DeviceResource" => (&self.device_resource).into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for DeviceCommand {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&COMMAND_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Name" => (&self.name).into(),
            "ReadWrite" => (&self.read_write).into(),
            "ResourceOperations" => self.resource_operations.as_slice().into(),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for DeviceProfile {
    fn schema(&self) -> Result<&Schema, ValidationError> {
        compiled(&PROFILE_SCHEMA)
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "Id" => (&self.id).into(),
            "Name" => (&self.name).into(),
            "DeviceResources" => self.device_resources.as_slice().into(),
            "DeviceCommands" => self.device_commands.as_slice().into(),
            _ => FieldValue::Absent,
        }
    }
}

impl DeviceProfile {
    /// Parse a profile definition, validate it and normalize the value type of
    /// every resource to its canonical name
    pub fn from_yaml(text: &str) -> Result<Self, ContractError> {
        let mut profile: DeviceProfile = serde_yml::from_str(text).map_err(|err| {
            ContractError::with_source(
                ErrorKind::ContractInvalid,
                "failed to parse device profile YAML",
                err,
            )
        })?;
        profile.validate()?;

        for resource in &mut profile.device_resources {
            let kind = ValueKind::normalize(&resource.properties.value_type).ok_or_else(|| {
                ContractError::contract_invalid(format!(
                    "value type '{}' of resource {} is not supported",
                    resource.properties.value_type, resource.name
                ))
            })?;
            resource.properties.value_type = kind.to_string();
        }
        log::debug!(
            "Loaded device profile '{}' with {} resource(s)",
            profile.name,
            profile.device_resources.len()
        );
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        validation::validate(self)
            .map_err(|err| ContractError::from(err).context("invalid device profile"))?;
        self.check_resources()?;
        self.check_commands()
    }

    fn resource(&self, name: &str) -> Option<&DeviceResource> {
        self.device_resources.iter().find(|r| r.name == name)
    }

    fn check_resources(&self) -> Result<(), ContractError> {
        let mut seen = HashSet::new();
        for resource in &self.device_resources {
            let properties = &resource.properties;
            if ValueKind::normalize(&properties.value_type) == Some(ValueKind::Binary)
                && properties.read_write.contains('W')
            {
                return Err(ContractError::contract_invalid(format!(
                    "resource {} ({}) does not support write access",
                    resource.name,
                    ValueKind::Binary
                )));
            }
            if !seen.insert(resource.name.as_str()) {
                return Err(ContractError::contract_invalid(format!(
                    "duplicate device resource {}",
                    resource.name
                )));
            }
        }
        Ok(())
    }

    fn check_commands(&self) -> Result<(), ContractError> {
        let mut seen = HashSet::new();
        for command in &self.device_commands {
            if !seen.insert(command.name.as_str()) {
                return Err(ContractError::contract_invalid(format!(
                    "duplicate device command {}",
                    command.name
                )));
            }
            for operation in &command.resource_operations {
                let resource = self.resource(&operation.device_resource).ok_or_else(|| {
                    ContractError::contract_invalid(format!(
                        "resource operation {} does not match any device resource",
                        operation.device_resource
                    ))
                })?;
                let allowed = &resource.properties.read_write;
                if allowed != READ_WRITE_RW && *allowed != command.read_write {
                    return Err(ContractError::contract_invalid(format!(
                        "read/write permission '{}' of command {} exceeds that of resource {}",
                        command.read_write, command.name, resource.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl From<ResourceProperties> for models::ResourceProperties {
    fn from(dto: ResourceProperties) -> Self {
        Self {
            value_type: dto.value_type,
            read_write: dto.read_write,
            units: dto.units,
            minimum: dto.minimum,
            maximum: dto.maximum,
            default_value: dto.default_value,
            mask: dto.mask,
            shift: dto.shift,
            scale: dto.scale,
            offset: dto.offset,
            base: dto.base,
            assertion: dto.assertion,
            media_type: dto.media_type,
        }
    }
}

impl From<models::ResourceProperties> for ResourceProperties {
    fn from(model: models::ResourceProperties) -> Self {
        Self {
            value_type: model.value_type,
            read_write: model.read_write,
            units: model.units,
            minimum: model.minimum,
            maximum: model.maximum,
            default_value: model.default_value,
            mask: model.mask,
            shift: model.shift,
            scale: model.scale,
            offset: model.offset,
            base: model.base,
            assertion: model.assertion,
            media_type: model.media_type,
        }
    }
}

impl From<DeviceResource> for models::DeviceResource {
    fn from(dto: DeviceResource) -> Self {
        Self {
            description: dto.description,
            name: dto.name,
            is_hidden: dto.is_hidden,
            tag: dto.tag,
            properties: dto.properties.into(),
            attributes: dto.attributes,
        }
    }
}

impl From<models::DeviceResource> for DeviceResource {
    fn from(model: models::DeviceResource) -> Self {
        Self {
            description: model.description,
            name: model.name,
            is_hidden: model.is_hidden,
            tag: model.tag,
            properties: model.properties.into(),
            attributes: model.attributes,
        }
    }
}

impl From<ResourceOperation> for models::ResourceOperation {
    fn from(dto: ResourceOperation) -> Self {
        Self {
            device_resource: dto.device_resource,
            default_value: dto.default_value,
            mappings: dto.mappings,
        }
    }
}

impl From<models::ResourceOperation> for ResourceOperation {
    fn from(model: models::ResourceOperation) -> Self {
        Self {
            device_resource: model.device_resource,
            default_value: model.default_value,
            mappings: model.mappings,
        }
    }
}

impl From<DeviceCommand> for models::DeviceCommand {
    fn from(dto: DeviceCommand) -> Self {
        Self {
            name: dto.name,
            is_hidden: dto.is_hidden,
            read_write: dto.read_write,
            resource_operations: dto.resource_operations.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<models::DeviceCommand> for DeviceCommand {
    fn from(model: models::DeviceCommand) -> Self {
        Self {
            name: model.name,
            is_hidden: model.is_hidden,
            read_write: model.read_write,
            resource_operations: model.resource_operations.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DeviceProfile> for models::DeviceProfile {
    fn from(dto: DeviceProfile) -> Self {
        Self {
            timestamps: dto.timestamps.into(),
            id: dto.id,
            name: dto.name,
            manufacturer: dto.manufacturer,
            description: dto.description,
            model: dto.model,
            labels: dto.labels,
            device_service: dto.device_service,
            device_resources: dto.device_resources.into_iter().map(Into::into).collect(),
            device_commands: dto.device_commands.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<models::DeviceProfile> for DeviceProfile {
    fn from(model: models::DeviceProfile) -> Self {
        Self {
            timestamps: model.timestamps.into(),
            id: model.id,
            name: model.name,
            manufacturer: model.manufacturer,
            description: model.description,
            model: model.model,
            labels: model.labels,
            device_service: model.device_service,
            device_resources: model.device_resources.into_iter().map(Into::into).collect(),
            device_commands: model.device_commands.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_YAML: &str = r#"
name: "Power-Meter"
manufacturer: "Acme"
model: "PM-100"
labels: [power, meter]
deviceResources:
  - name: "ActivePower"
    properties:
      valueType: "float32"
      readWrite: "R"
      units: "kW"
  - name: "Relay"
    properties:
      valueType: "Bool"
      readWrite: "RW"
  - name: "Snapshot"
    properties:
      valueType: "Binary"
      readWrite: "R"
      mediaType: "image/jpeg"
deviceCommands:
  - name: "Switch"
    readWrite: "W"
    resourceOperations:
      - deviceResource: "Relay"
"#;

    fn profile() -> DeviceProfile {
        DeviceProfile::from_yaml(PROFILE_YAML).unwrap()
    }

    fn resource(name: &str, value_type: &str, read_write: &str) -> DeviceResource {
        DeviceResource {
            name: name.into(),
            properties: ResourceProperties {
                value_type: value_type.into(),
                read_write: read_write.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_from_yaml_normalizes_value_types() {
        let profile = profile();
        assert_eq!(profile.name, "Power-Meter");
        assert_eq!(profile.labels, vec!["power", "meter"]);
        assert_eq!(profile.device_resources[0].properties.value_type, "Float32");
        assert_eq!(profile.device_resources[0].properties.units, "kW");
        assert_eq!(profile.device_commands[0].resource_operations[0].device_resource, "Relay");
    }

    #[test]
    fn test_from_yaml_rejects_bad_yaml() {
        let err = DeviceProfile::from_yaml("name: [unterminated").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid);
    }

    #[test]
    fn test_structural_errors_are_aggregated() {
        let mut profile = profile();
        profile.name = "power meter".into();
        profile.device_resources[1].properties.read_write = "X".into();
        let err = profile.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid);
        assert_eq!(
            err.to_string(),
            "invalid device profile: \
             Name must consist only of letters, digits, '-', '_', '~'; \
             Read/write must be one of R, W, RW, WR"
        );
    }

    #[test]
    fn test_resources_required() {
        let profile = DeviceProfile {
            name: "empty".into(),
            ..Default::default()
        };
        assert_eq!(
            profile.validate().unwrap_err().to_string(),
            "invalid device profile: Device resources is required"
        );
    }

    #[test]
    fn test_binary_resource_not_writable() {
        let mut profile = profile();
        profile.device_resources.push(resource("Upload", "Binary", "RW"));
        assert_eq!(
            profile.validate().unwrap_err().to_string(),
            "resource Upload (Binary) does not support write access"
        );
    }

    #[test]
    fn test_duplicate_names() {
        let mut profile = profile();
        profile.device_resources.push(resource("Relay", "Bool", "R"));
        assert_eq!(
            profile.validate().unwrap_err().to_string(),
            "duplicate device resource Relay"
        );

        let mut profile = self::profile();
        let command = profile.device_commands[0].clone();
        profile.device_commands.push(command);
        assert_eq!(
            profile.validate().unwrap_err().to_string(),
            "duplicate device command Switch"
        );
    }

    #[test]
    fn test_operations_must_reference_resources() {
        let mut profile = profile();
        profile.device_commands[0].resource_operations[0].device_resource = "Fan".into();
        assert_eq!(
            profile.validate().unwrap_err().to_string(),
            "resource operation Fan does not match any device resource"
        );
    }

    #[test]
    fn test_command_permission_within_resource() {
        let mut profile = profile();
        profile.device_commands[0].resource_operations[0].device_resource = "ActivePower".into();
        assert_eq!(
            profile.validate().unwrap_err().to_string(),
            "read/write permission 'W' of command Switch exceeds that of resource ActivePower"
        );
    }

    #[test]
    fn test_model_round_trip() {
        let profile = profile();
        let model = models::DeviceProfile::from(profile.clone());
        assert_eq!(model.device_resources.len(), 3);
        assert_eq!(DeviceProfile::from(model), profile);
    }
}

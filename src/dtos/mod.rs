//! Data transfer objects exchanged between services, with their validation
//! schemas and conversions to and from the storage models

mod common;
mod core_command;
mod device_profile;
mod interval;
mod reading;
mod subscription;
mod transmission;

use once_cell::sync::Lazy;

use crate::errors::ContractError;
use crate::validation::{self, Record, Schema, ValidationError};

pub use common::{
    Address, BaseResponse, DbTimestamp, EmailAddress, MqttPubAddress, RestAddress, EMAIL, MQTT, REST,
};
pub use core_command::{CoreCommand, CoreCommandParameter, DeviceCoreCommand};
pub use device_profile::{
    DeviceCommand, DeviceProfile, DeviceResource, ResourceOperation, ResourceProperties,
};
pub use interval::{Interval, UpdateInterval};
pub use reading::{BaseReading, BinaryReading, ObjectReading, SimpleReading};
pub use subscription::{Subscription, UpdateSubscription};
pub use transmission::{Transmission, TransmissionRecord};

type LazySchema = Lazy<Result<Schema, ValidationError>>;

fn compiled(schema: &'static LazySchema) -> Result<&'static Schema, ValidationError> {
    Lazy::force(schema).as_ref().map_err(Clone::clone)
}

fn check(record: &dyn Record) -> Result<(), ContractError> {
    validation::validate(record).map_err(ContractError::from)
}

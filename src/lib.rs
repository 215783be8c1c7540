pub mod clients;
pub mod config;
pub mod constants;
pub mod dtos;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod validation;
pub mod values;

pub use errors::{ContractError, ErrorKind};

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use contracts::dtos;
use serde::de::DeserializeOwned;

use crate::argsets::ValidateArgs;

const DTO_NAMES: &str = "'reading', 'interval', 'update-interval', 'subscription', \
    'update-subscription', 'transmission', 'address', 'device-profile', 'device-core-command'";

pub fn validate(args: ValidateArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Could not read {}", args.file.display()))?;

    match args.dto.as_str() {
        "reading" => parse::<dtos::BaseReading>(&text)?.validate()?,
        "interval" => parse::<dtos::Interval>(&text)?.validate()?,
        "update-interval" => parse::<dtos::UpdateInterval>(&text)?.validate()?,
        "subscription" => parse::<dtos::Subscription>(&text)?.validate()?,
        "update-subscription" => parse::<dtos::UpdateSubscription>(&text)?.validate()?,
        "transmission" => parse::<dtos::Transmission>(&text)?.validate()?,
        "address" => parse::<dtos::Address>(&text)?.validate()?,
        "device-profile" => device_profile(&args.file, &text)?,
        "device-core-command" => parse::<dtos::DeviceCoreCommand>(&text)?.validate()?,
        other => return Err(anyhow!("Unknown DTO '{other}', must be one of {DTO_NAMES}")),
    }
    println!("valid");
    Ok(())
}

fn parse<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).context("Could not parse JSON")
}

/// Profiles are usually authored in YAML; anything not named `.json` is read
/// as YAML.
fn device_profile(path: &Path, text: &str) -> Result<()> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse::<dtos::DeviceProfile>(text)?.validate()?;
    } else {
        dtos::DeviceProfile::from_yaml(text)?;
    }
    Ok(())
}

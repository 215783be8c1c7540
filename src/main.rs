mod argsets;
mod command;

use anyhow::{anyhow, Result};
use contracts::constants::{defaults, envvars};
use contracts::helpers::load_dotenv;
use env_logger::Env;

const CMD_ENCODE: &str = "encode";
const CMD_VALIDATE: &str = "validate";
const CMD_VALUE_TYPES: &str = "value-types";

fn main() -> Result<()> {
    let loaded = load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();
    for path in loaded {
        log::debug!("Loaded environment from {}", path.display());
    }

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_ENCODE) => command::encode(argsets::EncodeArgs {
            value_type: args.free_from_str()?,
            literal: args.free_from_str()?,
        }),
        Some(CMD_VALIDATE) => command::validate(argsets::ValidateArgs {
            dto: args.free_from_str()?,
            file: args.free_from_str()?,
        }),
        Some(CMD_VALUE_TYPES) => command::value_types(),
        _ => Err(anyhow!(
            "Subcommand must be one of 'encode', 'validate', 'value-types'"
        )),
    }
}

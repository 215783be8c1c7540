use std::path::PathBuf;

pub struct EncodeArgs {
    pub value_type: String,
    pub literal: String,
}

pub struct ValidateArgs {
    pub dto: String,
    pub file: PathBuf,
}

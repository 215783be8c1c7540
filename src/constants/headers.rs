pub const CORRELATION_ID: &str = "X-Correlation-ID";
pub const CONTENT_TYPE: &str = "Content-Type";

pub const CONTENT_TYPE_JSON: &str = "application/json";

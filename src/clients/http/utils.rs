use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::dtos::BaseResponse;
use crate::errors::{ContractError, ErrorKind};

/// Highest status code treated as success (207 Multi-Status)
pub(super) const LAST_SUCCESS_STATUS: u16 = 207;

/// `base` with its path replaced by `path` and `query` as the query string
pub(super) fn request_url(base: &Url, path: &str, query: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    url.set_query(None);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

/// Error for a non-success response, taking the message from the response
/// envelope when the body carries one
pub(super) fn response_error(status: u16, body: &[u8]) -> ContractError {
    let message = match serde_json::from_slice::<BaseResponse>(body) {
        Ok(response) => response.message,
        Err(_) => format!(
            "request failed, status code: {status}, response: {}",
            String::from_utf8_lossy(body)
        ),
    };
    ContractError::new(ErrorKind::from_status(status), message)
}

pub(super) fn encode_json<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(body).map_err(|err| {
        ContractError::with_source(ErrorKind::ContractInvalid, "failed to encode request as JSON", err)
    })
}

pub(super) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ContractError> {
    serde_json::from_slice(body).map_err(|err| {
        ContractError::with_source(ErrorKind::ContractInvalid, "failed to decode JSON response", err)
    })
}

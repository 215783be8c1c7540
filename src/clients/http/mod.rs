//! Blocking REST helper for calling peer services
//!
//! Every request carries an `X-Correlation-ID` header, taken from the
//! [`RequestContext`] or freshly generated. Responses above 207 are turned into
//! a [`ContractError`] whose kind follows the status code.

mod utils;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::constants::headers;
use crate::errors::{ContractError, ErrorKind};

use utils::{decode_json, encode_json, request_url, response_error, LAST_SUCCESS_STATUS};

/// Per-request metadata propagated to the peer service
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    correlation_id: Option<String>,
    content_type: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The caller's correlation ID, or a new UUID v4 when none was given
    pub fn correlation_id(&self) -> String {
        match self.correlation_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        }
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Clone, Copy)]
enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

pub struct HttpClient {
    agent: ureq::Agent,
    base_url: Url,
}

impl HttpClient {
    pub fn new(base_url: &str, config: &ClientConfig) -> Result<Self, ContractError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            ContractError::with_source(
                ErrorKind::ServerError,
                format!("failed to parse URL '{base_url}'"),
                err,
            )
        })?;
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .tls_config(
                ureq::tls::TlsConfig::builder()
                    .provider(ureq::tls::TlsProvider::NativeTls)
                    .build(),
            )
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(agent_config),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` with `query`, returning the raw response body
    pub fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<u8>, ContractError> {
        self.send(Method::Get, ctx, path, query, None)
    }

    pub fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ContractError> {
        decode_json(&self.get(ctx, path, query)?)
    }

    pub fn post_json<B, T>(&self, ctx: &RequestContext, path: &str, body: &B) -> Result<T, ContractError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Post, ctx, path, body)
    }

    pub fn put_json<B, T>(&self, ctx: &RequestContext, path: &str, body: &B) -> Result<T, ContractError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Put, ctx, path, body)
    }

    pub fn patch_json<B, T>(&self, ctx: &RequestContext, path: &str, body: &B) -> Result<T, ContractError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::Patch, ctx, path, body)
    }

    /// POST an already encoded body. `encoding` names the content type; when
    /// empty the context's content type is used instead.
    pub fn post_encoded(
        &self,
        ctx: &RequestContext,
        path: &str,
        data: &[u8],
        encoding: &str,
    ) -> Result<Vec<u8>, ContractError> {
        let content_type = if encoding.is_empty() {
            ctx.content_type()
        } else {
            Some(encoding)
        };
        self.send(Method::Post, ctx, path, &[], Some((data, content_type)))
    }

    pub fn delete<T: DeserializeOwned>(&self, ctx: &RequestContext, path: &str) -> Result<T, ContractError> {
        decode_json(&self.send(Method::Delete, ctx, path, &[], None)?)
    }

    fn send_json<B, T>(&self, method: Method, ctx: &RequestContext, path: &str, body: &B) -> Result<T, ContractError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = encode_json(body)?;
        let content_type = ctx.content_type().unwrap_or(headers::CONTENT_TYPE_JSON);
        let response = self.send(method, ctx, path, &[], Some((&data, Some(content_type))))?;
        decode_json(&response)
    }

    fn send(
        &self,
        method: Method,
        ctx: &RequestContext,
        path: &str,
        query: &[(&str, &str)],
        body: Option<(&[u8], Option<&str>)>,
    ) -> Result<Vec<u8>, ContractError> {
        let url = request_url(&self.base_url, path, query);
        let correlation_id = ctx.correlation_id();
        log::debug!("{} {} ({})", method.as_str(), url, correlation_id);

        let (data, content_type) = match body {
            Some(body) => body,
            None => (&[][..], None),
        };
        let result = match method {
            Method::Get => self
                .agent
                .get(url.as_str())
                .header(headers::CORRELATION_ID, correlation_id.as_str())
                .call(),
            Method::Delete => self
                .agent
                .delete(url.as_str())
                .header(headers::CORRELATION_ID, correlation_id.as_str())
                .call(),
            Method::Post | Method::Put | Method::Patch => {
                let mut request = match method {
                    Method::Put => self.agent.put(url.as_str()),
                    Method::Patch => self.agent.patch(url.as_str()),
                    _ => self.agent.post(url.as_str()),
                }
                .header(headers::CORRELATION_ID, correlation_id.as_str());
                if let Some(content_type) = content_type {
                    request = request.header(headers::CONTENT_TYPE, content_type);
                }
                request.send(data)
            }
        };

        let mut response = result.map_err(|err| {
            ContractError::with_source(ErrorKind::ServerError, "failed to send request", err)
        })?;
        let status = response.status().as_u16();
        let bytes = response.body_mut().read_to_vec().map_err(|err| {
            ContractError::with_source(ErrorKind::IoError, "failed to read response body", err)
        })?;

        if status <= LAST_SUCCESS_STATUS {
            return Ok(bytes);
        }
        let err = response_error(status, &bytes);
        log::warn!(
            "{} {} failed with status {}: {}",
            method.as_str(),
            url,
            status,
            err
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_id_is_generated_when_missing() {
        let ctx = RequestContext::new();
        let generated = ctx.correlation_id();
        assert!(uuid::Uuid::parse_str(&generated).is_ok());
        assert_ne!(generated, ctx.correlation_id());

        let ctx = RequestContext::new().with_correlation_id("abc-123");
        assert_eq!(ctx.correlation_id(), "abc-123");
    }

    #[test]
    fn test_invalid_base_url_is_server_error() {
        let err = HttpClient::new("not a url", &ClientConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ServerError);
    }

    #[test]
    fn test_get_sends_correlation_id_and_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v2/reading/all")
            .match_query(mockito::Matcher::UrlEncoded("limit".into(), "5".into()))
            .match_header(headers::CORRELATION_ID, "corr-1")
            .with_status(200)
            .with_body("[]")
            .create();

        let client = HttpClient::new(&server.url(), &ClientConfig::default()).unwrap();
        let ctx = RequestContext::new().with_correlation_id("corr-1");
        let body = client.get(&ctx, "/api/v2/reading/all", &[("limit", "5")]).unwrap();

        assert_eq!(body, b"[]");
        mock.assert();
    }

    #[test]
    fn test_error_status_maps_to_kind() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", "/api/v2/interval/name/hourly")
            .with_status(404)
            .with_body(r#"{"apiVersion":"v2","message":"interval hourly not found","statusCode":404}"#)
            .create();

        let client = HttpClient::new(&server.url(), &ClientConfig::default()).unwrap();
        let err = client
            .delete::<serde_json::Value>(&RequestContext::new(), "/api/v2/interval/name/hourly")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::EntityDoesNotExist);
        assert_eq!(err.to_string(), "interval hourly not found");
        mock.assert();
    }
}

//! Transport primitives for API exchanges.
//!
//! The module exposes [`ApiHttpClient`] as the client's only dependency on an HTTP stack,
//! together with the owned [`ApiRequest`]/[`ApiResponse`] pair it exchanges. The default
//! [`ReqwestHttpClient`] applies the configured connect timeout, speaks HTTP/1.1, and never
//! follows redirects; custom transports (test doubles, proxies, instrumented stacks) only need
//! to implement [`ApiHttpClient::execute`].

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	header::{HeaderMap, RETRY_AFTER},
	redirect::Policy,
};
use serde::de::DeserializeOwned;
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API exchanges.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by the
/// credential manager and the submission path behind an `Arc`. Non-2xx statuses are not
/// errors at this layer; only failures that prevent a response from being read are.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response body.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_>;
}

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl ApiMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}
impl Display for ApiMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Owned outbound request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
	/// Request method.
	pub method: ApiMethod,
	/// Absolute target URL.
	pub url: Url,
	/// Header name/value pairs, in insertion order.
	pub headers: Vec<(&'static str, String)>,
	/// Optional request body.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: ApiMethod::Get, url, headers: Vec::new(), body: None }
	}

	/// Creates a `POST` request carrying a JSON body.
	pub fn post_json(url: Url, body: Vec<u8>) -> Self {
		Self {
			method: ApiMethod::Post,
			url,
			headers: vec![("Content-Type", "application/json".into())],
			body: Some(body),
		}
	}

	/// Appends a header.
	pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	/// Returns the first value recorded for `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case("authorization") {
					(*name, "<redacted>")
				} else {
					(*name, value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Buffered inbound response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
	/// Retry-After hint expressed as a relative duration, when the server sent one.
	pub retry_after: Option<Duration>,
}
impl ApiResponse {
	/// Creates a response without a retry hint.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into(), retry_after: None }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T, TransportError>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| TransportError::Decode { source, status: self.status })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured connect timeout, HTTP/1.1 only, no redirects.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let connect_timeout = std::time::Duration::try_from(config.connect_timeout)
			.map_err(|_| ConfigError::invalid("connect_timeout", "must be a positive duration"))?;
		let client = ReqwestClient::builder()
			.connect_timeout(connect_timeout)
			.http1_only()
			.redirect(Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				ApiMethod::Get => client.get(request.url),
				ApiMethod::Post => client.post(request.url),
			};

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body, retry_after })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;

	parse_retry_after_value(value.to_str().ok()?, OffsetDateTime::now_utc())
}

/// Parses a `Retry-After` value given as delta-seconds or an RFC 2822 date.
#[cfg_attr(not(feature = "reqwest"), allow(dead_code))]
pub(crate) fn parse_retry_after_value(raw: &str, now: OffsetDateTime) -> Option<Duration> {
	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - now;

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_dates() {
		let now = OffsetDateTime::parse("Wed, 01 Nov 2023 10:00:00 +0000", &Rfc2822)
			.expect("Fixture date should parse.");

		assert_eq!(parse_retry_after_value(" 120 ", now), Some(Duration::seconds(120)));
		assert_eq!(
			parse_retry_after_value("Wed, 01 Nov 2023 10:00:30 +0000", now),
			Some(Duration::seconds(30))
		);
		assert_eq!(parse_retry_after_value("Wed, 01 Nov 2023 09:59:00 +0000", now), None);
		assert_eq!(parse_retry_after_value("soon", now), None);
	}

	#[test]
	fn request_debug_redacts_authorization() {
		let request = ApiRequest::post_json(
			Url::parse("https://ismp.crpt.ru/api/v3/lk/documents/create")
				.expect("Fixture URL should parse."),
			b"{}".to_vec(),
		)
		.with_header("Authorization", "Bearer secret-token");
		let rendered = format!("{request:?}");

		assert!(!rendered.contains("secret-token"));
		assert!(rendered.contains("<redacted>"));
		assert_eq!(request.header("content-type"), Some("application/json"));
	}

	#[test]
	fn json_decode_reports_path() {
		#[derive(Debug, Deserialize)]
		struct Value {
			#[allow(dead_code)]
			value: String,
		}

		let response = ApiResponse::new(200, br#"{"value": 7}"#.to_vec());
		let err = response.json::<Value>().expect_err("Numeric value must fail to decode.");

		match err {
			TransportError::Decode { source, status } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "value");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}

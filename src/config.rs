//! Client configuration: API location, request ceiling, token lifetime, and transport timeouts.

// self
use crate::{_prelude::*, error::ConfigError};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://ismp.crpt.ru";
/// Token lifetime documented by the API (10 hours).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(10);
/// Connect timeout applied to every request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::seconds(10);

const CHALLENGE_PATH: &str = "api/v3/auth/cert/key";
const TOKEN_PATH: &str = "api/v3/auth/cert/";
const DOCUMENT_CREATE_PATH: &str = "api/v3/lk/documents/create";

/// Unit of time used to express the request ceiling ("N requests per unit").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
	/// One millisecond.
	Milliseconds,
	/// One second.
	Seconds,
	/// One minute.
	Minutes,
	/// One hour.
	Hours,
	/// One day.
	Days,
}
impl TimeUnit {
	/// Returns the length of a single unit.
	pub const fn as_duration(self) -> Duration {
		match self {
			Self::Milliseconds => Duration::MILLISECOND,
			Self::Seconds => Duration::SECOND,
			Self::Minutes => Duration::MINUTE,
			Self::Hours => Duration::HOUR,
			Self::Days => Duration::DAY,
		}
	}
}

/// Resolved API endpoints derived from the base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoints {
	/// `GET` challenge endpoint.
	pub challenge: Url,
	/// `POST` token endpoint.
	pub token: Url,
	/// `POST` document creation endpoint (without the `pg` query).
	pub document_create: Url,
}
impl ApiEndpoints {
	fn resolve(base: &Url) -> Result<Self, ConfigError> {
		let join = |path: &'static str| {
			base.join(path).map_err(|source| ConfigError::InvalidEndpoint { path, source })
		};

		Ok(Self {
			challenge: join(CHALLENGE_PATH)?,
			token: join(TOKEN_PATH)?,
			document_create: join(DOCUMENT_CREATE_PATH)?,
		})
	}
}

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API base URL.
	pub base_url: Url,
	/// Endpoints resolved against `base_url`.
	pub endpoints: ApiEndpoints,
	/// Maximum submissions per `period`.
	pub request_limit: u32,
	/// Rate window length.
	pub period: Duration,
	/// How long an issued token is reused.
	pub token_lifetime: Duration,
	/// TCP/TLS connect timeout.
	pub connect_timeout: Duration,
	/// Whether the sandbox signature failure yields a placeholder token.
	pub sandbox_fallback: bool,
}
impl ClientConfig {
	/// Returns a builder seeded with the defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Shorthand for a default config limited to `request_limit` calls per `unit`.
	pub fn per_unit(unit: TimeUnit, request_limit: u32) -> Result<Self, ConfigError> {
		Self::builder().time_unit(unit).request_limit(request_limit).build()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	/// API base URL; defaults to [`DEFAULT_BASE_URL`].
	pub base_url: Option<Url>,
	/// Maximum submissions per window.
	pub request_limit: u32,
	/// Rate window length.
	pub period: Duration,
	/// Token lifetime.
	pub token_lifetime: Duration,
	/// Connect timeout.
	pub connect_timeout: Duration,
	/// Sandbox fallback toggle.
	pub sandbox_fallback: bool,
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			base_url: None,
			request_limit: 1,
			period: Duration::SECOND,
			token_lifetime: DEFAULT_TOKEN_LIFETIME,
			connect_timeout: DEFAULT_CONNECT_TIMEOUT,
			sandbox_fallback: true,
		}
	}
}
impl ClientConfigBuilder {
	/// Points the client at another API host (e.g. the sandbox or a mock server).
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Sets the maximum number of submissions per window.
	pub fn request_limit(mut self, limit: u32) -> Self {
		self.request_limit = limit;

		self
	}

	/// Sets the window length.
	pub fn period(mut self, period: Duration) -> Self {
		self.period = period;

		self
	}

	/// Sets the window length to one `unit`.
	pub fn time_unit(self, unit: TimeUnit) -> Self {
		self.period(unit.as_duration())
	}

	/// Overrides the token lifetime.
	pub fn token_lifetime(mut self, lifetime: Duration) -> Self {
		self.token_lifetime = lifetime;

		self
	}

	/// Overrides the connect timeout.
	pub fn connect_timeout(mut self, timeout: Duration) -> Self {
		self.connect_timeout = timeout;

		self
	}

	/// Enables or disables the sandbox placeholder token.
	pub fn sandbox_fallback(mut self, enabled: bool) -> Self {
		self.sandbox_fallback = enabled;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let mut base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL)
				.map_err(|source| ConfigError::InvalidEndpoint { path: "", source })?,
		};

		validate_base_url(&base_url)?;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		if self.request_limit == 0 {
			return Err(ConfigError::invalid("request_limit", "must be greater than zero"));
		}

		validate_positive("period", self.period)?;
		validate_positive("token_lifetime", self.token_lifetime)?;
		validate_positive("connect_timeout", self.connect_timeout)?;

		let endpoints = ApiEndpoints::resolve(&base_url)?;

		Ok(ClientConfig {
			base_url,
			endpoints,
			request_limit: self.request_limit,
			period: self.period,
			token_lifetime: self.token_lifetime,
			connect_timeout: self.connect_timeout,
			sandbox_fallback: self.sandbox_fallback,
		})
	}
}

fn validate_base_url(url: &Url) -> Result<(), ConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		let reason = format!("unsupported scheme `{}`", url.scheme());

		return Err(ConfigError::invalid("base_url", reason));
	}
	if url.host_str().is_none() {
		return Err(ConfigError::invalid("base_url", "missing host"));
	}

	Ok(())
}

fn validate_positive(field: &'static str, value: Duration) -> Result<(), ConfigError> {
	if value.is_positive() {
		Ok(())
	} else {
		Err(ConfigError::invalid(field, "must be a positive duration"))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_target_production_host() {
		let config = ClientConfig::builder().build().expect("Default config should be valid.");

		assert_eq!(config.endpoints.challenge.as_str(), "https://ismp.crpt.ru/api/v3/auth/cert/key");
		assert_eq!(config.endpoints.token.as_str(), "https://ismp.crpt.ru/api/v3/auth/cert/");
		assert_eq!(
			config.endpoints.document_create.as_str(),
			"https://ismp.crpt.ru/api/v3/lk/documents/create"
		);
		assert_eq!(config.token_lifetime, Duration::hours(10));
		assert_eq!(config.connect_timeout, Duration::seconds(10));
		assert!(config.sandbox_fallback);
	}

	#[test]
	fn per_unit_sets_period_from_time_unit() {
		let config =
			ClientConfig::per_unit(TimeUnit::Minutes, 5).expect("Per-minute config should be valid.");

		assert_eq!(config.request_limit, 5);
		assert_eq!(config.period, Duration::MINUTE);
	}

	#[test]
	fn zero_request_limit_is_rejected() {
		let err = ClientConfig::builder()
			.request_limit(0)
			.build()
			.expect_err("Zero request limit must be rejected.");

		assert!(matches!(err, ConfigError::InvalidConfiguration { field: "request_limit", .. }));
	}

	#[test]
	fn non_positive_durations_are_rejected() {
		let err = ClientConfig::builder()
			.token_lifetime(Duration::ZERO)
			.build()
			.expect_err("Zero token lifetime must be rejected.");

		assert!(matches!(err, ConfigError::InvalidConfiguration { field: "token_lifetime", .. }));

		let err = ClientConfig::builder()
			.connect_timeout(Duration::seconds(-1))
			.build()
			.expect_err("Negative connect timeout must be rejected.");

		assert!(matches!(err, ConfigError::InvalidConfiguration { field: "connect_timeout", .. }));
	}

	#[test]
	fn non_http_base_url_is_rejected() {
		let err = ClientConfig::builder()
			.base_url(Url::parse("ftp://ismp.crpt.ru").expect("Fixture URL should parse."))
			.build()
			.expect_err("FTP base URL must be rejected.");

		assert!(matches!(err, ConfigError::InvalidConfiguration { field: "base_url", .. }));
	}

	#[test]
	fn base_url_with_path_prefix_is_preserved() {
		let config = ClientConfig::builder()
			.base_url(Url::parse("http://127.0.0.1:8080/proxy/").expect("Fixture URL should parse."))
			.build()
			.expect("Config with path prefix should be valid.");

		assert_eq!(config.endpoints.token.as_str(), "http://127.0.0.1:8080/proxy/api/v3/auth/cert/");
	}

	#[test]
	fn base_url_prefix_without_trailing_slash_is_preserved() {
		let config = ClientConfig::builder()
			.base_url(Url::parse("http://127.0.0.1:8080/proxy").expect("Fixture URL should parse."))
			.build()
			.expect("Config with path prefix should be valid.");

		assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/proxy/");
		assert_eq!(
			config.endpoints.challenge.as_str(),
			"http://127.0.0.1:8080/proxy/api/v3/auth/cert/key"
		);
		assert_eq!(
			config.endpoints.document_create.as_str(),
			"http://127.0.0.1:8080/proxy/api/v3/lk/documents/create"
		);
	}
}

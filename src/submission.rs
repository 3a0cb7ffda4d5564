//! Document submission orchestrated through the rate limiter and credential manager.
//!
//! [`SubmissionClient::submit`] seals the document (inner body base64-encoded and signed),
//! waits for a rate-limit slot, obtains the bearer token, and posts the envelope. The HTTP
//! outcome is returned as a [`SubmissionResult`]; only local faults (unsupported document
//! type, signer failure, authentication failure, cancellation) surface as [`Error`]. Nothing
//! here retries; callers layer their own policy on top of the returned data.

pub mod request;

pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::CredentialManager,
	clock::Clock,
	config::ClientConfig,
	document::{Document, ProductGroup},
	error::{Cancelled, TransportError},
	http::{ApiHttpClient, ApiRequest, ApiResponse},
	obs::{self, ClientMetrics, OpKind, OpOutcome, OpSpan},
	rate_limit::RateLimiter,
	signer::Signer,
};
#[cfg(feature = "reqwest")]
use crate::{clock::SystemClock, config::TimeUnit, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Submission client specialized for the crate's default reqwest transport.
pub type ReqwestSubmissionClient = SubmissionClient<ReqwestHttpClient>;

/// Outcome of one submission attempt.
#[derive(Debug)]
pub enum SubmissionResult {
	/// HTTP 200; `value` is the identifier the API assigned to the document.
	Accepted {
		/// Document identifier returned by the API.
		value: String,
	},
	/// Any other HTTP status.
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Response body.
		body: String,
		/// Retry-After hint, when the server sent one.
		retry_after: Option<Duration>,
	},
	/// The request could not be sent or the response could not be read.
	TransportError {
		/// Underlying failure.
		cause: TransportError,
	},
}
impl SubmissionResult {
	/// Returns `true` for [`SubmissionResult::Accepted`].
	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted { .. })
	}

	/// Returns the assigned document identifier, if accepted.
	pub fn value(&self) -> Option<&str> {
		match self {
			Self::Accepted { value } => Some(value),
			_ => None,
		}
	}
}

#[derive(Deserialize)]
struct AcceptedBody {
	value: String,
}

/// Submits commissioning documents under a request ceiling with a shared bearer token.
pub struct SubmissionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	config: Arc<ClientConfig>,
	http_client: Arc<C>,
	limiter: Arc<RateLimiter>,
	credentials: Arc<CredentialManager<C>>,
	metrics: Arc<ClientMetrics>,
}
impl<C> SubmissionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport and clock.
	pub fn with_http_client(
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		let http_client = http_client.into();
		let metrics = Arc::new(ClientMetrics::default());
		let limiter = RateLimiter::with_clock(config.request_limit, config.period, clock.clone())?;
		let credentials =
			CredentialManager::new(&config, http_client.clone(), clock, metrics.clone());

		Ok(Self {
			config: Arc::new(config),
			http_client,
			limiter: Arc::new(limiter),
			credentials: Arc::new(credentials),
			metrics,
		})
	}

	/// Validated configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Rate limiter gating every submission.
	pub fn limiter(&self) -> &RateLimiter {
		&self.limiter
	}

	/// Credential manager shared by every submission.
	pub fn credentials(&self) -> &CredentialManager<C> {
		&self.credentials
	}

	/// In-process counters.
	pub fn metrics(&self) -> &ClientMetrics {
		&self.metrics
	}

	/// Submits `document`, waiting for a rate-limit slot and a valid token first.
	///
	/// Whatever the API answers (accepted, rejected, or a transport failure of the submission
	/// call) comes back as `Ok` with a [`SubmissionResult`].
	///
	/// # Errors
	///
	/// - [`Error::UnsupportedDocumentType`] for non-commissioning types, before any I/O.
	/// - [`Error::Signer`] when the signer fails while sealing the envelope.
	/// - [`Error::Auth`] when no bearer token could be obtained; the document was not sent.
	/// - [`Error::Cancelled`] only from [`submit_or_cancel`](Self::submit_or_cancel).
	pub async fn submit(&self, document: Document, signer: &dyn Signer) -> Result<SubmissionResult> {
		self.submit_or_cancel(document, signer, std::future::pending()).await
	}

	/// Same as [`submit`](Self::submit), but gives up as soon as `cancel` resolves.
	///
	/// Cancellation is honored while waiting for a slot, while refreshing the token, and while
	/// the request is in flight.
	pub async fn submit_or_cancel<F>(
		&self,
		document: Document,
		signer: &dyn Signer,
		cancel: F,
	) -> Result<SubmissionResult>
	where
		F: Future<Output = ()>,
	{
		const KIND: OpKind = OpKind::Submit;

		if !document.document_type.is_commissioning() {
			obs::warn_event!(
				document_type = %document.document_type,
				"rejecting unsupported document type"
			);

			return Err(Error::UnsupportedDocumentType { document_type: document.document_type });
		}

		let span = OpSpan::new(KIND, "submit");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let product_group = document.product_group;
		let result = match SubmissionRequest::seal(document, signer) {
			Ok(request) =>
				span.instrument(async {
					tokio::select! {
						biased;
						_ = cancel => Err(Error::from(Cancelled)),
						result = self.dispatch(product_group, &request, signer) => result,
					}
				})
				.await,
			Err(SealError::Encode(cause)) => Ok(SubmissionResult::TransportError { cause }),
			Err(SealError::Signer(err)) => Err(err.into()),
		};

		self.record(&result);

		result
	}

	async fn dispatch(
		&self,
		product_group: ProductGroup,
		request: &SubmissionRequest,
		signer: &dyn Signer,
	) -> Result<SubmissionResult> {
		let body = match request.to_body() {
			Ok(body) => body,
			Err(cause) => return Ok(SubmissionResult::TransportError { cause }),
		};

		self.limiter.acquire().await;

		let token = self.credentials.token(signer).await?;
		let mut url = self.config.endpoints.document_create.clone();

		url.query_pairs_mut().append_pair("pg", product_group.as_str());

		let outbound = ApiRequest::post_json(url, body).with_header("Authorization", token.bearer());
		let outcome = match self.http_client.execute(outbound).await {
			Ok(response) => classify(response),
			Err(cause) => SubmissionResult::TransportError { cause },
		};

		Ok(outcome)
	}

	#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
	fn record(&self, result: &Result<SubmissionResult>) {
		const KIND: OpKind = OpKind::Submit;

		match result {
			Ok(SubmissionResult::Accepted { value }) => {
				obs::debug_event!(value = %value, "document accepted");
				obs::record_op_outcome(KIND, OpOutcome::Success);
				self.metrics.record_accepted();
			},
			Ok(SubmissionResult::Rejected { status, body, .. }) => {
				obs::warn_event!(status = *status, body = %body, "document rejected");
				obs::record_op_outcome(KIND, OpOutcome::Failure);
				self.metrics.record_rejected();
			},
			Ok(SubmissionResult::TransportError { cause }) => {
				obs::warn_event!(error = %cause, "document submission failed in transport");
				obs::record_op_outcome(KIND, OpOutcome::Failure);
				self.metrics.record_transport_failure();
			},
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}
	}
}
#[cfg(feature = "reqwest")]
impl SubmissionClient<ReqwestHttpClient> {
	/// Creates a client with its own reqwest transport and the system clock.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Self::with_http_client(config, http_client, Arc::new(SystemClock))
	}

	/// Creates a client for the production API limited to `request_limit` calls per `unit`.
	pub fn per_unit(unit: TimeUnit, request_limit: u32) -> Result<Self> {
		Self::new(ClientConfig::per_unit(unit, request_limit)?)
	}
}
impl<C> Clone for SubmissionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: self.http_client.clone(),
			limiter: self.limiter.clone(),
			credentials: self.credentials.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<C> Debug for SubmissionClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SubmissionClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("limiter", &self.limiter)
			.field("credentials", &self.credentials)
			.finish()
	}
}

fn classify(response: ApiResponse) -> SubmissionResult {
	if response.status == 200 {
		return match response.json::<AcceptedBody>() {
			Ok(accepted) => SubmissionResult::Accepted { value: accepted.value },
			Err(cause) => SubmissionResult::TransportError { cause },
		};
	}

	SubmissionResult::Rejected {
		status: response.status,
		body: response.text(),
		retry_after: response.retry_after,
	}
}

//! Bearer token cache with single-flight refreshes.
//!
//! [`CredentialManager::token`] serves the cached token while it is fresh. Once it goes stale
//! (or before the first call) exactly one caller runs the two-step refresh: fetch a challenge,
//! sign it, and exchange it for a token. Concurrent callers queue on a single-flight guard; when
//! they get through they notice that a refresh finished while they were waiting and adopt its
//! outcome, the new token or the same error, instead of starting another round trip.
//!
//! The credential itself sits behind a synchronous lock that is only held to clone it out or
//! swap a replacement in, so readers never observe a half-written record and dropping a
//! `token` future mid-refresh leaves the previous credential untouched.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthChallenge, AuthError, Credential, TokenOrigin, TokenSecret,
		wire::{IssuedToken, SignedChallenge},
	},
	clock::Clock,
	config::{ApiEndpoints, ClientConfig},
	error::{Cancelled, TransportError},
	http::{ApiHttpClient, ApiRequest, ApiResponse},
	obs::{self, ClientMetrics, OpKind, OpOutcome, OpSpan},
	signer::Signer,
};
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};

/// Body fragment the sandbox returns when it cannot verify a signature.
pub const SIGNATURE_VERIFICATION_FAILED_MARKER: &str = "Ошибка при проверке подписи";
/// Placeholder token issued when the sandbox fallback kicks in.
pub const SANDBOX_TOKEN: &str = "TEST_TOKEN";

const SANDBOX_STATUS: u16 = 400;

#[derive(Debug)]
struct CredentialState {
	credential: Credential,
	generation: u64,
	last_failure: Option<AuthError>,
}

/// Owns the cached credential for one client instance.
pub struct CredentialManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	clock: Arc<dyn Clock>,
	endpoints: ApiEndpoints,
	lifetime: Duration,
	sandbox_fallback: bool,
	metrics: Arc<ClientMetrics>,
	state: RwLock<CredentialState>,
	refresh_guard: AsyncMutex<()>,
}
impl<C> CredentialManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a manager with an empty cache.
	pub fn new(
		config: &ClientConfig,
		http_client: impl Into<Arc<C>>,
		clock: Arc<dyn Clock>,
		metrics: Arc<ClientMetrics>,
	) -> Self {
		let state = CredentialState {
			credential: Credential::empty(config.token_lifetime),
			generation: 0,
			last_failure: None,
		};

		Self {
			http_client: http_client.into(),
			clock,
			endpoints: config.endpoints.clone(),
			lifetime: config.token_lifetime,
			sandbox_fallback: config.sandbox_fallback,
			metrics,
			state: RwLock::new(state),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Returns a valid bearer token, refreshing it at most once across concurrent callers.
	pub async fn token(&self, signer: &dyn Signer) -> Result<TokenSecret, AuthError> {
		let observed = {
			let state = self.state.read();

			if let Some(token) = state.credential.valid_token_at(self.clock.now()) {
				return Ok(token);
			}

			state.generation
		};
		let _singleflight = self.refresh_guard.lock().await;

		{
			let state = self.state.read();

			if state.generation != observed {
				if let Some(err) = &state.last_failure {
					return Err(err.clone());
				}
				if let Some(token) = state.credential.valid_token_at(self.clock.now()) {
					return Ok(token);
				}
			}
		}

		let outcome = self.refresh(signer).await;
		let mut state = self.state.write();

		state.generation += 1;

		match outcome {
			Ok((token, credential)) => {
				state.credential = credential;
				state.last_failure = None;

				Ok(token)
			},
			Err(err) => {
				state.last_failure = Some(err.clone());

				Err(err)
			},
		}
	}

	/// Same as [`token`](Self::token), but gives up as soon as `cancel` resolves.
	pub async fn token_or_cancel<F>(
		&self,
		signer: &dyn Signer,
		cancel: F,
	) -> Result<TokenSecret>
	where
		F: Future<Output = ()>,
	{
		tokio::select! {
			biased;
			_ = cancel => Err(Cancelled.into()),
			outcome = self.token(signer) => Ok(outcome?),
		}
	}

	/// Fetches the challenge the token request must sign.
	pub async fn authorization_request(&self) -> Result<AuthChallenge, AuthError> {
		let response = self
			.http_client
			.execute(ApiRequest::get(self.endpoints.challenge.clone()))
			.await
			.map_err(|err| AuthError::Challenge {
				status: None,
				detail: "transport failure".into(),
				source: Some(Arc::new(err)),
			})?;

		if !response.is_success() {
			return Err(AuthError::Challenge {
				status: Some(response.status),
				detail: response.text(),
				source: None,
			});
		}

		response.json::<AuthChallenge>().map_err(|err| AuthError::Challenge {
			status: Some(response.status),
			detail: "malformed challenge body".into(),
			source: Some(Arc::new(err)),
		})
	}

	/// Drops the cached credential so the next [`token`](Self::token) call refreshes.
	pub fn invalidate(&self) {
		self.state.write().credential = Credential::empty(self.lifetime);
	}

	/// Returns a copy of the cached credential.
	pub fn snapshot(&self) -> Credential {
		self.state.read().credential.clone()
	}

	#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
	async fn refresh(&self, signer: &dyn Signer) -> Result<(TokenSecret, Credential), AuthError> {
		const KIND: OpKind = OpKind::Refresh;

		let span = OpSpan::new(KIND, "refresh");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);
		self.metrics.record_refresh_attempt();

		let result = span
			.instrument(async {
				let challenge = self.authorization_request().await?;
				let response = self.exchange(&challenge, signer).await?;

				self.credential_from(response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(err) => {
				obs::warn_event!(error = %err, "credential refresh failed");
				obs::record_op_outcome(KIND, OpOutcome::Failure);
				self.metrics.record_refresh_failure();
			},
		}

		result
	}

	async fn exchange(
		&self,
		challenge: &AuthChallenge,
		signer: &dyn Signer,
	) -> Result<ApiResponse, AuthError> {
		let mut payload = challenge.data.as_bytes().to_vec();

		payload.extend(signer.sign(challenge.data.as_bytes())?);

		let body = SignedChallenge { uuid: &challenge.uuid, data: STANDARD.encode(payload) };
		let body = serde_json::to_vec(&body).map_err(|err| AuthError::TokenTransport {
			source: Arc::new(TransportError::Serialize(err)),
		})?;

		self.http_client
			.execute(ApiRequest::post_json(self.endpoints.token.clone(), body))
			.await
			.map_err(|err| AuthError::TokenTransport { source: Arc::new(err) })
	}

	fn credential_from(
		&self,
		response: ApiResponse,
	) -> Result<(TokenSecret, Credential), AuthError> {
		let now = self.clock.now();

		if response.is_success() {
			let issued = response
				.json::<IssuedToken>()
				.map_err(|err| AuthError::MalformedToken { source: Arc::new(err) })?;

			obs::debug_event!("issued new bearer token");

			return Ok(self.stamp(issued.token, now, TokenOrigin::Issued));
		}

		let body = response.text();

		if self.sandbox_fallback
			&& response.status == SANDBOX_STATUS
			&& body.contains(SIGNATURE_VERIFICATION_FAILED_MARKER)
		{
			obs::warn_event!(
				status = response.status,
				"signature verification failed; using sandbox placeholder token"
			);
			self.metrics.record_sandbox_fallback();

			return Ok(self.stamp(TokenSecret::new(SANDBOX_TOKEN), now, TokenOrigin::Sandbox));
		}

		Err(AuthError::Token { status: response.status, body })
	}

	fn stamp(
		&self,
		token: TokenSecret,
		now: OffsetDateTime,
		origin: TokenOrigin,
	) -> (TokenSecret, Credential) {
		let credential = Credential::issued(token.clone(), now, self.lifetime, origin);

		(token, credential)
	}
}
impl<C> Debug for CredentialManager<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.read();

		f.debug_struct("CredentialManager")
			.field("endpoints", &self.endpoints)
			.field("credential", &state.credential)
			.field("generation", &state.generation)
			.field("sandbox_fallback", &self.sandbox_fallback)
			.finish()
	}
}

//! Demonstrates plugging a non-reqwest transport into [`SubmissionClient`].
//!
//! 1. Implement [`ApiHttpClient`] and answer each [`ApiRequest`] with an [`ApiResponse`] or a
//!    [`TransportError`].
//! 2. Pass the transport to [`SubmissionClient::with_http_client`] along with a clock.
//! 3. Inspect the [`SubmissionResult`] returned for each submission.

// std
use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};
// crates.io
use color_eyre::Result;
use time::Duration;
// self
use ismp_client::{
	clock::SystemClock,
	config::ClientConfig,
	document::{Document, DocumentFormat, DocumentType, ProductGroup},
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture},
	signer::StaticSigner,
	submission::{SubmissionClient, SubmissionResult},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let transport = Arc::new(CannedTransport::default());
	let config = ClientConfig::builder().request_limit(10).period(Duration::MINUTE).build()?;
	let client = <SubmissionClient<CannedTransport>>::with_http_client(
		config,
		Arc::clone(&transport),
		Arc::new(SystemClock),
	)?;
	let signer = StaticSigner::default();

	for group in [ProductGroup::Shoes, ProductGroup::Tires] {
		let document = Document::builder(group, DocumentType::LkContractCommissioningXml)
			.document_format(DocumentFormat::Xml)
			.build();

		report(group, client.submit(document, &signer).await?);
	}

	transport.offline.store(true, Ordering::SeqCst);

	let document =
		Document::builder(ProductGroup::Perfumery, DocumentType::LkContractCommissioning).build();

	report(ProductGroup::Perfumery, client.submit(document, &signer).await?);

	Ok(())
}

fn report(group: ProductGroup, result: SubmissionResult) {
	match result {
		SubmissionResult::Accepted { value } => println!("[{group}] accepted as {value}."),
		SubmissionResult::Rejected { status, body, retry_after } =>
			println!("[{group}] rejected with HTTP {status} (retry after {retry_after:?}): {body}."),
		SubmissionResult::TransportError { cause } => println!("[{group}] transport error: {cause}."),
	}
}

#[derive(Default)]
struct CannedTransport {
	offline: AtomicBool,
}
impl ApiHttpClient for CannedTransport {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		let offline = self.offline.load(Ordering::SeqCst);

		Box::pin(async move {
			if offline {
				return Err(TransportError::Io(std::io::Error::other("link is down")));
			}

			let path = request.url.path();
			let response = if path.ends_with("/auth/cert/key") {
				ApiResponse::new(200, "{\"uuid\":\"canned-uuid\",\"data\":\"CANNED\"}")
			} else if path.ends_with("/auth/cert/") {
				ApiResponse::new(200, "{\"token\":\"canned-token\"}")
			} else if request.url.query() == Some("pg=tires") {
				ApiResponse {
					status: 429,
					body: b"quota exhausted".to_vec(),
					retry_after: Some(Duration::seconds(30)),
				}
			} else {
				ApiResponse::new(200, "{\"value\":\"canned-document\"}")
			};

			Ok(response)
		})
	}
}

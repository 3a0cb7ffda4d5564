//! Submits one milk commissioning document through the default reqwest transport.
//!
//! A local mock server plays the API: it hands out a challenge, answers the signed challenge
//! with the sandbox "signature verification failed" error (so the placeholder token kicks in),
//! and accepts the document.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use ismp_client::{
	auth::SIGNATURE_VERIFICATION_FAILED_MARKER,
	config::{ClientConfig, TimeUnit},
	document::{Document, DocumentType, ProductDocument, ProductGroup},
	signer::StaticSigner,
	submission::{SubmissionClient, SubmissionResult},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/auth/cert/key");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"uuid\":\"f3a1c7d0-demo\",\"data\":\"RANDOMDATA\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v3/auth/cert/");
			then.status(400).header("content-type", "application/json").body(format!(
				"{{\"error_message\":\"{SIGNATURE_VERIFICATION_FAILED_MARKER}\"}}"
			));
		})
		.await;

	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v3/lk/documents/create")
				.query_param("pg", "milk")
				.header("authorization", "Bearer TEST_TOKEN");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":\"2f0d9c52-demo-document\"}");
		})
		.await;
	let config = ClientConfig::builder()
		.base_url(Url::parse(&server.base_url())?)
		.time_unit(TimeUnit::Seconds)
		.request_limit(5)
		.build()?;
	let client = SubmissionClient::new(config)?;
	let document = Document::builder(ProductGroup::Milk, DocumentType::LkContractCommissioning)
		.product_document(ProductDocument {
			date_from: Some("2023-11-19".into()),
			date_to: Some("2023-11-20".into()),
			participant_inn: Some("7700000000".into()),
			pg: vec![ProductGroup::Milk],
			..Default::default()
		})
		.build();

	match client.submit(document, &StaticSigner::default()).await? {
		SubmissionResult::Accepted { value } => println!("Document accepted with id {value}."),
		SubmissionResult::Rejected { status, body, .. } =>
			println!("Document rejected with HTTP {status}: {body}."),
		SubmissionResult::TransportError { cause } =>
			println!("Document could not be delivered: {cause}."),
	}

	create_mock.assert_async().await;

	Ok(())
}

#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use ismp_client::{
	_preludet::*,
	document::{Document, DocumentType, ProductDocument, ProductGroup},
	error::TransportError,
	signer::{Signer, SignerError},
	submission::SubmissionResult,
};

const CREATE_PATH: &str = "/api/v3/lk/documents/create";

struct RefusingSigner;
impl Signer for RefusingSigner {
	fn sign(&self, _payload: &[u8]) -> std::result::Result<Vec<u8>, SignerError> {
		Err(SignerError::new("hardware token is not inserted"))
	}
}

async fn mock_auth(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/auth/cert/key");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"uuid\":\"uuid-7\",\"data\":\"ABCDEF\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v3/auth/cert/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"submission-token\"}");
		})
		.await;
}

fn commissioning(group: ProductGroup) -> Document {
	Document::builder(group, DocumentType::LkContractCommissioning)
		.product_document(ProductDocument {
			participant_inn: Some("7700000000".into()),
			date_from: Some("2023-11-19".into()),
			..Default::default()
		})
		.build()
}

#[tokio::test]
async fn accepted_submission_returns_document_id() {
	let server = MockServer::start_async().await;

	mock_auth(&server).await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(CREATE_PATH)
				.query_param("pg", "milk")
				.header("authorization", "Bearer submission-token")
				.header("content-type", "application/json");
			then.status(200).header("content-type", "application/json").body("{\"value\":\"abc123\"}");
		})
		.await;
	let client = build_test_client(&server.base_url(), 5);
	let result = client
		.submit(commissioning(ProductGroup::Milk), &test_signer())
		.await
		.expect("Submission should not raise.");

	assert!(result.is_accepted());
	assert_eq!(result.value(), Some("abc123"));
	assert_eq!(client.metrics().accepted(), 1);

	create.assert_async().await;
}

#[tokio::test]
async fn unsupported_document_type_makes_no_calls() {
	let server = MockServer::start_async().await;
	let any = server
		.mock_async(|_when, then| {
			then.status(200);
		})
		.await;
	let client = build_test_client(&server.base_url(), 5);
	let document = Document::builder(ProductGroup::Shoes, DocumentType::LpReturn).build();
	let err = client
		.submit(document, &test_signer())
		.await
		.expect_err("Non-commissioning documents must be refused locally.");

	assert!(matches!(
		err,
		Error::UnsupportedDocumentType { document_type: DocumentType::LpReturn }
	));

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn non_200_status_is_returned_as_rejection() {
	let server = MockServer::start_async().await;

	mock_auth(&server).await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(CREATE_PATH).query_param("pg", "tobacco");
			then.status(429).header("Retry-After", "5").body("too many requests");
		})
		.await;
	let client = build_test_client(&server.base_url(), 5);
	let result = client
		.submit(commissioning(ProductGroup::Tobacco), &test_signer())
		.await
		.expect("Rejections are data, not errors.");

	match result {
		SubmissionResult::Rejected { status, body, retry_after } => {
			assert_eq!(status, 429);
			assert_eq!(body, "too many requests");
			assert_eq!(retry_after, Some(Duration::seconds(5)));
		},
		other => panic!("Unexpected submission result: {other:?}."),
	}
	assert_eq!(client.metrics().rejected(), 1);

	create.assert_async().await;
}

#[tokio::test]
async fn unreadable_acceptance_is_a_transport_error() {
	let server = MockServer::start_async().await;

	mock_auth(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(CREATE_PATH);
			then.status(200).header("content-type", "application/json").body("{\"id\":42}");
		})
		.await;

	let client = build_test_client(&server.base_url(), 5);
	let result = client
		.submit(commissioning(ProductGroup::Milk), &test_signer())
		.await
		.expect("Transport failures are data, not errors.");

	assert!(matches!(
		result,
		SubmissionResult::TransportError { cause: TransportError::Decode { status: 200, .. } }
	));
	assert_eq!(client.metrics().transport_failures(), 1);
}

#[tokio::test]
async fn token_is_reused_across_submissions() {
	let server = MockServer::start_async().await;
	let challenge = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/auth/cert/key");
			then.status(200).body("{\"uuid\":\"uuid-7\",\"data\":\"ABCDEF\"}");
		})
		.await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v3/auth/cert/");
			then.status(200).body("{\"token\":\"submission-token\"}");
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(CREATE_PATH).header("authorization", "Bearer submission-token");
			then.status(200).body("{\"value\":\"doc\"}");
		})
		.await;
	let clock = ManualClock::default();
	let client = build_test_client_with_clock(&server.base_url(), 2, Arc::new(clock.clone()));

	for _ in 0..3 {
		let result = client
			.submit(commissioning(ProductGroup::Milk), &test_signer())
			.await
			.expect("Submission should not raise.");

		assert_eq!(result.value(), Some("doc"));
	}

	challenge.assert_calls_async(1).await;
	token.assert_calls_async(1).await;
	create.assert_calls_async(3).await;
	assert_eq!(clock.sleeps(), vec![Duration::SECOND]);
}

#[tokio::test]
async fn signer_failure_aborts_before_any_call() {
	let server = MockServer::start_async().await;
	let any = server
		.mock_async(|_when, then| {
			then.status(200);
		})
		.await;
	let client = build_test_client(&server.base_url(), 5);
	let err = client
		.submit(commissioning(ProductGroup::Milk), &RefusingSigner)
		.await
		.expect_err("Signer failures must surface.");

	assert!(matches!(err, Error::Signer(_)));

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn cancelled_submission_leaves_no_trace() {
	let server = MockServer::start_async().await;
	let any = server
		.mock_async(|_when, then| {
			then.status(200);
		})
		.await;
	let client = build_test_client(&server.base_url(), 1);
	let err = client
		.submit_or_cancel(commissioning(ProductGroup::Milk), &test_signer(), async {})
		.await
		.expect_err("A ready cancellation signal must win.");

	assert!(matches!(err, Error::Cancelled));
	assert_eq!(client.credentials().snapshot().token, None);

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn cancelling_in_flight_submission_keeps_issued_token() {
	let server = MockServer::start_async().await;

	mock_auth(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(CREATE_PATH);
			then.status(200)
				.delay(std::time::Duration::from_millis(300))
				.body("{\"value\":\"too-late\"}");
		})
		.await;

	let client = build_test_client(&server.base_url(), 5);
	let err = client
		.submit_or_cancel(
			commissioning(ProductGroup::Milk),
			&test_signer(),
			tokio::time::sleep(std::time::Duration::from_millis(100)),
		)
		.await
		.expect_err("Cancellation must win over the delayed response.");

	assert!(matches!(err, Error::Cancelled));
	assert_eq!(
		client.credentials().snapshot().token.as_ref().map(|token| token.expose()),
		Some("submission-token")
	);
	assert_eq!(client.metrics().accepted(), 0);
}

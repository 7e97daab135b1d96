use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::config::FetchConfig;
use crate::data_source::{FetchRequest, SourceError, VectorSource};
use crate::domain::models::opaque_string;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{RawObservation, RawResult, RawValue, ResultStatus, SeriesIdentifier, VectorId};

/// Statistics Canada Web Data Service adapter.
#[derive(Clone)]
pub struct StatCanAdapter {
    http_client: Arc<dyn HttpClient>,
    config: FetchConfig,
}

impl Default for StatCanAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::new()),
            config: FetchConfig::default(),
        }
    }
}

impl StatCanAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: FetchConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self {
            config: FetchConfig::from_env(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_vectors(&self, req: FetchRequest) -> Result<Vec<RawResult>, SourceError> {
        let payload = serde_json::to_string(&build_payload(&req)).map_err(|e| {
            SourceError::internal(format!("failed to encode statcan payload: {e}"))
        })?;

        let request = HttpRequest::post(&self.config.endpoint)
            .with_json_body(payload)
            .with_timeout_ms(self.config.timeout_ms);

        let started = Instant::now();
        let response = self.http_client.execute(request).await.map_err(|e| {
            tracing::warn!(error = e.message(), "statcan transport failure");
            SourceError::upstream_unavailable(format!("statcan transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "statcan returned non-success status");
            return Err(SourceError::upstream_error(response.status, response.body));
        }

        let results = parse_response(&response.body)?;
        tracing::info!(
            vectors = req.identifiers.len(),
            results = results.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "statcan fetch complete"
        );
        Ok(results)
    }
}

impl VectorSource for StatCanAdapter {
    fn name(&self) -> &'static str {
        "statcan"
    }

    fn fetch<'a>(
        &'a self,
        req: FetchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawResult>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_vectors(req))
    }
}

/// One element of the WDS request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorQuery {
    /// `None` for an identifier that did not resolve; sent as `null`.
    pub vector_id: Option<VectorId>,
    pub latest_n: u32,
}

/// Maps every requested identifier to a `{vectorId, latestN}` entry, in order.
pub fn build_payload(req: &FetchRequest) -> Vec<VectorQuery> {
    req.identifiers
        .iter()
        .map(|identifier| VectorQuery {
            vector_id: identifier.normalize(),
            latest_n: req.observation_count,
        })
        .collect()
}

/// Decodes a WDS batch response body into raw results.
///
/// Entries are read field by field: an entry that is not an object becomes a
/// non-`SUCCESS` result, a missing or non-array `vectorDataPoint` is an empty
/// series, and data points that are not objects are skipped.
///
/// # Errors
///
/// Returns an `Internal` [`SourceError`] if the body is not a JSON array.
pub fn parse_response(body: &str) -> Result<Vec<RawResult>, SourceError> {
    let entries = match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            return Err(SourceError::internal(
                "failed to parse statcan response: expected a JSON array",
            ))
        }
        Err(e) => {
            return Err(SourceError::internal(format!(
                "failed to parse statcan response: {e}"
            )))
        }
    };

    Ok(entries.iter().map(raw_result).collect())
}

static NULL: Value = Value::Null;

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

fn raw_result(entry: &Value) -> RawResult {
    let status = opaque_string(field(entry, "status")).unwrap_or_default();
    // Failed entries carry a message string instead of an object.
    let object = field(entry, "object");

    let observations = match field(object, "vectorDataPoint") {
        Value::Array(points) => {
            let observations: Vec<RawObservation> =
                points.iter().filter_map(observation).collect();
            if observations.len() < points.len() {
                tracing::debug!(
                    skipped = points.len() - observations.len(),
                    "statcan data points without an object shape skipped"
                );
            }
            observations
        }
        _ => Vec::new(),
    };

    RawResult {
        status: ResultStatus::from(status.as_str()),
        identifier: SeriesIdentifier::from_json(field(object, "vectorId")),
        product_id: opaque_string(field(object, "productId")),
        observations,
    }
}

fn observation(point: &Value) -> Option<RawObservation> {
    if !point.is_object() {
        return None;
    }

    let period = ["refPerRaw", "refPer"]
        .into_iter()
        .filter_map(|key| opaque_string(field(point, key)))
        .find(|period| !period.is_empty())
        .unwrap_or_default();

    Some(RawObservation::new(
        period,
        RawValue::from_json(field(point, "value").clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpMethod, HttpResponse};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn returning(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn request(ids: &[&str], count: u32) -> FetchRequest {
        FetchRequest::new(ids.iter().map(|id| SeriesIdentifier::text(*id)).collect(), count)
            .expect("valid request")
    }

    #[test]
    fn payload_normalizes_ids_and_shares_count() {
        let payload = build_payload(&request(&["v123", "V456", "789", "vx"], 12));
        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!([
                {"vectorId": 123, "latestN": 12},
                {"vectorId": 456, "latestN": 12},
                {"vectorId": 789, "latestN": 12},
                {"vectorId": null, "latestN": 12}
            ])
        );
    }

    #[tokio::test]
    async fn posts_single_batch_to_configured_endpoint() {
        let client = Arc::new(RecordingHttpClient::returning(Ok(HttpResponse::ok_json("[]"))));
        let config = FetchConfig::default()
            .with_endpoint("http://wds.test/vectors")
            .with_timeout_ms(750);
        let adapter = StatCanAdapter::new(client.clone(), config);

        let results = adapter
            .fetch(request(&["v1", "v2"], 3))
            .await
            .expect("fetch should succeed");
        assert!(results.is_empty());

        let recorded = client.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].method, HttpMethod::Post);
        assert_eq!(recorded[0].url, "http://wds.test/vectors");
        assert_eq!(recorded[0].timeout_ms, 750);
        assert_eq!(
            recorded[0].headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            recorded[0].body.as_deref(),
            Some(r#"[{"vectorId":1,"latestN":3},{"vectorId":2,"latestN":3}]"#)
        );
    }

    #[tokio::test]
    async fn transport_failure_is_upstream_unavailable() {
        let client = Arc::new(RecordingHttpClient::returning(Err(HttpError::new(
            "connection failed: refused",
        ))));
        let adapter = StatCanAdapter::with_http_client(client);

        let err = adapter
            .fetch(request(&["v1"], 1))
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::UpstreamUnavailable);
        assert!(err.retryable());
        assert!(err.message().contains("refused"));
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error_with_body() {
        let client = Arc::new(RecordingHttpClient::returning(Ok(HttpResponse::new(
            503,
            "Service Unavailable",
        ))));
        let adapter = StatCanAdapter::with_http_client(client);

        let err = adapter
            .fetch(request(&["v1"], 1))
            .await
            .expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::UpstreamError);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.detail(), Some("Service Unavailable"));
    }

    #[test]
    fn parses_success_and_failed_entries() {
        let body = r#"[
            {"status": "SUCCESS", "object": {"vectorId": 41690973, "productId": 18100004,
              "vectorDataPoint": [
                {"refPer": "2024-02-01", "refPerRaw": "2024-02-01", "value": 160.6},
                {"refPer": "2024-01-01", "refPerRaw": "", "value": "158.3"}
              ]}},
            {"status": "FAILED", "object": "Vector not found"},
            null
        ]"#;

        let results = parse_response(body).expect("body should parse");
        assert_eq!(results.len(), 3);

        let first = &results[0];
        assert!(first.status.is_success());
        assert_eq!(first.vector_id(), Some(VectorId::new(41690973)));
        assert_eq!(first.label(), "v41690973");
        assert_eq!(first.product_id.as_deref(), Some("18100004"));
        assert_eq!(first.observations[0].period, "2024-02-01");
        assert_eq!(first.observations[1].period, "2024-01-01");
        assert_eq!(first.observations[1].value, RawValue::Text(String::from("158.3")));

        assert_eq!(results[1].status, ResultStatus::Other(String::from("FAILED")));
        assert!(results[1].observations.is_empty());
        assert!(!results[2].status.is_success());
    }

    #[test]
    fn non_array_body_is_internal_error() {
        let err = parse_response(r#"{"message": "oops"}"#).expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Internal);
    }

    #[test]
    fn null_or_missing_point_list_keeps_identity() {
        let body = r#"[
            {"status": "SUCCESS", "object": {"vectorId": 123, "productId": "14100287",
              "vectorDataPoint": null}},
            {"status": "SUCCESS", "object": {"vectorId": 124, "productId": 14100287}},
            {"status": "SUCCESS", "object": {"vectorId": 125, "vectorDataPoint": "none"}}
        ]"#;

        let results = parse_response(body).expect("body should parse");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].label(), "v123");
        assert_eq!(results[0].product_id.as_deref(), Some("14100287"));
        assert!(results[0].observations.is_empty());
        assert_eq!(results[1].label(), "v124");
        assert_eq!(results[1].product_id.as_deref(), Some("14100287"));
        assert_eq!(results[2].label(), "v125");
    }

    #[test]
    fn malformed_points_are_skipped_not_fatal() {
        let body = r#"[{"status": "SUCCESS", "object": {"vectorId": 9,
            "vectorDataPoint": [{"refPer": "2020", "value": 1}, null, 7, {"value": "2"}]}}]"#;

        let results = parse_response(body).expect("body should parse");

        let observations = &results[0].observations;
        assert_eq!(results[0].label(), "v9");
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].period, "2020");
        assert_eq!(observations[0].value, RawValue::Number(1.0));
        assert_eq!(observations[1].period, "");
    }

    #[test]
    fn non_object_entries_become_unsuccessful_results() {
        let body = r#"[
            {"status": "SUCCESS", "object": {"vectorId": 1, "vectorDataPoint": []}},
            "oops",
            42
        ]"#;

        let results = parse_response(body).expect("one bad entry must not fail the batch");

        assert_eq!(results.len(), 3);
        assert!(results[0].status.is_success());
        assert!(!results[1].status.is_success());
        assert!(!results[2].status.is_success());
        assert_eq!(results[1].identifier, None);
    }

    #[test]
    fn echoed_identifier_text_is_kept_for_label() {
        let body = r#"[
            {"status": "SUCCESS", "object": {"vectorId": "ABC", "vectorDataPoint": []}},
            {"status": "SUCCESS", "object": {"vectorId": 1.5, "vectorDataPoint": []}}
        ]"#;

        let results = parse_response(body).expect("body should parse");

        assert_eq!(results[0].label(), "vABC");
        assert_eq!(results[1].label(), "v1.5");
        assert_eq!(results[0].vector_id(), None);
    }
}

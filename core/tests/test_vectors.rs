//! Verify request building and response classification against the JSON
//! test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs and the expected outcome. Comparing
//! parsed JSON (not raw strings) avoids false negatives from field-ordering
//! differences.

use catalog_admin_core::{ApiClient, ApiError, Credential, HttpMethod, HttpResponse, Session};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/api/admin/v1";

/// A client with no transport; these tests only build and parse.
fn client(credential: &Value) -> ApiClient<()> {
    let session = Session::new();
    if let Some(token) = credential.as_str() {
        session.set(Credential::new(token));
    }
    ApiClient::new(BASE_URL, session, ())
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    assert_eq!(vectors["base_url"], BASE_URL);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(&case["credential"]);
        let method = parse_method(case["method"].as_str().unwrap());
        let body = Some(&case["body"]).filter(|b| !b.is_null());

        let req = c
            .build_request(method, case["path"].as_str().unwrap(), body)
            .unwrap();

        let expected = &case["expected"];
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");

        match body {
            Some(body) => {
                let sent: Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: body"),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[test]
fn envelope_test_vectors() {
    let raw = include_str!("../../test-vectors/envelope.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(&case["credential"]);
        let held = c.session().is_authenticated();

        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let result = c.parse_response::<Value>(response);

        let expected = &case["expected"];
        if let Some(data) = expected.get("ok") {
            assert_eq!(&result.unwrap(), data, "{name}: data");
        } else if let Some(api) = expected.get("api") {
            match result {
                Err(ApiError::Api {
                    status,
                    code,
                    message,
                }) => {
                    assert_eq!(u64::from(status), api["status"].as_u64().unwrap(), "{name}: status");
                    assert_eq!(code.as_deref(), api["code"].as_str(), "{name}: code");
                    assert_eq!(message, api["message"].as_str().unwrap(), "{name}: message");
                }
                other => panic!("{name}: expected api error, got {other:?}"),
            }
        } else {
            assert!(
                matches!(result, Err(ApiError::Transport { .. })),
                "{name}: expected transport error, got {result:?}"
            );
        }

        let invalidates = case["invalidates"].as_bool().unwrap();
        assert_eq!(
            c.session().is_authenticated(),
            held && !invalidates,
            "{name}: session after parse"
        );
    }
}

use tracker_cloud::CloudError;
use tracker_model::ModelError;

#[test]
fn api_error_display() {
    let err = CloudError::Api("connection refused".into());
    assert_eq!(err.to_string(), "API request failed: connection refused");
}

#[test]
fn status_error_display() {
    let err = CloudError::Status { status: 502, body: "bad gateway".into() };
    assert_eq!(err.to_string(), "remote returned 502: bad gateway");
}

#[test]
fn unauthorized_display() {
    assert_eq!(
        CloudError::Unauthorized.to_string(),
        "write rejected: shared secret missing or incorrect"
    );
}

#[test]
fn config_error_display() {
    let err = CloudError::Config("api_base_url is not set".into());
    assert_eq!(err.to_string(), "invalid configuration: api_base_url is not set");
}

#[test]
fn from_model_error() {
    let err: CloudError = ModelError::NotAnArray("an object").into();
    assert_eq!(
        err.to_string(),
        "invalid remote payload: expected an array of entries, found an object"
    );
}

#[test]
fn from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
    let cloud_err: CloudError = json_err.into();
    assert!(cloud_err.to_string().contains("serialization error"));
}

#[test]
fn transient_classification() {
    assert!(CloudError::Api("reset".into()).is_transient());
    assert!(CloudError::Status { status: 503, body: String::new() }.is_transient());
    assert!(CloudError::Status { status: 429, body: String::new() }.is_transient());
    assert!(!CloudError::Status { status: 400, body: String::new() }.is_transient());
    assert!(!CloudError::Unauthorized.is_transient());
    assert!(!CloudError::Config("x".into()).is_transient());
}

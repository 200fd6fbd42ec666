use super::*;

fn test_client(base_url: &str, auth: Option<&str>) -> RealtimeDbClient {
    RealtimeDbClient::new(base_url, auth, 30).expect("client construction should not fail")
}

#[test]
fn build_url_appends_json_suffix() {
    let client = test_client("https://zibis.firebaseio.com", None);
    let url = client.build_url("catalog/items").expect("valid path");
    assert_eq!(url.as_str(), "https://zibis.firebaseio.com/catalog/items.json");
}

#[test]
fn build_url_strips_slashes_and_adds_auth() {
    let client = test_client("https://zibis.firebaseio.com/", Some("secret"));
    let url = client.build_url("/pricing/").expect("valid path");
    assert_eq!(
        url.as_str(),
        "https://zibis.firebaseio.com/pricing.json?auth=secret"
    );
}

#[test]
fn build_url_addresses_root() {
    let client = test_client("https://zibis.firebaseio.com", None);
    let url = client.build_url("").expect("valid path");
    assert_eq!(url.as_str(), "https://zibis.firebaseio.com/.json");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = RealtimeDbClient::new("not a url", None, 30).unwrap_err();
    assert!(matches!(err, StoreError::InvalidUrl(_)));
}

#[test]
fn debug_redacts_auth() {
    let client = test_client("https://zibis.firebaseio.com", Some("secret"));
    assert!(!format!("{client:?}").contains("secret"));
}

#[test]
fn server_timestamp_placeholder_shape() {
    assert_eq!(server_timestamp(), json!({ ".sv": "timestamp" }));
}

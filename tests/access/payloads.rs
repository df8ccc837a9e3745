//! Access over realistic API payloads

use gatherx::{access, access_as, get_json, KeyPath, NestedMap};
use serde_json::{json, Value};

use crate::common::MockHttpClient;

fn org_payload() -> Value {
    json!({
        "login": "google",
        "repos_url": "https://api.github.com/orgs/google/repos",
        "plan": {"name": "enterprise", "seats": {"used": 12, "total": 50}}
    })
}

#[test]
fn test_walk_fetched_payload() {
    let url = "https://api.github.com/orgs/google";
    let client = MockHttpClient::new().with_response(url, org_payload());

    let org = get_json(&client, url).unwrap();
    let used: u32 = access_as(&org, &["plan", "seats", "used"]).unwrap();
    let repos_url = access(&org, &["repos_url"]).unwrap();

    assert_eq!(used, 12);
    assert_eq!(repos_url, "https://api.github.com/orgs/google/repos");
    assert_eq!(client.calls_to(url), 1);
}

#[test]
fn test_dotted_key_path() {
    let path: KeyPath = "plan.seats.total".parse().unwrap();
    let org = org_payload();

    assert_eq!(access(&org, path.keys()).unwrap(), &json!(50));
    assert_eq!(path.to_string(), "plan.seats.total");
}

#[test]
fn test_nested_map_root() {
    let mut root = NestedMap::new();
    root.insert("a".to_string(), json!({"b": 2}));
    let root = Value::Object(root);

    assert_eq!(access(&root, &["a", "b"]).unwrap(), &json!(2));
}

#[test]
fn test_repeated_access_is_identical() {
    let org = org_payload();
    let path = KeyPath::from(["plan", "name"]);

    let results: Vec<Value> = (0..5)
        .map(|_| access(&org, path.keys()).unwrap().clone())
        .collect();

    assert!(results.iter().all(|v| v == "enterprise"));
}

// Compiles a rendered documentation module and drives its handler.
//
// `fixtures/generated/docs_module.rs` is the output of `render_module` for `sample_docs()`.
// When the emitted code changes, regenerate the fixture from `render_module(&sample_docs())`.

#[path = "fixtures/generated/docs_module.rs"]
mod docs_module;

use http::header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use swagger_from_source::codegen::{render_module, GeneratedDocs};

const LISTING: &str = r#"{"apiVersion": "1.0.0", "apis": [{"path": "/orders"}, {"path": "/users"}]}"#;
const ORDERS: &str = r#"{"resourcePath": "/orders", "summary": "Use `curl` with #tags"}"#;
const USERS: &str = r#"{"resourcePath": "/users"}"#;

fn sample_docs() -> GeneratedDocs {
    GeneratedDocs {
        listing_json: LISTING.to_string(),
        declarations_json: BTreeMap::from([
            ("users".to_string(), USERS.to_string()),
            ("orders".to_string(), ORDERS.to_string()),
        ]),
    }
}

/// Source text after a parse and pretty-print pass, so layout differences do not count.
fn normalized(source: &str) -> String {
    let file = syn::parse_file(source).expect("Module should parse");
    prettyplease::unparse(&file)
}

fn get(uri: &str) -> Request<()> {
    Request::get(uri).body(()).unwrap()
}

fn assert_cors(response: &Response<String>) {
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], "GET");
}

#[test]
fn test_fixture_matches_renderer_output() {
    let rendered = render_module(&sample_docs()).expect("Rendering failed");

    assert_eq!(
        normalized(&rendered),
        normalized(include_str!("fixtures/generated/docs_module.rs"))
    );
}

#[test]
fn test_embedded_constants() {
    assert_eq!(docs_module::SWAGGER_RESOURCE_LISTING, LISTING);
    assert_eq!(
        docs_module::SWAGGER_API_DESCRIPTIONS,
        &[("orders", ORDERS), ("users", USERS)]
    );
    assert_eq!(docs_module::swagger_api_description("orders"), Some(ORDERS));
    assert_eq!(docs_module::swagger_api_description("payments"), None);
}

#[test]
fn test_handler_serves_listing_for_empty_resource() {
    for uri in ["/docs", "/docs/"] {
        let response = docs_module::swagger_api_handler("/docs", &get(uri));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), LISTING);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_cors(&response);
    }
}

#[test]
fn test_handler_serves_known_resource() {
    let response = docs_module::swagger_api_handler("/docs", &get("/docs/orders"));

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), ORDERS);
    assert_cors(&response);
}

#[test]
fn test_handler_unknown_resource_is_not_found() {
    let response = docs_module::swagger_api_handler("/docs", &get("/docs/payments"));

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.body().is_empty());
    assert!(response.headers().get(CONTENT_TYPE).is_none());
    assert_cors(&response);
}

#[test]
fn test_handler_ignores_method() {
    let request = Request::delete("/docs/users").body(()).unwrap();
    let response = docs_module::swagger_api_handler("/docs", &request);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), USERS);
}

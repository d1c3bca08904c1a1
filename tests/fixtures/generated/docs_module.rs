//! This file is generated automatically by swagger-from-source. Do not edit it manually.
#![allow(dead_code)]
use ::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use ::http::{Request, Response, StatusCode};
/// Resource listing served at the handler prefix.
pub const SWAGGER_RESOURCE_LISTING: &str = "{\"apiVersion\": \"1.0.0\", \"apis\": [{\"path\": \"/orders\"}, {\"path\": \"/users\"}]}";
/// API declaration of each resource, sorted by resource key.
pub const SWAGGER_API_DESCRIPTIONS: &[(&str, &str)] = &[
    ("orders", "{\"resourcePath\": \"/orders\", \"summary\": \"Use `curl` with #tags\"}"),
    ("users", "{\"resourcePath\": \"/users\"}"),
];
/// API declaration of `resource`, if it exists.
pub fn swagger_api_description(resource: &str) -> Option<&'static str> {
    SWAGGER_API_DESCRIPTIONS.iter().find(|(key, _)| *key == resource).map(|(_, json)| *json)
}
/// Serves the listing at `prefix` and each resource's declaration at `prefix/<resource>`.
pub fn swagger_api_handler<B>(prefix: &str, request: &Request<B>) -> Response<String> {
    let path = request.uri().path();
    let resource = path.strip_prefix(prefix).unwrap_or(path).trim_matches('/');
    let body = if resource.is_empty() {
        Some(SWAGGER_RESOURCE_LISTING)
    } else {
        swagger_api_description(resource)
    };
    let mut response = Response::new(body.unwrap_or_default().to_owned());
    if body.is_none() {
        *response.status_mut() = StatusCode::NOT_FOUND;
    }
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET"));
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    response
}

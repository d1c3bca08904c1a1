//! In-process documentation server over already generated documents.
//!
//! Follows the same dispatch rules as the handler in the generated module, so a host
//! application can serve documentation without compiling the generated file.

use crate::codegen::GeneratedDocs;
use http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use log::debug;

/// Serves a resource listing and per-resource API declarations.
#[derive(Debug, Clone)]
pub struct DocsServer {
    docs: GeneratedDocs,
}

impl DocsServer {
    pub fn new(docs: GeneratedDocs) -> Self {
        Self { docs }
    }

    /// Body for a resource key; the empty key is the listing.
    pub fn lookup(&self, resource: &str) -> Option<&str> {
        if resource.is_empty() {
            Some(self.docs.listing_json.as_str())
        } else {
            self.docs.declarations_json.get(resource).map(String::as_str)
        }
    }

    /// Answer a documentation request mounted under `prefix`.
    ///
    /// CORS headers are always set. Unknown resources get a 404 with an empty body. The
    /// request method is not inspected.
    pub fn handle<B>(&self, prefix: &str, request: &Request<B>) -> Response<String> {
        let resource = resource_key(prefix, request.uri().path());
        let body = self.lookup(resource);
        debug!("Docs request for resource {:?}, found: {}", resource, body.is_some());

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
}

/// The resource key addressed by `path`: the prefix is removed, then surrounding slashes.
pub fn resource_key<'p>(prefix: &str, path: &'p str) -> &'p str {
    path.strip_prefix(prefix).unwrap_or(path).trim_matches('/')
}

//! Line grammar for operation annotations.
//!
//! Each doc line that starts with `@Keyword` is one directive. Keywords are matched
//! case-insensitively; lines without a recognized keyword parse to `None` so free-text
//! documentation can sit next to annotations.

use crate::error::AnnotationError;
use crate::model::{HttpMethod, ParameterLocation};
use once_cell::sync::Lazy;
use regex::Regex;

static ANNOTATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(\w+)(?:\s+(.*))?$").unwrap());

static ROUTER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+)\s+\[(\w+)\]$").unwrap());

static PARAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\S+)\s+(\w+)\s+(\S+)\s+(\w+)(?:\s+"((?:[^"\\]|\\.)*)")?$"#).unwrap());

static SUCCESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\S+)\s+\{(\w+)\}\s+(\S+)(?:\s+"((?:[^"\\]|\\.)*)")?$"#).unwrap());

static FAILURE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\S+)(?:\s+\{(\w+)\}\s+(\S+))?\s+"((?:[^"\\]|\\.)*)"$"#).unwrap());

/// One parsed annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Router { path: String, method: HttpMethod },
    Resource(String),
    Title(String),
    Summary(String),
    Notes(String),
    Param(ParamSpec),
    Success(ResponseSpec),
    Failure(ResponseSpec),
    Accept(Vec<String>),
    Produce(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub location: ParameterLocation,
    /// Type token as written, before wrapper resolution
    pub type_name: String,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSpec {
    pub code: u16,
    pub is_array: bool,
    /// Type token as written, before wrapper resolution
    pub type_name: Option<String>,
    pub message: String,
}

/// Parse a single doc line.
///
/// Returns `Ok(None)` for lines that are not annotations or use an unknown keyword.
pub fn parse_line(line: &str) -> Result<Option<Directive>, AnnotationError> {
    let Some(captures) = ANNOTATION_REGEX.captures(line.trim()) else {
        return Ok(None);
    };
    let keyword = captures[1].to_lowercase();
    let value = captures.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

    let directive = match keyword.as_str() {
        "router" => parse_router(value)?,
        "resource" => Directive::Resource(require_text("Resource", "<key>", value)?.trim_matches('/').to_string()),
        "title" => Directive::Title(require_text("Title", "<nickname>", value)?),
        "summary" | "description" => Directive::Summary(value.to_string()),
        "notes" => Directive::Notes(value.to_string()),
        "param" => Directive::Param(parse_param(value)?),
        "success" => Directive::Success(parse_success(value)?),
        "failure" => Directive::Failure(parse_failure(value)?),
        "accept" => Directive::Accept(parse_mime_types(value)),
        "produce" => Directive::Produce(parse_mime_types(value)),
        _ => return Ok(None),
    };

    Ok(Some(directive))
}

fn require_text(directive: &'static str, expected: &'static str, value: &str) -> Result<String, AnnotationError> {
    if value.is_empty() {
        return Err(AnnotationError::malformed(directive, expected, value));
    }
    Ok(value.to_string())
}

fn parse_router(value: &str) -> Result<Directive, AnnotationError> {
    let captures = ROUTER_REGEX
        .captures(value)
        .ok_or_else(|| AnnotationError::malformed("Router", "<path> [<method>]", value))?;
    let method = HttpMethod::parse(&captures[2]).ok_or_else(|| AnnotationError::UnknownMethod(captures[2].to_string()))?;

    let path = &captures[1];
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    Ok(Directive::Router { path, method })
}

fn parse_param(value: &str) -> Result<ParamSpec, AnnotationError> {
    let captures = PARAM_REGEX.captures(value).ok_or_else(|| {
        AnnotationError::malformed("Param", "<name> <location> <type> <required> \"<description>\"", value)
    })?;

    let location =
        ParameterLocation::parse(&captures[2]).ok_or_else(|| AnnotationError::UnknownLocation(captures[2].to_string()))?;
    let required = match captures[4].to_lowercase().as_str() {
        "true" => true,
        "false" => false,
        other => return Err(AnnotationError::InvalidRequiredFlag(other.to_string())),
    };

    Ok(ParamSpec {
        name: captures[1].to_string(),
        location,
        type_name: captures[3].to_string(),
        required,
        description: captures.get(5).map(|m| unescape(m.as_str())).unwrap_or_default(),
    })
}

fn parse_success(value: &str) -> Result<ResponseSpec, AnnotationError> {
    let captures = SUCCESS_REGEX.captures(value).ok_or_else(|| {
        AnnotationError::malformed("Success", "<code> {object|array} <type> \"<message>\"", value)
    })?;

    Ok(ResponseSpec {
        code: parse_status_code(&captures[1])?,
        is_array: parse_response_kind("Success", &captures[2], value)?,
        type_name: Some(captures[3].to_string()),
        message: captures.get(4).map(|m| unescape(m.as_str())).unwrap_or_default(),
    })
}

fn parse_failure(value: &str) -> Result<ResponseSpec, AnnotationError> {
    let captures = FAILURE_REGEX.captures(value).ok_or_else(|| {
        AnnotationError::malformed("Failure", "<code> [{object} <type>] \"<message>\"", value)
    })?;

    let is_array = match captures.get(2) {
        Some(kind) => parse_response_kind("Failure", kind.as_str(), value)?,
        None => false,
    };

    Ok(ResponseSpec {
        code: parse_status_code(&captures[1])?,
        is_array,
        type_name: captures.get(3).map(|m| m.as_str().to_string()),
        message: unescape(&captures[4]),
    })
}

fn parse_status_code(code: &str) -> Result<u16, AnnotationError> {
    code.parse::<u16>()
        .ok()
        .filter(|c| (100..=599).contains(c))
        .ok_or_else(|| AnnotationError::InvalidStatusCode(code.to_string()))
}

fn parse_response_kind(directive: &'static str, kind: &str, value: &str) -> Result<bool, AnnotationError> {
    match kind.to_lowercase().as_str() {
        "object" => Ok(false),
        "array" => Ok(true),
        _ => Err(AnnotationError::malformed(directive, "{object} or {array}", value)),
    }
}

/// Resolve `\"` and `\\` inside a quoted annotation text.
fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match (c, chars.clone().next()) {
            ('\\', Some(next @ ('"' | '\\'))) => {
                unescaped.push(next);
                chars.next();
            }
            _ => unescaped.push(c),
        }
    }
    unescaped
}

/// Expand the short MIME names used in `@Accept` / `@Produce`.
fn parse_mime_types(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|token| match token.to_lowercase().as_str() {
            "json" => "application/json".to_string(),
            "xml" => "application/xml".to_string(),
            "plain" => "text/plain".to_string(),
            "html" => "text/html".to_string(),
            "form" => "application/x-www-form-urlencoded".to_string(),
            "mpfd" => "multipart/form-data".to_string(),
            _ => token.to_string(),
        })
        .collect()
}

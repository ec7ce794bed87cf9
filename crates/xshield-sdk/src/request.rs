//! Request envelope construction
//!
//! Turns an operation's path template, typed parameters and optional body
//! into a `reqwest::Request` with the standard headers set. Nothing here
//! touches the network.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Method, Url};
use serde::Serialize;
use std::collections::BTreeMap;
use xshield_core::{Error, Result};

/// Media type used for request and response bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Typed values for an operation's URL placeholders
pub trait PathParams {
    /// Value for the placeholder `{name}`, if the request carries one
    fn path_param(&self, name: &str) -> Option<String>;

    /// Query string pairs, in order
    fn query_params(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// One `/`-separated piece of a path template
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn parse_template(template: &str) -> Result<Vec<Segment<'_>>> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            let opens = s.matches('{').count();
            let closes = s.matches('}').count();
            match (opens, closes) {
                (0, 0) => Ok(Segment::Literal(s)),
                (1, 1) if s.starts_with('{') && s.ends_with('}') => {
                    let name = &s[1..s.len() - 1];
                    if name.is_empty() {
                        Err(Error::url_template(template, "empty placeholder name"))
                    } else {
                        Ok(Segment::Placeholder(name))
                    }
                }
                (1, 1) => Err(Error::url_template(
                    template,
                    format!("placeholder must span a whole segment: '{}'", s),
                )),
                _ => Err(Error::url_template(template, format!("unbalanced braces in '{}'", s))),
            }
        })
        .collect()
}

/// Join `base_url` and `template`, substituting placeholders from `params`
///
/// Placeholder values are percent-encoded as single path segments, so an id
/// containing `/` or spaces cannot change the route. An empty value counts
/// as missing.
pub fn generate_url<P: PathParams + ?Sized>(base_url: &str, template: &str, params: &P) -> Result<Url> {
    let segments = parse_template(template)?;

    let mut url = Url::parse(base_url)
        .map_err(|e| Error::construction(format!("invalid server URL '{}': {}", base_url, e)))?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| Error::construction(format!("server URL cannot be a base: '{}'", base_url)))?;
        path.pop_if_empty();

        for segment in segments {
            match segment {
                Segment::Literal(s) => {
                    path.push(s);
                }
                Segment::Placeholder(name) => {
                    let value = params
                        .path_param(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| Error::MissingPathParam(name.to_string()))?;
                    path.push(&value);
                }
            }
        }
    }

    let query = params.query_params();
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url)
}

/// A serialized request body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedBody {
    /// Encoded bytes (empty when there is no body)
    pub bytes: Vec<u8>,

    /// Content type to announce, `None` when there is no body
    pub content_type: Option<&'static str>,
}

impl SerializedBody {
    /// Whether there is anything to send
    pub fn is_empty(&self) -> bool {
        self.content_type.is_none()
    }
}

/// Encode an optional body as JSON
pub fn serialize_request_body<T: Serialize + ?Sized>(body: Option<&T>) -> Result<SerializedBody> {
    match body {
        None => Ok(SerializedBody::default()),
        Some(body) => Ok(SerializedBody {
            bytes: serde_json::to_vec(body)?,
            content_type: Some(JSON_CONTENT_TYPE),
        }),
    }
}

/// Build the request envelope with `Accept`, `User-Agent` and `Content-Type`
pub fn build_request(method: Method, url: Url, body: SerializedBody, user_agent: &str) -> Result<reqwest::Request> {
    let mut request = reqwest::Request::new(method, url);

    let headers = request.headers_mut();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|e| Error::construction(format!("invalid user agent: {}", e)))?,
    );
    if let Some(content_type) = body.content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        *request.body_mut() = Some(body.bytes.into());
    }

    Ok(request)
}

/// Apply caller-supplied headers, replacing any existing value of the same name
pub fn apply_headers(headers: &mut HeaderMap, extra: &BTreeMap<String, String>) -> Result<()> {
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::construction(format!("invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::construction(format!("invalid value for header '{}': {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(())
}

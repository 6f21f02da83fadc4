//! Parameter encoding into query strings and JSON bodies.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};
use crate::headers::CONTENT_TYPE;
use crate::request::TransportRequest;

/// Named request parameters.
///
/// Keys iterate in sorted order, so encoded query strings are stable.
pub type Parameters = serde_json::Map<String, Value>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Convert a serializable value into parameters.
///
/// The value must serialize to a JSON object.
pub fn parameters_from<T: Serialize + ?Sized>(value: &T) -> Result<Parameters> {
    let value = serde_json::to_value(value)
        .map_err(|e| Error::with_source(ErrorKind::Encoding(e.to_string()), e))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::new(ErrorKind::Encoding(format!(
            "expected an object, got {}",
            json_type_name(&other)
        )))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// How body and URL parameters are serialized onto a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterEncoding {
    /// URL parameters go into the query string.
    #[default]
    UrlEncoding,
    /// Body parameters become a JSON object body.
    JsonEncoding,
    /// Both of the above, independently.
    UrlAndJsonEncoding,
}

impl ParameterEncoding {
    /// Apply this encoding to the request.
    pub fn encode(
        &self,
        request: &mut TransportRequest,
        body_parameters: Option<&Parameters>,
        url_parameters: Option<&Parameters>,
    ) -> Result<()> {
        match self {
            ParameterEncoding::UrlEncoding => {
                if let Some(params) = url_parameters {
                    encode_url(request, params);
                }
            }
            ParameterEncoding::JsonEncoding => {
                if let Some(params) = body_parameters {
                    encode_json(request, params)?;
                }
            }
            ParameterEncoding::UrlAndJsonEncoding => {
                if let Some(params) = url_parameters {
                    encode_url(request, params);
                }
                if let Some(params) = body_parameters {
                    encode_json(request, params)?;
                }
            }
        }
        Ok(())
    }
}

/// Append parameters to the request's query string.
///
/// Keys and values are percent-encoded; an existing query is kept.
/// An empty mapping leaves the request untouched.
pub fn encode_url(request: &mut TransportRequest, parameters: &Parameters) {
    if parameters.is_empty() {
        return;
    }

    let encoded = query_string(parameters);
    let url = request.url_mut();
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{}&{}", existing, encoded),
        _ => encoded,
    };
    url.set_query(Some(&query));

    if request.content_type().is_none() {
        request.set_header(CONTENT_TYPE, FORM_CONTENT_TYPE);
    }
}

/// Serialize parameters as the request's JSON body.
pub fn encode_json(request: &mut TransportRequest, parameters: &Parameters) -> Result<()> {
    let body = serde_json::to_vec(parameters)
        .map_err(|e| Error::with_source(ErrorKind::Encoding(e.to_string()), e))?;
    request.set_body(body);

    if request.content_type().is_none() {
        request.set_header(CONTENT_TYPE, JSON_CONTENT_TYPE);
    }
    Ok(())
}

/// Percent-encoded `key=value` pairs joined with `&`.
pub fn query_string(parameters: &Parameters) -> String {
    parameters
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&query_value(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Nested values travel as compact JSON
        other => other.to_string(),
    }
}

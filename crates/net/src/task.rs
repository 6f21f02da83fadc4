//! Parameter-attachment strategies for a request.

use bytes::{BufMut, Bytes, BytesMut};

use crate::encoding::{ParameterEncoding, Parameters};
use crate::endpoint::HttpHeaders;

/// How an endpoint's parameters are attached to its request.
#[derive(Debug, Clone)]
pub enum HttpTask {
    /// No parameters.
    Request,

    /// Body and/or URL parameters with the given encoding.
    RequestParameters {
        body_parameters: Option<Parameters>,
        body_encoding: ParameterEncoding,
        url_parameters: Option<Parameters>,
    },

    /// Same as `RequestParameters`, plus extra headers.
    RequestParametersAndHeaders {
        body_parameters: Option<Parameters>,
        body_encoding: ParameterEncoding,
        url_parameters: Option<Parameters>,
        additional_headers: Option<HttpHeaders>,
    },

    /// Pre-built multipart payload.
    MultipartData { data: Bytes, boundary: String },
}

impl HttpTask {
    /// Shorthand for query-string parameters.
    pub fn url_parameters(parameters: Parameters) -> Self {
        HttpTask::RequestParameters {
            body_parameters: None,
            body_encoding: ParameterEncoding::UrlEncoding,
            url_parameters: Some(parameters),
        }
    }

    /// Shorthand for a JSON object body.
    pub fn json_body(parameters: Parameters) -> Self {
        HttpTask::RequestParameters {
            body_parameters: Some(parameters),
            body_encoding: ParameterEncoding::JsonEncoding,
            url_parameters: None,
        }
    }

    /// Multipart payload built from a form.
    pub fn multipart(form: MultipartForm) -> Self {
        let boundary = form.boundary().to_string();
        HttpTask::MultipartData {
            data: form.finish(),
            boundary,
        }
    }
}

/// Builder for `multipart/form-data` payloads.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    buffer: BytesMut,
}

impl MultipartForm {
    /// Create an empty form using the given boundary.
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buffer: BytesMut::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Append a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.append_boundary();
        self.append_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            name
        ));
        self.append_str(value);
        self.append_str("\r\n");
        self
    }

    /// Append a file part.
    pub fn file(mut self, name: &str, filename: &str, mime_type: &str, data: &[u8]) -> Self {
        self.append_boundary();
        self.append_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            name, filename
        ));
        self.append_str(&format!("Content-Type: {}\r\n\r\n", mime_type));
        self.buffer.put_slice(data);
        self.append_str("\r\n");
        self
    }

    /// Close the form and return the payload.
    pub fn finish(mut self) -> Bytes {
        let closing = format!("--{}--\r\n", self.boundary);
        self.append_str(&closing);
        self.buffer.freeze()
    }

    fn append_boundary(&mut self) {
        let line = format!("--{}\r\n", self.boundary);
        self.append_str(&line);
    }

    fn append_str(&mut self, s: &str) {
        self.buffer.put_slice(s.as_bytes());
    }
}

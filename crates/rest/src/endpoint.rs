//! Backend operations.

use serde_json::json;
use std::borrow::Cow;

use cutter_net::{parameters_from, EndpointDescriptor, HttpMethod, HttpTask, Parameters, Result};

use crate::models::SearchPostsBody;

/// One variant per backend operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EndPoint {
    /// `GET /posts?page=&style=`
    GetPosts { page: u32, style_id: u64 },
    /// `POST /search` with the search fields and `page` in a JSON body.
    SearchPosts { page: u32, body: SearchPostsBody },
    /// `GET /movies`
    GetMovies,
    /// `DELETE /user`
    DeleteUser,
}

impl EndpointDescriptor for EndPoint {
    fn path(&self) -> Cow<'_, str> {
        match self {
            EndPoint::GetPosts { .. } => Cow::Borrowed("/posts"),
            EndPoint::SearchPosts { .. } => Cow::Borrowed("/search"),
            EndPoint::GetMovies => Cow::Borrowed("/movies"),
            EndPoint::DeleteUser => Cow::Borrowed("/user"),
        }
    }

    fn http_method(&self) -> HttpMethod {
        match self {
            EndPoint::GetPosts { .. } | EndPoint::GetMovies => HttpMethod::Get,
            EndPoint::SearchPosts { .. } => HttpMethod::Post,
            EndPoint::DeleteUser => HttpMethod::Delete,
        }
    }

    fn task(&self) -> Result<HttpTask> {
        match self {
            EndPoint::GetPosts { page, style_id } => {
                let mut parameters = Parameters::new();
                parameters.insert("page".into(), json!(page));
                parameters.insert("style".into(), json!(style_id));
                Ok(HttpTask::url_parameters(parameters))
            }
            EndPoint::SearchPosts { page, body } => {
                let mut parameters = parameters_from(body)?;
                parameters.insert("page".into(), json!(page));
                Ok(HttpTask::json_body(parameters))
            }
            EndPoint::GetMovies | EndPoint::DeleteUser => Ok(HttpTask::Request),
        }
    }
}

//! Payload types exchanged with the backend.

use serde::{Deserialize, Serialize};

/// A post in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub style_id: Option<u64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Search criteria for `POST /search`.
///
/// Serialized fields become the JSON body, alongside the page number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPostsBody {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<u64>,
}

impl SearchPostsBody {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            style_id: None,
        }
    }

    pub fn with_style(mut self, style_id: u64) -> Self {
        self.style_id = Some(style_id);
        self
    }

    pub(crate) fn matches(&self, post: &Post) -> bool {
        if self.style_id.is_some() && self.style_id != post.style_id {
            return false;
        }

        let needle = self.query.to_lowercase();
        post.title.to_lowercase().contains(&needle)
            || post
                .body
                .as_deref()
                .map(|body| body.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

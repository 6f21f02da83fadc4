//! Offline API backed by a JSON fixture.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use cutter_net::Page;

use crate::api::Api;
use crate::error::{Error, ErrorKind, Result};
use crate::models::{Movie, Post, SearchPostsBody};

/// Posts served per page by the mocked API.
pub const MOCKED_PAGE_SIZE: usize = 10;

const BUNDLED_FIXTURE: &str = include_str!("../fixtures/mocked-data.json");

#[derive(Debug, Clone, Default, Deserialize)]
struct MockedData {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    movies: Vec<Movie>,
}

/// [`Api`] implementation that never touches the network.
///
/// Data comes from a `mocked-data.json` fixture with `posts` and `movies`
/// arrays. Pages are 1-based and hold [`MOCKED_PAGE_SIZE`] posts; the page
/// flag is set while posts remain after the returned page.
#[derive(Debug, Clone)]
pub struct MockedApiClient {
    data: MockedData,
}

impl MockedApiClient {
    /// Mocked API serving the fixture shipped with this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_FIXTURE)
    }

    /// Mocked API serving the fixture at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(ErrorKind::Fixture(path.display().to_string()), e)
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: MockedData = serde_json::from_str(json)
            .map_err(|e| Error::with_source(ErrorKind::Fixture(e.to_string()), e))?;

        debug!(
            posts = data.posts.len(),
            movies = data.movies.len(),
            "Loaded mocked data"
        );
        Ok(Self { data })
    }
}

fn paginate<'a>(posts: impl Iterator<Item = &'a Post>, page: u32) -> Page<Vec<Post>> {
    let start = (page.max(1) as usize - 1) * MOCKED_PAGE_SIZE;
    let mut remaining = posts.skip(start);
    let items: Vec<Post> = remaining.by_ref().take(MOCKED_PAGE_SIZE).cloned().collect();

    Page {
        items,
        has_more_content_available: remaining.next().is_some(),
    }
}

#[async_trait]
impl Api for MockedApiClient {
    async fn get_posts(&self, page: u32, style_id: u64) -> Result<Page<Vec<Post>>> {
        let posts = self
            .data
            .posts
            .iter()
            .filter(|post| post.style_id == Some(style_id));
        Ok(paginate(posts, page))
    }

    async fn search_posts(&self, page: u32, body: SearchPostsBody) -> Result<Page<Vec<Post>>> {
        let posts = self.data.posts.iter().filter(|post| body.matches(post));
        Ok(paginate(posts, page))
    }

    async fn delete_user(&self) -> Result<()> {
        debug!("Mocked user deletion");
        Ok(())
    }

    async fn fetch_movies(&self) -> Result<Vec<Movie>> {
        Ok(self.data.movies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn posts(count: u64, style_id: u64) -> Vec<serde_json::Value> {
        (1..=count)
            .map(|id| json!({"id": id, "title": format!("Post {}", id), "styleId": style_id}))
            .collect()
    }

    #[tokio::test]
    async fn test_bundled_fixture() {
        let api = MockedApiClient::bundled().unwrap();

        let movies = api.fetch_movies().await.unwrap();
        assert_eq!(movies.len(), 3);

        let page = api.get_posts(1, 1).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.items.iter().all(|post| post.style_id == Some(1)));
        assert!(!page.has_more_content_available);
    }

    #[tokio::test]
    async fn test_pagination() {
        let fixture = json!({ "posts": posts(12, 7) }).to_string();
        let api = MockedApiClient::from_json(&fixture).unwrap();

        let first = api.get_posts(1, 7).await.unwrap();
        assert_eq!(first.items.len(), MOCKED_PAGE_SIZE);
        assert!(first.has_more_content_available);

        let second = api.get_posts(2, 7).await.unwrap();
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.items[0].id, 11);
        assert!(!second.has_more_content_available);

        let beyond = api.get_posts(3, 7).await.unwrap();
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn test_search() {
        let api = MockedApiClient::bundled().unwrap();

        let page = api.search_posts(1, SearchPostsBody::new("linen")).await.unwrap();
        let ids: Vec<u64> = page.items.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![1, 6]);

        api.delete_user().await.unwrap();
    }

    #[test]
    fn test_missing_fixture_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = MockedApiClient::from_path(temp_dir.path().join("mocked-data.json")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Fixture(_)));
    }

    #[test]
    fn test_invalid_fixture_is_an_error() {
        let err = MockedApiClient::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Fixture(_)));
    }

    #[test]
    fn test_fixture_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mocked-data.json");
        std::fs::write(&path, json!({"movies": [{"id": 1, "title": "Alien"}]}).to_string()).unwrap();

        let api = MockedApiClient::from_path(&path).unwrap();
        assert_eq!(api.data.movies[0].title, "Alien");
        assert!(api.data.posts.is_empty());
    }
}

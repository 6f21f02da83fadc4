//! Cached movie list with change notifications.

use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::api::Api;
use crate::error::Result;
use crate::models::Movie;

/// Sent to subscribers whenever the cached movie list changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoviesUpdated;

/// Keeps the last fetched movie list and notifies subscribers on change.
pub struct MovieService {
    api: Arc<dyn Api>,
    movies: RwLock<Option<Vec<Movie>>>,
    updates: broadcast::Sender<MoviesUpdated>,
}

impl std::fmt::Debug for MovieService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieService")
            .field("cached", &self.movies().map(|movies| movies.len()))
            .field("subscribers", &self.updates.receiver_count())
            .finish_non_exhaustive()
    }
}

impl MovieService {
    pub fn new(api: Arc<dyn Api>) -> Self {
        let (updates, _) = broadcast::channel(16);
        Self {
            api,
            movies: RwLock::new(None),
            updates,
        }
    }

    /// The cached movies, `None` until the first successful refresh.
    pub fn movies(&self) -> Option<Vec<Movie>> {
        self.movies
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Receive a [`MoviesUpdated`] after every refresh.
    pub fn subscribe(&self) -> broadcast::Receiver<MoviesUpdated> {
        self.updates.subscribe()
    }

    /// Fetch the movie list and replace the cache.
    ///
    /// On error the cache is left untouched and nobody is notified.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize> {
        let movies = self.api.fetch_movies().await?;
        let count = movies.len();

        *self
            .movies
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(movies);

        // No subscribers is not an error.
        let _ = self.updates.send(MoviesUpdated);
        debug!(count, "Movies updated");

        Ok(count)
    }
}

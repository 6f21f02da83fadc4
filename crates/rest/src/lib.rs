//! # cutter-rest
//!
//! The app's backend API on top of `cutter-net`.
//!
//! ## Features
//!
//! - **Endpoints** - `GET /posts`, `POST /search`, `GET /movies`, `DELETE /user`
//! - **Pagination** - a `206 Partial Content` answer flags more pages
//! - **Mocked API** - serves `mocked-data.json` when launched with `-mockedApi`
//! - **Movie service** - cached movie list with change notifications
//!
//! ## Example
//!
//! ```rust,ignore
//! use cutter_rest::{Api, LiveBackend, Services};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cutter_rest::Error> {
//!     let services = Services::from_args(std::env::args(), live_backend)?;
//!
//!     let page = services.api().get_posts(1, 5).await?;
//!     for post in &page.items {
//!         println!("{}", post.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod endpoint;
mod error;
mod mock;
mod models;
mod movies;
mod services;

pub use api::{Api, ApiClient};
pub use endpoint::EndPoint;
pub use error::{Error, ErrorKind, Result};
pub use mock::{MockedApiClient, MOCKED_PAGE_SIZE};
pub use models::{Movie, Post, SearchPostsBody};
pub use movies::{MovieService, MoviesUpdated};
pub use services::{wants_mocked_api, LiveBackend, Services, MOCKED_API_ARGUMENT};

pub use cutter_net::Page;

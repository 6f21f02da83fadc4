//! Print the first page of posts and the movie list.
//!
//! ```sh
//! # Against the real backend
//! export CUTTER_SERVER_URL='https://api.example.com'
//! export CUTTER_API_KEY='...'
//! export CUTTER_TOKEN_URL='https://auth.example.com/oauth/token'
//! export CUTTER_CLIENT_ID='mobile-app'
//! cargo run --bin cutter-feed -- 5
//!
//! # Offline
//! cargo run --bin cutter-feed -- 5 -mockedApi
//! ```

use std::sync::Arc;

use cutter_api::rest::wants_mocked_api;
use cutter_api::{Api, ClientConfig, Environment, Keychain, LiveBackend, OAuthConfig, RefreshTokenProvider, Services};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let style_id = args
        .iter()
        .skip(1)
        .find_map(|arg| arg.parse::<u64>().ok())
        .unwrap_or(1);

    let services = if wants_mocked_api(&args) {
        Services::mocked()
    } else {
        let live = live_backend().unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("  Set CUTTER_SERVER_URL, CUTTER_API_KEY, CUTTER_TOKEN_URL and CUTTER_CLIENT_ID,");
            eprintln!("  or pass -mockedApi to run against bundled data.");
            std::process::exit(1);
        });
        Services::live(live)
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: Failed to start services: {e}");
        std::process::exit(1);
    });

    let mut failed = false;

    match services.api().get_posts(1, style_id).await {
        Ok(page) => {
            println!("Posts for style {style_id}:");
            for post in &page.items {
                println!("  #{} {}", post.id, post.title);
            }
            if page.has_more_content_available {
                println!("  ...more available");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            failed = true;
        }
    }

    let movies = services.movie_service();
    match movies.refresh().await {
        Ok(count) => {
            println!("\n{count} movies:");
            for movie in movies.movies().unwrap_or_default() {
                println!("  {}", movie.title);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn live_backend() -> Result<LiveBackend, Box<dyn std::error::Error>> {
    let environment = Environment::from_env()?;
    let keychain = Arc::new(Keychain::from_env()?);

    let token_url = std::env::var("CUTTER_TOKEN_URL").map_err(|_| "CUTTER_TOKEN_URL is not set")?;
    let client_id = std::env::var("CUTTER_CLIENT_ID").map_err(|_| "CUTTER_CLIENT_ID is not set")?;
    let mut oauth = OAuthConfig::new(&token_url, client_id)?;
    if let Ok(secret) = std::env::var("CUTTER_CLIENT_SECRET") {
        oauth = oauth.with_secret(secret);
    }

    Ok(LiveBackend {
        environment,
        credentials: keychain.clone(),
        refresher: Arc::new(RefreshTokenProvider::new(oauth, keychain)),
        config: ClientConfig::default(),
    })
}

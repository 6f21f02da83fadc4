//! Selects the live or mocked API at startup.

use std::sync::Arc;
use tracing::info;

use cutter_net::{ClientConfig, CredentialStore, Environment, TokenRefresher};

use crate::api::{Api, ApiClient};
use crate::error::Result;
use crate::mock::MockedApiClient;
use crate::movies::MovieService;

/// Launch argument that switches the app to the mocked API.
pub const MOCKED_API_ARGUMENT: &str = "-mockedApi";

/// Returns true when the launch arguments ask for the mocked API.
pub fn wants_mocked_api<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().any(|arg| arg.as_ref() == MOCKED_API_ARGUMENT)
}

/// Everything needed to talk to the real backend.
#[derive(Clone)]
pub struct LiveBackend {
    pub environment: Environment,
    pub credentials: Arc<dyn CredentialStore>,
    pub refresher: Arc<dyn TokenRefresher>,
    pub config: ClientConfig,
}

impl std::fmt::Debug for LiveBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveBackend")
            .field("environment", &self.environment)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The app's service container.
#[derive(Clone)]
pub struct Services {
    api: Arc<dyn Api>,
    mocked: bool,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("mocked", &self.mocked)
            .finish_non_exhaustive()
    }
}

impl Services {
    /// Use the bundled mocked API when `mocked` is set, the live one otherwise.
    ///
    /// `live` is only used to build the live client.
    pub fn new(mocked: bool, live: LiveBackend) -> Result<Self> {
        if mocked {
            Self::mocked()
        } else {
            Self::live(live)
        }
    }

    /// Pick the implementation from launch arguments.
    ///
    /// ```rust,ignore
    /// let services = Services::from_args(std::env::args(), live)?;
    /// ```
    pub fn from_args<I, S>(args: I, live: LiveBackend) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(wants_mocked_api(args), live)
    }

    /// Services over the bundled mocked data.
    pub fn mocked() -> Result<Self> {
        info!("Using mocked API");
        Ok(Self::with_api(Arc::new(MockedApiClient::bundled()?), true))
    }

    /// Services over the real backend.
    pub fn live(live: LiveBackend) -> Result<Self> {
        let api = ApiClient::new(live.environment, live.credentials, live.refresher, live.config)?;
        Ok(Self::with_api(Arc::new(api), false))
    }

    /// Wrap an existing implementation.
    pub fn with_api(api: Arc<dyn Api>, mocked: bool) -> Self {
        Self { api, mocked }
    }

    pub fn api(&self) -> &Arc<dyn Api> {
        &self.api
    }

    pub fn is_mocked(&self) -> bool {
        self.mocked
    }

    /// A movie service over this container's API.
    pub fn movie_service(&self) -> MovieService {
        MovieService::new(Arc::clone(&self.api))
    }
}

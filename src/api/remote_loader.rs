//! Loads launches from the remote launch API

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::http_client::HttpClient;
use super::mapper;
use crate::data::{LaunchItem, LaunchLoader, LoadCompletion};
use crate::liveness::Liveness;

/// Errors that can occur when loading launches from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemoteLoadError {
    /// The request did not reach the server or the response was lost
    #[error("Could not connect to the launch API")]
    Connectivity,

    /// The server answered, but not with a valid launch list
    #[error("The launch API returned invalid data")]
    InvalidData,
}

pub type RemoteLoadResult = Result<Vec<LaunchItem>, RemoteLoadError>;

/// Loads launches from a fixed URL through an injected [`HttpClient`]
///
/// Completions of requests still in flight when the loader is dropped are
/// discarded.
pub struct RemoteLaunchLoader<C: HttpClient + ?Sized> {
    url: Url,
    client: Arc<C>,
    liveness: Liveness,
}

impl<C: HttpClient + ?Sized> RemoteLaunchLoader<C> {
    pub fn new(url: Url, client: Arc<C>) -> Self {
        Self {
            url,
            client,
            liveness: Liveness::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Issues one GET and delivers the mapped result to `completion`
    ///
    /// Every call is independent: concurrent calls each get their own
    /// request and their own completion.
    pub fn load<F>(&self, completion: F)
    where
        F: FnOnce(RemoteLoadResult) + Send + 'static,
    {
        let watch = self.liveness.watch();
        let url = self.url.clone();

        debug!(%url, "requesting launches");
        self.client.get(
            &self.url,
            Box::new(move |result| {
                if !watch.is_alive() {
                    debug!(%url, "loader released before response, dropping result");
                    return;
                }

                let mapped = match result {
                    Ok(response) => mapper::map(&response.body, response.status),
                    Err(error) => {
                        warn!(%url, %error, "launch request failed");
                        Err(RemoteLoadError::Connectivity)
                    }
                };
                if let Err(RemoteLoadError::InvalidData) = mapped {
                    warn!(%url, "launch API returned invalid data");
                }
                completion(mapped);
            }),
        );
    }
}

impl<C: HttpClient + ?Sized> LaunchLoader for RemoteLaunchLoader<C> {
    type Error = RemoteLoadError;

    fn load(&self, completion: LoadCompletion<RemoteLoadError>) {
        RemoteLaunchLoader::load(self, completion);
    }

    /// A lost response is indistinguishable from a lost connection
    fn interrupted_error(&self) -> RemoteLoadError {
        RemoteLoadError::Connectivity
    }
}

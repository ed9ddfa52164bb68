//! [`HttpClient`] backed by reqwest

use reqwest::Client;
use tokio::runtime::Handle;
use tracing::debug;
use url::Url;

use super::http_client::{GetCompletion, HttpClient, HttpResponse, TransportError};

/// Performs requests on a tokio runtime and reports through the completion
///
/// The completion runs on one of the runtime's worker threads.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    runtime: Handle,
}

impl ReqwestHttpClient {
    /// Creates a client with default reqwest settings
    pub fn new(runtime: Handle) -> Self {
        Self::with_client(Client::new(), runtime)
    }

    /// Creates a client around a preconfigured reqwest client
    pub fn with_client(client: Client, runtime: Handle) -> Self {
        Self { client, runtime }
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &Url, completion: GetCompletion) {
        let request = self.client.get(url.clone());
        let url = url.clone();

        self.runtime.spawn(async move {
            let result = async {
                let response = request.send().await?;
                let status = response.status().as_u16();
                let body = response.bytes().await?.to_vec();
                Ok::<_, TransportError>(HttpResponse { status, body })
            }
            .await;

            match &result {
                Ok(response) => debug!(
                    %url,
                    status = response.status,
                    bytes = response.body.len(),
                    "GET finished"
                ),
                Err(error) => debug!(%url, %error, "GET failed"),
            }
            completion(result);
        });
    }
}

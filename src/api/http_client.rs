//! Transport abstraction used by the remote loader

use thiserror::Error;
use url::Url;

/// Raw answer to a GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, undecoded
    pub body: Vec<u8>,
}

/// The request could not be completed at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Sending the request or reading the body failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        TransportError::RequestFailed(error.to_string())
    }
}

pub type HttpClientResult = Result<HttpResponse, TransportError>;

/// Completion handed to [`HttpClient::get`]
pub type GetCompletion = Box<dyn FnOnce(HttpClientResult) + Send + 'static>;

/// Performs HTTP GET requests
///
/// Implementations must invoke the completion exactly once per call. The
/// completion can be invoked on any thread.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &Url, completion: GetCompletion);
}

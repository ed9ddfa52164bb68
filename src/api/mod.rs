//! Remote launch API
//!
//! This module loads launches from the remote endpoint: the transport
//! abstraction, the response mapper and the loader that ties them together.

mod http_client;
mod mapper;
mod remote_loader;
mod reqwest_client;

pub use http_client::{GetCompletion, HttpClient, HttpClientResult, HttpResponse, TransportError};
pub use mapper::map as map_launches;
pub use remote_loader::{RemoteLaunchLoader, RemoteLoadError, RemoteLoadResult};
pub use reqwest_client::ReqwestHttpClient;

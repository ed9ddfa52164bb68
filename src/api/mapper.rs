//! Maps launch API responses into domain launches

use serde::Deserialize;

use super::remote_loader::RemoteLoadError;
use crate::data::LaunchItem;

/// The only status the launch API answers with on success
const OK_200: u16 = 200;

/// Top-level response from the launch API
#[derive(Debug, Deserialize)]
struct Root {
    result: Vec<RemoteLaunchItem>,
}

/// A single launch record as sent over the wire
#[derive(Debug, Deserialize)]
struct RemoteLaunchItem {
    id: i64,
    name: String,
    /// Launch date, published under `date_str`
    date_str: String,
}

impl From<RemoteLaunchItem> for LaunchItem {
    fn from(remote: RemoteLaunchItem) -> Self {
        LaunchItem {
            id: remote.id,
            name: remote.name,
            date: remote.date_str,
        }
    }
}

/// Decodes a response body into launches
///
/// # Arguments
/// * `body` - Raw response bytes
/// * `status` - HTTP status code of the response
///
/// # Returns
/// * `Ok(Vec<LaunchItem>)` - Launches in the order the API sent them
/// * `Err(RemoteLoadError::InvalidData)` - If the status is not 200 or the
///   body does not match the expected schema
pub fn map(body: &[u8], status: u16) -> Result<Vec<LaunchItem>, RemoteLoadError> {
    if status != OK_200 {
        return Err(RemoteLoadError::InvalidData);
    }

    let root: Root = serde_json::from_slice(body).map_err(|_| RemoteLoadError::InvalidData)?;

    Ok(root.result.into_iter().map(LaunchItem::from).collect())
}

//! Typed calls to the backend, grouped by resource.
//!
//! Each function issues its request through an [`ApiClient`], so the bearer
//! header and the forced-logout rule apply everywhere. Failures propagate to
//! the caller as they are; nothing here substitutes placeholder data.

pub mod auth;
pub mod billing;
pub mod fleet;
pub mod profile;
pub mod settings;
pub mod support;
pub mod users;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::Listing;

/// Upper bound on pages followed by [`list_all`].
const MAX_PAGES: usize = 100;

/// Fetch a list resource, following `next` links until the last page.
///
/// Accepts both a bare array and a paginated envelope.
///
/// # Errors
///
/// Returns the first request or decoding error.
pub async fn list_all<T: DeserializeOwned>(client: &ApiClient, path: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut next = Some(path.to_string());
    let mut pages = 0;

    while let Some(url) = next.take() {
        let listing: Listing<T> = client.get(&url).await?;
        pages += 1;
        if let Listing::Page { next: link, .. } = &listing {
            next.clone_from(link);
        }
        items.extend(listing.into_items());

        if pages >= MAX_PAGES && next.is_some() {
            warn!(path, pages, "Stopped following pagination links");
            break;
        }
    }

    debug!(path, pages, count = items.len(), "Fetched list");
    Ok(items)
}

/// `accounts/<collection>/<id>/`
fn item_path(collection: &str, id: i64) -> String {
    format!("{collection}{id}/")
}

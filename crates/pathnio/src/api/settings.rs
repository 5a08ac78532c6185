//! Site settings.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{SiteSettings, SiteSettingsUpdate};

const SITE_SETTINGS: &str = "accounts/site-settings/";

/// Fetch the site settings.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn get(client: &ApiClient) -> Result<SiteSettings> {
    client.get(SITE_SETTINGS).await
}

/// Apply a partial update and return the stored settings.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn update(client: &ApiClient, changes: &SiteSettingsUpdate) -> Result<SiteSettings> {
    client.patch(SITE_SETTINGS, changes).await
}

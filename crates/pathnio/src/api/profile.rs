//! The signed-in account's profile.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::de::IgnoredAny;
use tracing::debug;

use super::auth::refresh_user;
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::models::{Profile, ProfileUpdate};

const PROFILE: &str = "accounts/profile/";
const COMPANY_ME: &str = "accounts/company/me/";

/// Form field the backend reads the photo from.
const PHOTO_FIELD: &str = "profile_photo";

/// Fetch the profile.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn fetch(client: &ApiClient) -> Result<Profile> {
    client.get(PROFILE).await
}

/// Update profile fields, then re-fetch the profile and the cached user.
///
/// # Errors
///
/// Returns an error if any request fails.
pub async fn update(client: &ApiClient, changes: &ProfileUpdate) -> Result<Profile> {
    client.patch::<_, IgnoredAny>(COMPANY_ME, changes).await?;
    refresh_user(client).await?;
    fetch(client).await
}

/// Upload a new profile photo from a local file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any request fails.
pub async fn upload_photo(client: &ApiClient, path: &Path) -> Result<Profile> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::internal(format!("not a file path: {}", path.display())))?
        .to_string();

    debug!(file = %path.display(), size = bytes.len(), "Uploading profile photo");
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))?;
    let form = Form::new().part(PHOTO_FIELD, part);

    client.patch_multipart::<IgnoredAny>(COMPANY_ME, form).await?;
    refresh_user(client).await?;
    fetch(client).await
}

/// MIME type from a file extension.
fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

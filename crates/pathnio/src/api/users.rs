//! User administration.

use super::list_all;
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{NewUser, User, UserUpdate};

const ALL: &str = "accounts/users/all/";
const COLLECTION: &str = "accounts/users/";

/// List every user.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list(client: &ApiClient) -> Result<Vec<User>> {
    list_all(client, ALL).await
}

/// Create a user.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn create(client: &ApiClient, user: &NewUser) -> Result<User> {
    client.post(COLLECTION, user).await
}

/// Update a user.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn update(client: &ApiClient, id: i64, changes: &UserUpdate) -> Result<User> {
    client.patch(&format!("{COLLECTION}{id}/"), changes).await
}

/// Delete a user.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("{COLLECTION}{id}/delete/")).await
}

//! Login, logout, token verification, password change and registration.

use serde::de::IgnoredAny;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::models::{
    CompanyRegistration, Credentials, DriverRegistration, PasswordChange, TokenPair, User,
};

const LOGIN: &str = "auth/token/login/";
const ME: &str = "auth/users/me/";
const VERIFY: &str = "auth/token/verify/";
const LOGOUT: &str = "accounts/auth/logout/";
const PASSWORD_CHANGE: &str = "accounts/auth/password/change/";
const REGISTER_COMPANY: &str = "accounts/register/company/";
const REGISTER_DRIVER: &str = "accounts/register/driver/";

/// Exchange credentials for tokens, store them, then cache the current user.
///
/// # Errors
///
/// Returns an error if either request fails or the session cannot be written.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<User> {
    let tokens: TokenPair = client.post(LOGIN, credentials).await?;
    client.session().store_tokens(&tokens)?;

    let user = current_user(client).await?;
    client.session().store_user(&user)?;
    info!(username = %user.username, "Logged in");
    Ok(user)
}

/// Fetch the signed-in user.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn current_user(client: &ApiClient) -> Result<User> {
    client.get(ME).await
}

/// Fetch the signed-in user and refresh the cached copy.
///
/// # Errors
///
/// Returns an error if the request fails or the session cannot be written.
pub async fn refresh_user(client: &ApiClient) -> Result<User> {
    let user = current_user(client).await?;
    client.session().store_user(&user)?;
    Ok(user)
}

/// End the session.
///
/// The server is told first when a token is held; its answer does not
/// matter. The local session is always cleared.
///
/// # Errors
///
/// Returns an error only if the local session cannot be cleared.
pub async fn logout(client: &ApiClient) -> Result<()> {
    if client.session().access_token()?.is_some() {
        match client.post_empty(LOGOUT).await {
            Ok(()) => debug!("Server acknowledged logout"),
            Err(e) => warn!("Server logout failed, clearing local session anyway: {e}"),
        }
    }
    client.session().clear()?;
    info!("Logged out");
    Ok(())
}

/// Ask the backend whether the stored access token is still valid.
///
/// Returns `false` without a request when no token is stored, and `false`
/// when the backend rejects the token with a client error.
///
/// # Errors
///
/// Returns transport and server errors. A 401 still ends the session.
pub async fn verify_token(client: &ApiClient) -> Result<bool> {
    let Some(token) = client.session().access_token()? else {
        return Ok(false);
    };
    let body = serde_json::json!({ "token": token });
    match client.post::<_, IgnoredAny>(VERIFY, &body).await {
        Ok(_) => Ok(true),
        Err(Error::Http { status, .. }) if status.is_client_error() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Change the signed-in user's password.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn change_password(client: &ApiClient, change: &PasswordChange) -> Result<()> {
    client
        .post::<_, IgnoredAny>(PASSWORD_CHANGE, change)
        .await
        .map(|_| ())
}

/// Register a company account. Returns the backend's echo of the record.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn register_company(
    client: &ApiClient,
    registration: &CompanyRegistration,
) -> Result<serde_json::Value> {
    client.post(REGISTER_COMPANY, registration).await
}

/// Register a driver account. Returns the backend's echo of the record.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn register_driver(
    client: &ApiClient,
    registration: &DriverRegistration,
) -> Result<serde_json::Value> {
    client.post(REGISTER_DRIVER, registration).await
}

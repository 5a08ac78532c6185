//! Subscriptions.

use super::{item_path, list_all};
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{NewSubscription, Subscription};

const SUBSCRIPTIONS: &str = "accounts/subscriptions/";

/// List the company's subscriptions.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list(client: &ApiClient) -> Result<Vec<Subscription>> {
    list_all(client, SUBSCRIPTIONS).await
}

/// Buy a plan by name.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn buy(client: &ApiClient, plan: &str) -> Result<Subscription> {
    let body = NewSubscription {
        plan: plan.to_string(),
    };
    client.post(SUBSCRIPTIONS, &body).await
}

/// Renew a subscription.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn renew(client: &ApiClient, id: i64) -> Result<()> {
    client
        .post_empty(&format!("{}renew/", item_path(SUBSCRIPTIONS, id)))
        .await
}

/// Cancel a subscription.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn cancel(client: &ApiClient, id: i64) -> Result<()> {
    client
        .post_empty(&format!("{}cancel/", item_path(SUBSCRIPTIONS, id)))
        .await
}

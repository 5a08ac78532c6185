//! Support tickets, the contact form and alerts.

use serde::de::IgnoredAny;

use super::{item_path, list_all};
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Alert, ContactMessage, NewTicket, Ticket, TicketReply};

const TICKETS: &str = "accounts/support/tickets/";
const CONTACT: &str = "accounts/contact/";
const ALERTS: &str = "accounts/alerts/";

/// List support tickets.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_tickets(client: &ApiClient) -> Result<Vec<Ticket>> {
    list_all(client, TICKETS).await
}

/// Open a ticket.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn create_ticket(client: &ApiClient, ticket: &NewTicket) -> Result<Ticket> {
    client.post(TICKETS, ticket).await
}

/// Reply to a ticket.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn reply(client: &ApiClient, id: i64, reply: &TicketReply) -> Result<()> {
    client
        .post::<_, IgnoredAny>(&format!("{}reply/", item_path(TICKETS, id)), reply)
        .await
        .map(|_| ())
}

/// Send the public contact form.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn contact(client: &ApiClient, message: &ContactMessage) -> Result<()> {
    client
        .post::<_, IgnoredAny>(CONTACT, message)
        .await
        .map(|_| ())
}

/// List dashboard alerts.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_alerts(client: &ApiClient) -> Result<Vec<Alert>> {
    list_all(client, ALERTS).await
}

//! Notification stream handler
//!
//! Workflow notifications for the caller's session are pushed as
//! server-sent events named `notification`, one JSON object each.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio::sync::broadcast::{self, error::RecvError};
use wardrobe_auth::AuthUser;
use wardrobe_common::Result;

use crate::api::middleware::ClosetState;
use crate::domain::notifications::Notification;

/// Event name used for every notification
const NOTIFICATION_EVENT: &str = "notification";

/// Stream the user's notifications until their session ends
pub async fn stream_notifications(
    AuthUser(identity): AuthUser,
    State(state): State<ClosetState>,
) -> Result<Sse<impl futures_core::Stream<Item = std::result::Result<Event, Infallible>>>> {
    let session = state.sessions.session_for(&identity).await?;
    let notifications = session.workflow().subscribe();
    tracing::debug!(owner = %identity, "Notification stream opened");

    Ok(Sse::new(notification_events(notifications)).keep_alive(KeepAlive::default()))
}

/// SSE events for everything received on `rx`. Ends when the workflow is
/// dropped; notifications missed by a lagging client are skipped.
pub(crate) fn notification_events(
    mut rx: broadcast::Receiver<Notification>,
) -> impl futures_core::Stream<Item = std::result::Result<Event, Infallible>> {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(notification) => {
                    let data = serde_json::to_string(&notification.event())
                        .unwrap_or_else(|_| "{}".to_string());
                    yield Ok(Event::default().event(NOTIFICATION_EVENT).data(data));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

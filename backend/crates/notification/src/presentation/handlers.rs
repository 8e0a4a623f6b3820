//! Notification HTTP Handlers
//!
//! Both routes sit behind the auth gate and act on the caller's own
//! notifications.

use axum::{Json, extract::State};

use auth::AuthContext;

use crate::application::service::NotificationService;
use crate::domain::entity::Notification;
use crate::domain::repository::NotificationRepository;
use crate::error::NotificationError;
use crate::presentation::dto::MarkAllReadResponse;

/// GET /notifications
pub async fn list<R>(
    State(service): State<NotificationService<R>>,
    context: AuthContext,
) -> Result<Json<Vec<Notification>>, NotificationError>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    let notifications = service.list(&context.identity_id).await?;
    Ok(Json(notifications))
}

/// PATCH /notifications/read-all
pub async fn mark_all_read<R>(
    State(service): State<NotificationService<R>>,
    context: AuthContext,
) -> Result<Json<MarkAllReadResponse>, NotificationError>
where
    R: NotificationRepository + Send + Sync + 'static,
{
    let updated = service.mark_all_read(&context.identity_id).await?;
    Ok(Json(MarkAllReadResponse {
        message: "Notifications marked as read",
        updated,
    }))
}

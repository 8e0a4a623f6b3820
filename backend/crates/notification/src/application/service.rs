//! Notification Service
//!
//! Persist first, then push. A failed or skipped push never fails the
//! call; the client catches up through the list endpoint.

use std::sync::Arc;

use kernel::error::app_error::FieldError;
use kernel::id::{ClassId, IdentityId};
use realtime::{ConnectionDirectory, ServerEvent};

use crate::domain::entity::{Category, Notification};
use crate::domain::repository::NotificationRepository;
use crate::error::{NotificationError, NotificationResult};

/// Input for [`NotificationService::create`]
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub recipient_id: IdentityId,
    pub message: String,
    pub category: Category,
    pub class_id: Option<ClassId>,
}

pub struct NotificationService<R>
where
    R: NotificationRepository,
{
    repo: Arc<R>,
    directory: Arc<ConnectionDirectory>,
}

impl<R> Clone for NotificationService<R>
where
    R: NotificationRepository,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            directory: self.directory.clone(),
        }
    }
}

impl<R> NotificationService<R>
where
    R: NotificationRepository,
{
    pub fn new(repo: Arc<R>, directory: Arc<ConnectionDirectory>) -> Self {
        Self { repo, directory }
    }

    pub async fn create(&self, input: CreateNotification) -> NotificationResult<Notification> {
        let message = input.message.trim();
        if message.is_empty() {
            return Err(NotificationError::Validation(vec![FieldError::new(
                "message",
                "Message must not be empty",
            )]));
        }

        let notification = Notification::new(
            input.recipient_id,
            message.to_string(),
            input.category,
            input.class_id,
        );
        self.repo.create(&notification).await?;

        tracing::info!(
            notification_id = %notification.notification_id,
            recipient_id = %notification.recipient_id,
            category = %notification.category,
            "Notification created"
        );

        self.push(&notification).await;
        Ok(notification)
    }

    pub async fn list(&self, recipient_id: &IdentityId) -> NotificationResult<Vec<Notification>> {
        self.repo.list_for_recipient(recipient_id).await
    }

    pub async fn mark_all_read(&self, recipient_id: &IdentityId) -> NotificationResult<u64> {
        let changed = self.repo.mark_all_read(recipient_id).await?;
        tracing::debug!(recipient_id = %recipient_id, changed, "Notifications marked read");
        Ok(changed)
    }

    async fn push(&self, notification: &Notification) {
        let payload = match serde_json::to_value(notification) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to encode notification for push");
                return;
            }
        };

        let delivered = self
            .directory
            .push(notification.recipient_id, &ServerEvent::Notification(payload))
            .await;
        if !delivered {
            tracing::debug!(
                notification_id = %notification.notification_id,
                recipient_id = %notification.recipient_id,
                "Recipient offline, notification stored only"
            );
        }
    }
}

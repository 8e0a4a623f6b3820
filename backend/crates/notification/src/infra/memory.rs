//! In-Memory Repository Implementation

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use kernel::id::IdentityId;
use tokio::sync::RwLock;

use crate::domain::entity::Notification;
use crate::domain::repository::NotificationRepository;
use crate::error::NotificationResult;

/// Notifications in insertion order
#[derive(Clone, Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notifications.read().await.is_empty()
    }
}

impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: &Notification) -> NotificationResult<()> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: &IdentityId,
    ) -> NotificationResult<Vec<Notification>> {
        // Reverse insertion order first so equal timestamps keep newest first
        let mut found: Vec<Notification> = self
            .notifications
            .read()
            .await
            .iter()
            .rev()
            .filter(|n| &n.recipient_id == recipient_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_all_read(&self, recipient_id: &IdentityId) -> NotificationResult<u64> {
        let now = Utc::now().trunc_subsecs(6);
        let mut notifications = self.notifications.write().await;
        let changed = notifications
            .iter_mut()
            .filter(|n| &n.recipient_id == recipient_id)
            .map(|n| n.mark_read(now))
            .filter(|changed| *changed)
            .count();
        Ok(changed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Category;

    #[tokio::test]
    async fn test_equal_timestamps_list_latest_insert_first() {
        let repo = InMemoryNotificationRepository::new();
        let recipient = IdentityId::new();

        let first = Notification::new(recipient, "first".into(), Category::Info, None);
        let mut second = Notification::new(recipient, "second".into(), Category::Info, None);
        second.created_at = first.created_at;
        second.updated_at = first.updated_at;

        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        let messages: Vec<_> = repo
            .list_for_recipient(&recipient)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, ["second", "first"]);
    }
}

//! Repository Traits

use kernel::id::IdentityId;

use crate::domain::entity::Notification;
use crate::error::NotificationResult;

#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    async fn create(&self, notification: &Notification) -> NotificationResult<()>;

    /// Newest first; equal timestamps list the later insert first
    async fn list_for_recipient(
        &self,
        recipient_id: &IdentityId,
    ) -> NotificationResult<Vec<Notification>>;

    /// Flag every unread notification of the recipient as read.
    ///
    /// Returns how many changed; a second call returns 0.
    async fn mark_all_read(&self, recipient_id: &IdentityId) -> NotificationResult<u64>;
}

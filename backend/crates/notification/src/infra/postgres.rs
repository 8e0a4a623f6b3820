//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ClassId, IdentityId, NotificationId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::Notification;
use crate::domain::repository::NotificationRepository;
use crate::error::NotificationResult;

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: &Notification) -> NotificationResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                notification_id,
                recipient_id,
                message,
                read,
                category,
                class_id,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.notification_id.as_uuid())
        .bind(notification.recipient_id.as_uuid())
        .bind(&notification.message)
        .bind(notification.read)
        .bind(notification.category.as_str())
        .bind(notification.class_id.map(ClassId::into_uuid))
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: &IdentityId,
    ) -> NotificationResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT
                notification_id,
                recipient_id,
                message,
                read,
                category,
                class_id,
                created_at,
                updated_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(recipient_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(NotificationRow::into_notification)
            .collect()
    }

    async fn mark_all_read(&self, recipient_id: &IdentityId) -> NotificationResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE, updated_at = NOW()
            WHERE recipient_id = $1 AND read = FALSE
            "#,
        )
        .bind(recipient_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct NotificationRow {
    notification_id: Uuid,
    recipient_id: Uuid,
    message: String,
    read: bool,
    category: String,
    class_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> NotificationResult<Notification> {
        Ok(Notification {
            notification_id: NotificationId::from_uuid(self.notification_id),
            recipient_id: IdentityId::from_uuid(self.recipient_id),
            message: self.message,
            read: self.read,
            category: self.category.parse()?,
            class_id: self.class_id.map(ClassId::from_uuid),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

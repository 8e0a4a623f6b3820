//! Notification Entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use kernel::id::{ClassId, IdentityId, NotificationId};
use serde::{Deserialize, Serialize};

use crate::error::NotificationError;

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Invite,
    Reminder,
    #[default]
    Info,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Invite => "invite",
            Category::Reminder => "reminder",
            Category::Info => "info",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invite" => Ok(Category::Invite),
            "reminder" => Ok(Category::Reminder),
            "info" => Ok(Category::Info),
            "other" => Ok(Category::Other),
            other => Err(NotificationError::UnknownCategory(other.to_string())),
        }
    }
}

/// A message addressed to one identity
///
/// Serialized as stored; this is also the payload of the realtime
/// `notification` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "id")]
    pub notification_id: NotificationId,
    pub recipient_id: IdentityId,
    pub message: String,
    pub read: bool,
    pub category: Category,
    pub class_id: Option<ClassId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// New unread notification
    ///
    /// Timestamps are cut to microseconds, the precision Postgres stores.
    pub fn new(
        recipient_id: IdentityId,
        message: String,
        category: Category,
        class_id: Option<ClassId>,
    ) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            notification_id: NotificationId::new(),
            recipient_id,
            message,
            read: false,
            category,
            class_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns whether the flag changed
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read {
            return false;
        }
        self.read = true;
        self.updated_at = at;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_is_unread() {
        let n = Notification::new(IdentityId::new(), "hi".into(), Category::Invite, None);
        assert!(!n.read);
        assert_eq!(n.created_at, n.updated_at);
    }

    #[test]
    fn test_timestamps_have_microsecond_precision() {
        for _ in 0..100 {
            let n = Notification::new(IdentityId::new(), "hi".into(), Category::Info, None);
            assert_eq!(n.created_at.timestamp_subsec_nanos() % 1000, 0);
            assert_eq!(n.updated_at, n.created_at);
        }
    }

    #[test]
    fn test_mark_read_only_once() {
        let mut n = Notification::new(IdentityId::new(), "hi".into(), Category::Info, None);
        let later = n.created_at + chrono::Duration::seconds(5);

        assert!(n.mark_read(later));
        assert!(n.read);
        assert_eq!(n.updated_at, later);

        assert!(!n.mark_read(later + chrono::Duration::seconds(5)));
        assert_eq!(n.updated_at, later);
    }

    #[test]
    fn test_wire_shape() {
        let class_id = ClassId::new();
        let n = Notification::new(
            IdentityId::new(),
            "Homework due".into(),
            Category::Reminder,
            Some(class_id),
        );
        let value = serde_json::to_value(&n).unwrap();

        assert_eq!(value["id"], n.notification_id.to_string());
        assert_eq!(value["recipientId"], n.recipient_id.to_string());
        assert_eq!(value["category"], "reminder");
        assert_eq!(value["classId"], class_id.to_string());
        assert_eq!(value["read"], false);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_category_parse() {
        for category in [
            Category::Invite,
            Category::Reminder,
            Category::Info,
            Category::Other,
        ] {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("party".parse::<Category>().is_err());
    }
}

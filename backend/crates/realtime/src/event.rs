//! Wire Events
//!
//! Every server frame is `{"event": <name>, "data": <payload>}`.

use axum::extract::ws::Message;
use kernel::id::IdentityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Handshake accepted
    Connected {
        #[serde(rename = "userId")]
        user_id: IdentityId,
    },
    /// A persisted notification, as stored
    Notification(serde_json::Value),
    /// Handshake rejected; the socket closes right after
    ConnectError { message: String },
}

impl ServerEvent {
    pub fn to_message(&self) -> Result<Message, serde_json::Error> {
        Ok(Message::Text(serde_json::to_string(self)?.into()))
    }
}

/// First client frame: `{"auth": {"token": "..."}}`
#[derive(Debug, Default, Deserialize)]
pub struct Handshake {
    #[serde(default)]
    pub auth: HandshakeAuth,
}

#[derive(Debug, Default, Deserialize)]
pub struct HandshakeAuth {
    #[serde(default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shapes() {
        let id = IdentityId::new();
        assert_eq!(
            serde_json::to_value(ServerEvent::Connected { user_id: id }).unwrap(),
            json!({"event": "connected", "data": {"userId": id.to_string()}})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::ConnectError {
                message: "Invalid token".into()
            })
            .unwrap(),
            json!({"event": "connect_error", "data": {"message": "Invalid token"}})
        );
        assert_eq!(
            serde_json::to_value(ServerEvent::Notification(json!({"message": "hi"}))).unwrap(),
            json!({"event": "notification", "data": {"message": "hi"}})
        );
    }

    #[test]
    fn test_handshake_tolerates_missing_parts() {
        let h: Handshake = serde_json::from_str("{}").unwrap();
        assert!(h.auth.token.is_none());
        let h: Handshake = serde_json::from_str(r#"{"auth":{}}"#).unwrap();
        assert!(h.auth.token.is_none());
        let h: Handshake = serde_json::from_str(r#"{"auth":{"token":"abc"}}"#).unwrap();
        assert_eq!(h.auth.token.as_deref(), Some("abc"));
    }
}

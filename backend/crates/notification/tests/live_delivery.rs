//! Notification delivery over a real realtime connection.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use auth::application::{SignInInput, SignInUseCase, SignUpInput, SignUpUseCase};
use auth::{AccessVerifier, AuthConfig, InMemoryAuthRepository};
use kernel::id::{ClassId, IdentityId};
use notification::{
    Category, CreateNotification, InMemoryNotificationRepository, NotificationService,
};
use realtime::{ConnectionDirectory, RealtimeConfig, realtime_router};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Next text frame as JSON, skipping control frames
async fn next_event(client: &mut Client) -> Value {
    let fut = async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                other => panic!("expected text frame, got {other:?}"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("timed out waiting for event")
}

async fn wait_for_connections(directory: &ConnectionDirectory, expected: usize) {
    for _ in 0..100 {
        if directory.connection_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(directory.connection_count().await, expected);
}

fn reminder(recipient_id: IdentityId, message: &str) -> CreateNotification {
    CreateNotification {
        recipient_id,
        message: message.to_string(),
        category: Category::Reminder,
        class_id: Some(ClassId::new()),
    }
}

#[tokio::test]
async fn test_signed_in_user_receives_stored_notification_then_lists_history() {
    let auth_repo = Arc::new(InMemoryAuthRepository::new());
    let auth_config = Arc::new(AuthConfig::development());
    let directory = Arc::new(ConnectionDirectory::new());
    let service = NotificationService::new(
        Arc::new(InMemoryNotificationRepository::new()),
        directory.clone(),
    );

    let router = realtime_router(
        directory.clone(),
        AccessVerifier::new(auth_repo.clone(), auth_config.clone()),
        Arc::new(RealtimeConfig::default()),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    SignUpUseCase::new(auth_repo.clone(), auth_repo.clone(), auth_config.clone())
        .execute(SignUpInput {
            display_name: "Sato Hanako".to_string(),
            email: "hanako@school.example".to_string(),
            user_name: "hanako".to_string(),
            password: "Chalkboard-42".to_string(),
            date_of_birth: "1990-06-15".to_string(),
            user_agent: None,
        })
        .await
        .unwrap();
    let signed_in = SignInUseCase::new(auth_repo.clone(), auth_repo.clone(), auth_config.clone())
        .execute(SignInInput {
            email: "hanako@school.example".to_string(),
            password: "Chalkboard-42".to_string(),
            user_agent: Some("integration".to_string()),
        })
        .await
        .unwrap();
    let user = signed_in.identity_id;

    let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
        .send(Message::Text(
            json!({"auth": {"token": signed_in.tokens.access_token}}).to_string(),
        ))
        .await
        .unwrap();
    let connected = next_event(&mut client).await;
    assert_eq!(connected["event"], "connected");
    assert_eq!(connected["data"]["userId"], user.to_string());
    wait_for_connections(&directory, 1).await;

    // Delivered live, identical to what was stored
    let first = service.create(reminder(user, "Homework due Friday")).await.unwrap();
    let pushed = next_event(&mut client).await;
    assert_eq!(pushed["event"], "notification");
    assert_eq!(pushed["data"], serde_json::to_value(&first).unwrap());

    let stored = service.list(&user).await.unwrap();
    assert_eq!(pushed["data"], serde_json::to_value(&stored[0]).unwrap());

    // Offline: still persisted
    client.close(None).await.unwrap();
    wait_for_connections(&directory, 0).await;

    let second = service.create(reminder(user, "Quiz moved to Monday")).await.unwrap();

    let history = service.list(&user).await.unwrap();
    assert_eq!(history, vec![second, first]);
}

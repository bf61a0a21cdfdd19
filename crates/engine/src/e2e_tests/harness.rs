//! Test server and WebSocket client helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use gauniv_domain::{UserAccount, UserId, UserName};
use gauniv_shared::messages::ServerMessage;

use crate::api;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::persistence::SqliteFriendStore;
use crate::infrastructure::ports::UserRepo;
use crate::use_cases::presence::PresenceNotifyPolicy;
use crate::App;

const WAIT: Duration = Duration::from_secs(5);
/// How long a client listens before concluding nothing is coming.
pub const QUIET: Duration = Duration::from_millis(300);

pub struct TestServer {
    pub addr: SocketAddr,
    pub app: Arc<App>,
    router: Router,
    serve_task: JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestServer {
    /// Start a server whose accounts are `users`, each with id == name.
    pub async fn start(policy: PresenceNotifyPolicy, users: &[&str]) -> Self {
        let db_dir = tempfile::tempdir().unwrap();
        let db_path = db_dir.path().join("e2e.db");
        let store = Arc::new(
            SqliteFriendStore::new(db_path.to_str().unwrap())
                .await
                .unwrap(),
        );
        for name in users {
            store
                .save(&UserAccount::new(
                    UserId::new(*name).unwrap(),
                    UserName::new(*name).unwrap(),
                ))
                .await
                .unwrap();
        }

        let app = Arc::new(App::new(
            store.clone(),
            store,
            Arc::new(SystemClock::new()),
            policy,
        ));
        let router = api::router(app.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let serve_router = router.clone();
        let serve_task = tokio::spawn(async move {
            axum::serve(listener, serve_router).await.unwrap();
        });

        Self {
            addr,
            app,
            router,
            serve_task,
            _db_dir: db_dir,
        }
    }

    /// Open a hub connection and wait until its online fanout has finished.
    pub async fn connect(&self, user: &str) -> HubClient {
        let url = format!("ws://{}{}?user_id={}", self.addr, api::HUB_PATH, user);
        let (stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();
        let mut client = HubClient { stream };
        // The server reads frames only after `on_opened` returns
        client.ping().await;
        client
    }

    /// Close `client` and wait until the server has unregistered it.
    pub async fn disconnect(&self, client: HubClient) {
        let before = self.app.presence.connection_count().await;
        client.close().await;
        self.wait_for_connections(before - 1).await;
    }

    pub async fn wait_for_connections(&self, expected: usize) {
        tokio::time::timeout(WAIT, async {
            while self.app.presence.connection_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("connection count never settled");
    }

    pub async fn post(&self, user: Option<&str>, path: &str) -> (StatusCode, String) {
        self.request("POST", user, path).await
    }

    pub async fn get(&self, user: Option<&str>, path: &str) -> (StatusCode, String) {
        self.request("GET", user, path).await
    }

    pub async fn get_json(&self, user: &str, path: &str) -> serde_json::Value {
        let (status, body) = self.get(Some(user), path).await;
        assert_eq!(status, StatusCode::OK, "GET {path} failed: {body}");
        serde_json::from_str(&body).unwrap()
    }

    /// `source` sends a request to `target` and `target` accepts it.
    pub async fn befriend(&self, source: &str, target: &str) {
        let (status, body) = self
            .post(Some(source), &format!("/api/friends/add/{target}"))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let (status, body) = self
            .post(Some(target), &format!("/api/friends/accept/{source}"))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    async fn request(&self, method: &str, user: Option<&str>, path: &str) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header(api::http::USER_ID_HEADER, user);
        }
        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.serve_task.abort();
    }
}

pub struct HubClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl HubClient {
    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .unwrap();
    }

    /// Send an application ping and wait for the matching pong.
    ///
    /// Presence events queued before the pong are lost, so callers ping only
    /// when nothing else is expected.
    pub async fn ping(&mut self) {
        self.send_text(r#"{"type":"Ping"}"#).await;
        loop {
            match self.recv(WAIT).await {
                Some(ServerMessage::Pong) => return,
                Some(_) => continue,
                None => panic!("no pong received"),
            }
        }
    }

    /// Next server message, or `None` if nothing arrives within `wait`.
    pub async fn recv(&mut self, wait: Duration) -> Option<ServerMessage> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let frame = tokio::time::timeout_at(deadline, self.stream.next())
                .await
                .ok()??;
            match frame.ok()? {
                Message::Text(text) => return Some(serde_json::from_str(&text).unwrap()),
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    pub async fn expect(&mut self) -> ServerMessage {
        self.recv(WAIT).await.expect("expected a server message")
    }

    pub async fn expect_silence(&mut self) {
        let message = self.recv(QUIET).await;
        assert!(message.is_none(), "unexpected message: {message:?}");
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

pub fn online(user_id: &str) -> ServerMessage {
    ServerMessage::FriendOnline {
        user_id: user_id.to_string(),
    }
}

pub fn offline(user_id: &str) -> ServerMessage {
    ServerMessage::FriendOffline {
        user_id: user_id.to_string(),
    }
}

//! Application state and composition.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::api::ConnectionManager;
use crate::infrastructure::ports::{ClockPort, ConnectionPushPort, FriendRepo, UserRepo};
use crate::stores::PresenceRegistry;
use crate::use_cases::friends::{
    AcceptFriend, FriendUseCases, ListRelations, RemoveRelation, RequestFriend,
};
use crate::use_cases::presence::{
    ConnectionLifecycle, NotifyFriends, PresenceNotifyPolicy, PresenceUseCases,
};

/// Main application state.
///
/// Holds the process-wide presence registry, the push channels and the use
/// cases built on the repositories. Passed to HTTP/WebSocket handlers via Axum
/// state.
pub struct App {
    pub use_cases: UseCases,
    pub presence: Arc<PresenceRegistry>,
    pub connections: Arc<ConnectionManager>,
    shutdown: watch::Sender<bool>,
}

/// Container for all use cases.
pub struct UseCases {
    pub friends: FriendUseCases,
    pub presence: PresenceUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        friends: Arc<dyn FriendRepo>,
        users: Arc<dyn UserRepo>,
        clock: Arc<dyn ClockPort>,
        notify_policy: PresenceNotifyPolicy,
    ) -> Self {
        let presence = Arc::new(PresenceRegistry::new());
        let connections = Arc::new(ConnectionManager::new());
        let push: Arc<dyn ConnectionPushPort> = connections.clone();

        let notify_friends = Arc::new(NotifyFriends::new(
            friends.clone(),
            presence.clone(),
            push,
        ));
        let lifecycle = Arc::new(ConnectionLifecycle::new(
            presence.clone(),
            notify_friends.clone(),
            notify_policy,
        ));

        let friend_use_cases = FriendUseCases::new(
            Arc::new(ListRelations::new(friends.clone(), presence.clone())),
            Arc::new(RequestFriend::new(users, friends.clone(), clock.clone())),
            Arc::new(AcceptFriend::new(friends.clone(), clock)),
            Arc::new(RemoveRelation::new(friends)),
        );

        let (shutdown, _) = watch::channel(false);

        Self {
            use_cases: UseCases {
                friends: friend_use_cases,
                presence: PresenceUseCases::new(notify_friends, lifecycle),
            },
            presence,
            connections,
            shutdown,
        }
    }

    /// Receiver whose value flips to `true` on `begin_shutdown`.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Tell every open socket to close with `CloseReason::ServerShutdown`.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

/// Wait for `signal`, then close every open presence socket.
///
/// Returns without shutting down when the signal itself fails.
pub async fn shutdown_on<F>(app: Arc<App>, signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    let connections = app.presence.connection_count().await;
    tracing::info!(connections, "Shutting down");
    app.begin_shutdown();
}

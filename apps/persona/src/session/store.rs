use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::persona::Persona;
use crate::session::controller::SessionController;

pub type SharedSession = Arc<Mutex<SessionController>>;

/// Sessions with no request for this long are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct SessionEntry {
    controller: SharedSession,
    last_active: Instant,
}

/// One `SessionController` per UI client, keyed by session id.
///
/// The table lock is only held to look up, insert or remove an entry; each
/// session's own lock serializes its turns. Idle sessions are evicted on
/// `create` and by the background sweep started with `spawn_sweeper`. A turn
/// already in flight keeps its controller alive until it finishes.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub async fn create(&self, persona: Arc<Persona>) -> Uuid {
        self.evict_idle().await;
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            controller: Arc::new(Mutex::new(SessionController::new(persona))),
            last_active: Instant::now(),
        };
        self.sessions.lock().await.insert(id, entry);
        id
    }

    /// Looks up a live session and marks it active.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(&id)?;
        if entry.last_active.elapsed() > self.idle_ttl {
            sessions.remove(&id);
            return None;
        }
        entry.last_active = Instant::now();
        Some(entry.controller.clone())
    }

    /// Ends a session. Returns false if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Drops every session idle for longer than the TTL. Returns how many.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_active.elapsed() <= self.idle_ttl);
        before - sessions.len()
    }

    /// Runs `evict_idle` every minute for the life of the process.
    pub fn spawn_sweeper(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    info!("Evicted {evicted} idle session(s), {} active", store.len().await);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::testing::fallback_persona;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        let persona = Arc::new(fallback_persona().0);
        let a = store.create(persona.clone()).await;
        let b = store.create(persona).await;
        assert_ne!(a, b);

        store
            .get(a)
            .await
            .unwrap()
            .lock()
            .await
            .handle_user_message("skills?")
            .await
            .unwrap();

        assert_eq!(store.get(a).await.unwrap().lock().await.transcript().len(), 2);
        assert!(store.get(b).await.unwrap().lock().await.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(30 * 60));
        let persona = Arc::new(fallback_persona().0);
        let active = store.create(persona.clone()).await;
        let idle = store.create(persona).await;

        tokio::time::advance(Duration::from_secs(20 * 60)).await;
        assert!(store.get(active).await.is_some());
        tokio::time::advance(Duration::from_secs(15 * 60)).await;

        assert_eq!(store.evict_idle().await, 1);
        assert!(store.get(idle).await.is_none());
        assert!(store.get(active).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_session_is_not_returned_or_kept() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let persona = Arc::new(fallback_persona().0);
        let stale = store.create(persona.clone()).await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(store.get(stale).await.is_none());

        store.create(persona).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        store.create(Arc::new(fallback_persona().0)).await;
        store.spawn_sweeper();

        tokio::time::sleep(Duration::from_secs(150)).await;

        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_remove_session() {
        let store = SessionStore::default();
        let id = store.create(Arc::new(fallback_persona().0)).await;

        assert_eq!(store.len().await, 1);
        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
    }
}

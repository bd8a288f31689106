use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::assistant::Conversation;

pub const SESSION_COOKIE: &str = "campus_session";

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

type HmacSha256 = Hmac<Sha256>;

/// One browser's conversation. The mutex is held for a whole chat turn, so
/// turns within a session never interleave.
#[derive(Clone)]
pub struct Session {
    pub id: Uuid,
    pub conversation: Arc<Mutex<Conversation>>,
}

struct Entry {
    conversation: Arc<Mutex<Conversation>>,
    last_seen: Instant,
}

/// In-memory conversations keyed by an HMAC-signed session id.
pub struct SessionStore {
    mac: HmacSha256,
    idle_ttl: Duration,
    sessions: Mutex<HashMap<Uuid, Entry>>,
}

impl SessionStore {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_idle_ttl(secret, DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(secret: impl AsRef<[u8]>, idle_ttl: Duration) -> Self {
        Self {
            mac: HmacSha256::new_from_slice(secret.as_ref())
                .expect("HMAC accepts keys of any length"),
            idle_ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn keyed(&self, id: &Uuid) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac
    }

    /// Cookie value for `id`: `<uuid>.<hex hmac>`.
    pub fn sign(&self, id: &Uuid) -> String {
        let tag = self.keyed(id).finalize().into_bytes();
        format!("{}.{}", id, hex::encode(tag))
    }

    /// Session id from a cookie value, if the signature checks out.
    pub fn verify(&self, cookie_value: &str) -> Option<Uuid> {
        let (raw_id, signature) = cookie_value.split_once('.')?;
        let id = Uuid::parse_str(raw_id).ok()?;
        let tag = hex::decode(signature).ok()?;
        self.keyed(&id).verify_slice(&tag).ok()?;
        Some(id)
    }

    /// Existing session for a verified id. Unknown or expired ids yield `None`.
    pub async fn lookup(&self, id: Uuid) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&id)?.last_seen.elapsed() >= self.idle_ttl {
            sessions.remove(&id);
            debug!(session = %id, "Session expired");
            return None;
        }
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(Session {
            id,
            conversation: entry.conversation.clone(),
        })
    }

    /// Start a new, empty session. Idle sessions are swept first.
    pub async fn create(&self) -> Session {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.idle_ttl);
        if sessions.len() < before {
            debug!(evicted = before - sessions.len(), "Evicted idle sessions");
        }

        let id = Uuid::new_v4();
        let conversation = Arc::new(Mutex::new(Conversation::new()));
        sessions.insert(
            id,
            Entry {
                conversation: conversation.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(session = %id, "Starting new session");
        Session { id, conversation }
    }

    /// Empty a session's history. Waits for any in-flight turn to finish.
    pub async fn clear(&self, session: &Session) {
        session.conversation.lock().await.clear();
        debug!(session = %session.id, "Cleared conversation");
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

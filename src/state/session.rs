use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

/// Lifetime of a session when none is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Session identifier and the forgery token bound to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    /// Value of the session cookie.
    pub session_id: String,
    /// Token every state-changing request of this session must echo back.
    pub csrf_token: String,
}

struct SessionEntry {
    csrf_token: String,
    issued_at: Instant,
}

/// Registry of live sessions and their forgery tokens.
///
/// Sessions expire `ttl` after being issued. Expired entries are swept
/// whenever a new session is issued and are never returned by lookups.
pub struct SessionRegistry {
    entries: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Registry using [`DEFAULT_SESSION_TTL`].
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    /// Registry whose sessions live for `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Open a new session with a fresh token.
    pub fn issue(&self) -> SessionContext {
        self.prune_expired();

        let session_id = Uuid::new_v4().simple().to_string();
        let csrf_token = Uuid::new_v4().simple().to_string();
        self.entries.insert(
            session_id.clone(),
            SessionEntry {
                csrf_token: csrf_token.clone(),
                issued_at: Instant::now(),
            },
        );
        SessionContext {
            session_id,
            csrf_token,
        }
    }

    /// Resolve a session presented by the client.
    pub fn lookup(&self, session_id: &str) -> Option<SessionContext> {
        self.drop_if_expired(session_id);
        self.entries.get(session_id).map(|entry| SessionContext {
            session_id: session_id.to_owned(),
            csrf_token: entry.csrf_token.clone(),
        })
    }

    /// Whether `token` is the one bound to the live session `session_id`.
    pub fn verify(&self, session_id: &str, token: &str) -> bool {
        self.drop_if_expired(session_id);
        self.entries
            .get(session_id)
            .is_some_and(|entry| tokens_match(&entry.csrf_token, token))
    }

    fn drop_if_expired(&self, session_id: &str) {
        let ttl = self.ttl;
        self.entries
            .remove_if(session_id, |_, entry| entry.issued_at.elapsed() >= ttl);
    }

    fn prune_expired(&self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| entry.issued_at.elapsed() < ttl);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare tokens without returning early on the first differing byte.
fn tokens_match(expected: &str, submitted: &str) -> bool {
    let (expected, submitted) = (expected.as_bytes(), submitted.as_bytes());
    if expected.len() != submitted.len() {
        return false;
    }
    expected
        .iter()
        .zip(submitted)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

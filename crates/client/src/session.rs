//! Identity session with a single writer and many readers.
//!
//! Only the identity layer holds the [`SessionWriter`]; screens hold cheap
//! [`SessionReader`] clones.

use serde::Serialize;
use tokio::sync::watch;

use shds_auth::AuthPhase;

/// Identity-provider token attached to directory requests.
#[derive(Clone, PartialEq, Eq)]
pub struct IdToken(String);

impl IdToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for IdToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("IdToken(***)")
    }
}

/// Who is signed in, as reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub identity: Identity,
    pub token: IdToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// The provider has not reported yet.
    #[default]
    Loading,
    SignedOut,
    SignedIn(SignedIn),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::SignedIn(_))
    }

    pub fn token(&self) -> Option<&IdToken> {
        match self {
            Session::SignedIn(s) => Some(&s.token),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::SignedIn(s) => Some(&s.identity),
            _ => None,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        match self {
            Session::Loading => AuthPhase::Loading,
            Session::SignedOut => AuthPhase::SignedOut,
            Session::SignedIn(_) => AuthPhase::SignedIn,
        }
    }
}

/// Creates the session channel.
pub struct SessionStore;

impl SessionStore {
    pub fn channel() -> (SessionWriter, SessionReader) {
        let (tx, rx) = watch::channel(Session::Loading);
        (SessionWriter { tx }, SessionReader { rx })
    }
}

/// The one producer of session updates. Deliberately not `Clone`.
#[derive(Debug)]
pub struct SessionWriter {
    tx: watch::Sender<Session>,
}

impl SessionWriter {
    /// Publish a new session; readers are only woken when it changed.
    pub fn publish(&self, session: Session) {
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    pub fn sign_in(&self, identity: Identity, token: IdToken) {
        self.publish(Session::SignedIn(SignedIn { identity, token }));
    }

    pub fn sign_out(&self) {
        self.publish(Session::SignedOut);
    }

    pub fn reader(&self) -> SessionReader {
        SessionReader {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionReader {
    rx: watch::Receiver<Session>,
}

impl SessionReader {
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Wait until the provider has reported, then return the session.
    ///
    /// If the writer goes away while still loading, the user is treated as
    /// signed out.
    pub async fn settled(&self) -> Session {
        let mut rx = self.rx.clone();
        loop {
            let session = rx.borrow_and_update().clone();
            if session != Session::Loading {
                return session;
            }
            if rx.changed().await.is_err() {
                return Session::SignedOut;
            }
        }
    }

    /// Wait for the next change after the one currently observed.
    pub async fn changed(&mut self) -> Option<Session> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn alice() -> Identity {
        Identity {
            uid: "u1".to_string(),
            email: Some("alice@example.org".to_string()),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn settled_waits_for_first_report() {
        let (writer, reader) = SessionStore::channel();
        assert_eq!(reader.current().phase(), AuthPhase::Loading);

        let waiter = tokio::spawn({
            let reader = reader.clone();
            async move { reader.settled().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        writer.sign_in(alice(), IdToken::new("t1"));
        let session = waiter.await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().map(IdToken::as_str), Some("t1"));
    }

    #[tokio::test]
    async fn dropped_writer_means_signed_out() {
        let (writer, reader) = SessionStore::channel();
        drop(writer);
        assert_eq!(reader.settled().await, Session::SignedOut);
    }

    #[tokio::test]
    async fn identical_publish_does_not_wake_readers() {
        let (writer, mut reader) = SessionStore::channel();
        writer.sign_out();
        assert_eq!(reader.changed().await, Some(Session::SignedOut));

        writer.sign_out();
        let woke = tokio::time::timeout(Duration::from_millis(20), reader.changed()).await;
        assert!(woke.is_err());
    }

    #[test]
    fn token_debug_is_redacted() {
        assert_eq!(format!("{:?}", IdToken::new("abc")), "IdToken(***)");
    }
}

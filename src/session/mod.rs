use anyhow::Context;
use chrono::Duration;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::auth::{ids, AuthError, PasskeyGate, SessionCipher};
use crate::model::device::{ClientInfo, DeviceRecord};
use crate::model::session::{Session, FULL_ACCESS};
use crate::registry::DeviceRegistry;
use crate::storage::{Storage, StorageScope, SESSION_KEY};

/// Outcome of a timeout check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Valid,
    /// The session was idle too long and has been cleared. Carries the
    /// session as it was before clearing.
    Expired(Session),
    NoSession,
}

/// Owns the single console session and its persistence.
///
/// Remembered sessions go to the local scope encrypted with the passkey;
/// the rest go to the session scope as plain JSON.
pub struct SessionManager {
    storage: Storage,
    gate: PasskeyGate,
    cipher: SessionCipher,
    registry: DeviceRegistry,
    timeout: Duration,
    current: Session,
    scope: Option<StorageScope>,
}

impl SessionManager {
    pub fn new(
        storage: Storage,
        gate: PasskeyGate,
        cipher: SessionCipher,
        registry: DeviceRegistry,
        timeout: Duration,
    ) -> Self {
        Self {
            storage,
            gate,
            cipher,
            registry,
            timeout,
            current: Session::anonymous(),
            scope: None,
        }
    }

    pub fn current(&self) -> &Session {
        &self.current
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_authenticated
    }

    pub fn scope(&self) -> Option<StorageScope> {
        self.scope
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Passkey check, device bookkeeping, session write.
    ///
    /// A device id is reused only when the client presents one that is
    /// still active; reuse does not take a new registry slot. A login over
    /// an active session replaces it, the displaced device keeps its slot.
    pub fn login<R: Rng + ?Sized>(
        &mut self,
        passkey: &str,
        remember_device: bool,
        client: &ClientInfo,
        now_ms: i64,
        rng: &mut R,
    ) -> Result<&Session, AuthError> {
        if !self.gate.accepts(passkey) {
            warn!("login rejected: invalid passkey");
            return Err(AuthError::InvalidPasskey);
        }

        let reused = client.device_id.as_deref().and_then(|id| {
            self.registry
                .active(now_ms)
                .into_iter()
                .find(|d| d.id == id)
        });

        if reused.is_none() && !self.registry.has_capacity(now_ms) {
            warn!(
                max = self.registry.max_devices(),
                "login rejected: device limit reached"
            );
            return Err(AuthError::DeviceLimit {
                max: self.registry.max_devices(),
            });
        }

        let device_id = match reused {
            Some(device) => device.id,
            None => ids::device_id(&client.user_agent, now_ms),
        };

        self.registry.register(
            DeviceRecord {
                id: device_id.clone(),
                user_agent: client.user_agent.clone(),
                platform: client.platform.clone(),
                login_ts: now_ms,
                last_active_ts: now_ms,
            },
            now_ms,
        )?;

        let session = Session {
            is_authenticated: true,
            session_id: Some(ids::session_id(now_ms, rng)),
            device_id: Some(device_id),
            login_ts: Some(now_ms),
            last_activity_ts: Some(now_ms),
            permissions: vec![FULL_ACCESS.to_string()],
        };

        let scope = if remember_device {
            StorageScope::Local
        } else {
            StorageScope::Session
        };
        self.persist(&session, scope)?;
        self.storage
            .scope(other_scope(scope))
            .remove(SESSION_KEY)?;

        info!(
            session_id = session.session_id.as_deref().unwrap_or_default(),
            device_id = session.device_id.as_deref().unwrap_or_default(),
            ?scope,
            "ceo login"
        );

        if self.current.is_authenticated {
            info!(
                displaced = self.current.session_id.as_deref().unwrap_or_default(),
                "active session replaced by new login"
            );
        }
        self.current = session;
        self.scope = Some(scope);
        Ok(&self.current)
    }

    /// Refresh last activity for the session and its device.
    pub fn touch(&mut self, now_ms: i64) -> Result<(), AuthError> {
        if !self.current.is_authenticated {
            return Err(AuthError::NotAuthenticated);
        }

        self.current.last_activity_ts = Some(now_ms);
        if let Some(scope) = self.scope {
            let session = self.current.clone();
            self.persist(&session, scope)?;
        }
        if let Some(device_id) = self.current.device_id.as_deref() {
            self.registry.touch(device_id, now_ms)?;
        }
        Ok(())
    }

    /// Clear the session if it has been idle longer than the timeout.
    pub fn check_timeout(&mut self, now_ms: i64) -> Result<SessionCheck, AuthError> {
        match self.current.idle_ms(now_ms) {
            None => Ok(SessionCheck::NoSession),
            Some(idle) if idle > self.timeout.num_milliseconds() => {
                info!(idle_ms = idle, "session timed out");
                let expired = self.logout()?;
                Ok(SessionCheck::Expired(expired))
            }
            Some(_) => Ok(SessionCheck::Valid),
        }
    }

    /// Forget the session, its stored copies and its device. Returns the
    /// session as it was.
    pub fn logout(&mut self) -> Result<Session, AuthError> {
        let previous = std::mem::take(&mut self.current);
        self.scope = None;

        self.storage.local().remove(SESSION_KEY)?;
        self.storage.session().remove(SESSION_KEY)?;

        if let Some(device_id) = previous.device_id.as_deref() {
            self.registry.remove(device_id)?;
        }

        info!(
            session_id = previous.session_id.as_deref().unwrap_or_default(),
            "ceo logout"
        );
        Ok(previous)
    }

    /// Pick up a stored session: local scope first, then session scope.
    /// Returns true when a still-valid session was adopted.
    pub fn restore(&mut self, now_ms: i64) -> Result<bool, AuthError> {
        for scope in [StorageScope::Local, StorageScope::Session] {
            let Some(stored) = self.load(scope) else {
                continue;
            };
            if !stored.is_authenticated {
                continue;
            }

            self.current = stored;
            self.scope = Some(scope);

            match self.check_timeout(now_ms)? {
                SessionCheck::Valid => {}
                SessionCheck::Expired(_) => {
                    debug!(?scope, "stored session expired");
                    continue;
                }
                SessionCheck::NoSession => {
                    self.current = Session::anonymous();
                    self.scope = None;
                    continue;
                }
            }

            self.touch(now_ms)?;
            info!(?scope, "session restored");
            return Ok(true);
        }
        Ok(false)
    }

    fn load(&self, scope: StorageScope) -> Option<Session> {
        let raw = match self.storage.scope(scope).get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(?scope, error = %e, "session restoration error");
                return None;
            }
        };

        match scope {
            StorageScope::Local => self.cipher.decrypt_or_none(&raw),
            StorageScope::Session => serde_json::from_str(&raw)
                .map_err(|e| warn!(error = %e, "session restoration error"))
                .ok(),
        }
    }

    fn persist(&self, session: &Session, scope: StorageScope) -> Result<(), AuthError> {
        let raw = match scope {
            StorageScope::Local => self
                .cipher
                .encrypt(session)
                .context("Failed to encrypt session")?,
            StorageScope::Session => {
                serde_json::to_string(session).context("Failed to encode session")?
            }
        };
        self.storage.scope(scope).set(SESSION_KEY, &raw)?;
        Ok(())
    }
}

fn other_scope(scope: StorageScope) -> StorageScope {
    match scope {
        StorageScope::Local => StorageScope::Session,
        StorageScope::Session => StorageScope::Local,
    }
}

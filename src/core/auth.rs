//! Mock authentication with auth-state subscriptions
//!
//! No real identity provider: any email with a long enough password signs
//! in. The signed-in user is persisted under the `user` key so a restarted
//! service can restore it.

use std::sync::{Arc, Mutex, Weak};
use tracing::info;

use crate::core::store::{decode, KeyValueStore};
use crate::types::User;
use crate::{BiasLensError, Result, MIN_PASSWORD_LEN};

const USER_KEY: &str = "user";

type Listener = Arc<dyn Fn(Option<&User>) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

fn lock_registry(registry: &Mutex<Registry>) -> std::sync::MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Observers of auth-state changes
#[derive(Clone, Default)]
pub struct AuthSubject {
    registry: Arc<Mutex<Registry>>,
}

impl AuthSubject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every future change until the returned
    /// handle is dropped
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&User>) + Send + Sync + 'static,
    {
        let mut registry = lock_registry(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Call every listener with the new state
    pub fn notify(&self, user: Option<&User>) {
        // Listeners run outside the lock so they may (un)subscribe
        let listeners: Vec<Listener> = lock_registry(&self.registry)
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(user);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock_registry(&self.registry).listeners.len()
    }
}

/// Handle returned by `AuthSubject::subscribe`; dropping it deregisters
#[must_use = "dropping the subscription immediately deregisters the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Deregister now
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock_registry(&registry).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Mock auth service
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    user: Mutex<Option<User>>,
    subject: AuthSubject,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            user: Mutex::new(None),
            subject: AuthSubject::new(),
        }
    }

    fn current(&self) -> std::sync::MutexGuard<'_, Option<User>> {
        self.user.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn validate(email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(BiasLensError::EmptyEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BiasLensError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok(())
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        Self::validate(email, password)?;
        let user = User {
            email: email.trim().to_string(),
            id: uuid::Uuid::new_v4().to_string(),
        };
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;
        *self.current() = Some(user.clone());
        info!(user_id = %user.id, "user signed in");
        self.subject.notify(Some(&user));
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        self.sign_in(email, password)
    }

    pub fn signup(&self, email: &str, password: &str) -> Result<User> {
        self.sign_in(email, password)
    }

    pub fn logout(&self) -> Result<()> {
        *self.current() = None;
        self.store.remove(USER_KEY)?;
        info!("user signed out");
        self.subject.notify(None);
        Ok(())
    }

    /// In-memory user, or the one persisted by an earlier sign-in
    pub fn current_user(&self) -> Result<Option<User>> {
        let mut current = self.current();
        if current.is_none() {
            if let Some(raw) = self.store.get(USER_KEY)? {
                *current = Some(decode(USER_KEY, &raw)?);
            }
        }
        Ok(current.clone())
    }

    /// Subscribe to sign-in and sign-out events
    pub fn on_auth_state_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&User>) + Send + Sync + 'static,
    {
        self.subject.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (AuthService::new(store.clone()), store)
    }

    #[test]
    fn test_short_password_rejected() {
        let (auth, _) = service();
        let err = auth.login("a@b.c", "12345").unwrap_err();
        assert!(matches!(err, BiasLensError::PasswordTooShort(6)));
        assert_eq!(auth.current_user().unwrap(), None);
    }

    #[test]
    fn test_empty_email_rejected() {
        let (auth, _) = service();
        assert!(matches!(auth.signup("  ", "secret1"), Err(BiasLensError::EmptyEmail)));
    }

    #[test]
    fn test_login_persists_and_restores() {
        let (auth, store) = service();
        let user = auth.login("reader@example.com", "secret1").unwrap();
        assert_eq!(user.email, "reader@example.com");

        let restored = AuthService::new(store);
        assert_eq!(restored.current_user().unwrap(), Some(user));
    }

    #[test]
    fn test_logout_clears_user() {
        let (auth, store) = service();
        auth.signup("reader@example.com", "secret1").unwrap();
        auth.logout().unwrap();
        assert_eq!(auth.current_user().unwrap(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let (auth, _) = service();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _sub = auth.on_auth_state_change(move |user| {
            sink.lock().unwrap().push(user.map(|u| u.email.clone()));
        });

        auth.login("reader@example.com", "secret1").unwrap();
        auth.logout().unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![Some("reader@example.com".to_string()), None]
        );
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let subject = AuthSubject::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = subject.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        subject.notify(None);
        assert_eq!(subject.listener_count(), 1);

        sub.unsubscribe();
        subject.notify(None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(subject.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_subject() {
        let subject = AuthSubject::new();
        let sub = subject.subscribe(|_| {});
        drop(subject);
        drop(sub);
    }
}

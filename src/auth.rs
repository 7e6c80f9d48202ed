//! Demo-grade auth session over the store.
//!
//! Two states: anonymous or authenticated. The authenticated profile is
//! persisted under the `user` key so the session survives a restart.
//!
//! Credentials are compared and stored in plaintext. This is a
//! demonstration scheme, not production auth: no hashing, no session
//! token, no expiry.

use chrono::Utc;

use crate::domain::{User, UserId};
use crate::store::{keys, KeyValueStore, StoreError};

#[derive(Debug)]
pub enum AuthError {
    /// Email/password pair didn't match any user
    InvalidCredentials,
    /// Registration email is already taken
    DuplicateEmail,
    /// A required registration field was empty
    MissingField(&'static str),
    Store(StoreError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::DuplicateEmail => write!(f, "User already exists"),
            Self::MissingField(field) => write!(f, "Missing required field: {}", field),
            Self::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Registration form input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct AuthSession<'a, S: KeyValueStore> {
    store: &'a S,
    user: Option<User>,
}

impl<'a, S: KeyValueStore> AuthSession<'a, S> {
    /// Restore the session from the store: authenticated if a well-formed
    /// profile is persisted, anonymous otherwise. A malformed profile is
    /// discarded so the next start comes up clean.
    pub fn init(store: &'a S) -> Self {
        let user = match store.get_as::<User>(keys::CURRENT_USER) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Discarding malformed current-user entry: {}", e);
                let _ = store.remove(keys::CURRENT_USER);
                None
            }
        };
        Self { store, user }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Exact email/password match against the user collection. The returned
    /// and persisted profile has the password stripped.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let users: Vec<User> = self.store.get_as(keys::USERS)?.unwrap_or_default();
        let found = users
            .iter()
            .find(|u| u.email == email && u.password.as_deref() == Some(password));
        match found {
            Some(user) => {
                let profile = user.sanitized();
                self.store.set_as(keys::CURRENT_USER, &profile)?;
                tracing::info!("User {} logged in", profile.id);
                self.user = Some(profile.clone());
                Ok(profile)
            }
            None => Err(AuthError::InvalidCredentials),
        }
    }

    /// Create an account and log it in immediately. A duplicate email leaves
    /// the user collection untouched.
    pub fn register(&mut self, new_user: NewUser) -> Result<User, AuthError> {
        if new_user.name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if new_user.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if new_user.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let mut users: Vec<User> = self.store.get_as(keys::USERS)?.unwrap_or_default();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AuthError::DuplicateEmail);
        }

        let id = next_user_id(&users);
        let user = User::new(id, &new_user.name, &new_user.email, &new_user.password);
        users.push(user.clone());
        self.store.set_as(keys::USERS, &users)?;

        let profile = user.sanitized();
        self.store.set_as(keys::CURRENT_USER, &profile)?;
        tracing::info!("Registered user {} ({})", profile.id, profile.email);
        self.user = Some(profile.clone());
        Ok(profile)
    }

    /// Back to anonymous; the persisted profile is removed
    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(keys::CURRENT_USER) {
            tracing::warn!("Failed to clear current user: {}", e);
        }
        self.user = None;
    }
}

/// Timestamp-based id, bumped past any collision from same-millisecond
/// registrations
fn next_user_id(users: &[User]) -> UserId {
    let mut id = Utc::now().timestamp_millis();
    while users.iter().any(|u| u.id == id) {
        id += 1;
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_register_then_login() {
        let store = MemoryStore::new();
        let mut session = AuthSession::init(&store);
        assert!(!session.is_authenticated());

        let registered = session.register(new_user("a@example.com")).unwrap();
        assert!(session.is_authenticated());
        // Profiles leaving the session never carry the password
        assert!(registered.password.is_none());

        session.logout();
        assert!(!session.is_authenticated());

        let logged_in = session.login("a@example.com", "secret").unwrap();
        assert_eq!(logged_in.id, registered.id);
        assert!(logged_in.password.is_none());
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let store = MemoryStore::new();
        let mut session = AuthSession::init(&store);
        session.register(new_user("a@example.com")).unwrap();
        session.logout();

        assert!(matches!(
            session.login("a@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            session.login("nobody@example.com", "secret"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_duplicate_email_leaves_collection_unchanged() {
        let store = MemoryStore::new();
        let mut session = AuthSession::init(&store);
        session.register(new_user("a@example.com")).unwrap();

        let before: Vec<User> = store.get_as(keys::USERS).unwrap().unwrap();
        let result = session.register(new_user("a@example.com"));
        assert!(matches!(result, Err(AuthError::DuplicateEmail)));

        let after: Vec<User> = store.get_as(keys::USERS).unwrap().unwrap();
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0].id, before[0].id);
    }

    #[test]
    fn test_register_requires_fields() {
        let store = MemoryStore::new();
        let mut session = AuthSession::init(&store);

        let mut blank_name = new_user("a@example.com");
        blank_name.name = "  ".to_string();
        assert!(matches!(
            session.register(blank_name),
            Err(AuthError::MissingField("name"))
        ));

        let mut blank_password = new_user("a@example.com");
        blank_password.password = String::new();
        assert!(matches!(
            session.register(blank_password),
            Err(AuthError::MissingField("password"))
        ));
    }

    #[test]
    fn test_session_restores_from_store() {
        let store = MemoryStore::new();
        {
            let mut session = AuthSession::init(&store);
            session.register(new_user("a@example.com")).unwrap();
        }
        let session = AuthSession::init(&store);
        assert!(session.is_authenticated());
        assert_eq!(session.current_user().unwrap().email, "a@example.com");
    }

    #[test]
    fn test_malformed_current_user_is_discarded() {
        let store = MemoryStore::new();
        store
            .set(keys::CURRENT_USER, &json!({"unexpected": true}))
            .unwrap();

        let session = AuthSession::init(&store);
        assert!(!session.is_authenticated());
        assert!(store.get(keys::CURRENT_USER).unwrap().is_none());
    }

    #[test]
    fn test_same_millisecond_ids_stay_unique() {
        let store = MemoryStore::new();
        let mut session = AuthSession::init(&store);
        let first = session.register(new_user("a@example.com")).unwrap();
        let second = session.register(new_user("b@example.com")).unwrap();
        assert_ne!(first.id, second.id);
    }
}

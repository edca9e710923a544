//! Session store implementation.

use super::models::{AdminProfile, Realm, SessionSnapshot};
use super::storage::TokenStorage;
use crate::api::{
    Ack, Admin, ApiClient, ApiResult, RegisterRequest, RegisterResponse, UserProfile,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the user and admin sessions side by side.
///
/// The two slices never share a token: each is persisted under its own
/// storage key, validated against its own endpoint, and cleared on its
/// own. Signing out of one leaves the other untouched.
pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn TokenStorage>,
    state: RwLock<SessionSnapshot>,
}

impl SessionStore {
    /// Open a store, picking up any tokens left in `storage`.
    ///
    /// The store starts in the loading state; call
    /// [`initialize`](Self::initialize) to validate the stored tokens.
    pub fn open(api: ApiClient, storage: Arc<dyn TokenStorage>) -> Self {
        let mut state = SessionSnapshot {
            loading: true,
            ..Default::default()
        };
        state.user.token = read_token(storage.as_ref(), Realm::User);
        state.admin.token = read_token(storage.as_ref(), Realm::Admin);

        Self {
            api,
            storage,
            state: RwLock::new(state),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Validate stored tokens and leave the loading state.
    ///
    /// The user token is checked against `/user/profile` and the admin token
    /// against `/admin/dashboard`, concurrently. A token whose check fails
    /// for any reason is removed from the store and from storage.
    pub async fn initialize(&self) {
        let (user_token, admin_token) = {
            let state = self.state.read().await;
            (state.user.token.clone(), state.admin.token.clone())
        };

        let user_check = async {
            match &user_token {
                Some(token) => Some(self.api.profile(token).await),
                None => None,
            }
        };
        let admin_check = async {
            match &admin_token {
                Some(token) => Some(self.api.admin_dashboard(token).await),
                None => None,
            }
        };
        let (user_result, admin_result) = tokio::join!(user_check, admin_check);

        let mut cleared = Vec::new();
        {
            let mut state = self.state.write().await;
            match user_result {
                Some(Ok(profile)) if state.user.token == user_token => {
                    state.user.profile = Some(profile);
                }
                Some(Err(e)) if state.user.token == user_token => {
                    log::error!("User token validation failed: {}", e);
                    state.user = Default::default();
                    cleared.push(Realm::User);
                }
                _ => {}
            }
            match admin_result {
                Some(Ok(stats)) if state.admin.token == admin_token => {
                    state.admin.profile = Some(AdminProfile::Dashboard(stats));
                }
                Some(Err(e)) if state.admin.token == admin_token => {
                    log::error!("Admin token validation failed: {}", e);
                    state.admin = Default::default();
                    cleared.push(Realm::Admin);
                }
                _ => {}
            }
            state.loading = false;
        }

        for realm in cleared {
            self.persist(realm, None).await;
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    pub async fn is_admin(&self) -> bool {
        self.state.read().await.is_admin()
    }

    /// Bearer token for a realm, if signed in
    pub async fn token(&self, realm: Realm) -> Option<String> {
        let state = self.state.read().await;
        match realm {
            Realm::User => state.user.token.clone(),
            Realm::Admin => state.admin.token.clone(),
        }
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.state.read().await.user.profile.clone()
    }

    /// Wallet balance of the cached profile, zero when none is loaded
    pub async fn wallet_balance(&self) -> f64 {
        self.state.read().await.user.wallet_balance()
    }

    // ------------------------------------------------------------------
    // User session
    // ------------------------------------------------------------------

    /// Register a new account. No session is started until the OTP is verified.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.api.register(request).await
    }

    /// Verify the registration OTP and start the user session
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ApiResult<UserProfile> {
        let auth = self.api.verify_otp(email, otp).await?;
        self.begin_user(auth.token, auth.user.clone()).await;
        Ok(auth.user)
    }

    pub async fn resend_otp(&self, email: &str) -> ApiResult<Ack> {
        self.api.resend_otp(email).await
    }

    /// Login and start the user session
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<UserProfile> {
        let auth = self.api.login(email, password).await?;
        self.begin_user(auth.token, auth.user.clone()).await;
        log::info!("Signed in as {}", auth.user.email);
        Ok(auth.user)
    }

    /// End the user session; the admin session is unaffected
    pub async fn logout(&self) {
        self.end(Realm::User).await;
    }

    /// Re-read the profile (wallet balance, bank account) for the user session.
    ///
    /// Does nothing without a user token. A `401` ends the user session.
    pub async fn refresh_profile(&self) -> ApiResult<()> {
        let Some(token) = self.token(Realm::User).await else {
            return Ok(());
        };

        match self.api.profile(&token).await {
            Ok(profile) => {
                let mut state = self.state.write().await;
                if state.user.token.as_deref() == Some(token.as_str()) {
                    state.user.profile = Some(profile);
                }
                Ok(())
            }
            Err(e) => {
                log::warn!("Profile refresh failed: {}", e);
                if e.is_unauthorized() {
                    self.expire(Realm::User, &token).await;
                }
                Err(e)
            }
        }
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<Ack> {
        self.api.forgot_password(email).await
    }

    /// Confirm a password-reset OTP; returns the backend's reset token
    pub async fn verify_reset_otp(&self, email: &str, otp: &str) -> ApiResult<String> {
        Ok(self.api.verify_reset_otp(email, otp).await?.reset_token)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> ApiResult<Ack> {
        self.api.reset_password(email, otp, new_password).await
    }

    // ------------------------------------------------------------------
    // Admin session
    // ------------------------------------------------------------------

    /// Login and start the admin session
    pub async fn admin_login(&self, email: &str, password: &str) -> ApiResult<Admin> {
        let auth = self.api.admin_login(email, password).await?;
        {
            let mut state = self.state.write().await;
            state.admin.token = Some(auth.token.clone());
            state.admin.profile = Some(AdminProfile::Account(auth.admin.clone()));
        }
        self.persist(Realm::Admin, Some(auth.token.clone())).await;
        log::info!("Signed in to the admin console as {}", auth.admin.email);
        Ok(auth.admin)
    }

    /// End the admin session; the user session is unaffected
    pub async fn admin_logout(&self) {
        self.end(Realm::Admin).await;
    }

    // ------------------------------------------------------------------
    // Shared
    // ------------------------------------------------------------------

    /// Drop a realm's session after the backend refused `token`.
    ///
    /// Ignored when the realm has since moved on to a different token.
    pub async fn expire(&self, realm: Realm, token: &str) {
        {
            let mut state = self.state.write().await;
            let current = match realm {
                Realm::User => state.user.token.as_deref(),
                Realm::Admin => state.admin.token.as_deref(),
            };
            if current != Some(token) {
                return;
            }
            log::warn!("{} session expired", realm);
            match realm {
                Realm::User => state.user = Default::default(),
                Realm::Admin => state.admin = Default::default(),
            }
        }
        self.persist(realm, None).await;
    }

    async fn begin_user(&self, token: String, profile: UserProfile) {
        {
            let mut state = self.state.write().await;
            state.user.token = Some(token.clone());
            state.user.profile = Some(profile);
        }
        self.persist(Realm::User, Some(token)).await;
    }

    async fn end(&self, realm: Realm) {
        {
            let mut state = self.state.write().await;
            match realm {
                Realm::User => state.user = Default::default(),
                Realm::Admin => state.admin = Default::default(),
            }
        }
        self.persist(realm, None).await;
    }

    /// Write a realm's token through to storage.
    ///
    /// Called with the state lock released; storage may block on file I/O,
    /// so it runs on the blocking pool.
    async fn persist(&self, realm: Realm, token: Option<String>) {
        let storage = self.storage.clone();
        let key = realm.storage_key();
        let written = tokio::task::spawn_blocking(move || match token {
            Some(token) => storage.set(key, &token),
            None => storage.remove(key),
        })
        .await;

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("Failed to persist {} token: {}", realm, e),
            Err(e) => log::warn!("Failed to persist {} token: {}", realm, e),
        }
    }
}

fn read_token(storage: &dyn TokenStorage, realm: Realm) -> Option<String> {
    match storage.get(realm.storage_key()) {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            log::warn!("Failed to read stored {} token: {}", realm, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::{MemoryStorage, StorageResult};
    use std::sync::{Mutex, OnceLock, Weak};

    fn offline_store(storage: Arc<MemoryStorage>) -> SessionStore {
        SessionStore::open(ApiClient::new("http://127.0.0.1:19999/api"), storage)
    }

    #[tokio::test]
    async fn test_open_reads_both_tokens_and_starts_loading() {
        let storage = Arc::new(MemoryStorage::with_entries([
            ("token", "user-token"),
            ("adminToken", "admin-token"),
        ]));
        let store = offline_store(storage);

        let snapshot = store.snapshot().await;
        assert!(snapshot.loading);
        assert_eq!(snapshot.user.token.as_deref(), Some("user-token"));
        assert_eq!(snapshot.admin.token.as_deref(), Some("admin-token"));
        assert!(!snapshot.is_authenticated());
        assert!(!snapshot.is_admin());
    }

    #[tokio::test]
    async fn test_initialize_without_tokens_finishes_loading() {
        let store = offline_store(Arc::new(MemoryStorage::new()));
        store.initialize().await;
        assert!(!store.is_loading().await);
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_initialize_clears_tokens_when_backend_unreachable() {
        let storage = Arc::new(MemoryStorage::with_entries([
            ("token", "user-token"),
            ("adminToken", "admin-token"),
        ]));
        let store = offline_store(storage.clone());
        store.initialize().await;

        assert_eq!(store.token(Realm::User).await, None);
        assert_eq!(store.token(Realm::Admin).await, None);
        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(storage.get("adminToken").unwrap(), None);
    }

    #[tokio::test]
    async fn test_expire_ignores_stale_token() {
        let storage = Arc::new(MemoryStorage::with_entries([("token", "fresh")]));
        let store = offline_store(storage.clone());

        store.expire(Realm::User, "stale").await;
        assert_eq!(store.token(Realm::User).await.as_deref(), Some("fresh"));

        store.expire(Realm::User, "fresh").await;
        assert_eq!(store.token(Realm::User).await, None);
        assert_eq!(storage.get("token").unwrap(), None);
    }

    /// Records, on every write, whether the session lock was free
    struct LockCheckingStorage {
        inner: MemoryStorage,
        store: OnceLock<Weak<SessionStore>>,
        lock_free: Mutex<Vec<bool>>,
    }

    impl LockCheckingStorage {
        fn record(&self) {
            if let Some(store) = self.store.get().and_then(Weak::upgrade) {
                let free = store.state.try_write().is_ok();
                self.lock_free.lock().unwrap().push(free);
            }
        }
    }

    impl TokenStorage for LockCheckingStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.record();
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.record();
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn test_tokens_are_persisted_with_session_lock_released() {
        let storage = Arc::new(LockCheckingStorage {
            inner: MemoryStorage::with_entries([
                ("token", "user-token"),
                ("adminToken", "admin-token"),
            ]),
            store: OnceLock::new(),
            lock_free: Mutex::new(Vec::new()),
        });
        let store = Arc::new(SessionStore::open(
            ApiClient::new("http://127.0.0.1:19999/api"),
            storage.clone(),
        ));
        let _ = storage.store.set(Arc::downgrade(&store));

        // Both stored tokens fail validation and are cleared
        store.initialize().await;
        store.logout().await;
        store.admin_logout().await;

        assert_eq!(*storage.lock_free.lock().unwrap(), vec![true; 4]);
        assert_eq!(storage.get("token").unwrap(), None);
        assert_eq!(storage.get("adminToken").unwrap(), None);
    }

    #[tokio::test]
    async fn test_refresh_without_token_is_noop() {
        let store = offline_store(Arc::new(MemoryStorage::new()));
        assert!(store.refresh_profile().await.is_ok());
    }
}

//! Session state for the two independent sign-ins: user and admin.
//!
//! Each realm keeps its own bearer token and cached profile:
//! - the user token is persisted under `token` and validated against `/user/profile`
//! - the admin token is persisted under `adminToken` and validated against `/admin/dashboard`
//!
//! ## Example
//!
//! ```no_run
//! use flexinvest::api::ApiClient;
//! use flexinvest::session::{FileStorage, SessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(FileStorage::new("/tmp/flexinvest/session.json"));
//!     let store = SessionStore::open(ApiClient::new("http://localhost:8000/api"), storage);
//!     store.initialize().await;
//!
//!     if store.is_authenticated().await {
//!         println!("Wallet: {}", store.wallet_balance().await);
//!     }
//! }
//! ```

pub mod models;
pub mod storage;
pub mod store;

pub use models::{AdminProfile, AdminSession, Realm, SessionSnapshot, UserSession};
pub use storage::{FileStorage, MemoryStorage, StorageError, StorageResult, TokenStorage};
pub use store::SessionStore;

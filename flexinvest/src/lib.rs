//! # FlexInvest
//!
//! Headless client for the FlexInvest investment platform.
//!
//! The backend owns every business rule. This crate holds what a client
//! needs around it: typed REST calls, the user and admin sessions, route
//! guards, and one controller per page that validates input, issues
//! requests, and reports the outcome as toasts.
//!
//! ## Core Modules
//!
//! - [`api`]: REST client, wire models and error taxonomy
//! - [`session`]: the two independent sessions and token persistence
//! - [`router`]: route table and authentication guards
//! - [`pages`]: page controllers with request scopes and in-flight guards
//! - [`notify`]: toast sinks
//! - [`format`]: currency and date display
//!
//! ## Example
//!
//! ```no_run
//! use flexinvest::{ApiClient, MemoryStorage, PageContext, SessionStore, ToastLog};
//! use flexinvest::pages::{LoginPage, Page};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = ApiClient::new("http://localhost:8000/api");
//!     let session = Arc::new(SessionStore::open(api, Arc::new(MemoryStorage::new())));
//!     session.initialize().await;
//!
//!     let toasts = Arc::new(ToastLog::new());
//!     let ctx = PageContext::new(session, toasts.clone());
//!
//!     let page = LoginPage::new(ctx);
//!     page.load().await.ok();
//!     if let Ok(next) = page.login("ada@example.com", "secret1").await {
//!         println!("navigate to {}", next);
//!     }
//!     for toast in toasts.drain() {
//!         println!("{}", toast);
//!     }
//! }
//! ```

pub mod api;
pub use api::{ApiClient, ApiError, ApiResult, ProofUpload};

pub mod format;

pub mod notify;
pub use notify::{Notifier, Toast, ToastKind, ToastLog};

pub mod pages;
pub use pages::{Page, PageContext, PageError, PageResult};

pub mod router;
pub use router::{Guard, Route};

pub mod session;
pub use session::{FileStorage, MemoryStorage, Realm, SessionSnapshot, SessionStore, TokenStorage};

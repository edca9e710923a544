#![allow(dead_code)]

use flexinvest::notify::ToastKind;
use flexinvest::{ApiClient, MemoryStorage, PageContext, SessionStore, ToastLog};
use httpmock::Method::GET;
use httpmock::{Mock, MockServer};
use serde_json::{Value, json};
use std::sync::Arc;

pub const USER_TOKEN: &str = "user-token";
pub const ADMIN_TOKEN: &str = "admin-token";

/// Backend stand-in plus a client wired to it.
pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub session: Arc<SessionStore>,
    pub toasts: Arc<ToastLog>,
}

impl Harness {
    /// Fresh client with the given tokens left in storage
    pub async fn with_storage(entries: &[(&str, &str)]) -> Self {
        let server = MockServer::start_async().await;
        let storage = Arc::new(MemoryStorage::with_entries(entries.iter().copied()));
        let api = ApiClient::new(server.url("/api"));
        let session = Arc::new(SessionStore::open(api, storage.clone()));
        Self {
            server,
            storage,
            session,
            toasts: Arc::new(ToastLog::new()),
        }
    }

    pub async fn anonymous() -> Self {
        let harness = Self::with_storage(&[]).await;
        harness.session.initialize().await;
        harness
    }

    /// Client whose stored user token validates against `/user/profile`
    pub async fn signed_in_user(wallet_balance: f64) -> Self {
        let harness = Self::with_storage(&[("token", USER_TOKEN)]).await;
        harness.mock_profile(wallet_balance).await;
        harness.session.initialize().await;
        harness
    }

    /// Client whose stored admin token validates against `/admin/dashboard`
    pub async fn signed_in_admin() -> Self {
        let harness = Self::with_storage(&[("adminToken", ADMIN_TOKEN)]).await;
        harness.mock_admin_dashboard().await;
        harness.session.initialize().await;
        harness
    }

    pub fn ctx(&self) -> PageContext {
        PageContext::new(self.session.clone(), self.toasts.clone())
    }

    pub async fn mock_profile(&self, wallet_balance: f64) -> Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/user/profile")
                    .header("Authorization", format!("Bearer {}", USER_TOKEN));
                then.status(200).json_body(user_json(wallet_balance));
            })
            .await
    }

    pub async fn mock_admin_dashboard(&self) -> Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/admin/dashboard")
                    .header("Authorization", format!("Bearer {}", ADMIN_TOKEN));
                then.status(200).json_body(stats_json());
            })
            .await
    }

    pub fn last_toast(&self) -> Option<(ToastKind, String)> {
        self.toasts.last().map(|t| (t.kind, t.message))
    }
}

pub fn user_json(wallet_balance: f64) -> Value {
    json!({
        "id": "u-1",
        "email": "ada@example.com",
        "full_name": "Ada Obi",
        "phone": "08012345678",
        "is_verified": 1,
        "wallet_balance": wallet_balance,
        "bank_account": null
    })
}

pub fn stats_json() -> Value {
    json!({
        "total_users": 12,
        "pending_deposits": 2,
        "pending_withdrawals": 1,
        "open_complaints": 0,
        "active_investments": 5,
        "total_deposited": 250000.0,
        "total_withdrawn": 40000.0
    })
}

pub fn package_json(id: &str, capital: f64) -> Value {
    json!({
        "id": id,
        "capital": capital,
        "daily_profit": capital / 10.0,
        "duration": 30,
        "total_return": capital * 3.0
    })
}

pub fn deposit_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": "u-1",
        "user_email": "ada@example.com",
        "user_name": "Ada Obi",
        "amount": 25200.0,
        "proof_image": "aGVsbG8=",
        "status": status,
        "admin_note": null,
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": null
    })
}

pub fn withdrawal_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": "u-1",
        "user_email": "ada@example.com",
        "user_name": "Ada Obi",
        "amount": 10000.0,
        "bank_name": "Kuda Bank",
        "account_number": "0123456789",
        "account_name": "Ada Obi",
        "status": status,
        "admin_note": null,
        "created_at": "2024-05-02T09:00:00Z",
        "updated_at": null
    })
}

//! REST client for the FlexInvest backend.
//!
//! The backend owns every business rule: OTP issuance, interest accrual,
//! balance changes and approval workflows. This module only maps its
//! endpoints onto typed calls:
//!
//! - `POST /auth/*`: registration, OTP, login, password reset
//! - `GET|POST /user/*`: profile and withdrawal bank account
//! - `/investments/*`, `/deposits/*`, `/withdrawals/*`, `/complaints/*`,
//!   `/support/links`: user-side resources
//! - `/admin/*`: admin console resources
//!
//! ## Example
//!
//! ```no_run
//! use flexinvest::api::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::new("http://localhost:8000/api");
//!     let auth = api.login("ada@example.com", "secret1").await?;
//!     let investments = api.active_investments(&auth.token).await?;
//!     println!("{} active investments", investments.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod errors;
pub mod models;

pub use client::{ApiClient, ProofUpload};
pub use errors::{ApiError, ApiResult, NETWORK_ERROR_MESSAGE};
pub use models::{
    Ack, Admin, AdminAuth, BankAccount, Complaint, ComplaintRequest, ComplaintStatus,
    DashboardStats, Deposit, DepositReceipt, Investment, InvestmentStatus, Package, ProofImage,
    RecordId, RegisterRequest, RegisterResponse, ResetTicket, ReviewDecision, ReviewStatus,
    SubscribeReceipt, SupportLinks, UserAuth, UserProfile, UserSummary, Withdrawal,
};

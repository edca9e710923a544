//! Wire models for the FlexInvest REST API.
//!
//! Every record here is owned by the backend. The client only sends the
//! request payloads and displays what comes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned record identifier (UUID string, or `pkg_N` for packages).
pub type RecordId = String;

/// Accept `true/false` as well as the `0/1` integers SQLite hands back.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

// ============================================================================
// Accounts
// ============================================================================

/// User profile as returned by `/user/profile`, `/auth/login` and
/// `/auth/verify-otp`. The login responses omit wallet and bank fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: RecordId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_verified: bool,
    #[serde(default)]
    pub wallet_balance: f64,
    #[serde(default)]
    pub bank_account: Option<BankAccount>,
}

/// Administrator identity returned by `/admin/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: RecordId,
    pub email: String,
    pub name: String,
    #[serde(default = "default_admin_role")]
    pub role: String,
}

fn default_admin_role() -> String {
    "admin".to_string()
}

/// Destination account for withdrawals. One per user, overwritten on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

/// User registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub email: String,
    pub user_id: RecordId,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailOtp<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailOnly<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResetPassword<'a> {
    pub email: &'a str,
    pub otp: &'a str,
    pub new_password: &'a str,
}

/// Token plus user returned by login and OTP verification.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAuth {
    pub token: String,
    pub user: UserProfile,
}

/// Token plus admin returned by admin login.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminAuth {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetTicket {
    pub reset_token: String,
}

/// Plain `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub message: String,
}

// ============================================================================
// Ledger records
// ============================================================================

/// Review state of a deposit or withdrawal.
///
/// `Pending` is the only state the client may act on; `Approved` and
/// `Rejected` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "pending"),
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: RecordId,
    #[serde(default)]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: RecordId,
    #[serde(default)]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub amount: f64,
    /// Snapshot of the destination account at request time
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Deposit proof image, base64 encoded as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProofImage {
    pub proof_image: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl ProofImage {
    /// `data:` URL suitable for an image viewer.
    pub fn data_url(&self) -> String {
        let mime = match self
            .filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("pdf") => "application/pdf",
            _ => "image/jpeg",
        };
        format!("data:{mime};base64,{}", self.proof_image)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositReceipt {
    pub message: String,
    pub deposit_id: RecordId,
    #[serde(default)]
    pub company_bank: Option<BankAccount>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WithdrawalRequest {
    pub amount: f64,
}

/// Admin verdict on a pending deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDecision {
    pub status: ReviewStatus,
    pub reason: Option<String>,
}

// ============================================================================
// Investments
// ============================================================================

/// Fixed-terms investment offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: RecordId,
    pub capital: f64,
    pub daily_profit: f64,
    /// Term length in days
    pub duration: u32,
    pub total_return: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Pending,
    #[default]
    Active,
    Completed,
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestmentStatus::Pending => write!(f, "pending"),
            InvestmentStatus::Active => write!(f, "active"),
            InvestmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A subscription to a package, with terms copied at subscription time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: RecordId,
    pub package_id: RecordId,
    pub capital: f64,
    pub daily_profit: f64,
    pub duration: u32,
    pub total_return: f64,
    #[serde(default)]
    pub days_completed: u32,
    #[serde(default)]
    pub profit_earned: f64,
    #[serde(default)]
    pub status: InvestmentStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubscribeRequest<'a> {
    pub package_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeReceipt {
    pub message: String,
    pub investment_id: RecordId,
}

// ============================================================================
// Support
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    #[default]
    Open,
    Resolved,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplaintStatus::Open => write!(f, "open"),
            ComplaintStatus::Resolved => write!(f, "resolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: RecordId,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub status: ComplaintStatus,
    #[serde(default)]
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplaintRequest {
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SupportLinks {
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// ============================================================================
// Admin
// ============================================================================

/// Platform-wide counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub pending_deposits: u64,
    pub pending_withdrawals: u64,
    pub open_complaints: u64,
    pub active_investments: u64,
    pub total_deposited: f64,
    pub total_withdrawn: f64,
}

/// User row in the admin user listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: RecordId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_verified: bool,
    #[serde(default)]
    pub wallet_balance: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreditWallet<'a> {
    pub user_id: &'a str,
    pub amount: f64,
    pub reason: &'a str,
}

// ============================================================================
// Collection envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct Packages {
    #[serde(default)]
    pub packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Investments {
    #[serde(default)]
    pub investments: Vec<Investment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Deposits {
    #[serde(default)]
    pub deposits: Vec<Deposit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Withdrawals {
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Complaints {
    #[serde(default)]
    pub complaints: Vec<Complaint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Users {
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub links: SupportLinks,
}

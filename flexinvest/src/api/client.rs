//! HTTP API client for the FlexInvest backend.

use super::errors::{ApiError, ApiResult};
use super::models::*;
use reqwest::{Method, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

/// Proof-of-payment file attached to a deposit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ProofUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a proof image from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "proof".to_string());
        Ok(Self { filename, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    fn mime(&self) -> &'static str {
        match self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("pdf") => "application/pdf",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        }
    }
}

/// API client for communicating with the FlexInvest backend.
///
/// The client holds no credentials. Every authenticated call takes the
/// bearer token of the session it acts for, so user and admin calls can
/// never borrow each other's token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize_base(base_url.into()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        log::debug!("{} {}", method, path);
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await.map_err(|e| {
            log::warn!("{} failed to send: {}", path, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            log::warn!("{} rejected: {}", path, err);
            return Err(err);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            log::warn!("{} returned an unexpected body: {}", path, e);
            ApiError::Decode(e.to_string())
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ApiResult<T> {
        self.send(path, self.request(Method::GET, path, token)).await
    }

    async fn post<B, T>(&self, path: &str, token: Option<&str>, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, self.request(Method::POST, path, token).json(body))
            .await
    }

    async fn put<B, T>(&self, path: &str, token: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(path, self.request(Method::PUT, path, Some(token)).json(body))
            .await
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// Register a new user. The account stays unverified until the emailed
    /// OTP is confirmed with [`verify_otp`](Self::verify_otp).
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        self.post("/auth/register", None, request).await
    }

    /// Confirm the registration OTP; returns a session token on success
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ApiResult<UserAuth> {
        self.post("/auth/verify-otp", None, &EmailOtp { email, otp })
            .await
    }

    pub async fn resend_otp(&self, email: &str) -> ApiResult<Ack> {
        self.post("/auth/resend-otp", None, &EmailOnly { email })
            .await
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<UserAuth> {
        self.post("/auth/login", None, &Credentials { email, password })
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<Ack> {
        self.post("/auth/forgot-password", None, &EmailOnly { email })
            .await
    }

    pub async fn verify_reset_otp(&self, email: &str, otp: &str) -> ApiResult<ResetTicket> {
        self.post("/auth/verify-reset-otp", None, &EmailOtp { email, otp })
            .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> ApiResult<Ack> {
        let request = ResetPassword {
            email,
            otp,
            new_password,
        };
        self.post("/auth/reset-password", None, &request).await
    }

    // ------------------------------------------------------------------
    // User
    // ------------------------------------------------------------------

    pub async fn profile(&self, token: &str) -> ApiResult<UserProfile> {
        self.get("/user/profile", Some(token)).await
    }

    /// Create or overwrite the user's withdrawal account
    pub async fn save_bank_account(&self, token: &str, account: &BankAccount) -> ApiResult<Ack> {
        self.post("/user/bank-account", Some(token), account).await
    }

    /// The user's withdrawal account; `None` until one is saved
    pub async fn bank_account(&self, token: &str) -> ApiResult<Option<BankAccount>> {
        self.get("/user/bank-account", Some(token)).await
    }

    // ------------------------------------------------------------------
    // Investments
    // ------------------------------------------------------------------

    /// List the investment packages on offer (public)
    pub async fn packages(&self) -> ApiResult<Vec<Package>> {
        let body: Packages = self.get("/investments/packages", None).await?;
        Ok(body.packages)
    }

    pub async fn active_investments(&self, token: &str) -> ApiResult<Vec<Investment>> {
        let body: Investments = self.get("/investments/active", Some(token)).await?;
        Ok(body.investments)
    }

    pub async fn investment_history(&self, token: &str) -> ApiResult<Vec<Investment>> {
        let body: Investments = self.get("/investments/history", Some(token)).await?;
        Ok(body.investments)
    }

    pub async fn subscribe(&self, token: &str, package_id: &str) -> ApiResult<SubscribeReceipt> {
        self.post(
            "/investments/subscribe",
            Some(token),
            &SubscribeRequest { package_id },
        )
        .await
    }

    // ------------------------------------------------------------------
    // Deposits and withdrawals
    // ------------------------------------------------------------------

    /// Submit a deposit request with its proof of payment (multipart upload)
    pub async fn create_deposit(
        &self,
        token: &str,
        amount: f64,
        proof: &ProofUpload,
    ) -> ApiResult<DepositReceipt> {
        let part = multipart::Part::bytes(proof.bytes.clone())
            .file_name(proof.filename.clone())
            .mime_str(proof.mime())?;
        let form = multipart::Form::new()
            .text("amount", amount.to_string())
            .part("proof", part);

        let path = "/deposits/create";
        self.send(path, self.request(Method::POST, path, Some(token)).multipart(form))
            .await
    }

    pub async fn deposit_history(&self, token: &str) -> ApiResult<Vec<Deposit>> {
        let body: Deposits = self.get("/deposits/history", Some(token)).await?;
        Ok(body.deposits)
    }

    pub async fn create_withdrawal(&self, token: &str, amount: f64) -> ApiResult<Ack> {
        self.post(
            "/withdrawals/create",
            Some(token),
            &WithdrawalRequest { amount },
        )
        .await
    }

    pub async fn withdrawal_history(&self, token: &str) -> ApiResult<Vec<Withdrawal>> {
        let body: Withdrawals = self.get("/withdrawals/history", Some(token)).await?;
        Ok(body.withdrawals)
    }

    // ------------------------------------------------------------------
    // Support
    // ------------------------------------------------------------------

    /// Support contact links (public)
    pub async fn support_links(&self) -> ApiResult<SupportLinks> {
        let body: Links = self.get("/support/links", None).await?;
        Ok(body.links)
    }

    pub async fn create_complaint(&self, token: &str, request: &ComplaintRequest) -> ApiResult<Ack> {
        self.post("/complaints/create", Some(token), request).await
    }

    pub async fn complaint_history(&self, token: &str) -> ApiResult<Vec<Complaint>> {
        let body: Complaints = self.get("/complaints/history", Some(token)).await?;
        Ok(body.complaints)
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    pub async fn admin_login(&self, email: &str, password: &str) -> ApiResult<AdminAuth> {
        self.post("/admin/login", None, &Credentials { email, password })
            .await
    }

    pub async fn admin_dashboard(&self, token: &str) -> ApiResult<DashboardStats> {
        self.get("/admin/dashboard", Some(token)).await
    }

    pub async fn admin_users(&self, token: &str) -> ApiResult<Vec<UserSummary>> {
        let body: Users = self.get("/admin/users", Some(token)).await?;
        Ok(body.users)
    }

    pub async fn credit_wallet(
        &self,
        token: &str,
        user_id: &str,
        amount: f64,
        reason: &str,
    ) -> ApiResult<Ack> {
        let request = CreditWallet {
            user_id,
            amount,
            reason,
        };
        self.post("/admin/credit-wallet", Some(token), &request).await
    }

    pub async fn admin_deposits(&self, token: &str) -> ApiResult<Vec<Deposit>> {
        let body: Deposits = self.get("/admin/deposits", Some(token)).await?;
        Ok(body.deposits)
    }

    pub async fn deposit_proof(&self, token: &str, deposit_id: &str) -> ApiResult<ProofImage> {
        self.get(&format!("/admin/deposits/{}/proof", deposit_id), Some(token))
            .await
    }

    pub async fn review_deposit(
        &self,
        token: &str,
        deposit_id: &str,
        decision: &ReviewDecision,
    ) -> ApiResult<Ack> {
        self.put(&format!("/admin/deposits/{}", deposit_id), token, decision)
            .await
    }

    pub async fn admin_withdrawals(&self, token: &str) -> ApiResult<Vec<Withdrawal>> {
        let body: Withdrawals = self.get("/admin/withdrawals", Some(token)).await?;
        Ok(body.withdrawals)
    }

    pub async fn review_withdrawal(
        &self,
        token: &str,
        withdrawal_id: &str,
        decision: &ReviewDecision,
    ) -> ApiResult<Ack> {
        self.put(
            &format!("/admin/withdrawals/{}", withdrawal_id),
            token,
            decision,
        )
        .await
    }

    pub async fn admin_complaints(&self, token: &str) -> ApiResult<Vec<Complaint>> {
        let body: Complaints = self.get("/admin/complaints", Some(token)).await?;
        Ok(body.complaints)
    }

    /// Mark a complaint resolved with the admin's response.
    ///
    /// The backend reads both fields from the query string; the body is empty.
    pub async fn resolve_complaint(
        &self,
        token: &str,
        complaint_id: &str,
        response: &str,
    ) -> ApiResult<Ack> {
        let path = format!("/admin/complaints/{}", complaint_id);
        let builder = self
            .request(Method::PUT, &path, Some(token))
            .query(&[("status", "resolved"), ("response", response)]);
        self.send(&path, builder).await
    }
}

fn normalize_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_proof_mime_from_extension() {
        assert_eq!(ProofUpload::new("a.PNG", vec![]).mime(), "image/png");
        assert_eq!(ProofUpload::new("scan.jpeg", vec![]).mime(), "image/jpeg");
        assert_eq!(
            ProofUpload::new("noext", vec![]).mime(),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = ApiClient::new("http://127.0.0.1:19999/api");
        let err = client.packages().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.toast_message("Login failed"), "Network error. Please try again.");
    }
}

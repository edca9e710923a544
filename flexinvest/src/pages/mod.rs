//! Page controllers.
//!
//! Every page follows the same shape:
//! - `load()` issues the page's GET requests concurrently and leaves the
//!   loading state once all of them settle. A failed read is logged and
//!   leaves its collection empty; the other reads still land.
//! - Submissions validate their inputs, send one POST/PUT, then re-fetch
//!   whatever the mutation touched. The outcome is reported as a toast.
//! - Requests run inside the page's [`PageScope`] and are aborted when the
//!   scope is cancelled.
//! - A `401` expires only the session whose token the request carried.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod fund_wallet;
pub mod scope;
pub mod support;
pub mod transactions;
pub mod withdraw;

pub use admin::{
    AdminComplaintsPage, AdminDashboardPage, AdminDepositsPage, AdminDepositsView,
    AdminInvestmentsPage, AdminUsersPage, AdminWithdrawalsPage, Reviewable,
};
pub use auth::{
    AdminLoginPage, Countdown, ForgotPassword, LoginPage, OTP_RESEND_SECS, RegisterPage,
    ResetStep, admin_logout, logout,
};
pub use dashboard::{DashboardPage, DashboardView, InvestmentsPage, InvestmentsView};
pub use fund_wallet::{
    COMPANY_BANK, CompanyBank, DepositForm, FundWalletPage, FundWalletView, MAX_PROOF_BYTES,
};
pub use scope::{Cancelled, PageScope, ScopeHandle};
pub use support::{SupportPage, SupportView};
pub use transactions::{
    TransactionKind, TransactionRow, TransactionTab, TransactionsPage, TransactionsView,
};
pub use withdraw::{NIGERIAN_BANKS, WithdrawPage, WithdrawView};

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::notify::Notifier;
use crate::router::Route;
use crate::session::{Realm, SessionStore};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Page operation errors
#[derive(Debug, Error)]
pub enum PageError {
    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The page's scope was cancelled while the request was in flight
    #[error("Request cancelled")]
    Cancelled,

    #[error("Not signed in")]
    NotAuthenticated,

    /// Another submission from this page is still in flight
    #[error("A request is already in progress")]
    Busy,

    /// The record has already left the pending state
    #[error("This request has already been processed")]
    AlreadyProcessed,
}

impl From<Cancelled> for PageError {
    fn from(_: Cancelled) -> Self {
        PageError::Cancelled
    }
}

impl PageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PageError::Validation(msg.into())
    }
}

pub type PageResult<T> = Result<T, PageError>;

/// Shared handles every page needs: the session store and the toast sink.
#[derive(Clone)]
pub struct PageContext {
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl PageContext {
    pub fn new(session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { session, notifier }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Run an authenticated request for `realm` inside `scope`.
    ///
    /// A `401` answer expires that realm's session before the error is returned.
    pub(crate) async fn call<T, F, Fut>(
        &self,
        scope: &PageScope,
        realm: Realm,
        request: F,
    ) -> PageResult<T>
    where
        F: FnOnce(ApiClient, String) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let token = self
            .session
            .token(realm)
            .await
            .ok_or(PageError::NotAuthenticated)?;

        match scope.run(request(self.api().clone(), token.clone())).await? {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_unauthorized() {
                    self.session.expire(realm, &token).await;
                }
                Err(e.into())
            }
        }
    }

    /// Run an unauthenticated request inside `scope`
    pub(crate) async fn call_public<T, Fut>(&self, scope: &PageScope, request: Fut) -> PageResult<T>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        Ok(scope.run(request).await??)
    }

    /// Toast the outcome of a submission and hand the result back.
    pub(crate) fn conclude<T>(
        &self,
        result: PageResult<T>,
        success: &str,
        fallback: &str,
    ) -> PageResult<T> {
        match &result {
            Ok(_) => self.notifier.success(success),
            Err(e) => self.report(e, fallback),
        }
        result
    }

    /// Toast a failed input check and pass it through
    pub(crate) fn validate<T>(&self, checked: PageResult<T>) -> PageResult<T> {
        if let Err(e) = &checked {
            self.report(e, "");
        }
        checked
    }

    /// Toast a failure. Cancelled and busy submissions stay silent.
    pub(crate) fn report(&self, err: &PageError, fallback: &str) {
        match err {
            PageError::Validation(msg) => self.notifier.error(msg),
            PageError::Api(e) => self.notifier.error(&e.toast_message(fallback)),
            PageError::NotAuthenticated => self.notifier.error("Please login to continue"),
            PageError::AlreadyProcessed => self.notifier.error(&err.to_string()),
            PageError::Cancelled | PageError::Busy => {}
        }
    }
}

/// Lifecycle common to every page controller.
pub trait Page {
    const ROUTE: Route;

    fn base(&self) -> &PageBase;

    /// Fetch everything the page shows
    fn load(&self) -> impl Future<Output = PageResult<()>> + Send;

    fn is_loading(&self) -> bool {
        self.base().loading.load(Ordering::Acquire)
    }

    fn is_submitting(&self) -> bool {
        self.base().gate.is_set()
    }

    /// Handle for cancelling this page's requests from elsewhere
    fn scope_handle(&self) -> ScopeHandle {
        self.base().scope.handle()
    }
}

/// Context, request scope and busy flags owned by each page.
pub struct PageBase {
    ctx: PageContext,
    scope: PageScope,
    gate: SubmitGate,
    loading: AtomicBool,
}

impl PageBase {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            scope: PageScope::new(),
            gate: SubmitGate::default(),
            loading: AtomicBool::new(false),
        }
    }

    pub fn ctx(&self) -> &PageContext {
        &self.ctx
    }

    pub fn scope(&self) -> &PageScope {
        &self.scope
    }

    pub(crate) fn submit(&self) -> PageResult<SubmitGuard<'_>> {
        self.gate.enter()
    }

    /// Mark the page loading until the guard drops
    pub(crate) fn loading(&self) -> LoadingGuard<'_> {
        self.loading.store(true, Ordering::Release);
        LoadingGuard(&self.loading)
    }

    /// Re-read the user profile after a mutation that moved money
    pub(crate) async fn refresh_profile(&self) {
        if let Ok(Err(e)) = self.scope.run(self.ctx.session().refresh_profile()).await {
            log::error!("Error refreshing profile: {}", e);
        }
    }

    pub(crate) async fn call<T, F, Fut>(&self, realm: Realm, request: F) -> PageResult<T>
    where
        F: FnOnce(ApiClient, String) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        self.ctx.call(&self.scope, realm, request).await
    }

    pub(crate) async fn call_public<T, Fut>(&self, request: Fut) -> PageResult<T>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        self.ctx.call_public(&self.scope, request).await
    }
}

pub(crate) struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Unwrap one read of a page load.
///
/// API failures are logged and become `None` so the other reads still land;
/// cancellation and a missing session abort the whole load.
pub(crate) fn settle<T>(what: &str, result: PageResult<T>) -> PageResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(PageError::Api(e)) => {
            log::error!("Error fetching {}: {}", what, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Unwrap a re-read issued after a submission the backend accepted.
///
/// The outcome is already reported, so every failure here is logged and
/// dropped, cancellation and an expired session included.
pub(crate) fn refreshed<T>(what: &str, result: PageResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(PageError::Cancelled) => None,
        Err(e) => {
            log::error!("Error refreshing {}: {}", what, e);
            None
        }
    }
}

/// Page state behind a lock that is never held across an await.
#[derive(Debug, Default)]
pub(crate) struct Shared<T>(Mutex<T>);

impl<T> Shared<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(Mutex::new(value))
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<T: Clone> Shared<T> {
    pub(crate) fn get(&self) -> T {
        self.lock().clone()
    }
}

/// Flag set while a submission is in flight.
#[derive(Debug, Default)]
pub(crate) struct SubmitGate(AtomicBool);

impl SubmitGate {
    /// Claim the gate; fails with [`PageError::Busy`] if already claimed.
    pub(crate) fn enter(&self) -> PageResult<SubmitGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PageError::Busy)?;
        Ok(SubmitGuard(&self.0))
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub(crate) struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ============================================================================
// Input checks
// ============================================================================

pub(crate) fn ensure(condition: bool, msg: &str) -> PageResult<()> {
    if condition {
        Ok(())
    } else {
        Err(PageError::validation(msg))
    }
}

/// Parse a strictly positive amount
pub(crate) fn positive_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// Exactly six ASCII digits
pub(crate) fn is_otp(input: &str) -> bool {
    input.len() == 6 && input.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

//! Admin console pages.
//!
//! All requests here carry the admin token; a `401` ends only the admin session.

use super::{
    Page, PageBase, PageContext, PageError, PageResult, Shared, ensure, is_blank, positive_amount,
    refreshed, settle,
};
use crate::api::{
    Complaint, DashboardStats, Deposit, ProofImage, RecordId, ReviewDecision, ReviewStatus,
    UserSummary, Withdrawal,
};
use crate::router::Route;
use crate::session::Realm;

// ============================================================================
// Dashboard
// ============================================================================

pub struct AdminDashboardPage {
    base: PageBase,
    stats: Shared<Option<DashboardStats>>,
}

impl AdminDashboardPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            stats: Shared::default(),
        }
    }

    pub fn stats(&self) -> Option<DashboardStats> {
        self.stats.get()
    }
}

impl Page for AdminDashboardPage {
    const ROUTE: Route = Route::AdminDashboard;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let stats = settle(
            "dashboard stats",
            self.base
                .call(Realm::Admin, |api, token| async move {
                    api.admin_dashboard(&token).await
                })
                .await,
        )?;
        self.stats.update(|s| *s = stats);
        Ok(())
    }
}

// ============================================================================
// Users
// ============================================================================

async fn fetch_users(base: &PageBase) -> PageResult<Vec<UserSummary>> {
    base.call(Realm::Admin, |api, token| async move {
        api.admin_users(&token).await
    })
    .await
}

pub struct AdminUsersPage {
    base: PageBase,
    users: Shared<Vec<UserSummary>>,
}

impl AdminUsersPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            users: Shared::default(),
        }
    }

    pub fn users(&self) -> Vec<UserSummary> {
        self.users.get()
    }

    /// Credit a user's wallet, then reload the user list.
    pub async fn credit_wallet(&self, user_id: &str, amount: &str, reason: &str) -> PageResult<()> {
        let ctx = self.base.ctx();
        ctx.validate(ensure(
            !is_blank(amount) && !is_blank(reason),
            "Please fill all fields",
        ))?;
        let Some(amount) = positive_amount(amount) else {
            return ctx.validate(Err(PageError::validation("Please enter a valid amount")));
        };
        let _submitting = self.base.submit()?;

        let user_id = user_id.to_string();
        let reason = reason.trim().to_string();
        let result = self
            .base
            .call(Realm::Admin, |api, token| async move {
                api.credit_wallet(&token, &user_id, amount, &reason).await
            })
            .await;

        let result = ctx.conclude(
            result.map(|_| ()),
            "Wallet credited successfully!",
            "Failed to credit wallet",
        );
        if result.is_ok() {
            if let Some(users) = refreshed("users", fetch_users(&self.base).await) {
                self.users.update(|u| *u = users);
            }
        }
        result
    }
}

impl Page for AdminUsersPage {
    const ROUTE: Route = Route::AdminUsers;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let users = settle("users", fetch_users(&self.base).await)?;
        self.users.update(|u| *u = users.unwrap_or_default());
        Ok(())
    }
}

/// Investor overview.
///
/// The admin API has no investment listing, so this page shows every
/// investor with their wallet balance from `/admin/users`.
pub struct AdminInvestmentsPage {
    base: PageBase,
    investors: Shared<Vec<UserSummary>>,
}

impl AdminInvestmentsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            investors: Shared::default(),
        }
    }

    pub fn investors(&self) -> Vec<UserSummary> {
        self.investors.get()
    }
}

impl Page for AdminInvestmentsPage {
    const ROUTE: Route = Route::AdminInvestments;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let users = settle("investments", fetch_users(&self.base).await)?;
        self.investors.update(|i| *i = users.unwrap_or_default());
        Ok(())
    }
}

// ============================================================================
// Deposit and withdrawal review
// ============================================================================

/// A ledger record an admin approves or rejects.
pub trait Reviewable {
    /// Capitalised record name used in toasts, e.g. `Deposit`
    const NOUN: &'static str;

    fn id(&self) -> &str;
    fn status(&self) -> ReviewStatus;
}

impl Reviewable for Deposit {
    const NOUN: &'static str = "Deposit";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ReviewStatus {
        self.status
    }
}

impl Reviewable for Withdrawal {
    const NOUN: &'static str = "Withdrawal";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ReviewStatus {
        self.status
    }
}

/// Check a decision against the listed records before anything is sent.
///
/// Only pending records can be decided, and a rejection needs a reason.
fn review_decision<R: Reviewable>(
    records: &[R],
    id: &str,
    status: ReviewStatus,
    reason: Option<&str>,
) -> PageResult<ReviewDecision> {
    let record = records.iter().find(|r| r.id() == id).ok_or_else(|| {
        PageError::validation(format!("Unknown {} '{}'", R::NOUN.to_lowercase(), id))
    })?;
    if record.status().is_terminal() {
        return Err(PageError::AlreadyProcessed);
    }

    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    if status == ReviewStatus::Rejected && reason.is_none() {
        return Err(PageError::validation("Please provide a reason for rejection"));
    }
    Ok(ReviewDecision {
        status,
        reason: reason.map(str::to_string),
    })
}

fn review_toast<R: Reviewable>(status: ReviewStatus) -> String {
    format!("{} {}!", R::NOUN, status)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminDepositsView {
    pub deposits: Vec<Deposit>,
    /// Proof currently open, with the deposit it belongs to
    pub proof: Option<(RecordId, ProofImage)>,
}

pub struct AdminDepositsPage {
    base: PageBase,
    state: Shared<AdminDepositsView>,
}

impl AdminDepositsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            state: Shared::default(),
        }
    }

    pub fn view(&self) -> AdminDepositsView {
        self.state.get()
    }

    /// Fetch the proof of payment for a deposit.
    pub async fn view_proof(&self, deposit_id: &str) -> PageResult<ProofImage> {
        let id = deposit_id.to_string();
        let result = self
            .base
            .call(Realm::Admin, |api, token| async move {
                api.deposit_proof(&token, &id).await
            })
            .await;

        match result {
            Ok(proof) => {
                self.state
                    .update(|s| s.proof = Some((deposit_id.to_string(), proof.clone())));
                Ok(proof)
            }
            Err(e) => {
                if !matches!(e, PageError::Cancelled) {
                    log::error!("Error loading proof for {}: {}", deposit_id, e);
                    self.base.ctx().notifier().error("Failed to load proof image");
                }
                Err(e)
            }
        }
    }

    pub fn close_proof(&self) {
        self.state.update(|s| s.proof = None);
    }

    pub async fn approve(&self, deposit_id: &str) -> PageResult<()> {
        self.decide(deposit_id, ReviewStatus::Approved, None).await
    }

    /// Reject a deposit. Blocked locally when `reason` is blank.
    pub async fn reject(&self, deposit_id: &str, reason: &str) -> PageResult<()> {
        self.decide(deposit_id, ReviewStatus::Rejected, Some(reason))
            .await
    }

    async fn decide(&self, id: &str, status: ReviewStatus, reason: Option<&str>) -> PageResult<()> {
        let ctx = self.base.ctx();
        let decision = ctx.validate(
            self.state
                .read(|s| review_decision(&s.deposits, id, status, reason)),
        )?;
        let _submitting = self.base.submit()?;

        let deposit_id = id.to_string();
        let result = self
            .base
            .call(Realm::Admin, |api, token| async move {
                api.review_deposit(&token, &deposit_id, &decision).await
            })
            .await;

        let result = ctx.conclude(
            result.map(|_| ()),
            &review_toast::<Deposit>(status),
            "Action failed",
        );
        if result.is_ok() {
            if let Some(deposits) = refreshed("deposits", self.fetch().await) {
                self.state.update(|s| s.deposits = deposits);
            }
        }
        result
    }

    async fn fetch(&self) -> PageResult<Vec<Deposit>> {
        self.base
            .call(Realm::Admin, |api, token| async move {
                api.admin_deposits(&token).await
            })
            .await
    }
}

impl Page for AdminDepositsPage {
    const ROUTE: Route = Route::AdminDeposits;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let deposits = settle("deposits", self.fetch().await)?;
        self.state.update(|s| s.deposits = deposits.unwrap_or_default());
        Ok(())
    }
}

pub struct AdminWithdrawalsPage {
    base: PageBase,
    withdrawals: Shared<Vec<Withdrawal>>,
}

impl AdminWithdrawalsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            withdrawals: Shared::default(),
        }
    }

    pub fn withdrawals(&self) -> Vec<Withdrawal> {
        self.withdrawals.get()
    }

    pub async fn approve(&self, withdrawal_id: &str) -> PageResult<()> {
        self.decide(withdrawal_id, ReviewStatus::Approved, None)
            .await
    }

    /// Reject a withdrawal. Blocked locally when `reason` is blank.
    pub async fn reject(&self, withdrawal_id: &str, reason: &str) -> PageResult<()> {
        self.decide(withdrawal_id, ReviewStatus::Rejected, Some(reason))
            .await
    }

    async fn decide(&self, id: &str, status: ReviewStatus, reason: Option<&str>) -> PageResult<()> {
        let ctx = self.base.ctx();
        let decision = ctx.validate(
            self.withdrawals
                .read(|w| review_decision(w, id, status, reason)),
        )?;
        let _submitting = self.base.submit()?;

        let withdrawal_id = id.to_string();
        let result = self
            .base
            .call(Realm::Admin, |api, token| async move {
                api.review_withdrawal(&token, &withdrawal_id, &decision)
                    .await
            })
            .await;

        let result = ctx.conclude(
            result.map(|_| ()),
            &review_toast::<Withdrawal>(status),
            "Action failed",
        );
        if result.is_ok() {
            if let Some(withdrawals) = refreshed("withdrawals", self.fetch().await) {
                self.withdrawals.update(|w| *w = withdrawals);
            }
        }
        result
    }

    async fn fetch(&self) -> PageResult<Vec<Withdrawal>> {
        self.base
            .call(Realm::Admin, |api, token| async move {
                api.admin_withdrawals(&token).await
            })
            .await
    }
}

impl Page for AdminWithdrawalsPage {
    const ROUTE: Route = Route::AdminWithdrawals;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let withdrawals = settle("withdrawals", self.fetch().await)?;
        self.withdrawals
            .update(|w| *w = withdrawals.unwrap_or_default());
        Ok(())
    }
}

// ============================================================================
// Complaints
// ============================================================================

pub struct AdminComplaintsPage {
    base: PageBase,
    complaints: Shared<Vec<Complaint>>,
}

impl AdminComplaintsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            complaints: Shared::default(),
        }
    }

    pub fn complaints(&self) -> Vec<Complaint> {
        self.complaints.get()
    }

    /// Answer a complaint and mark it resolved.
    pub async fn respond(&self, complaint_id: &str, response: &str) -> PageResult<()> {
        let ctx = self.base.ctx();
        ctx.validate(ensure(!is_blank(response), "Please enter a response"))?;
        let _submitting = self.base.submit()?;

        let id = complaint_id.to_string();
        let response = response.trim().to_string();
        let result = self
            .base
            .call(Realm::Admin, |api, token| async move {
                api.resolve_complaint(&token, &id, &response).await
            })
            .await;

        match &result {
            Ok(_) => {
                ctx.notifier().success("Response sent successfully!");
                if let Some(complaints) = refreshed("complaints", self.fetch().await) {
                    self.complaints.update(|c| *c = complaints);
                }
            }
            Err(PageError::Cancelled | PageError::Busy) => {}
            Err(e) => {
                log::error!("Error responding to complaint {}: {}", complaint_id, e);
                ctx.notifier().error("Failed to send response");
            }
        }
        result.map(|_| ())
    }

    async fn fetch(&self) -> PageResult<Vec<Complaint>> {
        self.base
            .call(Realm::Admin, |api, token| async move {
                api.admin_complaints(&token).await
            })
            .await
    }
}

impl Page for AdminComplaintsPage {
    const ROUTE: Route = Route::AdminComplaints;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let complaints = settle("complaints", self.fetch().await)?;
        self.complaints
            .update(|c| *c = complaints.unwrap_or_default());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn deposit(id: &str, status: ReviewStatus) -> Deposit {
        Deposit {
            id: id.to_string(),
            user_id: Some("u-1".to_string()),
            user_email: Some("ada@example.com".to_string()),
            user_name: Some("Ada".to_string()),
            amount: 10000.0,
            status,
            admin_note: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_reject_requires_reason() {
        let deposits = vec![deposit("d1", ReviewStatus::Pending)];
        for reason in [None, Some(""), Some("   ")] {
            let err = review_decision(&deposits, "d1", ReviewStatus::Rejected, reason).unwrap_err();
            assert_eq!(err.to_string(), "Please provide a reason for rejection");
        }
    }

    #[test]
    fn test_approve_sends_null_reason() {
        let deposits = vec![deposit("d1", ReviewStatus::Pending)];
        let decision = review_decision(&deposits, "d1", ReviewStatus::Approved, None).unwrap();
        assert_eq!(decision.status, ReviewStatus::Approved);
        assert_eq!(decision.reason, None);
    }

    #[test]
    fn test_terminal_record_is_refused() {
        let deposits = vec![deposit("d1", ReviewStatus::Approved)];
        let err = review_decision(&deposits, "d1", ReviewStatus::Rejected, Some("dup")).unwrap_err();
        assert!(matches!(err, PageError::AlreadyProcessed));
    }

    #[test]
    fn test_unknown_record_is_refused() {
        let deposits: Vec<Deposit> = Vec::new();
        let err = review_decision(&deposits, "d9", ReviewStatus::Approved, None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown deposit 'd9'");
    }

    #[test]
    fn test_review_toasts() {
        assert_eq!(review_toast::<Deposit>(ReviewStatus::Approved), "Deposit approved!");
        assert_eq!(
            review_toast::<Withdrawal>(ReviewStatus::Rejected),
            "Withdrawal rejected!"
        );
    }
}

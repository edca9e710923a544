//! Dashboard overview and investment packages.

use super::{Page, PageBase, PageContext, PageError, PageResult, Shared, refreshed, settle};
use crate::api::{Investment, Package, UserProfile};
use crate::router::Route;
use crate::session::Realm;

/// Sum of `capital` over active investments
pub fn total_capital(investments: &[Investment]) -> f64 {
    investments.iter().map(|inv| inv.capital).sum()
}

/// Sum of `profit_earned` over active investments
pub fn total_earned(investments: &[Investment]) -> f64 {
    investments.iter().map(|inv| inv.profit_earned).sum()
}

// ============================================================================
// Overview
// ============================================================================

/// What the overview shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub profile: Option<UserProfile>,
    pub active: Vec<Investment>,
}

impl DashboardView {
    pub fn wallet_balance(&self) -> f64 {
        self.profile.as_ref().map_or(0.0, |p| p.wallet_balance)
    }

    pub fn total_capital(&self) -> f64 {
        total_capital(&self.active)
    }

    pub fn total_earned(&self) -> f64 {
        total_earned(&self.active)
    }
}

pub struct DashboardPage {
    base: PageBase,
    active: Shared<Vec<Investment>>,
}

impl DashboardPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            active: Shared::default(),
        }
    }

    pub async fn view(&self) -> DashboardView {
        DashboardView {
            profile: self.base.ctx().session().user().await,
            active: self.active.get(),
        }
    }
}

impl Page for DashboardPage {
    const ROUTE: Route = Route::Dashboard;

    fn base(&self) -> &PageBase {
        &self.base
    }

    /// Refresh the profile, then load active investments.
    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let session = self.base.ctx().session();

        match self.base.scope().run(session.refresh_profile()).await {
            Ok(Err(e)) => log::error!("Error refreshing profile: {}", e),
            Ok(Ok(())) => {}
            Err(cancelled) => return Err(cancelled.into()),
        }

        let active = settle(
            "active investments",
            self.base
                .call(Realm::User, |api, token| async move {
                    api.active_investments(&token).await
                })
                .await,
        )?;
        self.active.update(|a| *a = active.unwrap_or_default());
        Ok(())
    }
}

// ============================================================================
// Investments
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentsView {
    pub packages: Vec<Package>,
    pub active: Vec<Investment>,
    pub history: Vec<Investment>,
    /// Package awaiting confirmation
    pub selected: Option<Package>,
}

pub struct InvestmentsPage {
    base: PageBase,
    state: Shared<InvestmentsView>,
}

impl InvestmentsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            state: Shared::default(),
        }
    }

    pub fn view(&self) -> InvestmentsView {
        self.state.get()
    }

    /// Pick a package for the confirmation step
    pub fn select(&self, package_id: &str) -> PageResult<Package> {
        let package = self
            .state
            .read(|s| s.packages.iter().find(|p| p.id == package_id).cloned())
            .ok_or_else(|| PageError::validation(format!("Unknown package '{}'", package_id)))?;
        self.state.update(|s| s.selected = Some(package.clone()));
        Ok(package)
    }

    pub fn clear_selection(&self) {
        self.state.update(|s| s.selected = None);
    }

    /// Subscribe to the selected package.
    ///
    /// Refused without a POST when the wallet cannot cover the capital.
    pub async fn confirm(&self) -> PageResult<()> {
        let ctx = self.base.ctx();
        let Some(package) = self.state.read(|s| s.selected.clone()) else {
            return ctx.validate(Err(PageError::validation("Please select a package")));
        };
        if ctx.session().wallet_balance().await < package.capital {
            return ctx.validate(Err(PageError::validation(
                "Insufficient wallet balance. Please fund your wallet first.",
            )));
        }
        let _submitting = self.base.submit()?;

        let package_id = package.id.clone();
        let result = self
            .base
            .call(Realm::User, |api, token| async move {
                api.subscribe(&token, &package_id).await
            })
            .await;

        let result = ctx.conclude(
            result.map(|_| ()),
            "Investment started successfully!",
            "Failed to start investment",
        );
        if result.is_ok() {
            self.clear_selection();
            self.refetch().await;
        }
        result
    }

    /// Select and confirm in one step
    pub async fn invest(&self, package_id: &str) -> PageResult<()> {
        if let Err(e) = self.select(package_id) {
            self.base.ctx().report(&e, "");
            return Err(e);
        }
        self.confirm().await
    }

    /// Re-read the profile and both investment lists after a subscription
    async fn refetch(&self) {
        self.base.refresh_profile().await;

        let (active, history) = tokio::join!(
            self.base.call(Realm::User, |api, token| async move {
                api.active_investments(&token).await
            }),
            self.base.call(Realm::User, |api, token| async move {
                api.investment_history(&token).await
            }),
        );
        let active = refreshed("active investments", active);
        let history = refreshed("investment history", history);
        self.state.update(|s| {
            if let Some(active) = active {
                s.active = active;
            }
            if let Some(history) = history {
                s.history = history;
            }
        });
    }
}

impl Page for InvestmentsPage {
    const ROUTE: Route = Route::Investments;

    fn base(&self) -> &PageBase {
        &self.base
    }

    /// Packages, active investments and history, concurrently.
    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let api = self.base.ctx().api();

        let (packages, active, history) = tokio::join!(
            self.base.call_public(api.packages()),
            self.base.call(Realm::User, |api, token| async move {
                api.active_investments(&token).await
            }),
            self.base.call(Realm::User, |api, token| async move {
                api.investment_history(&token).await
            }),
        );
        let packages = settle("packages", packages)?;
        let active = settle("active investments", active)?;
        let history = settle("investment history", history)?;

        self.state.update(|s| {
            s.packages = packages.unwrap_or_default();
            s.active = active.unwrap_or_default();
            s.history = history.unwrap_or_default();
        });
        Ok(())
    }
}

//! Wallet funding by bank transfer plus proof of payment.

use super::{Page, PageBase, PageContext, PageError, PageResult, Shared, ensure, positive_amount, refreshed, settle};
use crate::api::{Deposit, ProofUpload};
use crate::router::Route;
use crate::session::Realm;
use std::path::Path;

/// Largest proof image accepted for upload
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

const PROOF_TOO_LARGE: &str = "File size must be less than 5MB";

/// Account users transfer to before uploading their proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyBank {
    pub bank_name: &'static str,
    pub account_number: &'static str,
    pub account_name: &'static str,
}

pub const COMPANY_BANK: CompanyBank = CompanyBank {
    bank_name: "GT BANK",
    account_number: "1100298838",
    account_name: "Square Capital Ventures Nigeria Limited",
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepositForm {
    pub amount: String,
    pub proof: Option<ProofUpload>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundWalletView {
    pub form: DepositForm,
    pub deposits: Vec<Deposit>,
}

pub struct FundWalletPage {
    base: PageBase,
    state: Shared<FundWalletView>,
}

impl FundWalletPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            state: Shared::default(),
        }
    }

    pub fn view(&self) -> FundWalletView {
        self.state.get()
    }

    pub fn set_amount(&self, amount: &str) {
        self.state.update(|s| s.form.amount = amount.to_string());
    }

    /// Attach a proof image. Files over 5 MiB are refused.
    pub fn attach_proof(&self, proof: ProofUpload) -> PageResult<()> {
        self.base
            .ctx()
            .validate(ensure(proof.size() <= MAX_PROOF_BYTES, PROOF_TOO_LARGE))?;
        self.state.update(|s| s.form.proof = Some(proof));
        Ok(())
    }

    /// Attach a proof image from disk. Oversized files are refused before
    /// they are read.
    pub async fn attach_file(&self, path: impl AsRef<Path>) -> PageResult<()> {
        let path = path.as_ref();
        let ctx = self.base.ctx();
        let unreadable = |e: std::io::Error| {
            PageError::validation(format!("Could not read {}: {}", path.display(), e))
        };

        let size = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.len())
            .map_err(unreadable);
        ctx.validate(size.and_then(|size| {
            ensure(size <= MAX_PROOF_BYTES as u64, PROOF_TOO_LARGE)
        }))?;
        let proof = ctx.validate(ProofUpload::from_path(path).await.map_err(unreadable))?;
        self.attach_proof(proof)
    }

    pub fn clear_proof(&self) {
        self.state.update(|s| s.form.proof = None);
    }

    /// Submit the deposit request with its proof.
    pub async fn submit(&self) -> PageResult<()> {
        let ctx = self.base.ctx();
        let form = self.state.read(|s| s.form.clone());
        let proof = match (form.amount.trim().is_empty(), form.proof) {
            (false, Some(proof)) => proof,
            _ => {
                return ctx.validate(Err(PageError::validation(
                    "Please enter amount and upload proof of payment",
                )));
            }
        };
        let Some(amount) = positive_amount(&form.amount) else {
            return ctx.validate(Err(PageError::validation("Please enter a valid amount")));
        };
        let _submitting = self.base.submit()?;

        let result = self
            .base
            .call(Realm::User, |api, token| async move {
                api.create_deposit(&token, amount, &proof).await
            })
            .await;

        let result = ctx.conclude(
            result.map(|_| ()),
            "Deposit request submitted successfully!",
            "Failed to submit deposit request",
        );
        if result.is_ok() {
            self.state.update(|s| s.form = DepositForm::default());
            if let Some(deposits) = refreshed("deposits", self.fetch_deposits().await) {
                self.state.update(|s| s.deposits = deposits);
            }
        }
        result
    }

    async fn fetch_deposits(&self) -> PageResult<Vec<Deposit>> {
        self.base
            .call(Realm::User, |api, token| async move {
                api.deposit_history(&token).await
            })
            .await
    }
}

impl Page for FundWalletPage {
    const ROUTE: Route = Route::FundWallet;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        if let Some(deposits) = settle("deposits", self.fetch_deposits().await)? {
            self.state.update(|s| s.deposits = deposits);
        }
        Ok(())
    }
}

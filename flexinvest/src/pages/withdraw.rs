//! Withdrawals to the user's linked bank account.

use super::{Page, PageBase, PageContext, PageError, PageResult, Shared, ensure, is_blank, positive_amount, refreshed, settle};
use crate::api::{BankAccount, Withdrawal};
use crate::router::Route;
use crate::session::Realm;

/// Banks offered in the bank-account picker
pub const NIGERIAN_BANKS: [&str; 26] = [
    "Access Bank",
    "Citibank",
    "Ecobank",
    "Fidelity Bank",
    "First Bank of Nigeria",
    "First City Monument Bank (FCMB)",
    "Globus Bank",
    "Guaranty Trust Bank (GTBank)",
    "Heritage Bank",
    "Jaiz Bank",
    "Keystone Bank",
    "Kuda Bank",
    "OPay",
    "Palmpay",
    "Polaris Bank",
    "Providus Bank",
    "Stanbic IBTC Bank",
    "Standard Chartered Bank",
    "Sterling Bank",
    "SunTrust Bank",
    "Titan Trust Bank",
    "Union Bank",
    "United Bank for Africa (UBA)",
    "Unity Bank",
    "Wema Bank",
    "Zenith Bank",
];

const ACCOUNT_NUMBER_LEN: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithdrawView {
    /// Saved account; `None` until the user adds one
    pub bank_account: Option<BankAccount>,
    /// Bank form, prefilled from the saved account
    pub bank_form: BankAccount,
    pub withdrawals: Vec<Withdrawal>,
}

pub struct WithdrawPage {
    base: PageBase,
    state: Shared<WithdrawView>,
}

impl WithdrawPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            state: Shared::default(),
        }
    }

    pub fn view(&self) -> WithdrawView {
        self.state.get()
    }

    pub fn edit_bank_form(&self, edit: impl FnOnce(&mut BankAccount)) {
        self.state.update(|s| edit(&mut s.bank_form));
    }

    /// Save the bank form as the user's withdrawal account.
    pub async fn save_bank_account(&self) -> PageResult<()> {
        let ctx = self.base.ctx();
        let form = self.state.read(|s| s.bank_form.clone());
        let form = BankAccount {
            bank_name: form.bank_name.trim().to_string(),
            account_number: form.account_number.trim().to_string(),
            account_name: form.account_name.trim().to_string(),
        };
        ctx.validate(
            ensure(
                !is_blank(&form.bank_name)
                    && !is_blank(&form.account_number)
                    && !is_blank(&form.account_name),
                "Please fill all bank details",
            )
            .and_then(|_| {
                ensure(
                    form.account_number.len() == ACCOUNT_NUMBER_LEN
                        && form.account_number.bytes().all(|b| b.is_ascii_digit()),
                    "Account number must be 10 digits",
                )
            }),
        )?;
        let _submitting = self.base.submit()?;

        let body = form.clone();
        let result = self
            .base
            .call(Realm::User, |api, token| async move {
                api.save_bank_account(&token, &body).await
            })
            .await;

        if result.is_ok() {
            self.state.update(|s| {
                s.bank_account = Some(form.clone());
                s.bank_form = form;
            });
        }
        ctx.conclude(
            result.map(|_| ()),
            "Bank account saved successfully!",
            "Failed to save bank account",
        )
    }

    /// Request a withdrawal of `amount` to the saved account.
    pub async fn withdraw(&self, amount: &str) -> PageResult<()> {
        let ctx = self.base.ctx();
        let Some(amount) = positive_amount(amount) else {
            return ctx.validate(Err(PageError::validation("Please enter a valid amount")));
        };
        ctx.validate(
            ensure(
                amount <= ctx.session().wallet_balance().await,
                "Insufficient wallet balance",
            )
            .and_then(|_| {
                ensure(
                    self.state.read(|s| s.bank_account.is_some()),
                    "Please add a bank account first",
                )
            }),
        )?;
        let _submitting = self.base.submit()?;

        let result = self
            .base
            .call(Realm::User, |api, token| async move {
                api.create_withdrawal(&token, amount).await
            })
            .await;

        let result = ctx.conclude(
            result.map(|_| ()),
            "Withdrawal request submitted successfully!",
            "Failed to submit withdrawal request",
        );
        if result.is_ok() {
            self.base.refresh_profile().await;
            if let Some(withdrawals) = refreshed("withdrawals", self.fetch_withdrawals().await) {
                self.state.update(|s| s.withdrawals = withdrawals);
            }
        }
        result
    }

    async fn fetch_withdrawals(&self) -> PageResult<Vec<Withdrawal>> {
        self.base
            .call(Realm::User, |api, token| async move {
                api.withdrawal_history(&token).await
            })
            .await
    }
}

impl Page for WithdrawPage {
    const ROUTE: Route = Route::Withdraw;

    fn base(&self) -> &PageBase {
        &self.base
    }

    /// Bank account and withdrawal history, concurrently.
    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();

        let (bank, withdrawals) = tokio::join!(
            self.base.call(Realm::User, |api, token| async move {
                api.bank_account(&token).await
            }),
            self.fetch_withdrawals(),
        );
        let bank = settle("bank account", bank)?;
        let withdrawals = settle("withdrawals", withdrawals)?;

        self.state.update(|s| {
            if let Some(account) = bank.flatten() {
                s.bank_form = account.clone();
                s.bank_account = Some(account);
            }
            s.withdrawals = withdrawals.unwrap_or_default();
        });
        Ok(())
    }
}

//! Combined history of deposits, withdrawals and investments.

use super::{Page, PageBase, PageContext, PageError, PageResult, Shared, settle};
use crate::api::{Deposit, Investment, RecordId, Withdrawal};
use crate::router::Route;
use crate::session::Realm;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Investment,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::Withdrawal => write!(f, "withdrawal"),
            TransactionKind::Investment => write!(f, "investment"),
        }
    }
}

/// One line of the merged view.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub kind: TransactionKind,
    pub id: RecordId,
    /// Investment rows carry the capital
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Deposit> for TransactionRow {
    fn from(d: &Deposit) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            id: d.id.clone(),
            amount: d.amount,
            status: d.status.to_string(),
            created_at: d.created_at,
        }
    }
}

impl From<&Withdrawal> for TransactionRow {
    fn from(w: &Withdrawal) -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            id: w.id.clone(),
            amount: w.amount,
            status: w.status.to_string(),
            created_at: w.created_at,
        }
    }
}

impl From<&Investment> for TransactionRow {
    fn from(i: &Investment) -> Self {
        Self {
            kind: TransactionKind::Investment,
            id: i.id.clone(),
            amount: i.capital,
            status: i.status.to_string(),
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionTab {
    #[default]
    All,
    Deposits,
    Withdrawals,
    Investments,
}

impl FromStr for TransactionTab {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TransactionTab::All),
            "deposits" | "deposit" => Ok(TransactionTab::Deposits),
            "withdrawals" | "withdrawal" => Ok(TransactionTab::Withdrawals),
            "investments" | "investment" => Ok(TransactionTab::Investments),
            other => Err(PageError::validation(format!(
                "Unknown tab '{}'. Use all, deposits, withdrawals or investments",
                other
            ))),
        }
    }
}

impl fmt::Display for TransactionTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionTab::All => write!(f, "all"),
            TransactionTab::Deposits => write!(f, "deposits"),
            TransactionTab::Withdrawals => write!(f, "withdrawals"),
            TransactionTab::Investments => write!(f, "investments"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionsView {
    pub tab: TransactionTab,
    pub deposits: Vec<Deposit>,
    pub withdrawals: Vec<Withdrawal>,
    pub investments: Vec<Investment>,
}

impl TransactionsView {
    /// Every record, newest first
    pub fn all(&self) -> Vec<TransactionRow> {
        let mut rows: Vec<TransactionRow> = self
            .deposits
            .iter()
            .map(TransactionRow::from)
            .chain(self.withdrawals.iter().map(TransactionRow::from))
            .chain(self.investments.iter().map(TransactionRow::from))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    /// Rows for the selected tab
    pub fn rows(&self) -> Vec<TransactionRow> {
        match self.tab {
            TransactionTab::All => self.all(),
            TransactionTab::Deposits => self.deposits.iter().map(TransactionRow::from).collect(),
            TransactionTab::Withdrawals => {
                self.withdrawals.iter().map(TransactionRow::from).collect()
            }
            TransactionTab::Investments => {
                self.investments.iter().map(TransactionRow::from).collect()
            }
        }
    }
}

pub struct TransactionsPage {
    base: PageBase,
    state: Shared<TransactionsView>,
}

impl TransactionsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            state: Shared::default(),
        }
    }

    pub fn view(&self) -> TransactionsView {
        self.state.get()
    }

    pub fn select_tab(&self, tab: TransactionTab) {
        self.state.update(|s| s.tab = tab);
    }
}

impl Page for TransactionsPage {
    const ROUTE: Route = Route::Transactions;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();

        let (deposits, withdrawals, investments) = tokio::join!(
            self.base.call(Realm::User, |api, token| async move {
                api.deposit_history(&token).await
            }),
            self.base.call(Realm::User, |api, token| async move {
                api.withdrawal_history(&token).await
            }),
            self.base.call(Realm::User, |api, token| async move {
                api.investment_history(&token).await
            }),
        );
        let deposits = settle("deposits", deposits)?;
        let withdrawals = settle("withdrawals", withdrawals)?;
        let investments = settle("investments", investments)?;

        self.state.update(|s| {
            s.deposits = deposits.unwrap_or_default();
            s.withdrawals = withdrawals.unwrap_or_default();
            s.investments = investments.unwrap_or_default();
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InvestmentStatus, ReviewStatus};
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap()
    }

    fn deposit(id: &str, day: u32) -> Deposit {
        Deposit {
            id: id.to_string(),
            user_id: None,
            user_email: None,
            user_name: None,
            amount: 5000.0,
            status: ReviewStatus::Approved,
            admin_note: None,
            created_at: at(day),
            updated_at: None,
        }
    }

    fn withdrawal(id: &str, day: u32) -> Withdrawal {
        Withdrawal {
            id: id.to_string(),
            user_id: None,
            user_email: None,
            user_name: None,
            amount: 2000.0,
            bank_name: "Kuda Bank".to_string(),
            account_number: "0123456789".to_string(),
            account_name: "Ada".to_string(),
            status: ReviewStatus::Pending,
            admin_note: None,
            created_at: at(day),
            updated_at: None,
        }
    }

    fn investment(id: &str, day: u32) -> Investment {
        Investment {
            id: id.to_string(),
            package_id: "pkg_1".to_string(),
            capital: 25200.0,
            daily_profit: 2500.0,
            duration: 30,
            total_return: 75000.0,
            days_completed: 3,
            profit_earned: 7500.0,
            status: InvestmentStatus::Active,
            start_date: None,
            end_date: None,
            created_at: at(day),
        }
    }

    #[test]
    fn test_all_merges_newest_first() {
        let view = TransactionsView {
            deposits: vec![deposit("d1", 1), deposit("d2", 4)],
            withdrawals: vec![withdrawal("w1", 3)],
            investments: vec![investment("i1", 2)],
            ..Default::default()
        };

        let ids: Vec<_> = view.all().into_iter().map(|row| row.id).collect();
        assert_eq!(ids, vec!["d2", "w1", "i1", "d1"]);
    }

    #[test]
    fn test_investment_row_uses_capital() {
        let row = TransactionRow::from(&investment("i1", 2));
        assert_eq!(row.kind, TransactionKind::Investment);
        assert_eq!(row.amount, 25200.0);
    }

    #[test]
    fn test_tab_filters_rows() {
        let mut view = TransactionsView {
            deposits: vec![deposit("d1", 1)],
            withdrawals: vec![withdrawal("w1", 3)],
            ..Default::default()
        };
        view.tab = TransactionTab::Withdrawals;
        let rows = view.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, TransactionKind::Withdrawal);
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!("Deposits".parse::<TransactionTab>().unwrap(), TransactionTab::Deposits);
        assert_eq!("all".parse::<TransactionTab>().unwrap(), TransactionTab::All);
        assert!("ledger".parse::<TransactionTab>().is_err());
    }
}

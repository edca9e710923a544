//! Plain-text views of each page.

use flexinvest::api::{
    Complaint, DashboardStats, Deposit, Investment, Package, UserSummary, Withdrawal,
};
use flexinvest::format::{date, date_time, naira};
use flexinvest::pages::{
    AdminDepositsView, COMPANY_BANK, Countdown, DashboardView, ForgotPassword, FundWalletView,
    InvestmentsView, ResetStep, SupportView, TransactionsView, WithdrawView,
};
use flexinvest::Route;
use std::fmt::{self, Write};

const WIDTH: usize = 64;

fn collect(draw: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = draw(&mut out);
    out
}

fn header(out: &mut String, route: Route) -> fmt::Result {
    writeln!(out, "{}", "═".repeat(WIDTH))?;
    writeln!(out, "{}  ({})", route.title().to_uppercase(), route.path())?;
    writeln!(out, "{}", "═".repeat(WIDTH))
}

fn rule(out: &mut String) -> fmt::Result {
    writeln!(out, "{}", "─".repeat(WIDTH))
}

fn footer(out: &mut String, commands: &str) -> fmt::Result {
    rule(out)?;
    writeln!(out, "Commands: {}", commands)
}

// ============================================================================
// Public and auth pages
// ============================================================================

pub fn landing() -> String {
    collect(|out| {
        header(out, Route::Landing)?;
        writeln!(out, "Invest in fixed-term packages and earn daily returns.")?;
        writeln!(out)?;
        writeln!(out, "  go /login       sign in")?;
        writeln!(out, "  go /register    create an account")?;
        writeln!(out, "  go /admin/login admin console")
    })
}

pub fn login(forgot: &ForgotPassword) -> String {
    collect(|out| {
        header(out, Route::Login)?;
        match forgot.step {
            ResetStep::Email => writeln!(out, "Forgot your password? Use 'forgot <email>'.")?,
            ResetStep::Otp => writeln!(
                out,
                "Reset code sent to {}. Enter it with 'reset-otp <otp>'.",
                forgot.email
            )?,
            ResetStep::NewPassword => writeln!(
                out,
                "Code accepted. Choose a new password with 'reset-password <new> <confirm>'."
            )?,
        }
        footer(out, "login <email> <password>, forgot <email>, go /register")
    })
}

pub fn register(pending_email: Option<&str>, resend: Countdown) -> String {
    collect(|out| {
        header(out, Route::Register)?;
        match pending_email {
            None => footer(
                out,
                "register <email> <password> <phone> <full name>, go /login",
            ),
            Some(email) => {
                writeln!(out, "A 6-digit code was sent to {}.", email)?;
                if resend.is_running() {
                    writeln!(out, "Resend available in {}", resend.label())?;
                } else {
                    writeln!(out, "Didn't get it? Use 'resend'.")?;
                }
                footer(out, "verify <otp>, resend")
            }
        }
    })
}

pub fn admin_login() -> String {
    collect(|out| {
        header(out, Route::AdminLogin)?;
        footer(out, "admin-login <email> <password>")
    })
}

// ============================================================================
// User dashboard
// ============================================================================

fn investment_line(out: &mut String, inv: &Investment) -> fmt::Result {
    writeln!(
        out,
        "  {:<10} {:>12}  {}/{} days  earned {:>12}  {}",
        inv.package_id,
        naira(inv.capital),
        inv.days_completed,
        inv.duration,
        naira(inv.profit_earned),
        inv.status
    )
}

pub fn dashboard(view: &DashboardView) -> String {
    collect(|out| {
        header(out, Route::Dashboard)?;
        if let Some(profile) = &view.profile {
            writeln!(out, "Welcome back, {}", profile.full_name)?;
        }
        writeln!(out, "Wallet balance:  {}", naira(view.wallet_balance()))?;
        writeln!(out, "Active capital:  {}", naira(view.total_capital()))?;
        writeln!(out, "Total earned:    {}", naira(view.total_earned()))?;
        rule(out)?;
        if view.active.is_empty() {
            writeln!(out, "No active investments")?;
        } else {
            writeln!(out, "Active investments:")?;
            for inv in &view.active {
                investment_line(out, inv)?;
            }
        }
        footer(
            out,
            "go /dashboard/investments, /dashboard/fund, /dashboard/withdraw, \
             /dashboard/transactions, /dashboard/support, logout",
        )
    })
}

fn package_line(out: &mut String, package: &Package) -> fmt::Result {
    writeln!(
        out,
        "  {:<8} capital {:>12}  daily {:>10}  {} days  returns {:>12}",
        package.id,
        naira(package.capital),
        naira(package.daily_profit),
        package.duration,
        naira(package.total_return)
    )
}

pub fn investments(view: &InvestmentsView, wallet_balance: f64) -> String {
    collect(|out| {
        header(out, Route::Investments)?;
        writeln!(out, "Wallet balance: {}", naira(wallet_balance))?;
        writeln!(out, "Packages:")?;
        for package in &view.packages {
            package_line(out, package)?;
        }
        if view.packages.is_empty() {
            writeln!(out, "  (none available)")?;
        }
        rule(out)?;
        writeln!(out, "Active ({}):", view.active.len())?;
        for inv in &view.active {
            investment_line(out, inv)?;
        }
        writeln!(out, "History ({}):", view.history.len())?;
        for inv in &view.history {
            investment_line(out, inv)?;
        }
        footer(out, "invest <package id>")
    })
}

fn deposit_line(out: &mut String, deposit: &Deposit) -> fmt::Result {
    write!(
        out,
        "  {}  {:>12}  {:<8}",
        date(&deposit.created_at),
        naira(deposit.amount),
        deposit.status
    )?;
    match &deposit.admin_note {
        Some(note) => writeln!(out, "  {}", note),
        None => writeln!(out),
    }
}

pub fn fund_wallet(view: &FundWalletView) -> String {
    collect(|out| {
        header(out, Route::FundWallet)?;
        writeln!(out, "Transfer to:")?;
        writeln!(out, "  Bank:           {}", COMPANY_BANK.bank_name)?;
        writeln!(out, "  Account number: {}", COMPANY_BANK.account_number)?;
        writeln!(out, "  Account name:   {}", COMPANY_BANK.account_name)?;
        writeln!(out, "then upload your proof of payment.")?;
        rule(out)?;
        writeln!(out, "Deposit history:")?;
        for deposit in &view.deposits {
            deposit_line(out, deposit)?;
        }
        if view.deposits.is_empty() {
            writeln!(out, "  No deposits yet")?;
        }
        footer(out, "deposit <amount> <proof file>")
    })
}

fn withdrawal_line(out: &mut String, w: &Withdrawal) -> fmt::Result {
    write!(
        out,
        "  {}  {:>12}  {:<8}  {} {}",
        date(&w.created_at),
        naira(w.amount),
        w.status,
        w.bank_name,
        w.account_number
    )?;
    match &w.admin_note {
        Some(note) => writeln!(out, "  ({})", note),
        None => writeln!(out),
    }
}

pub fn withdraw(view: &WithdrawView, wallet_balance: f64) -> String {
    collect(|out| {
        header(out, Route::Withdraw)?;
        writeln!(out, "Available: {}", naira(wallet_balance))?;
        match &view.bank_account {
            Some(account) => writeln!(
                out,
                "Pays out to: {} / {} / {}",
                account.bank_name, account.account_number, account.account_name
            )?,
            None => writeln!(out, "No bank account yet. Add one with 'bank'.")?,
        }
        rule(out)?;
        writeln!(out, "Withdrawal history:")?;
        for w in &view.withdrawals {
            withdrawal_line(out, w)?;
        }
        if view.withdrawals.is_empty() {
            writeln!(out, "  No withdrawals yet")?;
        }
        footer(
            out,
            "bank <account number> <bank name> / <account name>, withdraw <amount>",
        )
    })
}

pub fn transactions(view: &TransactionsView) -> String {
    collect(|out| {
        header(out, Route::Transactions)?;
        writeln!(out, "Tab: {}", view.tab)?;
        let rows = view.rows();
        for row in &rows {
            writeln!(
                out,
                "  {}  {:<10} {:>12}  {}",
                date_time(&row.created_at),
                row.kind,
                naira(row.amount),
                row.status
            )?;
        }
        if rows.is_empty() {
            writeln!(out, "  No transactions")?;
        }
        footer(out, "tab <all|deposits|withdrawals|investments>")
    })
}

pub fn support(view: &SupportView) -> String {
    collect(|out| {
        header(out, Route::Support)?;
        let links = [
            ("WhatsApp", &view.links.whatsapp),
            ("Telegram", &view.links.telegram),
            ("Email", &view.links.email),
        ];
        for (label, link) in links {
            if let Some(link) = link {
                writeln!(out, "  {:<9} {}", label, link)?;
            }
        }
        rule(out)?;
        writeln!(out, "Your complaints:")?;
        for complaint in &view.complaints {
            complaint_lines(out, complaint)?;
        }
        if view.complaints.is_empty() {
            writeln!(out, "  None")?;
        }
        footer(out, "complain <subject> / <message>")
    })
}

fn complaint_lines(out: &mut String, complaint: &Complaint) -> fmt::Result {
    write!(
        out,
        "  [{}] {} {}",
        complaint.status,
        complaint.id,
        complaint.subject
    )?;
    match &complaint.user_email {
        Some(email) => writeln!(out, "  <{}>", email)?,
        None => writeln!(out)?,
    }
    writeln!(out, "      {}", complaint.message)?;
    if let Some(response) = &complaint.admin_response {
        writeln!(out, "      → {}", response)?;
    }
    Ok(())
}

// ============================================================================
// Admin console
// ============================================================================

pub fn admin_dashboard(stats: Option<&DashboardStats>) -> String {
    collect(|out| {
        header(out, Route::AdminDashboard)?;
        match stats {
            Some(stats) => {
                writeln!(out, "Users:               {}", stats.total_users)?;
                writeln!(out, "Pending deposits:    {}", stats.pending_deposits)?;
                writeln!(out, "Pending withdrawals: {}", stats.pending_withdrawals)?;
                writeln!(out, "Open complaints:     {}", stats.open_complaints)?;
                writeln!(out, "Active investments:  {}", stats.active_investments)?;
                writeln!(out, "Total deposited:     {}", naira(stats.total_deposited))?;
                writeln!(out, "Total withdrawn:     {}", naira(stats.total_withdrawn))?;
            }
            None => writeln!(out, "Statistics unavailable")?,
        }
        footer(
            out,
            "go /admin/users, /admin/deposits, /admin/withdrawals, \
             /admin/investments, /admin/complaints, admin-logout",
        )
    })
}

pub fn admin_users(route: Route, users: &[UserSummary], commands: &str) -> String {
    collect(|out| {
        header(out, route)?;
        for user in users {
            writeln!(
                out,
                "  {:<12} {:<24} {:<28} {:>12}  {}",
                user.id,
                user.full_name,
                user.email,
                naira(user.wallet_balance),
                if user.is_verified { "verified" } else { "unverified" }
            )?;
        }
        if users.is_empty() {
            writeln!(out, "  No users")?;
        }
        footer(out, commands)
    })
}

pub fn admin_deposits(view: &AdminDepositsView) -> String {
    collect(|out| {
        header(out, Route::AdminDeposits)?;
        for deposit in &view.deposits {
            write!(out, "  {:<12}", deposit.id)?;
            if let Some(name) = &deposit.user_name {
                write!(out, " {:<20}", name)?;
            }
            deposit_line(out, deposit)?;
        }
        if view.deposits.is_empty() {
            writeln!(out, "  No deposits")?;
        }
        if let Some((id, proof)) = &view.proof {
            rule(out)?;
            writeln!(
                out,
                "Proof for {} ({}, {} base64 chars)",
                id,
                proof.filename.as_deref().unwrap_or("unnamed"),
                proof.proof_image.len()
            )?;
        }
        footer(out, "proof <id>, approve <id>, reject <id> <reason>")
    })
}

pub fn admin_withdrawals(withdrawals: &[Withdrawal]) -> String {
    collect(|out| {
        header(out, Route::AdminWithdrawals)?;
        for w in withdrawals {
            write!(out, "  {:<12}", w.id)?;
            if let Some(name) = &w.user_name {
                write!(out, " {:<20}", name)?;
            }
            withdrawal_line(out, w)?;
        }
        if withdrawals.is_empty() {
            writeln!(out, "  No withdrawals")?;
        }
        footer(out, "approve <id>, reject <id> <reason>")
    })
}

pub fn admin_complaints(complaints: &[Complaint]) -> String {
    collect(|out| {
        header(out, Route::AdminComplaints)?;
        for complaint in complaints {
            complaint_lines(out, complaint)?;
        }
        if complaints.is_empty() {
            writeln!(out, "  No complaints")?;
        }
        footer(out, "respond <id> <response>")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexinvest::api::UserProfile;

    #[test]
    fn test_dashboard_shows_naira_totals() {
        let view = DashboardView {
            profile: Some(UserProfile {
                id: "u-1".to_string(),
                email: "ada@example.com".to_string(),
                full_name: "Ada Obi".to_string(),
                phone: None,
                is_verified: true,
                wallet_balance: 25_200.0,
                bank_account: None,
            }),
            active: Vec::new(),
        };

        let text = dashboard(&view);
        assert!(text.contains("Welcome back, Ada Obi"));
        assert!(text.contains("₦25,200"));
        assert!(text.contains("No active investments"));
    }

    #[test]
    fn test_fund_wallet_shows_company_bank() {
        let text = fund_wallet(&FundWalletView::default());
        assert!(text.contains(COMPANY_BANK.account_number));
        assert!(text.contains("No deposits yet"));
    }

    #[test]
    fn test_register_shows_countdown() {
        let text = register(Some("ada@example.com"), Countdown::default());
        assert!(text.contains("ada@example.com"));
        assert!(text.contains("resend"));
    }
}

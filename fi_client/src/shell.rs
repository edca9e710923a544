//! Interactive shell: mounts pages by path and dispatches commands to them.

use crate::commands::{Command, HELP, parse_command};
use crate::render;
use anyhow::{Context, Result};
use flexinvest::pages::{
    AdminComplaintsPage, AdminDashboardPage, AdminDepositsPage, AdminInvestmentsPage,
    AdminLoginPage, AdminUsersPage, AdminWithdrawalsPage, DashboardPage, FundWalletPage,
    InvestmentsPage, LoginPage, Page, RegisterPage, SupportPage, TransactionsPage, WithdrawPage,
    admin_logout, logout,
};
use flexinvest::router::{navigate, resolve};
use flexinvest::{Guard, PageContext, PageResult, Route, SessionStore, ToastLog};
use flexinvest::api::{BankAccount, RegisterRequest};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// The page currently on screen. Commands run to completion before the
/// next line is read, so a page is only replaced once it is idle.
enum Mounted {
    Landing,
    Login(LoginPage),
    Register(RegisterPage),
    AdminLogin(AdminLoginPage),
    Dashboard(DashboardPage),
    Investments(InvestmentsPage),
    FundWallet(FundWalletPage),
    Withdraw(WithdrawPage),
    Transactions(TransactionsPage),
    Support(SupportPage),
    AdminDashboard(AdminDashboardPage),
    AdminUsers(AdminUsersPage),
    AdminDeposits(AdminDepositsPage),
    AdminWithdrawals(AdminWithdrawalsPage),
    AdminInvestments(AdminInvestmentsPage),
    AdminComplaints(AdminComplaintsPage),
}

impl Mounted {
    fn new(route: Route, ctx: PageContext) -> Self {
        match route {
            Route::Landing => Mounted::Landing,
            Route::Login => Mounted::Login(LoginPage::new(ctx)),
            Route::Register => Mounted::Register(RegisterPage::new(ctx)),
            Route::AdminLogin => Mounted::AdminLogin(AdminLoginPage::new(ctx)),
            Route::Dashboard => Mounted::Dashboard(DashboardPage::new(ctx)),
            Route::Investments => Mounted::Investments(InvestmentsPage::new(ctx)),
            Route::FundWallet => Mounted::FundWallet(FundWalletPage::new(ctx)),
            Route::Withdraw => Mounted::Withdraw(WithdrawPage::new(ctx)),
            Route::Transactions => Mounted::Transactions(TransactionsPage::new(ctx)),
            Route::Support => Mounted::Support(SupportPage::new(ctx)),
            Route::AdminDashboard => Mounted::AdminDashboard(AdminDashboardPage::new(ctx)),
            Route::AdminUsers => Mounted::AdminUsers(AdminUsersPage::new(ctx)),
            Route::AdminDeposits => Mounted::AdminDeposits(AdminDepositsPage::new(ctx)),
            Route::AdminWithdrawals => Mounted::AdminWithdrawals(AdminWithdrawalsPage::new(ctx)),
            Route::AdminInvestments => Mounted::AdminInvestments(AdminInvestmentsPage::new(ctx)),
            Route::AdminComplaints => Mounted::AdminComplaints(AdminComplaintsPage::new(ctx)),
        }
    }

    fn route(&self) -> Route {
        match self {
            Mounted::Landing => Route::Landing,
            Mounted::Login(_) => LoginPage::ROUTE,
            Mounted::Register(_) => RegisterPage::ROUTE,
            Mounted::AdminLogin(_) => AdminLoginPage::ROUTE,
            Mounted::Dashboard(_) => DashboardPage::ROUTE,
            Mounted::Investments(_) => InvestmentsPage::ROUTE,
            Mounted::FundWallet(_) => FundWalletPage::ROUTE,
            Mounted::Withdraw(_) => WithdrawPage::ROUTE,
            Mounted::Transactions(_) => TransactionsPage::ROUTE,
            Mounted::Support(_) => SupportPage::ROUTE,
            Mounted::AdminDashboard(_) => AdminDashboardPage::ROUTE,
            Mounted::AdminUsers(_) => AdminUsersPage::ROUTE,
            Mounted::AdminDeposits(_) => AdminDepositsPage::ROUTE,
            Mounted::AdminWithdrawals(_) => AdminWithdrawalsPage::ROUTE,
            Mounted::AdminInvestments(_) => AdminInvestmentsPage::ROUTE,
            Mounted::AdminComplaints(_) => AdminComplaintsPage::ROUTE,
        }
    }

    async fn load(&self) -> PageResult<()> {
        match self {
            Mounted::Landing => Ok(()),
            Mounted::Login(p) => p.load().await,
            Mounted::Register(p) => p.load().await,
            Mounted::AdminLogin(p) => p.load().await,
            Mounted::Dashboard(p) => p.load().await,
            Mounted::Investments(p) => p.load().await,
            Mounted::FundWallet(p) => p.load().await,
            Mounted::Withdraw(p) => p.load().await,
            Mounted::Transactions(p) => p.load().await,
            Mounted::Support(p) => p.load().await,
            Mounted::AdminDashboard(p) => p.load().await,
            Mounted::AdminUsers(p) => p.load().await,
            Mounted::AdminDeposits(p) => p.load().await,
            Mounted::AdminWithdrawals(p) => p.load().await,
            Mounted::AdminInvestments(p) => p.load().await,
            Mounted::AdminComplaints(p) => p.load().await,
        }
    }
}

/// Page a command belongs to, for commands that act on one page
fn home(command: &Command) -> Option<Route> {
    match command {
        Command::Login { .. }
        | Command::Forgot(_)
        | Command::ResetOtp(_)
        | Command::ResetPassword { .. } => Some(Route::Login),
        Command::Register { .. } | Command::Verify(_) | Command::Resend => Some(Route::Register),
        Command::AdminLogin { .. } => Some(Route::AdminLogin),
        Command::Invest(_) => Some(Route::Investments),
        Command::Deposit { .. } => Some(Route::FundWallet),
        Command::Bank { .. } | Command::Withdraw(_) => Some(Route::Withdraw),
        Command::Tab(_) => Some(Route::Transactions),
        Command::Complain { .. } => Some(Route::Support),
        Command::Credit { .. } => Some(Route::AdminUsers),
        Command::Approve(_) | Command::Reject { .. } | Command::Proof(_) => {
            Some(Route::AdminDeposits)
        }
        Command::Respond { .. } => Some(Route::AdminComplaints),
        _ => None,
    }
}

/// What the shell does after a command ran
enum Action {
    Stay,
    Navigate(Route),
    Misplaced,
}

fn follow(result: PageResult<Route>) -> Action {
    match result {
        Ok(route) => Action::Navigate(route),
        Err(_) => Action::Stay,
    }
}

fn stay<T>(_: PageResult<T>) -> Action {
    Action::Stay
}

/// Outcome of one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep going; print this text
    Continue(String),
    Quit,
}

pub struct Shell {
    ctx: PageContext,
    toasts: Arc<ToastLog>,
    page: Mounted,
}

impl Shell {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let toasts = Arc::new(ToastLog::new());
        Self {
            ctx: PageContext::new(session, toasts.clone()),
            toasts,
            page: Mounted::Landing,
        }
    }

    /// Route of the page on screen
    pub fn route(&self) -> Route {
        self.page.route()
    }

    pub fn session(&self) -> &SessionStore {
        self.ctx.session()
    }

    /// Navigate to `path` through the guards, then load and render the page.
    pub async fn go(&mut self, path: &str) -> String {
        let snapshot = self.ctx.session().snapshot().await;
        match navigate(path, &snapshot) {
            Guard::Loading => "Checking your session...\n".to_string(),
            Guard::Allow(route) | Guard::Redirect(route) => self.mount(route).await,
        }
    }

    async fn mount(&mut self, route: Route) -> String {
        self.page = Mounted::new(route, self.ctx.clone());
        self.reload().await
    }

    async fn reload(&mut self) -> String {
        if let Err(e) = self.page.load().await {
            log::debug!("Loading {} stopped: {}", self.page.route(), e);
        }
        let mut out = self.drain_toasts();
        out.push_str(&self.render().await);
        out
    }

    /// Parse and run one line of input.
    pub async fn run_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue(String::new());
        }
        match parse_command(line) {
            Ok(command) => self.execute(command).await,
            Err(e) => Flow::Continue(format!("{}\n", e)),
        }
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::Help => return Flow::Continue(HELP.to_string()),
            Command::Go(path) => return Flow::Continue(self.go(&path).await),
            Command::Refresh => return Flow::Continue(self.reload().await),
            _ => {}
        }

        let action = self.dispatch(&command).await;
        let text = match action {
            Action::Navigate(route) => {
                let mut out = self.drain_toasts();
                out.push_str(&self.go(route.path()).await);
                out
            }
            Action::Stay => self.after_submit().await,
            Action::Misplaced => match home(&command) {
                Some(route) => format!(
                    "'{}' works on the {} page. Open it with 'go {}'.\n",
                    command.name(),
                    route.title(),
                    route.path()
                ),
                None => format!("'{}' is not available here.\n", command.name()),
            },
        };
        Flow::Continue(text)
    }

    async fn dispatch(&self, command: &Command) -> Action {
        let ctx = &self.ctx;
        match (command, &self.page) {
            (Command::Logout, _) => Action::Navigate(logout(ctx).await),
            (Command::AdminLogout, _) => Action::Navigate(admin_logout(ctx).await),

            (Command::Login { email, password }, Mounted::Login(p)) => {
                follow(p.login(email, password).await)
            }
            (Command::Forgot(email), Mounted::Login(p)) => stay(p.request_reset(email).await),
            (Command::ResetOtp(otp), Mounted::Login(p)) => stay(p.verify_reset_otp(otp).await),
            (Command::ResetPassword { password, confirm }, Mounted::Login(p)) => {
                stay(p.reset_password(password, confirm).await)
            }

            (
                Command::Register {
                    email,
                    password,
                    phone,
                    full_name,
                },
                Mounted::Register(p),
            ) => {
                let request = RegisterRequest {
                    email: email.clone(),
                    password: password.clone(),
                    full_name: full_name.clone(),
                    phone: phone.clone(),
                };
                stay(p.register(request).await)
            }
            (Command::Verify(otp), Mounted::Register(p)) => follow(p.verify(otp).await),
            (Command::Resend, Mounted::Register(p)) => stay(p.resend().await),

            (Command::AdminLogin { email, password }, Mounted::AdminLogin(p)) => {
                follow(p.login(email, password).await)
            }

            (Command::Invest(package_id), Mounted::Investments(p)) => {
                stay(p.invest(package_id).await)
            }
            (Command::Deposit { amount, proof }, Mounted::FundWallet(p)) => {
                p.set_amount(amount);
                if p.attach_file(proof).await.is_err() {
                    return Action::Stay;
                }
                stay(p.submit().await)
            }
            (
                Command::Bank {
                    account_number,
                    bank_name,
                    account_name,
                },
                Mounted::Withdraw(p),
            ) => {
                p.edit_bank_form(|form| {
                    *form = BankAccount {
                        bank_name: bank_name.clone(),
                        account_number: account_number.clone(),
                        account_name: account_name.clone(),
                    }
                });
                stay(p.save_bank_account().await)
            }
            (Command::Withdraw(amount), Mounted::Withdraw(p)) => stay(p.withdraw(amount).await),
            (Command::Tab(tab), Mounted::Transactions(p)) => {
                p.select_tab(*tab);
                Action::Stay
            }
            (Command::Complain { subject, message }, Mounted::Support(p)) => {
                stay(p.submit(subject, message).await)
            }

            (
                Command::Credit {
                    user_id,
                    amount,
                    reason,
                },
                Mounted::AdminUsers(p),
            ) => stay(p.credit_wallet(user_id, amount, reason).await),
            (Command::Approve(id), Mounted::AdminDeposits(p)) => stay(p.approve(id).await),
            (Command::Approve(id), Mounted::AdminWithdrawals(p)) => stay(p.approve(id).await),
            (Command::Reject { id, reason }, Mounted::AdminDeposits(p)) => {
                stay(p.reject(id, reason).await)
            }
            (Command::Reject { id, reason }, Mounted::AdminWithdrawals(p)) => {
                stay(p.reject(id, reason).await)
            }
            (Command::Proof(id), Mounted::AdminDeposits(p)) => stay(p.view_proof(id).await),
            (Command::Respond { id, response }, Mounted::AdminComplaints(p)) => {
                stay(p.respond(id, response).await)
            }

            _ => Action::Misplaced,
        }
    }

    /// Toasts from the submission, then the page again. A submission that
    /// ended a session (a 401) sends the page back through its guard.
    async fn after_submit(&mut self) -> String {
        let snapshot = self.ctx.session().snapshot().await;
        match resolve(self.page.route(), &snapshot) {
            Guard::Redirect(route) => {
                let mut out = self.drain_toasts();
                out.push_str(&self.go(route.path()).await);
                out
            }
            _ => {
                let mut out = self.drain_toasts();
                out.push_str(&self.render().await);
                out
            }
        }
    }

    fn drain_toasts(&self) -> String {
        self.toasts
            .drain()
            .into_iter()
            .map(|toast| format!("{}\n", toast))
            .collect()
    }

    async fn render(&self) -> String {
        let session = self.ctx.session();
        match &self.page {
            Mounted::Landing => render::landing(),
            Mounted::Login(p) => render::login(&p.forgot_password()),
            Mounted::Register(p) => {
                render::register(p.pending_email().as_deref(), p.resend_countdown())
            }
            Mounted::AdminLogin(_) => render::admin_login(),
            Mounted::Dashboard(p) => render::dashboard(&p.view().await),
            Mounted::Investments(p) => {
                render::investments(&p.view(), session.wallet_balance().await)
            }
            Mounted::FundWallet(p) => render::fund_wallet(&p.view()),
            Mounted::Withdraw(p) => render::withdraw(&p.view(), session.wallet_balance().await),
            Mounted::Transactions(p) => render::transactions(&p.view()),
            Mounted::Support(p) => render::support(&p.view()),
            Mounted::AdminDashboard(p) => render::admin_dashboard(p.stats().as_ref()),
            Mounted::AdminUsers(p) => render::admin_users(
                Route::AdminUsers,
                &p.users(),
                "credit <user id> <amount> <reason>",
            ),
            Mounted::AdminInvestments(p) => render::admin_users(
                Route::AdminInvestments,
                &p.investors(),
                "go /admin/users",
            ),
            Mounted::AdminDeposits(p) => render::admin_deposits(&p.view()),
            Mounted::AdminWithdrawals(p) => render::admin_withdrawals(&p.withdrawals()),
            Mounted::AdminComplaints(p) => render::admin_complaints(&p.complaints()),
        }
    }

    /// Read commands from stdin until EOF or `quit`.
    pub async fn run(&mut self) -> Result<()> {
        let mut stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            stdout
                .write_all(format!("{}> ", self.route().path()).as_bytes())
                .await?;
            stdout.flush().await?;

            line.clear();
            let read = stdin
                .read_line(&mut line)
                .await
                .context("Failed to read input")?;
            if read == 0 {
                break; // EOF
            }

            match self.run_line(&line).await {
                Flow::Continue(text) => {
                    stdout.write_all(text.as_bytes()).await?;
                }
                Flow::Quit => break,
            }
        }

        println!("Goodbye.");
        Ok(())
    }
}

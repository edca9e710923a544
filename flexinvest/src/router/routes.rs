//! Route table.

use std::fmt;

/// Every page the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Investments,
    FundWallet,
    Withdraw,
    Transactions,
    Support,
    AdminLogin,
    AdminDashboard,
    AdminUsers,
    AdminDeposits,
    AdminWithdrawals,
    AdminInvestments,
    AdminComplaints,
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone
    Public,
    /// Login and register pages: signed-in users are sent on to the dashboard
    GuestOnly,
    /// Needs the user session
    User,
    /// Login page of the admin console: signed-in admins are sent on
    AdminGuestOnly,
    /// Needs the admin session
    Admin,
}

impl Route {
    pub const ALL: [Route; 16] = [
        Route::Landing,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Investments,
        Route::FundWallet,
        Route::Withdraw,
        Route::Transactions,
        Route::Support,
        Route::AdminLogin,
        Route::AdminDashboard,
        Route::AdminUsers,
        Route::AdminDeposits,
        Route::AdminWithdrawals,
        Route::AdminInvestments,
        Route::AdminComplaints,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Investments => "/dashboard/investments",
            Route::FundWallet => "/dashboard/fund",
            Route::Withdraw => "/dashboard/withdraw",
            Route::Transactions => "/dashboard/transactions",
            Route::Support => "/dashboard/support",
            Route::AdminLogin => "/admin/login",
            Route::AdminDashboard => "/admin/dashboard",
            Route::AdminUsers => "/admin/users",
            Route::AdminDeposits => "/admin/deposits",
            Route::AdminWithdrawals => "/admin/withdrawals",
            Route::AdminInvestments => "/admin/investments",
            Route::AdminComplaints => "/admin/complaints",
        }
    }

    /// Resolve a path. Unknown paths fall back to the landing page.
    ///
    /// A trailing slash and any query string or fragment are ignored.
    pub fn parse(path: &str) -> Route {
        Self::lookup(path).unwrap_or(Route::Landing)
    }

    /// Resolve a path without the fallback
    pub fn lookup(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn access(self) -> Access {
        match self {
            Route::Landing => Access::Public,
            Route::Login | Route::Register => Access::GuestOnly,
            Route::AdminLogin => Access::AdminGuestOnly,
            Route::Dashboard
            | Route::Investments
            | Route::FundWallet
            | Route::Withdraw
            | Route::Transactions
            | Route::Support => Access::User,
            Route::AdminDashboard
            | Route::AdminUsers
            | Route::AdminDeposits
            | Route::AdminWithdrawals
            | Route::AdminInvestments
            | Route::AdminComplaints => Access::Admin,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Landing => "FlexInvest",
            Route::Login => "Login",
            Route::Register => "Create Account",
            Route::Dashboard => "Dashboard",
            Route::Investments => "Investments",
            Route::FundWallet => "Fund Wallet",
            Route::Withdraw => "Withdraw",
            Route::Transactions => "Transactions",
            Route::Support => "Support",
            Route::AdminLogin => "Admin Login",
            Route::AdminDashboard => "Admin Dashboard",
            Route::AdminUsers => "Users",
            Route::AdminDeposits => "Deposits",
            Route::AdminWithdrawals => "Withdrawals",
            Route::AdminInvestments => "Investments",
            Route::AdminComplaints => "Complaints",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_path_parses_back() {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.path()), route);
        }
    }

    #[test]
    fn test_unknown_path_falls_back_to_landing() {
        assert_eq!(Route::parse("/nope"), Route::Landing);
        assert_eq!(Route::parse("/admin"), Route::Landing);
        assert_eq!(Route::lookup("/dashboard/nope"), None);
    }

    #[test]
    fn test_trailing_slash_and_query_ignored() {
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/admin/deposits?page=2"), Route::AdminDeposits);
        assert_eq!(Route::parse(""), Route::Landing);
    }

    #[test]
    fn test_access_levels() {
        assert_eq!(Route::Landing.access(), Access::Public);
        assert_eq!(Route::Register.access(), Access::GuestOnly);
        assert_eq!(Route::Support.access(), Access::User);
        assert_eq!(Route::AdminLogin.access(), Access::AdminGuestOnly);
        assert_eq!(Route::AdminInvestments.access(), Access::Admin);
    }
}

//! Session data models.

use crate::api::{Admin, DashboardStats, UserProfile};

/// Which of the two independent sessions an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Realm {
    User,
    Admin,
}

impl Realm {
    /// Storage key the realm's bearer token is persisted under
    pub fn storage_key(self) -> &'static str {
        match self {
            Realm::User => "token",
            Realm::Admin => "adminToken",
        }
    }
}

impl std::fmt::Display for Realm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Realm::User => write!(f, "user"),
            Realm::Admin => write!(f, "admin"),
        }
    }
}

/// User half of the session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSession {
    pub token: Option<String>,
    pub profile: Option<UserProfile>,
}

impl UserSession {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.profile.is_some()
    }

    /// Wallet balance of the cached profile, zero when none is loaded
    pub fn wallet_balance(&self) -> f64 {
        self.profile.as_ref().map_or(0.0, |p| p.wallet_balance)
    }
}

/// What is known about the signed-in admin.
///
/// A fresh login returns the admin's identity, while a rehydrated token is
/// validated against the dashboard endpoint and only yields statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminProfile {
    Account(Admin),
    Dashboard(DashboardStats),
}

/// Admin half of the session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminSession {
    pub token: Option<String>,
    pub profile: Option<AdminProfile>,
}

impl AdminSession {
    pub fn is_admin(&self) -> bool {
        self.token.is_some() && self.profile.is_some()
    }
}

/// Point-in-time copy of both sessions, used by route guards and views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// True until the startup token checks have finished
    pub loading: bool,
    pub user: UserSession,
    pub admin: AdminSession,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.admin.is_admin()
    }
}

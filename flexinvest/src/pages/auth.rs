//! Login, registration and password-reset pages.

use super::{Page, PageBase, PageContext, PageError, PageResult, Shared, ensure, is_blank, is_otp};
use crate::api::RegisterRequest;
use crate::router::Route;
use std::time::Duration;
use tokio::time::Instant;

/// Seconds before a registration OTP may be re-sent
pub const OTP_RESEND_SECS: u64 = 300;

const MIN_PASSWORD_LEN: usize = 6;

/// Wall-clock countdown driven by the tokio clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    deadline: Option<Instant>,
}

impl Countdown {
    pub fn start(&mut self, secs: u64) {
        self.deadline = Some(Instant::now() + Duration::from_secs(secs));
    }

    pub fn remaining(&self) -> Duration {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or_default()
    }

    /// Whole seconds left, rounded up
    pub fn remaining_secs(&self) -> u64 {
        let remaining = self.remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    pub fn is_running(&self) -> bool {
        self.remaining_secs() > 0
    }

    /// `m:ss`
    pub fn label(&self) -> String {
        let secs = self.remaining_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

// ============================================================================
// Login
// ============================================================================

/// Steps of the forgot-password dialog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetStep {
    #[default]
    Email,
    Otp,
    NewPassword,
}

/// State of the forgot-password dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPassword {
    pub step: ResetStep,
    pub email: String,
    pub otp: String,
    /// Returned by the backend once the OTP checks out
    pub reset_token: Option<String>,
}

pub struct LoginPage {
    base: PageBase,
    forgot: Shared<ForgotPassword>,
}

impl LoginPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            forgot: Shared::default(),
        }
    }

    /// Sign in; on success the caller should navigate to the returned route.
    pub async fn login(&self, email: &str, password: &str) -> PageResult<Route> {
        let _submitting = self.base.submit()?;
        let ctx = self.base.ctx();

        let result = self
            .base
            .call_public(ctx.session().login(email.trim(), password))
            .await
            .map(|_| Route::Dashboard);
        ctx.conclude(result, "Welcome to your dashboard!", "Login failed")
    }

    pub fn forgot_password(&self) -> ForgotPassword {
        self.forgot.get()
    }

    /// Close the dialog and start over at the email step
    pub fn cancel_reset(&self) {
        self.forgot.update(|f| *f = ForgotPassword::default());
    }

    /// Step 1: ask the backend to email a reset OTP.
    pub async fn request_reset(&self, email: &str) -> PageResult<()> {
        let ctx = self.base.ctx();
        let email = email.trim();
        ctx.validate(ensure(!email.is_empty(), "Please enter your email address"))?;
        let _submitting = self.base.submit()?;

        let result = self
            .base
            .call_public(ctx.api().forgot_password(email))
            .await;
        if result.is_ok() {
            self.forgot.update(|f| {
                f.email = email.to_string();
                f.step = ResetStep::Otp;
            });
        }
        ctx.conclude(
            result.map(|_| ()),
            "Reset instructions sent to your email",
            "Failed to send reset instructions",
        )
    }

    /// Step 2: confirm the emailed OTP.
    pub async fn verify_reset_otp(&self, otp: &str) -> PageResult<()> {
        let ctx = self.base.ctx();
        let otp = otp.trim();
        let state = self.forgot.get();
        ctx.validate(
            ensure(state.step == ResetStep::Otp, "Please enter your email address")
                .and_then(|_| ensure(is_otp(otp), "Please enter a 6-digit OTP")),
        )?;
        let _submitting = self.base.submit()?;

        let result = self
            .base
            .call_public(ctx.api().verify_reset_otp(&state.email, otp))
            .await;
        if let Ok(ticket) = &result {
            self.forgot.update(|f| {
                f.otp = otp.to_string();
                f.reset_token = Some(ticket.reset_token.clone());
                f.step = ResetStep::NewPassword;
            });
        }
        ctx.conclude(result.map(|_| ()), "OTP verified successfully", "Invalid OTP")
    }

    /// Step 3: set the new password. The dialog returns to step 1 on success.
    pub async fn reset_password(&self, new_password: &str, confirm: &str) -> PageResult<()> {
        let ctx = self.base.ctx();
        let state = self.forgot.get();
        ctx.validate(
            ensure(state.step == ResetStep::NewPassword, "Please enter a 6-digit OTP")
                .and_then(|_| {
                    ensure(
                        new_password.chars().count() >= MIN_PASSWORD_LEN,
                        "Password must be at least 6 characters",
                    )
                })
                .and_then(|_| ensure(new_password == confirm, "Passwords do not match")),
        )?;
        let _submitting = self.base.submit()?;

        let result = self
            .base
            .call_public(ctx.api().reset_password(&state.email, &state.otp, new_password))
            .await;
        if result.is_ok() {
            self.cancel_reset();
        }
        ctx.conclude(
            result.map(|_| ()),
            "Password reset successfully! You can now login",
            "Failed to reset password",
        )
    }
}

impl Page for LoginPage {
    const ROUTE: Route = Route::Login;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        Ok(())
    }
}

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Default)]
struct RegisterState {
    /// Email awaiting OTP verification; set once registration succeeds
    pending_email: Option<String>,
    resend: Countdown,
}

pub struct RegisterPage {
    base: PageBase,
    state: Shared<RegisterState>,
}

impl RegisterPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            state: Shared::default(),
        }
    }

    /// Email of the account waiting for its OTP
    pub fn pending_email(&self) -> Option<String> {
        self.state.read(|s| s.pending_email.clone())
    }

    pub fn awaiting_otp(&self) -> bool {
        self.state.read(|s| s.pending_email.is_some())
    }

    pub fn resend_countdown(&self) -> Countdown {
        self.state.read(|s| s.resend)
    }

    pub fn can_resend(&self) -> bool {
        self.awaiting_otp() && !self.resend_countdown().is_running()
    }

    /// Create the account and open the OTP step.
    pub async fn register(&self, request: RegisterRequest) -> PageResult<()> {
        let ctx = self.base.ctx();
        let fields = [
            &request.email,
            &request.password,
            &request.full_name,
            &request.phone,
        ];
        ctx.validate(
            ensure(
                !fields.into_iter().any(|field| is_blank(field)),
                "Please fill all fields",
            )
            .and_then(|_| {
                ensure(
                    request.password.chars().count() >= MIN_PASSWORD_LEN,
                    "Password must be at least 6 characters",
                )
            }),
        )?;
        let _submitting = self.base.submit()?;

        let request = RegisterRequest {
            email: request.email.trim().to_string(),
            full_name: request.full_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            ..request
        };
        let result = self
            .base
            .call_public(ctx.session().register(&request))
            .await;
        if result.is_ok() {
            self.state.update(|s| {
                s.pending_email = Some(request.email.clone());
                s.resend.start(OTP_RESEND_SECS);
            });
        }
        ctx.conclude(
            result.map(|_| ()),
            "Registration successful! Please verify your email.",
            "Registration failed",
        )
    }

    /// Verify the emailed OTP, which also signs the user in.
    pub async fn verify(&self, otp: &str) -> PageResult<Route> {
        let ctx = self.base.ctx();
        let otp = otp.trim();
        let email = self.pending_email();
        ctx.validate(
            ensure(email.is_some(), "Please register first")
                .and_then(|_| ensure(is_otp(otp), "Please enter a 6-digit OTP")),
        )?;
        let email = email.unwrap_or_default();
        let _submitting = self.base.submit()?;

        let result = self
            .base
            .call_public(ctx.session().verify_otp(&email, otp))
            .await
            .map(|_| Route::Dashboard);
        if result.is_ok() {
            self.state.update(|s| *s = RegisterState::default());
        }
        ctx.conclude(
            result,
            "Email verified successfully! Welcome to FlexInvest.",
            "Verification failed",
        )
    }

    /// Send a fresh OTP. Refused while the resend countdown is running.
    pub async fn resend(&self) -> PageResult<()> {
        let ctx = self.base.ctx();
        let (email, countdown) = self.state.read(|s| (s.pending_email.clone(), s.resend));
        ctx.validate(ensure(email.is_some(), "Please register first"))?;
        if countdown.is_running() {
            return ctx.validate(Err(PageError::validation(format!(
                "You can request a new OTP in {}",
                countdown.label()
            ))));
        }
        let email = email.unwrap_or_default();
        let _submitting = self.base.submit()?;

        let result = self
            .base
            .call_public(ctx.session().resend_otp(&email))
            .await;
        if result.is_ok() {
            self.state.update(|s| s.resend.start(OTP_RESEND_SECS));
        }
        ctx.conclude(
            result.map(|_| ()),
            "New OTP sent to your email",
            "Failed to resend OTP",
        )
    }
}

impl Page for RegisterPage {
    const ROUTE: Route = Route::Register;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        Ok(())
    }
}

// ============================================================================
// Admin login
// ============================================================================

pub struct AdminLoginPage {
    base: PageBase,
}

impl AdminLoginPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> PageResult<Route> {
        let _submitting = self.base.submit()?;
        let ctx = self.base.ctx();

        let result = self
            .base
            .call_public(ctx.session().admin_login(email.trim(), password))
            .await
            .map(|_| Route::AdminDashboard);
        ctx.conclude(result, "Admin login successful!", "Login failed")
    }
}

impl Page for AdminLoginPage {
    const ROUTE: Route = Route::AdminLogin;

    fn base(&self) -> &PageBase {
        &self.base
    }

    async fn load(&self) -> PageResult<()> {
        Ok(())
    }
}

// ============================================================================
// Logout
// ============================================================================

/// End the user session and return to the landing page
pub async fn logout(ctx: &PageContext) -> Route {
    ctx.session().logout().await;
    Route::Landing
}

/// End the admin session and return to the admin login page
pub async fn admin_logout(ctx: &PageContext) -> Route {
    ctx.session().admin_logout().await;
    Route::AdminLogin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_counts_down() {
        let mut countdown = Countdown::default();
        assert!(!countdown.is_running());
        assert_eq!(countdown.label(), "0:00");

        countdown.start(OTP_RESEND_SECS);
        assert_eq!(countdown.remaining_secs(), 300);
        assert_eq!(countdown.label(), "5:00");

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(countdown.remaining_secs(), 299);
        assert_eq!(countdown.label(), "4:59");

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_reset_starts_at_email_step() {
        assert_eq!(ForgotPassword::default().step, ResetStep::Email);
    }
}

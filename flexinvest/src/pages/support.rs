//! Support contacts and complaint tickets.

use super::{Page, PageBase, PageContext, PageResult, Shared, ensure, is_blank, refreshed, settle};
use crate::api::{Complaint, ComplaintRequest, SupportLinks};
use crate::router::Route;
use crate::session::Realm;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportView {
    pub links: SupportLinks,
    pub complaints: Vec<Complaint>,
}

pub struct SupportPage {
    base: PageBase,
    state: Shared<SupportView>,
}

impl SupportPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            base: PageBase::new(ctx),
            state: Shared::default(),
        }
    }

    pub fn view(&self) -> SupportView {
        self.state.get()
    }

    /// File a complaint, then reload the ticket history.
    pub async fn submit(&self, subject: &str, message: &str) -> PageResult<()> {
        let ctx = self.base.ctx();
        ctx.validate(ensure(
            !is_blank(subject) && !is_blank(message),
            "Please fill all fields",
        ))?;
        let _submitting = self.base.submit()?;

        let request = ComplaintRequest {
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
        };
        let result = self
            .base
            .call(Realm::User, |api, token| async move {
                api.create_complaint(&token, &request).await
            })
            .await;

        let result = ctx.conclude(
            result.map(|_| ()),
            "Complaint submitted successfully!",
            "Failed to submit complaint",
        );
        if result.is_ok() {
            if let Some(complaints) = refreshed("complaints", self.fetch_complaints().await) {
                self.state.update(|s| s.complaints = complaints);
            }
        }
        result
    }

    async fn fetch_complaints(&self) -> PageResult<Vec<Complaint>> {
        self.base
            .call(Realm::User, |api, token| async move {
                api.complaint_history(&token).await
            })
            .await
    }
}

impl Page for SupportPage {
    const ROUTE: Route = Route::Support;

    fn base(&self) -> &PageBase {
        &self.base
    }

    /// Public support links and the user's complaints, concurrently.
    async fn load(&self) -> PageResult<()> {
        let _loading = self.base.loading();
        let api = self.base.ctx().api();

        let (links, complaints) = tokio::join!(
            self.base.call_public(api.support_links()),
            self.fetch_complaints(),
        );
        let links = settle("support links", links)?;
        let complaints = settle("complaints", complaints)?;

        self.state.update(|s| {
            s.links = links.unwrap_or_default();
            s.complaints = complaints.unwrap_or_default();
        });
        Ok(())
    }
}

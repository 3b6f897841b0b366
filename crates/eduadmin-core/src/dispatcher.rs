use std::sync::Arc;
use std::time::Duration;

use crate::actions::{ResourceAction, CONNECTION_ERROR};
use crate::api::{ActionOutcome, ApiError, ApiTransport};
use crate::feedback::FeedbackSurface;
use crate::page::Page;

/// One click on an action button. Lives only for the duration of its round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    pub action: ResourceAction,
    pub target: u64,
}

impl PendingAction {
    pub fn path(&self) -> String {
        self.action.path(self.target)
    }
}

/// How a dispatched action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReport {
    /// The confirmation prompt was refused; nothing was sent
    Declined,
    Succeeded { message: String },
    /// `success: false` or a non-2xx status
    Rejected { detail: Option<String> },
    /// 2xx with a body that is not a `{ success, .. }` object
    Malformed,
    /// No HTTP response at all
    Unreachable,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchReport::Succeeded { .. })
    }
}

/// Confirm-then-POST handler shared by every admin action button.
///
/// Never retries. Every outcome except `Declined` produces exactly one banner,
/// and only `Succeeded` refreshes the view.
pub struct ActionDispatcher {
    transport: Arc<dyn ApiTransport>,
    page: Arc<dyn Page>,
    feedback: FeedbackSurface,
    reload_delay: Duration,
}

impl ActionDispatcher {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        page: Arc<dyn Page>,
        feedback: FeedbackSurface,
        reload_delay: Duration,
    ) -> Self {
        Self {
            transport,
            page,
            feedback,
            reload_delay,
        }
    }

    pub async fn dispatch(&self, action: ResourceAction, target: u64) -> DispatchReport {
        if !self.page.confirm(action.confirmation()) {
            tracing::debug!("{:?} on {} declined", action, target);
            return DispatchReport::Declined;
        }

        let pending = PendingAction { action, target };
        let path = pending.path();

        let outcome = match self.transport.post_empty(&path).await {
            Ok(raw) => ActionOutcome::parse(&raw),
            Err(e) => Err(ApiError::from(e)),
        };

        match outcome {
            Ok(ActionOutcome::Success { message }) => {
                tracing::info!("{} succeeded: {}", path, message);
                self.feedback.success(format!("✅ {}", message));
                tokio::time::sleep(self.reload_delay).await;
                self.page.reload();
                DispatchReport::Succeeded { message }
            }
            Ok(ActionOutcome::Failure { detail }) => {
                tracing::warn!("{} refused: {:?}", path, detail);
                let text = detail.as_deref().unwrap_or(action.failure_message());
                self.feedback.danger(format!("❌ {}", text));
                DispatchReport::Rejected { detail }
            }
            Err(ApiError::Malformed { status, reason }) => {
                tracing::warn!(
                    "{} answered HTTP {} with a malformed body: {}",
                    path,
                    status,
                    reason
                );
                self.feedback.danger(format!("❌ {}", action.failure_message()));
                DispatchReport::Malformed
            }
            Err(ApiError::Transport(e)) => {
                tracing::warn!("{} failed: {}", path, e);
                self.feedback.danger(format!("❌ {}", CONNECTION_ERROR));
                DispatchReport::Unreachable
            }
        }
    }

    pub async fn toggle_user_active(&self, user_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::ToggleUserActive, user_id).await
    }

    pub async fn verify_user(&self, user_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::VerifyUser, user_id).await
    }

    pub async fn delete_content(&self, content_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::DeleteContent, content_id).await
    }

    pub async fn toggle_content_access(&self, content_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::ToggleContentAccess, content_id).await
    }

    pub async fn approve_group(&self, request_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::ApproveGroup, request_id).await
    }

    pub async fn reject_group(&self, request_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::RejectGroup, request_id).await
    }

    pub async fn delete_publication(&self, publication_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::DeletePublication, publication_id).await
    }

    pub async fn approve_pro_upgrade(&self, request_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::ApproveProUpgrade, request_id).await
    }

    pub async fn reject_pro_upgrade(&self, request_id: u64) -> DispatchReport {
        self.dispatch(ResourceAction::RejectProUpgrade, request_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::feedback::Severity;
    use crate::page::testing::{PageEvent, RecordingPage};
    use serde_json::json;

    struct Harness {
        transport: Arc<FakeTransport>,
        page: Arc<RecordingPage>,
        feedback: FeedbackSurface,
        dispatcher: Arc<ActionDispatcher>,
    }

    fn harness(transport: FakeTransport, page: RecordingPage) -> Harness {
        let transport = Arc::new(transport);
        let page = Arc::new(page);
        let feedback = FeedbackSurface::default();
        let dispatcher = Arc::new(ActionDispatcher::new(
            transport.clone(),
            page.clone(),
            feedback.clone(),
            Duration::from_millis(1000),
        ));
        Harness {
            transport,
            page,
            feedback,
            dispatcher,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_confirmation_sends_nothing() {
        for action in ResourceAction::ALL {
            let h = harness(FakeTransport::new(), RecordingPage::declining());
            let report = h.dispatcher.dispatch(action, 1).await;

            assert_eq!(report, DispatchReport::Declined);
            assert_eq!(h.transport.call_count(), 0);
            assert!(h.feedback.is_empty());
            assert_eq!(
                h.page.events(),
                vec![PageEvent::Confirm(action.confirmation().to_string())]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_user_success_banner_then_reload_after_delay() {
        let h = harness(
            FakeTransport::new()
                .respond_json(200, json!({"success": true, "message": "Utilisateur désactivé"})),
            RecordingPage::accepting(),
        );

        let dispatcher = h.dispatcher.clone();
        let task = tokio::spawn(async move { dispatcher.toggle_user_active(42).await });

        tokio::time::sleep(Duration::from_millis(999)).await;
        let banners = h.feedback.active();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].message, "✅ Utilisateur désactivé");
        assert_eq!(banners[0].severity, Severity::Success);
        assert_eq!(h.page.reloads(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(h.page.reloads(), 1);

        let report = task.await.unwrap();
        assert!(report.is_success());
        let calls = h.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "/admin/toggle_user_active/42");
        assert!(calls[0].form.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_false_is_one_failure_banner_and_no_reload() {
        let h = harness(
            FakeTransport::new().respond_json(200, json!({"success": false})),
            RecordingPage::accepting(),
        );

        let report = h.dispatcher.approve_group(5).await;
        assert_eq!(report, DispatchReport::Rejected { detail: None });

        let banners = h.feedback.active();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].message, "❌ Erreur lors de l'approbation");
        assert_eq!(banners[0].severity, Severity::Danger);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(h.page.reloads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_2xx_uses_server_detail_when_present() {
        let h = harness(
            FakeTransport::new()
                .respond_json(403, json!({"success": true, "detail": "Accès refusé"})),
            RecordingPage::accepting(),
        );

        let report = h.dispatcher.delete_content(9).await;
        assert_eq!(
            report,
            DispatchReport::Rejected {
                detail: Some("Accès refusé".to_string())
            }
        );
        assert_eq!(h.feedback.active()[0].message, "❌ Accès refusé");
        assert_eq!(h.page.reloads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_is_connection_error() {
        let h = harness(FakeTransport::new().fail("dns"), RecordingPage::accepting());

        let report = h.dispatcher.verify_user(3).await;
        assert_eq!(report, DispatchReport::Unreachable);
        let banners = h.feedback.active();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].message, "❌ Erreur de connexion");
        assert_eq!(h.page.reloads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_payload_is_never_success() {
        let h = harness(
            FakeTransport::new().respond_raw(200, "<html>OK</html>"),
            RecordingPage::accepting(),
        );

        let report = h.dispatcher.reject_pro_upgrade(8).await;
        assert_eq!(report, DispatchReport::Malformed);
        assert_eq!(h.feedback.active()[0].message, "❌ Erreur lors du rejet");
        assert_eq!(h.page.reloads(), 0);
    }
}

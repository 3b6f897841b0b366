use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::actions::{AfterSuccess, FormKind};
use crate::api::{ActionOutcome, ApiError, ApiTransport};
use crate::feedback::FeedbackSurface;
use crate::form::FormPayload;
use crate::page::Page;

#[derive(Debug)]
struct TriggerState {
    label: String,
    disabled: bool,
    restores: u64,
}

/// The submit button of a form: a label and a disabled flag.
///
/// Disabled exactly while an `InFlightGuard` is alive, which is what keeps a
/// form to one request at a time.
#[derive(Debug, Clone)]
pub struct SubmitTrigger {
    state: Arc<Mutex<TriggerState>>,
}

impl SubmitTrigger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TriggerState {
                label: label.into(),
                disabled: false,
                restores: 0,
            })),
        }
    }

    pub fn label(&self) -> String {
        self.state.lock().label.clone()
    }

    pub fn is_disabled(&self) -> bool {
        self.state.lock().disabled
    }

    /// How many times a guard has given the trigger back
    pub fn restore_count(&self) -> u64 {
        self.state.lock().restores
    }

    /// Disable and relabel. `None` while another submission holds the trigger.
    pub fn acquire(&self, loading_label: &str) -> Option<InFlightGuard> {
        let mut state = self.state.lock();
        if state.disabled {
            return None;
        }
        state.disabled = true;
        let original_label = std::mem::replace(&mut state.label, loading_label.to_string());

        Some(InFlightGuard {
            trigger: self.clone(),
            original_label,
        })
    }
}

/// Restores label and enabled state on drop, whichever path the request took.
#[derive(Debug)]
pub struct InFlightGuard {
    trigger: SubmitTrigger,
    original_label: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut state = self.trigger.state.lock();
        state.label = std::mem::take(&mut self.original_label);
        state.disabled = false;
        state.restores += 1;
    }
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// A request from this form is already in flight; nothing was sent
    Busy,
    Succeeded { message: String },
    Rejected { detail: Option<String> },
    Malformed,
    Unreachable,
}

impl SubmitReport {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitReport::Succeeded { .. })
    }
}

/// Intercepted form: holds the field values and the trigger, posts them as multipart.
pub struct FormController {
    kind: FormKind,
    transport: Arc<dyn ApiTransport>,
    page: Arc<dyn Page>,
    feedback: FeedbackSurface,
    reload_delay: Duration,
    fields: Mutex<FormPayload>,
    trigger: SubmitTrigger,
}

impl FormController {
    pub fn new(
        kind: FormKind,
        transport: Arc<dyn ApiTransport>,
        page: Arc<dyn Page>,
        feedback: FeedbackSurface,
        reload_delay: Duration,
    ) -> Self {
        Self {
            kind,
            transport,
            page,
            feedback,
            reload_delay,
            fields: Mutex::new(FormPayload::new()),
            trigger: SubmitTrigger::new("Envoyer"),
        }
    }

    pub fn with_trigger(mut self, trigger: SubmitTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn trigger(&self) -> &SubmitTrigger {
        &self.trigger
    }

    /// Snapshot of the current field values
    pub fn fields(&self) -> FormPayload {
        self.fields.lock().clone()
    }

    pub fn edit<R>(&self, f: impl FnOnce(&mut FormPayload) -> R) -> R {
        f(&mut self.fields.lock())
    }

    pub fn reset(&self) {
        self.fields.lock().reset();
    }

    pub async fn submit(&self) -> SubmitReport {
        let (report, reload) = {
            let Some(_guard) = self.trigger.acquire(self.kind.loading_label()) else {
                tracing::debug!("{} already in flight", self.kind.endpoint());
                return SubmitReport::Busy;
            };

            let payload = self.fields();
            self.send(&payload).await
        };

        // The trigger is back before the refresh, as soon as the request settled.
        if reload {
            tokio::time::sleep(self.reload_delay).await;
            self.page.reload();
        }

        report
    }

    async fn send(&self, payload: &FormPayload) -> (SubmitReport, bool) {
        let endpoint = self.kind.endpoint();

        let outcome = match self.transport.post_form(endpoint, payload).await {
            Ok(raw) => ActionOutcome::parse(&raw),
            Err(e) => Err(ApiError::from(e)),
        };

        match outcome {
            Ok(ActionOutcome::Success { message }) => {
                tracing::info!("{} accepted: {}", endpoint, message);
                self.feedback.success(format!("✅ {}", message));
                let reload = self.apply_success();
                (SubmitReport::Succeeded { message }, reload)
            }
            Ok(ActionOutcome::Failure { detail }) => {
                tracing::warn!("{} refused: {:?}", endpoint, detail);
                let text = detail.as_deref().unwrap_or(self.kind.failure_message());
                self.feedback.danger(format!("❌ {}", text));
                (SubmitReport::Rejected { detail }, false)
            }
            Err(ApiError::Malformed { status, reason }) => {
                tracing::warn!(
                    "{} answered HTTP {} with a malformed body: {}",
                    endpoint,
                    status,
                    reason
                );
                self.feedback.danger(format!("❌ {}", self.kind.failure_message()));
                (SubmitReport::Malformed, false)
            }
            Err(ApiError::Transport(e)) => {
                tracing::warn!("{} failed: {}", endpoint, e);
                self.feedback.danger(format!("❌ {}", self.kind.connection_error()));
                (SubmitReport::Unreachable, false)
            }
        }
    }

    /// Returns whether a refresh should follow
    fn apply_success(&self) -> bool {
        match self.kind.after_success() {
            AfterSuccess::CloseDialogAndReset(dialog) => {
                self.page.close_dialog(dialog);
                self.reset();
                false
            }
            AfterSuccess::CloseDialogAndReload(dialog) => {
                self.page.close_dialog(dialog);
                true
            }
            AfterSuccess::Reload => true,
            AfterSuccess::ResetInPlace => {
                self.reset();
                false
            }
        }
    }
}

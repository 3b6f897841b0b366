//! Admin back-office: moderation actions, admin forms, live stats, bulk selection.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::actions::FormKind;
use crate::api::{ApiTransport, DashboardStats};
use crate::config::ClientConfig;
use crate::dispatcher::ActionDispatcher;
use crate::feedback::FeedbackSurface;
use crate::page::{Dialog, Page};
use crate::selection::BulkSelection;
use crate::stats::StatsPoller;
use crate::submission::{FormController, SubmitReport, SubmitTrigger};

/// Hidden input carrying the warned user's id
pub const WARNING_USER_FIELD: &str = "user_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningDetails {
    pub reason: String,
    /// `minor` unless stated otherwise
    pub warning_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpload {
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub access_type: Option<String>,
    pub class_level: Option<String>,
    pub subject: Option<String>,
    pub file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationDraft {
    pub title: String,
    pub content: String,
    pub target_audience: Option<String>,
}

pub struct AdminPanel {
    transport: Arc<dyn ApiTransport>,
    page: Arc<dyn Page>,
    dispatcher: ActionDispatcher,
    warning_form: FormController,
    upload_form: FormController,
    publication_form: FormController,
    warning_user_name: Mutex<Option<String>>,
    selection: BulkSelection,
    poller: Option<StatsPoller>,
    stats_interval: Duration,
}

impl AdminPanel {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn ApiTransport>,
        page: Arc<dyn Page>,
        feedback: FeedbackSurface,
    ) -> Self {
        let form = |kind: FormKind, label: &str| {
            FormController::new(
                kind,
                transport.clone(),
                page.clone(),
                feedback.clone(),
                config.form_reload_delay(),
            )
            .with_trigger(SubmitTrigger::new(label))
        };

        Self {
            dispatcher: ActionDispatcher::new(
                transport.clone(),
                page.clone(),
                feedback.clone(),
                config.reload_delay(),
            ),
            warning_form: form(FormKind::IssueWarning, "Envoyer l'avertissement"),
            upload_form: form(FormKind::UploadContent, "Uploader"),
            publication_form: form(FormKind::CreatePublication, "Publier"),
            warning_user_name: Mutex::new(None),
            selection: BulkSelection::new(),
            poller: None,
            stats_interval: config.stats_interval(),
            transport,
            page,
        }
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn warning_form(&self) -> &FormController {
        &self.warning_form
    }

    pub fn upload_form(&self) -> &FormController {
        &self.upload_form
    }

    pub fn publication_form(&self) -> &FormController {
        &self.publication_form
    }

    /// Prepare the warning dialog for one user and open it
    pub fn issue_warning(&self, user_id: u64, user_name: &str) {
        self.warning_form
            .edit(|f| f.set_text(WARNING_USER_FIELD, user_id.to_string()));
        *self.warning_user_name.lock() = Some(user_name.to_string());
        self.page.open_dialog(Dialog::Warning);
    }

    /// Name shown in the warning dialog
    pub fn warning_user_name(&self) -> Option<String> {
        self.warning_user_name.lock().clone()
    }

    /// Fill the visible warning fields and submit. The target user comes from `issue_warning`.
    pub async fn submit_warning(&self, details: WarningDetails) -> SubmitReport {
        self.warning_form.edit(|f| {
            f.set_text("reason", details.reason);
            f.set_text(
                "warning_type",
                details.warning_type.unwrap_or_else(|| "minor".to_string()),
            );
        });
        self.warning_form.submit().await
    }

    pub async fn upload_content(&self, upload: ContentUpload) -> Result<SubmitReport> {
        let mut payload = crate::form::FormPayload::new()
            .text("title", upload.title)
            .text("content_type", upload.content_type)
            .text("access_type", upload.access_type.unwrap_or_else(|| "free".to_string()));
        for (name, value) in [
            ("description", upload.description),
            ("class_level", upload.class_level),
            ("subject", upload.subject),
        ] {
            if let Some(value) = value {
                payload.push_text(name, value);
            }
        }
        payload.attach_path("file", &upload.file)?;

        self.upload_form.edit(|f| *f = payload);
        Ok(self.upload_form.submit().await)
    }

    pub async fn create_publication(&self, draft: PublicationDraft) -> SubmitReport {
        self.publication_form.edit(|f| {
            f.set_text("title", draft.title);
            f.set_text("content", draft.content);
            f.set_text(
                "target_audience",
                draft.target_audience.unwrap_or_else(|| "all".to_string()),
            );
        });
        self.publication_form.submit().await
    }

    /// Page load. Starts stats polling when the admin-panel marker is present.
    pub fn open(&mut self, panel_present: bool) -> bool {
        if !panel_present || self.poller.is_some() {
            return false;
        }
        self.poller = Some(StatsPoller::start(self.transport.clone(), self.stats_interval));
        true
    }

    /// Page unload. Returns true only for the call that actually stopped polling.
    pub fn close(&mut self) -> bool {
        match self.poller.take() {
            Some(mut poller) => poller.stop(),
            None => false,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(StatsPoller::is_running)
    }

    pub fn stats(&self) -> Option<DashboardStats> {
        self.poller.as_ref().and_then(StatsPoller::latest)
    }

    pub fn stats_updates(&self) -> Option<watch::Receiver<Option<DashboardStats>>> {
        self.poller.as_ref().map(StatsPoller::subscribe)
    }

    pub fn selection(&self) -> &BulkSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut BulkSelection {
        &mut self.selection
    }
}

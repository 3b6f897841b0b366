use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use eduadmin_core::connectivity::ConnectivityMonitor;
use eduadmin_core::table::Table;
use eduadmin_core::{
    ActionDispatcher, AdminPanel, ApiTransport, ClientConfig, DispatchReport, FeedbackSurface,
    HttpTransport, Page, ProfileView, ResourceAction, SubmitReport,
};

/// Process exit status of one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failed,
    Declined,
}

impl Status {
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Failed => 1,
            Status::Declined => 2,
        }
    }
}

impl From<&DispatchReport> for Status {
    fn from(report: &DispatchReport) -> Self {
        match report {
            DispatchReport::Succeeded { .. } => Status::Ok,
            DispatchReport::Declined => Status::Declined,
            _ => Status::Failed,
        }
    }
}

impl From<&SubmitReport> for Status {
    fn from(report: &SubmitReport) -> Self {
        if report.is_success() {
            Status::Ok
        } else {
            Status::Failed
        }
    }
}

/// Everything one CLI invocation talks to.
pub struct Session {
    config: ClientConfig,
    transport: Arc<dyn ApiTransport>,
    page: Arc<dyn Page>,
    feedback: FeedbackSurface,
    connectivity: ConnectivityMonitor,
}

impl Session {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn ApiTransport>,
        page: Arc<dyn Page>,
    ) -> Self {
        let feedback = FeedbackSurface::new(config.notification_lifetime());
        Self {
            connectivity: ConnectivityMonitor::new(feedback.clone()),
            config,
            transport,
            page,
            feedback,
        }
    }

    /// Session against the configured server over HTTP
    pub fn connect(config: ClientConfig, page: Arc<dyn Page>) -> Result<Self> {
        let transport = HttpTransport::new(&config)
            .with_context(|| format!("Failed to set up client for {}", config.base_url()))?;
        Ok(Self::new(config, Arc::new(transport), page))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn ApiTransport> {
        self.transport.clone()
    }

    pub fn feedback(&self) -> &FeedbackSurface {
        &self.feedback
    }

    pub fn admin(&self) -> AdminPanel {
        AdminPanel::new(
            &self.config,
            self.transport.clone(),
            self.page.clone(),
            self.feedback.clone(),
        )
    }

    pub fn profile(&self) -> ProfileView {
        ProfileView::new(
            &self.config,
            self.transport.clone(),
            self.page.clone(),
            self.feedback.clone(),
        )
    }

    pub async fn dispatch(&mut self, action: ResourceAction, target: u64) -> Status {
        let dispatcher = ActionDispatcher::new(
            self.transport.clone(),
            self.page.clone(),
            self.feedback.clone(),
            self.config.reload_delay(),
        );
        let report = dispatcher.dispatch(action, target).await;
        if report != DispatchReport::Declined {
            self.observe(report == DispatchReport::Unreachable);
        }
        Status::from(&report)
    }

    /// Record a finished form submission
    pub fn submitted(&mut self, report: &SubmitReport) -> Status {
        if *report != SubmitReport::Busy {
            self.observe(*report == SubmitReport::Unreachable);
        }
        Status::from(report)
    }

    /// Feed the connectivity monitor with whether the last request got an answer
    pub fn observe(&mut self, unreachable: bool) {
        self.connectivity.report(!unreachable);
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }
}

/// A table dump: JSON array of rows, the first one being the header.
pub fn load_table(path: &Path) -> Result<Table> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read table file: {}", path.display()))?;
    let rows: Vec<Vec<String>> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse table file: {}", path.display()))?;

    let mut rows = rows.into_iter();
    let mut table = Table::new(rows.next().unwrap_or_default());
    for row in rows {
        table.push_row(row);
    }
    Ok(table)
}

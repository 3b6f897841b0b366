// Transient banner notifications shared by every action and form handler.
// Banners stack independently: no deduplication, no priority replacement, no cap.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::time::Instant;
use uuid::Uuid;

pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(5);

/// Banner severity, named after the alert classes the platform styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Danger,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Severity::Success),
            "danger" => Ok(Severity::Danger),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// A single banner
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub lifetime: Duration,
    pub shown_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.lifetime
    }
}

#[derive(Debug, Clone)]
pub enum FeedbackEvent {
    Shown(Notification),
    Removed(Uuid),
}

struct Inner {
    banners: Mutex<Vec<Notification>>,
    events: broadcast::Sender<FeedbackEvent>,
    lifetime: Duration,
}

/// Cloneable handle to the banner stack.
///
/// Each `show` schedules its own removal on the tokio runtime. Without a
/// runtime the banner stays until `prune_expired` or `dismiss`.
#[derive(Clone)]
pub struct FeedbackSurface {
    inner: Arc<Inner>,
}

impl Default for FeedbackSurface {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME)
    }
}

impl FeedbackSurface {
    pub fn new(lifetime: Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                banners: Mutex::new(Vec::new()),
                events,
                lifetime,
            }),
        }
    }

    /// Render a banner and return its id
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            lifetime: self.inner.lifetime,
            shown_at: Instant::now(),
        };
        let id = notification.id;

        tracing::debug!("banner [{}] {}", severity.as_str(), notification.message);
        self.inner.banners.lock().push(notification.clone());
        let _ = self.inner.events.send(FeedbackEvent::Shown(notification));

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let surface = self.clone();
            let lifetime = self.inner.lifetime;
            handle.spawn(async move {
                tokio::time::sleep(lifetime).await;
                surface.dismiss(id);
            });
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Success)
    }

    pub fn danger(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Danger)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(message, Severity::Info)
    }

    /// Remove a banner (the close button). Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut banners = self.inner.banners.lock();
            let before = banners.len();
            banners.retain(|n| n.id != id);
            banners.len() != before
        };

        if removed {
            let _ = self.inner.events.send(FeedbackEvent::Removed(id));
        }
        removed
    }

    /// Drop every banner whose lifetime has elapsed
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<Uuid> = self
            .inner
            .banners
            .lock()
            .iter()
            .filter(|n| n.is_expired(now))
            .map(|n| n.id)
            .collect();

        expired.into_iter().filter(|id| self.dismiss(*id)).count()
    }

    /// Banners currently on screen, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.inner.banners.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.banners.lock().is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedbackEvent> {
        self.inner.events.subscribe()
    }
}

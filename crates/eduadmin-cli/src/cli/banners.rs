use std::io::Write;

use eduadmin_core::{FeedbackEvent, FeedbackSurface, Notification, Severity};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// One line per banner, tagged with its severity.
pub fn render_banner(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Success => "OK",
        Severity::Danger => "ERREUR",
        Severity::Warning => "ATTENTION",
        Severity::Info => "INFO",
    };
    format!("[{}] {}", tag, notification.message)
}

/// Prints banners as they are shown. Removals are not printed: a terminal line
/// cannot be taken back.
pub struct BannerPrinter {
    events: broadcast::Receiver<FeedbackEvent>,
}

impl BannerPrinter {
    pub fn new(feedback: &FeedbackSurface) -> Self {
        Self {
            events: feedback.subscribe(),
        }
    }

    /// Write every banner shown since the last drain. Returns how many were written.
    pub fn drain(&mut self, out: &mut impl Write) -> usize {
        let mut written = 0;
        loop {
            match self.events.try_recv() {
                Ok(FeedbackEvent::Shown(notification)) => {
                    if writeln!(out, "{}", render_banner(&notification)).is_ok() {
                        written += 1;
                    }
                }
                Ok(FeedbackEvent::Removed(_)) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("{} banners dropped before display", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        let _ = out.flush();
        written
    }

    /// Print banners on `out` as soon as they are shown, until `BannerTask::finish`.
    pub fn spawn<W>(mut self, mut out: W) -> BannerTask
    where
        W: Write + Send + 'static,
    {
        let (stop, mut stopped) = oneshot::channel();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    event = self.events.recv() => match event {
                        Ok(FeedbackEvent::Shown(notification)) => {
                            let _ = writeln!(out, "{}", render_banner(&notification));
                            let _ = out.flush();
                        }
                        Ok(FeedbackEvent::Removed(_)) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("{} banners dropped before display", skipped);
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = &mut stopped => {
                        self.drain(&mut out);
                        break;
                    }
                }
            }
        });

        BannerTask { handle, stop }
    }
}

/// Background banner printer started by `BannerPrinter::spawn`.
pub struct BannerTask {
    handle: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl BannerTask {
    /// Print whatever is still pending, then stop.
    pub async fn finish(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            tracing::warn!("banner printer failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_prints_shown_banners_in_order() {
        let feedback = FeedbackSurface::default();
        let mut printer = BannerPrinter::new(&feedback);

        let first = feedback.success("✅ Groupe approuvé");
        feedback.danger("❌ Erreur de connexion");
        feedback.dismiss(first);

        let mut out = Vec::new();
        assert_eq!(printer.drain(&mut out), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[OK] ✅ Groupe approuvé\n[ERREUR] ❌ Erreur de connexion\n"
        );

        let mut again = Vec::new();
        assert_eq!(printer.drain(&mut again), 0);
        assert!(again.is_empty());
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(std::sync::Arc<parking_lot::Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_spawned_printer_flushes_pending_banners_on_finish() {
        let feedback = FeedbackSurface::default();
        let out = SharedBuffer::default();
        let task = BannerPrinter::new(&feedback).spawn(out.clone());

        feedback.danger("❌ Erreur lors de l'upload");
        task.finish().await;

        let printed = String::from_utf8(out.0.lock().clone()).unwrap();
        assert_eq!(printed, "[ERREUR] ❌ Erreur lors de l'upload\n");
    }

    #[test]
    fn test_banners_before_subscription_are_not_replayed() {
        let feedback = FeedbackSurface::default();
        feedback.warning("⚠️ Vous êtes hors ligne");

        let mut printer = BannerPrinter::new(&feedback);
        let mut out = Vec::new();
        assert_eq!(printer.drain(&mut out), 0);
    }
}

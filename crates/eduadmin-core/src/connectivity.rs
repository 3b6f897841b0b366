use crate::feedback::FeedbackSurface;

/// Reports online/offline transitions as banners. Repeated reports of the same state are silent.
pub struct ConnectivityMonitor {
    online: bool,
    feedback: FeedbackSurface,
}

impl ConnectivityMonitor {
    pub fn new(feedback: FeedbackSurface) -> Self {
        Self {
            online: true,
            feedback,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Returns true when the state changed
    pub fn report(&mut self, online: bool) -> bool {
        if online == self.online {
            return false;
        }
        self.online = online;

        if online {
            tracing::info!("connection restored");
            self.feedback.success("✅ Connexion rétablie");
        } else {
            tracing::warn!("connection lost");
            self.feedback.warning("⚠️ Vous êtes hors ligne");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Severity;

    #[test]
    fn test_only_transitions_are_reported() {
        let feedback = FeedbackSurface::default();
        let mut monitor = ConnectivityMonitor::new(feedback.clone());

        assert!(!monitor.report(true));
        assert!(monitor.report(false));
        assert!(!monitor.report(false));
        assert!(!monitor.is_online());
        assert!(monitor.report(true));

        let banners = feedback.active();
        assert_eq!(banners.len(), 2);
        assert_eq!(banners[0].message, "⚠️ Vous êtes hors ligne");
        assert_eq!(banners[0].severity, Severity::Warning);
        assert_eq!(banners[1].message, "✅ Connexion rétablie");
    }
}

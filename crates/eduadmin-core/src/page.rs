//! The view the handlers act on. A browser page, a terminal, or a test double.

/// Modal dialogs owned by admin forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialog {
    Warning,
    UploadContent,
    CreatePublication,
}

impl Dialog {
    /// Element id of the dialog in the server-rendered markup
    pub fn element_id(&self) -> &'static str {
        match self {
            Dialog::Warning => "warningModal",
            Dialog::UploadContent => "uploadContentModal",
            Dialog::CreatePublication => "createPublicationModal",
        }
    }
}

pub trait Page: Send + Sync {
    /// Synchronous yes/no prompt. `false` aborts the action before any request.
    fn confirm(&self, prompt: &str) -> bool;

    /// Refresh the whole view from the server
    fn reload(&self);

    fn open_dialog(&self, dialog: Dialog);

    fn close_dialog(&self, dialog: Dialog);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum PageEvent {
        Confirm(String),
        Reload,
        Open(Dialog),
        Close(Dialog),
    }

    /// Records every interaction; answers prompts with a fixed choice.
    pub(crate) struct RecordingPage {
        accept: bool,
        events: Mutex<Vec<PageEvent>>,
    }

    impl RecordingPage {
        pub fn accepting() -> Self {
            Self {
                accept: true,
                events: Mutex::new(Vec::new()),
            }
        }

        pub fn declining() -> Self {
            Self {
                accept: false,
                events: Mutex::new(Vec::new()),
            }
        }

        pub fn events(&self) -> Vec<PageEvent> {
            self.events.lock().clone()
        }

        pub fn reloads(&self) -> usize {
            self.events
                .lock()
                .iter()
                .filter(|e| **e == PageEvent::Reload)
                .count()
        }
    }

    impl Page for RecordingPage {
        fn confirm(&self, prompt: &str) -> bool {
            self.events.lock().push(PageEvent::Confirm(prompt.to_string()));
            self.accept
        }

        fn reload(&self) {
            self.events.lock().push(PageEvent::Reload);
        }

        fn open_dialog(&self, dialog: Dialog) {
            self.events.lock().push(PageEvent::Open(dialog));
        }

        fn close_dialog(&self, dialog: Dialog) {
            self.events.lock().push(PageEvent::Close(dialog));
        }
    }
}

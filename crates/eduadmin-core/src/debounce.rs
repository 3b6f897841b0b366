use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Trailing-edge debounce: `f` runs with the latest value once `wait` passes
/// without a newer call. Dropping the debouncer flushes a pending value.
///
/// The timer lives on the tokio runtime current at construction. Built outside
/// a runtime, every call runs `f` immediately.
pub struct Debouncer<T> {
    mode: Mode<T>,
}

enum Mode<T> {
    Timed(mpsc::UnboundedSender<T>),
    Immediate(Mutex<Box<dyn FnMut(T) + Send>>),
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, mut f: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let Ok(handle) = Handle::try_current() else {
            tracing::debug!("no tokio runtime, debounce disabled");
            return Self {
                mode: Mode::Immediate(Mutex::new(Box::new(f))),
            };
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        handle.spawn(async move {
            while let Some(mut value) = rx.recv().await {
                loop {
                    match tokio::time::timeout(wait, rx.recv()).await {
                        Ok(Some(newer)) => value = newer,
                        Ok(None) => {
                            f(value);
                            return;
                        }
                        Err(_) => {
                            f(value);
                            break;
                        }
                    }
                }
            }
        });

        Self {
            mode: Mode::Timed(tx),
        }
    }

    pub fn call(&self, value: T) {
        match &self.mode {
            Mode::Timed(tx) => {
                let _ = tx.send(value);
            }
            Mode::Immediate(f) => {
                let mut f = f.lock();
                (*f)(value)
            }
        }
    }
}

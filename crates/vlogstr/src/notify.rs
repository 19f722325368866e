//! User-facing notifications
//!
//! Services never surface raw transport errors to the caller of a mutation.
//! They convert outcomes into toasts at the mutation boundary and hand them
//! to a `Notifier`. The UI binds a real toast system; headless runs log, and
//! tests collect.

use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Visual weight of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// One user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Notifier that logs toasts through `tracing`, for headless use.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Default => {
                info!(title = %toast.title, description = %toast.description, "toast")
            }
            ToastVariant::Destructive => {
                warn!(title = %toast.title, description = %toast.description, "toast")
            }
        }
    }
}

/// Notifier that records every toast, used by tests.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl CollectingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_notifier_records_in_order() {
        let notifier = CollectingNotifier::new();
        notifier.notify(Toast::success("Success!", "Your vlog has been published"));
        notifier.notify(Toast::destructive("Delete Failed", "relay rejected event"));

        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].variant, ToastVariant::Default);
        assert_eq!(toasts[1].variant, ToastVariant::Destructive);
        assert_eq!(toasts[1].title, "Delete Failed");
    }
}

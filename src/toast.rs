//! Notifications
//!
//! `Notifier` is the fire-and-forget boundary the store reports through.
//! `ToastManager` is the in-process implementation: it keeps the visible
//! toasts, gives each an auto-dismiss deadline and tells observers about
//! every change.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

/// User-visible message sink
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    /// Creation time (unix millis)
    pub created_at: i64,
    /// Auto-dismiss time (unix millis); `None` stays until removed
    pub dismiss_at: Option<i64>,
}

type Observer = Rc<dyn Fn(&[Toast])>;

pub struct ToastManager {
    toasts: RefCell<Vec<Toast>>,
    next_id: Cell<u64>,
    observers: RefCell<Vec<(u64, Observer)>>,
    next_observer: Cell<u64>,
    toast_ms: u64,
    error_toast_ms: u64,
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl ToastManager {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            toasts: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            observers: RefCell::new(Vec::new()),
            next_observer: Cell::new(1),
            toast_ms: config.toast_ms,
            error_toast_ms: config.error_toast_ms,
        }
    }

    fn default_duration(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Error => self.error_toast_ms,
            _ => self.toast_ms,
        }
    }

    /// Show a toast. `duration_ms` of `None` uses the severity's default;
    /// `Some(0)` never auto-dismisses.
    pub fn add(&self, message: &str, severity: Severity, duration_ms: Option<u64>) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let now = chrono::Utc::now().timestamp_millis();
        let duration = duration_ms.unwrap_or_else(|| self.default_duration(severity));
        self.toasts.borrow_mut().push(Toast {
            id,
            message: message.to_string(),
            severity,
            created_at: now,
            dismiss_at: (duration > 0).then(|| now + duration as i64),
        });
        self.emit();
        id
    }

    pub fn success(&self, message: &str) -> u64 {
        self.add(message, Severity::Success, None)
    }

    pub fn error(&self, message: &str) -> u64 {
        self.add(message, Severity::Error, None)
    }

    pub fn info(&self, message: &str) -> u64 {
        self.add(message, Severity::Info, None)
    }

    pub fn warning(&self, message: &str) -> u64 {
        self.add(message, Severity::Warning, None)
    }

    pub fn remove(&self, id: u64) {
        let removed = {
            let mut toasts = self.toasts.borrow_mut();
            let before = toasts.len();
            toasts.retain(|t| t.id != id);
            toasts.len() != before
        };
        if removed {
            self.emit();
        }
    }

    pub fn clear(&self) {
        let had_any = !self.toasts.borrow().is_empty();
        self.toasts.borrow_mut().clear();
        if had_any {
            self.emit();
        }
    }

    /// Drop toasts whose deadline is at or before `now` (unix millis).
    /// Returns how many were dismissed.
    pub fn expire(&self, now: i64) -> usize {
        let expired = {
            let mut toasts = self.toasts.borrow_mut();
            let before = toasts.len();
            toasts.retain(|t| !matches!(t.dismiss_at, Some(at) if at <= now));
            before - toasts.len()
        };
        if expired > 0 {
            self.emit();
        }
        expired
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    /// Register an observer; it is called with the full toast list on
    /// every change. Returns a handle for `unsubscribe`.
    pub fn subscribe(&self, observer: impl Fn(&[Toast]) + 'static) -> u64 {
        let id = self.next_observer.get();
        self.next_observer.set(id + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.observers.borrow_mut().retain(|(handle, _)| *handle != id);
    }

    fn emit(&self) {
        // Observers may add or remove toasts themselves; call them unborrowed
        let observers: Vec<Observer> = self.observers.borrow().iter().map(|(_, o)| o.clone()).collect();
        let snapshot = self.toasts();
        for observer in observers {
            observer(&snapshot);
        }
    }
}

impl Notifier for ToastManager {
    fn notify(&self, message: &str, severity: Severity) {
        self.add(message, severity, None);
    }
}

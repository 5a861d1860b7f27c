//! Toast notifications.
//!
//! Toasts stack from the top edge: each new toast sits below the ones still
//! visible. Auto-dismissal is scheduled by the reducer as a delayed
//! `DismissToast` action.

use crate::config::NotificationConfig;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
}

/// Toast identifier, unique per stack.
pub type ToastId = u64;

/// One visible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Identifier used to dismiss it.
    pub id: ToastId,
    /// Text.
    pub message: String,
    /// Severity.
    pub severity: Severity,
    /// Distance from the top edge, in pixels.
    pub offset: u32,
}

/// Visible toasts in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToastStack {
    next_id: ToastId,
    visible: Vec<Toast>,
    last: Option<Toast>,
}

impl ToastStack {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast below the visible ones and return its id.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        config: &NotificationConfig,
    ) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;

        let stacked = u32::try_from(self.visible.len()).unwrap_or(u32::MAX);
        let toast = Toast {
            id,
            message: message.into(),
            severity,
            offset: config
                .base_offset
                .saturating_add(stacked.saturating_mul(config.spacing)),
        };
        self.last = Some(toast.clone());
        self.visible.push(toast);
        id
    }

    /// Remove a toast and close the gap it leaves.
    ///
    /// Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: ToastId, config: &NotificationConfig) -> bool {
        let before = self.visible.len();
        self.visible.retain(|toast| toast.id != id);
        if self.visible.len() == before {
            return false;
        }

        let mut offset = config.base_offset;
        for toast in &mut self.visible {
            toast.offset = offset;
            offset = offset.saturating_add(config.spacing);
        }
        true
    }

    /// Visible toasts, top first.
    #[must_use]
    pub fn visible(&self) -> &[Toast] {
        &self.visible
    }

    /// Most recently shown toast, visible or not; read by the live region.
    #[must_use]
    pub const fn last(&self) -> Option<&Toast> {
        self.last.as_ref()
    }

    /// Number of visible toasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether nothing is showing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

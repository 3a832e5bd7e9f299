use crate::config::{TOAST_DISPLAY_MS, TOAST_EXIT_MS, TOAST_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Leaving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub phase: ToastPhase,
}

/// What a toast timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastAction {
    BeginExit,
    Dismiss,
}

/// Timers armed for every new toast, as (delay after creation in ms, action).
pub const fn toast_schedule() -> [(u32, ToastAction); 2] {
    [
        (TOAST_DISPLAY_MS, ToastAction::BeginExit),
        (TOAST_DISPLAY_MS + TOAST_EXIT_MS, ToastAction::Dismiss),
    ]
}

/// Independent, self-dismissing status messages. Each toast runs its own
/// [`toast_schedule`]; at most [`TOAST_LIMIT`] are kept, oldest evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastStack {
    items: Vec<Toast>,
    next_id: u64,
    limit: usize,
    unscheduled: Vec<ToastId>,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::with_limit(TOAST_LIMIT)
    }
}

impl ToastStack {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            limit: limit.max(1),
            unscheduled: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) -> ToastId {
        while self.items.len() >= self.limit {
            let evicted = self.items.remove(0);
            self.unscheduled.retain(|id| *id != evicted.id);
        }
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.items.push(Toast {
            id,
            message: message.into(),
            phase: ToastPhase::Visible,
        });
        self.unscheduled.push(id);
        id
    }

    pub fn visible(&self) -> &[Toast] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Toasts whose dismissal timers have not been armed yet.
    pub fn take_unscheduled(&mut self) -> Vec<ToastId> {
        std::mem::take(&mut self.unscheduled)
    }

    pub fn begin_exit(&mut self, id: ToastId) {
        if let Some(toast) = self.items.iter_mut().find(|t| t.id == id) {
            toast.phase = ToastPhase::Leaving;
        }
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    /// Run one scheduled timer. Timers for evicted toasts are no-ops.
    pub fn fire(&mut self, id: ToastId, action: ToastAction) {
        match action {
            ToastAction::BeginExit => self.begin_exit(id),
            ToastAction::Dismiss => {
                self.dismiss(id);
            }
        }
    }
}

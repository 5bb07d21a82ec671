use crate::constants::TOAST_AUTO_CLOSE;
use alloy_primitives::TxHash;
use leptos::prelude::*;
use tracing::trace;

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub content: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[derive(Clone)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub notice: Notice,
    /// Rendered as an explorer link once the transaction is submitted.
    pub tx: Option<TxHash>,
    /// Rendered as a "Try again" button.
    pub retry: Option<Callback<()>>,
}

/// The toasts currently on screen, oldest first.
#[derive(Clone, Default)]
pub struct ToastQueue {
    next_id: ToastId,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, notice: Notice) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            notice,
            tx: None,
            retry: None,
        });
        id
    }

    #[cfg(test)]
    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|toast| toast.id == id)
    }

    fn get_mut(&mut self, id: ToastId) -> Option<&mut Toast> {
        self.toasts.iter_mut().find(|toast| toast.id == id)
    }

    pub fn set_tx(&mut self, id: ToastId, hash: TxHash) -> bool {
        self.get_mut(id).map(|toast| toast.tx = Some(hash)).is_some()
    }

    /// Moves a toast to `kind`, replacing its text when `notice` is given.
    pub fn finish(&mut self, id: ToastId, kind: ToastKind, notice: Option<Notice>) -> bool {
        self.get_mut(id)
            .map(|toast| {
                toast.kind = kind;
                if let Some(notice) = notice {
                    toast.notice = notice;
                }
            })
            .is_some()
    }

    pub fn set_retry(&mut self, id: ToastId, retry: Callback<()>) -> bool {
        self.get_mut(id).map(|toast| toast.retry = Some(retry)).is_some()
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Shared handle to the toast queue, provided as context.
#[derive(Copy, Clone)]
pub struct Toaster {
    queue: RwSignal<ToastQueue>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.with(|queue| queue.iter().cloned().collect())
    }

    pub fn loading(&self, notice: Notice) -> ToastId {
        trace!("toast: {}", notice.title);
        self.queue
            .try_update(|queue| queue.push(ToastKind::Loading, notice))
            .unwrap_or_default()
    }

    pub fn attach_tx(&self, id: ToastId, hash: TxHash) {
        self.queue.update(|queue| {
            queue.set_tx(id, hash);
        });
    }

    pub fn success(&self, id: ToastId) {
        self.queue.update(|queue| {
            queue.finish(id, ToastKind::Success, None);
        });
        self.close_later(id);
    }

    /// Turns the toast `id` into an error, or shows a new error toast when there is none yet.
    pub fn error(&self, id: Option<ToastId>, notice: Notice) -> ToastId {
        let id = self
            .queue
            .try_update(|queue| match id {
                Some(id) if queue.finish(id, ToastKind::Error, Some(notice.clone())) => id,
                _ => queue.push(ToastKind::Error, notice),
            })
            .unwrap_or_default();
        self.close_later(id);
        id
    }

    /// Like [`Toaster::error`], but the toast stays until the user retries or closes it.
    pub fn error_with_retry(&self, id: ToastId, notice: Notice, retry: Callback<()>) {
        self.queue.update(|queue| {
            if !queue.finish(id, ToastKind::Error, Some(notice.clone())) {
                let new_id = queue.push(ToastKind::Error, notice);
                queue.set_retry(new_id, retry);
            } else {
                queue.set_retry(id, retry);
            }
        });
    }

    pub fn dismiss(&self, id: ToastId) {
        self.queue.try_update(|queue| queue.dismiss(id));
    }

    fn close_later(&self, id: ToastId) {
        let queue = self.queue;
        set_timeout(
            move || {
                queue.try_update(|queue| queue.dismiss(id));
            },
            TOAST_AUTO_CLOSE,
        );
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(title: &str) -> Notice {
        Notice::new(title, format!("{title} content"))
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastKind::Loading, notice("first"));
        let second = queue.push(ToastKind::Error, notice("second"));

        assert_ne!(first, second);
        let titles: Vec<_> = queue.iter().map(|toast| toast.notice.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);

        queue.dismiss(first);
        let third = queue.push(ToastKind::Loading, notice("third"));
        assert!(third > second);
    }

    #[test]
    fn transaction_lifecycle() {
        let mut queue = ToastQueue::default();
        let id = queue.push(ToastKind::Loading, notice("Get free token!"));

        assert!(queue.set_tx(id, TxHash::repeat_byte(0x42)));
        assert_eq!(queue.get(id).unwrap().tx, Some(TxHash::repeat_byte(0x42)));

        assert!(queue.finish(id, ToastKind::Success, None));
        let toast = queue.get(id).unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.notice.title, "Get free token!");
    }

    #[test]
    fn failure_replaces_text() {
        let mut queue = ToastQueue::default();
        let id = queue.push(ToastKind::Loading, notice("Approve token to wrap"));

        queue.finish(id, ToastKind::Error, Some(notice("Failed to approve token!")));

        let toast = queue.get(id).unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.notice.title, "Failed to approve token!");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn missing_toasts_are_reported() {
        let mut queue = ToastQueue::default();

        assert!(!queue.set_tx(7, TxHash::ZERO));
        assert!(!queue.finish(7, ToastKind::Success, None));
        assert!(!queue.dismiss(7));
        assert!(queue.is_empty());
    }
}

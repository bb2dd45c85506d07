//! Tokio broadcast channel for "new record captured" notices.

use tokio::sync::broadcast;
use tracing::trace;

use crate::history::RequestRecord;

pub const DEFAULT_NOTIFY_BUFFER: usize = 64;

/// 推送给展示层的通知
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureNotice {
    NewRecord(RequestRecord),
}

/// 通知总线，发送是 best-effort：没有监听者不算错误
#[derive(Clone)]
pub struct CaptureNotifier {
    sender: broadcast::Sender<CaptureNotice>,
}

impl Default for CaptureNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_BUFFER)
    }
}

impl CaptureNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a notice to all subscribers (best effort).
    pub fn publish(&self, notice: CaptureNotice) {
        if self.sender.send(notice).is_err() {
            trace!("no listener for capture notice");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureNotice> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryStore, NewRecord};

    #[test]
    fn test_publish_without_listener_is_ignored() {
        let notifier = CaptureNotifier::default();
        let store = HistoryStore::new();
        let record = store.push(NewRecord::new("GET", "http://x/"));
        notifier.publish(CaptureNotice::NewRecord(record));
        assert_eq!(notifier.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_notice() {
        let notifier = CaptureNotifier::new(4);
        let mut rx = notifier.subscribe();

        let store = HistoryStore::new();
        let record = store.push(NewRecord::new("GET", "http://x/"));
        notifier.publish(CaptureNotice::NewRecord(record.clone()));

        assert_eq!(rx.recv().await.unwrap(), CaptureNotice::NewRecord(record));
    }
}

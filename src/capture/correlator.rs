use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::capture::events::{BodyPhaseEvent, CaptureEvent, HeaderPhaseEvent};
use crate::capture::notify::{CaptureNotice, CaptureNotifier};
use crate::history::HistoryStore;

/// 单个事件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// header 事件生成了新记录
    Inserted(u64),
    /// body 事件对上了一条待补全的记录
    Attached(u64),
    /// 类型不在捕获范围内，或 body 事件没有请求体
    Ignored,
    /// body 事件没有找到待补全的记录，直接丢弃
    Unmatched,
}

/// 把 header 阶段和 body 阶段两条独立的事件流合并到历史记录中
///
/// 两个阶段之间没有共享的关联 id，只能按 (url, method, body 未设置) 匹配，
/// 多条候选时取最新的一条。没对上的 body 片段属于可接受的数据丢失。
pub struct CaptureCorrelator {
    store: Arc<HistoryStore>,
    notifier: CaptureNotifier,
}

impl CaptureCorrelator {
    pub fn new(store: Arc<HistoryStore>, notifier: CaptureNotifier) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<HistoryStore> {
        &self.store
    }

    pub fn notifier(&self) -> &CaptureNotifier {
        &self.notifier
    }

    /// header 阶段：过滤类型，插入 body 为空的记录并通知展示层
    pub fn on_headers(&self, event: HeaderPhaseEvent) -> CaptureOutcome {
        if !event.resource_type.is_captured() {
            return CaptureOutcome::Ignored;
        }

        let record = self.store.push(event.to_record());
        let id = record.id();
        self.notifier.publish(CaptureNotice::NewRecord(record));
        CaptureOutcome::Inserted(id)
    }

    /// body 阶段：找到最新的待补全记录并写入 body
    pub fn on_body(&self, event: BodyPhaseEvent) -> CaptureOutcome {
        let Some(payload) = event.body else {
            return CaptureOutcome::Ignored;
        };

        match self.store.attach_to_open(&event.url, &event.method, &payload) {
            Some(id) => CaptureOutcome::Attached(id),
            None => {
                debug!(url = %event.url, method = %event.method, "no open record for body fragment");
                CaptureOutcome::Unmatched
            }
        }
    }

    pub fn handle(&self, event: CaptureEvent) -> CaptureOutcome {
        match event {
            CaptureEvent::Headers(headers) => self.on_headers(headers),
            CaptureEvent::Body(body) => self.on_body(body),
        }
    }

    /// 作为队列消费者运行，直到发送端全部关闭
    pub async fn consume(&self, mut events: mpsc::Receiver<CaptureEvent>) -> CaptureStats {
        let mut stats = CaptureStats::default();
        while let Some(event) = events.recv().await {
            stats.record(self.handle(event));
        }
        debug!(?stats, "capture stream closed");
        stats
    }
}

/// 事件处理统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub inserted: usize,
    pub attached: usize,
    pub ignored: usize,
    pub unmatched: usize,
}

impl CaptureStats {
    pub fn record(&mut self, outcome: CaptureOutcome) {
        match outcome {
            CaptureOutcome::Inserted(_) => self.inserted += 1,
            CaptureOutcome::Attached(_) => self.attached += 1,
            CaptureOutcome::Ignored => self.ignored += 1,
            CaptureOutcome::Unmatched => self.unmatched += 1,
        }
    }
}

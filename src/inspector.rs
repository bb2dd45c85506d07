//! Entry point for the presentation layer: one object owning the history,
//! the capture correlator, the executor and the active search.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

use crate::Result;
use crate::capture::{CaptureCorrelator, CaptureNotice, CaptureNotifier};
use crate::config::InspectorConfig;
use crate::decode::{self, DecodeResult};
use crate::editor::RequestEditor;
use crate::history::{HistoryStore, RequestRecord};
use crate::http::{ReqwestTransport, RequestSpec, ResponseEnvelope, Transport};
use crate::runner::RequestExecutor;
use crate::search::{BufferId, Direction, MatchPosition, MatchSet, SearchSession};

pub struct Inspector {
    store: Arc<HistoryStore>,
    correlator: CaptureCorrelator,
    executor: RequestExecutor,
    search: Mutex<SearchSession>,
}

impl Inspector {
    /// 按配置创建，使用 reqwest 传输
    pub fn from_config(config: &InspectorConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::with_user_agent(config.executor.user_agent.as_deref())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &InspectorConfig, transport: Arc<dyn Transport>) -> Self {
        let store = Arc::new(HistoryStore::with_capacity(config.history.capacity));
        let notifier = CaptureNotifier::new(config.capture.notify_buffer);

        Self {
            correlator: CaptureCorrelator::new(store.clone(), notifier),
            store,
            executor: RequestExecutor::new(transport),
            search: Mutex::new(SearchSession::new()),
        }
    }

    pub fn store(&self) -> &Arc<HistoryStore> {
        &self.store
    }

    /// 捕获事件的入口
    pub fn correlator(&self) -> &CaptureCorrelator {
        &self.correlator
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// 订阅 "新记录" 通知
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureNotice> {
        self.correlator.notifier().subscribe()
    }

    /// 最新的记录在前
    pub fn history_snapshot(&self) -> Vec<RequestRecord> {
        self.store.snapshot()
    }

    pub fn clear_history(&self) {
        self.store.clear();
    }

    pub async fn execute_request(&self, spec: RequestSpec) -> ResponseEnvelope {
        self.executor.execute(spec).await
    }

    /// 校验编辑器中的请求后发送
    ///
    /// URL 为空或无效时返回 Err，不会调用执行器；传输失败体现在返回的
    /// ResponseEnvelope 中。
    pub async fn send_editor(&self, editor: &RequestEditor) -> Result<ResponseEnvelope> {
        let spec = editor.to_spec()?;
        let envelope = self.executor.execute(spec).await;

        // 响应缓冲区内容已替换
        self.session().buffer_changed(BufferId::Response);
        Ok(envelope)
    }

    pub fn decode_selection(&self, text: &str) -> DecodeResult {
        decode::decode(text)
    }

    /// 在指定缓冲区上执行新的搜索，替换之前的搜索
    pub fn search(&self, query: &str, buffer: BufferId, text: &str) -> MatchSet {
        self.session().search(buffer, query, text).clone()
    }

    pub fn navigate_match(&self, direction: Direction) -> MatchPosition {
        self.session().navigate(direction)
    }

    /// 缓冲区内容被编辑后调用，使该缓冲区上的搜索失效
    pub fn buffer_changed(&self, buffer: BufferId) {
        self.session().buffer_changed(buffer);
    }

    pub fn current_matches(&self) -> MatchSet {
        self.session().matches().clone()
    }

    fn session(&self) -> MutexGuard<'_, SearchSession> {
        self.search.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

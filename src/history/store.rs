use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, trace};

use super::model::{BodyPayload, NewRecord, RequestRecord};

/// 默认保留的记录数
pub const DEFAULT_CAPACITY: usize = 50;
/// 每个 epoch 的第一个 id
pub const INITIAL_ID: u64 = 1;

struct HistoryInner {
    /// 头部是最新的记录
    records: VecDeque<RequestRecord>,
    next_id: u64,
}

impl HistoryInner {
    fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            next_id: INITIAL_ID,
        }
    }

    /// 最新的、(url, method) 匹配且尚无 body 的记录
    fn open_record_mut(&mut self, url: &str, method: &str) -> Option<&mut RequestRecord> {
        self.records
            .iter_mut()
            .find(|r| r.is_open() && r.url == url && r.method.eq_ignore_ascii_case(method))
    }
}

/// 有界的捕获历史（环形缓冲）
///
/// 新记录插在头部，超过容量时淘汰尾部最旧的一条。
/// id 在一个 epoch 内单调递增且唯一；`clear` 会把计数器重置为 [`INITIAL_ID`]，
/// 所以跨 epoch 的 id 可能重复。
///
/// # Concurrency
/// 所有变更（insert / attach / clear）持有写锁，彼此串行；
/// `snapshot` 持读锁，永远看不到更新到一半的记录。
pub struct HistoryStore {
    capacity: usize,
    inner: RwLock<HistoryInner>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 容量至少为 1
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: RwLock::new(HistoryInner::new(capacity)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HistoryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HistoryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// 插入记录并返回分配的 id
    pub fn insert(&self, record: NewRecord) -> u64 {
        self.push(record).id()
    }

    /// 插入记录并返回分配好 id / 时间戳后的副本
    pub fn push(&self, record: NewRecord) -> RequestRecord {
        let mut inner = self.write();

        let id = inner.next_id;
        inner.next_id += 1;

        let record = RequestRecord::assign(id, Utc::now(), record);
        inner.records.push_front(record.clone());

        while inner.records.len() > self.capacity {
            if let Some(evicted) = inner.records.pop_back() {
                trace!(id = evicted.id(), url = %evicted.url, "evicted oldest record");
            }
        }

        debug!(id, method = %record.method, url = %record.url, "record inserted");
        record
    }

    /// 查找最近插入的、(url, method) 匹配且 body 仍未设置的记录
    ///
    /// 多条匹配时取最新的一条（最靠近头部）。
    pub fn find_open_record(&self, url: &str, method: &str) -> Option<RequestRecord> {
        self.read()
            .records
            .iter()
            .find(|r| r.is_open() && r.url == url && r.method.eq_ignore_ascii_case(method))
            .cloned()
    }

    /// 给指定记录设置 body
    ///
    /// 记录不存在或已有 body 时不做任何事（先写者胜），返回 false。
    pub fn attach_body(&self, id: u64, payload: &BodyPayload) -> bool {
        let mut inner = self.write();
        match inner.records.iter_mut().find(|r| r.id() == id) {
            Some(record) if record.is_open() => {
                record.body = Some(payload.to_text());
                debug!(id, "body attached");
                true
            }
            Some(_) => {
                trace!(id, "record already has a body, attach ignored");
                false
            }
            None => false,
        }
    }

    /// 在一次写锁内完成 find_open_record + attach_body
    ///
    /// 返回被更新记录的 id；没有匹配时返回 None。
    pub fn attach_to_open(&self, url: &str, method: &str, payload: &BodyPayload) -> Option<u64> {
        let mut inner = self.write();
        let record = inner.open_record_mut(url, method)?;
        record.body = Some(payload.to_text());
        debug!(id = record.id(), url, "body attached");
        Some(record.id())
    }

    pub fn get(&self, id: u64) -> Option<RequestRecord> {
        self.read().records.iter().find(|r| r.id() == id).cloned()
    }

    /// 当前缓冲区内容，最新的在前
    pub fn snapshot(&self) -> Vec<RequestRecord> {
        self.read().records.iter().cloned().collect()
    }

    /// 清空并重置 id 计数器
    pub fn clear(&self) {
        let mut inner = self.write();
        let dropped = inner.records.len();
        inner.records.clear();
        inner.next_id = INITIAL_ID;
        info!(dropped, "history cleared");
    }
}

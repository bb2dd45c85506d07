use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use super::matcher::{Direction, MatchPosition, MatchSet, search};

/// 可搜索的文本缓冲区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BufferId {
    RequestHeaders,
    RequestBody,
    Response,
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferId::RequestHeaders => "request-headers",
            BufferId::RequestBody => "request-body",
            BufferId::Response => "response",
        };
        f.write_str(name)
    }
}

/// 当前活动的搜索
///
/// 同一时间只对一个缓冲区有效；切换缓冲区、清空查询或缓冲区内容变化都会让
/// 旧的 MatchSet 失效。导航总是作用于产生 MatchSet 的那个缓冲区。
#[derive(Debug, Default)]
pub struct SearchSession {
    buffer: Option<BufferId>,
    matches: MatchSet,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_buffer(&self) -> Option<BufferId> {
        self.buffer
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// 在 `buffer` 上执行新的搜索，替换之前的结果
    pub fn search(&mut self, buffer: BufferId, query: &str, text: &str) -> &MatchSet {
        self.matches = search(query, text);
        self.buffer = self.matches.is_computed().then_some(buffer);
        trace!(%buffer, total = self.matches.len(), "search computed");
        &self.matches
    }

    pub fn navigate(&mut self, direction: Direction) -> MatchPosition {
        self.matches.advance(direction)
    }

    /// 缓冲区内容被编辑或替换时调用
    pub fn buffer_changed(&mut self, buffer: BufferId) {
        if self.buffer == Some(buffer) {
            self.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        self.buffer = None;
        self.matches = MatchSet::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_wraps_forward() {
        let mut session = SearchSession::new();
        session.search(BufferId::Response, "aa", "aaa");
        session.navigate(Direction::Forward);
        assert_eq!(session.matches().current_index(), 1);
        assert_eq!(session.navigate(Direction::Forward).current_index, 0);
    }

    #[test]
    fn test_new_search_replaces_previous() {
        let mut session = SearchSession::new();
        session.search(BufferId::Response, "a", "aaaa");
        session.navigate(Direction::Forward);

        let set = session.search(BufferId::RequestHeaders, "x", "x-a: 1\nx-b: 2");
        assert_eq!(set.len(), 2);
        assert_eq!(set.current_index(), 0);
        assert_eq!(session.active_buffer(), Some(BufferId::RequestHeaders));
    }

    #[test]
    fn test_empty_query_clears_session() {
        let mut session = SearchSession::new();
        session.search(BufferId::Response, "a", "abc");
        session.search(BufferId::Response, "", "abc");
        assert_eq!(session.active_buffer(), None);
        assert!(!session.matches().is_computed());
    }

    #[test]
    fn test_buffer_change_invalidates_only_active_buffer() {
        let mut session = SearchSession::new();
        session.search(BufferId::Response, "a", "abc");

        session.buffer_changed(BufferId::RequestBody);
        assert_eq!(session.matches().len(), 1);

        session.buffer_changed(BufferId::Response);
        assert!(!session.matches().is_computed());
        assert_eq!(session.navigate(Direction::Forward).total_count, 0);
    }
}

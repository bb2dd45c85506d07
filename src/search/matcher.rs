use serde::Serialize;
use std::fmt;

/// 一次命中在原文中的字节区间 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextMatch {
    pub start: usize,
    pub end: usize,
}

impl TextMatch {
    /// 命中起点所在的行号（从 1 开始）
    pub fn line_in(&self, text: &str) -> usize {
        let upto = self.start.min(text.len());
        text.as_bytes()[..upto].iter().filter(|&&b| b == b'\n').count() + 1
    }

    /// 取出命中的原文片段
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

/// 导航方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// `navigate` 的返回值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPosition {
    pub current_index: usize,
    pub total_count: usize,
}

/// 搜索状态，用于计数显示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// 查询为空，没有执行搜索
    Idle,
    /// 执行了搜索但没有命中
    NoMatches,
    /// 当前位于第 `current` 个命中（从 1 开始）
    At { current: usize, total: usize },
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Idle => Ok(()),
            SearchStatus::NoMatches => write!(f, "[ 0 ]"),
            SearchStatus::At { current, total } => write!(f, "[ {} / {} ]", current, total),
        }
    }
}

/// 一次搜索的全部命中和当前游标
///
/// `query` 为 None 表示没有执行搜索，与"搜索了但零命中"区分开。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    query: Option<String>,
    matches: Vec<TextMatch>,
    current: usize,
}

impl MatchSet {
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn matches(&self) -> &[TextMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// 是否执行过搜索
    pub fn is_computed(&self) -> bool {
        self.query.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&TextMatch> {
        self.matches.get(self.current)
    }

    pub fn position(&self) -> MatchPosition {
        MatchPosition {
            current_index: self.current,
            total_count: self.matches.len(),
        }
    }

    pub fn status(&self) -> SearchStatus {
        match (&self.query, self.matches.len()) {
            (None, _) => SearchStatus::Idle,
            (Some(_), 0) => SearchStatus::NoMatches,
            (Some(_), total) => SearchStatus::At {
                current: self.current + 1,
                total,
            },
        }
    }

    /// 移动游标，两端循环；没有命中时不做任何事
    pub fn advance(&mut self, direction: Direction) -> MatchPosition {
        let total = self.matches.len();
        if total == 0 {
            return self.position();
        }

        self.current = match direction {
            Direction::Forward if self.current + 1 >= total => 0,
            Direction::Forward => self.current + 1,
            Direction::Backward if self.current == 0 => total - 1,
            Direction::Backward => self.current - 1,
        };
        self.position()
    }
}

/// 小写化文本，同时记录每个小写字节对应的原文字节偏移
fn fold_case(text: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());

    for (offset, ch) in text.char_indices() {
        for lower in ch.to_lowercase() {
            folded.push(lower);
            origin.resize(folded.len(), offset);
        }
    }
    (folded, origin)
}

/// 大小写不敏感地查找 `query` 在 `text` 中的所有出现位置
///
/// 每次命中后从命中起点的下一个字符继续，因此会报告重叠命中：
/// 在 `"aaa"` 中查找 `"aa"` 得到偏移 0 和 1。偏移是原文中的字节偏移。
pub fn search(query: &str, text: &str) -> MatchSet {
    if query.is_empty() {
        return MatchSet::default();
    }

    let (needle, _) = fold_case(query);
    let (haystack, origin) = fold_case(text);

    let mut matches = Vec::new();
    let mut cursor = 0;
    while let Some(found) = haystack[cursor..].find(&needle) {
        let start = cursor + found;
        let end = start + needle.len();

        // 命中可能落在某个字符小写展开的中间，区间扩展到完整的原文字符
        let last = origin[end - 1];
        let last_len = text[last..].chars().next().map_or(0, char::len_utf8);
        matches.push(TextMatch {
            start: origin[start],
            end: last + last_len,
        });

        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        cursor = start + step;
    }

    MatchSet {
        query: Some(query.to_string()),
        matches,
        current: 0,
    }
}

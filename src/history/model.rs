use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::Headers;

/// 触发请求的活动类型（仅用作捕获过滤）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// 顶层导航
    MainFrame,
    /// 子 frame 导航
    SubFrame,
    /// 程序化请求 (XHR / fetch)
    #[serde(rename = "xmlhttprequest")]
    XmlHttpRequest,
    Other,
    /// 图片、脚本、样式等不捕获的类型
    #[serde(other)]
    Untracked,
}

impl ResourceType {
    pub fn is_captured(&self) -> bool {
        !matches!(self, ResourceType::Untracked)
    }
}

/// 历史记录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// 插入时分配，之后不再改变
    id: u64,

    /// 捕获时间
    timestamp: DateTime<Utc>,

    /// 大写的 HTTP 方法
    pub method: String,

    pub url: String,

    pub headers: Headers,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// 请求体片段对上之前为 None
    pub body: Option<String>,

    /// 来源上下文标识，仅供展示
    pub tab_id: i64,
}

impl RequestRecord {
    pub(crate) fn assign(id: u64, timestamp: DateTime<Utc>, record: NewRecord) -> Self {
        Self {
            id,
            timestamp,
            method: record.method.to_ascii_uppercase(),
            url: record.url,
            headers: record.headers,
            resource_type: record.resource_type,
            body: record.body,
            tab_id: record.tab_id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// 还在等待请求体片段
    pub fn is_open(&self) -> bool {
        self.body.is_none()
    }
}

/// 尚未分配 id / 时间戳的记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub resource_type: ResourceType,
    pub body: Option<String>,
    pub tab_id: i64,
}

impl NewRecord {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            headers: Headers::new(),
            resource_type: ResourceType::Other,
            body: None,
            tab_id: -1,
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }

    pub fn with_tab(mut self, tab_id: i64) -> Self {
        self.tab_id = tab_id;
        self
    }
}

/// 原始请求体的一段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawFragment {
    Bytes(Vec<u8>),
    /// 上传文件，只有路径，不贡献文本
    File(String),
}

/// 请求体片段：原始字节块或结构化表单字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPayload {
    Raw(Vec<RawFragment>),
    FormData(serde_json::Map<String, serde_json::Value>),
}

impl BodyPayload {
    /// 转成文本：字节块逐段按 UTF-8 解码后拼接；表单字段序列化为 JSON
    pub fn to_text(&self) -> String {
        match self {
            BodyPayload::Raw(fragments) => fragments
                .iter()
                .map(|fragment| match fragment {
                    RawFragment::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                    RawFragment::File(_) => String::new(),
                })
                .collect(),
            BodyPayload::FormData(fields) => serde_json::Value::Object(fields.clone()).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_type_from_str() {
        let parsed: ResourceType = serde_json::from_str("\"xmlhttprequest\"").unwrap();
        assert_eq!(parsed, ResourceType::XmlHttpRequest);
        let parsed: ResourceType = serde_json::from_str("\"main_frame\"").unwrap();
        assert_eq!(parsed, ResourceType::MainFrame);
        let parsed: ResourceType = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(parsed, ResourceType::Untracked);
        assert!(!parsed.is_captured());
        assert!(ResourceType::Other.is_captured());
    }

    #[test]
    fn test_raw_fragments_join_in_order() {
        let payload = BodyPayload::Raw(vec![
            RawFragment::Bytes(b"a=1".to_vec()),
            RawFragment::File("/tmp/upload.bin".to_string()),
            RawFragment::Bytes(b"&b=2".to_vec()),
        ]);
        assert_eq!(payload.to_text(), "a=1&b=2");
    }

    #[test]
    fn test_form_fields_serialize_as_json() {
        let fields = json!({"user": ["alice"], "tags": ["a", "b"]});
        let payload = BodyPayload::FormData(fields.as_object().unwrap().clone());
        assert_eq!(payload.to_text(), r#"{"user":["alice"],"tags":["a","b"]}"#);
    }

    #[test]
    fn test_assign_uppercases_method() {
        let record = RequestRecord::assign(7, Utc::now(), NewRecord::new("post", "http://x/"));
        assert_eq!(record.id(), 7);
        assert_eq!(record.method, "POST");
        assert!(record.is_open());
    }
}

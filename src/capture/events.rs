use serde::{Deserialize, Serialize};

use crate::history::{BodyPayload, NewRecord, ResourceType};
use crate::http::Headers;
use crate::{ReprobeError, Result};

/// 展平前的单个请求头
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// "headers 即将发送" 事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderPhaseEvent {
    pub method: String,
    pub url: String,
    #[serde(default, alias = "requestHeaders")]
    pub header_list: Vec<HeaderEntry>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default = "default_context_id", alias = "tabId")]
    pub context_id: i64,
}

fn default_context_id() -> i64 {
    -1
}

impl HeaderPhaseEvent {
    /// 展平 header 列表，同名 header 后者覆盖前者
    pub fn flatten_headers(&self) -> Headers {
        self.header_list
            .iter()
            .map(|h| (h.name.as_str(), h.value.as_str()))
            .collect()
    }

    pub fn to_record(&self) -> NewRecord {
        NewRecord::new(&self.method, &self.url)
            .with_headers(self.flatten_headers())
            .with_type(self.resource_type)
            .with_tab(self.context_id)
    }
}

/// "body 即将发送" 事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPhaseEvent {
    pub url: String,
    pub method: String,
    /// 没有请求体时为 None，事件被忽略
    #[serde(default, alias = "requestBody")]
    pub body: Option<BodyPayload>,
}

/// 来自网络观察方的事件流，可以按 JSON 行喂入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CaptureEvent {
    Headers(HeaderPhaseEvent),
    Body(BodyPhaseEvent),
}

impl CaptureEvent {
    /// 解析 JSON Lines 文本，空行和 `#` 开头的行被跳过
    pub fn parse_lines(content: &str) -> Result<Vec<CaptureEvent>> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    ReprobeError::ParseError(format!("line {}: {}", index + 1, e))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RawFragment;

    #[test]
    fn test_flatten_headers_last_wins() {
        let event = HeaderPhaseEvent {
            method: "GET".to_string(),
            url: "http://x/".to_string(),
            header_list: vec![
                HeaderEntry::new("Accept", "a"),
                HeaderEntry::new("Cookie", "k=1"),
                HeaderEntry::new("Accept", "b"),
            ],
            resource_type: ResourceType::MainFrame,
            context_id: 3,
        };

        let headers = event.flatten_headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Accept"), Some("b"));

        let record = event.to_record();
        assert_eq!(record.tab_id, 3);
        assert!(record.body.is_none());
    }

    #[test]
    fn test_parse_lines() {
        let content = r#"
# captured from a browsing session
{"phase":"headers","method":"POST","url":"http://x/login","headerList":[{"name":"Content-Type","value":"application/x-www-form-urlencoded"}],"type":"main_frame","contextId":7}
{"phase":"body","url":"http://x/login","method":"POST","body":{"raw":[{"bytes":[117,61,49]}]}}
{"phase":"headers","method":"GET","url":"http://x/logo.png","type":"image"}
"#;
        let events = CaptureEvent::parse_lines(content).unwrap();
        assert_eq!(events.len(), 3);

        match &events[1] {
            CaptureEvent::Body(body) => {
                assert_eq!(
                    body.body,
                    Some(BodyPayload::Raw(vec![RawFragment::Bytes(b"u=1".to_vec())]))
                );
            }
            other => panic!("unexpected event: {:?}", other),
        }

        match &events[2] {
            CaptureEvent::Headers(headers) => {
                assert_eq!(headers.resource_type, ResourceType::Untracked);
                assert_eq!(headers.context_id, -1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_lines_reports_line_number() {
        let err = CaptureEvent::parse_lines("{\"phase\":\"headers\"}\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}

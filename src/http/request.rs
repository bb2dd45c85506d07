use serde::{Deserialize, Serialize};

use crate::http::types::Headers;

/// 请求头输入：可以是编辑器中的自由文本，也可以是已经结构化的映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderInput {
    /// 自由文本，先尝试按 JSON 对象解析，失败后按 `Name: value` 行解析
    Text(String),
    Map(Headers),
}

impl Default for HeaderInput {
    fn default() -> Self {
        HeaderInput::Map(Headers::new())
    }
}

impl From<Headers> for HeaderInput {
    fn from(headers: Headers) -> Self {
        HeaderInput::Map(headers)
    }
}

impl From<&str> for HeaderInput {
    fn from(text: &str) -> Self {
        HeaderInput::Text(text.to_string())
    }
}

impl From<String> for HeaderInput {
    fn from(text: String) -> Self {
        HeaderInput::Text(text)
    }
}

/// 操作员指定的请求（executeRequest 的输入）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,
    pub url: String,
    pub headers: HeaderInput,
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            headers: HeaderInput::default(),
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: impl Into<HeaderInput>) -> Self {
        self.headers = headers.into();
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_owned());
        self
    }
}

/// 跨域模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Cors,
    SameOrigin,
}

/// 凭据策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialsMode {
    /// 不携带任何 cookie / URL 内嵌的认证信息
    Omit,
    Include,
}

/// 交给传输层的规范化请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
    pub mode: RequestMode,
    pub credentials: CredentialsMode,
}

impl OutboundRequest {
    /// 重放使用的固定策略：允许跨域，省略凭据
    pub fn replay(method: &str, url: &str, headers: Headers, body: Option<String>) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            headers,
            body,
            mode: RequestMode::Cors,
            credentials: CredentialsMode::Omit,
        }
    }
}

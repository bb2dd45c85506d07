use serde::Serialize;
use std::time::Duration;

use crate::http::types::{Headers, StatusClass};

/// 传输层返回的原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// 传输层自己测得的请求耗时（到收到响应头为止，不含读取 body）
    ///
    /// 为 None 时由执行器使用包围整个传输调用的耗时。
    pub fetch_time: Option<Duration>,
}

/// 执行请求的结果（总是返回，不会向调用方抛错）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    /// 失败时为 0
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body: String,
    /// 仅包围传输调用的耗时（毫秒）
    pub time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn new(response: TransportResponse, elapsed: Duration) -> Self {
        Self {
            success: true,
            status: response.status,
            status_text: response.status_text,
            headers: response.headers,
            // 响应体完整物化为文本，非 UTF-8 字节做有损替换
            body: String::from_utf8_lossy(&response.body).into_owned(),
            time: elapsed.as_millis() as u64,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, elapsed: Duration) -> Self {
        let message = message.into();
        Self {
            success: false,
            status: 0,
            status_text: "Error".to_string(),
            headers: Headers::new(),
            body: String::new(),
            time: elapsed.as_millis() as u64,
            error: Some(if message.is_empty() {
                "Unknown error occurred".to_string()
            } else {
                message
            }),
        }
    }

    pub fn status_class(&self) -> Option<StatusClass> {
        self.success.then(|| StatusClass::from_code(self.status))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get_ignore_case("content-type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope_is_zeroed() {
        let envelope = ResponseEnvelope::failure("connection refused", Duration::from_millis(3));
        assert!(!envelope.success);
        assert_eq!(envelope.status, 0);
        assert_eq!(envelope.body, "");
        assert!(envelope.headers.is_empty());
        assert_eq!(envelope.error.as_deref(), Some("connection refused"));
        assert_eq!(envelope.status_class(), None);
    }

    #[test]
    fn test_failure_without_message() {
        let envelope = ResponseEnvelope::failure("", Duration::ZERO);
        assert_eq!(envelope.error.as_deref(), Some("Unknown error occurred"));
    }

    #[test]
    fn test_success_envelope() {
        let response = TransportResponse {
            status: 404,
            status_text: "Not Found".to_string(),
            headers: Headers::new().with("content-type", "text/plain"),
            body: b"nope".to_vec(),
            fetch_time: None,
        };
        let envelope = ResponseEnvelope::new(response, Duration::from_millis(12));
        assert!(envelope.success);
        assert_eq!(envelope.time, 12);
        assert_eq!(envelope.body, "nope");
        assert_eq!(envelope.content_type(), Some("text/plain"));
        assert_eq!(envelope.status_class(), Some(StatusClass::ClientError));
        assert!(envelope.error.is_none());
    }
}

use tracing::debug;

use crate::generator::CurlGenerator;
use crate::history::RequestRecord;
use crate::http::{HeaderInput, RequestSpec};
use crate::runner::headers::parse_header_lines;
use crate::{ReprobeError, Result};

/// 可编辑的请求：从历史记录载入，修改后发送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEditor {
    pub method: String,
    pub url: String,
    /// `Name: value` 形式，一行一个
    pub headers_text: String,
    pub body: String,
}

impl Default for RequestEditor {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            headers_text: String::new(),
            body: String::new(),
        }
    }
}

impl RequestEditor {
    pub fn from_record(record: &RequestRecord) -> Self {
        Self {
            method: record.method.clone(),
            url: record.url.clone(),
            headers_text: record.headers.to_lines(),
            body: record.body.clone().unwrap_or_default(),
        }
    }

    /// 发送前校验 URL
    pub fn validate(&self) -> Result<url::Url> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ReprobeError::EmptyUrl);
        }
        url::Url::parse(url).map_err(|e| ReprobeError::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// 转换为执行器的输入；URL 为空或无法解析时拒绝
    pub fn to_spec(&self) -> Result<RequestSpec> {
        self.validate()?;

        let headers = parse_header_lines(&self.headers_text);
        debug!(method = %self.method, url = %self.url.trim(), headers = headers.len(), "editor request ready");

        Ok(RequestSpec {
            method: self.method.trim().to_ascii_uppercase(),
            url: self.url.trim().to_string(),
            headers: HeaderInput::Map(headers),
            body: Some(self.body.clone()),
        })
    }

    /// 把 body 格式化为两空格缩进的 JSON
    ///
    /// 不是合法 JSON 时返回错误，body 保持不变；空 body 直接返回。
    pub fn prettify_body(&mut self) -> Result<()> {
        let body = self.body.trim();
        if body.is_empty() {
            return Ok(());
        }

        let value: serde_json::Value = serde_json::from_str(body)?;
        self.body = serde_json::to_string_pretty(&value)?;
        Ok(())
    }

    pub fn to_curl(&self) -> String {
        let headers = parse_header_lines(&self.headers_text);
        CurlGenerator::generate(&self.method, &self.url, &headers, Some(&self.body))
    }
}

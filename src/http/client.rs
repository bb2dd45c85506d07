use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Instant;
use tracing::debug;

use crate::http::request::{CredentialsMode, OutboundRequest};
use crate::http::response::TransportResponse;
use crate::http::types::Headers;
use crate::{ReprobeError, Result};

/// 不透明的 "执行 HTTP 请求" 能力
///
/// 每次调用只拥有自己的请求/响应值，实现必须允许并发调用。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: OutboundRequest) -> Result<TransportResponse>;
}

/// 基于 reqwest 的传输实现
///
/// 不启用 cookie store，也不设置超时：超时/失败由底层连接自行上报。
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_user_agent(None)
    }

    pub fn with_user_agent(user_agent: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    fn build_headers(headers: &Headers) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ReprobeError::InvalidHeader(name.to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ReprobeError::InvalidHeader(format!("{}: {}", name, value)))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    fn target_url(request: &OutboundRequest) -> Result<url::Url> {
        let mut url = url::Url::parse(&request.url)?;
        if request.credentials == CredentialsMode::Omit && url.has_authority() {
            // reqwest 会把 URL 中的 user:pass 转成 Basic 认证，这里去掉
            let _ = url.set_username("");
            let _ = url.set_password(None);
        }
        Ok(url)
    }

    /// 同名响应头按 fetch 的方式用 ", " 合并
    fn flatten_headers(map: &HeaderMap) -> Headers {
        let mut headers = Headers::new();
        for (name, value) in map {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            let merged = match headers.get(name.as_str()) {
                Some(previous) => format!("{}, {}", previous, value),
                None => value,
            };
            headers.insert(name.as_str(), merged);
        }
        headers
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: OutboundRequest) -> Result<TransportResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| ReprobeError::ParseError(format!("Invalid HTTP method: {}", request.method)))?;
        let url = Self::target_url(&request)?;
        let headers = Self::build_headers(&request.headers)?;

        debug!(method = %method, url = %url, mode = ?request.mode, "performing request");

        let mut req = self.inner.request(method, url).headers(headers);
        if let Some(body) = request.body {
            req = req.body(body);
        }

        // 只计时到收到响应头，读取 body 不计入
        let start = Instant::now();
        let response = req.send().await?;
        let fetch_time = start.elapsed();

        let status = response.status();
        let headers = Self::flatten_headers(response.headers());
        let body = response.bytes().await?.to_vec();

        // reqwest 不暴露服务器返回的 reason phrase，这里用标准短语；非标准状态码为空
        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            fetch_time: Some(fetch_time),
        })
    }
}

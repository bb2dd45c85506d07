use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::Result;
use crate::http::{OutboundRequest, ReqwestTransport, RequestSpec, ResponseEnvelope, Transport};
use crate::runner::headers::normalize_headers;

/// 重放请求的执行器
///
/// 可以被并发调用；每次调用只持有自己的请求和响应，新的发送不会取消之前的。
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// 使用默认的 reqwest 传输
    pub fn with_reqwest(user_agent: Option<&str>) -> Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::with_user_agent(
            user_agent,
        )?)))
    }

    /// GET / HEAD 请求不携带请求体
    fn allows_body(method: &str) -> bool {
        !matches!(method, "GET" | "HEAD")
    }

    /// 规范化 RequestSpec 得到出站请求
    pub fn prepare(spec: RequestSpec) -> OutboundRequest {
        let method = match spec.method.trim() {
            "" => "GET".to_string(),
            m => m.to_ascii_uppercase(),
        };
        let headers = normalize_headers(&spec.headers);
        let body = spec
            .body
            .filter(|b| !b.is_empty() && Self::allows_body(&method));

        OutboundRequest::replay(&method, spec.url.trim(), headers, body)
    }

    /// 执行请求，总是返回 ResponseEnvelope
    ///
    /// 传输或解析失败转换为 `success=false`；耗时只统计传输调用本身，
    /// 传输层报告了自己的 fetch 耗时时以它为准。
    pub async fn execute(&self, spec: RequestSpec) -> ResponseEnvelope {
        let outbound = Self::prepare(spec);
        let method = outbound.method.clone();
        let url = outbound.url.clone();

        debug!(%method, %url, "executing request");

        let start = Instant::now();
        let result = self.transport.perform(outbound).await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let elapsed = response.fetch_time.unwrap_or(elapsed);
                debug!(
                    %method,
                    %url,
                    status = response.status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "request finished"
                );
                ResponseEnvelope::new(response, elapsed)
            }
            Err(e) => {
                warn!(%method, %url, "request failed: {}", e);
                ResponseEnvelope::failure(e.to_string(), elapsed)
            }
        }
    }
}

use crate::http::{ResponseEnvelope, StatusClass};
use colored::*;

const ERROR_RULE: &str = "// ─────────────────────────────────────────";

pub enum ResponseFormat {
    /// 状态行 + 耗时 + body 大小
    Summary,
    /// 类似抓包工具的原始 HTTP 文本
    Raw,
}

pub struct ResponseFormatter {
    format: ResponseFormat,
    color: bool,
    show_timing: bool,
}

impl ResponseFormatter {
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            color: true,
            show_timing: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_timing(mut self, show_timing: bool) -> Self {
        self.show_timing = show_timing;
        self
    }

    pub fn format(&self, envelope: &ResponseEnvelope) -> String {
        if !envelope.success {
            let banner = Self::error_banner(envelope.error.as_deref().unwrap_or_default());
            return if self.color {
                banner.red().to_string()
            } else {
                banner
            };
        }

        match self.format {
            ResponseFormat::Summary => self.format_summary(envelope),
            ResponseFormat::Raw => self.format_raw(envelope),
        }
    }

    fn format_summary(&self, envelope: &ResponseEnvelope) -> String {
        let mut output = vec![self.status_line(envelope)];
        if self.show_timing {
            output.push(self.timing_line(envelope));
        }
        if !envelope.body.is_empty() {
            output.push(format!("Body: {} bytes", envelope.body.len()));
        }
        output.join("\n")
    }

    fn format_raw(&self, envelope: &ResponseEnvelope) -> String {
        let raw = Self::raw_http(envelope);

        // 只给第一行（状态行）上色，其余保持原样
        let mut output = if self.color {
            let (first, rest) = raw.split_once('\n').unwrap_or((raw.as_str(), ""));
            format!("{}\n{}", self.paint(first, envelope.status_class()), rest)
        } else {
            raw
        };
        if self.show_timing {
            output.push('\n');
            output.push_str(&self.timing_line(envelope));
        }
        output
    }

    fn status_line(&self, envelope: &ResponseEnvelope) -> String {
        let line = format!("{} {}", envelope.status, envelope.status_text);
        if self.color {
            self.paint(&line, envelope.status_class())
        } else {
            line
        }
    }

    fn timing_line(&self, envelope: &ResponseEnvelope) -> String {
        let timing = format!("Time: {}ms", envelope.time);
        if self.color {
            timing.cyan().to_string()
        } else {
            timing
        }
    }

    fn paint(&self, text: &str, class: Option<StatusClass>) -> String {
        match class {
            Some(StatusClass::Success) => text.green().bold().to_string(),
            Some(StatusClass::Redirect) => text.cyan().bold().to_string(),
            Some(StatusClass::ClientError) => text.yellow().bold().to_string(),
            Some(StatusClass::ServerError) | None => text.red().bold().to_string(),
        }
    }

    /// 原始 HTTP 文本：状态行、header 行、空行、body
    ///
    /// 没有颜色，适合作为搜索和解码的缓冲区内容。
    pub fn raw_http(envelope: &ResponseEnvelope) -> String {
        let mut output = format!("HTTP/1.1 {} {}\n", envelope.status, envelope.status_text);
        for (key, value) in &envelope.headers {
            output.push_str(&format!("{}: {}\n", key, value));
        }
        output.push('\n');
        output.push_str(&Self::format_body(envelope));
        output
    }

    /// JSON 响应（按 content-type 或内容判断）格式化为两空格缩进，其他原样返回
    pub fn format_body(envelope: &ResponseEnvelope) -> String {
        let body = &envelope.body;
        let trimmed = body.trim();
        let declared_json = envelope
            .content_type()
            .is_some_and(|ct| ct.contains("application/json"));

        if declared_json || trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(pretty) = Self::try_format_json(body) {
                return pretty;
            }
        }
        body.clone()
    }

    pub fn error_banner(message: &str) -> String {
        format!("// ERROR\n{}\n\n{}", ERROR_RULE, message)
    }

    /// 尝试将 body 格式化为漂亮的 JSON
    /// 如果不是有效的 JSON，返回错误
    fn try_format_json(body: &str) -> serde_json::Result<String> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        serde_json::to_string_pretty(&value)
    }
}

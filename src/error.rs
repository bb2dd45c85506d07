use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReprobeError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("未指定 URL")]
    EmptyUrl,

    #[error("无效的 URL: {0}")]
    InvalidUrl(String),

    #[error("无效的 Header: {0}")]
    InvalidHeader(String),

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl ReprobeError {
    /// 操作员输入校验失败（发送前拒绝），区别于传输失败
    pub fn is_validation(&self) -> bool {
        matches!(self, ReprobeError::EmptyUrl | ReprobeError::InvalidUrl(_))
    }
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for ReprobeError {
    fn from(err: anyhow::Error) -> Self {
        ReprobeError::Other(err.to_string())
    }
}

impl From<toml::de::Error> for ReprobeError {
    fn from(err: toml::de::Error) -> Self {
        ReprobeError::ConfigError(err.to_string())
    }
}

/// Result type for reprobe crate
pub type Result<T> = std::result::Result<T, ReprobeError>;

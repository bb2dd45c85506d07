use serde::{Deserialize, Serialize};
use std::fmt;

pub const JWT_FAILURE: &str = "Decoding Failed: Invalid JWT structure";
pub const URL_FAILURE: &str = "Decoding Failed: Invalid URL encoding";
pub const BASE64_FAILURE: &str = "Decoding Failed: Invalid Base64";
pub const UNKNOWN_FORMAT: &str = "Could not detect encoding format";

/// 识别出的编码类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodeKind {
    #[serde(rename = "JWT")]
    Jwt,
    #[serde(rename = "JWT-corrupt")]
    JwtCorrupt,
    #[serde(rename = "URL-encoded")]
    UrlEncoded,
    #[serde(rename = "URL-encoded-corrupt")]
    UrlEncodedCorrupt,
    Hex,
    Base64,
    #[serde(rename = "Base64-JSON")]
    Base64Json,
    #[serde(rename = "Base64-binary")]
    Base64Binary,
    #[serde(rename = "Base64-corrupt")]
    Base64Corrupt,
    Unknown,
}

impl DecodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeKind::Jwt => "JWT",
            DecodeKind::JwtCorrupt => "JWT-corrupt",
            DecodeKind::UrlEncoded => "URL-encoded",
            DecodeKind::UrlEncodedCorrupt => "URL-encoded-corrupt",
            DecodeKind::Hex => "Hex",
            DecodeKind::Base64 => "Base64",
            DecodeKind::Base64Json => "Base64-JSON",
            DecodeKind::Base64Binary => "Base64-binary",
            DecodeKind::Base64Corrupt => "Base64-corrupt",
            DecodeKind::Unknown => "Unknown",
        }
    }

    /// 识别出了格式但解码失败
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            DecodeKind::JwtCorrupt | DecodeKind::UrlEncodedCorrupt | DecodeKind::Base64Corrupt
        )
    }

    /// 得到了可用的解码结果
    pub fn is_decoded(&self) -> bool {
        !self.is_corrupt() && *self != DecodeKind::Unknown
    }
}

impl fmt::Display for DecodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResult {
    pub kind: DecodeKind,
    pub output: String,
}

impl DecodeResult {
    pub fn new(kind: DecodeKind, output: impl Into<String>) -> Self {
        Self {
            kind,
            output: output.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(DecodeKind::Unknown, UNKNOWN_FORMAT)
    }
}

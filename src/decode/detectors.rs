//! Format detectors used by the smart decoder.
//!
//! Each detector is a pure function over already-trimmed text. `None` means
//! "not mine, keep going"; `Some` ends the cascade, including the `*-corrupt`
//! results of terminal detectors.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use super::types::{BASE64_FAILURE, DecodeKind, DecodeResult, JWT_FAILURE, URL_FAILURE};

/// 与浏览器 atob 一致：padding 可有可无，允许末尾多余的 bit
///
/// 带 `=` 时总长度必须是 4 的倍数，这一点由 [`has_valid_padding`] 检查。
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// 紧凑 JWT 的 header 总是以 `{"` 开头，编码后就是 `ey`
const JWT_PREFIX: &str = "ey";
const MIN_CANDIDATE_LEN: usize = 4;

static PERCENT_TRIPLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").expect("valid percent regex"));
static HEX_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]+$").expect("valid hex regex"));
static BASE64_ALPHABET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").expect("valid base64 regex"));

pub type DetectFn = fn(&str) -> Option<DecodeResult>;

/// 级联中的一个检测器
pub struct Detector {
    pub name: &'static str,
    pub detect: DetectFn,
}

/// 固定的优先级顺序，第一个命中的结果即最终结果
pub const CASCADE: [Detector; 4] = [
    Detector {
        name: "jwt",
        detect: detect_jwt,
    },
    Detector {
        name: "url-encoded",
        detect: detect_url_encoded,
    },
    Detector {
        name: "hex",
        detect: detect_hex,
    },
    Detector {
        name: "base64",
        detect: detect_base64,
    },
];

/// 可打印 ASCII 或空白（Latin-1 范围内的 \s，包括 NBSP）
fn is_printable(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && bytes
            .iter()
            .all(|&b| matches!(b, 0x20..=0x7E | 0x09..=0x0D | 0xA0))
}

/// UTF-8 有效时按 UTF-8，否则每个字节按 Latin-1 映射为一个字符
fn bytes_to_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    LENIENT_BASE64.decode(text).ok()
}

/// atob 只在总长度是 4 的倍数时接受 `=` 填充
fn has_valid_padding(text: &str) -> bool {
    !text.contains('=') || text.len() % 4 == 0
}

/// JWT 段使用 URL 安全字母表，转换后按标准字母表解码
fn decode_jwt_segment(segment: &str) -> Option<serde_json::Value> {
    let standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = decode_base64(&standard)?;
    serde_json::from_slice(&bytes).ok()
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn detect_jwt(text: &str) -> Option<DecodeResult> {
    if !text.starts_with(JWT_PREFIX) || text.matches('.').count() != 2 {
        return None;
    }

    let mut parts = text.split('.');
    let decoded = parts
        .next()
        .and_then(decode_jwt_segment)
        .zip(parts.next().and_then(decode_jwt_segment));

    Some(match decoded {
        Some((header, payload)) => DecodeResult::new(
            DecodeKind::Jwt,
            format!(
                "// JWT HEADER\n{}\n\n// JWT PAYLOAD\n{}",
                pretty(&header),
                pretty(&payload)
            ),
        ),
        None => DecodeResult::new(DecodeKind::JwtCorrupt, JWT_FAILURE),
    })
}

/// 每个 `%` 后面都必须跟两位十六进制
fn has_valid_escapes(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || (i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit())
    })
}

pub fn detect_url_encoded(text: &str) -> Option<DecodeResult> {
    if !PERCENT_TRIPLET.is_match(text) {
        return None;
    }

    let decoded = has_valid_escapes(text)
        .then(|| percent_decode_str(text).decode_utf8().ok())
        .flatten();

    Some(match decoded {
        Some(decoded) => DecodeResult::new(DecodeKind::UrlEncoded, decoded),
        None => DecodeResult::new(DecodeKind::UrlEncodedCorrupt, URL_FAILURE),
    })
}

/// 解码失败或结果不可打印时返回 None，交给后面的 Base64 检测
pub fn detect_hex(text: &str) -> Option<DecodeResult> {
    if !HEX_ONLY.is_match(text) || text.len() % 2 != 0 || text.len() < MIN_CANDIDATE_LEN {
        return None;
    }

    let bytes = hex::decode(text).ok()?;
    if !is_printable(&bytes) {
        return None;
    }
    Some(DecodeResult::new(DecodeKind::Hex, bytes_to_text(bytes)))
}

pub fn detect_base64(text: &str) -> Option<DecodeResult> {
    if !BASE64_ALPHABET.is_match(text) || text.len() < MIN_CANDIDATE_LEN {
        return None;
    }

    let Some(bytes) = has_valid_padding(text).then(|| decode_base64(text)).flatten() else {
        return Some(DecodeResult::new(DecodeKind::Base64Corrupt, BASE64_FAILURE));
    };

    let looks_structured = bytes.first().is_some_and(|&b| matches!(b, b'{' | b'['));
    if is_printable(&bytes) || looks_structured {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) {
            return Some(DecodeResult::new(DecodeKind::Base64Json, pretty(&value)));
        }
        return Some(DecodeResult::new(DecodeKind::Base64, bytes_to_text(bytes)));
    }

    Some(DecodeResult::new(DecodeKind::Base64Binary, bytes_to_text(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable() {
        assert!(is_printable(b"Hello, World!\n\t"));
        assert!(!is_printable(b""));
        assert!(!is_printable(&[0x00, 0x41]));
        assert!(!is_printable(&[0xC3, 0xA9]));
    }

    #[test]
    fn test_bytes_to_text_latin1_fallback() {
        assert_eq!(bytes_to_text(b"abc".to_vec()), "abc");
        assert_eq!(bytes_to_text(vec![0x41, 0xE9]), "A\u{e9}");
    }

    #[test]
    fn test_valid_escapes() {
        assert!(has_valid_escapes("100%25done"));
        assert!(has_valid_escapes("no escapes"));
        assert!(!has_valid_escapes("%41%"));
        assert!(!has_valid_escapes("%41%4"));
        assert!(!has_valid_escapes("%zz%41"));
    }

    #[test]
    fn test_padding_requires_full_quads() {
        assert!(has_valid_padding("QUJDRA=="));
        assert!(has_valid_padding("QUJDRA"));
        assert!(!has_valid_padding("QUJDRA="));
        assert!(!has_valid_padding("abcdef="));
    }

    #[test]
    fn test_jwt_requires_prefix_and_two_dots() {
        assert!(detect_jwt("ab.cd.ef").is_none());
        assert!(detect_jwt("eyJ.a").is_none());
        assert!(detect_jwt("eyJ.a.b.c").is_none());
    }

    #[test]
    fn test_jwt_url_safe_segments() {
        // {"alg":"none","kid":"??>"} uses '-' / '_' in its url-safe encoding
        let header = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"none","kid":"??>"}"#);
        assert!(header.contains('_') || header.contains('-'));
        let token = format!("{}.eyJzdWIiOiJ4In0.", header);

        let result = detect_jwt(&token).unwrap();
        assert_eq!(result.kind, DecodeKind::Jwt);
        assert!(result.output.contains("\"kid\": \"??>\""));
    }

    #[test]
    fn test_hex_non_printable_falls_through() {
        assert!(detect_hex("deadbeef").is_none());
        assert!(detect_hex("414").is_none());
        assert!(detect_hex("41").is_none());
        assert_eq!(detect_hex("4142").unwrap().output, "AB");
    }

    #[test]
    fn test_cascade_order() {
        let names: Vec<_> = CASCADE.iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["jwt", "url-encoded", "hex", "base64"]);
    }
}

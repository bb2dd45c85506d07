use crate::http::{HeaderInput, Headers};

/// 把请求头输入规范化为有序映射
///
/// 自由文本先按 JSON 对象解析，失败再按 `Name: value` 行解析。
pub fn normalize_headers(input: &HeaderInput) -> Headers {
    match input {
        HeaderInput::Map(headers) => headers.clone(),
        HeaderInput::Text(text) => {
            parse_structured(text).unwrap_or_else(|| parse_header_lines(text))
        }
    }
}

/// 按 JSON 对象解析；不是对象时返回 None
///
/// 非字符串的值按 JSON 文本保存。
pub fn parse_structured(text: &str) -> Option<Headers> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    Some(
        object
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => (key.clone(), s.clone()),
                other => (key.clone(), other.to_string()),
            })
            .collect(),
    )
}

/// 按行解析 `Name: value`
///
/// 每行在第一个冒号处切分，两边去空白；没有冒号、冒号在行首或 key 为空的行被跳过，
/// 重复的名称后者覆盖前者。
pub fn parse_header_lines(text: &str) -> Headers {
    let mut headers = Headers::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        headers.insert(key, value.trim());
    }
    headers
}

use crate::http::Headers;

/// 把请求转换为可以直接粘贴到 shell 的 curl 命令
pub struct CurlGenerator;

impl CurlGenerator {
    pub fn generate(method: &str, url: &str, headers: &Headers, body: Option<&str>) -> String {
        let mut cmd = format!("curl -X {} {}", method, Self::quote(url));

        for (key, value) in headers {
            cmd.push_str(" \\\n  -H ");
            cmd.push_str(&Self::quote(&format!("{}: {}", key, value)));
        }

        // 只有空白的 body 不输出
        if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
            cmd.push_str(" \\\n  -d ");
            cmd.push_str(&Self::quote(body));
        }

        cmd
    }

    /// 单引号包裹，内部的 `'` 写成 `'\''`
    fn quote(value: &str) -> String {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_get() {
        let cmd = CurlGenerator::generate("GET", "http://x/y?a=1", &Headers::new(), None);
        assert_eq!(cmd, "curl -X GET 'http://x/y?a=1'");
    }

    #[test]
    fn test_headers_and_body() {
        let headers = Headers::new()
            .with("Content-Type", "application/json")
            .with("X-Token", "abc");
        let cmd = CurlGenerator::generate("POST", "http://x/", &headers, Some(r#"{"a":1}"#));

        assert_eq!(
            cmd,
            "curl -X POST 'http://x/' \\\n  -H 'Content-Type: application/json' \\\n  -H 'X-Token: abc' \\\n  -d '{\"a\":1}'"
        );
    }

    #[test]
    fn test_single_quotes_are_escaped() {
        let headers = Headers::new().with("X-Note", "it's");
        let cmd = CurlGenerator::generate("POST", "http://x/", &headers, Some("name='bob'"));

        assert!(cmd.contains(r"-H 'X-Note: it'\''s'"));
        assert!(cmd.ends_with(r"-d 'name='\''bob'\'''"));
    }

    #[test]
    fn test_blank_body_is_omitted() {
        let cmd = CurlGenerator::generate("PUT", "http://x/", &Headers::new(), Some("  \n"));
        assert!(!cmd.contains("-d"));
    }
}

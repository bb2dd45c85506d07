use std::fmt;

/// 有序 Header 映射
///
/// 保持首次插入的顺序；同名 key 再次插入时覆盖原值（last-write-wins），
/// 因此 key 始终唯一。名称按原样比较（区分大小写）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖一个 header
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 忽略大小写查找（HTTP 语义上的 header 查找）
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 以 `Name: value` 行的形式输出，每行一个
    pub fn to_lines(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// 响应状态分类，用于展示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// 3xx/4xx/5xx 之外的状态码（包括 1xx）都归为 Success
    pub fn from_code(code: u16) -> Self {
        match code {
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            500.. => StatusClass::ServerError,
            _ => StatusClass::Success,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Success => "success",
            StatusClass::Redirect => "redirect",
            StatusClass::ClientError => "client-error",
            StatusClass::ServerError => "server-error",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut headers = Headers::new();
        headers.insert("A", "1");
        headers.insert("B", "2");
        headers.insert("A", "3");

        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(pairs, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_names_are_case_sensitive_keys() {
        let headers: Headers = vec![("Accept", "a"), ("accept", "b")].into_iter().collect();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("accept"), Some("b"));
        assert_eq!(headers.get_ignore_case("ACCEPT"), Some("a"));
    }

    #[test]
    fn test_to_lines() {
        let headers = Headers::new().with("Host", "x").with("Accept", "*/*");
        assert_eq!(headers.to_lines(), "Host: x\nAccept: */*");
        assert_eq!(Headers::new().to_lines(), "");
    }

    #[test]
    fn test_status_class() {
        assert_eq!(StatusClass::from_code(200), StatusClass::Success);
        assert_eq!(StatusClass::from_code(101), StatusClass::Success);
        assert_eq!(StatusClass::from_code(304), StatusClass::Redirect);
        assert_eq!(StatusClass::from_code(404), StatusClass::ClientError);
        assert_eq!(StatusClass::from_code(503), StatusClass::ServerError);
        assert_eq!(StatusClass::ClientError.to_string(), "client-error");
    }
}

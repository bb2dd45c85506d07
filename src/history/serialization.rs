use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::http::Headers;

// Headers 以 JSON 对象形式出现（和捕获事件 / 响应信封一致），保持顺序

impl Serialize for Headers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct HeadersVisitor;

impl<'de> Visitor<'de> for HeadersVisitor {
    type Value = Headers;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of header names to string values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Headers, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut headers = Headers::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            headers.insert(key, value);
        }
        Ok(headers)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D>(deserializer: D) -> Result<Headers, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(HeadersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_keeps_order() {
        let headers = Headers::new().with("Zeta", "1").with("Alpha", "2");
        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":"2"}"#);
    }

    #[test]
    fn test_deserialize_duplicate_keys_last_wins() {
        let headers: Headers = serde_json::from_str(r#"{"A":"1","B":"2","A":"3"}"#).unwrap();
        assert_eq!(headers.get("A"), Some("3"));
        assert_eq!(headers.len(), 2);
    }
}

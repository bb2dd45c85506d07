use super::model::RequestRecord;
use super::store::HistoryStore;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

const MAX_PATH_WIDTH: usize = 50;

/// 列表中展示的路径：path + query，过长截断；无法解析时原样返回 URL
pub fn display_path(raw_url: &str) -> String {
    let Ok(url) = url::Url::parse(raw_url) else {
        return raw_url.to_string();
    };

    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }

    if path.chars().count() > MAX_PATH_WIDTH {
        let truncated: String = path.chars().take(MAX_PATH_WIDTH - 3).collect();
        format!("{}...", truncated)
    } else {
        path
    }
}

fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" | "PATCH" => Color::Blue,
        "DELETE" => Color::Red,
        _ => Color::Grey,
    }
}

pub fn render_history(records: &[RequestRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Time", "Method", "Path", "Type", "Body"]);

    for record in records {
        let body = match &record.body {
            Some(body) => format!("{} bytes", body.len()),
            None => "-".to_string(),
        };

        table.add_row(vec![
            Cell::new(record.id()),
            Cell::new(record.timestamp().format("%H:%M:%S")),
            Cell::new(&record.method).fg(method_color(&record.method)),
            Cell::new(display_path(&record.url)),
            Cell::new(format!("{:?}", record.resource_type)).add_attribute(Attribute::Dim),
            Cell::new(body),
        ]);
    }

    table.to_string()
}

pub fn list_history(store: &HistoryStore) {
    let records = store.snapshot();
    if records.is_empty() {
        println!("NO REQUESTS CAPTURED");
        return;
    }

    println!("[{}]", records.len());
    println!("{}", render_history(&records));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::model::NewRecord;

    #[test]
    fn test_display_path() {
        assert_eq!(display_path("https://example.com/api/users?id=1"), "/api/users?id=1");
        assert_eq!(display_path("https://example.com"), "/");
        assert_eq!(display_path("not a url"), "not a url");
    }

    #[test]
    fn test_display_path_truncates() {
        let long = format!("https://example.com/{}", "a".repeat(80));
        let shown = display_path(&long);
        assert_eq!(shown.chars().count(), MAX_PATH_WIDTH);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn test_render_history_rows() {
        let store = HistoryStore::new();
        store.insert(NewRecord::new("GET", "https://example.com/one"));
        store.insert(NewRecord::new("POST", "https://example.com/two"));

        let rendered = render_history(&store.snapshot());
        assert!(rendered.contains("/one"));
        assert!(rendered.contains("POST"));
        assert!(rendered.find("/two").unwrap() < rendered.find("/one").unwrap());
    }
}

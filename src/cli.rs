use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use tokio::sync::mpsc;

use reprobe::capture::{CaptureEvent, CaptureNotice};
use reprobe::config::{ConfigLoader, InspectorConfig};
use reprobe::editor::RequestEditor;
use reprobe::history::printer::{display_path, list_history};
use reprobe::history::selector::{SelectionStrategy, select_record};
use reprobe::http::Headers;
use reprobe::inspector::Inspector;
use reprobe::search::{BufferId, SearchStatus};
use reprobe::utils::{ResponseFormat, ResponseFormatter};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 配置文件路径（默认向上查找 reprobe.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 关闭彩色输出
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 可选参数用于默认运行(curl 风格)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 发送请求（curl 风格参数）
    Send {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// 识别并解码一段文本（"-" 或省略时从 stdin 读取）
    Decode { text: Option<String> },
    /// 在文本中查找（省略文件时从 stdin 读取）
    Search {
        query: String,
        file: Option<PathBuf>,
    },
    /// 从 JSON Lines 文件导入捕获事件并列出历史
    Capture {
        events: PathBuf,
        /// 重放指定 id 的记录
        #[arg(long, conflicts_with_all = ["latest", "pick"])]
        replay: Option<u64>,
        /// 重放最新的记录
        #[arg(long, conflicts_with = "pick")]
        latest: bool,
        /// 交互式选择要重放的记录
        #[arg(long)]
        pick: bool,
    },
}

pub struct CliRunner {
    inspector: Inspector,
    color: bool,
}

impl CliRunner {
    pub fn new(config: &InspectorConfig, color: bool) -> Result<Self> {
        Ok(Self {
            inspector: Inspector::from_config(config)?,
            color,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = ConfigLoader::load(cli.config.as_deref())?;
        Self::new(&config, !cli.no_color)
    }

    pub async fn run(&self, command: Option<Commands>, args: Vec<String>) -> Result<()> {
        match command {
            Some(Commands::Send { args }) => self.send(args).await,
            Some(Commands::Decode { text }) => self.decode(text),
            Some(Commands::Search { query, file }) => self.search(&query, file),
            Some(Commands::Capture {
                events,
                replay,
                latest,
                pick,
            }) => {
                let strategy = match (replay, latest, pick) {
                    (Some(id), _, _) => Some(SelectionStrategy::ById(id)),
                    (None, true, _) => Some(SelectionStrategy::Latest),
                    (None, false, true) => Some(SelectionStrategy::Interactive),
                    _ => None,
                };
                self.capture(events, strategy).await
            }
            None if args.is_empty() => Err(anyhow::anyhow!("No command provided")),
            None => self.send(args).await,
        }
    }

    async fn send(&self, args: Vec<String>) -> Result<()> {
        let (editor, print_curl) = parse_curl(args)?;
        if print_curl {
            println!("{}", editor.to_curl());
            return Ok(());
        }
        self.send_editor(&editor).await
    }

    async fn send_editor(&self, editor: &RequestEditor) -> Result<()> {
        let envelope = self.inspector.send_editor(editor).await?;
        let formatter = ResponseFormatter::new(ResponseFormat::Raw).with_color(self.color);
        println!("{}", formatter.format(&envelope));

        if !envelope.success {
            anyhow::bail!("request failed");
        }
        Ok(())
    }

    fn decode(&self, text: Option<String>) -> Result<()> {
        let text = match text {
            Some(text) if text != "-" => text,
            _ => read_stdin()?,
        };

        let result = self.inspector.decode_selection(&text);
        let label = format!("[{}]", result.kind);
        let label = match (self.color, result.kind.is_decoded()) {
            (false, _) => label,
            (true, true) => label.green().bold().to_string(),
            (true, false) => label.red().bold().to_string(),
        };
        println!("{}\n{}", label, result.output);
        Ok(())
    }

    fn search(&self, query: &str, file: Option<PathBuf>) -> Result<()> {
        let text = match file {
            Some(path) => std::fs::read_to_string(&path)?,
            None => read_stdin()?,
        };

        let matches = self.inspector.search(query, BufferId::Response, &text);
        if matches.status() == SearchStatus::Idle {
            return Ok(());
        }
        println!("{}", matches.status());

        for m in matches.matches() {
            let line = m.line_in(&text);
            let hit = m.slice(&text).unwrap_or_default();
            let hit = if self.color {
                hit.yellow().bold().to_string()
            } else {
                hit.to_string()
            };
            println!("{:>6}:{}  {}", line, m.start, hit);
        }
        Ok(())
    }

    async fn capture(&self, events: PathBuf, strategy: Option<SelectionStrategy>) -> Result<()> {
        let content = std::fs::read_to_string(&events)?;
        let events = CaptureEvent::parse_lines(&content)?;

        let mut notices = self.inspector.subscribe();
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.send(event).await?;
        }
        drop(tx);

        let stats = self.inspector.correlator().consume(rx).await;
        while let Ok(CaptureNotice::NewRecord(record)) = notices.try_recv() {
            println!(
                "+ #{} {} {}",
                record.id(),
                record.method,
                display_path(&record.url)
            );
        }
        println!(
            "inserted {} / attached {} / ignored {} / unmatched {}",
            stats.inserted, stats.attached, stats.ignored, stats.unmatched
        );
        list_history(self.inspector.store());

        let Some(strategy) = strategy else {
            return Ok(());
        };
        let record = select_record(self.inspector.store(), strategy)?
            .ok_or_else(|| anyhow::anyhow!("No matching record to replay"))?;

        println!();
        self.send_editor(&RequestEditor::from_record(&record)).await
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// 解析 curl 风格的参数，第二个返回值表示 `--curl`（只打印命令不发送）
pub fn parse_curl(args: Vec<String>) -> Result<(RequestEditor, bool)> {
    let args = if args.first().is_some_and(|s| s == "curl") {
        args[1..].to_vec()
    } else {
        args
    };

    let mut method: Option<String> = None;
    let mut url = String::new();
    let mut headers = Headers::new();
    let mut body = String::new();
    let mut force_get = false;
    let mut print_curl = false;

    let mut args_iter = args.into_iter();

    while let Some(arg) = args_iter.next() {
        match arg.as_str() {
            // HTTP Method
            "-X" | "--request" => {
                if let Some(m) = args_iter.next() {
                    method = Some(m.to_uppercase());
                }
            }
            // Header
            "-H" | "--header" => {
                if let Some(header) = args_iter.next() {
                    if let Some((key, value)) = header.split_once(':') {
                        headers.insert(key.trim(), value.trim());
                    }
                }
            }
            // Data (body)
            "-d" | "--data" | "--data-raw" => {
                if let Some(data) = args_iter.next() {
                    body = data;
                }
            }
            // Force GET even with data
            "-G" | "--get" => force_get = true,
            "--curl" => print_curl = true,
            s if s.starts_with('-') => {
                // 如果是 -X=POST 这种形式
                if let Some((opt, val)) = s.split_once('=') {
                    match opt {
                        "-X" | "--request" => method = Some(val.to_uppercase()),
                        "-d" | "--data" | "--data-raw" => body = val.to_string(),
                        _ => {} // 忽略其他选项
                    }
                }
            }
            // URL (位置参数)
            _ => {
                if url.is_empty() {
                    url = arg;
                }
            }
        }
    }

    // 有 body 且没有指定方法时默认 POST
    let method = match method {
        Some(m) => m,
        None if !body.is_empty() && !force_get => "POST".to_string(),
        None => "GET".to_string(),
    };

    if url.is_empty() {
        return Err(anyhow::anyhow!("URL is required"));
    }

    Ok((
        RequestEditor {
            method,
            url,
            headers_text: headers.to_lines(),
            body,
        },
        print_curl,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_curl() {
        let (editor, print_curl) = parse_curl(args(&[
            "-X",
            "put",
            "-H",
            "Content-Type: application/json",
            "-d",
            r#"{"name":"foo"}"#,
            "http://example.com/items",
        ]))
        .unwrap();

        assert_eq!(editor.method, "PUT");
        assert_eq!(editor.url, "http://example.com/items");
        assert_eq!(editor.headers_text, "Content-Type: application/json");
        assert_eq!(editor.body, r#"{"name":"foo"}"#);
        assert!(!print_curl);
    }

    #[test]
    fn test_implicit_post_and_forced_get() {
        let (editor, _) = parse_curl(args(&["curl", "http://x/", "-d", "name=foo"])).unwrap();
        assert_eq!(editor.method, "POST");

        let (editor, _) = parse_curl(args(&["-G", "-d", "q=search", "http://x/"])).unwrap();
        assert_eq!(editor.method, "GET");
    }

    #[test]
    fn test_equals_form_and_curl_flag() {
        let (editor, print_curl) =
            parse_curl(args(&["--request=delete", "--curl", "http://x/1"])).unwrap();
        assert_eq!(editor.method, "DELETE");
        assert!(print_curl);
    }

    #[test]
    fn test_url_required() {
        assert!(parse_curl(args(&["-X", "GET"])).is_err());
    }

    #[test]
    fn test_capture_flags_parse() {
        let cli = Cli::try_parse_from(["reprobe", "capture", "events.jsonl", "--replay", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Capture {
                replay: Some(3),
                latest: false,
                ..
            })
        ));

        assert!(Cli::try_parse_from(["reprobe", "capture", "e.jsonl", "--replay", "1", "--latest"]).is_err());
    }
}

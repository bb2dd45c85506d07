mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, CliRunner};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    reprobe::logger::init_logger();

    let cli = Cli::parse();
    let runner = CliRunner::from_cli(&cli)?;
    runner.run(cli.command, cli.args).await
}

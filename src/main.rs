use std::env;
use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod catalog;
mod console;
mod csv;
mod datetime;
mod options_command;
mod session;
mod session_command;
mod trip;

use catalog::Catalog;
use console::ConsoleTripView;
use options_command::{options_command, OptionsCommand};
use session_command::{SessionArgs, SessionCommand};

/// ダンプトラックの運行記録を取るためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- session
/// $ cargo run -- options
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    Session(SessionArgs),
    Options(OptionsCommand),
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging().context("Failed to initialize logging")?;

    match args.subcommand {
        SubCommands::Session(session) => {
            let catalog = Catalog::load(session.options_file.as_deref())
                .context("Failed to load the option catalog")?;
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            let mut view_writer = io::stdout();
            let mut view = ConsoleTripView::new(&mut view_writer);
            SessionCommand::new(&catalog, &mut view, &mut input, &mut output).run(session)?;
        }
        SubCommands::Options(options) => options_command(options, &mut io::stdout())?,
    }

    Ok(())
}

/// ログの出力を初期化する。
///
/// ログレベルは環境変数`RUST_LOG`で指定する。指定がない場合はinfoとする。
fn init_logging() -> Result<()> {
    let level = env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(log::LevelFilter::Info);
    let colors = fern::colors::ColoredLevelConfig::new();

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;

    Ok(())
}

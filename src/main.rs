use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use timeledger::config::{default_settings_path, load_settings, Settings};
use timeledger::console::{ConsoleJson, ConsoleMarkdownList, ConsolePresenter};
use timeledger::daily_command::DailyCommand;
use timeledger::log_command::{LogArgs, LogCommand};
use timeledger::logging::setup_logger;
use timeledger::report_command::{ReportArgs, ReportCommand};
use timeledger::settings_command::{settings_command, SettingsArgs};
use timeledger::source::JsonFileSource;

/// タスクの作業時間の記録を集計するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- --file task.json report
/// $ cargo run -- --file task.json daily
/// $ cargo run -- --file task.json log --start 09:00 --end 15:00 --billable
/// $ cargo run -- settings --id-strategy tail
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(short = 'f', long = "file", global = true, help = "Ledger file in JSON")]
    file: Option<PathBuf>,

    #[clap(long = "settings", global = true, help = "Overrides the settings file path")]
    settings: Option<PathBuf>,

    #[clap(long = "json", global = true, help = "Prints output as JSON")]
    json: bool,

    #[clap(short = 'v', long = "verbose", global = true, help = "Enables debug logging")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    Report(ReportArgs),
    Daily,
    Log(LogArgs),
    Settings(SettingsArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logger(args.verbose)?;

    let settings_path = match args.settings {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let mut settings = load_settings(&settings_path)?;
    debug!("Settings: {:?}", settings);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.subcommand {
        SubCommands::Report(report) => {
            let source = ledger_source(args.file)?;
            let mut presenter = make_presenter(&mut out, args.json, &settings);
            ReportCommand::new(&source, settings).run(report, presenter.as_mut())?;
        }
        SubCommands::Daily => {
            let source = ledger_source(args.file)?;
            let mut presenter = make_presenter(&mut out, args.json, &settings);
            DailyCommand::new(&source, settings).run(presenter.as_mut())?;
        }
        SubCommands::Log(entry) => {
            let source = ledger_source(args.file)?;
            let mut presenter = make_presenter(&mut out, args.json, &settings);
            LogCommand::new(&source, settings).run(entry, presenter.as_mut())?;
        }
        SubCommands::Settings(settings_args) => {
            settings_command(settings_args, &settings_path, &mut settings, &mut out)?;
        }
    }
    out.flush().context("Failed to flush stdout")?;

    Ok(())
}

/// 入力ファイルのsourceを返す。ファイルが指定されていない場合はエラーを返す。
fn ledger_source(file: Option<PathBuf>) -> Result<JsonFileSource> {
    let file = file.context("A ledger file is required (--file <path>)")?;
    Ok(JsonFileSource::new(file))
}

/// 出力形式に応じたpresenterを返す。
fn make_presenter<'a, W: Write>(
    out: &'a mut W,
    json: bool,
    settings: &Settings,
) -> Box<dyn ConsolePresenter + 'a> {
    if json {
        Box::new(ConsoleJson::new(out))
    } else {
        Box::new(ConsoleMarkdownList::new(out, settings.date_format))
    }
}

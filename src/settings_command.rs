use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;

use crate::config::{update_settings, Settings};
use crate::datetime::DateFormat;
use crate::ledger::IdStrategy;

/// 設定を表示・変更するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct SettingsArgs {
    #[clap(
        long = "id-strategy",
        help = "How new record ids are assigned: max or tail",
        parse(try_from_str = parse_id_strategy),
    )]
    id_strategy: Option<IdStrategy>,

    #[clap(
        long = "date-format",
        help = "How dates are displayed: dotted (DD.MM.YYYY) or iso (YYYY-MM-DD)",
        parse(try_from_str = parse_date_format),
    )]
    date_format: Option<DateFormat>,
}

/// `settings`サブコマンドの処理を行う。
///
/// 指定された値で設定を更新し、変更があった場合だけ保存する。最後に現在の設定を表示する。
///
/// # Arguments
///
/// * `args` - `settings`サブコマンドの引数
/// * `path` - 設定ファイルのパス
/// * `settings` - 起動時に読み込んだ設定
/// * `writer` - 表示先
pub fn settings_command<W: Write>(
    args: SettingsArgs,
    path: &Path,
    settings: &mut Settings,
    writer: &mut W,
) -> Result<bool> {
    let saved = update_settings(path, settings, |next| {
        if let Some(id_strategy) = args.id_strategy {
            next.id_strategy = id_strategy;
        }
        if let Some(date_format) = args.date_format {
            next.date_format = date_format;
        }
    })?;
    if saved {
        info!("Settings updated");
    }

    let raw = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    writeln!(writer, "{}", raw).context("Failed to write settings")?;

    Ok(saved)
}

fn parse_id_strategy(s: &str) -> Result<IdStrategy> {
    parse_setting(s)
}

fn parse_date_format(s: &str) -> Result<DateFormat> {
    parse_setting(s)
}

/// 設定値を設定ファイルと同じ表記でパースする。
fn parse_setting<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .with_context(|| format!("Unknown setting value: {}", s))
}

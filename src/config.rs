use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::datetime::DateFormat;
use crate::ledger::IdStrategy;

/// 設定ファイルを置くディレクトリ名。
const APP_DIR: &str = "timeledger";
/// 設定ファイル名。
const SETTINGS_FILE: &str = "settings.json";

/// アプリケーション全体の設定。
///
/// 起動時に読み込み、変更があった時だけ保存する。
/// グローバルには持たず、必要な箇所へ明示的に渡す。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub id_strategy: IdStrategy,
    pub date_format: DateFormat,
}

/// 設定ファイルの既定の場所を返す。
///
/// OSの設定ディレクトリが取得できない場合はエラーを返す。
pub fn default_settings_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Failed to locate config directory")?;
    Ok(dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// 設定ファイルを読み込む。
///
/// ファイルが存在しない場合は既定値を返す。
///
/// # Arguments
///
/// * `path` - 設定ファイルのパス
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("Settings file not found, use defaults: {}", path.display());
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse settings JSON in {}", path.display()))?;
    info!("Settings loaded from {}", path.display());

    Ok(settings)
}

/// 設定ファイルを保存する。親ディレクトリがなければ作成する。
///
/// # Arguments
///
/// * `path` - 設定ファイルのパス
/// * `settings` - 保存する設定
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, raw)
        .with_context(|| format!("Failed to write settings file: {}", path.display()))?;
    info!("Settings saved to {}", path.display());

    Ok(())
}

/// 設定を更新し、値が変わった場合だけ保存する。
///
/// 保存したかどうかを返す。
///
/// # Arguments
///
/// * `path` - 設定ファイルのパス
/// * `current` - 現在の設定。更新後の値で上書きされる
/// * `update` - 設定を書き換える処理
pub fn update_settings<P, F>(path: P, current: &mut Settings, update: F) -> Result<bool>
where
    P: AsRef<Path>,
    F: FnOnce(&mut Settings),
{
    let mut next = *current;
    update(&mut next);
    if next == *current {
        return Ok(false);
    }

    save_settings(path, &next)?;
    *current = next;
    Ok(true)
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;

/// 選択式フィールドの種別を表す列挙型。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChoiceField {
    Driver,
    Truck,
    Customer,
    Material,
    Pickup,
}

impl ChoiceField {
    pub const ALL: [ChoiceField; 5] = [
        ChoiceField::Driver,
        ChoiceField::Truck,
        ChoiceField::Customer,
        ChoiceField::Material,
        ChoiceField::Pickup,
    ];

    /// フィールドの表示名を返す。
    pub fn label(&self) -> &'static str {
        match self {
            ChoiceField::Driver => "Driver",
            ChoiceField::Truck => "Truck",
            ChoiceField::Customer => "Customer",
            ChoiceField::Material => "Material",
            ChoiceField::Pickup => "Pickup",
        }
    }
}

/// 選択式フィールドごとの選択肢一覧。
///
/// JSONファイルで一部のフィールドだけを上書きできる。省略したフィールドは
/// 組み込みの選択肢のままとなる。
///
/// # Examples
///
/// ```json
/// {
///     "drivers": ["Josh", "Mike"],
///     "materials": ["rock", "sand"]
/// }
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub drivers: Vec<String>,
    pub trucks: Vec<String>,
    pub customers: Vec<String>,
    pub materials: Vec<String>,
    pub pickups: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            drivers: to_strings(&["Josh", "Mike", "Dave"]),
            trucks: to_strings(&["2010 International", "2006 Kenworth", "1998 Mack"]),
            customers: to_strings(&["CCC", "Smith Construction", "County Road Dept"]),
            materials: to_strings(&["rock", "sand", "gravel", "loam", "fill"]),
            pickups: to_strings(&["Quarry A", "Quarry B", "Sand Pit"]),
        }
    }
}

impl Catalog {
    /// 選択肢一覧を読み込む。
    ///
    /// ファイルを明示した場合はそのファイルを利用する。指定がない場合は
    /// 既定の設定ファイルがあればそれを、なければ組み込みの選択肢を利用する。
    ///
    /// # Arguments
    ///
    /// * `explicit` - コマンドラインで指定された設定ファイル
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No option file found, using the built-in options.");
                Ok(Self::default())
            }
        }
    }

    /// 指定したフィールドの選択肢を返す。
    pub fn options(&self, field: ChoiceField) -> &[String] {
        match field {
            ChoiceField::Driver => &self.drivers,
            ChoiceField::Truck => &self.trucks,
            ChoiceField::Customer => &self.customers,
            ChoiceField::Material => &self.materials,
            ChoiceField::Pickup => &self.pickups,
        }
    }

    /// JSONファイルから選択肢一覧を読み込む。
    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read option file: {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse option file: {}", path.display()))?;
        info!("Loaded options from {}", path.display());

        Ok(catalog)
    }
}

/// 既定の設定ファイルのパスを返す。
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("triplog").join("options.json"))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

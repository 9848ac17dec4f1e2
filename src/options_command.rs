use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::catalog::{Catalog, ChoiceField};

/// `options`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct OptionsCommand {
    #[clap(
        long = "options",
        help = "Sets a JSON file with the option lists",
        parse(from_os_str)
    )]
    options_file: Option<PathBuf>,
}

/// `options`サブコマンドの処理を行う。
///
/// 選択式フィールドごとの選択肢一覧をMarkdownのlist形式で出力する。
///
/// # Arguments
///
/// * `options` - `options`サブコマンドの引数
/// * `writer` - 一覧の出力先
pub fn options_command<W: Write>(options: OptionsCommand, writer: &mut W) -> Result<()> {
    let catalog = Catalog::load(options.options_file.as_deref())
        .context("Failed to load the option catalog")?;
    info!("Option catalog loaded.");

    for field in ChoiceField::ALL {
        writeln!(writer, "## {}", field.label())
            .with_context(|| format!("Failed to write field: {}", field.label()))?;
        for option in catalog.options(field) {
            writeln!(writer, "- {}", option)
                .with_context(|| format!("Failed to write option: {}", option))?;
        }
    }

    Ok(())
}

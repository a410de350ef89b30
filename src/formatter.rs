//! Formatter Module
//!
//! カテゴリ（シート）を見出し付きの箇条書きブロックに変換するモジュール。
//! セル値の文字列化もここで行います。

use std::fmt::Write as _;

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::api::{DateFormat, EmptyRowPolicy, HeaderStyle};
use crate::builder::FormatOptions;
use crate::types::{CellValue, Category, Row};

/// 1カテゴリ分の出力
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryBlock {
    /// カテゴリ名（元の表記）
    pub name: String,
    /// 読み込んだ行数
    pub rows: usize,
    /// 出力した箇条書きの数
    pub bullets: usize,
    /// 見出し + 箇条書き
    pub text: String,
}

/// カテゴリフォーマッター
///
/// 見出し・箇条書き・行区切りの生成を担当します。
#[derive(Debug)]
pub(crate) struct CategoryFormatter {
    /// セル値フォーマッター
    cell_formatter: CellFormatter,
}

impl CategoryFormatter {
    pub fn new() -> Self {
        Self {
            cell_formatter: CellFormatter,
        }
    }

    /// カテゴリを整形
    ///
    /// # 引数
    ///
    /// * `category` - 整形するカテゴリ
    /// * `options` - 書式設定
    ///
    /// # 戻り値
    ///
    /// 見出しと箇条書きを含む[`CategoryBlock`]。
    /// 箇条書きが0件でも見出しは生成されます（省略するかどうかはアセンブラーが判断）。
    pub fn format_category(&self, category: &Category, options: &FormatOptions) -> CategoryBlock {
        let mut text = render_header(&category.name, options.header_style);
        let mut bullets = 0;

        for row in &category.rows {
            let row_bullets = self.format_row(row, options, &mut text);
            bullets += row_bullets;

            if row_bullets > 0 || options.empty_row_policy == EmptyRowPolicy::KeepSeparator {
                text.push('\n');
            }
        }

        tracing::debug!(
            category = %category.name,
            rows = category.rows.len(),
            bullets,
            "formatted category"
        );

        CategoryBlock {
            name: category.name.clone(),
            rows: category.rows.len(),
            bullets,
            text,
        }
    }

    /// 1行分の箇条書きを`out`に追記し、追記した件数を返す
    fn format_row(&self, row: &Row, options: &FormatOptions, out: &mut String) -> usize {
        let mut count = 0;
        for (column, value) in row.iter() {
            let rendered = self.cell_formatter.format_value(value, &options.date_format);
            if let Some(bullet) = render_bullet(column, &rendered, options) {
                out.push_str(&bullet);
                out.push('\n');
                count += 1;
            }
        }
        count
    }
}

impl Default for CategoryFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// カテゴリ見出しを生成
///
/// カテゴリ名はUnicodeの大文字変換を行います（ロケール非依存）。
pub(crate) fn render_header(name: &str, style: HeaderStyle) -> String {
    let title = name.trim().to_uppercase();
    match style {
        HeaderStyle::Ruled { width } => {
            let rule = "=".repeat(width);
            format!("{rule}\n{title}\n{rule}\n\n")
        }
        HeaderStyle::Markdown => format!("## {title}\n"),
    }
}

/// 1セル分の箇条書きを生成
///
/// 前後の空白を除いた値が空、または`min_bullet_length`文字以下の場合は`None`。
pub(crate) fn render_bullet(column: &str, value: &str, options: &FormatOptions) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() <= options.min_bullet_length {
        return None;
    }

    if is_generic_label(column, &options.generic_labels) {
        Some(format!("- {value}"))
    } else {
        Some(format!("- {}: {value}", column.trim()))
    }
}

/// 列名が汎用ラベルかどうか（大文字小文字を区別しない）
pub(crate) fn is_generic_label(column: &str, labels: &[String]) -> bool {
    let column = column.trim().to_lowercase();
    labels.iter().any(|label| label.to_lowercase() == column)
}

/// セルフォーマッター
///
/// セル値を箇条書き用の文字列に変換します。
#[derive(Debug)]
pub(crate) struct CellFormatter;

impl CellFormatter {
    /// セル値をフォーマット
    ///
    /// エラー値（`#DIV/0!`など）は空文字列として扱います。
    pub fn format_value(&self, value: &CellValue, date_format: &DateFormat) -> String {
        match value {
            CellValue::String(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => if *b { "VRAI" } else { "FAUX" }.to_string(),
            CellValue::DateTime(datetime) => DateFormatter
                .format(datetime, date_format)
                .unwrap_or_else(|| datetime.to_string()),
            CellValue::Duration(duration) => format_duration(duration),
            CellValue::Error(_) | CellValue::Empty => String::new(),
        }
    }
}

/// 日付フォーマッター
///
/// シリアル値からの変換（エポック、1904年システム、1900年うるう年バグ）は
/// 読み込み時に済んでいるため、ここでは書式の適用のみを行います。
#[derive(Debug)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// 日時をフォーマット
    ///
    /// # 戻り値
    ///
    /// * `Some(String)` - フォーマット済み文字列
    /// * `None` - 書式文字列が不正な場合
    pub fn format(&self, datetime: &NaiveDateTime, date_format: &DateFormat) -> Option<String> {
        let mut out = String::new();
        match date_format {
            DateFormat::Iso8601 => {
                if datetime.hour() == 0 && datetime.minute() == 0 {
                    write!(out, "{}", datetime.format("%Y-%m-%d")).ok()?;
                } else {
                    write!(out, "{}", datetime.format("%Y-%m-%d %H:%M")).ok()?;
                }
            }
            DateFormat::Custom(format_str) => {
                write!(out, "{}", datetime.format(format_str)).ok()?;
            }
        }
        Some(out)
    }
}

/// 経過時間を `時間:分`（秒があれば `時間:分:秒`）で表す
///
/// 時間は24を超えても繰り上げません（`[h]:mm` と同じ表示）。
fn format_duration(duration: &Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);

    if seconds == 0 {
        format!("{sign}{hours}:{minutes:02}")
    } else {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    }
}

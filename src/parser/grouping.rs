//! Category Column Grouping
//!
//! 1枚のシートに複数カテゴリが混在する場合（カテゴリ列を持つ表）に、
//! 列の値ごとにカテゴリへ分割します。

use crate::types::{Category, Row};

/// カテゴリ列の値でシートを分割
///
/// # 引数
///
/// * `category` - シート1枚分のカテゴリ
/// * `column` - カテゴリ列の名前
///
/// # 戻り値
///
/// 値の初出順に並んだカテゴリ。カテゴリ列そのものは箇条書きから除外されます。
/// カテゴリ列の値が空の行は破棄します。
/// シートにカテゴリ列が存在しない場合は、元のカテゴリをそのまま返します。
pub(crate) fn split_by_column(category: Category, column: &str) -> Vec<Category> {
    if !category.columns.iter().any(|c| c == column) {
        tracing::warn!(
            sheet = %category.name,
            column,
            "category column not found, using the whole sheet as one category"
        );
        return vec![category];
    }

    let columns: Vec<String> = category
        .columns
        .iter()
        .filter(|c| c.as_str() != column)
        .cloned()
        .collect();

    let mut groups: Vec<(String, Vec<Row>)> = Vec::new();
    let mut dropped = 0usize;

    for row in &category.rows {
        let key = row
            .get(column)
            .map(|value| value.as_raw_string().trim().to_string())
            .unwrap_or_default();

        if key.is_empty() {
            dropped += 1;
            continue;
        }

        let stripped = row.without_column(column);
        match groups.iter_mut().find(|(name, _)| *name == key) {
            Some((_, rows)) => rows.push(stripped),
            None => groups.push((key, vec![stripped])),
        }
    }

    if dropped > 0 {
        tracing::debug!(sheet = %category.name, dropped, "rows without a category value");
    }

    groups
        .into_iter()
        .map(|(name, rows)| Category::new(name, columns.clone(), rows))
        .collect()
}

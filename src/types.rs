//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::{Duration, NaiveDateTime};

/// シート名が空の場合に使用するカテゴリ名
pub const DEFAULT_CATEGORY_NAME: &str = "INFORMATIONS";

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付・時刻（1900年/1904年システムの補正済み）
    DateTime(NaiveDateTime),

    /// 経過時間（`[h]:mm` などの書式）
    Duration(Duration),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空白のみの文字列も空として扱います。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 値を文字列として取得（書式適用前）
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::DateTime(dt) => dt.to_string(),
            CellValue::Duration(d) => format!("{}s", d.num_seconds()),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// 1行分のデータ
///
/// 列名からセル値へのマッピング。列の順序はシートのヘッダー行の順序を保持します。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    /// 空の行を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 列を末尾に追加
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((column.into(), value.into()));
    }

    /// 列名でセル値を取得
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// 列の宣言順に (列名, 値) を走査
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// 指定した列を除いた行を返す
    pub(crate) fn without_column(&self, column: &str) -> Row {
        Row {
            cells: self
                .cells
                .iter()
                .filter(|(name, _)| name != column)
                .cloned()
                .collect(),
        }
    }

    /// すべてのセルが空かどうか
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<C: Into<String>, V: Into<CellValue>> FromIterator<(C, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.push(column, value);
        }
        row
    }
}

/// カテゴリ（シート1枚分の知識）
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// カテゴリ名（シート名、またはカテゴリ列の値）
    pub name: String,

    /// ヘッダー行の列名（宣言順）
    pub columns: Vec<String>,

    /// データ行（シート上の順序）
    pub rows: Vec<Row>,
}

impl Category {
    /// 新しいカテゴリを生成
    ///
    /// 名前が空白のみの場合は[`DEFAULT_CATEGORY_NAME`]を使用します。
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_CATEGORY_NAME.to_string()
        } else {
            name
        };
        Self {
            name,
            columns,
            rows,
        }
    }
}

/// カテゴリごとの集計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    /// カテゴリ名
    pub name: String,
    /// 読み込んだ行数
    pub rows: usize,
    /// 出力した箇条書きの数
    pub bullets: usize,
    /// 文書に出力されたか（空カテゴリ省略時はfalse）
    pub emitted: bool,
}

/// 生成結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// カテゴリごとの集計（ソース順）
    pub categories: Vec<CategoryStats>,

    /// 組み立てた文書の文字数
    pub document_chars: usize,
}

impl GenerationReport {
    /// 全カテゴリの行数合計
    pub fn total_rows(&self) -> usize {
        self.categories.iter().map(|c| c.rows).sum()
    }

    /// 全カテゴリの箇条書き合計
    pub fn total_bullets(&self) -> usize {
        self.categories.iter().map(|c| c.bullets).sum()
    }

    /// 文書に出力されたカテゴリ数
    pub fn emitted_categories(&self) -> usize {
        self.categories.iter().filter(|c| c.emitted).count()
    }
}

/// 組み立て済みのプロンプト文書
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument {
    /// 文書本文（ペルソナ + カテゴリブロック + 締めの指示）
    pub body: String,

    /// 集計
    pub report: GenerationReport,
}

//! Parser Module
//!
//! calamineを使用したワークブック読み込み（Loader）。
//! シートごとにヘッダー行を列名として、順序付きの行データを抽出します。

mod grouping;
mod workbook;

pub(crate) use grouping::split_by_column;
pub(crate) use workbook::WorkbookParser;

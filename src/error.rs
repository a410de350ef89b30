//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;
use thiserror::Error;

/// sheetpromptクレート全体で使用するエラー型
///
/// ワークブックの読み込み、プロンプトの組み立て、Modelfileの書き出し中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `SourceNotFound`: 入力ワークブックが存在しない
/// - `SourceUnreadable`: 入力を表形式データとして解析できない（calamine由来）
/// - `DestinationWriteError`: 出力ファイルを作成・書き込みできない
/// - `Config`: 設定の検証に失敗した（無効なパラメータ、存在しないシートなど）
/// - `SecurityViolation`: 入力ファイルサイズの上限を超えた
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetprompt::{GeneratorBuilder, SheetPromptError};
///
/// let generator = GeneratorBuilder::new().build().unwrap();
/// match generator.load("missing.xlsx") {
///     Err(SheetPromptError::SourceNotFound { path }) => {
///         eprintln!("not found: {}", path.display());
///     }
///     _ => {}
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetPromptError {
    /// 入力ファイルが存在しない
    #[error("Source file not found: {}", path.display())]
    SourceNotFound {
        /// 指定された入力パス
        path: PathBuf,
    },

    /// 入力ファイルを表形式データとして読み込めない
    ///
    /// 破損したファイル、サポートされていない形式、読み取り権限がない場合など。
    /// 原因となったcalamineのエラーを保持します。
    #[error("Failed to read workbook '{}'", path.display())]
    SourceUnreadable {
        /// 入力パス
        path: PathBuf,
        /// 原因
        #[source]
        source: calamine::Error,
    },

    /// 出力ファイルの作成・書き込みに失敗
    #[error("Failed to write '{}'", path.display())]
    DestinationWriteError {
        /// 出力パス
        path: PathBuf,
        /// 原因
        #[source]
        source: std::io::Error,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `GeneratorBuilder::build()`時の検証や、シート選択で存在しないシートが
    /// 指定された場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use sheetprompt::{GeneratorBuilder, SheetPromptError};
    ///
    /// let result = GeneratorBuilder::new().with_base_model("  ").build();
    ///
    /// match result {
    ///     Err(SheetPromptError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl SheetPromptError {
    /// calamineのエラーを入力パス付きの`SourceUnreadable`に変換する
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: calamine::Error) -> Self {
        SheetPromptError::SourceUnreadable {
            path: path.into(),
            source,
        }
    }
}

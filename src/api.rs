//! Public API Types
//!
//! 公開APIで使用する列挙型・設定型を定義するモジュール。

/// 汎用ラベルとして扱う列名（大文字小文字を区別しない）
///
/// これらの列は列名を付けずに `- 値` として出力されます。
pub const DEFAULT_GENERIC_LABELS: [&str; 4] = ["information", "contenu", "description", "texte"];

/// カテゴリ見出しの書式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderStyle {
    /// 上下を罫線で囲んだ見出し（デフォルト、幅60）
    ///
    /// # 出力例
    ///
    /// ```text
    /// ============================================================
    /// ADMISSION
    /// ============================================================
    /// ```
    Ruled {
        /// 罫線の文字数
        width: usize,
    },

    /// Markdown見出し
    ///
    /// # 出力例
    ///
    /// ```text
    /// ## ADMISSION
    /// ```
    Markdown,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        HeaderStyle::Ruled { width: 60 }
    }
}

/// 箇条書きが1つも生成されなかった行の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum EmptyRowPolicy {
    /// 何も出力しない（デフォルト）
    #[default]
    Skip,

    /// 行区切りの空行だけを出力する
    KeepSeparator,
}

/// 日付の出力形式
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式（YYYY-MM-DD、時刻があれば ` HH:MM` を付加）
    ///
    /// 例: `2025-09-01`, `2025-09-01 08:30`
    #[default]
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetprompt::{GeneratorBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), sheetprompt::SheetPromptError> {
    /// let generator = GeneratorBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d/%m/%Y".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// シート選択方式
///
/// プロンプトに含めるシートを選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシート（デフォルト）
    #[default]
    All,

    /// インデックス指定（0始まり）
    Index(usize),

    /// シート名指定
    Name(String),

    /// 複数のインデックス指定
    Indices(Vec<usize>),

    /// 複数のシート名指定
    Names(Vec<String>),
}

/// 書式プリセット
///
/// 従来の2種類の出力スタイルを再現します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatPreset {
    /// 罫線付き見出し、すべての非空値を出力、会話テンプレートあり
    Verbose,

    /// `##` 見出し、3文字以下の値を除外、会話テンプレートなし
    Compact,
}

/// 生成パラメータ（Modelfileの `PARAMETER` 行）
///
/// `None` の項目は出力されません。
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub repeat_penalty: Option<f64>,
    /// コンテキストウィンドウサイズ
    pub num_ctx: Option<u32>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: Some(0.7),
            top_p: Some(0.9),
            top_k: Some(40),
            repeat_penalty: Some(1.1),
            num_ctx: None,
        }
    }
}

impl ModelParameters {
    /// すべて未指定のパラメータ
    pub fn none() -> Self {
        Self {
            temperature: None,
            top_p: None,
            top_k: None,
            repeat_penalty: None,
            num_ctx: None,
        }
    }

    /// 出力対象の (キー, 値) を宣言順に返す
    pub(crate) fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        if let Some(v) = self.temperature {
            entries.push(("temperature", v.to_string()));
        }
        if let Some(v) = self.top_p {
            entries.push(("top_p", v.to_string()));
        }
        if let Some(v) = self.top_k {
            entries.push(("top_k", v.to_string()));
        }
        if let Some(v) = self.repeat_penalty {
            entries.push(("repeat_penalty", v.to_string()));
        }
        if let Some(v) = self.num_ctx {
            entries.push(("num_ctx", v.to_string()));
        }
        entries
    }
}

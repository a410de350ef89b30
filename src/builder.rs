//! Builder Module
//!
//! Fluent Builder APIを提供し、`PromptGenerator`インスタンスを段階的に構築する。

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::api::{
    DateFormat, EmptyRowPolicy, FormatPreset, HeaderStyle, ModelParameters, SheetSelector,
    DEFAULT_GENERIC_LABELS,
};
use crate::assembler::{Persona, PromptAssembler};
use crate::error::SheetPromptError;
use crate::formatter::{CategoryBlock, CategoryFormatter};
use crate::output::{DocumentWriter, ModelfileRenderer};
use crate::parser::{split_by_column, WorkbookParser};
use crate::types::{Category, GenerationReport, PromptDocument};

/// デフォルトの入力ファイル
pub const DEFAULT_INPUT_PATH: &str = "BTS_SIO_Infos.xlsx";

/// デフォルトの出力ファイル
pub const DEFAULT_OUTPUT_PATH: &str = "Modelfile";

/// デフォルトのベースモデル
pub const DEFAULT_BASE_MODEL: &str = "llama3.2";

/// デフォルトのデバッグ出力ファイル（文書本文のみ）
pub const DEFAULT_DEBUG_PATH: &str = "debug_content.txt";

/// カテゴリブロックの書式設定
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FormatOptions {
    /// この文字数以下の値は箇条書きにしない（0 = 非空ならすべて出力）
    pub min_bullet_length: usize,

    /// 列名を付けずに出力する汎用ラベル
    pub generic_labels: Vec<String>,

    /// 見出しの書式
    pub header_style: HeaderStyle,

    /// 箇条書きのない行の扱い
    pub empty_row_policy: EmptyRowPolicy,

    /// 日付形式
    pub date_format: DateFormat,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            min_bullet_length: 0,
            generic_labels: DEFAULT_GENERIC_LABELS.iter().map(|s| s.to_string()).collect(),
            header_style: HeaderStyle::default(),
            empty_row_policy: EmptyRowPolicy::default(),
            date_format: DateFormat::default(),
        }
    }
}

/// Modelfileの設定
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ModelfileOptions {
    /// `FROM` 行のベースモデル
    pub base_model: String,

    /// メタデータコメントのタイトル
    pub title: String,

    /// `PARAMETER` 行
    pub parameters: ModelParameters,

    /// `TEMPLATE` ブロックを出力するか
    pub conversation_template: bool,

    /// コメント行を出力するか
    pub metadata_comments: bool,

    /// 生成日時（指定時のみ出力。未指定なら出力は実行ごとに同一）
    pub generated_at: Option<NaiveDateTime>,
}

impl Default for ModelfileOptions {
    fn default() -> Self {
        Self {
            base_model: DEFAULT_BASE_MODEL.to_string(),
            title: "BTS SIO Saint Louis Châteaulin".to_string(),
            parameters: ModelParameters::default(),
            conversation_template: true,
            metadata_comments: true,
            generated_at: None,
        }
    }
}

/// 生成処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct GenerationConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// カテゴリ列（指定時はシートを列の値ごとに分割）
    pub category_column: Option<String>,

    /// 書式設定
    pub format: FormatOptions,

    /// 箇条書きのないカテゴリを省略するか
    pub omit_empty_categories: bool,

    /// ペルソナ
    pub persona: Persona,

    /// Modelfile設定
    pub modelfile: ModelfileOptions,

    /// デバッグ用コピーの出力先（`None`なら出力しない）
    pub debug_path: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::All,
            category_column: None,
            format: FormatOptions::default(),
            omit_empty_categories: true,
            persona: Persona::default(),
            modelfile: ModelfileOptions::default(),
            debug_path: Some(PathBuf::from(DEFAULT_DEBUG_PATH)),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetprompt::{GeneratorBuilder, FormatPreset};
///
/// # fn main() -> Result<(), sheetprompt::SheetPromptError> {
/// let generator = GeneratorBuilder::new()
///     .with_preset(FormatPreset::Compact)
///     .with_base_model("mistral")
///     .build()?;
/// generator.generate("BTS_SIO_Infos.xlsx", "Modelfile")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GeneratorBuilder {
    /// 内部設定（構築中）
    config: GenerationConfig,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: すべてのシート
    /// - 最小文字数: 0（空でない値はすべて出力）
    /// - 見出し: 罫線付き（幅60）
    /// - 箇条書きのない行: 出力しない
    /// - 箇条書きのないカテゴリ: 省略
    /// - ベースモデル: `llama3.2`
    /// - 会話テンプレート: あり
    /// - デバッグ用コピー: `debug_content.txt`
    pub fn new() -> Self {
        Self {
            config: GenerationConfig::default(),
        }
    }

    /// 書式プリセットを適用する
    ///
    /// 個別の`with_*`メソッドはプリセットの後に呼び出すと、その値で上書きされます。
    pub fn with_preset(mut self, preset: FormatPreset) -> Self {
        match preset {
            FormatPreset::Verbose => {
                self.config.format.min_bullet_length = 0;
                self.config.format.header_style = HeaderStyle::default();
                self.config.modelfile.conversation_template = true;
                self.config.modelfile.parameters = ModelParameters::default();
            }
            FormatPreset::Compact => {
                self.config.format.min_bullet_length = 3;
                self.config.format.header_style = HeaderStyle::Markdown;
                self.config.modelfile.conversation_template = false;
                self.config.modelfile.parameters = ModelParameters {
                    repeat_penalty: None,
                    ..ModelParameters::default()
                };
            }
        }
        self
    }

    /// 箇条書きにする値の最小文字数を指定する
    ///
    /// トリム後の文字数が`length`以下の値は除外されます。
    pub fn with_min_bullet_length(mut self, length: usize) -> Self {
        self.config.format.min_bullet_length = length;
        self
    }

    /// 汎用ラベル（列名なしで出力する列）を置き換える
    pub fn with_generic_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.format.generic_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_header_style(mut self, style: HeaderStyle) -> Self {
        self.config.format.header_style = style;
        self
    }

    pub fn with_empty_row_policy(mut self, policy: EmptyRowPolicy) -> Self {
        self.config.format.empty_row_policy = policy;
        self
    }

    /// 箇条書きのないカテゴリを省略するかを指定する
    pub fn omit_empty_categories(mut self, omit: bool) -> Self {
        self.config.omit_empty_categories = omit;
        self
    }

    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.format.date_format = format;
        self
    }

    /// 対象のシートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// カテゴリ列を指定する
    ///
    /// シートにこの列が存在する場合、列の値ごとにカテゴリを分割します。
    ///
    /// ```rust,no_run
    /// use sheetprompt::GeneratorBuilder;
    ///
    /// let builder = GeneratorBuilder::new().with_category_column("Catégorie");
    /// ```
    pub fn with_category_column(mut self, column: impl Into<String>) -> Self {
        self.config.category_column = Some(column.into());
        self
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.config.persona = persona;
        self
    }

    /// `FROM` 行のベースモデルを指定する
    pub fn with_base_model(mut self, model: impl Into<String>) -> Self {
        self.config.modelfile.base_model = model.into();
        self
    }

    /// メタデータコメントのタイトルを指定する
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.modelfile.title = title.into();
        self
    }

    pub fn with_parameters(mut self, parameters: ModelParameters) -> Self {
        self.config.modelfile.parameters = parameters;
        self
    }

    pub fn with_conversation_template(mut self, enabled: bool) -> Self {
        self.config.modelfile.conversation_template = enabled;
        self
    }

    pub fn with_metadata_comments(mut self, enabled: bool) -> Self {
        self.config.modelfile.metadata_comments = enabled;
        self
    }

    /// 生成日時をメタデータに記載する
    ///
    /// 指定すると出力が実行ごとに変わるため、再現性が必要な場合は指定しないでください。
    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.config.modelfile.generated_at = Some(generated_at);
        self
    }

    /// デバッグ用コピーの出力先を指定する
    pub fn with_debug_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.debug_path = Some(path.into());
        self
    }

    /// デバッグ用コピーを出力しない
    pub fn without_debug_copy(mut self) -> Self {
        self.config.debug_path = None;
        self
    }

    /// 設定を検証し、`PromptGenerator`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(PromptGenerator)`: 設定が有効な場合
    /// * `Err(SheetPromptError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * ベースモデルが空
    /// * `temperature` が [0, 2] の範囲外、`top_p` が (0, 1] の範囲外
    /// * `top_k` / `num_ctx` が0、`repeat_penalty` が0以下
    /// * 罫線の幅が0
    /// * カスタム日付形式が空、または不正な書式指定子を含む
    /// * カテゴリ列の名前が空
    pub fn build(self) -> Result<PromptGenerator, SheetPromptError> {
        let config = &self.config;

        // 1. Modelfile設定の検証
        if config.modelfile.base_model.trim().is_empty() {
            return Err(SheetPromptError::Config(
                "Base model must not be empty".to_string(),
            ));
        }
        validate_parameters(&config.modelfile.parameters)?;

        // 2. 書式設定の検証
        if let HeaderStyle::Ruled { width: 0 } = config.format.header_style {
            return Err(SheetPromptError::Config(
                "Header rule width must be greater than 0".to_string(),
            ));
        }

        if let DateFormat::Custom(ref format_str) = config.format.date_format {
            let invalid = format_str.is_empty()
                || StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error));
            if invalid {
                return Err(SheetPromptError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 3. 読み込み設定の検証
        if let Some(ref column) = config.category_column {
            if column.trim().is_empty() {
                return Err(SheetPromptError::Config(
                    "Category column name must not be empty".to_string(),
                ));
            }
        }

        Ok(PromptGenerator::new(self.config))
    }
}

fn validate_parameters(parameters: &ModelParameters) -> Result<(), SheetPromptError> {
    let invalid = |name: &str, value: String| {
        Err(SheetPromptError::Config(format!(
            "Invalid parameter {}: {}",
            name, value
        )))
    };

    if let Some(v) = parameters.temperature {
        if !(0.0..=2.0).contains(&v) {
            return invalid("temperature", v.to_string());
        }
    }
    if let Some(v) = parameters.top_p {
        if v == 0.0 || !(0.0..=1.0).contains(&v) {
            return invalid("top_p", v.to_string());
        }
    }
    if parameters.top_k == Some(0) {
        return invalid("top_k", "0".to_string());
    }
    if let Some(v) = parameters.repeat_penalty {
        if v.is_nan() || v <= 0.0 {
            return invalid("repeat_penalty", v.to_string());
        }
    }
    if parameters.num_ctx == Some(0) {
        return invalid("num_ctx", "0".to_string());
    }
    Ok(())
}

/// 生成処理のファサード
///
/// Loader → Formatter → Assembler → Writer の順に処理します。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetprompt::GeneratorBuilder;
///
/// # fn main() -> Result<(), sheetprompt::SheetPromptError> {
/// let generator = GeneratorBuilder::new().build()?;
/// let report = generator.generate("BTS_SIO_Infos.xlsx", "Modelfile")?;
/// println!("{} lignes, {} caractères", report.total_rows(), report.document_chars);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PromptGenerator {
    /// 生成設定
    config: GenerationConfig,

    /// カテゴリフォーマッター
    formatter: CategoryFormatter,

    /// プロンプトアセンブラー
    assembler: PromptAssembler,
}

impl PromptGenerator {
    pub(crate) fn new(config: GenerationConfig) -> Self {
        let rule_width = match config.format.header_style {
            HeaderStyle::Ruled { width } => width,
            _ => 60,
        };
        Self {
            formatter: CategoryFormatter::new(),
            assembler: PromptAssembler::new(
                config.persona.clone(),
                config.omit_empty_categories,
                rule_width,
            ),
            config,
        }
    }

    /// ワークブックを読み込み、カテゴリのリストを返す（Loader）
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<Category>)` - シート順のカテゴリ
    /// * `Err(SheetPromptError::SourceNotFound)` - ファイルが存在しない場合
    /// * `Err(SheetPromptError::SourceUnreadable)` - 表形式データとして読めない場合
    /// * `Err(SheetPromptError::Config)` - 選択したシートが存在しない場合
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Category>, SheetPromptError> {
        let parser = WorkbookParser::open(path.as_ref())?;
        self.collect_categories(parser)
    }

    /// 任意のリーダーからワークブックを読み込む
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Vec<Category>, SheetPromptError> {
        let parser = WorkbookParser::from_reader(Path::new("<memory>"), reader)?;
        self.collect_categories(parser)
    }

    fn collect_categories(
        &self,
        mut parser: WorkbookParser,
    ) -> Result<Vec<Category>, SheetPromptError> {
        let sheet_names = parser.select_sheets(&self.config.sheet_selector)?;

        let mut categories = Vec::new();
        for sheet_name in &sheet_names {
            let category = parser.parse_sheet(sheet_name)?;
            match self.config.category_column {
                Some(ref column) => categories.extend(split_by_column(category, column)),
                None => categories.push(category),
            }
        }

        tracing::debug!(
            sheets = sheet_names.len(),
            categories = categories.len(),
            "loaded workbook"
        );
        Ok(categories)
    }

    /// カテゴリから文書本文を組み立てる（Formatter + Assembler）
    pub fn render_document(&self, categories: &[Category]) -> PromptDocument {
        let blocks: Vec<CategoryBlock> = categories
            .iter()
            .map(|category| self.formatter.format_category(category, &self.config.format))
            .collect();

        self.assembler.assemble(&blocks)
    }

    /// 文書をModelfile形式に包む
    ///
    /// `source`はメタデータコメントに記載する入力ファイル名です。
    pub fn render_modelfile(&self, document: &PromptDocument, source: Option<&str>) -> String {
        ModelfileRenderer.render(&document.body, source, &self.config.modelfile)
    }

    /// ワークブックからModelfileを生成してファイルに書き込む
    ///
    /// # 処理フロー
    ///
    /// 1. ワークブックの読み込み（失敗時は出力ファイルに一切触れない）
    /// 2. カテゴリの整形と文書の組み立て
    /// 3. Modelfileの書き込み
    /// 4. デバッグ用コピーの書き込み（ベストエフォート）
    ///
    /// # 戻り値
    ///
    /// * `Ok(GenerationReport)` - 生成に成功した場合
    /// * `Err(SheetPromptError)` - 読み込みまたは書き込みに失敗した場合
    pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<GenerationReport, SheetPromptError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let categories = self.load(input)?;
        let document = self.render_document(&categories);

        let source = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let modelfile = self.render_modelfile(&document, source.as_deref());

        DocumentWriter.write(output, &modelfile)?;
        tracing::info!(
            output = %output.display(),
            categories = document.report.emitted_categories(),
            "Modelfile written"
        );

        if let Some(ref debug_path) = self.config.debug_path {
            if DocumentWriter.write_debug_copy(debug_path, &document.body) {
                tracing::info!(path = %debug_path.display(), "debug copy written");
            }
        }

        Ok(document.report)
    }

    /// ワークブックをModelfile形式の文字列に変換
    ///
    /// ファイルには何も書き込みません。メタデータの `Source` 行は省略されます。
    pub fn generate_to_string<R: Read>(&self, input: R) -> Result<String, SheetPromptError> {
        let categories = self.load_from_reader(input)?;
        let document = self.render_document(&categories);
        Ok(self.render_modelfile(&document, None))
    }
}

//! Logging Module
//!
//! tracing-subscriberの初期化。ログはすべて標準エラー出力に書き出します。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::SheetPromptError;

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ロガーを初期化する
///
/// # 引数
///
/// * `log_level` - フィルター指定（例: `"debug"`, `"sheetprompt=trace"`）。
///   `None`の場合は環境変数`RUST_LOG`、未設定なら`info`を使用します。
///
/// # 戻り値
///
/// * `Ok(())` - 初期化に成功した場合
/// * `Err(SheetPromptError::Config)` - フィルターが不正、または初期化済みの場合
///
/// # 使用例
///
/// ```rust,no_run
/// sheetprompt::logging::init_logging(None).expect("logging");
/// ```
pub fn init_logging(log_level: Option<&str>) -> Result<(), SheetPromptError> {
    let filter = resolve_filter(log_level, std::env::var("RUST_LOG").ok())?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(std::env::var_os("NO_COLOR").is_none());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| SheetPromptError::Config(format!("Failed to init logging: {}", e)))
}

fn resolve_filter(
    log_level: Option<&str>,
    env_value: Option<String>,
) -> Result<EnvFilter, SheetPromptError> {
    let directive = match (log_level, env_value.as_deref()) {
        (Some(level), _) => level,
        (None, Some(env)) if !env.trim().is_empty() => env,
        _ => DEFAULT_LOG_LEVEL,
    };

    EnvFilter::try_new(directive)
        .map_err(|e| SheetPromptError::Config(format!("Invalid log filter '{}': {}", directive, e)))
}

//! Document Writer
//!
//! 出力ファイルへの書き込み（既存内容は完全に置き換え）。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SheetPromptError;

/// ドキュメントライター
#[derive(Debug)]
pub(crate) struct DocumentWriter;

impl DocumentWriter {
    /// ファイルに書き込む
    ///
    /// ファイルを作成（既存の場合は切り詰め）し、バッファ経由で書き込んだ後フラッシュします。
    /// ハンドルはスコープを抜ける時点で、エラー時も含めて必ず閉じられます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 書き込みに成功した場合
    /// * `Err(SheetPromptError::DestinationWriteError)` - 作成・書き込み・フラッシュに失敗した場合
    pub fn write(&self, path: &Path, contents: &str) -> Result<(), SheetPromptError> {
        let to_error = |source: std::io::Error| SheetPromptError::DestinationWriteError {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(to_error)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents.as_bytes()).map_err(to_error)?;
        writer.flush().map_err(to_error)?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }

    /// デバッグ用のコピーを書き込む（ベストエフォート）
    ///
    /// 失敗しても警告ログを出すだけで、呼び出し元にエラーを返しません。
    ///
    /// # 戻り値
    ///
    /// 書き込みに成功したかどうか
    pub fn write_debug_copy(&self, path: &Path, contents: &str) -> bool {
        match self.write(path, contents) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Debug copy not written: {}", e);
                false
            }
        }
    }
}

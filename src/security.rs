//! Security Module
//!
//! 入力ファイルに対するセキュリティ制限を提供するモジュール。

use crate::error::SheetPromptError;

/// セキュリティ設定
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 入力サイズを検証
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 上限以内の場合
    /// * `Err(SheetPromptError::SecurityViolation)` - 上限を超えた場合
    pub fn check_input_size(&self, bytes: u64) -> Result<(), SheetPromptError> {
        if bytes > self.max_input_file_size {
            return Err(SheetPromptError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes, self.max_input_file_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_input_size_within_limit() {
        let config = SecurityConfig::default();
        assert!(config.check_input_size(0).is_ok());
        assert!(config.check_input_size(2_147_483_648).is_ok());
    }

    #[test]
    fn test_check_input_size_exceeded() {
        let config = SecurityConfig {
            max_input_file_size: 10,
        };
        match config.check_input_size(11) {
            Err(SheetPromptError::SecurityViolation(msg)) => {
                assert!(msg.contains("11 bytes"));
                assert!(msg.contains("max: 10 bytes"));
            }
            other => panic!("Expected SecurityViolation, got {:?}", other),
        }
    }
}

//! Output Module
//!
//! 組み立てた文書をModelfile形式に包み、ファイルへ書き出すモジュール。

mod writer;

pub(crate) use writer::DocumentWriter;

use crate::builder::ModelfileOptions;

/// 会話テンプレート（system / prompt / assistant の各ターン）
const CONVERSATION_TEMPLATE: &str = "{{ if .System }}{{ .System }}{{ end }}\n\n\
                                     {{ if .Prompt }}User: {{ .Prompt }}{{ end }}\n\n\
                                     Assistant: \n";

/// Modelfileレンダラー
///
/// # 出力構造
///
/// ```text
/// # Modelfile - <タイトル>          (メタデータコメント、任意)
/// # Source : <入力ファイル名>
///
/// FROM <ベースモデル>
///
/// SYSTEM """
/// <文書本文>
/// """
///
/// PARAMETER temperature 0.7         (任意)
///
/// TEMPLATE """                       (任意)
/// ...
/// """
/// ```
#[derive(Debug)]
pub(crate) struct ModelfileRenderer;

impl ModelfileRenderer {
    /// Modelfileを生成
    ///
    /// # 引数
    ///
    /// * `body` - 組み立て済みの文書本文
    /// * `source` - メタデータに記載する入力ファイル名（`None`なら省略）
    /// * `options` - Modelfile設定
    pub fn render(&self, body: &str, source: Option<&str>, options: &ModelfileOptions) -> String {
        let mut out = String::new();

        if options.metadata_comments {
            out.push_str(&format!("# Modelfile - {}\n", options.title));
            if let Some(generated_at) = options.generated_at {
                out.push_str(&format!(
                    "# Généré le : {}\n",
                    generated_at.format("%d/%m/%Y à %H:%M")
                ));
            }
            if let Some(source) = source {
                out.push_str(&format!("# Source : {}\n", source));
            }
            out.push('\n');
        }

        out.push_str(&format!("FROM {}\n\n", options.base_model.trim()));

        if options.metadata_comments {
            out.push_str("# Prompt système avec toutes les informations\n");
        }
        out.push_str("SYSTEM \"\"\"\n");
        out.push_str(&escape_triple_quotes(body));
        out.push_str("\n\"\"\"\n");

        let parameters = options.parameters.entries();
        if !parameters.is_empty() {
            out.push('\n');
            if options.metadata_comments {
                out.push_str("# Paramètres optimisés pour l'assistance\n");
            }
            for (key, value) in parameters {
                out.push_str(&format!("PARAMETER {} {}\n", key, value));
            }
        }

        if options.conversation_template {
            out.push('\n');
            if options.metadata_comments {
                out.push_str("# Template de conversation\n");
            }
            out.push_str("TEMPLATE \"\"\"\n");
            out.push_str(CONVERSATION_TEMPLATE);
            out.push_str("\"\"\"\n");
        }

        out
    }
}

/// `"""` はSYSTEMブロックを閉じてしまうため `'''` に置き換える
fn escape_triple_quotes(body: &str) -> String {
    if body.contains("\"\"\"") {
        tracing::debug!("replacing triple quotes in the system prompt");
        body.replace("\"\"\"", "'''")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ModelParameters;
    use chrono::NaiveDate;

    fn render(options: &ModelfileOptions) -> String {
        ModelfileRenderer.render("CORPS", Some("BTS_SIO_Infos.xlsx"), options)
    }

    #[test]
    fn test_render_default() {
        let output = render(&ModelfileOptions::default());

        let expected = "# Modelfile - BTS SIO Saint Louis Châteaulin\n\
                        # Source : BTS_SIO_Infos.xlsx\n\
                        \n\
                        FROM llama3.2\n\
                        \n\
                        # Prompt système avec toutes les informations\n\
                        SYSTEM \"\"\"\n\
                        CORPS\n\
                        \"\"\"\n\
                        \n\
                        # Paramètres optimisés pour l'assistance\n\
                        PARAMETER temperature 0.7\n\
                        PARAMETER top_p 0.9\n\
                        PARAMETER top_k 40\n\
                        PARAMETER repeat_penalty 1.1\n\
                        \n\
                        # Template de conversation\n\
                        TEMPLATE \"\"\"\n\
                        {{ if .System }}{{ .System }}{{ end }}\n\
                        \n\
                        {{ if .Prompt }}User: {{ .Prompt }}{{ end }}\n\
                        \n\
                        Assistant: \n\
                        \"\"\"\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_minimal() {
        let options = ModelfileOptions {
            base_model: "mistral".to_string(),
            parameters: ModelParameters::none(),
            conversation_template: false,
            metadata_comments: false,
            ..Default::default()
        };

        assert_eq!(render(&options), "FROM mistral\n\nSYSTEM \"\"\"\nCORPS\n\"\"\"\n");
    }

    #[test]
    fn test_render_generated_at() {
        let generated_at = NaiveDate::from_ymd_opt(2025, 10, 3)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let options = ModelfileOptions {
            generated_at: Some(generated_at),
            ..Default::default()
        };

        assert!(render(&options).contains("# Généré le : 03/10/2025 à 14:05\n"));
    }

    #[test]
    fn test_render_without_source() {
        let output = ModelfileRenderer.render("CORPS", None, &ModelfileOptions::default());
        assert!(!output.contains("# Source"));
    }

    #[test]
    fn test_triple_quotes_in_body() {
        let output = ModelfileRenderer.render(
            "dit \"\"\"bonjour\"\"\"",
            None,
            &ModelfileOptions::default(),
        );
        assert!(output.contains("dit '''bonjour'''"));
        assert_eq!(output.matches("\"\"\"").count(), 4);
    }

    #[test]
    fn test_num_ctx_parameter() {
        let options = ModelfileOptions {
            parameters: ModelParameters {
                num_ctx: Some(4096),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(render(&options).contains("PARAMETER repeat_penalty 1.1\nPARAMETER num_ctx 4096\n"));
    }
}

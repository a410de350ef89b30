//! Assembler Module
//!
//! ペルソナ前文・カテゴリブロック・締めの指示を連結して
//! 最終的なプロンプト文書を組み立てるモジュール。

use crate::formatter::CategoryBlock;
use crate::types::{CategoryStats, GenerationReport, PromptDocument};

/// アシスタントのペルソナ
///
/// 文書の前文（身元の宣言と行動ルール）と、末尾の回答指示を保持します。
/// デフォルトはBTS SIO（Lycée Saint Louis, Châteaulin）向けのフランス語テキストです。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetprompt::{GeneratorBuilder, Persona};
///
/// # fn main() -> Result<(), sheetprompt::SheetPromptError> {
/// let persona = Persona {
///     identity: "Tu es l'assistant virtuel du CDI.".to_string(),
///     ..Persona::default()
/// };
/// let generator = GeneratorBuilder::new().with_persona(persona).build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// 身元の宣言
    pub identity: String,
    /// 行動ルールの見出し
    pub rules_title: String,
    /// 行動ルール
    pub rules: Vec<String>,
    /// カテゴリブロックの前に置く見出し
    pub knowledge_title: String,
    /// 締めの指示の見出し
    pub closing_title: String,
    /// 締めの指示
    pub closing: Vec<String>,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            identity: "Tu es l'assistant virtuel du BTS SIO (Services Informatiques aux \
                       Organisations) du Lycée Saint Louis à Châteaulin."
                .to_string(),
            rules_title: "RÈGLES IMPORTANTES :".to_string(),
            rules: [
                "Réponds de manière claire, professionnelle et accueillante aux questions sur la formation",
                "Utilise des listes à puces pour les énumérations",
                "Sois chaleureux et amical",
                "Tu peux utiliser des emojis",
                "Donne des informations utiles pour les lycéens et leurs parents",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            knowledge_title: "BASE DE CONNAISSANCES :".to_string(),
            closing_title: "INSTRUCTIONS DE RÉPONSE :".to_string(),
            closing: [
                "Sois enthousiaste et encourageant avec les futurs étudiants",
                "Si une information n'est pas dans ta base de connaissances, propose de contacter directement le lycée",
                "Adapte ton niveau de détail selon la question posée",
                "N'hésite pas à mentionner les points forts de la formation",
                "Utilise des emojis pertinents pour rendre tes réponses plus engageantes",
                "Réponds en français de manière naturelle et fluide",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// プロンプトアセンブラー
#[derive(Debug, Clone)]
pub(crate) struct PromptAssembler {
    persona: Persona,
    /// 箇条書きが0件のカテゴリを省略するか
    omit_empty_categories: bool,
    /// 締めの指示を囲む罫線の幅
    rule_width: usize,
}

impl PromptAssembler {
    pub fn new(persona: Persona, omit_empty_categories: bool, rule_width: usize) -> Self {
        Self {
            persona,
            omit_empty_categories,
            rule_width,
        }
    }

    /// 文書を組み立てる
    ///
    /// 前文 → カテゴリブロック（ソース順）→ 締めの指示 の順に連結します。
    pub fn assemble(&self, blocks: &[CategoryBlock]) -> PromptDocument {
        let mut body = self.preamble();
        let mut stats = Vec::with_capacity(blocks.len());

        for block in blocks {
            let emitted = !(self.omit_empty_categories && block.bullets == 0);
            if emitted {
                body.push('\n');
                body.push_str(&block.text);
            } else {
                tracing::debug!(category = %block.name, "omitting category without bullets");
            }

            stats.push(CategoryStats {
                name: block.name.clone(),
                rows: block.rows,
                bullets: block.bullets,
                emitted,
            });
        }

        body.push_str(&self.closing());

        let document_chars = body.chars().count();
        PromptDocument {
            body,
            report: GenerationReport {
                categories: stats,
                document_chars,
            },
        }
    }

    fn preamble(&self) -> String {
        let persona = &self.persona;
        let mut out = format!("{}\n\n", persona.identity.trim());

        if !persona.rules.is_empty() {
            out.push_str(&persona.rules_title);
            out.push('\n');
            push_list(&mut out, &persona.rules);
            out.push('\n');
        }

        out.push_str(&persona.knowledge_title);
        out.push('\n');
        out
    }

    fn closing(&self) -> String {
        let rule = "=".repeat(self.rule_width);
        let mut out = format!("\n{rule}\n{}\n{rule}\n", self.persona.closing_title);
        push_list(&mut out, &self.persona.closing);
        out
    }
}

fn push_list(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
}

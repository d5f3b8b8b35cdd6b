//! DOCX Export Module
//!
//! 転置済みのアンケートをWord文書（DOCX）に変換するモジュール。
//!
//! 各質問は見出し段落になり、その後に回答者名と回答を区切り文字で連結したリスト段落が
//! 続きます。リストは質問ごとに1から番号が振り直されます。

mod document;
mod numbering;
mod package;

pub(crate) use package::write_package;

use tracing::debug;

use crate::api::ListKind;
use crate::docx::document::DocxDocument;
use crate::error::XlsxToDocxError;
use crate::survey::Survey;

/// 質問見出しのアウトラインレベル
const QUESTION_HEADING_LEVEL: u8 = 1;
/// 回答者名に適用する文字スタイル
const RESPONDENT_STYLE: &str = "Emphasis";
/// 回答者名と回答の区切り
pub(crate) const SEPARATOR: &str = " — ";

/// アンケートから文書を組み立てる
///
/// 回答者名と回答の両方が偽値（空・数値0・FALSE）のペアは段落を出力せず、
/// リストの継続状態も進めません。
pub(crate) fn export(survey: &Survey, kind: ListKind) -> Result<DocxDocument, XlsxToDocxError> {
    let mut document = DocxDocument::new()?;

    for record in &survey.questions {
        document.add_heading(&record.question, QUESTION_HEADING_LEVEL);

        let mut prev = None;
        for answer in record.visible_answers() {
            let paragraph = document.add_paragraph(Some(kind.style_id()));
            document.add_run(paragraph, &answer.respondent, Some(RESPONDENT_STYLE), true);
            document.add_run(paragraph, SEPARATOR, None, false);
            document.add_run(paragraph, &answer.answer, None, false);

            document.list_number(paragraph, prev, None, kind);
            prev = Some(paragraph);
        }

        debug!(
            question = record.question.as_str(),
            answers = record.answers.len(),
            "question exported"
        );
    }

    Ok(document)
}

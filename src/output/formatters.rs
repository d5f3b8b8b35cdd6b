//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use std::io::{Cursor, Write};

use crate::api::ListKind;
use crate::docx::{self, SEPARATOR};
use crate::error::XlsxToDocxError;
use crate::survey::Survey;

/// DOCX形式のフォーマッター
pub(crate) struct DocxFormatter;

impl DocxFormatter {
    /// ZIPの書き出しには`Seek`が必要なため、メモリ上で組み立ててから書き込む
    pub fn render<W: Write>(
        &self,
        survey: &Survey,
        kind: ListKind,
        writer: &mut W,
    ) -> Result<(), XlsxToDocxError> {
        let document = docx::export(survey, kind)?;

        let mut buffer = Cursor::new(Vec::new());
        docx::write_package(&document, &mut buffer)?;

        writer.write_all(buffer.get_ref())?;
        writer.flush()?;
        Ok(())
    }
}

/// Markdown形式のフォーマッター
///
/// 質問を`#`見出しとし、回答を番号付きリスト（または箇条書き）で出力します。
/// 番号は質問ごとに1から振り直します。
pub(crate) struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(
        &self,
        survey: &Survey,
        kind: ListKind,
        writer: &mut W,
    ) -> Result<(), XlsxToDocxError> {
        for (i, record) in survey.questions.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "# {}", escape_line(&record.question))?;

            let mut visible = record.visible_answers().peekable();
            if visible.peek().is_some() {
                writeln!(writer)?;
            }
            for (n, answer) in visible.enumerate() {
                let marker = match kind {
                    ListKind::Numbered => format!("{}.", n + 1),
                    ListKind::Bulleted => "-".to_string(),
                };
                let respondent = if answer.respondent.is_empty() {
                    String::new()
                } else {
                    format!("**{}**", escape_line(&answer.respondent))
                };
                writeln!(
                    writer,
                    "{} {}{}{}",
                    marker,
                    respondent,
                    SEPARATOR,
                    escape_line(&answer.answer)
                )?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

/// セル内の改行を`<br>`に置き換え、1行に収める
fn escape_line(text: &str) -> String {
    text.replace("\r\n", "<br>").replace('\n', "<br>")
}

/// JSON形式のフォーマッター
pub(crate) struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(
        &self,
        survey: &Survey,
        writer: &mut W,
    ) -> Result<(), XlsxToDocxError> {
        serde_json::to_writer_pretty(&mut *writer, &survey.questions)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use std::io::Write;

use crate::api::{ListKind, OutputFormat};
use crate::error::XlsxToDocxError;
use crate::survey::Survey;

pub(crate) use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（DOCX, Markdown, JSON）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter {
    Docx,
    Markdown,
    Json,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Docx => OutputFormatter::Docx,
            OutputFormat::Markdown => OutputFormatter::Markdown,
            OutputFormat::Json => OutputFormatter::Json,
        }
    }

    /// アンケートを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `survey` - 出力するアンケート
    /// * `kind` - リストの種類（DOCX・Markdownで使用）
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(XlsxToDocxError)` - エラーが発生した場合
    pub fn render<W: Write>(
        &self,
        survey: &Survey,
        kind: ListKind,
        writer: &mut W,
    ) -> Result<(), XlsxToDocxError> {
        match self {
            OutputFormatter::Docx => DocxFormatter.render(survey, kind, writer),
            OutputFormatter::Markdown => MarkdownFormatter.render(survey, kind, writer),
            OutputFormatter::Json => JsonFormatter.render(survey, writer),
        }
    }
}

//! Document Builder Module
//!
//! 段落とランを順に追加していく最小限のWordprocessingML文書モデル。
//! リスト段落の番号付けは文書が所有する[`NumberingRegistry`]に委譲します。

use std::io::Write;

use quick_xml::Writer;

use crate::api::ListKind;
use crate::docx::numbering::{ListHandle, NumberingRegistry};
use crate::error::XlsxToDocxError;
use crate::xml;

/// 文書内の段落を指すID（追加順のインデックス）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ParagraphId(usize);

/// 書式付きテキストの断片（`w:r`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Run {
    pub text: String,
    /// 文字スタイルID（`w:rStyle`）
    pub style: Option<String>,
    pub bold: bool,
}

/// 段落（`w:p`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Paragraph {
    /// 段落スタイルID（`w:pStyle`）
    pub style: Option<String>,
    pub runs: Vec<Run>,
    /// 番号付けのプロパティ（`w:numPr`）
    pub numbering: Option<ListHandle>,
}

impl Paragraph {
    /// 段落のテキスト（全ランの連結）
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// 追加専用の文書ビルダー
#[derive(Debug, Clone)]
pub(crate) struct DocxDocument {
    paragraphs: Vec<Paragraph>,
    numbering: NumberingRegistry,
}

impl DocxDocument {
    /// 既定テンプレート（スタイルと番号定義）から空の文書を作成
    pub fn new() -> Result<Self, XlsxToDocxError> {
        Ok(Self {
            paragraphs: Vec::new(),
            numbering: NumberingRegistry::with_default_template()?,
        })
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    #[cfg(test)]
    pub fn paragraph(&self, id: ParagraphId) -> &Paragraph {
        &self.paragraphs[id.0]
    }

    pub fn numbering(&self) -> &NumberingRegistry {
        &self.numbering
    }

    /// 見出し段落を追加（スタイル`Heading{level}`）
    pub fn add_heading(&mut self, text: &str, level: u8) -> ParagraphId {
        let id = self.add_paragraph(Some(format!("Heading{}", level).as_str()));
        self.add_run(id, text, None, false);
        id
    }

    /// 空の段落を追加
    pub fn add_paragraph(&mut self, style: Option<&str>) -> ParagraphId {
        self.paragraphs.push(Paragraph {
            style: style.map(str::to_string),
            ..Default::default()
        });
        ParagraphId(self.paragraphs.len() - 1)
    }

    /// 段落の末尾にランを追加
    pub fn add_run(&mut self, paragraph: ParagraphId, text: &str, style: Option<&str>, bold: bool) {
        self.paragraphs[paragraph.0].runs.push(Run {
            text: text.to_string(),
            style: style.map(str::to_string),
            bold,
        });
    }

    /// 段落に番号を付ける
    ///
    /// `prev`が番号を持たない（または`None`の）場合は1から始まる新しいリストを
    /// 開始し、それ以外は`prev`のリストを継続します。`level`を省略すると、
    /// 新しいリストではレベル0、継続では`prev`のレベルになります。
    pub fn list_number(
        &mut self,
        paragraph: ParagraphId,
        prev: Option<ParagraphId>,
        level: Option<u8>,
        kind: ListKind,
    ) {
        let previous = prev.and_then(|p| self.paragraphs[p.0].numbering);

        let handle = match previous {
            Some(previous) => self.numbering.continue_list(previous, level),
            None => {
                let style = self.paragraphs[paragraph.0].style.clone();
                self.numbering
                    .start_list(style.as_deref(), level.unwrap_or(0), kind)
            }
        };
        self.paragraphs[paragraph.0].numbering = Some(handle);
    }

    /// `word/document.xml`として書き出す
    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XlsxToDocxError> {
        xml::declaration(writer)?;
        xml::start(writer, "w:document", &[("xmlns:w", xml::W_NS)])?;
        xml::start(writer, "w:body", &[])?;

        for paragraph in &self.paragraphs {
            write_paragraph(writer, paragraph)?;
        }

        // A4縦、余白1インチ
        xml::start(writer, "w:sectPr", &[])?;
        xml::empty(writer, "w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
        xml::empty(
            writer,
            "w:pgMar",
            &[
                ("w:top", "1440"),
                ("w:right", "1440"),
                ("w:bottom", "1440"),
                ("w:left", "1440"),
                ("w:header", "720"),
                ("w:footer", "720"),
                ("w:gutter", "0"),
            ],
        )?;
        xml::end(writer, "w:sectPr")?;

        xml::end(writer, "w:body")?;
        xml::end(writer, "w:document")
    }
}

fn write_paragraph<W: Write>(
    writer: &mut Writer<W>,
    paragraph: &Paragraph,
) -> Result<(), XlsxToDocxError> {
    xml::start(writer, "w:p", &[])?;

    if paragraph.style.is_some() || paragraph.numbering.is_some() {
        xml::start(writer, "w:pPr", &[])?;
        if let Some(ref style) = paragraph.style {
            xml::empty(writer, "w:pStyle", &[("w:val", style.as_str())])?;
        }
        if let Some(handle) = paragraph.numbering {
            xml::start(writer, "w:numPr", &[])?;
            xml::empty(writer, "w:ilvl", &[("w:val", handle.level.to_string().as_str())])?;
            xml::empty(writer, "w:numId", &[("w:val", handle.num_id.to_string().as_str())])?;
            xml::end(writer, "w:numPr")?;
        }
        xml::end(writer, "w:pPr")?;
    }

    for run in &paragraph.runs {
        write_run(writer, run)?;
    }

    xml::end(writer, "w:p")
}

fn write_run<W: Write>(writer: &mut Writer<W>, run: &Run) -> Result<(), XlsxToDocxError> {
    xml::start(writer, "w:r", &[])?;

    if run.style.is_some() || run.bold {
        xml::start(writer, "w:rPr", &[])?;
        if let Some(ref style) = run.style {
            xml::empty(writer, "w:rStyle", &[("w:val", style.as_str())])?;
        }
        if run.bold {
            xml::empty(writer, "w:b", &[])?;
        }
        xml::end(writer, "w:rPr")?;
    }

    // セル内の改行と垂直タブ（Wordの手動改行）は<w:br/>として出力
    for (i, line) in run.text.split(['\n', '\u{B}']).enumerate() {
        if i > 0 {
            xml::empty(writer, "w:br", &[])?;
        }
        xml::start(writer, "w:t", &[("xml:space", "preserve")])?;
        xml::text(writer, line)?;
        xml::end(writer, "w:t")?;
    }

    xml::end(writer, "w:r")
}

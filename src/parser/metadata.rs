//! XML Metadata Parser Module
//!
//! XLSX内部の`xl/workbook.xml`から、calamineで取得できない情報を抽出するモジュール。
//! アクティブシートのインデックスと1904年エポック判定を提供します。

use std::io::{Read, Seek};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::XlsxToDocxError;
use crate::security::SecurityConfig;
use crate::xml::attribute;

/// ワークブックのメタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WorkbookMetadata {
    /// アクティブシートのインデックス（`<workbookView activeTab="..."/>`）
    pub active_tab: usize,
    /// 1904年エポックを使用するかどうか（`<workbookPr date1904="1"/>`）
    pub is_1904: bool,
}

impl WorkbookMetadata {
    /// XLSXファイル（ZIPアーカイブ）からメタデータを解析
    ///
    /// アーカイブはセキュリティ制限で検査してから読み込みます。
    /// `xl/workbook.xml`が存在しない場合はデフォルト値を返します。
    pub fn parse<R: Read + Seek>(xlsx_reader: R) -> Result<Self, XlsxToDocxError> {
        let mut archive = ZipArchive::new(xlsx_reader)?;
        SecurityConfig::default().check_archive(&mut archive)?;

        let mut xml_content = Vec::new();
        match archive.by_name("xl/workbook.xml") {
            Ok(mut file) => {
                file.read_to_end(&mut xml_content)?;
            }
            Err(_) => return Ok(Self::default()),
        }

        Self::from_workbook_xml(&xml_content)
    }

    /// `xl/workbook.xml`の内容を解析
    pub fn from_workbook_xml(xml_content: &[u8]) -> Result<Self, XlsxToDocxError> {
        let mut reader = Reader::from_reader(xml_content);
        reader.trim_text(true);

        let mut metadata = Self::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                // workbookPr / workbookView は通常空要素として書かれる
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"workbookPr" => {
                        if let Some(value) = attribute(&e, b"date1904")? {
                            metadata.is_1904 = value == "1" || value == "true";
                        }
                    }
                    b"workbookView" => {
                        if let Some(value) = attribute(&e, b"activeTab")? {
                            metadata.active_tab = value.parse()?;
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_defaults() {
        let xml = br#"<workbook><sheets><sheet name="A" sheetId="1"/></sheets></workbook>"#;
        let metadata = WorkbookMetadata::from_workbook_xml(xml).unwrap();
        assert_eq!(metadata, WorkbookMetadata::default());
    }

    #[test]
    fn test_workbook_active_tab_and_epoch() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <workbookPr date1904="1"/>
  <bookViews><workbookView xWindow="0" activeTab="2"/></bookViews>
</workbook>"#;
        let metadata = WorkbookMetadata::from_workbook_xml(xml).unwrap();
        assert_eq!(metadata.active_tab, 2);
        assert!(metadata.is_1904);
    }

    #[test]
    fn test_workbook_invalid_active_tab() {
        let xml = br#"<workbook><bookViews><workbookView activeTab="x"/></bookViews></workbook>"#;
        assert!(matches!(
            WorkbookMetadata::from_workbook_xml(xml),
            Err(XlsxToDocxError::ParseInt(_))
        ));
    }
}

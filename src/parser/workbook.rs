//! Workbook Parser Module
//!
//! calamineのラッパーとして、ワークブックを開き、選択したシートを
//! 列単位のセルグリッド（[`Sheet`]）として取り出します。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use std::io::Cursor;
use tracing::debug;

use crate::api::{DateFormat, SheetSelector};
use crate::error::XlsxToDocxError;
use crate::formatter::CellFormatter;
use crate::parser::WorkbookMetadata;
use crate::survey::{Cell, Sheet};
use crate::types::CellValue;

/// ワークブックパーサー
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
    /// `xl/workbook.xml`から取得したメタデータ
    metadata: WorkbookMetadata,
}

impl WorkbookParser {
    /// メモリ上のXLSXデータからワークブックを開く
    ///
    /// calamineでワークブックを開いた後、アーカイブを検査しつつ
    /// `xl/workbook.xml`のメタデータを解析します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(XlsxToDocxError::Parse)` - ワークブックとして読み込めない場合
    /// * `Err(XlsxToDocxError::Config)` - XLSX以外の形式の場合
    pub fn open(buffer: Vec<u8>) -> Result<Self, XlsxToDocxError> {
        let metadata = WorkbookMetadata::parse(Cursor::new(buffer.as_slice()))?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(XlsxToDocxError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        Ok(Self { workbook, metadata })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シート選択方式に基づいて1枚のシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(XlsxToDocxError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, XlsxToDocxError> {
        let names = self.sheet_names();
        if names.is_empty() {
            return Err(XlsxToDocxError::Config(
                "Workbook contains no sheets".to_string(),
            ));
        }

        let by_index = |index: usize| {
            names.get(index).cloned().ok_or_else(|| {
                XlsxToDocxError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    names.len()
                ))
            })
        };

        match selector {
            // activeTabが壊れている場合は最初のシートにフォールバック
            SheetSelector::Active => {
                Ok(by_index(self.metadata.active_tab).unwrap_or_else(|_| names[0].clone()))
            }
            SheetSelector::Index(index) => by_index(*index),
            SheetSelector::Name(name) => {
                if names.contains(name) {
                    Ok(name.clone())
                } else {
                    Err(XlsxToDocxError::Config(format!("Sheet '{}' not found", name)))
                }
            }
        }
    }

    /// シートを読み込み、セルをテキストに変換した列単位のグリッドを返す
    ///
    /// calamineの範囲は最初の非空セルから始まるため、A1を原点とする
    /// 絶対座標に展開します（先頭の空行・空列も列番号に数える）。
    pub fn read_sheet(
        &mut self,
        sheet_name: &str,
        formatter: &CellFormatter,
        date_format: &DateFormat,
    ) -> Result<Sheet, XlsxToDocxError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| XlsxToDocxError::Parse(e.into()))?;

        let sheet = range_to_sheet(&range, formatter, date_format, self.metadata.is_1904)?;
        debug!(
            sheet = sheet_name,
            columns = sheet.column_count(),
            "sheet loaded"
        );
        Ok(sheet)
    }
}

/// calamineの範囲を列単位のセルグリッドに変換
fn range_to_sheet(
    range: &Range<Data>,
    formatter: &CellFormatter,
    date_format: &DateFormat,
    is_1904: bool,
) -> Result<Sheet, XlsxToDocxError> {
    let Some((last_row, last_col)) = range.end() else {
        return Ok(Sheet::default());
    };

    let mut columns = Vec::with_capacity(last_col as usize + 1);
    for col in 0..=last_col {
        let mut column = Vec::with_capacity(last_row as usize + 1);
        for row in 0..=last_row {
            let cell = match range.get_value((row, col)) {
                Some(data) => {
                    let value = CellValue::from(data);
                    let text = formatter.to_text(&value, date_format, is_1904)?;
                    Cell::new(text, value.is_falsy())
                }
                None => Cell::default(),
            };
            column.push(cell);
        }
        columns.push(column);
    }

    Ok(Sheet::from_columns(columns))
}

//! Parser Module
//!
//! calamineを使用したExcelファイル解析の実装。
//! 選択した1枚のシートを列単位のセルグリッドとして取り出します。

mod metadata;
mod workbook;

pub(crate) use metadata::WorkbookMetadata;
pub(crate) use workbook::WorkbookParser;

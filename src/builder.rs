//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::io::{Read, Write};

use chrono::format::{Item, StrftimeItems};
use tracing::debug;

use crate::api::{DateFormat, ListKind, OutputFormat, SheetSelector};
use crate::error::XlsxToDocxError;
use crate::formatter::{CellFormatter, DateFormatter};
use crate::output::OutputFormatter;
use crate::parser::WorkbookParser;
use crate::security::SecurityConfig;
use crate::survey::{transpose, Survey};

/// 変換設定（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 日付形式
    pub date_format: DateFormat,

    /// リストの種類
    pub list_kind: ListKind,

    /// 出力フォーマット
    pub output_format: OutputFormat,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::Active,
            date_format: DateFormat::Iso8601,
            list_kind: ListKind::Numbered,
            output_format: OutputFormat::Docx,
        }
    }
}

/// コンバーター構築用のビルダー
///
/// # 使用例
///
/// ```rust
/// use xlsxdocx::{ConverterBuilder, ListKind, OutputFormat, SheetSelector};
///
/// # fn main() -> Result<(), xlsxdocx::XlsxToDocxError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Index(0))
///     .with_list_kind(ListKind::Bulleted)
///     .with_output_format(OutputFormat::Markdown)
///     .build()?;
/// assert_eq!(converter.output_format(), OutputFormat::Markdown);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定でビルダーを作成
    ///
    /// - シート: アクティブシート
    /// - 日付形式: ISO 8601
    /// - リスト: 番号付き
    /// - 出力: DOCX
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 変換するシートを指定
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 日付セルの出力形式を指定
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// リストの種類を指定
    pub fn with_list_kind(mut self, kind: ListKind) -> Self {
        self.config.list_kind = kind;
        self
    }

    /// 出力フォーマットを指定
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 設定を検証してコンバーターを生成
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)` - 設定が有効な場合
    /// * `Err(XlsxToDocxError::Config)` - カスタム日付形式が空、または解釈できない場合
    pub fn build(self) -> Result<Converter, XlsxToDocxError> {
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            if format_str.is_empty() {
                return Err(XlsxToDocxError::Config(
                    "Date format string must not be empty".to_string(),
                ));
            }
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(XlsxToDocxError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
            DateFormatter::validate(format_str)?;
        }

        Ok(Converter::new(self.config))
    }
}

/// XLSX → 文書コンバーター
///
/// [`ConverterBuilder`]で構築します。状態を持たないため、複数スレッドから
/// 同時に使用できます。
#[derive(Debug)]
pub struct Converter {
    pub(crate) config: ConversionConfig,
    formatter: CellFormatter,
    security: SecurityConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            formatter: CellFormatter::new(),
            security: SecurityConfig::default(),
        }
    }

    /// 出力フォーマット
    pub fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    /// ワークブックを読み込み、選択したシートを転置する
    ///
    /// # 処理フロー
    ///
    /// 1. 入力をメモリに読み込み、サイズ上限を検査
    /// 2. ワークブックを開く（アーカイブの検査とメタデータの解析を含む）
    /// 3. シートを1枚選択し、セルをテキストに変換
    /// 4. 列単位で転置
    pub fn parse<R: Read>(&self, mut input: R) -> Result<Survey, XlsxToDocxError> {
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer)?;
        self.security.check_input_size(buffer.len() as u64)?;

        let mut parser = WorkbookParser::open(buffer)?;
        let sheet_name = parser.select_sheet(&self.config.sheet_selector)?;
        let sheet = parser.read_sheet(&sheet_name, &self.formatter, &self.config.date_format)?;

        let survey = transpose(&sheet)?;
        debug!(
            sheet = sheet_name.as_str(),
            questions = survey.len(),
            "sheet transposed"
        );
        Ok(survey)
    }

    /// 転置済みのアンケートを設定された出力フォーマットで書き出す
    pub fn render<W: Write>(&self, survey: &Survey, mut output: W) -> Result<(), XlsxToDocxError> {
        OutputFormatter::from_format(self.config.output_format).render(
            survey,
            self.config.list_kind,
            &mut output,
        )
    }

    /// XLSXを読み込み、文書として書き出す
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxdocx::ConverterBuilder;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), xlsxdocx::XlsxToDocxError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let input = File::open("survey.xlsx")?;
    /// let output = File::create("survey.docx")?;
    /// converter.convert(input, output)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<R: Read, W: Write>(&self, input: R, output: W) -> Result<(), XlsxToDocxError> {
        let survey = self.parse(input)?;
        self.render(&survey, output)
    }

    /// XLSXを読み込み、文書のバイト列を返す
    pub fn convert_to_bytes<R: Read>(&self, input: R) -> Result<Vec<u8>, XlsxToDocxError> {
        let mut buffer = Vec::new();
        self.convert(input, &mut buffer)?;
        Ok(buffer)
    }
}

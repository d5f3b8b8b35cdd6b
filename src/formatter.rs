//! Formatter Module
//!
//! セル値を回答テキストに変換するモジュール。
//! 質問・回答者名・回答はすべてこのモジュールでテキストに揃えられます。

use std::fmt::Write;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::api::DateFormat;
use crate::error::XlsxToDocxError;
use crate::types::CellValue;

/// 1日あたりの秒数
const SECONDS_PER_DAY: f64 = 86_400.0;

/// セルフォーマッター
///
/// セル値のテキスト化のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    date_formatter: DateFormatter,
}

impl CellFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// セル値をテキストに変換
    ///
    /// # 引数
    ///
    /// * `value` - セル値
    /// * `date_format` - 日付の出力形式
    /// * `is_1904` - 1904年エポックを使用するかどうか
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 変換後のテキスト（空セルは空文字列）
    /// * `Err(XlsxToDocxError)` - 日付の計算に失敗した場合
    pub fn to_text(
        &self,
        value: &CellValue,
        date_format: &DateFormat,
        is_1904: bool,
    ) -> Result<String, XlsxToDocxError> {
        let text = match value {
            // f64のDisplayは整数値を "3" のように小数点なしで出力する
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(serial) => {
                self.date_formatter.format(*serial, date_format, is_1904)?
            }
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        };
        Ok(text)
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を文字列に変換します。
#[derive(Debug, Default)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// シリアル値をフォーマット
    ///
    /// # エポックシステム
    ///
    /// - 1900年システム: 1899年12月30日起算。シリアル値60（存在しない1900年2月29日）
    ///   より前は1日ずれるため補正します。シリアル値1 = 1900年1月1日
    /// - 1904年システム: 1904年1月1日起算。シリアル値0 = 1904年1月1日
    pub fn format(
        &self,
        serial_value: f64,
        date_format: &DateFormat,
        is_1904: bool,
    ) -> Result<String, XlsxToDocxError> {
        let datetime = Self::to_datetime(serial_value, is_1904)?;
        let has_time = serial_value.fract() != 0.0;

        match date_format {
            DateFormat::Iso8601 if has_time => render(&datetime, "%Y-%m-%d %H:%M:%S"),
            DateFormat::Iso8601 => render(&datetime, "%Y-%m-%d"),
            DateFormat::Custom(format_str) => render(&datetime, format_str),
        }
    }

    /// 書式文字列がタイムゾーンなしの日時に適用できるか検証
    ///
    /// `%z`や`%Z`のようにオフセットを必要とする指定子はエラーになります。
    pub fn validate(format_str: &str) -> Result<(), XlsxToDocxError> {
        let sample = Self::to_datetime(0.0, false)?;
        render(&sample, format_str).map(|_| ())
    }

    fn to_datetime(serial_value: f64, is_1904: bool) -> Result<NaiveDateTime, XlsxToDocxError> {
        let (year, month, day) = if is_1904 { (1904, 1, 1) } else { (1899, 12, 30) };
        let epoch = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| XlsxToDocxError::Config("Invalid epoch date".to_string()))?;

        let mut days = serial_value.floor() as i64;
        if !is_1904 && days < 60 {
            days += 1;
        }
        let seconds = (serial_value.fract() * SECONDS_PER_DAY).round() as i64;

        epoch
            .checked_add_signed(Duration::days(days))
            .and_then(|dt| dt.checked_add_signed(Duration::seconds(seconds)))
            .ok_or_else(|| {
                XlsxToDocxError::Config(format!(
                    "Date calculation overflow: serial_value={}, is_1904={}",
                    serial_value, is_1904
                ))
            })
    }
}

fn render(datetime: &NaiveDateTime, format_str: &str) -> Result<String, XlsxToDocxError> {
    let mut formatted = String::new();
    write!(formatted, "{}", datetime.format(format_str)).map_err(|_| {
        XlsxToDocxError::Config(format!(
            "Date format '{}' cannot be applied to a date without time zone",
            format_str
        ))
    })?;
    Ok(formatted)
}

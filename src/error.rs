//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;
use thiserror::Error;

/// xlsxdocxクレート全体で使用するエラー型
///
/// ワークブックの読み込み、シートの転置、文書の書き出し、ディレクトリ単位の
/// バッチ処理で発生するすべてのエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io`: ファイルの読み書きに失敗した（出力先に書き込めない場合を含む）
/// - `Parse`: calamineがワークブックを解析できなかった
/// - `Shape`: ヘッダー列とデータ列の長さが一致しない
/// - `Config`: 設定の検証に失敗した
/// - `Batch`: バッチ処理中の特定ファイルで失敗した（元のエラーを保持）
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdocx::{ConverterBuilder, XlsxToDocxError};
/// use std::fs::File;
///
/// fn convert(path: &str) -> Result<Vec<u8>, XlsxToDocxError> {
///     let converter = ConverterBuilder::new().build()?;
///     let input = File::open(path)?; // Ioエラーが自動的に変換される
///     converter.convert_to_bytes(input)
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxToDocxError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイル、サポートされていない形式などが
    /// 原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// XMLの読み書き中に発生したエラー（quick-xml由来）
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSONの書き出しエラー（serde_json由来）
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIPアーカイブの読み書きエラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 数値の解析エラー
    ///
    /// XML属性値から数値への変換に失敗した場合に発生します。
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// 設定の検証に失敗したエラー
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxdocx::{ConverterBuilder, DateFormat, XlsxToDocxError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom(String::new()))
    ///     .build();
    ///
    /// if let Err(XlsxToDocxError::Config(msg)) = result {
    ///     println!("設定エラー: {}", msg);
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// シートの形状が転置できないエラー
    ///
    /// データ列の長さがヘッダー列の長さと一致しない場合、またはシートに
    /// ヘッダー列が存在しない場合に発生します。`column`は0始まりの列番号です。
    #[error("Malformed sheet at column {column}: expected {expected} cells, found {actual}")]
    Shape {
        /// 問題のある列（0始まり）
        column: usize,
        /// 期待されるセル数
        expected: usize,
        /// 実際のセル数
        actual: usize,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb、パストラバーサル、入力ファイルサイズ上限などの制限に違反した場合に
    /// 発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// バッチ処理中の特定ファイルで発生したエラー
    #[error("Failed to convert '{}': {source}", path.display())]
    Batch {
        /// 失敗した入力ファイル
        path: PathBuf,
        /// 元のエラー
        source: Box<XlsxToDocxError>,
    },
}

impl XlsxToDocxError {
    /// バッチ処理のファイルパス情報を付与する
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        XlsxToDocxError::Batch {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<zip::result::ZipError> for XlsxToDocxError {
    fn from(err: zip::result::ZipError) -> Self {
        XlsxToDocxError::Zip(err.to_string())
    }
}

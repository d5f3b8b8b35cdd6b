//! Batch Conversion Module
//!
//! 入力ディレクトリ内のすべてのXLSXファイルを変換し、出力ディレクトリに
//! 1ファイルにつき1つの文書を書き出すモジュール。

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::builder::Converter;
use crate::error::XlsxToDocxError;

/// 入力ファイルの拡張子（大文字小文字は区別しない）
const INPUT_EXTENSION: &str = "xlsx";
/// Excelが編集中に作成するロックファイルの接頭辞
const LOCK_FILE_PREFIX: &str = "~$";

/// バッチ処理の設定
///
/// # 使用例
///
/// ```rust
/// use xlsxdocx::BatchOptions;
///
/// let options = BatchOptions::new("surveys", "documents")
///     .with_keep_going(true)
///     .with_parallel(true);
/// assert!(options.keep_going());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    input_dir: PathBuf,
    output_dir: PathBuf,
    keep_going: bool,
    parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new("input", "output")
    }
}

impl BatchOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            keep_going: false,
            parallel: false,
        }
    }

    /// 失敗したファイルを記録して処理を続けるかどうか
    ///
    /// `false`（デフォルト）の場合、最初の失敗で処理を中断します。
    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// ファイルを並列に変換するかどうか
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn keep_going(&self) -> bool {
        self.keep_going
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

/// バッチ処理の結果
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 書き出した文書のパス（入力ファイル名順）
    pub converted: Vec<PathBuf>,
    /// 失敗したファイルのエラー（`keep_going`が有効な場合のみ記録される）
    pub failed: Vec<XlsxToDocxError>,
}

impl BatchReport {
    /// すべてのファイルが変換されたかどうか
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 入力ディレクトリ直下のXLSXファイルをファイル名順に列挙する
///
/// サブディレクトリは探索しません。Excelのロックファイル（`~$`で始まる）は除外します。
pub fn discover_inputs(input_dir: &Path) -> Result<Vec<PathBuf>, XlsxToDocxError> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        // シンボリックリンクはリンク先で判定する
        if !path.is_file() {
            continue;
        }

        let is_xlsx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOCK_FILE_PREFIX));

        if is_xlsx && !is_lock_file {
            inputs.push(path);
        }
    }

    inputs.sort();
    Ok(inputs)
}

impl Converter {
    /// 入力ディレクトリ内のすべてのXLSXファイルを変換する
    ///
    /// 出力ファイル名は`<入力ファイル名（拡張子なし）>.<出力フォーマットの拡張子>`です。
    /// 文書は変換に成功した後にだけ書き出されるため、失敗したファイルの出力が
    /// 途中まで書かれることはありません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(BatchReport)` - 処理結果（`keep_going`が無効な場合は`failed`は常に空）
    /// * `Err(XlsxToDocxError::Batch)` - `keep_going`が無効で、いずれかのファイルが失敗した場合
    /// * `Err(XlsxToDocxError::Io)` - 入力ディレクトリを読めない、または出力ディレクトリを作成できない場合
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxdocx::{BatchOptions, ConverterBuilder};
    ///
    /// # fn main() -> Result<(), xlsxdocx::XlsxToDocxError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let report = converter.convert_dir(&BatchOptions::default())?;
    /// println!("{} documents written", report.converted.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_dir(&self, options: &BatchOptions) -> Result<BatchReport, XlsxToDocxError> {
        let inputs = discover_inputs(options.input_dir())?;
        fs::create_dir_all(options.output_dir())?;

        let mut report = BatchReport::default();

        if options.parallel() {
            // 結果は入力ファイル名順に集計する
            let results: Vec<_> = inputs
                .par_iter()
                .map(|path| self.convert_file(path, options.output_dir()))
                .collect();
            for result in results {
                record(&mut report, result, options.keep_going())?;
            }
        } else {
            for path in &inputs {
                let result = self.convert_file(path, options.output_dir());
                record(&mut report, result, options.keep_going())?;
            }
        }

        info!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        Ok(report)
    }

    /// 1ファイルを変換し、書き出した文書のパスを返す
    fn convert_file(&self, input: &Path, output_dir: &Path) -> Result<PathBuf, XlsxToDocxError> {
        info!("parsing {}", input.display());

        let convert = || -> Result<PathBuf, XlsxToDocxError> {
            let bytes = self.convert_to_bytes(File::open(input)?)?;

            // `with_extension`は`a.v2`のような名前の末尾を置き換えてしまう
            let mut file_name = input.file_stem().unwrap_or_default().to_os_string();
            file_name.push(".");
            file_name.push(self.output_format().extension());
            let output = output_dir.join(file_name);
            fs::write(&output, bytes)?;
            Ok(output)
        };

        convert().map_err(|e| e.in_file(input))
    }
}

fn record(
    report: &mut BatchReport,
    result: Result<PathBuf, XlsxToDocxError>,
    keep_going: bool,
) -> Result<(), XlsxToDocxError> {
    match result {
        Ok(output) => report.converted.push(output),
        Err(e) if keep_going => {
            warn!("{}", e);
            report.failed.push(e);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

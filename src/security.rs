//! Security Module
//!
//! 入力ファイルに対するリソース制限を提供するモジュール。
//! 巨大な入力、ZIP bomb、アーカイブ内のパストラバーサルを読み込み前に拒否します。

use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::XlsxToDocxError;

/// セキュリティ設定
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 展開後の合計最大サイズ（デフォルト: 1GiB）
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大エントリ数（デフォルト: 10000）
    pub max_file_count: usize,
    /// 単一エントリの最大サイズ（デフォルト: 100MiB）
    pub max_file_size: u64,
    /// 入力ファイルの最大サイズ（デフォルト: 2GiB）
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 1 << 30,
            max_file_count: 10_000,
            max_file_size: 100 << 20,
            max_input_file_size: 2 << 30,
        }
    }
}

impl SecurityConfig {
    /// 入力ファイルサイズの上限チェック
    pub fn check_input_size(&self, len: u64) -> Result<(), XlsxToDocxError> {
        if len > self.max_input_file_size {
            return Err(XlsxToDocxError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                len, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// アーカイブ全体の検査
    ///
    /// エントリ数、各エントリのパスとサイズ、展開後の合計サイズを検査します。
    pub fn check_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
    ) -> Result<(), XlsxToDocxError> {
        if archive.len() > self.max_file_count {
            return Err(XlsxToDocxError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                self.max_file_count
            )));
        }

        let mut total = 0u64;
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            let name = entry.name();

            validate_zip_path(name).map_err(|reason| {
                XlsxToDocxError::SecurityViolation(format!("Invalid ZIP path: {}", reason))
            })?;

            if entry.size() > self.max_file_size {
                return Err(XlsxToDocxError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    name,
                    entry.size(),
                    self.max_file_size
                )));
            }

            total = total.saturating_add(entry.size());
            if total > self.max_decompressed_size {
                return Err(XlsxToDocxError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total, self.max_decompressed_size
                )));
            }
        }
        Ok(())
    }
}

/// アーカイブ内エントリ名の検証
///
/// 空の名前、絶対パス（`/`またはドライブレター始まり）、`..`を含むパス、
/// バックスラッシュ区切りを拒否します。
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    if path.starts_with('/') || has_drive {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}

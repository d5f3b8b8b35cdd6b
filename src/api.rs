//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 日付の出力形式
///
/// 日付セルを回答テキストに変換する際の形式を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// ISO 8601形式
    ///
    /// 時刻成分を持たない場合は `2025-11-20`、持つ場合は `2025-11-20 09:30:00`
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsxdocx::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), xlsxdocx::XlsxToDocxError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// シート選択方式
///
/// 1ファイルにつき変換されるシートは常に1枚です。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// ワークブックのアクティブシート（デフォルト）
    ///
    /// `xl/workbook.xml`の`activeTab`を参照し、指定がなければ最初のシートを選択します。
    Active,

    /// インデックス指定（0始まり）
    Index(usize),

    /// シート名指定
    Name(String),
}

/// リストの種類
///
/// 段落スタイルに対応する番号定義が見つからなかった場合に、
/// どちらの書式の番号定義を優先するかを決めます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    /// 番号付きリスト（1. 2. 3. ...）
    #[default]
    Numbered,

    /// 箇条書き
    Bulleted,
}

impl ListKind {
    /// WordprocessingMLの`w:numFmt`値
    pub(crate) fn num_fmt(self) -> &'static str {
        match self {
            ListKind::Numbered => "decimal",
            ListKind::Bulleted => "bullet",
        }
    }

    /// リスト段落に使用する段落スタイルID
    pub(crate) fn style_id(self) -> &'static str {
        match self {
            ListKind::Numbered => "ListNumber",
            ListKind::Bulleted => "ListBullet",
        }
    }
}

/// 出力フォーマット
///
/// 変換結果の出力形式を指定します。いずれの形式でも、質問ごとに見出しと
/// 「回答者 — 回答」のリストを出力します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Word文書（.docx、デフォルト）
    #[default]
    Docx,

    /// Markdown形式
    ///
    /// ```markdown
    /// # Q1
    ///
    /// 1. **Alice** — yes
    /// 2. **Bob** — no
    /// ```
    Markdown,

    /// JSON形式（転置済みの質問の配列をそのまま出力）
    ///
    /// ```json
    /// [
    ///   {
    ///     "question": "Q1",
    ///     "answers": [{ "respondent": "Alice", "answer": "yes" }]
    ///   }
    /// ]
    /// ```
    Json,
}

impl OutputFormat {
    /// 出力ファイルの拡張子
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

//! Survey Module
//!
//! アンケート形式のシート（1列 = 1質問、1行 = 1回答者）を、
//! 質問ごとの「回答者 → 回答」の順序付き構造に転置するモジュール。

use serde::Serialize;

use crate::error::XlsxToDocxError;

/// 回答者名を持つヘッダー列（列0のインデックス列は無視する）
const HEADER_COLUMN: usize = 1;
/// 最初のデータ列（質問）
const FIRST_DATA_COLUMN: usize = 2;

/// シートの1セル
///
/// 表示用のテキストに加えて、元のセル値が偽値（空セル・数値0・FALSE）だったかを
/// 保持します。回答ペアのスキップ判定はテキストではなくこのフラグで行います。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    text: String,
    falsy: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>, falsy: bool) -> Self {
        Self {
            text: text.into(),
            falsy,
        }
    }

    /// セルのテキスト
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 元のセル値が偽値かどうか
    pub fn is_falsy(&self) -> bool {
        self.falsy
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(String::new(), true)
    }
}

/// 文字列から生成したセルは空文字列のときだけ偽値になる
impl From<String> for Cell {
    fn from(text: String) -> Self {
        let falsy = text.is_empty();
        Self { text, falsy }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

/// 列単位のセルグリッド
///
/// 列0はインデックス列として無視され、列1が回答者名（先頭セルは無視）、
/// 列2以降が質問ごとのデータ列です。各データ列の先頭セルが質問文です。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    columns: Vec<Vec<Cell>>,
}

impl Sheet {
    /// 列のリストからシートを生成
    ///
    /// 列の長さは揃っている必要はありません（転置時に検証されます）。
    pub fn from_columns<C, S>(columns: C) -> Self
    where
        C: IntoIterator,
        C::Item: IntoIterator<Item = S>,
        S: Into<Cell>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|column| column.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// 行のリストからシートを生成
    ///
    /// 短い行は空セルで埋め、長方形のグリッドとして扱います。
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<Cell>,
    {
        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let columns = (0..width)
            .map(|col| {
                rows.iter()
                    .map(|row| row.get(col).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { columns }
    }

    /// 列の一覧
    pub fn columns(&self) -> &[Vec<Cell>] {
        &self.columns
    }

    /// 列数
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// 1人の回答者の回答
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// 回答者名（ヘッダー列の値）
    pub respondent: String,
    /// 回答テキスト
    pub answer: String,
    #[serde(skip)]
    blank: bool,
}

impl Answer {
    /// テキストから回答を生成（両方が空文字列のときだけ空のペアになる）
    pub fn new(respondent: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::from_cells(Cell::from(respondent.into()), Cell::from(answer.into()))
    }

    /// セルから回答を生成
    pub fn from_cells(respondent: Cell, answer: Cell) -> Self {
        Self {
            blank: respondent.is_falsy() && answer.is_falsy(),
            respondent: respondent.text,
            answer: answer.text,
        }
    }

    /// 回答者名と回答の両方が偽値（空・数値0・FALSE）かどうか
    ///
    /// 該当するペアは出力時にスキップされ、リスト番号も消費しません。
    pub fn is_blank(&self) -> bool {
        self.blank
    }
}

/// 1つの質問とその回答
///
/// 回答はヘッダー列の順序を保持します。同じ回答者名が複数回現れても
/// 1件ずつ保持するため、回答数は常に「ヘッダー列の長さ − 1」になります。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    /// 質問文（データ列の先頭セル）
    pub question: String,
    /// 回答者順の回答
    pub answers: Vec<Answer>,
}

impl QuestionRecord {
    /// 回答者名で最初の回答を検索
    pub fn answer_for(&self, respondent: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.respondent == respondent)
            .map(|a| a.answer.as_str())
    }

    /// 空でない回答（出力対象）のイテレーター
    pub fn visible_answers(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter().filter(|a| !a.is_blank())
    }
}

/// 転置済みのアンケート
///
/// 質問はシートの列順（左から右）に並び、並べ替えられることはありません。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Survey {
    pub questions: Vec<QuestionRecord>,
}

impl Survey {
    /// 質問数
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// シートを転置する
///
/// 列1をヘッダー（回答者名）として、列2以降の各列を1つの質問に変換します。
/// データ列の行`i`（`i >= 1`）は`header[i] → cell[i]`に対応します。
///
/// # 戻り値
///
/// * `Ok(Survey)` - 転置結果（データ列がない場合は空）
/// * `Err(XlsxToDocxError::Shape)` - ヘッダー列がない、またはデータ列の長さが
///   ヘッダー列と一致しない場合
///
/// # 使用例
///
/// ```rust
/// use xlsxdocx::{transpose, Sheet};
///
/// let sheet = Sheet::from_rows(vec![
///     vec!["#", "", "Q1"],
///     vec!["1", "Alice", "yes"],
///     vec!["2", "Bob", "no"],
/// ]);
/// let survey = transpose(&sheet).unwrap();
/// assert_eq!(survey.questions[0].question, "Q1");
/// assert_eq!(survey.questions[0].answer_for("Bob"), Some("no"));
/// ```
pub fn transpose(sheet: &Sheet) -> Result<Survey, XlsxToDocxError> {
    let columns = sheet.columns();
    if columns.len() <= HEADER_COLUMN {
        return Err(XlsxToDocxError::Shape {
            column: HEADER_COLUMN,
            expected: HEADER_COLUMN + 1,
            actual: columns.len(),
        });
    }

    let header = &columns[HEADER_COLUMN];
    let mut questions = Vec::with_capacity(columns.len().saturating_sub(FIRST_DATA_COLUMN));

    for (offset, column) in columns.iter().skip(FIRST_DATA_COLUMN).enumerate() {
        if column.len() != header.len() {
            return Err(XlsxToDocxError::Shape {
                column: FIRST_DATA_COLUMN + offset,
                expected: header.len(),
                actual: column.len(),
            });
        }

        let Some((question, cells)) = column.split_first() else {
            // ヘッダー列も空なので回答はない
            continue;
        };

        let answers = header
            .iter()
            .skip(1)
            .zip(cells)
            .map(|(respondent, answer)| Answer::from_cells(respondent.clone(), answer.clone()))
            .collect();

        questions.push(QuestionRecord {
            question: question.text.clone(),
            answers,
        });
    }

    Ok(Survey { questions })
}

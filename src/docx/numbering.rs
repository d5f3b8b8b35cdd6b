//! Numbering Registry Module
//!
//! `word/numbering.xml`の番号定義（抽象番号定義と具体的な番号インスタンス）を
//! 保持し、リスト段落の番号付けを管理するモジュール。
//!
//! 文書ビルダーがこのレジストリを所有し、新しいリストの開始
//! （[`NumberingRegistry::start_list`]）と直前のリストの継続
//! （[`NumberingRegistry::continue_list`]）の2つの操作だけを公開します。

use std::io::Write;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::api::ListKind;
use crate::xml;
use crate::error::XlsxToDocxError;

/// 既定テンプレートの番号定義
///
/// - abstractNum 0: `ListNumber`スタイルに紐づく単一レベルの番号付きリスト
/// - abstractNum 1: `ListBullet`スタイルに紐づく単一レベルの箇条書き
/// - abstractNum 2: スタイルに紐づかない9レベルのアウトライン番号
///
/// `ListNumber` / `ListBullet`スタイルはそれぞれnumId 1 / 2を参照します。
const DEFAULT_NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:multiLevelType w:val="singleLevel"/>
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="decimal"/>
      <w:pStyle w:val="ListNumber"/>
      <w:lvlText w:val="%1."/>
      <w:lvlJc w:val="left"/>
      <w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr>
    </w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="1">
    <w:multiLevelType w:val="singleLevel"/>
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="bullet"/>
      <w:pStyle w:val="ListBullet"/>
      <w:lvlText w:val="•"/>
      <w:lvlJc w:val="left"/>
      <w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr>
    </w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="2">
    <w:multiLevelType w:val="multilevel"/>
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="792" w:hanging="432"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="2"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2.%3."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="1224" w:hanging="504"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="3"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2.%3.%4."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="1728" w:hanging="648"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="4"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2.%3.%4.%5."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="2232" w:hanging="792"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="5"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2.%3.%4.%5.%6."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="2736" w:hanging="936"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="6"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2.%3.%4.%5.%6.%7."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="3240" w:hanging="1080"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="7"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2.%3.%4.%5.%6.%7.%8."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="3744" w:hanging="1224"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="8"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1.%2.%3.%4.%5.%6.%7.%8.%9."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="4320" w:hanging="1440"/></w:pPr></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
  <w:num w:numId="3"><w:abstractNumId w:val="2"/></w:num>
</w:numbering>
"#;

/// 番号付けされた段落が参照する具体的な番号インスタンスとレベル
///
/// 同じハンドルを持つ段落は1つの連続したリストとして描画されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListHandle {
    /// 具体的な番号インスタンスのID（`w:numId`）
    pub num_id: u32,
    /// アウトラインレベル（`w:ilvl`）
    pub level: u8,
}

/// 抽象番号定義の1レベル（`w:lvl`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LevelDef {
    pub ilvl: u8,
    pub start: Option<u32>,
    pub num_fmt: Option<String>,
    /// このレベルに紐づく段落スタイル
    pub p_style: Option<String>,
    pub lvl_text: Option<String>,
    pub lvl_jc: Option<String>,
    /// インデント（`w:ind`のleft, hanging）
    pub indent: Option<(u32, u32)>,
}

/// 抽象番号定義（`w:abstractNum`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AbstractNum {
    pub id: u32,
    pub multi_level_type: Option<String>,
    pub levels: Vec<LevelDef>,
}

impl AbstractNum {
    fn level(&self, ilvl: u8) -> Option<&LevelDef> {
        self.levels.iter().find(|l| l.ilvl == ilvl)
    }

    fn is_single_level(&self) -> bool {
        self.levels.len() == 1
    }
}

/// 具体的な番号インスタンス（`w:num`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumInstance {
    pub num_id: u32,
    pub abstract_num_id: u32,
    /// レベルごとの開始番号の上書き（`w:lvlOverride/w:startOverride`）
    pub start_overrides: Vec<(u8, u32)>,
}

/// 文書の番号定義テーブル
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NumberingRegistry {
    abstract_nums: Vec<AbstractNum>,
    nums: Vec<NumInstance>,
}

impl NumberingRegistry {
    /// 既定テンプレートの番号定義を読み込む
    pub fn with_default_template() -> Result<Self, XlsxToDocxError> {
        Self::from_xml(DEFAULT_NUMBERING_XML.as_bytes())
    }

    /// 抽象番号定義の一覧
    #[cfg(test)]
    pub fn abstract_nums(&self) -> &[AbstractNum] {
        &self.abstract_nums
    }

    /// 番号インスタンスの一覧
    pub fn nums(&self) -> &[NumInstance] {
        &self.nums
    }

    /// numIdで番号インスタンスを検索
    #[cfg(test)]
    pub fn num(&self, num_id: u32) -> Option<&NumInstance> {
        self.nums.iter().find(|n| n.num_id == num_id)
    }

    /// 新しい番号付きリストを開始する
    ///
    /// 再利用する抽象番号定義を選び、それを参照する新しい番号インスタンスを
    /// 割り当て、`level`の開始番号を1に上書きします。抽象定義が文書全体の
    /// 別のカウンターを継続していても、このリストは必ず1から始まります。
    ///
    /// # 引数
    ///
    /// * `style` - 段落スタイルID（スタイルに紐づく定義を優先する）
    /// * `level` - アウトラインレベル
    /// * `kind` - スタイルに紐づく定義がない場合に優先する書式
    pub fn start_list(&mut self, style: Option<&str>, level: u8, kind: ListKind) -> ListHandle {
        let abstract_num_id = self.find_abstract_id(style, level, kind);
        let num_id = self.next_num_id();

        self.nums.push(NumInstance {
            num_id,
            abstract_num_id,
            start_overrides: vec![(level, 1)],
        });
        debug!(num_id, abstract_num_id, level, "numbered list started");

        ListHandle { num_id, level }
    }

    /// 既存のリストを継続する
    ///
    /// 新しい割り当ては行わず、直前の段落と同じ番号インスタンスを返します。
    /// `level`を省略した場合は直前の段落のレベルを引き継ぎます。
    pub fn continue_list(&self, previous: ListHandle, level: Option<u8>) -> ListHandle {
        ListHandle {
            num_id: previous.num_id,
            level: level.unwrap_or(previous.level),
        }
    }

    /// 再利用する抽象番号定義IDを選ぶ
    ///
    /// 以下の順に探索し、一致した定義のうち最小のIDを返します。
    ///
    /// 1. レベル0がスタイルに紐づく単一レベル定義
    /// 2. `level`がスタイルに紐づく定義
    /// 3. レベル0が`kind`の書式である単一レベル定義
    /// 4. `level`が`kind`の書式である定義
    /// 5. いずれもなければ0
    fn find_abstract_id(&self, style: Option<&str>, level: u8, kind: ListKind) -> u32 {
        let by_style = |l: &LevelDef| style.is_some() && l.p_style.as_deref() == style;
        let by_kind = |l: &LevelDef| l.num_fmt.as_deref() == Some(kind.num_fmt());
        let criteria: [&dyn Fn(&LevelDef) -> bool; 2] = [&by_style, &by_kind];

        for criterion in criteria {
            for single in [true, false] {
                let ilvl = if single { 0 } else { level };
                let found = self
                    .abstract_nums
                    .iter()
                    .filter(|a| !single || a.is_single_level())
                    .filter(|a| a.level(ilvl).is_some_and(criterion))
                    .map(|a| a.id)
                    .min();
                if let Some(id) = found {
                    return id;
                }
            }
        }
        0
    }

    /// 未使用の最小のnumId（1以上）
    fn next_num_id(&self) -> u32 {
        (1..)
            .find(|id| self.nums.iter().all(|n| n.num_id != *id))
            .unwrap_or(1)
    }

    /// `word/numbering.xml`を解析する
    pub fn from_xml(xml_content: &[u8]) -> Result<Self, XlsxToDocxError> {
        let mut reader = Reader::from_reader(xml_content);
        reader.trim_text(true);

        let mut registry = Self::default();
        let mut current_abstract: Option<AbstractNum> = None;
        let mut current_level: Option<LevelDef> = None;
        let mut current_num: Option<NumInstance> = None;
        let mut override_level: Option<u8> = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let (element, is_empty) = match reader.read_event_into(&mut buf)? {
                Event::Start(e) => (e.into_owned(), false),
                Event::Empty(e) => (e.into_owned(), true),
                Event::End(e) => {
                    match e.local_name().as_ref() {
                        b"lvl" => {
                            if let (Some(abs), Some(lvl)) =
                                (current_abstract.as_mut(), current_level.take())
                            {
                                abs.levels.push(lvl);
                            }
                        }
                        b"abstractNum" => {
                            registry.abstract_nums.extend(current_abstract.take());
                        }
                        b"num" => registry.nums.extend(current_num.take()),
                        b"lvlOverride" => override_level = None,
                        _ => {}
                    }
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            match element.local_name().as_ref() {
                b"abstractNum" => {
                    let id = required_u32(&element, b"abstractNumId")?;
                    let abs = AbstractNum {
                        id,
                        ..Default::default()
                    };
                    if is_empty {
                        registry.abstract_nums.push(abs);
                    } else {
                        current_abstract = Some(abs);
                    }
                }
                b"multiLevelType" => {
                    if let Some(abs) = current_abstract.as_mut() {
                        abs.multi_level_type = xml::attribute(&element, b"val")?;
                    }
                }
                b"lvl" if current_abstract.is_some() => {
                    let level = LevelDef {
                        ilvl: required_level(&element)?,
                        ..Default::default()
                    };
                    if !is_empty {
                        current_level = Some(level);
                    } else if let Some(abs) = current_abstract.as_mut() {
                        abs.levels.push(level);
                    }
                }
                b"start" => {
                    if let Some(lvl) = current_level.as_mut() {
                        lvl.start = Some(required_u32(&element, b"val")?);
                    }
                }
                b"numFmt" => {
                    if let Some(lvl) = current_level.as_mut() {
                        lvl.num_fmt = xml::attribute(&element, b"val")?;
                    }
                }
                b"pStyle" => {
                    if let Some(lvl) = current_level.as_mut() {
                        lvl.p_style = xml::attribute(&element, b"val")?;
                    }
                }
                b"lvlText" => {
                    if let Some(lvl) = current_level.as_mut() {
                        lvl.lvl_text = xml::attribute(&element, b"val")?;
                    }
                }
                b"lvlJc" => {
                    if let Some(lvl) = current_level.as_mut() {
                        lvl.lvl_jc = xml::attribute(&element, b"val")?;
                    }
                }
                b"ind" => {
                    if let Some(lvl) = current_level.as_mut() {
                        let left = optional_u32(&element, b"left")?.unwrap_or(0);
                        let hanging = optional_u32(&element, b"hanging")?.unwrap_or(0);
                        lvl.indent = Some((left, hanging));
                    }
                }
                b"num" => {
                    let num = NumInstance {
                        num_id: required_u32(&element, b"numId")?,
                        abstract_num_id: 0,
                        start_overrides: Vec::new(),
                    };
                    if is_empty {
                        registry.nums.push(num);
                    } else {
                        current_num = Some(num);
                    }
                }
                b"abstractNumId" => {
                    if let Some(num) = current_num.as_mut() {
                        num.abstract_num_id = required_u32(&element, b"val")?;
                    }
                }
                b"lvlOverride" if !is_empty => {
                    override_level = Some(required_level(&element)?);
                }
                b"startOverride" => {
                    if let (Some(num), Some(ilvl)) = (current_num.as_mut(), override_level) {
                        num.start_overrides
                            .push((ilvl, required_u32(&element, b"val")?));
                    }
                }
                _ => {}
            }
        }

        Ok(registry)
    }

    /// `word/numbering.xml`として書き出す
    ///
    /// スキーマの順序に従い、すべての`w:abstractNum`を`w:num`より前に出力します。
    pub fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XlsxToDocxError> {
        xml::declaration(writer)?;
        xml::start(writer, "w:numbering", &[("xmlns:w", xml::W_NS)])?;

        for abs in &self.abstract_nums {
            let id = abs.id.to_string();
            xml::start(writer, "w:abstractNum", &[("w:abstractNumId", id.as_str())])?;
            if let Some(ref kind) = abs.multi_level_type {
                xml::empty(writer, "w:multiLevelType", &[("w:val", kind.as_str())])?;
            }
            for level in &abs.levels {
                write_level(writer, level)?;
            }
            xml::end(writer, "w:abstractNum")?;
        }

        for num in &self.nums {
            let num_id = num.num_id.to_string();
            let abstract_id = num.abstract_num_id.to_string();
            xml::start(writer, "w:num", &[("w:numId", num_id.as_str())])?;
            xml::empty(writer, "w:abstractNumId", &[("w:val", abstract_id.as_str())])?;
            for (ilvl, start) in &num.start_overrides {
                let ilvl = ilvl.to_string();
                let start = start.to_string();
                xml::start(writer, "w:lvlOverride", &[("w:ilvl", ilvl.as_str())])?;
                xml::empty(writer, "w:startOverride", &[("w:val", start.as_str())])?;
                xml::end(writer, "w:lvlOverride")?;
            }
            xml::end(writer, "w:num")?;
        }

        xml::end(writer, "w:numbering")
    }
}

fn write_level<W: Write>(writer: &mut Writer<W>, level: &LevelDef) -> Result<(), XlsxToDocxError> {
    let ilvl = level.ilvl.to_string();
    xml::start(writer, "w:lvl", &[("w:ilvl", ilvl.as_str())])?;
    if let Some(start) = level.start {
        xml::empty(writer, "w:start", &[("w:val", start.to_string().as_str())])?;
    }
    if let Some(ref fmt) = level.num_fmt {
        xml::empty(writer, "w:numFmt", &[("w:val", fmt.as_str())])?;
    }
    if let Some(ref style) = level.p_style {
        xml::empty(writer, "w:pStyle", &[("w:val", style.as_str())])?;
    }
    if let Some(ref text) = level.lvl_text {
        xml::empty(writer, "w:lvlText", &[("w:val", text.as_str())])?;
    }
    if let Some(ref jc) = level.lvl_jc {
        xml::empty(writer, "w:lvlJc", &[("w:val", jc.as_str())])?;
    }
    if let Some((left, hanging)) = level.indent {
        xml::start(writer, "w:pPr", &[])?;
        xml::empty(
            writer,
            "w:ind",
            &[
                ("w:left", left.to_string().as_str()),
                ("w:hanging", hanging.to_string().as_str()),
            ],
        )?;
        xml::end(writer, "w:pPr")?;
    }
    xml::end(writer, "w:lvl")
}

fn optional_u32(element: &BytesStart, name: &[u8]) -> Result<Option<u32>, XlsxToDocxError> {
    match xml::attribute(element, name)? {
        Some(value) => Ok(Some(value.parse()?)),
        None => Ok(None),
    }
}

fn required_u32(element: &BytesStart, name: &[u8]) -> Result<u32, XlsxToDocxError> {
    optional_u32(element, name)?.ok_or_else(|| {
        XlsxToDocxError::Config(format!(
            "Missing attribute '{}' on <{}>",
            String::from_utf8_lossy(name),
            String::from_utf8_lossy(element.name().as_ref())
        ))
    })
}

/// `w:ilvl`属性をレベル番号として取得
fn required_level(element: &BytesStart) -> Result<u8, XlsxToDocxError> {
    let ilvl = required_u32(element, b"ilvl")?;
    u8::try_from(ilvl).map_err(|_| {
        XlsxToDocxError::Config(format!("List level {} is out of range", ilvl))
    })
}

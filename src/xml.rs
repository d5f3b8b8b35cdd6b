//! XML Helpers Module
//!
//! quick-xmlの読み書きで共通して使う小さなヘルパー関数群。

use std::borrow::Cow;
use std::io::Write;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::XlsxToDocxError;

/// WordprocessingMLの名前空間
pub(crate) const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// 要素の属性値をローカル名で取得
///
/// 名前空間プレフィックス（`w:`など）は無視して比較します。
pub(crate) fn attribute(
    element: &BytesStart,
    name: &[u8],
) -> Result<Option<String>, XlsxToDocxError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == name {
            let raw = std::str::from_utf8(&attr.value)?;
            let value = unescape(raw).map_err(quick_xml::Error::from)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`
pub(crate) fn declaration<W: Write>(writer: &mut Writer<W>) -> Result<(), XlsxToDocxError> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(())
}

fn element<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for &attr in attributes {
        element.push_attribute(attr);
    }
    element
}

pub(crate) fn start<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), XlsxToDocxError> {
    writer.write_event(Event::Start(element(name, attributes)))?;
    Ok(())
}

pub(crate) fn empty<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), XlsxToDocxError> {
    writer.write_event(Event::Empty(element(name, attributes)))?;
    Ok(())
}

pub(crate) fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), XlsxToDocxError> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// テキストノード（`&`, `<`, `>`などはエスケープされる）
///
/// XML 1.0で使用できない文字（タブ・改行以外の制御文字など）は取り除きます。
pub(crate) fn text<W: Write>(writer: &mut Writer<W>, content: &str) -> Result<(), XlsxToDocxError> {
    let content: Cow<str> = if content.chars().all(is_xml_char) {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(content.chars().filter(|&c| is_xml_char(c)).collect())
    };
    writer.write_event(Event::Text(BytesText::new(&content)))?;
    Ok(())
}

/// XML 1.0の`Char`生成規則に含まれる文字かどうか
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

//! Integration Tests for xlsxdocx
//!
//! Workbooks are generated in memory with rust_xlsxwriter, converted, and the
//! resulting packages are read back with zip and quick-xml.

use quick_xml::events::Event;
use quick_xml::Reader;
use rust_xlsxwriter::*;
use std::io::{Cursor, Read};
use xlsxdocx::{
    transpose, ConverterBuilder, DateFormat, ListKind, OutputFormat, Sheet, SheetSelector,
    XlsxToDocxError,
};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Write rows starting at A1, skipping empty strings
    pub fn write_rows(worksheet: &mut Worksheet, rows: &[&[&str]]) -> Result<(), XlsxError> {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value)?;
                }
            }
        }
        Ok(())
    }

    /// Generate a single-sheet survey workbook
    pub fn survey(rows: &[&[&str]]) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        write_rows(workbook.add_worksheet(), rows)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Scenario A: one question, two respondents
    pub fn scenario_a() -> Result<Vec<u8>, XlsxError> {
        survey(&[&["", "", "Q1"], &["1", "Alice", "yes"], &["2", "Bob", "no"]])
    }

    /// Generate a workbook with 3 sheets, the second one active
    pub fn multi_sheets() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        for (name, question) in [("First", "Q-first"), ("Second", "Q-second"), ("Third", "Q-third")] {
            let sheet = workbook.add_worksheet();
            sheet.set_name(name)?;
            write_rows(sheet, &[&["", "", question], &["1", "Alice", "x"]])?;
            if name == "Second" {
                sheet.set_active(true);
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Scenario B with falsy cell values: numeric 0 and FALSE next to blank respondents
    pub fn falsy_answers() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        write_rows(
            worksheet,
            &[&["", "", "Q1"], &["1", "Alice", "yes"], &["2"], &["3"], &["4", "Bob"]],
        )?;
        worksheet.write_number(2, 2, 0.0)?;
        worksheet.write_boolean(3, 2, false)?;
        worksheet.write_number(4, 2, 0.0)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a survey with number, boolean and date answers
    pub fn typed_answers() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        write_rows(
            worksheet,
            &[&["", "", "Count", "Agree", "Since"], &["1", "Alice"], &["2", "Bob"]],
        )?;
        worksheet.write_number(1, 2, 42.0)?;
        worksheet.write_number(2, 2, 2.5)?;
        worksheet.write_boolean(1, 3, true)?;
        worksheet.write_boolean(2, 3, false)?;

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let date = ExcelDateTime::from_ymd(2025, 1, 1)?;
        worksheet.write_datetime_with_format(1, 4, &date, &date_format)?;
        let date = ExcelDateTime::from_ymd(2024, 2, 29)?;
        worksheet.write_datetime_with_format(2, 4, &date, &date_format)?;

        Ok(workbook.save_to_buffer()?)
    }
}

/// A paragraph of `word/document.xml` as seen by a reader
#[derive(Debug, Default, PartialEq)]
struct DocParagraph {
    style: Option<String>,
    num_id: Option<String>,
    ilvl: Option<String>,
    bold_text: String,
    text: String,
}

fn read_part(docx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn attr(e: &quick_xml::events::BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .map(|a| {
            let raw = std::str::from_utf8(&a.value).unwrap();
            quick_xml::escape::unescape(raw).unwrap().into_owned()
        })
}

fn read_paragraphs(docx: &[u8]) -> Vec<DocParagraph> {
    let xml = read_part(docx, "word/document.xml");
    let mut reader = Reader::from_str(&xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<DocParagraph> = None;
    let mut in_text = false;
    let mut bold = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => current = Some(DocParagraph::default()),
                b"w:r" => bold = false,
                b"w:b" => bold = true,
                b"w:t" => in_text = true,
                b"w:pStyle" => {
                    if let Some(p) = current.as_mut() {
                        p.style = attr(&e, b"w:val");
                    }
                }
                b"w:numId" => {
                    if let Some(p) = current.as_mut() {
                        p.num_id = attr(&e, b"w:val");
                    }
                }
                b"w:ilvl" => {
                    if let Some(p) = current.as_mut() {
                        p.ilvl = attr(&e, b"w:val");
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().unwrap();
                if let Some(p) = current.as_mut() {
                    p.text.push_str(&text);
                    if bold {
                        p.bold_text.push_str(&text);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.extend(current.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs
}

/// `w:num` → (abstractNumId, startOverride) from `word/numbering.xml`
fn read_nums(docx: &[u8]) -> Vec<(String, String, Option<String>)> {
    let xml = read_part(docx, "word/numbering.xml");
    let mut reader = Reader::from_str(&xml);

    let mut nums = Vec::new();
    let mut current: Option<(String, String, Option<String>)> = None;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:num" => current = Some((attr(&e, b"w:numId").unwrap(), String::new(), None)),
                b"w:abstractNumId" => {
                    if let Some(num) = current.as_mut() {
                        num.1 = attr(&e, b"w:val").unwrap();
                    }
                }
                b"w:startOverride" => {
                    if let Some(num) = current.as_mut() {
                        num.2 = attr(&e, b"w:val");
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:num" => nums.extend(current.take()),
            Event::Eof => break,
            _ => {}
        }
    }
    nums
}

fn convert(data: Vec<u8>) -> Vec<u8> {
    let converter = ConverterBuilder::new().build().unwrap();
    converter.convert_to_bytes(Cursor::new(data)).unwrap()
}

#[test]
fn test_scenario_a_document() {
    let docx = convert(fixtures::scenario_a().unwrap());
    let paragraphs = read_paragraphs(&docx);

    assert_eq!(paragraphs.len(), 3);
    assert_eq!(paragraphs[0].style.as_deref(), Some("Heading1"));
    assert_eq!(paragraphs[0].text, "Q1");
    assert_eq!(paragraphs[0].num_id, None);

    assert_eq!(paragraphs[1].text, "Alice — yes");
    assert_eq!(paragraphs[1].bold_text, "Alice");
    assert_eq!(paragraphs[2].text, "Bob — no");
    assert_eq!(paragraphs[2].bold_text, "Bob");

    // one continuous sequence
    assert_eq!(paragraphs[1].style.as_deref(), Some("ListNumber"));
    assert!(paragraphs[1].num_id.is_some());
    assert_eq!(paragraphs[1].num_id, paragraphs[2].num_id);
    assert_eq!(paragraphs[1].ilvl.as_deref(), Some("0"));
}

#[test]
fn test_scenario_a_numbering_restarts_at_one() {
    let docx = convert(fixtures::scenario_a().unwrap());
    let paragraphs = read_paragraphs(&docx);
    let num_id = paragraphs[1].num_id.clone().unwrap();

    let nums = read_nums(&docx);
    let num = nums.iter().find(|n| n.0 == num_id).unwrap();
    assert_eq!(num.1, "0");
    assert_eq!(num.2.as_deref(), Some("1"));
}

#[test]
fn test_scenario_b_blank_pair_skipped() {
    let data = fixtures::survey(&[
        &["", "", "Q1"],
        &["1", "Alice", "yes"],
        &["2", "", ""],
        &["3", "Carol", "maybe"],
    ])
    .unwrap();
    let paragraphs = read_paragraphs(&convert(data));

    let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["Q1", "Alice — yes", "Carol — maybe"]);
    assert_eq!(paragraphs[1].num_id, paragraphs[2].num_id);
}

#[test]
fn test_falsy_pairs_skipped() {
    let docx = convert(fixtures::falsy_answers().unwrap());
    let paragraphs = read_paragraphs(&docx);

    // a named respondent keeps a 0 answer
    let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["Q1", "Alice — yes", "Bob — 0"]);
    assert_eq!(paragraphs[1].num_id, paragraphs[2].num_id);

    let converter = ConverterBuilder::new()
        .with_output_format(OutputFormat::Markdown)
        .build()
        .unwrap();
    let output = converter
        .convert_to_bytes(Cursor::new(fixtures::falsy_answers().unwrap()))
        .unwrap();
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "# Q1\n\n1. **Alice** — yes\n2. **Bob** — 0\n"
    );
}

#[test]
fn test_scenario_c_numbering_resets_per_question() {
    let data = fixtures::survey(&[
        &["", "", "Q1", "Q2"],
        &["1", "Alice", "a1", "a2"],
        &["2", "Bob", "b1", "b2"],
    ])
    .unwrap();
    let docx = convert(data);
    let paragraphs = read_paragraphs(&docx);

    let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Q1", "Alice — a1", "Bob — b1", "Q2", "Alice — a2", "Bob — b2"]
    );

    let list_items: Vec<_> = paragraphs.iter().filter(|p| p.num_id.is_some()).collect();
    assert_eq!(list_items.len(), 4);
    assert_eq!(list_items[0].num_id, list_items[1].num_id);
    assert_eq!(list_items[2].num_id, list_items[3].num_id);
    assert_ne!(list_items[0].num_id, list_items[2].num_id);

    let nums = read_nums(&docx);
    for item in [list_items[0], list_items[2]] {
        let num = nums.iter().find(|n| Some(&n.0) == item.num_id.as_ref()).unwrap();
        assert_eq!(num.2.as_deref(), Some("1"));
    }
}

#[test]
fn test_question_order_preserved() {
    let data = fixtures::survey(&[
        &["", "", "Zebra", "Apple", "Mango"],
        &["1", "Alice", "z", "a", "m"],
    ])
    .unwrap();
    let paragraphs = read_paragraphs(&convert(data));

    let headings: Vec<&str> = paragraphs
        .iter()
        .filter(|p| p.style.as_deref() == Some("Heading1"))
        .map(|p| p.text.as_str())
        .collect();
    assert_eq!(headings, vec!["Zebra", "Apple", "Mango"]);
}

#[test]
fn test_typed_answers_are_coerced_to_text() {
    let paragraphs = read_paragraphs(&convert(fixtures::typed_answers().unwrap()));
    let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();

    assert_eq!(
        texts,
        vec![
            "Count",
            "Alice — 42",
            "Bob — 2.5",
            "Agree",
            "Alice — TRUE",
            "Bob — FALSE",
            "Since",
            "Alice — 2025-01-01",
            "Bob — 2024-02-29",
        ]
    );
}

#[test]
fn test_custom_date_format() {
    let converter = ConverterBuilder::new()
        .with_date_format(DateFormat::Custom("%d/%m/%Y".to_string()))
        .with_output_format(OutputFormat::Json)
        .build()
        .unwrap();
    let output = converter
        .convert_to_bytes(Cursor::new(fixtures::typed_answers().unwrap()))
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value[2]["question"], "Since");
    assert_eq!(value[2]["answers"][0]["answer"], "01/01/2025");
}

#[test]
fn test_date_format_requiring_time_zone_is_rejected() {
    let result = ConverterBuilder::new()
        .with_date_format(DateFormat::Custom("%Y %z".to_string()))
        .build();
    assert!(matches!(result, Err(XlsxToDocxError::Config(_))));
}

#[test]
fn test_special_characters_escaped() {
    let data = fixtures::survey(&[
        &["", "", "Is a < b & c?"],
        &["1", "名前", "はい\n二行目"],
    ])
    .unwrap();
    let docx = convert(data);

    let xml = read_part(&docx, "word/document.xml");
    assert!(xml.contains("a &lt; b &amp; c?"));
    assert!(xml.contains("<w:br/>"));

    let paragraphs = read_paragraphs(&docx);
    assert_eq!(paragraphs[0].text, "Is a < b & c?");
    assert_eq!(paragraphs[1].text, "名前 — はい二行目");
    assert_eq!(paragraphs[1].bold_text, "名前");
}

#[test]
fn test_control_characters_in_cells() {
    let sheet = Sheet::from_rows(vec![
        vec!["", "", "Pasted\u{1}"],
        vec!["1", "Alice", "line one\u{B}line two\u{C}"],
    ]);
    let survey = transpose(&sheet).unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let mut docx = Vec::new();
    converter.render(&survey, &mut docx).unwrap();

    let xml = read_part(&docx, "word/document.xml");
    assert!(!xml.contains(|c: char| matches!(c, '\u{1}' | '\u{B}' | '\u{C}')));
    assert!(xml.contains("<w:br/>"));

    let paragraphs = read_paragraphs(&docx);
    assert_eq!(paragraphs[0].text, "Pasted");
    assert_eq!(paragraphs[1].text, "Alice — line oneline two");
}

#[test]
fn test_bulleted_lists() {
    let converter = ConverterBuilder::new()
        .with_list_kind(ListKind::Bulleted)
        .build()
        .unwrap();
    let docx = converter
        .convert_to_bytes(Cursor::new(fixtures::scenario_a().unwrap()))
        .unwrap();

    let paragraphs = read_paragraphs(&docx);
    assert_eq!(paragraphs[1].style.as_deref(), Some("ListBullet"));

    let nums = read_nums(&docx);
    let num = nums
        .iter()
        .find(|n| Some(&n.0) == paragraphs[1].num_id.as_ref())
        .unwrap();
    assert_eq!(num.1, "1");
}

#[test]
fn test_markdown_output() {
    let converter = ConverterBuilder::new()
        .with_output_format(OutputFormat::Markdown)
        .build()
        .unwrap();
    let data = fixtures::survey(&[
        &["", "", "Q1", "Q2"],
        &["1", "Alice", "a1", "a2"],
        &["2", "", "", "b2"],
    ])
    .unwrap();
    let output = converter.convert_to_bytes(Cursor::new(data)).unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "# Q1\n\n1. **Alice** — a1\n\n# Q2\n\n1. **Alice** — a2\n2.  — b2\n"
    );
}

#[test]
fn test_json_output_keeps_all_pairs() {
    let converter = ConverterBuilder::new()
        .with_output_format(OutputFormat::Json)
        .build()
        .unwrap();
    let data = fixtures::survey(&[
        &["", "", "Q1"],
        &["1", "Alice", "yes"],
        &["2", "", ""],
        &["3", "Bob", "no"],
    ])
    .unwrap();
    let output = converter.convert_to_bytes(Cursor::new(data)).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let answers = value[0]["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers[1]["respondent"], "");
}

#[test]
fn test_active_sheet_is_default() {
    let paragraphs = read_paragraphs(&convert(fixtures::multi_sheets().unwrap()));
    assert_eq!(paragraphs[0].text, "Q-second");
}

#[test]
fn test_sheet_selection() {
    let data = fixtures::multi_sheets().unwrap();

    let by_index = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Index(2))
        .build()
        .unwrap();
    let docx = by_index.convert_to_bytes(Cursor::new(data.clone())).unwrap();
    assert_eq!(read_paragraphs(&docx)[0].text, "Q-third");

    let by_name = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("First".to_string()))
        .build()
        .unwrap();
    let docx = by_name.convert_to_bytes(Cursor::new(data)).unwrap();
    assert_eq!(read_paragraphs(&docx)[0].text, "Q-first");
}

#[test]
fn test_sheet_selection_errors() {
    let data = fixtures::multi_sheets().unwrap();

    let missing = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("Missing".to_string()))
        .build()
        .unwrap();
    match missing.convert_to_bytes(Cursor::new(data.clone())) {
        Err(XlsxToDocxError::Config(msg)) => assert!(msg.contains("Missing")),
        other => panic!("Expected Config error, got {:?}", other.map(|b| b.len())),
    }

    let out_of_range = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Index(3))
        .build()
        .unwrap();
    assert!(matches!(
        out_of_range.convert_to_bytes(Cursor::new(data)),
        Err(XlsxToDocxError::Config(_))
    ));
}

#[test]
fn test_sheet_without_header_column() {
    let data = fixtures::survey(&[&["only column A"]]).unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    assert!(matches!(
        converter.convert_to_bytes(Cursor::new(data)),
        Err(XlsxToDocxError::Shape { column: 1, .. })
    ));
}

#[test]
fn test_header_only_sheet_produces_empty_document() {
    let data = fixtures::survey(&[&["", ""], &["1", "Alice"]]).unwrap();
    let paragraphs = read_paragraphs(&convert(data));
    assert!(paragraphs.is_empty());
}

#[test]
fn test_parse_returns_survey() {
    let converter = ConverterBuilder::new().build().unwrap();
    let survey = converter
        .parse(Cursor::new(fixtures::scenario_a().unwrap()))
        .unwrap();

    assert_eq!(survey.len(), 1);
    assert_eq!(survey.questions[0].question, "Q1");
    assert_eq!(survey.questions[0].answer_for("Alice"), Some("yes"));
    assert_eq!(survey.questions[0].answer_for("Bob"), Some("no"));
}

//! Deterministic OOXML package (zip) writer and XML text helpers.
//!
//! # Invariants
//! - Every entry is stamped with the DOS epoch, so output bytes depend only
//!   on entry names, order and contents.

use super::ExportError;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const RELS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub(crate) const CORE_PROPS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.core-properties+xml";
pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

pub(crate) struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageWriter {
    pub(crate) fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    pub(crate) fn add(&mut self, path: &str, contents: &str) -> Result<(), ExportError> {
        self.zip.start_file(path, entry_options())?;
        self.zip.write_all(contents.as_bytes())?;
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>, ExportError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

/// One `<Relationship>` entry of a `.rels` part.
pub(crate) struct Relationship<'a> {
    pub id: String,
    pub kind: &'a str,
    pub target: String,
}

pub(crate) fn relationships_xml(relationships: &[Relationship<'_>]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in relationships {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id,
            rel.kind,
            escape_xml(&rel.target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// `[Content_Types].xml` with the shared defaults plus `overrides`
/// given as `(part_name, content_type)`.
pub(crate) fn content_types_xml(overrides: &[(String, &str)]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(&format!(
        r#"<Default Extension="rels" ContentType="{RELS_CONTENT_TYPE}"/>"#
    ));
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (part_name, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{part_name}" ContentType="{content_type}"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// `docProps/core.xml` carrying only the document title.
pub(crate) fn core_properties_xml(title: &str) -> String {
    format!(
        "{XML_DECLARATION}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
         <dc:title>{}</dc:title></cp:coreProperties>",
        escape_xml(title)
    )
}

/// Escapes XML special characters and drops characters XML 1.0 forbids.
pub(crate) fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(ch),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_xml;

    #[test]
    fn escape_xml_handles_markup_and_control_chars() {
        assert_eq!(
            escape_xml("a<b>&\"c\"'\u{0007}"),
            "a&lt;b&gt;&amp;&quot;c&quot;&apos;"
        );
    }
}

//! WordprocessingML rendering.
//!
//! Layout: project title as a `Title` paragraph, then per entry one
//! `Heading1` paragraph followed by one body paragraph per content line.

use super::package::{
    content_types_xml, core_properties_xml, escape_xml, relationships_xml, PackageWriter,
    Relationship, CORE_PROPS_CONTENT_TYPE, REL_CORE_PROPS, REL_OFFICE_DOCUMENT, XML_DECLARATION,
};
use super::{DocumentOutline, ExportError};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

pub(super) fn render(outline: &DocumentOutline) -> Result<Vec<u8>, ExportError> {
    let mut package = PackageWriter::new();
    package.add(
        "[Content_Types].xml",
        &content_types_xml(&[
            ("/word/document.xml".to_string(), DOCUMENT_CONTENT_TYPE),
            ("/word/styles.xml".to_string(), STYLES_CONTENT_TYPE),
            ("/docProps/core.xml".to_string(), CORE_PROPS_CONTENT_TYPE),
        ]),
    )?;
    package.add(
        "_rels/.rels",
        &relationships_xml(&[
            Relationship {
                id: "rId1".to_string(),
                kind: REL_OFFICE_DOCUMENT,
                target: "word/document.xml".to_string(),
            },
            Relationship {
                id: "rId2".to_string(),
                kind: REL_CORE_PROPS,
                target: "docProps/core.xml".to_string(),
            },
        ]),
    )?;
    package.add("docProps/core.xml", &core_properties_xml(&outline.title))?;
    package.add(
        "word/_rels/document.xml.rels",
        &relationships_xml(&[Relationship {
            id: "rId1".to_string(),
            kind: REL_STYLES,
            target: "styles.xml".to_string(),
        }]),
    )?;
    package.add("word/styles.xml", &styles_xml())?;
    package.add("word/document.xml", &document_xml(outline))?;
    package.finish()
}

fn document_xml(outline: &DocumentOutline) -> String {
    let mut body = String::new();
    body.push_str(&paragraph(Some("Title"), &outline.title));
    for entry in &outline.entries {
        body.push_str(&paragraph(Some("Heading1"), &entry.heading));
        for line in entry.paragraphs() {
            body.push_str(&paragraph(None, line));
        }
    }

    format!(
        "{XML_DECLARATION}<w:document xmlns:w=\"{W_NS}\"><w:body>{body}\
         <w:sectPr><w:pgSz w:w=\"11906\" w:h=\"16838\"/>\
         <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
         w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/></w:sectPr>\
         </w:body></w:document>"
    )
}

fn paragraph(style: Option<&str>, text: &str) -> String {
    let properties = style
        .map(|style| format!("<w:pPr><w:pStyle w:val=\"{style}\"/></w:pPr>"))
        .unwrap_or_default();
    format!(
        "<w:p>{properties}<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(text)
    )
}

fn styles_xml() -> String {
    format!(
        "{XML_DECLARATION}<w:styles xmlns:w=\"{W_NS}\">\
         <w:docDefaults><w:rPrDefault><w:rPr>\
         <w:rFonts w:ascii=\"Calibri\" w:hAnsi=\"Calibri\" w:cs=\"Calibri\"/>\
         <w:sz w:val=\"22\"/></w:rPr></w:rPrDefault>\
         <w:pPrDefault><w:pPr><w:spacing w:after=\"160\" w:line=\"259\" w:lineRule=\"auto\"/>\
         </w:pPr></w:pPrDefault></w:docDefaults>\
         <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">\
         <w:name w:val=\"Normal\"/><w:qFormat/></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/>\
         <w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:qFormat/>\
         <w:pPr><w:spacing w:after=\"240\"/></w:pPr>\
         <w:rPr><w:sz w:val=\"56\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Heading1\"><w:name w:val=\"heading 1\"/>\
         <w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:qFormat/>\
         <w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"80\"/><w:outlineLvl w:val=\"0\"/></w:pPr>\
         <w:rPr><w:b/><w:color w:val=\"2F5496\"/><w:sz w:val=\"32\"/></w:rPr></w:style>\
         </w:styles>"
    )
}

#[cfg(test)]
mod tests {
    use super::document_xml;
    use crate::export::{DocumentOutline, OutlineEntry};
    use crate::model::project::DocType;

    #[test]
    fn document_xml_emits_heading_then_body_paragraphs() {
        let outline = DocumentOutline {
            title: "Plan".to_string(),
            doc_type: DocType::Docx,
            entries: vec![OutlineEntry {
                heading: "R&D".to_string(),
                body: "one\ntwo".to_string(),
            }],
        };
        let xml = document_xml(&outline);
        let heading = xml.find("R&amp;D").unwrap();
        let one = xml.find(">one<").unwrap();
        let two = xml.find(">two<").unwrap();
        assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
        assert!(heading < one && one < two);
    }
}

//! PresentationML rendering.
//!
//! Layout: one slide per outline entry, heading in the title placeholder
//! and one body paragraph per content line. The package carries a single
//! master, layout and theme.

use super::package::{
    content_types_xml, core_properties_xml, escape_xml, relationships_xml, PackageWriter,
    Relationship, CORE_PROPS_CONTENT_TYPE, REL_CORE_PROPS, REL_OFFICE_DOCUMENT, XML_DECLARATION,
};
use super::{DocumentOutline, ExportError, OutlineEntry};

const NAMESPACES: &str = "xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
     xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
     xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"";

const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const SLIDE_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const MASTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const LAYOUT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const THEME_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Slide ids start at 256 per PresentationML.
const FIRST_SLIDE_ID: usize = 256;
/// Relationship ids rId1/rId2 of the presentation part are master and theme.
const FIRST_SLIDE_REL: usize = 3;

const SLIDE_WIDTH: u64 = 12_192_000;
const SLIDE_HEIGHT: u64 = 6_858_000;
const TITLE_FRAME: Frame = Frame {
    x: 838_200,
    y: 365_125,
    cx: 10_515_600,
    cy: 1_325_563,
};
const BODY_FRAME: Frame = Frame {
    x: 838_200,
    y: 1_825_625,
    cx: 10_515_600,
    cy: 4_351_338,
};

#[derive(Clone, Copy)]
struct Frame {
    x: u64,
    y: u64,
    cx: u64,
    cy: u64,
}

impl Frame {
    fn xfrm(self) -> String {
        format!(
            "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
            self.x, self.y, self.cx, self.cy
        )
    }
}

pub(super) fn render(outline: &DocumentOutline) -> Result<Vec<u8>, ExportError> {
    let slide_count = outline.entries.len();
    let mut package = PackageWriter::new();

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), PRESENTATION_CONTENT_TYPE),
        (
            "/ppt/slideMasters/slideMaster1.xml".to_string(),
            MASTER_CONTENT_TYPE,
        ),
        (
            "/ppt/slideLayouts/slideLayout1.xml".to_string(),
            LAYOUT_CONTENT_TYPE,
        ),
        ("/ppt/theme/theme1.xml".to_string(), THEME_CONTENT_TYPE),
        ("/docProps/core.xml".to_string(), CORE_PROPS_CONTENT_TYPE),
    ];
    overrides.extend(
        (1..=slide_count).map(|n| (format!("/ppt/slides/slide{n}.xml"), SLIDE_CONTENT_TYPE)),
    );
    package.add("[Content_Types].xml", &content_types_xml(&overrides))?;

    package.add(
        "_rels/.rels",
        &relationships_xml(&[
            Relationship {
                id: "rId1".to_string(),
                kind: REL_OFFICE_DOCUMENT,
                target: "ppt/presentation.xml".to_string(),
            },
            Relationship {
                id: "rId2".to_string(),
                kind: REL_CORE_PROPS,
                target: "docProps/core.xml".to_string(),
            },
        ]),
    )?;
    package.add("docProps/core.xml", &core_properties_xml(&outline.title))?;

    package.add("ppt/presentation.xml", &presentation_xml(slide_count))?;
    package.add(
        "ppt/_rels/presentation.xml.rels",
        &presentation_rels_xml(slide_count),
    )?;

    package.add("ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
    package.add(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &relationships_xml(&[
            Relationship {
                id: "rId1".to_string(),
                kind: &rel_kind_slide_layout(),
                target: "../slideLayouts/slideLayout1.xml".to_string(),
            },
            Relationship {
                id: "rId2".to_string(),
                kind: &rel_kind_theme(),
                target: "../theme/theme1.xml".to_string(),
            },
        ]),
    )?;
    package.add("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml())?;
    package.add(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &relationships_xml(&[Relationship {
            id: "rId1".to_string(),
            kind: &format!("{REL_BASE}/slideMaster"),
            target: "../slideMasters/slideMaster1.xml".to_string(),
        }]),
    )?;
    package.add("ppt/theme/theme1.xml", THEME_XML)?;

    let layout_kind = rel_kind_slide_layout();
    let layout_rel = [Relationship {
        id: "rId1".to_string(),
        kind: &layout_kind,
        target: "../slideLayouts/slideLayout1.xml".to_string(),
    }];
    let layout_rels_xml = relationships_xml(&layout_rel);
    for (index, entry) in outline.entries.iter().enumerate() {
        let n = index + 1;
        package.add(&format!("ppt/slides/slide{n}.xml"), &slide_xml(entry))?;
        package.add(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            &layout_rels_xml,
        )?;
    }

    package.finish()
}

fn rel_kind_slide_layout() -> String {
    format!("{REL_BASE}/slideLayout")
}

fn rel_kind_theme() -> String {
    format!("{REL_BASE}/theme")
}

fn presentation_xml(slide_count: usize) -> String {
    let slide_ids: String = (0..slide_count)
        .map(|index| {
            format!(
                "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
                FIRST_SLIDE_ID + index,
                FIRST_SLIDE_REL + index
            )
        })
        .collect();
    let slide_list = if slide_ids.is_empty() {
        String::new()
    } else {
        format!("<p:sldIdLst>{slide_ids}</p:sldIdLst>")
    };

    format!(
        "{XML_DECLARATION}<p:presentation {NAMESPACES}>\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         {slide_list}\
         <p:sldSz cx=\"{SLIDE_WIDTH}\" cy=\"{SLIDE_HEIGHT}\"/>\
         <p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
         </p:presentation>"
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let master_kind = format!("{REL_BASE}/slideMaster");
    let theme_kind = rel_kind_theme();
    let slide_kind = format!("{REL_BASE}/slide");

    let mut relationships = vec![
        Relationship {
            id: "rId1".to_string(),
            kind: &master_kind,
            target: "slideMasters/slideMaster1.xml".to_string(),
        },
        Relationship {
            id: "rId2".to_string(),
            kind: &theme_kind,
            target: "theme/theme1.xml".to_string(),
        },
    ];
    relationships.extend((0..slide_count).map(|index| Relationship {
        id: format!("rId{}", FIRST_SLIDE_REL + index),
        kind: &slide_kind,
        target: format!("slides/slide{}.xml", index + 1),
    }));
    relationships_xml(&relationships)
}

fn slide_xml(entry: &OutlineEntry) -> String {
    let body_paragraphs: String = match entry.paragraphs().as_slice() {
        [] => "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>".to_string(),
        lines => lines.iter().map(|line| text_paragraph(line)).collect(),
    };

    format!(
        "{XML_DECLARATION}<p:sld {NAMESPACES}><p:cSld><p:spTree>{group}\
         {title}{body}</p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        group = group_shape_header(),
        title = placeholder_shape(
            2,
            "Title 1",
            "<p:ph type=\"title\"/>",
            TITLE_FRAME.xfrm(),
            "<a:bodyPr/>",
            &text_paragraph(&entry.heading),
        ),
        body = placeholder_shape(
            3,
            "Content Placeholder 2",
            "<p:ph idx=\"1\"/>",
            BODY_FRAME.xfrm(),
            "<a:bodyPr><a:normAutofit/></a:bodyPr>",
            &body_paragraphs,
        ),
    )
}

fn text_paragraph(text: &str) -> String {
    format!(
        "<a:p><a:r><a:rPr lang=\"en-US\" dirty=\"0\"/><a:t>{}</a:t></a:r></a:p>",
        escape_xml(text)
    )
}

fn group_shape_header() -> &'static str {
    "<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
     <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
     <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>"
}

fn placeholder_shape(
    id: u32,
    name: &str,
    placeholder: &str,
    xfrm: String,
    body_properties: &str,
    paragraphs: &str,
) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/>\
         <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr><p:nvPr>{placeholder}</p:nvPr></p:nvSpPr>\
         <p:spPr>{xfrm}</p:spPr>\
         <p:txBody>{body_properties}<a:lstStyle/>{paragraphs}</p:txBody></p:sp>"
    )
}

fn slide_master_xml() -> String {
    format!(
        "{XML_DECLARATION}<p:sldMaster {NAMESPACES}><p:cSld><p:bg><p:bgRef idx=\"1001\">\
         <a:schemeClr val=\"bg1\"/></p:bgRef></p:bg><p:spTree>{group}\
         {title}{body}</p:spTree></p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" \
         accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" \
         accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
         <p:txStyles>\
         <p:titleStyle><a:lvl1pPr><a:defRPr sz=\"4000\"><a:solidFill><a:schemeClr val=\"tx1\"/>\
         </a:solidFill><a:latin typeface=\"+mj-lt\"/></a:defRPr></a:lvl1pPr></p:titleStyle>\
         <p:bodyStyle><a:lvl1pPr><a:spcBef><a:spcPts val=\"1000\"/></a:spcBef>\
         <a:defRPr sz=\"2000\"><a:solidFill><a:schemeClr val=\"tx1\"/></a:solidFill>\
         <a:latin typeface=\"+mn-lt\"/></a:defRPr></a:lvl1pPr></p:bodyStyle>\
         <p:otherStyle><a:lvl1pPr><a:defRPr/></a:lvl1pPr></p:otherStyle>\
         </p:txStyles></p:sldMaster>",
        group = group_shape_header(),
        title = placeholder_shape(
            2,
            "Title Placeholder 1",
            "<p:ph type=\"title\"/>",
            TITLE_FRAME.xfrm(),
            "<a:bodyPr/>",
            "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>",
        ),
        body = placeholder_shape(
            3,
            "Text Placeholder 2",
            "<p:ph type=\"body\" idx=\"1\"/>",
            BODY_FRAME.xfrm(),
            "<a:bodyPr/>",
            "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>",
        ),
    )
}

fn slide_layout_xml() -> String {
    format!(
        "{XML_DECLARATION}<p:sldLayout {NAMESPACES} type=\"obj\" preserve=\"1\">\
         <p:cSld name=\"Title and Content\"><p:spTree>{group}{title}{body}</p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>",
        group = group_shape_header(),
        title = placeholder_shape(
            2,
            "Title 1",
            "<p:ph type=\"title\"/>",
            TITLE_FRAME.xfrm(),
            "<a:bodyPr/>",
            "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>",
        ),
        body = placeholder_shape(
            3,
            "Content Placeholder 2",
            "<p:ph idx=\"1\"/>",
            BODY_FRAME.xfrm(),
            "<a:bodyPr/>",
            "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>",
        ),
    )
}

const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="DocPilot">"#,
    r#"<a:themeElements>"#,
    r#"<a:clrScheme name="DocPilot">"#,
    r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
    r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="44546A"/></a:dk2>"#,
    r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="4472C4"/></a:accent1>"#,
    r#"<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>"#,
    r#"<a:accent4><a:srgbClr val="FFC000"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>"#,
    r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#,
    r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#,
    r#"</a:clrScheme>"#,
    r#"<a:fontScheme name="DocPilot">"#,
    r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    r#"</a:fontScheme>"#,
    r#"<a:fmtScheme name="DocPilot">"#,
    r#"<a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:fillStyleLst>"#,
    r#"<a:lnStyleLst>"#,
    r#"<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"</a:lnStyleLst>"#,
    r#"<a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"</a:effectStyleLst>"#,
    r#"<a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:bgFillStyleLst>"#,
    r#"</a:fmtScheme>"#,
    r#"</a:themeElements>"#,
    r#"</a:theme>"#
);

#[cfg(test)]
mod tests {
    use super::{presentation_xml, slide_xml};
    use crate::export::OutlineEntry;

    #[test]
    fn presentation_lists_one_slide_id_per_entry() {
        let xml = presentation_xml(2);
        assert!(xml.contains("<p:sldId id=\"256\" r:id=\"rId3\"/>"));
        assert!(xml.contains("<p:sldId id=\"257\" r:id=\"rId4\"/>"));
        assert!(!xml.contains("id=\"258\""));
    }

    #[test]
    fn slide_places_heading_in_title_placeholder() {
        let entry = OutlineEntry {
            heading: "Budget".to_string(),
            body: String::new(),
        };
        let xml = slide_xml(&entry);
        let title_ph = xml.find("<p:ph type=\"title\"/>").unwrap();
        let heading = xml.find(">Budget<").unwrap();
        let body_ph = xml.find("<p:ph idx=\"1\"/>").unwrap();
        assert!(title_ph < heading && heading < body_ph);
        assert!(xml.contains("<a:endParaRPr lang=\"en-US\"/>"));
    }
}

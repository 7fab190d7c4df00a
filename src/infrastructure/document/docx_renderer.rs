//! DOCX offer letter renderer.
//!
//! A DOCX file is a zip archive of XML parts. Rendering rewrites the body,
//! header and footer parts, substituting `{{ name }}` placeholders. Word often
//! splits a placeholder across several runs, so any markup found between the
//! braces is kept after the substituted value, leaving the XML balanced.

use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::sync::{Arc, LazyLock};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::service::{DocumentError, DocumentRenderer, DocumentResult, ImageAnchor};

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
/// A brace pair with run markup between the two braces.
static SPLIT_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{((?:<[^>]*>)+)\{").unwrap());
static SPLIT_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}((?:<[^>]*>)+)\}").unwrap());
static TEXT_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^word/(document|header\d*|footer\d*)\.xml$").unwrap());

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const QR_MEDIA_PART: &str = "word/media/offer_qr.png";
const QR_MEDIA_TARGET: &str = "media/offer_qr.png";
const QR_RELATIONSHIP_ID: &str = "rIdOfferQr";
const IMAGE_RELATIONSHIP_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const EMU_PER_INCH: f64 = 914_400.0;

/// Renders offer letters from an in-memory DOCX template.
#[derive(Clone)]
pub struct DocxRenderer {
    template: Arc<Vec<u8>>,
}

impl DocxRenderer {
    /// Wraps template bytes, checking that they form a DOCX with a body part.
    pub fn from_bytes(template: Vec<u8>) -> DocumentResult<Self> {
        {
            let mut archive = ZipArchive::new(Cursor::new(template.as_slice()))?;
            if archive.by_name(DOCUMENT_PART).is_err() {
                return Err(DocumentError::MissingPart(DOCUMENT_PART));
            }
        }

        Ok(Self {
            template: Arc::new(template),
        })
    }

    /// Reads and checks the template at `path`.
    pub async fn load(path: &Path) -> DocumentResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(bytes)
    }
}

#[async_trait]
impl DocumentRenderer for DocxRenderer {
    async fn render(&self, fields: &BTreeMap<String, String>) -> DocumentResult<Vec<u8>> {
        rewrite_archive(
            &self.template,
            |name, contents| {
                if !TEXT_PART_REGEX.is_match(name) {
                    return Ok(None);
                }
                let xml = as_utf8(name, contents)?;
                Ok(Some(fill_placeholders(xml, fields)?.into_bytes()))
            },
            &[],
        )
    }

    async fn embed_image(
        &self,
        document: &[u8],
        png: &[u8],
        anchor: ImageAnchor,
    ) -> DocumentResult<Vec<u8>> {
        let (width, height) = image::ImageReader::new(Cursor::new(png))
            .with_guessed_format()?
            .into_dimensions()?;
        let cx = (anchor.width_inches * EMU_PER_INCH).round() as u64;
        let cy = cx * u64::from(height) / u64::from(width.max(1));
        let run = drawing_run(cx, cy);

        let mut saw_relationships = false;
        let output = rewrite_archive(
            document,
            |name, contents| match name {
                DOCUMENT_PART => {
                    let xml = as_utf8(name, contents)?;
                    Ok(Some(insert_run_at(xml, anchor, &run)?.into_bytes()))
                }
                RELATIONSHIPS_PART => {
                    saw_relationships = true;
                    let xml = as_utf8(name, contents)?;
                    Ok(Some(add_image_relationship(xml)?.into_bytes()))
                }
                CONTENT_TYPES_PART => {
                    let xml = as_utf8(name, contents)?;
                    Ok(Some(ensure_png_content_type(xml)?.into_bytes()))
                }
                _ => Ok(None),
            },
            &[(QR_MEDIA_PART, png)],
        )?;

        if !saw_relationships {
            return Err(DocumentError::MissingPart(RELATIONSHIPS_PART));
        }

        Ok(output)
    }

    fn is_ready(&self) -> bool {
        !self.template.is_empty()
    }
}

fn as_utf8<'a>(name: &str, contents: &'a [u8]) -> DocumentResult<&'a str> {
    std::str::from_utf8(contents).map_err(|_| DocumentError::Encoding(name.to_string()))
}

/// Copies every entry of `source` into a new archive.
///
/// `edit` may return replacement contents for an entry. Entries named in
/// `additions` are dropped from the source and written at the end instead.
fn rewrite_archive<F>(
    source: &[u8],
    mut edit: F,
    additions: &[(&str, &[u8])],
) -> DocumentResult<Vec<u8>>
where
    F: FnMut(&str, &[u8]) -> DocumentResult<Option<Vec<u8>>>,
{
    let mut archive = ZipArchive::new(Cursor::new(source))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        if entry.is_dir() {
            writer.add_directory(name, options)?;
            continue;
        }
        if additions.iter().any(|(added, _)| *added == name) {
            continue;
        }

        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents)?;
        let contents = edit(&name, &contents)?.unwrap_or(contents);

        writer.start_file(name, options)?;
        writer.write_all(&contents)?;
    }

    for (name, contents) in additions {
        writer.start_file(*name, options)?;
        writer.write_all(contents)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Substitutes `{{ name }}` placeholders in a WordprocessingML part.
pub fn fill_placeholders(xml: &str, fields: &BTreeMap<String, String>) -> DocumentResult<String> {
    // Rejoin braces Word split across runs. The markup moves in front of
    // `{{` and inside `}}`, where it is kept as placeholder markup below.
    let xml = SPLIT_OPEN_REGEX.replace_all(xml, "${1}{{");
    let xml = SPLIT_CLOSE_REGEX.replace_all(&xml, "${1}}}");

    let mut out = String::with_capacity(xml.len());
    let mut rest: &str = &xml;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or(DocumentError::UnterminatedPlaceholder(offset + start))?;
        let inner = &after[..end];
        let key = TAG_REGEX.replace_all(inner, "");
        let key = key.trim();

        out.push_str(&rest[..start]);
        match fields.get(key) {
            Some(value) => out.push_str(&escape_xml(value)),
            None => tracing::debug!(placeholder = key, "No value for template placeholder"),
        }
        for tag in TAG_REGEX.find_iter(inner) {
            out.push_str(tag.as_str());
        }

        let consumed = start + 2 + end + 2;
        rest = &rest[consumed..];
        offset += consumed;
    }

    out.push_str(rest);
    Ok(out)
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Offset of the next `<tag` opening in `xml[from..to]`, skipping longer tag names.
fn find_open(xml: &str, tag: &str, from: usize, to: usize) -> Option<usize> {
    let needle = format!("<{tag}");
    let mut pos = from;

    while let Some(i) = xml[pos..to].find(&needle) {
        let at = pos + i;
        let next = xml.as_bytes().get(at + needle.len()).copied();
        if matches!(next, Some(b'>' | b' ' | b'/' | b'\t' | b'\r' | b'\n')) {
            return Some(at);
        }
        pos = at + needle.len();
    }

    None
}

fn is_self_closing(xml: &str, open_tag_end: usize) -> bool {
    open_tag_end > 0 && xml.as_bytes()[open_tag_end - 1] == b'/'
}

/// End offset (exclusive) of the element opening at `start`, honouring nesting.
fn element_end(xml: &str, tag: &str, start: usize) -> Option<usize> {
    let open_end = start + xml[start..].find('>')?;
    if is_self_closing(xml, open_end) {
        return Some(open_end + 1);
    }

    let close = format!("</{tag}>");
    let mut depth = 1;
    let mut pos = open_end + 1;

    loop {
        let next_close = pos + xml[pos..].find(&close)?;
        match find_open(xml, tag, pos, next_close) {
            Some(nested) => {
                let nested_end = nested + xml[nested..].find('>')?;
                if !is_self_closing(xml, nested_end) {
                    depth += 1;
                }
                pos = nested_end + 1;
            }
            None => {
                depth -= 1;
                pos = next_close + close.len();
                if depth == 0 {
                    return Some(pos);
                }
            }
        }
    }
}

/// Span of the `n`-th `tag` element directly inside `xml[from..to]`.
fn nth_element(xml: &str, tag: &str, from: usize, to: usize, n: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    let mut index = 0;

    while let Some(start) = find_open(xml, tag, pos, to) {
        let end = element_end(xml, tag, start)?;
        if index == n {
            return Some((start, end));
        }
        index += 1;
        pos = end;
    }

    None
}

fn insert_run_at(xml: &str, anchor: ImageAnchor, run: &str) -> DocumentResult<String> {
    let missing = |what: String| DocumentError::AnchorNotFound(what);

    let (table_start, table_end) = nth_element(xml, "w:tbl", 0, xml.len(), anchor.table)
        .ok_or_else(|| missing(format!("table {}", anchor.table)))?;
    let (row_start, row_end) = nth_element(xml, "w:tr", table_start, table_end, anchor.row)
        .ok_or_else(|| missing(format!("row {} of table {}", anchor.row, anchor.table)))?;
    let (cell_start, cell_end) = nth_element(xml, "w:tc", row_start, row_end, anchor.cell)
        .ok_or_else(|| missing(format!("cell {} of row {}", anchor.cell, anchor.row)))?;
    let (para_start, para_end) = nth_element(xml, "w:p", cell_start, cell_end, 0)
        .ok_or_else(|| missing(format!("paragraph in cell {}", anchor.cell)))?;

    let paragraph = &xml[para_start..para_end];
    let rewritten = if paragraph.ends_with("/>") && !paragraph.contains("</w:p>") {
        format!("{}>{run}</w:p>", paragraph[..paragraph.len() - 2].trim_end())
    } else {
        let close_at = paragraph.len() - "</w:p>".len();
        format!("{}{run}</w:p>", &paragraph[..close_at])
    };

    let mut out = String::with_capacity(xml.len() + run.len());
    out.push_str(&xml[..para_start]);
    out.push_str(&rewritten);
    out.push_str(&xml[para_end..]);
    Ok(out)
}

fn add_image_relationship(xml: &str) -> DocumentResult<String> {
    if xml.contains(&format!("Id=\"{QR_RELATIONSHIP_ID}\"")) {
        return Ok(xml.to_string());
    }

    let close_at = xml
        .rfind("</Relationships>")
        .ok_or(DocumentError::MissingPart(RELATIONSHIPS_PART))?;
    let relationship = format!(
        r#"<Relationship Id="{QR_RELATIONSHIP_ID}" Type="{IMAGE_RELATIONSHIP_TYPE}" Target="{QR_MEDIA_TARGET}"/>"#
    );

    Ok(format!("{}{relationship}{}", &xml[..close_at], &xml[close_at..]))
}

fn ensure_png_content_type(xml: &str) -> DocumentResult<String> {
    if xml.to_ascii_lowercase().contains("extension=\"png\"") {
        return Ok(xml.to_string());
    }

    let close_at = xml
        .rfind("</Types>")
        .ok_or(DocumentError::MissingPart(CONTENT_TYPES_PART))?;

    Ok(format!(
        r#"{}<Default Extension="png" ContentType="image/png"/>{}"#,
        &xml[..close_at],
        &xml[close_at..]
    ))
}

/// Inline picture run referencing the QR relationship.
///
/// Namespaces are declared on the elements that use them, so the run is
/// valid regardless of what the document root declares.
fn drawing_run(cx: u64, cy: u64) -> String {
    format!(
        concat!(
            r#"<w:r><w:drawing>"#,
            r#"<wp:inline xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="4242" name="Offer QR"/>"#,
            r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
            r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:nvPicPr><pic:cNvPr id="0" name="offer_qr.png"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:embed="{rid}"/>"#,
            r#"<a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
        ),
        cx = cx,
        cy = cy,
        rid = QR_RELATIONSHIP_ID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, body) in [
            (CONTENT_TYPES_PART, CONTENT_TYPES),
            (RELATIONSHIPS_PART, RELS),
            (DOCUMENT_PART, document_xml),
        ] {
            writer.start_file(name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn read_part(docx: &[u8], name: &str) -> Option<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut entry = archive.by_name(name).ok()?;
        let mut out = Vec::new();
        entry.read_to_end(&mut out).unwrap();
        Some(out)
    }

    fn fields() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("intern_name".to_string(), "Asha Rao".to_string()),
            ("domain".to_string(), "R&D".to_string()),
        ])
    }

    fn body_with_table() -> String {
        concat!(
            r#"<w:document xmlns:w="w"><w:body>"#,
            r#"<w:tbl><w:tblPr/><w:tr><w:trPr/>"#,
            r#"<w:tc><w:p><w:r><w:t>Logo</w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:p><w:r><w:t>{{ intern_name }}</w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:tcPr/><w:p><w:pPr/></w:p></w:tc>"#,
            r#"</w:tr></w:tbl></w:body></w:document>"#,
        )
        .to_string()
    }

    fn qr_png() -> Vec<u8> {
        crate::utils::qr::render_qr_png("ABC123XYZ").unwrap()
    }

    #[test]
    fn test_fill_simple_placeholder() {
        let xml = "<w:t>Dear {{ intern_name }},</w:t>";
        assert_eq!(
            fill_placeholders(xml, &fields()).unwrap(),
            "<w:t>Dear Asha Rao,</w:t>"
        );
    }

    #[test]
    fn test_fill_placeholder_split_across_runs() {
        let xml = r#"<w:r><w:t>{{ intern_</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>name }}</w:t></w:r>"#;
        assert_eq!(
            fill_placeholders(xml, &fields()).unwrap(),
            r#"<w:r><w:t>Asha Rao</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t></w:t></w:r>"#
        );
    }

    #[test]
    fn test_fill_placeholder_with_split_braces() {
        let xml = r#"<w:r><w:t>Dear {</w:t></w:r><w:r><w:t>{ intern_name }</w:t></w:r><w:r><w:t>}!</w:t></w:r>"#;
        assert_eq!(
            fill_placeholders(xml, &fields()).unwrap(),
            r#"<w:r><w:t>Dear </w:t></w:r><w:r><w:t>Asha Rao</w:t></w:r><w:r><w:t>!</w:t></w:r>"#
        );
    }

    #[test]
    fn test_fill_escapes_values() {
        let out = fill_placeholders("<w:t>{{domain}}</w:t>", &fields()).unwrap();
        assert_eq!(out, "<w:t>R&amp;D</w:t>");
    }

    #[test]
    fn test_unknown_placeholder_renders_empty() {
        let out = fill_placeholders("<w:t>[{{ unknown }}]</w:t>", &fields()).unwrap();
        assert_eq!(out, "<w:t>[]</w:t>");
    }

    #[test]
    fn test_unterminated_placeholder_is_error() {
        let result = fill_placeholders("<w:t>{{ intern_name</w:t>", &fields());
        assert!(matches!(
            result,
            Err(DocumentError::UnterminatedPlaceholder(5))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_non_docx() {
        assert!(DocxRenderer::from_bytes(b"plain text".to_vec()).is_err());
    }

    #[tokio::test]
    async fn test_render_fills_document_part() {
        let renderer = DocxRenderer::from_bytes(build_docx(&body_with_table())).unwrap();
        let rendered = renderer.render(&fields()).await.unwrap();

        let body = String::from_utf8(read_part(&rendered, DOCUMENT_PART).unwrap()).unwrap();
        assert!(body.contains("<w:t>Asha Rao</w:t>"));
        assert!(!body.contains("{{"));
        assert!(read_part(&rendered, CONTENT_TYPES_PART).is_some());
    }

    #[tokio::test]
    async fn test_embed_image_into_third_cell() {
        let renderer = DocxRenderer::from_bytes(build_docx(&body_with_table())).unwrap();
        let rendered = renderer.render(&fields()).await.unwrap();
        let png = qr_png();

        let embedded = renderer
            .embed_image(&rendered, &png, ImageAnchor::OFFER_QR)
            .await
            .unwrap();

        let body = String::from_utf8(read_part(&embedded, DOCUMENT_PART).unwrap()).unwrap();
        let third_cell = body.rfind("<w:tc>").unwrap();
        let drawing = body.find("<w:drawing>").unwrap();
        assert!(drawing > third_cell);
        assert!(body.contains(r#"cx="1371600" cy="1371600""#));

        let rels = String::from_utf8(read_part(&embedded, RELATIONSHIPS_PART).unwrap()).unwrap();
        assert!(rels.contains(QR_RELATIONSHIP_ID));

        let types = String::from_utf8(read_part(&embedded, CONTENT_TYPES_PART).unwrap()).unwrap();
        assert!(types.contains(r#"Extension="png""#));

        assert_eq!(read_part(&embedded, QR_MEDIA_PART).unwrap(), png);
    }

    #[tokio::test]
    async fn test_embed_fails_without_table() {
        let renderer = DocxRenderer::from_bytes(build_docx(
            r#"<w:document><w:body><w:p><w:r><w:t>{{ intern_name }}</w:t></w:r></w:p></w:body></w:document>"#,
        ))
        .unwrap();
        let rendered = renderer.render(&fields()).await.unwrap();

        let result = renderer
            .embed_image(&rendered, &qr_png(), ImageAnchor::OFFER_QR)
            .await;
        assert!(matches!(result, Err(DocumentError::AnchorNotFound(_))));
    }

    #[test]
    fn test_insert_into_self_closing_paragraph() {
        let xml = r#"<w:tbl><w:tr><w:tc/><w:tc/><w:tc><w:p/></w:tc></w:tr></w:tbl>"#;
        let out = insert_run_at(xml, ImageAnchor::OFFER_QR, "<w:r/>").unwrap();
        assert_eq!(
            out,
            r#"<w:tbl><w:tr><w:tc/><w:tc/><w:tc><w:p><w:r/></w:p></w:tc></w:tr></w:tbl>"#
        );
    }

    #[test]
    fn test_nested_table_rows_are_skipped() {
        let xml = concat!(
            r#"<w:tbl><w:tr>"#,
            r#"<w:tc><w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl><w:p/></w:tc>"#,
            r#"<w:tc><w:p/></w:tc><w:tc><w:p>X</w:p></w:tc>"#,
            r#"</w:tr></w:tbl>"#,
        );
        let out = insert_run_at(xml, ImageAnchor::OFFER_QR, "<w:r/>").unwrap();
        assert!(out.contains("<w:p>X<w:r/></w:p>"));
    }

    #[test]
    fn test_find_open_skips_longer_tags() {
        let xml = "<w:pPr/><w:p>";
        assert_eq!(find_open(xml, "w:p", 0, xml.len()), Some(8));
    }
}

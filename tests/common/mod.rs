#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// One manifest item of a test EPUB, stored under `OEBPS/`.
pub struct Item {
    pub id: &'static str,
    pub href: &'static str,
    pub media_type: &'static str,
    pub properties: Option<&'static str>,
    pub data: Vec<u8>,
    pub in_spine: bool,
}

impl Item {
    pub fn chapter(id: &'static str, href: &'static str, body: &str) -> Self {
        Item {
            id,
            href,
            media_type: "application/xhtml+xml",
            properties: None,
            data: xhtml(body).into_bytes(),
            in_spine: true,
        }
    }

    pub fn ncx(xml: &str) -> Self {
        Item {
            id: "ncx",
            href: "toc.ncx",
            media_type: "application/x-dtbncx+xml",
            properties: None,
            data: xml.as_bytes().to_vec(),
            in_spine: false,
        }
    }

    pub fn nav(body: &str) -> Self {
        Item {
            id: "nav",
            href: "nav.xhtml",
            media_type: "application/xhtml+xml",
            properties: Some("nav"),
            data: xhtml(body).into_bytes(),
            in_spine: false,
        }
    }

    pub fn image(id: &'static str, href: &'static str, media_type: &'static str) -> Self {
        Item {
            id,
            href,
            media_type,
            properties: None,
            data: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
            in_spine: false,
        }
    }

    /// An image flagged with the EPUB 3 `cover-image` property.
    pub fn cover_image(id: &'static str, href: &'static str, media_type: &'static str) -> Self {
        Item {
            properties: Some("cover-image"),
            ..Item::image(id, href, media_type)
        }
    }
}

pub fn xhtml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>t</title></head>
<body>{body}</body>
</html>"#
    )
}

/// Write an EPUB with the given title, author, manifest items and extra
/// `<meta>` lines into `dir`, returning its path.
pub fn write_epub(dir: &Path, name: &str, title: &str, author: &str, items: &[Item], meta: &str) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut zip = ZipWriter::new(file);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();
    zip.start_file("META-INF/container.xml", stored).unwrap();
    zip.write_all(CONTAINER.as_bytes()).unwrap();

    let manifest: String = items
        .iter()
        .map(|item| {
            let properties = item
                .properties
                .map(|p| format!(r#" properties="{p}""#))
                .unwrap_or_default();
            format!(
                r#"    <item id="{}" href="{}" media-type="{}"{properties}/>"#,
                item.id, item.href, item.media_type
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let spine: String = items
        .iter()
        .filter(|item| item.in_spine)
        .map(|item| format!(r#"    <itemref idref="{}"/>"#, item.id))
        .collect::<Vec<_>>()
        .join("\n");
    let toc_attr = if items.iter().any(|item| item.id == "ncx") {
        r#" toc="ncx""#
    } else {
        ""
    };

    let opf = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:12345678-1234-1234-1234-123456789abc</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:creator>{author}</dc:creator>
    <dc:language>en</dc:language>
    <meta property="dcterms:modified">2024-01-01T00:00:00Z</meta>
{meta}
  </metadata>
  <manifest>
{manifest}
  </manifest>
  <spine{toc_attr}>
{spine}
  </spine>
</package>"#
    );
    zip.start_file("OEBPS/content.opf", stored).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();

    for item in items {
        zip.start_file(format!("OEBPS/{}", item.href), stored).unwrap();
        zip.write_all(&item.data).unwrap();
    }

    zip.finish().unwrap();
    path
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

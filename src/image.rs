use crate::reader::CoverImage;
use rbook::prelude::*;
use rbook::Epub;
use std::path::Path;
use tracing::{debug, warn};

/// Locate and read the cover image of an EPUB.
///
/// Order: the manifest's declared cover, the `<meta name="cover">` id
/// (EPUB 3 packages keep it too), then any image whose id or file name
/// mentions "cover". A missing or unreadable cover is not an error.
pub fn find_cover(epub: &Epub) -> Option<CoverImage> {
    let manifest = epub.manifest();

    let entry = manifest
        .cover_image()
        .or_else(|| {
            let metadata = epub.metadata();
            let id = metadata.by_property("cover").next()?.value().trim().to_string();
            manifest
                .by_id(&id)
                .filter(|entry| entry.media_type().to_lowercase().starts_with("image/"))
        })
        .or_else(|| {
            manifest
                .images()
                .find(|entry| entry.id().to_lowercase().contains("cover"))
        })
        .or_else(|| {
            manifest
                .images()
                .find(|entry| file_name(entry.href().as_str()).to_lowercase().contains("cover"))
        })?;

    let href = entry.href().to_string();
    let media_type = entry.media_type().to_string();

    match entry.read_bytes() {
        Ok(data) if !data.is_empty() => {
            let extension = cover_extension(&media_type, &href);
            debug!(%href, %extension, bytes = data.len(), "found cover image");
            Some(CoverImage { data, extension })
        }
        Ok(_) => {
            warn!(%href, "cover image is empty, ignoring");
            None
        }
        Err(e) => {
            warn!(%href, error = %e, "failed to read cover image");
            None
        }
    }
}

/// File extension for a cover, from its media type or else its file name.
pub fn cover_extension(media_type: &str, href: &str) -> String {
    let media_type = media_type.to_lowercase();
    if media_type.contains("jpeg") || media_type.contains("jpg") {
        return "jpg".to_string();
    }
    if media_type.contains("png") {
        return "png".to_string();
    }
    if media_type.contains("gif") {
        return "gif".to_string();
    }

    let suffix = Path::new(file_name(href))
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match suffix.as_deref() {
        Some("png") => "png".to_string(),
        Some("gif") => "gif".to_string(),
        _ => "jpg".to_string(),
    }
}

fn file_name(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}

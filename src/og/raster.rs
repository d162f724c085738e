// src/og/raster.rs
//! SVG to PNG rasterization.

use crate::error::AppError;
use resvg::{tiny_skia, usvg};

/// Rasterizes `svg` to a PNG of `width` x `height`.
///
/// When `font` is `None`, or holds no usable face, the system fonts are
/// used instead.
pub fn rasterize_png(
    svg: &str,
    font: Option<Vec<u8>>,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, AppError> {
    let mut options = usvg::Options::default();
    load_fonts(&mut options, font);

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| AppError::Image(format!("invalid card SVG: {}", e)))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| AppError::Image(format!("cannot allocate {}x{} canvas", width, height)))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| AppError::Image(format!("PNG encoding failed: {}", e)))
}

fn load_fonts(options: &mut usvg::Options, font: Option<Vec<u8>>) {
    let fontdb = options.fontdb_mut();
    if let Some(data) = font {
        fontdb.load_font_data(data);
    }
    if fontdb.is_empty() {
        log::debug!("No custom font face, loading system fonts");
        fontdb.load_system_fonts();
    }

    // Generic families resolve to fixed names ("Arial", "Times New Roman")
    // that may not be installed; point them at a face that is.
    let fallback = fontdb
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    match fallback {
        Some(family) => {
            log::debug!("Fallback font family: {}", family);
            fontdb.set_sans_serif_family(family.clone());
            fontdb.set_serif_family(family.clone());
            options.font_family = family;
        }
        None => log::warn!("No fonts available, OG card text will not be drawn"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn renders_png_of_requested_size() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#fafafa"/></svg>"##;
        let png = rasterize_png(svg, Some(Vec::new()), 20, 10).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    fn text_svg(text: &str) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="60"><rect width="200" height="60" fill="#fafafa"/><text x="10" y="40" font-family="No Such Family, sans-serif" font-size="32" fill="#413838">{}</text></svg>"##,
            text
        )
    }

    #[test]
    fn text_is_drawn_with_a_system_fallback_font() {
        let with_text = rasterize_png(&text_svg("USRM Blog"), None, 200, 60).unwrap();
        let blank = rasterize_png(&text_svg(""), None, 200, 60).unwrap();
        assert_ne!(with_text, blank);
    }

    #[test]
    fn unusable_custom_font_falls_back_to_system_fonts() {
        let with_text = rasterize_png(&text_svg("USRM Blog"), Some(vec![0u8; 16]), 200, 60).unwrap();
        let blank = rasterize_png(&text_svg(""), Some(vec![0u8; 16]), 200, 60).unwrap();
        assert_ne!(with_text, blank);
    }

    #[test]
    fn rejects_malformed_svg() {
        assert!(matches!(
            rasterize_png("<svg", Some(Vec::new()), 20, 10),
            Err(AppError::Image(_))
        ));
    }
}

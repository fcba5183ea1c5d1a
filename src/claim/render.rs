//! PDF rendering of laid-out claim forms.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};

use crate::error::{ClaimError, ClaimResult};

use super::layout::PageLayout;

/// Millimetres per inch.
const MM_PER_INCH: f32 = 25.4;

/// The decoded claim form background.
#[derive(Debug, Clone)]
pub struct TemplateImage {
    path: PathBuf,
    image: DynamicImage,
}

impl TemplateImage {
    /// Reads and decodes a PNG or JPEG template.
    ///
    /// Alpha is dropped: the page is opaque and the PDF writer emits a
    /// malformed soft mask for images that carry one.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Template`] when the file is missing, unreadable
    /// or not a supported image.
    pub fn open<P: AsRef<Path>>(path: P) -> ClaimResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| ClaimError::Template {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let image = match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            image,
        })
    }

    /// Returns the path the template was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the pixel dimensions of the template.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Returns the resolution at which the template spans `width_mm`.
    fn dpi_for_width(&self, width_mm: f32) -> f32 {
        self.image.width() as f32 * MM_PER_INCH / width_mm
    }
}

/// Renders a page layout over the template into PDF bytes.
///
/// The template is scaled to `layout.background_width` keeping its aspect
/// ratio and anchored at the top-left corner; the text is drawn over it in
/// Helvetica.
///
/// # Errors
///
/// Returns [`ClaimError::DocumentWrite`] naming `title` when the PDF cannot
/// be assembled.
pub fn render_claim_pdf(
    layout: &PageLayout,
    template: &TemplateImage,
    title: &str,
) -> ClaimResult<Vec<u8>> {
    let pdf_error = |message: String| ClaimError::DocumentWrite {
        path: title.to_string(),
        message,
    };

    let (doc, page, layer) = PdfDocument::new(title, Mm(layout.width), Mm(layout.height), "claim");
    let canvas = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_error(e.to_string()))?;

    let dpi = template.dpi_for_width(layout.background_width);
    let background_height = template.image.height() as f32 * MM_PER_INCH / dpi;
    Image::from_dynamic_image(&template.image).add_to_layer(
        canvas.clone(),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(layout.height - background_height)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    for placement in &layout.texts {
        canvas.use_text(
            placement.text.clone(),
            layout.font_size,
            Mm(placement.x),
            Mm(layout.baseline_from_bottom(placement)),
            &font,
        );
    }

    doc.save_to_bytes().map_err(|e| pdf_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{build_claim_document, layout_claim};
    use crate::config::ClaimConfig;
    use crate::models::{AssignmentRecord, Period};
    use chrono::DateTime;

    fn write_template(dir: &Path) -> PathBuf {
        let path = dir.join("template.png");
        image::RgbImage::from_pixel(42, 59, image::Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_open_missing_template() {
        match TemplateImage::open("/nonexistent/template.png") {
            Err(ClaimError::Template { path, .. }) => assert!(path.ends_with("template.png")),
            other => panic!("Expected Template error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_non_image_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(
            TemplateImage::open(&path),
            Err(ClaimError::Template { .. })
        ));
    }

    #[test]
    fn test_dpi_spans_page_width() {
        let dir = tempfile::tempdir().unwrap();
        let template = TemplateImage::open(write_template(dir.path())).unwrap();

        assert_eq!(template.dimensions(), (42, 59));
        let dpi = template.dpi_for_width(210.0);
        assert!((42.0 * 25.4 / dpi - 210.0).abs() < 1e-3);
    }

    #[test]
    fn test_open_flattens_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.png");
        image::RgbaImage::from_pixel(21, 30, image::Rgba([255, 255, 255, 128]))
            .save(&path)
            .unwrap();

        let template = TemplateImage::open(&path).unwrap();

        assert_eq!(template.dimensions(), (21, 30));
        assert!(matches!(template.image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_render_rgba_template_has_no_soft_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.png");
        image::RgbaImage::from_pixel(21, 30, image::Rgba([255, 255, 255, 255]))
            .save(&path)
            .unwrap();
        let template = TemplateImage::open(&path).unwrap();

        let record = AssignmentRecord::new("Alice", "2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z");
        let periods = vec![Period::from_record(&record).unwrap()];
        let claim_date = DateTime::parse_from_rfc3339("2024-01-31T00:00:00Z").unwrap();
        let config = ClaimConfig::default();
        let document = build_claim_document("Alice", &periods, claim_date, &config).unwrap();
        let layout = layout_claim(&document, &config);

        let bytes = render_claim_pdf(&layout, &template, &document.file_name).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(!bytes.windows(b"/SMask".len()).any(|w| w == b"/SMask"));
    }

    #[test]
    fn test_render_produces_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let template = TemplateImage::open(write_template(dir.path())).unwrap();

        let record = AssignmentRecord::new("Alice", "2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z");
        let periods = vec![Period::from_record(&record).unwrap()];
        let claim_date = DateTime::parse_from_rfc3339("2024-01-31T00:00:00Z").unwrap();
        let config = ClaimConfig::default();
        let document = build_claim_document("Alice", &periods, claim_date, &config).unwrap();
        let layout = layout_claim(&document, &config);

        let bytes = render_claim_pdf(&layout, &template, &document.file_name).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 100);
    }
}

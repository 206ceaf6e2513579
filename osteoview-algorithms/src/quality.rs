//! Pre-upload image quality analysis
//!
//! Scores an X-ray image for blur and contrast before submission and tracks
//! duplicate files across the upload slots. Warnings are advisory; nothing
//! here blocks an upload.

use image::imageops::FilterType;
use osteoview_core::QualityReport;
use tracing::{debug, warn};

/// Longest side of the analysis buffer; keeps scoring O(1) in the original
/// resolution.
pub const ANALYSIS_MAX_SIDE: u32 = 256;

/// Below this blur score the image appears blurry
pub const BLUR_WARN_THRESHOLD: f32 = 0.035;

/// Below this contrast score the image has low contrast
pub const CONTRAST_WARN_THRESHOLD: f32 = 0.12;

/// Identity of a file in an upload slot, used for duplicate detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    /// Modification time in milliseconds since the epoch
    pub modified_ms: u64,
}

impl FileMeta {
    /// Fingerprint derived from name, size, and modification time
    pub fn fingerprint(&self) -> String {
        format!("{}:{}:{}", self.name, self.size, self.modified_ms)
    }
}

/// Transient decoded preview retained alongside a slot's report.
///
/// Owned exclusively by the slot that created it; dropping the preview
/// releases the decoded buffer, so reassignment and teardown release it
/// exactly once through ordinary ownership.
#[derive(Debug, Clone)]
pub struct ImagePreview {
    pub width: u32,
    pub height: u32,
    /// Grayscale luminance, row-major, one byte per pixel
    pub luma: Vec<u8>,
}

/// Analyze one image file and produce its quality report.
///
/// The image is decoded and downscaled so its longest side is at most
/// [`ANALYSIS_MAX_SIDE`], preserving aspect ratio. Luminance uses the
/// perceptual weights 0.2126 R + 0.7152 G + 0.0722 B. Contrast is the
/// population standard deviation of luminance normalized by 255; blur is the
/// root-mean-square of the central-difference gradient magnitude over
/// interior pixels, normalized by 255 (low means flat, likely blurry).
///
/// A file that does not decode as a raster image yields a zero-score report
/// with no preview instead of an error, so one bad file never fails the
/// upload flow. The `duplicate` flag is not computed here; it is a cross-slot
/// property owned by [`UploadSlots`].
pub fn analyze_image(bytes: &[u8], meta: &FileMeta) -> (QualityReport, Option<ImagePreview>) {
    let fingerprint = meta.fingerprint();
    let decoded = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(err) => {
            warn!(file = %meta.name, %err, "image did not decode; reporting zero scores");
            return (
                QualityReport {
                    fingerprint,
                    blur_score: 0.0,
                    contrast_score: 0.0,
                    duplicate: false,
                },
                None,
            );
        }
    };

    let bounded = if decoded.width().max(decoded.height()) > ANALYSIS_MAX_SIDE {
        decoded.resize(ANALYSIS_MAX_SIDE, ANALYSIS_MAX_SIDE, FilterType::Triangle)
    } else {
        decoded
    };

    let rgb = bounded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let luminance: Vec<f32> = rgb
        .pixels()
        .map(|p| 0.2126 * p[0] as f32 + 0.7152 * p[1] as f32 + 0.0722 * p[2] as f32)
        .collect();

    let contrast_score = contrast(&luminance);
    let blur_score = gradient_rms(&luminance, width as usize, height as usize);
    debug!(
        file = %meta.name,
        width,
        height,
        blur_score,
        contrast_score,
        "image quality analyzed"
    );

    let preview = ImagePreview {
        width,
        height,
        luma: luminance.iter().map(|&l| l.round() as u8).collect(),
    };
    (
        QualityReport {
            fingerprint,
            blur_score,
            contrast_score,
            duplicate: false,
        },
        Some(preview),
    )
}

/// Population standard deviation of luminance, normalized to [0, 1]
fn contrast(luminance: &[f32]) -> f32 {
    if luminance.is_empty() {
        return 0.0;
    }
    let n = luminance.len() as f32;
    let mean = luminance.iter().sum::<f32>() / n;
    let variance = luminance.iter().map(|l| (l - mean).powi(2)).sum::<f32>() / n;
    variance.sqrt() / 255.0
}

/// RMS of the central-difference gradient magnitude over interior pixels
fn gradient_rms(luminance: &[f32], width: usize, height: usize) -> f32 {
    if width < 3 || height < 3 {
        return 0.0;
    }
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let gx = luminance[y * width + x + 1] - luminance[y * width + x - 1];
            let gy = luminance[(y + 1) * width + x] - luminance[(y - 1) * width + x];
            sum_sq += (gx * gx + gy * gy) as f64;
            count += 1;
        }
    }
    ((sum_sq / count as f64).sqrt() / 255.0) as f32
}

/// One occupied upload slot
#[derive(Debug)]
struct SlotEntry {
    report: QualityReport,
    // Held for its lifetime only; dropped when the slot is reassigned.
    _preview: Option<ImagePreview>,
}

/// Fixed set of upload slots with cross-slot duplicate detection.
///
/// Assigning a file to a slot replaces (and drops) any previous entry and its
/// preview. The `duplicate` flag on every report is recomputed whenever any
/// slot's fingerprint set changes.
#[derive(Debug)]
pub struct UploadSlots {
    slots: Vec<Option<SlotEntry>>,
}

impl UploadSlots {
    /// Create `count` empty slots
    pub fn new(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| None).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Analyze `bytes` and assign the result to `slot`, superseding any
    /// previous assignment. Duplicate flags are refreshed across all slots.
    pub fn assign(&mut self, slot: usize, bytes: &[u8], meta: &FileMeta) {
        let Some(entry) = self.slots.get_mut(slot) else {
            warn!(slot, total = self.slots.len(), "ignoring assignment to unknown slot");
            return;
        };
        let (report, preview) = analyze_image(bytes, meta);
        *entry = Some(SlotEntry {
            report,
            _preview: preview,
        });
        self.refresh_duplicates();
    }

    /// Clear a slot, releasing its preview resource
    pub fn clear(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
            self.refresh_duplicates();
        }
    }

    /// The report currently assigned to `slot`, if any
    pub fn report(&self, slot: usize) -> Option<&QualityReport> {
        self.slots.get(slot)?.as_ref().map(|e| &e.report)
    }

    /// Advisory warnings for `slot`. Never blocks an upload.
    pub fn warnings(&self, slot: usize) -> Vec<String> {
        let Some(report) = self.report(slot) else {
            return Vec::new();
        };
        let mut warnings = Vec::new();
        if report.blur_score < BLUR_WARN_THRESHOLD {
            warnings.push("appears blurry".to_string());
        }
        if report.contrast_score < CONTRAST_WARN_THRESHOLD {
            warnings.push("low contrast".to_string());
        }
        if report.duplicate {
            warnings.push("possible duplicate image".to_string());
        }
        warnings
    }

    fn refresh_duplicates(&mut self) {
        let fingerprints: Vec<String> = self
            .slots
            .iter()
            .flatten()
            .map(|e| e.report.fingerprint.clone())
            .collect();
        for entry in self.slots.iter_mut().flatten() {
            let matches = fingerprints
                .iter()
                .filter(|f| **f == entry.report.fingerprint)
                .count();
            entry.report.duplicate = matches > 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encode_png(img: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn uniform_gray(side: u32) -> Vec<u8> {
        encode_png(&RgbImage::from_pixel(side, side, image::Rgb([128, 128, 128])))
    }

    /// High-contrast 4-pixel block pattern; wide enough that central
    /// differences see the block boundaries.
    fn block_pattern(side: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(side, side, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([0, 0, 0])
            }
        });
        encode_png(&img)
    }

    fn meta(name: &str) -> FileMeta {
        FileMeta {
            name: name.to_string(),
            size: 1000,
            modified_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_uniform_gray_scores_near_zero() {
        let (report, preview) = analyze_image(&uniform_gray(64), &meta("flat.png"));
        assert!(report.contrast_score < 1e-3);
        assert!(report.blur_score < 1e-3);
        assert!(preview.is_some());
    }

    #[test]
    fn test_block_pattern_scores_high() {
        let (report, _) = analyze_image(&block_pattern(64), &meta("sharp.png"));
        assert!(report.contrast_score > CONTRAST_WARN_THRESHOLD);
        assert!(report.blur_score > BLUR_WARN_THRESHOLD);
    }

    #[test]
    fn test_undecodable_file_reports_zero_scores() {
        let (report, preview) = analyze_image(b"definitely not an image", &meta("bad.dcm"));
        assert_eq!(report.blur_score, 0.0);
        assert_eq!(report.contrast_score, 0.0);
        assert!(!report.duplicate);
        assert!(preview.is_none());
        assert_eq!(report.fingerprint, meta("bad.dcm").fingerprint());
    }

    #[test]
    fn test_large_image_is_bounded_before_analysis() {
        let (_, preview) = analyze_image(&uniform_gray(512), &meta("big.png"));
        let preview = preview.unwrap();
        assert!(preview.width <= ANALYSIS_MAX_SIDE);
        assert!(preview.height <= ANALYSIS_MAX_SIDE);
    }

    #[test]
    fn test_duplicate_flag_spans_slots() {
        let mut slots = UploadSlots::new(3);
        let image = block_pattern(16);
        slots.assign(0, &image, &meta("a.png"));
        slots.assign(1, &image, &meta("a.png"));
        slots.assign(
            2,
            &image,
            &FileMeta {
                name: "b.png".to_string(),
                size: 999,
                modified_ms: 1,
            },
        );

        assert!(slots.report(0).unwrap().duplicate);
        assert!(slots.report(1).unwrap().duplicate);
        assert!(!slots.report(2).unwrap().duplicate);
    }

    #[test]
    fn test_reassignment_clears_duplicate_flag() {
        let mut slots = UploadSlots::new(2);
        let image = block_pattern(16);
        slots.assign(0, &image, &meta("a.png"));
        slots.assign(1, &image, &meta("a.png"));
        assert!(slots.report(0).unwrap().duplicate);

        slots.assign(
            1,
            &image,
            &FileMeta {
                name: "c.png".to_string(),
                size: 5,
                modified_ms: 2,
            },
        );
        assert!(!slots.report(0).unwrap().duplicate);
        assert!(!slots.report(1).unwrap().duplicate);
    }

    #[test]
    fn test_clearing_a_slot_refreshes_duplicates() {
        let mut slots = UploadSlots::new(2);
        let image = block_pattern(16);
        slots.assign(0, &image, &meta("a.png"));
        slots.assign(1, &image, &meta("a.png"));
        slots.clear(1);
        assert!(!slots.report(0).unwrap().duplicate);
        assert!(slots.report(1).is_none());
    }

    #[test]
    fn test_unknown_slot_is_a_no_op() {
        let mut slots = UploadSlots::new(2);
        let image = block_pattern(16);
        slots.assign(0, &image, &meta("a.png"));

        slots.assign(5, &image, &meta("a.png"));
        slots.clear(5);
        assert!(slots.report(5).is_none());
        assert!(slots.warnings(5).is_empty());
        // The occupied slot is untouched: one copy of the file, no duplicate.
        assert!(!slots.report(0).unwrap().duplicate);
    }

    #[test]
    fn test_warnings_policy() {
        let mut slots = UploadSlots::new(2);
        slots.assign(0, &uniform_gray(32), &meta("flat.png"));
        let warnings = slots.warnings(0);
        assert!(warnings.contains(&"appears blurry".to_string()));
        assert!(warnings.contains(&"low contrast".to_string()));

        slots.assign(1, &block_pattern(32), &meta("sharp.png"));
        assert!(slots.warnings(1).is_empty());
    }
}

use std::collections::HashMap;

use image::{DynamicImage, GrayImage};
use log::{info, warn};
use rxing::BarcodeFormat;

use crate::models::barcode::{BarcodeInfo, BarcodeRect};

/// Look for a barcode anywhere in the image. Returns the first symbol the
/// reader reports; which one wins when several overlap is up to the reader.
/// Pass the full-resolution image: downscaling merges thin bars.
pub fn read_barcode(dynamic_image: &DynamicImage) -> Option<BarcodeInfo> {
    let luma = dynamic_image.to_luma8();
    let (width, height) = luma.dimensions();

    // Try-harder is switched on by the helper when the hint map lacks it.
    match rxing::helpers::detect_in_luma_with_hints(
        luma.as_raw().clone(),
        width,
        height,
        None,
        &mut HashMap::new(),
    ) {
        Ok(result) => {
            let format = result.getBarcodeFormat();
            let mut rect =
                bounding_rect(result.getPoints().iter().map(|point| (point.x, point.y)));
            if is_linear(format) {
                rect = rect.map(|scan_line| extend_over_bars(&luma, scan_line));
            }
            let barcode_info = BarcodeInfo {
                data: result.getText().to_string(),
                barcode_type: symbology_name(format),
                rect,
            };
            info!(
                "Barcode detected: {} (type: {})",
                barcode_info.data, barcode_info.barcode_type
            );
            Some(barcode_info)
        }
        Err(error) => {
            warn!("No barcode detected in {}x{} image: {}", width, height, error);
            None
        }
    }
}

/// Short upper-case symbology names, e.g. `EAN13`.
pub fn symbology_name(format: &BarcodeFormat) -> String {
    let name = match format {
        BarcodeFormat::EAN_13 => "EAN13",
        BarcodeFormat::EAN_8 => "EAN8",
        BarcodeFormat::UPC_A => "UPCA",
        BarcodeFormat::UPC_E => "UPCE",
        BarcodeFormat::CODE_128 => "CODE128",
        BarcodeFormat::CODE_39 => "CODE39",
        BarcodeFormat::CODE_93 => "CODE93",
        BarcodeFormat::ITF => "I25",
        BarcodeFormat::CODABAR => "CODABAR",
        BarcodeFormat::QR_CODE => "QRCODE",
        BarcodeFormat::PDF_417 => "PDF417",
        BarcodeFormat::DATA_MATRIX => "DATAMATRIX",
        other => return format!("{:?}", other).replace('_', "").to_ascii_uppercase(),
    };
    name.to_string()
}

/// Axis-aligned box around the reported points. 1D readers report points on a
/// single scan line, so the height can be zero; see `extend_over_bars`.
pub fn bounding_rect(points: impl IntoIterator<Item = (f32, f32)>) -> Option<BarcodeRect> {
    let mut points = points.into_iter();
    let (first_x, first_y) = points.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);
    for (x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let left = min_x.max(0.0).round() as u32;
    let top = min_y.max(0.0).round() as u32;
    Some(BarcodeRect {
        left,
        top,
        width: (max_x.max(0.0).round() as u32).saturating_sub(left),
        height: (max_y.max(0.0).round() as u32).saturating_sub(top),
    })
}

/// 1D symbologies, whose reported points lie on one scan line.
fn is_linear(format: &BarcodeFormat) -> bool {
    matches!(
        format,
        BarcodeFormat::EAN_13
            | BarcodeFormat::EAN_8
            | BarcodeFormat::UPC_A
            | BarcodeFormat::UPC_E
            | BarcodeFormat::CODE_128
            | BarcodeFormat::CODE_39
            | BarcodeFormat::CODE_93
            | BarcodeFormat::ITF
            | BarcodeFormat::CODABAR
    )
}

const DARK_LUMA: u8 = 128;

/// Grow a scan-line rect up and down while the rows in its column span stay
/// about as dark as the scan line itself.
pub fn extend_over_bars(luma: &GrayImage, scan_line: BarcodeRect) -> BarcodeRect {
    let (image_width, image_height) = luma.dimensions();
    if image_width == 0 || image_height == 0 {
        return scan_line;
    }

    let left = scan_line.left.min(image_width - 1);
    let right = scan_line
        .left
        .saturating_add(scan_line.width)
        .min(image_width - 1);
    let dark_in_row = |y: u32| {
        (left..=right)
            .filter(|&x| luma.get_pixel(x, y).0[0] < DARK_LUMA)
            .count()
    };

    let center = scan_line
        .top
        .saturating_add(scan_line.height / 2)
        .min(image_height - 1);
    let reference = dark_in_row(center);
    if reference == 0 {
        return scan_line;
    }
    let is_bar_row = |y: u32| dark_in_row(y) * 2 >= reference;

    let mut top = center;
    while top > 0 && is_bar_row(top - 1) {
        top -= 1;
    }
    let mut bottom = center;
    while bottom + 1 < image_height && is_bar_row(bottom + 1) {
        bottom += 1;
    }

    let top = top.min(scan_line.top);
    let bottom = bottom.max(scan_line.top.saturating_add(scan_line.height));
    BarcodeRect {
        left: scan_line.left,
        top,
        width: scan_line.width,
        height: bottom - top + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn names_common_retail_symbologies() {
        assert_eq!(symbology_name(&BarcodeFormat::EAN_13), "EAN13");
        assert_eq!(symbology_name(&BarcodeFormat::UPC_A), "UPCA");
        assert_eq!(symbology_name(&BarcodeFormat::QR_CODE), "QRCODE");
    }

    #[test]
    fn rect_spans_all_points() {
        let rect = bounding_rect([(120.4, 80.0), (40.0, 200.6), (300.0, 90.0)]).unwrap();
        assert_eq!(
            rect,
            BarcodeRect {
                left: 40,
                top: 80,
                width: 260,
                height: 121
            }
        );
    }

    #[test]
    fn scan_line_points_give_flat_rect() {
        let rect = bounding_rect([(10.0, 50.0), (210.0, 50.0)]).unwrap();
        assert_eq!((rect.width, rect.height), (200, 0));
        assert!(bounding_rect(std::iter::empty()).is_none());
    }

    const L_CODES: [&str; 10] = [
        "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
        "0110111", "0001011",
    ];
    const G_CODES: [&str; 10] = [
        "0100111", "0110011", "0011011", "0100001", "0011101", "0111001", "0000101", "0010001",
        "0001001", "0010111",
    ];
    const R_CODES: [&str; 10] = [
        "1110010", "1100110", "1101100", "1000010", "1011100", "1001110", "1010000", "1000100",
        "1001000", "1110100",
    ];
    const PARITY: [&str; 10] = [
        "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG", "LGGLLG", "LGGGLL", "LGLGLG", "LGLGGL",
        "LGGLGL",
    ];

    /// EAN-13 symbol with 11-module quiet zones on both sides.
    fn ean13(code: &str, module_px: u32, height: u32) -> DynamicImage {
        let digits: Vec<usize> = code
            .chars()
            .map(|c| c.to_digit(10).unwrap() as usize)
            .collect();
        let mut pattern = String::from("101");
        for (i, parity) in PARITY[digits[0]].chars().enumerate() {
            let table = if parity == 'L' { &L_CODES } else { &G_CODES };
            pattern.push_str(table[digits[1 + i]]);
        }
        pattern.push_str("01010");
        for digit in &digits[7..] {
            pattern.push_str(R_CODES[*digit]);
        }
        pattern.push_str("101");

        let modules: Vec<bool> = pattern.chars().map(|c| c == '1').collect();
        let quiet = 11 * module_px;
        let width = modules.len() as u32 * module_px + 2 * quiet;
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, _| {
            let inside = x >= quiet && x < width - quiet;
            if inside && modules[((x - quiet) / module_px) as usize] {
                Luma([0])
            } else {
                Luma([255])
            }
        }))
    }

    #[test]
    fn reads_landscape_ean13() {
        let symbol = ean13("4006381333931", 4, 200);
        assert_eq!((symbol.width(), symbol.height()), (468, 200));

        let barcode = read_barcode(&symbol).expect("landscape symbol should decode");
        assert_eq!(barcode.data, "4006381333931");
        assert_eq!(barcode.barcode_type, "EAN13");
    }

    #[test]
    fn reads_portrait_ean13() {
        let symbol = ean13("5901234123457", 2, 600);
        assert!(symbol.height() > symbol.width());

        let barcode = read_barcode(&symbol).expect("portrait symbol should decode");
        assert_eq!(barcode.data, "5901234123457");
    }

    #[test]
    fn linear_rect_covers_bar_height() {
        let symbol = ean13("4006381333931", 4, 200);
        let rect = read_barcode(&symbol).unwrap().rect.unwrap();
        assert_eq!((rect.top, rect.height), (0, 200));
        assert!(rect.left >= 44 && rect.left + rect.width <= 424);
    }

    #[test]
    fn bars_stop_at_the_background() {
        // Bars occupy rows 50..150 of a white canvas.
        let luma = GrayImage::from_fn(100, 200, |x, y| {
            if (50..150).contains(&y) && x % 4 < 2 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        let scan_line = BarcodeRect {
            left: 10,
            top: 100,
            width: 80,
            height: 0,
        };
        let rect = extend_over_bars(&luma, scan_line);
        assert_eq!((rect.top, rect.height), (50, 100));
        assert_eq!((rect.left, rect.width), (10, 80));
    }

    #[test]
    fn blank_image_has_no_barcode() {
        let blank = DynamicImage::ImageLuma8(GrayImage::from_pixel(320, 240, Luma([255])));
        assert!(read_barcode(&blank).is_none());
    }
}

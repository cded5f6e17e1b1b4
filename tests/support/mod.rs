#![allow(dead_code)]

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

pub fn data_uri(image: &DynamicImage) -> String {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// A colour gradient, so resampling has something to chew on.
pub fn photo(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 90])
    }))
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

pub const EAN13_QUIET_MODULES: u32 = 11;

/// Append the check digit to a 12 digit EAN-13 body.
pub fn ean13_with_check_digit(body: &str) -> String {
    assert_eq!(body.len(), 12);
    let sum: u32 = body
        .chars()
        .map(|c| c.to_digit(10).unwrap())
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d } else { d * 3 })
        .sum();
    format!("{}{}", body, (10 - sum % 10) % 10)
}

/// The 95 module pattern of an EAN-13 symbol, `1` for a bar.
pub fn ean13_modules(code: &str) -> String {
    let digits: Vec<usize> = code
        .chars()
        .map(|c| c.to_digit(10).unwrap() as usize)
        .collect();
    assert_eq!(digits.len(), 13);

    let mut modules = String::from("101");
    for (i, parity) in PARITY[digits[0]].chars().enumerate() {
        let table = if parity == 'L' { &L_CODES } else { &G_CODES };
        modules.push_str(table[digits[1 + i]]);
    }
    modules.push_str("01010");
    for digit in &digits[7..] {
        modules.push_str(R_CODES[*digit]);
    }
    modules.push_str("101");
    modules
}

/// Black-on-white EAN-13 symbol with quiet zones, `module_px` pixels per module.
pub fn ean13_image(code: &str, module_px: u32, height: u32) -> DynamicImage {
    let modules: Vec<bool> = ean13_modules(code).chars().map(|c| c == '1').collect();
    let quiet = EAN13_QUIET_MODULES * module_px;
    let width = modules.len() as u32 * module_px + 2 * quiet;

    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, _| {
        let inside = x >= quiet && x < width - quiet;
        let bar = inside && modules[((x - quiet) / module_px) as usize];
        if bar { Luma([0]) } else { Luma([255]) }
    }))
}

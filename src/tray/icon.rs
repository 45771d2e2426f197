//! Tray icon drawing
//!
//! Icons are drawn at startup: a diagonal green-to-blue gradient with a
//! white capital letter, so no image assets ship with the binaries.

use tray_icon::{BadIcon, Icon};

/// Width and height of the icon in pixels
pub const ICON_SIZE: u32 = 64;

const GRADIENT_START: [u8; 3] = [0, 128, 64];
const GRADIENT_END: [u8; 3] = [0, 64, 128];

/// 5x7 glyphs, one row per byte, high bit on the left
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SCALE: u32 = 6;

fn glyph(letter: char) -> [u8; 7] {
    match letter.to_ascii_uppercase() {
        'G' => [
            0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111,
        ],
        'T' => [
            0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100,
        ],
        _ => [0; 7],
    }
}

/// RGBA pixels for an icon showing `letter`
pub fn render_icon(letter: char) -> Vec<u8> {
    let size = ICON_SIZE;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    let rows = glyph(letter);

    let glyph_w = GLYPH_WIDTH * GLYPH_SCALE;
    let glyph_h = GLYPH_HEIGHT * GLYPH_SCALE;
    let left = (size - glyph_w) / 2;
    let top = (size - glyph_h) / 2;

    for y in 0..size {
        for x in 0..size {
            let inside = x >= left && x < left + glyph_w && y >= top && y < top + glyph_h;
            let lit = inside && {
                let col = (x - left) / GLYPH_SCALE;
                let row = (y - top) / GLYPH_SCALE;
                rows[row as usize] & (1 << (GLYPH_WIDTH - 1 - col)) != 0
            };

            if lit {
                rgba.extend_from_slice(&[255, 255, 255, 255]);
            } else {
                // Position along the top-left to bottom-right diagonal
                let t = (x + y) as f32 / (2 * (size - 1)) as f32;
                for channel in 0..3 {
                    let a = GRADIENT_START[channel] as f32;
                    let b = GRADIENT_END[channel] as f32;
                    rgba.push((a + (b - a) * t).round() as u8);
                }
                rgba.push(255);
            }
        }
    }
    rgba
}

/// Tray icon showing `letter`
pub fn tray_icon(letter: char) -> Result<Icon, BadIcon> {
    Icon::from_rgba(render_icon(letter), ICON_SIZE, ICON_SIZE)
}

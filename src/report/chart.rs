use std::path::Path;

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Colours and style
// ---------------------------------------------------------------------------

pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    pub const GRID: Rgb<u8> = Rgb([225, 225, 225]);
    pub const RED: Rgb<u8> = Rgb([220, 30, 30]);
    pub const BLUE: Rgb<u8> = Rgb([30, 90, 220]);
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no hay puntos que graficar")]
    NoPoints,

    #[error("longitudes distintas: {x} valores x, {y} valores y, {fitted} predicciones")]
    LengthMismatch { x: usize, y: usize, fitted: usize },

    #[error("no se pudo escribir la imagen: {0}")]
    Image(#[from] image::ImageError),
}

/// Geometry, colours and labels of the scatter/fit chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub background: Rgb<u8>,
    pub point_color: Rgb<u8>,
    pub line_color: Rgb<u8>,
    pub point_radius: i64,
    pub line_width: i64,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            margin_left: 100,
            margin_right: 30,
            margin_top: 50,
            margin_bottom: 70,
            background: colors::WHITE,
            point_color: colors::RED,
            line_color: colors::BLUE,
            point_radius: 4,
            line_width: 2,
            title: "Análisis de datos".to_string(),
            x_label: "Variable independiente".to_string(),
            y_label: "Variable dependiente".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Data → pixel mapping
// ---------------------------------------------------------------------------

/// Data bounds and the pixel rectangle they are mapped onto.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn new(xs: &[f64], ys: &[f64], style: &ChartStyle) -> Self {
        let (x_min, x_max) = padded_bounds(xs);
        let (y_min, y_max) = padded_bounds(ys);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            left: style.margin_left as f64,
            right: (style.width - style.margin_right) as f64,
            top: style.margin_top as f64,
            bottom: (style.height - style.margin_bottom) as f64,
        }
    }

    fn px(&self, x: f64) -> i64 {
        let t = (x - self.x_min) / (self.x_max - self.x_min);
        (self.left + t * (self.right - self.left)).round() as i64
    }

    fn py(&self, y: f64) -> i64 {
        let t = (y - self.y_min) / (self.y_max - self.y_min);
        (self.bottom - t * (self.bottom - self.top)).round() as i64
    }
}

/// Min/max of the finite values with 5% padding; a flat range is widened.
fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        let half = if lo.abs() > 1.0 { lo.abs() * 0.1 } else { 0.5 };
        return (lo - half, hi + half);
    }
    (lo - span * 0.05, hi + span * 0.05)
}

/// `n` evenly spaced values from `lo` to `hi` inclusive.
fn ticks(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
        .collect()
}

fn format_tick(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a scatter of `(xs, ys)` overlaid with the `(xs, fitted)` line.
pub fn render_chart(
    xs: &[f64],
    ys: &[f64],
    fitted: &[f64],
    style: &ChartStyle,
) -> Result<RgbImage, ChartError> {
    if xs.len() != ys.len() || xs.len() != fitted.len() {
        return Err(ChartError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
            fitted: fitted.len(),
        });
    }
    if xs.is_empty() {
        return Err(ChartError::NoPoints);
    }

    let y_all: Vec<f64> = ys.iter().chain(fitted).copied().collect();
    let frame = Frame::new(xs, &y_all, style);
    let mut img = RgbImage::from_pixel(style.width, style.height, style.background);

    draw_axes(&mut img, &frame);

    for (&x, &y) in xs.iter().zip(ys) {
        fill_circle(&mut img, frame.px(x), frame.py(y), style.point_radius, style.point_color);
    }

    let mut line: Vec<(f64, f64)> = xs.iter().copied().zip(fitted.iter().copied()).collect();
    line.sort_by(|a, b| a.0.total_cmp(&b.0));
    for pair in line.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(
            &mut img,
            (frame.px(x0), frame.py(y0)),
            (frame.px(x1), frame.py(y1)),
            style.line_width,
            style.line_color,
        );
    }

    draw_labels(&mut img, style);
    Ok(img)
}

/// Write the chart as PNG, replacing any existing file.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<(), ChartError> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn draw_axes(img: &mut RgbImage, frame: &Frame) {
    let (left, right) = (frame.left as i64, frame.right as i64);
    let (top, bottom) = (frame.top as i64, frame.bottom as i64);

    for x in ticks(frame.x_min, frame.x_max, 6) {
        let px = frame.px(x);
        draw_line(img, (px, top), (px, bottom), 1, colors::GRID);
        draw_line(img, (px, bottom), (px, bottom + 5), 1, colors::BLACK);
        let label = format_tick(x);
        draw_text(img, &label, px - text_width(&label, 1) / 2, bottom + 10, 1, colors::BLACK);
    }
    for y in ticks(frame.y_min, frame.y_max, 6) {
        let py = frame.py(y);
        draw_line(img, (left, py), (right, py), 1, colors::GRID);
        draw_line(img, (left - 5, py), (left, py), 1, colors::BLACK);
        let label = format_tick(y);
        draw_text(img, &label, left - 10 - text_width(&label, 1), py - 4, 1, colors::BLACK);
    }

    draw_line(img, (left, top), (right, top), 1, colors::BLACK);
    draw_line(img, (left, bottom), (right, bottom), 1, colors::BLACK);
    draw_line(img, (left, top), (left, bottom), 1, colors::BLACK);
    draw_line(img, (right, top), (right, bottom), 1, colors::BLACK);
}

fn draw_labels(img: &mut RgbImage, style: &ChartStyle) {
    let w = style.width as i64;
    let h = style.height as i64;

    let title_w = text_width(&style.title, 2);
    draw_text(img, &style.title, (w - title_w) / 2, 15, 2, colors::BLACK);

    let x_w = text_width(&style.x_label, 2);
    draw_text(img, &style.x_label, (w - x_w) / 2, h - 30, 2, colors::BLACK);

    let y_w = text_width(&style.y_label, 2);
    draw_text_vertical(img, &style.y_label, 12, (h + y_w) / 2, 2, colors::BLACK);
}

// ---------------------------------------------------------------------------
// Raster primitives
// ---------------------------------------------------------------------------

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_circle(img: &mut RgbImage, cx: i64, cy: i64, r: i64, color: Rgb<u8>) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Straight segment stamped with a `width`-pixel square brush.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), width: i64, color: Rgb<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).max(1);
    let lo = -(width - 1) / 2;
    let hi = width / 2;
    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = from.0 + (dx as f64 * t).round() as i64;
        let y = from.1 + (dy as f64 * t).round() as i64;
        for oy in lo..=hi {
            for ox in lo..=hi {
                put(img, x + ox, y + oy, color);
            }
        }
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn text_width(text: &str, scale: i64) -> i64 {
    text.chars().count() as i64 * 8 * scale
}

/// Left-to-right text with its top-left corner at `(x, y)`.
fn draw_text(img: &mut RgbImage, text: &str, x: i64, y: i64, scale: i64, color: Rgb<u8>) {
    for (k, c) in text.chars().enumerate() {
        let origin = x + k as i64 * 8 * scale;
        for (gy, bits) in glyph(c).iter().enumerate() {
            for gx in 0..8 {
                if bits & (1 << gx) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        put(img, origin + gx * scale + sx, y + gy as i64 * scale + sy, color);
                    }
                }
            }
        }
    }
}

/// Bottom-to-top text (rotated a quarter turn counter-clockwise) starting at
/// `(x, y)`, its bottom-left corner.
fn draw_text_vertical(img: &mut RgbImage, text: &str, x: i64, y: i64, scale: i64, color: Rgb<u8>) {
    for (k, c) in text.chars().enumerate() {
        let origin = y - k as i64 * 8 * scale;
        for (gy, bits) in glyph(c).iter().enumerate() {
            for gx in 0..8 {
                if bits & (1 << gx) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        put(img, x + gy as i64 * scale + sy, origin - gx * scale - sx, color);
                    }
                }
            }
        }
    }
}

use std::path::Path;

use image::{Rgb, RgbImage};

use super::glyphs::{draw_text, draw_text_up, put, text_width, GLYPH_HEIGHT};
use crate::color::{AXIS, BACKGROUND, GRID};
use crate::data::model::Spectrum;
use crate::error::Result;

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 600;

pub const X_LABEL: &str = "Wavelength (nm)";
pub const Y_LABEL: &str = "radiance";

const MARGIN_LEFT: f64 = 130.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;

const LABEL_SCALE: u32 = 2;
const TITLE_SCALE: u32 = 3;
const TARGET_TICKS: f64 = 8.0;
/// More ticks than this means the range is too narrow for its magnitude.
const MAX_TICKS: f64 = 100.0;
/// Ranges narrower than this fraction of their magnitude count as flat.
const FLAT_TOLERANCE: f64 = 1e-12;

const LEGEND_PAD: i64 = 10;
const LEGEND_SWATCH: i64 = 30;

// ---------------------------------------------------------------------------
// Spectral plot
// ---------------------------------------------------------------------------

/// Render one spectrum as a line plot (wavelength vs. value) with the data
/// name as title and legend entry.
pub fn render_spectrum(sp: &Spectrum, color: Rgb<u8>) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    let x_range = match finite_range(&sp.x) {
        Some((lo, hi)) if !is_flat(lo, hi) => (lo, hi),
        Some((lo, _)) => pad_flat(lo),
        None => (0.0, 1.0),
    };
    let y_range = match finite_range(&sp.y) {
        Some((lo, hi)) if !is_flat(lo, hi) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
        Some((lo, _)) => pad_flat(lo),
        None => (0.0, 1.0),
    };

    let frame = Frame {
        left: MARGIN_LEFT,
        right: WIDTH as f64 - MARGIN_RIGHT,
        top: MARGIN_TOP,
        bottom: HEIGHT as f64 - MARGIN_BOTTOM,
        x_range,
        y_range,
    };

    draw_grid(&mut img, &frame);
    draw_axes(&mut img, &frame);
    draw_captions(&mut img, &frame, &sp.name);

    let mut prev: Option<(f64, f64)> = None;
    for (&x, &y) in sp.x.iter().zip(&sp.y) {
        if !x.is_finite() || !y.is_finite() {
            prev = None;
            continue;
        }
        let p = (frame.px(x), frame.py(y));
        match prev {
            Some(q) => draw_line(&mut img, q, p, color),
            None => put(&mut img, p.0.round() as i64, p.1.round() as i64, color),
        }
        prev = Some(p);
    }

    draw_legend(&mut img, &frame, &sp.name, color);
    img
}

/// Render and save as PNG.
pub fn save_plot(path: &Path, sp: &Spectrum, color: Rgb<u8>) -> Result<()> {
    render_spectrum(sp, color).save(path)?;
    Ok(())
}

// -- layout helpers --

struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Frame {
    fn px(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_range;
        self.left + (x - lo) / (hi - lo) * (self.right - self.left)
    }

    fn py(&self, y: f64) -> f64 {
        let (lo, hi) = self.y_range;
        self.bottom - (y - lo) / (hi - lo) * (self.bottom - self.top)
    }
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn is_flat(lo: f64, hi: f64) -> bool {
    hi - lo <= lo.abs().max(hi.abs()) * FLAT_TOLERANCE
}

/// A flat series sits at mid-height.
fn pad_flat(v: f64) -> (f64, f64) {
    let pad = if v.abs() > f64::EPSILON { v.abs() * 0.1 } else { 1.0 };
    (v - pad, v + pad)
}

/// Tick positions at a 1/2/5 × 10^k step covering `range`.
///
/// Empty when the range cannot be divided into at most `MAX_TICKS` steps.
fn ticks(range: (f64, f64)) -> (Vec<f64>, f64) {
    let (lo, hi) = range;
    let raw = (hi - lo) / TARGET_TICKS;
    if !(raw.is_finite() && raw > 0.0) {
        return (Vec::new(), 0.0);
    }
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let step = mag
        * if norm < 1.5 {
            1.0
        } else if norm < 3.0 {
            2.0
        } else if norm < 7.0 {
            5.0
        } else {
            10.0
        };

    let first = (lo / step).ceil();
    let last = (hi / step + 1e-9).floor();
    let n = last - first;
    if !n.is_finite() || n < 0.0 || n > MAX_TICKS {
        return (Vec::new(), step);
    }
    let out = (0..=n as usize).map(|k| (first + k as f64) * step).collect();
    (out, step)
}

fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        ((-step.log10()).ceil() as usize).min(10)
    };
    let value = if value.abs() < step * 1e-9 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

fn draw_grid(img: &mut RgbImage, frame: &Frame) {
    let (xs, x_step) = ticks(frame.x_range);
    for x in xs {
        let px = frame.px(x).round() as i64;
        vline(img, px, frame.top as i64, frame.bottom as i64, GRID);
        let label = tick_label(x, x_step);
        let w = text_width(&label, LABEL_SCALE) as i64;
        draw_text(img, px - w / 2, frame.bottom as i64 + 8, &label, LABEL_SCALE, AXIS);
    }

    let (ys, y_step) = ticks(frame.y_range);
    for y in ys {
        let py = frame.py(y).round() as i64;
        hline(img, frame.left as i64, frame.right as i64, py, GRID);
        let label = tick_label(y, y_step);
        let w = text_width(&label, LABEL_SCALE) as i64;
        let h = (GLYPH_HEIGHT * LABEL_SCALE) as i64;
        draw_text(img, frame.left as i64 - 8 - w, py - h / 2, &label, LABEL_SCALE, AXIS);
    }
}

fn draw_axes(img: &mut RgbImage, frame: &Frame) {
    let (l, r, t, b) = (
        frame.left as i64,
        frame.right as i64,
        frame.top as i64,
        frame.bottom as i64,
    );
    hline(img, l, r, b, AXIS);
    hline(img, l, r, t, AXIS);
    vline(img, l, t, b, AXIS);
    vline(img, r, t, b, AXIS);
}

/// Title above the frame, axis captions below and left of it.
fn draw_captions(img: &mut RgbImage, frame: &Frame, title: &str) {
    let centre_x = ((frame.left + frame.right) / 2.0) as i64;
    let centre_y = ((frame.top + frame.bottom) / 2.0) as i64;
    let label_h = (GLYPH_HEIGHT * LABEL_SCALE) as i64;

    let w = text_width(title, TITLE_SCALE) as i64;
    let h = (GLYPH_HEIGHT * TITLE_SCALE) as i64;
    draw_text(img, centre_x - w / 2, (frame.top as i64 - h) / 2, title, TITLE_SCALE, AXIS);

    let w = text_width(X_LABEL, LABEL_SCALE) as i64;
    let y = frame.bottom as i64 + 8 + label_h + 14;
    draw_text(img, centre_x - w / 2, y, X_LABEL, LABEL_SCALE, AXIS);

    let w = text_width(Y_LABEL, LABEL_SCALE) as i64;
    draw_text_up(img, 12, centre_y + w / 2, Y_LABEL, LABEL_SCALE, AXIS);
}

/// Boxed legend entry in the upper-right corner of the frame.
fn draw_legend(img: &mut RgbImage, frame: &Frame, name: &str, color: Rgb<u8>) {
    let text_w = text_width(name, LABEL_SCALE) as i64;
    let text_h = (GLYPH_HEIGHT * LABEL_SCALE) as i64;
    let box_w = LEGEND_PAD + LEGEND_SWATCH + 8 + text_w + LEGEND_PAD;
    let box_h = text_h + 2 * LEGEND_PAD;
    let right = frame.right as i64 - LEGEND_PAD;
    let left = right - box_w;
    let top = frame.top as i64 + LEGEND_PAD;
    let bottom = top + box_h;

    for y in top..=bottom {
        hline(img, left, right, y, BACKGROUND);
    }
    hline(img, left, right, top, GRID);
    hline(img, left, right, bottom, GRID);
    vline(img, left, top, bottom, GRID);
    vline(img, right, top, bottom, GRID);

    let mid = top + box_h / 2;
    let swatch_x = left + LEGEND_PAD;
    draw_line(
        img,
        (swatch_x as f64, mid as f64),
        ((swatch_x + LEGEND_SWATCH) as f64, mid as f64),
        color,
    );
    draw_text(img, swatch_x + LEGEND_SWATCH + 8, top + LEGEND_PAD, name, LABEL_SCALE, AXIS);
}

fn hline(img: &mut RgbImage, x0: i64, x1: i64, y: i64, color: Rgb<u8>) {
    for x in x0..=x1 {
        put(img, x, y, color);
    }
}

fn vline(img: &mut RgbImage, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
    for y in y0..=y1 {
        put(img, x, y, color);
    }
}

/// Bresenham, two pixels thick.
fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(img, x0, y0, color);
        put(img, x0, y0 + 1, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

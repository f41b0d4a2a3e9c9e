/// Rasterizer: executes paint commands on an RGB canvas and encodes PNG.

use crate::font::FontHandle;
use crate::rendering::layout::Rect;
use crate::rendering::paint::PaintCommand;
use crate::rendering::RenderedImage;
use crate::Result;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Draw `commands` onto a fresh `width` x `height` canvas and encode it.
pub fn rasterize(width: u32, height: u32, commands: &[PaintCommand], font: &FontHandle) -> Result<RenderedImage> {
    let canvas = draw(width, height, commands, font);
    let png_data = encode_png(&canvas)?;
    Ok(RenderedImage {
        width,
        height,
        png_data,
    })
}

/// Draw `commands` in order onto a new canvas (black until cleared).
pub fn draw(width: u32, height: u32, commands: &[PaintCommand], font: &FontHandle) -> RgbImage {
    let mut canvas = RgbImage::new(width, height);
    for cmd in commands {
        match cmd {
            PaintCommand::Clear { rgb } => {
                for px in canvas.pixels_mut() {
                    *px = *rgb;
                }
            }
            PaintCommand::Line { from, to, rgb } => draw_line(&mut canvas, *from, *to, *rgb),
            PaintCommand::Ellipse {
                bounds,
                fill,
                outline,
            } => draw_ellipse(&mut canvas, *bounds, *fill, *outline),
            PaintCommand::Text { x, y, text, rgb } => {
                font.rasterize_text((*x, *y), text, |px, py, coverage| {
                    blend(&mut canvas, px, py, *rgb, coverage)
                });
            }
        }
    }
    canvas
}

pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)?;
    Ok(png_data)
}

fn put(canvas: &mut RgbImage, x: i32, y: i32, rgb: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, rgb);
    }
}

fn blend(canvas: &mut RgbImage, x: i32, y: i32, rgb: Rgb<u8>, coverage: f32) {
    if coverage >= 1.0 {
        put(canvas, x, y, rgb);
        return;
    }
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    for (d, s) in dst.0.iter_mut().zip(rgb.0) {
        let mixed = *d as f32 * (1.0 - coverage) + s as f32 * coverage;
        *d = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

// Bresenham
fn draw_line(canvas: &mut RgbImage, from: (i32, i32), to: (i32, i32), rgb: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put(canvas, x, y, rgb);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_ellipse(canvas: &mut RgbImage, bounds: Rect, fill: Rgb<u8>, outline: Rgb<u8>) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let rx = bounds.width as f32 / 2.0;
    let ry = bounds.height as f32 / 2.0;
    let cx = bounds.x as f32 + rx;
    let cy = bounds.y as f32 + ry;
    let inside = |px: f32, py: f32, rx: f32, ry: f32| {
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let nx = (px - cx) / rx;
        let ny = (py - cy) / ry;
        nx * nx + ny * ny <= 1.0
    };
    for y in bounds.y..=bounds.max_y() {
        for x in bounds.x..=bounds.max_x() {
            // sample at pixel centers
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            if !inside(px, py, rx, ry) {
                continue;
            }
            let rgb = if inside(px, py, rx - 1.0, ry - 1.0) {
                fill
            } else {
                outline
            };
            put(canvas, x, y, rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn font() -> FontHandle {
        FontHandle::builtin(10.0)
    }

    #[test]
    fn rasterize_returns_png_of_requested_size() {
        let s = rasterize(128, 64, &[PaintCommand::Clear { rgb: WHITE }], &font()).unwrap();
        assert_eq!(s.width, 128);
        assert_eq!(s.height, 64);
        assert_eq!(&s.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn lines_are_clipped_to_canvas() {
        let canvas = draw(
            10,
            10,
            &[
                PaintCommand::Clear { rgb: WHITE },
                PaintCommand::Line { from: (3, 0), to: (3, 10), rgb: RED },
                PaintCommand::Line { from: (10, 0), to: (10, 10), rgb: RED },
            ],
            &font(),
        );
        for y in 0..10 {
            assert_eq!(*canvas.get_pixel(3, y), RED);
            assert_eq!(*canvas.get_pixel(9, y), WHITE);
        }
    }

    #[test]
    fn ellipse_has_outline_fill_and_clear_corners() {
        let bounds = Rect { x: 0, y: 0, width: 21, height: 21 };
        let canvas = draw(
            21,
            21,
            &[
                PaintCommand::Clear { rgb: WHITE },
                PaintCommand::Ellipse { bounds, fill: RED, outline: BLACK },
            ],
            &font(),
        );
        assert_eq!(*canvas.get_pixel(10, 10), RED);
        assert_eq!(*canvas.get_pixel(10, 0), BLACK);
        assert_eq!(*canvas.get_pixel(0, 10), BLACK);
        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.get_pixel(20, 20), WHITE);
    }

    #[test]
    fn partial_coverage_blends() {
        let mut canvas = RgbImage::from_pixel(1, 1, WHITE);
        blend(&mut canvas, 0, 0, BLACK, 0.5);
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([128, 128, 128]));
        blend(&mut canvas, -1, 5, BLACK, 0.5);
    }
}

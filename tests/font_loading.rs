use snakeboard::{BoardConfig, BoardRenderer, Error, FontHandle, PlayerToken};
use std::io::Write;
use std::path::Path;

// Common locations of a bold sans face; tests that need one skip when none exist.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

fn system_font() -> Option<&'static str> {
    SYSTEM_FONTS.iter().copied().find(|p| Path::new(p).exists())
}

#[test]
fn corrupt_font_file_is_unavailable_and_falls_back() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"this is not a typeface").expect("write temp font");

    let err = FontHandle::from_file(file.path(), 28.0).unwrap_err();
    assert!(matches!(err, Error::FontUnavailable(_)));

    let font = FontHandle::load_or_builtin(file.path(), 28.0);
    assert!(font.is_builtin());
}

#[test]
fn missing_font_file_still_renders() {
    let cfg = BoardConfig::default();
    let font = FontHandle::load_or_builtin("no/such/font_bold.ttf", cfg.font_px());
    let renderer = BoardRenderer::new(cfg, font).expect("renderer");
    let image = renderer
        .render(&[PlayerToken::new("1", 15, "#FF0000")])
        .expect("render with fallback font");
    assert_eq!(&image.png_data[0..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn truetype_labels_are_measured_and_drawn() {
    let Some(path) = system_font() else {
        println!("No system TrueType font found; skipping.");
        return;
    };
    let cfg = BoardConfig::default();
    let font = FontHandle::from_file(path, cfg.font_px()).expect("load system font");
    assert!(!font.is_builtin());
    assert_eq!(font.px_size(), 28.0);

    let one = font.text_bounds("1");
    let twelve = font.text_bounds("12");
    assert!(!one.is_empty());
    assert!(twelve.width() > one.width());
    // ink starts below the top of the line box
    assert!(one.top > 0);

    let renderer = BoardRenderer::new(cfg, font).expect("renderer");
    let image = renderer
        .render(&[PlayerToken::new("12", 45, "#0000FF")])
        .expect("render with TrueType font");
    let pixels = image::load_from_memory(&image.png_data).unwrap().to_rgb8();

    // some label pixels within the token are lighter than the blue fill
    let lit = (420..460)
        .flat_map(|y| (340..380).map(move |x| (x, y)))
        .filter(|&(x, y)| pixels.get_pixel(x, y)[0] > 128)
        .count();
    assert!(lit > 20, "expected label ink near the token center, found {lit} pixels");
}

#[test]
fn truetype_label_ink_is_centered_on_token() {
    let Some(path) = system_font() else {
        println!("No system TrueType font found; skipping.");
        return;
    };
    let cfg = BoardConfig::default();
    let font = FontHandle::from_file(path, cfg.font_px()).expect("load system font");
    let renderer = BoardRenderer::new(cfg, font).expect("renderer");
    // position 45 sits at (360, 440)
    let (cx, cy) = (360i32, 440i32);
    let image = renderer
        .render(&[PlayerToken::new("12", 45, "#0000FF")])
        .expect("render with TrueType font");
    let pixels = image::load_from_memory(&image.png_data).unwrap().to_rgb8();

    // any label coverage lifts the red channel above the pure blue fill;
    // bounds are doubled, so 3 allows 1.5 px for rounding and faint edge pixels
    let (mut left, mut top, mut right, mut bottom) = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);
    for y in cy - 26..=cy + 26 {
        for x in cx - 26..=cx + 26 {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > 26 * 26 {
                continue;
            }
            if pixels.get_pixel(x as u32, y as u32)[0] > 0 {
                left = left.min(x);
                top = top.min(y);
                right = right.max(x + 1);
                bottom = bottom.max(y + 1);
            }
        }
    }
    assert!(left < right && top < bottom, "no label ink found");
    assert!(
        (left + right - 2 * cx).abs() <= 3,
        "ink spans x {left}..{right}, not centered on {cx}"
    );
    assert!(
        (top + bottom - 2 * cy).abs() <= 3,
        "ink spans y {top}..{bottom}, not centered on {cy}"
    );
}

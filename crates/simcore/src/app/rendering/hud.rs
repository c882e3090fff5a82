use super::raster::{Canvas, Rgb};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const TEXT_SCALE: i32 = 2;
const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
const LINE_ADVANCE: i32 = (GLYPH_HEIGHT + 2) * TEXT_SCALE;
const PANEL_PADDING: i32 = 6 * TEXT_SCALE;
const PANEL_INSET_X: i32 = 4 * TEXT_SCALE;
const PANEL_INSET_Y: i32 = 3 * TEXT_SCALE;
const TEXT_PRIMARY_COLOR: Rgb = [244, 248, 252];
const TEXT_DIM_COLOR: Rgb = [176, 198, 220];
const PANEL_BG_COLOR: Rgb = [10, 12, 16];
const PANEL_BG_ALPHA: f32 = 0.8;
const PANEL_BORDER_COLOR: Rgb = [92, 106, 126];

type GlyphRows = [u8; GLYPH_HEIGHT as usize];

const UNKNOWN_GLYPH: GlyphRows = [0b111, 0b001, 0b010, 0b000, 0b010];

/// Top-left panel. The first line is the headline; the rest are dimmer.
pub(crate) fn draw_hud_panel(canvas: &mut Canvas<'_>, lines: &[String]) {
    if lines.is_empty() || canvas.width() == 0 || canvas.height() == 0 {
        return;
    }

    let (panel_width, panel_height) = panel_size(lines);
    let left = PANEL_PADDING - PANEL_INSET_X;
    let top = PANEL_PADDING - PANEL_INSET_Y;
    canvas.fill_rect(
        left,
        top,
        panel_width,
        panel_height,
        PANEL_BG_COLOR,
        PANEL_BG_ALPHA,
    );
    canvas.rect_outline(left, top, panel_width, panel_height, PANEL_BORDER_COLOR);

    let mut y = PANEL_PADDING;
    for (index, line) in lines.iter().enumerate() {
        let color = if index == 0 {
            TEXT_PRIMARY_COLOR
        } else {
            TEXT_DIM_COLOR
        };
        draw_text(canvas, PANEL_PADDING, y, line, color);
        y += LINE_ADVANCE;
    }
}

/// Single line along the bottom edge of the window.
pub(crate) fn draw_footer(canvas: &mut Canvas<'_>, text: &str) {
    let y = canvas.height() as i32 - PANEL_PADDING - GLYPH_HEIGHT * TEXT_SCALE;
    draw_text(canvas, PANEL_PADDING, y, text, TEXT_DIM_COLOR);
}

fn panel_size(lines: &[String]) -> (i32, i32) {
    let longest = lines
        .iter()
        .map(|line| line.chars().count() as i32)
        .max()
        .unwrap_or(0);
    (
        longest * GLYPH_ADVANCE + PANEL_INSET_X * 2,
        lines.len() as i32 * LINE_ADVANCE + PANEL_INSET_Y * 2,
    )
}

pub(crate) fn draw_text(canvas: &mut Canvas<'_>, mut x: i32, y: i32, text: &str, color: Rgb) {
    for ch in text.chars() {
        if let Some(rows) = glyph_rows(ch) {
            draw_glyph(canvas, x, y, rows, color);
        }
        x += GLYPH_ADVANCE;
    }
}

fn draw_glyph(canvas: &mut Canvas<'_>, x: i32, y: i32, rows: GlyphRows, color: Rgb) {
    for (row_index, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            canvas.fill_rect(
                x + col * TEXT_SCALE,
                y + row_index as i32 * TEXT_SCALE,
                TEXT_SCALE,
                TEXT_SCALE,
                color,
                1.0,
            );
        }
    }
}

/// `None` for blanks. Lowercase folds to uppercase; anything else without a
/// glyph draws as `?`.
fn glyph_rows(ch: char) -> Option<GlyphRows> {
    let rows = match ch.to_ascii_uppercase() {
        ' ' => return None,
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '[' => [0b011, 0b010, 0b010, 0b010, 0b011],
        ']' => [0b110, 0b010, 0b010, 0b010, 0b110],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        _ => UNKNOWN_GLYPH,
    };
    Some(rows)
}

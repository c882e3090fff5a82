//! Clipped software drawing into an RGBA8 frame.

pub(crate) type Rgb = [u8; 3];

#[derive(Debug)]
pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn clear(&mut self, color: Rgb) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color[0], color[1], color[2], 255]);
        }
    }

    fn byte_range(&self, x: i32, y: i32) -> Option<std::ops::Range<usize>> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel_offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let start = pixel_offset.checked_mul(4)?;
        let end = start.checked_add(4)?;
        (end <= self.frame.len()).then_some(start..end)
    }

    pub(crate) fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(range) = self.byte_range(x, y) {
            self.frame[range].copy_from_slice(&[color[0], color[1], color[2], 255]);
        }
    }

    /// Mixes `color` over the existing pixel with coverage `alpha` in [0, 1].
    pub(crate) fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Some(range) = self.byte_range(x, y) else {
            return;
        };
        let pixel = &mut self.frame[range];
        for channel in 0..3 {
            let under = pixel[channel] as f32;
            let over = color[channel] as f32;
            pixel[channel] = (under + (over - under) * alpha).round() as u8;
        }
        pixel[3] = 255;
    }

    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb, alpha: f32) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(w).min(self.width as i32);
        let end_y = y.saturating_add(h).min(self.height as i32);
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.blend(px, py, color, alpha);
            }
        }
    }

    pub(crate) fn rect_outline(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        if w <= 1 || h <= 1 {
            return;
        }
        self.fill_rect(x, y, w, 1, color, 1.0);
        self.fill_rect(x, y + h - 1, w, 1, color, 1.0);
        self.fill_rect(x, y, 1, h, color, 1.0);
        self.fill_rect(x + w - 1, y, 1, h, color, 1.0);
    }

    pub(crate) fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb, alpha: f32) {
        if radius < 0 {
            return;
        }
        let r2 = radius as i64 * radius as i64;
        let top = cy.saturating_sub(radius).max(0);
        let bottom = cy.saturating_add(radius).min(self.height as i32 - 1);
        for py in top..=bottom {
            let dy = (py - cy) as i64;
            let span = ((r2 - dy * dy) as f64).sqrt() as i32;
            let left = (cx - span).max(0);
            let right = (cx + span).min(self.width as i32 - 1);
            for px in left..=right {
                self.blend(px, py, color, alpha);
            }
        }
    }

    pub(crate) fn circle_outline(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb) {
        if radius <= 0 {
            self.put(cx, cy, color);
            return;
        }
        // Midpoint circle.
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;
        while x >= y {
            for (ox, oy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.put(cx + ox, cy + oy, color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    pub(crate) fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, color);
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
}

//! 클리핑이 적용된 최소 래스터 드로잉 도구.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};

/// 비트맵 글꼴 한 글자의 크기 (픽셀).
pub(crate) const GLYPH_SIZE: i64 = 8;

/// `Canvas::text`로 그렸을 때의 문자열 너비.
pub(crate) fn text_width(text: &str, scale: i64) -> i64 {
    text.chars().count() as i64 * GLYPH_SIZE * scale.max(1)
}

pub(crate) struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub(crate) fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub(crate) fn into_image(self) -> RgbImage {
        self.image
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color);
        }
    }

    /// 양 끝을 포함하는 사각형 채우기.
    pub(crate) fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y, color);
            }
        }
    }

    pub(crate) fn stroke_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        self.line(x0, y0, x1, y0, color);
        self.line(x0, y1, x1, y1, color);
        self.line(x0, y0, x0, y1, color);
        self.line(x1, y0, x1, y1, color);
    }

    /// Bresenham 직선.
    pub(crate) fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;

        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
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

    /// 두께가 있는 직선 (세로 방향으로 겹쳐 그림).
    pub(crate) fn thick_line(
        &mut self,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        thickness: i64,
        color: Rgb<u8>,
    ) {
        let half = thickness / 2;
        for offset in -half..=(thickness - 1 - half) {
            self.line(x0, y0 + offset, x1, y1 + offset, color);
        }
    }

    /// 점선 수평선.
    pub(crate) fn dashed_hline(&mut self, x0: i64, x1: i64, y: i64, dash: i64, color: Rgb<u8>) {
        let dash = dash.max(1);
        let mut x = x0;
        while x <= x1 {
            let end = (x + dash - 1).min(x1);
            self.line(x, y, end, y, color);
            x += dash * 2;
        }
    }

    /// (x, y)를 왼쪽 위로 문자열을 그리고 너비를 반환합니다.
    ///
    /// 글꼴에 없는 문자는 '?'로 그립니다.
    pub(crate) fn text(&mut self, x: i64, y: i64, text: &str, scale: i64, color: Rgb<u8>) -> i64 {
        let scale = scale.max(1);
        let mut cursor = x;

        for ch in text.chars() {
            if let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) {
                for (row, bits) in glyph.iter().enumerate() {
                    let py = y + row as i64 * scale;
                    for col in 0..8u32 {
                        if (bits >> col) & 1 == 1 {
                            let px = cursor + i64::from(col) * scale;
                            self.fill_rect(px, py, px + scale - 1, py + scale - 1, color);
                        }
                    }
                }
            }
            cursor += GLYPH_SIZE * scale;
        }

        cursor - x
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }
}

//! Half-block raster the effects paint onto, shown through ratatui.
//!
//! Every terminal cell holds two stacked pixels drawn with `▀`: the
//! foreground colours the upper pixel and the background the lower one.
//! Colours are composited over black using their alpha.

use backdrop_core::{Rgba, Surface, Vec2};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

type Rgb = [f32; 3];

const UPPER_HALF: char = '▀';

#[derive(Debug, Clone)]
pub struct Raster {
    cols: u16,
    rows: u16,
    /// Surface units per cell column.
    cell_width: f32,
    /// Surface units per cell row.
    cell_height: f32,
    /// `cols * rows * 2` pixels, row-major.
    pixels: Vec<Rgb>,
    /// Text overlay, one slot per cell.
    glyphs: Vec<Option<(char, Rgb)>>,
}

impl Raster {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cols: 0,
            rows: 0,
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
            pixels: Vec::new(),
            glyphs: Vec::new(),
        }
    }

    /// Match the terminal size in cells. Contents are discarded.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        let cells = cols as usize * rows as usize;
        self.pixels = vec![[0.0; 3]; cells * 2];
        self.glyphs = vec![None; cells];
    }

    pub fn cells(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn pixel_size(&self) -> (f32, f32) {
        (self.cell_width, self.cell_height / 2.0)
    }

    fn pixel_rows(&self) -> usize {
        self.rows as usize * 2
    }

    fn pixel_center(&self, x: usize, y: usize) -> Vec2 {
        let (pw, ph) = self.pixel_size();
        Vec2::new((x as f32 + 0.5) * pw, (y as f32 + 0.5) * ph)
    }

    /// Pixel containing a surface position.
    fn pixel_at(&self, p: Vec2) -> (i64, i64) {
        let (pw, ph) = self.pixel_size();
        ((p.x / pw).floor() as i64, (p.y / ph).floor() as i64)
    }

    /// Pixel columns and rows overlapping a square of `radius` around `center`.
    fn bounds(&self, center: Vec2, radius: f32) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let (pw, ph) = self.pixel_size();
        let clip = |lo: f32, hi: f32, len: usize| {
            let start = (lo.floor().max(0.0) as usize).min(len);
            let end = (hi.ceil().max(0.0) as usize).min(len);
            start..end.max(start)
        };
        (
            clip((center.x - radius) / pw, (center.x + radius) / pw, self.cols as usize),
            clip((center.y - radius) / ph, (center.y + radius) / ph, self.pixel_rows()),
        )
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.cols) || y >= self.pixel_rows() as i64 {
            return;
        }
        let a = color.a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = y as usize * self.cols as usize + x as usize;
        for (dst, src) in self.pixels[idx].iter_mut().zip([color.r, color.g, color.b]) {
            *dst = f32::from(src) * a + *dst * (1.0 - a);
        }
    }

    /// Plot a run of pixel coordinates, skipping immediate repeats so a
    /// translucent stroke does not darken where samples coincide.
    fn plot_path(&mut self, points: impl Iterator<Item = (i64, i64)>, color: Rgba) {
        let mut last = None;
        for p in points {
            if last != Some(p) {
                self.blend(p.0, p.1, color);
                last = Some(p);
            }
        }
    }

    fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels
            .get(y * self.cols as usize + x)
            .copied()
            .unwrap_or([0.0; 3])
    }
}

fn mix(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Rgba::new(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
        from.a + (to.a - from.a) * t,
    )
}

fn to_color(rgb: Rgb) -> Color {
    let c = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Color::Rgb(c(rgb[0]), c(rgb[1]), c(rgb[2]))
}

impl Surface for Raster {
    fn width(&self) -> f32 {
        f32::from(self.cols) * self.cell_width
    }

    fn height(&self) -> f32 {
        f32::from(self.rows) * self.cell_height
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 3]);
        self.glyphs.fill(None);
    }

    fn fill(&mut self, color: Rgba) {
        for y in 0..self.pixel_rows() as i64 {
            for x in 0..i64::from(self.cols) {
                self.blend(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let (xs, ys) = self.bounds(center, radius);
        let mut covered = false;
        for y in ys {
            for x in xs.clone() {
                if self.pixel_center(x, y).distance(center) <= radius {
                    self.blend(x as i64, y as i64, color);
                    covered = true;
                }
            }
        }
        // smaller than a pixel
        if !covered {
            let (x, y) = self.pixel_at(center);
            self.blend(x, y, color);
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, _width: f32, color: Rgba) {
        let (pw, ph) = self.pixel_size();
        let samples = ((std::f32::consts::TAU * radius / pw.min(ph)).ceil() as usize).max(8);
        let points: Vec<_> = (0..samples)
            .map(|i| {
                let p = center + Vec2::from_angle(i as f32 / samples as f32 * std::f32::consts::TAU) * radius;
                self.pixel_at(p)
            })
            .collect();
        self.plot_path(points.into_iter(), color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, _width: f32, color: Rgba) {
        let (pw, ph) = self.pixel_size();
        let steps = ((to.x - from.x).abs() / pw)
            .max((to.y - from.y).abs() / ph)
            .ceil()
            .max(1.0) as usize;
        let points: Vec<_> = (0..=steps)
            .map(|i| self.pixel_at(from.lerp(to, i as f32 / steps as f32)))
            .collect();
        self.plot_path(points.into_iter(), color);
    }

    fn text(&mut self, at: Vec2, text: &str, _size: f32, color: Rgba) {
        let row = (at.y / self.cell_height).floor();
        if row < 0.0 || row >= f32::from(self.rows) {
            return;
        }
        let len = text.chars().count() as f32;
        let start = (at.x / self.cell_width - len / 2.0).round() as i64;
        let a = color.a.clamp(0.0, 1.0);
        let fg = [f32::from(color.r) * a, f32::from(color.g) * a, f32::from(color.b) * a];
        for (i, ch) in text.chars().enumerate() {
            let col = start + i as i64;
            if col < 0 || col >= i64::from(self.cols) {
                continue;
            }
            let idx = row as usize * self.cols as usize + col as usize;
            self.glyphs[idx] = Some((ch, fg));
        }
    }

    fn glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let (xs, ys) = self.bounds(center, radius);
        for y in ys {
            for x in xs.clone() {
                let d = self.pixel_center(x, y).distance(center);
                if d <= radius {
                    self.blend(x as i64, y as i64, mix(inner, outer, d / radius));
                }
            }
        }
    }
}

impl Widget for &Raster {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = (col as usize, row as usize);
                let top = self.pixel(x, y * 2);
                let bottom = self.pixel(x, y * 2 + 1);
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                match self.glyphs[y * self.cols as usize + x] {
                    Some((ch, fg)) => {
                        let bg = [
                            (top[0] + bottom[0]) / 2.0,
                            (top[1] + bottom[1]) / 2.0,
                            (top[2] + bottom[2]) / 2.0,
                        ];
                        cell.set_char(ch).set_fg(to_color(fg)).set_bg(to_color(bg));
                    }
                    None => {
                        cell.set_char(UPPER_HALF)
                            .set_fg(to_color(top))
                            .set_bg(to_color(bottom));
                    }
                }
            }
        }
    }
}

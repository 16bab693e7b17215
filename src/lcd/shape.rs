use crate::lcd::line::steps_inside;
use crate::lcd::{Color, Framebuffer};

impl Framebuffer {
    /// Rectangle outline. Each side stops one pixel short of the corner owned by the
    /// next side, so every pixel is written exactly once and `Xor` stays clean.
    pub fn draw_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let (x1, x2) = (x1.min(x2), x1.max(x2));
        let (y1, y2) = (y1.min(y2), y1.max(y2));

        if x1 == x2 {
            self.vertical_line(x1, y1, y2, color);
            return;
        }
        if y1 == y2 {
            self.horizontal_line(y1, x1, x2, color);
            return;
        }

        self.vertical_line(x1, y1 + 1, y2, color);
        self.vertical_line(x2, y1, y2 - 1, color);
        self.horizontal_line(y1, x1, x2 - 1, color);
        self.horizontal_line(y2, x1 + 1, x2, color);
    }

    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let lo = x1.min(x2).max(0);
        let hi = x1.max(x2).min(self.width() as i32 - 1);
        for x in lo..=hi {
            self.vertical_line(x, y1, y2, color);
        }
    }

    /// Midpoint circle outline. Radius 0 is a single pixel, negative radii draw nothing.
    ///
    /// Each octant point is found from its offset along the walking axis, so only
    /// offsets whose column (or row) lands in the buffer are visited.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius < 0 || !self.circle_visible(cx, cy, radius) {
            return;
        }
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);

        self.plot(cx, cy + r, color);
        if r > 0 {
            self.plot(cx, cy - r, color);
            self.plot(cx + r, cy, color);
            self.plot(cx - r, cy, color);
        }

        for dir in [1, -1] {
            for k in steps_inside(cx, dir, self.width(), 1, r) {
                let h = reach(r, k);
                if h >= k {
                    self.plot(cx + dir * k, cy + h, color);
                    self.plot(cx + dir * k, cy - h, color);
                }
            }
            for k in steps_inside(cy, dir, self.height(), 1, r) {
                let h = reach(r, k);
                if h > k {
                    self.plot(cx + h, cy + dir * k, color);
                    self.plot(cx - h, cy + dir * k, color);
                }
            }
        }
    }

    /// Filled disc built from one vertical run per visible column. Column extents
    /// come from the same midpoint decisions as [`Framebuffer::draw_circle`], so the
    /// outline always lies on the edge of the fill. `cx` selects the column and `cy`
    /// the row. Every column is visited once.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius < 0 || !self.circle_visible(cx, cy, radius) {
            return;
        }
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);

        for (dir, first) in [(1, 0), (-1, 1)] {
            for c in steps_inside(cx, dir, self.width(), first, r) {
                let h = column_extent(r, c);
                self.vertical_line(narrow(cx + dir * c), narrow(cy - h), narrow(cy + h), color);
            }
        }
    }

    fn circle_visible(&self, cx: i32, cy: i32, radius: i32) -> bool {
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);
        cx + r >= 0
            && cx - r < self.width() as i64
            && cy + r >= 0
            && cy - r < self.height() as i64
    }

    fn plot(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.set_pixel(x, y, color);
        }
    }
}

/// Row offset the midpoint walk settles on at column offset `k`: the largest `y`
/// with `y * (y - 1) < r^2 - k^2`. Valid for `0 <= k <= r`.
fn reach(r: i64, k: i64) -> i64 {
    let n = (r * r - k * k) as u64;
    (((4 * n).isqrt() + 1) / 2) as i64
}

/// Half height of the filled column at offset `c`. Past the 45 degree point the
/// extent is read off the transposed octant.
fn column_extent(r: i64, c: i64) -> i64 {
    let h = reach(r, c);
    if h >= c {
        return h;
    }
    // r^2 - c^2 + c - 1 >= 0 whenever 1 <= c <= r
    let below = ((r * r - c * c + c - 1) as u64).isqrt() as i64;
    below.min(c)
}

fn narrow(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::lcd::line::Line;
    use crate::lcd::test::{lit_pixels, noisy};

    fn lit_set(fb: &Framebuffer) -> HashSet<(i32, i32)> {
        lit_pixels(fb).into_iter().collect()
    }

    #[test]
    fn test_draw_rect_xor_touches_each_pixel_once() {
        let (x1, y1, x2, y2) = (5, 3, 30, 20);
        let mut fb = Framebuffer::new();
        fb.draw_rect(x1, y1, x2, y2, Color::Xor);

        let mut outline = HashSet::new();
        for (ax, ay, bx, by) in [
            (x1, y1, x2, y1),
            (x2, y1, x2, y2),
            (x2, y2, x1, y2),
            (x1, y2, x1, y1),
        ] {
            outline.extend(Line::new(ax, ay, bx, by));
        }

        assert_eq!(lit_set(&fb), outline);
        for corner in [(x1, y1), (x2, y1), (x1, y2), (x2, y2)] {
            assert!(fb.get_pixel(corner.0, corner.1));
        }
    }

    #[test]
    fn test_draw_rect_twice_xor_restores() {
        let mut fb = noisy();
        let before = fb.clone();
        fb.draw_rect(70, 40, -4, 9, Color::Xor);
        assert_ne!(fb, before);
        fb.draw_rect(-4, 9, 70, 40, Color::Xor);
        assert_eq!(fb, before);
    }

    #[test]
    fn test_degenerate_rects() {
        let mut fb = Framebuffer::new();
        fb.draw_rect(10, 2, 10, 9, Color::Xor);
        assert_eq!(lit_pixels(&fb), (2..=9).map(|y| (10, y)).collect::<Vec<_>>());

        let mut fb = Framebuffer::new();
        fb.draw_rect(4, 7, 12, 7, Color::Xor);
        assert_eq!(lit_pixels(&fb), (4..=12).map(|x| (x, 7)).collect::<Vec<_>>());

        let mut fb = Framebuffer::new();
        fb.draw_rect(6, 6, 6, 6, Color::Xor);
        assert_eq!(lit_pixels(&fb), vec![(6, 6)]);
    }

    #[test]
    fn test_fill_rect() {
        let mut fb = Framebuffer::new();
        fb.fill_rect(20, 30, 2, 5, Color::Black);
        let lit = lit_set(&fb);
        assert_eq!(lit.len(), 19 * 26);
        assert!(lit.iter().all(|&(x, y)| (2..=20).contains(&x) && (5..=30).contains(&y)));

        fb.fill_rect(-100, -100, 200, 200, Color::Xor);
        assert_eq!(lit_pixels(&fb).len(), 84 * 48 - 19 * 26);
    }

    #[test]
    fn test_circle_radius_edge_cases() {
        let mut fb = noisy();
        let before = fb.clone();
        fb.draw_circle(20, 20, -1, Color::Xor);
        fb.fill_circle(20, 20, -3, Color::Xor);
        assert_eq!(fb, before);

        let mut fb = Framebuffer::new();
        fb.draw_circle(20, 20, 0, Color::Xor);
        assert_eq!(lit_pixels(&fb), vec![(20, 20)]);

        let mut fb = Framebuffer::new();
        fb.fill_circle(20, 20, 0, Color::Xor);
        assert_eq!(lit_pixels(&fb), vec![(20, 20)]);
    }

    #[test]
    fn test_circle_outline_on_fill_edge() {
        for radius in 1..=20 {
            let mut outline = Framebuffer::with_size(64, 64).unwrap();
            let mut fill = outline.clone();
            outline.draw_circle(32, 32, radius, Color::Black);
            fill.fill_circle(32, 32, radius, Color::Black);

            let ring = lit_set(&outline);
            let disc = lit_set(&fill);
            assert!(ring.is_subset(&disc), "radius {}", radius);

            // every pixel on the edge of the fill is part of the outline
            for &(x, y) in &disc {
                let edge = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                    .iter()
                    .any(|(dx, dy)| !disc.contains(&(x + dx, y + dy)));
                if edge {
                    assert!(ring.contains(&(x, y)), "radius {} at {:?}", radius, (x, y));
                }
            }
        }
    }

    #[test]
    fn test_fill_circle_covers_reference_disc() {
        let (cx, cy, radius) = (20, 20, 5);
        let mut fb = Framebuffer::new();
        fb.fill_circle(cx, cy, radius, Color::Black);
        let disc = lit_set(&fb);

        for y in cy - radius..=cy + radius {
            for x in cx - radius..=cx + radius {
                if (x - cx).pow(2) + (y - cy).pow(2) <= radius * radius {
                    assert!(disc.contains(&(x, y)), "gap at {:?}", (x, y));
                }
            }
        }
        assert!(disc.iter().all(|&(x, y)| (x - cx).abs() <= radius && (y - cy).abs() <= radius));
    }

    #[test]
    fn test_circles_xor_touch_each_pixel_once() {
        for radius in 0..=15 {
            let mut fb = Framebuffer::with_size(40, 40).unwrap();
            fb.draw_circle(20, 20, radius, Color::Xor);
            let mut solid = Framebuffer::with_size(40, 40).unwrap();
            solid.draw_circle(20, 20, radius, Color::Black);
            assert_eq!(fb, solid, "outline radius {}", radius);

            let mut fb = Framebuffer::with_size(40, 40).unwrap();
            fb.fill_circle(20, 20, radius, Color::Xor);
            let mut solid = Framebuffer::with_size(40, 40).unwrap();
            solid.fill_circle(20, 20, radius, Color::Black);
            assert_eq!(fb, solid, "fill radius {}", radius);
        }
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut fb = Framebuffer::with_size(48, 48).unwrap();
        fb.fill_circle(24, 24, 9, Color::Black);
        let disc = lit_set(&fb);
        for &(x, y) in &disc {
            assert!(disc.contains(&(y, x)));
            assert!(disc.contains(&(48 - x, y)));
        }
    }

    #[test]
    fn test_rects_extreme_corners() {
        let mut fb = noisy();
        let before = fb.clone();
        fb.draw_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, Color::Xor);
        assert_eq!(fb, before);

        let mut fb = Framebuffer::new();
        fb.draw_rect(-1, -1, i32::MAX, 10, Color::Black);
        assert_eq!(lit_pixels(&fb), (0..84).map(|x| (x, 10)).collect::<Vec<_>>());

        let mut fb = Framebuffer::new();
        fb.fill_rect(i32::MAX, i32::MAX, i32::MIN, i32::MIN, Color::Black);
        assert_eq!(lit_pixels(&fb).len(), 84 * 48);
    }

    #[test]
    fn test_circles_extreme_centers_and_radii() {
        let mut fb = noisy();
        let before = fb.clone();
        fb.draw_circle(i32::MAX, 10, 3, Color::Xor);
        fb.fill_circle(10, i32::MAX, 3, Color::Xor);
        fb.draw_circle(i32::MIN, i32::MIN, i32::MAX, Color::Xor);
        fb.fill_circle(i32::MIN, i32::MIN, i32::MAX, Color::Xor);
        // the buffer sits well inside this ring
        fb.draw_circle(10, 10, i32::MAX, Color::Xor);
        assert_eq!(fb, before);

        let mut fb = Framebuffer::new();
        fb.fill_circle(10, 10, i32::MAX, Color::Black);
        assert_eq!(lit_pixels(&fb).len(), 84 * 48);
    }

    #[test]
    fn test_huge_circle_crossing_buffer() {
        let (cx, radius) = (-1_000_000_000, 1_000_000_040);
        let mut fb = Framebuffer::new();
        fb.draw_circle(cx, 20, radius, Color::Xor);
        assert_eq!(lit_pixels(&fb), (0..48).map(|y| (40, y)).collect::<Vec<_>>());

        let mut fb = Framebuffer::new();
        fb.fill_circle(cx, 20, radius, Color::Black);
        assert_eq!(lit_pixels(&fb).len(), 41 * 48);
    }

    #[test]
    fn test_circle_clipped_at_edges() {
        let mut fb = Framebuffer::new();
        fb.fill_circle(0, 0, 10, Color::Black);
        fb.draw_circle(83, 47, 10, Color::Black);
        assert!(fb.get_pixel(0, 0));
        assert!(fb.get_pixel(83, 37));
        assert!(!fb.get_pixel(40, 20));
    }
}

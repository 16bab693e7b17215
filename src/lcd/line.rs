use std::ops::RangeInclusive;

use crate::lcd::{Color, Framebuffer};

/// Bresenham walk from one point to another, both ends included.
///
/// Coordinates are tracked in `i64` so any pair of `i32` endpoints works, and
/// [`Iterator::nth`] jumps ahead in constant time.
pub struct Line {
    x: i64,
    y: i64,
    sx: i64,
    sy: i64,
    dx: i64,
    dy: i64,
    cumul: i64,
    remaining: u64,
}

impl Line {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let dx = x2 as i64 - x1 as i64;
        let dy = y2 as i64 - y1 as i64;
        let (adx, ady) = (dx.abs(), dy.abs());
        let major = adx.max(ady);

        Line {
            x: x1 as i64,
            y: y1 as i64,
            sx: if dx < 0 { -1 } else { 1 },
            sy: if dy < 0 { -1 } else { 1 },
            dx: adx,
            dy: ady,
            cumul: major / 2,
            remaining: major as u64 + 1,
        }
    }

    fn x_major(&self) -> bool {
        self.dx > self.dy
    }

    /// Moves the current point `steps` points along the line.
    fn jump(&mut self, steps: u64) {
        if steps == 0 {
            return;
        }
        let (major, minor) = if self.x_major() {
            (self.dx, self.dy)
        } else {
            (self.dy, self.dx)
        };
        // cumul < major and minor <= major, so each step carries at most once
        let total = self.cumul as i128 + steps as i128 * minor as i128;
        let carries = (total / major as i128) as i64;
        self.cumul = (total % major as i128) as i64;

        let steps = steps as i64;
        if self.x_major() {
            self.x += self.sx * steps;
            self.y += self.sy * carries;
        } else {
            self.y += self.sy * steps;
            self.x += self.sx * carries;
        }
    }

    /// First point index and point count of the part whose major coordinate lies
    /// inside a `width` x `height` buffer. Must be called before iterating.
    fn visible(&self, width: usize, height: usize) -> Option<(u64, usize)> {
        let last = self.remaining as i64 - 1;
        let steps = if self.x_major() {
            steps_inside(self.x, self.sx, width, 0, last)
        } else {
            steps_inside(self.y, self.sy, height, 0, last)
        };
        let (first, end) = steps.into_inner();
        if first > end {
            return None;
        }
        Some((first as u64, (end - first + 1) as usize))
    }
}

impl Iterator for Line {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.remaining == 0 {
            return None;
        }
        // every point lies between the two i32 endpoints
        let point = (self.x as i32, self.y as i32);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.jump(1);
        }
        Some(point)
    }

    fn nth(&mut self, n: usize) -> Option<(i32, i32)> {
        let n = n as u64;
        if n >= self.remaining {
            self.remaining = 0;
            return None;
        }
        self.jump(n);
        self.remaining -= n;
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(left) => (left, Some(left)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Step counts `k` in `first..=last` for which `start + dir * k` lands in `0..len`.
pub(crate) fn steps_inside(
    start: i64,
    dir: i64,
    len: usize,
    first: i64,
    last: i64,
) -> RangeInclusive<i64> {
    let len = len as i64;
    let (lo, hi) = if dir > 0 {
        (-start, len - 1 - start)
    } else {
        (start - (len - 1), start)
    };
    lo.max(first)..=hi.min(last)
}

/// Clamps an inclusive span to `0..len`. `None` when nothing of it is visible.
fn clip_span(a: i32, b: i32, len: usize) -> Option<(usize, usize)> {
    let (lo, hi) = if a > b { (b, a) } else { (a, b) };
    if hi < 0 || lo as i64 >= len as i64 {
        return None;
    }
    let lo = lo.max(0) as usize;
    let hi = (hi as i64).min(len as i64 - 1) as usize;
    Some((lo, hi))
}

impl Framebuffer {
    /// Walks only the stretch of the line that crosses the buffer.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let mut line = Line::new(x1, y1, x2, y2);
        let Some((first, count)) = line.visible(self.width(), self.height()) else {
            return;
        };
        line.jump(first);
        line.remaining -= first;
        for (x, y) in line.take(count) {
            self.set_pixel(x, y, color);
        }
    }

    /// Row `y` from `x1` to `x2` inclusive, one masked byte update per column.
    pub fn horizontal_line(&mut self, y: i32, x1: i32, x2: i32, color: Color) {
        if !self.in_y(y) {
            return;
        }
        let Some((x1, x2)) = clip_span(x1, x2, self.width()) else {
            return;
        };

        let row = y as usize / 8;
        let mask = 1u8 << (y % 8);
        for x in x1..=x2 {
            color.apply(self.byte_mut(x, row), mask);
        }
    }

    /// Column `x` from `y1` to `y2` inclusive, split into a partial head byte,
    /// whole middle bytes and a partial tail byte.
    pub fn vertical_line(&mut self, x: i32, y1: i32, y2: i32, color: Color) {
        if !self.in_x(x) {
            return;
        }
        let Some((y1, y2)) = clip_span(y1, y2, self.height()) else {
            return;
        };
        let x = x as usize;

        let (head_row, tail_row) = (y1 / 8, y2 / 8);
        let head_mask = 0xFFu8 << (y1 % 8);
        let tail_mask = 0xFFu8 >> (7 - y2 % 8);

        if head_row == tail_row {
            color.apply(self.byte_mut(x, head_row), head_mask & tail_mask);
            return;
        }

        color.apply(self.byte_mut(x, head_row), head_mask);
        for row in head_row + 1..tail_row {
            color.apply(self.byte_mut(x, row), 0xFF);
        }
        color.apply(self.byte_mut(x, tail_row), tail_mask);
    }
}

//! Field-of-view and line-of-sight calculations over the grid.
//! Results are recomputed on every query and never written back into the map;
//! `Sim::reveal_from` is the only place that copies a result into map flags.

use std::collections::BTreeSet;

use crate::state::{Map, manhattan};
use crate::types::Pos;

/// Cells visible from one origin at one radius. Immutable once computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOfView {
    origin: Pos,
    radius: i32,
    cells: BTreeSet<Pos>,
}

impl FieldOfView {
    pub fn origin(&self) -> Pos {
        self.origin
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn transform_octant(orig: Pos, x: i32, y: i32, oct: u8) -> Pos {
    match oct {
        0 => Pos { y: orig.y - y, x: orig.x + x },
        1 => Pos { y: orig.y - x, x: orig.x + y },
        2 => Pos { y: orig.y - x, x: orig.x - y },
        3 => Pos { y: orig.y - y, x: orig.x - x },
        4 => Pos { y: orig.y + y, x: orig.x - x },
        5 => Pos { y: orig.y + x, x: orig.x - y },
        6 => Pos { y: orig.y + x, x: orig.x + y },
        7 => Pos { y: orig.y + y, x: orig.x + x },
        _ => orig,
    }
}

/// Computes the cells visible from `origin` within taxicab `radius`.
///
/// A negative radius is blind and yields nothing. Otherwise the origin is always
/// included. With `light_walls`, the first opaque cell met along each line of sight is
/// part of the result; without it, only transparent cells (plus the origin) are.
pub fn compute_visibility(map: &Map, origin: Pos, radius: i32, light_walls: bool) -> FieldOfView {
    let mut cells = BTreeSet::new();
    if radius < 0 {
        return FieldOfView { origin, radius, cells };
    }

    let mut scan = OctantScan { map, origin, range: radius, lit: BTreeSet::new() };
    for octant in 0..8 {
        scan.scan(1, Slope::new(1, 1), Slope::new(0, 1), octant);
    }

    cells.insert(origin);
    for p in scan.lit {
        if p == origin || !map.in_bounds(p) {
            continue;
        }
        if !light_walls && map.is_opaque(p) {
            continue;
        }
        if has_direct_line_of_sight(map, origin, p) {
            cells.insert(p);
        }
    }
    FieldOfView { origin, radius, cells }
}

#[derive(Clone, Copy)]
struct Slope {
    y: i32,
    x: i32,
}

impl Slope {
    fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    fn greater_or_equal(&self, other: &Slope) -> bool {
        self.y * other.x >= other.y * self.x
    }

    fn greater_than(&self, other: &Slope) -> bool {
        self.y * other.x > other.y * self.x
    }
}

struct OctantScan<'a> {
    map: &'a Map,
    origin: Pos,
    range: i32,
    lit: BTreeSet<Pos>,
}

impl OctantScan<'_> {
    fn scan(&mut self, dist: i32, start: Slope, end: Slope, oct: u8) {
        if dist > self.range {
            return;
        }
        let range = self.range.unsigned_abs();
        let mut blocked = false;
        let mut cur_start = start;
        for y in (0..=dist).rev() {
            let top = Slope::new(2 * y + 1, 2 * dist - 1);
            let bot = Slope::new(2 * y - 1, 2 * dist + 1);
            if cur_start.greater_or_equal(&bot) && top.greater_than(&end) {
                let p = transform_octant(self.origin, dist, y, oct);
                if manhattan(self.origin, p) <= range {
                    self.lit.insert(p);
                }
                if self.map.is_opaque(p) {
                    if !blocked {
                        self.scan(dist + 1, cur_start, top, oct);
                        blocked = true;
                    }
                    cur_start = bot;
                } else if blocked {
                    blocked = false;
                }
            }
        }
        if !blocked {
            self.scan(dist + 1, cur_start, end, oct);
        }
    }
}

fn has_direct_line_of_sight(map: &Map, origin: Pos, target: Pos) -> bool {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    let sx = dx.signum();
    let sy = dy.signum();
    let total_dist_x = dx.abs();
    let total_dist_y = dy.abs();

    let mut x = origin.x;
    let mut y = origin.y;
    let mut current_step_x = 0;
    let mut current_step_y = 0;

    while current_step_x < total_dist_x || current_step_y < total_dist_y {
        let lhs = (1 + 2 * current_step_x) * total_dist_y;
        let rhs = (1 + 2 * current_step_y) * total_dist_x;

        if lhs == rhs {
            x += sx;
            y += sy;
            current_step_x += 1;
            current_step_y += 1;
        } else if lhs < rhs {
            x += sx;
            current_step_x += 1;
        } else {
            y += sy;
            current_step_y += 1;
        }

        if x == target.x && y == target.y {
            break;
        }
        if map.is_opaque(Pos { y, x }) {
            return false;
        }
    }
    true
}

#[cfg(test)]
pub(crate) fn draw_fov_diag(map: &Map, fov: &FieldOfView) -> String {
    let mut text = String::new();
    for y in 0..map.internal_height {
        for x in 0..map.internal_width {
            let p = Pos { y: y as i32, x: x as i32 };
            let c = if p == fov.origin() {
                '@'
            } else if map.is_opaque(p) {
                '#'
            } else {
                '.'
            };
            let v = if fov.contains(p) { 'v' } else { 'h' };
            text.push_str(&format!("{c}{v} "));
        }
        text.push('\n');
    }
    text
}

//! Deterministic shortest-path search over grid walkability.
//! Occupants can be made temporarily passable for a single search through a scoped
//! override; the map is restored before the search result is returned.

use std::collections::{BTreeMap, BTreeSet};

use crate::state::{Actor, Map, World, manhattan, neighbors};
use crate::types::{EntityId, PathError, Pos};

/// An inclusive run of orthogonally adjacent cells from a source to a destination.
///
/// `len` counts steps, so a path from a cell to itself has length zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Pos>,
    cursor: usize,
}

impl Path {
    fn new(cells: Vec<Pos>) -> Self {
        Self { cells, cursor: 0 }
    }

    pub fn source(&self) -> Pos {
        self.cells[0]
    }

    pub fn destination(&self) -> Pos {
        self.cells[self.cells.len() - 1]
    }

    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current(&self) -> Pos {
        self.cells[self.cursor]
    }

    /// Advances one cell. Fails with `Exhausted` once the destination is reached.
    pub fn step_forward(&mut self) -> Result<Pos, PathError> {
        let next = self.cells.get(self.cursor + 1).copied().ok_or(PathError::Exhausted)?;
        self.cursor += 1;
        Ok(next)
    }
}

/// Marks a set of cells walkable for as long as it is alive.
///
/// Each cell's previous walkability is recorded on acquire and written back, in
/// reverse order, on drop. A cell listed twice therefore ends up with the value it had
/// before the first entry, and cells that were already walkable stay walkable.
pub struct WalkableOverride<'a> {
    map: &'a mut Map,
    saved: Vec<(Pos, bool)>,
}

impl<'a> WalkableOverride<'a> {
    pub fn acquire(map: &'a mut Map, cells: impl IntoIterator<Item = Pos>) -> Self {
        let mut saved = Vec::new();
        for cell in cells {
            if !map.in_bounds(cell) {
                continue;
            }
            saved.push((cell, map.is_walkable(cell)));
            map.set_walkable(cell, true);
        }
        Self { map, saved }
    }

    pub fn map(&self) -> &Map {
        self.map
    }
}

impl Drop for WalkableOverride<'_> {
    fn drop(&mut self) {
        for (cell, was_walkable) in self.saved.drain(..).rev() {
            self.map.set_walkable(cell, was_walkable);
        }
    }
}

/// Obstruction predicate that treats every occupant as an obstacle.
pub fn ignore_none(_: &Actor) -> bool {
    false
}

/// Shortest path from `source` to `destination`. Occupants matching `is_ignorable`
/// do not block; both endpoints are exempt from the obstruction check.
pub fn shortest_path<F>(
    world: &mut World,
    source: Pos,
    destination: Pos,
    is_ignorable: F,
) -> Result<Path, PathError>
where
    F: Fn(&Actor) -> bool,
{
    let ignored: Vec<Pos> =
        world.actors.values().filter(|actor| is_ignorable(actor)).map(|actor| actor.pos).collect();
    let guard = WalkableOverride::acquire(&mut world.map, ignored);
    astar_path(guard.map(), source, destination).map(Path::new).ok_or(PathError::NotFound)
}

pub fn path_exists<F>(world: &mut World, source: Pos, destination: Pos, is_ignorable: F) -> bool
where
    F: Fn(&Actor) -> bool,
{
    shortest_path(world, source, destination, is_ignorable).is_ok()
}

/// Paths from `origin` to every reachable target, keeping all of those tied for the
/// shortest length in target order. Unreachable or missing targets are skipped.
pub fn paths_to_nearest<F>(
    world: &mut World,
    origin: Pos,
    targets: &[EntityId],
    is_ignorable: F,
) -> Vec<Path>
where
    F: Fn(&Actor) -> bool,
{
    let mut nearest_paths = Vec::new();
    let mut nearest_len = usize::MAX;
    for target in targets {
        let Some(target_pos) = world.actors.get(*target).map(|actor| actor.pos) else {
            continue;
        };
        let Ok(attempt) = shortest_path(world, origin, target_pos, &is_ignorable) else {
            continue;
        };
        if attempt.len() > nearest_len {
            continue;
        }
        if attempt.len() < nearest_len {
            nearest_paths.clear();
            nearest_len = attempt.len();
        }
        nearest_paths.push(attempt);
    }
    nearest_paths
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

fn astar_path(map: &Map, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    if !map.in_bounds(start) || !map.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }
    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let h = manhattan(start, goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0u32);
    while let Some(curr) = open_set.pop_first() {
        let p = Pos { y: curr.y, x: curr.x };
        if p == goal {
            return reconstruct_path(&came_from, start, goal);
        }
        let cur_g = *g_score.get(&p)?;
        for n in neighbors(p) {
            if n != goal && !map.is_walkable(n) {
                continue;
            }
            let tg = cur_g + 1;
            if tg < *g_score.get(&n).unwrap_or(&u32::MAX) {
                came_from.insert(n, p);
                g_score.insert(n, tg);
                let h = manhattan(n, goal);
                open_set.insert(OpenNode { f: tg + h, h, y: n.y, x: n.x });
            }
        }
    }
    None
}

fn reconstruct_path(came: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    let mut p = goal;
    let mut result = vec![p];
    while p != start {
        p = *came.get(&p)?;
        result.push(p);
    }
    result.reverse();
    Some(result)
}

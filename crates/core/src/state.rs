use std::collections::{BTreeSet, VecDeque};

use slotmap::SlotMap;

use crate::content::{Cadence, archetype};
use crate::types::*;

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: EntityId,
    pub kind: ActorKind,
    pub name: String,
    pub pos: Pos,
    /// Field-of-view radius. Zero sees only its own cell, negative is blind.
    pub awareness: i32,
    /// Ticks between turns; read again every time the actor is re-queued.
    pub delay: u32,
    pub stamina: u8,
}

impl Actor {
    pub fn from_archetype(kind: ActorKind, pos: Pos) -> Self {
        let arch = archetype(kind);
        let stamina = match arch.cadence {
            Cadence::Stamina { pool } => pool,
            Cadence::EveryTurn => 0,
        };
        Self {
            id: EntityId::default(),
            kind,
            name: arch.name.to_string(),
            pos,
            awareness: arch.awareness,
            delay: arch.delay,
            stamina,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub pos: Pos,
}

#[derive(Clone)]
pub struct Map {
    pub internal_width: usize,
    pub internal_height: usize,
    pub tiles: Vec<TileKind>,
    pub walkable: Vec<bool>,
    pub explored: Vec<bool>,
    pub visible: Vec<bool>,
}

impl Map {
    /// Open floor ringed by walls. A zero dimension gives an empty map.
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = vec![TileKind::Floor; width * height];
        if tiles.is_empty() {
            return Self::from_tiles(width, height, tiles);
        }
        for x in 0..width {
            tiles[x] = TileKind::Wall;
            tiles[(height - 1) * width + x] = TileKind::Wall;
        }
        for y in 0..height {
            tiles[y * width] = TileKind::Wall;
            tiles[y * width + (width - 1)] = TileKind::Wall;
        }
        Self::from_tiles(width, height, tiles)
    }

    fn from_tiles(width: usize, height: usize, tiles: Vec<TileKind>) -> Self {
        let walkable = tiles.iter().map(|tile| *tile == TileKind::Floor).collect();
        Self {
            internal_width: width,
            internal_height: height,
            tiles,
            walkable,
            explored: vec![false; width * height],
            visible: vec![false; width * height],
        }
    }

    /// Parses rows of `#` (wall) and `.` (floor). Rows must share one width.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self, ConfigError> {
        let Some(first) = rows.first() else {
            return Err(ConfigError::EmptyMap);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(ConfigError::EmptyMap);
        }
        let height = rows.len();
        let mut map = Self::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != width {
                return Err(ConfigError::RaggedRow { row });
            }
            for (col, glyph) in line.chars().enumerate() {
                let tile = match glyph {
                    '#' => TileKind::Wall,
                    '.' => TileKind::Floor,
                    _ => return Err(ConfigError::UnknownGlyph { glyph, row, col }),
                };
                map.set_tile(Pos { y: row as i32, x: col as i32 }, tile);
            }
        }
        Ok(map)
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.internal_width
            && (pos.y as usize) < self.internal_height
    }

    /// Changes terrain and resets the cell's walkability to match it.
    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
        self.walkable[idx] = tile == TileKind::Floor;
    }

    pub fn is_opaque(&self, pos: Pos) -> bool {
        self.tile_at(pos) == TileKind::Wall
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.walkable[self.index(pos)]
    }

    pub fn set_walkable(&mut self, pos: Pos, walkable: bool) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.walkable[idx] = walkable;
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.explored[self.index(pos)]
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.visible[self.index(pos)]
    }

    pub fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    /// Marks a cell visible; visible cells are explored from then on.
    pub fn set_visible(&mut self, pos: Pos, visible: bool) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.visible[idx] = visible;
        if visible {
            self.explored[idx] = true;
        }
    }

    pub fn floor_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.internal_height).flat_map(move |y| {
            (0..self.internal_width)
                .map(move |x| Pos { y: y as i32, x: x as i32 })
                .filter(|pos| self.tile_at(*pos) == TileKind::Floor)
        })
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.internal_width + (pos.x as usize)
    }
}

/// Grid plus the actor and item registries living on it.
///
/// Occupied cells are not walkable. More than one actor may share a cell; a cell
/// becomes walkable again only once the last of them has left.
#[derive(Clone)]
pub struct World {
    pub map: Map,
    pub actors: SlotMap<EntityId, Actor>,
    pub items: SlotMap<ItemId, Item>,
}

impl World {
    pub fn new(map: Map) -> Self {
        Self { map, actors: SlotMap::with_key(), items: SlotMap::with_key() }
    }

    pub fn place_actor(&mut self, actor: Actor) -> EntityId {
        let pos = actor.pos;
        let id = self.actors.insert(actor);
        self.actors[id].id = id;
        self.refresh_walkable(pos);
        id
    }

    pub fn remove_actor(&mut self, id: EntityId) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        self.refresh_walkable(actor.pos);
        Some(actor)
    }

    pub fn move_actor(&mut self, id: EntityId, to: Pos) {
        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        let from = actor.pos;
        actor.pos = to;
        self.refresh_walkable(from);
        self.refresh_walkable(to);
    }

    pub fn place_item(&mut self, name: &str, pos: Pos) -> ItemId {
        let id = self.items.insert(Item { id: ItemId::default(), name: name.to_string(), pos });
        self.items[id].id = id;
        id
    }

    pub fn actors_at(&self, pos: Pos) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values().filter(move |actor| actor.pos == pos)
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.actors_at(pos).next().is_some()
    }

    /// Actors on the four orthogonal neighbours, scanned north, east, south, west.
    pub fn adjacent_actors(&self, pos: Pos) -> Vec<EntityId> {
        neighbors(pos)
            .into_iter()
            .flat_map(|cell| self.actors_at(cell).map(|actor| actor.id).collect::<Vec<_>>())
            .collect()
    }

    /// Walkable orthogonal neighbours, scanned north, east, south, west.
    pub fn adjacent_walkable_cells(&self, pos: Pos) -> Vec<Pos> {
        neighbors(pos).into_iter().filter(|cell| self.map.is_walkable(*cell)).collect()
    }

    /// Free floor cells (no actor, no item) at the smallest breadth-first distance
    /// from `origin`.
    pub fn nearest_drop_cells(&self, origin: Pos) -> Vec<Pos> {
        let mut visited = BTreeSet::new();
        let mut frontier = VecDeque::new();
        if self.map.in_bounds(origin) {
            visited.insert(origin);
            frontier.push_back(origin);
        }

        while !frontier.is_empty() {
            let ring: Vec<Pos> = frontier.drain(..).collect();
            let free: Vec<Pos> =
                ring.iter().copied().filter(|cell| self.is_free_drop_cell(*cell)).collect();
            if !free.is_empty() {
                return free;
            }
            for cell in ring {
                for next in neighbors(cell) {
                    if self.map.tile_at(next) == TileKind::Floor && visited.insert(next) {
                        frontier.push_back(next);
                    }
                }
            }
        }
        Vec::new()
    }

    fn is_free_drop_cell(&self, pos: Pos) -> bool {
        self.map.tile_at(pos) == TileKind::Floor
            && !self.is_occupied(pos)
            && !self.items.values().any(|item| item.pos == pos)
    }

    fn refresh_walkable(&mut self, pos: Pos) {
        let walkable = self.map.tile_at(pos) == TileKind::Floor && !self.is_occupied(pos);
        self.map.set_walkable(pos, walkable);
    }
}

pub fn neighbors(p: Pos) -> [Pos; 4] {
    [
        Pos { y: p.y - 1, x: p.x },
        Pos { y: p.y, x: p.x + 1 },
        Pos { y: p.y + 1, x: p.x },
        Pos { y: p.y, x: p.x - 1 },
    ]
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

pub fn adjacent_to(a: Pos, b: Pos) -> bool {
    manhattan(a, b) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world() -> World {
        World::new(Map::new(7, 7))
    }

    #[test]
    fn from_ascii_reads_walls_and_floors() {
        let map = Map::from_ascii(&["#####", "#...#", "#####"]).expect("map");
        assert_eq!(map.internal_width, 5);
        assert_eq!(map.internal_height, 3);
        assert_eq!(map.tile_at(Pos { y: 1, x: 2 }), TileKind::Floor);
        assert!(map.is_walkable(Pos { y: 1, x: 1 }));
        assert!(!map.is_walkable(Pos { y: 0, x: 1 }));
    }

    #[test]
    fn from_ascii_rejects_bad_rows() {
        assert_eq!(Map::from_ascii::<&str>(&[]).err(), Some(ConfigError::EmptyMap));
        assert_eq!(
            Map::from_ascii(&["###", "##"]).err(),
            Some(ConfigError::RaggedRow { row: 1 })
        );
        assert_eq!(
            Map::from_ascii(&["#x#"]).err(),
            Some(ConfigError::UnknownGlyph { glyph: 'x', row: 0, col: 1 })
        );
    }

    #[test]
    fn out_of_bounds_reads_as_wall_and_unwalkable() {
        let map = Map::new(4, 4);
        let outside = Pos { y: -1, x: 2 };
        assert_eq!(map.tile_at(outside), TileKind::Wall);
        assert!(!map.is_walkable(outside));
        assert!(!map.is_visible(outside));
    }

    #[test]
    fn shared_cell_stays_blocked_until_last_occupant_leaves() {
        let mut world = open_world();
        let cell = Pos { y: 3, x: 3 };
        let first = world.place_actor(Actor::from_archetype(ActorKind::Militia, cell));
        let second = world.place_actor(Actor::from_archetype(ActorKind::Militia, cell));
        assert!(!world.map.is_walkable(cell));
        assert_eq!(world.actors_at(cell).count(), 2);

        world.move_actor(first, Pos { y: 3, x: 4 });
        assert!(!world.map.is_walkable(cell), "second occupant still blocks the cell");
        world.remove_actor(second);
        assert!(world.map.is_walkable(cell));
    }

    #[test]
    fn adjacency_queries_scan_in_compass_order() {
        let mut world = open_world();
        let center = Pos { y: 3, x: 3 };
        let west = world.place_actor(Actor::from_archetype(ActorKind::Militia, Pos { y: 3, x: 2 }));
        let north = world.place_actor(Actor::from_archetype(ActorKind::Militia, Pos { y: 2, x: 3 }));
        assert_eq!(world.adjacent_actors(center), vec![north, west]);
        assert_eq!(
            world.adjacent_walkable_cells(center),
            vec![Pos { y: 3, x: 4 }, Pos { y: 4, x: 3 }]
        );
    }

    #[test]
    fn nearest_drop_cells_skip_items_and_actors() {
        let mut world = open_world();
        let origin = Pos { y: 3, x: 3 };
        world.place_item("Nutrient", origin);
        world.place_actor(Actor::from_archetype(ActorKind::Militia, Pos { y: 2, x: 3 }));

        let ring = world.nearest_drop_cells(origin);
        assert_eq!(ring, vec![Pos { y: 3, x: 4 }, Pos { y: 4, x: 3 }, Pos { y: 3, x: 2 }]);

        for cell in ring {
            world.place_item("Calcium Dust", cell);
        }
        let next = world.nearest_drop_cells(origin);
        assert!(!next.is_empty());
        assert!(next.iter().all(|cell| manhattan(*cell, origin) == 2));
    }

    #[test]
    fn zero_sized_maps_are_empty_rather_than_panicking() {
        for (width, height) in [(0, 0), (0, 5), (5, 0)] {
            let map = Map::new(width, height);
            assert!(map.tiles.is_empty());
            assert!(!map.in_bounds(Pos { y: 0, x: 0 }));
            assert_eq!(map.floor_cells().count(), 0);
        }
        let sliver = Map::new(1, 1);
        assert_eq!(sliver.tile_at(Pos { y: 0, x: 0 }), TileKind::Wall);
    }

    #[test]
    fn nearest_drop_cells_is_empty_when_sealed() {
        let mut map = Map::new(3, 3);
        map.set_tile(Pos { y: 1, x: 1 }, TileKind::Floor);
        let mut world = World::new(map);
        world.place_item("Nutrient", Pos { y: 1, x: 1 });
        assert!(world.nearest_drop_cells(Pos { y: 1, x: 1 }).is_empty());
    }
}

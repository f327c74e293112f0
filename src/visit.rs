// src/visit.rs
//! Вход в город с карты мира
//!
//! Сид города выводится из сида мира и координат клетки, поэтому повторный визит
//! даёт тот же город и тех же жителей. Карта города и её жители живут парой: список
//! жителей без карты, по которой он построен, бессмыслен.

use crate::config::TownSettings;
use crate::error::{GenError, GenResult};
use crate::grid::{Direction, Position};
use crate::npc::{Npc, populate_town};
use crate::rng::derive_seed;
use crate::town::{TownMapData, TownSize, generate_town_map_with};
use crate::world::{Poi, WorldMap};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Карта города вместе с жителями
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownVisit {
    pub map: TownMapData,
    pub npcs: Vec<Npc>,
}

/// Сид города на клетке `pos` мира с сидом `world_seed`
pub fn town_seed(world_seed: u64, pos: Position) -> GenResult<u64> {
    derive_seed(world_seed, pos.x, pos.y, 0.0)
}

/// Сторона входа: первая соседняя клетка с дорогой, иначе юг
#[must_use]
pub fn entry_direction(world: &WorldMap, pos: Position) -> Direction {
    world
        .neighbors(pos)
        .find(|(_, p)| world.get(*p).is_some_and(|t| t.has_path))
        .map_or(Direction::South, |(dir, _)| dir)
}

pub fn enter_town(world: &WorldMap, world_seed: u64, pos: Position) -> GenResult<TownVisit> {
    enter_town_with(world, world_seed, pos, &TownSettings::default())
}

pub fn enter_town_with(
    world: &WorldMap,
    world_seed: u64,
    pos: Position,
    settings: &TownSettings,
) -> GenResult<TownVisit> {
    let tile = world
        .get(pos)
        .ok_or(GenError::OutOfBounds { x: pos.x, y: pos.y })?;
    if tile.poi != Some(Poi::Town) {
        return Err(GenError::NotATown { x: pos.x, y: pos.y });
    }

    let seed = town_seed(world_seed, pos)?;
    let map = generate_town_map_with(
        tile.town_size.unwrap_or(TownSize::Village),
        tile.town_name.as_deref().unwrap_or("Nameless"),
        entry_direction(world, pos),
        Some(seed),
        tile.has_river,
        tile.river_direction,
        settings,
    );
    let npcs = populate_town(&map, seed)?;
    Ok(TownVisit { map, npcs })
}

/// Кэш посещённых городов по `(сид мира, x, y)`
#[derive(Debug, Default)]
pub struct TownCache {
    entries: HashMap<(u64, i32, i32), TownVisit>,
    settings: TownSettings,
}

impl TownCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: TownSettings) -> Self {
        Self {
            entries: HashMap::new(),
            settings,
        }
    }

    /// Город из кэша; при первом визите генерируется и запоминается
    pub fn visit(&mut self, world: &WorldMap, world_seed: u64, pos: Position) -> GenResult<&TownVisit> {
        match self.entries.entry((world_seed, pos.x, pos.y)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let visit = enter_town_with(world, world_seed, pos, &self.settings)?;
                log::debug!("cached town at {pos} for world seed {world_seed}");
                Ok(entry.insert(visit))
            }
        }
    }

    #[must_use]
    pub fn get(&self, world_seed: u64, pos: Position) -> Option<&TownVisit> {
        self.entries.get(&(world_seed, pos.x, pos.y))
    }

    /// Забыть город (например, после сохранения игроком)
    pub fn evict(&mut self, world_seed: u64, pos: Position) -> Option<TownVisit> {
        self.entries.remove(&(world_seed, pos.x, pos.y))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Все города мира в построчном порядке. Каждый город строится своим генератором,
/// так что с фичей `parallel` они строятся параллельно.
pub fn generate_all_towns(world: &WorldMap, world_seed: u64) -> GenResult<Vec<(Position, TownVisit)>> {
    let towns = world.town_positions();

    #[cfg(feature = "parallel")]
    let visits = towns
        .par_iter()
        .map(|&pos| enter_town(world, world_seed, pos).map(|visit| (pos, visit)))
        .collect::<GenResult<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let visits = towns
        .iter()
        .map(|&pos| enter_town(world, world_seed, pos).map(|visit| (pos, visit)))
        .collect::<GenResult<Vec<_>>>()?;

    log::info!("generated {} towns for world seed {world_seed}", visits.len());
    Ok(visits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomNames;
    use crate::world::{find_starting_town, generate_world_map};

    fn world(seed: u64) -> WorldMap {
        generate_world_map(10, 10, Some(seed), &CustomNames::default())
            .unwrap_or_else(|e| panic!("world {seed}: {e}"))
    }

    #[test]
    fn test_enter_starting_town() {
        let w = world(12345);
        let start = find_starting_town(&w).unwrap_or_else(|e| panic!("{e}"));
        let visit = enter_town(&w, 12345, start).unwrap_or_else(|e| panic!("{e}"));
        let tile = w.get(start).unwrap_or_else(|| panic!("tile"));
        assert_eq!(Some(visit.map.town_name.as_str()), tile.town_name.as_deref());
        assert_eq!(Some(visit.map.town_size), tile.town_size);
        assert!(!visit.npcs.is_empty());
    }

    #[test]
    fn test_revisit_is_identical() {
        let w = world(7);
        let start = find_starting_town(&w).unwrap_or_else(|e| panic!("{e}"));
        let a = enter_town(&w, 7, start).ok();
        let b = enter_town(&w, 7, start).ok();
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_town_tiles_are_rejected() {
        let w = world(42);
        let plain = w
            .positions()
            .find(|&p| w.get(p).is_some_and(|t| t.poi.is_none()))
            .unwrap_or_else(|| panic!("no empty tile"));
        assert!(matches!(enter_town(&w, 42, plain), Err(GenError::NotATown { .. })));
        assert!(matches!(
            enter_town(&w, 42, Position::new(-1, 3)),
            Err(GenError::OutOfBounds { x: -1, y: 3 })
        ));
    }

    #[test]
    fn test_cache_generates_once() {
        let w = world(99);
        let start = find_starting_town(&w).unwrap_or_else(|e| panic!("{e}"));
        let mut cache = TownCache::new();
        let first = cache.visit(&w, 99, start).map(|v| v.npcs.len()).ok();
        let second = cache.visit(&w, 99, start).map(|v| v.npcs.len()).ok();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(99, start).is_some());
        assert!(cache.get(100, start).is_none());
        assert!(cache.evict(99, start).is_some());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_all_towns_match_single_visits() {
        let w = world(2024);
        let all = generate_all_towns(&w, 2024).unwrap_or_default();
        assert_eq!(all.len(), w.town_positions().len());
        for (pos, visit) in &all {
            assert_eq!(enter_town(&w, 2024, *pos).ok().as_ref(), Some(visit));
        }
    }

    #[test]
    fn test_entry_follows_road() {
        let mut w = WorldMap::new(4, 4, 0);
        let town = Position::new(1, 1);
        assert_eq!(entry_direction(&w, town), Direction::South);
        if let Some(tile) = w.get_mut(Position::new(2, 1)) {
            tile.has_path = true;
        }
        assert_eq!(entry_direction(&w, town), Direction::East);
    }
}

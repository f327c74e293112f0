// src/world/towns.rs
//! Города на карте мира: размещение, стартовый город, размеры, названия, дороги

use super::{Poi, Route, WorldMap, WorldTile, mark_route};
use crate::config::WorldSettings;
use crate::error::{GenError, GenResult};
use crate::grid::Position;
use crate::names;
use crate::pathfinding::{RoadNetwork, connect_towns};
use crate::rng::WorldRng;
use crate::town::TownSize;
use std::collections::HashSet;

const PLACEMENT_ATTEMPTS: usize = 30;

fn is_town_site(tile: &WorldTile) -> bool {
    !tile.is_claimed() && !tile.is_water()
}

/// Города на свободной суше, не ближе `min_town_distance` друг к другу.
///
/// Если случайный поиск не дал ни одного города, берётся первая подходящая клетка при
/// построчном обходе. Карта без единого места под город - ошибка генерации.
pub(super) fn place_towns(
    map: &mut WorldMap,
    rng: &mut WorldRng,
    settings: &WorldSettings,
) -> GenResult<Vec<Position>> {
    let wanted = rng.range_pair(settings.towns);
    let mut towns: Vec<Position> = Vec::new();

    for _ in 0..wanted {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = Position::new(rng.range(0, map.width - 1), rng.range(0, map.height - 1));
            let free = map.get(pos).is_some_and(is_town_site);
            let spaced = towns
                .iter()
                .all(|&t| t.manhattan(pos) >= settings.min_town_distance);
            if free && spaced {
                towns.push(pos);
                if let Some(tile) = map.get_mut(pos) {
                    tile.poi = Some(Poi::Town);
                }
                break;
            }
        }
    }

    if towns.is_empty() {
        let fallback = map
            .positions()
            .find(|&p| map.get(p).is_some_and(is_town_site))
            .ok_or(GenError::NoTownSite)?;
        log::warn!("town placement fell back to first free tile {fallback}");
        if let Some(tile) = map.get_mut(fallback) {
            tile.poi = Some(Poi::Town);
        }
        towns.push(fallback);
    }

    log::debug!("towns: {}/{} placed", towns.len(), wanted);
    Ok(towns)
}

/// Стартовый город, размеры и названия.
///
/// Размеры перемешиваются, чтобы каждый встречался примерно по разу. Пользовательские
/// имена достаются городам по убыванию важности (город > городок > деревня > хутор).
pub(super) fn assign_identities(
    map: &mut WorldMap,
    rng: &mut WorldRng,
    towns: &[Position],
    custom_names: &[String],
) {
    if towns.is_empty() {
        return;
    }

    let starting = rng.range(0, towns.len() as i32 - 1) as usize;
    if let Some(tile) = map.get_mut(towns[starting]) {
        tile.is_starting_town = true;
    }

    let mut sizes = TownSize::ALL;
    rng.shuffle(&mut sizes);
    let assigned: Vec<TownSize> = (0..towns.len()).map(|i| sizes[i % sizes.len()]).collect();

    let mut by_importance: Vec<usize> = (0..towns.len()).collect();
    by_importance.sort_by_key(|&i| std::cmp::Reverse(assigned[i]));

    let mut custom = custom_names.iter();
    let mut used: HashSet<String> = custom_names.iter().cloned().collect();

    for i in by_importance {
        let name = match custom.next() {
            Some(name) => name.clone(),
            None => unique_town_name(rng, &mut used),
        };
        if let Some(tile) = map.get_mut(towns[i]) {
            tile.town_size = Some(assigned[i]);
            tile.town_name = Some(name);
        }
    }
}

fn unique_town_name(rng: &mut WorldRng, used: &mut HashSet<String>) -> String {
    let mut name = names::town_name(rng);
    let mut attempt = 0;
    while used.contains(&name) && attempt < 10 {
        name = names::town_name(rng);
        attempt += 1;
    }
    if used.contains(&name) {
        name = format!("New {name}");
    }
    used.insert(name.clone());
    name
}

/// Дороги между городами; клетки с объектами не перезаписываются
pub(super) fn build_roads(map: &mut WorldMap, rng: &mut WorldRng, towns: &[Position]) -> RoadNetwork {
    let network = connect_towns(map, towns, rng);
    let mut tiles = 0;
    for road in &network.roads {
        tiles += mark_route(map, &road.path, Route::Road);
    }
    log::debug!("roads: {} roads over {tiles} tiles", network.roads.len());
    network
}

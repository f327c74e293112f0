// src/world/terrain.rs
//! Базовый рельеф: побережье, озёра, леса, горы, выравнивание по четвертям, производные биомы

use super::{Biome, MountainNamePool, Poi, WorldMap, WorldTile};
use crate::config::WorldSettings;
use crate::grid::{Direction, Position};
use crate::names;
use crate::rng::WorldRng;

/// Попыток найти место под озеро или начало массива
const SITE_ATTEMPTS: usize = 50;
/// Попыток на один шаг роста массива
const GROWTH_RETRIES: usize = 4;

fn random_position(map: &WorldMap, rng: &mut WorldRng) -> Position {
    Position::new(rng.range(0, map.width - 1), rng.range(0, map.height - 1))
}

fn random_direction(rng: &mut WorldRng) -> Direction {
    rng.pick(&Direction::ALL).copied().unwrap_or(Direction::North)
}

/// Случайная клетка, подходящая под условие, не более `SITE_ATTEMPTS` попыток
fn find_site(
    map: &WorldMap,
    rng: &mut WorldRng,
    fits: impl Fn(Position, &WorldTile) -> bool,
) -> Option<Position> {
    (0..SITE_ATTEMPTS)
        .map(|_| random_position(map, rng))
        .find(|&p| map.get(p).is_some_and(|t| fits(p, t)))
}

/// Полоса воды глубиной 2-3 клетки вдоль одного края; внутренний ряд - пляж
pub(super) fn carve_coast(map: &mut WorldMap, rng: &mut WorldRng, settings: &WorldSettings) {
    let edge = random_direction(rng);
    let depth = rng.range_pair(settings.coast_depth).max(2) as i32;
    let (width, height) = (map.width, map.height);

    for pos in map.positions() {
        let distance = match edge {
            Direction::North => pos.y,
            Direction::South => height - 1 - pos.y,
            Direction::West => pos.x,
            Direction::East => width - 1 - pos.x,
        };
        let Some(tile) = map.get_mut(pos) else {
            continue;
        };
        if distance < depth - 1 {
            tile.biome = Biome::Water;
        } else if distance == depth - 1 {
            tile.biome = Biome::Beach;
            tile.beach_direction = Some(edge);
        }
    }
    log::debug!("coast: {edge:?} edge, depth {depth}");
}

/// Озёра на равнине, не касающиеся берега (включая диагонали)
pub(super) fn place_lakes(map: &mut WorldMap, rng: &mut WorldRng, settings: &WorldSettings) {
    let wanted = rng.range_pair(settings.lakes);
    let mut placed = 0;

    for _ in 0..wanted {
        let view = &*map;
        let site = find_site(view, rng, |pos, tile| {
            tile.biome == Biome::Plains && !tile.is_claimed() && !near_shore(view, pos)
        });
        let Some(pos) = site else {
            continue;
        };
        if let Some(tile) = map.get_mut(pos) {
            tile.biome = Biome::Water;
            tile.is_lake = true;
            placed += 1;
        }
    }
    log::debug!("lakes: {placed}/{wanted}");
}

fn near_shore(map: &WorldMap, pos: Position) -> bool {
    (-1..=1).any(|dy| {
        (-1..=1).any(|dx| {
            map.get(Position::new(pos.x + dx, pos.y + dy))
                .is_some_and(|t| matches!(t.biome, Biome::Water | Biome::Beach))
        })
    })
}

/// Лесные массивы растут от случайного уже посаженного дерева
pub(super) fn grow_forests(map: &mut WorldMap, rng: &mut WorldRng, settings: &WorldSettings) {
    let clusters = rng.range_pair(settings.forest_clusters);
    let mut tiles = 0;

    for _ in 0..clusters {
        let size = rng.range_pair(settings.forest_size) as usize;
        let fits = |tile: &WorldTile| !tile.is_claimed() && !tile.is_water();
        let Some(start) = find_site(map, rng, |_, t| fits(t)) else {
            continue;
        };
        let cluster = grow_cluster(map, rng, start, size, Poi::Forest, false, fits);
        tiles += cluster.len();
    }
    log::debug!("forests: {clusters} clusters, {tiles} tiles");
}

/// Хребты растут всегда от последней клетки и получают вытянутую форму
pub(super) fn grow_mountain_ranges(
    map: &mut WorldMap,
    rng: &mut WorldRng,
    settings: &WorldSettings,
    pool: &mut MountainNamePool,
) {
    let ranges = rng.range_pair(settings.mountain_ranges);
    let mut used_names: Vec<String> = Vec::new();

    for _ in 0..ranges {
        let size = rng.range_pair(settings.mountain_size) as usize;
        let fits = |tile: &WorldTile| !tile.is_claimed() && tile.biome == Biome::Plains;
        let Some(start) = find_site(map, rng, |_, t| fits(t)) else {
            continue;
        };
        let range = grow_cluster(map, rng, start, size, Poi::Mountain, true, fits);

        let name = pool.take().unwrap_or_else(|| {
            let mut name = names::mountain_name(rng);
            for _ in 0..10 {
                if !used_names.contains(&name) {
                    break;
                }
                name = names::mountain_name(rng);
            }
            name
        });
        for &pos in &range {
            if let Some(tile) = map.get_mut(pos) {
                tile.mountain_name = Some(name.clone());
            }
        }
        log::debug!("mountain range '{name}': {} tiles", range.len());
        used_names.push(name);
    }
}

/// Рост массива: каждый шаг - до `GROWTH_RETRIES` попыток шагнуть в случайную сторону.
/// Неудачный шаг пропускается, поэтому массив может получиться меньше `size`.
fn grow_cluster(
    map: &mut WorldMap,
    rng: &mut WorldRng,
    start: Position,
    size: usize,
    poi: Poi,
    from_last: bool,
    fits: impl Fn(&WorldTile) -> bool,
) -> Vec<Position> {
    let mut members = vec![start];
    if let Some(tile) = map.get_mut(start) {
        tile.poi = Some(poi);
    }

    for _ in 1..size {
        for _ in 0..GROWTH_RETRIES {
            let base = if from_last {
                members[members.len() - 1]
            } else {
                let i = rng.range(0, members.len() as i32 - 1) as usize;
                members[i]
            };
            let next = base.step(random_direction(rng));
            if map.get(next).is_some_and(&fits) {
                if let Some(tile) = map.get_mut(next) {
                    tile.poi = Some(poi);
                }
                members.push(next);
                break;
            }
        }
    }
    members
}

/// Каждая четверть карты должна содержать не меньше `min_pois_per_quadrant` объектов:
/// недостающее добирается лесом или горами на свободной равнине.
pub(super) fn balance_quadrants(map: &mut WorldMap, rng: &mut WorldRng, settings: &WorldSettings) {
    let (hw, hh) = (map.width / 2, map.height / 2);
    let quadrants = [
        (0, 0, hw, hh),
        (hw, 0, map.width, hh),
        (0, hh, hw, map.height),
        (hw, hh, map.width, map.height),
    ];

    for (x0, y0, x1, y1) in quadrants {
        let cells: Vec<Position> = (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| Position::new(x, y)))
            .collect();
        let mut count = cells
            .iter()
            .filter(|&&p| map.get(p).is_some_and(WorldTile::is_claimed))
            .count();
        if count >= settings.min_pois_per_quadrant {
            continue;
        }

        let mut free: Vec<Position> = cells
            .into_iter()
            .filter(|&p| {
                map.get(p)
                    .is_some_and(|t| !t.is_claimed() && t.biome == Biome::Plains)
            })
            .collect();
        rng.shuffle(&mut free);

        let before = count;
        for pos in free {
            if count >= settings.min_pois_per_quadrant {
                break;
            }
            let poi = if rng.chance(0.5) {
                Poi::Forest
            } else {
                Poi::Mountain
            };
            if let Some(tile) = map.get_mut(pos) {
                tile.poi = Some(poi);
                count += 1;
            }
        }
        log::debug!("quadrant ({x0},{y0}): {before} -> {count} points of interest");
    }
}

/// Равнина рядом с горами (или под ними) - предгорье, рядом с лесом - опушка
pub(super) fn derive_biomes(map: &mut WorldMap) {
    let touches = |map: &WorldMap, pos: Position, poi: Poi| {
        map.get(pos).is_some_and(|t| t.poi == Some(poi))
            || map
                .neighbors(pos)
                .any(|(_, p)| map.get(p).is_some_and(|t| t.poi == Some(poi)))
    };

    let view = &*map;
    let updates: Vec<(Position, Biome)> = view
        .positions()
        .filter(|&p| view.get(p).is_some_and(|t| t.biome == Biome::Plains))
        .filter_map(|p| {
            if touches(view, p, Poi::Mountain) {
                Some((p, Biome::MountainAdjacent))
            } else if touches(view, p, Poi::Forest) {
                Some((p, Biome::ForestAdjacent))
            } else {
                None
            }
        })
        .collect();

    for (pos, biome) in updates {
        if let Some(tile) = map.get_mut(pos) {
            tile.biome = biome;
        }
    }
}

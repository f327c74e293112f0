// src/town/paths.rs
//! Тропинки от домов к дорогам
//!
//! Часть домов соединяется прямо с ближайшей дорогой, остальные - органически,
//! короткими отрезками к уже подключённым домам или дорогам. После этого проход от
//! входа проверяется поиском в ширину, и отрезанные дома получают тропинку.

use super::{TownMapData, TownTileType};
use crate::grid::Position;
use crate::rng::WorldRng;
use std::collections::{HashMap, HashSet, VecDeque};

/// Проходов органического соединения
const ORGANIC_PASSES: usize = 10;
/// Дальше этого органическая тропинка не тянется
const ORGANIC_REACH: i32 = 10;
/// Насколько дальше площади мостовая остаётся каменной
const STONE_MARGIN: i32 = 3;

fn surface_at(town: &TownMapData, pos: Position) -> TownTileType {
    let stone_radius = town.town_size.square_radius() + STONE_MARGIN;
    if pos.chebyshev(town.center_point) <= stone_radius {
        TownTileType::StonePath
    } else {
        TownTileType::DirtPath
    }
}

/// Прокладывает тропинку через клетку; `true`, если клетка изменилась
fn carve_cell(town: &mut TownMapData, pos: Position) -> bool {
    let next = match town.tile_type(pos) {
        Some(TownTileType::Grass | TownTileType::FarmField) => surface_at(town, pos),
        Some(TownTileType::Water) => TownTileType::Bridge,
        _ => return false,
    };
    if let Some(tile) = town.get_mut(pos) {
        tile.set_type(next);
        tile.set_poi(None);
    }
    true
}

/// Г-образный путь: сначала по вертикали, потом по горизонтали. Без концов.
fn elbow(from: Position, to: Position) -> Vec<Position> {
    let mut cells = Vec::new();
    let mut cursor = from;
    while cursor.y != to.y {
        cursor.y += (to.y - cursor.y).signum();
        cells.push(cursor);
    }
    while cursor.x != to.x {
        cursor.x += (to.x - cursor.x).signum();
        cells.push(cursor);
    }
    cells.pop();
    cells
}

fn carve_between(town: &mut TownMapData, from: Position, to: Position) -> usize {
    elbow(from, to)
        .into_iter()
        .filter(|&p| carve_cell(town, p))
        .count()
}

fn road_tiles(town: &TownMapData) -> Vec<Position> {
    town.positions()
        .filter(|&p| town.tile_type(p).is_some_and(TownTileType::is_road))
        .collect()
}

fn touches_road(town: &TownMapData, pos: Position) -> bool {
    town.neighbors(pos)
        .any(|n| town.tile_type(n).is_some_and(TownTileType::is_road))
}

/// Соединяет дома с дорожной сетью. Возвращает число проложенных клеток.
pub(super) fn connect_houses(
    town: &mut TownMapData,
    rng: &mut WorldRng,
    houses: &[Position],
    direct_share: f64,
) -> usize {
    let mut connected = vec![false; houses.len()];
    let mut carved = 0;

    for (i, &house) in houses.iter().enumerate() {
        if !rng.chance(direct_share) {
            continue;
        }
        let nearest = road_tiles(town)
            .into_iter()
            .min_by_key(|&p| house.manhattan(p));
        if let Some(target) = nearest {
            if house.manhattan(target) > 1 {
                carved += carve_between(town, house, target);
            }
            connected[i] = true;
        }
    }

    for pass in 0..ORGANIC_PASSES {
        let mut progress = false;
        for (i, &house) in houses.iter().enumerate() {
            if connected[i] {
                continue;
            }
            if touches_road(town, house) {
                connected[i] = true;
                progress = true;
                continue;
            }
            let linked_houses = houses
                .iter()
                .zip(&connected)
                .filter(|&(_, &done)| done)
                .map(|(&p, _)| p);
            let target = road_tiles(town)
                .into_iter()
                .chain(linked_houses)
                .filter(|&p| {
                    let d = house.manhattan(p);
                    d > 1 && d < ORGANIC_REACH
                })
                .min_by_key(|&p| house.manhattan(p));
            if let Some(target) = target {
                carved += carve_between(town, house, target);
                connected[i] = true;
                progress = true;
            }
        }
        if !progress {
            log::debug!("organic paths settled after {pass} passes");
            break;
        }
    }
    carved
}

/// Клетки, достижимые от входа по проходимым клеткам
pub fn reachable_from_entry(town: &TownMapData) -> HashSet<Position> {
    let start = town.entry_point;
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for next in town.neighbors(pos) {
            if town.get(next).is_some_and(|t| t.walkable) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Через воду можно перекинуть мост, остальное должно быть проходимым
fn passable(town: &TownMapData, pos: Position) -> bool {
    town.get(pos)
        .is_some_and(|t| t.walkable || t.tile_type == TownTileType::Water)
}

/// Кратчайший проход от дома к достижимой области
fn tunnel(town: &TownMapData, house: Position, reached: &HashSet<Position>) -> Option<Vec<Position>> {
    let mut parent: HashMap<Position, Position> = HashMap::new();
    let mut queue = VecDeque::new();
    for start in town.neighbors(house) {
        if passable(town, start) && !parent.contains_key(&start) {
            parent.insert(start, start);
            queue.push_back(start);
        }
    }
    while let Some(pos) = queue.pop_front() {
        if reached.contains(&pos) {
            let mut route = Vec::new();
            let mut cursor = pos;
            while let Some(&prev) = parent.get(&cursor) {
                if prev == cursor {
                    break;
                }
                cursor = prev;
                route.push(cursor);
            }
            return Some(route);
        }
        for next in town.neighbors(pos) {
            if next != house && !parent.contains_key(&next) && passable(town, next) {
                parent.insert(next, pos);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Прокладывает тропинки к домам, до которых нельзя дойти от входа.
/// Возвращает число изменённых клеток.
pub(super) fn repair_stranded(town: &mut TownMapData, houses: &[Position]) -> usize {
    let mut carved = 0;
    let mut reached = reachable_from_entry(town);
    for &house in houses {
        if town.neighbors(house).any(|n| reached.contains(&n)) {
            continue;
        }
        match tunnel(town, house, &reached) {
            Some(route) => {
                carved += route.into_iter().filter(|&p| carve_cell(town, p)).count();
                reached = reachable_from_entry(town);
            }
            None => log::warn!("house at {house} in '{}' is walled off", town.town_name),
        }
    }
    carved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::{BuildingType, TownSize};

    #[test]
    fn test_elbow_skips_endpoints() {
        let cells = elbow(Position::new(0, 0), Position::new(2, 2));
        assert_eq!(
            cells,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 2)]
        );
        assert!(elbow(Position::new(0, 0), Position::new(0, 1)).is_empty());
    }

    #[test]
    fn test_direct_connection_uses_nearest_road() {
        let mut town = TownMapData::new(TownSize::Hamlet, "Lane");
        for x in 0..8 {
            town.set_type(Position::new(x, 7), TownTileType::DirtPath);
        }
        let house = Position::new(2, 2);
        town.place_building(house, BuildingType::House, "Cottage".into());
        let carved = connect_houses(&mut town, &mut WorldRng::new(1), &[house], 1.0);
        assert_eq!(carved, 4);
        for y in 3..7 {
            assert!(town.tile_type(Position::new(2, y)).is_some_and(TownTileType::is_road));
        }
    }

    #[test]
    fn test_stranded_house_gets_bridge() {
        let mut town = TownMapData::new(TownSize::Hamlet, "Isle");
        town.entry_point = Position::new(4, 7);
        for x in 0..8 {
            town.set_type(Position::new(x, 4), TownTileType::Water);
        }
        let house = Position::new(1, 1);
        town.place_building(house, BuildingType::House, "Cottage".into());
        assert!(!reachable_from_entry(&town).contains(&Position::new(1, 2)));

        let carved = repair_stranded(&mut town, &[house]);
        assert!(carved > 0);
        let reached = reachable_from_entry(&town);
        assert!(town.neighbors(house).any(|n| reached.contains(&n)));
        let bridges = town
            .tiles
            .iter()
            .filter(|t| t.tile_type == TownTileType::Bridge)
            .count();
        assert_eq!(bridges, 1);
    }
}

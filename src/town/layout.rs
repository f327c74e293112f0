// src/town/layout.rs
//! Каркас города: река, главная дорога, площадь, стены и замок

use super::{BuildingType, Decoration, TownMapData, TownSize, TownTileType};
use crate::grid::{Direction, Position};
use crate::names;
use crate::pathfinding::ConnectionCode;
use crate::rng::WorldRng;

/// Ширина речного русла в клетках
const RIVER_WIDTH: i32 = 2;

/// Середина края карты со стороны входа
pub(super) fn entry_point(town: &TownMapData, side: Direction) -> Position {
    let (w, h) = (town.width, town.height);
    match side {
        Direction::North => Position::new(w / 2, 0),
        Direction::South => Position::new(w / 2, h - 1),
        Direction::West => Position::new(0, h / 2),
        Direction::East => Position::new(w - 1, h / 2),
    }
}

/// Полоса воды через всю карту в стороне от площади.
///
/// Ориентация берётся из кода течения на карте мира; для поворотов и при его
/// отсутствии выбирается случайно.
pub(super) fn carve_river(town: &mut TownMapData, rng: &mut WorldRng, flow: Option<ConnectionCode>) {
    let vertical = flow
        .and_then(ConnectionCode::vertical_axis)
        .unwrap_or_else(|| rng.chance(0.5));
    let radius = town.town_size.square_radius();
    let offset = radius + 1 + rng.range(0, 1);
    let sign = if rng.chance(0.5) { 1 } else { -1 };

    let center = town.center_point;
    let (base, span) = if vertical {
        (center.x, town.height)
    } else {
        (center.y, town.width)
    };

    let mut carved = 0;
    for band in 0..RIVER_WIDTH {
        let line = base + sign * (offset + band);
        for along in 0..span {
            let pos = if vertical {
                Position::new(line, along)
            } else {
                Position::new(along, line)
            };
            if let Some(tile) = town.get_mut(pos) {
                tile.set_type(TownTileType::Water);
                carved += 1;
            }
        }
    }
    log::debug!(
        "river through '{}': {} axis, {carved} water tiles",
        town.town_name,
        if vertical { "vertical" } else { "horizontal" }
    );
}

/// Смещения поперёк дороги заданной ширины
fn road_offsets(width: i32) -> std::ops::RangeInclusive<i32> {
    -((width - 1) / 2)..=width / 2
}

/// Прямая дорога от входа до центра. Вода под дорогой становится мостом.
pub(super) fn carve_main_road(town: &mut TownMapData) {
    let surface = town.town_size.road_surface();
    let (entry, center) = (town.entry_point, town.center_point);
    let vertical = entry.x == center.x;
    let Some(toward) = Direction::ALL.into_iter().find(|&d| {
        let (dx, dy) = d.offset();
        (center.x - entry.x).signum() == dx && (center.y - entry.y).signum() == dy
    }) else {
        return;
    };

    let mut cursor = entry;
    loop {
        for shift in road_offsets(town.town_size.road_width()) {
            let pos = if vertical {
                Position::new(cursor.x + shift, cursor.y)
            } else {
                Position::new(cursor.x, cursor.y + shift)
            };
            if let Some(tile) = town.get_mut(pos) {
                let next = if tile.tile_type == TownTileType::Water {
                    TownTileType::Bridge
                } else {
                    surface
                };
                tile.set_type(next);
            }
        }
        if cursor == center {
            break;
        }
        cursor = cursor.step(toward);
    }
}

/// Площадь вокруг центра; в центре колодец или фонтан
pub(super) fn carve_square(town: &mut TownMapData) {
    let center = town.center_point;
    let radius = town.town_size.square_radius();
    for pos in town.positions() {
        if pos.chebyshev(center) <= radius {
            if let Some(tile) = town.get_mut(pos) {
                tile.set_type(TownTileType::TownSquare);
                tile.set_poi(None);
            }
        }
    }
    let feature = match town.town_size {
        TownSize::Hamlet | TownSize::Village => Decoration::Well,
        TownSize::Town | TownSize::City => Decoration::Fountain,
    };
    if let Some(tile) = town.get_mut(center) {
        tile.set_poi(Some(feature));
    }
}

/// Городская стена по периметру. Дорога и река проходят сквозь неё.
pub(super) fn build_walls(town: &mut TownMapData) {
    let (w, h) = (town.width, town.height);
    for pos in town.positions() {
        let edge = pos.x == 0 || pos.y == 0 || pos.x == w - 1 || pos.y == h - 1;
        if edge && town.tile_type(pos) == Some(TownTileType::Grass) {
            town.set_type(pos, TownTileType::Wall);
        }
    }
}

/// Замок: здание в кольце стен с проходом к площади.
///
/// Замок стоит над площадью. Если север занят дорогой (вход с севера) или рекой,
/// пробуем сторону напротив входа, затем боковые.
pub(super) fn build_keep(town: &mut TownMapData, rng: &mut WorldRng, entry_side: Direction) {
    let center = town.center_point;
    let radius = town.town_size.square_radius();
    let mut sides = vec![Direction::North];
    for side in [entry_side.opposite(), perpendicular(entry_side), perpendicular(entry_side).opposite()] {
        if !sides.contains(&side) {
            sides.push(side);
        }
    }

    for side in sides {
        let (dx, dy) = side.offset();
        let keep = Position::new(center.x + dx * (radius + 3), center.y + dy * (radius + 3));
        let inward = side.opposite();
        let gate = keep.step(inward);
        let approach = gate.step(inward);

        let ring_fits = (-1..=1)
            .flat_map(|oy| (-1..=1).map(move |ox| Position::new(keep.x + ox, keep.y + oy)))
            .all(|p| is_interior(town, p) && town.tile_type(p) == Some(TownTileType::Grass));
        let approach_fits = town
            .tile_type(approach)
            .is_some_and(|t| t == TownTileType::Grass || t.is_road());
        if !(ring_fits && approach_fits) {
            continue;
        }

        for p in keep.neighbors().map(|(_, p)| p).chain(diagonals(keep)) {
            town.set_type(p, TownTileType::KeepWall);
        }
        town.set_type(gate, TownTileType::StonePath);
        if town.tile_type(approach) == Some(TownTileType::Grass) {
            town.set_type(approach, TownTileType::StonePath);
        }
        let name = names::building_name(rng, BuildingType::Keep, &town.town_name);
        town.place_building(keep, BuildingType::Keep, name);
        log::debug!("keep of '{}' placed at {keep}", town.town_name);
        return;
    }
    log::debug!("no room for a keep in '{}'", town.town_name);
}

fn perpendicular(dir: Direction) -> Direction {
    match dir {
        Direction::North | Direction::South => Direction::East,
        Direction::East | Direction::West => Direction::North,
    }
}

fn diagonals(pos: Position) -> impl Iterator<Item = Position> {
    [(-1, -1), (1, -1), (1, 1), (-1, 1)]
        .into_iter()
        .map(move |(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
}

fn is_interior(town: &TownMapData, pos: Position) -> bool {
    pos.x > 0 && pos.y > 0 && pos.x < town.width - 1 && pos.y < town.height - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(size: TownSize) -> TownMapData {
        TownMapData::new(size, "Layout")
    }

    #[test]
    fn test_entry_points() {
        let town = blank(TownSize::Town);
        assert_eq!(entry_point(&town, Direction::North), Position::new(8, 0));
        assert_eq!(entry_point(&town, Direction::South), Position::new(8, 15));
        assert_eq!(entry_point(&town, Direction::East), Position::new(15, 8));
    }

    #[test]
    fn test_road_offsets() {
        assert_eq!(road_offsets(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(road_offsets(2).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(road_offsets(3).collect::<Vec<_>>(), vec![-1, 0, 1]);
    }

    #[test]
    fn test_main_road_reaches_center() {
        let mut town = blank(TownSize::City);
        town.entry_point = entry_point(&town, Direction::West);
        carve_main_road(&mut town);
        for x in 0..=10 {
            for y in 9..=11 {
                assert_eq!(
                    town.tile_type(Position::new(x, y)),
                    Some(TownTileType::StonePath)
                );
            }
        }
        assert_eq!(town.tile_type(Position::new(11, 10)), Some(TownTileType::Grass));
    }

    #[test]
    fn test_river_avoids_square() {
        for seed in 0..20 {
            let mut town = blank(TownSize::Village);
            let mut rng = WorldRng::new(seed);
            carve_river(&mut town, &mut rng, Some(ConnectionCode::NorthSouth));
            carve_square(&mut town);
            let water: Vec<Position> = town
                .positions()
                .filter(|&p| town.tile_type(p) == Some(TownTileType::Water))
                .collect();
            assert!(!water.is_empty());
            assert!(water.iter().all(|p| p.chebyshev(town.center_point) > 1));
            // вертикальная река занимает целые столбцы
            assert_eq!(water.len() % 12, 0);
        }
    }

    #[test]
    fn test_road_bridges_river() {
        let mut bridged = 0;
        for seed in 0..16 {
            let mut town = blank(TownSize::Hamlet);
            let mut rng = WorldRng::new(seed);
            carve_river(&mut town, &mut rng, Some(ConnectionCode::EastWest));
            town.entry_point = entry_point(&town, Direction::North);
            carve_main_road(&mut town);
            let column: Vec<TownTileType> = (0..=4)
                .filter_map(|y| town.tile_type(Position::new(4, y)))
                .collect();
            assert!(!column.contains(&TownTileType::Water));
            bridged += usize::from(column.contains(&TownTileType::Bridge));
        }
        assert!(bridged > 0);
    }

    #[test]
    fn test_keep_has_gate_toward_square() {
        let mut town = blank(TownSize::City);
        town.entry_point = entry_point(&town, Direction::South);
        carve_main_road(&mut town);
        carve_square(&mut town);
        build_walls(&mut town);
        build_keep(&mut town, &mut WorldRng::new(1), Direction::South);

        let keep = Position::new(10, 4);
        assert_eq!(
            town.get(keep).and_then(|t| t.building_type),
            Some(BuildingType::Keep)
        );
        assert_eq!(town.tile_type(Position::new(10, 5)), Some(TownTileType::StonePath));
        assert_eq!(town.tile_type(Position::new(10, 6)), Some(TownTileType::StonePath));
        assert_eq!(town.tile_type(Position::new(9, 5)), Some(TownTileType::KeepWall));
        assert_eq!(town.tile_type(Position::new(10, 3)), Some(TownTileType::KeepWall));
    }

    fn keep_position(entry: Direction) -> Option<Position> {
        let mut town = blank(TownSize::City);
        town.entry_point = entry_point(&town, entry);
        carve_main_road(&mut town);
        carve_square(&mut town);
        build_walls(&mut town);
        build_keep(&mut town, &mut WorldRng::new(9), entry);
        town.positions()
            .find(|&p| town.get(p).and_then(|t| t.building_type) == Some(BuildingType::Keep))
    }

    #[test]
    fn test_keep_sits_above_square() {
        for entry in [Direction::South, Direction::East, Direction::West] {
            assert_eq!(keep_position(entry), Some(Position::new(10, 4)), "entry {entry:?}");
        }
        // с севера идёт дорога, замок уходит на противоположную сторону
        assert_eq!(keep_position(Direction::North), Some(Position::new(10, 16)));
    }
}

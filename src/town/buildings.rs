// src/town/buildings.rs
//! Размещение зданий: важные вокруг площади, жилые дома по окраинам

use super::{BuildingType, TownMapData, TownTile, TownTileType};
use crate::grid::Position;
use crate::names;
use crate::rng::WorldRng;

/// Кольцо клеток на расстоянии Чебышёва `radius` по часовой стрелке,
/// начиная с левого верхнего угла
pub(crate) fn ring(center: Position, radius: i32) -> Vec<Position> {
    if radius == 0 {
        return vec![center];
    }
    let (cx, cy, r) = (center.x, center.y, radius);
    let mut cells = Vec::with_capacity((8 * r) as usize);
    cells.extend((cx - r..=cx + r).map(|x| Position::new(x, cy - r)));
    cells.extend((cy - r + 1..=cy + r).map(|y| Position::new(cx + r, y)));
    cells.extend((cx - r..cx + r).rev().map(|x| Position::new(x, cy + r)));
    cells.extend((cy - r + 1..cy + r).rev().map(|y| Position::new(cx - r, y)));
    cells
}

fn touches_solid(town: &TownMapData, pos: Position) -> bool {
    (-1..=1)
        .flat_map(|dy| (-1..=1).map(move |dx| Position::new(pos.x + dx, pos.y + dy)))
        .filter(|&p| p != pos)
        .any(|p| town.tile_type(p).is_some_and(TownTileType::is_solid))
}

/// Важные здания размера города - на первое свободное место кольца вокруг площади.
/// Возвращает число поставленных зданий.
pub(super) fn place_important(town: &mut TownMapData, rng: &mut WorldRng) -> usize {
    let center = town.center_point;
    let primary = town.town_size.square_radius() + 1;
    let radii: Vec<i32> = std::iter::once(primary)
        .chain((2..=primary + 3).filter(|&r| r != primary))
        .collect();

    let mut placed = 0;
    for kind in town.town_size.important_buildings() {
        let site = radii.iter().find_map(|&r| {
            ring(center, r).into_iter().find(|&p| {
                p != town.entry_point && town.get(p).is_some_and(TownTile::is_open_grass)
            })
        });
        let Some(site) = site else {
            log::debug!("no site left for {kind:?} in '{}'", town.town_name);
            continue;
        };
        let name = names::building_name(rng, kind, &town.town_name);
        town.place_building(site, kind, name);
        placed += 1;
    }
    placed
}

/// Дома на окраинах: вне площади и первого кольца, не вплотную к другим зданиям и
/// стенам. Возвращает позиции в порядке постройки.
pub(super) fn place_houses(town: &mut TownMapData, rng: &mut WorldRng) -> Vec<Position> {
    let center = town.center_point;
    let exclusion = town.town_size.square_radius() + 1;
    let mut candidates: Vec<Position> = town
        .positions()
        .filter(|&p| {
            p.chebyshev(center) > exclusion
                && p != town.entry_point
                && town.get(p).is_some_and(TownTile::is_open_grass)
        })
        .collect();
    rng.shuffle(&mut candidates);

    let wanted = town.town_size.house_count();
    let mut houses = Vec::with_capacity(wanted);
    for pos in candidates {
        if houses.len() == wanted {
            break;
        }
        if touches_solid(town, pos) {
            continue;
        }
        let name = names::building_name(rng, BuildingType::House, &town.town_name);
        town.place_building(pos, BuildingType::House, name);
        houses.push(pos);
    }
    if houses.len() < wanted {
        log::debug!(
            "'{}' fits only {} of {wanted} houses",
            town.town_name,
            houses.len()
        );
    }
    houses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::TownSize;

    #[test]
    fn test_ring_order_and_size() {
        let cells = ring(Position::new(5, 5), 1);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], Position::new(4, 4));
        assert_eq!(cells[2], Position::new(6, 4));
        assert_eq!(cells[4], Position::new(6, 6));
        assert_eq!(cells[7], Position::new(4, 5));
        assert_eq!(ring(Position::new(5, 5), 3).len(), 24);
    }

    #[test]
    fn test_important_buildings_hug_square() {
        let mut town = TownMapData::new(TownSize::Town, "Ringwick");
        let mut rng = WorldRng::new(11);
        let placed = place_important(&mut town, &mut rng);
        assert_eq!(placed, TownSize::Town.important_buildings().len());
        for (pos, _, _) in town.buildings() {
            assert_eq!(pos.chebyshev(town.center_point), 3);
        }
        // первым ставится храм в левый верхний угол кольца
        assert_eq!(
            town.get(Position::new(5, 5)).and_then(|t| t.building_type),
            Some(BuildingType::Temple)
        );
    }

    #[test]
    fn test_houses_keep_their_distance() {
        for seed in 0..6 {
            let mut town = TownMapData::new(TownSize::Village, "Spacing");
            let mut rng = WorldRng::new(seed);
            place_important(&mut town, &mut rng);
            let houses = place_houses(&mut town, &mut rng);
            assert_eq!(houses.len(), TownSize::Village.house_count());
            for (i, a) in houses.iter().enumerate() {
                assert!(a.chebyshev(town.center_point) > 2);
                for b in &houses[i + 1..] {
                    assert!(a.chebyshev(*b) >= 2, "{a} and {b} touch");
                }
            }
        }
    }
}

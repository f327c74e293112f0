// src/town/decor.rs
//! Поля и декор на свободной траве

use super::{Decoration, TownMapData, TownTile, TownTileType};
use crate::grid::Position;
use crate::names::weighted;
use crate::rng::WorldRng;

const FARM_ATTEMPTS: usize = 50;

const DECORATIONS: &[(Decoration, u32)] = &[
    (Decoration::Tree, 5),
    (Decoration::Bush, 3),
    (Decoration::Flowers, 2),
];

/// Прямоугольники полей 2×2 или 3×2 на сплошной траве. Возвращает число полей.
pub(super) fn stamp_farms(town: &mut TownMapData, rng: &mut WorldRng) -> usize {
    let mut stamped = 0;
    for _ in 0..town.town_size.farm_clusters() {
        for _ in 0..FARM_ATTEMPTS {
            let (w, h) = (rng.range(2, 3), 2);
            let origin = Position::new(
                rng.range(0, town.width - w),
                rng.range(0, town.height - h),
            );
            let cells: Vec<Position> = (0..h)
                .flat_map(|dy| (0..w).map(move |dx| Position::new(origin.x + dx, origin.y + dy)))
                .collect();
            let fits = cells.iter().all(|&p| {
                p != town.entry_point && town.get(p).is_some_and(TownTile::is_open_grass)
            });
            if fits {
                for p in cells {
                    town.set_type(p, TownTileType::FarmField);
                }
                stamped += 1;
                break;
            }
        }
    }
    stamped
}

/// Деревья, кусты и цветы на свободной траве; клетки остаются проходимыми
pub(super) fn scatter_decorations(town: &mut TownMapData, rng: &mut WorldRng, density: f64) -> usize {
    let mut placed = 0;
    for pos in town.positions() {
        let open = pos != town.entry_point && town.get(pos).is_some_and(TownTile::is_open_grass);
        if !open || !rng.chance(density) {
            continue;
        }
        let decoration = weighted(rng, DECORATIONS).copied();
        if let Some(tile) = town.get_mut(pos) {
            tile.set_poi(decoration);
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::town::TownSize;

    #[test]
    fn test_farms_are_walkable_rectangles() {
        let mut town = TownMapData::new(TownSize::Village, "Fields");
        let stamped = stamp_farms(&mut town, &mut WorldRng::new(4));
        assert_eq!(stamped, 3);
        let farm: Vec<&TownTile> = town
            .tiles
            .iter()
            .filter(|t| t.tile_type == TownTileType::FarmField)
            .collect();
        assert!(farm.len() >= 8);
        assert!(farm.iter().all(|t| t.walkable));
    }

    #[test]
    fn test_city_has_no_farms() {
        let mut town = TownMapData::new(TownSize::City, "Capital");
        assert_eq!(stamp_farms(&mut town, &mut WorldRng::new(4)), 0);
    }

    #[test]
    fn test_decorations_stay_walkable() {
        let mut town = TownMapData::new(TownSize::Town, "Green");
        let placed = scatter_decorations(&mut town, &mut WorldRng::new(8), 0.5);
        assert!(placed > 0);
        assert!(
            town.tiles
                .iter()
                .filter(|t| t.poi.is_some())
                .all(|t| t.walkable && t.tile_type == TownTileType::Grass)
        );
    }
}

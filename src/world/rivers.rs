// src/world/rivers.rs
use super::{Route, WorldMap, WorldTile, mark_route};
use crate::config::WorldSettings;
use crate::grid::Position;
use crate::pathfinding::find_path;
use crate::rng::WorldRng;

/// Реки: от случайной горы к ближайшей воде по A*.
///
/// Исток выбирается без повторов. Если путь не нашёлся, река просто пропускается.
/// Возвращает число проложенных рек.
pub(super) fn carve_rivers(map: &mut WorldMap, rng: &mut WorldRng, settings: &WorldSettings) -> usize {
    let wanted = rng.range_pair(settings.rivers);
    let mut sources = map.find(WorldTile::is_mountain);
    let waters = map.find(WorldTile::is_water);
    let mut carved = 0;

    for _ in 0..wanted {
        if sources.is_empty() {
            break;
        }
        let i = rng.range(0, sources.len() as i32 - 1) as usize;
        let source = sources.remove(i);

        let Some(mouth) = nearest(source, &waters) else {
            log::debug!("river from {source}: no water on the map");
            continue;
        };
        let Some(path) = find_path(map, source, mouth) else {
            log::debug!("river from {source} to {mouth}: no path");
            continue;
        };
        let marked = mark_route(map, &path, Route::River);
        log::debug!("river {source} -> {mouth}: {marked} tiles");
        carved += 1;
    }
    carved
}

/// Ближайшая по Манхэттену точка; при равенстве - первая в списке
fn nearest(from: Position, candidates: &[Position]) -> Option<Position> {
    candidates.iter().copied().min_by_key(|&c| from.manhattan(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Biome, Poi};

    #[test]
    fn test_river_flows_to_water() {
        let mut map = WorldMap::new(6, 6, 0);
        for x in 0..6 {
            if let Some(t) = map.get_mut(Position::new(x, 5)) {
                t.biome = Biome::Water;
            }
        }
        if let Some(t) = map.get_mut(Position::new(2, 0)) {
            t.poi = Some(Poi::Mountain);
        }
        let settings = WorldSettings {
            rivers: (1, 1),
            ..WorldSettings::default()
        };
        let mut rng = WorldRng::new(4);
        assert_eq!(carve_rivers(&mut map, &mut rng, &settings), 1);

        let river = map.find(|t| t.has_river);
        assert_eq!(river.len(), 5);
        assert!(river.iter().all(|p| p.x == 2));
        // у истока тупик, вода не помечена
        let source = map.get(Position::new(2, 0)).and_then(|t| t.river_direction);
        assert_eq!(source, Some(crate::pathfinding::ConnectionCode::StartSouth));
        assert!(!map.get(Position::new(2, 5)).is_some_and(|t| t.has_river));
    }

    #[test]
    fn test_nearest_prefers_first_on_tie() {
        let from = Position::new(0, 0);
        let list = [Position::new(2, 0), Position::new(0, 2), Position::new(5, 5)];
        assert_eq!(nearest(from, &list), Some(Position::new(2, 0)));
        assert_eq!(nearest(from, &[]), None);
    }
}

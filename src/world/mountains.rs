// src/world/mountains.rs
use super::{Biome, MountainNamePool, Poi, WorldMap, WorldTile};
use crate::config::WorldSettings;
use crate::names;
use crate::pathfinding::connected_components;
use crate::rng::WorldRng;
use std::collections::HashSet;

/// Слияние физически соседних гор в хребты с одним названием.
///
/// Горы могли появиться на разных этапах (хребты и добор по четвертям) и соприкоснуться.
/// Для каждой компоненты связности название выбирается так:
/// 1. пользовательское, если оно уже есть у какой-то клетки компоненты;
/// 2. следующее из пула пользовательских;
/// 3. уже сгенерированное у какой-то клетки;
/// 4. новое сгенерированное.
///
/// Первая клетка компоненты (при построчном обходе) помечается как начало хребта.
/// Возвращает число хребтов.
pub(super) fn harmonize_names(
    map: &mut WorldMap,
    rng: &mut WorldRng,
    pool: &mut MountainNamePool,
) -> usize {
    let clusters = connected_components(map.width, map.height, |p| {
        map.get(p).is_some_and(WorldTile::is_mountain)
    });
    let mut used: HashSet<String> = HashSet::new();

    for cluster in &clusters {
        let existing: Vec<String> = cluster
            .iter()
            .filter_map(|&p| map.get(p).and_then(|t| t.mountain_name.clone()))
            .collect();

        let name = existing
            .iter()
            .find(|n| pool.is_custom(n))
            .cloned()
            .or_else(|| pool.take())
            .or_else(|| existing.iter().find(|n| !used.contains(*n)).cloned())
            .unwrap_or_else(|| fresh_name(rng, &used));

        for (i, &pos) in cluster.iter().enumerate() {
            if let Some(tile) = map.get_mut(pos) {
                tile.mountain_name = Some(name.clone());
                tile.is_first_mountain_in_range = i == 0;
            }
        }
        if existing.len() < cluster.len() || existing.iter().any(|n| *n != name) {
            log::debug!("mountain range '{name}': merged {} tiles", cluster.len());
        }
        used.insert(name);
    }
    clusters.len()
}

fn fresh_name(rng: &mut WorldRng, used: &HashSet<String>) -> String {
    let mut name = names::mountain_name(rng);
    for _ in 0..10 {
        if !used.contains(&name) {
            break;
        }
        name = names::mountain_name(rng);
    }
    name
}

/// Вход в пещеру у подножия гор: свободная суша рядом с горой, без дорог и рек
pub(super) fn place_cave_entrance(map: &mut WorldMap, rng: &mut WorldRng, settings: &WorldSettings) {
    if !rng.chance(settings.cave_chance) {
        return;
    }
    let view = &*map;
    let candidates: Vec<_> = view
        .positions()
        .filter(|&p| {
            view.get(p).is_some_and(|t| {
                !t.is_claimed()
                    && !t.is_water()
                    && t.biome != Biome::Beach
                    && !t.has_path
                    && !t.has_river
            }) && view
                .neighbors(p)
                .any(|(_, n)| view.get(n).is_some_and(WorldTile::is_mountain))
        })
        .collect();

    if let Some(&pos) = rng.pick(&candidates) {
        if let Some(tile) = map.get_mut(pos) {
            tile.poi = Some(Poi::CaveEntrance);
        }
        log::debug!("cave entrance at {pos}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    fn mountain(map: &mut WorldMap, x: i32, y: i32, name: Option<&str>) {
        if let Some(t) = map.get_mut(Position::new(x, y)) {
            t.poi = Some(Poi::Mountain);
            t.mountain_name = name.map(str::to_string);
        }
    }

    #[test]
    fn test_merged_range_keeps_custom_name() {
        let mut map = WorldMap::new(6, 3, 0);
        mountain(&mut map, 0, 0, Some("Grey Teeth"));
        mountain(&mut map, 1, 0, Some("Grey Teeth"));
        mountain(&mut map, 2, 0, None);
        mountain(&mut map, 3, 0, Some("Ironspine"));
        let mut pool = MountainNamePool::new(&["Ironspine".to_string()]);
        pool.take();
        let mut rng = WorldRng::new(1);

        assert_eq!(harmonize_names(&mut map, &mut rng, &mut pool), 1);
        for x in 0..4 {
            let tile = map.get(Position::new(x, 0)).cloned().unwrap_or_default();
            assert_eq!(tile.mountain_name.as_deref(), Some("Ironspine"));
            assert_eq!(tile.is_first_mountain_in_range, x == 0);
        }
    }

    #[test]
    fn test_unnamed_cluster_takes_next_custom() {
        let mut map = WorldMap::new(6, 3, 0);
        mountain(&mut map, 0, 0, Some("Old Crags"));
        mountain(&mut map, 4, 2, None);
        mountain(&mut map, 5, 2, None);
        let mut pool = MountainNamePool::new(&["Custom Heights".to_string()]);
        let mut rng = WorldRng::new(1);

        assert_eq!(harmonize_names(&mut map, &mut rng, &mut pool), 2);
        let first = map.get(Position::new(0, 0)).and_then(|t| t.mountain_name.clone());
        let second = map.get(Position::new(5, 2)).and_then(|t| t.mountain_name.clone());
        // пул расходуется раньше сгенерированного имени
        assert_eq!(first.as_deref(), Some("Custom Heights"));
        assert_ne!(second, first);
        assert!(second.is_some());
    }

    #[test]
    fn test_cave_next_to_mountain() {
        let mut map = WorldMap::new(5, 5, 0);
        mountain(&mut map, 2, 2, Some("Lonely Peak"));
        let settings = WorldSettings {
            cave_chance: 1.0,
            ..WorldSettings::default()
        };
        let mut rng = WorldRng::new(3);
        place_cave_entrance(&mut map, &mut rng, &settings);
        let caves = map.find(|t| t.poi == Some(Poi::CaveEntrance));
        assert_eq!(caves.len(), 1);
        assert_eq!(caves[0].manhattan(Position::new(2, 2)), 1);
    }
}

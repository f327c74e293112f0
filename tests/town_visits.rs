//! Города и жители: связность, воспроизводимость, путь от мира до NPC

use realmgen::npc::Role;
use realmgen::pathfinding::ConnectionCode;
use realmgen::town::reachable_from_entry;
use realmgen::{
    BuildingType, CustomNames, Direction, TownCache, TownMapData, TownSize, TownTileType,
    enter_town, find_path, find_starting_town, generate_all_towns, generate_town_map,
    generate_world_map, populate_town,
};

fn stranded_houses(town: &TownMapData) -> usize {
    let reached = reachable_from_entry(town);
    town.buildings()
        .into_iter()
        .filter(|(_, kind, _)| *kind == BuildingType::House)
        .filter(|(pos, _, _)| !town.neighbors(*pos).any(|n| reached.contains(&n)))
        .count()
}

#[test]
fn test_every_house_connects_to_entry() {
    let flows = [
        None,
        Some(ConnectionCode::NorthSouth),
        Some(ConnectionCode::EastWest),
        Some(ConnectionCode::NorthEast),
    ];
    for size in TownSize::ALL {
        for (i, entry) in Direction::ALL.into_iter().enumerate() {
            for seed in 0..6u64 {
                let flow = flows[(seed as usize + i) % flows.len()];
                let town = generate_town_map(size, "Linkton", entry, Some(seed), seed % 2 == 1, flow);
                assert_eq!(
                    stranded_houses(&town),
                    0,
                    "{size:?} entry {entry:?} seed {seed} river {}",
                    seed % 2 == 1
                );
            }
        }
    }
}

#[test]
fn test_town_layout_is_reproducible() {
    for size in TownSize::ALL {
        let a = generate_town_map(size, "Echo", Direction::East, Some(77), true, None);
        let b = generate_town_map(size, "Echo", Direction::East, Some(77), true, None);
        assert_eq!(a, b);
        assert_eq!(a.to_ascii(), b.to_ascii());
    }
}

#[test]
fn test_astar_walks_to_every_building_door() {
    let town = generate_town_map(TownSize::Town, "Doorway", Direction::West, Some(12), false, None);
    for (pos, _, _) in town.buildings() {
        let Some(door) = town
            .neighbors(pos)
            .find(|&n| town.get(n).is_some_and(|t| t.walkable))
        else {
            continue;
        };
        let path = find_path(&town, town.entry_point, door).expect("door is on the map");
        assert_eq!(path.last(), Some(&door));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }
}

#[test]
fn test_population_is_reproducible() {
    let town = generate_town_map(TownSize::City, "Twinford", Direction::South, Some(5), true, None);
    let a = populate_town(&town, 42).expect("population");
    let b = populate_town(&town, 42).expect("population");
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.name, y.name);
        assert_eq!(x.role, y.role);
        assert_eq!(x.location, y.location);
    }
}

#[test]
fn test_city_has_rulers_and_guards() {
    let town = generate_town_map(TownSize::City, "Highcrown", Direction::South, Some(8), false, None);
    let npcs = populate_town(&town, 8).expect("population");
    assert!(npcs.iter().filter(|n| n.role == Role::Noble).count() >= 3);
    assert_eq!(npcs.iter().filter(|n| n.role == Role::Guard).count(), 4);
    let staffed: Vec<BuildingType> = npcs.iter().map(|n| n.location.building_type).collect();
    for kind in [BuildingType::Temple, BuildingType::Bank, BuildingType::Guild] {
        assert!(staffed.contains(&kind), "nobody works at the {kind:?}");
    }
}

#[test]
fn test_world_to_town_round_trip() {
    let world = generate_world_map(10, 10, Some(12345), &CustomNames::default()).expect("world");
    let start = find_starting_town(&world).expect("starting town");
    let visit = enter_town(&world, world.seed, start).expect("town");

    let tile = world.get(start).expect("tile");
    assert_eq!(Some(visit.map.town_size), tile.town_size);
    assert_eq!(stranded_houses(&visit.map), 0);
    if tile.has_river {
        assert!(
            visit.map.tiles.iter().any(|t| t.tile_type == TownTileType::Water)
        );
    }

    let json = visit.map.to_json().expect("json");
    assert_eq!(TownMapData::from_json(&json).expect("load"), visit.map);

    let mut cache = TownCache::new();
    let cached = cache.visit(&world, world.seed, start).expect("cached");
    assert_eq!(cached, &visit);
}

#[test]
fn test_all_towns_in_world() {
    let world = generate_world_map(12, 12, Some(314), &CustomNames::default()).expect("world");
    let towns = generate_all_towns(&world, world.seed).expect("towns");
    assert_eq!(towns.len(), world.town_positions().len());
    for (pos, visit) in &towns {
        let tile = world.get(*pos).expect("tile");
        assert_eq!(tile.town_name.as_deref(), Some(visit.map.town_name.as_str()));
        assert!(!visit.npcs.is_empty());
    }
}

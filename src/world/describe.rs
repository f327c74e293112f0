// src/world/describe.rs
//! Короткие текстовые подсказки для сервиса повествования

use super::{Biome, Poi, WorldMap, WorldTile};
use crate::rng::WorldRng;

const PLAINS: &[&str] = &[
    "Rolling grassland dotted with wildflowers",
    "Open meadows where the wind bends the tall grass",
    "Quiet farmland crossed by old stone walls",
    "A wide, empty plain under a pale sky",
];

const WATER: &[&str] = &[
    "Grey waves roll in from the open sea",
    "Deep water, dark and cold",
    "Choppy water glittering in the sun",
];

const LAKE: &[&str] = &[
    "A still lake mirrors the clouds",
    "Reeds crowd the shore of a small lake",
];

const BEACH: &[&str] = &[
    "A strip of pale sand where the tide meets the land",
    "Pebbled shore littered with driftwood",
    "Dunes held together by stubborn grass",
];

const FOREST: &[&str] = &[
    "Dense woodland, the canopy thick overhead",
    "Old oaks and tangled undergrowth",
    "A dim forest full of birdsong",
];

const FOREST_EDGE: &[&str] = &[
    "Scattered trees thicken toward a nearby forest",
    "The edge of the woods, where field gives way to shade",
];

const FOOTHILLS: &[&str] = &[
    "Rocky foothills rising toward the peaks",
    "Broken ground strewn with boulders from the slopes above",
];

const MOUNTAIN: &[&str] = &[
    "Steep slopes of bare rock and loose scree",
    "Windswept heights capped with old snow",
    "Sheer cliffs and narrow goat trails",
];

const CAVE: &[&str] = &[
    "A dark opening in the hillside breathes cold air",
    "A cave mouth half hidden behind fallen rock",
];

const TOWN: &[&str] = &[
    "Smoke rises from the chimneys of",
    "Travelers gather at the gates of",
    "Market bells ring out across",
];

fn line(rng: &mut WorldRng, table: &[&'static str]) -> &'static str {
    rng.pick(table).copied().unwrap_or_default()
}

fn describe(tile: &WorldTile, rng: &mut WorldRng) -> String {
    let mut text = match tile.poi {
        Some(Poi::Town) => {
            let name = tile.town_name.as_deref().unwrap_or("a nameless town");
            format!("{} {name}", line(rng, TOWN))
        }
        Some(Poi::Mountain) => {
            let base = line(rng, MOUNTAIN);
            match &tile.mountain_name {
                Some(name) => format!("{base} of {name}"),
                None => base.to_string(),
            }
        }
        Some(Poi::Forest) => line(rng, FOREST).to_string(),
        Some(Poi::CaveEntrance) => line(rng, CAVE).to_string(),
        None => match tile.biome {
            Biome::Water if tile.is_lake => line(rng, LAKE).to_string(),
            Biome::Water => line(rng, WATER).to_string(),
            Biome::Beach => line(rng, BEACH).to_string(),
            Biome::ForestAdjacent => line(rng, FOREST_EDGE).to_string(),
            Biome::MountainAdjacent => line(rng, FOOTHILLS).to_string(),
            Biome::Plains => line(rng, PLAINS).to_string(),
        },
    };

    if tile.has_river && !tile.is_water() {
        text.push_str("; a river winds through");
    }
    if tile.has_path {
        text.push_str("; a worn road passes by");
    }
    text
}

pub(super) fn write_descriptions(map: &mut WorldMap, rng: &mut WorldRng) {
    for tile in &mut map.tiles {
        tile.description_seed = describe(tile, rng);
    }
}

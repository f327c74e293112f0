pub mod config;
pub mod error;
pub mod grid;
pub mod names;
pub mod npc;
pub mod pathfinding;
pub mod render;
pub mod rng;
pub mod town;
pub mod visit;
pub mod world;

pub use config::{CustomNames, TownSettings, WorldGenerationParams, WorldSettings};
pub use error::{GenError, GenResult};
pub use grid::{CostGrid, Direction, Position};
pub use npc::{Npc, populate_town};
pub use pathfinding::{ConnectionCode, find_path};
pub use rng::WorldRng;
pub use town::{BuildingType, TownMapData, TownSize, TownTileType, generate_town_map};
pub use visit::{TownCache, TownVisit, enter_town, generate_all_towns};
pub use world::{WorldMap, WorldTile, find_starting_town, generate_world, generate_world_map};

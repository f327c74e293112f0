//! Поиск путей и связность на сетке
//!
//! - `astar` - A* с весами местности (реки, дороги, поиск пути игроком)
//! - `direction` - коды соединений клеток пути для отрисовки
//! - `clusters` - компоненты связности (слияние гор в хребты)
//! - `network` - сеть дорог «ближайший сосед» между городами

pub mod astar;
pub mod clusters;
pub mod direction;
pub mod network;

pub use astar::{find_path, path_cost};
pub use clusters::{connected_components, flood_fill};
pub use direction::{ConnectionCode, path_connections};
pub use network::{Road, RoadNetwork, connect_towns};

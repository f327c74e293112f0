// src/pathfinding/direction.rs
//! Коды соединений клеток пути
//!
//! Для каждой клетки пути вычисляется, с какими соседями по сторонам света она соединена,
//! и этот набор сворачивается в один компактный код. Коды нужны только слою отрисовки,
//! чтобы выбрать спрайт прямого участка, поворота, перекрёстка или тупика.

use crate::grid::{Connections, Direction, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionCode {
    NorthSouth,
    EastWest,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Intersection,
    StartNorth,
    StartSouth,
    StartEast,
    StartWest,
    EndNorth,
    EndSouth,
    EndEast,
    EndWest,
}

impl ConnectionCode {
    /// Код по набору соединений. Одиночное соединение трактуется как начало пути.
    #[must_use]
    pub fn from_connections(conns: Connections) -> Option<Self> {
        let n = conns.contains(Direction::North);
        let s = conns.contains(Direction::South);
        let e = conns.contains(Direction::East);
        let w = conns.contains(Direction::West);
        match conns.count() {
            0 => None,
            1 => conns.iter().next().map(Self::start),
            2 => Some(match (n, s, e, w) {
                (true, true, _, _) => Self::NorthSouth,
                (_, _, true, true) => Self::EastWest,
                (true, _, true, _) => Self::NorthEast,
                (true, _, _, true) => Self::NorthWest,
                (_, true, true, _) => Self::SouthEast,
                _ => Self::SouthWest,
            }),
            _ => Some(Self::Intersection),
        }
    }

    #[must_use]
    pub fn start(toward: Direction) -> Self {
        match toward {
            Direction::North => Self::StartNorth,
            Direction::South => Self::StartSouth,
            Direction::East => Self::StartEast,
            Direction::West => Self::StartWest,
        }
    }

    #[must_use]
    pub fn end(from: Direction) -> Self {
        match from {
            Direction::North => Self::EndNorth,
            Direction::South => Self::EndSouth,
            Direction::East => Self::EndEast,
            Direction::West => Self::EndWest,
        }
    }

    /// Преобладающая ось: `Some(true)` - север-юг, `Some(false)` - запад-восток
    #[must_use]
    pub fn vertical_axis(self) -> Option<bool> {
        match self {
            Self::NorthSouth | Self::StartNorth | Self::StartSouth | Self::EndNorth | Self::EndSouth => {
                Some(true)
            }
            Self::EastWest | Self::StartEast | Self::StartWest | Self::EndEast | Self::EndWest => {
                Some(false)
            }
            _ => None,
        }
    }
}

/// Соединения и код для каждой клетки пути, в порядке пути.
///
/// Средние клетки соединяются со всеми соседями, которые тоже принадлежат пути (так
/// петли и касания дают повороты и перекрёстки). Первая и последняя клетки смотрят
/// только на соседа по порядку пути и всегда получают код тупика `START_*`/`END_*`.
#[must_use]
pub fn path_connections(path: &[Position]) -> Vec<(Position, Connections, Option<ConnectionCode>)> {
    let members: HashSet<Position> = path.iter().copied().collect();
    let last = path.len().saturating_sub(1);

    path.iter()
        .enumerate()
        .map(|(i, &pos)| {
            let mut conns = Connections::default();
            if path.len() == 1 {
                return (pos, conns, None);
            }
            if i == 0 || i == last {
                let other = if i == 0 { path[1] } else { path[last - 1] };
                let code = pos.direction_to(other).map(|d| {
                    conns.insert(d);
                    if i == 0 {
                        ConnectionCode::start(d)
                    } else {
                        ConnectionCode::end(d)
                    }
                });
                return (pos, conns, code);
            }
            for (dir, next) in pos.neighbors() {
                if members.contains(&next) {
                    conns.insert(dir);
                }
            }
            (pos, conns, ConnectionCode::from_connections(conns))
        })
        .collect()
}

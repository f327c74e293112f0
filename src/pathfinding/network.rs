// src/pathfinding/network.rs
//! Сеть дорог между городами
//!
//! Каждый город соединяется A*-путём с одним-двумя ближайшими (по Манхэттену) городами.
//! Пары не упорядочены и дедуплицируются, поэтому дорога A-B строится один раз.
//! Минимальность и полная связность не гарантируются, но у каждого города есть хотя бы
//! одна дорога, если на карте есть другой город и путь нашёлся.

use crate::grid::{CostGrid, Position};
use crate::pathfinding::astar::{find_path, path_cost};
use crate::rng::WorldRng;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Road {
    pub from: Position,
    pub to: Position,
    /// Путь вместе с обоими городами
    pub path: Vec<Position>,
}

#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    /// Узлы - города, веса рёбер - стоимость пути по местности
    pub graph: UnGraph<Position, u32>,
    pub roads: Vec<Road>,
}

impl RoadNetwork {
    /// Число отдельных систем дорог (изолированный город - тоже система)
    #[must_use]
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    #[must_use]
    pub fn degree(&self, town: Position) -> usize {
        self.node(town)
            .map_or(0, |node| self.graph.neighbors(node).count())
    }

    fn node(&self, town: Position) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx] == town)
    }
}

pub fn connect_towns<G: CostGrid>(grid: &G, towns: &[Position], rng: &mut WorldRng) -> RoadNetwork {
    let mut network = RoadNetwork::default();
    let nodes: Vec<NodeIndex> = towns.iter().map(|&t| network.graph.add_node(t)).collect();

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let mut seen = HashSet::new();

    for (i, &town) in towns.iter().enumerate() {
        let mut others: Vec<usize> = (0..towns.len()).filter(|&j| j != i).collect();
        if others.is_empty() {
            continue;
        }
        // sort_by_key стабилен: при равном расстоянии раньше идёт город с меньшим индексом
        others.sort_by_key(|&j| town.manhattan(towns[j]));

        let wanted = (rng.range(1, 2) as usize).min(others.len());
        for &j in others.iter().take(wanted) {
            let key = (i.min(j), i.max(j));
            if seen.insert(key) {
                pairs.push(key);
            }
        }
    }

    for (a, b) in pairs {
        let Some(path) = find_path(grid, towns[a], towns[b]) else {
            log::debug!("no road between {} and {}", towns[a], towns[b]);
            continue;
        };
        network
            .graph
            .add_edge(nodes[a], nodes[b], path_cost(grid, &path));
        network.roads.push(Road {
            from: towns[a],
            to: towns[b],
            path,
        });
    }

    log::debug!(
        "road network: {} roads, {} separate systems",
        network.roads.len(),
        network.component_count()
    );
    network
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(i32, i32);

    impl CostGrid for Flat {
        fn width(&self) -> i32 {
            self.0
        }
        fn height(&self) -> i32 {
            self.1
        }
        fn move_cost(&self, _pos: Position) -> u32 {
            1
        }
    }

    #[test]
    fn test_every_town_gets_a_road() {
        let towns = [
            Position::new(0, 0),
            Position::new(9, 9),
            Position::new(0, 9),
            Position::new(5, 4),
        ];
        let mut rng = WorldRng::new(3);
        let network = connect_towns(&Flat(10, 10), &towns, &mut rng);
        for &t in &towns {
            assert!(network.degree(t) >= 1, "town {t} has no road");
        }
    }

    #[test]
    fn test_pairs_are_deduplicated() {
        let towns = [Position::new(0, 0), Position::new(3, 0)];
        let mut rng = WorldRng::new(11);
        let network = connect_towns(&Flat(5, 5), &towns, &mut rng);
        assert_eq!(network.roads.len(), 1);
        assert_eq!(network.component_count(), 1);
        assert_eq!(network.roads[0].path.first(), Some(&Position::new(0, 0)));
        assert_eq!(network.roads[0].path.last(), Some(&Position::new(3, 0)));
    }

    #[test]
    fn test_single_town_has_no_roads() {
        let mut rng = WorldRng::new(1);
        let network = connect_towns(&Flat(5, 5), &[Position::new(2, 2)], &mut rng);
        assert!(network.roads.is_empty());
        assert_eq!(network.component_count(), 1);
    }
}

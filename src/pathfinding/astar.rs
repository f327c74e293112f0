// src/pathfinding/astar.rs
use crate::grid::{CostGrid, Position};

/// A* с 4-связностью и манхэттенской эвристикой.
///
/// Открытое множество - простой список с линейным поиском минимума `f`: на сетках
/// размером 10×10…20×20 это дешевле любой кучи. При равных `f` побеждает узел,
/// добавленный раньше, что делает результат детерминированным.
///
/// Возвращает путь вместе с началом и целью либо `None`, если начало или цель
/// вне сетки.
pub fn find_path<G: CostGrid>(grid: &G, start: Position, goal: Position) -> Option<Vec<Position>> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let width = grid.width() as usize;
    let total = width * grid.height() as usize;
    let idx = |p: Position| p.y as usize * width + p.x as usize;

    let mut g_score = vec![u32::MAX; total];
    let mut came_from: Vec<Option<Position>> = vec![None; total];
    let mut closed = vec![false; total];
    let mut open: Vec<(Position, u32)> = vec![(start, start.manhattan(goal) as u32)];
    g_score[idx(start)] = 0;

    while !open.is_empty() {
        let mut best = 0;
        for (i, &(_, f)) in open.iter().enumerate() {
            if f < open[best].1 {
                best = i;
            }
        }
        let (current, _) = open.remove(best);

        if current == goal {
            return Some(reconstruct(&came_from, idx, current));
        }
        closed[idx(current)] = true;

        for (_, next) in current.neighbors() {
            if !grid.in_bounds(next) || closed[idx(next)] {
                continue;
            }
            let tentative = g_score[idx(current)].saturating_add(grid.move_cost(next));
            if tentative >= g_score[idx(next)] {
                continue;
            }
            came_from[idx(next)] = Some(current);
            g_score[idx(next)] = tentative;
            let f = tentative + next.manhattan(goal) as u32;
            match open.iter_mut().find(|(p, _)| *p == next) {
                Some(entry) => entry.1 = f,
                None => open.push((next, f)),
            }
        }
    }

    None
}

fn reconstruct(
    came_from: &[Option<Position>],
    idx: impl Fn(Position) -> usize,
    goal: Position,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[idx(current)] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Суммарная стоимость прохода по пути (начальная клетка не учитывается)
pub fn path_cost<G: CostGrid>(grid: &G, path: &[Position]) -> u32 {
    path.iter().skip(1).map(|&p| grid.move_cost(p)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestGrid {
        width: i32,
        height: i32,
        costs: Vec<u32>,
    }

    impl TestGrid {
        fn flat(width: i32, height: i32) -> Self {
            Self {
                width,
                height,
                costs: vec![1; (width * height) as usize],
            }
        }

        fn set(&mut self, x: i32, y: i32, cost: u32) {
            self.costs[(y * self.width + x) as usize] = cost;
        }
    }

    impl CostGrid for TestGrid {
        fn width(&self) -> i32 {
            self.width
        }
        fn height(&self) -> i32 {
            self.height
        }
        fn move_cost(&self, pos: Position) -> u32 {
            self.costs[(pos.y * self.width + pos.x) as usize]
        }
    }

    #[test]
    fn test_straight_line() {
        let grid = TestGrid::flat(5, 5);
        let path = find_path(&grid, Position::new(0, 0), Position::new(3, 0));
        assert_eq!(
            path,
            Some(vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0),
            ])
        );
    }

    #[test]
    fn test_path_to_self() {
        let grid = TestGrid::flat(5, 5);
        let p = Position::new(2, 3);
        assert_eq!(find_path(&grid, p, p), Some(vec![p]));
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = TestGrid::flat(5, 5);
        assert!(find_path(&grid, Position::new(-1, 0), Position::new(3, 0)).is_none());
        assert!(find_path(&grid, Position::new(0, 0), Position::new(5, 5)).is_none());
    }

    #[test]
    fn test_avoids_expensive_tiles() {
        let mut grid = TestGrid::flat(5, 5);
        // стена из воды посередине с брешью внизу
        for y in 0..4 {
            grid.set(2, y, 100);
        }
        let path = find_path(&grid, Position::new(0, 0), Position::new(4, 0));
        let path = path.unwrap_or_default();
        assert!(!path.is_empty());
        assert!(path.contains(&Position::new(2, 4)));
        assert_eq!(path_cost(&grid, &path), 12);
    }

    #[test]
    fn test_crosses_water_when_cheaper() {
        let mut grid = TestGrid::flat(3, 1);
        grid.set(1, 0, 100);
        let path = find_path(&grid, Position::new(0, 0), Position::new(2, 0));
        assert_eq!(path.map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_path_is_contiguous() {
        let mut grid = TestGrid::flat(8, 8);
        grid.set(3, 3, 5);
        grid.set(4, 4, 2);
        let path = find_path(&grid, Position::new(0, 7), Position::new(7, 0)).unwrap_or_default();
        assert_eq!(path.len(), 15);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }
}

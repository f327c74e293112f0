// src/pathfinding/clusters.rs
use crate::grid::Position;
use std::collections::VecDeque;

/// BFS от `start` по 4 направлениям через клетки, удовлетворяющие `belongs`.
///
/// Клетки возвращаются в порядке обхода, первой идёт `start`. Пустой результат:
/// если сама `start` не подходит или лежит вне сетки.
pub fn flood_fill(
    width: i32,
    height: i32,
    start: Position,
    belongs: impl Fn(Position) -> bool,
) -> Vec<Position> {
    let mut visited = vec![false; (width.max(0) * height.max(0)) as usize];
    fill_from(width, height, start, &belongs, &mut visited)
}

/// Все максимальные компоненты связности клеток с предикатом `belongs`.
///
/// Компоненты перечисляются в порядке первой клетки при построчном обходе, поэтому
/// результат детерминирован.
pub fn connected_components(
    width: i32,
    height: i32,
    belongs: impl Fn(Position) -> bool,
) -> Vec<Vec<Position>> {
    let mut visited = vec![false; (width.max(0) * height.max(0)) as usize];
    let mut clusters = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let pos = Position::new(x, y);
            if visited[(y * width + x) as usize] || !belongs(pos) {
                continue;
            }
            clusters.push(fill_from(width, height, pos, &belongs, &mut visited));
        }
    }
    clusters
}

fn fill_from(
    width: i32,
    height: i32,
    start: Position,
    belongs: &impl Fn(Position) -> bool,
    visited: &mut [bool],
) -> Vec<Position> {
    let in_bounds = |p: Position| p.x >= 0 && p.y >= 0 && p.x < width && p.y < height;
    let idx = |p: Position| (p.y * width + p.x) as usize;

    if !in_bounds(start) || visited[idx(start)] || !belongs(start) {
        return Vec::new();
    }

    let mut cluster = Vec::new();
    let mut queue = VecDeque::new();
    visited[idx(start)] = true;
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        cluster.push(pos);
        for (_, next) in pos.neighbors() {
            if in_bounds(next) && !visited[idx(next)] && belongs(next) {
                visited[idx(next)] = true;
                queue.push_back(next);
            }
        }
    }
    cluster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> (i32, i32, Vec<bool>) {
        let height = rows.len() as i32;
        let width = rows[0].len() as i32;
        let cells = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| c == '#'))
            .collect();
        (width, height, cells)
    }

    #[test]
    fn test_components_are_four_connected() {
        let (w, h, cells) = grid(&["##..", "#..#", "...#", "#.#."]);
        let clusters = connected_components(w, h, |p| cells[(p.y * w + p.x) as usize]);
        let sizes: Vec<usize> = clusters.iter().map(Vec::len).collect();
        // диагональ (2,3)-(3,2) не соединяет
        assert_eq!(sizes, vec![3, 2, 1, 1]);
    }

    #[test]
    fn test_flood_fill_from_outside_predicate() {
        let (w, h, cells) = grid(&["#.", ".."]);
        assert!(flood_fill(w, h, Position::new(1, 1), |p| cells[(p.y * w + p.x) as usize]).is_empty());
        assert_eq!(
            flood_fill(w, h, Position::new(0, 0), |p| cells[(p.y * w + p.x) as usize]),
            vec![Position::new(0, 0)]
        );
    }

    #[test]
    fn test_component_starts_with_first_row_major_tile() {
        let (w, h, cells) = grid(&["..#", ".##", "..."]);
        let clusters = connected_components(w, h, |p| cells[(p.y * w + p.x) as usize]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0][0], Position::new(2, 0));
    }
}

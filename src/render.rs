// src/render.rs
//! Превью карт: PNG и текст
//!
//! Каждая клетка рисуется квадратом `CELL`×`CELL` пикселей: фон по биому или типу
//! клетки, поверх реки и дороги отрезками к соединённым сторонам, затем маркеры
//! объектов. Текстовое превью - один символ на клетку.

use crate::error::GenResult;
use crate::grid::{Connections, Direction, Position};
use crate::town::{self, Decoration, TownMapData, TownTileType};
use crate::world::{self, Biome, Poi, WorldMap};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

/// Сторона клетки в пикселях
pub const CELL: u32 = 16;

const WATER: Rgba<u8> = Rgba([52, 101, 164, 255]);
const RIVER: Rgba<u8> = Rgba([80, 140, 210, 255]);
const ROAD: Rgba<u8> = Rgba([150, 111, 51, 255]);
const STONE: Rgba<u8> = Rgba([160, 160, 160, 255]);
const GRASS: Rgba<u8> = Rgba([120, 170, 90, 255]);

fn biome_color(biome: Biome) -> Rgba<u8> {
    match biome {
        Biome::Plains => GRASS,
        Biome::Water => WATER,
        Biome::Beach => Rgba([222, 204, 150, 255]),
        Biome::ForestAdjacent => Rgba([100, 150, 80, 255]),
        Biome::MountainAdjacent => Rgba([150, 160, 120, 255]),
    }
}

fn town_tile_color(tile: TownTileType) -> Rgba<u8> {
    match tile {
        TownTileType::Grass => GRASS,
        TownTileType::DirtPath => ROAD,
        TownTileType::StonePath => STONE,
        TownTileType::TownSquare => Rgba([190, 180, 160, 255]),
        TownTileType::Building => Rgba([140, 70, 50, 255]),
        TownTileType::Water => WATER,
        TownTileType::Bridge => Rgba([110, 80, 40, 255]),
        TownTileType::Wall => Rgba([90, 90, 90, 255]),
        TownTileType::KeepWall => Rgba([60, 60, 70, 255]),
        TownTileType::FarmField => Rgba([200, 180, 90, 255]),
    }
}

fn cell_origin(pos: Position) -> (i32, i32) {
    (pos.x * CELL as i32, pos.y * CELL as i32)
}

fn fill_cell(img: &mut RgbaImage, pos: Position, color: Rgba<u8>) {
    let (x, y) = cell_origin(pos);
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(CELL, CELL), color);
}

/// Полосы от центра клетки к каждой соединённой стороне
fn draw_connectors(img: &mut RgbaImage, pos: Position, conns: Connections, thickness: u32, color: Rgba<u8>) {
    let (x, y) = cell_origin(pos);
    let half = (CELL / 2) as i32;
    let t = thickness as i32;
    let (cx, cy) = (x + half - t / 2, y + half - t / 2);
    for dir in conns.iter() {
        let rect = match dir {
            Direction::North => Rect::at(cx, y).of_size(thickness, CELL / 2 + thickness),
            Direction::South => Rect::at(cx, cy).of_size(thickness, CELL / 2 + thickness),
            Direction::West => Rect::at(x, cy).of_size(CELL / 2 + thickness, thickness),
            Direction::East => Rect::at(cx, cy).of_size(CELL / 2 + thickness, thickness),
        };
        draw_filled_rect_mut(img, rect, color);
    }
}

fn center(pos: Position) -> (i32, i32) {
    let (x, y) = cell_origin(pos);
    let half = (CELL / 2) as i32;
    (x + half, y + half)
}

/// Изображение карты мира
#[must_use]
pub fn render_world(map: &WorldMap) -> RgbaImage {
    let mut img = RgbaImage::new(map.width as u32 * CELL, map.height as u32 * CELL);
    for pos in map.positions() {
        let Some(tile) = map.get(pos) else { continue };
        fill_cell(&mut img, pos, biome_color(tile.biome));
        if tile.has_river {
            draw_connectors(&mut img, pos, tile.river_connections, 4, RIVER);
        }
        if tile.has_path {
            draw_connectors(&mut img, pos, tile.path_connections, 2, ROAD);
        }

        let (cx, cy) = center(pos);
        let r = (CELL / 3) as i32;
        match tile.poi {
            Some(Poi::Town) => {
                let color = if tile.is_starting_town {
                    Rgba([240, 200, 40, 255])
                } else {
                    Rgba([200, 40, 40, 255])
                };
                draw_filled_circle_mut(&mut img, (cx, cy), r, color);
            }
            Some(Poi::Forest) => draw_filled_circle_mut(&mut img, (cx, cy), r, Rgba([30, 90, 40, 255])),
            Some(Poi::Mountain) => {
                let (x, y) = cell_origin(pos);
                let base = (y + CELL as i32 - 3) as f32;
                let peak = ((cx) as f32, (y + 2) as f32);
                let grey = Rgba([110, 100, 95, 255]);
                draw_line_segment_mut(&mut img, ((x + 2) as f32, base), peak, grey);
                draw_line_segment_mut(&mut img, peak, ((x + CELL as i32 - 2) as f32, base), grey);
                draw_line_segment_mut(&mut img, ((x + 2) as f32, base), ((x + CELL as i32 - 2) as f32, base), grey);
            }
            Some(Poi::CaveEntrance) => draw_filled_circle_mut(&mut img, (cx, cy), r / 2 + 1, Rgba([20, 20, 20, 255])),
            None => {}
        }
    }
    img
}

/// Изображение карты города
#[must_use]
pub fn render_town(map: &TownMapData) -> RgbaImage {
    let mut img = RgbaImage::new(map.width as u32 * CELL, map.height as u32 * CELL);
    for pos in map.positions() {
        let Some(tile) = map.get(pos) else { continue };
        fill_cell(&mut img, pos, town_tile_color(tile.tile_type));

        let (cx, cy) = center(pos);
        let r = (CELL / 4) as i32;
        let marker = match tile.poi {
            Some(Decoration::Tree) => Some(Rgba([30, 90, 40, 255])),
            Some(Decoration::Bush) => Some(Rgba([70, 130, 60, 255])),
            Some(Decoration::Flowers) => Some(Rgba([220, 120, 180, 255])),
            Some(Decoration::Well | Decoration::Fountain) => Some(RIVER),
            None => None,
        };
        if let Some(color) = marker {
            draw_filled_circle_mut(&mut img, (cx, cy), r, color);
        }
        if tile.is_entry {
            let (x, y) = cell_origin(pos);
            let gold = Rgba([240, 200, 40, 255]);
            draw_line_segment_mut(&mut img, (x as f32, y as f32), ((x + CELL as i32 - 1) as f32, (y + CELL as i32 - 1) as f32), gold);
            draw_line_segment_mut(&mut img, ((x + CELL as i32 - 1) as f32, y as f32), (x as f32, (y + CELL as i32 - 1) as f32), gold);
        }
    }
    img
}

impl WorldMap {
    pub fn save_as_png(&self, path: &str) -> GenResult<()> {
        render_world(self).save(path)?;
        Ok(())
    }

    /// Текстовое превью, по строке на ряд клеток
    #[must_use]
    pub fn to_ascii(&self) -> String {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .filter_map(|x| self.get(Position::new(x, y)).map(world::glyph))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TownMapData {
    pub fn save_as_png(&self, path: &str) -> GenResult<()> {
        render_town(self).save(path)?;
        Ok(())
    }

    #[must_use]
    pub fn to_ascii(&self) -> String {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .filter_map(|x| self.get(Position::new(x, y)).map(town::glyph))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomNames;
    use crate::town::{TownSize, generate_town_map};
    use crate::world::generate_world_map;

    #[test]
    fn test_world_image_size_and_water() {
        let map = generate_world_map(10, 10, Some(42), &CustomNames::default())
            .unwrap_or_else(|e| panic!("{e}"));
        let img = render_world(&map);
        assert_eq!(img.dimensions(), (10 * CELL, 10 * CELL));

        let water = map
            .positions()
            .find(|&p| map.get(p).is_some_and(|t| t.is_water() && !t.has_river));
        if let Some(pos) = water {
            let (x, y) = cell_origin(pos);
            assert_eq!(*img.get_pixel(x as u32, y as u32), WATER);
        }
    }

    #[test]
    fn test_world_ascii_shape() {
        let map = generate_world_map(8, 6, Some(1), &CustomNames::default())
            .unwrap_or_else(|e| panic!("{e}"));
        let text = map.to_ascii();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.chars().count() == 8));
        assert_eq!(text.matches('@').count(), 1);
    }

    #[test]
    fn test_town_ascii_marks_entry() {
        let map = generate_town_map(TownSize::Hamlet, "Ascii", Direction::South, Some(3), false, None);
        let text = map.to_ascii();
        assert_eq!(text.lines().count(), 8);
        assert_eq!(text.lines().last().and_then(|row| row.chars().nth(4)), Some('E'));
        assert_eq!(render_town(&map).dimensions(), (8 * CELL, 8 * CELL));
    }
}

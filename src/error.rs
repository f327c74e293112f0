// src/error.rs
//! Ошибки генерации
//!
//! Мягкие пробелы (не нашлось свободной клетки, река не проложилась) ошибками не считаются
//! и сюда не попадают: генераторы просто пропускают такой шаг.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    /// Сид (или производный сид) не является конечным числом
    #[error("Invalid seed: {0}")]
    InvalidSeed(f64),

    #[error("Invalid world dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Could not place a single town on the map")]
    NoTownSite,

    /// Нарушен инвариант генерации: на карте нет ни одного города
    #[error("No towns found in world map")]
    NoTownsFound,

    #[error("Tile ({x}, {y}) is not a town")]
    NotATown { x: i32, y: i32 },

    #[error("Tile ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },

    /// Число клеток в сохранении не совпадает с размерами карты
    #[error("Save data has {found} tiles, expected {expected}")]
    TileCountMismatch { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to (de)serialize save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type GenResult<T> = Result<T, GenError>;

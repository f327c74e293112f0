// src/config.rs
//! Конфигурация генерации мира
//!
//! Этот модуль определяет параметры, управляющие процедурной генерацией:
//! - Размер карты мира и сид
//! - Пользовательские имена городов и горных хребтов
//! - Количества и размеры объектов на карте мира
//! - Плотность декора и доля прямых дорог в городах
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::error::GenResult;
use serde::{Deserialize, Serialize};
use std::fs;

/// Пользовательские имена, расходуемые от самых важных объектов к менее важным
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCustomNames")]
pub struct CustomNames {
    /// Имена городов (первое получает столица, дальше по убыванию размера)
    pub towns: Vec<String>,
    /// Имена горных хребтов
    pub mountains: Vec<String>,
}

/// Входной формат: старые сохранения хранят просто массив имён городов
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawCustomNames {
    Legacy(Vec<String>),
    Structured {
        #[serde(default)]
        towns: Vec<String>,
        #[serde(default)]
        mountains: Vec<String>,
    },
}

impl From<RawCustomNames> for CustomNames {
    fn from(raw: RawCustomNames) -> Self {
        match raw {
            RawCustomNames::Legacy(towns) => Self {
                towns,
                mountains: Vec::new(),
            },
            RawCustomNames::Structured { towns, mountains } => Self { towns, mountains },
        }
    }
}

impl CustomNames {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.towns.is_empty() && self.mountains.is_empty()
    }
}

/// Настройки карты мира
///
/// Диапазоны задаются как `[min, max]` включительно.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSettings {
    /// Глубина прибрежной полосы (вода + пляж)
    #[serde(default = "default_coast_depth")]
    pub coast_depth: (u32, u32),

    /// Количество озёр из одной клетки
    #[serde(default = "default_lakes")]
    pub lakes: (u32, u32),

    #[serde(default = "default_forest_clusters")]
    pub forest_clusters: (u32, u32),

    /// Желаемый размер лесного массива (фактический может быть меньше)
    #[serde(default = "default_forest_size")]
    pub forest_size: (u32, u32),

    #[serde(default = "default_mountain_ranges")]
    pub mountain_ranges: (u32, u32),

    #[serde(default = "default_mountain_size")]
    pub mountain_size: (u32, u32),

    #[serde(default = "default_rivers")]
    pub rivers: (u32, u32),

    #[serde(default = "default_towns")]
    pub towns: (u32, u32),

    /// Минимальное манхэттенское расстояние между городами
    #[serde(default = "default_min_town_distance")]
    pub min_town_distance: i32,

    /// Минимум объектов в каждой четверти карты
    #[serde(default = "default_min_pois_per_quadrant")]
    pub min_pois_per_quadrant: usize,

    /// Вероятность появления входа в пещеру у подножия гор
    #[serde(default = "default_cave_chance")]
    pub cave_chance: f64,
}

fn default_coast_depth() -> (u32, u32) {
    (2, 3)
}
fn default_lakes() -> (u32, u32) {
    (1, 2)
}
fn default_forest_clusters() -> (u32, u32) {
    (3, 5)
}
fn default_forest_size() -> (u32, u32) {
    (2, 4)
}
fn default_mountain_ranges() -> (u32, u32) {
    (2, 4)
}
fn default_mountain_size() -> (u32, u32) {
    (2, 3)
}
fn default_rivers() -> (u32, u32) {
    (1, 2)
}
fn default_towns() -> (u32, u32) {
    (2, 4)
}
fn default_min_town_distance() -> i32 {
    3
}
fn default_min_pois_per_quadrant() -> usize {
    3
}
fn default_cave_chance() -> f64 {
    0.5
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            coast_depth: default_coast_depth(),
            lakes: default_lakes(),
            forest_clusters: default_forest_clusters(),
            forest_size: default_forest_size(),
            mountain_ranges: default_mountain_ranges(),
            mountain_size: default_mountain_size(),
            rivers: default_rivers(),
            towns: default_towns(),
            min_town_distance: default_min_town_distance(),
            min_pois_per_quadrant: default_min_pois_per_quadrant(),
            cave_chance: default_cave_chance(),
        }
    }
}

/// Настройки внутренней карты города
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TownSettings {
    /// Вероятность декора (дерево/куст/цветы) на свободной клетке травы
    #[serde(default = "default_decoration_density")]
    pub decoration_density: f64,

    /// Доля домов, которые соединяются прямо с ближайшей дорогой
    #[serde(default = "default_direct_road_share")]
    pub direct_road_share: f64,
}

fn default_decoration_density() -> f64 {
    0.08
}
fn default_direct_road_share() -> f64 {
    0.3
}

impl Default for TownSettings {
    fn default() -> Self {
        Self {
            decoration_density: default_decoration_density(),
            direct_road_share: default_direct_road_share(),
        }
    }
}

/// Основные параметры генерации мира
///
/// Полная конфигурация для генерации одного мира. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGenerationParams {
    /// Сид генератора (`None` - недетерминированный запуск)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Ширина карты мира в клетках (по умолчанию 10)
    #[serde(default = "default_width")]
    pub width: i32,

    /// Высота карты мира в клетках (по умолчанию 10)
    #[serde(default = "default_height")]
    pub height: i32,

    #[serde(default)]
    pub custom_names: CustomNames,

    #[serde(default)]
    pub world: WorldSettings,

    #[serde(default)]
    pub town: TownSettings,
}

impl WorldGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = 42
    /// width = 12
    /// height = 12
    ///
    /// [custom_names]
    /// towns = ["Eldermere", "Brackwater"]
    /// mountains = ["The Greyspine"]
    /// ```
    pub fn from_toml_file(path: &str) -> GenResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> GenResult<Self> {
        let params: Self = toml::from_str(contents)?;
        Ok(params)
    }
}

fn default_width() -> i32 {
    10
}
fn default_height() -> i32 {
    10
}

impl Default for WorldGenerationParams {
    fn default() -> Self {
        Self {
            seed: None,
            width: default_width(),
            height: default_height(),
            custom_names: CustomNames::default(),
            world: WorldSettings::default(),
            town: TownSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let params = WorldGenerationParams::from_toml_str("").ok();
        let params = params.as_ref();
        assert_eq!(params.map(|p| p.width), Some(10));
        assert_eq!(params.map(|p| p.world.towns), Some((2, 4)));
        assert_eq!(params.and_then(|p| p.seed), None);
    }

    #[test]
    fn test_partial_world_settings() {
        let toml = r#"
            seed = 7
            width = 12

            [world]
            towns = [3, 3]
            cave_chance = 0.0
        "#;
        let params = WorldGenerationParams::from_toml_str(toml).ok();
        let params = params.as_ref();
        assert_eq!(params.and_then(|p| p.seed), Some(7));
        assert_eq!(params.map(|p| p.height), Some(10));
        assert_eq!(params.map(|p| p.world.towns), Some((3, 3)));
        assert_eq!(params.map(|p| p.world.lakes), Some((1, 2)));
    }

    #[test]
    fn test_custom_names_structured() {
        let names: CustomNames =
            serde_json::from_str(r#"{"towns":["A","B"],"mountains":["Peak"]}"#)
                .unwrap_or_default();
        assert_eq!(names.towns, vec!["A", "B"]);
        assert_eq!(names.mountains, vec!["Peak"]);
    }

    #[test]
    fn test_custom_names_legacy_array() {
        let names: CustomNames =
            serde_json::from_str(r#"["Oldtown","Newtown"]"#).unwrap_or_default();
        assert_eq!(names.towns, vec!["Oldtown", "Newtown"]);
        assert!(names.mountains.is_empty());
    }

    #[test]
    fn test_custom_names_empty_object() {
        let names: CustomNames = serde_json::from_str("{}").unwrap_or_default();
        assert!(names.is_empty());
    }
}

// src/world/mod.rs
//! Карта мира
//!
//! Генерация - упорядоченный конвейер над одной изменяемой сеткой. Каждый этап пишет
//! только в ещё не занятые клетки (клетка занята, если на ней уже есть объект `Poi`):
//!
//! 1. Побережье вдоль одного края карты (вода + пляж)
//! 2. Озёра из одной клетки вдали от берега
//! 3. Лесные массивы
//! 4. Горные хребты (вытянутые цепочки)
//! 5. Реки от гор к ближайшей воде (A*)
//! 6. Города с минимальным расстоянием друг от друга
//! 7. Выравнивание плотности объектов по четвертям карты
//! 8. Стартовый город, размеры и названия городов
//! 9. Дороги «ближайший сосед» между городами
//! 10. Слияние соседних гор в именованные хребты
//!
//! Затем - вход в пещеру, производные биомы и текстовые подсказки для описаний.

mod describe;
mod mountains;
mod rivers;
mod terrain;
mod towns;

use crate::config::{CustomNames, WorldGenerationParams, WorldSettings};
use crate::error::{GenError, GenResult};
use crate::grid::{Connections, CostGrid, Direction, Position};
use crate::pathfinding::{ConnectionCode, path_connections};
use crate::rng::WorldRng;
use crate::town::TownSize;
use serde::{Deserialize, Serialize};

/// Базовая классификация местности клетки мира
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Biome {
    #[default]
    Plains,
    Water,
    Beach,
    ForestAdjacent,
    MountainAdjacent,
}

/// Объект поверх биома
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Poi {
    Forest,
    Mountain,
    Town,
    CaveEntrance,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldTile {
    pub biome: Biome,
    pub poi: Option<Poi>,
    pub description_seed: String,
    /// Меняется игрой, генерация всегда оставляет `false`
    pub is_explored: bool,

    pub town_name: Option<String>,
    pub town_size: Option<TownSize>,
    pub is_starting_town: bool,

    pub mountain_name: Option<String>,
    pub is_first_mountain_in_range: bool,

    pub has_river: bool,
    pub river_connections: Connections,
    pub river_direction: Option<ConnectionCode>,

    pub has_path: bool,
    pub path_connections: Connections,
    pub path_direction: Option<ConnectionCode>,

    /// Сторона, с которой к пляжу примыкает вода
    pub beach_direction: Option<Direction>,
    pub is_lake: bool,
}

impl WorldTile {
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.poi.is_some()
    }

    #[must_use]
    pub fn is_water(&self) -> bool {
        self.biome == Biome::Water
    }

    #[must_use]
    pub fn is_mountain(&self) -> bool {
        self.poi == Some(Poi::Mountain)
    }

    /// Стоимость входа в клетку для A*
    #[must_use]
    pub fn move_cost(&self) -> u32 {
        if self.is_water() {
            return 100;
        }
        match self.poi {
            Some(Poi::Mountain) => 5,
            Some(Poi::Forest) => 2,
            _ if self.biome == Biome::Beach => 5,
            _ => 1,
        }
    }
}

/// Прямоугольная карта мира, клетки хранятся построчно (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMap {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
    pub tiles: Vec<WorldTile>,
}

impl WorldMap {
    #[must_use]
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            tiles: vec![WorldTile::default(); (width.max(0) * height.max(0)) as usize],
        }
    }

    #[inline]
    fn idx(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&WorldTile> {
        if self.in_bounds(pos) {
            self.tiles.get(self.idx(pos))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut WorldTile> {
        if self.in_bounds(pos) {
            let idx = self.idx(pos);
            self.tiles.get_mut(idx)
        } else {
            None
        }
    }

    /// Все координаты построчно
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }

    /// Координаты клеток, для которых выполняется условие
    pub fn find(&self, pred: impl Fn(&WorldTile) -> bool) -> Vec<Position> {
        self.positions()
            .filter(|&p| self.get(p).is_some_and(&pred))
            .collect()
    }

    #[must_use]
    pub fn town_positions(&self) -> Vec<Position> {
        self.find(|t| t.poi == Some(Poi::Town))
    }

    /// Соседи по 4 направлениям, лежащие внутри карты
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Direction, Position)> + '_ {
        pos.neighbors().filter(|&(_, p)| self.in_bounds(p))
    }

    pub fn to_json(&self) -> GenResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Загрузка сохранения. Размеры должны быть положительными, а клеток ровно
    /// `width * height`.
    pub fn from_json(json: &str) -> GenResult<Self> {
        let map: Self = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    fn validate(&self) -> GenResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GenError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width as usize * self.height as usize;
        if self.tiles.len() != expected {
            return Err(GenError::TileCountMismatch {
                expected,
                found: self.tiles.len(),
            });
        }
        Ok(())
    }
}

impl CostGrid for WorldMap {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn move_cost(&self, pos: Position) -> u32 {
        self.get(pos).map_or(u32::MAX / 4, WorldTile::move_cost)
    }
}

/// Что прокладывается по пути
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// Река помечает всё, кроме воды, в которую впадает
    River,
    /// Дорога никогда не ложится на клетку с объектом
    Road,
}

/// Записывает соединения пути в клетки. Если клетка уже лежала на другой реке или
/// дороге, наборы соединений объединяются и код пересчитывается (поворот, перекрёсток).
pub(crate) fn mark_route(map: &mut WorldMap, path: &[Position], route: Route) -> usize {
    let mut marked = 0;
    for (pos, conns, code) in path_connections(path) {
        let Some(tile) = map.get_mut(pos) else {
            continue;
        };
        let skip = match route {
            Route::River => tile.is_water(),
            Route::Road => tile.is_claimed(),
        };
        if skip {
            continue;
        }
        let (flag, existing, direction) = match route {
            Route::River => (
                &mut tile.has_river,
                &mut tile.river_connections,
                &mut tile.river_direction,
            ),
            Route::Road => (
                &mut tile.has_path,
                &mut tile.path_connections,
                &mut tile.path_direction,
            ),
        };
        if *flag {
            existing.union(conns);
            *direction = ConnectionCode::from_connections(*existing);
        } else {
            *flag = true;
            *existing = conns;
            *direction = code;
        }
        marked += 1;
    }
    marked
}

/// Пул пользовательских названий гор, расходуемый по порядку
#[derive(Debug, Default)]
pub(crate) struct MountainNamePool {
    custom: Vec<String>,
    next: usize,
}

impl MountainNamePool {
    fn new(custom: &[String]) -> Self {
        Self {
            custom: custom.to_vec(),
            next: 0,
        }
    }

    fn take(&mut self) -> Option<String> {
        let name = self.custom.get(self.next).cloned();
        if name.is_some() {
            self.next += 1;
        }
        name
    }

    fn is_custom(&self, name: &str) -> bool {
        self.custom.iter().any(|c| c == name)
    }
}

/// Генерация карты мира с настройками по умолчанию
pub fn generate_world_map(
    width: i32,
    height: i32,
    seed: Option<u64>,
    custom_names: &CustomNames,
) -> GenResult<WorldMap> {
    generate_world_map_with(width, height, seed, custom_names, &WorldSettings::default())
}

/// Генерация по полной конфигурации (TOML)
pub fn generate_world(params: &WorldGenerationParams) -> GenResult<WorldMap> {
    generate_world_map_with(
        params.width,
        params.height,
        params.seed,
        &params.custom_names,
        &params.world,
    )
}

pub fn generate_world_map_with(
    width: i32,
    height: i32,
    seed: Option<u64>,
    custom_names: &CustomNames,
    settings: &WorldSettings,
) -> GenResult<WorldMap> {
    if !(4..=64).contains(&width) || !(4..=64).contains(&height) {
        return Err(GenError::InvalidDimensions { width, height });
    }

    let mut rng = WorldRng::from_optional(seed);
    let mut map = WorldMap::new(width, height, rng.seed());
    let mut mountain_names = MountainNamePool::new(&custom_names.mountains);

    terrain::carve_coast(&mut map, &mut rng, settings);
    terrain::place_lakes(&mut map, &mut rng, settings);
    terrain::grow_forests(&mut map, &mut rng, settings);
    terrain::grow_mountain_ranges(&mut map, &mut rng, settings, &mut mountain_names);
    let rivers = rivers::carve_rivers(&mut map, &mut rng, settings);
    let town_sites = towns::place_towns(&mut map, &mut rng, settings)?;
    terrain::balance_quadrants(&mut map, &mut rng, settings);
    towns::assign_identities(&mut map, &mut rng, &town_sites, &custom_names.towns);
    let network = towns::build_roads(&mut map, &mut rng, &town_sites);
    let ranges = mountains::harmonize_names(&mut map, &mut rng, &mut mountain_names);
    mountains::place_cave_entrance(&mut map, &mut rng, settings);
    terrain::derive_biomes(&mut map);
    describe::write_descriptions(&mut map, &mut rng);

    log::info!(
        "world {}x{} (seed {}): {} towns, {} mountain ranges, {} rivers, {} roads",
        width,
        height,
        map.seed,
        town_sites.len(),
        ranges,
        rivers,
        network.roads.len()
    );
    Ok(map)
}

/// Позиция стартового города.
///
/// Если флаг стартового города потерян (например, старое сохранение), возвращается
/// первый город. Отсутствие городов - нарушение инвариантов генерации.
pub fn find_starting_town(map: &WorldMap) -> GenResult<Position> {
    map.positions()
        .find(|&p| map.get(p).is_some_and(|t| t.is_starting_town && t.poi == Some(Poi::Town)))
        .or_else(|| map.town_positions().first().copied())
        .ok_or(GenError::NoTownsFound)
}

/// ASCII-превью: один символ на клетку
#[must_use]
pub fn glyph(tile: &WorldTile) -> char {
    match tile.poi {
        Some(Poi::Town) if tile.is_starting_town => '@',
        Some(Poi::Town) => 'T',
        Some(Poi::Mountain) => '^',
        Some(Poi::Forest) => '*',
        Some(Poi::CaveEntrance) => 'O',
        None if tile.is_water() => '~',
        None if tile.has_river => '=',
        None if tile.has_path => '+',
        None if tile.biome == Biome::Beach => ':',
        None => '.',
    }
}

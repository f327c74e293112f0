// src/town/mod.rs
//! Внутренняя карта города
//!
//! По размеру города, стороне входа и признаку реки строится сетка 8×8…20×20:
//! река (до всего остального, чтобы дороги могли перекинуть через неё мост), главная
//! дорога от входа к центру, площадь с колодцем или фонтаном, стены и замок для
//! столиц, важные здания по кольцу вокруг площади, жилые дома, тропинки от домов к
//! дорогам, поля и декор.
//!
//! Все этапы размещения работают по принципу «как получится»: если свободной клетки
//! нет, элемент пропускается. Генерация города не падает.

mod buildings;
mod decor;
mod layout;
mod paths;

pub use paths::reachable_from_entry;

use crate::config::TownSettings;
use crate::error::{GenError, GenResult};
use crate::grid::{CostGrid, Direction, Position};
use crate::pathfinding::ConnectionCode;
use crate::rng::WorldRng;
use serde::{Deserialize, Serialize};

/// Размер поселения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TownSize {
    Hamlet,
    Village,
    Town,
    City,
}

impl TownSize {
    pub const ALL: [TownSize; 4] = [
        TownSize::Hamlet,
        TownSize::Village,
        TownSize::Town,
        TownSize::City,
    ];

    /// Сторона квадратной сетки города
    #[must_use]
    pub fn grid_size(self) -> i32 {
        match self {
            TownSize::Hamlet => 8,
            TownSize::Village => 12,
            TownSize::Town => 16,
            TownSize::City => 20,
        }
    }

    #[must_use]
    pub fn square_radius(self) -> i32 {
        match self {
            TownSize::Hamlet | TownSize::Village => 1,
            TownSize::Town => 2,
            TownSize::City => 3,
        }
    }

    #[must_use]
    pub fn road_width(self) -> i32 {
        match self {
            TownSize::Hamlet | TownSize::Village => 1,
            TownSize::Town => 2,
            TownSize::City => 3,
        }
    }

    #[must_use]
    pub fn road_surface(self) -> TownTileType {
        match self {
            TownSize::Hamlet | TownSize::Village => TownTileType::DirtPath,
            TownSize::Town | TownSize::City => TownTileType::StonePath,
        }
    }

    #[must_use]
    pub fn house_count(self) -> usize {
        match self {
            TownSize::Hamlet => 4,
            TownSize::Village => 8,
            TownSize::Town => 14,
            TownSize::City => 22,
        }
    }

    /// Количество прямоугольников полей
    #[must_use]
    pub fn farm_clusters(self) -> usize {
        match self {
            TownSize::Hamlet => 2,
            TownSize::Village => 3,
            TownSize::Town => 2,
            TownSize::City => 0,
        }
    }

    #[must_use]
    pub fn supports_farming(self) -> bool {
        self != TownSize::City
    }

    /// Важные здания в порядке размещения вокруг площади
    #[must_use]
    pub fn important_buildings(self) -> Vec<BuildingType> {
        use BuildingType::{Bank, Barn, Blacksmith, Guild, Inn, Manor, Market, Shop, Tavern, Temple};
        match self {
            TownSize::Hamlet => vec![Barn],
            TownSize::Village => vec![Inn, Shop, Temple, Barn],
            TownSize::Town => vec![
                Temple, Market, Manor, Inn, Tavern, Blacksmith, Shop, Guild, Bank,
            ],
            TownSize::City => vec![
                Temple, Market, Manor, Blacksmith, Tavern, Tavern, Tavern, Guild, Guild, Guild,
                Bank, Bank, Bank, Inn, Shop, Shop,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TownTileType {
    Grass,
    DirtPath,
    StonePath,
    TownSquare,
    Building,
    Water,
    Bridge,
    Wall,
    KeepWall,
    FarmField,
}

impl TownTileType {
    #[must_use]
    pub fn is_walkable(self) -> bool {
        !matches!(
            self,
            TownTileType::Building | TownTileType::Water | TownTileType::Wall | TownTileType::KeepWall
        )
    }

    /// Дороги, площадь и мосты - часть дорожной сети
    #[must_use]
    pub fn is_road(self) -> bool {
        matches!(
            self,
            TownTileType::DirtPath
                | TownTileType::StonePath
                | TownTileType::TownSquare
                | TownTileType::Bridge
        )
    }

    /// Клетки, сквозь которые нельзя проложить тропинку
    #[must_use]
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            TownTileType::Building | TownTileType::Wall | TownTileType::KeepWall
        )
    }
}

/// Декор на клетке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    Tree,
    Bush,
    Flowers,
    Well,
    Fountain,
}

impl Decoration {
    /// Колодец и фонтан стоят на пути; растения можно обойти насквозь
    #[must_use]
    pub fn blocks_movement(self) -> bool {
        matches!(self, Self::Well | Self::Fountain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    House,
    Inn,
    Shop,
    Temple,
    Tavern,
    Guild,
    Market,
    Bank,
    Blacksmith,
    Manor,
    Keep,
    Barn,
}

impl BuildingType {
    pub const ALL: [BuildingType; 12] = [
        BuildingType::House,
        BuildingType::Inn,
        BuildingType::Shop,
        BuildingType::Temple,
        BuildingType::Tavern,
        BuildingType::Guild,
        BuildingType::Market,
        BuildingType::Bank,
        BuildingType::Blacksmith,
        BuildingType::Manor,
        BuildingType::Keep,
        BuildingType::Barn,
    ];

    /// Жилые здания: в них селятся семьи
    #[must_use]
    pub fn is_residential(self) -> bool {
        matches!(
            self,
            BuildingType::House | BuildingType::Manor | BuildingType::Keep
        )
    }

    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            BuildingType::House => 'h',
            BuildingType::Inn => 'I',
            BuildingType::Shop => 'S',
            BuildingType::Temple => 'T',
            BuildingType::Tavern => 'V',
            BuildingType::Guild => 'G',
            BuildingType::Market => 'M',
            BuildingType::Bank => 'B',
            BuildingType::Blacksmith => 'F',
            BuildingType::Manor => 'N',
            BuildingType::Keep => 'K',
            BuildingType::Barn => 'b',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownTile {
    #[serde(rename = "type")]
    pub tile_type: TownTileType,
    pub poi: Option<Decoration>,
    /// Выводится из типа клетки и декора, меняется через `set_type`/`set_poi`
    pub walkable: bool,
    pub is_explored: bool,
    pub is_entry: bool,
    pub building_type: Option<BuildingType>,
    pub building_name: Option<String>,
}

impl TownTile {
    #[must_use]
    pub fn new(tile_type: TownTileType) -> Self {
        Self {
            tile_type,
            poi: None,
            walkable: tile_type.is_walkable(),
            is_explored: false,
            is_entry: false,
            building_type: None,
            building_name: None,
        }
    }

    /// Меняет тип клетки, проходимость следует за типом
    pub fn set_type(&mut self, tile_type: TownTileType) {
        self.tile_type = tile_type;
        self.refresh_walkable();
    }

    pub fn set_poi(&mut self, poi: Option<Decoration>) {
        self.poi = poi;
        self.refresh_walkable();
    }

    fn refresh_walkable(&mut self) {
        self.walkable =
            self.tile_type.is_walkable() && !self.poi.is_some_and(Decoration::blocks_movement);
    }

    /// Свободная трава без декора - сюда можно что-то поставить
    #[must_use]
    pub fn is_open_grass(&self) -> bool {
        self.tile_type == TownTileType::Grass && self.poi.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownMapData {
    pub width: i32,
    pub height: i32,
    pub town_name: String,
    pub town_size: TownSize,
    pub entry_point: Position,
    pub center_point: Position,
    /// Клетки построчно (`y * width + x`)
    pub tiles: Vec<TownTile>,
}

impl TownMapData {
    #[must_use]
    pub fn new(town_size: TownSize, town_name: &str) -> Self {
        let side = town_size.grid_size();
        Self {
            width: side,
            height: side,
            town_name: town_name.to_string(),
            town_size,
            entry_point: Position::new(side / 2, side - 1),
            center_point: Position::new(side / 2, side / 2),
            tiles: vec![TownTile::new(TownTileType::Grass); (side * side) as usize],
        }
    }

    #[inline]
    fn idx(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&TownTile> {
        if self.in_bounds(pos) {
            self.tiles.get(self.idx(pos))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut TownTile> {
        if self.in_bounds(pos) {
            let idx = self.idx(pos);
            self.tiles.get_mut(idx)
        } else {
            None
        }
    }

    pub fn set_type(&mut self, pos: Position, tile_type: TownTileType) {
        if let Some(tile) = self.get_mut(pos) {
            tile.set_type(tile_type);
        }
    }

    #[must_use]
    pub fn tile_type(&self, pos: Position) -> Option<TownTileType> {
        self.get(pos).map(|t| t.tile_type)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }

    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors()
            .map(|(_, p)| p)
            .filter(|&p| self.in_bounds(p))
    }

    /// Все здания построчно: позиция, тип, название
    #[must_use]
    pub fn buildings(&self) -> Vec<(Position, BuildingType, String)> {
        self.positions()
            .filter_map(|p| {
                let tile = self.get(p)?;
                let kind = tile.building_type?;
                Some((p, kind, tile.building_name.clone().unwrap_or_default()))
            })
            .collect()
    }

    /// Ставит здание на клетку
    pub(crate) fn place_building(&mut self, pos: Position, kind: BuildingType, name: String) {
        if let Some(tile) = self.get_mut(pos) {
            tile.set_type(TownTileType::Building);
            tile.set_poi(None);
            tile.building_type = Some(kind);
            tile.building_name = Some(name);
        }
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

impl CostGrid for TownMapData {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn move_cost(&self, pos: Position) -> u32 {
        match self.tile_type(pos) {
            Some(t) if t.is_road() => 1,
            Some(TownTileType::Grass | TownTileType::FarmField) => 2,
            _ => 100,
        }
    }
}

/// Символ клетки для ASCII-превью
#[must_use]
pub fn glyph(tile: &TownTile) -> char {
    if tile.is_entry {
        return 'E';
    }
    if let Some(kind) = tile.building_type {
        return kind.glyph();
    }
    match tile.poi {
        Some(Decoration::Well) => 'o',
        Some(Decoration::Fountain) => 'Q',
        Some(Decoration::Tree) => '&',
        Some(Decoration::Bush) => '+',
        Some(Decoration::Flowers) => '*',
        None => match tile.tile_type {
            TownTileType::Grass => '.',
            TownTileType::DirtPath => ',',
            TownTileType::StonePath => ':',
            TownTileType::TownSquare => '=',
            TownTileType::Building => '?',
            TownTileType::Water => '~',
            TownTileType::Bridge => 'H',
            TownTileType::Wall => '#',
            TownTileType::KeepWall => 'X',
            TownTileType::FarmField => '%',
        },
    }
}

pub fn generate_town_map(
    town_size: TownSize,
    town_name: &str,
    entry_direction: Direction,
    seed: Option<u64>,
    has_river: bool,
    river_direction: Option<ConnectionCode>,
) -> TownMapData {
    generate_town_map_with(
        town_size,
        town_name,
        entry_direction,
        seed,
        has_river,
        river_direction,
        &TownSettings::default(),
    )
}

pub fn generate_town_map_with(
    town_size: TownSize,
    town_name: &str,
    entry_direction: Direction,
    seed: Option<u64>,
    has_river: bool,
    river_direction: Option<ConnectionCode>,
    settings: &TownSettings,
) -> TownMapData {
    let mut rng = WorldRng::from_optional(seed);
    let mut town = TownMapData::new(town_size, town_name);

    if has_river {
        layout::carve_river(&mut town, &mut rng, river_direction);
    }
    town.entry_point = layout::entry_point(&town, entry_direction);
    layout::carve_main_road(&mut town);
    layout::carve_square(&mut town);
    if town_size == TownSize::City {
        layout::build_walls(&mut town);
        layout::build_keep(&mut town, &mut rng, entry_direction);
    }

    let important = buildings::place_important(&mut town, &mut rng);
    let houses = buildings::place_houses(&mut town, &mut rng);
    let carved = paths::connect_houses(&mut town, &mut rng, &houses, settings.direct_road_share);
    let repaired = paths::repair_stranded(&mut town, &houses);
    decor::stamp_farms(&mut town, &mut rng);
    decor::scatter_decorations(&mut town, &mut rng, settings.decoration_density);

    let entry = town.entry_point;
    if let Some(tile) = town.get_mut(entry) {
        tile.is_entry = true;
    }

    log::info!(
        "town '{}' ({:?}, seed {}): {} important buildings, {} houses, {} path tiles, {} repaired",
        town.town_name,
        town_size,
        rng.seed(),
        important,
        houses.len(),
        carved,
        repaired
    );
    town
}

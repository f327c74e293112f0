// src/npc/mod.rs
//! Жители города
//!
//! Готовая карта города сканируется один раз: жилые здания, службы и поля. По ним
//! строятся правящая семья или старейшина, персонал служб и семьи горожан. Каждый
//! житель получает собственный сид, из которого выводятся его характеристики.

mod population;
pub mod tables;

pub use population::populate_town;

use crate::grid::Position;
use crate::town::BuildingType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub fn opposite(self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Halfling,
    Dwarf,
    Elf,
    HalfElf,
    Gnome,
}

/// Архетип занятия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Villager,
    Elder,
    Noble,
    Guard,
    Merchant,
    Innkeeper,
    Priest,
    Acolyte,
    Blacksmith,
    GuildMaster,
    Banker,
    Farmer,
    Artisan,
    Child,
}

impl Role {
    pub const ALL: [Role; 14] = [
        Role::Villager,
        Role::Elder,
        Role::Noble,
        Role::Guard,
        Role::Merchant,
        Role::Innkeeper,
        Role::Priest,
        Role::Acolyte,
        Role::Blacksmith,
        Role::GuildMaster,
        Role::Banker,
        Role::Farmer,
        Role::Artisan,
        Role::Child,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    LawfulGood,
    NeutralGood,
    ChaoticGood,
    LawfulNeutral,
    TrueNeutral,
    ChaoticNeutral,
    LawfulEvil,
    NeutralEvil,
    ChaoticEvil,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Alignment::LawfulGood => "Lawful Good",
            Alignment::NeutralGood => "Neutral Good",
            Alignment::ChaoticGood => "Chaotic Good",
            Alignment::LawfulNeutral => "Lawful Neutral",
            Alignment::TrueNeutral => "True Neutral",
            Alignment::ChaoticNeutral => "Chaotic Neutral",
            Alignment::LawfulEvil => "Lawful Evil",
            Alignment::NeutralEvil => "Neutral Evil",
            Alignment::ChaoticEvil => "Chaotic Evil",
        };
        f.write_str(text)
    }
}

/// Шесть характеристик
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    /// Модификатор характеристики по таблице d20
    #[must_use]
    pub fn modifier(score: i32) -> i32 {
        (score - 10).div_euclid(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcLocation {
    pub x: i32,
    pub y: i32,
    pub building_name: String,
    pub building_type: BuildingType,
    pub home_coords: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: String,
    pub seed: u64,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub race: Race,
    pub role: Role,
    pub title: String,
    pub class: String,
    pub level: i32,
    pub alignment: Alignment,
    pub stats: AbilityScores,
    pub hp: HitPoints,
    pub inventory: Vec<String>,
    pub location: NpcLocation,
    pub job: String,
}

impl Npc {
    /// Фамилия - всё после первого слова имени
    #[must_use]
    pub fn surname(&self) -> &str {
        self.name
            .split_once(' ')
            .map_or("", |(_, rest)| rest)
    }

    #[must_use]
    pub fn given_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or_default()
    }
}

impl fmt::Display for Npc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {:?} {}, {}) at {}: {}",
            self.name,
            self.age,
            self.title,
            self.race,
            self.class,
            self.alignment,
            self.location.building_name,
            self.job
        )
    }
}

// src/npc/tables.rs
//! Справочные таблицы жителей: профили ролей, ремёсла с квотами, занятия

use super::{Alignment, Race, Role};
use crate::town::TownSize;

/// Что роль даёт персонажу
#[derive(Debug, Clone, Copy)]
pub struct RoleProfile {
    pub class: &'static str,
    pub level: (i32, i32),
    pub hit_die: i32,
    /// Сдвиги к СИЛ, ЛОВ, ВЫН, ИНТ, МДР, ХАР
    pub stat_bias: [i32; 6],
    pub coins: &'static str,
    pub items: &'static [&'static str],
}

pub fn profile(role: Role) -> RoleProfile {
    match role {
        Role::Villager => RoleProfile {
            class: "Commoner",
            level: (1, 2),
            hit_die: 4,
            stat_bias: [0, 0, 1, 0, 0, 0],
            coins: "copper",
            items: &["Wooden bowl", "Spare tunic"],
        },
        Role::Elder => RoleProfile {
            class: "Commoner",
            level: (2, 4),
            hit_die: 4,
            stat_bias: [-1, -1, 0, 1, 2, 1],
            coins: "silver",
            items: &["Walking staff", "Ledger of village disputes"],
        },
        Role::Noble => RoleProfile {
            class: "Aristocrat",
            level: (2, 6),
            hit_die: 8,
            stat_bias: [0, 0, 0, 1, 0, 2],
            coins: "gold",
            items: &["Signet ring", "Fine cloak"],
        },
        Role::Guard => RoleProfile {
            class: "Warrior",
            level: (1, 4),
            hit_die: 10,
            stat_bias: [2, 0, 1, 0, 0, 0],
            coins: "silver",
            items: &["Spear", "Padded armor", "Whistle"],
        },
        Role::Merchant => RoleProfile {
            class: "Expert",
            level: (1, 3),
            hit_die: 6,
            stat_bias: [0, 0, 0, 1, 0, 2],
            coins: "silver",
            items: &["Scales", "Ledger"],
        },
        Role::Innkeeper => RoleProfile {
            class: "Expert",
            level: (1, 3),
            hit_die: 6,
            stat_bias: [0, 0, 1, 0, 0, 1],
            coins: "silver",
            items: &["Ring of keys", "Bar rag"],
        },
        Role::Priest => RoleProfile {
            class: "Cleric",
            level: (2, 5),
            hit_die: 8,
            stat_bias: [0, 0, 0, 0, 2, 1],
            coins: "silver",
            items: &["Holy symbol", "Prayer book"],
        },
        Role::Acolyte => RoleProfile {
            class: "Cleric",
            level: (1, 2),
            hit_die: 8,
            stat_bias: [0, 0, 0, 0, 1, 0],
            coins: "copper",
            items: &["Holy symbol", "Candles"],
        },
        Role::Blacksmith => RoleProfile {
            class: "Expert",
            level: (1, 4),
            hit_die: 8,
            stat_bias: [2, 0, 1, 0, 0, 0],
            coins: "silver",
            items: &["Smithing hammer", "Tongs", "Leather apron"],
        },
        Role::GuildMaster => RoleProfile {
            class: "Expert",
            level: (3, 6),
            hit_die: 6,
            stat_bias: [0, 0, 0, 2, 0, 1],
            coins: "gold",
            items: &["Guild seal", "Charter"],
        },
        Role::Banker => RoleProfile {
            class: "Expert",
            level: (1, 4),
            hit_die: 6,
            stat_bias: [0, 0, 0, 2, 1, 0],
            coins: "gold",
            items: &["Strongbox key", "Abacus"],
        },
        Role::Farmer => RoleProfile {
            class: "Commoner",
            level: (1, 2),
            hit_die: 6,
            stat_bias: [1, 0, 1, 0, 0, 0],
            coins: "copper",
            items: &["Pitchfork", "Seed pouch"],
        },
        Role::Artisan => RoleProfile {
            class: "Expert",
            level: (1, 3),
            hit_die: 6,
            stat_bias: [0, 2, 0, 0, 0, 0],
            coins: "copper",
            items: &["Tool roll"],
        },
        Role::Child => RoleProfile {
            class: "Commoner",
            level: (1, 1),
            hit_die: 4,
            stat_bias: [-2, 1, -1, 0, -1, 1],
            coins: "copper",
            items: &["Carved toy"],
        },
    }
}

pub const RACES: &[(Race, u32)] = &[
    (Race::Human, 60),
    (Race::Halfling, 10),
    (Race::Dwarf, 10),
    (Race::Elf, 8),
    (Race::HalfElf, 8),
    (Race::Gnome, 4),
];

pub const ALIGNMENTS: &[(Alignment, u32)] = &[
    (Alignment::LawfulGood, 12),
    (Alignment::NeutralGood, 16),
    (Alignment::ChaoticGood, 8),
    (Alignment::LawfulNeutral, 14),
    (Alignment::TrueNeutral, 24),
    (Alignment::ChaoticNeutral, 10),
    (Alignment::LawfulEvil, 6),
    (Alignment::NeutralEvil, 6),
    (Alignment::ChaoticEvil, 4),
];

/// Ремёсла горожан. Каждое доступно с определённого размера города
/// и в ограниченном числе на город.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocation {
    Carpenter,
    Weaver,
    Baker,
    Fisher,
    Hunter,
    Herbalist,
    Potter,
    Butcher,
    Cobbler,
    Tailor,
    Mason,
    Miller,
    Chandler,
    Cooper,
    Tanner,
    Scribe,
    Jeweler,
    Glassblower,
}

impl Vocation {
    const ALL: [Vocation; 18] = [
        Vocation::Carpenter,
        Vocation::Weaver,
        Vocation::Baker,
        Vocation::Fisher,
        Vocation::Hunter,
        Vocation::Herbalist,
        Vocation::Potter,
        Vocation::Butcher,
        Vocation::Cobbler,
        Vocation::Tailor,
        Vocation::Mason,
        Vocation::Miller,
        Vocation::Chandler,
        Vocation::Cooper,
        Vocation::Tanner,
        Vocation::Scribe,
        Vocation::Jeweler,
        Vocation::Glassblower,
    ];

    /// Наименьший город, где ремесло встречается, и базовая квота
    fn availability(self) -> (TownSize, u32) {
        match self {
            Vocation::Carpenter | Vocation::Weaver | Vocation::Hunter => (TownSize::Hamlet, 1),
            Vocation::Baker
            | Vocation::Fisher
            | Vocation::Herbalist
            | Vocation::Potter
            | Vocation::Miller
            | Vocation::Butcher => (TownSize::Village, 1),
            Vocation::Cobbler
            | Vocation::Tailor
            | Vocation::Mason
            | Vocation::Chandler
            | Vocation::Cooper
            | Vocation::Tanner => (TownSize::Town, 1),
            Vocation::Scribe | Vocation::Jeweler | Vocation::Glassblower => (TownSize::City, 1),
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Vocation::Carpenter => "Carpenter",
            Vocation::Weaver => "Weaver",
            Vocation::Baker => "Baker",
            Vocation::Fisher => "Fisher",
            Vocation::Hunter => "Hunter",
            Vocation::Herbalist => "Herbalist",
            Vocation::Potter => "Potter",
            Vocation::Butcher => "Butcher",
            Vocation::Cobbler => "Cobbler",
            Vocation::Tailor => "Tailor",
            Vocation::Mason => "Stonemason",
            Vocation::Miller => "Miller",
            Vocation::Chandler => "Chandler",
            Vocation::Cooper => "Cooper",
            Vocation::Tanner => "Tanner",
            Vocation::Scribe => "Scribe",
            Vocation::Jeweler => "Jeweler",
            Vocation::Glassblower => "Glassblower",
        }
    }

    #[must_use]
    pub fn job(self) -> &'static str {
        match self {
            Vocation::Carpenter => "Builds and mends furniture, fences and roof beams",
            Vocation::Weaver => "Works the loom from dawn, turning wool into cloth",
            Vocation::Baker => "Bakes bread before sunrise for the whole street",
            Vocation::Fisher => "Sets nets and sells the morning catch",
            Vocation::Hunter => "Tracks game in the nearby woods",
            Vocation::Herbalist => "Gathers herbs and brews simple remedies",
            Vocation::Potter => "Throws pots and jugs at the wheel",
            Vocation::Butcher => "Cuts and salts meat for the market",
            Vocation::Cobbler => "Stitches and resoles boots",
            Vocation::Tailor => "Cuts and sews garments to order",
            Vocation::Mason => "Dresses stone and repairs walls",
            Vocation::Miller => "Grinds grain at the mill",
            Vocation::Chandler => "Makes candles and soap",
            Vocation::Cooper => "Builds barrels for the brewers",
            Vocation::Tanner => "Cures hides at the edge of town",
            Vocation::Scribe => "Copies letters and contracts for coin",
            Vocation::Jeweler => "Sets stones for wealthy patrons",
            Vocation::Glassblower => "Blows bottles and window panes",
        }
    }
}

fn quota_scale(size: TownSize) -> u32 {
    match size {
        TownSize::Hamlet | TownSize::Village => 1,
        TownSize::Town => 2,
        TownSize::City => 3,
    }
}

/// Квоты ремёсел на город данного размера
#[must_use]
pub fn vocation_quotas(size: TownSize) -> Vec<(Vocation, u32)> {
    Vocation::ALL
        .into_iter()
        .filter_map(|v| {
            let (smallest, base) = v.availability();
            (size >= smallest).then_some((v, base * quota_scale(size)))
        })
        .collect()
}

pub const DOMESTIC_ACTIVITIES: &[&str] = &[
    "Keeps the household and tends the kitchen garden",
    "Mends clothes and minds the hearth",
    "Takes in washing from the neighbours",
    "Raises chickens behind the house",
    "Does odd jobs wherever work is offered",
    "Looks after an ailing parent",
];

pub const PLAY_ACTIVITIES: &[&str] = &[
    "Chases chickens around the square",
    "Plays knucklebones in the dirt",
    "Climbs trees and gets scolded for it",
    "Runs errands for a copper",
    "Plays at knights with a stick sword",
    "Skips stones at the water's edge",
];

pub const TRINKETS: &[&str] = &[
    "Lucky rabbit's foot",
    "Tarnished locket",
    "Smooth river stone",
    "Bone dice",
    "Pressed flower",
    "Old copper medal",
    "Tiny carved horse",
    "Letter never sent",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotas_grow_with_town() {
        let total = |size| vocation_quotas(size).iter().map(|(_, n)| n).sum::<u32>();
        assert_eq!(total(TownSize::Hamlet), 3);
        assert_eq!(total(TownSize::Village), 9);
        assert_eq!(total(TownSize::Town), 30);
        assert_eq!(total(TownSize::City), 54);
    }

    #[test]
    fn test_every_role_has_items() {
        for role in Role::ALL {
            let p = profile(role);
            assert!(p.level.0 <= p.level.1);
            assert!(!p.items.is_empty());
        }
    }
}

// src/names.rs
//! Генерация названий и имён
//!
//! Все названия собираются из таблиц: шаблон выбирается по весу, части - равновероятно.
//! Модуль - листовая зависимость для генераторов мира, города и жителей.

use crate::rng::WorldRng;
use crate::town::BuildingType;

pub const MALE_NAMES: &[&str] = &[
    "Aldric", "Bram", "Cedric", "Doran", "Edmund", "Fenwick", "Gareth", "Hob", "Ivo", "Jorin",
    "Kendrick", "Leof", "Merek", "Nyle", "Osric", "Perrin", "Quill", "Roland", "Silas", "Tobin",
    "Ulric", "Wendel", "Wystan", "Alden", "Berric", "Colm", "Davin", "Emrys", "Garrick", "Hamon",
];

pub const FEMALE_NAMES: &[&str] = &[
    "Adela", "Brynn", "Cecily", "Del", "Elspeth", "Freya", "Gwen", "Hilda", "Isolde", "Jessa",
    "Kestrel", "Linnet", "Maud", "Nell", "Odette", "Petra", "Rowena", "Sabine", "Tamsin", "Una",
    "Verity", "Wren", "Yara", "Agnes", "Beatrix", "Clara", "Edith", "Greta", "Ilse", "Mirren",
];

pub const SURNAMES: &[&str] = &[
    "Ashdown", "Barrow", "Cobb", "Dunmore", "Fairweather", "Greaves", "Hollis", "Kettle", "Larkin",
    "Marsh", "Nettle", "Oakes", "Pike", "Quarry", "Rook", "Sable", "Thatcher", "Underhill", "Vane",
    "Weller", "Yew", "Bramble", "Crane", "Dale", "Fletcher", "Miller", "Tanner", "Wainwright",
];

pub const NOBLE_SURNAMES: &[&str] = &[
    "Ashcombe", "Blackwood", "Carrow", "Darnell", "Everard", "Fairfax", "Greymont", "Harcourt",
    "Lindqvist", "Montfort", "Ravensworth", "Stavely", "Thorne", "Valcourt", "Whitmore",
];

const TOWN_PREFIXES: &[&str] = &[
    "Oak", "Stone", "River", "Elder", "Black", "Green", "Ash", "Thorn", "Wolf", "Raven", "Silver",
    "Frost", "Mill", "Brook", "Amber", "Red", "High", "Low", "Cold", "Fair",
];

const TOWN_SUFFIXES: &[&str] = &[
    "ford", "bridge", "vale", "haven", "wick", "ton", "field", "holm", "stead", "moor", "crest",
    "dale", "bury", "mere", "hollow", "gate",
];

const TOWN_EPITHETS: &[&str] = &["Crossing", "Landing", "Rest", "Reach", "Watch", "Hollow"];

const MOUNTAIN_ADJECTIVES: &[&str] = &[
    "Grey", "Iron", "Broken", "Howling", "Frozen", "Ashen", "Silent", "Jagged", "Stormcrown",
    "Sleeping", "Red", "Thunder",
];

const MOUNTAIN_NOUNS: &[&str] = &[
    "Peaks", "Spine", "Teeth", "Crags", "Heights", "Fells", "Ridge", "Summits", "Tors",
];

const MOUNTAIN_SINGULAR: &[&str] = &[
    "Karn", "Dravos", "Helgrim", "Ossa", "Tyrr", "Vhal", "Morrow", "Eskel", "Brannoch",
];

const ADJECTIVES: &[&str] = &[
    "Golden", "Prancing", "Drunken", "Sleepy", "Rusty", "Laughing", "Wandering", "Silver",
    "Crooked", "Jolly", "Weary", "Copper", "Green", "Lucky",
];

const ANIMALS: &[&str] = &[
    "Pony", "Dragon", "Stag", "Boar", "Griffin", "Fox", "Goose", "Badger", "Hound", "Owl",
    "Raven", "Bear",
];

const INN_OBJECTS: &[&str] = &["Lantern", "Hearth", "Kettle", "Tankard", "Anchor", "Wheel", "Crown"];

const TRADES: &[&str] = &[
    "Merchants", "Masons", "Weavers", "Alchemists", "Adventurers", "Carpenters", "Scribes",
    "Smiths", "Tanners", "Mages",
];

const DEITIES: &[&str] = &[
    "Solara", "Morwen", "Tyrus", "the Dawn", "the Harvest Mother", "the Silent Flame",
    "the Tides", "Aurel",
];

const TEMPLE_FORMS: &[&str] = &["Temple", "Chapel", "Sanctuary", "Shrine"];

const WARES: &[&str] = &["Sundries", "Curios", "Provisions", "Oddments", "Wares", "Trinkets"];

const HOUSE_NAMES: &[&str] = &["Cottage", "Homestead", "Croft", "Cottage", "House", "Lodge"];

/// Выбор по весам: `(значение, вес)`
pub fn weighted<'a, T>(rng: &mut WorldRng, table: &'a [(T, u32)]) -> Option<&'a T> {
    let total: u32 = table.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        return None;
    }
    let mut roll = (rng.random() * f64::from(total)) as u32;
    for (item, weight) in table {
        if roll < *weight {
            return Some(item);
        }
        roll -= weight;
    }
    table.last().map(|(item, _)| item)
}

fn part(rng: &mut WorldRng, table: &[&'static str]) -> &'static str {
    rng.pick(table).copied().unwrap_or_default()
}

pub fn town_name(rng: &mut WorldRng) -> String {
    let pattern = weighted(rng, &[(0u8, 8), (1, 2)]).copied().unwrap_or(0);
    let prefix = part(rng, TOWN_PREFIXES);
    let suffix = part(rng, TOWN_SUFFIXES);
    match pattern {
        0 => format!("{prefix}{suffix}"),
        _ => format!("{prefix}{suffix} {}", part(rng, TOWN_EPITHETS)),
    }
}

pub fn mountain_name(rng: &mut WorldRng) -> String {
    match weighted(rng, &[(0u8, 5), (1, 3), (2, 2)]).copied().unwrap_or(0) {
        0 => format!(
            "The {} {}",
            part(rng, MOUNTAIN_ADJECTIVES),
            part(rng, MOUNTAIN_NOUNS)
        ),
        1 => format!(
            "{} {}",
            part(rng, MOUNTAIN_SINGULAR),
            part(rng, MOUNTAIN_NOUNS)
        ),
        _ => format!("Mount {}", part(rng, MOUNTAIN_SINGULAR)),
    }
}

pub fn male_name(rng: &mut WorldRng) -> &'static str {
    part(rng, MALE_NAMES)
}

pub fn female_name(rng: &mut WorldRng) -> &'static str {
    part(rng, FEMALE_NAMES)
}

pub fn surname(rng: &mut WorldRng) -> &'static str {
    part(rng, SURNAMES)
}

pub fn noble_surname(rng: &mut WorldRng) -> &'static str {
    part(rng, NOBLE_SURNAMES)
}

/// Название здания по его типу
pub fn building_name(rng: &mut WorldRng, building: BuildingType, town_name: &str) -> String {
    match building {
        BuildingType::House => part(rng, HOUSE_NAMES).to_string(),
        BuildingType::Tavern => format!("The {} {}", part(rng, ADJECTIVES), part(rng, ANIMALS)),
        BuildingType::Inn => format!("The {} {} Inn", part(rng, ADJECTIVES), part(rng, INN_OBJECTS)),
        BuildingType::Shop => {
            if rng.chance(0.6) {
                let owner = if rng.chance(0.5) {
                    male_name(rng)
                } else {
                    female_name(rng)
                };
                format!("{owner}'s Goods")
            } else {
                format!("The {} {}", part(rng, ADJECTIVES), part(rng, WARES))
            }
        }
        BuildingType::Market => match weighted(rng, &[(0u8, 2), (1, 1)]).copied().unwrap_or(0) {
            0 => format!("{town_name} Market"),
            _ => "The Market Hall".to_string(),
        },
        BuildingType::Temple => format!("{} of {}", part(rng, TEMPLE_FORMS), part(rng, DEITIES)),
        BuildingType::Guild => {
            if rng.chance(0.5) {
                format!("Guild of {}", part(rng, TRADES))
            } else {
                format!("The {} Guildhall", part(rng, TRADES))
            }
        }
        BuildingType::Bank => {
            if rng.chance(0.5) {
                format!("{} & {} Counting House", surname(rng), surname(rng))
            } else {
                format!("The {town_name} Exchange")
            }
        }
        BuildingType::Blacksmith => {
            if rng.chance(0.5) {
                format!("{}'s Forge", surname(rng))
            } else {
                format!("The {} Anvil", part(rng, ADJECTIVES))
            }
        }
        BuildingType::Manor => {
            let family = noble_surname(rng);
            if rng.chance(0.5) {
                format!("{family} Manor")
            } else {
                format!("{family} Hall")
            }
        }
        BuildingType::Keep => format!("{} Keep", noble_surname(rng)),
        BuildingType::Barn => format!("{} Barn", surname(rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_deterministic() {
        let mut a = WorldRng::new(77);
        let mut b = WorldRng::new(77);
        for _ in 0..20 {
            assert_eq!(town_name(&mut a), town_name(&mut b));
            assert_eq!(mountain_name(&mut a), mountain_name(&mut b));
        }
    }

    #[test]
    fn test_weighted_respects_zero_weight() {
        let mut rng = WorldRng::new(5);
        for _ in 0..100 {
            assert_eq!(weighted(&mut rng, &[("never", 0), ("always", 3)]), Some(&"always"));
        }
        let empty: [(&str, u32); 0] = [];
        assert!(weighted(&mut rng, &empty).is_none());
    }

    #[test]
    fn test_building_names_not_empty() {
        let mut rng = WorldRng::new(9);
        for building in BuildingType::ALL {
            let name = building_name(&mut rng, building, "Oakford");
            assert!(!name.is_empty(), "{building:?} got an empty name");
        }
    }

    #[test]
    fn test_manor_name_carries_family() {
        let mut rng = WorldRng::new(21);
        let name = building_name(&mut rng, BuildingType::Manor, "Oakford");
        assert!(NOBLE_SURNAMES.iter().any(|s| name.starts_with(s)));
    }
}

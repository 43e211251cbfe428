//! Roster provider: combatant templates from the built-in catalog or a JSON file.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{BattleError, Result};
use crate::model::{BaseStats, CombatantTemplate, Move, MoveCategory};
use crate::rng::RandomSource;
use crate::types::ElementType;

struct MoveSpec {
    name: &'static str,
    move_type: ElementType,
    power: u32,
    accuracy: f64,
    category: MoveCategory,
    description: &'static str,
}

struct SpeciesSpec {
    name: &'static str,
    primary_type: ElementType,
    secondary_type: Option<ElementType>,
    base_stats: BaseStats,
    moves: &'static [&'static str],
    level: u32,
}

static MOVES: phf::Map<&'static str, MoveSpec> = phf::phf_map! {
    "tackle" => MoveSpec { name: "Tackle", move_type: ElementType::Normal, power: 40, accuracy: 100.0, category: MoveCategory::Physical, description: "A basic physical attack" },
    "scratch" => MoveSpec { name: "Scratch", move_type: ElementType::Normal, power: 40, accuracy: 100.0, category: MoveCategory::Physical, description: "Scratches with sharp claws" },
    "ember" => MoveSpec { name: "Ember", move_type: ElementType::Fire, power: 40, accuracy: 100.0, category: MoveCategory::Special, description: "A small flame attack" },
    "water-gun" => MoveSpec { name: "Water Gun", move_type: ElementType::Water, power: 40, accuracy: 100.0, category: MoveCategory::Special, description: "Squirts water to attack" },
    "vine-whip" => MoveSpec { name: "Vine Whip", move_type: ElementType::Grass, power: 45, accuracy: 100.0, category: MoveCategory::Physical, description: "Strikes with vines" },
    "spark" => MoveSpec { name: "Spark", move_type: ElementType::Electric, power: 65, accuracy: 100.0, category: MoveCategory::Physical, description: "An electric tackle" },
    "flamethrower" => MoveSpec { name: "Flamethrower", move_type: ElementType::Fire, power: 90, accuracy: 100.0, category: MoveCategory::Special, description: "A powerful fire attack" },
    "hydro-pump" => MoveSpec { name: "Hydro Pump", move_type: ElementType::Water, power: 110, accuracy: 80.0, category: MoveCategory::Special, description: "A powerful water attack" },
    "solar-beam" => MoveSpec { name: "Solar Beam", move_type: ElementType::Grass, power: 120, accuracy: 100.0, category: MoveCategory::Special, description: "A two-turn grass attack" },
    "thunderbolt" => MoveSpec { name: "Thunderbolt", move_type: ElementType::Electric, power: 90, accuracy: 100.0, category: MoveCategory::Special, description: "A strong electric attack" },
    "psychic" => MoveSpec { name: "Psychic", move_type: ElementType::Psychic, power: 90, accuracy: 100.0, category: MoveCategory::Special, description: "A telekinetic attack" },
    "earthquake" => MoveSpec { name: "Earthquake", move_type: ElementType::Ground, power: 100, accuracy: 100.0, category: MoveCategory::Physical, description: "A ground-shaking attack" },
    "ice-beam" => MoveSpec { name: "Ice Beam", move_type: ElementType::Ice, power: 90, accuracy: 100.0, category: MoveCategory::Special, description: "A freezing cold beam" },
    "rock-slide" => MoveSpec { name: "Rock Slide", move_type: ElementType::Rock, power: 75, accuracy: 90.0, category: MoveCategory::Physical, description: "Drops rocks on the foe" },
};

static SPECIES: phf::OrderedMap<&'static str, SpeciesSpec> = phf::phf_ordered_map! {
    "pikachu" => SpeciesSpec {
        name: "Pikachu",
        primary_type: ElementType::Electric,
        secondary_type: None,
        base_stats: BaseStats { hp: 35, attack: 55, defense: 40, speed: 90 },
        moves: &["tackle", "spark", "thunderbolt", "tackle"],
        level: 25,
    },
    "charizard" => SpeciesSpec {
        name: "Charizard",
        primary_type: ElementType::Fire,
        secondary_type: Some(ElementType::Flying),
        base_stats: BaseStats { hp: 78, attack: 84, defense: 78, speed: 100 },
        moves: &["scratch", "ember", "flamethrower", "earthquake"],
        level: 50,
    },
    "blastoise" => SpeciesSpec {
        name: "Blastoise",
        primary_type: ElementType::Water,
        secondary_type: None,
        base_stats: BaseStats { hp: 79, attack: 83, defense: 100, speed: 78 },
        moves: &["tackle", "water-gun", "hydro-pump", "ice-beam"],
        level: 50,
    },
    "venusaur" => SpeciesSpec {
        name: "Venusaur",
        primary_type: ElementType::Grass,
        secondary_type: Some(ElementType::Poison),
        base_stats: BaseStats { hp: 80, attack: 82, defense: 83, speed: 80 },
        moves: &["tackle", "vine-whip", "solar-beam", "earthquake"],
        level: 50,
    },
    "alakazam" => SpeciesSpec {
        name: "Alakazam",
        primary_type: ElementType::Psychic,
        secondary_type: None,
        base_stats: BaseStats { hp: 55, attack: 50, defense: 45, speed: 120 },
        moves: &["tackle", "psychic", "psychic", "psychic"],
        level: 50,
    },
    "golem" => SpeciesSpec {
        name: "Golem",
        primary_type: ElementType::Rock,
        secondary_type: Some(ElementType::Ground),
        base_stats: BaseStats { hp: 80, attack: 120, defense: 130, speed: 45 },
        moves: &["tackle", "rock-slide", "earthquake", "rock-slide"],
        level: 50,
    },
};

impl MoveSpec {
    fn to_move(&self) -> Move {
        Move::new(
            self.name,
            self.move_type,
            self.power,
            self.accuracy,
            self.category,
            self.description,
        )
    }
}

/// Looks up a catalog move by key (`"water-gun"`) or display name (`"Water Gun"`).
pub fn catalog_move(name: &str) -> Option<Move> {
    MOVES.get(catalog_key(name).as_str()).map(MoveSpec::to_move)
}

fn catalog_key(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace([' ', '_'], "-")
}

/// Interns catalog moves so every template that knows a move shares one `Arc`.
#[derive(Default)]
struct MoveCache {
    moves: HashMap<String, Arc<Move>>,
}

impl MoveCache {
    fn get(&mut self, name: &str) -> Option<Arc<Move>> {
        let key = catalog_key(name);
        if let Some(found) = self.moves.get(&key) {
            return Some(Arc::clone(found));
        }
        let created = Arc::new(catalog_move(&key)?);
        self.moves.insert(key, Arc::clone(&created));
        Some(created)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MoveEntry {
    Catalog(String),
    Inline(Move),
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    name: String,
    primary_type: ElementType,
    #[serde(default)]
    secondary_type: Option<ElementType>,
    base_stats: BaseStats,
    moves: Vec<MoveEntry>,
    #[serde(default)]
    level: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterFile {
    List(Vec<TemplateEntry>),
    Wrapped { combatants: Vec<TemplateEntry> },
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    templates: Vec<CombatantTemplate>,
}

impl Roster {
    /// The six built-in species.
    pub fn sample() -> Self {
        let mut cache = MoveCache::default();
        let templates = SPECIES
            .values()
            .map(|spec| CombatantTemplate {
                name: spec.name.to_string(),
                primary_type: spec.primary_type,
                secondary_type: spec.secondary_type,
                base_stats: spec.base_stats,
                moves: spec.moves.iter().filter_map(|key| cache.get(key)).collect(),
                level: spec.level,
            })
            .collect();
        Self { templates }
    }

    pub fn from_templates(templates: Vec<CombatantTemplate>) -> Self {
        Self { templates }
    }

    /// Parses a roster: either a bare list of templates or `{"combatants": [...]}`.
    ///
    /// Moves may be given inline or by catalog name.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let parsed: RosterFile = serde_json::from_str(raw).context("roster JSON is malformed")?;
        let entries = match parsed {
            RosterFile::List(entries) => entries,
            RosterFile::Wrapped { combatants } => combatants,
        };
        let mut cache = MoveCache::default();
        let mut templates: Vec<CombatantTemplate> = Vec::with_capacity(entries.len());
        for entry in entries {
            if templates
                .iter()
                .any(|t| t.name.eq_ignore_ascii_case(entry.name.trim()))
            {
                return Err(BattleError::DuplicateCombatant { name: entry.name }.into());
            }
            let mut moves = Vec::with_capacity(entry.moves.len());
            for mv in entry.moves {
                let resolved = match mv {
                    MoveEntry::Inline(inline) => Arc::new(inline),
                    MoveEntry::Catalog(name) => cache.get(&name).with_context(|| {
                        format!("{} knows unknown catalog move '{name}'", entry.name)
                    })?,
                };
                moves.push(resolved);
            }
            templates.push(CombatantTemplate {
                name: entry.name,
                primary_type: entry.primary_type,
                secondary_type: entry.secondary_type,
                base_stats: entry.base_stats,
                moves,
                level: entry.level.unwrap_or(50),
            });
        }
        if templates.is_empty() {
            return Err(BattleError::EmptyRoster.into());
        }
        Ok(Self { templates })
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file at {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Failed to load roster from {}", path.display()))
    }

    pub fn templates(&self) -> &[CombatantTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Result<&CombatantTemplate> {
        let wanted = name.trim();
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BattleError::MissingCombatant {
                name: name.to_string(),
            })
    }

    /// Two distinct templates chosen uniformly at random.
    pub fn pick_pair(
        &self,
        rng: &mut impl RandomSource,
    ) -> Result<(&CombatantTemplate, &CombatantTemplate)> {
        if self.templates.len() < 2 {
            return Err(BattleError::NotEnoughCombatants {
                needed: 2,
                available: self.templates.len(),
            });
        }
        let first = rng.pick_index(self.templates.len());
        let mut second = rng.pick_index(self.templates.len() - 1);
        if second >= first {
            second += 1;
        }
        Ok((&self.templates[first], &self.templates[second]))
    }

    /// One text block per template: types, level, derived stats, moves.
    pub fn describe(&self) -> Vec<String> {
        self.templates
            .iter()
            .enumerate()
            .map(|(idx, t)| {
                let stats = t.derived_stats();
                let types = match t.secondary_type {
                    Some(secondary) => format!("{}/{}", t.primary_type, secondary),
                    None => t.primary_type.to_string(),
                };
                let moves: Vec<&str> = t.moves.iter().map(|m| m.name.as_str()).collect();
                format!(
                    "{}. {} ({}) - Level {}\n   HP: {}, Attack: {}, Defense: {}, Speed: {}\n   Moves: {}",
                    idx + 1,
                    t.name,
                    types,
                    t.level,
                    stats.max_hp,
                    stats.attack,
                    stats.defense,
                    stats.speed,
                    moves.join(", ")
                )
            })
            .collect()
    }
}

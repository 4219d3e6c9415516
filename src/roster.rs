// 👥 Roster Records - Canonical players and the CSV ingestion boundary
//
// External rows carry optional fields (aliases, rating, position).
// Defaults are applied ONCE here so the core only ever sees complete records.

use crate::aliases::{extract_aliases, split_aliases};
use crate::error::{Result, SquadError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Rating used when a row (or an unmatched name) has none
pub const DEFAULT_RATING: u8 = 70;

/// Highest valid rating
pub const MAX_RATING: u8 = 100;

// ============================================================================
// POSITION
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Forwards / strikers
    Attacking,

    /// Central players
    Midfield,

    /// Defenders / keepers
    Defensive,

    /// Plays anywhere (also the fallback for unknown players)
    #[default]
    Everywhere,
}

impl Position {
    /// Order in which groups are balanced: fixed roles first, flexible last
    pub const BALANCE_ORDER: [Position; 4] = [
        Position::Defensive,
        Position::Midfield,
        Position::Attacking,
        Position::Everywhere,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Attacking => "attacking",
            Position::Midfield => "midfield",
            Position::Defensive => "defensive",
            Position::Everywhere => "everywhere",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = SquadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "attacking" | "attack" | "att" | "fwd" | "forward" | "striker" => {
                Ok(Position::Attacking)
            }
            "midfield" | "midfielder" | "mid" => Ok(Position::Midfield),
            "defensive" | "defence" | "defense" | "def" | "back" | "defender" => {
                Ok(Position::Defensive)
            }
            "everywhere" | "any" | "all" | "flex" => Ok(Position::Everywhere),
            other => Err(SquadError::InvalidPosition {
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// ROSTER RECORD
// ============================================================================

/// A canonical roster entry. Immutable snapshot owned by the storage side;
/// the matching/balancing core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub name: String,
    pub aliases: Vec<String>,

    /// Overall score 0-100
    pub rating: u8,

    pub position: Position,
}

impl RosterRecord {
    pub fn new(name: impl Into<String>, rating: u8, position: Position) -> Self {
        RosterRecord {
            name: name.into(),
            aliases: Vec::new(),
            rating: rating.min(MAX_RATING),
            position,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            self.add_alias(alias.into());
        }
        self
    }

    /// Add an alias (skips duplicates and the canonical name, case-insensitive)
    pub fn add_alias(&mut self, alias: String) {
        let alias_lower = alias.to_lowercase();
        if alias_lower.is_empty() || alias_lower == self.name.to_lowercase() {
            return;
        }
        if self.aliases.iter().any(|a| a.to_lowercase() == alias_lower) {
            return;
        }
        self.aliases.push(alias);
    }

    /// Build a complete record from a raw row, applying every default here.
    ///
    /// Returns None when the row has no usable name.
    pub fn from_raw(raw: RawRosterRecord) -> Option<Self> {
        let parsed = extract_aliases(&raw.name);
        let mut aliases = parsed.aliases;

        // "(Negm)" alone: promote the first alias to the name
        let name = if parsed.main_name.is_empty() {
            if aliases.is_empty() {
                return None;
            }
            aliases.remove(0)
        } else {
            parsed.main_name
        };

        let rating = match raw.rating {
            Some(r) if r < 0 => {
                warn!(player = %name, rating = r, "Negative rating clamped to 0");
                0
            }
            Some(r) if r > MAX_RATING as i64 => {
                warn!(player = %name, rating = r, "Rating above {} clamped", MAX_RATING);
                MAX_RATING
            }
            Some(r) => r as u8,
            None => {
                debug!(player = %name, "No rating, using default {}", DEFAULT_RATING);
                DEFAULT_RATING
            }
        };

        let position = match raw.position.as_deref().map(str::trim) {
            None | Some("") => Position::Everywhere,
            Some(text) => text.parse().unwrap_or_else(|e: SquadError| {
                warn!(player = %name, "{}; using everywhere", e);
                Position::Everywhere
            }),
        };

        let mut record = RosterRecord::new(name, rating, position);
        for alias in aliases {
            record.add_alias(alias);
        }
        if let Some(column) = raw.aliases.as_deref() {
            for alias in split_aliases(column) {
                record.add_alias(alias);
            }
        }

        Some(record)
    }

    /// Canonical name followed by every alias
    pub fn all_names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        names.extend(self.aliases.iter().map(String::as_str));
        names
    }
}

// ============================================================================
// RAW ROW (as it arrives from CSV / storage)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRosterRecord {
    /// May embed aliases: "Name (alias1 / alias2)"
    pub name: String,

    /// Extra aliases, separated by / , ; |
    #[serde(default)]
    pub aliases: Option<String>,

    #[serde(default)]
    pub rating: Option<i64>,

    #[serde(default)]
    pub position: Option<String>,
}

// ============================================================================
// CSV LOADING
// ============================================================================

/// Load a roster from a CSV file with headers `name,aliases,rating,position`
/// (only `name` is required).
pub fn load_roster_csv(csv_path: &Path) -> Result<Vec<RosterRecord>> {
    let rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(csv_path)?;
    read_roster(rdr)
}

/// Same as `load_roster_csv` but from any reader
pub fn load_roster_from_reader<R: Read>(reader: R) -> Result<Vec<RosterRecord>> {
    let rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    read_roster(rdr)
}

fn read_roster<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<RosterRecord>> {
    let mut roster = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        let raw: RawRosterRecord = result?;
        // Header is line 1, first data row is line 2
        let row = index + 2;
        let record = RosterRecord::from_raw(raw).ok_or(SquadError::EmptyName { row })?;
        roster.push(record);
    }

    debug!(players = roster.len(), "Roster loaded");
    Ok(roster)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn raw(name: &str, rating: Option<i64>, position: Option<&str>) -> RawRosterRecord {
        RawRosterRecord {
            name: name.to_string(),
            aliases: None,
            rating,
            position: position.map(str::to_string),
        }
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("Attacking".parse::<Position>().unwrap(), Position::Attacking);
        assert_eq!("MID".parse::<Position>().unwrap(), Position::Midfield);
        assert_eq!(" def ".parse::<Position>().unwrap(), Position::Defensive);
        assert_eq!("any".parse::<Position>().unwrap(), Position::Everywhere);

        let err = "Goalie".parse::<Position>().unwrap_err();
        assert!(matches!(&err, SquadError::InvalidPosition { value } if value == "goalie"));
        assert_eq!(err.to_string(), "Unknown position: goalie");
    }

    #[test]
    fn test_balance_order() {
        assert_eq!(
            Position::BALANCE_ORDER,
            [
                Position::Defensive,
                Position::Midfield,
                Position::Attacking,
                Position::Everywhere
            ]
        );
    }

    #[test]
    fn test_from_raw_applies_defaults() {
        let record = RosterRecord::from_raw(raw("Sam", None, None)).unwrap();
        assert_eq!(record.name, "Sam");
        assert_eq!(record.rating, DEFAULT_RATING);
        assert_eq!(record.position, Position::Everywhere);
        assert!(record.aliases.is_empty());
    }

    #[test]
    fn test_from_raw_unknown_position_falls_back() {
        let record = RosterRecord::from_raw(raw("Sam", Some(80), Some("goalie"))).unwrap();
        assert_eq!(record.position, Position::Everywhere);
        assert_eq!(record.rating, 80);
    }

    #[test]
    fn test_from_raw_clamps_rating() {
        let high = RosterRecord::from_raw(raw("A", Some(150), None)).unwrap();
        let low = RosterRecord::from_raw(raw("B", Some(-5), None)).unwrap();
        assert_eq!(high.rating, 100);
        assert_eq!(low.rating, 0);
    }

    #[test]
    fn test_from_raw_merges_aliases() {
        let mut row = raw("Ne (Negm / N)", Some(85), Some("attacking"));
        row.aliases = Some("negm, Nego".to_string());

        let record = RosterRecord::from_raw(row).unwrap();
        assert_eq!(record.name, "Ne");
        // "negm" is a case-insensitive duplicate of "Negm"
        assert_eq!(record.aliases, vec!["Negm", "N", "Nego"]);
    }

    #[test]
    fn test_from_raw_promotes_alias_when_name_missing() {
        let record = RosterRecord::from_raw(raw("(Negm / N)", None, None)).unwrap();
        assert_eq!(record.name, "Negm");
        assert_eq!(record.aliases, vec!["N"]);
    }

    #[test]
    fn test_from_raw_rejects_blank_name() {
        assert!(RosterRecord::from_raw(raw("   ", None, None)).is_none());
    }

    #[test]
    fn test_add_alias_skips_canonical_and_duplicates() {
        let record = RosterRecord::new("Mohamed", 80, Position::Midfield)
            .with_aliases(["Mo", "mo", "MOHAMED", ""]);
        assert_eq!(record.aliases, vec!["Mo"]);
        assert_eq!(record.all_names(), vec!["Mohamed", "Mo"]);
    }

    #[test]
    fn test_load_roster_from_reader() {
        let data = "name,aliases,rating,position\n\
                    Mohamed (Mo),Hamada,88,midfield\n\
                    Karim,,75,defensive\n\
                    Sam,,,\n";

        let roster = load_roster_from_reader(data.as_bytes()).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].name, "Mohamed");
        assert_eq!(roster[0].aliases, vec!["Mo", "Hamada"]);
        assert_eq!(roster[1].position, Position::Defensive);
        assert_eq!(roster[2].rating, DEFAULT_RATING);
        assert_eq!(roster[2].position, Position::Everywhere);
    }

    #[test]
    fn test_load_roster_name_only_columns() {
        let data = "name\nAli\nOmar\n";
        let roster = load_roster_from_reader(data.as_bytes()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[1].name, "Omar");
    }

    #[test]
    fn test_load_roster_empty_name_is_error() {
        let data = "name,rating\nAli,80\n\"\",70\n";
        let err = load_roster_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, SquadError::EmptyName { row: 3 }));
    }

    #[test]
    fn test_load_roster_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,rating,position").unwrap();
        writeln!(file, "Ali,91,att").unwrap();

        let roster = load_roster_csv(file.path()).unwrap();
        assert_eq!(roster, vec![RosterRecord::new("Ali", 91, Position::Attacking)]);
    }
}

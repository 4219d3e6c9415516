// ⚖️ Team Balancer - Greedy split into two rating/position-balanced squads
//
// Single deterministic pass:
// resolve → group by position → stable sort by rating → assign per group
// in the order defensive → midfield → attacking → everywhere.

use crate::config::BalancerConfig;
use crate::resolver::IdentityResolver;
use crate::roster::{Position, RosterRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// RESOLVED PLAYER
// ============================================================================

/// One input name after lookup. Lives for a single balancing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPlayer {
    /// The name exactly as it was given
    pub query_name: String,

    /// None when the resolver found nobody
    pub record: Option<RosterRecord>,

    pub rating: u8,
    pub position: Position,
}

impl ResolvedPlayer {
    /// Unmatched names get `default_rating` and `Position::Everywhere`
    pub fn from_lookup(
        query_name: impl Into<String>,
        record: Option<RosterRecord>,
        default_rating: u8,
    ) -> Self {
        let (rating, position) = match &record {
            Some(r) => (r.rating, r.position),
            None => (default_rating, Position::Everywhere),
        };

        ResolvedPlayer {
            query_name: query_name.into(),
            record,
            rating,
            position,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.record.is_some()
    }

    /// Roster name when matched, otherwise the raw query
    pub fn display_name(&self) -> &str {
        self.record
            .as_ref()
            .map(|r| r.name.as_str())
            .unwrap_or(&self.query_name)
    }
}

// ============================================================================
// POSITION COUNTS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCounts {
    pub attacking: usize,
    pub midfield: usize,
    pub defensive: usize,
    pub everywhere: usize,
}

impl PositionCounts {
    pub fn get(&self, position: Position) -> usize {
        match position {
            Position::Attacking => self.attacking,
            Position::Midfield => self.midfield,
            Position::Defensive => self.defensive,
            Position::Everywhere => self.everywhere,
        }
    }

    fn increment(&mut self, position: Position) {
        match position {
            Position::Attacking => self.attacking += 1,
            Position::Midfield => self.midfield += 1,
            Position::Defensive => self.defensive += 1,
            Position::Everywhere => self.everywhere += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.attacking + self.midfield + self.defensive + self.everywhere
    }
}

// ============================================================================
// BALANCED TEAMS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancedTeams {
    /// Players in assignment order
    pub team_a: Vec<ResolvedPlayer>,
    pub team_b: Vec<ResolvedPlayer>,

    pub total_a: u32,
    pub total_b: u32,

    pub position_counts_a: PositionCounts,
    pub position_counts_b: PositionCounts,
}

impl BalancedTeams {
    pub fn player_count(&self) -> usize {
        self.team_a.len() + self.team_b.len()
    }

    /// Absolute rating gap between the two sides
    pub fn rating_difference(&self) -> u32 {
        self.total_a.abs_diff(self.total_b)
    }

    /// Input names that fell back to default rating/position
    pub fn unmatched(&self) -> Vec<&str> {
        self.team_a
            .iter()
            .chain(self.team_b.iter())
            .filter(|p| !p.is_matched())
            .map(|p| p.query_name.as_str())
            .collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "Team A: {} players, rating {} | Team B: {} players, rating {} | difference {}",
            self.team_a.len(),
            self.total_a,
            self.team_b.len(),
            self.total_b,
            self.rating_difference()
        )
    }
}

// ============================================================================
// TEAM BALANCER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Running state of the two squads while assigning
#[derive(Default)]
struct Draft {
    team_a: Vec<ResolvedPlayer>,
    team_b: Vec<ResolvedPlayer>,
    total_a: u32,
    total_b: u32,
    counts_a: PositionCounts,
    counts_b: PositionCounts,
}

impl Draft {
    fn push(&mut self, side: Side, player: ResolvedPlayer) {
        match side {
            Side::A => {
                self.total_a += u32::from(player.rating);
                self.counts_a.increment(player.position);
                self.team_a.push(player);
            }
            Side::B => {
                self.total_b += u32::from(player.rating);
                self.counts_b.increment(player.position);
                self.team_b.push(player);
            }
        }
    }

    fn finish(self) -> BalancedTeams {
        BalancedTeams {
            team_a: self.team_a,
            team_b: self.team_b,
            total_a: self.total_a,
            total_b: self.total_b,
            position_counts_a: self.counts_a,
            position_counts_b: self.counts_b,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamBalancer {
    config: BalancerConfig,
}

impl TeamBalancer {
    /// Create balancer with default squad size (6) and default rating (70)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BalancerConfig) -> Self {
        TeamBalancer { config }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Split `names` into two squads. `resolve` is called exactly once per
    /// name, in input order, before any assignment happens.
    pub fn balance<S, F>(&self, names: &[S], mut resolve: F) -> BalancedTeams
    where
        S: AsRef<str>,
        F: FnMut(&str) -> Option<RosterRecord>,
    {
        // 1. Resolve
        let mut remaining: Vec<ResolvedPlayer> = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                ResolvedPlayer::from_lookup(name, resolve(name), self.config.default_rating)
            })
            .collect();

        let mut draft = Draft::default();

        // 2-4. Group, sort, assign, one position at a time
        for position in Position::BALANCE_ORDER {
            let (mut group, rest): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|p| p.position == position);
            remaining = rest;

            // Stable: equal ratings keep input order
            group.sort_by(|a, b| b.rating.cmp(&a.rating));

            for player in group {
                let side = self.choose_side(&draft, position);
                draft.push(side, player);
            }
        }

        let teams = draft.finish();

        info!(
            players = teams.player_count(),
            unmatched = teams.unmatched().len(),
            total_a = teams.total_a,
            total_b = teams.total_b,
            "Teams balanced"
        );

        teams
    }

    /// `balance` with the identity resolver wired in as the lookup
    pub fn balance_with_roster<S: AsRef<str>>(
        &self,
        names: &[S],
        resolver: &IdentityResolver,
        roster: &[RosterRecord],
    ) -> BalancedTeams {
        self.balance(names, |name| resolver.find_best_match(name, roster).cloned())
    }

    /// Rules, first that applies wins:
    /// a. only A is full → B
    /// b. only B is full → A
    /// c/d. fewer of this position → that side
    /// e. lower (or equal) running total → that side, ties to A
    ///
    /// When both sides are full the cap rules no longer apply, so overflow
    /// beyond 2 × team_size is spread by rules c-e and a side can exceed the cap.
    fn choose_side(&self, draft: &Draft, position: Position) -> Side {
        let cap = self.config.team_size;
        let a_full = draft.team_a.len() >= cap;
        let b_full = draft.team_b.len() >= cap;

        if a_full && !b_full {
            return Side::B;
        }
        if b_full && !a_full {
            return Side::A;
        }

        let count_a = draft.counts_a.get(position);
        let count_b = draft.counts_b.get(position);

        if count_a < count_b {
            Side::A
        } else if count_b < count_a {
            Side::B
        } else if draft.total_a <= draft.total_b {
            Side::A
        } else {
            Side::B
        }
    }
}

/// Balance with default settings
pub fn balance_teams<S, F>(names: &[S], resolve: F) -> BalancedTeams
where
    S: AsRef<str>,
    F: FnMut(&str) -> Option<RosterRecord>,
{
    TeamBalancer::new().balance(names, resolve)
}

// ============================================================================
// NAME LIST PARSING
// ============================================================================

/// Split pasted or OCR'd text into player names.
///
/// Splits on newlines, commas and semicolons, strips bullets and list
/// numbering ("1.", "2)"), drops empty entries.
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.split(|c: char| c == '\n' || c == ',' || c == ';')
        .map(strip_list_marker)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(entry: &str) -> &str {
    let entry = entry
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•'))
        .trim_start();

    let digits_end = entry
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(entry.len());

    if digits_end > 0 {
        let rest = &entry[digits_end..];
        if let Some(stripped) = rest.strip_prefix(|c: char| c == '.' || c == ')') {
            return stripped.trim();
        }
    }

    entry
}

// ============================================================================
// TESTS
// ============================================================================

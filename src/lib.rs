// Squad Balancer - Core Library
// Name matching against a roster + greedy two-squad balancing.
// Shared by the CLI, the API server, and tests.

pub mod aliases;
pub mod similarity;
pub mod roster;
pub mod resolver;
pub mod balancer;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use aliases::{extract_aliases, split_aliases, ParsedName};
pub use similarity::{calculate_similarity, levenshtein_distance};
pub use roster::{
    Position, RosterRecord, RawRosterRecord,
    load_roster_csv, load_roster_from_reader,
    DEFAULT_RATING, MAX_RATING,
};
pub use resolver::{
    IdentityResolver, MatchCandidate, MatchStrategy, RosterMatch,
    resolve, find_best_match, find_all_matches,
};
pub use balancer::{
    TeamBalancer, BalancedTeams, ResolvedPlayer, PositionCounts,
    balance_teams, parse_name_list,
};
pub use config::{BalancerConfig, ResolverConfig, Settings};
pub use error::SquadError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 🔍 Identity Resolver - Match noisy names against the roster
// Four strategies, strict priority: Exact Name → Exact Alias → Substring → Fuzzy
//
// The first stage that yields a record wins. A looser stage is never
// consulted once a stricter one has matched.

use crate::config::ResolverConfig;
use crate::roster::RosterRecord;
use crate::similarity::calculate_similarity;
use serde::Serialize;
use tracing::debug;

// ============================================================================
// MATCH STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStrategy {
    /// Query equals the record name (case-insensitive)
    ExactName,

    /// Query equals one of the record's aliases (case-insensitive)
    ExactAlias,

    /// Record name contains the query, or the query contains the record name
    Substring,

    /// Lowest weighted edit distance, within the fuzzy threshold
    Fuzzy,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::ExactName => "exact_name",
            MatchStrategy::ExactAlias => "exact_alias",
            MatchStrategy::Substring => "substring",
            MatchStrategy::Fuzzy => "fuzzy",
        }
    }
}

// ============================================================================
// MATCH RESULTS
// ============================================================================

/// The winning record plus how it was found
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RosterMatch<'a> {
    pub record: &'a RosterRecord,
    pub strategy: MatchStrategy,

    /// 0.0 for exact and substring stages, weighted distance for fuzzy
    pub distance: f64,
}

/// A ranked candidate (lower distance = more similar)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchCandidate<'a> {
    pub record: &'a RosterRecord,
    pub distance: f64,
}

// ============================================================================
// IDENTITY RESOLVER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    config: ResolverConfig,
}

impl IdentityResolver {
    /// Create resolver with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        IdentityResolver { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a free-text name to its best roster record, or None
    pub fn find_best_match<'a>(
        &self,
        query: &str,
        roster: &'a [RosterRecord],
    ) -> Option<&'a RosterRecord> {
        self.match_query(query, roster).map(|m| m.record)
    }

    /// Like `find_best_match` but reports which strategy matched
    pub fn match_query<'a>(
        &self,
        query: &str,
        roster: &'a [RosterRecord],
    ) -> Option<RosterMatch<'a>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let query_lower = query.to_lowercase();

        let found = self
            .check_exact_name(&query_lower, roster)
            .or_else(|| self.check_exact_alias(&query_lower, roster))
            .or_else(|| self.check_substring(&query_lower, roster))
            .or_else(|| self.check_fuzzy(&query_lower, roster));

        match &found {
            Some(m) => debug!(
                query,
                matched = %m.record.name,
                strategy = m.strategy.as_str(),
                distance = m.distance,
                "Resolved name"
            ),
            None => debug!(query, "No roster match"),
        }

        found
    }

    /// Up to `limit` candidates within the configured candidate threshold
    pub fn find_all_matches<'a>(
        &self,
        query: &str,
        roster: &'a [RosterRecord],
        limit: usize,
    ) -> Vec<MatchCandidate<'a>> {
        self.find_all_matches_within(query, roster, limit, self.config.candidate_threshold)
    }

    /// Rank every record by its best weighted distance (name or alias), keep
    /// those at or under `threshold`, closest first. Ties keep roster order.
    pub fn find_all_matches_within<'a>(
        &self,
        query: &str,
        roster: &'a [RosterRecord],
        limit: usize,
        threshold: f64,
    ) -> Vec<MatchCandidate<'a>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();

        let mut candidates: Vec<MatchCandidate<'a>> = roster
            .iter()
            .map(|record| MatchCandidate {
                record,
                distance: self.record_distance(&query_lower, record),
            })
            .filter(|c| c.distance <= threshold)
            .collect();

        // sort_by is stable: equal distances stay in roster order
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        candidates.truncate(limit);
        candidates
    }

    /// Stage 1: Exact Name
    fn check_exact_name<'a>(
        &self,
        query_lower: &str,
        roster: &'a [RosterRecord],
    ) -> Option<RosterMatch<'a>> {
        roster
            .iter()
            .find(|record| record.name.to_lowercase() == query_lower)
            .map(|record| exact(record, MatchStrategy::ExactName))
    }

    /// Stage 2: Exact Alias
    fn check_exact_alias<'a>(
        &self,
        query_lower: &str,
        roster: &'a [RosterRecord],
    ) -> Option<RosterMatch<'a>> {
        roster
            .iter()
            .find(|record| {
                record
                    .aliases
                    .iter()
                    .any(|alias| alias.to_lowercase() == query_lower)
            })
            .map(|record| exact(record, MatchStrategy::ExactAlias))
    }

    /// Stage 3: Substring
    /// Handles truncated ("Moha") and prefixed ("Capt. Mohamed") names
    fn check_substring<'a>(
        &self,
        query_lower: &str,
        roster: &'a [RosterRecord],
    ) -> Option<RosterMatch<'a>> {
        roster
            .iter()
            .find(|record| {
                let name_lower = record.name.to_lowercase();
                // an empty name would be "contained" in every query
                !name_lower.is_empty()
                    && (name_lower.contains(query_lower) || query_lower.contains(&name_lower))
            })
            .map(|record| exact(record, MatchStrategy::Substring))
    }

    /// Stage 4: Fuzzy
    /// Lowest weighted distance wins; first in roster order on ties
    fn check_fuzzy<'a>(
        &self,
        query_lower: &str,
        roster: &'a [RosterRecord],
    ) -> Option<RosterMatch<'a>> {
        let mut best: Option<MatchCandidate<'a>> = None;

        for record in roster {
            let distance = self.record_distance(query_lower, record);
            let is_better = match &best {
                Some(current) => distance < current.distance,
                None => true,
            };
            if is_better {
                best = Some(MatchCandidate { record, distance });
            }
        }

        best.filter(|c| c.distance <= self.config.fuzzy_threshold)
            .map(|c| RosterMatch {
                record: c.record,
                strategy: MatchStrategy::Fuzzy,
                distance: c.distance,
            })
    }

    /// Best weighted distance across name and aliases
    fn record_distance(&self, query_lower: &str, record: &RosterRecord) -> f64 {
        let name_distance = weighted_distance(query_lower, &record.name, self.config.name_weight);

        record
            .aliases
            .iter()
            .map(|alias| weighted_distance(query_lower, alias, self.config.alias_weight))
            .fold(name_distance, f64::min)
    }
}

/// `1 - similarity * weight`: identical strings at full weight score 0.0,
/// lower weights push the same similarity further away
fn weighted_distance(query_lower: &str, candidate: &str, weight: f64) -> f64 {
    1.0 - calculate_similarity(query_lower, candidate) * weight
}

fn exact(record: &RosterRecord, strategy: MatchStrategy) -> RosterMatch<'_> {
    RosterMatch {
        record,
        strategy,
        distance: 0.0,
    }
}

// ============================================================================
// FREE FUNCTIONS (default thresholds)
// ============================================================================

/// Resolve `query` against `roster` with default thresholds
pub fn resolve<'a>(query: &str, roster: &'a [RosterRecord]) -> Option<&'a RosterRecord> {
    IdentityResolver::new().find_best_match(query, roster)
}

/// Alias of `resolve`, kept for collaborators that use this name
pub fn find_best_match<'a>(query: &str, roster: &'a [RosterRecord]) -> Option<&'a RosterRecord> {
    resolve(query, roster)
}

/// Ranked candidates for disambiguation UIs
pub fn find_all_matches<'a>(
    query: &str,
    roster: &'a [RosterRecord],
    limit: usize,
    threshold: f64,
) -> Vec<MatchCandidate<'a>> {
    IdentityResolver::new().find_all_matches_within(query, roster, limit, threshold)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Position;

    fn player(name: &str, aliases: &[&str]) -> RosterRecord {
        RosterRecord::new(name, 75, Position::Everywhere).with_aliases(aliases.iter().copied())
    }

    fn test_roster() -> Vec<RosterRecord> {
        vec![
            player("Mohamed", &["Mo", "Hamada"]),
            player("Karim", &["KB"]),
            player("Omar", &[]),
            player("Youssef", &["Joe"]),
        ]
    }

    #[test]
    fn test_exact_name_case_insensitive() {
        let roster = test_roster();
        let m = IdentityResolver::new().match_query("KARIM", &roster).unwrap();

        assert_eq!(m.record.name, "Karim");
        assert_eq!(m.strategy, MatchStrategy::ExactName);
        assert_eq!(m.distance, 0.0);
    }

    #[test]
    fn test_exact_alias() {
        let roster = test_roster();
        let m = IdentityResolver::new().match_query("hamada", &roster).unwrap();

        assert_eq!(m.record.name, "Mohamed");
        assert_eq!(m.strategy, MatchStrategy::ExactAlias);
    }

    #[test]
    fn test_alias_beats_closer_fuzzy_and_substring() {
        // "Moe" comes first and contains "mo", but the alias stage runs earlier
        let roster = vec![player("Moe", &[]), player("Mohamed", &["Mo"])];
        let m = IdentityResolver::new().match_query("mo", &roster).unwrap();

        assert_eq!(m.record.name, "Mohamed");
        assert_eq!(m.strategy, MatchStrategy::ExactAlias);
    }

    #[test]
    fn test_exact_name_beats_alias() {
        // "Joe" is both a name and someone else's alias
        let roster = vec![player("Youssef", &["Joe"]), player("Joe", &[])];
        let m = IdentityResolver::new().match_query("joe", &roster).unwrap();

        assert_eq!(m.record.name, "Joe");
        assert_eq!(m.strategy, MatchStrategy::ExactName);
    }

    #[test]
    fn test_substring_truncated_query() {
        let roster = test_roster();
        let m = IdentityResolver::new().match_query("Yous", &roster).unwrap();

        assert_eq!(m.record.name, "Youssef");
        assert_eq!(m.strategy, MatchStrategy::Substring);
    }

    #[test]
    fn test_substring_prefixed_query() {
        let roster = test_roster();
        let m = IdentityResolver::new().match_query("Capt. Omar", &roster).unwrap();

        assert_eq!(m.record.name, "Omar");
        assert_eq!(m.strategy, MatchStrategy::Substring);
    }

    #[test]
    fn test_substring_first_roster_order_wins() {
        let roster = vec![player("Ahmed Ali", &[]), player("Ahmed Samir", &[])];
        let m = IdentityResolver::new().match_query("ahmed", &roster).unwrap();
        assert_eq!(m.record.name, "Ahmed Ali");
    }

    #[test]
    fn test_fuzzy_typo() {
        let roster = test_roster();
        // one substitution over five letters → distance 0.2
        let m = IdentityResolver::new().match_query("Karin", &roster).unwrap();

        assert_eq!(m.record.name, "Karim");
        assert_eq!(m.strategy, MatchStrategy::Fuzzy);
        assert!((m.distance - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_accepts_exact_threshold() {
        // two substitutions over five letters → distance exactly 0.4
        let roster = vec![player("Karim", &[])];
        let m = IdentityResolver::new().match_query("Kaxym", &roster).unwrap();

        assert_eq!(m.record.name, "Karim");
        assert_eq!(m.strategy, MatchStrategy::Fuzzy);
        assert!((m.distance - 0.4).abs() < 1e-9);

        // three substitutions → 0.6, over the threshold
        assert!(IdentityResolver::new().match_query("Kxyzm", &roster).is_none());
    }

    #[test]
    fn test_fuzzy_alias_is_penalized() {
        // "Hamadi" vs alias "Hamada": similarity 5/6, weighted 0.8 → distance 1/3
        let roster = test_roster();
        let m = IdentityResolver::new().match_query("Hamadi", &roster).unwrap();

        assert_eq!(m.record.name, "Mohamed");
        assert_eq!(m.strategy, MatchStrategy::Fuzzy);
        assert!((m.distance - (1.0 - (5.0 / 6.0) * 0.8)).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_rejects_beyond_threshold() {
        let roster = test_roster();
        assert!(IdentityResolver::new().match_query("Zzzzzz", &roster).is_none());
    }

    #[test]
    fn test_custom_threshold() {
        let roster = test_roster();
        let strict = IdentityResolver::with_config(ResolverConfig {
            fuzzy_threshold: 0.1,
            ..ResolverConfig::default()
        });
        assert!(strict.find_best_match("Karin", &roster).is_none());
    }

    #[test]
    fn test_empty_query() {
        let roster = test_roster();
        assert!(resolve("", &roster).is_none());
        assert!(resolve("   ", &roster).is_none());
    }

    #[test]
    fn test_empty_roster() {
        assert!(resolve("Karim", &[]).is_none());
        assert!(find_all_matches("Karim", &[], 5, 0.6).is_empty());
    }

    #[test]
    fn test_query_is_trimmed() {
        let roster = test_roster();
        assert_eq!(resolve("  omar ", &roster).map(|r| r.name.as_str()), Some("Omar"));
    }

    #[test]
    fn test_find_best_match_free_fn() {
        let roster = test_roster();
        assert_eq!(find_best_match("kb", &roster).unwrap().name, "Karim");
    }

    #[test]
    fn test_find_all_matches_ranked() {
        let roster = vec![
            player("Omar", &[]),
            player("Omer", &[]),
            player("Amr", &[]),
            player("Karim", &[]),
        ];
        let matches = find_all_matches("omar", &roster, 10, 0.6);
        let names: Vec<&str> = matches.iter().map(|c| c.record.name.as_str()).collect();

        // Omar 0.0, Omer 0.25, Amr 0.5; Karim is too far
        assert_eq!(names, vec!["Omar", "Omer", "Amr"]);
        assert_eq!(matches[0].distance, 0.0);
    }

    #[test]
    fn test_find_all_matches_limit() {
        let roster = vec![player("Omar", &[]), player("Omer", &[]), player("Amr", &[])];
        let matches = IdentityResolver::new().find_all_matches("omar", &roster, 2);
        assert_eq!(matches.len(), 2);
        assert!(IdentityResolver::new().find_all_matches("omar", &roster, 0).is_empty());
    }

    #[test]
    fn test_find_all_matches_ties_keep_roster_order() {
        let roster = vec![player("Omer", &[]), player("Omir", &[])];
        let matches = find_all_matches("omar", &roster, 5, 0.6);
        assert_eq!(matches[0].record.name, "Omer");
        assert_eq!(matches[1].record.name, "Omir");
    }
}

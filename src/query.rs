use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::FilterError;
use crate::table::{FlatRow, FlatTable};

/// Column a ranked table is sorted by, always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    TotalRequests,
    Ok,
    Ko,
    MeanResponseTime,
    Name,
}

impl SortKey {
    pub fn name(self) -> &'static str {
        match self {
            SortKey::TotalRequests => "total",
            SortKey::Ok => "ok",
            SortKey::Ko => "ko",
            SortKey::MeanResponseTime => "mean",
            SortKey::Name => "name",
        }
    }

    fn compare(self, a: &FlatRow, b: &FlatRow) -> Ordering {
        match self {
            SortKey::TotalRequests => a.total.cmp(&b.total),
            SortKey::Ok => a.ok.cmp(&b.ok),
            SortKey::Ko => a.ko.cmp(&b.ko),
            SortKey::MeanResponseTime => a.mean_response_time.cmp(&b.mean_response_time),
            SortKey::Name => a.name.cmp(&b.name),
        }
    }
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" => Ok(SortKey::TotalRequests),
            "ok" => Ok(SortKey::Ok),
            "ko" => Ok(SortKey::Ko),
            "mean" => Ok(SortKey::MeanResponseTime),
            "name" => Ok(SortKey::Name),
            other => Err(FilterError::UnknownSortKey(other.to_string())),
        }
    }
}

/// How the name filter is compared. Case-sensitive unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    CaseSensitive,
    /// Both sides lowercased before the containment check.
    IgnoreCase,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Substring the row name must contain. Empty keeps every row.
    pub filter: String,
    pub sort_by: SortKey,
    pub match_mode: MatchMode,
}

impl Query {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Self::default()
        }
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_by = key;
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    fn matches(&self, name: &str) -> bool {
        match self.match_mode {
            MatchMode::CaseSensitive => name.contains(self.filter.as_str()),
            MatchMode::IgnoreCase => name
                .to_lowercase()
                .contains(self.filter.to_lowercase().as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow {
    /// 1-based, dense.
    pub rank: usize,
    pub row: FlatRow,
}

/// Filters by name and sorts ascending by `query.sort_by`.
///
/// The sort is stable, so rows with equal keys keep their table order.
pub fn rank(table: &FlatTable, query: &Query) -> Vec<RankedRow> {
    let mut rows: Vec<&FlatRow> = table
        .rows
        .iter()
        .filter(|r| query.matches(&r.name))
        .collect();
    rows.sort_by(|a, b| query.sort_by.compare(a, b));
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| RankedRow {
            rank: i + 1,
            row: row.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(run: &str, name: &str, total: u64, mean: u64) -> FlatRow {
        FlatRow {
            run: run.to_string(),
            request: name.to_string(),
            name: name.to_string(),
            total,
            ok: total,
            ko: 0,
            mean_response_time: mean,
        }
    }

    fn table(rows: Vec<FlatRow>) -> FlatTable {
        FlatTable {
            rows,
            dropped: Vec::new(),
        }
    }

    #[test]
    fn test_filter_and_rank_by_total() {
        let t = table(vec![
            row("run-2", "req_login", 500, 410),
            row("run-1", "req_login", 100, 230),
            row("run-1", "req_search", 50, 90),
        ]);
        let ranked = rank(&t, &Query::new("login"));
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].rank, ranked[0].row.total), (1, 100));
        assert_eq!((ranked[1].rank, ranked[1].row.total), (2, 500));
    }

    #[test]
    fn test_filter_is_case_sensitive_by_default() {
        let t = table(vec![row("r", "Login", 1, 1), row("r", "login", 2, 1)]);
        let ranked = rank(&t, &Query::new("login"));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].row.name, "login");

        let ranked = rank(&t, &Query::new("LOGIN").match_mode(MatchMode::IgnoreCase));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_empty_filter_keeps_all_rows() {
        let t = table(vec![row("r", "a", 3, 1), row("r", "b", 1, 1), row("r", "c", 2, 1)]);
        let ranked = rank(&t, &Query::default());
        let totals: Vec<u64> = ranked.iter().map(|r| r.row.total).collect();
        assert_eq!(totals, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let t = table(vec![
            row("run-1", "x", 10, 5),
            row("run-2", "x", 5, 5),
            row("run-3", "x", 10, 5),
            row("run-4", "x", 10, 5),
        ]);
        let ranked = rank(&t, &Query::new("x"));
        let runs: Vec<&str> = ranked.iter().map(|r| r.row.run.as_str()).collect();
        assert_eq!(runs, vec!["run-2", "run-1", "run-3", "run-4"]);
    }

    #[test]
    fn test_ranks_are_dense_and_one_based() {
        let t = table((0..7).map(|i| row("r", "n", (i * 3) % 4, 1)).collect());
        let ranked = rank(&t, &Query::new("n"));
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_by_mean_and_name() {
        let t = table(vec![row("r", "b", 1, 30), row("r", "a", 2, 10), row("r", "c", 3, 20)]);
        let by_mean = rank(&t, &Query::default().sort_by(SortKey::MeanResponseTime));
        let names: Vec<&str> = by_mean.iter().map(|r| r.row.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);

        let by_name = rank(&t, &Query::default().sort_by("name".parse().unwrap()));
        assert_eq!(by_name[0].row.name, "a");
        assert_eq!(by_name[2].row.name, "c");
    }

    #[test]
    fn test_unknown_sort_key_is_filter_error() {
        let err = "p99".parse::<SortKey>().unwrap_err();
        assert_eq!(err, FilterError::UnknownSortKey("p99".to_string()));
        assert_eq!("mean".parse::<SortKey>().unwrap().name(), "mean");
    }

    #[test]
    fn test_no_match_gives_empty_table() {
        let t = table(vec![row("r", "a", 1, 1)]);
        assert!(rank(&t, &Query::new("zzz")).is_empty());
    }
}

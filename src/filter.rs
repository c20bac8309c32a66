use crate::config::ReportConfig;
use crate::metrics::{group_by_set, SetAverages, SetGroups, SetKey};
use crate::models::disk::Disk;
use std::cmp::Ordering;
use tracing::debug;

/// Predicates selected for one report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub scanning_only: bool,
    pub failed_only:   bool,
    pub low_space:     Option<f64>,
    pub min_bad_disks: Option<usize>,
}

impl Filters {
    pub fn from_config(cfg: &ReportConfig) -> Self {
        Filters {
            scanning_only: cfg.scanning,
            failed_only:   cfg.failed,
            low_space:     cfg.low_space,
            min_bad_disks: cfg.min_bad_disks,
        }
    }

    fn keeps(&self, d: &Disk) -> bool {
        if self.scanning_only && !d.scanning { return false; }
        if self.failed_only && d.is_ok() { return false; }
        true
    }
}

/// One erasure-set row of a summary listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SetSummary {
    pub key:   SetKey,
    pub stats: SetAverages,
}

/// Two scopes over the same disks: `all` for set-level context and `shown`
/// for what the tables display.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub filters: Filters,
    pub all:     SetGroups<'a>,
    pub shown:   SetGroups<'a>,
}

impl<'a> View<'a> {
    pub fn build(disks: &'a [Disk], filters: &Filters) -> Self {
        let all   = group_by_set(disks);
        let shown = group_by_set(disks.iter().filter(|d| filters.keeps(d)));
        debug!(
            sets = all.len(),
            shown_sets = shown.len(),
            shown_disks = shown.values().map(Vec::len).sum::<usize>(),
            "filters applied"
        );
        View { filters: filters.clone(), all, shown }
    }

    /// Displayed disks in table order.
    pub fn disk_rows(&self) -> Vec<&'a Disk> {
        let mut rows: Vec<&'a Disk> = self.shown.values().flatten().copied().collect();
        rows.sort_by(|a, b| a.position_cmp(b));
        rows
    }

    /// Erasure-set rows for the summary table, ordered by `(pool, set)`.
    ///
    /// Under failed-only the counts cover the failed members only; under
    /// scanning-only they cover the scanning members only.
    pub fn set_summaries(&self) -> Vec<SetSummary> {
        let f = &self.filters;
        let mut rows = Vec::new();

        for (key, members) in &self.all {
            let scope: Vec<&Disk> = if f.failed_only {
                members.iter().copied().filter(|d| !d.is_ok()).collect()
            } else if f.scanning_only {
                members.iter().copied().filter(|d| d.scanning).collect()
            } else {
                members.clone()
            };
            if scope.is_empty() { continue; }

            let stats = SetAverages::compute(&scope);
            if let Some(k) = f.min_bad_disks {
                if stats.bad < k { continue; }
            }
            rows.push(SetSummary { key: *key, stats });
        }
        rows
    }

    /// Displayed sets whose average free space is below `threshold`, worst
    /// utilization first.
    pub fn low_space_sets(&self, threshold: f64) -> Vec<SetSummary> {
        let mut rows: Vec<SetSummary> = self.shown.iter()
            .map(|(key, members)| SetSummary { key: *key, stats: SetAverages::compute(members) })
            .filter(|s| s.stats.free_pct < threshold)
            .collect();
        rows.sort_by(|a, b| {
            b.stats.used_pct.partial_cmp(&a.stats.used_pct)
                .unwrap_or(Ordering::Equal)
                .then(a.key.cmp(&b.key))
        });
        rows
    }
}

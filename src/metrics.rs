//! Derived statistics. Every function here is a pure reduction over a disk
//! collection.
//!
//! Cluster and pool figures take the canonical `&[Disk]` slice so that no
//! display filter can reach them; erasure-set figures take whatever
//! `SetGroups` scope the caller built.

use crate::models::cluster::PoolIndex;
use crate::models::disk::{clamp_wide, pct, total, Disk};
use std::collections::BTreeMap;

/// Identity of an erasure set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetKey {
    pub pool: i64,
    pub set:  i64,
}

impl SetKey {
    pub fn of(d: &Disk) -> Self {
        SetKey { pool: d.pool_index, set: d.set_index }
    }
}

/// Disks bucketed by erasure set, ordered by `(pool, set)`.
pub type SetGroups<'a> = BTreeMap<SetKey, Vec<&'a Disk>>;

pub fn group_by_set<'a, I>(disks: I) -> SetGroups<'a>
where
    I: IntoIterator<Item = &'a Disk>,
{
    let mut groups: SetGroups<'a> = BTreeMap::new();
    for d in disks {
        groups.entry(SetKey::of(d)).or_default().push(d);
    }
    groups
}

// ── Erasure-set averages ──────────────────────────────────────────────

/// Aggregate view of one erasure set over a given member scope.
#[derive(Debug, Clone, PartialEq)]
pub struct SetAverages {
    pub members:         usize,
    pub good:            usize,
    pub bad:             usize,
    pub scanning:        usize,
    pub avg_total:       i64,
    pub avg_used:        i64,
    pub avg_available:   i64,
    pub avg_used_inodes: i64,
    pub avg_free_inodes: i64,
    pub used_pct:        f64,
    pub free_pct:        f64,
    pub inode_used_pct:  f64,
}

impl SetAverages {
    /// Space and inode fields are integer means; the percentages are taken
    /// from those means, not averaged per disk.
    pub fn compute(disks: &[&Disk]) -> Self {
        let n = disks.len() as i128;
        let mean = |f: fn(&Disk) -> i64| -> i64 {
            if n == 0 { return 0; }
            clamp_wide(disks.iter().map(|d| i128::from(f(d))).sum::<i128>() / n)
        };

        let avg_total       = mean(|d| d.total_space);
        let avg_used        = mean(|d| d.used_space);
        let avg_available   = mean(|d| d.available_space);
        let avg_used_inodes = mean(|d| d.used_inodes);
        let avg_free_inodes = mean(|d| d.free_inodes);
        let good = disks.iter().filter(|d| d.is_ok()).count();

        SetAverages {
            members:  disks.len(),
            good,
            bad:      disks.len() - good,
            scanning: disks.iter().filter(|d| d.scanning).count(),
            avg_total,
            avg_used,
            avg_available,
            avg_used_inodes,
            avg_free_inodes,
            used_pct:       pct(avg_used, avg_total),
            free_pct:       pct(avg_available, avg_total),
            inode_used_pct: pct(avg_used_inodes, avg_used_inodes.saturating_add(avg_free_inodes)),
        }
    }
}

// ── Erasure-coded capacity ────────────────────────────────────────────

/// Data share of an `n`-disk set that reserves `parity` disks. Sets that
/// cannot hold the configured parity contribute nothing.
pub fn usable_ratio(n: usize, parity: usize) -> f64 {
    if n == 0 || n < parity { return 0.0; }
    (n - parity) as f64 / n as f64
}

/// `floor(total * ratio)` for one disk.
pub fn disk_usable(total: i64, ratio: f64) -> i64 {
    (total as f64 * ratio).floor() as i64
}

fn set_usable(disks: &[&Disk], parity: usize) -> i64 {
    let ratio = usable_ratio(disks.len(), parity);
    total(disks.iter().map(|d| disk_usable(d.total_space, ratio)))
}

pub fn usable_capacity(groups: &SetGroups, parity: usize) -> i64 {
    total(groups.values().map(|disks| set_usable(disks, parity)))
}

pub fn pool_usable_capacity(groups: &SetGroups, pool: i64, parity: usize) -> i64 {
    total(groups.iter()
        .filter(|(k, _)| k.pool == pool)
        .map(|(_, disks)| set_usable(disks, parity)))
}

/// Used space against usable capacity; 0 when nothing is usable.
pub fn usage_pct(used: i64, usable: i64) -> f64 {
    if usable <= 0 { return 0.0; }
    used as f64 / usable as f64 * 100.0
}

pub fn health_pct(ok: usize, total: usize) -> f64 {
    if total == 0 { return 0.0; }
    ok as f64 / total as f64 * 100.0
}

// ── Cluster / pool ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStats {
    pub total_disks:    usize,
    pub scanning_disks: usize,
    pub ok_disks:       usize,
    pub bad_disks:      usize,
    pub total_space:    i64,
    pub used_space:     i64,
    pub usable_space:   i64,
    pub deployment_id:  Option<String>,
    pub parity_disks:   usize,
}

impl ClusterStats {
    pub fn compute(disks: &[Disk], parity_disks: usize, deployment_id: Option<String>) -> Self {
        let ok_disks = disks.iter().filter(|d| d.is_ok()).count();
        ClusterStats {
            total_disks:    disks.len(),
            scanning_disks: disks.iter().filter(|d| d.scanning).count(),
            ok_disks,
            bad_disks:      disks.len() - ok_disks,
            total_space:    total(disks.iter().map(|d| d.total_space)),
            used_space:     total(disks.iter().map(|d| d.used_space)),
            usable_space:   usable_capacity(&group_by_set(disks), parity_disks),
            deployment_id,
            parity_disks,
        }
    }

    pub fn health_pct(&self) -> f64 {
        health_pct(self.ok_disks, self.total_disks)
    }

    pub fn usage_pct(&self) -> f64 {
        usage_pct(self.used_space, self.usable_space)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolStats {
    pub pool:           i64,
    pub erasure_sets:   usize,
    pub total_disks:    usize,
    pub ok_disks:       usize,
    pub bad_disks:      usize,
    pub scanning_disks: usize,
    pub total_space:    i64,
    pub used_space:     i64,
    pub usable_space:   i64,
}

impl PoolStats {
    /// One entry per observed pool, ascending.
    pub fn compute_all(disks: &[Disk], parity_disks: usize) -> Vec<Self> {
        let index  = PoolIndex::from_disks(disks);
        let groups = group_by_set(disks);
        index.pools().map(|pool| {
            let members: Vec<&Disk> = disks.iter().filter(|d| d.pool_index == pool).collect();
            let ok = members.iter().filter(|d| d.is_ok()).count();
            PoolStats {
                pool,
                erasure_sets:   index.sets_in_pool(pool),
                total_disks:    members.len(),
                ok_disks:       ok,
                bad_disks:      members.len() - ok,
                scanning_disks: members.iter().filter(|d| d.scanning).count(),
                total_space:    total(members.iter().map(|d| d.total_space)),
                used_space:     total(members.iter().map(|d| d.used_space)),
                usable_space:   pool_usable_capacity(&groups, pool, parity_disks),
            }
        })
        .collect()
    }

    pub fn health_pct(&self) -> f64 {
        health_pct(self.ok_disks, self.total_disks)
    }

    pub fn usage_pct(&self) -> f64 {
        usage_pct(self.used_space, self.usable_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{self, Severity};
    use crate::models::disk::test_disk;

    const GB: i64 = 1 << 30;

    fn sized(pool: i64, set: i64, idx: i64, total: i64, used: i64) -> Disk {
        let mut d = test_disk(pool, set, idx);
        d.total_space = total;
        d.used_space = used;
        d.available_space = total - used;
        d
    }

    #[test]
    fn usable_ratio_edges() {
        assert_eq!(usable_ratio(1, 2), 0.0);
        assert_eq!(usable_ratio(2, 2), 0.0);
        assert_eq!(usable_ratio(4, 2), 0.5);
        assert_eq!(usable_ratio(16, 4), 0.75);
        assert_eq!(usable_ratio(0, 0), 0.0);
    }

    #[test]
    fn undersized_set_contributes_nothing() {
        let disks = vec![sized(0, 0, 0, 100 * GB, 0)];
        assert_eq!(usable_capacity(&group_by_set(&disks), 2), 0);
    }

    #[test]
    fn usable_capacity_floors_per_disk() {
        // ratio 2/3 of 10 bytes = 6.67 → 6, three times
        let disks: Vec<Disk> = (0..3).map(|i| sized(0, 0, i, 10, 0)).collect();
        assert_eq!(usable_capacity(&group_by_set(&disks), 1), 18);
    }

    #[test]
    fn two_pool_cluster_is_full() {
        let disks: Vec<Disk> = (0..2)
            .flat_map(|pool| (0..4).map(move |i| sized(pool, 0, i, 100 * GB, 50 * GB)))
            .collect();
        let stats = ClusterStats::compute(&disks, 2, None);
        assert_eq!(stats.usable_space, 400 * GB);
        assert_eq!(stats.used_space, 400 * GB);
        assert_eq!(stats.usage_pct(), 100.0);
        assert_eq!(classify::used(stats.usage_pct()), Severity::Critical);
        assert_eq!(stats.health_pct(), 100.0);

        let pools = PoolStats::compute_all(&disks, 2);
        assert_eq!(pools.len(), 2);
        for p in &pools {
            assert_eq!(p.usable_space, 200 * GB);
            assert_eq!(p.erasure_sets, 1);
            assert_eq!(p.usage_pct(), 100.0);
        }
    }

    #[test]
    fn percentages_are_zero_for_empty_inputs() {
        assert_eq!(usage_pct(10, 0), 0.0);
        assert_eq!(health_pct(0, 0), 0.0);
        let stats = ClusterStats::compute(&[], 2, None);
        assert_eq!(stats.health_pct(), 0.0);
        assert_eq!(stats.usage_pct(), 0.0);
    }

    #[test]
    fn set_average_uses_mean_totals_not_mean_percentages() {
        let disks = vec![sized(0, 0, 0, 100, 50), sized(0, 0, 1, 300, 0)];
        let refs: Vec<&Disk> = disks.iter().collect();
        let avg = SetAverages::compute(&refs);

        let mean_of_pcts = disks.iter().map(|d| d.used_space_pct()).sum::<f64>() / 2.0;
        assert_eq!(mean_of_pcts, 25.0);
        assert_eq!(avg.avg_total, 200);
        assert_eq!(avg.avg_used, 25);
        assert_eq!(avg.used_pct, 12.5);
        assert_ne!(avg.used_pct, mean_of_pcts);
    }

    #[test]
    fn set_average_truncates_integer_means() {
        let disks = vec![sized(0, 0, 0, 3, 1), sized(0, 0, 1, 4, 2)];
        let refs: Vec<&Disk> = disks.iter().collect();
        let avg = SetAverages::compute(&refs);
        assert_eq!(avg.avg_total, 3);
        assert_eq!(avg.avg_used, 1);
        assert_eq!(avg.avg_available, 2);
    }

    #[test]
    fn set_counts_follow_state_and_scanning() {
        let mut disks = vec![sized(0, 0, 0, 10, 1), sized(0, 0, 1, 10, 1), sized(0, 0, 2, 10, 1)];
        disks[1].state = "faulty".into();
        disks[1].scanning = true;
        disks[2].scanning = true;
        let refs: Vec<&Disk> = disks.iter().collect();
        let avg = SetAverages::compute(&refs);
        assert_eq!((avg.good, avg.bad, avg.scanning), (2, 1, 2));

        let stats = ClusterStats::compute(&disks, 2, Some("dep".into()));
        assert_eq!((stats.ok_disks, stats.bad_disks, stats.scanning_disks), (2, 1, 2));
    }

    #[test]
    fn empty_set_average_is_zero() {
        let avg = SetAverages::compute(&[]);
        assert_eq!(avg.members, 0);
        assert_eq!(avg.used_pct, 0.0);
        assert_eq!(avg.free_pct, 0.0);
    }

    #[test]
    fn huge_counters_clamp_instead_of_wrapping() {
        let big = i64::MAX / 2 + 1;
        let disks: Vec<Disk> = (0..4).map(|i| sized(0, 0, i, big, big / 2)).collect();

        let stats = ClusterStats::compute(&disks, 2, None);
        assert_eq!(stats.total_space, i64::MAX);
        assert_eq!(stats.used_space, i64::MAX);
        assert_eq!(stats.usable_space, i64::MAX);
        assert_eq!(stats.usage_pct(), 100.0);

        let pools = PoolStats::compute_all(&disks, 2);
        assert_eq!(pools[0].total_space, i64::MAX);

        let refs: Vec<&Disk> = disks.iter().collect();
        let avg = SetAverages::compute(&refs);
        assert_eq!(avg.avg_total, big);
        assert_eq!(avg.avg_used, big / 2);
        assert_eq!(avg.used_pct, 50.0);
    }
}

use crate::classify::{self, Severity};
use crate::config::{ReportConfig, ReportMode};
use crate::filter::{Filters, SetSummary, View};
use crate::metrics::{ClusterStats, PoolStats};
use crate::models::cluster::{Cluster, ServerInfo};
use crate::models::disk::{Disk, DiskMetrics};
use crate::util::doc::{Doc, Segment, Tone};
use crate::util::human::{fmt_bytes, fmt_gb, fmt_pct, fmt_tb, fmt_thousands, fmt_uptime, yes_no};
use crate::util::table::{cell, styled, Cell, Table};
use tracing::debug;

const RULE_WIDTH: usize = 80;
const UUID_WIDTH: usize = 16;

/// Build the full report for one run: the summary blocks, which never see
/// the display filters, followed by the one detail section the
/// configuration selects.
pub fn generate(cluster: &Cluster, cfg: &ReportConfig) -> Doc {
    let mut doc = summary(cluster);
    let view = View::build(&cluster.disks, &Filters::from_config(cfg));
    let mode = cfg.mode();
    debug!(?mode, "rendering detail section");

    match mode {
        ReportMode::Disks => {
            servers_section(&mut doc, cluster);
            drives_section(&mut doc, &view);
        }
        ReportMode::Sets => {
            servers_section(&mut doc, cluster);
            sets_section(&mut doc, &view);
        }
        ReportMode::FailedDisks  => failed_section(&mut doc, &view, cfg),
        ReportMode::LowSpace(t)  => low_space_section(&mut doc, &view, t),
    }
    doc
}

/// Banner, cluster summary and pool summary.
pub fn summary(cluster: &Cluster) -> Doc {
    let stats = ClusterStats::compute(&cluster.disks, cluster.parity_disks, cluster.deployment_id.clone());
    let pools = PoolStats::compute_all(&cluster.disks, cluster.parity_disks);

    let mut doc = Doc::new();
    doc.heading(format!("Detected Erasure Coding Configuration: EC:{}", stats.parity_disks));
    doc.blank();
    cluster_section(&mut doc, cluster, &stats);
    pool_section(&mut doc, &pools);
    doc
}

// ── Summary blocks ────────────────────────────────────────────────────

fn cluster_section(doc: &mut Doc, cluster: &Cluster, stats: &ClusterStats) {
    doc.heading("Summary");
    doc.text(format!(
        "  Deployment ID: {}",
        stats.deployment_id.as_deref().unwrap_or("Not available")
    ));
    if let Some(b) = cluster.backend.as_ref().filter(|b| !b.total_sets.is_empty()) {
        doc.text(format!(
            "  Backend: totalSets={}, standardSCParity={}, rrSCParity={}, drivesPerSet={}",
            bracket_list(&b.total_sets), b.standard_sc_parity, b.rr_sc_parity, bracket_list(&b.drives_per_set)
        ));
    }
    doc.blank();

    doc.text(format!("  Total Disks: {}", stats.total_disks));
    labelled(doc, "  Scanning Disks: ", stats.scanning_disks.to_string(), Severity::Warning);
    labelled(doc, "  Healthy Disks: ", stats.ok_disks.to_string(), Severity::Healthy);
    labelled(doc, "  Problem Disks: ", stats.bad_disks.to_string(), Severity::Critical);
    if stats.total_disks > 0 {
        let h = stats.health_pct();
        labelled(doc, "  Health: ", fmt_pct(h), classify::health(h));
    }

    if stats.total_space > 0 {
        let u = stats.usage_pct();
        doc.text(format!("  Raw Capacity: {}", fmt_tb(stats.total_space)));
        doc.text(format!("  Usable Capacity: {}", fmt_tb(stats.usable_space)));
        doc.push(vec![
            Segment::plain(format!("  Used Space: {} (", fmt_tb(stats.used_space))),
            Segment::level(fmt_pct(u), classify::used(u)),
            Segment::plain(")"),
        ]);
        doc.text(format!("  Available Space: {}", fmt_tb(stats.usable_space.saturating_sub(stats.used_space))));
    }

    doc.text(format!("  Pools: {}", cluster.pools.pool_count()));
    doc.text(format!("  Servers: {}", cluster.servers.len()));
    doc.text(format!("  Erasure Sets: {}", cluster.pools.set_count()));

    let s = &cluster.scanner;
    doc.text(format!(
        "  Scanner Status: buckets={}, objects={}, versions={}, deletemarkers={}, usage={}",
        s.buckets, s.objects, s.versions, s.delete_markers, fmt_bytes(s.usage_bytes)
    ));
    doc.blank();
}

fn pool_section(doc: &mut Doc, pools: &[PoolStats]) {
    if pools.is_empty() { return; }
    doc.heading("Pool Summary");
    for p in pools {
        let h = p.health_pct();
        let u = p.usage_pct();
        doc.push(vec![Segment::new(format!("  Pool {}:", p.pool), Tone::Accent)]);
        doc.text(format!("    Erasure Sets: {}", p.erasure_sets));
        doc.push(vec![
            Segment::plain(format!("    Disks: {} total (", p.total_disks)),
            Segment::level(format!("{} ok", p.ok_disks), Severity::Healthy),
            Segment::plain(", "),
            Segment::level(format!("{} bad", p.bad_disks), Severity::Critical),
            Segment::plain(", "),
            Segment::level(format!("{} scanning", p.scanning_disks), Severity::Warning),
            Segment::plain(")"),
        ]);
        labelled(doc, "    Health: ", fmt_pct(h), classify::health(h));
        doc.text(format!("    Raw Capacity: {}", fmt_tb(p.total_space)));
        doc.text(format!("    Usable Capacity: {}", fmt_tb(p.usable_space)));
        doc.push(vec![
            Segment::plain(format!("    Usage: {} (", fmt_tb(p.used_space))),
            Segment::level(fmt_pct(u), classify::used(u)),
            Segment::plain(")"),
        ]);
        doc.text(format!("    Available: {}", fmt_tb(p.usable_space.saturating_sub(p.used_space))));
        doc.blank();
    }
}

// ── Detail sections ───────────────────────────────────────────────────

fn servers_section(doc: &mut Doc, cluster: &Cluster) {
    doc.heading("Servers");
    if cluster.servers.is_empty() {
        doc.blank();
        return;
    }
    let mut t = Table::new(&[
        "Pool", "Server", "State", "Edition", "Version", "Commit ID", "Memory", "ILM Status", "Uptime",
    ]);
    for s in &cluster.servers {
        t.row(server_row(s));
    }
    doc.extend(t.render());
    doc.blank();
}

fn server_row(s: &ServerInfo) -> Vec<Cell> {
    let pools = if s.pools.is_empty() {
        "N/A".to_string()
    } else {
        s.pools.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(",")
    };
    let uptime = if s.is_offline() { "N/A".to_string() } else { fmt_uptime(s.uptime_secs) };
    vec![
        cell(pools),
        cell(s.name.as_str()),
        styled(s.state.as_str(), Tone::Level(classify::state(!s.is_offline()))),
        cell(s.edition.as_str()),
        cell(s.version.as_str()),
        cell(s.commit_id.as_str()),
        cell(fmt_bytes(s.mem_alloc)),
        cell(s.ilm_expiry.to_string()),
        cell(uptime),
    ]
}

fn drives_section(doc: &mut Doc, view: &View) {
    let rows = view.disk_rows();
    if rows.is_empty() {
        if view.filters.scanning_only {
            doc.notice("No scanning disks found in the provided data.");
        } else {
            doc.notice("No matching disks found in the provided data.");
        }
        return;
    }
    doc.heading("Drives");
    doc.extend(disk_table(&rows).render());
    doc.blank();
}

fn failed_section(doc: &mut Doc, view: &View, cfg: &ReportConfig) {
    let rows = view.disk_rows();
    if rows.is_empty() {
        doc.notice("No failed/faulty disks found in the provided data.");
        return;
    }
    doc.heading(format!("MinIO Failed/Faulty Disks from: {}", cfg.json_file.display()));
    doc.text("=".repeat(RULE_WIDTH));
    doc.extend(disk_table(&rows).render());
    doc.blank();
}

fn sets_section(doc: &mut Doc, view: &View) {
    let sets = view.set_summaries();
    if sets.is_empty() {
        doc.notice("No matching erasure sets found.");
        return;
    }
    doc.heading("Erasure Sets");
    let mut t = Table::new(&[
        "Pool", "Erasure Set", "Good Disks", "Bad Disks", "Scanning",
        "Avg Space Used", "Avg Free Space", "Avg Inodes Used",
    ]);
    for s in &sets {
        let st = &s.stats;
        t.row(vec![
            styled(s.key.pool.to_string(), Tone::Accent),
            styled(s.key.set.to_string(), Tone::Accent),
            count_cell(st.good, Severity::Healthy),
            count_cell(st.bad, Severity::Critical),
            count_cell(st.scanning, Severity::Warning),
            styled(fmt_pct(st.used_pct), Tone::Level(classify::used(st.used_pct))),
            styled(fmt_pct(st.free_pct), Tone::Level(classify::free(st.free_pct))),
            styled(fmt_pct(st.inode_used_pct), Tone::Level(classify::used(st.inode_used_pct))),
        ]);
    }
    doc.extend(t.render());
    doc.blank();
}

fn low_space_section(doc: &mut Doc, view: &View, threshold: f64) {
    let sets = view.low_space_sets(threshold);
    if sets.is_empty() {
        doc.notice(format!(
            "No erasure sets found with average free space less than {:.1}%.",
            threshold
        ));
        return;
    }
    doc.heading(format!(
        "Erasure Sets with Average Free Space < {:.1}% (sorted by utilization)",
        threshold
    ));
    doc.text("=".repeat(RULE_WIDTH));
    for s in &sets {
        doc.push(low_space_line(s));
    }
}

fn low_space_line(s: &SetSummary) -> Vec<Segment> {
    let st = &s.stats;
    let mut line = vec![Segment::plain(format!(
        "  Pool {}, Erasure Set {}: Good disks: ",
        s.key.pool, s.key.set
    ))];
    line.extend(count_cell(st.good, Severity::Healthy));
    line.push(Segment::plain(", Bad disks: "));
    line.extend(count_cell(st.bad, Severity::Critical));
    line.push(Segment::plain(", Scanning: "));
    line.extend(count_cell(st.scanning, Severity::Warning));
    line.push(Segment::plain(", Avg Space Used: "));
    line.push(Segment::level(fmt_pct(st.used_pct), classify::used(st.used_pct)));
    line.push(Segment::plain(", Avg Free Space: "));
    line.push(Segment::level(fmt_pct(st.free_pct), classify::free(st.free_pct)));
    line.push(Segment::plain(", Avg Inodes Used: "));
    line.push(Segment::level(fmt_pct(st.inode_used_pct), classify::used(st.inode_used_pct)));
    line
}

// ── Disk table ────────────────────────────────────────────────────────

fn disk_table(rows: &[&Disk]) -> Table {
    let mut t = Table::new(&[
        "Pool", "Erasure Set", "Disk Index", "Server", "Disk Path", "State", "Scanning", "UUID",
        "Total Space", "Space Used", "Free Space", "Inodes Used", "Local", "Metrics",
    ]);
    for d in rows {
        t.row(disk_row(d));
    }
    t
}

fn disk_row(d: &Disk) -> Vec<Cell> {
    let (total, used, free) = if d.total_space > 0 {
        let u = d.used_space_pct();
        let f = d.free_space_pct();
        (
            cell(fmt_gb(d.total_space)),
            with_pct(fmt_gb(d.used_space), u, classify::used(u)),
            with_pct(fmt_gb(d.available_space), f, classify::free(f)),
        )
    } else {
        (cell("N/A"), cell("N/A"), cell("N/A"))
    };

    let inodes = if d.used_inodes > 0 {
        let p = d.inode_used_pct();
        with_pct(fmt_thousands(d.used_inodes), p, classify::used(p))
    } else {
        cell("N/A")
    };

    let scanning = if d.scanning { Severity::Warning } else { Severity::Healthy };
    let local    = if d.local    { Severity::Healthy } else { Severity::Warning };

    vec![
        styled(d.pool_index.to_string(), Tone::Accent),
        styled(d.set_index.to_string(), Tone::Accent),
        cell(d.disk_index.to_string()),
        cell(d.server.as_str()),
        cell(d.path.as_str()),
        styled(d.state.as_str(), Tone::Level(classify::state(d.is_ok()))),
        styled(yes_no(d.scanning), Tone::Level(scanning)),
        cell(short_uuid(&d.uuid)),
        total,
        used,
        free,
        inodes,
        styled(yes_no(d.local), Tone::Level(local)),
        cell(d.metrics.as_ref().map(format_metrics).unwrap_or_default()),
    ]
}

/// Compact counter list: `[tokens=3, write=10, tout=1]`. Zero counters are
/// left out and `err` only appears when it differs from `tout`.
pub fn format_metrics(m: &DiskMetrics) -> String {
    let mut fields: Vec<String> = Vec::new();
    let mut add = |key: &str, value: u64| {
        if value > 0 { fields.push(format!("{}={}", key, value)); }
    };
    add("tokens",  m.tokens);
    add("write",   m.writes);
    add("del",     m.deletes);
    add("waiting", m.waiting);
    add("tout",    m.timeout_errors);
    if m.timeout_errors != m.availability_errors {
        add("err", m.availability_errors);
    }

    if fields.is_empty() { String::new() } else { format!("[{}]", fields.join(", ")) }
}

// ── Helpers ───────────────────────────────────────────────────────────

fn labelled(doc: &mut Doc, label: &str, value: String, sev: Severity) {
    doc.push(vec![Segment::plain(label), Segment::level(value, sev)]);
}

/// `"931.5GB (12.0%)"` with only the percentage coloured.
fn with_pct(amount: String, pct: f64, sev: Severity) -> Cell {
    vec![
        Segment::plain(format!("{} (", amount)),
        Segment::level(fmt_pct(pct), sev),
        Segment::plain(")"),
    ]
}

/// Counts are only coloured when non-zero.
fn count_cell(n: usize, sev: Severity) -> Cell {
    if n > 0 { styled(n.to_string(), Tone::Level(sev)) } else { cell(n.to_string()) }
}

fn short_uuid(uuid: &str) -> String {
    if uuid.chars().count() > UUID_WIDTH {
        format!("{}...", uuid.chars().take(UUID_WIDTH).collect::<String>())
    } else {
        uuid.to_string()
    }
}

/// `[1 2 3]`
fn bracket_list(v: &[i64]) -> String {
    let items: Vec<String> = v.iter().map(|n| n.to_string()).collect();
    format!("[{}]", items.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cluster::{BackendInfo, PoolIndex, ScannerStatus};
    use crate::models::disk::test_disk;

    const GB: i64 = 1 << 30;

    /// One pool, one set of four 100 GB drives; drive 1 is faulty and
    /// scanning, drive 2 is scanning.
    fn cluster() -> Cluster {
        let mut disks: Vec<Disk> = (0..4).map(|i| {
            let mut d = test_disk(0, 0, i);
            d.total_space = 100 * GB;
            d.used_space = 25 * GB;
            d.available_space = 75 * GB;
            d
        })
        .collect();
        disks[1].state = "faulty".into();
        disks[1].scanning = true;
        disks[2].scanning = true;
        disks[3].used_inodes = 1234;
        disks[3].free_inodes = 8766;

        let servers = (0..4).map(|i| ServerInfo {
            name:        format!("node{}", i),
            state:       if i == 1 { "offline".into() } else { "online".into() },
            uptime_secs: 90,
            pools:       vec![0],
            ..Default::default()
        })
        .collect();

        Cluster {
            pools: PoolIndex::from_disks(&disks),
            disks,
            servers,
            deployment_id: Some("dep-1".into()),
            parity_disks: 2,
            backend: Some(BackendInfo {
                total_sets:         vec![1],
                drives_per_set:     vec![4],
                standard_sc_parity: 2,
                rr_sc_parity:       1,
            }),
            scanner: ScannerStatus { buckets: 3, objects: 1200, ..Default::default() },
        }
    }

    fn cfg() -> ReportConfig {
        ReportConfig { json_file: "prod.json".into(), ..Default::default() }
    }

    #[test]
    fn metrics_skip_zeros_and_duplicate_errors() {
        let m = DiskMetrics { tokens: 3, writes: 10, timeout_errors: 1, availability_errors: 1, ..Default::default() };
        assert_eq!(format_metrics(&m), "[tokens=3, write=10, tout=1]");
        let m = DiskMetrics { timeout_errors: 1, availability_errors: 4, ..Default::default() };
        assert_eq!(format_metrics(&m), "[tout=1, err=4]");
        assert_eq!(format_metrics(&DiskMetrics::default()), "");
    }

    #[test]
    fn summary_block_lines() {
        let text = summary(&cluster()).to_plain();
        assert!(text.starts_with("Detected Erasure Coding Configuration: EC:2\n\nSummary\n"));
        assert!(text.contains("  Deployment ID: dep-1\n"));
        assert!(text.contains("  Backend: totalSets=[1], standardSCParity=2, rrSCParity=1, drivesPerSet=[4]\n"));
        assert!(text.contains("  Total Disks: 4\n  Scanning Disks: 2\n  Healthy Disks: 3\n  Problem Disks: 1\n"));
        assert!(text.contains("  Health: 75.0%\n"));
        // 400 GB raw, half usable at EC:2, 100 GB used
        assert!(text.contains("  Used Space: 0.1 TB (50.0%)\n"));
        assert!(text.contains("  Scanner Status: buckets=3, objects=1200, versions=0, deletemarkers=0, usage=0 B\n"));
        assert!(text.contains("Pool Summary\n  Pool 0:\n    Erasure Sets: 1\n    Disks: 4 total (3 ok, 1 bad, 2 scanning)\n"));
    }

    #[test]
    fn summary_is_the_same_under_every_filter() {
        let c = cluster();
        let head = summary(&c);
        for cfg in [
            cfg(),
            ReportConfig { failed: true, ..cfg() },
            ReportConfig { scanning: true, ..cfg() },
            ReportConfig { summary: true, failed: true, min_bad_disks: Some(3), ..cfg() },
            ReportConfig { summary: true, low_space: Some(1.0), ..cfg() },
        ] {
            let doc = generate(&c, &cfg);
            assert!(doc.lines().starts_with(head.lines()), "summary changed for {:?}", cfg);
        }
    }

    #[test]
    fn disk_mode_lists_servers_and_drives() {
        let text = generate(&cluster(), &cfg()).to_plain();
        assert!(text.contains("Servers\n  Pool  Server  State"));
        assert!(text.contains("  0     node1   offline"));
        assert!(text.contains("N/A\n"));
        assert!(text.contains("1 minutes 30 seconds"));
        assert!(text.contains("Drives\n"));
        assert!(text.contains("25.0GB (25.0%)  75.0GB (75.0%)"));
        assert!(text.contains("1,234 (12.3%)"));
    }

    #[test]
    fn failed_mode_keeps_scanning_failures() {
        let text = generate(&cluster(), &ReportConfig { failed: true, ..cfg() }).to_plain();
        assert!(text.contains("MinIO Failed/Faulty Disks from: prod.json\n"));
        assert!(text.contains("faulty"));
        assert!(!text.contains("Servers\n"));
    }

    #[test]
    fn empty_results_print_notices() {
        let mut c = cluster();
        for d in c.disks.iter_mut() {
            d.state = "ok".into();
            d.scanning = false;
        }
        let text = generate(&c, &ReportConfig { failed: true, ..cfg() }).to_plain();
        assert!(text.ends_with("No failed/faulty disks found in the provided data.\n"));

        let text = generate(&c, &ReportConfig { scanning: true, ..cfg() }).to_plain();
        assert!(text.ends_with("No scanning disks found in the provided data.\n"));

        let text = generate(&c, &ReportConfig { summary: true, low_space: Some(10.0), ..cfg() }).to_plain();
        assert!(text.ends_with("No erasure sets found with average free space less than 10.0%.\n"));

        let text = generate(&c, &ReportConfig { summary: true, failed: true, ..cfg() }).to_plain();
        assert!(text.ends_with("No matching erasure sets found.\n"));
    }

    #[test]
    fn set_mode_table_and_low_space_listing() {
        let text = generate(&cluster(), &ReportConfig { summary: true, ..cfg() }).to_plain();
        assert!(text.contains("Erasure Sets\n  Pool  Erasure Set  Good Disks"));
        assert!(text.contains("25.0%           75.0%"));

        let text = generate(&cluster(), &ReportConfig { summary: true, low_space: Some(80.0), ..cfg() }).to_plain();
        assert!(text.contains(
            "  Pool 0, Erasure Set 0: Good disks: 3, Bad disks: 1, Scanning: 2, \
             Avg Space Used: 25.0%, Avg Free Space: 75.0%, Avg Inodes Used: 12.3%"
        ));
    }

    #[test]
    fn long_uuids_are_shortened() {
        assert_eq!(short_uuid("0123456789abcdef0123"), "0123456789abcdef...");
        assert_eq!(short_uuid("short"), "short");
    }
}

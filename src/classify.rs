/// Three-level band every report metric is mapped to before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Healthy,
    Warning,
    Critical,
}

// Thresholds are fixed; the bands are part of the report format.
const HEALTH_OK:   f64 = 90.0;
const HEALTH_WARN: f64 = 75.0;
const USED_WARN:   f64 = 80.0;
const USED_CRIT:   f64 = 95.0;
const FREE_OK:     f64 = 20.0;
const FREE_WARN:   f64 = 5.0;

/// Share of good disks (cluster, pool or erasure set).
pub fn health(pct: f64) -> Severity {
    if pct >= HEALTH_OK        { Severity::Healthy }
    else if pct >= HEALTH_WARN { Severity::Warning }
    else                       { Severity::Critical }
}

/// Used space or used inodes.
pub fn used(pct: f64) -> Severity {
    if pct < USED_WARN       { Severity::Healthy }
    else if pct < USED_CRIT  { Severity::Warning }
    else                     { Severity::Critical }
}

pub fn free(pct: f64) -> Severity {
    if pct > FREE_OK         { Severity::Healthy }
    else if pct > FREE_WARN  { Severity::Warning }
    else                     { Severity::Critical }
}

/// Drive state: anything but "ok" is a failure.
pub fn state(ok: bool) -> Severity {
    if ok { Severity::Healthy } else { Severity::Critical }
}

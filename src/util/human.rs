use chrono::TimeDelta;

const KIB: f64 = 1_024.0;
const GIB: f64 = 1_073_741_824.0;
const TIB: f64 = 1_099_511_627_776.0;

/// Format a raw byte count with binary units: "512 B", "1.5 GiB", "17 TiB"
pub fn fmt_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    if (bytes as f64) < KIB {
        return format!("{} B", bytes);
    }
    let mut v = bytes as f64 / KIB;
    let mut unit = 0;
    while v >= KIB && unit < UNITS.len() - 1 {
        v /= KIB;
        unit += 1;
    }
    if v < 10.0 { format!("{:.1} {}", v, UNITS[unit]) }
    else        { format!("{:.0} {}", v, UNITS[unit]) }
}

/// Capacity figure of the summary blocks: "12.5 TB" (base 1024)
pub fn fmt_tb(bytes: i64) -> String {
    format!("{:.1} TB", bytes as f64 / TIB)
}

/// Per-disk capacity: "931.5GB" (base 1024)
pub fn fmt_gb(bytes: i64) -> String {
    format!("{:.1}GB", bytes as f64 / GIB)
}

/// Percentage with one decimal: "84.5%"
pub fn fmt_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Thousands separators: "1,247,000"
pub fn fmt_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 { out.push('-'); }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push(','); }
        out.push(c);
    }
    out
}

/// Server uptime: "3 days 4 hours 5 minutes 6 seconds"
pub fn fmt_uptime(secs: i64) -> String {
    let d = TimeDelta::seconds(secs.max(0));
    let (days, hours, mins, s) = (
        d.num_days(),
        d.num_hours() % 24,
        d.num_minutes() % 60,
        d.num_seconds() % 60,
    );
    if d.num_minutes() < 1 {
        format!("{} seconds", s)
    } else if d.num_hours() < 1 {
        format!("{} minutes {} seconds", mins, s)
    } else if days < 1 {
        format!("{} hours {} minutes {} seconds", hours, mins, s)
    } else {
        format!("{} days {} hours {} minutes {} seconds", days, hours, mins, s)
    }
}

pub fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

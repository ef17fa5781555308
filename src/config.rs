/// Report file location relative to a run directory.
pub const STATS_FILE_RELATIVE: &str = "js/stats.json";

/// Separator between the run prefix and the generated run suffix.
pub const RUN_SUFFIX_SEPARATOR: char = '-';

pub const NUMBER_OF_REQUESTS: &str = "numberOfRequests";
pub const MEAN_RESPONSE_TIME: &str = "meanResponseTime";

pub const TOTAL: &str = "total";
pub const OK: &str = "ok";
pub const KO: &str = "ko";

/// Field names of the positional percentile triplets, in order.
pub const PERCENTILE_FIELDS: [&str; 4] = ["percentiles1", "percentiles2", "percentiles3", "percentiles4"];

/// Display labels for `PERCENTILE_FIELDS` (generator defaults).
pub const PERCENTILE_LABELS: [&str; 4] = ["p50", "p75", "p95", "p99"];

/// Field names of the positional response-time buckets, in order.
pub const GROUP_FIELDS: [&str; 4] = ["group1", "group2", "group3", "group4"];

/// Glob pattern for every report belonging to runs named `<prefix>-*`.
pub fn stats_glob(base_dir: &str, run_prefix: &str) -> String {
    format!(
        "{}/{}{}*/{}",
        glob::Pattern::escape(base_dir.trim_end_matches('/')),
        glob::Pattern::escape(run_prefix),
        RUN_SUFFIX_SEPARATOR,
        STATS_FILE_RELATIVE
    )
}

/// `htmlName` used when a bucket omits it: the bucket name, HTML-escaped,
/// which is what the report generator writes in versions that emit the field.
pub fn default_html_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

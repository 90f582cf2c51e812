//! Markdown reports over saved run statistics.

use chrono::Utc;
use forage_data::RunStats;
use forage_io::StatsArchive;
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub name: String,
    pub days: usize,
    pub initial_population: usize,
    pub final_population: usize,
    pub peak_population: usize,
    pub final_food: usize,
    pub initial_mean_traits: Option<[f64; 3]>,
    pub final_mean_traits: Option<[f64; 3]>,
    pub extinct: bool,
}

impl RunSummary {
    pub fn from_stats(name: &str, stats: &RunStats) -> Self {
        let first = stats.day(0);
        let last = stats.last();
        let final_population = last.as_ref().map_or(0, |d| d.population);
        Self {
            name: name.to_string(),
            days: stats.len().saturating_sub(1),
            initial_population: first.as_ref().map_or(0, |d| d.population),
            final_population,
            peak_population: stats.peak_population(),
            final_food: last.as_ref().map_or(0, |d| d.food),
            initial_mean_traits: first.and_then(|d| d.mean_traits()),
            final_mean_traits: last.and_then(|d| d.mean_traits()),
            extinct: final_population == 0,
        }
    }

    pub fn from_archive(archive: &StatsArchive) -> Self {
        Self::from_stats(&archive.name, &archive.stats)
    }
}

fn fmt_traits(traits: Option<[f64; 3]>) -> String {
    match traits {
        Some([size, speed, sense]) => format!("{size:.2} / {speed:.2} / {sense:.2}"),
        None => "-".to_string(),
    }
}

/// First 12 characters of a config fingerprint.
fn short_fingerprint(fingerprint: &str) -> String {
    fingerprint.chars().take(12).collect()
}

/// One table row every `every` days, plus the final day.
pub fn trajectory_rows(stats: &RunStats, every: usize) -> Vec<usize> {
    let every = every.max(1);
    let mut rows: Vec<usize> = (0..stats.len()).step_by(every).collect();
    if let Some(last) = stats.len().checked_sub(1) {
        if rows.last() != Some(&last) {
            rows.push(last);
        }
    }
    rows
}

pub fn render_markdown(archives: &[StatsArchive], every: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Forage Run Report\n");
    let _ = writeln!(out, "Generated {}\n", Utc::now().to_rfc3339());

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(
        out,
        "| Run | Days | Start | End | Peak | Food | Mean traits at start | Mean traits at end |"
    );
    let _ = writeln!(out, "|---|---|---|---|---|---|---|---|");
    for archive in archives {
        let s = RunSummary::from_archive(archive);
        let _ = writeln!(
            out,
            "| {}{} | {} | {} | {} | {} | {} | {} | {} |",
            s.name,
            if s.extinct { " (extinct)" } else { "" },
            s.days,
            s.initial_population,
            s.final_population,
            s.peak_population,
            s.final_food,
            fmt_traits(s.initial_mean_traits),
            fmt_traits(s.final_mean_traits),
        );
    }

    for archive in archives {
        let _ = writeln!(out, "\n## {}\n", archive.name);
        let _ = writeln!(
            out,
            "- **Created**: {}\n- **Config**: `{}`\n- **Seed**: {}\n",
            archive.created_at,
            short_fingerprint(&archive.config_fingerprint),
            archive
                .seed
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
        );
        let _ = writeln!(out, "| Day | Population | Food | Size / Speed / Sense |");
        let _ = writeln!(out, "|---|---|---|---|");
        for day in trajectory_rows(&archive.stats, every) {
            if let Some(row) = archive.stats.day(day) {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} |",
                    row.day,
                    row.population,
                    row.food,
                    fmt_traits(row.mean_traits()),
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use forage_core::config::SimConfig;
    use forage_data::DayStats;

    fn stats(days: usize) -> RunStats {
        let mut stats = RunStats::default();
        for d in 0..days {
            let n = 4usize.saturating_sub(d);
            stats.record(DayStats {
                day: d as u32,
                population: n,
                attributes: vec![[1.0, 2.0, 3.0]; n],
                food: 50 - d,
            });
        }
        stats
    }

    #[test]
    fn test_summary_of_extinct_run() {
        let s = RunSummary::from_stats("x", &stats(6));
        assert_eq!(s.days, 5);
        assert_eq!(s.initial_population, 4);
        assert_eq!(s.final_population, 0);
        assert_eq!(s.peak_population, 4);
        assert_eq!(s.final_food, 45);
        assert_eq!(s.initial_mean_traits, Some([1.0, 2.0, 3.0]));
        assert!(s.final_mean_traits.is_none());
        assert!(s.extinct);
    }

    #[test]
    fn test_trajectory_includes_last_day() {
        assert_eq!(trajectory_rows(&stats(6), 2), vec![0, 2, 4, 5]);
        assert_eq!(trajectory_rows(&stats(5), 2), vec![0, 2, 4]);
        assert!(trajectory_rows(&RunStats::default(), 3).is_empty());
    }

    #[test]
    fn test_short_fingerprint_respects_char_boundaries() {
        assert_eq!(short_fingerprint("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_fingerprint("abc"), "abc");
        assert_eq!(short_fingerprint("ééééééééééééé"), "éééééééééééé");
    }

    #[test]
    fn test_markdown_with_edited_fingerprint() {
        let mut archive = StatsArchive::new("edited", &SimConfig::default(), None, stats(2));
        archive.config_fingerprint = "ünïcødé-fingerprint".to_string();
        let md = render_markdown(&[archive], 1);
        assert!(md.contains("`ünïcødé-fing`"));
    }

    #[test]
    fn test_markdown_mentions_each_run() {
        let a = StatsArchive::new("alpha", &SimConfig::default(), Some(1), stats(3));
        let b = StatsArchive::new("beta", &SimConfig::default(), None, stats(6));
        let md = render_markdown(&[a, b], 1);
        assert!(md.starts_with("# Forage Run Report"));
        assert!(md.contains("## alpha"));
        assert!(md.contains("## beta"));
        assert!(md.contains("beta (extinct)"));
        assert!(md.contains("1.00 / 2.00 / 3.00"));
    }
}

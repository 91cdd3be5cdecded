//! Report sinks.
//!
//! The simulation core never touches the filesystem. Callers hand results
//! to a [`ReportSink`]; [`FileReport`] renders them as text and CSV files
//! under a results directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::common::{PageKey, Result};
use crate::metrics::{GenerationSnapshot, Stats, TimelineEntry};
use crate::simulation::ComparisonRow;

pub const TIMELINE_FILE: &str = "timeline_report.txt";
pub const COMPARISON_FILE: &str = "comparison_results.csv";
pub const GENERATIONS_FILE: &str = "mglru_generations.csv";

/// Consumer of simulation results.
pub trait ReportSink<K: PageKey> {
    fn stats(&mut self, label: &str, stats: &Stats) -> Result<()>;

    fn timeline(&mut self, timeline: &[TimelineEntry<K>]) -> Result<()>;

    fn generation_log(&mut self, log: &[GenerationSnapshot]) -> Result<()>;

    fn comparison(&mut self, rows: &[ComparisonRow]) -> Result<()>;
}

/// Writes reports as files into one directory, created on first write.
#[derive(Debug, Clone)]
pub struct FileReport {
    dir: PathBuf,
}

impl FileReport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn create(&self, name: &str) -> Result<BufWriter<File>> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        info!("writing {}", path.display());
        Ok(BufWriter::new(File::create(path)?))
    }
}

impl<K: PageKey> ReportSink<K> for FileReport {
    fn stats(&mut self, label: &str, stats: &Stats) -> Result<()> {
        info!("{}: {}", label, stats);
        Ok(())
    }

    fn timeline(&mut self, timeline: &[TimelineEntry<K>]) -> Result<()> {
        let mut out = self.create(TIMELINE_FILE)?;
        out.write_all(render_timeline(timeline).as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn generation_log(&mut self, log: &[GenerationSnapshot]) -> Result<()> {
        let mut out = self.create(GENERATIONS_FILE)?;
        out.write_all(render_generation_csv(log).as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn comparison(&mut self, rows: &[ComparisonRow]) -> Result<()> {
        let mut out = self.create(COMPARISON_FILE)?;
        out.write_all(render_comparison_csv(rows).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Fixed-width text table of a timeline.
///
/// Faults without an eviction and hits show `---` in the Evicted column.
pub fn render_timeline<K: PageKey>(timeline: &[TimelineEntry<K>]) -> String {
    let mut out = String::from("--- Page Replacement Timeline ---\n\n");
    out.push_str(&format!(
        "{:<5} | {:<5} | {:<5} | {:<7} | Frames State\n",
        "Step", "Page", "Event", "Evicted"
    ));
    out.push_str(&"-".repeat(60));
    out.push('\n');

    for entry in timeline {
        let evicted = entry
            .evicted
            .map_or_else(|| "---".to_string(), |page| page.to_string());
        let frames = entry
            .frames
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{:<5} | {:<5} | {:<5} | {:<7} | {}\n",
            entry.step,
            entry.page.to_string(),
            entry.outcome.to_string(),
            evicted,
            frames
        ));
    }
    out
}

/// CSV of a comparison sweep, one row per (policy, frames) cell.
pub fn render_comparison_csv(rows: &[ComparisonRow]) -> String {
    let mut out = String::from(
        "Algorithm,Frames,Page Faults,Page Hits,Total Requests,Miss Ratio,Hit Ratio\n",
    );
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            row.policy,
            row.frames,
            row.stats.faults,
            row.stats.hits,
            row.stats.total,
            percent(row.stats.miss_ratio()),
            percent(row.stats.hit_ratio())
        ));
    }
    out
}

/// CSV of MGLRU generation sizes per step.
pub fn render_generation_csv(log: &[GenerationSnapshot]) -> String {
    let num_generations = log.first().map_or(0, |snap| snap.sizes.len());
    let mut out = String::from("Step");
    for gen in 0..num_generations {
        out.push_str(&format!(",Gen {}", gen));
    }
    out.push('\n');

    for snap in log {
        out.push_str(&snap.step.to_string());
        for size in &snap.sizes {
            out.push_str(&format!(",{}", size));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{PageId, PolicyConfig, TenantPage};
    use crate::policy::{PolicyKind, ReplacementPolicy};
    use crate::simulation;
    use tempfile::tempdir;

    fn pages(ids: &[u32]) -> Vec<PageId> {
        ids.iter().copied().map(PageId::new).collect()
    }

    #[test]
    fn test_render_timeline() {
        let (policy, _) =
            simulation::run_kind(PolicyKind::Fifo, &PolicyConfig::new(2), &pages(&[1, 2, 3]))
                .unwrap();
        let text = render_timeline(policy.timeline());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "--- Page Replacement Timeline ---");
        assert!(lines[2].starts_with("Step  | Page  | Event | Evicted | Frames State"));
        assert_eq!(lines[4], "1     | 1     | Fault | ---     | 1");
        assert_eq!(lines[6], "3     | 3     | Fault | 1       | 2, 3");
    }

    #[test]
    fn test_render_timeline_tenant_pages() {
        let trace = vec![TenantPage::new(1, 4)];
        let (policy, _) =
            simulation::run_kind(PolicyKind::Lru, &PolicyConfig::new(1), &trace).unwrap();
        let text = render_timeline(policy.timeline());
        assert!(text.contains("| (1, 4) |"));
    }

    #[test]
    fn test_render_comparison_csv() {
        let rows = vec![ComparisonRow {
            policy: PolicyKind::Optimal,
            frames: 3,
            stats: Stats::new(1, 3),
        }];
        let csv = render_comparison_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Algorithm,Frames,Page Faults,Page Hits,Total Requests,Miss Ratio,Hit Ratio")
        );
        assert_eq!(lines.next(), Some("Optimal,3,3,1,4,75.00%,25.00%"));
    }

    #[test]
    fn test_render_generation_csv() {
        let log = vec![
            GenerationSnapshot {
                step: 1,
                sizes: vec![1, 0, 0],
            },
            GenerationSnapshot {
                step: 2,
                sizes: vec![1, 1, 0],
            },
        ];
        assert_eq!(
            render_generation_csv(&log),
            "Step,Gen 0,Gen 1,Gen 2\n1,1,0,0\n2,1,1,0\n"
        );
    }

    #[test]
    fn test_file_report_writes_files() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("results");
        let mut report = FileReport::new(&out_dir);
        let sink: &mut dyn ReportSink<PageId> = &mut report;

        let (policy, stats) =
            simulation::run_kind(PolicyKind::Mglru, &PolicyConfig::new(2), &pages(&[1, 2, 1, 3]))
                .unwrap();
        sink.stats("MGLRU", &stats).unwrap();
        sink.timeline(policy.timeline()).unwrap();
        sink.generation_log(policy.generation_log().unwrap()).unwrap();
        sink.comparison(&[]).unwrap();

        let timeline = fs::read_to_string(out_dir.join(TIMELINE_FILE)).unwrap();
        assert_eq!(timeline.lines().count(), 4 + 4);
        let gens = fs::read_to_string(out_dir.join(GENERATIONS_FILE)).unwrap();
        assert_eq!(gens.lines().count(), 1 + 4);
        assert!(out_dir.join(COMPARISON_FILE).exists());
    }
}

use clap::Parser;
use forage_io::{write_json_file, StatsArchive};
use forage_lib::report::{render_markdown, RunSummary};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize saved forage runs", long_about = None)]
struct Args {
    /// Archives to include (`.json.gz` or plain `.json`)
    #[arg(required = true)]
    archives: Vec<PathBuf>,

    #[arg(short, long, default_value = "report.md")]
    output: PathBuf,

    /// Trajectory table stride in days
    #[arg(short, long, default_value_t = 10)]
    every: usize,

    /// Also write the per-run summaries as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut archives = Vec::with_capacity(args.archives.len());
    for path in &args.archives {
        let archive = StatsArchive::load(path)
            .map_err(|e| e.with_context(format!("loading {}", path.display())))?;
        archives.push(archive);
    }

    if let Some(json_path) = &args.json {
        let summaries: Vec<RunSummary> = archives.iter().map(RunSummary::from_archive).collect();
        write_json_file(json_path, &summaries)?;
        println!("Summaries written: {}", json_path.display());
    }

    std::fs::write(&args.output, render_markdown(&archives, args.every))?;
    println!("Report generated: {}", args.output.display());

    Ok(())
}

//! JSON output formatting

use serde::Serialize;
use setlist_core::{PipelineReport, Run};

#[derive(Serialize)]
struct MeltOutput<'a> {
    runs: usize,
    setlist: &'a [Run],
}

/// Print a finished recognition run as JSON
pub fn print_report(report: &PipelineReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

/// Print melted runs as JSON with a run count
pub fn print_runs(runs: &[Run]) {
    let output = MeltOutput {
        runs: runs.len(),
        setlist: runs,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing setlist: {}", e),
    }
}

//! Setlist melting
//!
//! Run-length encoding over a labeled timeline: consecutive records with the
//! same (title, artist) collapse into one run spanning their windows.
//! Records must arrive sorted by `segment_start`; the melter does not sort or
//! deduplicate.

use crate::model::{RecognitionRecord, Run};

#[cfg(test)]
mod tests;

/// Melt ordered recognition records into setlist runs
///
/// Empty input yields no runs.
pub fn melt<'a, I>(records: I) -> Vec<Run>
where
    I: IntoIterator<Item = &'a RecognitionRecord>,
{
    let mut runs = Vec::new();
    let mut current: Option<Run> = None;

    for record in records {
        match current.as_mut() {
            Some(run) if run.matches(record) => {
                run.end = record.segment_end;
            }
            _ => {
                if let Some(closed) = current.replace(Run::from_record(record)) {
                    runs.push(closed);
                }
            }
        }
    }

    if let Some(last) = current {
        runs.push(last);
    }

    log::debug!("Melted setlist into {} runs", runs.len());
    runs
}

use std::collections::HashMap;
use std::io::{BufRead, Write};

use serde::Serialize;

use crate::domain::Tier;
use crate::error::AnnotError;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnotateStats {
    pub headers: u64,
    pub uniref90_annotated: u64,
    pub uniref50_annotated: u64,
    pub overridden: u64,
}

/// Streams the query FASTA and rewrites each header as
/// `>header|<uniref90>|<uniref50>`. Non-header lines pass through
/// byte-identical. Missing mappings fall back to the tier sentinel, and a
/// present override replaces the direct UniRef50 result unconditionally.
pub fn annotate<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    uniref90_map: &HashMap<String, String>,
    uniref50_map: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> Result<AnnotateStats, AnnotError> {
    let mut stats = AnnotateStats::default();
    let mut line = String::new();
    loop {
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|err| AnnotError::Filesystem(err.to_string()))?;
        if read == 0 {
            break;
        }
        if !line.starts_with('>') {
            output
                .write_all(line.as_bytes())
                .map_err(|err| AnnotError::Filesystem(err.to_string()))?;
            continue;
        }

        stats.headers += 1;
        let trimmed = line.trim_end();
        let header = &trimmed[1..];
        let uniref90 = match uniref90_map.get(header) {
            Some(id) => {
                stats.uniref90_annotated += 1;
                id.as_str()
            }
            None => Tier::Ninety.unknown(),
        };
        let mut uniref50 = match uniref50_map.get(header) {
            Some(id) => {
                stats.uniref50_annotated += 1;
                id.as_str()
            }
            None => Tier::Fifty.unknown(),
        };
        if let Some(id) = overrides.get(header) {
            stats.overridden += 1;
            uniref50 = id.as_str();
        }
        writeln!(output, "{trimmed}|{uniref90}|{uniref50}")
            .map_err(|err| AnnotError::Filesystem(err.to_string()))?;
    }
    Ok(stats)
}

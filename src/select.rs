use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use camino::Utf8Path;
use tracing::info;

use crate::domain::Tier;
use crate::error::AnnotError;
use crate::hit::Hit;
use crate::schema::OutputFormat;

/// Query and subject must both be covered to at least this fraction,
/// approximating the UniRef clustering convention.
pub const MIN_MUTUAL_COVERAGE: f64 = 0.80;

/// Reduces a stream of tab-separated result rows to one accepted subject
/// per query. Rows arrive in search-tool order; the first row that clears
/// both thresholds claims its query id and later rows for that query are
/// skipped. Rows that fail a threshold are dropped without locking the
/// query, so it stays eligible for a later row.
pub fn select<R: Read>(
    reader: R,
    format: &OutputFormat,
    min_identity: f64,
    min_mutual_coverage: f64,
) -> Result<HashMap<String, String>, AnnotError> {
    let mut rows = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut mapping = HashMap::new();
    for record in rows.records() {
        let record = record.map_err(|err| AnnotError::Filesystem(err.to_string()))?;
        let tokens: Vec<&str> = record.iter().collect();
        let hit = Hit::decode(&tokens, format)?;
        let (Some(qseqid), Some(sseqid)) = (hit.qseqid.as_deref(), hit.sseqid.as_deref()) else {
            continue;
        };
        if mapping.contains_key(qseqid) {
            continue;
        }
        let accepted = hit.pident.is_some_and(|pident| pident >= min_identity)
            && hit.mcov.is_some_and(|mcov| mcov >= min_mutual_coverage);
        if accepted {
            let subject = sseqid.split('|').next().unwrap_or(sseqid);
            mapping.insert(qseqid.to_string(), subject.to_string());
        }
    }
    Ok(mapping)
}

/// Parses a results file for one tier, using the tier's identity floor.
pub fn select_path(
    path: &Utf8Path,
    format: &OutputFormat,
    tier: Tier,
) -> Result<HashMap<String, String>, AnnotError> {
    info!("parsing results file: {path}");
    if !path.as_std_path().exists() {
        return Err(AnnotError::MissingPath(path.to_path_buf()));
    }
    let file =
        File::open(path.as_std_path()).map_err(|err| AnnotError::Filesystem(err.to_string()))?;
    let mapping = select(file, format, tier.min_identity(), MIN_MUTUAL_COVERAGE)?;
    info!("{}: accepted {} queries", tier.label(), mapping.len());
    Ok(mapping)
}

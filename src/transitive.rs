use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use camino::Utf8Path;
use tracing::info;

use crate::error::AnnotError;

/// Derives UniRef50 overrides from the UniRef90 mapping and a precomputed
/// (uniref90, uniref50) pair table. The tier-90 mapping is reverse-indexed
/// (cluster id to the headers that mapped to it); each pair-table row then
/// assigns its uniref50 id to every header indexed under its uniref90 id.
/// Duplicate uniref90 rows overwrite earlier assignments: last row wins.
pub fn build_overrides<'a, I>(
    uniref90_map: &HashMap<String, String>,
    pairs: I,
) -> HashMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
    for (header, uniref90) in uniref90_map {
        reverse.entry(uniref90.as_str()).or_default().push(header.as_str());
    }

    let mut overrides = HashMap::new();
    for (uniref90, uniref50) in pairs {
        for header in reverse.get(uniref90).map(Vec::as_slice).unwrap_or(&[]) {
            overrides.insert(header.to_string(), uniref50.to_string());
        }
    }
    overrides
}

/// Loads the tab-separated pair table and builds the override mapping.
pub fn overrides_from_path(
    uniref90_map: &HashMap<String, String>,
    path: &Utf8Path,
) -> Result<HashMap<String, String>, AnnotError> {
    info!("loading transitive mapping file: {path}");
    if !path.as_std_path().exists() {
        return Err(AnnotError::MissingPath(path.to_path_buf()));
    }
    let file =
        File::open(path.as_std_path()).map_err(|err| AnnotError::Filesystem(err.to_string()))?;
    overrides_from_reader(uniref90_map, file)
}

fn overrides_from_reader<R: Read>(
    uniref90_map: &HashMap<String, String>,
    reader: R,
) -> Result<HashMap<String, String>, AnnotError> {
    let mut rows = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for record in rows.records() {
        let record = record.map_err(|err| AnnotError::Filesystem(err.to_string()))?;
        if record.len() != 2 {
            return Err(AnnotError::SchemaMismatch {
                expected: 2,
                found: record.len(),
            });
        }
        pairs.push((record[0].to_string(), record[1].to_string()));
    }
    Ok(build_overrides(
        uniref90_map,
        pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())),
    ))
}

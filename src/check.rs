use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use serde::Serialize;

use crate::error::AnnotError;

/// Per-tier agreement tallies between two annotation layers carried on the
/// same headers. Category keys follow the `?` (sentinel) / `*` (assigned)
/// shorthand: `?->*` means the first layer was unknown where the second
/// found a cluster.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub total: u64,
    pub counts: BTreeMap<String, u64>,
}

impl CheckReport {
    pub fn fraction(&self, category: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        *self.counts.get(category).unwrap_or(&0) as f64 / self.total as f64
    }

    fn bump(&mut self, category: String) {
        *self.counts.entry(category).or_insert(0) += 1;
    }
}

/// Compares the two annotation pairs on each header of a doubly-annotated
/// FASTA. Headers are split on `|`; the pair in fields [-5], [-4] is the
/// first layer and [-2], [-1] the second. A header with fewer than five
/// fields cannot carry both layers.
pub fn check<R: BufRead>(input: R) -> Result<CheckReport, AnnotError> {
    let mut report = CheckReport::default();
    for (index, line) in input.lines().enumerate() {
        let line = line.map_err(|err| AnnotError::Filesystem(err.to_string()))?;
        let line = line.trim();
        if !line.starts_with('>') {
            continue;
        }
        let items: Vec<&str> = line.split('|').collect();
        if items.len() < 5 {
            return Err(AnnotError::MalformedHeader(index as u64 + 1));
        }
        report.total += 1;
        let a90 = items[items.len() - 5];
        let a50 = items[items.len() - 4];
        let b90 = items[items.len() - 2];
        let b50 = items[items.len() - 1];
        tally(&mut report, "uniref90", a90, b90);
        tally(&mut report, "uniref50", a50, b50);
    }
    Ok(report)
}

pub fn check_path(path: &Utf8Path) -> Result<CheckReport, AnnotError> {
    if !path.as_std_path().exists() {
        return Err(AnnotError::MissingPath(path.to_path_buf()));
    }
    let reader = BufReader::new(
        File::open(path.as_std_path()).map_err(|err| AnnotError::Filesystem(err.to_string()))?,
    );
    check(reader)
}

fn tally(report: &mut CheckReport, tier: &str, first: &str, second: &str) {
    let first_unknown = first.contains("unknown");
    let second_unknown = second.contains("unknown");
    let category = match (first_unknown, second_unknown) {
        (false, false) => {
            if first == second {
                "same"
            } else {
                "diff"
            }
        }
        (true, true) => "?->?",
        (true, false) => "?->*",
        (false, true) => "*->?",
    };
    report.bump(format!("{tier} {category}"));
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn tallies_agreement_categories() {
        let fasta = "\
>seq1|UniRef90_A1|UniRef50_B1|x|UniRef90_A1|UniRef50_B2\nMKV\n\
>seq2|UniRef90_unknown|UniRef50_B1|x|UniRef90_A9|UniRef50_B1\nMKV\n";
        let report = check(fasta.as_bytes()).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.counts["uniref90 same"], 1);
        assert_eq!(report.counts["uniref50 diff"], 1);
        assert_eq!(report.counts["uniref90 ?->*"], 1);
        assert_eq!(report.counts["uniref50 same"], 1);
        assert_eq!(report.fraction("uniref90 same"), 0.5);
    }

    #[test]
    fn both_unknown_is_its_own_bucket() {
        let fasta = ">s|UniRef90_unknown|UniRef50_unknown|x|UniRef90_unknown|UniRef50_unknown\n";
        let report = check(fasta.as_bytes()).unwrap();
        assert_eq!(report.counts["uniref90 ?->?"], 1);
        assert_eq!(report.counts["uniref50 ?->?"], 1);
    }

    #[test]
    fn header_without_annotation_fields_is_fatal() {
        let err = check(">plain_header\nMKV\n".as_bytes()).unwrap_err();
        assert_matches!(err, AnnotError::MalformedHeader(1));
    }

    #[test]
    fn body_lines_are_ignored() {
        let fasta = ">s|a|b|c|UniRef90_A|UniRef50_B\nMK|V|W\n";
        let report = check(fasta.as_bytes()).unwrap();
        assert_eq!(report.total, 1);
    }
}

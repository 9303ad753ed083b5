use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AnnotError;

/// One of the two UniRef identity tiers. Decided once, at the boundary
/// where a database or results path is first accepted, and passed down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Ninety,
    Fifty,
}

impl Tier {
    /// Infers the tier from a path following the HUMAnN2 naming convention
    /// (the path must contain "uniref90" or "uniref50", case-insensitively).
    pub fn infer(path: &str) -> Result<Tier, AnnotError> {
        let lowered = path.to_lowercase();
        let mut tier = None;
        if lowered.contains("uniref90") {
            tier = Some(Tier::Ninety);
        }
        if lowered.contains("uniref50") {
            tier = Some(Tier::Fifty);
        }
        tier.ok_or_else(|| AnnotError::TierInference(path.to_string()))
    }

    /// Minimum percent identity a hit must reach for this tier.
    pub fn min_identity(self) -> f64 {
        match self {
            Tier::Ninety => 90.0,
            Tier::Fifty => 50.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Ninety => "uniref90",
            Tier::Fifty => "uniref50",
        }
    }

    /// Sentinel cluster id emitted when a header has no accepted mapping.
    pub fn unknown(self) -> &'static str {
        match self {
            Tier::Ninety => "UniRef90_unknown",
            Tier::Fifty => "UniRef50_unknown",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeqType {
    Nuc,
    Cds,
    Prot,
}

impl SeqType {
    /// DIAMOND alignment mode for this sequence type. `Cds` inputs are
    /// translated to protein before searching and never reach this call.
    pub fn diamond_mode(self) -> &'static str {
        match self {
            SeqType::Nuc => "blastx",
            SeqType::Cds | SeqType::Prot => "blastp",
        }
    }
}

impl fmt::Display for SeqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqType::Nuc => write!(f, "nuc"),
            SeqType::Cds => write!(f, "cds"),
            SeqType::Prot => write!(f, "prot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn infer_tier_from_database_path() {
        let tier = Tier::infer("/dbs/UniRef90/uniref90_annotated.dmnd").unwrap();
        assert_eq!(tier, Tier::Ninety);
        assert_eq!(tier.min_identity(), 90.0);
    }

    #[test]
    fn infer_tier_case_insensitive() {
        let tier = Tier::infer("results/genes.faa.UNIREF50.hits").unwrap();
        assert_eq!(tier, Tier::Fifty);
        assert_eq!(tier.unknown(), "UniRef50_unknown");
    }

    #[test]
    fn infer_tier_unrecognized_path() {
        let err = Tier::infer("/dbs/swissprot.dmnd").unwrap_err();
        assert_matches!(err, AnnotError::TierInference(_));
    }

    #[test]
    fn diamond_mode_by_seqtype() {
        assert_eq!(SeqType::Nuc.diamond_mode(), "blastx");
        assert_eq!(SeqType::Prot.diamond_mode(), "blastp");
    }
}

use crate::error::AnnotError;

/// Default column order shared between the DIAMOND invocation and the
/// results parser. The file itself is not self-describing.
pub const DEFAULT_OUTPUT_FORMAT: &str =
    "6 qseqid sseqid pident qlen qstart qend slen sstart send evalue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
}

pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// The universal table of BLAST/DIAMOND tabular output fields.
pub const BLAST_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "qseqid", kind: FieldKind::Text, description: "Query Seq-id" },
    FieldSpec { name: "qgi", kind: FieldKind::Text, description: "Query GI" },
    FieldSpec { name: "qacc", kind: FieldKind::Text, description: "Query accesion" },
    FieldSpec { name: "qaccver", kind: FieldKind::Text, description: "Query accesion.version" },
    FieldSpec { name: "qlen", kind: FieldKind::Int, description: "Query sequence length" },
    FieldSpec { name: "sseqid", kind: FieldKind::Text, description: "Subject Seq-id" },
    FieldSpec { name: "sallseqid", kind: FieldKind::Text, description: "All subject Seq-id(s), separated by a ';'" },
    FieldSpec { name: "sgi", kind: FieldKind::Text, description: "Subject GI" },
    FieldSpec { name: "sallgi", kind: FieldKind::Text, description: "All subject GIs" },
    FieldSpec { name: "sacc", kind: FieldKind::Text, description: "Subject accession" },
    FieldSpec { name: "saccver", kind: FieldKind::Text, description: "Subject accession.version" },
    FieldSpec { name: "sallacc", kind: FieldKind::Text, description: "All subject accessions" },
    FieldSpec { name: "slen", kind: FieldKind::Int, description: "Subject sequence length" },
    FieldSpec { name: "qstart", kind: FieldKind::Int, description: "Start of alignment in query" },
    FieldSpec { name: "qend", kind: FieldKind::Int, description: "End of alignment in query" },
    FieldSpec { name: "sstart", kind: FieldKind::Int, description: "Start of alignment in subject" },
    FieldSpec { name: "send", kind: FieldKind::Int, description: "End of alignment in subject" },
    FieldSpec { name: "qseq", kind: FieldKind::Text, description: "Aligned part of query sequence" },
    FieldSpec { name: "sseq", kind: FieldKind::Text, description: "Aligned part of subject sequence" },
    FieldSpec { name: "evalue", kind: FieldKind::Float, description: "Expect value" },
    FieldSpec { name: "bitscore", kind: FieldKind::Float, description: "Bit score" },
    FieldSpec { name: "score", kind: FieldKind::Float, description: "Raw score" },
    FieldSpec { name: "length", kind: FieldKind::Int, description: "Alignment length" },
    FieldSpec { name: "pident", kind: FieldKind::Float, description: "Percentage of identical matches" },
    FieldSpec { name: "nident", kind: FieldKind::Int, description: "Number of identical matches" },
    FieldSpec { name: "mismatch", kind: FieldKind::Int, description: "Number of mismatches" },
    FieldSpec { name: "positive", kind: FieldKind::Int, description: "Number of positive-scoring matches" },
    FieldSpec { name: "gapopen", kind: FieldKind::Int, description: "Number of gap openings" },
    FieldSpec { name: "gaps", kind: FieldKind::Int, description: "Total number of gaps" },
    FieldSpec { name: "ppos", kind: FieldKind::Float, description: "Percentage of positive-scoring matches" },
    FieldSpec { name: "frames", kind: FieldKind::Text, description: "Query and subject frames separated by a '/'" },
    FieldSpec { name: "qframe", kind: FieldKind::Text, description: "Query frame" },
    FieldSpec { name: "sframe", kind: FieldKind::Text, description: "Subject frame" },
    FieldSpec { name: "btop", kind: FieldKind::Text, description: "Blast traceback operations (BTOP)" },
    FieldSpec { name: "staxid", kind: FieldKind::Text, description: "Subject Taxonomy ID" },
    FieldSpec { name: "ssciname", kind: FieldKind::Text, description: "Subject Scientific Name" },
    FieldSpec { name: "scomname", kind: FieldKind::Text, description: "Subject Common Name" },
    FieldSpec { name: "sblastname", kind: FieldKind::Text, description: "Subject Blast Name" },
    FieldSpec { name: "sskingdom", kind: FieldKind::Text, description: "Subject Super Kingdom" },
    FieldSpec { name: "staxids", kind: FieldKind::Text, description: "unique Subject Taxonomy ID(s), separated by a ';'" },
    FieldSpec { name: "sscinames", kind: FieldKind::Text, description: "unique Subject Scientific Name(s), separated by a ';'" },
    FieldSpec { name: "scomnames", kind: FieldKind::Text, description: "unique Subject Common Name(s), separated by a ';'" },
    FieldSpec { name: "sblastnames", kind: FieldKind::Text, description: "unique Subject Blast Name(s), separated by a ';'" },
    FieldSpec { name: "sskingdoms", kind: FieldKind::Text, description: "unique Subject Super Kingdom(s), separated by a ';'" },
    FieldSpec { name: "stitle", kind: FieldKind::Text, description: "Subject Title" },
    FieldSpec { name: "salltitles", kind: FieldKind::Text, description: "All Subject Title(s), separated by a '<>'" },
    FieldSpec { name: "sstrand", kind: FieldKind::Text, description: "Subject Strand" },
    FieldSpec { name: "qcovs", kind: FieldKind::Float, description: "Query Coverage Per Subject" },
    FieldSpec { name: "qcovhsp", kind: FieldKind::Float, description: "Query Coverage Per HSP" },
    FieldSpec { name: "qcovus", kind: FieldKind::Float, description: "Query Coverage Per Unique Subject (blastn only)" },
];

pub fn field_kind(name: &str) -> Option<FieldKind> {
    BLAST_FIELDS
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.kind)
}

/// Column order of a tabular search-results file, built from the outfmt
/// configuration string. Field names are validated against [`BLAST_FIELDS`]
/// up front, so decoding never meets a name it does not recognize.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    fields: Vec<&'static str>,
}

impl OutputFormat {
    pub fn parse(config: &str) -> Result<Self, AnnotError> {
        let config = config.strip_prefix("6 ").unwrap_or(config);
        let mut fields = Vec::new();
        for name in config.split_whitespace() {
            let spec = BLAST_FIELDS
                .iter()
                .find(|spec| spec.name == name)
                .ok_or_else(|| AnnotError::UnknownField(name.to_string()))?;
            fields.push(spec.name);
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_default_format() {
        let format = OutputFormat::parse(DEFAULT_OUTPUT_FORMAT).unwrap();
        assert_eq!(format.len(), 10);
        assert_eq!(format.fields()[0], "qseqid");
        assert_eq!(format.fields()[9], "evalue");
    }

    #[test]
    fn parse_without_leading_six() {
        let format = OutputFormat::parse("qseqid sseqid pident").unwrap();
        assert_eq!(format.len(), 3);
    }

    #[test]
    fn parse_unknown_field_fails_fast() {
        let err = OutputFormat::parse("6 qseqid wibble").unwrap_err();
        assert_matches!(err, AnnotError::UnknownField(name) if name == "wibble");
    }

    #[test]
    fn field_kinds() {
        assert_eq!(field_kind("pident"), Some(FieldKind::Float));
        assert_eq!(field_kind("qlen"), Some(FieldKind::Int));
        assert_eq!(field_kind("sseqid"), Some(FieldKind::Text));
        assert_eq!(field_kind("nonsense"), None);
    }
}

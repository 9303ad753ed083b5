use crate::error::AnnotError;
use crate::schema::{FieldKind, OutputFormat, field_kind};

/// One decoded alignment record for a (query, subject) pair, with the
/// coverage metrics derived from its raw coordinates. Every field is
/// optional: the output format decides which columns exist, and a metric
/// is present only when its full coordinate triple is.
#[derive(Debug, Clone, Default)]
pub struct Hit {
    pub qseqid: Option<String>,
    pub sseqid: Option<String>,
    pub pident: Option<f64>,
    pub qlen: Option<i64>,
    pub qstart: Option<i64>,
    pub qend: Option<i64>,
    pub slen: Option<i64>,
    pub sstart: Option<i64>,
    pub send: Option<i64>,
    pub evalue: Option<f64>,
    pub bitscore: Option<f64>,
    pub qcov: Option<f64>,
    pub scov: Option<f64>,
    pub mcov: Option<f64>,
    pub strength: Option<f64>,
}

impl Hit {
    /// Decodes one results row against the configured column order, then
    /// derives the coverage metrics. Column-count disagreement and
    /// malformed numeric tokens are fatal for the surrounding tier.
    pub fn decode(tokens: &[&str], format: &OutputFormat) -> Result<Hit, AnnotError> {
        if tokens.len() != format.len() {
            return Err(AnnotError::SchemaMismatch {
                expected: format.len(),
                found: tokens.len(),
            });
        }

        let mut hit = Hit::default();
        for (&name, &token) in format.fields().iter().zip(tokens) {
            // Validated at format construction; every configured name is known.
            let kind = field_kind(name).ok_or_else(|| AnnotError::UnknownField(name.to_string()))?;
            match kind {
                FieldKind::Text => {
                    let value = token.to_string();
                    match name {
                        "qseqid" => hit.qseqid = Some(value),
                        "sseqid" => hit.sseqid = Some(value),
                        _ => {}
                    }
                }
                FieldKind::Int => {
                    let value = parse_int(name, token)?;
                    match name {
                        "qlen" => hit.qlen = Some(value),
                        "qstart" => hit.qstart = Some(value),
                        "qend" => hit.qend = Some(value),
                        "slen" => hit.slen = Some(value),
                        "sstart" => hit.sstart = Some(value),
                        "send" => hit.send = Some(value),
                        _ => {}
                    }
                }
                FieldKind::Float => {
                    let value = parse_float(name, token)?;
                    match name {
                        "pident" => hit.pident = Some(value),
                        "evalue" => hit.evalue = Some(value),
                        "bitscore" => hit.bitscore = Some(value),
                        _ => {}
                    }
                }
            }
        }

        hit.qcov = span_coverage(hit.qstart, hit.qend, hit.qlen);
        hit.scov = span_coverage(hit.sstart, hit.send, hit.slen);
        hit.mcov = match (hit.qcov, hit.scov) {
            (Some(qcov), Some(scov)) => Some(qcov.min(scov)),
            _ => None,
        };
        hit.strength = match (hit.mcov, hit.pident) {
            (Some(mcov), Some(pident)) => Some(mcov * pident / 100.0),
            _ => None,
        };

        Ok(hit)
    }
}

/// Fraction of the sequence covered by the aligned span. Coordinates are
/// taken as reported, so start > end (reverse strand) must not flip the
/// sign of the span length.
fn span_coverage(start: Option<i64>, end: Option<i64>, len: Option<i64>) -> Option<f64> {
    match (start, end, len) {
        (Some(start), Some(end), Some(len)) => {
            let span = (end - start).abs() + 1;
            Some(span as f64 / len as f64)
        }
        _ => None,
    }
}

fn parse_int(field: &str, token: &str) -> Result<i64, AnnotError> {
    token.parse().map_err(|_| AnnotError::InvalidValue {
        field: field.to_string(),
        value: token.to_string(),
    })
}

fn parse_float(field: &str, token: &str) -> Result<f64, AnnotError> {
    token.parse().map_err(|_| AnnotError::InvalidValue {
        field: field.to_string(),
        value: token.to_string(),
    })
}

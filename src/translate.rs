use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use camino::Utf8Path;
use tracing::info;

use crate::error::AnnotError;

/// Standard-genetic-code translation of one codon. Stop codons map to `*`;
/// anything with an unrecognized base maps to `X`.
pub fn translate_codon(codon: &[u8]) -> char {
    let upper: Vec<u8> = codon.iter().map(|b| b.to_ascii_uppercase()).collect();
    match upper.as_slice() {
        b"TTT" | b"TTC" => 'F',
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => 'L',
        b"ATT" | b"ATC" | b"ATA" => 'I',
        b"ATG" => 'M',
        b"GTT" | b"GTC" | b"GTA" | b"GTG" => 'V',
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => 'S',
        b"CCT" | b"CCC" | b"CCA" | b"CCG" => 'P',
        b"ACT" | b"ACC" | b"ACA" | b"ACG" => 'T',
        b"GCT" | b"GCC" | b"GCA" | b"GCG" => 'A',
        b"TAT" | b"TAC" => 'Y',
        b"TAA" | b"TAG" | b"TGA" => '*',
        b"CAT" | b"CAC" => 'H',
        b"CAA" | b"CAG" => 'Q',
        b"AAT" | b"AAC" => 'N',
        b"AAA" | b"AAG" => 'K',
        b"GAT" | b"GAC" => 'D',
        b"GAA" | b"GAG" => 'E',
        b"TGT" | b"TGC" => 'C',
        b"TGG" => 'W',
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => 'R',
        b"GGT" | b"GGC" | b"GGA" | b"GGG" => 'G',
        _ => 'X',
    }
}

/// Frame +1 translation of a nucleotide sequence; a trailing partial codon
/// is dropped.
pub fn translate_sequence(sequence: &str) -> String {
    sequence
        .as_bytes()
        .chunks_exact(3)
        .map(translate_codon)
        .collect()
}

/// Translates every record of a coding-sequence FASTA to protein, keeping
/// headers verbatim. Returns the number of records written.
pub fn translate_fasta<R: BufRead, W: Write>(
    input: R,
    mut output: W,
) -> Result<u64, AnnotError> {
    let mut records = 0;
    let mut header: Option<String> = None;
    let mut body = String::new();

    let flush = |header: &Option<String>, body: &str, output: &mut W| -> Result<(), AnnotError> {
        let Some(header) = header else {
            return Ok(());
        };
        writeln!(output, "{header}\n{}", translate_sequence(body))
            .map_err(|err| AnnotError::Filesystem(err.to_string()))
    };

    for line in input.lines() {
        let line = line.map_err(|err| AnnotError::Filesystem(err.to_string()))?;
        if line.starts_with('>') {
            flush(&header, &body, &mut output)?;
            header = Some(line);
            body.clear();
            records += 1;
        } else {
            body.push_str(line.trim());
        }
    }
    flush(&header, &body, &mut output)?;
    Ok(records)
}

pub fn translate_fasta_path(input: &Utf8Path, output: &Utf8Path) -> Result<u64, AnnotError> {
    info!("translating input fasta to: {output}");
    let reader = BufReader::new(
        File::open(input.as_std_path()).map_err(|err| AnnotError::Filesystem(err.to_string()))?,
    );
    let writer = BufWriter::new(
        File::create(output.as_std_path())
            .map_err(|err| AnnotError::Filesystem(err.to_string()))?,
    );
    translate_fasta(reader, writer)
}

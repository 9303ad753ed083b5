use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::info;

use crate::annotate::{AnnotateStats, annotate};
use crate::domain::{SeqType, Tier};
use crate::error::AnnotError;
use crate::schema::{DEFAULT_OUTPUT_FORMAT, OutputFormat};
use crate::search::{SearchEngine, SearchTask};
use crate::select::select_path;
use crate::transitive::overrides_from_path;
use crate::translate::translate_fasta_path;

#[derive(Debug, Clone)]
pub struct AnnotateRequest {
    pub fasta: Utf8PathBuf,
    pub seqtype: SeqType,
    pub uniref90db: Utf8PathBuf,
    pub uniref50db: Utf8PathBuf,
    pub transitive_map: Option<Utf8PathBuf>,
    pub temp: Utf8PathBuf,
    pub out: Option<Utf8PathBuf>,
    pub force_search: bool,
    pub flags: Vec<String>,
}

impl AnnotateRequest {
    pub fn out_path(&self) -> Utf8PathBuf {
        match &self.out {
            Some(out) => out.clone(),
            None => Utf8PathBuf::from(format!("{}.annotated", self.fasta)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotateSummary {
    pub out: Utf8PathBuf,
    pub headers: u64,
    pub uniref90_annotated: u64,
    pub uniref50_annotated: u64,
    pub overridden: u64,
    pub finished_at: String,
}

/// Runs the two searches, the per-tier selections, the optional transitive
/// override pass and the final merge, as one strict single-threaded
/// sequence of stages.
pub struct Annotator<S: SearchEngine> {
    engine: S,
}

impl<S: SearchEngine> Annotator<S> {
    pub fn new(engine: S) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &S {
        &self.engine
    }

    pub fn run(&self, request: &AnnotateRequest) -> Result<AnnotateSummary, AnnotError> {
        for path in [&request.fasta, &request.uniref90db, &request.uniref50db, &request.temp] {
            if !path.as_std_path().exists() {
                return Err(AnnotError::MissingPath(path.clone()));
            }
        }

        let format = OutputFormat::parse(DEFAULT_OUTPUT_FORMAT)?;

        // cds input is translated once and searched as protein; the final
        // annotation pass still streams the original fasta.
        let (query, seqtype) = match request.seqtype {
            SeqType::Cds => {
                let name = request.fasta.file_name().unwrap_or(request.fasta.as_str());
                let translated = request.temp.join(format!("{name}.translated"));
                translate_fasta_path(&request.fasta, &translated)?;
                (translated, SeqType::Prot)
            }
            seqtype => (request.fasta.clone(), seqtype),
        };

        let uniref90_map = self.search_tier(request, &request.uniref90db, &query, seqtype, &format)?;
        let uniref50_map = self.search_tier(request, &request.uniref50db, &query, seqtype, &format)?;

        let overrides = match &request.transitive_map {
            Some(path) => overrides_from_path(&uniref90_map, path)?,
            None => HashMap::new(),
        };

        let out = request.out_path();
        let stats = self.reannotate(&request.fasta, &out, &uniref90_map, &uniref50_map, &overrides)?;

        Ok(AnnotateSummary {
            out,
            headers: stats.headers,
            uniref90_annotated: stats.uniref90_annotated,
            uniref50_annotated: stats.uniref50_annotated,
            overridden: stats.overridden,
            finished_at: iso_timestamp(),
        })
    }

    fn search_tier(
        &self,
        request: &AnnotateRequest,
        database: &Utf8Path,
        query: &Utf8Path,
        seqtype: SeqType,
        format: &OutputFormat,
    ) -> Result<HashMap<String, String>, AnnotError> {
        // The tier is decided here, once, from the database path; every
        // later stage receives it as a value.
        let tier = Tier::infer(database.as_str())?;
        let task = SearchTask {
            database: database.to_path_buf(),
            query: query.to_path_buf(),
            seqtype,
            tier,
            temp: request.temp.clone(),
            flags: request.flags.clone(),
        };
        let results = self.engine.run(&task, request.force_search)?;
        select_path(&results, format, tier)
    }

    fn reannotate(
        &self,
        fasta: &Utf8Path,
        out: &Utf8Path,
        uniref90_map: &HashMap<String, String>,
        uniref50_map: &HashMap<String, String>,
        overrides: &HashMap<String, String>,
    ) -> Result<AnnotateStats, AnnotError> {
        info!("writing new output file: {out}");
        let reader = BufReader::new(
            File::open(fasta.as_std_path())
                .map_err(|err| AnnotError::Filesystem(err.to_string()))?,
        );
        let mut writer = BufWriter::new(
            File::create(out.as_std_path())
                .map_err(|err| AnnotError::Filesystem(err.to_string()))?,
        );
        let stats = annotate(reader, &mut writer, uniref90_map, uniref50_map, overrides)?;
        writer
            .flush()
            .map_err(|err| AnnotError::Filesystem(err.to_string()))?;
        Ok(stats)
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

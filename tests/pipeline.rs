use std::fs;
use std::sync::Mutex;

use assert_matches::assert_matches;
use camino::{Utf8Path, Utf8PathBuf};

use uniref_annotator::domain::{SeqType, Tier};
use uniref_annotator::error::AnnotError;
use uniref_annotator::pipeline::{AnnotateRequest, Annotator};
use uniref_annotator::search::{SearchEngine, SearchTask};

/// Stands in for diamond: writes canned per-tier results files and records
/// the queries it was asked to search.
struct MockSearch {
    uniref90_rows: String,
    uniref50_rows: String,
    queries: Mutex<Vec<Utf8PathBuf>>,
}

impl MockSearch {
    fn new(uniref90_rows: &str, uniref50_rows: &str) -> Self {
        Self {
            uniref90_rows: uniref90_rows.to_string(),
            uniref50_rows: uniref50_rows.to_string(),
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl SearchEngine for MockSearch {
    fn run(&self, task: &SearchTask, _force: bool) -> Result<Utf8PathBuf, AnnotError> {
        self.queries.lock().unwrap().push(task.query.clone());
        let rows = match task.tier {
            Tier::Ninety => &self.uniref90_rows,
            Tier::Fifty => &self.uniref50_rows,
        };
        let results = task.results_path();
        fs::write(results.as_std_path(), rows)
            .map_err(|err| AnnotError::Filesystem(err.to_string()))?;
        Ok(results)
    }
}

struct Workspace {
    _temp: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        Self { _temp: temp, root }
    }

    fn write(&self, name: &str, content: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(path.as_std_path(), content).unwrap();
        path
    }
}

fn request(workspace: &Workspace, fasta: Utf8PathBuf) -> AnnotateRequest {
    AnnotateRequest {
        fasta,
        seqtype: SeqType::Prot,
        uniref90db: workspace.write("uniref90_annotated.dmnd", ""),
        uniref50db: workspace.write("uniref50_annotated.dmnd", ""),
        transitive_map: None,
        temp: workspace.root.clone(),
        out: None,
        force_search: false,
        flags: Vec::new(),
    }
}

fn hit_row(qseqid: &str, sseqid: &str, pident: &str) -> String {
    format!("{qseqid}\t{sseqid}\t{pident}\t100\t1\t100\t100\t1\t100\t1e-20\n")
}

fn read(path: &Utf8Path) -> String {
    fs::read_to_string(path.as_std_path()).unwrap()
}

#[test]
fn end_to_end_annotation_with_sentinel() {
    let workspace = Workspace::new();
    let fasta = workspace.write("genes.faa", ">seq1\nMKV\n");
    let engine = MockSearch::new(&hit_row("seq1", "UniRef90_A1|extra", "95.0"), "");

    let summary = Annotator::new(engine)
        .run(&request(&workspace, fasta))
        .unwrap();

    assert_eq!(
        read(&summary.out),
        ">seq1|UniRef90_A1|UniRef50_unknown\nMKV\n"
    );
    assert_eq!(summary.headers, 1);
    assert_eq!(summary.uniref90_annotated, 1);
    assert_eq!(summary.uniref50_annotated, 0);
    assert_eq!(summary.out, workspace.root.join("genes.faa.annotated"));
}

#[test]
fn transitive_override_replaces_direct_result() {
    let workspace = Workspace::new();
    let fasta = workspace.write("genes.faa", ">seq1\nMKV\n");
    let engine = MockSearch::new(
        &hit_row("seq1", "UniRef90_A1", "95.0"),
        &hit_row("seq1", "UniRef50_X1", "60.0"),
    );

    let mut request = request(&workspace, fasta);
    request.transitive_map = Some(workspace.write("idmapping.tsv", "UniRef90_A1\tUniRef50_Z9\n"));

    let summary = Annotator::new(engine).run(&request).unwrap();
    assert_eq!(read(&summary.out), ">seq1|UniRef90_A1|UniRef50_Z9\nMKV\n");
    assert_eq!(summary.uniref50_annotated, 1);
    assert_eq!(summary.overridden, 1);
}

#[test]
fn below_threshold_hits_stay_unknown() {
    let workspace = Workspace::new();
    let fasta = workspace.write("genes.faa", ">seq1\nMKV\n");
    // 89.999 misses the uniref90 floor; 49.0 misses the uniref50 floor.
    let engine = MockSearch::new(
        &hit_row("seq1", "UniRef90_A1", "89.999"),
        &hit_row("seq1", "UniRef50_X1", "49.0"),
    );

    let summary = Annotator::new(engine)
        .run(&request(&workspace, fasta))
        .unwrap();
    assert_eq!(
        read(&summary.out),
        ">seq1|UniRef90_unknown|UniRef50_unknown\nMKV\n"
    );
    assert_eq!(summary.uniref90_annotated, 0);
}

#[test]
fn cds_input_searches_the_translated_query() {
    let workspace = Workspace::new();
    let fasta = workspace.write("genes.fna", ">seq1\nATGAAA\n");
    let engine = MockSearch::new(&hit_row("seq1", "UniRef90_A1", "95.0"), "");

    let mut request = request(&workspace, fasta);
    request.seqtype = SeqType::Cds;

    let annotator = Annotator::new(engine);
    let summary = annotator.run(&request).unwrap();

    let translated = workspace.root.join("genes.fna.translated");
    assert_eq!(read(&translated), ">seq1\nMK\n");
    // both tier searches ran against the translated protein query
    let queries = annotator.engine().queries.lock().unwrap().clone();
    assert_eq!(queries, vec![translated.clone(), translated]);
    // the annotated output still carries the original nucleotide body
    assert_eq!(read(&summary.out), ">seq1|UniRef90_A1|UniRef50_unknown\nATGAAA\n");
}

#[test]
fn missing_fasta_is_fatal() {
    let workspace = Workspace::new();
    let engine = MockSearch::new("", "");
    let err = Annotator::new(engine)
        .run(&request(&workspace, workspace.root.join("absent.faa")))
        .unwrap_err();
    assert_matches!(err, AnnotError::MissingPath(_));
}

#[test]
fn database_path_must_name_its_tier() {
    let workspace = Workspace::new();
    let fasta = workspace.write("genes.faa", ">seq1\nMKV\n");
    let engine = MockSearch::new("", "");

    let mut request = request(&workspace, fasta);
    request.uniref90db = workspace.write("swissprot.dmnd", "");

    let err = Annotator::new(engine).run(&request).unwrap_err();
    assert_matches!(err, AnnotError::TierInference(_));
}

#[test]
fn malformed_results_row_aborts_the_tier() {
    let workspace = Workspace::new();
    let fasta = workspace.write("genes.faa", ">seq1\nMKV\n");
    let engine = MockSearch::new("seq1\tUniRef90_A1\tnot-a-number\t100\t1\t100\t100\t1\t100\t0\n", "");

    let err = Annotator::new(engine)
        .run(&request(&workspace, fasta))
        .unwrap_err();
    assert_matches!(err, AnnotError::InvalidValue { .. });
}

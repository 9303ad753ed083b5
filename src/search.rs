use std::path::{Path, PathBuf};
use std::process::Command;

use camino::Utf8PathBuf;
use tracing::info;

use crate::domain::{SeqType, Tier};
use crate::error::AnnotError;
use crate::schema::DEFAULT_OUTPUT_FORMAT;

/// One tier's search: align `query` against `database` and leave the
/// tabular results under `temp`.
#[derive(Debug, Clone)]
pub struct SearchTask {
    pub database: Utf8PathBuf,
    pub query: Utf8PathBuf,
    pub seqtype: SeqType,
    pub tier: Tier,
    pub temp: Utf8PathBuf,
    pub flags: Vec<String>,
}

impl SearchTask {
    /// Results land next to the other temp files as
    /// `<temp>/<query file name>.<tier>.hits`.
    pub fn results_path(&self) -> Utf8PathBuf {
        let name = self.query.file_name().unwrap_or(self.query.as_str());
        self.temp.join(format!("{name}.{}.hits", self.tier.label()))
    }
}

pub trait SearchEngine {
    /// Runs the search unless a results file already exists (and `force`
    /// is off), returning the results path. A pre-existing file is trusted
    /// as-is; no integrity check is performed.
    fn run(&self, task: &SearchTask, force: bool) -> Result<Utf8PathBuf, AnnotError>;
}

#[derive(Debug)]
pub struct DiamondSearch {
    binary: PathBuf,
}

impl DiamondSearch {
    /// Resolves the diamond binary: an explicit path is used directly,
    /// a bare name is looked up on PATH.
    pub fn new(diamond: &str) -> Result<Self, AnnotError> {
        let direct = Path::new(diamond);
        let binary = if direct.components().count() > 1 {
            direct.is_file().then(|| direct.to_path_buf())
        } else {
            find_in_path(diamond)
        };
        let binary = binary.ok_or_else(|| AnnotError::MissingTool(diamond.to_string()))?;
        Ok(Self { binary })
    }

    fn command_args(task: &SearchTask) -> Vec<String> {
        let mut args = vec![
            task.seqtype.diamond_mode().to_string(),
            "--db".to_string(),
            task.database.to_string(),
            "--query".to_string(),
            task.query.to_string(),
            "--outfmt".to_string(),
        ];
        args.extend(DEFAULT_OUTPUT_FORMAT.split_whitespace().map(String::from));
        args.extend([
            "--tmpdir".to_string(),
            task.temp.to_string(),
            "--out".to_string(),
            task.results_path().to_string(),
            "--id".to_string(),
            format!("{}", task.tier.min_identity() as u32),
        ]);
        args.extend(task.flags.iter().cloned());
        args
    }
}

impl SearchEngine for DiamondSearch {
    fn run(&self, task: &SearchTask, force: bool) -> Result<Utf8PathBuf, AnnotError> {
        for path in [&task.database, &task.query, &task.temp] {
            if !path.as_std_path().exists() {
                return Err(AnnotError::MissingPath(path.clone()));
            }
        }

        let results = task.results_path();
        if results.as_std_path().exists() && !force {
            info!("using existing results file: {results}");
            return Ok(results);
        }

        let args = Self::command_args(task);
        info!("executing: {} {}", self.binary.display(), args.join(" "));
        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|err| AnnotError::Search(err.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("diamond exited with {}", output.status)
            } else {
                stderr
            };
            return Err(AnnotError::Search(message));
        }
        Ok(results)
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}

use std::io::{self, Write};

use serde::Serialize;

use crate::check::CheckReport;
use crate::pipeline::AnnotateSummary;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(result: &AnnotateSummary) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_check(result: &CheckReport) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

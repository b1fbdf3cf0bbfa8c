//! Directory-level conversion
//!
//! Every entry of the input directory whose name ends in the input extension
//! is converted on its own. A failing file produces an error line and the run
//! moves on; only an unusable input directory stops the batch.

use super::{ConvertError, ConvertOptions, ConvertResult, GraphConverter};
use crate::config::ConverterConfig;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Result of converting one candidate file
#[derive(Debug)]
pub struct FileOutcome {
    /// Name of the input file inside the input directory
    pub file_name: String,
    /// Path of the written snapshot, or why there is none
    pub result: ConvertResult<PathBuf>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes of one batch run, in processing order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Snapshots written by this run
    pub fn converted(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed files with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ConvertError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file_name.as_str(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Convert every DOT file of `config.input_dir` into `config.output_dir`
///
/// One line per candidate file is written to `out`. A missing input directory
/// is reported on `out` as well and returned as the only fatal error; the
/// output directory is not created in that case.
pub fn convert_directory<W: Write>(
    config: &ConverterConfig,
    out: &mut W,
) -> ConvertResult<BatchReport> {
    let input_dir = &config.input_dir;
    if !input_dir.exists() {
        writeln!(
            out,
            "Error: Input folder '{}' does not exist!",
            input_dir.display()
        )?;
        return Err(ConvertError::MissingInputDirectory(input_dir.clone()));
    }

    if config.create_output_dir {
        fs::create_dir_all(&config.output_dir).map_err(|source| {
            ConvertError::OutputDirectory {
                path: config.output_dir.clone(),
                source,
            }
        })?;
    }

    let candidates = list_candidates(config)?;
    info!(
        "Converting {} file(s) from {:?} into {:?}",
        candidates.len(),
        input_dir,
        config.output_dir
    );

    let converter = GraphConverter::new(ConvertOptions::from(config));
    let mut report = BatchReport::default();

    for (file_name, path) in candidates {
        let result = converter.convert_file(&path, &config.output_dir);
        match &result {
            Ok(output) => {
                writeln!(
                    out,
                    "Successfully converted: {} -> {}",
                    file_name,
                    output.display()
                )?;
            }
            Err(err) => {
                warn!("Skipping {}: {}", file_name, err);
                writeln!(out, "Error processing {}: {}", file_name, err)?;
            }
        }
        report.outcomes.push(FileOutcome { file_name, result });
    }

    info!(
        "Batch finished: {} converted, {} failed",
        report.success_count(),
        report.failure_count()
    );
    Ok(report)
}

/// Entries ending in the input extension, sorted by raw name
///
/// Names are matched on their encoded bytes so that non UTF-8 names are
/// still candidates; the reported name is their lossy form.
fn list_candidates(config: &ConverterConfig) -> ConvertResult<Vec<(String, PathBuf)>> {
    let list_error = |source| ConvertError::ListDirectory {
        path: config.input_dir.clone(),
        source,
    };
    let suffix = config.input_extension.as_bytes();

    let mut candidates: Vec<(OsString, PathBuf)> = Vec::new();
    for entry in fs::read_dir(&config.input_dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let file_name = entry.file_name();
        if file_name.as_encoded_bytes().ends_with(suffix) {
            candidates.push((file_name, entry.path()));
        }
    }

    candidates.sort();
    Ok(candidates
        .into_iter()
        .map(|(name, path)| {
            if name.to_str().is_none() {
                warn!("Reporting non UTF-8 file name {:?} lossily", name);
            }
            (name.to_string_lossy().into_owned(), path)
        })
        .collect())
}

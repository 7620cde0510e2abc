//! Loading tasks from paired input/output lists.

#[cfg(unix)]
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::Task;

/// Errors that abort a run before any task starts.
#[derive(Debug, Error)]
pub enum LoadError {
    /// One of the list files could not be opened.
    #[error("Cannot open {role} file {}: {source}", path.display())]
    OpenFailed {
        role: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    /// A list file could not be read to the end.
    #[error("Failed to read {role} file {}: {source}", path.display())]
    ReadFailed {
        role: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

/// Pairs an inputs list with an outputs list.
///
/// Line *i* of the inputs list is paired with line *i* of the outputs list.
/// A pair is dropped when either side is empty, and sequence indices are
/// assigned only to retained pairs. When one list is longer than the other
/// the unpaired trailing lines are ignored with a warning.
#[derive(Debug, Clone)]
pub struct TaskLoader {
    inputs: PathBuf,
    outputs: PathBuf,
}

impl TaskLoader {
    /// Create a loader for the two list files.
    pub fn new(inputs: impl Into<PathBuf>, outputs: impl Into<PathBuf>) -> Self {
        Self {
            inputs: inputs.into(),
            outputs: outputs.into(),
        }
    }

    /// Open both lists and produce the ordered task sequence.
    ///
    /// An empty result is not an error.
    pub fn load(&self) -> Result<Vec<Task>, LoadError> {
        let inputs = open_list("input", &self.inputs)?;
        let outputs = open_list("output", &self.outputs)?;

        let input_lines = read_lines(inputs, "input", &self.inputs)?;
        let output_lines = read_lines(outputs, "output", &self.outputs)?;
        let tasks = pair_lines(input_lines, output_lines);

        debug!(
            inputs = %self.inputs.display(),
            outputs = %self.outputs.display(),
            tasks = tasks.len(),
            "Loaded task lists"
        );

        Ok(tasks)
    }

    /// Pair two already-open line sources.
    pub fn from_readers<A: BufRead, B: BufRead>(inputs: A, outputs: B) -> io::Result<Vec<Task>> {
        Ok(pair_lines(split_lines(inputs)?, split_lines(outputs)?))
    }
}

fn open_list(role: &'static str, path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::OpenFailed {
            role,
            path: path.to_path_buf(),
            source,
        })
}

fn read_lines(
    reader: BufReader<File>,
    role: &'static str,
    path: &Path,
) -> Result<Vec<Vec<u8>>, LoadError> {
    split_lines(reader).map_err(|source| LoadError::ReadFailed {
        role,
        path: path.to_path_buf(),
        source,
    })
}

/// Lines as raw bytes, so paths that are not valid UTF-8 survive.
fn split_lines<R: BufRead>(reader: R) -> io::Result<Vec<Vec<u8>>> {
    reader.split(b'\n').collect()
}

fn pair_lines(inputs: Vec<Vec<u8>>, outputs: Vec<Vec<u8>>) -> Vec<Task> {
    if inputs.len() != outputs.len() {
        warn!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            unpaired = inputs.len().abs_diff(outputs.len()),
            "Input and output lists differ in length, ignoring unpaired trailing lines"
        );
    }

    let mut tasks = Vec::new();
    for (input, output) in inputs.into_iter().zip(outputs) {
        let input = strip_cr(input);
        let output = strip_cr(output);
        if input.is_empty() || output.is_empty() {
            continue;
        }
        let index = tasks.len();
        tasks.push(Task::new(line_to_path(input), line_to_path(output), index));
    }
    tasks
}

fn strip_cr(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

#[cfg(unix)]
fn line_to_path(line: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(line))
}

#[cfg(not(unix))]
fn line_to_path(line: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&line).into_owned())
}

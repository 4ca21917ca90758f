use crate::config::DEFAULT_INPUT;
use crate::utils::error::{EtlError, Result};
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Finds the source CSV, asking the operator when no argument was given.
///
/// The console streams are generic so the dialogue can be driven from tests.
pub struct InputResolver<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    default_dir: PathBuf,
}

impl<R: BufRead, W: Write> InputResolver<R, W> {
    /// `default_dir` is where `in.csv` is looked up when the prompt is left empty.
    pub fn new(reader: R, writer: W, default_dir: PathBuf) -> Self {
        Self {
            reader,
            writer,
            default_dir,
        }
    }

    pub fn resolve(&mut self, arg: Option<&str>) -> Result<PathBuf> {
        let candidate = match arg {
            Some(path) => {
                writeln!(self.writer, "Input file specified as {}", path)?;
                PathBuf::from(path)
            }
            None => {
                writeln!(
                    self.writer,
                    "Enter file location (drag file to window) or hit ENTER for default ({}):",
                    DEFAULT_INPUT
                )?;
                let answer = self.read_answer()?;
                if answer.is_empty() {
                    writeln!(self.writer, "Attempting to use default file {}", DEFAULT_INPUT)?;
                    self.default_dir.join(DEFAULT_INPUT)
                } else {
                    writeln!(self.writer, "Looking for {}", answer)?;
                    PathBuf::from(answer)
                }
            }
        };

        if candidate.is_file() {
            return self.found(candidate);
        }

        tracing::debug!("Input candidate {} does not exist", candidate.display());
        writeln!(self.writer, "{} doesn't exist.", candidate.display())?;
        writeln!(self.writer, "Enter input file location (full path):")?;
        let retry = self.read_answer()?;
        if retry.is_empty() {
            return Err(EtlError::FileNotFound {
                path: candidate.display().to_string(),
            });
        }

        let retry = PathBuf::from(retry);
        if retry.is_file() {
            return self.found(retry);
        }

        Err(EtlError::FileNotFound {
            path: retry.display().to_string(),
        })
    }

    fn found(&mut self, path: PathBuf) -> Result<PathBuf> {
        writeln!(self.writer, "Found source CSV: {}", path.display())?;
        Ok(path)
    }

    /// Reads one line; end of input counts as an empty answer.
    fn read_answer(&mut self) -> Result<String> {
        self.writer.flush()?;
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(clean_answer(&line))
    }
}

/// Trims whitespace and the quotes terminals add around dragged-in paths.
pub fn clean_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

/// Directory holding the running executable, where the default input and
/// output files live. Falls back to the working directory.
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Prints "Press ENTER to exit." and waits for a line.
pub fn pause<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<()> {
    writeln!(writer, "Press ENTER to exit.")?;
    writer.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(())
}

/// Keeps a double-clicked console window open until the operator has read it.
/// Skipped when stdin is not a terminal or `--no-pause` was given.
pub fn pause_for_exit(no_pause: bool) {
    let stdin = std::io::stdin();
    if no_pause || !stdin.is_terminal() {
        return;
    }
    if let Err(e) = pause(&mut stdin.lock(), &mut std::io::stdout()) {
        tracing::debug!("Exit prompt failed: {}", e);
    }
}

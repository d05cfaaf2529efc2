use clap::Args;
use fe3h_text::{detect_among, Document, Format, Text};
use miette::{miette, Context, IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::commands::{bin_files, file_stem, language_path, new_path, text_path, Summary};
use crate::escape::from_text;

#[derive(Args)]
pub struct InsertArgs {
    /// A directory of containers and the text files extracted from them
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,
}

/// Unescaped lines of `path`, `None` when there is no such file
fn read_lines(path: &Path, expected: usize) -> Result<Option<Vec<String>>> {
    if !path.is_file() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(path)
        .into_diagnostic()
        .context(format!("reading {}", path.display()))?;
    let lines = from_text(&text).context(format!("parsing {}", path.display()))?;

    fit_lines(path, lines, expected).map(Some)
}

/// The first `expected` lines. Missing lines are an error, extra lines are dropped.
pub fn fit_lines(path: &Path, mut lines: Vec<String>, expected: usize) -> Result<Vec<String>> {
    if lines.len() < expected {
        return Err(miette!(
            "{} has {} lines, the container holds {expected} strings",
            path.display(),
            lines.len()
        ));
    }
    if lines.len() > expected {
        warn!(
            "{}: ignoring {} lines past the {expected} strings of the container",
            path.display(),
            lines.len() - expected
        );
        lines.truncate(expected);
    }
    Ok(lines)
}

/// Replace the strings of `original` with those found in the text files next to `path`.
/// `None` when no text file exists at all.
pub fn edited_text(path: &Path, original: Text) -> Result<Option<Text>> {
    match original {
        Text::Lines(lines) => {
            Ok(read_lines(&text_path(path), lines.len())?.map(Text::Lines))
        }
        Text::Languages(languages) => {
            let mut edited = false;
            let languages = languages
                .into_iter()
                .enumerate()
                .map(|(index, lines)| -> Result<Vec<String>> {
                    let file = language_path(path, index);
                    match read_lines(&file, lines.len())? {
                        Some(lines) => {
                            edited = true;
                            Ok(lines)
                        }
                        None => {
                            debug!("{}: keeping language {index}", path.display());
                            Ok(lines)
                        }
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(edited.then_some(Text::Languages(languages)))
        }
    }
}

impl InsertArgs {
    fn handle_file(&self, path: &Path) -> Result<bool> {
        let data = std::fs::read(path)
            .into_diagnostic()
            .context(format!("reading {}", path.display()))?;

        let Some(format) = detect_among(&data, Format::candidates(&file_stem(path))) else {
            debug!("{}: no known format", path.display());
            return Ok(false);
        };

        let (document, original) = Document::open_as(&data, format)?;
        let Some(text) = edited_text(path, original)? else {
            debug!("{}: no text files", path.display());
            return Ok(false);
        };

        let output = document.export(&text)?;
        let target = new_path(path);
        info!("writing {}", target.display());
        std::fs::write(&target, output)
            .into_diagnostic()
            .context(format!("writing {}", target.display()))?;

        Ok(true)
    }

    pub fn handle(&self) -> Result<()> {
        bin_files(&self.directory)
            .into_iter()
            .map(|path| {
                let result = self.handle_file(&path);
                (path, result)
            })
            .collect::<Summary>()
            .print("rebuilt");

        Ok(())
    }
}

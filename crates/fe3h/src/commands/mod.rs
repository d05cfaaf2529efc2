pub mod detect;
pub mod extract;
pub mod insert;
pub mod repack;

use std::path::{Path, PathBuf};

use miette::Report;
use owo_colors::OwoColorize;
use tracing::warn;
use walkdir::WalkDir;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Sniff the format of every container in a directory and name the files after it
    Detect(detect::DetectArgs),
    /// Write the strings of every known container to text files
    Extract(extract::ExtractArgs),
    /// Rebuild containers from edited text files
    Insert(insert::InsertArgs),
    /// Point the file table at the files placed in the mods directory
    Repack(repack::RepackArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Detect(detect) => detect.handle(),
            Commands::Extract(extract) => extract.handle(),
            Commands::Insert(insert) => insert.handle(),
            Commands::Repack(repack) => repack.handle(),
        }
    }
}

/// Every `.bin` file below `directory`, sorted by path
pub fn bin_files(directory: &Path) -> Vec<PathBuf> {
    let mut files = WalkDir::new(directory)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"))
        })
        .collect::<Vec<_>>();
    files.sort();
    files
}

/// Stem of `path` as a string, empty when it has none
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Text file holding the strings of a single sequence container
pub fn text_path(path: &Path) -> PathBuf {
    path.with_file_name(format!("{}.txt", file_stem(path)))
}

/// Text file holding the strings of one language of a nested container
pub fn language_path(path: &Path, language: usize) -> PathBuf {
    path.with_file_name(format!("{}_{language}.txt", file_stem(path)))
}

/// Output of a rebuilt container, next to the original
pub fn new_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".new");
    path.with_file_name(name)
}

/// Tally of a batch where a failing file does not stop the others
#[derive(Debug, Default)]
pub struct Summary {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    /// Count the result of a file, logging its error
    pub fn record(&mut self, path: &Path, result: miette::Result<bool>) {
        match result {
            Ok(true) => self.done += 1,
            Ok(false) => self.skipped += 1,
            Err(report) => {
                self.failed += 1;
                warn!("{}: {report:?}", path.display());
            }
        }
    }

    /// Print the tally
    pub fn print(&self, verb: &str) {
        println!(
            "{} {verb}, {} skipped, {} failed",
            self.done.green(),
            self.skipped.yellow(),
            self.failed.red()
        );
    }
}

impl FromIterator<(PathBuf, Result<bool, Report>)> for Summary {
    fn from_iter<T: IntoIterator<Item = (PathBuf, Result<bool, Report>)>>(iter: T) -> Self {
        let mut summary = Summary::default();
        for (path, result) in iter {
            summary.record(&path, result);
        }
        summary
    }
}

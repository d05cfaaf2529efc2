use clap::Args;
use fe3h_info::{FileTable, ModFile, PatchOutcome};
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::commands::new_path;

#[derive(Args)]
pub struct RepackArgs {
    /// The INFO0 file, INFO1 and INFO2 are expected next to it
    #[arg(short, long, value_name = "FILE")]
    info: PathBuf,

    /// Directory of replacement files, `mods` in the romfs root holding the INFO directory
    /// by default
    #[arg(short, long, value_name = "DIR")]
    mods: Option<PathBuf>,
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .into_diagnostic()
        .context(format!("reading {}", path.display()))
}

fn write(path: &Path, data: &[u8]) -> Result<()> {
    let target = new_path(path);
    info!("writing {}", target.display());
    std::fs::write(&target, data)
        .into_diagnostic()
        .context(format!("writing {}", target.display()))
}

/// The `mods` directory of the romfs the INFO files at `info` belong to.
///
/// The INFO files live one directory below the romfs root, the mods directory sits in the
/// root itself.
pub fn default_mods(info: &Path) -> Option<PathBuf> {
    let romfs = info.parent()?.parent()?;
    Some(romfs.join("mods"))
}

/// Every file below `mods`, as paths relative to it with their sizes
pub fn mod_files(mods: &Path) -> Result<Vec<ModFile>> {
    WalkDir::new(mods)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .sorted_by(|a, b| a.path().cmp(b.path()))
        .map(|entry| -> Result<ModFile> {
            let name = entry.path().strip_prefix(mods).into_diagnostic()?;
            let size = entry
                .metadata()
                .into_diagnostic()
                .context(format!("reading {}", entry.path().display()))?
                .len();

            Ok(ModFile::builder()
                .path(name.to_string_lossy())
                .size(size)
                .build())
        })
        .collect()
}

impl RepackArgs {
    pub fn handle(&self) -> Result<()> {
        let directory = self
            .info
            .parent()
            .ok_or(miette!("{} has no parent directory", self.info.display()))?;
        let named_path = directory.join("INFO1.bin");
        let counts_path = directory.join("INFO2.bin");

        let mut table = FileTable::load(
            &read(&self.info)?,
            &read(&named_path)?,
            &read(&counts_path)?,
        )?;
        info!("loaded {} entries", table.len());

        let mods = match &self.mods {
            Some(mods) => mods.clone(),
            None => default_mods(&self.info).ok_or(miette!(
                "no romfs directory above {}, pass --mods",
                self.info.display()
            ))?,
        };
        let files = mod_files(&mods)?;
        if files.is_empty() {
            return Err(miette!("{} holds no files", mods.display()));
        }

        let (mut patched, mut skipped, mut failed) = (0, 0, 0);
        for file in &files {
            match table.apply_mod(file) {
                Ok(PatchOutcome::Indexed(id)) => {
                    info!("{} -> entry {id}", file.path);
                    patched += 1;
                }
                Ok(PatchOutcome::Renamed(index)) => {
                    info!("{} -> named entry {index}", file.path);
                    patched += 1;
                }
                Ok(PatchOutcome::Skipped) => {
                    warn!("{}: no matching entry", file.path);
                    skipped += 1;
                }
                Err(e) => {
                    warn!("{}: {:?}", file.path, miette::Report::new(e));
                    failed += 1;
                }
            }
        }

        let saved = table.save()?;
        write(&self.info, &saved.indexed)?;
        write(&named_path, &saved.named)?;
        write(&counts_path, &saved.counts)?;

        println!(
            "{} patched, {} skipped, {} failed",
            patched.green(),
            skipped.yellow(),
            failed.red()
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};

    use crate::commands::repack::default_mods;

    #[test]
    fn mods_sit_in_the_romfs_root() {
        assert_eq!(
            default_mods(Path::new("romfs/patch4/INFO0.bin")),
            Some(PathBuf::from("romfs/mods"))
        );
        assert_eq!(
            default_mods(Path::new("/game/romfs/patch/INFO0.bin")),
            Some(PathBuf::from("/game/romfs/mods"))
        );
        assert_eq!(default_mods(Path::new("INFO0.bin")), None);
    }
}

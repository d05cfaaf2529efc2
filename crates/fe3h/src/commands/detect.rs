use clap::Args;
use fe3h_info::file_id;
use fe3h_text::{detect, Format};
use miette::{miette, Context, IntoDiagnostic, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::commands::{bin_files, Summary};

#[derive(Args)]
pub struct DetectArgs {
    /// A directory of extracted containers
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Only report what would be renamed
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

/// File name for a container of `format` with the given id, as in `1234_scene.bin`
pub fn detected_name(id: u64, format: Format) -> String {
    format!("{id}_{}.bin", format.suffix())
}

impl DetectArgs {
    fn handle_file(&self, path: &Path) -> Result<bool> {
        let data = std::fs::read(path)
            .into_diagnostic()
            .context(format!("reading {}", path.display()))?;

        let Some(format) = detect(&data) else {
            debug!("{}: unknown format", path.display());
            return Ok(false);
        };
        let Some(id) = file_id(path) else {
            info!("{}: {format}, no id to rename with", path.display());
            return Ok(false);
        };

        let target = path.with_file_name(detected_name(id, format));
        if target == path {
            return Ok(false);
        }
        if target.exists() {
            return Err(miette!("{} already exists", target.display()));
        }

        info!("{} -> {} ({format})", path.display(), target.display());
        if !self.dry_run {
            std::fs::rename(path, &target)
                .into_diagnostic()
                .context(format!("renaming {}", path.display()))?;
        }
        Ok(true)
    }

    pub fn handle(&self) -> Result<()> {
        let files = bin_files(&self.directory);
        if files.is_empty() {
            return Err(miette!("no .bin files in {}", self.directory.display()));
        }

        let results = files
            .into_par_iter()
            .map(|path| {
                let result = self.handle_file(&path);
                (path, result)
            })
            .collect::<Vec<_>>();

        results
            .into_iter()
            .collect::<Summary>()
            .print(if self.dry_run { "to rename" } else { "renamed" });

        Ok(())
    }
}

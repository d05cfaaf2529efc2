use clap::Args;
use fe3h_text::{detect_among, Document, Format, Text};
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::commands::{bin_files, file_stem, language_path, text_path, Summary};
use crate::escape::to_text;

#[derive(Args)]
pub struct ExtractArgs {
    /// A directory of containers
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting existing text files
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    fn write(&self, path: &Path, lines: &[String]) -> Result<()> {
        info!("writing {}", path.display());

        let mut out = if !self.overwrite {
            File::create_new(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))?
        } else {
            File::create(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))?
        };

        out.write_all(to_text(lines).as_bytes())
            .into_diagnostic()
            .context(format!("writing {}", path.display()))
    }

    fn handle_file(&self, path: &Path) -> Result<bool> {
        let data = std::fs::read(path)
            .into_diagnostic()
            .context(format!("reading {}", path.display()))?;

        let Some(format) = detect_among(&data, Format::candidates(&file_stem(path))) else {
            debug!("{}: no known format", path.display());
            return Ok(false);
        };
        debug!("{}: {format}", path.display());

        let (_, text) = Document::open_as(&data, format)?;

        match text {
            Text::Lines(lines) => self.write(&text_path(path), &lines)?,
            Text::Languages(languages) => {
                for (index, lines) in languages.iter().enumerate() {
                    self.write(&language_path(path, index), lines)?;
                }
            }
        }
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
            .print("extracted");

        Ok(())
    }
}

use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use clap_complete::{generate, Generator, Shell};
use tracing::info;

use gridfail_cli::cli::build_cli_command;

use crate::commands::ensure_parent;

const BIN_NAME: &str = "gridfail";

/// Print completions, or write them to `out`. A directory receives the
/// shell's conventional file name (`gridfail.bash`, `_gridfail`, ...).
pub fn handle(shell: Shell, out: Option<&Path>) -> Result<()> {
    let mut cmd = build_cli_command();
    let Some(out) = out else {
        generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
        return Ok(());
    };
    let path = if out.is_dir() {
        out.join(shell.file_name(BIN_NAME))
    } else {
        out.to_path_buf()
    };
    ensure_parent(&path)?;
    let mut file =
        fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    generate(shell, &mut cmd, BIN_NAME, &mut file);
    info!("Wrote {shell} completion to {}", path.display());
    println!("{}", path.display());
    Ok(())
}

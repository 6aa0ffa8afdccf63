//! Man page generation for packaging.
//!
//! Renders one roff page per visible command into a directory so release
//! tooling can ship them alongside the binary.

use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

use crate::cli::{Cli, GlobalOpts, ManArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ManArgs, global: &GlobalOpts) -> Result<(), CliError> {
    fs::create_dir_all(&args.out_dir)?;

    let mut written = Vec::new();
    write_pages(&Cli::command(), &args.out_dir, &mut written)?;
    tracing::info!(dir = %args.out_dir.display(), pages = written.len(), "wrote man pages");

    let listing = written
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    output::print_output(&listing, global.quiet);
    Ok(())
}

/// Render `cmd` and then each visible subcommand as `<parent>-<sub>.1`.
fn write_pages(
    cmd: &clap::Command,
    dir: &Path,
    written: &mut Vec<PathBuf>,
) -> Result<(), CliError> {
    let name = cmd.get_name().to_owned();
    let path = dir.join(format!("{name}.1"));

    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buf)?;
    fs::write(&path, buf)?;
    written.push(path);

    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let sub = sub.clone().name(format!("{name}-{}", sub.get_name()));
        write_pages(&sub, dir, written)?;
    }
    Ok(())
}

use std::io;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bgstats_catalog::{load_source_files, save_export};
use bgstats_merge::{LogProgress, merge_exports};

use crate::CliError;
use crate::display::stats_lines;
use crate::prompt::TerminalDecider;
use crate::settings::resolve_output_path;

/// Load every file, run the interactive merge, and write the result once.
pub(crate) fn run_merge(
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    base: Option<String>,
    player: Option<u32>,
) -> Result<(), CliError> {
    let output = resolve_output_path(output);
    if files.iter().any(|f| same_path(f, &output)) {
        return Err(CliError::other(format!(
            "Output {} is one of the input files",
            output.display()
        )));
    }

    // Every input must parse before any question is asked.
    let sources = load_source_files(files.as_slice())?;
    log::info!(
        "{}",
        format!("Loaded {} export files", sources.len()).if_supports_color(Stdout, |t| t.bold()),
    );
    for (i, source) in sources.iter().enumerate() {
        log::info!("  {}) {}", i + 1, source.label());
    }

    let stdin = io::stdin();
    let mut decider = TerminalDecider::new(stdin.lock(), base, player);
    let outcome = merge_exports(&sources, &mut decider, Some(&LogProgress))?;

    save_export(&output, &outcome.export)?;

    crate::log_blank();
    log::info!(
        "{} Wrote {} plays to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        outcome.export.plays.len(),
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    for line in stats_lines(&outcome.stats) {
        log::info!("{}", line);
    }

    Ok(())
}

/// Compare two paths after resolving `.`/`..` and symlinks. The output may
/// not exist yet, so its parent is resolved and the file name appended.
fn same_path(a: &Path, b: &Path) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(full) = path.canonicalize() {
        return Some(full);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}

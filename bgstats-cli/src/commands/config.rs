use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{
    load_settings_string, resolve_output_path, save_output_path, settings_path,
};

/// Show the settings file and the output path a merge would use.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!("{}", "Settings".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!(
        "  Merge output:  {}",
        resolve_output_path(None).display()
    );

    if let Some(contents) = load_settings_string(&path) {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }

    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}

pub(crate) fn run_config_set_output(output: PathBuf) -> Result<(), CliError> {
    if output.as_os_str().is_empty() {
        return Err(CliError::config("output path is empty"));
    }
    let path = settings_path();
    save_output_path(&path, Some(&output))
        .map_err(|e| CliError::config(format!("Failed to save {}: {}", path.display(), e)))?;
    log::info!(
        "{} Merged exports will be written to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        output.display(),
    );
    Ok(())
}

pub(crate) fn run_config_clear_output() -> Result<(), CliError> {
    let path = settings_path();
    if !path.exists() {
        log::info!("No settings file; nothing to clear.");
        return Ok(());
    }
    save_output_path(&path, None)
        .map_err(|e| CliError::config(format!("Failed to save {}: {}", path.display(), e)))?;
    log::info!(
        "{} Output path cleared; merges write to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        crate::settings::DEFAULT_OUTPUT,
    );
    Ok(())
}

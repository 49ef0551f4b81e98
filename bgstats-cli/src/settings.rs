//! Persistent settings (`~/.config/bgstats-merge/settings.toml`).
//!
//! Only `[merge] output` is read by the tool. Other keys are left alone when
//! the file is updated.

use std::io;
use std::path::{Path, PathBuf};

/// Output file used when neither `--output` nor the settings name one.
pub(crate) const DEFAULT_OUTPUT: &str = "export.json";

/// Canonical path to the settings file: `~/.config/bgstats-merge/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("bgstats-merge").join("settings.toml")
}

/// Resolve the output path using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `merge.output` in `settings.toml`
/// 3. `export.json` in the current directory
pub(crate) fn resolve_output_path(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| load_output_path(&settings_path()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

/// Read `merge.output` from a settings file, if set.
pub(crate) fn load_output_path(settings: &Path) -> Option<PathBuf> {
    let contents = std::fs::read_to_string(settings).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let output = doc.get("merge")?.get("output")?.as_str()?;
    if output.is_empty() {
        None
    } else {
        Some(PathBuf::from(output))
    }
}

/// Save (or clear) the output path in a settings file.
pub(crate) fn save_output_path(settings: &Path, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = match std::fs::read_to_string(settings) {
        Ok(contents) => contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default())),
        Err(_) => toml::Value::Table(Default::default()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let merge = table
        .entry("merge")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let merge = merge
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[merge] is not a table"))?;

    match path {
        Some(p) => {
            merge.insert(
                "output".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            merge.remove("output");
        }
    }

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub(crate) fn load_settings_string(settings: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(settings).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

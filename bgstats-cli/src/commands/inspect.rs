use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bgstats_catalog::load_source_files;

use crate::CliError;

/// Print what each file contains, without merging anything.
pub(crate) fn run_inspect(files: &[PathBuf]) -> Result<(), CliError> {
    let sources = load_source_files(files)?;

    for source in &sources {
        let export = &source.export;
        log::info!("{}", source.label().if_supports_color(Stdout, |t| t.bold()));
        log::info!("  Games:      {:>6}", export.games.len());
        log::info!("  Locations:  {:>6}", export.locations.len());
        log::info!("  Players:    {:>6}", export.players.len());
        log::info!("  Plays:      {:>6}", export.plays.len());

        let mut players: Vec<_> = export.players.iter().collect();
        players.sort_by_key(|p| p.id);
        for player in players {
            let plays = export.plays.iter().filter(|p| p.has_player(player.id)).count();
            let owner = if export.user_info.me_ref_id == Some(player.id) {
                format!(" {}", "(owner)".if_supports_color(Stdout, |t| t.green()))
            } else {
                String::new()
            };
            log::info!(
                "    {:>4} - {} {}{}",
                player.id,
                player.display_name(),
                format!("[{} plays]", plays).if_supports_color(Stdout, |t| t.dimmed()),
                owner,
            );
        }
        crate::log_blank();
    }

    Ok(())
}

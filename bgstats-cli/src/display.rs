//! Text rendering shared by the commands and the prompts.

use bgstats_merge::{MergeStats, ScoreRow};

const COLUMN: usize = 30;

/// Side-by-side score comparison, one line per player, with a header.
pub(crate) fn score_table(rows: &[ScoreRow]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_line("Player", "Old Play", "New Play"));
    lines.push("-".repeat(COLUMN * 3));
    for row in rows {
        lines.push(table_line(
            &row.player,
            row.old_score.as_deref().unwrap_or("-"),
            row.new_score.as_deref().unwrap_or("-"),
        ));
    }
    lines
}

fn table_line(player: &str, old: &str, new: &str) -> String {
    format!(
        "{:<w$}{:<w$}{}",
        clip(player),
        clip(old),
        clip(new),
        w = COLUMN
    )
}

/// Cut a cell so it leaves at least one space before the next column.
fn clip(text: &str) -> String {
    if text.chars().count() < COLUMN {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(COLUMN - 2).collect();
        cut.push('~');
        cut
    }
}

/// Summary lines printed after a merge.
pub(crate) fn stats_lines(stats: &MergeStats) -> Vec<String> {
    let mut lines = vec![
        format!("  Seed plays:        {:>6}", stats.seed_plays),
        format!(
            "  Files merged:      {:>6}  (skipped {})",
            stats.files_merged, stats.files_skipped
        ),
        format!("  Plays checked:     {:>6}", stats.plays_considered),
        format!(
            "  Already merged:    {:>6}  (by uuid {}, by content {})",
            stats.plays_skipped_uuid + stats.plays_already_present,
            stats.plays_skipped_uuid,
            stats.plays_already_present
        ),
        format!(
            "  Added:             {:>6}  (after review {})",
            stats.plays_added + stats.plays_added_on_conflict,
            stats.plays_added_on_conflict
        ),
        format!("  Replaced:          {:>6}", stats.plays_replaced),
        format!("  Ignored:           {:>6}", stats.plays_ignored),
        format!(
            "  New entities:      {:>6}  ({} games, {} locations, {} players)",
            stats.games_created + stats.locations_created + stats.players_created,
            stats.games_created,
            stats.locations_created,
            stats.players_created
        ),
    ];
    if stats.dangling_references > 0 {
        lines.push(format!(
            "  Dropped refs:      {:>6}",
            stats.dangling_references
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(player: &str, old: Option<&str>, new: Option<&str>) -> ScoreRow {
        ScoreRow {
            player: player.to_string(),
            old_score: old.map(str::to_string),
            new_score: new.map(str::to_string),
        }
    }

    #[test]
    fn table_columns_line_up() {
        let lines = score_table(&[
            row("Alice", Some("10"), Some("10")),
            row("Bob", Some("8"), None),
        ]);

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Player"));
        assert_eq!(lines[0].find("Old Play"), Some(30));
        assert_eq!(lines[0].find("New Play"), Some(60));
        assert_eq!(lines[2].find("10"), Some(30));
        assert_eq!(&lines[3][60..], "-");
    }

    #[test]
    fn long_names_are_clipped() {
        let name = "A".repeat(40);
        let lines = score_table(&[row(&name, Some("1"), Some("2"))]);
        assert_eq!(lines[2].find('1'), Some(30));
        assert!(lines[2].contains('~'));
    }

    #[test]
    fn dropped_refs_only_when_present() {
        let mut stats = MergeStats::default();
        assert!(!stats_lines(&stats).iter().any(|l| l.contains("Dropped")));
        stats.dangling_references = 2;
        assert!(stats_lines(&stats).iter().any(|l| l.contains("Dropped")));
    }
}

//! Terminal implementation of the merge's decision points.
//!
//! Every choice is a numbered list. Typing a number picks an entry, `n`
//! picks the extra option (create new / skip file) where there is one, `q`
//! aborts the merge, and any other text filters the list.

use std::io::{self, BufRead, Write};
use std::path::Path;

use bgstats_catalog::Player;
use bgstats_merge::{
    Candidate, Decider, DecisionError, DuplicateAction, DuplicateConflict, EntityMatch,
    MatchRequest,
};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::display::score_table;

/// One line typed at a list prompt.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    /// Empty line: accept the suggestion, or clear the filter.
    Accept,
    /// 1-based entry number.
    Pick(usize),
    /// `n`
    Extra,
    /// `q`
    Quit,
    Filter(String),
}

pub(crate) fn parse_reply(input: &str) -> Reply {
    let input = input.trim();
    if input.is_empty() {
        Reply::Accept
    } else if input.eq_ignore_ascii_case("n") {
        Reply::Extra
    } else if input.eq_ignore_ascii_case("q") {
        Reply::Quit
    } else if let Ok(n) = input.parse::<usize>() {
        Reply::Pick(n)
    } else {
        Reply::Filter(input.to_string())
    }
}

/// Entries whose label contains `query` (case-insensitive). When nothing
/// contains it, entries whose label has the query's letters in order.
pub(crate) fn filter_candidates<'a>(candidates: &'a [Candidate], query: &str) -> Vec<&'a Candidate> {
    let query = query.to_lowercase();
    let containing: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| c.label.to_lowercase().contains(&query))
        .collect();
    if !containing.is_empty() {
        return containing;
    }
    candidates
        .iter()
        .filter(|c| is_subsequence(&query, &c.label.to_lowercase()))
        .collect()
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|n| rest.any(|h| h == n))
}

/// Resolve `--base`: a 1-based list number, or a file name (directories
/// are ignored).
pub(crate) fn preselect_base(labels: &[String], base: &str) -> Option<usize> {
    if let Ok(n) = base.parse::<usize>() {
        return (1..=labels.len()).contains(&n).then(|| n - 1);
    }
    let name = Path::new(base)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.to_string());
    let prefix = format!("{} (", name);
    labels.iter().position(|l| l.starts_with(&prefix))
}

pub(crate) fn parse_action(input: &str) -> Option<DuplicateAction> {
    match input.trim().to_lowercase().as_str() {
        "i" | "ignore" => Some(DuplicateAction::Ignore),
        "a" | "add" => Some(DuplicateAction::Add),
        "r" | "replace" => Some(DuplicateAction::Replace),
        _ => None,
    }
}

struct ListPrompt<'a> {
    title: String,
    candidates: &'a [Candidate],
    /// Label of the `n` option, if offered.
    extra: Option<&'a str>,
    /// Candidate id taken on an empty line.
    suggested: Option<u32>,
}

/// Answers decisions by prompting on stdout and reading `input`.
pub(crate) struct TerminalDecider<R> {
    input: R,
    base: Option<String>,
    player: Option<u32>,
}

impl<R: BufRead> TerminalDecider<R> {
    /// `base` and `player` pre-answer the first two questions.
    pub(crate) fn new(input: R, base: Option<String>, player: Option<u32>) -> Self {
        Self {
            input,
            base,
            player,
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, DecisionError> {
        print!("{} ", prompt.if_supports_color(Stdout, |t| t.cyan()));
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DecisionError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Run a list prompt. `None` means the extra option was chosen.
    fn select(&mut self, prompt: ListPrompt<'_>) -> Result<Option<u32>, DecisionError> {
        let mut shown: Vec<&Candidate> = prompt.candidates.iter().collect();
        loop {
            println!();
            println!("{}", prompt.title.if_supports_color(Stdout, |t| t.bold()));
            for (i, candidate) in shown.iter().enumerate() {
                let marker = if prompt.suggested == Some(candidate.id) {
                    " *"
                } else {
                    ""
                };
                println!("  {:>3}) {}{}", i + 1, candidate.label, marker);
            }
            if let Some(extra) = prompt.extra {
                println!("    n) {}", extra.if_supports_color(Stdout, |t| t.dimmed()));
            }

            let hint = match (prompt.extra.is_some(), prompt.suggested.is_some()) {
                (true, true) => "Number, n, text to filter, Enter for *:",
                (true, false) => "Number, n, or text to filter:",
                (false, true) => "Number, text to filter, Enter for *:",
                (false, false) => "Number or text to filter:",
            };
            let line = self.read_line(hint)?;

            let query = match parse_reply(&line) {
                Reply::Pick(n) if (1..=shown.len()).contains(&n) => {
                    return Ok(Some(shown[n - 1].id));
                }
                Reply::Pick(n) => {
                    println!("No entry {}", n);
                    continue;
                }
                Reply::Extra if prompt.extra.is_some() => return Ok(None),
                Reply::Extra => line,
                Reply::Quit => return Err(DecisionError::Aborted),
                Reply::Accept => {
                    if let Some(id) = prompt.suggested {
                        return Ok(Some(id));
                    }
                    shown = prompt.candidates.iter().collect();
                    continue;
                }
                Reply::Filter(query) => query,
            };

            let filtered = filter_candidates(prompt.candidates, &query);
            if filtered.is_empty() {
                println!("Nothing matches '{}'", query);
            } else {
                shown = filtered;
            }
        }
    }
}

impl<R: BufRead> Decider for TerminalDecider<R> {
    fn choose_base_file(&mut self, labels: &[String]) -> Result<usize, DecisionError> {
        if let Some(base) = self.base.as_deref() {
            return preselect_base(labels, base)
                .ok_or_else(|| DecisionError::Invalid(format!("no input file matches '{}'", base)));
        }

        let candidates: Vec<Candidate> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| Candidate {
                id: i as u32,
                label: label.clone(),
            })
            .collect();
        let chosen = self.select(ListPrompt {
            title: "Select the base file:".to_string(),
            candidates: &candidates,
            extra: None,
            suggested: None,
        })?;
        chosen
            .map(|id| id as usize)
            .ok_or_else(|| DecisionError::Invalid("no base file chosen".to_string()))
    }

    fn choose_target_player(&mut self, players: &[Player]) -> Result<u32, DecisionError> {
        if let Some(id) = self.player {
            return Ok(id);
        }

        let candidates: Vec<Candidate> = players.iter().map(Candidate::from_entity).collect();
        self.select(ListPrompt {
            title: "Whose plays should be merged?".to_string(),
            candidates: &candidates,
            extra: None,
            suggested: None,
        })?
        .ok_or_else(|| DecisionError::Invalid("no player chosen".to_string()))
    }

    fn choose_file_player(
        &mut self,
        file_label: &str,
        target: &Player,
        players: &[Player],
    ) -> Result<Option<u32>, DecisionError> {
        let candidates: Vec<Candidate> = players.iter().map(Candidate::from_entity).collect();
        let suggested = players
            .iter()
            .find(|p| !p.uuid.is_empty() && p.uuid == target.uuid)
            .map(|p| p.id);
        self.select(ListPrompt {
            title: format!(
                "Which player in {} is {}?",
                file_label,
                target.display_name()
            ),
            candidates: &candidates,
            extra: Some("no match (skip this file)"),
            suggested,
        })
    }

    fn match_entity(&mut self, request: &MatchRequest<'_>) -> Result<EntityMatch, DecisionError> {
        let chosen = self.select(ListPrompt {
            title: format!(
                "{} {} '{}' is not in the merged export. Same as:",
                request.position, request.kind, request.foreign_name
            ),
            candidates: &request.candidates,
            extra: Some("<new>"),
            suggested: None,
        })?;
        Ok(match chosen {
            Some(id) => EntityMatch::Existing(id),
            None => EntityMatch::CreateNew,
        })
    }

    fn resolve_duplicate(
        &mut self,
        conflict: &DuplicateConflict<'_>,
    ) -> Result<DuplicateAction, DecisionError> {
        println!();
        println!(
            "{} {}",
            conflict.position,
            format!("Possible duplicate from {}", conflict.file_name)
                .if_supports_color(Stdout, |t| t.yellow()),
        );
        println!("  Game:     {}", conflict.game_name);
        println!("  Location: {}", conflict.location_name.unwrap_or("(none)"));
        println!("  Date:     {}", conflict.play_date);
        println!();
        for line in score_table(conflict.rows) {
            println!("  {}", line);
        }
        if conflict.other_candidates > 0 {
            println!(
                "  ({} more similar plays that day)",
                conflict.other_candidates
            );
        }

        loop {
            let line = self.read_line("[i]gnore, [a]dd, [r]eplace?")?;
            if line.eq_ignore_ascii_case("q") {
                return Err(DecisionError::Aborted);
            }
            match parse_action(&line) {
                Some(action) => return Ok(action),
                None => println!("Please answer i, a or r"),
            }
        }
    }
}

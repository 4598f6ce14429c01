//! Column-name repair for match-log exports.
//!
//! The provider flattens merged headers so a paired stat ("Passes / accurate") spans two
//! physical columns and only the first carries a label. The attempts column keeps the base
//! name and its blank neighbour gets a derived `_`-suffixed name.

use std::collections::{HashMap, HashSet};

pub fn reconstruct_headers(row: &[Option<&str>]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(row.len());
    let mut anchor: Option<String> = None;
    let mut blank_run = 0usize;

    for (idx, cell) in row.iter().enumerate() {
        if let Some(name) = cell.map(str::trim).filter(|s| !s.is_empty()) {
            out.push(name.to_string());
            anchor = Some(name.to_string());
            blank_run = 0;
            continue;
        }

        blank_run += 1;
        let Some(anchor_name) = anchor.as_deref() else {
            out.push(format!("Column{}", idx + 1));
            continue;
        };

        match anchor_name.split_once('/') {
            Some((before, after)) => {
                let (before, after) = (before.trim(), after.trim());
                if blank_run == 1 {
                    if let Some(prev) = out.last_mut() {
                        *prev = before.to_string();
                    }
                    out.push(format!("{before}_{after}"));
                } else {
                    out.push(format!("{before}_{after}_part{blank_run}"));
                }
            }
            None => out.push(format!("{anchor_name}_part{}", blank_run + 1)),
        }
    }

    out
}

/// Suffixes repeats with `_1`, `_2`, ... in first-seen order.
pub fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());

    for header in headers {
        let name = if emitted.contains(&header) {
            let count = repeats.entry(header.clone()).or_insert(0);
            loop {
                *count += 1;
                let candidate = format!("{header}_{count}");
                if !emitted.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            header
        };
        emitted.insert(name.clone());
        out.push(name);
    }

    out
}

pub fn normalize_header_row(row: &[Option<&str>]) -> Vec<String> {
    dedup_headers(reconstruct_headers(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_plain_and_compound_labels() {
        let row = [Some("Duels"), None, Some("Passes/Accurate"), None];
        assert_eq!(
            reconstruct_headers(&row),
            vec!["Duels", "Duels_part2", "Passes", "Passes_Accurate"]
        );
    }

    #[test]
    fn compound_parts_are_trimmed() {
        let row = [Some("Shots / on target"), Some(""), Some("xG")];
        assert_eq!(reconstruct_headers(&row), vec!["Shots", "Shots_on target", "xG"]);
    }

    #[test]
    fn dedup_numbers_repeats() {
        let headers = vec!["Goals".to_string(), "Goals".to_string(), "Assists".to_string()];
        assert_eq!(dedup_headers(headers), vec!["Goals", "Goals_1", "Assists"]);
    }

    #[test]
    fn dedup_skips_taken_suffixes() {
        let headers = ["A", "A_1", "A", "A"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dedup_headers(headers), vec!["A", "A_1", "A_2", "A_3"]);
    }

    #[test]
    fn consecutive_blanks_stay_unique() {
        let row = [Some("Duels"), None, None, Some("Passes/accurate"), None, None];
        assert_eq!(
            normalize_header_row(&row),
            vec![
                "Duels",
                "Duels_part2",
                "Duels_part3",
                "Passes",
                "Passes_accurate",
                "Passes_accurate_part2",
            ]
        );
    }

    #[test]
    fn leading_blank_gets_positional_name() {
        let row = [None, Some("Match")];
        assert_eq!(reconstruct_headers(&row), vec!["Column1", "Match"]);
    }
}

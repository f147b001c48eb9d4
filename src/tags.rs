// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Pure transforms over comma-delimited tag lists. Tags compare
//! case-insensitively but keep the casing they were first written with;
//! nothing in this module touches storage.

use crate::store::Table;

/// Tag applied to rows whose explanation is blank when the client does not
/// supply one.
pub const MISSING_EXPLANATION_TAG: &str = "worker did not provide an explanation";

/// Splits a raw tag list into trimmed tokens, dropping empties and
/// case-insensitive duplicates. First occurrence wins the stored casing.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut tags = Vec::new();
    for token in split_tags(raw) {
        let folded = token.to_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            tags.push(token);
        }
    }
    tags
}

pub fn serialize_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Drops every token case-equal to `tag` from both tag columns of every
/// record. Returns the number of records that lost at least one token.
pub fn remove_tag(table: &mut Table, tag: &str) -> usize {
    let target = tag.trim().to_lowercase();
    if target.is_empty() {
        return 0;
    }

    let mut changed_rows = 0;
    for record in &mut table.records {
        let mut row_changed = false;
        for column in [&mut record.tags_chatgpt, &mut record.tags_bard] {
            let tokens = split_tags(column);
            let kept: Vec<String> = tokens
                .iter()
                .filter(|token| token.to_lowercase() != target)
                .cloned()
                .collect();
            if kept.len() != tokens.len() {
                *column = serialize_tags(&kept);
                row_changed = true;
            }
        }
        if row_changed {
            changed_rows += 1;
        }
    }
    changed_rows
}

/// Replaces every token case-equal to `old` with the literal trimmed `new`
/// in both tag columns, preserving token positions. A rename that produces
/// two equal tokens in one column is left as-is. Returns the number of
/// records changed.
pub fn rename_tag(table: &mut Table, old: &str, new: &str) -> usize {
    let target = old.trim().to_lowercase();
    let replacement = new.trim();
    if target.is_empty() || replacement.is_empty() {
        return 0;
    }

    let mut changed_rows = 0;
    for record in &mut table.records {
        let mut row_changed = false;
        for column in [&mut record.tags_chatgpt, &mut record.tags_bard] {
            let tokens = split_tags(column);
            let renamed: Vec<String> = tokens
                .iter()
                .map(|token| {
                    if token.to_lowercase() == target {
                        replacement.to_string()
                    } else {
                        token.clone()
                    }
                })
                .collect();
            if renamed != tokens {
                *column = serialize_tags(&renamed);
                row_changed = true;
            }
        }
        if row_changed {
            changed_rows += 1;
        }
    }
    changed_rows
}

/// Appends `tag` to both tag columns of every record whose trimmed
/// explanation is empty, unless a case-equal token is already present.
/// Returns the number of records changed, which makes a second run a
/// reported no-op.
pub fn add_tag_if_missing_explanation(table: &mut Table, tag: &str) -> usize {
    let addition = tag.trim();
    if addition.is_empty() {
        return 0;
    }
    let target = addition.to_lowercase();

    let mut changed_rows = 0;
    for record in &mut table.records {
        if !record.explanation.trim().is_empty() {
            continue;
        }
        let mut row_changed = false;
        for column in [&mut record.tags_chatgpt, &mut record.tags_bard] {
            let mut tokens = split_tags(column);
            if tokens.iter().all(|token| token.to_lowercase() != target) {
                tokens.push(addition.to_string());
                *column = serialize_tags(&tokens);
                row_changed = true;
            }
        }
        if row_changed {
            changed_rows += 1;
        }
    }
    changed_rows
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

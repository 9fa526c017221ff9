//! Order-line parser.
//!
//! Turns one line such as `AL10a15b5c30` into a [`BouquetRequest`]. Checks run
//! in a fixed order and the first failure wins:
//!
//! ```text
//! empty                          -> INVALID_RULE
//! shorter than MIN_RULE_LENGTH   -> INVALID_RULE_LENGTH
//! grammar mismatch              -> INVALID_RULE
//! total above u64::MAX           -> INVALID_RULE
//! species repeated (any case)    -> DUPLICATED_FLOWER_DEFINITION
//! token filtered out             -> INVALID_FLOWER_ARGUMENTS
//! quantities exceed total        -> INVALID_FLOWER_SUMATORY
//! no flowers                     -> INVALID_PARSED_RULE
//! ```
//!
//! A token is filtered out when its species is uppercase, its quantity is zero,
//! or its species does not sort after the previous kept species. Quantities are
//! summed in `u128`, so a quantity too large for the total is reported as
//! INVALID_FLOWER_SUMATORY rather than overflowing.

use crate::error::RuleError;
use crate::grammar::{self, MIN_RULE_LENGTH};
use crate::{BouquetRequest, FlowerCount, Size, Species};
use std::collections::HashSet;
use tracing::debug;

pub(crate) fn parse_rule(line: &str) -> Result<BouquetRequest, RuleError> {
    if line.is_empty() {
        return Err(RuleError::InvalidRule);
    }

    let length = line.chars().count();
    if length < MIN_RULE_LENGTH {
        return Err(RuleError::InvalidRuleLength { length });
    }

    let caps = grammar::bouquet_line().captures(line).ok_or(RuleError::InvalidRule)?;
    let name = caps.get(1).map_or("", |m| m.as_str());
    let size = caps
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Size::from_code)
        .ok_or(RuleError::InvalidRule)?;
    let run = caps.get(3).map_or("", |m| m.as_str());
    let total: u64 = caps.get(4).and_then(|m| m.as_str().parse().ok()).ok_or(RuleError::InvalidRule)?;

    let tokens = grammar::split_flowers(run);
    let valid = valid_flowers(&tokens)?;

    if valid.len() != tokens.len() {
        return Err(RuleError::InvalidFlowerArguments {
            parsed: tokens.iter().map(|t| t.to_string()).collect(),
            valid: valid.iter().map(|(species, n)| format!("{n}{species}")).collect(),
        });
    }

    let requested: u128 = valid.iter().fold(0u128, |sum, &(_, n)| sum.saturating_add(n));
    if requested > u128::from(total) {
        return Err(RuleError::InvalidFlowerSumatory { requested, total });
    }

    if valid.is_empty() {
        return Err(RuleError::InvalidParsedRule);
    }

    // Every quantity is at most `requested`, which is at most `total`.
    let list: Vec<FlowerCount> =
        valid.into_iter().map(|(species, n)| FlowerCount { species, total: n as u64 }).collect();
    let padding = total - requested as u64;
    debug!(line, name, size = size.name(), total, padding, flowers = list.len(), "parsed bouquet rule");

    Ok(BouquetRequest {
        initial_design: line.to_string(),
        name: name.to_string(),
        size,
        total,
        input: run.to_string(),
        list,
        padding,
    })
}

/// Keep the tokens that form a valid flower list, as `(species, quantity)`.
///
/// Fails fast on a repeated species; everything else that is wrong with a
/// token only drops it, and the caller compares lengths. A quantity with more
/// digits than `u128` holds saturates.
fn valid_flowers(tokens: &[&str]) -> Result<Vec<(Species, u128)>, RuleError> {
    let mut seen: HashSet<char> = HashSet::new();
    let mut previous: Option<Species> = None;
    let mut list = Vec::with_capacity(tokens.len());

    for token in tokens {
        // Tokens come from `flower_token`, so they are ASCII and end in a letter.
        let Some(letter) = token.chars().last() else {
            continue;
        };
        let digits = &token[..token.len() - letter.len_utf8()];

        if !seen.insert(letter.to_ascii_lowercase()) {
            return Err(RuleError::DuplicatedFlowerDefinition { species: letter });
        }

        let Some(species) = Species::new(letter) else {
            continue;
        };
        // `digits` is non-empty and all ASCII digits, so parsing fails only on overflow.
        let quantity = digits.parse::<u128>().unwrap_or(u128::MAX);
        if quantity == 0 {
            continue;
        }
        if previous.is_some_and(|p| p >= species) {
            continue;
        }

        previous = Some(species);
        list.push((species, quantity));
    }

    Ok(list)
}

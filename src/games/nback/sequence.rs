use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::rng::GameRng;

/// Key that asks the generator to pick one of the groups itself.
pub const RANDOM_GROUP: &str = "random";
const DEFAULT_GROUP: &str = "group1";

/// Shape groups in canonical order. The first one is the fallback for
/// unknown keys.
static SHAPE_GROUPS: [(&str, [&str; 3]); 5] = [
    ("group1", ["circle", "square", "triangle"]),
    ("group2", ["trapezoid", "hourglass", "diamond"]),
    ("group3", ["rhombus", "butterfly", "star"]),
    ("group4", ["check", "horns", "pyramid"]),
    ("group5", ["double_triangle", "x_shape", "crown"]),
];

/// Longest allowed run of one symbol.
const MAX_RUN: usize = 3;

pub fn shape_groups() -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
    SHAPE_GROUPS
        .iter()
        .map(|(key, shapes)| (*key, shapes.as_slice()))
}

fn lookup_group(key: &str) -> Option<(&'static str, &'static [&'static str])> {
    shape_groups().find(|(candidate, _)| *candidate == key)
}

/// Resolve a requested group key into a concrete one plus its symbols.
pub fn resolve_group(
    requested: &str,
    rng: &mut GameRng,
) -> (&'static str, &'static [&'static str]) {
    let key = if requested == RANDOM_GROUP {
        let index = rng.gen_range(0..SHAPE_GROUPS.len());
        SHAPE_GROUPS[index].0
    } else {
        requested
    };

    lookup_group(key)
        .or_else(|| lookup_group(DEFAULT_GROUP))
        .unwrap_or((SHAPE_GROUPS[0].0, &SHAPE_GROUPS[0].1))
}

/// Draw `num_trials` symbols uniformly from `group`, resampling any symbol
/// that would complete a run of four.
///
/// A group with a single symbol cannot satisfy the run limit, so its
/// sequence stops after three trials.
pub fn generate_sequence(num_trials: usize, group: &[&str], rng: &mut GameRng) -> Vec<String> {
    let mut sequence: Vec<String> = Vec::with_capacity(num_trials);
    let distinct = group.iter().any(|symbol| *symbol != group[0]);
    if group.is_empty() {
        return sequence;
    }
    let num_trials = if distinct { num_trials } else { num_trials.min(MAX_RUN) };

    for i in 0..num_trials {
        let next = loop {
            let candidate = group[rng.gen_range(0..group.len())];
            if i < MAX_RUN {
                break candidate;
            }
            let completes_run = sequence[i - MAX_RUN..]
                .iter()
                .all(|previous| previous == candidate);
            if !completes_run {
                break candidate;
            }
        };
        sequence.push(next.to_string());
    }
    sequence
}

/// Which comparison the player is asked to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NBackLevel {
    /// 2-back only.
    TwoBack,
    /// 2-back and 3-back mixed.
    Mixed,
}

impl TryFrom<u8> for NBackLevel {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NBackLevel::TwoBack),
            2 => Ok(NBackLevel::Mixed),
            other => Err(GameError::invalid_choice(format!("nBackLevel {other}"))),
        }
    }
}

impl From<NBackLevel> for u8 {
    fn from(level: NBackLevel) -> Self {
        match level {
            NBackLevel::TwoBack => 1,
            NBackLevel::Mixed => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NBackChoice {
    /// 2-back match.
    Left,
    /// 3-back match.
    Right,
    /// No match.
    Space,
}

impl NBackChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            NBackChoice::Left => "LEFT",
            NBackChoice::Right => "RIGHT",
            NBackChoice::Space => "SPACE",
        }
    }
}

impl fmt::Display for NBackChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NBackChoice {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "LEFT" => Ok(NBackChoice::Left),
            "RIGHT" => Ok(NBackChoice::Right),
            "SPACE" => Ok(NBackChoice::Space),
            other => Err(GameError::invalid_choice(other)),
        }
    }
}

fn matches_back<T: PartialEq>(sequence: &[T], index: usize, distance: usize) -> bool {
    index >= distance && sequence[index] == sequence[index - distance]
}

/// Correct answer for trial `index`. A 2-back match wins over a 3-back one.
///
/// `index` must be within `sequence`.
pub fn correct_choice<T: PartialEq>(sequence: &[T], level: NBackLevel, index: usize) -> NBackChoice {
    let two_back = matches_back(sequence, index, 2);
    match level {
        NBackLevel::TwoBack if two_back => NBackChoice::Left,
        NBackLevel::TwoBack => NBackChoice::Space,
        NBackLevel::Mixed if two_back => NBackChoice::Left,
        NBackLevel::Mixed if matches_back(sequence, index, 3) => NBackChoice::Right,
        NBackLevel::Mixed => NBackChoice::Space,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unknown_group_falls_back_to_first() {
        let mut rng = GameRng::new(1);
        let (key, shapes) = resolve_group("group99", &mut rng);
        assert_eq!(key, "group1");
        assert_eq!(shapes, ["circle", "square", "triangle"]);
    }

    #[test]
    fn random_group_resolves_to_a_known_key() {
        let mut rng = GameRng::new(5);
        for _ in 0..20 {
            let (key, _) = resolve_group(RANDOM_GROUP, &mut rng);
            assert!(lookup_group(key).is_some());
        }
    }

    #[test]
    fn sequence_uses_only_group_symbols() {
        let mut rng = GameRng::new(2);
        let (_, shapes) = resolve_group("group3", &mut rng);
        let sequence = generate_sequence(50, shapes, &mut rng);
        assert_eq!(sequence.len(), 50);
        assert!(sequence.iter().all(|s| shapes.contains(&s.as_str())));
    }

    #[test]
    fn two_back_takes_precedence() {
        let sequence = ["A", "B", "A", "B", "A"];
        assert_eq!(correct_choice(&sequence, NBackLevel::Mixed, 4), NBackChoice::Left);
    }

    #[test]
    fn three_back_only_in_mixed_level() {
        let sequence = ["A", "B", "C", "A"];
        assert_eq!(correct_choice(&sequence, NBackLevel::Mixed, 3), NBackChoice::Right);
        assert_eq!(correct_choice(&sequence, NBackLevel::TwoBack, 3), NBackChoice::Space);
    }

    #[test]
    fn early_trials_never_match() {
        let sequence = ["A", "A", "A"];
        assert_eq!(correct_choice(&sequence, NBackLevel::Mixed, 0), NBackChoice::Space);
        assert_eq!(correct_choice(&sequence, NBackLevel::Mixed, 1), NBackChoice::Space);
        assert_eq!(correct_choice(&sequence, NBackLevel::Mixed, 2), NBackChoice::Left);
    }

    #[test]
    fn choice_parsing() {
        assert_eq!("RIGHT".parse::<NBackChoice>().unwrap(), NBackChoice::Right);
        assert!(matches!(
            "left".parse::<NBackChoice>(),
            Err(GameError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn level_serializes_as_number() {
        assert_eq!(serde_json::to_string(&NBackLevel::Mixed).unwrap(), "2");
        let level: NBackLevel = serde_json::from_str("1").unwrap();
        assert_eq!(level, NBackLevel::TwoBack);
        assert!(serde_json::from_str::<NBackLevel>("3").is_err());
    }

    proptest! {
        #[test]
        fn no_four_consecutive_equal(seed in any::<u64>(), len in 4usize..200) {
            let mut rng = GameRng::new(seed);
            let (_, shapes) = resolve_group(RANDOM_GROUP, &mut rng);
            let sequence = generate_sequence(len, shapes, &mut rng);
            prop_assert_eq!(sequence.len(), len);
            for window in sequence.windows(4) {
                prop_assert!(!(window[0] == window[1] && window[1] == window[2] && window[2] == window[3]));
            }
        }
    }
}

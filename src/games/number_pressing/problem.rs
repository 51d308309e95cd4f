use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::rng::GameRng;

pub const DIGITS: std::ops::RangeInclusive<u8> = 1..=9;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPressingSettings {
    pub is_real_mode: bool,
    /// Subset of `{1, 2}`; other values are ignored.
    pub rounds: Vec<u8>,
    pub problems_per_round: usize,
    /// Seconds.
    #[serde(rename = "timeLimitR1")]
    pub time_limit_r1: u32,
    /// Seconds.
    #[serde(rename = "timeLimitR2")]
    pub time_limit_r2: u32,
}

/// Press the target digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemR1 {
    pub target_number: u8,
}

/// Press 1 to 9 in order, twice for `double_click` digits, never for
/// `skip` digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemR2 {
    pub double_click: Vec<u8>,
    pub skip: Vec<u8>,
}

impl ProblemR2 {
    /// The one accepted click sequence.
    pub fn correct_clicks(&self) -> Vec<u8> {
        DIGITS
            .filter(|digit| !self.skip.contains(digit))
            .flat_map(|digit| {
                let times = if self.double_click.contains(&digit) { 2 } else { 1 };
                std::iter::repeat(digit).take(times)
            })
            .collect()
    }
}

pub fn generate_round1(count: usize, rng: &mut GameRng) -> Vec<ProblemR1> {
    (0..count)
        .map(|_| ProblemR1 {
            target_number: rng.gen_range(DIGITS),
        })
        .collect()
}

pub fn generate_round2(count: usize, rng: &mut GameRng) -> Vec<ProblemR2> {
    (0..count)
        .map(|_| {
            let double_count = rng.gen_range(0..=2usize);
            let mut skip_count = rng.gen_range(0..=2usize);
            if skip_count == 2 && double_count > 0 {
                skip_count = 1;
            }

            let mut digits: Vec<u8> = DIGITS.collect();
            rng.shuffle(&mut digits);

            let mut double_click = digits[..double_count].to_vec();
            let mut skip = digits[double_count..double_count + skip_count].to_vec();
            double_click.sort_unstable();
            skip.sort_unstable();
            ProblemR2 { double_click, skip }
        })
        .collect()
}

pub(crate) fn check_digit(digit: u8) -> Result<u8, GameError> {
    if DIGITS.contains(&digit) {
        Ok(digit)
    } else {
        Err(GameError::invalid_choice(digit.to_string()))
    }
}

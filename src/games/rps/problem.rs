use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::rng::GameRng;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpsSettings {
    /// Subset of `{1, 2, 3}`, played in the listed order.
    pub rounds: Vec<u8>,
    pub questions_per_round: usize,
    pub time_limit_ms: u32,
    pub is_real_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Card {
    Rock,
    Paper,
    Scissors,
}

impl Card {
    pub const ALL: [Card; 3] = [Card::Rock, Card::Paper, Card::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Card::Rock => "ROCK",
            Card::Paper => "PAPER",
            Card::Scissors => "SCISSORS",
        }
    }

    /// The card that beats this one.
    pub fn beaten_by(&self) -> Card {
        match self {
            Card::Rock => Card::Paper,
            Card::Paper => Card::Scissors,
            Card::Scissors => Card::Rock,
        }
    }

    /// The card this one beats.
    pub fn beats(&self) -> Card {
        match self {
            Card::Rock => Card::Scissors,
            Card::Paper => Card::Rock,
            Card::Scissors => Card::Paper,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A played card, or `Miss` when the time limit ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
    Miss,
}

impl RpsChoice {
    pub fn card(&self) -> Option<Card> {
        match self {
            RpsChoice::Rock => Some(Card::Rock),
            RpsChoice::Paper => Some(Card::Paper),
            RpsChoice::Scissors => Some(Card::Scissors),
            RpsChoice::Miss => None,
        }
    }
}

impl FromStr for RpsChoice {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ROCK" => Ok(RpsChoice::Rock),
            "PAPER" => Ok(RpsChoice::Paper),
            "SCISSORS" => Ok(RpsChoice::Scissors),
            "MISS" => Ok(RpsChoice::Miss),
            other => Err(GameError::invalid_choice(other)),
        }
    }
}

/// Whose card is shown. The player must win against the shown card when it
/// is theirs (`Me`), and lose to it when it belongs to the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardHolder {
    Me,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpsProblem {
    pub round: u8,
    pub problem_card_holder: CardHolder,
    pub given_card: Card,
}

impl RpsProblem {
    pub fn correct_card(&self) -> Card {
        match self.problem_card_holder {
            CardHolder::Me => self.given_card.beaten_by(),
            CardHolder::Opponent => self.given_card.beats(),
        }
    }
}

const ROUNDS: std::ops::RangeInclusive<u8> = 1..=3;

fn holder_for_round(round: u8, rng: &mut GameRng) -> CardHolder {
    match round {
        1 => CardHolder::Me,
        2 => CardHolder::Opponent,
        _ if rng.gen_bool(0.5) => CardHolder::Me,
        _ => CardHolder::Opponent,
    }
}

/// Problems for every listed round, round by round. Unknown round numbers
/// contribute nothing.
pub fn generate_problems(settings: &RpsSettings, rng: &mut GameRng) -> Vec<RpsProblem> {
    let mut problems = Vec::with_capacity(settings.rounds.len() * settings.questions_per_round);
    for &round in settings.rounds.iter().filter(|round| ROUNDS.contains(*round)) {
        for _ in 0..settings.questions_per_round {
            let given_card = Card::ALL[rng.gen_range(0..Card::ALL.len())];
            let problem_card_holder = holder_for_round(round, rng);
            problems.push(RpsProblem {
                round,
                problem_card_holder,
                given_card,
            });
        }
    }
    problems
}

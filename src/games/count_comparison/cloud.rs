//! Word-cloud problems with visual traps that push the eye toward the
//! smaller cloud.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::rng::GameRng;

pub const MIN_COUNT: u32 = 5;
pub const MAX_COUNT: u32 = 30;

const BASE_GAP_PROBABILITY: f64 = 0.4;
const TRAP_GAP_PROBABILITY: f64 = 0.8;
const GAP_TRAP_CHANCE: f64 = 0.33;
const FONT_TRAP_CHANCE: f64 = 0.5;
const BASE_LARGE_FONT_CHANCE: f64 = 0.4;
const BASE_HEAVY_FONT_CHANCE: f64 = 0.4;
const TRAP_FONT_BONUS: f64 = 0.1;
const MAX_GAPS: usize = 3;

static WORD_LIST: &str = include_str!("word_list.json");

#[derive(Deserialize)]
struct WordList {
    words: Vec<[String; 2]>,
}

/// Word pairs from the embedded list.
pub fn load_word_pairs() -> Result<Vec<[String; 2]>, serde_json::Error> {
    serde_json::from_str::<WordList>(WORD_LIST).map(|list| list.words)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(GameError::invalid_choice(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapKind {
    GapProbability,
    FontSize,
    FontWeight,
}

impl TrapKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrapKind::GapProbability => "GapProbability",
            TrapKind::FontSize => "FontSize",
            TrapKind::FontWeight => "FontWeight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTrap {
    #[serde(rename = "type")]
    pub kind: TrapKind,
    pub applied_to: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityParams {
    pub area_multiplier: f64,
    pub gap_probability: f64,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            area_multiplier: 1.0,
            gap_probability: BASE_GAP_PROBABILITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityInfo {
    pub left: DensityParams,
    pub right: DensityParams,
}

/// One rendered cloud item: a word or a blank gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetail {
    pub text: String,
    /// Font size in rem, 0 for gaps.
    pub size: f64,
    /// CSS font weight, 0 for gaps.
    pub weight: u16,
    pub is_gap: bool,
    /// Gap width in rem, 0 for words.
    pub gap_width: f64,
}

impl WordDetail {
    fn word(text: &str, size: f64, weight: u16) -> Self {
        Self {
            text: text.to_string(),
            size,
            weight,
            is_gap: false,
            gap_width: 0.0,
        }
    }

    fn gap(width: f64) -> Self {
        Self {
            text: String::new(),
            size: 0.0,
            weight: 0,
            is_gap: true,
            gap_width: width,
        }
    }
}

/// Words in a cloud, gaps excluded.
pub fn count_words(details: &[WordDetail]) -> usize {
    details.iter().filter(|detail| !detail.is_gap).count()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountComparisonSettings {
    pub num_problems: usize,
    /// Milliseconds the clouds stay visible.
    pub presentation_time: u32,
    /// Milliseconds allowed for the answer.
    pub input_time: u32,
    pub is_real_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountComparisonProblem {
    /// 1-based.
    pub problem_number: usize,
    pub left_words: Vec<WordDetail>,
    pub right_words: Vec<WordDetail>,
    pub left_word_text: String,
    pub right_word_text: String,
    pub density: DensityInfo,
    pub presentation_time: u32,
    pub input_time: u32,
    pub correct_side: Side,
    pub applied_traps: Vec<AppliedTrap>,
}

/// Two distinct counts in `[MIN_COUNT, MAX_COUNT]`. Later problems (higher
/// `difficulty`) draw them closer together.
pub fn draw_counts(difficulty: f64, rng: &mut GameRng) -> (u32, u32) {
    let mean = rng.gen_f64() * f64::from(MAX_COUNT - MIN_COUNT) + f64::from(MIN_COUNT);
    let std_dev = mean * (0.5 - 0.4 * difficulty);

    let mut draw = || {
        let value = rng.normal(mean, std_dev).round();
        value.clamp(f64::from(MIN_COUNT), f64::from(MAX_COUNT)) as u32
    };
    let mut first = draw();
    let second = draw();

    if first == second {
        first = (first + 1).min(MAX_COUNT);
        if first == second {
            first -= 1;
        }
    }
    (first, second)
}

struct CloudStyle {
    gap_probability: f64,
    large_font_chance: f64,
    heavy_font_chance: f64,
}

fn push_gaps(details: &mut Vec<WordDetail>, gap_probability: f64, rng: &mut GameRng) {
    for _ in 0..MAX_GAPS {
        if rng.gen_f64() >= gap_probability {
            break;
        }
        let width = 1.0 + rng.gen_f64();
        details.push(WordDetail::gap(round2(width)));
    }
}

fn word_details(count: u32, text: &str, style: &CloudStyle, rng: &mut GameRng) -> Vec<WordDetail> {
    let mut details = Vec::new();
    for _ in 0..count {
        push_gaps(&mut details, style.gap_probability, rng);

        let mut size = 0.8 + rng.gen_f64() * 0.4;
        if rng.gen_f64() < style.large_font_chance {
            size = 1.2 + rng.gen_f64() * 0.3;
        }
        let weight = if rng.gen_f64() < style.heavy_font_chance { 700 } else { 400 };
        details.push(WordDetail::word(text, round2(size), weight));

        push_gaps(&mut details, style.gap_probability, rng);
    }
    details
}

/// Build problem `index` (0-based) of `settings.num_problems`.
fn build_problem(
    index: usize,
    settings: &CountComparisonSettings,
    pair: &[String; 2],
    rng: &mut GameRng,
) -> CountComparisonProblem {
    let (mut left_text, mut right_text) = (pair[0].as_str(), pair[1].as_str());
    if rng.gen_bool(0.5) {
        std::mem::swap(&mut left_text, &mut right_text);
    }

    let difficulty = index as f64 / settings.num_problems as f64;
    let (left_count, right_count) = draw_counts(difficulty, rng);
    let correct_side = if right_count > left_count { Side::Right } else { Side::Left };
    let trap_side = correct_side.opposite();

    let font_size_trap = rng.gen_f64() < FONT_TRAP_CHANCE;
    let font_weight_trap = rng.gen_f64() < FONT_TRAP_CHANCE;
    let gap_trap = rng.gen_f64() < GAP_TRAP_CHANCE;

    let mut density = DensityInfo {
        left: DensityParams::default(),
        right: DensityParams::default(),
    };
    let mut applied_traps = Vec::new();
    if gap_trap {
        let params = match trap_side {
            Side::Left => &mut density.left,
            Side::Right => &mut density.right,
        };
        params.gap_probability = TRAP_GAP_PROBABILITY;
        applied_traps.push(AppliedTrap { kind: TrapKind::GapProbability, applied_to: trap_side });
    }
    if font_size_trap {
        applied_traps.push(AppliedTrap { kind: TrapKind::FontSize, applied_to: trap_side });
    }
    if font_weight_trap {
        applied_traps.push(AppliedTrap { kind: TrapKind::FontWeight, applied_to: trap_side });
    }

    let style = |side: Side, params: &DensityParams| {
        let trapped = side == trap_side;
        CloudStyle {
            gap_probability: params.gap_probability,
            large_font_chance: BASE_LARGE_FONT_CHANCE
                + if trapped && font_size_trap { TRAP_FONT_BONUS } else { 0.0 },
            heavy_font_chance: BASE_HEAVY_FONT_CHANCE
                + if trapped && font_weight_trap { TRAP_FONT_BONUS } else { 0.0 },
        }
    };
    let left_words = word_details(left_count, left_text, &style(Side::Left, &density.left), rng);
    let right_words = word_details(right_count, right_text, &style(Side::Right, &density.right), rng);

    CountComparisonProblem {
        problem_number: index + 1,
        left_words,
        right_words,
        left_word_text: left_text.to_string(),
        right_word_text: right_text.to_string(),
        density,
        presentation_time: settings.presentation_time,
        input_time: settings.input_time,
        correct_side,
        applied_traps,
    }
}

/// Shuffle `pairs` and build every problem of a game. Pairs are reused
/// cyclically when there are more problems than pairs.
pub fn generate_problems(
    settings: &CountComparisonSettings,
    pairs: &mut [[String; 2]],
    rng: &mut GameRng,
) -> Vec<CountComparisonProblem> {
    if pairs.is_empty() {
        return Vec::new();
    }
    rng.shuffle(pairs);
    (0..settings.num_problems)
        .map(|index| build_problem(index, settings, &pairs[index % pairs.len()], rng))
        .collect()
}

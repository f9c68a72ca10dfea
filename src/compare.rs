// Pokémon Battle - Comparator
// Head-to-head stat tally plus the request state machine that drives it.
//
// Every request gets a generation number. Results tagged with an older
// generation than the latest submit are dropped, so a slow response from a
// superseded comparison can never overwrite a newer one.

use crate::backend::BattleBackend;
use crate::models::{PokemonRecord, PriceQuote};
use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

pub const MISSING_NAMES: &str = "Please enter a name for both Pokémon.";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOutcome {
    Left,
    Right,
    Tie,
}

/// One row of the stat comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub label: String,
    pub left: u32,
    pub right: u32,
    pub outcome: StatOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub wins_left: u32,
    pub wins_right: u32,
    pub result_text: String,
}

/// Pair stats by index. Both records come from the same provider, which
/// always lists stats in the same canonical order.
pub fn stat_lines(left: &PokemonRecord, right: &PokemonRecord) -> Vec<StatLine> {
    left.stats
        .iter()
        .zip(&right.stats)
        .map(|(l, r)| StatLine {
            label: l.label(),
            left: l.base_value,
            right: r.base_value,
            outcome: if l.base_value > r.base_value {
                StatOutcome::Left
            } else if r.base_value > l.base_value {
                StatOutcome::Right
            } else {
                StatOutcome::Tie
            },
        })
        .collect()
}

fn result_text(left_name: &str, right_name: &str, wins_left: u32, wins_right: u32) -> String {
    if wins_left > wins_right {
        format!("{} wins {} - {}!", left_name, wins_left, wins_right)
    } else if wins_right > wins_left {
        format!("{} wins {} - {}!", right_name, wins_right, wins_left)
    } else {
        format!("It's a draw {} - {}!", wins_left, wins_right)
    }
}

/// Count strict per-stat wins for each side. Ties score for neither.
pub fn tally(left: &PokemonRecord, right: &PokemonRecord) -> ComparisonResult {
    let lines = stat_lines(left, right);
    summarize(left, right, &lines)
}

fn summarize(left: &PokemonRecord, right: &PokemonRecord, lines: &[StatLine]) -> ComparisonResult {
    let count = |side: StatOutcome| lines.iter().filter(|line| line.outcome == side).count() as u32;
    let wins_left = count(StatOutcome::Left);
    let wins_right = count(StatOutcome::Right);

    ComparisonResult {
        wins_left,
        wins_right,
        result_text: result_text(&left.name, &right.name, wins_left, wins_right),
    }
}

// ============================================================================
// Request state machine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSlot {
    Pending,
    Ready(PriceQuote),
}

impl PriceSlot {
    pub fn display(&self) -> &str {
        match self {
            PriceSlot::Pending => "…",
            PriceSlot::Ready(quote) => quote.as_str(),
        }
    }
}

/// A finished comparison, possibly still waiting on prices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    pub left: PokemonRecord,
    pub right: PokemonRecord,
    pub lines: Vec<StatLine>,
    pub result: ComparisonResult,
    pub left_price: PriceSlot,
    pub right_price: PriceSlot,
}

impl Battle {
    fn new(left: PokemonRecord, right: PokemonRecord) -> Self {
        let lines = stat_lines(&left, &right);
        let result = summarize(&left, &right, &lines);
        Self {
            left,
            right,
            lines,
            result,
            left_price: PriceSlot::Pending,
            right_price: PriceSlot::Pending,
        }
    }

    pub fn prices_settled(&self) -> bool {
        self.left_price != PriceSlot::Pending && self.right_price != PriceSlot::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonState {
    Idle { error: Option<String> },
    Loading { generation: u64, left: String, right: String },
    Done(Box<Battle>),
}

/// Names to fetch for one submitted comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub left: String,
    pub right: String,
}

pub struct Comparator {
    state: ComparisonState,
    generation: u64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    pub fn new() -> Self {
        Self {
            state: ComparisonState::Idle { error: None },
            generation: 0,
        }
    }

    pub fn state(&self) -> &ComparisonState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ComparisonState::Loading { .. })
    }

    /// Start a new comparison. Returns `None` (and records the validation
    /// error) when either name is blank.
    pub fn submit(&mut self, left: &str, right: &str) -> Option<Ticket> {
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() {
            self.state = ComparisonState::Idle {
                error: Some(MISSING_NAMES.to_string()),
            };
            return None;
        }

        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            left: left.to_lowercase(),
            right: right.to_lowercase(),
        };
        debug!(generation = ticket.generation, left = %ticket.left, right = %ticket.right, "comparison submitted");

        self.state = ComparisonState::Loading {
            generation: ticket.generation,
            left: ticket.left.clone(),
            right: ticket.right.clone(),
        };
        Some(ticket)
    }

    /// Apply the outcome of both name lookups. Returns false if the result
    /// belongs to a superseded request and was dropped.
    pub fn finish_lookup(
        &mut self,
        generation: u64,
        outcome: Result<(PokemonRecord, PokemonRecord)>,
    ) -> bool {
        let current = matches!(
            self.state,
            ComparisonState::Loading { generation: g, .. } if g == generation
        );
        if !current {
            debug!(generation, latest = self.generation, "dropping stale lookup");
            return false;
        }

        self.state = match outcome {
            Ok((left, right)) => {
                let battle = Battle::new(left, right);
                info!(result = %battle.result.result_text, "comparison finished");
                ComparisonState::Done(Box::new(battle))
            }
            Err(e) => ComparisonState::Idle {
                error: Some(failure_message(&e)),
            },
        };
        true
    }

    /// Fill in one side's price. Dropped unless it belongs to the displayed battle.
    pub fn finish_price(&mut self, generation: u64, side: Side, quote: PriceQuote) -> bool {
        if generation != self.generation {
            return false;
        }
        let ComparisonState::Done(battle) = &mut self.state else {
            return false;
        };

        let slot = match side {
            Side::Left => &mut battle.left_price,
            Side::Right => &mut battle.right_price,
        };
        *slot = PriceSlot::Ready(quote);
        true
    }

    /// Drive one comparison to completion, prices included.
    pub async fn run(&mut self, backend: &dyn BattleBackend, left: &str, right: &str) -> &ComparisonState {
        let Some(ticket) = self.submit(left, right) else {
            return &self.state;
        };

        let outcome = fetch_records(backend, &ticket).await;
        if self.finish_lookup(ticket.generation, outcome)
            && matches!(self.state, ComparisonState::Done(_))
        {
            let (left_price, right_price) = fetch_prices(backend, &ticket).await;
            self.finish_price(ticket.generation, Side::Left, left_price);
            self.finish_price(ticket.generation, Side::Right, right_price);
        }

        &self.state
    }
}

/// User-facing text for a failed lookup
pub fn failure_message(err: &anyhow::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Both name lookups at once; the first failure fails the pair.
pub async fn fetch_records(
    backend: &dyn BattleBackend,
    ticket: &Ticket,
) -> Result<(PokemonRecord, PokemonRecord)> {
    tokio::try_join!(backend.pokemon(&ticket.left), backend.pokemon(&ticket.right))
}

/// Both price lookups at once; neither can fail.
pub async fn fetch_prices(backend: &dyn BattleBackend, ticket: &Ticket) -> (PriceQuote, PriceQuote) {
    tokio::join!(backend.price(&ticket.left), backend.price(&ticket.right))
}

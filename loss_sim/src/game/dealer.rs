use crate::error::BlackjackGameError;
use crate::game::player::Player;
use crate::game::strategy::DealerStrategy;
use crate::game::table::TableSettings;
use crate::game::GameManager;
use blackjack_cards::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

/// The steps of a round, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoundPhase {
    Shuffle,
    Bet,
    InitialDeal,
    PlayerTurns,
    DealerTurn,
    Settle,
    Collect,
    SaveHistory,
    RecycleCards,
    ClearHands,
    LeaveOrStay,
}

impl RoundPhase {
    /// Every phase in order. `PlayerTurns` and `DealerTurn` are skipped when the dealer is dealt a natural.
    pub const ORDER: [RoundPhase; 11] = [
        RoundPhase::Shuffle,
        RoundPhase::Bet,
        RoundPhase::InitialDeal,
        RoundPhase::PlayerTurns,
        RoundPhase::DealerTurn,
        RoundPhase::Settle,
        RoundPhase::Collect,
        RoundPhase::SaveHistory,
        RoundPhase::RecycleCards,
        RoundPhase::ClearHands,
        RoundPhase::LeaveOrStay,
    ];
}

/// What happened during one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub phases: Vec<RoundPhase>,
    pub dealer_natural: bool,
    pub dealer_value: u32,
    pub total_wagered: Money,
    pub total_paid_out: Money,
    /// Seats of the players that left the table at the end of the round.
    pub departed: Vec<usize>,
}

impl RoundReport {
    fn new() -> RoundReport {
        RoundReport {
            phases: Vec::with_capacity(RoundPhase::ORDER.len()),
            dealer_natural: false,
            dealer_value: 0,
            total_wagered: Money::ZERO,
            total_paid_out: Money::ZERO,
            departed: Vec::new(),
        }
    }

    fn enter(&mut self, phase: RoundPhase) {
        trace!(?phase, "entering round phase");
        self.phases.push(phase);
    }
}

/// The dealer runs rounds for the players registered at its table, playing its own hand by its `DealerStrategy`.
#[derive(Debug)]
pub struct Dealer {
    cards: Vec<Card>,
    registered: Vec<Player>,
    departed: Vec<Player>,
    settings: TableSettings,
    shoe: Shoe,
    strategy: Box<dyn DealerStrategy>,
    manager: GameManager,
}

impl Dealer {
    /// Associated function to create a new `Dealer` dealing from `shoe` under `settings`.
    pub fn new(settings: TableSettings, shoe: Shoe, strategy: Box<dyn DealerStrategy>) -> Dealer {
        Dealer {
            cards: Vec::new(),
            registered: Vec::new(),
            departed: Vec::new(),
            settings,
            shoe,
            strategy,
            manager: GameManager,
        }
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The dealer's second card, the one players get to see.
    pub fn visible_card(&self) -> Option<Card> {
        self.cards.get(1).copied()
    }

    pub fn register(&mut self, player: Player) {
        self.registered.push(player);
    }

    /// Removes the player sitting in `seat` from the round, returning them if they were registered.
    pub fn unregister(&mut self, seat: usize) -> Option<Player> {
        let index = self.registered.iter().position(|p| p.seat() == seat)?;
        Some(self.registered.remove(index))
    }

    pub fn registered_players(&self) -> &[Player] {
        &self.registered
    }

    /// Method that plays one complete round for every registered player.
    ///
    /// When the dealer's first two cards are a natural the round goes straight from the deal to settlement.
    /// Any failure aborts the round where it happened.
    pub fn play_single_round(&mut self) -> Result<RoundReport, BlackjackGameError> {
        if self.registered.is_empty() {
            return Err(BlackjackGameError::NoRegisteredPlayers);
        }
        let mut report = RoundReport::new();

        report.enter(RoundPhase::Shuffle);
        self.shoe.shuffle();

        report.enter(RoundPhase::Bet);
        report.total_wagered = self
            .manager
            .place_your_bets(&mut self.registered, &self.settings)?;

        report.enter(RoundPhase::InitialDeal);
        self.manager
            .deal_initial_cards(&mut self.registered, &mut self.cards, &mut self.shoe)?;

        report.dealer_natural = is_natural(&self.cards);
        if !report.dealer_natural {
            report.enter(RoundPhase::PlayerTurns);
            let visible = self.visible_card().ok_or(BlackjackGameError::EmptyShoe)?;
            self.manager
                .players_play(&mut self.registered, &visible, &mut self.shoe)?;

            report.enter(RoundPhase::DealerTurn);
            self.manager
                .dealer_plays(&mut self.cards, self.strategy.as_ref(), &mut self.shoe)?;
        } else {
            debug!("dealer dealt a natural, skipping straight to settlement");
        }

        report.enter(RoundPhase::Settle);
        report.dealer_value = best_value(&self.cards);
        self.manager
            .determine_hand_outcomes(&mut self.registered, report.dealer_value)?;

        report.enter(RoundPhase::Collect);
        report.total_paid_out = self.manager.pay_out_or_collect(&mut self.registered)?;

        report.enter(RoundPhase::SaveHistory);
        self.manager.save_current_hand_results(&mut self.registered);

        report.enter(RoundPhase::RecycleCards);
        self.manager
            .collect_cards(&mut self.registered, &mut self.cards, &mut self.shoe);

        report.enter(RoundPhase::ClearHands);
        self.manager.clear_hands(&mut self.registered, &mut self.cards);

        report.enter(RoundPhase::LeaveOrStay);
        let departed = self
            .manager
            .determine_departures(&mut self.registered, &self.settings);
        report.departed = departed.iter().map(|p| p.seat()).collect();
        self.departed.extend(departed);

        Ok(report)
    }

    /// Consumes the dealer, returning every player that was ever registered ordered by seat.
    pub fn into_players(self) -> Vec<Player> {
        let mut players = self.departed;
        players.extend(self.registered);
        players.sort_by_key(|p| p.seat());
        players
    }
}

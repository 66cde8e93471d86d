use loss_sim::prelude::*;

fn card(rank: Rank) -> Card {
    Card::blackjack(rank, Suit::Spades)
}

fn stacked(ranks: &[Rank]) -> Shoe {
    Shoe::stacked(ranks.iter().map(|r| card(*r)).collect())
}

fn reference_dealer(shoe: Shoe) -> Dealer {
    let settings = TableSettings::new(Money::from_units(10), Money::from_units(100), 1);
    Dealer::new(settings, shoe, Box::new(StandardDealerStrategy))
}

#[test]
fn reference_strategy_batch_terminates_with_consistent_rates() {
    let properties = SimulationProperties::builder()
        .minimum_bet(Money::from_units(10))
        .maximum_bet(Money::from_units(100))
        .max_seats(1)
        .deck_count(4)
        .player("BasicMinimum", Money::from_units(200))
        .seed(2024)
        .build()
        .unwrap();
    let sink = MemoryStatisticsSink::new();
    let mut runner = SimulationRunner::new(sink.clone(), TracingReporter);
    let statistics = runner.run(&properties, 500).unwrap();

    assert_eq!(statistics.len(), 1);
    let stats = &statistics[0];
    assert_eq!(stats.strategy, "BasicMinimum");
    assert_eq!(stats.run_count, 500);
    assert!(stats.average_count_of_hands_until_broke > 0.0);
    let total = stats.won_hands_percent + stats.lost_hands_percent + stats.pushed_hands_percent;
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(stats.hands_won + stats.hands_lost + stats.hands_pushed, stats.hands_played);
    assert!(stats.loss_rate > 0.0);
    assert_eq!(sink.batches().len(), 1);
}

#[test]
fn dealer_natural_skips_straight_to_settlement() {
    // player 9 and 2 would double on 11, dealer holds ace and king
    let mut dealer = reference_dealer(stacked(&[Rank::Nine, Rank::Ace, Rank::Two, Rank::King]));
    dealer.register(Player::new(0, Box::new(BasicMinimumStrategy), Money::from_units(200)));
    let report = dealer.play_single_round().unwrap();

    assert!(report.dealer_natural);
    assert!(!report.phases.contains(&RoundPhase::PlayerTurns));
    assert!(!report.phases.contains(&RoundPhase::DealerTurn));
    let settle = report.phases.iter().position(|p| *p == RoundPhase::Settle);
    let deal = report.phases.iter().position(|p| *p == RoundPhase::InitialDeal);
    assert_eq!(settle, deal.map(|i| i + 1));
    assert_eq!(report.dealer_value, 21);

    let player = &dealer.registered_players()[0];
    let record = &player.history()[0];
    assert_eq!(record.hand.cards().len(), 2);
    assert_eq!(record.hand.bet(), Money::from_units(10));
    assert_eq!(record.hand.outcome(), HandOutcome::Lost);
    assert_eq!(player.cash(), Money::from_units(190));
}

#[test]
fn player_natural_pushes_against_dealer_natural() {
    let mut dealer = reference_dealer(stacked(&[Rank::Ace, Rank::Ace, Rank::Queen, Rank::Ten]));
    dealer.register(Player::new(0, Box::new(BasicMinimumStrategy), Money::from_units(200)));
    dealer.play_single_round().unwrap();
    let player = &dealer.registered_players()[0];
    assert_eq!(player.history()[0].hand.outcome(), HandOutcome::Pushed);
    assert_eq!(player.cash(), Money::from_units(200));
}

#[test]
fn player_natural_pays_three_to_two() {
    let mut dealer = reference_dealer(stacked(&[Rank::Ace, Rank::Ten, Rank::King, Rank::Eight]));
    dealer.register(Player::new(0, Box::new(BasicMinimumStrategy), Money::from_units(200)));
    let report = dealer.play_single_round().unwrap();
    assert_eq!(report.total_paid_out, Money::from_units(25));
    assert_eq!(dealer.registered_players()[0].cash(), Money::from_units(215));
}

#[test]
fn reference_strategy_splits_aces_but_not_eights() {
    let strategy = BasicMinimumStrategy;
    let visible = card(Rank::Seven);
    let eights = Hand::with_cards(Money::from_units(10), vec![card(Rank::Eight), card(Rank::Eight)]);
    let aces = Hand::with_cards(Money::from_units(10), vec![card(Rank::Ace), card(Rank::Ace)]);
    assert!(!strategy.should_split(&eights, &visible));
    assert!(strategy.should_split(&aces, &visible));
}

#[test]
fn split_aces_play_out_in_a_full_round() {
    // player A A, dealer 10 7, then one card for each split hand
    let mut dealer = reference_dealer(stacked(&[
        Rank::Ace,
        Rank::Ten,
        Rank::Ace,
        Rank::Seven,
        Rank::Nine,
        Rank::Five,
    ]));
    dealer.register(Player::new(0, Box::new(BasicMinimumStrategy), Money::from_units(200)));
    dealer.play_single_round().unwrap();
    let player = &dealer.registered_players()[0];
    let outcomes: Vec<HandOutcome> = player.history().iter().map(|r| r.hand.outcome()).collect();
    assert_eq!(outcomes, vec![HandOutcome::Won, HandOutcome::Lost]);
    // split costs a second bet, the 20 wins 20 back and the 16 loses
    assert_eq!(player.cash(), Money::from_units(200));
    assert!(player.history().iter().all(|r| r.hand.is_split() && !r.hand.is_natural()));
}

#[test]
fn empty_shoe_is_reported_not_dealt() {
    let mut shoe = stacked(&[]);
    assert_eq!(shoe.pull_top_card(), None);

    let mut dealer = reference_dealer(stacked(&[Rank::Two, Rank::Three]));
    dealer.register(Player::new(0, Box::new(BasicMinimumStrategy), Money::from_units(200)));
    assert_eq!(dealer.play_single_round(), Err(BlackjackGameError::EmptyShoe));
}

#[test]
fn overcrowded_table_produces_no_statistics() {
    let properties = SimulationProperties {
        max_seats: 1,
        players: vec![
            PlayerProperties::new("BasicMinimum", Money::from_units(100)),
            PlayerProperties::new("Martingale", Money::from_units(100)),
        ],
        ..SimulationProperties::default()
    };
    let sink = MemoryStatisticsSink::new();
    let mut runner = SimulationRunner::new(sink.clone(), TracingReporter);
    assert!(runner.run(&properties, 3).is_err());
    assert!(sink.batches().is_empty());
}

#[test]
fn mixed_strategies_get_one_record_each() {
    let properties = SimulationProperties::builder()
        .max_seats(3)
        .player("Martingale", Money::from_units(300))
        .player("BasicMinimum", Money::from_units(200))
        .player("Martingale", Money::from_units(300))
        .seed(77)
        .build()
        .unwrap();
    let mut runner = SimulationRunner::new(MemoryStatisticsSink::new(), TracingReporter);
    let statistics = runner.run(&properties, 25).unwrap();
    let labels: Vec<&str> = statistics.iter().map(|s| s.strategy.as_str()).collect();
    assert_eq!(labels, vec!["Martingale", "BasicMinimum"]);
    assert_eq!(statistics[0].starting_cash, Money::from_units(600));
    assert!(statistics.iter().all(|s| s.hands_played > 0));
}

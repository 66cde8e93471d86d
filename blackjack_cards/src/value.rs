//! Resolution of hand totals. Aces make a hand's total ambiguous, so every function here works over the full
//! set of candidate totals rather than a single number. Nothing in this module mutates a card.

use crate::card::{Card, ACE_HIGH_VALUE, ACE_LOW_VALUE};

/// The highest total a hand can hold without busting.
pub const BEST_HAND_VALUE: u32 = 21;
/// The lowest total the dealer stands on.
pub const DEALER_STAND_VALUE: u32 = 17;

const ACE_RAISE: u32 = (ACE_HIGH_VALUE - ACE_LOW_VALUE) as u32;

fn base_value(card: &Card) -> u32 {
    if card.rank().is_ace() {
        ACE_LOW_VALUE as u32
    } else {
        card.value() as u32
    }
}

/// Returns every distinct candidate total for `cards` in ascending order.
///
/// Without aces the only candidate is the plain sum. With aces the candidates are the sum with every ace
/// counted low, followed by the sums obtained by raising each ace to its high value on its own. Raising
/// any single ace gives the same total, so a hand with aces has exactly two candidates.
/// An empty hand yields a single total of `0`, which is not a legal game value.
pub fn card_values(cards: &[Card]) -> Vec<u32> {
    let all_low: u32 = cards.iter().map(base_value).sum();
    let mut values = vec![all_low];
    for _ace in cards.iter().filter(|card| card.rank().is_ace()) {
        let raised = all_low + ACE_RAISE;
        if !values.contains(&raised) {
            values.push(raised);
        }
    }
    values
}

/// Picks the total a hand is worth: the highest candidate in `[DEALER_STAND_VALUE, BEST_HAND_VALUE]` when
/// one exists, otherwise the lowest candidate. A busted total is reported as is, never clamped.
pub fn best_value(cards: &[Card]) -> u32 {
    best_of(&card_values(cards))
}

/// Same selection as `best_value` over an already computed candidate set.
pub fn best_of(values: &[u32]) -> u32 {
    values
        .iter()
        .copied()
        .filter(|v| (DEALER_STAND_VALUE..=BEST_HAND_VALUE).contains(v))
        .max()
        .or_else(|| values.iter().copied().min())
        .unwrap_or(0)
}

/// True when every candidate total exceeds `BEST_HAND_VALUE`.
pub fn is_busted(cards: &[Card]) -> bool {
    card_values(cards).iter().all(|v| *v > BEST_HAND_VALUE)
}

/// True for exactly two cards worth `BEST_HAND_VALUE`. Split hands are excluded by the caller, who is the
/// one that knows where the cards came from.
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && best_value(cards) == BEST_HAND_VALUE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};
    use proptest::prelude::*;

    fn cards(ranks: &[Rank]) -> Vec<Card> {
        ranks
            .iter()
            .map(|rank| Card::blackjack(*rank, Suit::Clubs))
            .collect()
    }

    #[test]
    fn empty_hand_is_zero() {
        assert_eq!(card_values(&[]), vec![0]);
        assert_eq!(best_value(&[]), 0);
    }

    #[test]
    fn non_ace_cards_have_a_single_total() {
        let hand = cards(&[Rank::Six, Rank::Seven]);
        assert_eq!(card_values(&hand), vec![13]);
    }

    #[test]
    fn one_ace_gives_soft_and_hard_totals() {
        let hand = cards(&[Rank::Ace, Rank::Six]);
        assert_eq!(card_values(&hand), vec![7, 17]);
        assert_eq!(best_value(&hand), 17);
    }

    #[test]
    fn several_aces_collapse_to_two_totals() {
        let hand = cards(&[Rank::Ace, Rank::Ace, Rank::Ace]);
        assert_eq!(card_values(&hand), vec![3, 13]);
        assert_eq!(best_value(&hand), 3);
    }

    #[test]
    fn best_value_prefers_stand_range() {
        let hand = cards(&[Rank::Six, Rank::Ace, Rank::Ace]);
        assert_eq!(best_value(&hand), 18);
    }

    #[test]
    fn busted_total_is_not_clamped() {
        let hand = cards(&[Rank::King, Rank::Queen, Rank::Ace, Rank::Ace]);
        assert_eq!(best_value(&hand), 22);
        assert!(is_busted(&hand));
    }

    #[test]
    fn soft_hand_over_twenty_one_is_not_busted() {
        let hand = cards(&[Rank::Ace, Rank::Five, Rank::Nine]);
        assert_eq!(card_values(&hand), vec![15, 25]);
        assert!(!is_busted(&hand));
        assert_eq!(best_value(&hand), 15);
    }

    #[test]
    fn naturals_need_exactly_two_cards() {
        assert!(is_natural(&cards(&[Rank::Ace, Rank::King])));
        assert!(is_natural(&cards(&[Rank::Ten, Rank::Ace])));
        assert!(!is_natural(&cards(&[Rank::Seven, Rank::Seven, Rank::Seven])));
        assert!(!is_natural(&cards(&[Rank::Ace, Rank::Nine])));
    }

    fn rank_strategy() -> impl Strategy<Value = Rank> {
        (0..Rank::ALL.len()).prop_map(|i| Rank::ALL[i])
    }

    proptest! {
        #[test]
        fn totals_without_aces_are_the_plain_sum(ranks in prop::collection::vec(rank_strategy(), 0..8)) {
            let hand: Vec<Card> = cards(&ranks).into_iter().filter(|c| !c.rank().is_ace()).collect();
            let sum: u32 = hand.iter().map(|c| c.value() as u32).sum();
            prop_assert_eq!(card_values(&hand), vec![sum]);
        }

        #[test]
        fn totals_with_aces_stay_within_bounds(ranks in prop::collection::vec(rank_strategy(), 1..8)) {
            let hand = cards(&ranks);
            let aces = hand.iter().filter(|c| c.rank().is_ace()).count();
            prop_assume!(aces > 0);
            let values = card_values(&hand);
            let all_low: u32 = hand.iter().map(base_value).sum();
            prop_assert!(!values.is_empty() && values.len() <= 2 * aces + 1);
            prop_assert!(values.contains(&all_low));
        }

        #[test]
        fn best_value_is_a_candidate(ranks in prop::collection::vec(rank_strategy(), 1..8)) {
            let hand = cards(&ranks);
            let values = card_values(&hand);
            let best = best_value(&hand);
            prop_assert!(values.contains(&best));
            let in_range: Vec<u32> = values
                .iter()
                .copied()
                .filter(|v| (DEALER_STAND_VALUE..=BEST_HAND_VALUE).contains(v))
                .collect();
            match in_range.iter().max() {
                Some(max) => prop_assert_eq!(best, *max),
                None => prop_assert_eq!(best, *values.iter().min().unwrap()),
            }
        }
    }
}

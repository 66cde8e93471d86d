//! Cards, shoes, hand totals and money for blackjack games.

pub mod card;
pub mod money;
pub mod shoe;
pub mod value;

pub mod prelude {
    pub use crate::card::{
        BlackjackValueAssigner, Card, CardValueAssigner, Rank, Suit, ACE_HIGH_VALUE, ACE_LOW_VALUE,
        FACE_CARD_VALUE,
    };
    pub use crate::money::{Money, MoneyParseError};
    pub use crate::shoe::Shoe;
    pub use crate::value::{
        best_of, best_value, card_values, is_busted, is_natural, BEST_HAND_VALUE, DEALER_STAND_VALUE,
    };
}

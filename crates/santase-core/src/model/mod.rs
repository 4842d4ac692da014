pub mod card;
pub mod deck;
pub mod hand;
pub mod moves;
pub mod player;
pub mod rank;
pub mod score;
pub mod stock;
pub mod suit;
pub mod trick;

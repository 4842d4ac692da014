pub mod event;
pub mod opponent;
pub mod serialization;
pub mod state;
pub mod table;
pub mod turn;
pub mod view;

pub mod bot;

pub use bot::{BotFactory, LowestLegalBot, OpponentKind, PlayPlanner, RandomBot, UnseenTracker};

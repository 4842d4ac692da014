use crate::service::{GameService, ServiceError};
use anyhow::{Result, bail};
use santase_core::game::event::GameEvent;
use santase_core::game::opponent::Opponent;
use santase_core::game::state::{GameState, Phase};
use santase_core::model::card::{Card, ParseCardError};
use santase_core::model::moves::Move;
use santase_core::model::player::Player;
use std::io::{BufRead, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Play(Move),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("nothing entered")]
    Empty,
    #[error(transparent)]
    Card(#[from] ParseCardError),
    #[error("unknown modifier '{0}' (use close, switch or marriage)")]
    UnknownModifier(String),
}

/// Parses `KH`, `10S close`, `QD switch`, `KH marriage`, `show`, `help`, `quit`.
pub fn parse_input(line: &str) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Err(InputError::Empty);
    };
    match first.to_ascii_lowercase().as_str() {
        "show" | "s" => return Ok(Input::Show),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "q" | "exit" => return Ok(Input::Quit),
        _ => {}
    }
    let mut mv = Move::play(first.parse::<Card>()?);
    for word in words {
        mv = match word.to_ascii_lowercase().as_str() {
            "close" | "c" => mv.closing(),
            "switch" | "swap" | "x" => mv.switching_trump(),
            "marriage" | "m" => mv.announcing(),
            other => return Err(InputError::UnknownModifier(other.to_string())),
        };
    }
    Ok(Input::Play(mv))
}

pub const HELP: &str = "\
Enter a card such as KH, 10S or 9C, optionally followed by:
  close     close the stock before leading
  switch    take the face-up trump card for your nine of trumps
  marriage  announce a King/Queen pair (scored automatically anyway)
Other commands: show, help, quit";

pub fn render_state(state: &GameState) -> String {
    let trump = match state.trump_card() {
        Some(card) => format!("{card} face up"),
        None => "drawn".to_string(),
    };
    let hand = state
        .hand(Player::Human)
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let mut text = format!(
        "Trump {} ({trump}) | stock {}{} | score {} - {}\nYour hand: {hand}",
        state.trump_suit(),
        state.stock().remaining(),
        if state.is_closed() { " closed" } else { "" },
        state.human_score(),
        state.opponent_score(),
    );
    if let Some(led) = state.card_led().filter(|_| state.phase() == Phase::ResponseWait) {
        text.push_str(&format!("\nOpponent led {led}"));
    }
    text
}

pub fn describe_event(event: &GameEvent) -> String {
    match event {
        GameEvent::TrumpSwapped { player, nine, taken } => {
            format!("{player} exchanged {nine} for {taken}")
        }
        GameEvent::StockClosed { player } => format!("{player} closed the stock"),
        GameEvent::CardPlayed { player, card } => format!("{player} plays {card}"),
        GameEvent::AnnouncementMade { player, value } => {
            format!("{player} announces a marriage for {value}")
        }
        GameEvent::TrickResolved { winner, points } => {
            format!("{winner} takes the trick ({points} points)")
        }
        GameEvent::CardDrawn { player: Player::Human, card } => format!("You draw {card}"),
        GameEvent::CardDrawn { player, .. } => format!("{player} draws"),
        GameEvent::GameOver {
            winner,
            final_scores,
        } => format!(
            "Game over: {winner} wins ({} - {})",
            final_scores[Player::Human.index()],
            final_scores[Player::Opponent.index()]
        ),
    }
}

/// Prints events until the human is on turn again or the hand is over.
pub fn wait_for_turn<W: Write>(
    service: &GameService,
    events: &Receiver<GameEvent>,
    out: &mut W,
) -> Result<GameState> {
    loop {
        let (state, fault) = service.status();
        let settled = state.is_over()
            || (state.phase() != Phase::Resolving && state.turn_holder() == Player::Human);
        while let Ok(event) = events.try_recv() {
            writeln!(out, "{}", describe_event(&event))?;
        }
        if let Some(fault) = fault {
            bail!("hand aborted: {fault}");
        }
        if settled {
            return Ok(state);
        }
        match events.recv_timeout(POLL_INTERVAL) {
            Ok(event) => writeln!(out, "{}", describe_event(&event))?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => bail!("game service stopped"),
        }
    }
}

/// Plays one hand. With an autopilot the human side is played by a bot and
/// `input` is never read.
pub fn run_session<R: BufRead, W: Write>(
    service: &GameService,
    events: &Receiver<GameEvent>,
    mut input: R,
    out: &mut W,
    mut autopilot: Option<Box<dyn Opponent>>,
) -> Result<GameState> {
    loop {
        let state = wait_for_turn(service, events, out)?;
        if state.is_over() {
            return Ok(state);
        }

        let mv = match autopilot.as_mut() {
            Some(bot) => bot.choose_move(&state.view_for(Player::Human)),
            None => {
                writeln!(out, "{}", render_state(&state))?;
                write!(out, "> ")?;
                out.flush()?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    return Ok(state);
                }
                match parse_input(&line) {
                    Ok(Input::Play(mv)) => mv,
                    Ok(Input::Show) => continue,
                    Ok(Input::Help) => {
                        writeln!(out, "{HELP}")?;
                        continue;
                    }
                    Ok(Input::Quit) => return Ok(state),
                    Err(InputError::Empty) => continue,
                    Err(err) => {
                        writeln!(out, "{err}")?;
                        continue;
                    }
                }
            }
        };

        match service.submit_move(mv) {
            Ok(_) => {}
            Err(ServiceError::Game(err)) if !err.is_fatal() => {
                writeln!(out, "Not allowed: {err}")?;
                if autopilot.is_some() {
                    bail!("autopilot move {mv} refused: {err}");
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Input, InputError, describe_event, parse_input};
    use santase_core::game::event::GameEvent;
    use santase_core::model::card::Card;
    use santase_core::model::moves::Move;
    use santase_core::model::player::Player;

    fn card(text: &str) -> Card {
        text.parse().unwrap()
    }

    #[test]
    fn parses_cards_and_modifiers() {
        assert_eq!(parse_input("kh\n"), Ok(Input::Play(Move::play(card("KH")))));
        assert_eq!(
            parse_input("10S close"),
            Ok(Input::Play(Move::play(card("10S")).closing()))
        );
        assert_eq!(
            parse_input("QD switch"),
            Ok(Input::Play(Move::play(card("QD")).switching_trump()))
        );
        assert_eq!(parse_input("quit"), Ok(Input::Quit));
        assert_eq!(parse_input("   "), Err(InputError::Empty));
    }

    #[test]
    fn rejects_unknown_words() {
        assert!(matches!(parse_input("ZZ"), Err(InputError::Card(_))));
        assert_eq!(
            parse_input("KH loudly"),
            Err(InputError::UnknownModifier("loudly".to_string()))
        );
    }

    #[test]
    fn hides_opponent_draws() {
        let text = describe_event(&GameEvent::CardDrawn {
            player: Player::Opponent,
            card: card("AS"),
        });
        assert!(!text.contains("AS"));
    }
}

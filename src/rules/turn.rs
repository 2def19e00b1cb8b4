//! Turn structure: phases, allowances and player alternation.
//!
//! A turn runs Start -> Then -> Finally, with an End step only when the
//! player must discard down to the hand limit.
//!
//! - **Start**: mines pay out, then one optional free move.
//! - **Then**: one move, dig or build, paid for by discarding a ticket card.
//! - **Finally**: card activations and Excavation bonus digs.
//! - **End**: discard until the hand is within the limit.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::resolver::ActionResolver;
use crate::board::BuildingKind;
use crate::cards::CardRegistry;
use crate::core::{Command, Event, GameState, PlayerId, PlayerMap, Randomness, RulesConfig};
use crate::error::{GameError, Illegal, Result};
use crate::resources::ResourcePile;
use crate::zones::DrawPile;

/// Turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Then,
    Finally,
    End,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "Start",
            Phase::Then => "Then",
            Phase::Finally => "Finally",
            Phase::End => "End",
        };
        f.write_str(name)
    }
}

/// Whose turn it is and what they have used up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub current: PlayerId,
    pub phase: Phase,
    /// Shared counter, incremented on every player switch. Starts at 1.
    pub turn_number: u32,
    /// Incremented when play returns to Player One. Starts at 1.
    pub round: u32,
    pub start_move_used: bool,
    pub activations_used: u32,
    /// Extra digs granted by Excavation, usable in Finally.
    pub bonus_digs: u32,
    /// Set by Teleportation and kept until the player's next move.
    pub teleport: PlayerMap<bool>,
}

impl TurnState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: PlayerId::One,
            phase: Phase::Start,
            turn_number: 1,
            round: 1,
            start_move_used: false,
            activations_used: 0,
            bonus_digs: 0,
            teleport: PlayerMap::with_value(false),
        }
    }

    fn reset_allowances(&mut self) {
        self.start_move_used = false;
        self.activations_used = 0;
        self.bonus_digs = 0;
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes commands through the phase rules to the [`ActionResolver`].
pub struct TurnController<'a, R: Randomness + ?Sized> {
    state: &'a mut GameState,
    config: &'a RulesConfig,
    registry: &'a CardRegistry,
    rng: &'a mut R,
}

impl<'a, R: Randomness + ?Sized> TurnController<'a, R> {
    pub fn new(
        state: &'a mut GameState,
        config: &'a RulesConfig,
        registry: &'a CardRegistry,
        rng: &'a mut R,
    ) -> Self {
        Self {
            state,
            config,
            registry,
            rng,
        }
    }

    fn resolver(&mut self) -> ActionResolver<'_, R> {
        ActionResolver::new(&mut *self.state, self.config, self.registry, &mut *self.rng)
    }

    /// Apply one command from `player`.
    pub fn handle(&mut self, player: PlayerId, command: &Command) -> Result<Vec<Event>> {
        if let Command::Decide { token, choice } = command {
            return self.resolver().decide(player, *token, *choice);
        }
        if let Some(pending) = &self.state.pending {
            return Err(GameError::AwaitingDecision(pending.decider));
        }
        if player != self.state.turn.current {
            return Err(GameError::NotYourTurn(player));
        }

        let phase = self.state.turn.phase;
        match (phase, command) {
            (Phase::Start, Command::Move { pawn, to, .. }) => {
                if self.state.turn.start_move_used {
                    return Err(Illegal::NoActionsRemaining.into());
                }
                let mut events = self.resolver().move_pawn(player, *pawn, *to)?;
                self.state.turn.start_move_used = true;
                self.enter(Phase::Then, &mut events);
                Ok(events)
            }
            (Phase::Then, Command::Move { pawn, to, ticket }) => {
                let slot = self.ticket(player, *ticket)?;
                let events = self.resolver().move_pawn(player, *pawn, *to)?;
                self.spend_ticket(player, slot, events)
            }
            (Phase::Then, Command::Dig { pawn, target, ticket }) => {
                let slot = self.ticket(player, *ticket)?;
                let events = self.resolver().dig(player, *pawn, *target)?;
                self.spend_ticket(player, slot, events)
            }
            (Phase::Then, Command::Build { pawn, target, kind, ticket }) => {
                let slot = self.ticket(player, *ticket)?;
                let events = self.resolver().build(player, *pawn, *target, *kind)?;
                self.spend_ticket(player, slot, events)
            }
            (Phase::Finally, Command::Dig { pawn, target, .. }) => {
                if self.state.turn.bonus_digs == 0 {
                    return Err(Illegal::NoActionsRemaining.into());
                }
                let events = self.resolver().dig(player, *pawn, *target)?;
                self.state.turn.bonus_digs -= 1;
                Ok(events)
            }
            (Phase::Finally, Command::ActivateCard { slot, target }) => {
                self.resolver().activate_card(player, *slot, *target)
            }
            (Phase::End, Command::Discard { slot }) => self.discard(player, *slot),
            (Phase::Start, Command::EndPhase) => {
                let mut events = Vec::new();
                self.enter(Phase::Then, &mut events);
                Ok(events)
            }
            (Phase::Then, Command::EndPhase) => {
                let mut events = Vec::new();
                self.enter(Phase::Finally, &mut events);
                Ok(events)
            }
            (Phase::Finally, Command::EndPhase) => self.end_turn(),
            _ => Err(GameError::WrongPhase(phase)),
        }
    }

    /// Validate a Then-phase ticket without discarding it yet.
    fn ticket(&self, player: PlayerId, ticket: Option<usize>) -> Result<usize> {
        let slot = ticket.ok_or(Illegal::TicketRequired)?;
        self.state.zones.card_in_slot(player, slot)?;
        Ok(slot)
    }

    fn spend_ticket(&mut self, player: PlayerId, slot: usize, mut events: Vec<Event>) -> Result<Vec<Event>> {
        let name = self.state.zones.discard_from_hand(player, slot)?;
        events.push(Event::CardDiscarded { player, name });
        self.enter(Phase::Finally, &mut events);
        Ok(events)
    }

    fn enter(&mut self, phase: Phase, events: &mut Vec<Event>) {
        let player = self.state.turn.current;
        self.state.turn.phase = phase;
        debug!(%player, %phase, "phase changed");
        events.push(Event::PhaseChanged { player, phase });
    }

    /// Draw the end-of-turn cards, then either ask for discards or pass
    /// the turn.
    fn end_turn(&mut self) -> Result<Vec<Event>> {
        let player = self.state.turn.current;
        let draws = self.config.base_draw + self.state.scores.built_count(player, BuildingKind::Factory);
        let mut events = self.resolver().draw_cards(player, DrawPile::Main, draws)?;

        let held = self.state.zones.hand_count(player);
        if held > self.config.hand_limit {
            self.enter(Phase::End, &mut events);
            events.push(Event::DiscardRequired {
                player,
                count: held - self.config.hand_limit,
            });
        } else {
            self.switch_player(&mut events);
        }
        Ok(events)
    }

    fn discard(&mut self, player: PlayerId, slot: usize) -> Result<Vec<Event>> {
        if self.state.zones.hand_count(player) <= self.config.hand_limit {
            return Err(Illegal::HandWithinLimit.into());
        }
        let name = self.state.zones.discard_from_hand(player, slot)?;
        let mut events = vec![Event::CardDiscarded { player, name }];
        if self.state.zones.hand_count(player) <= self.config.hand_limit {
            self.switch_player(&mut events);
        }
        Ok(events)
    }

    fn switch_player(&mut self, events: &mut Vec<Event>) {
        let turn = &mut self.state.turn;
        turn.current = turn.current.opponent();
        turn.turn_number += 1;
        if turn.current == PlayerId::One {
            turn.round += 1;
        }
        turn.reset_allowances();
        info!(player = %turn.current, turn = turn.turn_number, round = turn.round, "turn passed");
        events.push(Event::TurnPassed {
            player: turn.current,
            turn: turn.turn_number,
            round: turn.round,
        });
        self.enter(Phase::Start, events);
        self.begin_turn(events);
    }

    /// Start-of-turn income: each of the current player's mines yields
    /// its suit.
    pub fn begin_turn(&mut self, events: &mut Vec<Event>) {
        let player = self.state.turn.current;
        let amount = self.config.mine_yield;
        if amount == 0 {
            return;
        }
        let income: Vec<_> = self
            .state
            .board
            .buildings_of(player)
            .into_iter()
            .filter_map(|b| b.kind.mine_suit().map(|suit| (b.id, suit)))
            .collect();
        for (building, suit) in income {
            self.state
                .ledger
                .credit_pile(player, &ResourcePile::of(suit, amount));
            events.push(Event::MineIncome {
                player,
                building,
                suit,
                amount,
            });
        }
    }
}

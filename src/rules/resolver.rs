//! Action resolution: move, dig, build, damage, repair and card effects.
//!
//! Every operation validates first and mutates only after all checks pass,
//! so a rejected action leaves the state untouched. Damage that a
//! protective card could soften stops in a `PendingDecision` until the
//! building's owner answers with [`ActionResolver::decide`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::board::{BuildingId, BuildingKind, Layer, PawnId, TilePos};
use crate::cards::{CardName, CardRegistry};
use crate::core::{DecisionToken, Event, GameState, PlayerId, Randomness, RulesConfig};
use crate::error::{GameError, Illegal, Result};
use crate::resources::ResourcePile;
use crate::zones::{DrawPile, Drawn};

/// Cards that can answer incoming damage, in the order they are offered.
const PROTECTIVE: [CardName; 2] = [CardName::Fortify, CardName::Barricade];

/// How much damage an attack deals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    /// Roll the damage die.
    Roll,
    /// Always deals massive damage.
    Massive,
}

/// Damage waiting on the building owner's protection choice.
///
/// The amount is rolled before the prompt, so the answer only selects
/// which card (if any) modifies a known outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDecision {
    pub token: DecisionToken,
    /// The building's owner.
    pub decider: PlayerId,
    pub attacker: PlayerId,
    pub building: BuildingId,
    pub amount: u8,
    pub options: SmallVec<[CardName; 2]>,
}

/// Applies rules to a `GameState`.
///
/// Phase and turn gating happen in [`TurnController`](super::TurnController);
/// the resolver only checks whether an action is legal on the board.
pub struct ActionResolver<'a, R: Randomness + ?Sized> {
    state: &'a mut GameState,
    config: &'a RulesConfig,
    registry: &'a CardRegistry,
    rng: &'a mut R,
    events: Vec<Event>,
}

impl<'a, R: Randomness + ?Sized> ActionResolver<'a, R> {
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
            events: Vec::new(),
        }
    }

    fn finish(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn ensure_no_pending(&self) -> Result<()> {
        match &self.state.pending {
            Some(pending) => Err(GameError::AwaitingDecision(pending.decider)),
            None => Ok(()),
        }
    }

    // === Movement ===

    /// Legal destinations for a pawn, or `NoValidDestination` if there
    /// are none.
    pub fn move_targets(&self, player: PlayerId, pawn: PawnId) -> Result<Vec<TilePos>> {
        let pawn = self.state.board.owned_pawn(player, pawn)?;
        let targets = self
            .state
            .board
            .move_targets(&pawn, self.state.turn.teleport[player]);
        if targets.is_empty() {
            return Err(GameError::NoValidDestination);
        }
        Ok(targets)
    }

    /// Move a pawn. A pending teleport lifts adjacency and is consumed.
    pub fn move_pawn(&mut self, player: PlayerId, pawn_id: PawnId, to: TilePos) -> Result<Vec<Event>> {
        self.ensure_no_pending()?;
        let pawn = self.state.board.owned_pawn(player, pawn_id)?;
        let teleport = self.state.turn.teleport[player];
        if self.state.board.move_targets(&pawn, teleport).is_empty() {
            return Err(GameError::NoValidDestination);
        }
        self.state.board.check_move(&pawn, to, teleport)?;

        self.state.board.relocate_pawn(pawn_id, to);
        if teleport {
            self.state.turn.teleport[player] = false;
        }
        debug!(%player, pawn = pawn_id.0, ?to, teleport, "pawn moved");
        self.events.push(Event::PawnMoved {
            pawn: pawn_id,
            from: pawn.pos,
            to,
        });
        Ok(self.finish())
    }

    // === Digging ===

    /// Dig one layer off an adjacent tile and credit the removed suit.
    ///
    /// Uncovering gold scores and draws a gold card. An empty gold deck is
    /// reported as an event, not a failure: the dig itself stands.
    pub fn dig(&mut self, player: PlayerId, pawn_id: PawnId, target: TilePos) -> Result<Vec<Event>> {
        self.ensure_no_pending()?;
        let pawn = self.state.board.owned_pawn(player, pawn_id)?;
        self.state.board.check_dig(&pawn, target)?;

        let dug = self.state.board.dig(target).ok_or(Illegal::MaxDepth)?;
        self.state.ledger.credit(player, dug.removed, 1);
        self.state.scores.record_dig(player, dug.removed);
        debug!(%player, ?target, removed = %dug.removed, revealed = %dug.revealed, "tile dug");
        self.events.push(Event::TileDug {
            player,
            pos: target,
            removed: dug.removed,
            revealed: dug.revealed,
        });
        self.events.push(Event::ResourcesGained {
            player,
            gained: ResourcePile::of(dug.removed, 1),
        });

        if dug.revealed == Layer::Gold {
            self.award(player, self.config.gold_reveal_points);
            self.draw_card(player, DrawPile::Gold)?;
        }
        Ok(self.finish())
    }

    // === Building ===

    /// Place a building next to a pawn, paying its cost.
    pub fn build(
        &mut self,
        player: PlayerId,
        pawn_id: PawnId,
        target: TilePos,
        kind: BuildingKind,
    ) -> Result<Vec<Event>> {
        self.ensure_no_pending()?;
        let pawn = self.state.board.owned_pawn(player, pawn_id)?;
        self.state.board.check_build(&pawn, target, kind)?;
        let cost = *self.config.build_costs.get(kind);
        self.state.ledger.ensure_affordable(player, &cost)?;

        let id = self
            .state
            .board
            .place_building(player, kind, target, self.config.max_building_health)
            .ok_or(Illegal::Occupied)?;
        self.state.ledger.pay(player, &cost)?;
        self.state.scores.record_built(player, kind);
        debug!(%player, %kind, ?target, building = id.0, "building placed");
        self.events.push(Event::ResourcesPaid { player, cost });
        self.events.push(Event::BuildingPlaced {
            player,
            building: id,
            kind,
            pos: target,
        });
        self.award(player, self.config.build_points);
        Ok(self.finish())
    }

    // === Damage ===

    /// Damage a building on behalf of `attacker`.
    ///
    /// Returns `DecisionRequested` instead of applying damage when the
    /// owner holds a protective card in play.
    pub fn damage(
        &mut self,
        attacker: PlayerId,
        building: BuildingId,
        source: DamageSource,
    ) -> Result<Vec<Event>> {
        self.ensure_no_pending()?;
        self.state.board.require_building(building)?;
        self.inflict(attacker, building, source)?;
        Ok(self.finish())
    }

    fn inflict(&mut self, attacker: PlayerId, building: BuildingId, source: DamageSource) -> Result<()> {
        let owner = self.state.board.require_building(building)?.owner;
        let amount = match source {
            DamageSource::Roll => {
                let roll = self.rng.roll_die(self.config.damage_die_sides)?;
                let amount = self.config.damage_for_roll(roll);
                debug!(roll, amount, building = building.0, "damage rolled");
                amount
            }
            DamageSource::Massive => self.config.massive_damage,
        };

        let options: SmallVec<[CardName; 2]> = PROTECTIVE
            .into_iter()
            .filter(|&card| self.state.zones.has_in_play(owner, card))
            .collect();
        if options.is_empty() {
            return self.apply_damage(attacker, building, amount);
        }

        let token = self.state.issue_token();
        debug!(decider = %owner, token = token.0, amount, "protection decision requested");
        self.events.push(Event::DecisionRequested {
            token,
            decider: owner,
            building,
            amount,
            options: options.clone(),
        });
        self.state.pending = Some(PendingDecision {
            token,
            decider: owner,
            attacker,
            building,
            amount,
            options,
        });
        Ok(())
    }

    /// Answer a pending protection prompt.
    ///
    /// Fortify forces the damage to exactly 1, Barricade cancels it. The
    /// chosen card leaves play. `None` takes the rolled damage.
    pub fn decide(
        &mut self,
        player: PlayerId,
        token: DecisionToken,
        choice: Option<CardName>,
    ) -> Result<Vec<Event>> {
        let pending = self.state.pending.as_ref().ok_or(GameError::NoPendingDecision)?;
        if pending.token != token {
            return Err(GameError::NoPendingDecision);
        }
        if pending.decider != player {
            return Err(GameError::NotYourTurn(player));
        }
        let amount = match choice {
            None => pending.amount,
            Some(card) => {
                if !pending.options.contains(&card) || !self.state.zones.has_in_play(player, card) {
                    return Err(Illegal::InvalidChoice.into());
                }
                match card {
                    CardName::Fortify => 1,
                    CardName::Barricade => 0,
                    _ => return Err(Illegal::InvalidChoice.into()),
                }
            }
        };

        let Some(pending) = self.state.pending.take() else {
            return Err(GameError::NoPendingDecision);
        };
        if let Some(card) = choice {
            self.state.zones.consume_in_play(player, card);
            debug!(%player, %card, amount, "protection used");
            self.events.push(Event::PersistentTriggered { player, name: card });
            self.events.push(Event::DamagePrevented {
                building: pending.building,
                card,
                amount,
            });
        }
        self.apply_damage(pending.attacker, pending.building, amount)?;
        Ok(self.finish())
    }

    fn apply_damage(&mut self, attacker: PlayerId, id: BuildingId, amount: u8) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let building = self
            .state
            .board
            .building_mut(id)
            .ok_or(Illegal::UnknownBuilding)?;
        let destroyed = building.take_damage(amount);
        let health = building.health;
        self.state.scores.stats_mut(attacker).damage_dealt += u32::from(amount);
        self.events.push(Event::BuildingDamaged {
            building: id,
            amount,
            health,
        });
        if destroyed {
            self.destroy(id)?;
        }
        Ok(())
    }

    fn destroy(&mut self, id: BuildingId) -> Result<()> {
        let building = self
            .state
            .board
            .remove_building(id)
            .ok_or(Illegal::UnknownBuilding)?;
        let current = self.state.turn.current;
        self.state
            .scores
            .record_destroyed(building.owner, building.kind, current);
        info!(owner = %building.owner, kind = %building.kind, by = %current, "building destroyed");
        self.events.push(Event::BuildingDestroyed {
            building: id,
            owner: building.owner,
            kind: building.kind,
        });
        self.award(current, 1);

        if self
            .state
            .zones
            .consume_in_play(building.owner, CardName::Retribution)
        {
            self.events.push(Event::PersistentTriggered {
                player: building.owner,
                name: CardName::Retribution,
            });
            self.award(building.owner, 1);
        }
        Ok(())
    }

    // === Repair ===

    /// Restore one point of health. Repairing an opponent's building
    /// scores the repairer a point.
    pub fn repair(&mut self, player: PlayerId, building: BuildingId) -> Result<Vec<Event>> {
        self.ensure_no_pending()?;
        self.check_repair(building)?;
        self.restore(player, building)?;
        Ok(self.finish())
    }

    fn check_repair(&self, id: BuildingId) -> Result<()> {
        let building = self.state.board.require_building(id)?;
        if building.health >= self.config.max_building_health {
            return Err(Illegal::FullHealth.into());
        }
        Ok(())
    }

    fn restore(&mut self, player: PlayerId, id: BuildingId) -> Result<()> {
        let building = self
            .state
            .board
            .building_mut(id)
            .ok_or(Illegal::UnknownBuilding)?;
        building.health += 1;
        let (owner, health) = (building.owner, building.health);
        self.state.scores.stats_mut(player).repairs += 1;
        self.events.push(Event::BuildingRepaired { building: id, health });
        if owner != player {
            self.award(player, 1);
        }
        Ok(())
    }

    // === Cards ===

    /// Activate the card in a hand slot.
    ///
    /// Checks the per-turn allowance, the target and the cost before
    /// anything moves. Persistent cards go into play; the rest are
    /// discarded before their effect resolves.
    pub fn activate_card(
        &mut self,
        player: PlayerId,
        slot: usize,
        target: Option<BuildingId>,
    ) -> Result<Vec<Event>> {
        self.ensure_no_pending()?;
        if self.state.turn.activations_used >= self.activation_allowance(player) {
            return Err(Illegal::NoActionsRemaining.into());
        }
        let (_, name) = self.state.zones.card_in_slot(player, slot)?;
        let def = self.registry.get(name);
        match (def.targets_building, target) {
            (true, None) => return Err(Illegal::TargetRequired.into()),
            (false, Some(_)) => return Err(Illegal::UnexpectedTarget.into()),
            _ => {}
        }
        if let Some(id) = target {
            self.state.board.require_building(id)?;
            if name == CardName::MasterBuilder {
                self.check_repair(id)?;
            }
        }
        self.state.ledger.ensure_affordable(player, &def.cost)?;

        self.state.ledger.pay(player, &def.cost)?;
        if def.persistent {
            self.state.zones.put_in_play(player, slot)?;
        } else {
            self.state.zones.discard_from_hand(player, slot)?;
        }
        self.state.turn.activations_used += 1;
        self.state.scores.stats_mut(player).cards_activated += 1;
        debug!(%player, card = %name, ?target, "card activated");
        if !def.cost.is_empty() {
            self.events.push(Event::ResourcesPaid {
                player,
                cost: def.cost,
            });
        }
        self.events.push(Event::CardActivated { player, name });

        self.card_effect(player, name, target)?;
        Ok(self.finish())
    }

    /// Activations allowed per turn: the base plus one per Burrow.
    #[must_use]
    pub fn activation_allowance(&self, player: PlayerId) -> u32 {
        self.config.base_activations + self.state.scores.built_count(player, BuildingKind::Burrow)
    }

    fn card_effect(&mut self, player: PlayerId, name: CardName, target: Option<BuildingId>) -> Result<()> {
        match name {
            CardName::Teleportation => self.state.turn.teleport[player] = true,
            CardName::Excavation => self.state.turn.bonus_digs += 1,
            CardName::Windfall => {
                let gained = ResourcePile::new(1, 1, 1, 0);
                self.state.ledger.credit_pile(player, &gained);
                self.events.push(Event::ResourcesGained { player, gained });
            }
            CardName::Earthquake => {
                let id = target.ok_or(Illegal::TargetRequired)?;
                self.inflict(player, id, DamageSource::Roll)?;
            }
            CardName::Meteor => {
                let id = target.ok_or(Illegal::TargetRequired)?;
                self.inflict(player, id, DamageSource::Massive)?;
            }
            CardName::MasterBuilder => {
                let id = target.ok_or(Illegal::TargetRequired)?;
                self.restore(player, id)?;
            }
            CardName::GoldRush => {
                for _ in 0..2 {
                    if !self.draw_card(player, DrawPile::Main)? {
                        break;
                    }
                }
            }
            CardName::Jackpot => self.award(player, 1),
            // Persistent: nothing happens until their trigger.
            CardName::Fortify | CardName::Barricade | CardName::Retribution => {}
        }
        Ok(())
    }

    // === Shared helpers ===

    /// Draw one card, turning a full hand or empty pile into an event.
    /// Returns true if a card was placed.
    pub(crate) fn draw_card(&mut self, player: PlayerId, pile: DrawPile) -> Result<bool> {
        match self.state.zones.draw(player, pile, &mut *self.rng) {
            Ok(Drawn::Placed { name, slot, .. }) => {
                self.events.push(Event::CardDrawn { player, slot, name });
                Ok(true)
            }
            Ok(Drawn::HandFull) => {
                self.events.push(Event::HandFull { player });
                Ok(false)
            }
            Err(GameError::NoCardsRemain) => {
                self.events.push(Event::NoCardsRemain { player, pile });
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Draw up to `count` cards, stopping at the first that cannot be
    /// placed.
    pub(crate) fn draw_cards(&mut self, player: PlayerId, pile: DrawPile, count: u32) -> Result<Vec<Event>> {
        for _ in 0..count {
            if !self.draw_card(player, pile)? {
                break;
            }
        }
        Ok(self.finish())
    }

    fn award(&mut self, player: PlayerId, points: u32) {
        if points == 0 {
            return;
        }
        let score = self.state.scores.award(player, points);
        self.events.push(Event::ScoreChanged { player, score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::core::{GameRng, RecordedRandomness};
    use crate::resources::Suit;

    fn fixture() -> (GameState, RulesConfig, CardRegistry) {
        let config = RulesConfig::default();
        let registry = CardRegistry::from_config(&config);
        let mut state = GameState::new(&config, &registry, &mut GameRng::new(1));
        state.board = BoardState::empty(5, 5, &[TilePos::new(2, 2)]);
        state.board.add_pawn(PlayerId::One, TilePos::new(2, 1));
        state.board.add_pawn(PlayerId::Two, TilePos::new(4, 4));
        (state, config, registry)
    }

    #[test]
    fn test_dig_credits_removed_suit() {
        let (mut state, config, registry) = fixture();
        let mut rng = GameRng::new(7);
        let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);

        let events = resolver.dig(PlayerId::One, PawnId(0), TilePos::new(2, 2)).unwrap();
        assert!(matches!(events[0], Event::TileDug { removed: Suit::Grass, revealed: Layer::Dirt, .. }));
        assert_eq!(state.ledger.pile(PlayerId::One).get(Suit::Grass), 1);
        assert_eq!(state.ledger.pile(PlayerId::One).total(), 1);
    }

    #[test]
    fn test_gold_reveal_scores_and_draws() {
        let (mut state, config, registry) = fixture();
        let mut rng = GameRng::new(7);
        let target = TilePos::new(2, 2);
        {
            let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);
            resolver.dig(PlayerId::One, PawnId(0), target).unwrap();
            resolver.dig(PlayerId::One, PawnId(0), target).unwrap();
        }
        let hand_before = state.zones.hand_count(PlayerId::One);
        let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);
        let events = resolver.dig(PlayerId::One, PawnId(0), target).unwrap();

        assert!(events.iter().any(|e| matches!(e, Event::CardDrawn { name, .. } if name.is_gold())));
        assert_eq!(state.board.tile(target).unwrap().layer, Layer::Gold);
        assert_eq!(state.scores.score(PlayerId::One), 1);
        assert_eq!(state.zones.hand_count(PlayerId::One), hand_before + 1);

        let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);
        let err = resolver.dig(PlayerId::One, PawnId(0), target).unwrap_err();
        assert_eq!(err, GameError::Illegal(Illegal::MaxDepth));
    }

    #[test]
    fn test_build_without_resources_leaves_state() {
        let (mut state, config, registry) = fixture();
        let mut rng = GameRng::new(7);
        let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);

        let err = resolver
            .build(PlayerId::One, PawnId(0), TilePos::new(1, 1), BuildingKind::Factory)
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientResources { .. }));
        assert!(state.board.buildings().is_empty());
        assert_eq!(state.scores.built_count(PlayerId::One, BuildingKind::Factory), 0);
    }

    #[test]
    fn test_destroy_without_protection() {
        let (mut state, config, registry) = fixture();
        let id = state
            .board
            .place_building(PlayerId::Two, BuildingKind::Factory, TilePos::new(0, 4), 1)
            .unwrap();
        state.scores.record_built(PlayerId::Two, BuildingKind::Factory);
        let mut rng = RecordedRandomness::new([1]);
        let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);

        resolver.damage(PlayerId::One, id, DamageSource::Roll).unwrap();
        assert!(state.board.building(id).is_none());
        assert_eq!(state.scores.built_count(PlayerId::Two, BuildingKind::Factory), 0);
        assert_eq!(state.scores.score(PlayerId::One), 1);
    }

    #[test]
    fn test_repair_at_full_health_rejected() {
        let (mut state, config, registry) = fixture();
        let id = state
            .board
            .place_building(PlayerId::One, BuildingKind::Burrow, TilePos::new(0, 0), 2)
            .unwrap();
        let mut rng = GameRng::new(7);
        let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);
        assert_eq!(
            resolver.repair(PlayerId::One, id).unwrap_err(),
            GameError::Illegal(Illegal::FullHealth)
        );
    }

    #[test]
    fn test_repairing_opponent_scores() {
        let (mut state, config, registry) = fixture();
        let id = state
            .board
            .place_building(PlayerId::Two, BuildingKind::Burrow, TilePos::new(0, 0), 1)
            .unwrap();
        let mut rng = GameRng::new(7);
        let mut resolver = ActionResolver::new(&mut state, &config, &registry, &mut rng);

        resolver.repair(PlayerId::One, id).unwrap();
        assert_eq!(state.board.building(id).unwrap().health, 2);
        assert_eq!(state.scores.score(PlayerId::One), 1);
        assert_eq!(state.scores.score(PlayerId::Two), 0);
    }
}

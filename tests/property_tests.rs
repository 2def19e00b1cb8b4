//! Property tests for rules invariants.

mod common;

use proptest::prelude::*;

use common::{play_simple_turn, Table};
use digging_game::board::{BuildingKind, PawnId, TilePos};
use digging_game::core::PlayerId;
use digging_game::error::{GameError, Illegal};
use digging_game::resources::ResourcePile;
use digging_game::rules::ActionResolver;
use digging_game::session::Session;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_dig_credits_one_unit(digs in 1usize..6) {
        let mut table = Table::new();
        let target = TilePos::new(1, 2);
        let mut depth = table.state.board.tile(target).unwrap().layer.depth();

        for _ in 0..digs {
            let before = table.state.ledger.pile(PlayerId::One).total();
            let result = ActionResolver::new(&mut table.state, &table.config, &table.registry, &mut table.rng)
                .dig(PlayerId::One, PawnId(0), target);
            let after = table.state.ledger.pile(PlayerId::One).total();
            let now = table.state.board.tile(target).unwrap().layer.depth();
            match result {
                Ok(_) => {
                    prop_assert_eq!(after, before + 1);
                    prop_assert!(now > depth);
                }
                Err(err) => {
                    prop_assert_eq!(err, GameError::Illegal(Illegal::MaxDepth));
                    prop_assert_eq!(after, before);
                    prop_assert_eq!(now, depth);
                }
            }
            prop_assert!(now <= 3);
            depth = now;
        }
    }

    #[test]
    fn prop_build_is_all_or_nothing(grass in 0u32..3, dirt in 0u32..3, stone in 0u32..3) {
        let mut table = Table::new();
        let before = ResourcePile::new(grass, dirt, stone, 0);
        table.state.ledger.credit_pile(PlayerId::One, &before);
        let cost = *table.config.build_costs.get(BuildingKind::Factory);

        let result = ActionResolver::new(&mut table.state, &table.config, &table.registry, &mut table.rng)
            .build(PlayerId::One, PawnId(0), TilePos::new(0, 1), BuildingKind::Factory);
        let after = *table.state.ledger.pile(PlayerId::One);
        let built = table.state.scores.built_count(PlayerId::One, BuildingKind::Factory);

        if before.covers(&cost) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(Some(after), before.checked_sub(&cost));
            prop_assert_eq!(built, 1);
        } else {
            let is_insufficient = matches!(result, Err(GameError::InsufficientResources { .. }));
            prop_assert!(is_insufficient);
            prop_assert_eq!(after, before);
            prop_assert_eq!(built, 0);
        }
    }

    #[test]
    fn prop_cards_conserved_and_turns_alternate(seed in any::<u64>(), turns in 1usize..24) {
        let mut session = Session::builder().seed(seed).build();
        let mut expected = PlayerId::One;

        for _ in 0..turns {
            prop_assert_eq!(session.state().turn.current, expected);
            play_simple_turn(&mut session);
            expected = expected.opponent();

            let zones = &session.state().zones;
            prop_assert_eq!(zones.counted_cards(), zones.total_cards());
            for player in PlayerId::all() {
                prop_assert!(zones.hand_count(player) <= session.config().hand_limit);
            }
        }
        let turn = &session.state().turn;
        prop_assert_eq!(turn.turn_number as usize, turns + 1);
        prop_assert_eq!(turn.round as usize, turns / 2 + 1);
    }
}

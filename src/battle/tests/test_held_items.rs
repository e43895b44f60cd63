#[cfg(test)]
mod tests {
    use crate::battle::effects::items::{self, HeldItemKind};
    use crate::battle::engine::{legal_moves, queue_action, run_turn, TurnResult};
    use crate::battle::hooks::HookKind;
    use crate::battle::state::{BattleState, PlayerAction, Side};
    use crate::battle::tests::common::{create_test_battle, flat_stats, hp_of, TestCombatantBuilder};
    use crate::errors::{ActionError, BattleEngineError};
    use pretty_assertions::assert_eq;
    use schema::{MoveId, Stats};

    const TACKLE: u16 = 33;
    const BODY_SLAM: u16 = 34;
    const EMBER: u16 = 52;
    const EARTHQUAKE: u16 = 89;
    const SPLASH: u16 = 150;

    fn play(battle_state: &mut BattleState, player_move: usize, opponent_move: usize) -> TurnResult {
        battle_state.action_queue = [
            Some(PlayerAction::UseMove {
                move_index: player_move,
            }),
            Some(PlayerAction::UseMove {
                move_index: opponent_move,
            }),
        ];
        run_turn(battle_state).unwrap()
    }

    fn idle_opponent() -> TestCombatantBuilder {
        TestCombatantBuilder::new(143, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(300, 50))
    }

    #[test]
    fn test_choice_item_locks_first_move() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE, BODY_SLAM])
            .with_stats(flat_stats(300, 50))
            .with_item(1)
            .build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());
        assert_eq!(battle_state.effective_stats(Side::Player).attack, 75);

        play(&mut battle_state, 0, 0);

        assert_eq!(items::choice_lock(&battle_state, Side::Player), Some(MoveId(TACKLE)));
        assert_eq!(
            legal_moves(&battle_state, Side::Player),
            vec![PlayerAction::UseMove { move_index: 0 }]
        );
        assert_eq!(
            queue_action(&mut battle_state, Side::Player, PlayerAction::UseMove { move_index: 1 }),
            Err(BattleEngineError::Action(ActionError::MoveLocked { side: Side::Player }))
        );
        assert!(queue_action(&mut battle_state, Side::Player, PlayerAction::UseMove { move_index: 0 }).is_ok());
    }

    #[test]
    fn test_choice_lock_without_pp_forces_struggle() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE, BODY_SLAM])
            .with_stats(flat_stats(300, 50))
            .with_item(3)
            .build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());
        play(&mut battle_state, 0, 0);
        battle_state.combatant_mut(Side::Player).pp[0] = 0;

        assert_eq!(legal_moves(&battle_state, Side::Player), vec![PlayerAction::Struggle]);
    }

    #[test]
    fn test_choice_scarf_raises_speed() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_stats(flat_stats(300, 60))
            .with_item(3)
            .build();
        let battle_state = create_test_battle(player, idle_opponent().build());

        assert_eq!(battle_state.effective_speed(Side::Player), 90);
        assert_eq!(battle_state.effective_stats(Side::Player).attack, 60);
    }

    #[test]
    fn test_sitrus_berry_heals_at_half_and_is_consumed() {
        // floor(((22 * 40 * 100 / 50) / 50 + 2) * 1.5 * 0.9235) = 51 damage.
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE])
            .with_stats(Stats::new(200, 100, 50, 50, 50, 100))
            .build();
        let opponent = TestCombatantBuilder::new(143, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(100, 50))
            .with_item(5)
            .build();
        let mut battle_state = create_test_battle(player, opponent);

        let result = play(&mut battle_state, 0, 0);

        assert_eq!(hp_of(&battle_state, Side::Opponent), 74);
        assert_eq!(battle_state.combatant(Side::Opponent).held_item, None);
        assert_eq!(battle_state.combatant(Side::Opponent).to_snapshot().held_item, None);
        assert!(result
            .narration
            .contains(&"Snorlax restored its health using its Sitrus Berry!".to_string()));
    }

    #[test]
    fn test_gem_is_consumed_by_matching_move() {
        let player = TestCombatantBuilder::new(4, 50)
            .with_moves(&[EMBER])
            .with_stats(flat_stats(300, 60))
            .with_item(19)
            .build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());
        assert_eq!(
            battle_state
                .combatant(Side::Player)
                .held_item
                .as_ref()
                .and_then(|item| item.kind),
            Some(HeldItemKind::Gem(schema::PokemonType::Fire))
        );

        let result = play(&mut battle_state, 0, 0);

        assert_eq!(battle_state.combatant(Side::Player).held_item, None);
        assert!(battle_state.combatant(Side::Player).hooks.is_empty());
        assert!(result
            .narration
            .contains(&"The Fire Gem strengthened Charmander's power!".to_string()));
    }

    #[test]
    fn test_air_balloon_grants_ground_immunity_until_hit() {
        let player = TestCombatantBuilder::new(25, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(300, 60))
            .with_item(7)
            .build();
        let opponent = TestCombatantBuilder::new(74, 50)
            .with_moves(&[EARTHQUAKE, TACKLE])
            .with_stats(flat_stats(300, 60))
            .build();
        let mut battle_state = create_test_battle(player, opponent);

        let first = play(&mut battle_state, 0, 0);
        assert_eq!(hp_of(&battle_state, Side::Player), 300);
        assert!(first.narration.contains(&"It doesn't affect Pikachu...".to_string()));
        assert!(battle_state.combatant(Side::Player).held_item.is_some());

        let second = play(&mut battle_state, 0, 1);
        assert!(hp_of(&battle_state, Side::Player) < 300);
        assert!(second.narration.contains(&"Pikachu's Air Balloon popped!".to_string()));
        assert_eq!(battle_state.combatant(Side::Player).held_item, None);
        assert!(battle_state.combatant(Side::Player).hooks.is_empty());
    }

    #[test]
    fn test_unknown_item_id_has_no_behavior() {
        let player = TestCombatantBuilder::new(143, 50).with_item(8).build();
        let battle_state = create_test_battle(player, idle_opponent().build());

        let item = battle_state.combatant(Side::Player).held_item.as_ref();
        assert_eq!(item.map(|item| item.id), Some(8));
        assert_eq!(item.and_then(|item| item.kind), None);
        assert!(battle_state.combatant(Side::Player).hooks.is_empty());
    }

    #[test]
    fn test_sitrus_berry_waits_until_half_hp() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE])
            .with_stats(flat_stats(300, 50))
            .build();
        let opponent = TestCombatantBuilder::new(143, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(300, 50))
            .with_item(5)
            .build();
        let mut battle_state = create_test_battle(player, opponent);

        play(&mut battle_state, 0, 0);

        let holder = battle_state.combatant(Side::Opponent);
        assert!(holder.current_hp() < 300);
        assert!(holder.current_hp() > 150);
        assert_eq!(holder.held_item.as_ref().map(|item| item.id), Some(5));
        let berry_hooks = holder.hooks.entries(HookKind::AfterDamage);
        assert_eq!(berry_hooks.len(), 1);
        assert_eq!(berry_hooks[0].name, "item:sitrus-berry:after_damage");
        assert!(!berry_hooks[0].persistent);
    }

    #[test]
    fn test_gem_is_kept_when_the_move_has_no_effect() {
        // Ground Gem into Levitate: the immunity is decided after the
        // attacker's hooks have run, but the gem must survive it.
        let player = TestCombatantBuilder::new(74, 50)
            .with_moves(&[EARTHQUAKE])
            .with_stats(flat_stats(300, 60))
            .with_item(14)
            .build();
        let opponent = TestCombatantBuilder::new(25, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(300, 50))
            .with_ability(26)
            .build();
        let mut battle_state = create_test_battle(player, opponent);

        let result = play(&mut battle_state, 0, 0);

        assert_eq!(hp_of(&battle_state, Side::Opponent), 300);
        assert!(result.narration.contains(&"It doesn't affect Pikachu...".to_string()));
        assert!(!result
            .narration
            .iter()
            .any(|line| line.starts_with("The Ground Gem")));
        let attacker = battle_state.combatant(Side::Player);
        assert_eq!(attacker.held_item.as_ref().map(|item| item.id), Some(14));
        assert!(attacker
            .hooks
            .is_registered(HookKind::AfterDamage, "item:ground-gem:after_damage"));
    }
}

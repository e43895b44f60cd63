#[cfg(test)]
mod tests {
    use crate::battle::engine::{
        forfeit, legal_moves, queue_action, run_to_completion, run_turn, run_turn_with_logger, start_battle,
        start_battle_with_config,
    };
    use crate::battle::logger::ListBattleLogger;
    use crate::battle::state::{BattlePhase, PlayerAction, Side};
    use crate::battle::tests::common::{
        create_test_battle, flat_stats, hp_of, move_slot, test_content, TestCombatantBuilder,
    };
    use crate::config::BattleConfig;
    use crate::errors::{ActionError, BattleEngineError, BattleStateError};
    use pretty_assertions::assert_eq;
    use schema::{StatType, Stats};

    const TACKLE: u16 = 33;
    const SPLASH: u16 = 150;

    fn idle_opponent() -> TestCombatantBuilder {
        TestCombatantBuilder::new(143, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(300, 50))
    }

    #[test]
    fn test_struggle_when_out_of_pp() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE])
            .with_stats(flat_stats(100, 50))
            .build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());
        battle_state.combatant_mut(Side::Player).pp[0] = 0;

        assert_eq!(legal_moves(&battle_state, Side::Player), vec![PlayerAction::Struggle]);
        assert_eq!(
            queue_action(&mut battle_state, Side::Player, PlayerAction::UseMove { move_index: 0 }),
            Err(BattleEngineError::Action(ActionError::NoPpRemaining(0)))
        );
        queue_action(&mut battle_state, Side::Player, PlayerAction::Struggle).unwrap();
        queue_action(&mut battle_state, Side::Opponent, PlayerAction::UseMove { move_index: 0 }).unwrap();

        let result = run_turn(&mut battle_state).unwrap();

        assert!(result.narration.contains(&"Snorlax used Struggle!".to_string()));
        assert!(result.narration.contains(&"Snorlax is damaged by recoil!".to_string()));
        assert_eq!(hp_of(&battle_state, Side::Player), 75);
        assert!(hp_of(&battle_state, Side::Opponent) < 300);
    }

    #[test]
    fn test_unqueued_side_without_pp_struggles() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE])
            .with_stats(flat_stats(100, 50))
            .build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());
        battle_state.combatant_mut(Side::Player).pp[0] = 0;

        let result = run_turn(&mut battle_state).unwrap();

        assert!(result.narration.contains(&"Snorlax used Struggle!".to_string()));
    }

    #[test]
    fn test_invalid_actions_are_rejected() {
        let player = TestCombatantBuilder::new(143, 50).with_moves(&[TACKLE]).build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());

        assert_eq!(
            queue_action(&mut battle_state, Side::Player, PlayerAction::UseMove { move_index: 4 }),
            Err(BattleEngineError::Action(ActionError::InvalidMoveIndex(4)))
        );
        assert!(matches!(
            queue_action(&mut battle_state, Side::Player, PlayerAction::Struggle),
            Err(BattleEngineError::Action(ActionError::InvalidAction(_)))
        ));
        assert_eq!(battle_state.action_queue, [None, None]);
    }

    #[test]
    fn test_queued_forfeit_ends_battle_before_moves() {
        let player = TestCombatantBuilder::new(143, 50).with_moves(&[TACKLE]).build();
        let opponent = TestCombatantBuilder::new(25, 50).with_moves(&[TACKLE]).build();
        let mut battle_state = create_test_battle(player, opponent);
        queue_action(&mut battle_state, Side::Player, PlayerAction::Forfeit).unwrap();

        let result = run_turn(&mut battle_state).unwrap();

        assert!(result.battle_over);
        assert_eq!(result.winner, Some(Side::Opponent));
        assert_eq!(result.narration, vec!["Snorlax forfeited the battle!".to_string()]);
        assert_eq!(battle_state.phase, BattlePhase::BattleEnd);
    }

    #[test]
    fn test_finished_battle_rejects_further_input() {
        let player = TestCombatantBuilder::new(143, 50).build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());

        forfeit(&mut battle_state, Side::Opponent).unwrap();

        assert_eq!(battle_state.winner, Some(Side::Player));
        let over = Err(BattleEngineError::BattleState(BattleStateError::BattleOver));
        assert!(matches!(
            run_turn(&mut battle_state),
            Err(BattleEngineError::BattleState(BattleStateError::BattleOver))
        ));
        assert_eq!(
            queue_action(&mut battle_state, Side::Player, PlayerAction::UseMove { move_index: 0 }),
            over
        );
        assert_eq!(forfeit(&mut battle_state, Side::Player), over);
    }

    #[test]
    fn test_seeded_battles_are_reproducible() {
        let content = test_content();
        let pikachu = TestCombatantBuilder::new(25, 30).with_moves(&[84, 98, 86]).build();
        let squirtle = TestCombatantBuilder::new(7, 30).with_moves(&[55, 33, 39]).build();

        let mut first = start_battle(&content, pikachu.clone(), squirtle.clone(), Some(7)).unwrap();
        let mut second = start_battle(&content, pikachu, squirtle, Some(7)).unwrap();
        let first_result = run_to_completion(&mut first).unwrap();
        let second_result = run_to_completion(&mut second).unwrap();

        assert_eq!(first_result, second_result);
        let Some(winner) = first_result.winner else {
            panic!("expected a decisive battle: {:?}", first_result.narration);
        };
        assert_eq!(first_result.snapshots[winner.opponent().index()].current_hp, 0);
        assert!(first_result.snapshots[winner.index()].current_hp > 0);
        assert!(first_result.turns >= 1);
    }

    #[test]
    fn test_turn_cap_ends_in_draw() {
        let content = test_content();
        let config = BattleConfig {
            max_turns: 5,
            ..BattleConfig::default()
        };
        let player = TestCombatantBuilder::new(143, 50).with_moves(&[SPLASH]).build();
        let opponent = TestCombatantBuilder::new(143, 50).with_moves(&[SPLASH]).build();
        let mut battle_state = start_battle_with_config(&content, player, opponent, Some(1), config).unwrap();

        let result = run_to_completion(&mut battle_state).unwrap();

        assert_eq!(result.winner, None);
        assert_eq!(result.turns, 5);
        assert_eq!(result.narration.last(), Some(&"The battle ended in a draw.".to_string()));
        assert!(battle_state.is_over());
    }

    #[test]
    fn test_knockout_fires_faint_hooks() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE])
            .with_stats(flat_stats(100, 50))
            .with_ability(153)
            .build();
        let opponent = TestCombatantBuilder::new(143, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(100, 50))
            .with_hp(1)
            .with_ability(106)
            .build();
        let mut battle_state = create_test_battle(player, opponent);

        let result = run_turn(&mut battle_state).unwrap();

        assert_eq!(result.winner, Some(Side::Player));
        assert_eq!(hp_of(&battle_state, Side::Player), 75);
        assert_eq!(battle_state.combatant(Side::Player).stage(StatType::Attack), 1);
        let expected_tail = [
            "Snorlax fainted!",
            "Snorlax was caught in the Aftermath!",
            "Snorlax's Moxie activates!",
            "Snorlax's Attack rose!",
            "Snorlax wins the battle!",
        ];
        let tail = &result.narration[result.narration.len() - expected_tail.len()..];
        assert_eq!(tail, expected_tail.map(String::from).as_slice());
    }

    #[test]
    fn test_aftermath_double_knockout_is_a_draw() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE])
            .with_stats(flat_stats(100, 50))
            .with_hp(20)
            .build();
        let opponent = TestCombatantBuilder::new(143, 50)
            .with_moves(&[SPLASH])
            .with_stats(flat_stats(100, 50))
            .with_hp(1)
            .with_ability(106)
            .build();
        let mut battle_state = create_test_battle(player, opponent);

        let result = run_turn(&mut battle_state).unwrap();

        assert!(result.battle_over);
        assert_eq!(result.winner, None);
        assert_eq!(hp_of(&battle_state, Side::Player), 0);
        assert!(result.narration.contains(&"The battle ended in a draw.".to_string()));
    }

    #[test]
    fn test_snapshot_writes_back_pp_and_hp() {
        let player = TestCombatantBuilder::new(143, 50)
            .with_moves(&[TACKLE, SPLASH])
            .with_stats(Stats::new(300, 50, 50, 50, 50, 60))
            .build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());
        queue_action(&mut battle_state, Side::Player, PlayerAction::UseMove { move_index: 0 }).unwrap();

        run_turn(&mut battle_state).unwrap();

        assert_eq!(move_slot(&battle_state, Side::Player, 0).pp, 34);
        assert_eq!(move_slot(&battle_state, Side::Player, 1).pp, 40);
        assert_eq!(move_slot(&battle_state, Side::Opponent, 0).pp, 39);
        let snapshot = battle_state.combatant(Side::Opponent).to_snapshot();
        assert_eq!(snapshot.current_hp, hp_of(&battle_state, Side::Opponent));
        assert!(snapshot.current_hp < 300);
    }

    #[test]
    fn test_streaming_logger_sees_every_line() {
        let player = TestCombatantBuilder::new(143, 50).with_moves(&[TACKLE]).build();
        let mut battle_state = create_test_battle(player, idle_opponent().build());
        let mut sink = ListBattleLogger::new();

        let result = run_turn_with_logger(&mut battle_state, &mut sink).unwrap();

        assert_eq!(sink.lines(), result.narration.as_slice());
        assert!(!result.narration.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::effects::VolatileKind;
    use crate::battle::engine::{run_turn, TurnResult};
    use crate::battle::state::{BattleState, PlayerAction, Side, TurnRng};
    use crate::battle::tests::common::{
        create_battle_with_rng, create_test_battle, flat_stats, hp_of, move_slot, TestCombatantBuilder,
    };
    use pretty_assertions::assert_eq;
    use schema::{MoveId, ProtectionKind, StatType, Stats, WeatherKind};

    const FLY: u16 = 19;
    const TACKLE: u16 = 33;
    const THUNDER: u16 = 87;
    const FISSURE: u16 = 90;
    const RECOVER: u16 = 105;
    const SKULL_BASH: u16 = 130;
    const SPLASH: u16 = 150;
    const PROTECT: u16 = 182;
    const SWAGGER: u16 = 207;
    const RAIN_DANCE: u16 = 240;

    fn fast(species: u16, moves: &[u16]) -> TestCombatantBuilder {
        TestCombatantBuilder::new(species, 50)
            .with_moves(moves)
            .with_stats(Stats::new(300, 60, 60, 60, 60, 120))
    }

    fn slow(species: u16, moves: &[u16]) -> TestCombatantBuilder {
        TestCombatantBuilder::new(species, 50)
            .with_moves(moves)
            .with_stats(Stats::new(300, 60, 60, 60, 60, 40))
    }

    fn play(battle_state: &mut BattleState) -> TurnResult {
        battle_state.action_queue = [
            Some(PlayerAction::UseMove { move_index: 0 }),
            Some(PlayerAction::UseMove { move_index: 0 }),
        ];
        run_turn(battle_state).unwrap()
    }

    fn has_line(result: &TurnResult, line: &str) -> bool {
        result.narration.iter().any(|entry| entry == line)
    }

    #[test]
    fn test_fly_charges_then_strikes() {
        let mut battle_state = create_test_battle(fast(25, &[FLY]).build(), slow(143, &[TACKLE]).build());

        let charge_turn = play(&mut battle_state);

        assert!(has_line(&charge_turn, "Pikachu flew up high!"));
        assert!(has_line(&charge_turn, "Snorlax's attack missed!"));
        assert_eq!(hp_of(&battle_state, Side::Player), 300);
        assert_eq!(hp_of(&battle_state, Side::Opponent), 300);
        assert_eq!(battle_state.combatant(Side::Player).charging_move, Some(MoveId(FLY)));
        assert_eq!(battle_state.combatant(Side::Player).protection, Some(ProtectionKind::InAir));
        assert_eq!(move_slot(&battle_state, Side::Player, 0).pp, 14);

        let release_turn = play(&mut battle_state);

        assert!(!has_line(&release_turn, "Pikachu flew up high!"));
        assert!(hp_of(&battle_state, Side::Opponent) < 300);
        assert_eq!(battle_state.combatant(Side::Player).charging_move, None);
        assert_eq!(battle_state.combatant(Side::Player).protection, None);
        assert_eq!(move_slot(&battle_state, Side::Player, 0).pp, 14);
    }

    #[test]
    fn test_thunder_hits_a_flying_target() {
        let mut battle_state = create_test_battle(fast(25, &[FLY]).build(), slow(143, &[THUNDER]).build());

        let result = play(&mut battle_state);

        assert!(!has_line(&result, "Snorlax's attack missed!"));
        assert!(hp_of(&battle_state, Side::Player) < 300);
    }

    #[test]
    fn test_skull_bash_raises_defense_while_charging() {
        let mut battle_state = create_test_battle(fast(143, &[SKULL_BASH]).build(), slow(25, &[SPLASH]).build());

        let result = play(&mut battle_state);

        assert!(has_line(&result, "Snorlax is charging up power!"));
        assert!(has_line(&result, "Snorlax's Defense rose!"));
        assert_eq!(battle_state.combatant(Side::Player).stage(StatType::Defense), 1);
        assert_eq!(battle_state.combatant(Side::Player).protection, None);
    }

    #[test]
    fn test_protect_blocks_and_clears_at_turn_end() {
        let mut battle_state = create_test_battle(slow(25, &[PROTECT]).build(), fast(143, &[TACKLE]).build());

        let result = play(&mut battle_state);

        let protected_lines = result
            .narration
            .iter()
            .filter(|line| *line == "Pikachu protected itself!")
            .count();
        assert_eq!(protected_lines, 2);
        assert_eq!(hp_of(&battle_state, Side::Player), 300);
        assert_eq!(battle_state.combatant(Side::Player).protection, None);
    }

    #[test]
    fn test_ohko_fails_against_higher_level() {
        let player = TestCombatantBuilder::new(74, 40).with_moves(&[FISSURE]).build();
        let opponent = TestCombatantBuilder::new(143, 50).with_moves(&[SPLASH]).build();
        let mut battle_state = create_battle_with_rng(player, opponent, TurnRng::new_for_test(vec![1]));
        let full_hp = hp_of(&battle_state, Side::Opponent);

        let result = play(&mut battle_state);

        assert!(has_line(&result, "Geodude's attack missed!"));
        assert_eq!(hp_of(&battle_state, Side::Opponent), full_hp);
    }

    #[test]
    fn test_ohko_knocks_out_lower_level() {
        let player = TestCombatantBuilder::new(74, 60).with_moves(&[FISSURE]).build();
        let opponent = TestCombatantBuilder::new(143, 50).with_moves(&[SPLASH]).build();
        let mut battle_state = create_battle_with_rng(player, opponent, TurnRng::new_for_test(vec![1]));

        let result = play(&mut battle_state);

        assert!(has_line(&result, "It's a one-hit KO!"));
        assert_eq!(hp_of(&battle_state, Side::Opponent), 0);
        assert_eq!(result.winner, Some(Side::Player));
    }

    #[test]
    fn test_recover_heals_half_and_fails_at_full() {
        let player = fast(143, &[RECOVER]).with_hp(100).build();
        let mut battle_state = create_test_battle(player, slow(25, &[SPLASH]).build());

        let first = play(&mut battle_state);
        assert!(has_line(&first, "Snorlax regained health!"));
        assert_eq!(hp_of(&battle_state, Side::Player), 250);

        battle_state.combatant_mut(Side::Player).set_hp(300);
        let second = play(&mut battle_state);
        assert!(has_line(&second, "But it failed!"));
    }

    #[test]
    fn test_swagger_confuses_and_boosts_target() {
        let mut battle_state = create_test_battle(fast(25, &[SWAGGER]).build(), slow(143, &[SPLASH]).build());

        let result = play(&mut battle_state);

        assert!(has_line(&result, "Snorlax became confused!"));
        assert_eq!(battle_state.combatant(Side::Opponent).stage(StatType::Attack), 2);
        assert!(battle_state.combatant(Side::Opponent).has_volatile(VolatileKind::Confusion));
    }

    #[test]
    fn test_weather_move_starts_weather() {
        let player = TestCombatantBuilder::new(7, 50)
            .with_moves(&[RAIN_DANCE])
            .with_stats(flat_stats(300, 60))
            .build();
        let mut battle_state = create_test_battle(player, slow(143, &[SPLASH]).build());

        let result = play(&mut battle_state);

        assert!(has_line(&result, "It started to rain!"));
        assert_eq!(battle_state.field.weather, Some(WeatherKind::Rain));
        // The countdown already ticked once at the end of this turn.
        assert_eq!(battle_state.field.weather_turns, 4);
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::engine::handle_battle_start;
    use crate::battle::hooks::HookKind;
    use crate::battle::logger::ListBattleLogger;
    use crate::battle::state::{BattlePhase, Side};
    use crate::battle::tests::common::{create_test_battle, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use schema::{StatType, WeatherKind};

    #[test]
    fn test_intimidate_lowers_opponent_attack_on_entry() {
        // Arrange
        let player = TestCombatantBuilder::new(130, 50).with_ability(22).build();
        let opponent = TestCombatantBuilder::new(143, 50).build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut logger = ListBattleLogger::new();

        // Act
        handle_battle_start(&mut battle_state, &mut logger);

        // Assert
        assert_eq!(battle_state.combatant(Side::Opponent).stage(StatType::Attack), -1);
        assert_eq!(battle_state.combatant(Side::Player).stage(StatType::Attack), 0);
        assert_eq!(battle_state.phase, BattlePhase::TurnLoop);
        assert!(logger.contains("Gyarados's Intimidate cuts Snorlax's attack!"));
        assert!(logger.contains("Snorlax's Attack fell!"));
    }

    #[test]
    fn test_battle_start_runs_only_once() {
        let player = TestCombatantBuilder::new(130, 50).with_ability(22).build();
        let opponent = TestCombatantBuilder::new(143, 50).build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut logger = ListBattleLogger::new();

        handle_battle_start(&mut battle_state, &mut logger);
        handle_battle_start(&mut battle_state, &mut logger);

        assert_eq!(battle_state.combatant(Side::Opponent).stage(StatType::Attack), -1);
    }

    #[test]
    fn test_drizzle_starts_rain_for_configured_turns() {
        let player = TestCombatantBuilder::new(131, 50).with_ability(2).build();
        let opponent = TestCombatantBuilder::new(143, 50).build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut logger = ListBattleLogger::new();

        handle_battle_start(&mut battle_state, &mut logger);

        assert_eq!(battle_state.field.weather, Some(WeatherKind::Rain));
        assert_eq!(battle_state.field.weather_turns, 5);
        assert!(battle_state
            .field
            .hooks
            .is_registered(HookKind::OnDamageCalc, "weather:rain:on_damage_calc"));
        assert!(logger.contains("It started to rain!"));
    }

    #[test]
    fn test_later_weather_ability_replaces_earlier_one() {
        // The slower Sand Stream user enters second and overrides the sun.
        let player = TestCombatantBuilder::new(74, 50).with_ability(45).build();
        let opponent = TestCombatantBuilder::new(143, 50).with_ability(70).build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut logger = ListBattleLogger::new();

        let geodude_speed = battle_state.effective_speed(Side::Player);
        let snorlax_speed = battle_state.effective_speed(Side::Opponent);
        assert!(snorlax_speed > geodude_speed);

        handle_battle_start(&mut battle_state, &mut logger);

        assert_eq!(battle_state.field.weather, Some(WeatherKind::Sandstorm));
        assert!(!battle_state
            .field
            .hooks
            .is_registered(HookKind::OnDamageCalc, "weather:sun:on_damage_calc"));
        assert!(logger.contains("The sunlight turned harsh!"));
        assert!(logger.contains("A sandstorm kicked up!"));
    }

    #[test]
    fn test_air_balloon_is_announced() {
        let player = TestCombatantBuilder::new(25, 50).with_item(7).build();
        let opponent = TestCombatantBuilder::new(143, 50).build();
        let mut battle_state = create_test_battle(player, opponent);
        let mut logger = ListBattleLogger::new();

        handle_battle_start(&mut battle_state, &mut logger);

        assert!(logger.contains("Pikachu floats in the air with its Air Balloon!"));
    }

    #[test]
    fn test_preexisting_status_installs_hooks() {
        use crate::battle::effects::StatusCondition;

        let player = TestCombatantBuilder::new(143, 50)
            .with_status(StatusCondition::Burn)
            .build();
        let opponent = TestCombatantBuilder::new(143, 50).build();
        let battle_state = create_test_battle(player, opponent);

        let hooks = &battle_state.combatant(Side::Player).hooks;
        assert!(hooks.is_registered(HookKind::TurnEnd, "status:burn:turn_end"));
        assert!(hooks.is_registered(HookKind::OnStatCalc, "status:burn:on_stat_calc"));
    }
}

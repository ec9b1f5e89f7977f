use shamble_core::TurnPhase;
use shamble_system_turns::{PhaseChange, TurnParticipants, TurnScheduler};

#[derive(Debug, Default)]
struct Script {
    player_finished: bool,
    enemies: Vec<bool>,
    enemy_orders: u32,
    player_orders: u32,
    refreshes: u32,
    log: Vec<&'static str>,
}

impl Script {
    fn with_enemies(count: usize) -> Self {
        Self {
            enemies: vec![true; count],
            ..Self::default()
        }
    }
}

impl TurnParticipants for Script {
    fn player_turn_finished(&self) -> bool {
        self.player_finished
    }

    fn enemies_turn_finished(&self) -> bool {
        self.enemies.iter().all(|finished| *finished)
    }

    fn enemies_take_turn(&mut self) {
        self.enemy_orders += 1;
        self.enemies.iter_mut().for_each(|finished| *finished = false);
        self.log.push("enemies");
    }

    fn refresh_visibility(&mut self) {
        self.refreshes += 1;
        self.log.push("refresh");
    }

    fn player_take_turn(&mut self) {
        self.player_orders += 1;
        self.player_finished = false;
        self.log.push("player");
    }
}

#[test]
fn waits_in_player_phase_until_player_finishes() {
    let mut scheduler = TurnScheduler::new();
    let mut script = Script::with_enemies(2);

    for _ in 0..5 {
        assert_eq!(scheduler.step(&mut script), Ok(None));
    }
    assert_eq!(scheduler.phase(), TurnPhase::Player);
    assert_eq!(scheduler.ticks_in_phase(), 5);
}

#[test]
fn alternates_phases_and_refreshes_once_per_player_entry() {
    let mut scheduler = TurnScheduler::new();
    let mut script = Script::with_enemies(2);

    script.player_finished = true;
    assert_eq!(
        scheduler.step(&mut script),
        Ok(Some(PhaseChange::EnteredAi {
            round_advanced: true
        }))
    );
    assert_eq!(scheduler.phase(), TurnPhase::Ai);
    assert_eq!(scheduler.round(), 1);
    assert_eq!(script.enemy_orders, 1);

    assert_eq!(scheduler.step(&mut script), Ok(None));
    assert_eq!(scheduler.phase(), TurnPhase::Ai);

    script.enemies[0] = true;
    assert_eq!(scheduler.step(&mut script), Ok(None));

    script.enemies[1] = true;
    assert_eq!(
        scheduler.step(&mut script),
        Ok(Some(PhaseChange::EnteredPlayer { turn_started: true }))
    );
    assert_eq!(scheduler.phase(), TurnPhase::Player);
    assert_eq!(script.refreshes, 1);
    assert_eq!(script.player_orders, 1);
    assert_eq!(script.log, vec!["enemies", "refresh", "player"]);

    assert_eq!(scheduler.step(&mut script), Ok(None));
    assert_eq!(script.refreshes, 1);
}

#[test]
fn zero_enemies_advance_the_round_without_idling() {
    let mut scheduler = TurnScheduler::new();
    let mut script = Script::with_enemies(0);

    for round in 1..=3 {
        script.player_finished = true;
        assert_eq!(
            scheduler.step(&mut script),
            Ok(Some(PhaseChange::EnteredAi {
                round_advanced: true
            }))
        );
        assert_eq!(
            scheduler.step(&mut script),
            Ok(Some(PhaseChange::EnteredPlayer { turn_started: true }))
        );
        assert_eq!(scheduler.round(), round);
    }
    assert_eq!(script.refreshes, 3);
}

#[test]
fn busy_enemies_on_entry_do_not_advance_the_round() {
    let mut scheduler = TurnScheduler::new();
    let mut script = Script::with_enemies(1);
    script.enemies[0] = false;
    script.player_finished = true;

    assert_eq!(
        scheduler.step(&mut script),
        Ok(Some(PhaseChange::EnteredAi {
            round_advanced: false
        }))
    );
    assert_eq!(scheduler.round(), 0);
    assert_eq!(script.enemy_orders, 0);
}

#[test]
fn stalled_enemy_keeps_the_ai_phase_alive() {
    let mut scheduler = TurnScheduler::new();
    let mut script = Script::with_enemies(1);
    script.player_finished = true;
    let _ = scheduler.step(&mut script);

    for _ in 0..100 {
        assert_eq!(scheduler.step(&mut script), Ok(None));
    }
    assert_eq!(scheduler.phase(), TurnPhase::Ai);
    assert_eq!(scheduler.ticks_in_phase(), 100);
}

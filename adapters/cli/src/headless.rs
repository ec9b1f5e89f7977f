//! Scripted run without a window, used for smoke tests and profiling.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use shamble_core::{Event, InputCommand};
use shamble_engine::{Simulation, SimulationConfig};
use shamble_rendering::{Canvas, Color, FrameHandler, ImageHandle, PixelRect, ResourceTable};
use shamble_world::query;

const FRAME_TIME: Duration = Duration::from_millis(16);
const TICKS_PER_ROUND_LIMIT: u64 = 64;
const SCRIPT: [InputCommand; 5] = [
    InputCommand::Right,
    InputCommand::Down,
    InputCommand::Left,
    InputCommand::Up,
    InputCommand::Skip,
];

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct RunSummary {
    seed: String,
    rounds: u64,
    ticks: u64,
    player_column: i32,
    player_row: i32,
    enemies: usize,
    attacks: usize,
    draw_calls: usize,
}

#[derive(Debug, Default)]
struct CountingCanvas {
    draw_calls: usize,
}

impl Canvas for CountingCanvas {
    fn fill_rect(&mut self, _rect: PixelRect, _color: Color) {
        self.draw_calls += 1;
    }

    fn draw_image(&mut self, _image: ImageHandle, _source: PixelRect, _dest: PixelRect, _flip_x: bool) {
        self.draw_calls += 1;
    }
}

/// Plays `rounds` rounds with a fixed input script cycling through every command.
pub(crate) fn run(config: SimulationConfig, rounds: u64) -> Result<RunSummary> {
    let seed = config.seed;
    let mut simulation = Simulation::new(config).context("failed to set up the simulation")?;
    let resources = ResourceTable::new();
    let mut canvas = CountingCanvas::default();
    let mut script = SCRIPT.iter().copied().cycle();
    let tick_limit = rounds.saturating_add(1).saturating_mul(TICKS_PER_ROUND_LIMIT);
    let mut attacks = 0;

    while simulation.round() < rounds && simulation.ticks() < tick_limit {
        if simulation.awaiting_player_input() {
            if let Some(command) = script.next() {
                simulation.handle_input(command);
            }
        }
        simulation.frame(FRAME_TIME, &mut canvas, &resources);
        attacks += simulation
            .events()
            .iter()
            .filter(|event| matches!(event, Event::ActorAttacked { .. }))
            .count();
    }

    if simulation.round() < rounds {
        tracing::warn!(
            rounds = simulation.round(),
            ticks = simulation.ticks(),
            "headless run hit its tick limit"
        );
    }

    let player = query::player_cell(simulation.world()).context("player is missing")?;
    Ok(RunSummary {
        seed: format!("{seed:#018x}"),
        rounds: simulation.round(),
        ticks: simulation.ticks(),
        player_column: player.column(),
        player_row: player.row(),
        enemies: simulation.enemies().len(),
        attacks,
        draw_calls: canvas.draw_calls,
    })
}

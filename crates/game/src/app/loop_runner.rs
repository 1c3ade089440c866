use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use crewship_engine::Simulation;
use tracing::{debug, error, info, warn};

use super::bootstrap::AppWiring;
use super::metrics::MetricsAccumulator;
use super::scenario::Scenario;
use super::surface::{DrawSurface, TraceSurface};
use super::AppError;

#[derive(Debug, Clone)]
pub(crate) struct LoopConfig {
    pub(crate) target_tps: u32,
    pub(crate) total_ticks: u64,
    pub(crate) realtime: bool,
    pub(crate) max_frame_delta: Duration,
    pub(crate) max_ticks_per_frame: u32,
    pub(crate) metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            total_ticks: 600,
            realtime: false,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) sim_seconds: f64,
    pub(crate) frames: u64,
    pub(crate) crew: usize,
    pub(crate) presses: u32,
    pub(crate) spawned: u32,
    pub(crate) throws: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let simulation = match Simulation::from_layout(&app.scenario.layout) {
        Ok(simulation) => simulation,
        Err(err) => {
            error!(error = %AppError::from(err), "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    let mut surface = TraceSurface::new(simulation.config().room_height);
    match run_loop(&app.config, &app.scenario, simulation, &mut surface) {
        Ok(summary) => {
            info!(
                ticks = summary.ticks,
                sim_seconds = summary.sim_seconds,
                frames = summary.frames,
                crew = summary.crew,
                presses = summary.presses,
                spawned = summary.spawned,
                throws = summary.throws,
                recolor_cache_hits = surface.recolors().hits(),
                recolor_cache_misses = surface.recolors().misses(),
                recolor_cache_entries = surface.recolors().len(),
                last_frame_images = surface.last_frame().images,
                "shutdown"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "tick_failed");
            ExitCode::FAILURE
        }
    }
}

/// Drives `simulation` for `config.total_ticks` ticks with scripted player
/// input, presenting one draw list per frame.
pub(crate) fn run_loop<S: DrawSurface>(
    config: &LoopConfig,
    scenario: &Scenario,
    mut simulation: Simulation,
    surface: &mut S,
) -> Result<RunSummary, AppError> {
    let target_tps = config.target_tps.max(1);
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    info!(
        target_tps,
        total_ticks = config.total_ticks,
        scripted_ticks = scenario.last_scripted_tick(),
        realtime = config.realtime,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let mut summary = RunSummary::default();
    let mut metrics = MetricsAccumulator::new(metrics_log_interval, Instant::now());
    let mut accumulator = Duration::ZERO;
    let mut last_frame = Instant::now();

    while simulation.tick() < config.total_ticks {
        let frame_start = Instant::now();
        let ticks_to_run = if config.realtime {
            let frame_dt = frame_start
                .saturating_duration_since(last_frame)
                .min(max_frame_delta);
            accumulator = accumulator.saturating_add(frame_dt);
            let plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
            accumulator = plan.remaining_accumulator;
            if !plan.dropped_backlog.is_zero() {
                warn!(
                    dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                    max_ticks_per_frame, "sim_clamp_triggered"
                );
            }
            plan.ticks_to_run
        } else {
            1
        };
        last_frame = frame_start;

        for _ in 0..ticks_to_run {
            if simulation.tick() >= config.total_ticks {
                break;
            }
            let intent = scenario.intent_at(simulation.tick());
            let report = simulation.advance(fixed_dt_seconds, intent)?;
            metrics.record_tick();
            if report.pressed.is_some() {
                summary.presses += 1;
            }
            if report.thrown.is_some() {
                summary.throws += 1;
            }
            summary.spawned += report.spawned.len() as u32;
            if let Some(carried) = report.picked_up {
                debug!(tick = report.tick, carried = %carried, "scripted_pickup");
            }
        }

        let draw_start = Instant::now();
        let commands = simulation.draw_list()?;
        surface.present(&commands);
        summary.frames += 1;
        metrics.record_frame(draw_start.elapsed(), commands.len());

        if let Some(snapshot) = metrics.maybe_snapshot(Instant::now()) {
            info!(
                tps = snapshot.tps,
                fps = snapshot.fps,
                draw_time_ms = snapshot.draw_time_ms,
                draw_commands = snapshot.draw_commands_per_frame,
                tick = simulation.tick(),
                sim_seconds = simulation.elapsed(),
                crew = simulation.world().crew().len(),
                "loop_metrics"
            );
        }

        if config.realtime {
            let pause = fixed_dt.saturating_sub(frame_start.elapsed());
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
    }

    summary.ticks = simulation.tick();
    summary.sim_seconds = simulation.elapsed();
    summary.crew = simulation.world().crew().len();
    Ok(summary)
}

fn plan_sim_steps(mut accumulator: Duration, fixed_dt: Duration, max_ticks_per_frame: u32) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

//! Progression engine: the session driver.
//!
//! `ProgressionEngine` owns the active scheduler and the collaborator world,
//! processes session commands and world signals at tick boundaries, and
//! produces `ProgressionSnapshot`s. Headless and deterministic: time only
//! moves when `tick` is called.

use std::collections::VecDeque;

use barrage_core::commands::{SessionCommand, WorldSignal};
use barrage_core::constants::FIRST_LEVEL;
use barrage_core::enums::{SchedulerMode, SessionPhase};
use barrage_core::events::ProgressionEvent;
use barrage_core::state::ProgressionSnapshot;
use barrage_core::types::SimTime;

use crate::finite::FiniteScheduler;
use crate::infinite::InfiniteScheduler;
use crate::scenario::ScenarioConfig;
use crate::wave_source::WaveWorld;

#[derive(Debug, Clone)]
enum Scheduler {
    Finite(FiniteScheduler),
    Infinite(InfiniteScheduler),
}

/// Runs one scenario against one world.
pub struct ProgressionEngine<W: WaveWorld> {
    scenario: ScenarioConfig,
    world: W,
    time: SimTime,
    phase: SessionPhase,
    scheduler: Option<Scheduler>,
    command_queue: VecDeque<SessionCommand>,
    signal_queue: VecDeque<WorldSignal>,
    signal_buffer: Vec<WorldSignal>,
    events: Vec<ProgressionEvent>,
}

impl<W: WaveWorld> ProgressionEngine<W> {
    pub fn new(scenario: ScenarioConfig, world: W) -> Self {
        Self {
            scenario,
            world,
            time: SimTime::default(),
            phase: SessionPhase::default(),
            scheduler: None,
            command_queue: VecDeque::new(),
            signal_queue: VecDeque::new(),
            signal_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Queue a world notification. Delivered before the scheduler advances
    /// on the next active tick.
    pub fn queue_signal(&mut self, signal: WorldSignal) {
        self.signal_queue.push_back(signal);
    }

    /// Advance the session by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> ProgressionSnapshot {
        self.process_commands();

        if self.phase == SessionPhase::Active {
            self.run_scheduler();
            if self.scheduler_finished() {
                tracing::info!(
                    target: "barrage::engine",
                    tick = self.time.tick,
                    "session complete"
                );
                self.phase = SessionPhase::Complete;
            }
            self.time.advance();
        }

        self.build_snapshot()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn mode(&self) -> SchedulerMode {
        self.scenario.mode
    }

    pub fn scenario(&self) -> &ScenarioConfig {
        &self.scenario
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable world access for the game loop (kills, escapes). Signals the
    /// world raises are picked up on the next active tick.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Current level; 0 before the first session starts.
    pub fn level(&self) -> i32 {
        match &self.scheduler {
            Some(Scheduler::Infinite(scheduler)) => scheduler.level(),
            Some(Scheduler::Finite(_)) => FIRST_LEVEL,
            None => 0,
        }
    }

    pub fn enemies_spawned(&self) -> u64 {
        match &self.scheduler {
            Some(Scheduler::Infinite(scheduler)) => scheduler.enemies_spawned(),
            Some(Scheduler::Finite(scheduler)) => scheduler.enemies_spawned(),
            None => 0,
        }
    }

    pub fn infinite(&self) -> Option<&InfiniteScheduler> {
        match &self.scheduler {
            Some(Scheduler::Infinite(scheduler)) => Some(scheduler),
            _ => None,
        }
    }

    pub fn finite(&self) -> Option<&FiniteScheduler> {
        match &self.scheduler {
            Some(Scheduler::Finite(scheduler)) => Some(scheduler),
            _ => None,
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::StartSession => {
                if matches!(
                    self.phase,
                    SessionPhase::Idle | SessionPhase::Complete | SessionPhase::Aborted
                ) {
                    self.start_session();
                }
            }
            SessionCommand::Pause => {
                if self.phase == SessionPhase::Active {
                    self.phase = SessionPhase::Paused;
                }
            }
            SessionCommand::Resume => {
                if self.phase == SessionPhase::Paused {
                    self.phase = SessionPhase::Active;
                }
            }
            SessionCommand::EndSession => {
                if matches!(self.phase, SessionPhase::Active | SessionPhase::Paused) {
                    self.end_session();
                }
            }
        }
    }

    fn start_session(&mut self) {
        let scheduler = match self.scenario.mode {
            SchedulerMode::Finite => Scheduler::Finite(self.scenario.build_finite()),
            SchedulerMode::Infinite => Scheduler::Infinite(self.scenario.build_infinite()),
        };
        tracing::info!(
            target: "barrage::engine",
            scenario = %self.scenario.name,
            mode = ?self.scenario.mode,
            "session started"
        );

        // Notifications about a previous session's waves mean nothing now.
        self.signal_queue.clear();
        self.signal_buffer.clear();
        self.world.drain_signals(&mut self.signal_buffer);
        self.signal_buffer.clear();

        self.scheduler = Some(scheduler);
        self.time = SimTime::default();
        self.phase = SessionPhase::Active;
    }

    fn end_session(&mut self) {
        match &mut self.scheduler {
            Some(Scheduler::Infinite(scheduler)) => scheduler.abort(),
            Some(Scheduler::Finite(scheduler)) => scheduler.abort(),
            None => {}
        }
        self.signal_queue.clear();
        tracing::info!(
            target: "barrage::engine",
            level = self.level(),
            tick = self.time.tick,
            "session ended early"
        );
        self.phase = SessionPhase::Aborted;
    }

    fn run_scheduler(&mut self) {
        self.world.drain_signals(&mut self.signal_buffer);
        self.signal_queue.extend(self.signal_buffer.drain(..));

        let Some(scheduler) = self.scheduler.as_mut() else {
            tracing::error!(target: "barrage::engine", "active session without a scheduler");
            return;
        };

        while let Some(signal) = self.signal_queue.pop_front() {
            match scheduler {
                Scheduler::Infinite(infinite) => {
                    infinite.handle_signal(signal, &mut self.world, &mut self.events)
                }
                Scheduler::Finite(finite) => finite.handle_signal(signal),
            }
        }

        match scheduler {
            Scheduler::Infinite(infinite) => {
                infinite.tick(self.time, &mut self.world, &mut self.events)
            }
            Scheduler::Finite(finite) => finite.tick(self.time, &mut self.world, &mut self.events),
        }
    }

    fn scheduler_finished(&self) -> bool {
        match &self.scheduler {
            Some(Scheduler::Infinite(scheduler)) => scheduler.is_finished(),
            Some(Scheduler::Finite(scheduler)) => scheduler.is_finished(),
            None => false,
        }
    }

    fn build_snapshot(&mut self) -> ProgressionSnapshot {
        let (live_waves, streams, mission_cursor) = match &self.scheduler {
            Some(Scheduler::Infinite(scheduler)) => {
                (scheduler.live_waves(), scheduler.stream_views(), None)
            }
            Some(Scheduler::Finite(scheduler)) => {
                (scheduler.live_waves(), Vec::new(), Some(scheduler.cursor()))
            }
            None => (0, Vec::new(), None),
        };
        ProgressionSnapshot {
            time: self.time,
            phase: self.phase,
            mode: self.scenario.mode,
            level: self.level(),
            enemies_spawned: self.enemies_spawned(),
            live_waves,
            streams,
            mission_cursor,
            events: std::mem::take(&mut self.events),
        }
    }
}

//! Dual-latch level-clear detection.
//!
//! A level is clear once every wave source is gone AND the enemy agent
//! population is empty. The two notifications arrive independently and in
//! any order; each sets its own latch.

/// Level-clear latch pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelClearDetector {
    waves_clear: bool,
    agents_clear: bool,
    subscribed: bool,
    fired: bool,
}

impl LevelClearDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of a new level: both latches down, no subscription.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Raise latches whose condition already holds. Used when subscribing
    /// after the fact, e.g. a level that spawned nothing.
    pub fn prime(&mut self, waves_clear: bool, agents_clear: bool) {
        self.waves_clear |= waves_clear;
        self.agents_clear |= agents_clear;
    }

    /// Begin listening. Returns `true` if primed latches already complete
    /// the level.
    pub fn subscribe(&mut self) -> bool {
        self.subscribed = true;
        self.try_fire()
    }

    /// Stop listening. Idempotent.
    pub fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// "All wave sources destroyed". Returns `true` on the completing
    /// transition only.
    pub fn on_waves_empty(&mut self) -> bool {
        if !self.subscribed {
            return false;
        }
        self.waves_clear = true;
        self.try_fire()
    }

    /// "All enemy agents gone". Returns `true` on the completing transition
    /// only.
    pub fn on_agents_empty(&mut self) -> bool {
        if !self.subscribed {
            return false;
        }
        self.agents_clear = true;
        self.try_fire()
    }

    pub fn waves_clear(&self) -> bool {
        self.waves_clear
    }

    pub fn agents_clear(&self) -> bool {
        self.agents_clear
    }

    pub fn is_level_clear(&self) -> bool {
        self.waves_clear && self.agents_clear
    }

    /// Whether level-complete has been signalled since the last reset.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    fn try_fire(&mut self) -> bool {
        if self.fired || !self.is_level_clear() {
            return false;
        }
        self.fired = true;
        true
    }
}

use rand::Rng;

use super::DriverConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Closing,
    Opening,
}

/// Autonomous blink timer. `value` is the blink amount, 0 = open and
/// 1 = fully closed; the closing/opening speed is a rate in units per
/// second, not a fixed-duration tween, so a full blink takes about 0.27 s.
#[derive(Debug, Clone)]
pub struct BlinkState {
    value: f32,
    phase: Phase,
    next_blink_in: f32,
}

impl BlinkState {
    pub fn new(first_delay: f32) -> Self {
        Self {
            value: 0.0,
            phase: Phase::Waiting,
            next_blink_in: first_delay,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn next_blink_in(&self) -> f32 {
        self.next_blink_in
    }

    pub fn tick(&mut self, delta: f32, rng: &mut impl Rng, config: &DriverConfig) {
        let delta = delta.max(0.0);
        match self.phase {
            Phase::Waiting => {
                self.next_blink_in -= delta;
                if self.next_blink_in <= 0.0 {
                    self.phase = Phase::Closing;
                    self.next_blink_in =
                        rng.gen_range(config.blink_interval_min..config.blink_interval_max);
                }
            }
            Phase::Closing => {
                self.value += delta * config.blink_rate;
                if self.value >= 1.0 {
                    self.value = 1.0;
                    self.phase = Phase::Opening;
                }
            }
            Phase::Opening => {
                self.value -= delta * config.blink_rate;
                if self.value <= 0.0 {
                    self.value = 0.0;
                    self.phase = Phase::Waiting;
                    if config.reset_on_interrupt {
                        self.next_blink_in =
                            rng.gen_range(config.blink_interval_min..config.blink_interval_max);
                    }
                }
            }
        }
    }
}

//! Client-side progress animation shown while `/analyze` is outstanding.
//!
//! The server does not stream progress, so the simulator fabricates a
//! plausible advance bounded by the pre-analysis method count. It owns its
//! state; the periodic timer driving [`ProgressSimulator::tick`] belongs to
//! the caller, which must release it whenever a tick reports
//! [`TickOutcome::Finished`] or the simulation is cancelled.

use std::time::Duration;

const METHOD_NAMES: &[&str] = &[
    "validateCnpj",
    "formatCnpj",
    "extractCnpj",
    "checkCnpj",
    "saveCnpj",
    "findByCnpj",
    "convertCnpj",
    "loadCnpj",
    "analyzeCnpj",
    "queryCnpj",
    "sendCnpj",
    "processCnpj",
    "validateCnpjFormat",
    "unformatCnpj",
    "displayCnpj",
    "filterCnpj",
];

const CLASS_NAMES: &[&str] = &[
    "Customer",
    "Company",
    "Registry",
    "Tax",
    "Document",
    "Record",
    "Person",
    "Supplier",
    "Issuer",
    "Receiver",
    "Taxpayer",
    "Service",
];

pub const STARTING_LABEL: &str = "Starting analysis...";
pub const COMPLETED_LABEL: &str = "Analysis complete! Generating report...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Period of the external timer.
    pub tick_interval: Duration,
    /// How long the animation should take to reach the total.
    pub target_duration: Duration,
    /// Total used when the pre-analysis reports no methods.
    pub fallback_total: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(300),
            target_duration: Duration::from_secs(25),
            fallback_total: 50,
        }
    }
}

impl SimulatorConfig {
    /// Units added per tick so that `total` is reached in roughly
    /// `target_duration`. Never less than one.
    pub fn step_for(&self, total: u64) -> u64 {
        let interval = self.tick_interval.as_millis().max(1);
        let ticks = (self.target_duration.as_millis() / interval).max(1) as u64;
        total.div_ceil(ticks).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimPhase {
    #[default]
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub processed: u64,
    pub total: u64,
    pub label: String,
}

impl ProgressState {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let done = u128::from(self.processed.min(self.total));
        let total = u128::from(self.total);
        let pct = (done * 100 + total / 2) / total;
        pct.min(100) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStart {
    /// Ticking has begun; the owner must schedule the periodic timer.
    Running { step: u64 },
    /// Nothing to animate; progress is reported complete at once.
    Indeterminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    /// The total was reached; the owner must release its timer.
    Finished,
    /// The simulator was not running.
    Ignored,
}

/// Seedable xorshift source for the cosmetic labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPicker {
    state: u64,
}

impl LabelPicker {
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves zero
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn pick<'a>(&mut self, vocabulary: &[&'a str]) -> &'a str {
        let index = (self.next_u64() % vocabulary.len() as u64) as usize;
        vocabulary[index]
    }

    /// A `Class.method()` label.
    pub fn method_label(&mut self) -> String {
        let method = self.pick(METHOD_NAMES);
        let class = self.pick(CLASS_NAMES);
        format!("{class}.{method}()")
    }
}

impl Default for LabelPicker {
    fn default() -> Self {
        Self::new(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSimulator {
    config: SimulatorConfig,
    phase: SimPhase,
    state: ProgressState,
    step: u64,
    ticks: u64,
    labels: LabelPicker,
}

impl ProgressSimulator {
    pub fn new(config: SimulatorConfig, labels: LabelPicker) -> Self {
        Self {
            config,
            labels,
            ..Self::default()
        }
    }

    pub fn config(&self) -> SimulatorConfig {
        self.config
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    /// Ticks applied since the last `start`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Resets the counters and begins a new simulation over `total` units.
    /// Any simulation already running is replaced.
    pub fn start(&mut self, total: i64) -> SimulationStart {
        self.ticks = 0;
        if total <= 0 {
            self.phase = SimPhase::Completed;
            self.step = 0;
            self.state = ProgressState {
                processed: 0,
                total: 0,
                label: COMPLETED_LABEL.to_string(),
            };
            return SimulationStart::Indeterminate;
        }

        let total = total as u64;
        self.step = self.config.step_for(total);
        self.phase = SimPhase::Running;
        self.state = ProgressState {
            processed: 0,
            total,
            label: STARTING_LABEL.to_string(),
        };
        SimulationStart::Running { step: self.step }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SimPhase::Running {
            return TickOutcome::Ignored;
        }
        self.ticks += 1;

        let remaining = self.state.total - self.state.processed;
        self.state.processed += self.step.min(remaining);
        self.state.label = self.labels.method_label();

        if self.state.processed >= self.state.total {
            self.state.processed = self.state.total;
            self.state.label = COMPLETED_LABEL.to_string();
            self.phase = SimPhase::Completed;
            return TickOutcome::Finished;
        }
        TickOutcome::Advanced
    }

    /// Stops the simulation regardless of how far it got.
    pub fn cancel(&mut self) {
        self.phase = SimPhase::Idle;
        self.step = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_spreads_total_over_target_duration() {
        let config = SimulatorConfig::default();
        // 25s / 300ms = 83 ticks
        assert_eq!(config.step_for(83), 1);
        assert_eq!(config.step_for(84), 2);
        assert_eq!(config.step_for(1), 1);
        assert_eq!(config.step_for(1000), 13);
    }

    #[test]
    fn labels_are_deterministic_for_a_seed() {
        let mut a = LabelPicker::new(42);
        let mut b = LabelPicker::new(42);
        for _ in 0..10 {
            assert_eq!(a.method_label(), b.method_label());
        }
    }

    #[test]
    fn percent_rounds_and_handles_empty_total() {
        let state = ProgressState {
            processed: 1,
            total: 3,
            label: String::new(),
        };
        assert_eq!(state.percent(), 33);
        assert_eq!(ProgressState::default().percent(), 100);
    }
}

//! # Run Configuration and Halt State
//!
//! Everything the run loop needs that is not architectural CPU state: the
//! configuration, the Ready/Running/Halted state machine, stuck-PC detection
//! and the diagnostic observations (last address read, last trace line).
//! Keeping these apart from [`Registers`](crate::Registers) leaves the
//! register model a plain value.

use crate::trace::TraceLine;
use crate::ExecutionError;

/// Number of consecutive repeated fetches of one PC that is still tolerated.
/// One more and the CPU halts as stuck.
pub const STUCK_THRESHOLD: u32 = 5;

/// Run loop configuration, fixed when the CPU is built.
///
/// # Examples
///
/// ```
/// use emu6502::Config;
///
/// let config = Config::default()
///     .with_budget(1000)
///     .with_test_mode(true);
///
/// assert_eq!(config.instruction_budget, 1000);
/// assert!(config.test_mode);
/// assert!(!config.detect_stuck);
/// assert!(!config.trace);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of instructions per `run()` call; 0 means unbounded.
    pub instruction_budget: u64,

    /// Treat opcode 0xFF as the end of a test and running out of budget as
    /// a failure.
    pub test_mode: bool,

    /// Halt when the PC does not move for more than [`STUCK_THRESHOLD`]
    /// consecutive fetches.
    pub detect_stuck: bool,

    /// Record a [`TraceLine`] for every executed instruction.
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instruction_budget: 0,
            test_mode: false,
            detect_stuck: false,
            trace: false,
        }
    }
}

impl Config {
    /// Sets the instruction budget (0 = unbounded).
    pub fn with_budget(mut self, instruction_budget: u64) -> Self {
        self.instruction_budget = instruction_budget;
        self
    }

    /// Enables or disables test mode.
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Enables or disables stuck-PC detection.
    pub fn with_stuck_detection(mut self, detect_stuck: bool) -> Self {
        self.detect_stuck = detect_stuck;
        self
    }

    /// Enables or disables per-instruction tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Why the CPU stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The test sentinel opcode was fetched in test mode.
    TestComplete,

    /// The instruction budget ran out outside test mode.
    BudgetReached,

    /// Execution failed.
    Failed(ExecutionError),
}

impl Halt {
    /// Returns true for the halts that are not errors.
    pub fn is_clean(&self) -> bool {
        !matches!(self, Halt::Failed(_))
    }

    /// Converts the halt into the result `run()` would report for it.
    pub fn into_result(self) -> Result<Halt, ExecutionError> {
        match self {
            Halt::Failed(err) => Err(err),
            clean => Ok(clean),
        }
    }
}

impl std::fmt::Display for Halt {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Halt::TestComplete => write!(f, "test complete"),
            Halt::BudgetReached => write!(f, "instruction budget reached"),
            Halt::Failed(err) => write!(f, "{}", err),
        }
    }
}

/// Run loop state. `Halted` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, nothing executed yet.
    Ready,

    /// At least one step has been taken.
    Running,

    /// Stopped for good.
    Halted(Halt),
}

impl RunState {
    /// The halt reason, if halted.
    pub fn halt(&self) -> Option<&Halt> {
        match self {
            RunState::Halted(halt) => Some(halt),
            _ => None,
        }
    }
}

/// Tracks how many consecutive fetches have seen the same PC.
#[derive(Debug, Clone, Default)]
pub(crate) struct StuckDetector {
    last_pc: Option<u16>,
    repeats: u32,
}

impl StuckDetector {
    /// Records a fetch at `pc`; returns true once the PC has repeated more
    /// than [`STUCK_THRESHOLD`] times in a row.
    pub(crate) fn observe(&mut self, pc: u16) -> bool {
        if self.last_pc == Some(pc) {
            self.repeats += 1;
        } else {
            self.repeats = 0;
            self.last_pc = Some(pc);
        }

        self.repeats > STUCK_THRESHOLD
    }
}

/// Diagnostic and control state owned by the CPU.
#[derive(Debug, Clone)]
pub(crate) struct Engine {
    pub(crate) config: Config,
    pub(crate) state: RunState,
    pub(crate) stuck: StuckDetector,
    pub(crate) last_read: u16,
    pub(crate) last_trace: Option<TraceLine>,
}

impl Engine {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            state: RunState::Ready,
            stuck: StuckDetector::default(),
            last_read: 0,
            last_trace: None,
        }
    }
}

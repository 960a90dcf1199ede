//! Cascade policy
//!
//! The cascade mode decides whether a rule keeps evaluating its remaining
//! validator units after one fails. A rule never stores a resolved mode: it
//! stores *where to read it from* and resolves at evaluation time, so a
//! shared default can change after declaration and already-declared rules
//! pick the new mode up on their next run.

use std::sync::Arc;

use parking_lot::RwLock;

// ============================================================================
// CASCADE MODE
// ============================================================================

/// Behavior of a rule after a validator unit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeMode {
    /// Keep evaluating the remaining units; collect every failure.
    #[default]
    Continue,
    /// Stop at the first failure; remaining units are not evaluated.
    StopOnFirstFailure,
}

// ============================================================================
// CASCADE CELL
// ============================================================================

/// A shared configuration cell rules read their effective cascade mode
/// through.
///
/// One process-wide cell backs the default; callers can also create their own
/// and hand it to a subset of rules via
/// [`Rule::cascade_cell`](crate::rule::Rule::cascade_cell).
#[derive(Debug)]
pub struct CascadeCell {
    mode: RwLock<CascadeMode>,
}

impl CascadeCell {
    /// Creates a cell holding `mode`.
    #[must_use]
    pub const fn new(mode: CascadeMode) -> Self {
        Self {
            mode: RwLock::new(mode),
        }
    }

    /// Reads the current mode.
    #[must_use]
    pub fn get(&self) -> CascadeMode {
        *self.mode.read()
    }

    /// Replaces the mode. Rules resolving through this cell observe the new
    /// value on their next run.
    pub fn set(&self, mode: CascadeMode) {
        *self.mode.write() = mode;
    }
}

impl Default for CascadeCell {
    fn default() -> Self {
        Self::new(CascadeMode::Continue)
    }
}

static PROCESS_DEFAULT: CascadeCell = CascadeCell::new(CascadeMode::Continue);

/// The process-wide default cascade cell.
///
/// Rules declared without an explicit mode resolve through this cell. It is
/// ordinarily configured once at startup, before any validation runs.
#[must_use]
pub fn process_default_cascade() -> &'static CascadeCell {
    &PROCESS_DEFAULT
}

// ============================================================================
// CASCADE SOURCE
// ============================================================================

/// Where a rule reads its effective cascade mode from.
#[derive(Debug, Clone, Default)]
pub enum Cascade {
    /// Read through the process-wide default cell.
    #[default]
    Default,
    /// A fixed per-rule override.
    Fixed(CascadeMode),
    /// Read through a caller-owned cell.
    Cell(Arc<CascadeCell>),
}

impl Cascade {
    /// Resolves the effective mode for one rule invocation.
    #[must_use]
    pub fn resolve(&self) -> CascadeMode {
        match self {
            Cascade::Default => PROCESS_DEFAULT.get(),
            Cascade::Fixed(mode) => *mode,
            Cascade::Cell(cell) => cell.get(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

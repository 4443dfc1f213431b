//! Alert lifecycle state machine.
//!
//! Each monitored condition category is an [`AlertKind`]. The internal
//! [`AlertState`] tracks three flags per kind in fixed-size vectors indexed
//! by the kind's ordinal:
//!
//! ```text
//! ┌───────────┬─────────┬──────────────────┬───────────────────┐
//! │ kind       │ active  │ raised           │ cleared           │
//! ├───────────┼─────────┼──────────────────┼───────────────────┤
//! │ OverTemp   │ persists│ cycle-scoped edge│ cycle-scoped edge │
//! │ OverHum    │ persists│ cycle-scoped edge│ cycle-scoped edge │
//! └───────────┴─────────┴──────────────────┴───────────────────┘
//! ```
//!
//! `active` persists across evaluation cycles; `raised` and `cleared` mark
//! the transition into/out of active within the current cycle only and are
//! recomputed at the start of every cycle via [`AlertState::begin_cycle`].
//!
//! External serialization ([`AlertStatus`]) uses kind *names*, never
//! ordinals, so new kinds can be appended without breaking stored payloads.
//! Ordinals must stay stable for the same reason: append, never renumber.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Alert kinds
// ---------------------------------------------------------------------------

/// Enumeration of all monitored condition categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlertKind {
    /// Temperature above the configured maximum.
    OverTemp = 0,
    /// Humidity above the configured maximum.
    OverHum = 1,
}

impl AlertKind {
    /// Total number of kinds — sizes the flag vectors.
    pub const COUNT: usize = 2;

    /// All kinds in enumeration order.
    pub const ALL: [AlertKind; Self::COUNT] = [Self::OverTemp, Self::OverHum];

    /// External, case-sensitive name used in serialized alert-status lists.
    pub const fn name(self) -> &'static str {
        match self {
            Self::OverTemp => "OVERTEMP",
            Self::OverHum => "OVERHUM",
        }
    }

    /// Parse an external name. Unknown names are a consumer error.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "OVERTEMP" => Ok(Self::OverTemp),
            "OVERHUM" => Ok(Self::OverHum),
            other => Err(Error::UnknownAlertKind(other.to_string())),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// External representation
// ---------------------------------------------------------------------------

/// Sparse, name-based alert status as stored/transmitted by the shell.
///
/// Each list holds the names of the kinds whose corresponding flag is true.
/// Order is irrelevant on input; output is in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStatus {
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default)]
    pub raised: Vec<String>,
    #[serde(default)]
    pub cleared: Vec<String>,
}

// ---------------------------------------------------------------------------
// Internal representation
// ---------------------------------------------------------------------------

/// Tri-flag alert state, one slot per [`AlertKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    active: [bool; AlertKind::COUNT],
    raised: [bool; AlertKind::COUNT],
    cleared: [bool; AlertKind::COUNT],
}

impl AlertState {
    /// Build the internal state from an external status payload.
    ///
    /// Any name outside the enumeration fails with
    /// [`Error::UnknownAlertKind`].
    pub fn from_status(status: &AlertStatus) -> Result<Self> {
        let mut state = Self::default();
        for name in &status.active {
            state.active[AlertKind::from_name(name)?.index()] = true;
        }
        for name in &status.raised {
            state.raised[AlertKind::from_name(name)?.index()] = true;
        }
        for name in &status.cleared {
            state.cleared[AlertKind::from_name(name)?.index()] = true;
        }
        Ok(state)
    }

    /// Emit the external status: the name of every kind whose flag is true,
    /// in enumeration order.
    pub fn to_status(&self) -> AlertStatus {
        let mut status = AlertStatus::default();
        for kind in AlertKind::ALL {
            let i = kind.index();
            if self.active[i] {
                status.active.push(kind.name().to_string());
            }
            if self.raised[i] {
                status.raised.push(kind.name().to_string());
            }
            if self.cleared[i] {
                status.cleared.push(kind.name().to_string());
            }
        }
        status
    }

    /// Reset the stale transient marker for each kind at the start of a
    /// cycle.
    ///
    /// The reset is asymmetric and must stay that way: a kind confirmed
    /// active drops only its stale `raised` marker (the alert is not a new
    /// raise event any more), and a kind confirmed inactive drops only its
    /// stale `cleared` marker. The *other* transient flag is left untouched
    /// here — it is only ever rewritten by [`raise`](Self::raise) /
    /// [`clear`](Self::clear).
    pub fn begin_cycle(&mut self) {
        for kind in AlertKind::ALL {
            let i = kind.index();
            if self.active[i] {
                self.raised[i] = false;
            } else {
                self.cleared[i] = false;
            }
        }
    }

    /// Put `kind` into breach.
    ///
    /// An already-active kind is not a new raise event: both transient flags
    /// are forced false and `active` stays set. A genuine transition into
    /// alert sets `active` and marks `raised` for this cycle.
    pub fn raise(&mut self, kind: AlertKind) {
        let i = kind.index();
        if self.active[i] {
            self.raised[i] = false;
            self.cleared[i] = false;
        } else {
            info!("ALERT | {kind} raised");
            self.active[i] = true;
            self.raised[i] = true;
            self.cleared[i] = false;
        }
    }

    /// Take `kind` out of breach.
    ///
    /// Clearing an already-inactive kind is a pure no-op on the outcome: all
    /// three flags end up false. A genuine transition out of alert marks
    /// `cleared` for this cycle.
    pub fn clear(&mut self, kind: AlertKind) {
        let i = kind.index();
        if self.active[i] {
            info!("ALERT | {kind} cleared");
            self.active[i] = false;
            self.raised[i] = false;
            self.cleared[i] = true;
        } else {
            self.active[i] = false;
            self.raised[i] = false;
            self.cleared[i] = false;
        }
    }

    /// Whether `kind` is currently in breach.
    pub fn is_active(&self, kind: AlertKind) -> bool {
        self.active[kind.index()]
    }

    /// Whether `kind` transitioned into breach this cycle.
    pub fn was_raised(&self, kind: AlertKind) -> bool {
        self.raised[kind.index()]
    }

    /// Whether `kind` transitioned out of breach this cycle.
    pub fn was_cleared(&self, kind: AlertKind) -> bool {
        self.cleared[kind.index()]
    }

    /// True iff no kind is currently in breach. The compliance verdict is
    /// the complement of this.
    pub fn no_alerts_active(&self) -> bool {
        self.active.iter().all(|&a| !a)
    }

    /// True iff every flag in all three vectors is false.
    pub fn all_clear(&self) -> bool {
        self.no_alerts_active()
            && self.raised.iter().all(|&r| !r)
            && self.cleared.iter().all(|&c| !c)
    }
}

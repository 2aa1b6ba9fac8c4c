//! Deferred effects on the logical clock.

use std::time::Duration;

use hex_cascade_core::{ActivationKind, HexCoord};

/// Bomb detonation or wildcard resolution waiting for its deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Activation {
    cell: HexCoord,
    kind: ActivationKind,
    due: Duration,
    sequence: u64,
}

impl Activation {
    /// Cell the block was dropped on.
    #[must_use]
    pub const fn cell(&self) -> HexCoord {
        self.cell
    }

    /// Effect that runs at the deadline.
    #[must_use]
    pub const fn kind(&self) -> ActivationKind {
        self.kind
    }

    /// Logical time at which the effect runs.
    #[must_use]
    pub const fn due(&self) -> Duration {
        self.due
    }

    fn order_key(&self) -> (Duration, u64) {
        (self.due, self.sequence)
    }
}

/// Next effect to run within a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Due {
    Purge(Duration),
    Activation(Activation),
}

#[derive(Debug, Default)]
pub(crate) struct Schedule {
    activations: Vec<Activation>,
    next_sequence: u64,
    purge_deadline: Option<Duration>,
}

impl Schedule {
    pub(crate) fn queue(&mut self, cell: HexCoord, kind: ActivationKind, due: Duration) {
        let activation = Activation {
            cell,
            kind,
            due,
            sequence: self.next_sequence,
        };
        self.next_sequence = self.next_sequence.wrapping_add(1);
        log::trace!("queued {kind:?} at {cell:?} for {due:?}");
        self.activations.push(activation);
    }

    /// Re-arms the single purge timer.
    pub(crate) fn arm_purge(&mut self, deadline: Duration) {
        log::trace!("purge deadline moved to {deadline:?}");
        self.purge_deadline = Some(deadline);
    }

    pub(crate) fn disarm_purge(&mut self) {
        self.purge_deadline = None;
    }

    pub(crate) fn purge_deadline(&self) -> Option<Duration> {
        self.purge_deadline
    }

    /// Activations in execution order.
    pub(crate) fn pending(&self) -> Vec<Activation> {
        let mut pending = self.activations.clone();
        pending.sort_by_key(Activation::order_key);
        pending
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.activations.is_empty() && self.purge_deadline.is_none()
    }

    /// Removes and returns the earliest effect due no later than `horizon`.
    ///
    /// A purge wins ties against activations.
    pub(crate) fn pop_due(&mut self, horizon: Duration) -> Option<Due> {
        let activation = self
            .activations
            .iter()
            .enumerate()
            .filter(|(_, activation)| activation.due <= horizon)
            .min_by_key(|(_, activation)| activation.order_key())
            .map(|(index, activation)| (index, activation.due));

        match (self.purge_deadline.filter(|due| *due <= horizon), activation) {
            (Some(purge), Some((_, due))) if purge <= due => {
                self.purge_deadline = None;
                Some(Due::Purge(purge))
            }
            (Some(purge), None) => {
                self.purge_deadline = None;
                Some(Due::Purge(purge))
            }
            (_, Some((index, _))) => Some(Due::Activation(self.activations.remove(index))),
            (None, None) => None,
        }
    }
}

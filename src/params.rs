//! Wait-free parameter exchange between the UI and audio threads.

use crate::lockfree::AtomicFloat;

/// Plugin parameter identities.
///
/// The set is fixed at compile time; a parameter always has a current value
/// and is never "missing". Values are conventionally normalized to `[0, 1]`;
/// range handling belongs to the DSP layer, not this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Saturation drive amount.
    Fatness,
    /// Output gain.
    Output,
}

impl Param {
    pub const COUNT: usize = 2;

    pub const ALL: [Param; Param::COUNT] = [Param::Fatness, Param::Output];

    /// Display name for the host/UI layer.
    pub fn name(self) -> &'static str {
        match self {
            Param::Fatness => "Fatness",
            Param::Output => "Output",
        }
    }

    /// Stable identifier for automation mapping.
    pub fn symbol(self) -> &'static str {
        match self {
            Param::Fatness => "fatness",
            Param::Output => "output",
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            Param::Fatness => 0.0,
            Param::Output => 1.0,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// One atomic cell per parameter; UI writes, audio reads.
///
/// `get` and `set` are wait-free and never tear. Cells are independent:
/// last write wins per cell, with no cross-cell transactionality.
pub struct ParameterChannel {
    cells: [AtomicFloat; Param::COUNT],
}

impl ParameterChannel {
    pub fn new() -> Self {
        Self {
            cells: Param::ALL.map(|p| AtomicFloat::new(p.default_value())),
        }
    }

    /// Current value. Audio thread reachable; wait-free.
    #[inline]
    pub fn get(&self, param: Param) -> f32 {
        self.cells[param.index()].get()
    }

    /// Overwrite the cell. UI/automation thread; wait-free.
    #[inline]
    pub fn set(&self, param: Param, value: f32) {
        self.cells[param.index()].set(value);
    }

    /// Restore every parameter to its default.
    pub fn reset(&self) {
        for param in Param::ALL {
            self.set(param, param.default_value());
        }
    }
}

impl Default for ParameterChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ParameterChannel::new();
        assert_eq!(params.get(Param::Fatness), 0.0);
        assert_eq!(params.get(Param::Output), 1.0);
    }

    #[test]
    fn test_set_then_get_exact() {
        let params = ParameterChannel::new();
        params.set(Param::Fatness, 0.73);
        assert_eq!(params.get(Param::Fatness), 0.73);
    }

    #[test]
    fn test_cells_independent() {
        let params = ParameterChannel::new();
        params.set(Param::Fatness, 0.25);
        assert_eq!(params.get(Param::Output), 1.0);
        params.set(Param::Output, 0.5);
        assert_eq!(params.get(Param::Fatness), 0.25);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let params = ParameterChannel::new();
        params.set(Param::Fatness, 0.9);
        params.set(Param::Output, 0.1);
        params.reset();
        assert_eq!(params.get(Param::Fatness), 0.0);
        assert_eq!(params.get(Param::Output), 1.0);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(Param::Fatness.symbol(), "fatness");
        assert_eq!(Param::Output.name(), "Output");
        assert_eq!(Param::ALL.len(), Param::COUNT);
    }
}

//! Split-screen slots, player slots and command targets

/// Split-screen slot selecting which per-user value to touch
///
/// Slot `-1` means "the default slot" and resolves to slot 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitScreenSlot(pub i32);

impl SplitScreenSlot {
    /// The default slot (-1)
    pub const DEFAULT: Self = Self(-1);
    /// The first split-screen slot
    pub const FIRST: Self = Self(0);

    /// Create a slot
    pub const fn new(slot: i32) -> Self {
        Self(slot)
    }

    /// Raw slot number
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Slot index into a value array, `None` for negative slots other than -1
    pub fn resolve(self) -> Option<usize> {
        match self.0 {
            -1 => Some(0),
            n => usize::try_from(n).ok(),
        }
    }
}

impl Default for SplitScreenSlot {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for SplitScreenSlot {
    fn from(slot: i32) -> Self {
        Self(slot)
    }
}

/// Player slot of a command invoker (-1 for the server console)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerSlot(pub i32);

impl PlayerSlot {
    /// The server itself
    pub const SERVER: Self = Self(-1);

    /// Raw slot number
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns true for the server console
    pub fn is_server(self) -> bool {
        self.0 < 0
    }
}

impl Default for PlayerSlot {
    fn default() -> Self {
        Self::SERVER
    }
}

/// Where a command invocation is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandTarget(pub i32);

impl CommandTarget {
    /// No particular target
    pub const NO_TARGET: Self = Self(-1);
    /// First split-screen client
    pub const FIRST_SPLITSCREEN_CLIENT: Self = Self(0);
    /// Last split-screen client
    pub const LAST_SPLITSCREEN_CLIENT: Self = Self(3);

    /// Raw target value
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for CommandTarget {
    fn default() -> Self {
        Self::NO_TARGET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_resolution() {
        assert_eq!(SplitScreenSlot::DEFAULT.resolve(), Some(0));
        assert_eq!(SplitScreenSlot::new(0).resolve(), Some(0));
        assert_eq!(SplitScreenSlot::new(3).resolve(), Some(3));
        assert_eq!(SplitScreenSlot::new(-2).resolve(), None);
    }

    #[test]
    fn test_player_slot_server() {
        assert!(PlayerSlot::default().is_server());
        assert!(!PlayerSlot(2).is_server());
    }
}

//! Stable handles for blocks and connections.
//!
//! A handle is a slot index plus the generation the storage was in when the
//! handle was issued. A removed element's slot is never refilled, and clearing
//! a register moves it to a new generation, so old handles stop resolving
//! instead of silently pointing at a newer element. Surviving handles are
//! never renumbered.

use std::fmt;

macro_rules! slot_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl $name {
            /// Creates a handle from a raw slot index and generation.
            pub const fn new(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            /// Returns the slot index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.index
            }

            /// Returns the slot generation this handle was issued for.
            #[inline]
            pub const fn generation(self) -> u32 {
                self.generation
            }
        }

        impl From<(u32, u32)> for $name {
            fn from((index, generation): (u32, u32)) -> Self {
                Self::new(index, generation)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.generation == 0 {
                    write!(f, "#{}", self.index)
                } else {
                    write!(f, "#{}v{}", self.index, self.generation)
                }
            }
        }
    };
}

slot_handle!(
    /// Handle to a block in a [`crate::Register`].
    BlockId
);

slot_handle!(
    /// Handle to a connection in a [`crate::Register`].
    ConnectionId
);

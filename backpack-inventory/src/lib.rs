use backpack_item::ItemStack;
use num_derive::{FromPrimitive, ToPrimitive};

pub mod attachment;
pub mod backpack;
pub mod error;
pub mod player;
pub mod screen_handler;
pub mod transfer;

pub use attachment::AttachmentRegistry;
pub use backpack::{BackpackInventory, BACKPACK_SLOTS};
pub use error::InventoryError;
pub use player::PlayerInventory;
pub use screen_handler::BackpackScreenHandler;

/// https://wiki.vg/Inventory
#[derive(Debug, ToPrimitive, FromPrimitive, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Generic9x1,
    Generic9x2,
    Generic9x3,
    Generic9x4,
    Generic9x5,
    Generic9x6,
}

impl WindowType {
    /// The smallest generic window able to present `slots` slots: one 9-wide
    /// row per started batch of nine. The stock client stops at six rows, so
    /// anything past 54 slots has no window.
    pub fn for_slot_count(slots: usize) -> Option<WindowType> {
        match slots {
            0..=9 => Some(Self::Generic9x1),
            10..=18 => Some(Self::Generic9x2),
            19..=27 => Some(Self::Generic9x3),
            28..=36 => Some(Self::Generic9x4),
            37..=45 => Some(Self::Generic9x5),
            46..=54 => Some(Self::Generic9x6),
            _ => None,
        }
    }

    pub const fn rows(&self) -> usize {
        match self {
            Self::Generic9x1 => 1,
            Self::Generic9x2 => 2,
            Self::Generic9x3 => 3,
            Self::Generic9x4 => 4,
            Self::Generic9x5 => 5,
            Self::Generic9x6 => 6,
        }
    }

    pub const fn slot_count(&self) -> usize {
        self.rows() * 9
    }
}

/// The slot-array contract every container-backing store satisfies.
///
/// Reads past the end are empty, never a failure. Writes past the end are the
/// caller's bug; the store is free to panic, matching what the surrounding
/// host does instead of clamping silently.
pub trait Inventory {
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        (0..self.size()).all(|slot| self.get_stack(slot).is_none())
    }

    /// The stack at `slot`, `None` when the slot is empty or out of range.
    fn get_stack(&self, slot: usize) -> Option<&ItemStack>;

    /// Overwrites `slot`. In-range is a caller precondition.
    fn set_stack(&mut self, slot: usize, stack: Option<ItemStack>);

    /// Splits up to `amount` items out of `slot`, leaving the remainder.
    fn remove_stack(&mut self, slot: usize, amount: u8) -> Option<ItemStack>;

    /// Takes the whole stack out of `slot`, clearing it.
    fn take_stack(&mut self, slot: usize) -> Option<ItemStack>;

    fn clear(&mut self);

    /// Whether the player may keep using this inventory. Polled every tick
    /// while a screen over it is open; the first `false` ends the session.
    fn can_player_use(&self, player: &PlayerInventory) -> bool {
        let _ = player;
        true
    }
}

use std::sync::Arc;

use backpack_inventory::PlayerInventory;
use backpack_item::ItemStack;
use parking_lot::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Main,
    Off,
}

/// A connected player, reduced to what the backpack cares about: an id, the
/// inventory, and the stack its cursor carries while a screen is open.
pub struct Player {
    entity_id: i32,
    pub inventory: Arc<Mutex<PlayerInventory>>,
    pub carried_item: Arc<Mutex<Option<ItemStack>>>,
}

impl Player {
    pub fn new(entity_id: i32) -> Self {
        Self {
            entity_id,
            inventory: Arc::new(Mutex::new(PlayerInventory::new())),
            carried_item: Arc::new(Mutex::new(None)),
        }
    }

    pub fn entity_id(&self) -> i32 {
        self.entity_id
    }

    /// Snapshot of the stack in the given hand.
    pub fn stack_in_hand(&self, hand: Hand) -> Option<ItemStack> {
        let inventory = self.inventory.lock();
        match hand {
            Hand::Main => inventory.held_item().cloned(),
            Hand::Off => inventory.offhand().cloned(),
        }
    }
}

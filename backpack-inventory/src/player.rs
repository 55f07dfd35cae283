use backpack_item::{ItemRegistry, ItemStack};

use crate::transfer::SwapSlot;

pub const PLAYER_MAIN_SLOTS: usize = 36;
const HOTBAR_START: usize = 27;

/// The player's own slots as the screen sees them: 27 storage slots, the
/// 9-slot hotbar behind them, and the off-hand slot off to the side (the
/// off-hand is reachable through swaps but is not part of any screen's slot
/// range).
pub struct PlayerInventory {
    // Main storage + hotbar
    items: [Option<ItemStack>; PLAYER_MAIN_SLOTS],
    offhand: Option<ItemStack>,
    // current selected slot in hotbar
    selected: usize,
    pub state_id: u32,
    // The vanilla server wraps this at 100, we can just keep it as a u8 that automatically wraps.
    // 0 stays reserved for the player's own screen.
    pub total_opened_screens: u8,
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerInventory {
    pub fn new() -> Self {
        Self {
            items: std::array::from_fn(|_| None),
            offhand: None,
            selected: 0,
            state_id: 0,
            total_opened_screens: 1,
        }
    }

    pub fn set_selected(&mut self, slot: usize) {
        assert!((0..9).contains(&slot));
        self.selected = slot;
    }

    pub fn held_item(&self) -> Option<&ItemStack> {
        debug_assert!((0..9).contains(&self.selected));
        self.items[HOTBAR_START + self.selected].as_ref()
    }

    pub fn offhand(&self) -> Option<&ItemStack> {
        self.offhand.as_ref()
    }

    pub fn offhand_mut(&mut self) -> &mut Option<ItemStack> {
        &mut self.offhand
    }

    /// Main-hand and off-hand, in that order.
    pub fn hand_stacks(&self) -> [Option<&ItemStack>; 2] {
        [self.held_item(), self.offhand.as_ref()]
    }

    /// Storage-then-hotbar slot access, `None` past the end.
    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.items.get(index).and_then(Option::as_ref)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Option<ItemStack>> {
        self.items.get_mut(index)
    }

    pub fn hotbar_slot_mut(&mut self, index: u8) -> &mut Option<ItemStack> {
        &mut self.items[HOTBAR_START + index as usize]
    }

    /// Storage slot index a hotbar position maps to.
    pub fn hotbar_index(index: u8) -> usize {
        HOTBAR_START + index as usize
    }

    /// The stack a number-key swap would pull in.
    pub fn swap_stack(&self, source: SwapSlot) -> Option<&ItemStack> {
        match source {
            SwapSlot::Hotbar(index) => self.items[HOTBAR_START + index as usize].as_ref(),
            SwapSlot::Offhand => self.offhand.as_ref(),
        }
    }

    pub fn swap_slot_mut(&mut self, source: SwapSlot) -> &mut Option<ItemStack> {
        match source {
            SwapSlot::Hotbar(index) => &mut self.items[HOTBAR_START + index as usize],
            SwapSlot::Offhand => &mut self.offhand,
        }
    }

    pub(crate) fn items_mut(&mut self) -> &mut [Option<ItemStack>; PLAYER_MAIN_SLOTS] {
        &mut self.items
    }

    /// Puts a loose stack back into the inventory (matching stacks first,
    /// then the first free slot), returning whatever did not fit.
    pub fn insert_stack(&mut self, registry: &ItemRegistry, stack: ItemStack) -> Option<ItemStack> {
        insert_into_slots(registry, &mut self.items, stack, false)
    }
}

/// Merges `moving` into matching stacks first so partial stacks top up, then
/// drops the rest into the first empty slot. Returns what found no room.
/// `from_last` walks the slots back to front (quick-moves into the player's
/// region land in the hotbar first that way).
pub(crate) fn insert_into_slots(
    registry: &ItemRegistry,
    slots: &mut [Option<ItemStack>],
    mut moving: ItemStack,
    from_last: bool,
) -> Option<ItemStack> {
    let len = slots.len();
    let order = |index: usize| if from_last { len - 1 - index } else { index };

    for index in 0..len {
        if moving.count() == 0 {
            return None;
        }
        if let Some(stack) = slots[order(index)].as_mut() {
            if stack.can_combine_with(&moving) {
                let space = stack.max_count(registry).saturating_sub(stack.count());
                let moved = space.min(moving.count());
                stack.grow(moved);
                moving.shrink(moved);
            }
        }
    }
    if moving.count() == 0 {
        return None;
    }
    for index in 0..len {
        let slot = &mut slots[order(index)];
        if slot.is_none() {
            // Whole-stack placement moves the instance.
            *slot = Some(moving);
            return None;
        }
    }
    Some(moving)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ItemRegistry {
        ItemRegistry::with_base_items()
    }

    fn stack(registry: &ItemRegistry, name: &str, count: u8) -> ItemStack {
        ItemStack::new(registry.by_name(name).unwrap(), count)
    }

    #[test]
    fn held_item_follows_the_selected_hotbar_slot() {
        let registry = registry();
        let mut inventory = PlayerInventory::new();
        *inventory.hotbar_slot_mut(4) = Some(stack(&registry, "minecraft:apple", 3));

        assert!(inventory.held_item().is_none());
        inventory.set_selected(4);
        assert_eq!(inventory.held_item().unwrap().count(), 3);
    }

    #[test]
    fn swap_sources_cover_hotbar_and_offhand() {
        let registry = registry();
        let mut inventory = PlayerInventory::new();
        *inventory.hotbar_slot_mut(0) = Some(stack(&registry, "minecraft:torch", 1));
        *inventory.offhand_mut() = Some(stack(&registry, "minecraft:bread", 2));

        assert_eq!(
            inventory.swap_stack(SwapSlot::Hotbar(0)).unwrap().count(),
            1
        );
        assert_eq!(inventory.swap_stack(SwapSlot::Offhand).unwrap().count(), 2);
        assert!(inventory.swap_stack(SwapSlot::Hotbar(8)).is_none());
    }

    #[test]
    fn insert_tops_up_matching_stacks_before_opening_new_slots() {
        let registry = registry();
        let mut inventory = PlayerInventory::new();
        *inventory.slot_mut(3).unwrap() = Some(stack(&registry, "minecraft:stone", 60));

        let leftover = inventory.insert_stack(&registry, stack(&registry, "minecraft:stone", 10));
        assert!(leftover.is_none());
        assert_eq!(inventory.slot(3).unwrap().count(), 64);
        // The overflow went to the first free slot.
        assert_eq!(inventory.slot(0).unwrap().count(), 6);
    }

    #[test]
    fn insert_reports_what_does_not_fit() {
        let registry = registry();
        let mut inventory = PlayerInventory::new();
        for index in 0..PLAYER_MAIN_SLOTS {
            *inventory.slot_mut(index).unwrap() = Some(stack(&registry, "minecraft:dirt", 64));
        }
        let leftover = inventory.insert_stack(&registry, stack(&registry, "minecraft:stone", 5));
        assert_eq!(leftover.unwrap().count(), 5);
    }
}

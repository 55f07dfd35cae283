use backpack_item::{ItemKind, ItemRegistry, ItemStack, StackHandle};
use backpack_nbt::compound::NbtCompound;
use backpack_nbt::tag::NbtTag;
use itertools::Itertools;

use crate::player::PlayerInventory;
use crate::Inventory;

/// Two rows of nine. The screen type is derived from this, see
/// [`crate::WindowType::for_slot_count`].
pub const BACKPACK_SLOTS: usize = 9 * 2;

/// The mutable contents bound to one backpack stack instance.
///
/// The inventory does not own its stack; it keeps the stack's identity handle
/// (and kind) so the screen handler can recognise "the stack whose contents
/// are on screen" and the liveness check can find it in the player's hands.
#[derive(Debug)]
pub struct BackpackInventory {
    owner: StackHandle,
    owner_kind: ItemKind,
    slots: [Option<ItemStack>; BACKPACK_SLOTS],
}

impl BackpackInventory {
    /// An empty inventory bound to `owner`. The signature doubles as the
    /// attachment factory, so registration can pass the constructor itself.
    pub fn new(owner: &ItemStack) -> Self {
        Self {
            owner: owner.handle(),
            owner_kind: owner.kind(),
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn owner_handle(&self) -> StackHandle {
        self.owner
    }

    pub fn owner_kind(&self) -> ItemKind {
        self.owner_kind
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut Option<ItemStack>> {
        self.slots.get_mut(slot)
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<ItemStack>; BACKPACK_SLOTS] {
        &mut self.slots
    }

    /// Value-copies every slot out of `other`. Runs when the host copies the
    /// owning stack; the copies are fresh instances so later edits to either
    /// inventory stay isolated.
    pub fn copy_from(&mut self, other: &BackpackInventory) {
        for (slot, other_slot) in self.slots.iter_mut().zip(other.slots.iter()) {
            *slot = other_slot.as_ref().map(ItemStack::copy);
        }
    }

    /// Writes the slot array under "items", one entry per slot in order.
    /// Empty slots become explicit empty compounds so positions survive the
    /// round trip.
    pub fn write_nbt(&self, registry: &ItemRegistry, tag: &mut NbtCompound) {
        let items = self
            .slots
            .iter()
            .map(|slot| match slot {
                Some(stack) => NbtTag::Compound(stack.to_nbt(registry)),
                None => NbtTag::Compound(NbtCompound::new()),
            })
            .collect_vec();
        tag.put("items".to_string(), NbtTag::List(items));
    }

    /// Repopulates slots from a persisted tag. The zip stops at whichever
    /// side is shorter: a record from a smaller build leaves the tail slots
    /// alone, and a record longer than the fixed size is not trusted past it.
    pub fn read_nbt(&mut self, registry: &ItemRegistry, tag: &NbtCompound) {
        let Some(list) = tag.get_list("items") else {
            return;
        };
        for (slot, entry) in self.slots.iter_mut().zip(list.iter()) {
            *slot = entry
                .extract_compound()
                .and_then(|compound| ItemStack::from_nbt(registry, compound));
        }
    }
}

// Contents-only comparison: the owner handle is left out on purpose. An
// inventory re-derived from unchanged persisted data must compare equal to
// the live one, or the client replays the equip animation every tick.
impl PartialEq for BackpackInventory {
    fn eq(&self, other: &Self) -> bool {
        self.slots.len() == other.slots.len() && self.slots == other.slots
    }
}

impl Inventory for BackpackInventory {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn get_stack(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    // It's the caller's job to stay in bounds here; indexing past the end
    // crashes like every other slot store in the host does.
    fn set_stack(&mut self, slot: usize, stack: Option<ItemStack>) {
        self.slots[slot] = stack;
    }

    fn remove_stack(&mut self, slot: usize, amount: u8) -> Option<ItemStack> {
        let slot_ref = self.slots.get_mut(slot)?;
        let stack = slot_ref.as_mut()?;
        let removed = stack.split(amount);
        if stack.count() == 0 {
            *slot_ref = None;
        }
        (removed.count() > 0).then_some(removed)
    }

    fn take_stack(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    /// Only while a hand still holds the owning stack, compared by handle so
    /// an equal-looking backpack does not keep the session alive. The first
    /// tick this is false the player is booted out of the screen, which is
    /// how dropping or stashing the backpack closes it.
    fn can_player_use(&self, player: &PlayerInventory) -> bool {
        player
            .hand_stacks()
            .iter()
            .flatten()
            .any(|stack| stack.handle() == self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_and_owner() -> (ItemRegistry, ItemStack) {
        let mut registry = ItemRegistry::with_base_items();
        let kind = registry.register("backpack:backpack", 1);
        let owner = ItemStack::new(kind, 1);
        (registry, owner)
    }

    fn stack(registry: &ItemRegistry, name: &str, count: u8) -> ItemStack {
        ItemStack::new(registry.by_name(name).unwrap(), count)
    }

    #[test]
    fn out_of_range_reads_are_empty_and_never_fail() {
        let (_, owner) = registry_and_owner();
        let inventory = BackpackInventory::new(&owner);
        assert!(inventory.get_stack(BACKPACK_SLOTS).is_none());
        assert!(inventory.get_stack(usize::MAX).is_none());
    }

    #[test]
    fn remove_stack_splits_and_clears() {
        let (registry, owner) = registry_and_owner();
        let mut inventory = BackpackInventory::new(&owner);
        inventory.set_stack(2, Some(stack(&registry, "minecraft:stone", 10)));

        let removed = inventory.remove_stack(2, 4).unwrap();
        assert_eq!(removed.count(), 4);
        assert_eq!(inventory.get_stack(2).unwrap().count(), 6);

        let rest = inventory.remove_stack(2, 6).unwrap();
        assert_eq!(rest.count(), 6);
        assert!(inventory.get_stack(2).is_none());
    }

    #[test]
    fn take_stack_empties_the_slot() {
        let (registry, owner) = registry_and_owner();
        let mut inventory = BackpackInventory::new(&owner);
        let original = stack(&registry, "minecraft:apple", 5);
        inventory.set_stack(0, Some(original.clone()));

        let taken = inventory.take_stack(0).unwrap();
        assert_eq!(taken, original);
        assert!(inventory.get_stack(0).is_none());
        assert!(inventory.take_stack(0).is_none());
    }

    #[test]
    fn clear_and_is_empty() {
        let (registry, owner) = registry_and_owner();
        let mut inventory = BackpackInventory::new(&owner);
        assert!(inventory.is_empty());
        inventory.set_stack(17, Some(stack(&registry, "minecraft:torch", 1)));
        assert!(!inventory.is_empty());
        inventory.clear();
        assert!(inventory.is_empty());
    }

    #[test]
    fn deep_copy_is_equal_but_isolated() {
        let (registry, owner) = registry_and_owner();
        let mut inventory = BackpackInventory::new(&owner);
        inventory.set_stack(0, Some(stack(&registry, "minecraft:stone", 8)));
        inventory.set_stack(9, Some(stack(&registry, "minecraft:bread", 2)));

        let other_owner = owner.copy();
        let mut copy = BackpackInventory::new(&other_owner);
        copy.copy_from(&inventory);
        assert_eq!(copy, inventory);

        copy.take_stack(0);
        assert_ne!(copy, inventory);
        assert_eq!(inventory.get_stack(0).unwrap().count(), 8);
    }

    #[test]
    fn nbt_round_trip_preserves_slot_positions() {
        let (registry, owner) = registry_and_owner();
        let mut inventory = BackpackInventory::new(&owner);
        inventory.set_stack(1, Some(stack(&registry, "minecraft:stone", 3)));
        let mut named = stack(&registry, "minecraft:diamond", 1);
        named.rename("Shiny");
        inventory.set_stack(17, Some(named));

        let mut tag = NbtCompound::new();
        inventory.write_nbt(&registry, &mut tag);
        assert_eq!(tag.get_list("items").unwrap().len(), BACKPACK_SLOTS);

        let mut reread = BackpackInventory::new(&owner.copy());
        reread.read_nbt(&registry, &tag);
        assert_eq!(reread, inventory);
        assert_eq!(reread.get_stack(17).unwrap().custom_name(), Some("Shiny"));
    }

    #[test]
    fn read_nbt_stops_at_the_fixed_slot_count() {
        let (registry, owner) = registry_and_owner();

        // A record claiming more slots than this build has.
        let entries = (0..BACKPACK_SLOTS + 9)
            .map(|_| NbtTag::Compound(stack(&registry, "minecraft:dirt", 1).to_nbt(&registry)))
            .collect_vec();
        let mut tag = NbtCompound::new();
        tag.put("items".to_string(), NbtTag::List(entries));

        let mut inventory = BackpackInventory::new(&owner);
        inventory.read_nbt(&registry, &tag);
        assert!(inventory.get_stack(BACKPACK_SLOTS - 1).is_some());
        assert!(inventory.get_stack(BACKPACK_SLOTS).is_none());

        // And a shorter record leaves the tail slots at their prior value.
        let short = {
            let mut tag = NbtCompound::new();
            tag.put(
                "items".to_string(),
                NbtTag::List(vec![NbtTag::Compound(NbtCompound::new())]),
            );
            tag
        };
        inventory.read_nbt(&registry, &short);
        assert!(inventory.get_stack(0).is_none());
        assert!(inventory.get_stack(1).is_some());
    }

    #[test]
    fn liveness_tracks_the_owning_handle_in_either_hand() {
        let (_, owner) = registry_and_owner();
        let inventory = BackpackInventory::new(&owner);
        let mut player = PlayerInventory::new();

        assert!(!inventory.can_player_use(&player));

        *player.hotbar_slot_mut(0) = Some(owner.clone());
        player.set_selected(0);
        assert!(inventory.can_player_use(&player));

        // A value-equal but distinct backpack does not keep the session alive.
        *player.hotbar_slot_mut(0) = Some(owner.copy());
        assert!(!inventory.can_player_use(&player));

        *player.offhand_mut() = Some(owner.clone());
        assert!(inventory.can_player_use(&player));
    }
}

use std::sync::Arc;

use backpack_item::{ItemRegistry, ItemStack};
use parking_lot::Mutex;

use crate::backpack::{BackpackInventory, BACKPACK_SLOTS};
use crate::player::{insert_into_slots, PlayerInventory, PLAYER_MAIN_SLOTS};
use crate::transfer::{DiscardKind, DragButton, DragStage, MouseButton, SwapSlot, TransferKind};
use crate::{Inventory, WindowType};

/// Combined slot space of an open screen: the backpack rows first, then the
/// player's storage, then the hotbar.
pub const SCREEN_SLOTS: usize = BACKPACK_SLOTS + PLAYER_MAIN_SLOTS;

/// What a denied click reports back; `None` stands for the empty stack.
type DeniedReport = Option<ItemStack>;

/// An in-flight quick-craft gesture: which slots were painted so far.
struct Drag {
    button: DragButton,
    slots: Vec<usize>,
}

/// The server half of one open backpack screen.
///
/// Holds shared references to the same player inventory, cursor and backpack
/// inventory the rest of the session uses; one instance exists per open
/// screen and dies with it. Every click request lands in [`Self::on_slot_click`],
/// which vets it against the two house rules before handing it to the stock
/// container behavior:
///
/// 1. the stack whose contents are on screen cannot be moved, and
/// 2. no backpack goes inside a backpack.
pub struct BackpackScreenHandler {
    sync_id: u8,
    window_type: WindowType,
    backpack: Arc<Mutex<BackpackInventory>>,
    player_inventory: Arc<Mutex<PlayerInventory>>,
    carried: Arc<Mutex<Option<ItemStack>>>,
    drag: Option<Drag>,
    cursor_resync: bool,
}

impl BackpackScreenHandler {
    pub fn new(
        sync_id: u8,
        player_inventory: Arc<Mutex<PlayerInventory>>,
        carried: Arc<Mutex<Option<ItemStack>>>,
        backpack: Arc<Mutex<BackpackInventory>>,
    ) -> Self {
        let slots = backpack.lock().size();
        let window_type = WindowType::for_slot_count(slots)
            .expect("Backpack sizes past the largest generic screen are unsupported");
        Self {
            sync_id,
            window_type,
            backpack,
            player_inventory,
            carried,
            drag: None,
            cursor_resync: false,
        }
    }

    pub fn sync_id(&self) -> u8 {
        self.sync_id
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    pub fn backpack(&self) -> &Arc<Mutex<BackpackInventory>> {
        &self.backpack
    }

    /// Whether the player may keep this screen. Polled every tick by the
    /// session owner; the first `false` tears the session down.
    pub fn still_valid(&self) -> bool {
        let player = self.player_inventory.lock();
        self.backpack.lock().can_player_use(&player)
    }

    /// Whether a denial asked the host to re-acknowledge the cursor contents
    /// to the client. Reading clears the request.
    pub fn take_cursor_resync(&mut self) -> bool {
        std::mem::take(&mut self.cursor_resync)
    }

    /// Handles one client click request and returns the stack the host
    /// reports back for reconciliation. Denials are not errors: the report
    /// alone tells the client what really happened.
    pub fn on_slot_click(
        &mut self,
        registry: &ItemRegistry,
        slot_id: i32,
        kind: TransferKind,
    ) -> Option<ItemStack> {
        // Negative ids belong to the host's networking internals (clicks
        // outside the window and friends); they take the default path
        // untouched.
        if slot_id < 0 {
            return self.default_click(registry, slot_id, kind);
        }
        let slot = slot_id as usize;
        if slot >= SCREEN_SLOTS {
            log::debug!("ignoring click on nonexistent slot {slot}");
            return None;
        }

        // See if the click has to be rejected for touching the open backpack
        // itself, then whether it would nest a backpack into one, and only
        // then let the stock behavior run.
        if let Some(report) = self.deny_open_backpack_moves(slot, kind) {
            return report;
        }
        if let Some(report) = self.deny_backpack_nesting(slot, kind) {
            return report;
        }
        self.default_click(registry, slot_id, kind)
    }

    /// Forbids every way of moving the stack whose contents are on screen.
    fn deny_open_backpack_moves(&self, slot: usize, kind: TransferKind) -> Option<DeniedReport> {
        let backpack = self.backpack.lock();
        let player = self.player_inventory.lock();
        let owner = backpack.owner_handle();
        let slot_stack = screen_slot_snapshot(&backpack, &player, slot);

        if !kind.is_peek()
            && slot_stack
                .as_ref()
                .is_some_and(|stack| stack.handle() == owner)
        {
            // The report must be the slot's *current* state; the host's
            // reconciliation notices the client's misprediction and repaints
            // from it.
            return Some(match kind {
                // Except here: the client expects the stack on its cursor
                // now, and reporting the real stack makes it believe that
                // worked. Empty does.
                TransferKind::Pickup(_) => None,
                _ => slot_stack,
            });
        }

        // A number key can also pull the open backpack out through the
        // hotbar or off-hand slot it lives in.
        if let TransferKind::Swap(source) = kind {
            let swapped_in = player.swap_stack(source);
            if swapped_in.is_some_and(|stack| stack.handle() == owner) {
                return Some(swapped_in.cloned());
            }
        }

        None
    }

    /// Forbids putting a backpack inside this one.
    fn deny_backpack_nesting(&mut self, slot: usize, kind: TransferKind) -> Option<DeniedReport> {
        let backpack_kind = self.backpack.lock().owner_kind();

        match kind {
            TransferKind::Pickup(_) | TransferKind::QuickCraft(_) => {
                let carried = self.carried.lock();
                if slot < BACKPACK_SLOTS
                    && carried
                        .as_ref()
                        .is_some_and(|stack| stack.kind() == backpack_kind)
                {
                    // The cursor did not change either, but the client has to
                    // be told so explicitly or it keeps predicting the
                    // placement.
                    self.cursor_resync = true;
                    return Some(carried.clone());
                }
                None
            }
            TransferKind::QuickMove => {
                let backpack = self.backpack.lock();
                let player = self.player_inventory.lock();
                let slot_stack = screen_slot_snapshot(&backpack, &player, slot);
                // Shift-clicking a backpack that sits *outside* this
                // inventory would move it in; one already inside can only
                // move out, which is fine.
                if slot >= BACKPACK_SLOTS
                    && slot_stack
                        .as_ref()
                        .is_some_and(|stack| stack.kind() == backpack_kind)
                {
                    return Some(slot_stack);
                }
                None
            }
            TransferKind::Swap(source) => {
                let player = self.player_inventory.lock();
                let swapped_in = player.swap_stack(source);
                if slot < BACKPACK_SLOTS
                    && swapped_in.is_some_and(|stack| stack.kind() == backpack_kind)
                {
                    return Some(swapped_in.cloned());
                }
                None
            }
            _ => None,
        }
    }

    /// The stock generic-container behavior every unvetoed click falls
    /// through to.
    fn default_click(
        &mut self,
        registry: &ItemRegistry,
        slot_id: i32,
        kind: TransferKind,
    ) -> Option<ItemStack> {
        if slot_id < 0 {
            return match kind {
                TransferKind::QuickCraft(stage) => self.quick_craft(registry, None, stage),
                TransferKind::Pickup(button) => {
                    self.drop_cursor(button);
                    None
                }
                _ => None,
            };
        }
        let slot = slot_id as usize;
        match kind {
            TransferKind::Pickup(button) => self.pickup(registry, slot, button),
            TransferKind::QuickMove => self.quick_move(registry, slot),
            TransferKind::Swap(source) => self.swap(slot, source),
            TransferKind::Peek => None,
            TransferKind::Discard(discard) => self.discard(slot, discard),
            TransferKind::QuickCraft(stage) => self.quick_craft(registry, Some(slot), stage),
            TransferKind::PickupRemaining => self.pickup_remaining(registry),
        }
    }

    fn pickup(&mut self, registry: &ItemRegistry, slot: usize, button: MouseButton) -> Option<ItemStack> {
        let mut backpack = self.backpack.lock();
        let mut player = self.player_inventory.lock();
        let mut carried = self.carried.lock();
        let slot_ref = screen_slot_mut(&mut backpack, &mut player, slot)?;
        apply_cursor_click(registry, &mut carried, slot_ref, button);
        slot_ref.clone()
    }

    fn quick_move(&mut self, registry: &ItemRegistry, slot: usize) -> Option<ItemStack> {
        let mut backpack = self.backpack.lock();
        let mut player = self.player_inventory.lock();
        if slot < BACKPACK_SLOTS {
            let moving = backpack.slot_mut(slot).and_then(Option::take)?;
            // Out of the container the stack lands in the hotbar first.
            if let Some(rest) = insert_into_slots(registry, player.items_mut(), moving, true) {
                *backpack.slot_mut(slot).expect("slot checked above") = Some(rest);
            }
            backpack.get_stack(slot).cloned()
        } else {
            let index = slot - BACKPACK_SLOTS;
            let moving = player.slot_mut(index).and_then(Option::take)?;
            if let Some(rest) = insert_into_slots(registry, backpack.slots_mut(), moving, false) {
                *player.slot_mut(index).expect("slot checked above") = Some(rest);
            }
            player.slot(index).cloned()
        }
    }

    fn swap(&mut self, slot: usize, source: SwapSlot) -> Option<ItemStack> {
        // The clicked slot and the swap source can be the same physical slot
        // (pressing a hotbar key while hovering that hotbar slot); nothing
        // moves then.
        if let SwapSlot::Hotbar(index) = source {
            if slot == BACKPACK_SLOTS + PlayerInventory::hotbar_index(index) {
                let player = self.player_inventory.lock();
                return player.swap_stack(source).cloned();
            }
        }

        let mut backpack = self.backpack.lock();
        let mut player = self.player_inventory.lock();
        let clicked = match screen_slot_mut(&mut backpack, &mut player, slot) {
            Some(slot_ref) => slot_ref.take(),
            None => return None,
        };
        let swapped_in = player.swap_slot_mut(source).take();
        *player.swap_slot_mut(source) = clicked;
        match screen_slot_mut(&mut backpack, &mut player, slot) {
            Some(slot_ref) => {
                *slot_ref = swapped_in;
                slot_ref.clone()
            }
            None => None,
        }
    }

    fn discard(&mut self, slot: usize, kind: DiscardKind) -> Option<ItemStack> {
        let mut backpack = self.backpack.lock();
        let mut player = self.player_inventory.lock();
        let slot_ref = screen_slot_mut(&mut backpack, &mut player, slot)?;
        let stack = slot_ref.as_mut()?;
        let dropped = match kind {
            DiscardKind::Single => stack.split(1),
            DiscardKind::FullStack => stack.split(stack.count()),
        };
        if stack.count() == 0 {
            *slot_ref = None;
        }
        // Turning the dropped portion into a world entity is the host's job;
        // from in here it just leaves.
        log::debug!("dropped {} items from slot {slot}", dropped.count());
        slot_ref.clone()
    }

    fn quick_craft(
        &mut self,
        registry: &ItemRegistry,
        slot: Option<usize>,
        stage: DragStage,
    ) -> Option<ItemStack> {
        match stage {
            DragStage::Start(button) => {
                self.drag = Some(Drag {
                    button,
                    slots: Vec::new(),
                });
                None
            }
            DragStage::AddSlot => {
                let slot = slot?;
                let carried = self.carried.lock();
                // The client sends drag packets without carrying anything too.
                let held = carried.as_ref()?;
                let Some(drag) = self.drag.as_mut() else {
                    log::debug!("drag add-slot without a started drag");
                    return None;
                };
                let backpack = self.backpack.lock();
                let player = self.player_inventory.lock();
                let eligible = match screen_slot_snapshot(&backpack, &player, slot) {
                    None => true,
                    Some(stack) => {
                        stack.can_combine_with(held) && stack.count() < stack.max_count(registry)
                    }
                };
                if eligible && !drag.slots.contains(&slot) {
                    drag.slots.push(slot);
                }
                None
            }
            DragStage::End => {
                let Some(drag) = self.drag.take() else {
                    log::debug!("drag end without a started drag");
                    return None;
                };
                let mut carried = self.carried.lock();
                let mut held = carried.take()?;
                let mut backpack = self.backpack.lock();
                let mut player = self.player_inventory.lock();
                match drag.button {
                    // Middle-drag clones in creative; there is no authority
                    // model for that here, so it stays a no-op.
                    DragButton::Middle => {}
                    DragButton::Right => {
                        for &slot in &drag.slots {
                            if held.count() == 0 {
                                break;
                            }
                            place_dragged(registry, &mut backpack, &mut player, slot, &mut held, 1);
                        }
                    }
                    DragButton::Left => {
                        let share = held.count() as usize / drag.slots.len().max(1);
                        if share > 0 {
                            for &slot in &drag.slots {
                                place_dragged(
                                    registry,
                                    &mut backpack,
                                    &mut player,
                                    slot,
                                    &mut held,
                                    share as u8,
                                );
                            }
                        }
                    }
                }
                *carried = (held.count() > 0).then_some(held);
                carried.clone()
            }
        }
    }

    fn pickup_remaining(&mut self, registry: &ItemRegistry) -> Option<ItemStack> {
        let mut carried = self.carried.lock();
        let mut held = carried.take()?;
        let mut backpack = self.backpack.lock();
        let mut player = self.player_inventory.lock();
        let max = held.max_count(registry);
        for slot in 0..SCREEN_SLOTS {
            if held.count() >= max {
                break;
            }
            let Some(slot_ref) = screen_slot_mut(&mut backpack, &mut player, slot) else {
                continue;
            };
            let Some(stack) = slot_ref.as_mut() else {
                continue;
            };
            if !stack.can_combine_with(&held) {
                continue;
            }
            let moved = (max - held.count()).min(stack.count());
            stack.shrink(moved);
            held.grow(moved);
            if stack.count() == 0 {
                *slot_ref = None;
            }
        }
        *carried = Some(held);
        carried.clone()
    }

    fn drop_cursor(&mut self, button: MouseButton) {
        let mut carried = self.carried.lock();
        let Some(stack) = carried.as_mut() else {
            return;
        };
        let dropped = match button {
            MouseButton::Left => stack.split(stack.count()),
            MouseButton::Right => stack.split(1),
        };
        log::debug!("dropped {} items outside the window", dropped.count());
        if stack.count() == 0 {
            *carried = None;
        }
    }

    /// End-of-session cleanup: whatever the cursor still carries goes back
    /// into the player's inventory.
    pub fn on_closed(&mut self, registry: &ItemRegistry) {
        self.drag = None;
        let mut carried = self.carried.lock();
        let Some(stack) = carried.take() else {
            return;
        };
        let mut player = self.player_inventory.lock();
        if let Some(leftover) = player.insert_stack(registry, stack) {
            // A full inventory spills onto the ground, which is the host's job.
            log::debug!(
                "dropping {} items the inventory could not take back",
                leftover.count()
            );
        }
    }
}

// Known limitations, kept as-is:
// 1. A denied quick-craft only re-acknowledges the cursor. Slots the client
//    already painted during the gesture are not individually reset, so a fast
//    follow-up (say, a shift-click on what looks like a placed stack) can act
//    on a stale view until the next state-id mismatch forces a full resync.
// 2. A denied off-hand swap reports the swapped-in stack, but the off-hand
//    slot sits outside the screen's slot range, so the report cannot repaint
//    it; the client may show the item gone until the next resync.

fn screen_slot_mut<'a>(
    backpack: &'a mut BackpackInventory,
    player: &'a mut PlayerInventory,
    slot: usize,
) -> Option<&'a mut Option<ItemStack>> {
    if slot < BACKPACK_SLOTS {
        backpack.slot_mut(slot)
    } else {
        player.slot_mut(slot - BACKPACK_SLOTS)
    }
}

fn screen_slot_snapshot(
    backpack: &BackpackInventory,
    player: &PlayerInventory,
    slot: usize,
) -> Option<ItemStack> {
    if slot < BACKPACK_SLOTS {
        backpack.get_stack(slot).cloned()
    } else {
        player.slot(slot - BACKPACK_SLOTS).cloned()
    }
}

/// A plain cursor/slot interaction: pick up, place, top up or change places.
fn apply_cursor_click(
    registry: &ItemRegistry,
    carried: &mut Option<ItemStack>,
    slot_ref: &mut Option<ItemStack>,
    button: MouseButton,
) {
    let held = carried.take();
    let in_slot = slot_ref.take();
    let (held, in_slot) = match (held, in_slot) {
        (None, None) => (None, None),
        // Pick up the whole stack, or the larger half on a right click.
        (None, Some(mut stack)) => match button {
            MouseButton::Left => (Some(stack), None),
            MouseButton::Right => {
                let taken = stack.split(stack.count() - stack.count() / 2);
                (
                    (taken.count() > 0).then_some(taken),
                    (stack.count() > 0).then_some(stack),
                )
            }
        },
        // Place everything, or a single item on a right click.
        (Some(mut held), None) => match button {
            MouseButton::Left => (None, Some(held)),
            MouseButton::Right => {
                let placed = held.split(1);
                (
                    (held.count() > 0).then_some(held),
                    (placed.count() > 0).then_some(placed),
                )
            }
        },
        (Some(mut held), Some(mut stack)) => {
            if held.can_combine_with(&stack) {
                let moving = match button {
                    MouseButton::Left => held.count(),
                    MouseButton::Right => 1,
                };
                let space = stack.max_count(registry).saturating_sub(stack.count());
                let moved = moving.min(space);
                stack.grow(moved);
                held.shrink(moved);
                ((held.count() > 0).then_some(held), Some(stack))
            } else {
                // Different contents change places.
                (Some(stack), Some(held))
            }
        }
    };
    *carried = held;
    *slot_ref = in_slot;
}

fn place_dragged(
    registry: &ItemRegistry,
    backpack: &mut BackpackInventory,
    player: &mut PlayerInventory,
    slot: usize,
    held: &mut ItemStack,
    amount: u8,
) {
    let Some(slot_ref) = screen_slot_mut(backpack, player, slot) else {
        return;
    };
    match slot_ref.as_mut() {
        Some(stack) => {
            let space = stack.max_count(registry).saturating_sub(stack.count());
            let moved = amount.min(space).min(held.count());
            stack.grow(moved);
            held.shrink(moved);
        }
        None => {
            let moved = amount.min(held.count());
            if moved > 0 {
                *slot_ref = Some(held.split(moved));
            }
        }
    }
}

use std::collections::HashMap;

use backpack_inventory::transfer::TransferKind;
use backpack_inventory::{AttachmentRegistry, BackpackScreenHandler, InventoryError, WindowType};
use backpack_item::{ItemRegistry, ItemStack};
use backpack_nbt::compound::NbtCompound;
use parking_lot::RwLock;

use crate::item::BackpackItem;
use crate::player::{Hand, Player};
use crate::world::World;

/// One open screen session: the title it was opened under and the handler
/// every click for it goes through.
struct OpenScreen {
    title: String,
    handler: BackpackScreenHandler,
}

/// What the session layer answers a click packet with.
#[derive(Debug, PartialEq)]
pub enum ClickResponse {
    /// The click was processed; the reported stack goes back to the client
    /// for reconciliation.
    Slot(Option<ItemStack>),
    /// The click was stale; the whole screen content gets resent instead of
    /// applying it.
    Resync,
}

/// The authoritative side of the mod: owns the registries and the open
/// screen sessions, and is what the host's hooks call into.
pub struct Server {
    pub items: ItemRegistry,
    pub attachments: AttachmentRegistry,
    backpack_item: BackpackItem,
    open_screens: RwLock<HashMap<i32, OpenScreen>>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    /// Startup: base item definitions, then the mod's own registrations.
    pub fn new() -> Self {
        let mut items = ItemRegistry::with_base_items();
        let mut attachments = AttachmentRegistry::new();
        let backpack_item = BackpackItem::register(&mut items, &mut attachments);
        Self {
            items,
            attachments,
            backpack_item,
            open_screens: RwLock::new(HashMap::new()),
        }
    }

    pub fn backpack_item(&self) -> &BackpackItem {
        &self.backpack_item
    }

    /// The host's item-use dispatch, reduced to the one item this mod adds.
    pub fn use_item(&self, world: &World, player: &Player, hand: Hand) -> crate::item::ActionResult {
        self.backpack_item.on_use(world, self, player, hand)
    }

    pub(crate) fn open_backpack_screen(&self, player: &Player, stack: &ItemStack) {
        let Some(inventory) = self.attachments.get_or_create(stack) else {
            log::warn!("no inventory attachment registered for {:?}", stack.kind());
            return;
        };
        let sync_id = {
            let mut player_inventory = player.inventory.lock();
            player_inventory.state_id = 0;
            player_inventory.total_opened_screens
        };
        let title = stack.display_name(&self.items).to_string();
        let handler = BackpackScreenHandler::new(
            sync_id,
            player.inventory.clone(),
            player.carried_item.clone(),
            inventory,
        );
        log::debug!(
            "opening '{title}' (sync id {sync_id}) for player {}",
            player.entity_id()
        );
        self.open_screens
            .write()
            .insert(player.entity_id(), OpenScreen { title, handler });
    }

    /// The slot-click hook: validates the session, then lets the handler
    /// decide. Denied transfers are not errors; only a closed session or a
    /// malformed packet is.
    pub fn handle_slot_click(
        &self,
        player: &Player,
        sync_id: u8,
        state_id: u32,
        slot_id: i32,
        mode: u8,
        button: i8,
    ) -> Result<ClickResponse, InventoryError> {
        let kind = TransferKind::parse(mode, button)?;

        let mut screens = self.open_screens.write();
        let screen = screens
            .get_mut(&player.entity_id())
            .ok_or(InventoryError::ClosedScreenInteract(player.entity_id()))?;
        if screen.handler.sync_id() != sync_id {
            return Err(InventoryError::ClosedScreenInteract(player.entity_id()));
        }

        // This is just checking for regular desync, the client hasn't done
        // anything malicious; resend instead of applying the stale click.
        {
            let mut inventory = player.inventory.lock();
            if inventory.state_id != state_id {
                inventory.state_id = inventory.state_id.wrapping_add(1);
                return Ok(ClickResponse::Resync);
            }
        }

        let reported = screen.handler.on_slot_click(&self.items, slot_id, kind);
        // The slot update that follows the click advances the revision.
        player.inventory.lock().state_id = state_id.wrapping_add(1);
        Ok(ClickResponse::Slot(reported))
    }

    /// The per-tick liveness poll over every open session. A backpack that
    /// left its player's hands closes on the spot; later clicks bounce off
    /// [`InventoryError::ClosedScreenInteract`].
    pub fn tick(&self, players: &[&Player]) {
        for player in players {
            let expired = {
                let screens = self.open_screens.read();
                screens
                    .get(&player.entity_id())
                    .is_some_and(|screen| !screen.handler.still_valid())
            };
            if expired {
                log::debug!(
                    "player {} no longer holds the open backpack",
                    player.entity_id()
                );
                self.close_screen(player);
            }
        }
    }

    /// Explicit close (the player hit escape) and the liveness teardown both
    /// end here.
    pub fn close_screen(&self, player: &Player) {
        let Some(mut screen) = self.open_screens.write().remove(&player.entity_id()) else {
            return;
        };
        screen.handler.on_closed(&self.items);
        // The next session gets a fresh id; the stock client closes whatever
        // is open when told to, so reusing ids is what desyncs.
        let mut inventory = player.inventory.lock();
        inventory.total_opened_screens = inventory.total_opened_screens.wrapping_add(1);
    }

    pub fn has_open_screen(&self, player: &Player) -> bool {
        self.open_screens.read().contains_key(&player.entity_id())
    }

    pub fn open_screen_title(&self, player: &Player) -> Option<String> {
        self.open_screens
            .read()
            .get(&player.entity_id())
            .map(|screen| screen.title.clone())
    }

    pub fn open_screen_sync_id(&self, player: &Player) -> Option<u8> {
        self.open_screens
            .read()
            .get(&player.entity_id())
            .map(|screen| screen.handler.sync_id())
    }

    pub fn open_screen_window_type(&self, player: &Player) -> Option<WindowType> {
        self.open_screens
            .read()
            .get(&player.entity_id())
            .map(|screen| screen.handler.window_type())
    }

    /// Whether the last denial asked for the cursor to be re-acknowledged to
    /// this player. A binding host reads this after each click response.
    pub fn take_cursor_resync(&self, player: &Player) -> bool {
        self.open_screens
            .write()
            .get_mut(&player.entity_id())
            .is_some_and(|screen| screen.handler.take_cursor_resync())
    }

    /// Save hook for one stack: its own fields plus its attachment, in one
    /// tag.
    pub fn save_stack(&self, stack: &ItemStack) -> NbtCompound {
        let mut tag = stack.to_nbt(&self.items);
        self.attachments.save_attachment(&self.items, stack, &mut tag);
        tag
    }

    /// Load hook: a fresh stack instance with its attachment repopulated
    /// from the tag.
    pub fn load_stack(&self, tag: &NbtCompound) -> Option<ItemStack> {
        let stack = ItemStack::from_nbt(&self.items, tag)?;
        self.attachments.load_attachment(&self.items, &stack, tag);
        Some(stack)
    }
}

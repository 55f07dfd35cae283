use backpack_inventory::{AttachmentRegistry, BackpackInventory};
use backpack_item::{ItemKind, ItemRegistry};

use crate::player::{Hand, Player};
use crate::server::Server;
use crate::world::World;

/// Namespaced id the backpack registers under.
pub const BACKPACK_ITEM_ID: &str = "backpack:backpack";

/// What an activation hook tells the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionResult {
    /// The use happened; on the presentation side this also makes the host
    /// relay the use to the authoritative side.
    Success,
    /// Nothing to do with this item.
    Pass,
}

/// The backpack item behavior: registration glue plus the right-click hook.
pub struct BackpackItem {
    kind: ItemKind,
}

impl BackpackItem {
    /// Registers the item (it does not stack) and binds the inventory
    /// factory to it. Runs once during startup; everything later finds both
    /// through the registries.
    ///
    /// `BackpackInventory::new` already has the factory shape, so the
    /// constructor itself is the registration argument.
    pub fn register(items: &mut ItemRegistry, attachments: &mut AttachmentRegistry) -> Self {
        let kind = items.register(BACKPACK_ITEM_ID, 1);
        attachments.register(kind, BackpackInventory::new);
        log::debug!("registered {BACKPACK_ITEM_ID} with its inventory attachment");
        Self { kind }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The right-click hook.
    ///
    /// On the presentation side there is no authority to open anything, but
    /// the hook still reports success; anything else and the authoritative
    /// side never hears about the use. Over there the held stack resolves to
    /// its attached inventory and a screen session opens on it, titled with
    /// the stack's current display name so a renamed backpack keeps its name.
    pub fn on_use(&self, world: &World, server: &Server, player: &Player, hand: Hand) -> ActionResult {
        let Some(stack) = player.stack_in_hand(hand) else {
            return ActionResult::Pass;
        };
        if stack.kind() != self.kind {
            return ActionResult::Pass;
        }
        if world.is_client() {
            return ActionResult::Success;
        }
        server.open_backpack_screen(player, &stack);
        ActionResult::Success
    }
}

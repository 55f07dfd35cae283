use std::collections::HashMap;
use std::sync::Arc;

use backpack_item::{ItemKind, ItemRegistry, ItemStack, StackHandle};
use backpack_nbt::compound::NbtCompound;
use parking_lot::{Mutex, RwLock};

use crate::backpack::BackpackInventory;

/// Builds the inventory bound to a stack the first time the attachment is
/// requested. [`BackpackInventory::new`] already has this shape.
pub type InventoryFactory = fn(&ItemStack) -> BackpackInventory;

/// Associates a mutable inventory with a specific stack instance.
///
/// Factories are registered once per item kind during initialization.
/// Attachments are created lazily on first lookup and keyed by the stack's
/// identity handle, so two value-equal backpacks keep separate contents while
/// the same stack always resolves to the same inventory.
#[derive(Default)]
pub struct AttachmentRegistry {
    factories: HashMap<ItemKind, InventoryFactory>,
    attachments: RwLock<HashMap<StackHandle, Arc<Mutex<BackpackInventory>>>>,
}

impl AttachmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ItemKind, factory: InventoryFactory) {
        if self.factories.insert(kind, factory).is_some() {
            log::warn!("replacing the inventory factory for item kind {kind:?}");
        }
    }

    /// The inventory attached to this exact stack instance, created on first
    /// call. `None` when no factory covers the stack's kind.
    pub fn get_or_create(&self, stack: &ItemStack) -> Option<Arc<Mutex<BackpackInventory>>> {
        let factory = *self.factories.get(&stack.kind())?;
        let mut attachments = self.attachments.write();
        let inventory = attachments
            .entry(stack.handle())
            .or_insert_with(|| {
                log::debug!("attaching a new inventory to stack {:?}", stack.handle());
                Arc::new(Mutex::new(factory(stack)))
            })
            .clone();
        Some(inventory)
    }

    /// Host hook for stack cloning: the copy gets its own inventory with
    /// value-copied contents.
    pub fn copy_attachment(&self, source: &ItemStack, copy: &ItemStack) {
        if source.handle() == copy.handle() {
            return;
        }
        let Some(source_inventory) = self.get_or_create(source) else {
            return;
        };
        let Some(copy_inventory) = self.get_or_create(copy) else {
            return;
        };
        let source_inventory = source_inventory.lock();
        copy_inventory.lock().copy_from(&source_inventory);
    }

    /// Host save hook: serializes the stack's attachment into `tag`.
    pub fn save_attachment(&self, registry: &ItemRegistry, stack: &ItemStack, tag: &mut NbtCompound) {
        if let Some(inventory) = self.get_or_create(stack) {
            inventory.lock().write_nbt(registry, tag);
        }
    }

    /// Host load hook: repopulates the stack's attachment from `tag`.
    pub fn load_attachment(&self, registry: &ItemRegistry, stack: &ItemStack, tag: &NbtCompound) {
        if let Some(inventory) = self.get_or_create(stack) {
            inventory.lock().read_nbt(registry, tag);
        }
    }

    /// Host hook for stack destruction. Dropping the map entry is the whole
    /// teardown; the inventory itself dies with its last `Arc`.
    pub fn detach(&self, handle: StackHandle) {
        self.attachments.write().remove(&handle);
    }
}

use backpack_nbt::compound::NbtCompound;
use backpack_nbt::tag::NbtTag;
use uuid::Uuid;

use crate::registry::{ItemKind, ItemRegistry};

/// Identity token of one live stack instance. Survives being moved between
/// slots; a host-level copy of the item mints a new one. Policies that must
/// tell "this exact stack" apart from "an equal-looking stack" compare these
/// instead of relying on addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StackHandle(Uuid);

impl StackHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// One stack of items: a kind, a count and an optional player-given name.
///
/// `Clone` keeps the handle and is a snapshot of the *same* instance, which
/// is what slot reports want. [`ItemStack::copy`] models the host cloning an
/// item and mints a fresh handle.
#[derive(Clone, Debug)]
pub struct ItemStack {
    kind: ItemKind,
    count: u8,
    custom_name: Option<String>,
    handle: StackHandle,
}

// Value comparison. The handle is deliberately left out: a re-derived stack
// with the same contents must compare equal or the client replays equip
// animations on every sync.
impl PartialEq for ItemStack {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.count == other.count
            && self.custom_name == other.custom_name
    }
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u8) -> Self {
        Self {
            kind,
            count,
            custom_name: None,
            handle: StackHandle::new(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn handle(&self) -> StackHandle {
        self.handle
    }

    pub fn is_same_instance(&self, other: &ItemStack) -> bool {
        self.handle == other.handle
    }

    /// True when the two stacks could share a slot: same kind, same name.
    pub fn can_combine_with(&self, other: &ItemStack) -> bool {
        self.kind == other.kind && self.custom_name == other.custom_name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.custom_name = Some(name.into());
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    /// The player-given name when there is one, the registry name otherwise.
    pub fn display_name<'a>(&'a self, registry: &'a ItemRegistry) -> &'a str {
        self.custom_name
            .as_deref()
            .unwrap_or(&registry.get(self.kind).name)
    }

    pub fn max_count(&self, registry: &ItemRegistry) -> u8 {
        registry.get(self.kind).max_stack
    }

    pub fn grow(&mut self, amount: u8) {
        self.count = self.count.saturating_add(amount);
    }

    pub fn shrink(&mut self, amount: u8) {
        self.count = self.count.saturating_sub(amount);
    }

    /// Splits up to `amount` items off, leaving the remainder (possibly
    /// zero) behind. The caller owns clearing a slot that ends up at zero.
    ///
    /// Taking everything is a move of the instance and keeps its handle, so
    /// an attachment keyed on the stack follows it to wherever it lands. A
    /// partial split returns a fresh instance and the remainder keeps the
    /// handle.
    pub fn split(&mut self, amount: u8) -> ItemStack {
        if amount >= self.count {
            let whole = self.clone();
            self.count = 0;
            return whole;
        }
        self.count -= amount;
        ItemStack {
            kind: self.kind,
            count: amount,
            custom_name: self.custom_name.clone(),
            handle: StackHandle::new(),
        }
    }

    /// A host-level copy: same contents, its own identity.
    pub fn copy(&self) -> ItemStack {
        ItemStack {
            kind: self.kind,
            count: self.count,
            custom_name: self.custom_name.clone(),
            handle: StackHandle::new(),
        }
    }

    pub fn write_nbt(&self, registry: &ItemRegistry, tag: &mut NbtCompound) {
        tag.put("id".to_string(), registry.get(self.kind).name.as_str());
        tag.put("count".to_string(), NbtTag::Byte(self.count as i8));
        if let Some(name) = &self.custom_name {
            tag.put("custom_name".to_string(), name.as_str());
        }
    }

    pub fn to_nbt(&self, registry: &ItemRegistry) -> NbtCompound {
        let mut tag = NbtCompound::new();
        self.write_nbt(registry, &mut tag);
        tag
    }

    /// Reads a stack back out of a persisted tag. `None` for the explicit
    /// empty entry (an empty compound), a zero count, or a kind that is no
    /// longer registered.
    pub fn from_nbt(registry: &ItemRegistry, tag: &NbtCompound) -> Option<ItemStack> {
        let kind = registry.by_name(tag.get_string("id")?)?;
        let count = tag.get_byte("count")? as u8;
        if count == 0 {
            return None;
        }
        let mut stack = ItemStack::new(kind, count);
        if let Some(name) = tag.get_string("custom_name") {
            stack.rename(name.clone());
        }
        Some(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ItemRegistry {
        ItemRegistry::with_base_items()
    }

    fn stone_stack(count: u8) -> (ItemRegistry, ItemStack) {
        let registry = registry();
        let stone = registry.by_name("minecraft:stone").unwrap();
        (registry, ItemStack::new(stone, count))
    }

    #[test]
    fn equality_ignores_the_handle() {
        let (_, stack) = stone_stack(12);
        let copy = stack.copy();
        assert_eq!(stack, copy);
        assert!(!stack.is_same_instance(&copy));
        assert!(stack.is_same_instance(&stack.clone()));
    }

    #[test]
    fn split_takes_at_most_what_is_there() {
        let (_, mut stack) = stone_stack(10);
        let taken = stack.split(4);
        assert_eq!(taken.count(), 4);
        assert_eq!(stack.count(), 6);
        // The remainder keeps the identity, the portion is new.
        assert!(!taken.is_same_instance(&stack));

        let rest = stack.split(200);
        assert_eq!(rest.count(), 6);
        assert_eq!(stack.count(), 0);
        // Taking everything moved the instance.
        assert!(rest.is_same_instance(&stack));
    }

    #[test]
    fn display_name_prefers_the_custom_name() {
        let (registry, mut stack) = stone_stack(1);
        assert_eq!(stack.display_name(&registry), "minecraft:stone");
        stack.rename("Lunch");
        assert_eq!(stack.display_name(&registry), "Lunch");
    }

    #[test]
    fn nbt_round_trip() {
        let (registry, mut stack) = stone_stack(7);
        stack.rename("Spare cobble");

        let tag = stack.to_nbt(&registry);
        let read = ItemStack::from_nbt(&registry, &tag).unwrap();
        assert_eq!(read, stack);
        // A reload is a new instance.
        assert!(!read.is_same_instance(&stack));
    }

    #[test]
    fn empty_and_unknown_tags_read_as_no_stack() {
        let registry = registry();
        assert!(ItemStack::from_nbt(&registry, &NbtCompound::new()).is_none());

        let mut unknown = NbtCompound::new();
        unknown.put("id".to_string(), "modded:gone");
        unknown.put("count".to_string(), NbtTag::Byte(3));
        assert!(ItemStack::from_nbt(&registry, &unknown).is_none());
    }
}

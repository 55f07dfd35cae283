use std::{collections::HashMap, sync::LazyLock};

use serde::Deserialize;

const ITEMS_JSON: &str = include_str!("../assets/items.json");

static BASE_ITEMS: LazyLock<Vec<ItemDef>> = LazyLock::new(|| {
    serde_json::from_str(ITEMS_JSON).expect("Could not parse items.json registry.")
});

#[derive(Deserialize, Clone, Debug)]
struct ItemDef {
    name: String,
    max_stack: u8,
}

/// Numeric key of a registered item kind. Only the registry that issued it
/// can resolve it back to an [`Item`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemKind(u16);

#[derive(Clone, Debug)]
pub struct Item {
    pub name: String,
    pub max_stack: u8,
}

/// The set of known item kinds, owned by whoever hosts the mod rather than
/// living in a process-wide static, so initialization can extend it.
pub struct ItemRegistry {
    items: Vec<Item>,
    by_name: HashMap<String, ItemKind>,
}

impl ItemRegistry {
    /// A registry pre-populated with the base definitions shipped in
    /// `assets/items.json`.
    pub fn with_base_items() -> Self {
        let mut registry = Self {
            items: Vec::new(),
            by_name: HashMap::new(),
        };
        for def in BASE_ITEMS.iter() {
            registry.register(&def.name, def.max_stack);
        }
        registry
    }

    /// Assigns the next numeric id to `name`. Registering the same name twice
    /// is an initialization bug.
    pub fn register(&mut self, name: &str, max_stack: u8) -> ItemKind {
        assert!(
            !self.by_name.contains_key(name),
            "item '{name}' registered twice"
        );
        let kind = ItemKind(self.items.len() as u16);
        self.items.push(Item {
            name: name.to_string(),
            max_stack,
        });
        self.by_name.insert(name.to_string(), kind);
        kind
    }

    pub fn get(&self, kind: ItemKind) -> &Item {
        &self.items[kind.0 as usize]
    }

    pub fn by_name(&self, name: &str) -> Option<ItemKind> {
        self.by_name.get(name).copied()
    }
}

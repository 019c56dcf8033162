//! Player inventory.
//!
//! The inventory only holds ids. It reads item definitions from the
//! [`ItemRegistry`] and, for repairs, marks the item repaired there. It
//! never touches player stats: `equip` and `unequip` return the stat
//! changes for the caller to apply.

use cw_core::stats::negate;
use cw_core::{ItemId, ItemRegistry, StatDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons an inventory operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The item is not being carried.
    #[error("You aren't carrying the {0}.")]
    NotInInventory(String),

    /// The item cannot be equipped, or is not carried.
    #[error("You can't equip the {0}.")]
    NotEquippable(String),

    /// The item is not equipped.
    #[error("You don't have the {0} equipped.")]
    NotEquipped(String),

    /// No recipe combines the two items.
    #[error("You can't combine the {0} with the {1}.")]
    NoRecipe(String, String),

    /// Some ingredients are missing.
    #[error("To make the {item} you still need: {}.", .missing.join(", "))]
    MissingIngredients {
        /// The item being crafted.
        item: String,
        /// Display names of the missing ingredients.
        missing: Vec<String>,
    },

    /// The item has no recipe.
    #[error("The {0} can't be crafted.")]
    NotCraftable(String),

    /// The item cannot be repaired.
    #[error("The {0} can't be repaired.")]
    NotRepairable(String),

    /// The repair tool is not being carried.
    #[error("You need the {tool} to repair the {item}.")]
    MissingRepairTool {
        /// The item to repair.
        item: String,
        /// The tool it needs.
        tool: String,
    },

    /// The item to be made is already held.
    #[error("You already have the {0}.")]
    AlreadyHave(String),

    /// The item was already repaired.
    #[error("The {0} is already repaired.")]
    AlreadyRepaired(String),
}

/// Items the player carries and wears. The two lists never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ItemId>,
    equipped: Vec<ItemId>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Carried (not equipped) items, in pickup order.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Equipped items, in equip order.
    pub fn equipped(&self) -> &[ItemId] {
        &self.equipped
    }

    /// Carried and equipped items.
    pub fn all(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().chain(self.equipped.iter())
    }

    /// Whether the item is carried (not equipped).
    pub fn carries(&self, id: &ItemId) -> bool {
        self.items.contains(id)
    }

    /// Whether the item is equipped.
    pub fn is_equipped(&self, id: &ItemId) -> bool {
        self.equipped.contains(id)
    }

    /// Whether the item is carried or equipped.
    pub fn has(&self, id: &ItemId) -> bool {
        self.carries(id) || self.is_equipped(id)
    }

    /// True if nothing is carried or equipped.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.equipped.is_empty()
    }

    /// Add an item. Adding an item already held is a no-op.
    pub fn add(&mut self, id: ItemId) {
        if !self.has(&id) {
            self.items.push(id);
        }
    }

    /// Remove a carried item.
    pub fn remove(&mut self, registry: &ItemRegistry, id: &ItemId) -> Result<(), InventoryError> {
        match self.items.iter().position(|i| i == id) {
            Some(pos) => {
                self.items.remove(pos);
                Ok(())
            }
            None => Err(InventoryError::NotInInventory(registry.name_of(id))),
        }
    }

    /// Remove an item whether carried or equipped. Returns the stat change
    /// to undo if it was equipped.
    pub fn discard(
        &mut self,
        registry: &ItemRegistry,
        id: &ItemId,
    ) -> Result<StatDelta, InventoryError> {
        if self.is_equipped(id) {
            return self.unequip(registry, id).map(|delta| {
                self.items.retain(|i| i != id);
                delta
            });
        }
        self.remove(registry, id).map(|()| StatDelta::new())
    }

    /// Move a carried item to the equipped list. Returns its stat bonus.
    pub fn equip(
        &mut self,
        registry: &ItemRegistry,
        id: &ItemId,
    ) -> Result<StatDelta, InventoryError> {
        let name = registry.name_of(id);
        let item = registry
            .get(id.as_str())
            .map_err(|_| InventoryError::NotEquippable(name.clone()))?;
        if !item.equippable || !self.carries(id) {
            return Err(InventoryError::NotEquippable(name));
        }
        self.items.retain(|i| i != id);
        self.equipped.push(id.clone());
        debug!(item = %id, "equipped");
        Ok(item.effect.clone())
    }

    /// Move an equipped item back to the carried list. Returns the stat
    /// change that undoes its bonus.
    pub fn unequip(
        &mut self,
        registry: &ItemRegistry,
        id: &ItemId,
    ) -> Result<StatDelta, InventoryError> {
        let name = registry.name_of(id);
        let Some(pos) = self.equipped.iter().position(|i| i == id) else {
            return Err(InventoryError::NotEquipped(name));
        };
        self.equipped.remove(pos);
        self.items.push(id.clone());
        debug!(item = %id, "unequipped");
        Ok(registry
            .get(id.as_str())
            .map(|item| negate(&item.effect))
            .unwrap_or_default())
    }

    /// Combine two carried items into the item whose recipe is exactly
    /// `{a, b}`. Returns the product.
    ///
    /// When several items share the recipe, the one whose id sorts first
    /// is made.
    pub fn combine(
        &mut self,
        registry: &ItemRegistry,
        a: &ItemId,
        b: &ItemId,
    ) -> Result<ItemId, InventoryError> {
        let no_recipe = || InventoryError::NoRecipe(registry.name_of(a), registry.name_of(b));
        for id in [a, b] {
            if !self.carries(id) {
                return Err(InventoryError::NotInInventory(registry.name_of(id)));
            }
        }
        if a == b {
            return Err(no_recipe());
        }

        let products = registry.recipes_for(a, b);
        let Some(&first) = products.first() else {
            return Err(no_recipe());
        };
        let product = first.clone();
        if self.has(&product) {
            return Err(InventoryError::AlreadyHave(registry.name_of(&product)));
        }
        if products.len() > 1 {
            warn!(%a, %b, chosen = %product, candidates = products.len(), "overlapping recipes");
        }

        self.items.retain(|i| i != a && i != b);
        self.add(product.clone());
        debug!(%a, %b, %product, "combined");
        Ok(product)
    }

    /// Build `target` from its components, all of which must be carried.
    pub fn craft(
        &mut self,
        registry: &ItemRegistry,
        target: &ItemId,
    ) -> Result<(), InventoryError> {
        let item = registry
            .get(target.as_str())
            .map_err(|_| InventoryError::NotInInventory(target.to_string()))?;
        if item.components.is_empty() {
            return Err(InventoryError::NotCraftable(item.name.clone()));
        }
        if self.has(target) {
            return Err(InventoryError::AlreadyHave(item.name.clone()));
        }

        let missing: Vec<String> = item
            .components
            .iter()
            .filter(|c| !self.carries(c))
            .map(|c| registry.name_of(c))
            .collect();
        if !missing.is_empty() {
            return Err(InventoryError::MissingIngredients {
                item: item.name.clone(),
                missing,
            });
        }

        self.items.retain(|i| !item.components.contains(i));
        self.add(target.clone());
        debug!(item = %target, "crafted");
        Ok(())
    }

    /// Check that `id` could be repaired right now.
    pub fn check_repair(
        &self,
        registry: &ItemRegistry,
        id: &ItemId,
    ) -> Result<ItemId, InventoryError> {
        let name = registry.name_of(id);
        if !self.has(id) {
            return Err(InventoryError::NotInInventory(name));
        }
        let item = registry
            .get(id.as_str())
            .map_err(|_| InventoryError::NotRepairable(name.clone()))?;
        let tool = match (&item.repair_item, item.repairable) {
            (Some(tool), true) => tool,
            _ => return Err(InventoryError::NotRepairable(name)),
        };
        if !self.carries(tool) {
            return Err(InventoryError::MissingRepairTool {
                item: name,
                tool: registry.name_of(tool),
            });
        }
        if item.repaired {
            return Err(InventoryError::AlreadyRepaired(name));
        }
        Ok(tool.clone())
    }

    /// Repair `id`, consuming its repair tool. Returns the tool's id.
    pub fn repair(
        &mut self,
        registry: &mut ItemRegistry,
        id: &ItemId,
    ) -> Result<ItemId, InventoryError> {
        let tool = self.check_repair(registry, id)?;
        self.remove(registry, &tool)?;
        if let Ok(item) = registry.get_mut(id.as_str()) {
            item.repaired = true;
        }
        debug!(item = %id, %tool, "repaired");
        Ok(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_core::{Item, Stat};

    fn registry() -> ItemRegistry {
        let mut sword = Item::new("sword", "Rusty Sword");
        sword.equippable = true;
        sword.effect.insert(Stat::Attack, 4);

        let mut axe = Item::new("axe", "Stone Axe");
        axe.components = vec![ItemId::from("stick"), ItemId::from("stone")];

        let mut radio = Item::new("communicator", "Broken Communicator");
        radio.repairable = true;
        radio.repair_item = Some(ItemId::from("energy_cells"));

        ItemRegistry::new([
            sword,
            axe,
            radio,
            Item::new("stick", "Stick"),
            Item::new("stone", "Stone"),
            Item::new("energy_cells", "Energy Cells"),
            Item::new("shell", "Shell"),
        ])
    }

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    #[test]
    fn add_and_remove() {
        let reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("shell"));
        inv.add(id("shell"));
        assert_eq!(inv.items().len(), 1);
        inv.remove(&reg, &id("shell")).unwrap();
        assert_eq!(
            inv.remove(&reg, &id("shell")),
            Err(InventoryError::NotInInventory("Shell".into()))
        );
        assert!(inv.is_empty());
    }

    #[test]
    fn equip_and_unequip_keep_lists_disjoint() {
        let reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("sword"));

        let bonus = inv.equip(&reg, &id("sword")).unwrap();
        assert_eq!(bonus.get(&Stat::Attack), Some(&4));
        assert!(inv.is_equipped(&id("sword")));
        assert!(!inv.carries(&id("sword")));
        assert!(inv.equip(&reg, &id("sword")).is_err());

        let undo = inv.unequip(&reg, &id("sword")).unwrap();
        assert_eq!(undo.get(&Stat::Attack), Some(&-4));
        assert!(inv.carries(&id("sword")));
        assert_eq!(
            inv.unequip(&reg, &id("sword")),
            Err(InventoryError::NotEquipped("Rusty Sword".into()))
        );
    }

    #[test]
    fn equip_requires_equippable_carried_item() {
        let reg = registry();
        let mut inv = Inventory::new();
        assert!(matches!(
            inv.equip(&reg, &id("sword")),
            Err(InventoryError::NotEquippable(_))
        ));
        inv.add(id("shell"));
        assert!(matches!(
            inv.equip(&reg, &id("shell")),
            Err(InventoryError::NotEquippable(_))
        ));
    }

    #[test]
    fn discard_equipped_item_undoes_bonus() {
        let reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("sword"));
        inv.equip(&reg, &id("sword")).unwrap();
        let undo = inv.discard(&reg, &id("sword")).unwrap();
        assert_eq!(undo.get(&Stat::Attack), Some(&-4));
        assert!(!inv.has(&id("sword")));
    }

    #[test]
    fn combine_stick_and_stone() {
        let reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("stone"));
        inv.add(id("stick"));

        assert_eq!(inv.combine(&reg, &id("stone"), &id("stick")), Ok(id("axe")));
        assert!(inv.carries(&id("axe")));
        assert!(!inv.carries(&id("stick")));

        inv.add(id("shell"));
        assert!(matches!(
            inv.combine(&reg, &id("axe"), &id("shell")),
            Err(InventoryError::NoRecipe(_, _))
        ));
    }

    #[test]
    fn making_a_held_item_keeps_the_ingredients() {
        let reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("axe"));
        inv.add(id("stick"));
        inv.add(id("stone"));

        assert_eq!(
            inv.craft(&reg, &id("axe")),
            Err(InventoryError::AlreadyHave("Stone Axe".into()))
        );
        assert_eq!(
            inv.combine(&reg, &id("stick"), &id("stone")),
            Err(InventoryError::AlreadyHave("Stone Axe".into()))
        );
        assert_eq!(inv.items(), &[id("axe"), id("stick"), id("stone")]);
    }

    #[test]
    fn craft_reports_missing_ingredients() {
        let reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("stick"));
        assert_eq!(
            inv.craft(&reg, &id("axe")),
            Err(InventoryError::MissingIngredients {
                item: "Stone Axe".into(),
                missing: vec!["Stone".into()],
            })
        );
        inv.add(id("stone"));
        inv.craft(&reg, &id("axe")).unwrap();
        assert_eq!(inv.items(), &[id("axe")]);
    }

    #[test]
    fn repair_consumes_tool_once() {
        let mut reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("communicator"));
        inv.add(id("energy_cells"));

        assert_eq!(inv.repair(&mut reg, &id("communicator")), Ok(id("energy_cells")));
        assert!(reg.get("communicator").unwrap().repaired);
        assert!(!inv.carries(&id("energy_cells")));

        assert!(matches!(
            inv.repair(&mut reg, &id("communicator")),
            Err(InventoryError::MissingRepairTool { .. })
        ));

        inv.add(id("energy_cells"));
        assert_eq!(
            inv.repair(&mut reg, &id("communicator")),
            Err(InventoryError::AlreadyRepaired("Broken Communicator".into()))
        );
    }

    #[test]
    fn repair_needs_repairable_item() {
        let mut reg = registry();
        let mut inv = Inventory::new();
        inv.add(id("shell"));
        assert_eq!(
            inv.repair(&mut reg, &id("shell")),
            Err(InventoryError::NotRepairable("Shell".into()))
        );
    }
}

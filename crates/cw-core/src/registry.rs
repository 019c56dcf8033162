//! The item arena and fuzzy name resolution.
//!
//! Every item lives here exactly once. Scenes, the inventory, and loot
//! tables only hold [`ItemId`]s, so a state change made through the
//! registry is seen everywhere the item is referenced.

use std::collections::BTreeMap;

use strsim::jaro_winkler;

use crate::error::{CoreError, CoreResult};
use crate::id::ItemId;
use crate::item::Item;

/// Minimum similarity for a name to be offered as a suggestion.
const SUGGEST_THRESHOLD: f64 = 0.75;

/// Result of resolving a free-text fragment against a set of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    /// Exactly one item matched.
    Found(ItemId),
    /// Several items matched equally well.
    Ambiguous(Vec<ItemId>),
    /// Nothing matched.
    NotFound,
}

impl Match {
    /// The matched id, if unique.
    pub fn found(self) -> Option<ItemId> {
        match self {
            Match::Found(id) => Some(id),
            _ => None,
        }
    }
}

/// Owns every item and its mutable state.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: BTreeMap<ItemId, Item>,
}

impl ItemRegistry {
    /// Build a registry, keying each item by its id.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }

    /// Insert or replace an item.
    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.id.clone(), item);
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> CoreResult<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    /// Look up an item by id for mutation.
    pub fn get_mut(&mut self, id: &str) -> CoreResult<&mut Item> {
        self.items
            .get_mut(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    /// Whether an id is known.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Display name for an id, falling back to the id itself.
    pub fn name_of(&self, id: &ItemId) -> String {
        self.items
            .get(id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Iterate all items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve a name fragment among the items in `scope`.
    ///
    /// Tiers are tried in order and the first tier with any hit decides:
    /// exact id, exact name, last word of the name, then substring of the
    /// name. All comparisons ignore case. Unknown ids in `scope` are
    /// skipped.
    pub fn find_by_name_fragment<'a>(
        &self,
        text: &str,
        scope: impl IntoIterator<Item = &'a ItemId>,
    ) -> Match {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Match::NotFound;
        }
        let as_id = needle.replace(' ', "_");

        let mut candidates: Vec<&Item> = Vec::new();
        for item in scope.into_iter().filter_map(|id| self.items.get(id)) {
            if !candidates.iter().any(|c| c.id == item.id) {
                candidates.push(item);
            }
        }

        let tiers: [&dyn Fn(&Item) -> bool; 4] = [
            &|item| item.id.as_str().to_lowercase() == as_id,
            &|item| item.name.to_lowercase() == needle,
            &|item| item.last_word() == needle,
            &|item| item.name.to_lowercase().contains(&needle),
        ];

        for tier in tiers {
            let mut hits: Vec<ItemId> = candidates
                .iter()
                .filter(|item| tier(item))
                .map(|item| item.id.clone())
                .collect();
            match hits.len() {
                0 => continue,
                1 => return Match::Found(hits.remove(0)),
                _ => return Match::Ambiguous(hits),
            }
        }

        Match::NotFound
    }

    /// Suggest item names in `scope` that look like `text`, best first.
    pub fn suggest<'a>(
        &self,
        text: &str,
        scope: impl IntoIterator<Item = &'a ItemId>,
        limit: usize,
    ) -> Vec<String> {
        let needle = text.trim().to_lowercase();
        let mut scored: Vec<(String, f64)> = scope
            .into_iter()
            .filter_map(|id| self.items.get(id))
            .filter_map(|item| {
                let score = jaro_winkler(&needle, &item.name.to_lowercase())
                    .max(jaro_winkler(&needle, &item.last_word()));
                (score >= SUGGEST_THRESHOLD).then(|| (item.name.clone(), score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.dedup_by(|a, b| a.0 == b.0);
        scored.into_iter().take(limit).map(|(n, _)| n).collect()
    }

    /// Every item whose recipe is exactly `{a, b}`, in id order.
    pub fn recipes_for(&self, a: &ItemId, b: &ItemId) -> Vec<&ItemId> {
        self.items
            .values()
            .filter(|item| item.is_recipe_for(a, b))
            .map(|item| &item.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> ItemRegistry {
        ItemRegistry::new([
            Item::new("energy_cells", "Energy Cells"),
            Item::new("fuel_cells", "Fuel Cells"),
            Item::new("stick", "Sturdy Stick"),
            Item::new("stone", "Flat Stone"),
            Item::new("stone_axe", "Stone Axe"),
        ])
    }

    fn all(reg: &ItemRegistry) -> Vec<ItemId> {
        reg.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn exact_id_wins() {
        let reg = registry();
        let scope = all(&reg);
        assert_eq!(
            reg.find_by_name_fragment("stone", &scope),
            Match::Found(ItemId::from("stone"))
        );
        assert_eq!(
            reg.find_by_name_fragment("energy cells", &scope),
            Match::Found(ItemId::from("energy_cells"))
        );
    }

    #[test]
    fn exact_name_case_insensitive() {
        let reg = registry();
        let scope = all(&reg);
        assert_eq!(
            reg.find_by_name_fragment("STURDY STICK", &scope),
            Match::Found(ItemId::from("stick"))
        );
    }

    #[test]
    fn last_word_tier_before_substring() {
        let reg = registry();
        let scope = all(&reg);
        // "axe" is the last word of "Stone Axe" only.
        assert_eq!(
            reg.find_by_name_fragment("axe", &scope),
            Match::Found(ItemId::from("stone_axe"))
        );
    }

    #[test]
    fn ambiguous_last_word() {
        let reg = registry();
        let scope = all(&reg);
        match reg.find_by_name_fragment("cells", &scope) {
            Match::Ambiguous(ids) => assert_eq!(ids.len(), 2),
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn substring_and_scope() {
        let reg = registry();
        let scope = vec![ItemId::from("energy_cells"), ItemId::from("stick")];
        assert_eq!(
            reg.find_by_name_fragment("ergy", &scope),
            Match::Found(ItemId::from("energy_cells"))
        );
        assert_eq!(reg.find_by_name_fragment("axe", &scope), Match::NotFound);
        assert_eq!(reg.find_by_name_fragment("  ", &scope), Match::NotFound);
    }

    #[test]
    fn suggestions_rank_close_names() {
        let reg = registry();
        let scope = all(&reg);
        let suggestions = reg.suggest("stik", &scope, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("Sturdy Stick"));
    }

    #[test]
    fn recipe_lookup() {
        let mut reg = registry();
        let mut axe = Item::new("axe", "Axe");
        axe.components = vec![ItemId::from("stick"), ItemId::from("stone")];
        reg.insert(axe);
        let found = reg.recipes_for(&ItemId::from("stone"), &ItemId::from("stick"));
        assert_eq!(found, vec![&ItemId::from("axe")]);
    }

    #[test]
    fn missing_item_is_an_error() {
        let reg = registry();
        assert_eq!(
            reg.get("ghost").unwrap_err(),
            CoreError::ItemNotFound("ghost".to_string())
        );
    }

    proptest! {
        #[test]
        fn resolution_is_deterministic(fragment in "[a-z ]{0,12}") {
            let reg = registry();
            let scope = all(&reg);
            let first = reg.find_by_name_fragment(&fragment, &scope);
            let second = reg.find_by_name_fragment(&fragment, &scope);
            prop_assert_eq!(first, second);
        }
    }
}

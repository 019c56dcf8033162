//! The side-effect executor.

use cw_core::{Effect, ItemId, World};
use tracing::debug;

use crate::error::FictionResult;
use crate::inventory::InventoryError;
use crate::io::Category;
use crate::player::PlayerState;

/// Check that every effect in the list can run, without changing anything.
///
/// Items consumed earlier in the list count as gone for later entries.
pub fn check_effects(effects: &[Effect], world: &World, player: &PlayerState) -> FictionResult<()> {
    let mut used: Vec<ItemId> = Vec::new();
    for effect in effects {
        match effect {
            Effect::ConsumeItem { item } => {
                if !player.inventory.carries(item) || used.contains(item) {
                    return Err(InventoryError::NotInInventory(world.items.name_of(item)).into());
                }
                used.push(item.clone());
            }
            Effect::RepairItem { item } => {
                let tool = player.inventory.check_repair(&world.items, item)?;
                if used.contains(&tool) {
                    return Err(InventoryError::MissingRepairTool {
                        item: world.items.name_of(item),
                        tool: world.items.name_of(&tool),
                    }
                    .into());
                }
                used.push(tool);
            }
            Effect::GiveItem { item } | Effect::RevealItem { item } => {
                world.items.get(item.as_str())?;
            }
            Effect::Reclassify { character, .. } => {
                world.character(character)?;
            }
            Effect::SetFlag { .. } | Effect::AdjustStat { .. } | Effect::Say { .. } => {}
        }
    }
    Ok(())
}

/// Run a list of effects. Nothing changes if any effect cannot run.
///
/// Returns the narration the effects produced, in order.
pub fn apply_effects(
    effects: &[Effect],
    world: &mut World,
    player: &mut PlayerState,
) -> FictionResult<Vec<(Category, String)>> {
    check_effects(effects, world, player)?;

    let mut reports = Vec::new();
    for effect in effects {
        debug!(?effect, "applying effect");
        match effect {
            Effect::SetFlag { key, value } => {
                player.story.set(key.clone(), value.clone());
            }
            Effect::Reclassify { character, kind } => {
                world.character_mut(character)?.kind = *kind;
            }
            Effect::ConsumeItem { item } => {
                player.inventory.remove(&world.items, item)?;
            }
            Effect::GiveItem { item } => {
                for scene in world.scenes_mut() {
                    scene.remove_item(item);
                }
                for character in world.characters_mut() {
                    character.inventory.retain(|i| i != item);
                }
                player.inventory.add(item.clone());
                reports.push((
                    Category::Discovery,
                    format!("You receive the {}.", world.items.name_of(item)),
                ));
            }
            Effect::RevealItem { item } => {
                let placed = player.has_item(item) || world.scene_holding(item).is_some();
                if !placed {
                    world.scene_mut(&player.scene)?.add_item(item.clone());
                    reports.push((
                        Category::Discovery,
                        format!("You notice the {}.", world.items.name_of(item)),
                    ));
                }
            }
            Effect::AdjustStat { stat, delta } => {
                player.stats.adjust(*stat, *delta);
                let verb = if *delta >= 0 { "rises" } else { "drops" };
                reports.push((
                    Category::Narration,
                    format!("Your {stat} {verb} by {}.", delta.abs()),
                ));
            }
            Effect::RepairItem { item } => {
                player.inventory.repair(&mut world.items, item)?;
                reports.push((
                    Category::Discovery,
                    format!("The {} is repaired.", world.items.name_of(item)),
                ));
            }
            Effect::Say { text } => reports.push((Category::Narration, text.clone())),
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_core::{CharacterId, CharacterKind, SceneId, Stat};

    const WORLD: &str = r#"{
        "start_scene": "camp",
        "scenes": [{"id": "camp", "characters": ["hermit"], "items": ["flint"]}],
        "items": {
            "flint": {"name": "Flint"},
            "fish": {"name": "Fish"},
            "map": {"name": "Old Map"},
            "energy_cells": {"name": "Energy Cells"},
            "communicator": {"name": "Communicator", "repairable": true, "repair_item": "energy_cells"}
        },
        "characters": {"hermit": {"name": "Hermit", "type": "neutral"}}
    }"#;

    fn setup() -> (World, PlayerState) {
        let world = World::from_json(WORLD).unwrap();
        let player = PlayerState::new(SceneId::from("camp"), world.initial_stats);
        (world, player)
    }

    #[test]
    fn runs_every_kind_of_effect() {
        let (mut world, mut player) = setup();
        player.inventory.add(ItemId::from("fish"));
        let effects: Vec<Effect> = serde_json::from_str(
            r#"[
                {"effect": "consume_item", "item": "fish"},
                {"effect": "set_flag", "key": "fed_hermit"},
                {"effect": "reclassify", "character": "hermit", "kind": "friendly"},
                {"effect": "give_item", "item": "flint"},
                {"effect": "reveal_item", "item": "map"},
                {"effect": "adjust_stat", "stat": "strength", "delta": 2},
                {"effect": "say", "text": "He smiles."}
            ]"#,
        )
        .unwrap();

        let reports = apply_effects(&effects, &mut world, &mut player).unwrap();
        assert!(!player.has_item(&ItemId::from("fish")));
        assert!(player.has_flag("fed_hermit"));
        assert_eq!(
            world.character(&CharacterId::from("hermit")).unwrap().kind,
            CharacterKind::Friendly
        );
        assert!(player.has_item(&ItemId::from("flint")));
        assert!(world.scene_holding(&ItemId::from("flint")).is_none());
        assert_eq!(
            world.scene_holding(&ItemId::from("map")),
            Some(&SceneId::from("camp"))
        );
        assert_eq!(player.stats.get(Stat::Strength), 7);
        assert_eq!(reports.last().map(|(_, t)| t.as_str()), Some("He smiles."));
    }

    #[test]
    fn failing_list_changes_nothing() {
        let (mut world, mut player) = setup();
        let before = player.clone();
        let effects = vec![
            Effect::set_flag("should_not_be_set"),
            Effect::ConsumeItem {
                item: ItemId::from("fish"),
            },
        ];
        let err = apply_effects(&effects, &mut world, &mut player).unwrap_err();
        assert!(err.to_string().contains("Fish"));
        assert_eq!(player, before);
    }

    #[test]
    fn double_consume_is_rejected() {
        let (mut world, mut player) = setup();
        player.inventory.add(ItemId::from("fish"));
        let consume = Effect::ConsumeItem {
            item: ItemId::from("fish"),
        };
        assert!(apply_effects(&[consume.clone(), consume], &mut world, &mut player).is_err());
        assert!(player.has_item(&ItemId::from("fish")));
    }

    #[test]
    fn repair_effect() {
        let (mut world, mut player) = setup();
        player.inventory.add(ItemId::from("communicator"));
        player.inventory.add(ItemId::from("energy_cells"));
        let repair = [Effect::RepairItem {
            item: ItemId::from("communicator"),
        }];
        apply_effects(&repair, &mut world, &mut player).unwrap();
        assert!(world.items.get("communicator").unwrap().repaired);
        assert!(apply_effects(&repair, &mut world, &mut player).is_err());
    }
}

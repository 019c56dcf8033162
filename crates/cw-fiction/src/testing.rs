//! Shared fixture for session tests.

use cw_core::World;

use crate::config::EngineConfig;
use crate::io::{ScriptedInput, Transcript};
use crate::session::GameSession;

pub(crate) const ISLAND: &str = r#"{
    "title": "Test Island",
    "start_scene": "beach",
    "scenes": [
        {
            "id": "beach",
            "name": "Sandy Beach",
            "description": "Waves lap at the wreckage.",
            "items": ["stick", "stone", "communicator", "energy_cells"],
            "passive_items": ["locker", "safe"],
            "characters": ["hermit", "crab"],
            "music": "waves.ogg",
            "hint": "Try the locker.",
            "random_events": ["A gull cries overhead."],
            "exits": [
                {"door_name": "jungle path", "scene_id": "jungle"},
                {"door_name": "rockfall", "scene_id": "cave", "blocked": true,
                 "required_stat": "strength", "required_value": 10,
                 "block_text": "Boulders block the way.",
                 "unblock_text": "You heave the boulders aside."},
                {"door_name": "hatch", "scene_id": "bunker", "locked": true,
                 "required_item": "rusty_key", "consumable": true,
                 "unlock_text": "The key turns and snaps off in the lock."}
            ]
        },
        {
            "id": "jungle",
            "description": "Vines everywhere.",
            "items": ["berries", "jacket"],
            "characters": ["wolf"],
            "exits": [
                {"door_name": "beach", "scene_id": "beach"},
                {"door_name": "gate", "scene_id": "village", "blocked": true,
                 "required_condition": "gate_open"}
            ]
        },
        {"id": "cave", "items": ["fish"], "exits": [{"door_name": "out", "scene_id": "beach"}]},
        {"id": "bunker", "exits": [{"door_name": "ladder", "scene_id": "beach"}]},
        {"id": "village", "description": "Huts on stilts."}
    ],
    "items": {
        "stick": {"name": "Sturdy Stick"},
        "stone": {"name": "Flat Stone"},
        "axe": {"name": "Stone Axe", "components": ["stick", "stone"]},
        "communicator": {"name": "Communicator", "description": "Dead as a doornail.",
                         "repairable": true, "repair_item": "energy_cells"},
        "energy_cells": {"name": "Energy Cells"},
        "rusty_key": {"name": "Rusty Key"},
        "flare_gun": {"name": "Flare Gun"},
        "fish": {"name": "Dried Fish"},
        "wolf_pelt": {"name": "Wolf Pelt"},
        "berries": {"name": "Wild Berries", "usable": true, "consumable": true,
                    "effect": {"health": 20}},
        "jacket": {"name": "Leather Jacket", "equippable": true, "effect": {"defense": 3}},
        "locker": {
            "name": "Metal Locker",
            "interactive": true,
            "contents": ["rusty_key"],
            "states": {
                "default": {"description": "A dented metal locker.", "action": "open",
                            "next_state": "open"},
                "open": {"description": "The locker hangs open.", "action": "take",
                         "next_state": "empty", "reward": "rusty_key"},
                "empty": {"description": "The locker is empty."}
            }
        },
        "safe": {
            "name": "Wall Safe",
            "interactive": true,
            "locked": true,
            "unlock_required_item": "passcode",
            "contents": ["flare_gun"],
            "states": {
                "default": {"description": "A safe with a keypad.", "action": "unlock",
                            "next_state": "unlocked"},
                "unlocked": {"description": "The safe door is ajar.", "action": "open",
                             "next_state": "open"},
                "open": {"description": "The safe is open."}
            }
        }
    },
    "characters": {
        "hermit": {
            "name": "Old Hermit",
            "type": "neutral",
            "description": "A wiry man in rags.",
            "greeting": "Hrm. A visitor.",
            "dialogue": [
                {"label": "wreck", "prompt": "Ask about the wreck",
                 "response": "It sank in the storm.",
                 "effects": [{"effect": "set_flag", "key": "asked_wreck"}]},
                {"label": "training", "prompt": "Ask for training",
                 "response": "Lift these stones every day.",
                 "requires": {"when": "flag", "key": "asked_wreck"},
                 "effects": [{"effect": "adjust_stat", "stat": "strength", "delta": 5}]}
            ],
            "interactions": {
                "give_fish": {
                    "text": "He devours the fish and unbars the gate.",
                    "effects": [
                        {"effect": "set_flag", "key": "gate_open"},
                        {"effect": "reclassify", "character": "hermit", "kind": "friendly"}
                    ]
                }
            }
        },
        "crab": {
            "name": "Giant Crab",
            "type": "aggressive",
            "stats": {"health": 15, "attack": 0, "critical_hit_chance": 0}
        },
        "wolf": {
            "name": "Grey Wolf",
            "type": "hostile",
            "stats": {"health": 30, "attack": 0, "critical_hit_chance": 0},
            "inventory": ["wolf_pelt"],
            "random_events": ["The wolf growls."]
        }
    },
    "story": {
        "intro": "You wake on a beach.",
        "victory_wolf": "The wolf will trouble no one again."
    }
}"#;

pub(crate) type TestSession = GameSession<Transcript, ScriptedInput>;

/// A started session on the island with queued answers.
pub(crate) fn session(answers: &[&str]) -> TestSession {
    session_with(EngineConfig::default(), answers)
}

pub(crate) fn session_with(config: EngineConfig, answers: &[&str]) -> TestSession {
    let world = World::from_json(ISLAND).unwrap();
    let mut session = GameSession::new(
        world,
        config,
        Transcript::new(),
        ScriptedInput::new(answers.iter().copied()),
    );
    session.start().unwrap();
    session.presenter_mut().clear();
    session
}

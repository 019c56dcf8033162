//! Command parsing for player input.

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Look around the current scene.
    Explore,
    /// Look at or interact with something.
    Examine(String),
    /// Pick up an item.
    Take(String),
    /// Put down an item.
    Drop(String),
    /// Hand an item to a character.
    Give {
        /// Item name.
        item: String,
        /// Character name.
        character: String,
    },
    /// Start a fight.
    Fight(String),
    /// Leave through an exit.
    Exit(String),
    /// Use an item from the inventory.
    Use(String),
    /// Wear or wield an item.
    Equip(String),
    /// Take off an item.
    Unequip(String),
    /// Talk to a character.
    Talk(String),
    /// Combine two carried items.
    Combine(String, String),
    /// Build an item from its components.
    Craft(String),
    /// Repair a carried item.
    Repair(String),
    /// List carried and equipped items.
    Inventory,
    /// Show player stats.
    Stats,
    /// Show the scene's hint.
    Hint,
    /// List commands.
    Help,
    /// End the game.
    Quit,
    /// Input that matched no command.
    Unknown(String),
}

/// Verb synonyms for command parsing.
const EXPLORE_VERBS: &[&str] = &["explore", "look", "l", "search"];
const EXAMINE_VERBS: &[&str] = &["examine", "x", "inspect", "check", "open", "interact"];
const TAKE_VERBS: &[&str] = &["take", "get", "pick", "grab"];
const DROP_VERBS: &[&str] = &["drop", "discard"];
const GIVE_VERBS: &[&str] = &["give", "offer", "show"];
const FIGHT_VERBS: &[&str] = &["fight", "attack", "kill"];
const EXIT_VERBS: &[&str] = &["go", "exit", "enter", "leave", "walk", "move"];
const USE_VERBS: &[&str] = &["use", "eat", "drink", "apply"];
const EQUIP_VERBS: &[&str] = &["equip", "wear", "wield"];
const UNEQUIP_VERBS: &[&str] = &["unequip", "remove", "unwield"];
const TALK_VERBS: &[&str] = &["talk", "speak", "chat"];
const COMBINE_VERBS: &[&str] = &["combine", "merge"];
const CRAFT_VERBS: &[&str] = &["craft", "make", "build"];
const REPAIR_VERBS: &[&str] = &["repair", "fix"];
const INVENTORY_VERBS: &[&str] = &["inventory", "inv", "i", "items"];
const STATS_VERBS: &[&str] = &["stats", "status", "health"];
const HELP_VERBS: &[&str] = &["help", "h", "?", "commands"];
const QUIT_VERBS: &[&str] = &["quit", "q"];

/// Filler words dropped after the verb.
const FILLER: &[&str] = &["the", "a", "an", "at", "to", "with", "up", "through", "on"];

/// Parse a player input string into an intent.
pub fn parse_intent(input: &str) -> Intent {
    let input = input.trim();
    if input.is_empty() {
        return Intent::Explore;
    }

    let words: Vec<&str> = input.split_whitespace().collect();
    let verb = words[0].to_lowercase();
    let rest = &words[1..];
    let is = |verbs: &[&str]| verbs.contains(&verb.as_str());

    if is(EXPLORE_VERBS) {
        return match object(rest) {
            Some(target) => Intent::Examine(target),
            None => Intent::Explore,
        };
    }
    if is(INVENTORY_VERBS) {
        return Intent::Inventory;
    }
    if is(STATS_VERBS) {
        return Intent::Stats;
    }
    if verb == "hint" {
        return Intent::Hint;
    }
    if is(HELP_VERBS) {
        return Intent::Help;
    }
    if is(QUIT_VERBS) {
        return Intent::Quit;
    }
    if is(GIVE_VERBS) {
        return parse_pair(rest, &["to"])
            .map(|(item, character)| Intent::Give { item, character })
            .unwrap_or_else(|| Intent::Unknown(input.to_string()));
    }
    if is(COMBINE_VERBS) {
        return parse_pair(rest, &["with", "and"])
            .map(|(a, b)| Intent::Combine(a, b))
            .unwrap_or_else(|| Intent::Unknown(input.to_string()));
    }
    if is(REPAIR_VERBS) {
        // "repair radio with cells": the tool is implied by the item.
        let item_words = split_at_any(rest, &["with", "using"]).map_or(rest, |(head, _)| head);
        return object(item_words)
            .map(Intent::Repair)
            .unwrap_or_else(|| Intent::Unknown(input.to_string()));
    }

    let single: &[(&[&str], fn(String) -> Intent)] = &[
        (EXAMINE_VERBS, Intent::Examine),
        (TAKE_VERBS, Intent::Take),
        (DROP_VERBS, Intent::Drop),
        (FIGHT_VERBS, Intent::Fight),
        (EXIT_VERBS, Intent::Exit),
        (USE_VERBS, Intent::Use),
        (EQUIP_VERBS, Intent::Equip),
        (UNEQUIP_VERBS, Intent::Unequip),
        (TALK_VERBS, Intent::Talk),
        (CRAFT_VERBS, Intent::Craft),
    ];
    for (verbs, make) in single {
        if is(verbs) {
            return object(rest)
                .map(*make)
                .unwrap_or_else(|| Intent::Unknown(input.to_string()));
        }
    }

    Intent::Unknown(input.to_string())
}

/// Join the words after the verb, skipping leading filler.
fn object(words: &[&str]) -> Option<String> {
    let start = words
        .iter()
        .position(|w| !FILLER.contains(&w.to_lowercase().as_str()))?;
    Some(words[start..].join(" "))
}

/// Split `words` at the first separator.
fn split_at_any<'a>(
    words: &'a [&'a str],
    separators: &[&str],
) -> Option<(&'a [&'a str], &'a [&'a str])> {
    let pos = words
        .iter()
        .position(|w| separators.contains(&w.to_lowercase().as_str()))?;
    Some((&words[..pos], &words[pos + 1..]))
}

/// Parse "X <sep> Y" into two objects.
fn parse_pair(words: &[&str], separators: &[&str]) -> Option<(String, String)> {
    let (left, right) = split_at_any(words, separators)?;
    Some((object(left)?, object(right)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explore_and_examine() {
        assert_eq!(parse_intent(""), Intent::Explore);
        assert_eq!(parse_intent("look"), Intent::Explore);
        assert_eq!(parse_intent("look at the locker"), Intent::Examine("locker".into()));
        assert_eq!(parse_intent("x Safe"), Intent::Examine("Safe".into()));
        assert_eq!(parse_intent("open metal locker"), Intent::Examine("metal locker".into()));
    }

    #[test]
    fn item_verbs() {
        assert_eq!(parse_intent("pick up the stick"), Intent::Take("stick".into()));
        assert_eq!(parse_intent("drop stone"), Intent::Drop("stone".into()));
        assert_eq!(parse_intent("wear jacket"), Intent::Equip("jacket".into()));
        assert_eq!(parse_intent("unequip jacket"), Intent::Unequip("jacket".into()));
        assert_eq!(parse_intent("eat berries"), Intent::Use("berries".into()));
        assert_eq!(parse_intent("craft stone axe"), Intent::Craft("stone axe".into()));
    }

    #[test]
    fn two_object_commands() {
        assert_eq!(
            parse_intent("give fish to the old hermit"),
            Intent::Give {
                item: "fish".into(),
                character: "old hermit".into()
            }
        );
        assert_eq!(
            parse_intent("combine stick with stone"),
            Intent::Combine("stick".into(), "stone".into())
        );
        assert_eq!(
            parse_intent("repair communicator with energy cells"),
            Intent::Repair("communicator".into())
        );
        assert_eq!(parse_intent("give fish"), Intent::Unknown("give fish".into()));
    }

    #[test]
    fn movement_and_people() {
        assert_eq!(parse_intent("go through the hatch"), Intent::Exit("hatch".into()));
        assert_eq!(parse_intent("talk to hermit"), Intent::Talk("hermit".into()));
        assert_eq!(parse_intent("attack wolf"), Intent::Fight("wolf".into()));
    }

    #[test]
    fn bare_commands() {
        assert_eq!(parse_intent("i"), Intent::Inventory);
        assert_eq!(parse_intent("stats"), Intent::Stats);
        assert_eq!(parse_intent("hint"), Intent::Hint);
        assert_eq!(parse_intent("?"), Intent::Help);
        assert_eq!(parse_intent("quit"), Intent::Quit);
        assert_eq!(parse_intent("dance"), Intent::Unknown("dance".into()));
        assert_eq!(parse_intent("take"), Intent::Unknown("take".into()));
    }
}

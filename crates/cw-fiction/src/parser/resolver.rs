//! Name resolution for characters and exits.
//!
//! Items go through the registry's tiered matcher; characters and doors
//! are few per scene, so a simple exact-then-substring match is enough.

/// Outcome of resolving a typed name against candidate names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch<K> {
    /// Exactly one candidate matched.
    Found(K),
    /// Several candidates matched; their display names.
    Ambiguous(Vec<String>),
    /// Nothing matched.
    NotFound,
}

/// Resolve `input` against `(key, name)` pairs, ignoring case.
///
/// An exact name match wins outright. Otherwise every name containing the
/// input is a hit.
pub fn resolve_name<K: Clone>(
    input: &str,
    candidates: impl IntoIterator<Item = (K, String)>,
) -> NameMatch<K> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return NameMatch::NotFound;
    }
    let candidates: Vec<(K, String)> = candidates.into_iter().collect();

    let exact: Vec<&(K, String)> = candidates
        .iter()
        .filter(|(_, name)| name.to_lowercase() == needle)
        .collect();
    if let [(key, _)] = exact.as_slice() {
        return NameMatch::Found(key.clone());
    }

    let hits: Vec<&(K, String)> = candidates
        .iter()
        .filter(|(_, name)| name.to_lowercase().contains(&needle))
        .collect();
    match hits.as_slice() {
        [] => NameMatch::NotFound,
        [(key, _)] => NameMatch::Found(key.clone()),
        many => NameMatch::Ambiguous(many.iter().map(|(_, name)| name.clone()).collect()),
    }
}

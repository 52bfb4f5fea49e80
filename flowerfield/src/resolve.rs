//! Picking the kind a record encodes, by counting shared keys.

use alloc::sync::Arc;
use std::collections::BTreeSet;

use flowerfield_value::VObject;

use crate::{FieldSuggestion, Kind, KindId, Registry, SchemeError, debug, trace};

impl Registry {
    /// Selects the kind under `target` that `record` most likely encodes.
    ///
    /// When `target` is a category root, every kind declared under it is
    /// scored by [`Kind::overlap`] and the highest score wins. On a tie the
    /// kind declared first wins, so the result only depends on declaration
    /// order and the record's key set.
    ///
    /// A concrete kind is already known and is returned without scoring,
    /// even when the record shares no key with it (an all-`None` nested
    /// instance serializes to `{}`).
    ///
    /// Only key names are looked at; values are not checked here.
    pub fn resolve(&self, target: KindId, record: &VObject) -> Result<KindId, SchemeError> {
        self.resolve_among(&[target], record)
    }

    /// Like [`Registry::resolve`], over several targets at once. Each
    /// target is a kind or a category; all their candidates compete, and
    /// ties go to the earliest target, then the earliest-declared kind.
    ///
    /// A concrete target is selectable with an overlap of 0, so a record
    /// that no candidate scores falls back to the first concrete target.
    pub(crate) fn resolve_among(
        &self,
        targets: &[KindId],
        record: &VObject,
    ) -> Result<KindId, SchemeError> {
        if let [target] = targets {
            let kind = self.kind(*target)?;
            if !kind.is_category() {
                debug!(kind = %kind.qualified_name(), "concrete kind, nothing to resolve");
                return Ok(kind.id());
            }
        }

        let mut best: Option<&Kind> = None;
        let mut best_score = 0;

        for &target in targets {
            let root = self.kind(target)?;
            if !root.is_category() {
                if best.is_none() {
                    best = Some(root);
                }
                let score = root.overlap(record);
                trace!(candidate = %root.qualified_name(), score, "scored concrete target");
                if score > best_score {
                    best = Some(root);
                    best_score = score;
                }
                continue;
            }
            for candidate in self.candidates(root) {
                let score = candidate.overlap(record);
                trace!(
                    candidate = %candidate.qualified_name(),
                    score,
                    "scored candidate"
                );
                if score > best_score {
                    best = Some(candidate);
                    best_score = score;
                }
            }
        }

        match best {
            Some(kind) => {
                debug!(
                    kind = %kind.qualified_name(),
                    overlap = best_score,
                    "resolved scheme"
                );
                Ok(kind.id())
            }
            None => Err(self.no_match(targets, record)),
        }
    }

    /// The kinds competing for `target`: its members if it is a category,
    /// otherwise the kind itself.
    fn candidates<'a>(&'a self, target: &'a Arc<Kind>) -> Vec<&'a Arc<Kind>> {
        if target.is_category() {
            self.members(target.id())
                .iter()
                .filter_map(|id| self.get(*id))
                .collect()
        } else {
            vec![target]
        }
    }

    fn no_match(&self, targets: &[KindId], record: &VObject) -> SchemeError {
        let roots: Vec<&Arc<Kind>> = targets.iter().filter_map(|id| self.get(*id)).collect();
        let scheme = roots
            .iter()
            .map(|kind| kind.qualified_name())
            .collect::<Vec<_>>()
            .join(" | ");

        let known: BTreeSet<&str> = roots
            .iter()
            .flat_map(|root| self.candidates(*root))
            .flat_map(|kind| kind.known_keys())
            .collect();
        let input_keys: Vec<String> = record.keys().cloned().collect();
        let unknown: Vec<&str> = input_keys
            .iter()
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect();
        let suggestions = compute_suggestions(&unknown, &known);

        debug!(%scheme, ?input_keys, "no kind matches");
        SchemeError::NoMatchingScheme {
            scheme,
            input_keys,
            suggestions,
        }
    }
}

/// Compute "did you mean?" suggestions for keys no candidate declares.
#[cfg(feature = "suggestions")]
fn compute_suggestions(unknown: &[&str], known: &BTreeSet<&str>) -> Vec<FieldSuggestion> {
    const SIMILARITY_THRESHOLD: f64 = 0.8;

    let mut suggestions = Vec::new();

    for &key in unknown {
        let mut best_match: Option<(&str, f64)> = None;

        for &candidate in known {
            let similarity = strsim::jaro_winkler(key, candidate);
            if similarity >= SIMILARITY_THRESHOLD
                && best_match.is_none_or(|(_, best_sim)| similarity > best_sim)
            {
                best_match = Some((candidate, similarity));
            }
        }

        if let Some((suggestion, similarity)) = best_match {
            suggestions.push(FieldSuggestion {
                unknown: key.to_owned(),
                suggestion: suggestion.to_owned(),
                similarity,
            });
        }
    }

    suggestions
}

/// Compute "did you mean?" suggestions (no-op without strsim).
#[cfg(not(feature = "suggestions"))]
fn compute_suggestions(_unknown: &[&str], _known: &BTreeSet<&str>) -> Vec<FieldSuggestion> {
    Vec::new()
}

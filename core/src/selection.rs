use std::collections::HashMap;

use crate::validator::Validator;

/// The validators a nominator currently intends to back, keyed by stash id.
///
/// The map has no order of its own; callers that need one derive it from the
/// validator list with [`SelectionMap::ordered_in`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionMap {
    validators: HashMap<String, Validator>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stash_id: impl Into<String>, validator: Validator) -> Option<Validator> {
        self.validators.insert(stash_id.into(), validator)
    }

    pub fn remove(&mut self, stash_id: &str) -> Option<Validator> {
        self.validators.remove(stash_id)
    }

    /// Select the validator if absent, deselect it otherwise. Returns whether
    /// it is selected afterwards.
    pub fn toggle(&mut self, validator: &Validator) -> bool {
        if self.remove(&validator.stash_id).is_some() {
            false
        } else {
            self.add(validator.stash_id.clone(), validator.clone());
            true
        }
    }

    pub fn contains(&self, stash_id: &str) -> bool {
        self.validators.contains_key(stash_id)
    }

    pub fn get(&self, stash_id: &str) -> Option<&Validator> {
        self.validators.get(stash_id)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn stash_ids(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    /// Selected validators in the order they appear in `validators`, as the
    /// list's own records
    pub fn ordered_in(&self, validators: &[Validator]) -> Vec<Validator> {
        validators
            .iter()
            .filter(|v| self.contains(&v.stash_id))
            .cloned()
            .collect()
    }

    /// Drop selected validators missing from `validators` and refresh the
    /// rest from it, returning how many were removed
    pub fn retain_known(&mut self, validators: &[Validator]) -> usize {
        let known: HashMap<&str, &Validator> = validators
            .iter()
            .map(|v| (v.stash_id.as_str(), v))
            .collect();
        let before = self.validators.len();
        self.validators.retain(|stash_id, selected| {
            match known.get(stash_id.as_str()) {
                Some(current) => {
                    *selected = (*current).clone();
                    true
                }
                None => false,
            }
        });
        before - self.validators.len()
    }
}

impl FromIterator<Validator> for SelectionMap {
    fn from_iter<I: IntoIterator<Item = Validator>>(iter: I) -> Self {
        Self {
            validators: iter
                .into_iter()
                .map(|v| (v.stash_id.clone(), v))
                .collect(),
        }
    }
}

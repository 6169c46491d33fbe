// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered name-unique environments

use crate::value::Value;
use indexmap::IndexMap;

/// Ordered mapping from dotted name to a bound item.
///
/// Binding an existing name replaces it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for Bindings<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Bindings<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the previous binding if any
    pub fn bind(&mut self, name: impl Into<String>, item: T) -> Option<T> {
        self.entries.insert(name.into(), item)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.entries.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Bindings whose names are absent from `other`
    pub fn subtract<U>(&self, other: &Bindings<U>) -> Bindings<T>
    where
        T: Clone,
    {
        self.iter()
            .filter(|(name, _)| !other.contains(name))
            .map(|(name, item)| (name.to_string(), item.clone()))
            .collect()
    }

    /// Prefix every name with `namespace.`
    pub fn qualify(self, namespace: &str) -> Bindings<T> {
        self.entries
            .into_iter()
            .map(|(name, item)| (format!("{}.{}", namespace, name), item))
            .collect()
    }
}

impl<T> FromIterator<(String, T)> for Bindings<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Bindings<T> {
    type Item = (String, T);
    type IntoIter = indexmap::map::IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Bindings<Value> {
    /// JSON object of the bound values, names optionally qualified
    pub fn to_json(&self, namespace: Option<&str>) -> serde_json::Map<String, serde_json::Value> {
        self.iter()
            .map(|(name, value)| {
                let key = match namespace {
                    Some(ns) if !ns.is_empty() => format!("{}.{}", ns, name),
                    _ => name.to_string(),
                };
                (key, value.to_json())
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

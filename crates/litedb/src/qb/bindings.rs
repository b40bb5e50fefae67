//! Ordered named-binding storage for one in-progress statement.

use crate::value::Value;

/// One named placeholder and the value bound to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

/// Ordered collection of bindings owned by a single build cycle.
#[derive(Clone, Debug, Default)]
pub struct BindingList {
    bindings: Vec<Binding>,
}

impl BindingList {
    /// Create a new empty binding list.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Append a binding.
    ///
    /// Dots are stripped from the name so a qualified `table.col` reference
    /// still forms a valid `:tablecol` parameter.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into().replace('.', "");
        self.bindings.push(Binding { name, value });
    }

    /// Get the current binding count.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Merge another list's bindings into this one, preserving order.
    pub fn extend(&mut self, other: BindingList) {
        self.bindings.extend(other.bindings);
    }

    /// View the bindings in insertion order.
    pub fn as_slice(&self) -> &[Binding] {
        &self.bindings
    }

    /// Hand the bindings over to the driver; called once at terminal time.
    pub fn drain(self) -> Vec<Binding> {
        self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_strips_dots() {
        let mut list = BindingList::new();
        list.push(":users.id0", Value::Integer(1));
        assert_eq!(list.as_slice()[0].name, ":usersid0");
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut a = BindingList::new();
        a.push(":x0", Value::Integer(1));
        let mut b = BindingList::new();
        b.push(":y1", Value::Integer(2));
        b.push(":z2", Value::Integer(3));
        a.extend(b);
        let names: Vec<&str> = a.as_slice().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, [":x0", ":y1", ":z2"]);
    }
}

//! Record Filters
//!
//! Equality and set-membership conditions plus an optional ordering.
//! Evaluated directly against entities by the in-memory store and
//! compiled to a WHERE clause by the SQLite store.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FieldValue {
    fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            // Mixed types never occur for one column; keep the sort total anyway
            (Bool(_), _) => Ordering::Less,
            (Int(_), Bool(_)) => Ordering::Greater,
            (Int(_), Text(_)) => Ordering::Less,
            (Text(_), _) => Ordering::Greater,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(&'static str, FieldValue),
    In(&'static str, Vec<FieldValue>),
}

impl Condition {
    pub fn column(&self) -> &'static str {
        match self {
            Condition::Eq(column, _) | Condition::In(column, _) => column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

/// Conjunction of conditions with an optional sort
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
    pub order_by: Option<OrderBy>,
}

impl Filter {
    /// Matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition::Eq(column, value.into()));
        self
    }

    pub fn is_in<V: Into<FieldValue>>(
        mut self,
        column: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push(Condition::In(column, values));
        self
    }

    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order_by = Some(OrderBy { column, descending: false });
        self
    }

    pub fn order_by_desc(mut self, column: &'static str) -> Self {
        self.order_by = Some(OrderBy { column, descending: true });
        self
    }

    /// Evaluate the conditions against an entity
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Eq(column, expected) => entity.field(column).as_ref() == Some(expected),
            Condition::In(column, values) => entity
                .field(column)
                .map(|actual| values.contains(&actual))
                .unwrap_or(false),
        })
    }

    /// Stable sort by the requested column; no-op without an ordering
    pub fn sort<T: Entity>(&self, records: &mut [T]) {
        if let Some(order) = self.order_by {
            records.sort_by(|a, b| {
                let a = a.field(order.column).unwrap_or(FieldValue::Null);
                let b = b.field(order.column).unwrap_or(FieldValue::Null);
                let ord = a.compare(&b);
                if order.descending { ord.reverse() } else { ord }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, List};

    #[test]
    fn test_eq_and_in_conditions() {
        let mut todo = List::new(1, "Todo".to_string());
        todo.id = 10;
        let mut done = List::new(2, "Done".to_string());
        done.id = 11;

        assert!(Filter::all().eq("board_id", 1u32).matches(&todo));
        assert!(!Filter::all().eq("board_id", 1u32).matches(&done));
        assert!(Filter::all().is_in("id", [10u32, 11]).matches(&done));
        assert!(!Filter::all().is_in("id", Vec::<u32>::new()).matches(&done));
    }

    #[test]
    fn test_unknown_column_never_matches() {
        let list = List::new(1, "Todo".to_string());
        assert!(!Filter::all().eq("nope", 1u32).matches(&list));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut cards: Vec<Card> = (0..4)
            .map(|i| {
                let mut card = Card::new(1, format!("Card {}", i), None);
                card.id = i + 1;
                card.order = if i < 2 { 5 } else { 1 };
                card
            })
            .collect();

        Filter::all().order_by("order").sort(&mut cards);
        let ids: Vec<u32> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);

        Filter::all().order_by_desc("id").sort(&mut cards);
        let ids: Vec<u32> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }
}

//! Sort/filter engine: a pure derivation of the displayed rows from the
//! authoritative list, a free-text query and a sort state.
//!
//! Nothing here is incremental; every call recomputes the projection from
//! scratch, which is fine at back-office list sizes.

use std::cmp::Ordering;
use std::fmt;

use crate::models::{Customer, CustomerField, Order, OrderField, Service, ServiceField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Active sort column and direction. No field means list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub field: Option<F>,
    pub direction: SortDirection,
}

impl<F> Default for SortState<F> {
    fn default() -> Self {
        Self {
            field: None,
            direction: SortDirection::Asc,
        }
    }
}

impl<F: Copy + PartialEq> SortState<F> {
    pub fn by(field: F, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Column-header click: the active field flips direction, any other
    /// field becomes active ascending.
    pub fn toggle(&mut self, field: F) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Asc;
        }
    }
}

/// A field value as seen by the comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    /// The entity has no value for this field.
    Missing,
}

/// Row types the engine can filter and sort.
pub trait Projectable {
    type Field: Copy + PartialEq + fmt::Debug;

    /// Fields matched by free-text search, or `None` when the list has no
    /// search wired up (the query is then ignored).
    fn search_fields(&self) -> Option<Vec<&str>> {
        None
    }

    fn sort_value(&self, field: Self::Field) -> SortValue<'_>;
}

/// Locale-style text comparison: case-insensitive first, then lower case
/// before upper case, then raw code points.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            // Lower-case first at the first differing character.
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map(|(x, y)| y.is_lowercase().cmp(&x.is_lowercase()))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

/// Ascending order of two values. Text against text and number against
/// number compare by value; missing values sort after present ones.
/// Mixed text/number pairs do not participate and compare equal.
pub fn compare_values(a: SortValue<'_>, b: SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Text(x), SortValue::Text(y)) => compare_text(x, y),
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(&y),
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) => Ordering::Greater,
        (_, SortValue::Missing) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Whether `item` passes a free-text `query`.
pub fn matches<T: Projectable>(item: &T, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    match item.search_fields() {
        Some(fields) => fields.iter().any(|f| f.to_lowercase().contains(&needle)),
        None => true,
    }
}

/// Derive the displayed rows.
///
/// The result only ever contains items from `items`, each at most once.
/// Sorting is stable, so projecting an already projected list with the same
/// state returns it unchanged.
pub fn project<T: Projectable + Clone>(items: &[T], query: &str, sort: &SortState<T::Field>) -> Vec<T> {
    let mut rows: Vec<T> = items.iter().filter(|i| matches(*i, query)).cloned().collect();
    if let Some(field) = sort.field {
        rows.sort_by(|a, b| {
            let (x, y) = (a.sort_value(field), b.sort_value(field));
            let ord = compare_values(x, y);
            // Missing values stay last in both directions.
            let either_missing = matches!(x, SortValue::Missing) || matches!(y, SortValue::Missing);
            match sort.direction {
                SortDirection::Desc if !either_missing => ord.reverse(),
                _ => ord,
            }
        });
    }
    rows
}

fn opt_text(value: &Option<String>) -> SortValue<'_> {
    value.as_deref().map_or(SortValue::Missing, SortValue::Text)
}

impl Projectable for Customer {
    type Field = CustomerField;

    // Customer search input is inert: no `search_fields`.

    fn sort_value(&self, field: CustomerField) -> SortValue<'_> {
        match field {
            CustomerField::Id => SortValue::Number(self.id as f64),
            CustomerField::Name => SortValue::Text(&self.name),
            CustomerField::Email => SortValue::Text(&self.email),
            CustomerField::Phone => SortValue::Text(&self.phone),
        }
    }
}

impl Projectable for Order {
    type Field = OrderField;

    fn search_fields(&self) -> Option<Vec<&str>> {
        Some(vec![
            self.id.as_str(),
            self.customer_name.as_str(),
            self.service.as_deref().unwrap_or(""),
        ])
    }

    fn sort_value(&self, field: OrderField) -> SortValue<'_> {
        match field {
            OrderField::Id => SortValue::Text(&self.id),
            OrderField::CustomerName => SortValue::Text(&self.customer_name),
            OrderField::CustomerPhone => SortValue::Text(&self.customer_phone),
            OrderField::Service => opt_text(&self.service),
            OrderField::PickupDate => opt_text(&self.pickup_date),
            OrderField::Total => SortValue::Number(self.total),
        }
    }
}

impl Projectable for Service {
    type Field = ServiceField;

    fn sort_value(&self, field: ServiceField) -> SortValue<'_> {
        match field {
            ServiceField::Id => SortValue::Text(&self.id),
            ServiceField::Name => SortValue::Text(&self.name),
            ServiceField::Price => SortValue::Number(self.price),
            ServiceField::Duration => opt_text(&self.duration),
            ServiceField::Status => SortValue::Text(&self.status),
            ServiceField::UsageCount => SortValue::Number(self.usage_count as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn order(id: &str, customer: &str, service: Option<&str>, total: f64) -> Order {
        Order {
            id: id.to_string(),
            customer_name: customer.to_string(),
            customer_phone: "555".to_string(),
            service: service.map(str::to_string),
            service_id: None,
            special_instructions: None,
            pickup_date: None,
            total,
            created_at: None,
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order("a1", "Zara", Some("Laundry"), 300.0),
            order("b2", "amit", Some("Dry Cleaning"), 120.0),
            order("c3", "Bina", None, 450.5),
            order("d4", "Amit", Some("Ironing"), 120.0),
        ]
    }

    fn ids(rows: &[Order]) -> Vec<&str> {
        rows.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn empty_query_and_no_sort_is_identity() {
        let list = sample();
        assert_eq!(project(&list, "", &SortState::default()), list);
    }

    #[test]
    fn filter_is_case_insensitive_over_id_customer_and_service() {
        let list = sample();
        let none = SortState::default();
        assert_eq!(ids(&project(&list, "AMIT", &none)), vec!["b2", "d4"]);
        assert_eq!(ids(&project(&list, "clean", &none)), vec!["b2"]);
        assert_eq!(ids(&project(&list, "C3", &none)), vec!["c3"]);
        assert!(project(&list, "zzz", &none).is_empty());
    }

    #[test]
    fn filtered_rows_are_a_subset_without_duplicates() {
        let list = sample();
        for q in ["", "a", "i", "laundry", "1", "x"] {
            let rows = project(&list, q, &SortState::by(OrderField::Total, SortDirection::Desc));
            let unique: HashSet<_> = rows.iter().map(|o| &o.id).collect();
            assert_eq!(unique.len(), rows.len());
            for row in &rows {
                assert!(list.contains(row));
                assert!(matches(row, q));
            }
        }
    }

    #[test]
    fn numeric_sort_both_directions() {
        let list = sample();
        let asc = project(&list, "", &SortState::by(OrderField::Total, SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["b2", "d4", "a1", "c3"]);
        let desc = project(&list, "", &SortState::by(OrderField::Total, SortDirection::Desc));
        // Ties keep list order in both directions.
        assert_eq!(ids(&desc), vec!["c3", "a1", "b2", "d4"]);
    }

    #[test]
    fn text_sort_is_case_insensitive_lower_first() {
        let list = sample();
        let rows = project(&list, "", &SortState::by(OrderField::CustomerName, SortDirection::Asc));
        assert_eq!(ids(&rows), vec!["b2", "d4", "c3", "a1"]);
    }

    #[test]
    fn missing_values_sort_last() {
        let list = sample();
        let rows = project(&list, "", &SortState::by(OrderField::Service, SortDirection::Asc));
        assert_eq!(ids(&rows), vec!["b2", "d4", "a1", "c3"]);
        let rows = project(&list, "", &SortState::by(OrderField::Service, SortDirection::Desc));
        assert_eq!(ids(&rows), vec!["a1", "d4", "b2", "c3"]);
    }

    #[test]
    fn resorting_is_idempotent() {
        let list = sample();
        for field in [OrderField::Id, OrderField::CustomerName, OrderField::Service, OrderField::Total] {
            for dir in [SortDirection::Asc, SortDirection::Desc] {
                let state = SortState::by(field, dir);
                let once = project(&list, "", &state);
                let twice = project(&once, "", &state);
                assert_eq!(once, twice, "{:?} {:?}", field, dir);
            }
        }
    }

    #[test]
    fn toggle_same_field_flips_and_returns() {
        let mut state = SortState::default();
        state.toggle(OrderField::Total);
        assert_eq!(state, SortState::by(OrderField::Total, SortDirection::Asc));
        state.toggle(OrderField::Total);
        assert_eq!(state.direction, SortDirection::Desc);
        state.toggle(OrderField::Total);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn toggle_other_field_starts_ascending() {
        let mut state = SortState::by(OrderField::Total, SortDirection::Desc);
        state.toggle(OrderField::Id);
        assert_eq!(state, SortState::by(OrderField::Id, SortDirection::Asc));
    }

    #[test]
    fn customer_query_is_ignored() {
        let customers = vec![
            Customer {
                id: 2,
                name: "Bea".into(),
                email: "b@x.com".into(),
                phone: "2".into(),
                created_at: None,
            },
            Customer {
                id: 1,
                name: "Al".into(),
                email: "a@x.com".into(),
                phone: "1".into(),
                created_at: None,
            },
        ];
        let rows = project(&customers, "nothing matches this", &SortState::default());
        assert_eq!(rows.len(), 2);
        let sorted = project(&customers, "", &SortState::by(CustomerField::Id, SortDirection::Asc));
        assert_eq!(sorted[0].id, 1);
    }

    #[test]
    fn compare_text_orders() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("a", "A"), Ordering::Less);
        assert_eq!(compare_text("A", "a"), Ordering::Greater);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn mixed_kinds_compare_equal() {
        assert_eq!(
            compare_values(SortValue::Text("1"), SortValue::Number(1.0)),
            Ordering::Equal
        );
    }
}

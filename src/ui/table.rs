//! Column-aligned tables for the list screens.

use console::{Alignment, measure_text_width, pad_str, style};

use crate::models::{Customer, CustomerField, Order, OrderField, Service, ServiceField};
use crate::view::{SortDirection, SortState};

/// A plain text table. Cells are padded to the widest value per column.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let w = measure_text_width(cell);
                match widths.get_mut(i) {
                    Some(slot) => *slot = (*slot).max(w),
                    None => widths.push(w),
                }
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .enumerate()
                .map(|(i, c)| pad_str(c, widths[i], Alignment::Left, None).into_owned())
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&style(line(&self.headers)).bold().to_string());
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

/// Header label with an arrow when `field` is the active sort column.
fn header<F: Copy + PartialEq>(label: &str, field: F, sort: &SortState<F>) -> String {
    match (sort.field, sort.direction) {
        (Some(active), SortDirection::Asc) if active == field => format!("{} ▲", label),
        (Some(active), SortDirection::Desc) if active == field => format!("{} ▼", label),
        _ => label.to_string(),
    }
}

pub fn money(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn customers_table(rows: &[Customer], sort: &SortState<CustomerField>) -> Table {
    use CustomerField as F;
    let mut table = Table::new([
        header("ID", F::Id, sort),
        header("Name", F::Name, sort),
        header("Email", F::Email, sort),
        header("Phone", F::Phone, sort),
    ]);
    for c in rows {
        table.push(vec![
            c.id.to_string(),
            c.name.clone(),
            c.email.clone(),
            or_dash(Some(&c.phone)),
        ]);
    }
    table
}

pub fn orders_table(rows: &[Order], sort: &SortState<OrderField>) -> Table {
    use OrderField as F;
    let mut table = Table::new([
        header("Order", F::Id, sort),
        header("Customer", F::CustomerName, sort),
        header("Phone", F::CustomerPhone, sort),
        header("Service", F::Service, sort),
        header("Pickup", F::PickupDate, sort),
        header("Total", F::Total, sort),
    ]);
    for o in rows {
        table.push(vec![
            o.id.clone(),
            o.customer_name.clone(),
            or_dash(Some(&o.customer_phone)),
            or_dash(o.service.as_deref()),
            or_dash(o.pickup_date.as_deref()),
            money(o.total),
        ]);
    }
    table
}

pub fn services_table(rows: &[Service], sort: &SortState<ServiceField>) -> Table {
    use ServiceField as F;
    let mut table = Table::new([
        header("ID", F::Id, sort),
        header("Name", F::Name, sort),
        header("Price", F::Price, sort),
        header("Duration", F::Duration, sort),
        header("Status", F::Status, sort),
        header("Orders", F::UsageCount, sort),
    ]);
    for s in rows {
        table.push(vec![
            s.id.clone(),
            s.name.clone(),
            money(s.price),
            or_dash(s.duration.as_deref()),
            s.status.clone(),
            s.usage_count.to_string(),
        ]);
    }
    table
}

/// Multi-line details block for a single order.
pub fn order_details(order: &Order) -> String {
    let fields = [
        ("Order", order.id.clone()),
        ("Customer", order.customer_name.clone()),
        ("Phone", or_dash(Some(&order.customer_phone))),
        ("Service", or_dash(order.service.as_deref())),
        ("Pickup", or_dash(order.pickup_date.as_deref())),
        ("Total", money(order.total)),
        ("Instructions", or_dash(order.special_instructions.as_deref())),
        ("Created", or_dash(order.created_at.as_deref())),
    ];
    fields
        .iter()
        .map(|(k, v)| format!("{:>13}  {}", style(k).dim(), v))
        .collect::<Vec<_>>()
        .join("\n")
}

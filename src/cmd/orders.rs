//! Order commands, `fabclean-admin orders`.

use anyhow::{Result, bail};
use console::style;

use fabclean_admin::config::AdminConfig;
use fabclean_admin::models::NewOrder;
use fabclean_admin::pages::OrdersPage;
use fabclean_admin::ui::{self, icons::BASKET};

use super::super::{Cli, OrdersCommands};
use super::{apply_sort, confirm, connect, notifier, print_json, settle};

pub async fn cmd_orders(config: &AdminConfig, cli: &Cli, command: OrdersCommands) -> Result<()> {
    let gateway = connect(config)?;
    let (notifier, mut rx) = notifier();
    let mut page = OrdersPage::new(gateway, notifier, config.reconcile().orders);

    match command {
        OrdersCommands::List(args) => {
            if let Some(q) = &args.search {
                page.search = q.clone();
            }
            apply_sort(&mut page.sort, &args)?;

            let spinner = ui::loading("Loading orders...");
            let loaded = page.mount().await;
            spinner.finish_and_clear();
            settle(&mut rx, loaded)?;

            let rows = page.displayed();
            if args.json {
                return print_json(&rows);
            }
            println!();
            println!(
                "{}Orders: {} shown of {}",
                BASKET,
                style(rows.len()).bold(),
                page.list().len()
            );
            println!();
            if rows.is_empty() {
                println!("No orders match.");
            } else {
                print!("{}", ui::orders_table(&rows, &page.sort).render());
            }
        }
        OrdersCommands::Show { id } => {
            let loaded = page.mount().await;
            settle(&mut rx, loaded)?;
            match page.view(&id) {
                Some(order) => println!("{}", ui::order_details(&order)),
                None => bail!("Order {} not found", id),
            }
        }
        OrdersCommands::Add {
            customer_name,
            customer_phone,
            service_id,
            total,
            pickup_date,
            instructions,
        } => {
            page.create.open();
            page.create.form = NewOrder {
                customer_name,
                customer_phone,
                service_id,
                total,
                pickup_date: pickup_date.unwrap_or_default(),
                special_instructions: instructions.unwrap_or_default(),
            };
            let result = page.create_order().await;
            settle(&mut rx, result)?;
        }
        OrdersCommands::Edit {
            id,
            pickup_date,
            total,
            instructions,
        } => {
            let loaded = page.mount().await;
            settle(&mut rx, loaded)?;
            if !page.open_edit(&id) {
                bail!("Order {} not found", id);
            }
            if let Some(draft) = page.edit.draft_mut() {
                if let Some(date) = pickup_date {
                    draft.pickup_date = Some(date).filter(|d| !d.is_empty());
                }
                if let Some(total) = total {
                    draft.total = total;
                }
                if let Some(text) = instructions {
                    draft.special_instructions = Some(text).filter(|t| !t.is_empty());
                }
            }
            let result = page.save_edit().await;
            settle(&mut rx, result)?;
        }
        OrdersCommands::Delete { id } => {
            let loaded = page.mount().await;
            settle(&mut rx, loaded)?;
            let Some(order) = page.view(&id) else {
                bail!("Order {} not found", id);
            };

            page.request_delete(id.clone());
            let prompt = format!(
                "Delete order {} for {} ({})?",
                order.id,
                order.customer_name,
                ui::table::money(order.total)
            );
            if !confirm(prompt, cli.yes) {
                page.cancel_delete();
                println!("Deletion cancelled.");
                return Ok(());
            }
            let result = page.confirm_delete().await;
            settle(&mut rx, result)?;
        }
    }

    Ok(())
}

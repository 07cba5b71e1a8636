//! Customer commands, `fabclean-admin customers`.

use anyhow::{Result, bail};
use console::style;

use fabclean_admin::config::AdminConfig;
use fabclean_admin::models::NewCustomer;
use fabclean_admin::pages::CustomersPage;
use fabclean_admin::ui::{self, icons::PEOPLE};

use super::super::{Cli, CustomersCommands};
use super::{apply_sort, confirm, connect, notifier, print_json, settle};

pub async fn cmd_customers(config: &AdminConfig, cli: &Cli, command: CustomersCommands) -> Result<()> {
    let gateway = connect(config)?;
    let (notifier, mut rx) = notifier();
    let mut page = CustomersPage::new(gateway, notifier, config.reconcile().customers);

    match command {
        CustomersCommands::List(args) => {
            if let Some(q) = &args.search {
                page.search = q.clone();
            }
            apply_sort(&mut page.sort, &args)?;

            let spinner = ui::loading("Loading customers...");
            let loaded = page.mount().await;
            spinner.finish_and_clear();
            settle(&mut rx, loaded)?;

            let rows = page.displayed();
            if args.json {
                return print_json(&rows);
            }
            println!();
            println!("{}Total Customers: {}", PEOPLE, style(page.total()).bold());
            println!();
            if rows.is_empty() {
                println!("No customers yet.");
            } else {
                print!("{}", ui::customers_table(&rows, &page.sort).render());
            }
        }
        CustomersCommands::Add { name, email, phone } => {
            page.create.open();
            page.create.form = NewCustomer { name, email, phone };
            let result = page.create_customer().await;
            settle(&mut rx, result)?;
        }
        CustomersCommands::Edit {
            id,
            name,
            email,
            phone,
        } => {
            let loaded = page.mount().await;
            settle(&mut rx, loaded)?;
            if !page.open_edit(id) {
                bail!("Customer {} not found", id);
            }
            if let Some(draft) = page.edit.draft_mut() {
                if let Some(name) = name {
                    draft.name = name;
                }
                if let Some(email) = email {
                    draft.email = email;
                }
                if let Some(phone) = phone {
                    draft.phone = phone;
                }
            }
            let result = page.save_edit().await;
            settle(&mut rx, result)?;
        }
        CustomersCommands::Delete { id } => {
            let loaded = page.mount().await;
            settle(&mut rx, loaded)?;
            let Some(customer) = page.list().get(&id) else {
                bail!("Customer {} not found", id);
            };

            page.request_delete(id);
            let prompt = format!("Delete customer {} ({})?", customer.name, customer.email);
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

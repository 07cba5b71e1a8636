//! Service catalog commands, `fabclean-admin services`.

use anyhow::{Result, bail};

use fabclean_admin::config::AdminConfig;
use fabclean_admin::models::NewService;
use fabclean_admin::pages::ServicesPage;
use fabclean_admin::ui::{self, icons::TAG};

use super::super::{Cli, ServicesCommands};
use super::{apply_sort, confirm, connect, notifier, print_json, settle};

pub async fn cmd_services(config: &AdminConfig, cli: &Cli, command: ServicesCommands) -> Result<()> {
    let gateway = connect(config)?;
    let (notifier, mut rx) = notifier();
    let mut page = ServicesPage::new(gateway, notifier, config.reconcile().services);

    match command {
        ServicesCommands::List(args) => {
            if args.search.is_some() {
                tracing::debug!("services list has no search; ignoring --search");
            }
            apply_sort(&mut page.sort, &args)?;

            let spinner = ui::loading("Loading services...");
            let loaded = page.mount().await;
            spinner.finish_and_clear();
            settle(&mut rx, loaded)?;

            let rows = page.displayed();
            if args.json {
                return print_json(&rows);
            }
            println!();
            println!("{}Services: {}", TAG, rows.len());
            println!();
            if !rows.is_empty() {
                print!("{}", ui::services_table(&rows, &page.sort).render());
            }
        }
        ServicesCommands::Add {
            name,
            price,
            duration,
        } => {
            page.create.open();
            page.create.form = NewService {
                name,
                price,
                duration,
            };
            let result = page.create_service().await;
            settle(&mut rx, result)?;
        }
        ServicesCommands::Edit {
            id,
            name,
            price,
            duration,
            status,
        } => {
            let loaded = page.mount().await;
            settle(&mut rx, loaded)?;
            if !page.open_edit(&id) {
                bail!("Service {} not found", id);
            }
            if let Some(draft) = page.edit.draft_mut() {
                if let Some(name) = name {
                    draft.name = name;
                }
                if let Some(price) = price {
                    draft.price = price;
                }
                if let Some(duration) = duration {
                    draft.duration = Some(duration).filter(|d| !d.is_empty());
                }
                if let Some(status) = status {
                    draft.status = status;
                }
            }
            let result = page.save_edit().await;
            settle(&mut rx, result)?;
        }
        ServicesCommands::Delete { id } => {
            let loaded = page.mount().await;
            settle(&mut rx, loaded)?;
            let Some(service) = page.list().get(&id) else {
                bail!("Service {} not found", id);
            };

            page.request_delete(id.clone());
            if !confirm(format!("Delete service '{}'?", service.name), cli.yes) {
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

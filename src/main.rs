use prefix_table::config::Config;
use prefix_table::menu::MenuRegistry;
use prefix_table::store::JsonStore;
use prefix_table::write_report;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())?;
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let config = Config::from_env()?;
    let menus = MenuRegistry::with_defaults().visible_menus(&config.permissions);
    log::debug!(
        "Visible menus: {:?}",
        menus.iter().map(|m| m.label.as_str()).collect::<Vec<_>>()
    );

    let store = JsonStore::open(&config.data_file)?;
    let mut stdout = std::io::stdout().lock();
    let rows = write_report(&store, &config, &mut stdout)?;

    log::info!("#End main() rows={rows}");
    Ok(())
}

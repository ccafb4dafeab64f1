use clap::Parser;
use folio::core::config::{self, ResolvedConfig};
use folio::core::navigation::{Location, clamp_page};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "folio", about = "Search the Open Library catalog from the terminal")]
struct Args {
    /// Title to search for on startup
    #[arg(short, long)]
    query: Option<String>,

    /// Result page to open with --query
    #[arg(short, long, allow_negative_numbers = true)]
    page: Option<i64>,

    /// Open the detail page of a work, e.g. OL45804W
    #[arg(long, conflicts_with_all = ["query", "location"])]
    book: Option<String>,

    /// Start at a raw location such as "/?q=dune&page=2" or "/book/OL45804W"
    #[arg(long, conflicts_with = "query")]
    location: Option<String>,

    /// Catalog base URL (overrides config and FOLIO_CATALOG_URL)
    #[arg(long)]
    catalog_url: Option<String>,
}

impl Args {
    /// The location the session starts at. Query and page go through the
    /// same location sync as any other navigation.
    fn initial_location(&self) -> Location {
        if let Some(id) = &self.book {
            return Location::book(id);
        }
        if let Some(raw) = &self.location {
            return Location::parse(raw).unwrap_or_else(|e| {
                log::warn!("Ignoring --location {:?}: {}", raw, e);
                Location::root()
            });
        }
        match (&self.query, self.page) {
            (None, None) => Location::root(),
            (query, page) => Location::search(
                query.as_deref().unwrap_or_default(),
                clamp_page(page.unwrap_or(1), None),
            ),
        }
    }
}

fn init_logging(config: &ResolvedConfig) {
    // Writes to folio.log in the current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("folio.log") {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (config::FolioConfig::default(), Some(e)),
    };
    let resolved = config::resolve(&file_config, args.catalog_url.as_deref());

    init_logging(&resolved);
    if let Some(e) = config_error {
        log::warn!("Config error, using defaults: {}", e);
    }

    let initial = args.initial_location();
    log::info!(
        "Folio starting at {} (catalog: {}, page size {})",
        initial,
        resolved.catalog_base_url,
        resolved.page_size
    );

    folio::tui::run(resolved, initial)
}

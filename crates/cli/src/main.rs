use clap::{Parser, Subcommand};
use clinic_api_client::HttpClinicBackend;
use clinic_core::{
    config::api_base_url_from_env_value,
    constants::API_URL_ENV,
    search::split_list,
    table::{render_table, Emphasis},
    ClinicError, ClinicForm, DirectoryConfig, DirectoryView, FilterColumn, LookupField,
    SearchQuery, ServiceDraft,
};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic directory CLI")]
struct Cli {
    /// Backend origin (overrides CLINIC_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print raw JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Mark matches with [brackets] instead of colour
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Client-side filters applied to the listed rows.
#[derive(clap::Args, Default)]
struct RowFilters {
    /// Filter by clinic ID
    #[arg(long)]
    id: Option<String>,
    /// Filter by clinic name
    #[arg(long)]
    name: Option<String>,
    /// Filter by doctor name
    #[arg(long)]
    doctor: Option<String>,
    /// Filter by address
    #[arg(long)]
    address: Option<String>,
    /// Filter by phone (punctuation ignored)
    #[arg(long)]
    phone: Option<String>,
    /// Filter by service name
    #[arg(long)]
    service: Option<String>,
    /// Search term matched against every column
    #[arg(long, short = 't')]
    term: Option<String>,
}

impl RowFilters {
    fn columns(&self) -> [(FilterColumn, &Option<String>); 6] {
        [
            (FilterColumn::ClinicId, &self.id),
            (FilterColumn::ClinicName, &self.name),
            (FilterColumn::DoctorName, &self.doctor),
            (FilterColumn::Address, &self.address),
            (FilterColumn::Phone, &self.phone),
            (FilterColumn::Services, &self.service),
        ]
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all clinics, optionally filtered client-side
    List {
        #[command(flatten)]
        filters: RowFilters,
    },
    /// Run a backend search and list the results
    Search {
        #[command(subcommand)]
        query: SearchCommand,
        #[command(flatten)]
        filters: RowFilters,
    },
    /// Register a new clinic
    Add {
        /// Clinic ID
        #[arg(long)]
        id: String,
        /// Clinic name
        #[arg(long)]
        name: String,
        /// Attending doctor
        #[arg(long)]
        doctor: String,
        /// Clinic address
        #[arg(long)]
        address: String,
        /// Service as NAME=PHONE (repeatable)
        #[arg(long = "service", value_name = "NAME=PHONE")]
        services: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SearchCommand {
    /// Free-text search across all fields
    General {
        /// Search term
        term: String,
    },
    /// Filtered listing
    Advanced {
        /// Clinic name
        #[arg(long, default_value = "")]
        name: String,
        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,
        /// Comma-separated service names
        #[arg(long, default_value = "")]
        services: String,
    },
    /// Lookup by a single field
    By {
        /// One of: clinic-code, doctor-name, address, name, phone
        field: String,
        /// Value to look up
        value: String,
    },
    /// Clinics offering any of the given services (comma-separated)
    Services {
        /// Comma-separated service names
        services: String,
    },
}

impl SearchCommand {
    fn into_query(self) -> Result<SearchQuery, ClinicError> {
        Ok(match self {
            SearchCommand::General { term } => SearchQuery::General(term),
            SearchCommand::Advanced {
                name,
                phone,
                services,
            } => SearchQuery::advanced(&name, &phone, &services),
            SearchCommand::By { field, value } => SearchQuery::Specific {
                field: field.parse::<LookupField>()?,
                value,
            },
            SearchCommand::Services { services } => SearchQuery::Services(split_list(&services)),
        })
    }
}

/// Parse `NAME=PHONE`. A missing `=` leaves the phone blank for the validator to report.
fn parse_service(raw: &str) -> ServiceDraft {
    match raw.split_once('=') {
        Some((name, phone)) => ServiceDraft::new(name, phone),
        None => ServiceDraft::new(raw, ""),
    }
}

fn print_rows(view: &DirectoryView<HttpClinicBackend>, json: bool, plain: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view.store().clinics())?);
        return Ok(());
    }

    let emphasis = if plain || !std::io::stdout().is_terminal() {
        Emphasis::Brackets
    } else {
        Emphasis::Ansi
    };
    println!("{}", render_table(&view.highlighted_rows(), emphasis));

    let summary = view.search_summary();
    if !summary.is_empty() {
        eprintln!("Filters: {summary}");
    }
    Ok(())
}

fn apply_filters(view: &mut DirectoryView<HttpClinicBackend>, filters: &RowFilters) {
    for (column, value) in filters.columns() {
        if let Some(value) = value {
            view.set_filter(column, value);
        }
    }
    if let Some(term) = &filters.term {
        view.set_search_term(term.clone());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match cli.api_url {
        Some(url) => DirectoryConfig::new(url)?,
        None => api_base_url_from_env_value(std::env::var(API_URL_ENV).ok())?,
    };
    tracing::debug!("using backend {}", config.api_base_url());
    let backend = HttpClinicBackend::new(&config)?;

    match cli.command {
        Some(Commands::List { filters }) => {
            let mut view = DirectoryView::new(backend);
            view.store_mut().load().await?;
            apply_filters(&mut view, &filters);
            print_rows(&view, cli.json, cli.plain)?;
        }
        Some(Commands::Search { query, filters }) => {
            let query = query.into_query()?;
            let mut view = DirectoryView::new(backend);
            let found = view.store_mut().search(&query).await?;
            eprintln!("Found {found} clinic(s).");
            apply_filters(&mut view, &filters);
            print_rows(&view, cli.json, cli.plain)?;
        }
        Some(Commands::Add {
            id,
            name,
            doctor,
            address,
            services,
        }) => {
            let form = ClinicForm {
                clinic_id: id,
                name,
                doctor_name: doctor,
                address,
                services: services.iter().map(|s| parse_service(s)).collect(),
            };
            let payload = match form.validate() {
                Ok(payload) => payload,
                Err(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{}: {}", field.key(), message);
                    }
                    return Err(ClinicError::Validation(errors).into());
                }
            };

            let mut view = DirectoryView::new(backend);
            match view.store_mut().create(&payload).await {
                Ok(created) => {
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&created)?);
                    } else {
                        println!("Added clinic {} ({})", created.code, created.name);
                    }
                }
                Err(e) => anyhow::bail!("Error adding clinic: {e}"),
            }
        }
        None => {
            println!("Use 'clinic --help' for commands");
        }
    }

    Ok(())
}

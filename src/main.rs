use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{terminal_size, Width};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use stockroom::api::{ApiClient, RemoteProductService};
use stockroom::catalog::{EmptyState, SortKey, ViewQuery};
use stockroom::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use stockroom::dashboard::{Confirmation, Dashboard, DeleteOutcome};
use stockroom::error::{Action, AdminError};
use stockroom::form::ProductForm;
use stockroom::models::{AppState, Product, SessionStore};
use stockroom::routes::build_router;
use stockroom::services::{login, ProductService};

fn build_service() -> RemoteProductService {
    let client = match ApiClient::new(config::get_api_base_url(), config::get_request_timeout()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(%e, "Failed to create HTTP client");
            eprintln!("{}: {}", yansi::Paint::red("Failed to create HTTP client"), e);
            process::exit(1);
        }
    };
    RemoteProductService::new(client)
}

fn exit_with(action: Action, e: &AdminError) -> ! {
    tracing::debug!(?e, ?action, "Command failed");
    eprintln!("{}", yansi::Paint::red(&e.notice(action)));
    if !matches!(e, AdminError::Validation(_)) {
        eprintln!("{}", yansi::Paint::new(e.to_string()).dim());
    }
    process::exit(1);
}

/// Dashboard for the session stored by `stockroom login`.
async fn authed_dashboard() -> Dashboard<RemoteProductService> {
    let store = SessionStore::new(config::get_session_file());
    let session = match store.require().await {
        Ok(s) => s,
        Err(e) => exit_with(Action::Load, &e),
    };
    Dashboard::new(build_service(), session)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn load_products(dash: &mut Dashboard<RemoteProductService>) {
    let pb = spinner("Loading products...");
    let result = dash.refresh().await;
    pb.finish_and_clear();
    if let Err(e) = result {
        exit_with(Action::Load, &e);
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_product(p: &Product) {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID", p.id.as_str()]);
    table.add_row(vec!["Name", p.name.as_str()]);
    table.add_row(vec!["Description", p.description.as_str()]);
    table.add_row(vec!["Price".to_string(), p.display_price()]);
    table.add_row(vec!["Category", p.category.as_str()]);
    table.add_row(vec!["Stock", p.stock_label()]);
    table.add_row(vec!["Added".to_string(), p.display_date()]);
    table.add_row(vec!["Image".to_string(), p.image_url(&config::get_image_base_url()).unwrap_or_default()]);
    table.add_row(vec!["Ingredients".to_string(), p.ingredients.join(", ")]);
    table.add_row(vec!["Benefits".to_string(), p.benefits.join(", ")]);
    println!("\n{table}\n");
}

async fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", yansi::Paint::new(prompt).yellow());
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    match reader.read_line(&mut line).await {
        Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", yansi::Paint::red("Failed to read custom stylesheet at"), path, e);
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let app = build_router(state.clone());
    tracing::info!(%addr, api = %state.api_base_url, "Starting Stockroom admin panel");
    println!(
        "{} {}",
        yansi::Paint::new("Admin panel running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Stop any process using this port, or pass a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "stockroom",
    author,
    version,
    about = "Stockroom storefront admin",
    long_about = r#"Stockroom: manage the product catalog of your storefront.

Runs the admin web panel or performs the same actions from the terminal. All
data lives in the remote product service configured by API_BASE_URL.

Examples:
  1) Run the panel:
      stockroom serve --port 8080
  2) Log in and browse:
      stockroom login --email admin@example.com
      stockroom products list --search cream --sort price-low
"#,
    after_help = "Use `stockroom <subcommand> --help` to get subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the admin web panel
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and, when logged in, API connectivity
    CheckConfig,
    /// Log in as a store administrator and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Falls back to ADMIN_PASSWORD
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Manage products
    #[command(about = "List, show, add, edit and delete products", long_about = "Every command works against the remote product service using the stored session. Mutations are followed by a fresh fetch of the catalog.")]
    Products {
        #[command(subcommand)]
        sub: ProductCommands,
    },
    /// List the category options offered by the service
    Categories,
}

#[derive(Args, Debug, Default)]
struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Mark the product as out of stock
    #[arg(long, conflicts_with = "in_stock")]
    out_of_stock: bool,
    /// Mark the product as in stock
    #[arg(long)]
    in_stock: bool,
    /// Comma separated ingredients
    #[arg(long)]
    ingredients: Option<String>,
    /// Comma separated benefits
    #[arg(long)]
    benefits: Option<String>,
    /// PNG, JPG, GIF or WEBP file up to 10MB
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ProductCommands {
    #[command(about = "List products", long_about = "List products with optional search, category filter and sort. Use `--page` and `--per-page` for pagination; page 0 shows everything.")]
    List {
        /// Case-insensitive match on name or description
        #[arg(long, default_value = "")]
        search: String,
        /// Exact category; empty means all
        #[arg(long, default_value = "")]
        category: String,
        /// newest, oldest, name, price-high or price-low
        #[arg(long, default_value = "newest")]
        sort: String,
        #[arg(long, short = 'p', default_value = "0")]
        page: usize,
        #[arg(long, default_value = "20")]
        per_page: usize,
    },
    /// Show one product
    Show { id: String },
    /// Add a product
    Add {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Edit a product; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl ProductFields {
    fn apply(self, form: &mut ProductForm) -> Option<PathBuf> {
        let draft = &mut form.draft;
        if let Some(v) = self.name {
            draft.name = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.price {
            draft.price = v;
        }
        if let Some(v) = self.category {
            draft.category = v;
        }
        if self.out_of_stock {
            draft.in_stock = false;
        } else if self.in_stock {
            draft.in_stock = true;
        }
        if let Some(v) = self.ingredients {
            draft.ingredients = v;
        }
        if let Some(v) = self.benefits {
            draft.benefits = v;
        }
        self.image
    }
}

async fn submit_form(dash: &mut Dashboard<RemoteProductService>, mut form: ProductForm, image: Option<PathBuf>, action: Action) {
    if let Some(path) = image {
        if let Err(e) = form.image.select(path).await {
            exit_with(action, &e);
        }
    }
    match dash.submit(&mut form).await {
        Ok(product) => {
            println!("{}", yansi::Paint::new(action.success_message()).green());
            print_product(&product);
            if dash.load_error().is_none() {
                println!(
                    "{}",
                    yansi::Paint::new(format!("Catalog now has {} products", dash.products().len())).dim()
                );
            }
        }
        Err(e) => exit_with(action, &e),
    }
}

async fn run_products(sub: ProductCommands) {
    let mut dash = authed_dashboard().await;
    match sub {
        ProductCommands::List {
            search,
            category,
            sort,
            page,
            per_page,
        } => {
            load_products(&mut dash).await;
            let query = ViewQuery::new(search, category, SortKey::parse(&sort));
            let view = dash.view(&query);
            match view.state() {
                EmptyState::NoProducts => {
                    println!("{}", yansi::Paint::new("No products yet").yellow());
                    return;
                }
                EmptyState::NoMatches => {
                    println!("{}", yansi::Paint::new("No products match your current filters").yellow());
                    return;
                }
                EmptyState::Populated => {}
            }
            let paged = view.paginate(page, per_page);
            let image_base = config::get_image_base_url();
            let mut table = new_table();
            table.set_header(vec!["ID", "Name", "Category", "Price", "Stock", "Added", "Image"]);
            for p in &paged.items {
                table.add_row(vec![
                    p.id.clone(),
                    p.name.clone(),
                    p.category.clone(),
                    p.display_price(),
                    p.stock_label().to_string(),
                    p.display_date(),
                    p.image_url(&image_base).unwrap_or_default(),
                ]);
            }
            println!("\n{table}");
            println!("\n{}", yansi::Paint::new(view.summary()).cyan());
            if page > 0 && paged.total_pages > 1 {
                println!(
                    "{}",
                    yansi::Paint::new(format!("Page {} of {}", paged.current_page, paged.total_pages)).cyan()
                );
                if paged.has_previous() {
                    println!(
                        "{} {}",
                        yansi::Paint::new("←").bold(),
                        yansi::Paint::new(format!("Previous page: --page {} --per-page {}", paged.current_page - 1, per_page)).dim()
                    );
                }
                if paged.has_next() {
                    println!(
                        "{} {}",
                        yansi::Paint::new("→").bold(),
                        yansi::Paint::new(format!("Next page: --page {} --per-page {}", paged.current_page + 1, per_page)).dim()
                    );
                }
            }
            println!();
        }
        ProductCommands::Show { id } => {
            load_products(&mut dash).await;
            match dash.find(&id) {
                Some(p) => print_product(p),
                None => exit_with(Action::Load, &AdminError::NotFound(id)),
            }
        }
        ProductCommands::Add { fields } => {
            let mut form = ProductForm::create();
            let image = fields.apply(&mut form);
            submit_form(&mut dash, form, image, Action::Add).await;
        }
        ProductCommands::Edit { id, fields } => {
            load_products(&mut dash).await;
            let Some(mut form) = dash.find(&id).map(ProductForm::edit) else {
                exit_with(Action::Update, &AdminError::NotFound(id));
            };
            let image = fields.apply(&mut form);
            submit_form(&mut dash, form, image, Action::Update).await;
        }
        ProductCommands::Delete { id, yes } => {
            load_products(&mut dash).await;
            let prompt = match dash.request_delete(&id) {
                Ok(pending) => pending.prompt(),
                Err(e) => exit_with(Action::Delete, &e),
            };
            let answer = if yes || confirm(&prompt).await {
                Confirmation::Yes
            } else {
                Confirmation::No
            };
            match dash.resolve_delete(answer).await {
                Ok(DeleteOutcome::Deleted { name, .. }) => {
                    println!("{} {}", yansi::Paint::new(Action::Delete.success_message()).green(), name);
                    println!(
                        "{}",
                        yansi::Paint::new(format!("{} products remaining", dash.products().len())).dim()
                    );
                }
                Ok(DeleteOutcome::Cancelled) => println!("{}", yansi::Paint::new("Delete cancelled").dim()),
                Err(e) => exit_with(Action::Delete, &e),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        stockroom::api::client::set_silent(true);
    }

    config::load_env_file(cli.env_file.as_deref());

    let Some(command) = cli.command else {
        let state = AppState::new(build_service(), config::get_image_base_url());
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    };

    match command {
        Commands::Serve { host, port, stylesheet } => {
            let state = AppState::new(build_service(), config::get_image_base_url());
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig => {
            let service = build_service();
            println!("{} {}", yansi::Paint::new("API_BASE_URL").bold(), service.client().base_url());
            let store = SessionStore::new(config::get_session_file());
            match store.load().await {
                Ok(Some(session)) => match service.list_products(&session).await {
                    Ok(products) => println!(
                        "{}",
                        yansi::Paint::new(format!("Configuration looks valid ({} products returned)", products.len())).green()
                    ),
                    Err(e) => {
                        eprintln!("{}: {}", yansi::Paint::new("Configuration appears invalid").red(), e);
                        process::exit(1);
                    }
                },
                Ok(None) => println!(
                    "{}",
                    yansi::Paint::new("No stored session; run `stockroom login` to check API access").yellow()
                ),
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Configuration appears invalid").red(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Login { email, password } => {
            let Some(password) = password.or_else(config::get_admin_password) else {
                eprintln!("{}", yansi::Paint::new("No password given; pass --password or set ADMIN_PASSWORD").red());
                process::exit(1);
            };
            let service = build_service();
            let session = match login(service.client(), &email, &password).await {
                Ok(s) => s,
                Err(e) => exit_with(Action::Login, &e),
            };
            let store = SessionStore::new(config::get_session_file());
            if let Err(e) = store.save(&session).await {
                exit_with(Action::Login, &e);
            }
            println!(
                "{} {}",
                yansi::Paint::new(Action::Login.success_message()).green(),
                yansi::Paint::new(format!("(session saved to {})", store.path().display())).dim()
            );
        }
        Commands::Logout => {
            let store = SessionStore::new(config::get_session_file());
            match store.clear().await {
                Ok(true) => println!("{}", yansi::Paint::new("Logged out").green()),
                Ok(false) => println!("{}", yansi::Paint::new("No stored session").dim()),
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Failed to remove session").red(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Products { sub } => run_products(sub).await,
        Commands::Categories => {
            let mut dash = authed_dashboard().await;
            for category in dash.load_categories().await {
                println!("{}", category);
            }
        }
    }
}

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use clients_gateway::diagnostics::DiagnosticResponse;
use clients_gateway::views::{
    DetailView, ListState, ListView, Navigation, ProxyClient, SortOrder, DEFAULT_PAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "clients-cli")]
#[command(about = "Terminal front-end for the clients gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and page through clients
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        /// Zero-based page index
        #[arg(short, long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
        /// createdAt,desc | nom,asc | prenom,asc
        #[arg(long, default_value_t = SortOrder::CreatedAtDesc)]
        sort: SortOrder,
    },
    /// Show one client
    Show { id: String },
    /// Create a client
    Create(Fields),
    /// Edit a client; omitted fields keep their stored value
    Update {
        id: String,
        #[command(flatten)]
        fields: Fields,
    },
    /// Delete a client
    Delete { id: String },
    /// Inspect or append to the diagnostics log
    #[command(subcommand)]
    Diagnostics(DiagnosticsCommand),
}

#[derive(Args)]
struct Fields {
    #[arg(long)]
    nom: Option<String>,
    #[arg(long)]
    prenom: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    telephone: Option<String>,
}

#[derive(Subcommand)]
enum DiagnosticsCommand {
    /// List entries, newest first
    List,
    /// Append an entry
    Add {
        symptome: String,
        #[arg(long)]
        status: String,
        #[arg(long, default_value = "")]
        details: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let api = ProxyClient::new(&cli.url)?;

    match cli.command {
        Commands::List {
            search,
            page,
            size,
            sort,
        } => {
            let mut view = ListView::new();
            view.set_search_draft(search);
            view.submit_search();
            view.set_sort(sort);
            view.set_page_size(size);
            view.refresh(&api).await;

            // Clamping needs the real page count, so the first load comes first.
            if let Some(ticket) = view.go_to_page(page) {
                view.fetch(&api, ticket).await;
            }

            match view.state() {
                ListState::Failed(message) => return Err(message.clone().into()),
                _ => print_json(view.page())?,
            }
        }
        Commands::Show { id } => {
            let mut view = DetailView::new(id);
            let client = view.load(&api).await?;
            print_json(&client)?;
        }
        Commands::Create(fields) => {
            let mut view = ListView::new();
            fields.apply(view.form_mut());
            let client = view
                .create(&api)
                .await
                .map_err(|e| e.form_message())?;
            print_json(&client)?;
        }
        Commands::Update { id, fields } => {
            let mut view = DetailView::new(id);
            view.load(&api).await?;
            fields.apply(view.form_mut());
            let client = view.save(&api).await.map_err(|e| e.form_message())?;
            print_json(&client)?;
        }
        Commands::Delete { id } => {
            let mut view = DetailView::new(id);
            if view.delete(&api).await == Navigation::Stay {
                return Err(view.form_error().unwrap_or("delete failed").into());
            }
            println!("Deleted {}", view.id());
        }
        Commands::Diagnostics(DiagnosticsCommand::List) => {
            print_json(&api.list_diagnostics().await?)?;
        }
        Commands::Diagnostics(DiagnosticsCommand::Add {
            symptome,
            status,
            details,
        }) => {
            let entry = api
                .append_diagnostic(&symptome, DiagnosticResponse::new(status, details))
                .await?;
            print_json(&entry)?;
        }
    }

    Ok(())
}

impl Fields {
    fn apply(self, form: &mut clients_gateway::views::ClientForm) {
        if let Some(nom) = self.nom {
            form.nom = nom;
        }
        if let Some(prenom) = self.prenom {
            form.prenom = prenom;
        }
        if let Some(email) = self.email {
            form.email = email;
        }
        if let Some(telephone) = self.telephone {
            form.telephone = telephone;
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use http::header::{COOKIE, HOST};
use http::Request;
use log::debug;

use cineapp::auth::{Capabilities, Identity, Role, StaticToken, TokenProvider};
use cineapp::catalog::{Movie, MovieForm, MovieId};
use cineapp::config::AppConfig;
use cineapp::gate::GateDecision;
use cineapp::views::{Header, MutationOutcome, Navigation, Prompt, Viewer};
use cineapp::CineApp;

#[derive(Parser, Debug)]
#[clap(name = "cineapp", version)]
#[clap(about = "Inspect the CineApp catalog, session gate and navigation", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Bearer token for private and admin calls. Falls back to CINEAPP_TOKEN.
    #[clap(long, global = true)]
    token: Option<String>,

    /// Answer yes to every confirmation
    #[clap(long, short = 'y', global = true)]
    yes: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List movies
    Catalog {
        #[clap(value_enum, default_value = "public")]
        scope: Scope,
    },
    /// Add a public movie to the personal list
    Add { id: MovieId },
    /// Remove a movie from the personal list
    Remove { id: MovieId },
    /// Create a movie
    Create {
        title: String,
        director: String,
        #[clap(long)]
        year: Option<i32>,
        #[clap(long)]
        genre: Option<String>,
        #[clap(long)]
        description: Option<String>,
        /// Keep the movie out of the public catalog
        #[clap(long)]
        private: bool,
    },
    /// Delete a movie
    Delete { id: MovieId },
    /// Run the session gate against a request path
    Gate {
        path: String,
        /// Raw Cookie header
        #[clap(long)]
        cookie: Option<String>,
        #[clap(long)]
        host: Option<String>,
    },
    /// Show the header composed for a role set
    Nav {
        /// Roles held by the viewer, e.g. ADMIN CLIENTE
        roles: Vec<String>,
        #[clap(long)]
        anonymous: bool,
    },
    /// Print the login and logout URLs
    Urls,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Scope {
    Public,
    Private,
    Admin,
}

/// Confirmations and alerts on the terminal
struct TerminalPrompt {
    assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [s/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes"),
            Err(_) => false,
        }
    }

    fn alert(&self, message: &str) {
        println!("{}", message);
    }
}

fn print_movies(movies: &[Movie]) {
    if movies.is_empty() {
        println!("No hay películas disponibles");
        return;
    }
    for m in movies {
        let visibility = if m.is_public { "pública" } else { "privada" };
        println!(
            "{:>5}  {} ({}) - {} [{}, {}]",
            m.id,
            m.title,
            m.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            m.director.as_deref().unwrap_or("-"),
            m.genre.as_deref().unwrap_or("-"),
            visibility
        );
    }
}

fn print_decision(decision: &GateDecision) {
    match decision {
        GateDecision::Excluded => println!("excluded"),
        GateDecision::PassThrough { session, .. } => match session {
            Some(s) => println!("pass through as {}", s.identity.sub),
            None => println!("pass through (anonymous)"),
        },
        GateDecision::Redirect { location } => println!("redirect to {}", location),
        GateDecision::ResetSession { .. } => println!("pass through, session reset"),
    }
    for cookie in decision.set_cookies() {
        println!("Set-Cookie: {}", cookie);
    }
}

fn print_nav(roles: &[String], anonymous: bool) {
    let viewer = if anonymous {
        Viewer::anonymous()
    } else {
        let mut capabilities = Capabilities::none();
        for role in roles.iter().filter_map(|r| Role::from_claim(r)) {
            match role {
                Role::Admin => capabilities.admin = true,
                Role::Client => capabilities.client = true,
            }
        }
        Viewer {
            identity: Some(Identity::new("cli|viewer")),
            capabilities,
        }
    };

    let header = Header::compose(&viewer);
    for link in &header.links {
        println!("{:<20} {}", link.label, link.href());
    }
    for button in &header.buttons {
        println!("[{:?}] {}", button, button.href());
    }
}

fn token_provider(cli: &Cli) -> anyhow::Result<Arc<dyn TokenProvider>> {
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("CINEAPP_TOKEN").ok())
        .context("a bearer token is required (--token or CINEAPP_TOKEN)")?;
    Ok(Arc::new(StaticToken::new(&token)))
}

fn report(outcome: MutationOutcome) -> anyhow::Result<()> {
    debug!("mutation outcome: {:?}", outcome);
    match outcome {
        MutationOutcome::Applied | MutationOutcome::Cancelled => Ok(()),
        MutationOutcome::Rejected => bail!("form rejected"),
        MutationOutcome::Failed => bail!("request failed"),
        MutationOutcome::Busy => bail!("another change is still pending"),
    }
}

fn leave_if_redirected(navigation: &Navigation) -> anyhow::Result<()> {
    match navigation {
        Navigation::Redirect(to) => bail!("lost access to the catalog (redirected to {})", to),
        Navigation::Stay => Ok(()),
    }
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Commands::Nav { roles, anonymous } = &cli.command {
        print_nav(roles, *anonymous);
        return Ok(());
    }

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let app = CineApp::new(config)?;
    let prompt = TerminalPrompt { assume_yes: cli.yes };

    match &cli.command {
        Commands::Catalog { scope } => {
            let catalog = app.catalog();
            let movies = match scope {
                Scope::Public => catalog.public_movies().await?,
                Scope::Private => {
                    let token = token_provider(&cli)?.access_token().await?;
                    catalog.private_movies(&token).await?
                }
                Scope::Admin => {
                    let token = token_provider(&cli)?.access_token().await?;
                    catalog.admin_movies(&token).await?
                }
            };
            print_movies(&movies);
        }
        Commands::Add { id } => {
            let mut page = app.client_page(token_provider(&cli)?);
            page.load().await;
            report(page.add(*id, &prompt).await)?;
            print_movies(&page.private_movies);
        }
        Commands::Remove { id } => {
            let mut page = app.client_page(token_provider(&cli)?);
            page.load().await;
            report(page.remove(*id, &prompt).await)?;
            print_movies(&page.private_movies);
        }
        Commands::Create {
            title,
            director,
            year,
            genre,
            description,
            private,
        } => {
            let mut page = app.admin_page(token_provider(&cli)?);
            if let Navigation::Redirect(to) = page.load().await {
                bail!("not allowed to edit the catalog (redirected to {})", to);
            }
            page.open_create();
            if let Some(form) = page.form_mut() {
                let mut data = MovieForm::new(title, director, year.unwrap_or(form.year));
                if let Some(genre) = genre {
                    data = data.with_genre(genre);
                }
                if let Some(description) = description {
                    data = data.with_description(description);
                }
                *form = data.with_public(!private);
            }
            report(page.submit(&prompt).await)?;
            leave_if_redirected(page.navigation())?;
        }
        Commands::Delete { id } => {
            let mut page = app.admin_page(token_provider(&cli)?);
            if let Navigation::Redirect(to) = page.load().await {
                bail!("not allowed to edit the catalog (redirected to {})", to);
            }
            let title = page
                .movies
                .iter()
                .find(|m| m.id == *id)
                .map(|m| m.title.clone())
                .with_context(|| format!("movie {} not found", id))?;
            report(page.delete(*id, &title, &prompt).await)?;
            leave_if_redirected(page.navigation())?;
        }
        Commands::Gate { path, cookie, host } => {
            let mut builder = Request::builder().uri(path.as_str());
            if let Some(cookie) = cookie {
                builder = builder.header(COOKIE, cookie.as_str());
            }
            if let Some(host) = host {
                builder = builder.header(HOST, host.as_str());
            }
            let request = builder.body(()).context("invalid request")?;
            let decision = app.gate().evaluate(&request).await;
            print_decision(&decision);
        }
        Commands::Urls => {
            println!("login:  {}", app.config().authorize_url("cli")?);
            println!("logout: {}", app.config().logout_url()?);
        }
        Commands::Nav { .. } => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

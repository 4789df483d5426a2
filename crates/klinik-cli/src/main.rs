//! `klinik`: terminal front end for the clinic-management API.

mod render;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};

use klinik_core::messages;
use klinik_core::screen::{screen_for, services, Route, ScreenOps};
use klinik_core::{
    AppContext, ClientConfig, Dashboard, EntityId, EntityKind, LoadState, LoginScreen,
    NavigationShell, Profile, ProfileScreen, ScreenEffect,
};

use render::TextChart;

#[derive(Parser)]
#[command(name = "klinik")]
#[command(version, about = "Clinic management from the terminal")]
struct Cli {
    /// Config file (defaults to ./klinik.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the local storage file
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Print lists as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the access token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log out and forget the access token
    Logout {
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show whether a session is stored
    Whoami,
    /// Completed visits per month and today's doctors
    Dashboard,
    /// List the service menu
    Services,
    /// Manage patients
    Patients(EntityArgs),
    /// Manage doctors
    Doctors(EntityArgs),
    /// Manage appointments
    Appointments(EntityArgs),
    /// Manage medical records
    Records(EntityArgs),
    /// Manage prescriptions
    Prescriptions(EntityArgs),
    /// Show or update the user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Debug, Args)]
struct EntityArgs {
    #[command(subcommand)]
    action: EntityAction,
}

#[derive(Debug, Subcommand)]
enum EntityAction {
    /// List records, optionally filtered
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a record
    Add {
        /// `field=value`, repeatable
        #[arg(short = 'f', long = "field", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Update a record
    Edit {
        id: EntityId,
        #[arg(short = 'f', long = "field", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Delete a record
    Delete {
        id: EntityId,
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Describe the form fields
    Fields,
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    Show,
    Update {
        #[arg(short = 'f', long = "field", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
        /// Profile photo to upload
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected field=value, got '{}'", arg)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        ClientConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(path) = cli.storage {
        config.storage_path = path;
    }
    init_logging(cli.verbose, &config.log_level);

    let mut ctx = AppContext::init(&config).context("Failed to open the client")?;
    debug!(base_url = %config.base_url, storage = %config.storage_path.display(), "Client ready");

    match cli.command {
        Commands::Login { email, password } => login(&mut ctx, email, password),
        Commands::Logout { yes } => logout(&mut ctx, yes),
        Commands::Whoami => {
            if ctx.session.is_authenticated() {
                println!("Sudah login ({}).", ctx.api.base_url());
            } else {
                println!("Belum login.");
            }
            Ok(())
        }
        Commands::Dashboard => dashboard(&ctx),
        Commands::Services => {
            for entry in services() {
                println!("{:<12} {}", entry.label, entry.route.path());
            }
            Ok(())
        }
        Commands::Patients(args) => entity(&ctx, EntityKind::Patients, args.action, cli.json),
        Commands::Doctors(args) => entity(&ctx, EntityKind::Doctors, args.action, cli.json),
        Commands::Appointments(args) => {
            entity(&ctx, EntityKind::Appointments, args.action, cli.json)
        }
        Commands::Records(args) => entity(&ctx, EntityKind::MedicalRecords, args.action, cli.json),
        Commands::Prescriptions(args) => {
            entity(&ctx, EntityKind::Prescriptions, args.action, cli.json)
        }
        Commands::Profile { action } => profile(&ctx, action),
    }
}

fn init_logging(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Turn a login redirect into an error.
fn follow(effect: ScreenEffect) -> Result<()> {
    match effect {
        ScreenEffect::RedirectToLogin => bail!("{}", messages::LOGIN_REDIRECT),
        ScreenEffect::None | ScreenEffect::Navigate(_) => Ok(()),
    }
}

fn login(ctx: &mut AppContext, email: String, password: String) -> Result<()> {
    let mut screen = LoginScreen::new();
    screen.email = email;
    screen.password = password;

    match screen.submit(ctx).context("Failed to store the session")? {
        ScreenEffect::Navigate(route) => {
            println!("Login berhasil. Buka {}", route.path());
            Ok(())
        }
        _ => bail!("{}", screen.error().unwrap_or(messages::LOGIN_FAILED)),
    }
}

fn logout(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let mut shell = NavigationShell::new();
    shell.navigate(Route::Dashboard);
    shell.request_logout();
    if !yes && !render::confirm("Apakah Anda yakin ingin keluar?")? {
        shell.dismiss_logout();
        return Ok(());
    }
    shell.confirm_logout(ctx).context("Failed to clear the session")?;
    println!("Logout berhasil.");
    Ok(())
}

fn dashboard(ctx: &AppContext) -> Result<()> {
    let mut dashboard = Dashboard::new();
    follow(dashboard.mount(ctx))?;

    let mut chart = TextChart::new();
    dashboard.render(&mut chart);
    print!("{}", chart.output);

    println!();
    println!("JADWAL DOKTER HARI INI");
    for slot in dashboard.doctors() {
        let mark = if slot.scheduled { "x" } else { " " };
        println!("[{}] {}", mark, slot.name);
    }
    Ok(())
}

fn entity(ctx: &AppContext, kind: EntityKind, action: EntityAction, json: bool) -> Result<()> {
    let mut screen = screen_for(kind);
    follow(screen.mount(ctx))?;
    if let LoadState::Failed(message) = screen.state() {
        bail!("{}", message);
    }

    match action {
        EntityAction::List { search } => {
            if let Some(term) = search {
                screen.set_search(&term);
            }
            let rows = screen.visible_rows();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render::table(screen.columns(), &rows));
                println!("{} dari {} data", rows.len(), screen.row_count());
            }
        }
        EntityAction::Add { fields } => {
            screen.open_create();
            submit(screen.as_mut(), ctx, fields)?;
            println!("{} disimpan.", kind.title());
        }
        EntityAction::Edit { id, fields } => {
            screen.open_edit(id)?;
            submit(screen.as_mut(), ctx, fields)?;
            println!("{} {} diperbarui.", kind.title(), id);
        }
        EntityAction::Delete { id, yes } => {
            let prompt = screen.request_delete(id)?;
            if !yes && !render::confirm(&prompt)? {
                screen.cancel_delete();
                return Ok(());
            }
            follow(screen.confirm_delete(ctx))?;
            if let Some(alert) = screen.take_alert() {
                bail!("{}", alert);
            }
            println!("{} {} dihapus.", kind.title(), id);
        }
        EntityAction::Fields => print!("{}", render::fields(&screen.fields())),
    }
    Ok(())
}

fn submit(
    screen: &mut (dyn ScreenOps + Send),
    ctx: &AppContext,
    fields: Vec<(String, String)>,
) -> Result<()> {
    for (name, value) in &fields {
        screen.set_form_field(name, value)?;
    }
    follow(screen.submit_form(ctx))?;
    match screen.form_error() {
        Some(error) => bail!("{}", error),
        None => Ok(()),
    }
}

fn profile(ctx: &AppContext, action: ProfileAction) -> Result<()> {
    let mut screen = ProfileScreen::new();
    follow(screen.mount(ctx))?;
    if let LoadState::Failed(message) = screen.state() {
        bail!("{}", message);
    }

    match action {
        ProfileAction::Show => {
            let profile = screen.profile();
            for (name, label) in Profile::FIELDS {
                println!("{:<14} {}", label, profile.get(name).unwrap_or_default());
            }
            if let Some(photo) = &profile.foto {
                println!("{:<14} {}", "Foto", photo);
            }
        }
        ProfileAction::Update { fields, photo } => {
            for (name, value) in &fields {
                screen.set_field(name, value)?;
            }
            if let Some(path) = photo {
                screen
                    .attach_photo(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
            }
            follow(screen.save(ctx))?;
            if let Some(error) = screen.error() {
                bail!("{}", error);
            }
            if let Some(notice) = screen.take_notice() {
                println!("{}", notice);
            }
        }
    }
    Ok(())
}

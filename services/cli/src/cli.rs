use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use scholar_portal::api::PortalApi;
use scholar_portal::config::{ApiConfig, PortalConfig};
use scholar_portal::contact::ContactFlow;
use scholar_portal::dashboard::{DashboardFlow, DashboardOutcome};
use scholar_portal::domain::DocumentFile;
use scholar_portal::error::AppError;
use scholar_portal::forms::{ContactForm, LoginForm, RegistrationForm};
use scholar_portal::login::{LoginFlow, DASHBOARD_PATH};
use scholar_portal::registration::RegistrationOrchestrator;
use scholar_portal::session::{FileSessionStore, SessionStore};
use scholar_portal::telemetry;
use scholar_portal::transport::ReqwestTransport;
use tracing::info;

use crate::terminal::{render_table, TerminalStatusSink};

#[derive(Parser, Debug)]
#[command(
    name = "scholar-portal",
    about = "Register, sign in and review applications on the ScholarValley portal",
    version
)]
struct Cli {
    /// Override the configured API origin (PORTAL_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and applicant profile, then upload both documents
    Register(RegisterArgs),
    /// Sign in and remember the session
    Login(LoginArgs),
    /// List the applicants visible to the signed-in user
    Dashboard,
    /// Forget the stored session
    Logout,
    /// Send a message to the support team
    Contact(ContactArgs),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    surname: String,
    #[arg(long)]
    email: String,
    /// Defaults to --email
    #[arg(long)]
    confirm_email: Option<String>,
    #[arg(long)]
    password: String,
    #[arg(long)]
    latest_education: String,
    /// Academic transcript to upload
    #[arg(long)]
    transcript: Option<PathBuf>,
    /// Latest degree certificate to upload
    #[arg(long)]
    degree: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(Args, Debug)]
struct ContactArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    message: String,
}

struct Context {
    config: PortalConfig,
    sink: Arc<TerminalStatusSink>,
}

impl Context {
    fn api(&self) -> Result<PortalApi<ReqwestTransport>, AppError> {
        let transport = ReqwestTransport::new(self.config.api.timeout)?;
        Ok(PortalApi::new(self.config.api.base_url.clone(), transport))
    }

    fn store(&self) -> Arc<FileSessionStore> {
        Arc::new(FileSessionStore::new(self.config.session.path.clone()))
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = PortalConfig::load()?;
    if let Some(api_base) = &cli.api_base {
        config.api.base_url = ApiConfig::normalize_base_url(api_base)?;
    }
    telemetry::init(&config)?;
    info!(environment = ?config.environment, api = %config.api.base_url, "portal client configured");

    let context = Context {
        config,
        sink: Arc::new(TerminalStatusSink),
    };

    match cli.command {
        Command::Register(args) => register(&context, args).await,
        Command::Login(args) => login(&context, args).await,
        Command::Dashboard => dashboard(&context).await,
        Command::Logout => logout(&context),
        Command::Contact(args) => contact(&context, args).await,
    }
}

async fn load_document(path: Option<PathBuf>) -> Result<Option<DocumentFile>, AppError> {
    match path {
        Some(path) => Ok(Some(DocumentFile::from_path(path).await?)),
        None => Ok(None),
    }
}

async fn register(context: &Context, args: RegisterArgs) -> Result<(), AppError> {
    let form = RegistrationForm {
        confirm_email: args.confirm_email.unwrap_or_else(|| args.email.clone()),
        first_name: args.first_name,
        surname: args.surname,
        email: args.email,
        password: args.password,
        latest_education: args.latest_education,
        transcript: load_document(args.transcript).await?,
        degree: load_document(args.degree).await?,
    };

    let orchestrator = RegistrationOrchestrator::new(context.api()?, context.sink.clone());
    let outcome = orchestrator.submit(form).await?;
    for document in &outcome.documents {
        println!("  {} stored as document {}", document.kind, document.document_id);
    }
    Ok(())
}

async fn login(context: &Context, args: LoginArgs) -> Result<(), AppError> {
    let flow = LoginFlow::new(context.api()?, context.sink.clone(), context.store());
    flow.submit(LoginForm {
        email: args.email,
        password: args.password,
    })
    .await?;
    println!("Session saved. Run `scholar-portal dashboard` to open {DASHBOARD_PATH}.");
    Ok(())
}

async fn dashboard(context: &Context) -> Result<(), AppError> {
    let flow = DashboardFlow::new(context.api()?, context.sink.clone(), context.store());
    match flow.load().await? {
        DashboardOutcome::SignInRequired { redirect_to } => {
            println!("Not signed in ({redirect_to}). Run `scholar-portal login` first.");
        }
        DashboardOutcome::SessionExpired { redirect_to } => {
            println!("Session expired ({redirect_to}). Run `scholar-portal login` again.");
        }
        DashboardOutcome::Empty => println!("No applicants yet."),
        DashboardOutcome::Listed(table) => println!("{}", render_table(&table)),
    }
    Ok(())
}

fn logout(context: &Context) -> Result<(), AppError> {
    let store = context.store();
    store.clear()?;
    info!(path = %store.path().display(), "signed out");
    println!("Signed out.");
    Ok(())
}

async fn contact(context: &Context, args: ContactArgs) -> Result<(), AppError> {
    let flow = ContactFlow::new(
        context.sink.clone(),
        context.config.contact.acknowledgement_delay,
    );
    let mut form = ContactForm {
        name: args.name,
        email: args.email,
        message: args.message,
    };
    flow.submit(&mut form).await?;
    Ok(())
}

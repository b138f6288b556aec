//! `roster` command-line entry point.
//!
//! `serve` runs the HTTP API over the local record store; every other
//! subcommand is a client of a running server.

mod render;

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;
use roster_core::{
    default_log_level, init_logging, FormField, LoggingError, SortDirection, SortKey,
    StudentForm, ViewAction,
};
use roster_http::config::DEFAULT_LISTEN_ADDR;
use roster_http::{
    ApiClient, ClientError, Server, ServerConfigBuilder, ServerError, StudentsPage, SubmitError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_LOG_DIR_NAME: &str = "roster-logs";

/// Student roster server and client
#[derive(Parser, Debug)]
#[command(name = "roster", version)]
struct Args {
    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs, Debug)]
struct Remote {
    /// Server address
    #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
    server: String,
}

#[derive(ClapArgs, Debug)]
struct RecordInput {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    subject: String,

    /// Whole number from 0 to 100
    #[arg(long, default_value = "")]
    marks: String,
}

impl RecordInput {
    fn fill(self, form: &mut StudentForm) {
        form.set(FormField::Name, self.name);
        form.set(FormField::Email, self.email);
        form.set(FormField::Subject, self.subject);
        form.set(FormField::Marks, self.marks);
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides ROSTER_LISTEN_ADDR)
        #[arg(long)]
        listen: Option<String>,

        /// SQLite file (overrides ROSTER_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show one page of the student table
    List {
        #[command(flatten)]
        remote: Remote,

        /// Case-insensitive match on name, email or subject
        #[arg(long, default_value = "")]
        search: String,

        /// Sort column: name|email|subject|marks
        #[arg(long, value_parser = parse_sort_key)]
        sort: Option<SortKey>,

        /// asc|desc
        #[arg(long, value_parser = parse_direction)]
        direction: Option<SortDirection>,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show the marks distribution
    Chart {
        #[command(flatten)]
        remote: Remote,

        #[arg(long, default_value = "")]
        search: String,
    },

    /// Validate and add a student
    Add {
        #[command(flatten)]
        remote: Remote,

        #[command(flatten)]
        input: RecordInput,
    },

    /// Replace every field of an existing student
    Update {
        #[command(flatten)]
        remote: Remote,

        #[arg(long)]
        id: String,

        #[command(flatten)]
        input: RecordInput,
    },

    /// Delete a student by id
    Delete {
        #[command(flatten)]
        remote: Remote,

        #[arg(long)]
        id: String,
    },
}

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Server(ServerError),
    Client(ClientError),
    Submit(SubmitError),
    Io(std::io::Error),
    /// The initial fetch failed; details are in the log.
    Unreachable(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Server(err) => write!(f, "{err}"),
            Self::Client(err) => write!(f, "{err}"),
            Self::Submit(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Unreachable(addr) => write!(f, "could not load students from {addr}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Server(err) => Some(err),
            Self::Client(err) => Some(err),
            Self::Submit(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Unreachable(_) => None,
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<ServerError> for CliError {
    fn from(value: ServerError) -> Self {
        Self::Server(value)
    }
}

impl From<ClientError> for CliError {
    fn from(value: ClientError) -> Self {
        Self::Client(value)
    }
}

impl From<SubmitError> for CliError {
    fn from(value: SubmitError) -> Self {
        Self::Submit(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let serving = matches!(args.command, Commands::Serve { .. });
    start_logging(args.log_level.as_deref(), args.log_dir.as_deref(), serving)?;

    match args.command {
        Commands::Serve { listen, db } => serve(listen, db),
        Commands::List {
            remote,
            search,
            sort,
            direction,
            page,
        } => list(&remote, search, sort, direction, page),
        Commands::Chart { remote, search } => chart(&remote, search),
        Commands::Add { remote, input } => add(&remote, input),
        Commands::Update { remote, id, input } => update(&remote, &id, input),
        Commands::Delete { remote, id } => delete(&remote, &id),
    }
}

/// The server always logs; client commands only when `--log-dir` is given.
fn start_logging(level: Option<&str>, log_dir: Option<&str>, serving: bool) -> Result<(), CliError> {
    let log_dir = match log_dir {
        Some(dir) => dir.to_string(),
        None if serving => std::env::temp_dir()
            .join(DEFAULT_LOG_DIR_NAME)
            .display()
            .to_string(),
        None => return Ok(()),
    };
    init_logging(level.unwrap_or_else(|| default_log_level()), &log_dir)?;
    Ok(())
}

fn serve(listen: Option<String>, db: Option<PathBuf>) -> Result<(), CliError> {
    let mut builder = ServerConfigBuilder::from_env();
    if let Some(listen) = listen {
        builder = builder.listen_addr(listen);
    }
    if let Some(db) = db {
        builder = builder.db_path(db);
    }
    let config = builder.build();
    let db_path = config.db_path.clone();

    let server = Server::bind(config)?;
    println!(
        "roster listening on http://{} (db: {})",
        server.local_addr()?,
        db_path.display()
    );
    server.run()?;
    Ok(())
}

fn load_page(remote: &Remote) -> Result<StudentsPage<ApiClient>, CliError> {
    let mut page = StudentsPage::new(ApiClient::new(remote.server.clone()));
    if !page.refresh() {
        return Err(CliError::Unreachable(remote.server.clone()));
    }
    Ok(page)
}

fn list(
    remote: &Remote,
    search: String,
    sort: Option<SortKey>,
    direction: Option<SortDirection>,
    page_number: usize,
) -> Result<(), CliError> {
    let mut page = load_page(remote)?;

    let key = sort.unwrap_or(page.view().sort.key);
    if key != page.view().sort.key {
        page.dispatch(ViewAction::SortBy(key));
    }
    if direction.is_some_and(|direction| direction != page.view().sort.direction) {
        page.dispatch(ViewAction::SortBy(key));
    }
    page.dispatch(ViewAction::Search(search));
    page.dispatch(ViewAction::GoToPage(page_number));

    print!("{}", render::render_table(&page.listing(), page.view()));
    Ok(())
}

fn chart(remote: &Remote, search: String) -> Result<(), CliError> {
    let mut page = load_page(remote)?;
    page.dispatch(ViewAction::Search(search));
    print!("{}", render::render_chart(&page.chart()));
    Ok(())
}

fn add(remote: &Remote, input: RecordInput) -> Result<(), CliError> {
    let mut page = load_page(remote)?;
    page.dispatch(ViewAction::OpenForm);
    input.fill(page.form_mut());

    let student = page.submit_form()?;
    info!("event=cli_add module=cli status=ok id={}", student.id);
    println!("Student added successfully (id {})", student.id);
    println!("{} students on record", page.records().len());
    Ok(())
}

fn update(remote: &Remote, id: &str, input: RecordInput) -> Result<(), CliError> {
    let mut form = StudentForm::default();
    input.fill(&mut form);
    let fields = form.validate().map_err(SubmitError::Invalid)?;

    let mut page = load_page(remote)?;
    page.update_student(id, &fields)?;
    println!("Student updated successfully");
    Ok(())
}

fn delete(remote: &Remote, id: &str) -> Result<(), CliError> {
    let mut page = load_page(remote)?;
    page.delete_student(id)?;
    println!("Student deleted successfully");
    println!("{} students on record", page.records().len());
    Ok(())
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    SortKey::parse(value).ok_or_else(|| format!("unknown sort column `{value}`"))
}

fn parse_direction(value: &str) -> Result<SortDirection, String> {
    SortDirection::parse(value).ok_or_else(|| format!("expected asc or desc, got `{value}`"))
}

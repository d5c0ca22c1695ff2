use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::catalog::{BookForm, BookPage, CatalogQuery, SortDir, SortField, MAX_PAGE_SIZE};
use crate::cli::args::{BookFields, CliArgs, Command, ListArgs, QueryArgs};
use crate::cli::validation;
use crate::client::{ApiClient, ClientError, User, DEFAULT_API_URL};
use crate::config::{self, ConfigFile};
use crate::output::{self, Loading, Notice, OutputFormat};
use crate::paginator::{PageChangeRejected, Paginator};
use crate::session::{
    Action, Applied, EditorState, Effect, FetchRequest, MutationTarget, Session, ADMIN_REQUIRED,
};
use crate::shell::{self, ShellCommand};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DELETE_QUESTION: &str =
    "Are you sure you want to delete this book? This action cannot be undone.";

#[derive(Debug, Clone)]
struct RunConfig {
    api_url: String,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    timeout: u64,
    query: CatalogQuery,
    output_format: OutputFormat,
    no_color: bool,
    quiet: bool,
    verbose: u8,
    config_path: Option<PathBuf>,
    command: Command,
}

fn command_query(command: &Command) -> QueryArgs {
    match command {
        Command::List(ListArgs { query, .. }) | Command::Shell(query) => query.clone(),
        _ => QueryArgs::default(),
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let query_args = command_query(&args.command);
    let mut query = CatalogQuery::default();

    let size = query_args.size.or(cfg.page_size).unwrap_or(query.size);
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(format!("invalid page_size {size}, expected 1-{MAX_PAGE_SIZE}"));
    }
    query.size = size;

    if let Some(raw) = query_args.sort_by.or(cfg.sort_by) {
        query.sort_by = SortField::parse(&raw).ok_or_else(|| format!("invalid sort_by '{raw}'"))?;
    }
    if let Some(raw) = query_args.sort_dir.or(cfg.sort_dir) {
        query.sort_dir = SortDir::parse(&raw)
            .ok_or_else(|| format!("invalid sort_dir '{raw}', expected asc or desc"))?;
    }

    let format_arg = match &args.command {
        Command::List(list) => list.format.clone(),
        _ => None,
    };
    let output_format = match format_arg.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output_format '{raw}', expected text or json"))?,
        None => OutputFormat::Text,
    };

    let timeout = args.timeout.or(cfg.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }

    let api_url = args
        .api_url
        .or(cfg.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    Ok(RunConfig {
        api_url,
        username: args.username.or(cfg.username),
        password: args.password,
        token: args.token,
        timeout,
        query,
        output_format,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
        quiet: args.quiet || cfg.quiet.unwrap_or(false),
        verbose: args.verbose,
        config_path: args.config.as_deref().map(config::expand_tilde),
        command: args.command,
    })
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bookstore_admin={}", log_level(verbose))));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

enum Flow {
    Continue,
    Exit,
}

fn read_error(e: ReadlineError) -> String {
    format!("failed to read input: {e}")
}

fn confirm(rl: &mut DefaultEditor, question: &str) -> Result<bool, String> {
    match rl.readline(&format!("{question} [y/N] ")) {
        Ok(answer) => Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(e) => Err(read_error(e)),
    }
}

/// Prompt for every field, offering the current value for editing.
///
/// Returns `false` when the user cancels with Ctrl-C or Ctrl-D.
fn prompt_form(rl: &mut DefaultEditor, form: &mut BookForm) -> Result<bool, String> {
    let fields = [
        ("Title", &mut form.title),
        ("Author", &mut form.author),
        ("Published (YYYY-MM-DD)", &mut form.published_date),
        ("Genre (optional)", &mut form.genre),
        ("Price", &mut form.price),
        ("ISBN", &mut form.isbn),
    ];
    for (label, slot) in fields {
        match rl.readline_with_initial(&format!("  {label}: "), (slot.as_str(), "")) {
            Ok(value) => *slot = value,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(false),
            Err(e) => return Err(read_error(e)),
        }
    }
    Ok(true)
}

fn render_session(session: &Session) {
    print!("{}", output::render_table(session.books()));
    let controls = output::render_page_controls(session.paginator());
    if !controls.is_empty() {
        println!("{controls}");
    }
    println!("{}", output::render_page_info(session.paginator()).dimmed());
}

fn shell_prompt(session: &Session) -> String {
    let paginator = session.paginator();
    format!(
        "{}@books [{}/{}]> ",
        session.user().username,
        paginator.current_page() + 1,
        paginator.total_pages().max(1)
    )
}

/// Paginator positioned on `index` of a fetched listing. The first page is
/// always valid, even for an empty catalog.
fn listing_paginator(books: &BookPage, index: usize) -> Result<Paginator, PageChangeRejected> {
    let mut paginator = Paginator::new();
    paginator.set_total(books.total_pages, books.total_elements);
    if index > 0 {
        paginator.request_page_change(index as i64)?;
    }
    Ok(paginator)
}

fn describe_user(user: &User) -> String {
    format!("{} <{}> ({})", user.username, user.email, user.role)
}

struct App {
    rt: tokio::runtime::Runtime,
    client: ApiClient,
    run: RunConfig,
}

impl App {
    fn new(run: RunConfig) -> Result<Self, String> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| format!("failed to build runtime: {e}"))?;
        let client = ApiClient::new(&run.api_url, Duration::from_secs(run.timeout))
            .map_err(|e| e.to_string())?;
        info!(api_url = client.base_url(), timeout = run.timeout, "client ready");
        Ok(Self { rt, client, run })
    }

    fn spin(&self, message: &str) -> Loading {
        Loading::start(!self.run.quiet && std::io::stderr().is_terminal(), message)
    }

    fn note(&self, notice: Notice) {
        if !self.run.quiet {
            notice.emit();
        }
    }

    fn credentials(&self) -> Result<(String, String), String> {
        let username = self
            .run
            .username
            .clone()
            .ok_or("username required (use --username or BOOKSTORE_USERNAME)")?;
        let password = self
            .run
            .password
            .clone()
            .ok_or("password required (use --password or BOOKSTORE_PASSWORD)")?;
        Ok((username, password))
    }

    /// Resolve the acting user, from `--token` when given, otherwise by logging in.
    fn sign_in(&mut self) -> Result<User, String> {
        if let Some(token) = self.run.token.clone() {
            self.client.set_token(Some(token));
            let result = {
                let _loading = self.spin("Checking token...");
                self.rt.block_on(self.client.profile())
            };
            return result.map_err(|e| e.user_message("Invalid or expired token"));
        }

        let (username, password) = self.credentials()?;
        let result = {
            let _loading = self.spin("Signing in...");
            self.rt.block_on(self.client.login(&username, &password))
        };
        let auth = result.map_err(|e| e.user_message("Login failed"))?;
        debug!(user = %auth.user.username, role = %auth.user.role, "signed in");
        Ok(auth.user)
    }

    fn require_admin(&mut self) -> Result<User, String> {
        let user = self.sign_in()?;
        if !user.role.is_admin() {
            return Err(ADMIN_REQUIRED.to_string());
        }
        Ok(user)
    }

    fn execute(&mut self) -> Result<(), String> {
        match self.run.command.clone() {
            Command::Login => self.login(),
            Command::Register { email } => self.register(&email),
            Command::List(list) => self.list(list.page.unwrap_or(1)),
            Command::Show { id } => self.show(id),
            Command::Add(fields) => self.add(&fields),
            Command::Edit { id, fields } => self.edit(id, &fields),
            Command::Delete { id, yes } => self.delete(id, yes),
            Command::Shell(_) => self.shell(),
            Command::InitConfig => init_config(self.run.config_path.clone()),
        }
    }

    fn login(&mut self) -> Result<(), String> {
        let (username, password) = self.credentials()?;
        let result = {
            let _loading = self.spin("Signing in...");
            self.rt.block_on(self.client.login(&username, &password))
        };
        let auth = result.map_err(|e| e.user_message("Login failed"))?;
        println!("{}", auth.token);
        self.note(Notice::success(format!(
            "Login successful! Signed in as {}",
            describe_user(&auth.user)
        )));
        Ok(())
    }

    fn register(&mut self, email: &str) -> Result<(), String> {
        let (username, password) = self.credentials()?;
        let result = {
            let _loading = self.spin("Creating account...");
            self.rt
                .block_on(self.client.register(&username, email, &password))
        };
        let auth = result.map_err(|e| e.user_message("Registration failed"))?;
        println!("{}", auth.token);
        self.note(Notice::success(format!(
            "Registration successful! Signed in as {}",
            describe_user(&auth.user)
        )));
        Ok(())
    }

    /// Print one catalog page. `page` is one-based as shown to the user.
    fn list(&mut self, page: usize) -> Result<(), String> {
        self.sign_in()?;
        let index = page.saturating_sub(1);
        let query = self.run.query;
        let result = {
            let _loading = self.spin("Loading books...");
            self.rt.block_on(self.client.list_books(&query, index))
        };
        let books = result.map_err(|e| e.user_message("Failed to load books"))?;

        if self.run.output_format == OutputFormat::Json {
            let json = output::render_json(&books, index)
                .map_err(|e| format!("failed to encode output: {e}"))?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&json)
                .and_then(|_| stdout.write_all(b"\n"))
                .map_err(|e| format!("failed to write output: {e}"))?;
            return Ok(());
        }

        let listing = listing_paginator(&books, index);
        if let Err(PageChangeRejected::OutOfRange { total_pages, .. }) = &listing {
            self.note(Notice::warning(format!(
                "Page {page} does not exist, the catalog has {total_pages} page(s)"
            )));
        }

        print!("{}", output::render_table(&books.content));
        if let Ok(paginator) = listing {
            let controls = output::render_page_controls(&paginator);
            if !controls.is_empty() {
                println!("{controls}");
            }
            println!("{}", output::render_page_info(&paginator).dimmed());
        }
        Ok(())
    }

    fn show(&mut self, id: u64) -> Result<(), String> {
        self.sign_in()?;
        let result = {
            let _loading = self.spin("Loading book...");
            self.rt.block_on(self.client.get_book(id))
        };
        let book = result.map_err(|e| e.user_message("Failed to load book"))?;
        print!("{}", output::render_book(&book));
        Ok(())
    }

    fn add(&mut self, fields: &BookFields) -> Result<(), String> {
        self.require_admin()?;
        let mut form = BookForm::default();
        fields.apply_to(&mut form);
        let draft = form
            .validate()
            .map_err(|errors| format!("Validation error: {errors}"))?;
        let result = {
            let _loading = self.spin("Saving book...");
            self.rt.block_on(self.client.create_book(&draft))
        };
        let book = result.map_err(|e| e.user_message("Failed to create book"))?;
        print!("{}", output::render_book(&book));
        self.note(Notice::success("Book created successfully"));
        Ok(())
    }

    fn edit(&mut self, id: u64, fields: &BookFields) -> Result<(), String> {
        self.require_admin()?;
        let current = {
            let _loading = self.spin("Loading book...");
            self.rt.block_on(self.client.get_book(id))
        }
        .map_err(|e| e.user_message("Failed to load book"))?;

        let mut form = BookForm::from_book(&current);
        fields.apply_to(&mut form);
        let draft = form
            .validate()
            .map_err(|errors| format!("Validation error: {errors}"))?;
        let result = {
            let _loading = self.spin("Saving book...");
            self.rt.block_on(self.client.update_book(id, &draft))
        };
        let book = result.map_err(|e| e.user_message("Failed to update book"))?;
        print!("{}", output::render_book(&book));
        self.note(Notice::success("Book updated successfully"));
        Ok(())
    }

    fn delete(&mut self, id: u64, yes: bool) -> Result<(), String> {
        self.require_admin()?;
        if !yes {
            let mut rl =
                DefaultEditor::new().map_err(|e| format!("failed to start line editor: {e}"))?;
            if !confirm(&mut rl, DELETE_QUESTION)? {
                self.note(Notice::info("Delete cancelled"));
                return Ok(());
            }
        }
        self.delete_request(id)
            .map_err(|e| e.user_message("Failed to delete book"))?;
        self.note(Notice::success("Book deleted successfully"));
        Ok(())
    }

    fn delete_request(&self, id: u64) -> Result<(), ClientError> {
        let _loading = self.spin("Deleting book...");
        self.rt.block_on(self.client.delete_book(id))
    }

    fn shell(&mut self) -> Result<(), String> {
        let user = self.sign_in()?;
        self.note(Notice::success(format!(
            "Signed in as {}. Type 'help' for commands.",
            describe_user(&user)
        )));

        let mut session = Session::new(user, self.run.query);
        let mut rl =
            DefaultEditor::new().map_err(|e| format!("failed to start line editor: {e}"))?;

        let first = session.reload();
        self.load(&mut session, first);

        loop {
            let line = match rl.readline(&shell_prompt(&session)) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(read_error(e)),
            };
            let _ = rl.add_history_entry(line.as_str());

            let command = match shell::parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    Notice::error(message).emit();
                    continue;
                }
            };

            match command {
                ShellCommand::Empty => {}
                ShellCommand::Help => println!("{}", shell::HELP),
                ShellCommand::Quit => break,
                ShellCommand::Whoami => println!("{}", describe_user(session.user())),
                ShellCommand::Show(id) => self.show_in_shell(&session, id),
                ShellCommand::Dispatch(actions) => {
                    // Only the newest reload matters; earlier tickets are superseded.
                    let mut pending = None;
                    for action in actions {
                        match session.dispatch(action) {
                            Effect::Reload(request) => pending = Some(request),
                            effect => {
                                if let Flow::Exit = self.perform(&mut rl, &mut session, effect)? {
                                    return Ok(());
                                }
                            }
                        }
                    }
                    if let Some(request) = pending {
                        self.load(&mut session, request);
                    }
                }
            }
        }
        Ok(())
    }

    fn perform(
        &mut self,
        rl: &mut DefaultEditor,
        session: &mut Session,
        effect: Effect,
    ) -> Result<Flow, String> {
        match effect {
            Effect::None => {}
            Effect::Reload(request) => {
                self.load(session, request);
            }
            Effect::OpenEditor(state) => return self.run_editor(rl, session, state),
            Effect::ConfirmDelete(id) => {
                if !confirm(rl, DELETE_QUESTION)? {
                    Notice::info("Delete cancelled").emit();
                    return Ok(Flow::Continue);
                }
                match self.delete_request(id) {
                    Ok(()) => {
                        Notice::success("Book deleted successfully").emit();
                        let effect = session.dispatch(Action::MutationSucceeded);
                        return self.perform(rl, session, effect);
                    }
                    Err(err) => Notice::error(err.user_message("Failed to delete book")).emit(),
                }
            }
            Effect::CloseEditor => Notice::info("Edit cancelled").emit(),
            Effect::SignedOut => {
                self.client.set_token(None);
                Notice::success("Logged out successfully").emit();
                return Ok(Flow::Exit);
            }
            Effect::Denied(reason) => Notice::warning(reason).emit(),
        }
        Ok(Flow::Continue)
    }

    fn run_editor(
        &mut self,
        rl: &mut DefaultEditor,
        session: &mut Session,
        state: EditorState,
    ) -> Result<Flow, String> {
        let EditorState { target, mut form } = state;
        let (heading, fallback, saved) = match target {
            MutationTarget::Create => (
                "New book".to_string(),
                "Failed to create book",
                "Book created successfully",
            ),
            MutationTarget::Update(id) => (
                format!("Editing book {id}"),
                "Failed to update book",
                "Book updated successfully",
            ),
        };
        println!("{}", heading.bold());

        loop {
            if !prompt_form(rl, &mut form)? {
                let effect = session.dispatch(Action::EditCancelled);
                return self.perform(rl, session, effect);
            }
            let draft = match form.validate() {
                Ok(draft) => draft,
                Err(errors) => {
                    Notice::error(format!("Validation error: {errors}")).emit();
                    continue;
                }
            };
            let result = {
                let _loading = self.spin("Saving book...");
                match target {
                    MutationTarget::Create => self.rt.block_on(self.client.create_book(&draft)),
                    MutationTarget::Update(id) => {
                        self.rt.block_on(self.client.update_book(id, &draft))
                    }
                }
            };
            match result {
                Ok(book) => {
                    debug!(id = book.id, "book saved");
                    Notice::success(saved).emit();
                    let effect = session.dispatch(Action::MutationSucceeded);
                    return self.perform(rl, session, effect);
                }
                Err(err) => Notice::error(err.user_message(fallback)).emit(),
            }
        }
    }

    /// Run `request` and any follow-up fetch a clamped page asks for, then render.
    fn load(&self, session: &mut Session, mut request: FetchRequest) {
        loop {
            let result = {
                let _loading = self.spin("Loading books...");
                self.rt
                    .block_on(self.client.list_books(&request.query, request.page))
            };
            match result {
                Ok(page) => match session.apply_page(request.ticket, page) {
                    Applied::Rendered => {
                        render_session(session);
                        return;
                    }
                    Applied::Stale => return,
                    Applied::Reload(next) => request = next,
                },
                Err(err) => {
                    Notice::error(err.user_message("Failed to load books")).emit();
                    return;
                }
            }
        }
    }

    fn show_in_shell(&self, session: &Session, id: u64) {
        if let Some(book) = session.book(id) {
            print!("{}", output::render_book(book));
            return;
        }
        let result = {
            let _loading = self.spin("Loading book...");
            self.rt.block_on(self.client.get_book(id))
        };
        match result {
            Ok(book) => print!("{}", output::render_book(&book)),
            Err(err) => Notice::error(err.user_message("Failed to load book")).emit(),
        }
    }
}

fn init_config(path: Option<PathBuf>) -> Result<(), String> {
    let path = path
        .or_else(config::default_config_path)
        .ok_or("could not determine home directory, pass --config")?;
    let created = config::ensure_default_config_file(&path).map_err(|e| e.to_string())?;
    if created {
        Notice::success(format!("Wrote default config to {}", path.display())).emit();
    } else {
        Notice::info(format!("Config already exists at {}", path.display())).emit();
    }
    Ok(())
}

fn load_user_config(args: &CliArgs) -> Result<ConfigFile, String> {
    match args.config.as_deref().map(config::expand_tilde) {
        Some(path) => {
            let allow_missing = matches!(args.command, Command::InitConfig);
            config::load_config(&path, allow_missing).map_err(|e| e.to_string())
        }
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true).map_err(|e| e.to_string()),
            None => Ok(ConfigFile::default()),
        },
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{}", e.render());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let cfg = load_user_config(&args)?;
    let run = build_run_config(args, cfg)?;

    if run.no_color {
        colored::control::set_override(false);
    }
    init_logging(run.verbose);

    App::new(run)?.execute()
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("bookstore-admin").chain(argv.iter().copied()))
    }

    #[test]
    fn defaults_when_nothing_is_configured() {
        let run = build_run_config(parse(&["list"]), ConfigFile::default()).unwrap();
        assert_eq!(run.api_url, DEFAULT_API_URL);
        assert_eq!(run.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(run.query, CatalogQuery::default());
        assert_eq!(run.output_format, OutputFormat::Text);
        assert!(!run.quiet);
    }

    #[test]
    fn config_file_fills_unset_options() {
        let cfg = ConfigFile {
            api_url: Some("http://books.local/api".to_string()),
            username: Some("admin".to_string()),
            page_size: Some(25),
            sort_by: Some("price".to_string()),
            sort_dir: Some("asc".to_string()),
            output_format: Some("json".to_string()),
            quiet: Some(true),
            ..ConfigFile::default()
        };
        let run = build_run_config(parse(&["list"]), cfg).unwrap();
        assert_eq!(run.api_url, "http://books.local/api");
        assert_eq!(run.username.as_deref(), Some("admin"));
        assert_eq!(run.query.size, 25);
        assert_eq!(run.query.sort_by, SortField::Price);
        assert_eq!(run.query.sort_dir, SortDir::Asc);
        assert_eq!(run.output_format, OutputFormat::Json);
        assert!(run.quiet);
    }

    #[test]
    fn flags_override_config_file() {
        let cfg = ConfigFile {
            api_url: Some("http://books.local/api".to_string()),
            timeout: Some(30),
            page_size: Some(25),
            sort_by: Some("price".to_string()),
            ..ConfigFile::default()
        };
        let args = parse(&[
            "--api-url",
            "http://override/api",
            "-T",
            "5",
            "list",
            "--size",
            "50",
            "--sort-by",
            "author",
        ]);
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.api_url, "http://override/api");
        assert_eq!(run.timeout, 5);
        assert_eq!(run.query.size, 50);
        assert_eq!(run.query.sort_by, SortField::Author);
    }

    #[test]
    fn invalid_config_values_are_reported() {
        let cfg = ConfigFile {
            page_size: Some(500),
            ..ConfigFile::default()
        };
        assert!(build_run_config(parse(&["shell"]), cfg).is_err());

        let cfg = ConfigFile {
            sort_dir: Some("sideways".to_string()),
            ..ConfigFile::default()
        };
        assert!(build_run_config(parse(&["list"]), cfg).is_err());

        let cfg = ConfigFile {
            timeout: Some(0),
            ..ConfigFile::default()
        };
        assert!(build_run_config(parse(&["show", "1"]), cfg).is_err());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(7), "trace");
    }

    #[test]
    fn explicit_config_path_is_kept() {
        let run = build_run_config(parse(&["-C", "/tmp/books.yml", "init-config"]), ConfigFile::default())
            .unwrap();
        assert_eq!(run.config_path, Some(PathBuf::from("/tmp/books.yml")));
    }

    #[test]
    fn init_config_accepts_missing_explicit_path() {
        let path = std::env::temp_dir().join(format!(
            "bookstore-admin-new-{}.yml",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let raw = path.to_string_lossy().to_string();

        let cfg = load_user_config(&parse(&["-C", &raw, "init-config"])).unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert!(load_user_config(&parse(&["-C", &raw, "list"])).is_err());

        init_config(Some(path.clone())).unwrap();
        assert_eq!(load_user_config(&parse(&["-C", &raw, "list"])).unwrap().timeout, Some(10));
        let _ = std::fs::remove_file(&path);
    }

    fn listing(total_pages: usize, total_elements: u64) -> BookPage {
        BookPage {
            content: vec![],
            total_pages,
            total_elements,
        }
    }

    #[test]
    fn first_page_of_empty_catalog_is_in_range() {
        let paginator = listing_paginator(&listing(0, 0), 0).unwrap();
        assert_eq!(paginator.current_page(), 0);
        assert_eq!(output::render_page_info(&paginator), "Page 1 of 1 (0 books)");
    }

    #[test]
    fn listing_page_beyond_last_is_rejected() {
        assert_eq!(listing_paginator(&listing(3, 25), 2).unwrap().current_page(), 2);
        assert!(matches!(
            listing_paginator(&listing(3, 25), 3),
            Err(PageChangeRejected::OutOfRange { total_pages: 3, .. })
        ));
        assert!(listing_paginator(&listing(0, 0), 1).is_err());
    }
}

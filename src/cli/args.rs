use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bookstore-admin",
    version,
    about = "administrative client for the bookstore catalog",
    long_about = "bookstore-admin signs in to the bookstore API, lists the book catalog page by page and lets administrators add, edit and delete books.\n\nExamples:\n  bookstore-admin -u admin --password secret list --sort-by price --sort-dir asc\n  BOOKSTORE_TOKEN=... bookstore-admin show 42\n  bookstore-admin -u admin shell\n\nTip: Use --config to persist the API URL and listing defaults."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help_heading = "Output",
        help = "Hide the loading spinner and informational notices."
    )]
    pub quiet: bool,

    #[arg(
        short = 'n',
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "config",
        visible_alias = "cfg",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.bookstore-admin/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "api-url",
        visible_alias = "url",
        value_name = "URL",
        env = "BOOKSTORE_API_URL",
        global = true,
        help_heading = "API",
        help = "Base URL of the bookstore API (e.g. http://localhost:8080/api)."
    )]
    pub api_url: Option<String>,

    #[arg(
        short = 'u',
        long = "username",
        value_name = "NAME",
        env = "BOOKSTORE_USERNAME",
        global = true,
        help_heading = "API",
        help = "Username to sign in with."
    )]
    pub username: Option<String>,

    #[arg(
        long = "password",
        value_name = "PASSWORD",
        env = "BOOKSTORE_PASSWORD",
        hide_env_values = true,
        global = true,
        help_heading = "API",
        help = "Password to sign in with."
    )]
    pub password: Option<String>,

    #[arg(
        long = "token",
        value_name = "TOKEN",
        env = "BOOKSTORE_TOKEN",
        hide_env_values = true,
        global = true,
        help_heading = "API",
        help = "Use an existing bearer token instead of signing in."
    )]
    pub token: Option<String>,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "API",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and print the bearer token.
    Login,

    /// Create an account and print the bearer token.
    Register {
        #[arg(long = "email", value_name = "EMAIL", help = "Email address for the new account.")]
        email: String,
    },

    /// List one page of the catalog.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a single book.
    Show {
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Add a book (administrators only).
    Add(BookFields),

    /// Edit a book (administrators only). Omitted fields keep their value.
    Edit {
        #[arg(value_name = "ID")]
        id: u64,
        #[command(flatten)]
        fields: BookFields,
    },

    /// Delete a book (administrators only).
    #[command(visible_alias = "rm")]
    Delete {
        #[arg(value_name = "ID")]
        id: u64,
        #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation.")]
        yes: bool,
    },

    /// Browse and manage the catalog interactively.
    Shell(QueryArgs),

    /// Write a default config file if none exists.
    InitConfig,
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    #[arg(
        short = 's',
        long = "size",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Listing",
        help = "Books per page."
    )]
    pub size: Option<u32>,

    #[arg(
        long = "sort-by",
        value_name = "FIELD",
        help_heading = "Listing",
        help = "Sort field (id, title, author, publishedDate, genre, price, isbn)."
    )]
    pub sort_by: Option<String>,

    #[arg(
        long = "sort-dir",
        value_name = "DIR",
        help_heading = "Listing",
        help = "Sort direction (asc or desc)."
    )]
    pub sort_dir: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        help_heading = "Listing",
        help = "Page number to show, starting at 1."
    )]
    pub page: Option<usize>,

    #[command(flatten)]
    pub query: QueryArgs,

    #[arg(
        short = 'f',
        long = "format",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BookFields {
    #[arg(long = "title", value_name = "TEXT", help_heading = "Book")]
    pub title: Option<String>,

    #[arg(long = "author", value_name = "TEXT", help_heading = "Book")]
    pub author: Option<String>,

    #[arg(
        long = "published-date",
        visible_alias = "date",
        value_name = "YYYY-MM-DD",
        help_heading = "Book"
    )]
    pub published_date: Option<String>,

    #[arg(long = "genre", value_name = "TEXT", help_heading = "Book", help = "Genre; pass an empty string to clear it.")]
    pub genre: Option<String>,

    #[arg(long = "price", value_name = "AMOUNT", help_heading = "Book")]
    pub price: Option<String>,

    #[arg(long = "isbn", value_name = "DIGITS", help_heading = "Book", help = "10 or 13 digits, no hyphens or spaces.")]
    pub isbn: Option<String>,
}

impl BookFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.published_date.is_none()
            && self.genre.is_none()
            && self.price.is_none()
            && self.isbn.is_none()
    }

    /// Overlay the provided fields on `form`.
    pub fn apply_to(&self, form: &mut crate::catalog::BookForm) {
        let pairs = [
            (&self.title, &mut form.title),
            (&self.author, &mut form.author),
            (&self.published_date, &mut form.published_date),
            (&self.genre, &mut form.genre),
            (&self.price, &mut form.price),
            (&self.isbn, &mut form.isbn),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }
}

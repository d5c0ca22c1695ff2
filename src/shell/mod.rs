//! Line commands accepted by the interactive shell.

use crate::catalog::{SortDir, SortField, MAX_PAGE_SIZE};
use crate::session::Action;

pub const HELP: &str = r#"
Navigation:
  next, n              - Next page
  prev, p              - Previous page
  page N               - Go to page N (starting at 1)
  first, last          - Go to the first or last page
  refresh, r           - Reload the current page

Listing:
  size N               - Books per page (resets to page 1)
  sort FIELD [DIR]     - Sort by id, title, author, publishedDate, genre, price or isbn
  dir asc|desc         - Sort direction (resets to page 1)

Books:
  show ID              - Show one book
  add                  - Add a book (administrators)
  edit ID              - Edit a book on this page (administrators)
  delete ID            - Delete a book (administrators)

Session:
  whoami               - Show the signed-in user
  logout               - Sign out and leave the shell
  help, h, ?           - Show this help message
  quit, exit, q        - Leave the shell

Press Ctrl-C while filling in a book to cancel.
"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Dispatch(Vec<Action>),
    Show(u64),
    Whoami,
    Help,
    Quit,
}

fn parse_id(raw: Option<&str>, usage: &str) -> Result<u64, String> {
    let raw = raw.ok_or_else(|| format!("usage: {usage}"))?;
    raw.parse::<u64>()
        .map_err(|_| format!("invalid book id '{raw}'"))
}

fn one(action: Action) -> ShellCommand {
    ShellCommand::Dispatch(vec![action])
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(ShellCommand::Empty);
    };
    let args: Vec<&str> = parts.collect();
    let arg = args.first().copied();

    let (command, used) = match head.to_lowercase().as_str() {
        "next" | "n" => (one(Action::NextPage), 0),
        "prev" | "previous" | "p" => (one(Action::PreviousPage), 0),
        "first" => (one(Action::FirstPage), 0),
        "last" => (one(Action::LastPage), 0),
        "refresh" | "r" => (one(Action::Refresh), 0),
        "page" | "go" => {
            let raw = arg.ok_or("usage: page N")?;
            let page: i64 = raw
                .parse()
                .map_err(|_| format!("invalid page number '{raw}'"))?;
            (one(Action::PageChangeRequested(page - 1)), 1)
        }
        "size" => {
            let raw = arg.ok_or("usage: size N")?;
            let size: u32 = raw
                .parse()
                .ok()
                .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
                .ok_or_else(|| format!("invalid page size '{raw}', expected 1-{MAX_PAGE_SIZE}"))?;
            (one(Action::PageSizeChanged(size)), 1)
        }
        "sort" => {
            let raw = arg.ok_or("usage: sort FIELD [asc|desc]")?;
            let field = SortField::parse(raw).ok_or_else(|| format!("unknown sort field '{raw}'"))?;
            let mut actions = vec![Action::SortFieldChanged(field)];
            if let Some(raw_dir) = args.get(1) {
                let dir = SortDir::parse(raw_dir)
                    .ok_or_else(|| format!("unknown sort direction '{raw_dir}'"))?;
                actions.push(Action::SortDirectionChanged(dir));
            }
            (ShellCommand::Dispatch(actions), 2)
        }
        "dir" => {
            let raw = arg.ok_or("usage: dir asc|desc")?;
            let dir = SortDir::parse(raw).ok_or_else(|| format!("unknown sort direction '{raw}'"))?;
            (one(Action::SortDirectionChanged(dir)), 1)
        }
        "show" => (ShellCommand::Show(parse_id(arg, "show ID")?), 1),
        "add" | "new" => (one(Action::CreateRequested), 0),
        "edit" => (one(Action::EditRequested(parse_id(arg, "edit ID")?)), 1),
        "delete" | "rm" => (one(Action::DeleteRequested(parse_id(arg, "delete ID")?)), 1),
        "whoami" => (ShellCommand::Whoami, 0),
        "logout" => (one(Action::LoggedOut), 0),
        "help" | "h" | "?" => (ShellCommand::Help, 0),
        "quit" | "exit" | "q" => (ShellCommand::Quit, 0),
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };

    if args.len() > used {
        return Err(format!("too many arguments for '{head}'"));
    }
    Ok(command)
}

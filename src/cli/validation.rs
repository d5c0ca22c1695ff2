use crate::catalog::{SortDir, SortField, MAX_PAGE_SIZE};
use crate::cli::args::{CliArgs, Command, QueryArgs};
use crate::output::OutputFormat;

fn validate_query(query: &QueryArgs) -> Result<(), String> {
    if let Some(size) = query.size {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(format!("invalid --size {size}, expected 1-{MAX_PAGE_SIZE}"));
        }
    }
    if let Some(raw) = query.sort_by.as_deref() {
        SortField::parse(raw).ok_or_else(|| format!("invalid --sort-by '{raw}'"))?;
    }
    if let Some(raw) = query.sort_dir.as_deref() {
        SortDir::parse(raw)
            .ok_or_else(|| format!("invalid --sort-dir '{raw}', expected asc or desc"))?;
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    match &args.command {
        Command::List(list) => {
            if list.page == Some(0) {
                return Err("invalid --page, pages start at 1".to_string());
            }
            if let Some(raw) = list.format.as_deref() {
                OutputFormat::parse(raw)
                    .ok_or_else(|| format!("invalid --format '{raw}', expected text or json"))?;
            }
            validate_query(&list.query)
        }
        Command::Shell(query) => validate_query(query),
        Command::Edit { fields, .. } if fields.is_empty() => {
            Err("nothing to change, pass at least one field to edit".to_string())
        }
        _ => Ok(()),
    }
}

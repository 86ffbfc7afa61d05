use std::error::Error as StdError;
use std::process;

use quaderno::{
    application::{archive, error::AppError},
    config::{self, CheckArgs, Command, ExportArgs, ListArgs, Settings, ShowArgs},
    domain::post::{KEY_DATE_FORMAT, ListFilter, PostKey, format_human_date},
    infra::telemetry,
    store::{Catalog, PostStore},
};
use time::Date;
use tracing::{dispatcher, error, info};

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
    } else {
        eprintln!("error: {error}");
    }

    let mut source = error.source();
    while let Some(inner) = source {
        if dispatcher::has_been_set() {
            error!(cause = %inner, "caused by");
        } else {
            eprintln!("  caused by: {inner}");
        }
        source = inner.source();
    }
}

fn run() -> Result<(), AppError> {
    let (args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let command = args.command.unwrap_or_else(|| Command::List(ListArgs::default()));
    match command {
        Command::List(list) => run_list(&settings, &list),
        Command::Show(show) => run_show(&settings, &show),
        Command::Check(check) => run_check(&settings, &check),
        Command::Export(export) => run_export(&settings, &export),
    }
}

fn scan_store(settings: &Settings) -> Result<Catalog, AppError> {
    let store = PostStore::new(&settings.store.root)
        .with_default_author(&settings.site.default_author)
        .with_comments_default(settings.site.comments_default);
    Ok(store.scan()?)
}

fn run_list(settings: &Settings, args: &ListArgs) -> Result<(), AppError> {
    let catalog = scan_store(settings)?;
    let filter = ListFilter {
        category: args.category.clone(),
        tag: args.tag.clone(),
        since: args.since.as_deref().map(parse_cli_date).transpose()?,
        until: args.until.as_deref().map(parse_cli_date).transpose()?,
    };
    let summaries = catalog.list(&filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in &summaries {
        let labels = if summary.categories.is_empty() {
            String::new()
        } else {
            format!("  [{}]", summary.categories.join(", "))
        };
        println!(
            "{}  {}{}",
            format_human_date(summary.key.date),
            summary.title,
            labels
        );
    }
    info!(posts = summaries.len(), "listed published posts");
    Ok(())
}

fn run_show(settings: &Settings, args: &ShowArgs) -> Result<(), AppError> {
    let catalog = scan_store(settings)?;
    let key = PostKey::new(parse_cli_date(&args.date)?, args.slug.clone());
    let post = catalog.get(&key)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(post)?);
        return Ok(());
    }

    println!("title: {}", post.title);
    println!("address: {}", post.key);
    println!("status: {}", post.status.as_str());
    println!("author: {}", post.author);
    println!("comments: {}", post.comments_enabled);
    if !post.categories.is_empty() {
        println!("categories: {}", post.categories.join(", "));
    }
    if !post.tags.is_empty() {
        println!("tags: {}", post.tags.join(", "));
    }
    if args.body {
        println!();
        println!("{}", post.body);
    }
    Ok(())
}

fn run_check(settings: &Settings, _args: &CheckArgs) -> Result<(), AppError> {
    let catalog = scan_store(settings)?;
    let diagnostics = catalog.diagnostics();

    for diagnostic in diagnostics {
        println!("{}:", diagnostic.path.display());
        for line in diagnostic.issue.to_string().lines() {
            println!("  {line}");
        }
    }

    let affected: std::collections::BTreeSet<_> =
        diagnostics.iter().map(|d| d.path.clone()).collect();
    if affected.is_empty() {
        println!("ok: {} published post(s)", catalog.list(&ListFilter::default()).len());
        Ok(())
    } else {
        Err(AppError::ChecksFailed {
            files: affected.len(),
        })
    }
}

fn run_export(settings: &Settings, args: &ExportArgs) -> Result<(), AppError> {
    let catalog = scan_store(settings)?;
    archive::write_archive(&catalog, &args.file)?;
    info!(
        posts = catalog.posts().len(),
        file = %args.file.display(),
        "exported corpus archive"
    );
    Ok(())
}

fn parse_cli_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw, KEY_DATE_FORMAT)
        .map_err(|_| AppError::usage(format!("`{raw}` is not a `YYYY-MM-DD` date")))
}

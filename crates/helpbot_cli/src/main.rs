//! Admin command line for the helpbot item store.
//!
//! # Responsibility
//! - Run maintenance tasks against the SQLite file without a bot token.
//! - Keep output deterministic so it can be piped into other tools.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use helpbot_core::{
    init_logging, open_db, search_items, write_items_csv, Actor, Item, ItemService, SearchQuery,
    SqliteItemRepository,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Local operators act with admin rights.
const OPERATOR: Actor = Actor {
    user_id: 0,
    is_admin: true,
};

#[derive(Parser, Debug)]
#[command(name = "helpbot-admin", author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "DB_PATH", default_value = "helpbot.sqlite3", global = true)]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every item as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Full-text search over saved items
    Search {
        query: String,
        /// Only items backed by an uploaded file
        #[arg(long)]
        files: bool,
        #[arg(long, default_value_t = 25)]
        limit: u32,
        /// Print JSON instead of one line per item
        #[arg(long)]
        json: bool,
    },
    /// Tags with item counts
    Tags,
    /// Remove one item by id
    Delete { id: i64 },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging("warn", None).map_err(anyhow::Error::msg)?;

    let mut conn = open_db(&cli.db_path)
        .with_context(|| format!("failed to open database {}", cli.db_path.display()))?;

    match cli.command {
        Command::Export { out } => {
            let items = ItemService::new(SqliteItemRepository::new(&mut conn))
                .export_items(OPERATOR)?;
            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    let rows = write_items_csv(&items, BufWriter::new(file))?;
                    eprintln!("exported {rows} items to {}", path.display());
                }
                None => {
                    write_items_csv(&items, io::stdout().lock())?;
                }
            }
        }
        Command::Search {
            query,
            files,
            limit,
            json,
        } => {
            let query = SearchQuery::new(query).files_only(files).limit(limit);
            let items = search_items(&conn, &query)?;
            let mut stdout = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut stdout, &items)?;
                writeln!(stdout)?;
            } else {
                for item in &items {
                    writeln!(stdout, "{}", summary_line(item))?;
                }
            }
        }
        Command::Tags => {
            let tags = ItemService::new(SqliteItemRepository::new(&mut conn)).list_tags()?;
            let mut stdout = io::stdout().lock();
            for tag in tags {
                writeln!(stdout, "#{}\t{}", tag.name, tag.items)?;
            }
        }
        Command::Delete { id } => {
            let deleted = ItemService::new(SqliteItemRepository::new(&mut conn))
                .delete_item(OPERATOR, id)?;
            println!("{}", if deleted { "Deleted." } else { "Not found." });
        }
    }

    Ok(())
}

fn summary_line(item: &Item) -> String {
    let target = item
        .url
        .as_deref()
        .or_else(|| item.file.as_ref().and_then(|file| file.file_name.as_deref()))
        .unwrap_or("-");
    let tags = helpbot_core::format_tags(&item.tags);
    format!("{}\t{:?}\t{}\t{}\t{}", item.id, item.kind(), item.title, target, tags)
}

#[cfg(test)]
mod tests {
    use super::{summary_line, Cli, Command};
    use clap::Parser;
    use helpbot_core::Item;

    #[test]
    fn parses_search_flags() {
        let cli = Cli::try_parse_from([
            "helpbot-admin",
            "search",
            "travel policy",
            "--files",
            "--limit",
            "5",
            "--db-path",
            "/tmp/x.sqlite3",
        ])
        .unwrap();
        assert_eq!(cli.db_path.to_str(), Some("/tmp/x.sqlite3"));
        match cli.command {
            Command::Search {
                query,
                files,
                limit,
                json,
            } => {
                assert_eq!(query, "travel policy");
                assert!(files);
                assert_eq!(limit, 5);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn summary_line_is_tab_separated() {
        let item = Item {
            id: 3,
            url: Some("https://a.example".to_string()),
            title: "A".to_string(),
            description: String::new(),
            tags: vec!["x".to_string()],
            added_by: None,
            added_at: String::new(),
            file: None,
        };
        assert_eq!(summary_line(&item), "3\tLink\tA\thttps://a.example\t#x");
    }
}

use super::exit_codes;
use crate::cli::args::{HistoryArgs, HistorySub, OutputFormat};
use anyhow::Result;
use coverctl_core::history::HistoryStore;
use coverctl_core::model::History;

pub fn cmd_history(args: HistoryArgs) -> Result<i32> {
    let store = HistoryStore::new(&args.history);
    match args.cmd {
        HistorySub::Show { format } => {
            let history = store.load()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
                _ => print_text(&history),
            }
        }
        HistorySub::Clear => {
            store.save(&History::default())?;
            eprintln!("cleared {}", args.history.display());
        }
    }
    Ok(exit_codes::OK)
}

fn print_text(history: &History) {
    if history.entries.is_empty() {
        println!("no recorded runs");
        return;
    }
    for entry in &history.entries {
        let commit = entry
            .commit
            .as_deref()
            .map(|c| format!(" {}", &c[..c.len().min(8)]))
            .unwrap_or_default();
        println!("{}  {:6.2}%{}", entry.timestamp, entry.overall, commit);
    }
}

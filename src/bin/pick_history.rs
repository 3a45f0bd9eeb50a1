use clap::Parser;
use idle_picker::utils::logger;
use idle_picker::HistoryLog;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pick-history")]
#[command(about = "Show the most recent idle picks")]
struct Args {
    /// Pick log written by idle-picker
    #[arg(long = "log", default_value = "./logs/idle_pick_log.csv")]
    log_path: PathBuf,

    /// How many entries to show, newest first
    #[arg(short = 'n', long, default_value = "10")]
    count: usize,

    /// Print entries as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let log = HistoryLog::new(&args.log_path);
    if !log.path().exists() {
        println!("尚無記錄 ({})", log.path().display());
        return Ok(());
    }

    let entries = log.recent_entries(args.count)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("📝 最近抽取記錄");
    for entry in &entries {
        println!("  {} {}  {}", entry.date, entry.time, entry.title);
    }
    if entries.is_empty() {
        println!("  (empty)");
    }

    Ok(())
}

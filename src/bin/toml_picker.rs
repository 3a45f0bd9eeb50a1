use clap::Parser;
use idle_picker::config::toml_config::TomlConfig;
use idle_picker::core::spin;
use idle_picker::domain::ports::ConfigProvider;
use idle_picker::utils::{logger, validation::Validate};
use idle_picker::{DrawEngine, DrawOutcome, FilterTier, LocalPipeline};
use std::io::Write;

#[derive(Parser)]
#[command(name = "toml-picker")]
#[command(about = "Idle picker driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "idle-picker.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the number of picks from config
    #[arg(long)]
    samples: Option<usize>,

    /// Override the exclusion words from config
    #[arg(long)]
    exclude: Option<String>,

    /// Show pool and eligibility without drawing or writing the log
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format(), args.verbose || config.verbose());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(samples) = args.samples {
        config.selection.samples = samples;
        tracing::info!("🔧 Samples overridden to: {}", samples);
    }
    if let Some(exclude) = args.exclude.clone() {
        config.selection.exclude = exclude;
        tracing::info!("🔧 Exclusion words overridden to: '{}'", config.selection.exclude);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let request = config.selection_request();
    let spinner = config.spinner();
    let mut engine = DrawEngine::new(LocalPipeline::new(config));

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be drawn or recorded");
        let prepared = match engine.prepare(&request) {
            Ok(prepared) => prepared,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(e.exit_code());
            }
        };
        println!("🔍 Dry Run Analysis:");
        println!(
            "  當前池中共有 {} 條，過濾後剩餘 {} 條可用",
            prepared.pool_size,
            prepared.outcome.candidates.len()
        );
        match prepared.outcome.tier {
            FilterTier::Strict => println!("  Filter: exclusion words + dedup window"),
            FilterTier::ExclusionOnly => {
                println!("  Filter: exclusion words only (every candidate was picked recently)")
            }
            FilterTier::Exhausted => println!("  ⚠️ No eligible candidates"),
        }
        return Ok(());
    }

    let result = match spinner {
        Some(spinner) => engine
            .run_with_spin(
                &request,
                &spinner,
                spin::interrupted(),
                |frame| {
                    let mut out = std::io::stdout();
                    let _ = write!(out, "\r\x1b[2K🎲 {}", frame.title);
                    let _ = out.flush();
                },
            )
            .await
            .map(|(outcome, _)| {
                println!("\r\x1b[2K");
                outcome
            }),
        None => engine.run(&request),
    };

    match result {
        Ok(DrawOutcome::Picked(report)) => {
            for pick in &report.picks {
                match pick.link() {
                    Some(link) => println!("✅ {}  🔗 {}", pick.title, link),
                    None => println!("✅ {}", pick.title),
                }
            }
        }
        Ok(DrawOutcome::Exhausted { .. }) => {
            println!("⚠️ 無可用候選，請增加清單或放寬條件。");
        }
        Err(e) => {
            tracing::error!(
                "❌ Draw failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Pool: {}", config.pool_path().display());
    println!("  Log: {}", config.log_path().display());
    println!("  Exclude: '{}'", config.exclude());
    println!("  Dedup Days: {}", config.dedup_days());
    println!("  Samples: {}", config.sample_count());

    match config.spinner() {
        Some(spinner) => println!(
            "  Animation: {} ticks from {:?}{}",
            spinner.ticks,
            spinner.interval,
            if spinner.slowdown { ", slowing" } else { "" }
        ),
        None => println!("  Animation: off"),
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

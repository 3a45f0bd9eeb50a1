use clap::Parser;
use idle_picker::domain::ports::ConfigProvider;
use idle_picker::core::spin;
use idle_picker::utils::{logger, validation::Validate};
use idle_picker::{Candidate, CliConfig, DrawEngine, DrawOutcome, LocalPipeline, PickerError};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(&config.log_format, config.verbose);

    tracing::info!("Starting idle-picker");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let request = config.selection_request();
    let spinner = config.spinner();
    let json = config.json;
    let mut engine = DrawEngine::new(LocalPipeline::new(config));

    let result = match spinner {
        Some(spinner) if !json => {
            engine
                .run_with_spin(&request, &spinner, spin::interrupted(), show_frame)
                .await
                .map(|(outcome, end)| {
                    tracing::debug!("Spin ended: {:?}", end);
                    clear_frame();
                    outcome
                })
        }
        _ => engine.run(&request),
    };

    match result {
        Ok(outcome) if json => match outcome.to_json_pretty() {
            Ok(body) => println!("{}", body),
            Err(e) => exit_with(e),
        },
        Ok(DrawOutcome::Picked(report)) => {
            for pick in &report.picks {
                println!("✅ {}", pick.title);
                if let Some(url) = &pick.url {
                    println!("   🔗 {}", url);
                }
            }
            println!(
                "📊 抽取 {} 條，候選 {}/{}，已寫入日誌",
                report.picks.len(),
                report.eligible,
                report.pool_size
            );
        }
        Ok(DrawOutcome::Exhausted { pool_size }) => {
            println!("⚠️ 無可用候選 (清單共 {} 條)，請增加清單或放寬條件。", pool_size);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn show_frame(candidate: &Candidate) {
    let mut out = std::io::stdout();
    let _ = write!(out, "\r\x1b[2K🎲 {}", candidate.title);
    let _ = out.flush();
}

fn clear_frame() {
    let mut out = std::io::stdout();
    let _ = write!(out, "\r\x1b[2K");
    let _ = out.flush();
}

fn exit_with(e: PickerError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Draw failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

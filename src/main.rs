use clap::Parser;
use export_cleanup::config::input::{pause_for_exit, program_dir};
use export_cleanup::utils::{logger, validation::Validate};
use export_cleanup::{
    CliConfig, EtlEngine, EtlError, ExportPipeline, InputResolver, LocalStorage,
};

const BANNER: &str = "\
********************************************************************************
                          Fivestars Export Cleanup Tool
********************************************************************************";

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    println!("{}", BANNER);

    let exit_code = match run(&config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(
                "❌ Export cleanup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            e.severity().exit_code()
        }
    };

    pause_for_exit(config.no_pause);

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

async fn run(config: &CliConfig) -> Result<(), EtlError> {
    config.validate()?;

    let program_dir = program_dir();
    let input_path = {
        let stdin = std::io::stdin();
        let mut resolver =
            InputResolver::new(stdin.lock(), std::io::stdout(), program_dir.clone());
        resolver.resolve(config.input.as_deref())?
    };

    let export_config = config.resolve(&input_path, &program_dir);
    let storage = LocalStorage::new(".".to_string());
    let pipeline = ExportPipeline::new(storage, export_config);
    let engine = EtlEngine::new(pipeline);

    let summary = engine.run().await?;

    println!("Processed {} rows.", summary.total);
    if summary.skipped_dates > 0 {
        println!(
            "Skipped {} rows with an unreadable birthday.",
            summary.skipped_dates
        );
    }
    tracing::info!("✅ Wrote {} rows to {}", summary.accepted, summary.output_path);

    Ok(())
}

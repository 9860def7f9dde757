use kuber_chat_run::args::{Args, Mode, Parsed};
use kuber_chat_run::chatbot::Check;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::parse() {
        Parsed::Run(args) => args,
        Parsed::Exit(code) => return ExitCode::from(code as u8),
    };

    let default_filter = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.mode == Mode::ListChecks {
        for check in Check::ALL {
            println!("  {}  {:<20} {}", check.id(), check.name(), check.description());
        }
        return ExitCode::SUCCESS;
    }

    let config = args.config;
    println!(
        "🚀 Running {} check(s) against {} (udid {})...",
        config.checks.len(),
        config.server_url,
        config.capabilities.udid
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(kuber_chat_run::run_suite(&config)) {
        Ok(summary) => {
            for record in &summary.records {
                let icon = if record.passed { "✅" } else { "❌" };
                println!("{icon} {:<20} {}", record.test, record.notes);
            }
            for path in &summary.screenshots {
                println!("📸 {}", path.display());
            }
            println!(
                "📄 {} passed, {} failed, results in {}",
                summary.passed(),
                summary.failed(),
                config.results_path.display()
            );
            if config.strict && summary.failed() > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

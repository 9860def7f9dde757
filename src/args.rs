use crate::chatbot::Check;
use crate::config::RunConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for `--timeout`, one hour
pub const MAX_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Run,
    ListChecks,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub debug_mode: bool,
    pub config: RunConfig,
}

/// Result of parsing: either arguments to run with, or an early exit
/// (help, version, or a bad flag) with the process exit code.
#[derive(Debug)]
pub enum Parsed {
    Run(Args),
    Exit(i32),
}

impl Args {
    pub fn parse() -> Parsed {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::parse_from(&args)
    }

    pub fn parse_from(args: &[String]) -> Parsed {
        let mut mode = Mode::Run;
        let mut debug_mode = false;
        let mut config = RunConfig::default();
        let mut selected: Vec<Check> = Vec::new();

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return Parsed::Exit(0);
            } else if arg == "--version" || arg == "-v" {
                println!(
                    "Kuber Chat Run v{} (built {})",
                    env!("KUBER_VERSION_DISPLAY"),
                    env!("KUBER_BUILD_DATE")
                );
                return Parsed::Exit(0);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--list" {
                mode = Mode::ListChecks;
            } else if arg == "--strict" {
                config.strict = true;
            } else if let Some(url) = arg.strip_prefix("--server=") {
                config.server_url = url.to_string();
            } else if let Some(udid) = arg.strip_prefix("--udid=") {
                config.capabilities.udid = udid.to_string();
            } else if let Some(name) = arg.strip_prefix("--device-name=") {
                config.capabilities.device_name = name.to_string();
            } else if let Some(path) = arg.strip_prefix("--results=") {
                config.results_path = PathBuf::from(path);
            } else if let Some(dir) = arg.strip_prefix("--screenshots=") {
                config.screenshot_dir = PathBuf::from(dir);
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                match val.parse::<u64>() {
                    Ok(secs) if (1..=MAX_TIMEOUT_SECS).contains(&secs) => {
                        config.element_timeout = Duration::from_secs(secs)
                    }
                    _ => {
                        eprintln!(
                            "❌ Invalid timeout value: {} (expected 1..={})",
                            val, MAX_TIMEOUT_SECS
                        );
                        return Parsed::Exit(2);
                    }
                }
            } else if let Some(name) = arg.strip_prefix("--check=") {
                match Check::from_name(name) {
                    Some(check) if !selected.contains(&check) => selected.push(check),
                    Some(_) => {}
                    None => {
                        eprintln!("❌ Unknown check '{}', see --list", name);
                        return Parsed::Exit(2);
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return Parsed::Exit(2);
            }
        }

        if !selected.is_empty() {
            // Always run in suite order, whatever order the flags came in
            config.checks = Check::ALL
                .into_iter()
                .filter(|c| selected.contains(c))
                .collect();
        }

        Parsed::Run(Args {
            mode,
            debug_mode,
            config,
        })
    }
}

fn print_help() {
    println!("💬 Kuber Chatbot UI Checks");
    println!();
    println!("USAGE:");
    println!("    kuber-chat-run [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)          Run all checks against the default Appium server");
    println!("    --server=URL        Appium server URL (default http://127.0.0.1:4723/)");
    println!("    --udid=ID           Device serial (default ZD2229BTDK)");
    println!("    --device-name=NAME  Device name capability (default Moto G74)");
    println!("    --results=PATH      Result log (default target/kuber_results.csv)");
    println!("    --screenshots=DIR   Failure screenshots (default target/screenshots)");
    println!("    --timeout=N         Element wait in seconds, 1-3600 (default 25)");
    println!("    --check=NAME        Run only this check (id or name, repeatable)");
    println!("    --list              List the checks and exit");
    println!("    --strict            Exit with status 1 if any check records FAIL");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    kuber-chat-run");
    println!("    kuber-chat-run --check=t01 --check=emptyInput --debug");
    println!("    kuber-chat-run --server=http://192.168.1.20:4723/ --udid=emulator-5554");
}

// This file is part of the product Tagserve.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::path::PathBuf;

use tagserve::app_state::AppState;
use tagserve::config::{self, Config};
use tagserve::{api, assets, headers};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <config.yaml> to choose a config file.");
            return 1;
        }
    };

    if parsed_args.show_help {
        print!("{}", help_text());
        return 0;
    }

    let config = match config::load_or_default(&parsed_args.config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("❌ Configuration error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(config)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(config: Config) -> std::io::Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    // Configure logging with a stable format
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(|error| {
            eprintln!("❌ Failed to initialize logger: {}", error);
            std::io::Error::other(error.to_string())
        })?;

    let host = config.server.host.clone();
    let port = config.server.port;
    let csv_path = config.data.csv_path.clone();
    let asset_root = config.assets.as_ref().map(|assets| assets.root.clone());

    info!("CSV path: {}", csv_path.display());
    info!("API: GET /api/explanations, POST /api/explanations/<row_id>");
    match &asset_root {
        Some(root) => info!(
            "Serving tagger at http://{}:{}/{} (assets from {})",
            host,
            port,
            assets::INDEX_FILE,
            root.display()
        ),
        None => info!("Static asset host disabled; API only at http://{}:{}", host, port),
    }

    let state = web::Data::new(AppState::new(csv_path));

    HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .wrap(headers::Cors)
            .configure(api::configure);
        match &asset_root {
            Some(root) => {
                let root = root.clone();
                app.configure(move |cfg| assets::configure(cfg, &root))
            }
            None => app,
        }
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[derive(Debug)]
struct ParsedArgs {
    config_path: PathBuf,
    show_help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config_path = PathBuf::from("config.yaml");
    let mut show_help = false;

    while let Some(arg) = args.next() {
        if is_help_flag(&arg) {
            show_help = true;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            config_path = PathBuf::from(value);
        } else {
            return Err(format!("Unknown argument '{}'", arg));
        }
    }

    Ok(ParsedArgs {
        config_path,
        show_help,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn help_text() -> String {
    "\
tagserve — HTTP tagging service over a flat CSV table

Usage: tagserve [-C <config.yaml>] [-h|--help]

  -C <config.yaml>  Config file to load (defaults apply when the file
                    does not exist)
  -h, --help        Show this help

Config keys: server.host, server.port, data.csv_path, assets.root,
logging.level
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_args_defaults_to_local_config() {
        let parsed = parse_args_from(Vec::new()).expect("parse args");
        assert!(!parsed.show_help);
        assert_eq!(parsed.config_path, PathBuf::from("config.yaml"));
    }

    #[test]
    fn parse_args_accepts_config_path() {
        let parsed = parse_args_from(args(&["-C", "/etc/tagserve.yaml"])).expect("parse args");
        assert_eq!(parsed.config_path, PathBuf::from("/etc/tagserve.yaml"));
    }

    #[test]
    fn parse_args_requires_config_value() {
        let error = parse_args_from(args(&["-C"])).expect_err("must fail");
        assert!(error.contains("Missing value"));
    }

    #[test]
    fn parse_args_rejects_unknown_flags() {
        let error = parse_args_from(args(&["--daemon"])).expect_err("must fail");
        assert!(error.contains("Unknown argument"));
    }

    #[test]
    fn parse_args_honors_help() {
        let parsed = parse_args_from(args(&["--help"])).expect("parse args");
        assert!(parsed.show_help);
        assert!(help_text().contains("Usage"));
    }
}

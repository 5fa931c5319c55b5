//! `zhex <file> [--backup <path>] [--settings <path>]`
//!
//! Opens one binary document and serves a single view over stdio: outbound
//! envelopes are written to stdout as JSON lines, inbound messages are read
//! from stdin. Host notices go to stderr.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use zhex::kernel::services::adapters::stdio::{reader_loop, writer_loop};
use zhex::kernel::services::adapters::{
    ensure_settings_file, find_backup, load_settings, HexDumpMarkup, LocalByteSource,
};
use zhex::kernel::services::{host_bus, HostMessage};
use zhex::kernel::{DocumentUri, EditorController, ViewHandle};

mod logging;

const USAGE: &str = "usage: zhex <file> [--backup <path>] [--settings <path>]";

#[derive(Debug, PartialEq, Eq)]
struct StartupArgs {
    file: PathBuf,
    backup: Option<PathBuf>,
    settings: Option<PathBuf>,
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.into())
}

fn absolutize(cwd: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn parse_args(cwd: &Path, args: impl IntoIterator<Item = String>) -> io::Result<StartupArgs> {
    let mut file = None;
    let mut backup = None;
    let mut settings = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--backup" | "--settings" => {
                let value = args
                    .next()
                    .ok_or_else(|| invalid(format!("{arg} needs a value")))?;
                let path = absolutize(cwd, &value);
                if arg == "--backup" {
                    backup = Some(path);
                } else {
                    settings = Some(path);
                }
            }
            flag if flag.starts_with("--") => {
                return Err(invalid(format!("unknown option {flag}")));
            }
            raw => {
                if file.is_some() {
                    return Err(invalid(format!("unexpected argument {raw}")));
                }
                file = Some(absolutize(cwd, raw));
            }
        }
    }

    let file = file.ok_or_else(|| invalid("missing file argument"))?;
    if !file.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", file.display()),
        ));
    }
    if !file.is_file() {
        return Err(invalid(format!("{} is not a file", file.display())));
    }

    Ok(StartupArgs {
        file,
        backup,
        settings,
    })
}

async fn run(args: StartupArgs) -> io::Result<()> {
    if args.settings.is_none() {
        if let Err(e) = ensure_settings_file() {
            tracing::warn!(error = %e, "could not write default settings");
        }
    }
    let config = load_settings(args.settings.as_deref()).editor_config();
    let (bus, mut notices) = host_bus();
    let controller = EditorController::new(
        config,
        Arc::new(LocalByteSource::new()),
        Arc::new(HexDumpMarkup::default()),
        bus,
    );

    let uri = DocumentUri::from_path(&args.file);
    let backup = args
        .backup
        .as_deref()
        .map(DocumentUri::from_path)
        .or_else(|| find_backup(&uri));
    if let Some(backup) = &backup {
        tracing::info!(uri = %uri, backup = %backup, "restoring from backup");
    }
    controller
        .open_document(uri.clone(), backup)
        .map_err(io::Error::other)?;

    let (view, port) = ViewHandle::channel();
    let id = view.id();
    controller
        .resolve_view(&uri, view.clone())
        .map_err(io::Error::other)?;
    let writer = tokio::spawn(writer_loop(port, tokio::io::stdout()));

    reader_loop(tokio::io::stdin(), |message| {
        controller.handle_view_message(id, message);
        for HostMessage::Notice(notice) in notices.drain() {
            eprintln!("[{}] {}", notice.level, notice.message);
        }
    })
    .await?;

    view.dispose();
    drop(view);
    controller.close_document(&uri);

    match writer.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "view writer task failed");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let _logging = logging::init();

    let args = std::env::current_dir()
        .and_then(|cwd| parse_args(&cwd, std::env::args().skip(1)));
    let args = match args {
        Ok(args) => args,
        Err(e) => {
            eprintln!("zhex: {e}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("zhex: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "zhex exited with error");
            eprintln!("zhex: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/cli_args.rs"]
mod cli_args;

//! CLI command implementations
//!
//! Both commands share one startup sequence:
//! 1. Configuration load and flag overrides
//! 2. Log level
//! 3. Record file load
//! 4. Controller construction and initial collection load
//!
//! `view` then prints the single resulting view. `serve` keeps the
//! controller alive and applies one JSON command per stdin line.

use std::io;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use super::args::{Cli, Command, ViewArgs};
use super::config::ViewConfig;
use super::errors::{CliError, CliResult};
use super::io::{encode_event, load_records, write_event};
use crate::controller::SnapshotController;
use crate::notify::{ChannelSubscriber, ViewEvent};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::session::{self, Command as SessionCommand, Session};

/// Commands buffered between stdin and the session
const COMMAND_BUFFER: usize = 64;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::View { view: args } => view(&args),
        Command::Serve { view: args } => serve(&args),
    }
}

/// Print one `contentUpdated` event for the configured view
pub fn view(args: &ViewArgs) -> CliResult<()> {
    let event = render_view(args)?;
    write_event(&mut io::stdout().lock(), &event)
}

/// The event `view` would print
pub fn render_view(args: &ViewArgs) -> CliResult<ViewEvent> {
    let (mut controller, records) = open_controller(args)?;
    controller.load_json(records)?;

    let view = controller
        .current_view()?
        .ok_or_else(|| CliError::data_error("no collection loaded"))?;
    Ok(ViewEvent::ContentUpdated(view))
}

/// Load, then apply stdin commands until EOF
pub fn serve(args: &ViewArgs) -> CliResult<()> {
    let (controller, records) = open_controller(args)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(serve_stream(
        controller,
        records,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ))?;
    Ok(())
}

/// Drive a session from `input` lines, writing every event to `output`.
///
/// The initial load must succeed; later failures are reported in-band as
/// `commandRejected` events. Returns the controller once `input` is
/// exhausted and every event has been written.
pub async fn serve_stream<R, W>(
    mut controller: SnapshotController,
    records: Vec<Value>,
    input: R,
    mut output: W,
) -> CliResult<SnapshotController>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (events, mut outbox) = mpsc::unbounded_channel();
    let subscription = controller.subscribe(ChannelSubscriber::new(events.clone()));
    controller.load_json(records)?;

    let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);

    let session_task = async move {
        let mut controller = session::run(Session::new(controller), inbox, events)
            .await
            .into_controller();
        // Last sender gone: lets the writer drain and stop
        controller.unsubscribe(subscription);
        controller
    };

    let reader = async move {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if commands.send(SessionCommand::decode(&line)).await.is_err() {
                break;
            }
        }
        Ok::<(), CliError>(())
    };

    let writer = async {
        while let Some(event) = outbox.recv().await {
            output.write_all(encode_event(&event)?.as_bytes()).await?;
            output.flush().await?;
        }
        Ok::<(), CliError>(())
    };

    let (controller, read, write) = tokio::join!(session_task, reader, writer);
    read?;
    write?;
    Ok(controller)
}

/// Shared startup: config, log level, records and an unloaded controller
pub fn open_controller(args: &ViewArgs) -> CliResult<(SnapshotController, Vec<Value>)> {
    let config = ViewConfig::resolve(args)?;
    Logger::set_min_severity(config.severity()?);

    if let Some(path) = &args.config {
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
    }

    let records = load_records(&args.data)?;
    let controller = SnapshotController::with_state(config.sort_state()?, config.page_state()?);
    Ok((controller, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn data_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"ann","age":30}},{{"name":"bob","age":20}},{{"name":"cat","age":50}}]"#
        )
        .unwrap();
        file
    }

    fn args(file: &NamedTempFile) -> ViewArgs {
        ViewArgs {
            data: file.path().to_path_buf(),
            ..ViewArgs::default()
        }
    }

    #[test]
    fn test_render_view_applies_flags() {
        let file = data_file();
        let args = ViewArgs {
            sort: Some("age".into()),
            direction: Some("descending".into()),
            per_page: Some(2),
            ..args(&file)
        };

        let event = render_view(&args).unwrap();
        let view = event.view().unwrap();
        let names: Vec<_> = view.column("name").filter_map(|v| v.as_str()).collect();
        assert_eq!(names, vec!["cat", "ann"]);
        assert_eq!(view.statistics.total_pages, 2);
    }

    #[test]
    fn test_render_view_unknown_sort_falls_back() {
        let file = data_file();
        let args = ViewArgs {
            sort: Some("height".into()),
            ..args(&file)
        };
        let event = render_view(&args).unwrap();
        assert_eq!(event.view().unwrap().statistics.sort_key, "name");
    }

    #[tokio::test]
    async fn test_serve_stream_round() {
        let file = data_file();
        let (controller, records) = open_controller(&args(&file)).unwrap();

        let input = concat!(
            r#"{"command":"sortBy","value":{"key":"age","direction":"ascending"}}"#,
            "\n\n",
            r#"{"command":"pageNumber","value":0}"#,
            "\n",
            r#"{"command":"filter","key":"age","value":{"range":[25,null]}}"#,
            "\n",
        );
        let mut output = Vec::new();
        let controller = serve_stream(controller, records, input.as_bytes(), &mut output)
            .await
            .unwrap();

        let events: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let names: Vec<_> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["contentUpdated", "contentUpdated", "commandRejected", "contentUpdated"]
        );
        assert_eq!(events[3]["payload"]["statistics"]["totalModels"], 2);
        assert_eq!(controller.metrics().snapshot().commands_rejected, 1);
    }
}

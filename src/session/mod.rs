//! Command session over a message channel
//!
//! A [`Session`] owns one controller and applies commands strictly one at a
//! time. [`run`] drives a session from an `mpsc` receiver until every sender
//! is gone; each command finishes its mutation and notification before the
//! next one is taken off the channel.

mod command;

pub use command::{Command, SortRequest};

use tokio::sync::mpsc;

use crate::controller::SnapshotController;
use crate::filter::Filter;
use crate::index::SortDirection;
use crate::notify::{EventSender, ViewEvent};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::view::{page_number_from_signed, per_page_from_signed, ViewError, ViewResult};

/// One controller plus its command dispatch
#[derive(Debug)]
pub struct Session {
    controller: SnapshotController,
}

impl Session {
    pub fn new(controller: SnapshotController) -> Self {
        Self { controller }
    }

    /// Validate and apply one command.
    ///
    /// Wire values are checked here; a failure is still counted and logged
    /// as a rejected command.
    pub fn apply(&mut self, command: Command) -> ViewResult<()> {
        let name = command.name();
        match command {
            Command::PerPage { value } => {
                let per_page = self.checked(name, per_page_from_signed(value))?;
                self.controller.set_per_page(per_page)
            }
            Command::PageNumber { value } => {
                let page_number = self.checked(name, page_number_from_signed(value))?;
                self.controller.set_page_number(page_number)
            }
            Command::SortBy { value } => {
                let direction = value
                    .direction
                    .as_deref()
                    .map(str::parse::<SortDirection>)
                    .transpose()
                    .map_err(ViewError::from);
                let direction = self.checked(name, direction)?;
                self.controller.set_sort_by(&value.key, direction)
            }
            Command::Filter { key, value } => {
                let filter = self.checked(name, Filter::try_from(value).map_err(ViewError::from))?;
                self.controller.apply_filter(&key, filter)
            }
            Command::ClearFilter { key } => self.controller.clear_filter(&key),
            Command::ClearFilters => self.controller.clear_filters(),
            Command::Load { value } => self.controller.load_json(value),
        }
    }

    /// Apply a decoded frame; undecodable frames count as rejected
    pub fn apply_frame(&mut self, frame: ViewResult<Command>) -> ViewResult<()> {
        let command = self.checked("frame", frame)?;
        self.apply(command)
    }

    fn checked<T>(&self, command: &str, value: ViewResult<T>) -> ViewResult<T> {
        value.map_err(|e| self.controller.reject(command, e))
    }

    pub fn controller(&self) -> &SnapshotController {
        &self.controller
    }

    pub fn into_controller(self) -> SnapshotController {
        self.controller
    }
}

/// Drain `commands` into `session` until the channel closes.
///
/// Malformed frames and rejected commands get a `commandRejected` reply on
/// `replies`. Returns the session so the caller can inspect final state.
pub async fn run(
    mut session: Session,
    mut commands: mpsc::Receiver<ViewResult<Command>>,
    replies: EventSender,
) -> Session {
    log_event(Event::SessionStart);

    while let Some(frame) = commands.recv().await {
        if let Err(e) = session.apply_frame(frame) {
            // A closed reply channel only loses the rejection notice
            let _ = replies.send(ViewEvent::rejected(&e));
        }
    }

    let metrics = session.controller().metrics().to_json();
    log_event_with_fields(Event::SessionEnd, &[("metrics", metrics.as_str())]);
    session
}

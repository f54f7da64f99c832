//! Data bridge: connects [`Controller`] channels to TUI actions.
//!
//! Runs as a background task. Subscribes before the initial load so the
//! load's own notices are not missed, then forwards every collection,
//! view and notice change as an [`Action`] until cancelled.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use roombook_core::Controller;

use crate::action::Action;

pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut rooms = controller.rooms();
    let mut bookings = controller.bookings();
    let mut view = controller.subscribe_view();
    let mut notices = controller.subscribe_notices();

    let _ = action_tx.send(Action::RoomsUpdated(rooms.current().clone()));
    let _ = action_tx.send(Action::BookingsUpdated(bookings.current().clone()));
    let initial_view = view.borrow_and_update().clone();
    let _ = action_tx.send(Action::ViewChanged(Box::new(initial_view)));

    if let Err(e) = controller.load().await {
        warn!(error = %e, "initial load failed");
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(r) = rooms.changed() => {
                debug!(count = r.len(), "dispatching RoomsUpdated");
                let _ = action_tx.send(Action::RoomsUpdated(r));
            }
            Some(b) = bookings.changed() => {
                debug!(count = b.len(), "dispatching BookingsUpdated");
                let _ = action_tx.send(Action::BookingsUpdated(b));
            }
            Ok(()) = view.changed() => {
                let snapshot = view.borrow_and_update().clone();
                let _ = action_tx.send(Action::ViewChanged(Box::new(snapshot)));
            }
            Ok(notice) = notices.recv() => {
                let _ = action_tx.send(Action::Notify(notice));
            }
        }
    }

    debug!("data bridge stopped");
}

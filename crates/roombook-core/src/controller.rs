// ── Controller ──
//
// Holds the local mirror of rooms and bookings plus the UI mode flags,
// and runs every CRUD flow: call the API, patch the local copy on
// success, switch modes, publish a notice.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use roombook_api::{ApiClient, TransportConfig};
use roombook_types::{Booking, ExportDocument, NewBookingPayload, Room, RoomFormPayload};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult};
use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::notice::Notice;
use crate::stats::Stats;
use crate::store::DataStore;
use crate::stream::EntityStream;
use crate::transfer;
use crate::view::{BookingView, FormMode, Section, ViewState};

const NOTICE_CHANNEL_SIZE: usize = 64;

/// The main entry point for front ends.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Clones share the same
/// store, view state and notice channel.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    api: ApiClient,
    store: Arc<DataStore>,
    view: watch::Sender<ViewState>,
    notice_tx: broadcast::Sender<Notice>,
}

impl Controller {
    /// Build a controller and its HTTP client. Does not contact the
    /// server; call [`load()`](Self::load) for the initial fetch.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let api = ApiClient::new(&config.api_url, &transport)?;
        Ok(Self::with_client(config, api))
    }

    /// Build a controller around an existing API client.
    pub fn with_client(config: ControllerConfig, api: ApiClient) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);

        Self {
            inner: Arc::new(ControllerInner {
                config,
                api,
                store: Arc::new(DataStore::new()),
                view,
                notice_tx,
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn rooms(&self) -> EntityStream<Room> {
        self.inner.store.subscribe_rooms()
    }

    pub fn bookings(&self) -> EntityStream<Booking> {
        self.inner.store.subscribe_bookings()
    }

    pub fn view(&self) -> ViewState {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<ViewState> {
        self.inner.view.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notice_tx.subscribe()
    }

    pub fn stats(&self) -> Stats {
        let store = &self.inner.store;
        Stats::compute(&store.rooms_snapshot(), &store.bookings_snapshot())
    }

    // ── Initial load ─────────────────────────────────────────────────

    /// Fetch rooms and bookings concurrently and replace both collections.
    ///
    /// Both requests must succeed. If either fails, both collections are
    /// left empty and an error notice is published.
    pub async fn load(&self) -> Result<(), CoreError> {
        self.update_view(|v| v.loading = true);

        let api = &self.inner.api;
        let (rooms, bookings) = tokio::join!(api.list_rooms(), api.list_bookings());

        self.update_view(|v| v.loading = false);

        let store = &self.inner.store;
        match (rooms, bookings) {
            (Ok(rooms), Ok(bookings)) => {
                info!(rooms = rooms.len(), bookings = bookings.len(), "loaded data");
                store.apply_document(ExportDocument { rooms, bookings });
                store.mark_loaded();
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                // Only a first load that never populated the store is wiped.
                if store.last_load().is_none() {
                    store.clear();
                }
                Err(self.fail("load data", e))
            }
        }
    }

    // ── Room mutations ───────────────────────────────────────────────

    pub async fn create_room(&self, payload: &RoomFormPayload) -> Result<Arc<Room>, CoreError> {
        let room = self
            .inner
            .api
            .create_room(payload)
            .await
            .map_err(|e| self.fail("create room", e))?;

        let room = self.inner.store.rooms.push(room);
        self.update_view(ViewState::close_room_form);
        self.notify(Notice::success(format!("Room {} created", room.code)));
        Ok(room)
    }

    pub async fn update_room(
        &self,
        id: &str,
        payload: &RoomFormPayload,
    ) -> Result<Arc<Room>, CoreError> {
        let room = self
            .inner
            .api
            .update_room(id, payload)
            .await
            .map_err(|e| self.fail("update room", e))?;

        let room = Arc::new(room);
        if !self.inner.store.rooms.replace(Room::clone(&room)) {
            debug!(id, "updated room was not in the local list");
        }
        self.update_view(ViewState::close_room_form);
        self.notify(Notice::success(format!("Room {} updated", room.code)));
        Ok(room)
    }

    pub async fn delete_room(&self, id: &str) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_room(id)
            .await
            .map_err(|e| self.fail("delete room", e))?;

        self.inner.store.rooms.remove(id);
        self.notify(Notice::success("Room deleted"));
        Ok(())
    }

    // ── Booking mutations ────────────────────────────────────────────

    pub async fn create_booking(
        &self,
        payload: &NewBookingPayload,
    ) -> Result<Arc<Booking>, CoreError> {
        let booking = self
            .inner
            .api
            .create_booking(payload)
            .await
            .map_err(|e| self.fail("create booking", e))?;

        let booking = self.inner.store.bookings.push(booking);
        self.update_view(ViewState::reset_bookings);
        self.notify(Notice::success(format!(
            "Booking for {} on {} created",
            booking.room_code, booking.date
        )));
        Ok(booking)
    }

    pub async fn update_booking(
        &self,
        id: &str,
        payload: &NewBookingPayload,
    ) -> Result<Arc<Booking>, CoreError> {
        let booking = self
            .inner
            .api
            .update_booking(id, payload)
            .await
            .map_err(|e| self.fail("update booking", e))?;

        let booking = self.replace_booking(booking);
        self.update_view(ViewState::close_booking_form);
        self.notify(Notice::success("Booking updated"));
        Ok(booking)
    }

    /// Cancel a booking. The form mode is left as it is.
    pub async fn cancel_booking(&self, id: &str) -> Result<Arc<Booking>, CoreError> {
        let booking = self
            .inner
            .api
            .cancel_booking(id)
            .await
            .map_err(|e| self.fail("cancel booking", e))?;

        let booking = self.replace_booking(booking);
        self.notify(Notice::success("Booking cancelled"));
        Ok(booking)
    }

    pub async fn delete_booking(&self, id: &str) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_booking(id)
            .await
            .map_err(|e| self.fail("delete booking", e))?;

        self.inner.store.bookings.remove(id);
        self.notify(Notice::success("Booking deleted"));
        Ok(())
    }

    fn replace_booking(&self, booking: Booking) -> Arc<Booking> {
        let booking = Arc::new(booking);
        if !self.inner.store.bookings.replace(Booking::clone(&booking)) {
            debug!(id = %booking.id, "updated booking was not in the local list");
        }
        booking
    }

    // ── Form submission ──────────────────────────────────────────────

    /// Create or update depending on the room form mode.
    pub async fn submit_room_form(
        &self,
        payload: &RoomFormPayload,
    ) -> Result<Arc<Room>, CoreError> {
        let editing = {
            let view = self.inner.view.borrow();
            match (view.room_mode, &view.editing_room) {
                (FormMode::Edit, Some(room)) => Some(room.id.clone()),
                _ => None,
            }
        };
        match editing {
            Some(id) => self.update_room(&id, payload).await,
            None => self.create_room(payload).await,
        }
    }

    /// Create or update depending on the booking form mode.
    pub async fn submit_booking_form(
        &self,
        payload: &NewBookingPayload,
    ) -> Result<Arc<Booking>, CoreError> {
        let editing = {
            let view = self.inner.view.borrow();
            match (view.booking_mode, &view.editing_booking) {
                (FormMode::Edit, Some(booking)) => Some(booking.id.clone()),
                _ => None,
            }
        };
        match editing {
            Some(id) => self.update_booking(&id, payload).await,
            None => self.create_booking(payload).await,
        }
    }

    // ── Command routing ──────────────────────────────────────────────

    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        debug!(?command, "executing command");
        match command {
            Command::CreateRoom(payload) => {
                self.create_room(&payload).await.map(CommandResult::Room)
            }
            Command::UpdateRoom { id, payload } => self
                .update_room(&id, &payload)
                .await
                .map(CommandResult::Room),
            Command::DeleteRoom { id } => {
                self.delete_room(&id).await.map(|()| CommandResult::Ok)
            }
            Command::CreateBooking(payload) => self
                .create_booking(&payload)
                .await
                .map(CommandResult::Booking),
            Command::UpdateBooking { id, payload } => self
                .update_booking(&id, &payload)
                .await
                .map(CommandResult::Booking),
            Command::CancelBooking { id } => self
                .cancel_booking(&id)
                .await
                .map(CommandResult::Booking),
            Command::DeleteBooking { id } => {
                self.delete_booking(&id).await.map(|()| CommandResult::Ok)
            }
            Command::Reload => self.load().await.map(|()| CommandResult::Ok),
        }
    }

    // ── Mode intents ─────────────────────────────────────────────────

    pub fn navigate(&self, section: Section) {
        self.update_view(|v| v.navigate(section));
    }

    pub fn begin_create_booking(&self) {
        self.update_view(|v| {
            v.booking_mode = FormMode::Create;
            v.editing_booking = None;
        });
    }

    pub fn begin_edit_booking(&self, booking: &Booking) {
        self.update_view(|v| {
            v.booking_mode = FormMode::Edit;
            v.editing_booking = Some(booking.clone());
        });
    }

    pub fn close_booking_form(&self) {
        self.update_view(ViewState::close_booking_form);
    }

    pub fn set_booking_view(&self, booking_view: BookingView) {
        self.update_view(|v| v.booking_view = booking_view);
    }

    pub fn begin_create_room(&self) {
        self.update_view(|v| {
            v.room_mode = FormMode::Create;
            v.editing_room = None;
        });
    }

    pub fn begin_edit_room(&self, room: &Room) {
        self.update_view(|v| {
            v.room_mode = FormMode::Edit;
            v.editing_room = Some(room.clone());
        });
    }

    pub fn close_room_form(&self) {
        self.update_view(ViewState::close_room_form);
    }

    // ── Export / import ──────────────────────────────────────────────

    /// Owned copy of the current local dataset.
    pub fn export_document(&self) -> ExportDocument {
        self.inner.store.to_document()
    }

    /// Pretty-printed JSON of the current local dataset.
    pub fn export_json(&self) -> Result<String, CoreError> {
        transfer::render(&self.export_document())
    }

    /// Write the export into `dir` under a dated file name and return its path.
    pub async fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        let json = self.export_json()?;
        let path = dir.join(transfer::export_file_name(chrono::Utc::now().date_naive()));

        if let Err(e) = tokio::fs::write(&path, json).await {
            warn!(error = %e, path = %path.display(), "export failed");
            self.notify(Notice::error(format!("Export failed: {e}")));
            return Err(e.into());
        }

        info!(path = %path.display(), "exported data");
        self.notify(Notice::success(format!("Exported to {}", path.display())));
        Ok(path)
    }

    /// Export into the configured export directory.
    pub async fn export(&self) -> Result<PathBuf, CoreError> {
        let dir = self.inner.config.export_dir.clone();
        self.export_to_dir(&dir).await
    }

    /// Replace local state with an import document. Never calls the API.
    ///
    /// The document is validated in full first; on any error nothing changes.
    pub fn import_json(&self, raw: &str) -> Result<(), CoreError> {
        let document = match transfer::parse(raw) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "import rejected");
                self.notify(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        let (rooms, bookings) = (document.rooms.len(), document.bookings.len());
        self.inner.store.apply_document(document);
        self.inner.store.mark_loaded();
        info!(rooms, bookings, "imported data");
        self.notify(Notice::success(format!(
            "Imported {rooms} rooms and {bookings} bookings"
        )));
        Ok(())
    }

    /// Read a file and import it.
    pub async fn import_file(&self, path: &Path) -> Result<(), CoreError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "import read failed");
                self.notify(Notice::error(format!("Cannot read {}: {e}", path.display())));
                return Err(e.into());
            }
        };
        self.import_json(&raw)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn update_view(&self, f: impl FnOnce(&mut ViewState)) {
        self.inner.view.send_modify(f);
    }

    fn notify(&self, notice: Notice) {
        // No receivers is fine: nobody is displaying notices.
        let _ = self.inner.notice_tx.send(notice);
    }

    /// Log an API failure, publish an error notice, and convert the error.
    fn fail(&self, action: &str, err: roombook_api::Error) -> CoreError {
        warn!(error = %err, "{action} failed");
        let err = CoreError::from(err);
        self.notify(Notice::error(format!("Failed to {action}: {err}")));
        err
    }
}

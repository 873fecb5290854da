//! The document session.
//!
//! One [`Session`] owns everything a mounted sheet view needs: the cache,
//! settings, viewport, selection and the interaction controllers. Hosts
//! hold it behind whatever sharing they need (`Rc<RefCell<_>>` in the wasm
//! viewer); nothing here is global.
//!
//! State changes raise a dirty flag and notify observers. Rendering reads
//! the session through a shared borrow and never mutates it.

use std::rc::Rc;

use crate::data::DataService;
use crate::editor::{EditSession, SelectionOverlay};
use crate::engine::{self, EditPayload, EngineClient, PatchBatch, PatchInbox, Transaction};
use crate::error::Result;
use crate::layout::{match_point, CanvasRect, MatchResult, RenderCell, ViewRange, ViewRangeBuilder, Viewport};
use crate::render::RenderParams;
use crate::settings::Settings;
use crate::types::{PixelRange, Selection};
use crate::viewer::{ResizeController, ResizePreview, ResizeTarget};

/// What changed in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A patch batch was applied to the cache
    DataChanged,
    /// Scroll offset, canvas size or resize preview changed
    ViewChanged,
    SelectionChanged,
    /// The active sheet switched to this index
    SheetChanged(usize),
}

/// Handle returned by [`Session::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(SessionEvent)>;

/// Which header/cell drag the pointer is in, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerDrag {
    Cells,
    Rows,
    Cols,
}

pub struct Session {
    pub(crate) data: DataService,
    pub(crate) settings: Settings,
    pub(crate) viewport: Viewport,
    pub(crate) selection: Option<Selection>,
    pub(crate) resize: ResizeController,
    pub(crate) edit: EditSession,
    pub(crate) pointer: Option<PointerDrag>,
    client: Box<dyn EngineClient>,
    inbox: PatchInbox,
    dirty: bool,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl Session {
    pub fn new(settings: Settings, client: Box<dyn EngineClient>) -> Self {
        Self::with_inbox(settings, client, PatchInbox::default())
    }

    /// Create a session whose inbox is shared with the engine client, so
    /// replies the client receives are applied by [`Session::drain_inbox`].
    pub fn with_inbox(settings: Settings, client: Box<dyn EngineClient>, inbox: PatchInbox) -> Self {
        Self {
            data: DataService::new(&settings),
            resize: ResizeController::new(settings.min_resize_px),
            settings,
            viewport: Viewport::default(),
            selection: None,
            edit: EditSession::new(),
            pointer: None,
            client,
            inbox,
            dirty: true,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn data(&self) -> &DataService {
        &self.data
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Shared handle to the inbound patch queue.
    pub fn inbox(&self) -> PatchInbox {
        Rc::clone(&self.inbox)
    }

    // ---- change tracking ----

    /// Register a callback run on every change. Callbacks must not call
    /// back into the session.
    pub fn subscribe(&mut self, observer: impl FnMut(SessionEvent) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self, event: SessionEvent) {
        self.dirty = true;
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }

    // ---- inbound ----

    /// Apply one batch from the engine.
    pub fn apply_batch(&mut self, batch: PatchBatch) {
        engine::apply_batch(&mut self.data, batch);
        self.clamp_scroll();
        self.mark_dirty(SessionEvent::DataChanged);
    }

    /// Apply every batch waiting in the inbox, in arrival order. Returns
    /// how many were applied.
    pub fn drain_inbox(&mut self) -> usize {
        let batches = std::mem::take(&mut *self.inbox.borrow_mut());
        let count = batches.len();
        for batch in batches {
            self.apply_batch(batch);
        }
        count
    }

    // ---- outbound ----

    /// Hand a transaction to the engine.
    ///
    /// # Errors
    /// Propagates the client's error.
    pub fn submit(&mut self, tx: Transaction) -> Result<()> {
        self.client.submit(tx)
    }

    fn submit_payload(&mut self, payload: EditPayload) -> Result<()> {
        self.submit(Transaction::single(payload))
    }

    // ---- geometry ----

    /// Geometry of the active sheet.
    pub fn geometry(&self) -> Option<ViewRangeBuilder<'_>> {
        let data = self.data.sheet_data(None)?;
        Some(ViewRangeBuilder::new(data, &self.settings))
    }

    /// Visible units for the current viewport and scroll offset.
    pub fn view_range(&self) -> ViewRange {
        let Some(geometry) = self.geometry() else {
            return ViewRange::default();
        };
        geometry.build(
            self.viewport.data_width(&geometry),
            self.viewport.data_height(&geometry),
            self.viewport.scroll,
        )
    }

    /// Borrowed inputs for one frame, or `None` without an active sheet.
    pub fn render_params(&self) -> Option<RenderParams<'_>> {
        Some(RenderParams {
            data: self.data.sheet_data(None)?,
            settings: &self.settings,
            scroll: self.viewport.scroll,
            selection: self.selection.as_ref(),
            resize_preview: self.resize.preview(),
        })
    }

    /// Resolve a canvas-local point.
    pub fn hit_test(&self, x: f64, y: f64) -> MatchResult {
        match_point(
            x,
            y,
            &CanvasRect::default(),
            &self.view_range(),
            self.settings.row_header_width,
            self.settings.col_header_height,
        )
    }

    pub(crate) fn clamp_scroll(&mut self) {
        if let Some(data) = self.data.sheet_data(None) {
            let geometry = ViewRangeBuilder::new(data, &self.settings);
            self.viewport.clamp_scroll(&geometry);
        }
    }

    /// Track a new canvas size in CSS pixels.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.clamp_scroll();
        self.mark_dirty(SessionEvent::ViewChanged);
    }

    /// Switch sheets. Scroll, selection and any drag or edit in progress
    /// are reset.
    pub fn set_active_sheet(&mut self, idx: usize) {
        if idx == self.data.get_active_sheet() {
            return;
        }
        self.data.set_active_sheet(idx);
        self.viewport.scroll = Default::default();
        self.selection = None;
        self.pointer = None;
        self.resize.cancel();
        self.edit.cancel();
        self.mark_dirty(SessionEvent::SheetChanged(idx));
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        if self.selection != selection {
            self.selection = selection;
            self.mark_dirty(SessionEvent::SelectionChanged);
        }
    }

    // ---- resize ----

    /// Start a border drag of `band` at canvas coordinate `pointer`.
    pub fn begin_resize(&mut self, target: ResizeTarget, pointer: f64, band: &RenderCell) {
        self.resize.begin(target, pointer, band);
        self.mark_dirty(SessionEvent::ViewChanged);
    }

    pub fn update_resize(&mut self, pointer: f64) -> Option<ResizePreview> {
        let preview = self.resize.update(pointer)?;
        self.mark_dirty(SessionEvent::ViewChanged);
        Some(preview)
    }

    /// End the drag and send the new size to the engine. Returns whether
    /// anything was sent.
    ///
    /// # Errors
    /// Propagates the client's error.
    pub fn finish_resize(&mut self) -> Result<bool> {
        let was_active = self.resize.is_active();
        let payload = self.resize.finish(self.data.get_active_sheet(), self.settings.ppi);
        if was_active {
            self.mark_dirty(SessionEvent::ViewChanged);
        }
        match payload {
            Some(payload) => self.submit_payload(payload).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn cancel_resize(&mut self) -> bool {
        let cancelled = self.resize.cancel();
        if cancelled {
            self.mark_dirty(SessionEvent::ViewChanged);
        }
        cancelled
    }

    // ---- editing ----

    /// Start editing `(row, col)`. Returns the initial input text and the
    /// canvas box the input should cover, if the cell is visible.
    ///
    /// A cell inside a merged region is edited at the region's origin.
    pub fn begin_edit(&mut self, row: u32, col: u32) -> (String, Option<PixelRange>) {
        let (row, col, span) = match self.data.merge_covering(row, col, None) {
            Some(m) => (m.start_row, m.start_col, Some(m)),
            None => (row, col, None),
        };
        let text = self.edit.begin(&self.data, row, col).to_string();
        let mut region = Selection::cell(row, col);
        if let Some(m) = span {
            region.extend_to(m.end_row, m.end_col);
        }
        let rect = SelectionOverlay::selector_rect(&region, &self.view_range());
        (text, rect)
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    /// Commit the edit and submit it. Returns whether anything was sent.
    ///
    /// # Errors
    /// Propagates the client's error.
    pub fn commit_edit(&mut self, text: &str) -> Result<bool> {
        match self.edit.commit(text) {
            Some(payload) => self.submit_payload(payload).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::engine::{DisplayPatch, QueueClient, ValueEntry};
    use crate::types::CellValue;

    fn session() -> (Session, QueueClient) {
        let client = QueueClient::new();
        let mut session = Session::new(Settings::default(), Box::new(client.clone()));
        session.resize_viewport(400.0, 300.0);
        session.take_dirty();
        (session, client)
    }

    fn values_batch(row: u32, col: u32, n: f64) -> PatchBatch {
        PatchBatch {
            incremental: true,
            patches: vec![DisplayPatch::Values {
                sheet_idx: 0,
                values: vec![ValueEntry {
                    row,
                    col,
                    formula: None,
                    value: Some(CellValue::Number(n)),
                }],
            }],
        }
    }

    #[test]
    fn test_observers_see_changes_until_unsubscribed() {
        let (mut session, _) = session();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = session.subscribe(move |e| sink.borrow_mut().push(e));

        session.apply_batch(values_batch(0, 0, 1.0));
        session.set_active_sheet(1);
        assert!(session.unsubscribe(id));
        session.resize_viewport(100.0, 100.0);

        assert_eq!(
            *seen.borrow(),
            vec![SessionEvent::DataChanged, SessionEvent::SheetChanged(1)]
        );
        assert!(!session.unsubscribe(id));
        assert!(session.take_dirty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_inbox_batches_apply_in_order() {
        let (mut session, _) = session();
        let inbox = session.inbox();
        inbox.borrow_mut().push(values_batch(2, 2, 1.0));
        inbox.borrow_mut().push(values_batch(2, 2, 5.0));
        assert_eq!(session.drain_inbox(), 2);
        let cell = session.data().get_cell(2, 2, None).unwrap();
        assert_eq!(cell.value, Some(CellValue::Number(5.0)));
        assert_eq!(session.drain_inbox(), 0);
    }

    #[test]
    fn test_view_range_excludes_header_bands() {
        let (session, _) = session();
        let view = session.view_range();
        // (300 - 20) / 20 rows, ceil((400 - 40) / 64) cols
        assert_eq!(view.rows.len(), 14);
        assert_eq!(view.cols.len(), 6);
    }

    #[test]
    fn test_resize_drag_submits_points() {
        let (mut session, client) = session();
        let view = session.view_range();
        let band = *view.row(0).unwrap();
        session.begin_resize(ResizeTarget::Row(0), band.position.end_row, &band);
        session.update_resize(band.position.end_row + 20.0);
        assert!(session.render_params().unwrap().resize_preview.is_some());
        assert!(session.finish_resize().unwrap());

        let sent = client.take();
        assert_eq!(
            sent[0].payloads,
            vec![EditPayload::SetRowHeight {
                sheet_idx: 0,
                row: 0,
                height: 30.0,
            }]
        );
        // Cache unchanged until the engine answers.
        assert_eq!(session.data().get_row_info(0, None).height, 15.0);
    }

    #[test]
    fn test_edit_commit_submits_cell_input() {
        let (mut session, client) = session();
        let (text, rect) = session.begin_edit(0, 0);
        assert_eq!(text, "");
        assert_eq!(rect, Some(PixelRange::new(20.0, 40.0, 40.0, 104.0)));
        assert!(session.commit_edit("12").unwrap());
        assert_eq!(client.len(), 1);
        assert!(!session.commit_edit("13").unwrap());
    }
}

//! Main `SheetView` struct - the entry point for the Canvas 2D sheet view.
//!
//! This module provides the WASM-exported `SheetView` that:
//! - Owns a [`Session`] and paints it through the Canvas 2D backend
//! - Applies engine patches and sends edits through a JS engine function
//! - Wires pointer, wheel, double-click and resize events to the session
//! - Schedules at most one repaint per animation frame
//!
//! On native targets `SheetView` paints into a [`RecordingCanvas`] instead,
//! for tests and the CLI.

mod events;
mod resize;
mod scroll;

pub use events::Cursor;
pub use resize::{ResizeController, ResizePreview, ResizeTarget, RESIZE_HANDLE_TOLERANCE};
pub use scroll::{wheel_delta_px, DOM_DELTA_LINE, DOM_DELTA_PAGE, DOM_DELTA_PIXEL};

#[cfg(target_arch = "wasm32")]
use std::cell::{Cell, RefCell};
#[cfg(target_arch = "wasm32")]
use std::rc::{Rc, Weak};

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    AddEventListenerOptions, Event, HtmlCanvasElement, HtmlElement, MouseEvent, PointerEvent,
    ResizeObserver, WheelEvent,
};

#[cfg(target_arch = "wasm32")]
use crate::editor::InputOverlay;
#[cfg(target_arch = "wasm32")]
use crate::engine::{JsEngineClient, PatchBatch, PatchInbox, Transaction};
#[cfg(target_arch = "wasm32")]
use crate::error::SheetViewError;
#[cfg(target_arch = "wasm32")]
use crate::layout::MatchResult;
#[cfg(target_arch = "wasm32")]
use crate::render::{SheetRenderer, WebCanvas};
#[cfg(target_arch = "wasm32")]
use crate::session::{Session, SessionEvent};
#[cfg(target_arch = "wasm32")]
use crate::settings::Settings;
#[cfg(target_arch = "wasm32")]
use crate::types::PixelRange;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::{PatchBatch, QueueClient};
#[cfg(not(target_arch = "wasm32"))]
use crate::layout::ViewRange;
#[cfg(not(target_arch = "wasm32"))]
use crate::render::{RecordingCanvas, SheetRenderer};
#[cfg(not(target_arch = "wasm32"))]
use crate::session::Session;
#[cfg(not(target_arch = "wasm32"))]
use crate::settings::Settings;

/// State shared between the exported object and its event handlers (wasm32 only)
#[cfg(target_arch = "wasm32")]
struct SharedState {
    session: Session,
    renderer: SheetRenderer,
    canvas: WebCanvas,
    input: InputOverlay,
    render_callback: Option<Function>,
}

/// Coalesces repaint requests into one `requestAnimationFrame` callback.
#[cfg(target_arch = "wasm32")]
#[derive(Clone)]
struct FrameScheduler {
    state: Weak<RefCell<SharedState>>,
    pending: Rc<Cell<bool>>,
}

#[cfg(target_arch = "wasm32")]
impl FrameScheduler {
    fn request(&self) {
        if self.pending.replace(true) {
            return;
        }
        let Some(window) = web_sys::window() else {
            self.pending.set(false);
            return;
        };
        let this = self.clone();
        let callback = Closure::once_into_js(move |_timestamp: f64| {
            this.pending.set(false);
            if let Some(state) = this.state.upgrade() {
                SheetView::run_frame(&state);
            }
        });
        if window
            .request_animation_frame(callback.unchecked_ref())
            .is_err()
        {
            self.pending.set(false);
        }
    }
}

#[cfg(target_arch = "wasm32")]
type Listener = (&'static str, Closure<dyn FnMut(Event)>);

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct SheetView {
    state: Rc<RefCell<SharedState>>,
    /// Shared with the session; filled without borrowing `state`
    inbox: PatchInbox,
    frames: FrameScheduler,
    element: HtmlCanvasElement,
    listeners: Vec<Listener>,
    resize_observer: Option<(ResizeObserver, Closure<dyn FnMut(js_sys::Array)>)>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl SheetView {
    /// Mount a view on `canvas`.
    ///
    /// `engine` is called with each outbound transaction and may return a
    /// promise of a patch batch. `settings` is an optional partial settings
    /// object.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, engine: Function, settings: JsValue) -> Result<SheetView, JsValue> {
        console_error_panic_hook::set_once();

        let settings = parse_settings(settings)?;
        let web_canvas = WebCanvas::new(canvas.clone())?;
        let css_width = f64::from(canvas.client_width().max(0));
        let css_height = f64::from(canvas.client_height().max(0));
        let renderer = SheetRenderer::new(&settings);
        let inbox = PatchInbox::default();
        let session_inbox = Rc::clone(&inbox);
        let pending = Rc::new(Cell::new(false));

        let state = Rc::new_cyclic(|weak: &Weak<RefCell<SharedState>>| {
            let frames = FrameScheduler {
                state: Weak::clone(weak),
                pending: Rc::clone(&pending),
            };
            let client = JsEngineClient::new(engine, Rc::clone(&session_inbox))
                .with_waker(Rc::new(move || frames.request()));
            let mut session = Session::with_inbox(settings, Box::new(client), session_inbox);
            session.resize_viewport(css_width, css_height);
            let input = InputOverlay::new(&session.settings().selection_color);
            RefCell::new(SharedState {
                session,
                renderer,
                canvas: web_canvas,
                input,
                render_callback: None,
            })
        });
        let frames = FrameScheduler {
            state: Rc::downgrade(&state),
            pending,
        };

        let mut view = SheetView {
            state,
            inbox,
            frames,
            element: canvas,
            listeners: Vec::new(),
            resize_observer: None,
        };
        view.wire_events();
        view.observe_resize();
        view.frames.request();
        Ok(view)
    }

    /// Mount a view on the canvas with the given element id.
    #[wasm_bindgen(js_name = "mount")]
    pub fn mount(canvas_id: &str, engine: Function, settings: JsValue) -> Result<SheetView, JsValue> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(canvas_id))
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(SheetViewError::MissingCanvas)?;
        Self::new(canvas, engine, settings)
    }

    /// Apply a patch batch pushed by the engine.
    ///
    /// An engine may call this synchronously from inside the transaction
    /// callback while the session is busy; the batch then waits in the
    /// inbox for the next frame.
    #[wasm_bindgen(js_name = "applyPatches")]
    pub fn apply_patches(&self, batch: JsValue) -> Result<(), JsValue> {
        let batch: PatchBatch = serde_wasm_bindgen::from_value(batch)
            .map_err(|e| SheetViewError::Patch(e.to_string()))?;
        self.inbox.borrow_mut().push(batch);
        // Apply right away unless we are inside a session call
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.session.drain_inbox();
        }
        self.frames.request();
        Ok(())
    }

    /// Send a transaction built by the host (row/column inserts, merges, ...).
    pub fn submit(&self, transaction: JsValue) -> Result<(), JsValue> {
        let tx: Transaction = serde_wasm_bindgen::from_value(transaction)
            .map_err(|e| SheetViewError::Patch(e.to_string()))?;
        self.state.borrow_mut().session.submit(tx)?;
        Ok(())
    }

    /// Paint now, regardless of the dirty flag.
    pub fn render(&self) -> Result<(), JsValue> {
        let callback = {
            let mut guard = self.state.borrow_mut();
            let s = &mut *guard;
            s.session.drain_inbox();
            s.session.take_dirty();
            s.renderer.render(&mut s.canvas, &s.session)?;
            s.render_callback.clone()
        };
        invoke_render_callback(callback);
        Ok(())
    }

    /// Mark the view dirty and schedule a frame, e.g. after web fonts load.
    pub fn invalidate(&self) {
        {
            let mut s = self.state.borrow_mut();
            s.renderer.clear_caches();
            s.session.mark_dirty(SessionEvent::ViewChanged);
        }
        self.frames.request();
    }

    /// Called after every painted frame.
    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// Scroll by a pixel delta. Returns whether the position changed.
    #[wasm_bindgen(js_name = "scrollBy")]
    pub fn scroll_by(&self, delta_x: f64, delta_y: f64) -> bool {
        let moved = self.state.borrow_mut().session.scroll_by(delta_x, delta_y).is_some();
        if moved {
            self.frames.request();
        }
        moved
    }

    /// Resize to the given CSS size.
    pub fn resize(&self, css_width: f64, css_height: f64) {
        Self::resize_state(&self.state, css_width, css_height);
        self.frames.request();
    }

    #[wasm_bindgen(js_name = "setActiveSheet")]
    pub fn set_active_sheet(&self, index: usize) {
        let mut s = self.state.borrow_mut();
        if s.session.is_editing() {
            s.input.hide();
        }
        s.session.set_active_sheet(index);
        drop(s);
        self.frames.request();
    }

    #[wasm_bindgen(js_name = "activeSheet")]
    pub fn active_sheet(&self) -> usize {
        self.state.borrow().session.data().get_active_sheet()
    }

    #[wasm_bindgen(js_name = "sheetNames")]
    pub fn sheet_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .session
            .data()
            .sheet_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Visible rows, columns and cells of the last layout.
    #[wasm_bindgen(js_name = "viewRange")]
    pub fn view_range(&self) -> Result<JsValue, JsValue> {
        let view = self.state.borrow().session.view_range();
        Ok(serde_wasm_bindgen::to_value(&view).map_err(|e| SheetViewError::Other(e.to_string()))?)
    }

    /// Selected range as `[startRow, startCol, endRow, endCol]`.
    pub fn selection(&self) -> Option<Vec<u32>> {
        let s = self.state.borrow();
        let range = s.session.selection()?.range();
        Some(vec![range.start_row, range.start_col, range.end_row, range.end_col])
    }

    /// Start editing `(row, col)` in an input over the cell.
    #[wasm_bindgen(js_name = "beginEdit")]
    pub fn begin_edit(&self, row: u32, col: u32) {
        Self::begin_edit_state(&self.state, &self.element, row, col);
    }

    /// Commit the input's text. Returns whether an edit was sent.
    #[wasm_bindgen(js_name = "commitEdit")]
    pub fn commit_edit(&self) -> Result<bool, JsValue> {
        Ok(Self::commit_edit_state(&self.state)?)
    }

    #[wasm_bindgen(js_name = "cancelEdit")]
    pub fn cancel_edit(&self) {
        let mut s = self.state.borrow_mut();
        s.session.cancel_edit();
        s.input.hide();
    }

    /// Comment on the cell under a client-space point.
    #[wasm_bindgen(js_name = "commentAt")]
    pub fn comment_at(&self, client_x: f64, client_y: f64) -> Option<String> {
        let rect = self.element.get_bounding_client_rect();
        self.state
            .borrow()
            .session
            .comment_at_point(client_x - rect.left(), client_y - rect.top())
    }
}

#[cfg(target_arch = "wasm32")]
impl SheetView {
    pub(crate) fn run_frame(state: &Rc<RefCell<SharedState>>) {
        let callback = {
            let Ok(mut guard) = state.try_borrow_mut() else {
                return;
            };
            let s = &mut *guard;
            s.session.drain_inbox();
            if !s.session.take_dirty() {
                return;
            }
            if let Err(e) = s.renderer.render(&mut s.canvas, &s.session) {
                log::warn!("frame failed: {e}");
            }
            s.render_callback.clone()
        };
        invoke_render_callback(callback);
    }

    fn resize_state(state: &Rc<RefCell<SharedState>>, css_width: f64, css_height: f64) {
        let mut s = state.borrow_mut();
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        s.canvas.resize(css_width, css_height, dpr);
        s.session.resize_viewport(css_width, css_height);
    }

    fn begin_edit_state(state: &Rc<RefCell<SharedState>>, element: &HtmlCanvasElement, row: u32, col: u32) {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let (text, rect) = s.session.begin_edit(row, col);
        let Some(rect) = rect else {
            // Not on screen; nothing to type into.
            s.session.cancel_edit();
            return;
        };
        let settings = s.session.settings();
        let font = format!("{}px {}", settings.font_size_px(), settings.font_family);
        // The input lives in the canvas's parent; shift by the canvas offset.
        let offset = PixelRange::from_origin(
            rect.x() + f64::from(element.offset_left()),
            rect.y() + f64::from(element.offset_top()),
            rect.width(),
            rect.height(),
        );
        let container = element
            .parent_element()
            .and_then(|p| p.dyn_into::<HtmlElement>().ok());
        s.input.show(offset, &text, &font, container.as_ref());
    }

    fn commit_edit_state(state: &Rc<RefCell<SharedState>>) -> crate::error::Result<bool> {
        let mut s = state.borrow_mut();
        if !s.session.is_editing() {
            return Ok(false);
        }
        let text = s.input.value().unwrap_or_default();
        s.input.hide();
        s.session.commit_edit(&text)
    }

    fn add_listener(&mut self, name: &'static str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        if self
            .element
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .is_err()
        {
            log::warn!("could not listen for {name}");
            return;
        }
        self.listeners.push((name, closure));
    }

    fn wire_events(&mut self) {
        // Pointer down: commit a pending edit, then select or grab a border.
        {
            let state = Rc::clone(&self.state);
            let frames = self.frames.clone();
            let element = self.element.clone();
            self.add_listener("pointerdown", move |event: Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if event.button() != 0 {
                    return;
                }
                if let Err(e) = Self::commit_edit_state(&state) {
                    log::warn!("edit commit failed: {e}");
                }
                let (x, y) = local_point(&element, event);
                if state.borrow_mut().session.pointer_down(x, y) {
                    let _ = element.set_pointer_capture(event.pointer_id());
                    frames.request();
                }
            });
        }

        // Pointer move: drag, or cursor feedback when no button is down.
        {
            let state = Rc::clone(&self.state);
            let frames = self.frames.clone();
            let element = self.element.clone();
            self.add_listener("pointermove", move |event: Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let (x, y) = local_point(&element, event);
                if event.buttons() == 0 {
                    let cursor = state.borrow().session.cursor_at(x, y);
                    let _ = element.style().set_property("cursor", cursor.as_css());
                    return;
                }
                if state.borrow_mut().session.pointer_move(x, y) {
                    frames.request();
                }
            });
        }

        // Pointer up: finish selection or send the resize.
        {
            let state = Rc::clone(&self.state);
            let frames = self.frames.clone();
            let element = self.element.clone();
            self.add_listener("pointerup", move |event: Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let (x, y) = local_point(&element, event);
                let _ = element.release_pointer_capture(event.pointer_id());
                match state.borrow_mut().session.pointer_up(x, y) {
                    Ok(true) => frames.request(),
                    Ok(false) => {}
                    Err(e) => log::warn!("resize not sent: {e}"),
                }
            });
        }

        // Lost capture (e.g. window blur) discards a resize preview.
        {
            let state = Rc::clone(&self.state);
            let frames = self.frames.clone();
            self.add_listener("pointercancel", move |_event: Event| {
                let mut s = state.borrow_mut();
                s.session.pointer = None;
                if s.session.cancel_resize() {
                    drop(s);
                    frames.request();
                }
            });
        }

        // Wheel scrolling; shift turns vertical wheels horizontal.
        {
            let state = Rc::clone(&self.state);
            let frames = self.frames.clone();
            self.add_listener("wheel", move |event: Event| {
                let Some(event) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                let mut s = state.borrow_mut();
                let line_px = s.session.settings().default_row_px();
                let viewport = s.session.viewport();
                let (page_w, page_h) = (viewport.width, viewport.height);
                let (mut dx, mut dy) = wheel_delta_px(
                    event.delta_x(),
                    event.delta_y(),
                    event.delta_mode(),
                    line_px,
                    page_w,
                    page_h,
                );
                if event.shift_key() && dx.abs() < f64::EPSILON {
                    std::mem::swap(&mut dx, &mut dy);
                }
                if s.session.scroll_by(dx, dy).is_some() {
                    event.prevent_default();
                    if s.session.is_editing() {
                        s.session.cancel_edit();
                        s.input.hide();
                    }
                    drop(s);
                    frames.request();
                }
            });
        }

        // Double click edits the cell under the pointer.
        {
            let state = Rc::clone(&self.state);
            let element = self.element.clone();
            self.add_listener("dblclick", move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = local_point(&element, event);
                let hit = state.borrow().session.hit_test(x, y);
                if let MatchResult::Cell(cell) = hit {
                    let (row, col) = (cell.coordinate.start_row, cell.coordinate.start_col);
                    Self::begin_edit_state(&state, &element, row, col);
                }
            });
        }
    }

    fn observe_resize(&mut self) {
        let state = Rc::clone(&self.state);
        let frames = self.frames.clone();
        let element = self.element.clone();
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            let css_width = f64::from(element.client_width().max(0));
            let css_height = f64::from(element.client_height().max(0));
            let unchanged = {
                let s = state.borrow();
                let vp = s.session.viewport();
                (vp.width - css_width).abs() < 0.5 && (vp.height - css_height).abs() < 0.5
            };
            if !unchanged {
                Self::resize_state(&state, css_width, css_height);
                frames.request();
            }
        }) as Box<dyn FnMut(js_sys::Array)>);
        match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.element);
                self.resize_observer = Some((observer, closure));
            }
            Err(e) => log::warn!("ResizeObserver unavailable: {e:?}"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for SheetView {
    fn drop(&mut self) {
        for (name, closure) in &self.listeners {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
        if let Some((observer, _)) = &self.resize_observer {
            observer.disconnect();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn parse_settings(value: JsValue) -> Result<Settings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Settings::default());
    }
    Ok(serde_wasm_bindgen::from_value(value).map_err(|e| SheetViewError::Patch(e.to_string()))?)
}

/// Pointer position relative to the canvas's bounding rect.
#[cfg(target_arch = "wasm32")]
fn local_point(element: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    let rect = element.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

#[cfg(target_arch = "wasm32")]
fn invoke_render_callback(callback: Option<Function>) {
    if let Some(callback) = callback {
        let _ = callback.call0(&JsValue::NULL);
    }
}

// ============================================================================
// Non-WASM32 Implementation (for testing/CLI)
// ============================================================================

/// Headless view: a session painted into a recording canvas.
#[cfg(not(target_arch = "wasm32"))]
pub struct SheetView {
    session: Session,
    renderer: SheetRenderer,
    canvas: RecordingCanvas,
    client: QueueClient,
}

#[cfg(not(target_arch = "wasm32"))]
impl SheetView {
    /// Create a view of `width` x `height` CSS pixels. Outbound
    /// transactions collect in [`SheetView::client`].
    pub fn new_test(width: f64, height: f64, settings: Settings) -> Self {
        let client = QueueClient::new();
        let renderer = SheetRenderer::new(&settings);
        let mut session = Session::new(settings, Box::new(client.clone()));
        session.resize_viewport(width, height);
        Self {
            session,
            renderer,
            canvas: RecordingCanvas::new(width, height),
            client,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn client(&self) -> &QueueClient {
        &self.client
    }

    pub fn canvas(&self) -> &RecordingCanvas {
        &self.canvas
    }

    /// Apply a patch batch given as JSON.
    ///
    /// # Errors
    /// Returns `Json` if the text is not a valid batch.
    pub fn apply_patches_json(&mut self, json: &str) -> crate::error::Result<()> {
        let batch = PatchBatch::from_json(json)?;
        self.session.apply_batch(batch);
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.resize(width, height);
        self.session.resize_viewport(width, height);
    }

    /// Paint one frame, replacing the previously recorded one.
    ///
    /// # Errors
    /// Returns `Render` if the session has no active sheet.
    pub fn render(&mut self) -> crate::error::Result<ViewRange> {
        self.session.drain_inbox();
        self.session.take_dirty();
        self.canvas.take_ops();
        self.renderer.render(&mut self.canvas, &self.session)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_view_renders_patched_value() {
        let mut view = SheetView::new_test(300.0, 200.0, Settings::default());
        view.apply_patches_json(
            r#"{"incremental": true, "patches": [
                {"type": "values", "sheetIdx": 0,
                 "values": [{"row": 1, "col": 1, "value": {"type": "str", "value": "hi"}}]}
            ]}"#,
        )
        .unwrap();
        let range = view.render().unwrap();
        assert!(range.cell(1, 1).is_some());
        assert!(view.canvas().texts().iter().any(|(t, ..)| *t == "hi"));
        assert!(!view.session().is_dirty());
    }

    #[test]
    fn test_bad_patch_json_is_an_error() {
        let mut view = SheetView::new_test(300.0, 200.0, Settings::default());
        assert!(view.apply_patches_json("{\"patches\": 3}").is_err());
    }
}

//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.
//!
//! Generic over the dragged payload `P` (what the drop handler receives)
//! and the drop target `T` (where it landed).

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// DnD state signals
pub struct DndSignals<P: Send + Sync + 'static, T: Send + Sync + 'static> {
    /// Payload currently being dragged
    pub dragging_read: ReadSignal<Option<P>>,
    pub dragging_write: WriteSignal<Option<P>>,
    /// Target under the pointer while dragging
    pub drop_target_read: ReadSignal<Option<T>>,
    pub drop_target_write: WriteSignal<Option<T>>,
    /// True for a short window after a drag ends, so click handlers can ignore the trailing click
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending payload (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<P>>,
    pub pending_write: WriteSignal<Option<P>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

impl<P: Send + Sync + 'static, T: Send + Sync + 'static> Clone for DndSignals<P, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Send + Sync + 'static, T: Send + Sync + 'static> Copy for DndSignals<P, T> {}

impl<P, T> DndSignals<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn is_dragging(&self) -> bool {
        self.dragging_read.with(Option::is_some)
    }

    /// Whether `target` is the current drop target (tracked)
    pub fn is_drop_target(&self, target: &T) -> bool {
        self.drop_target_read.with(|current| current.as_ref() == Some(target))
    }
}

pub fn create_dnd_signals<P, T>() -> DndSignals<P, T>
where
    P: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    let (dragging_read, dragging_write) = signal(None::<P>);
    let (drop_target_read, drop_target_write) = signal(None::<T>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<P>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_read,
        dragging_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_read,
        start_write,
    }
}

/// True once the pointer has travelled past the drag threshold on either axis
pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    let dx = (current.0 - start.0).abs();
    let dy = (current.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

/// End drag operation
pub fn end_drag<P, T>(dnd: &DndSignals<P, T>)
where
    P: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    dnd.dragging_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable elements
/// Records pending drag with start position
pub fn make_on_mousedown<P, T>(dnd: DndSignals<P, T>, payload: P) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    P: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Ignore if target is input or button
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        dnd.pending_write.set(Some(payload.clone()));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

/// Bind document mousemove - starts drag once the pending payload moved far enough
pub fn bind_global_mousemove<P, T>(dnd: DndSignals<P, T>)
where
    P: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_read.get_untracked();
        if pending.is_none() || dnd.dragging_read.with_untracked(Option::is_some) {
            return;
        }
        let start = dnd.start_read.get_untracked();
        if exceeds_threshold(start, (ev.client_x(), ev.client_y())) {
            dnd.dragging_write.set(pending);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for a drop target
pub fn make_on_target_mouseenter<P, T>(dnd: DndSignals<P, T>, target: T) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    P: Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.with_untracked(Option::is_some) {
            dnd.drop_target_write.set(Some(target.clone()));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave<P, T>(dnd: DndSignals<P, T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    P: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.with_untracked(Option::is_some) {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection
///
/// `on_drop` fires only when a real drag (past the threshold) ends over a target.
pub fn bind_global_mouseup<P, T, F>(dnd: DndSignals<P, T>, on_drop: F)
where
    P: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(P, T) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging_read.get_untracked();
        let drop_target = dnd.drop_target_read.get_untracked();

        dnd.pending_write.set(None);
        end_drag(&dnd);

        if let (Some(payload), Some(target)) = (dragging, drop_target) {
            on_drop(payload, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    // Also bind global mousemove
    bind_global_mousemove(dnd);
}

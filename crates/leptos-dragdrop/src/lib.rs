//! Leptos DragDrop Utilities
//!
//! Pointer-driven drag-and-drop for board items (cards, lists, subtasks).
//! A mousedown only arms a drag; it starts once the pointer moves past a
//! small threshold, so plain clicks still reach the element. Hover handlers
//! record where the item would land and mouseup reports `(item, target)`.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// What is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragKind {
    Card,
    List,
    Subtask,
}

/// A draggable item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DragItem {
    pub kind: DragKind,
    pub id: u32,
}

impl DragItem {
    pub fn card(id: u32) -> Self {
        Self { kind: DragKind::Card, id }
    }

    pub fn list(id: u32) -> Self {
        Self { kind: DragKind::List, id }
    }

    pub fn subtask(id: u32) -> Self {
        Self { kind: DragKind::Subtask, id }
    }
}

/// Where a dragged item would land
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Hovering a sibling: take that sibling's slot
    Item(u32),
    /// Gap between items (container_id, index)
    Zone(u32, i32),
    /// Empty area of a container: append
    Container(u32),
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_read: ReadSignal<Option<DragItem>>,
    pub dragging_write: WriteSignal<Option<DragItem>>,
    pub drop_target_read: ReadSignal<Option<DropTarget>>,
    pub drop_target_write: WriteSignal<Option<DropTarget>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Armed item (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<DragItem>>,
    pub pending_write: WriteSignal<Option<DragItem>>,
    /// Pointer position at mousedown
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Whether the pointer moved far enough from `start` to begin a drag
pub fn exceeds_threshold(start: (i32, i32), now: (i32, i32)) -> bool {
    (now.0 - start.0).abs() > DRAG_THRESHOLD_PX || (now.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

/// Target for hovering `hovered` while dragging `dragging`.
/// Hovering yourself or an item of another kind yields nothing.
pub fn item_target(dragging: Option<DragItem>, hovered: DragItem) -> Option<DropTarget> {
    match dragging {
        Some(item) if item.kind == hovered.kind && item.id != hovered.id => {
            Some(DropTarget::Item(hovered.id))
        }
        _ => None,
    }
}

/// Whether a container of `accepts` items can take the current drag
pub fn accepts(dragging: Option<DragItem>, accepts: DragKind) -> bool {
    matches!(dragging, Some(item) if item.kind == accepts)
}

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_read, dragging_write) = signal(None::<DragItem>);
    let (drop_target_read, drop_target_write) = signal(None::<DropTarget>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<DragItem>);
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

/// End drag operation. `drag_just_ended` stays set briefly so the click
/// that follows mouseup can be swallowed.
pub fn end_drag(dnd: &DndSignals) {
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

/// Mousedown handler for a draggable item: arms the drag
pub fn make_on_mousedown(dnd: DndSignals, item: DragItem) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Inputs and buttons inside a card keep their own behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        // Lists contain cards: the innermost item wins
        ev.stop_propagation();
        dnd.pending_write.set(Some(item));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

/// Document mousemove: promotes an armed item to a drag past the threshold
pub fn bind_global_mousemove(dnd: DndSignals) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_read.get_untracked();
        if pending.is_none() || dnd.dragging_read.get_untracked().is_some() {
            return;
        }
        if exceeds_threshold(dnd.start_read.get_untracked(), (ev.client_x(), ev.client_y())) {
            dnd.dragging_write.set(pending);
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
}

/// Mouseenter handler for an item: the dragged item would take its slot
pub fn make_on_item_mouseenter(dnd: DndSignals, hovered: DragItem) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if let Some(target) = item_target(dnd.dragging_read.get_untracked(), hovered) {
            dnd.drop_target_write.set(Some(target));
        }
    }
}

/// Mouseenter handler for the gap at `index` inside a container
pub fn make_on_zone_mouseenter(
    dnd: DndSignals,
    kind: DragKind,
    container_id: u32,
    index: i32,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if accepts(dnd.dragging_read.get_untracked(), kind) {
            dnd.drop_target_write.set(Some(DropTarget::Zone(container_id, index)));
        }
    }
}

/// Mouseenter handler for a container body (e.g. an empty list)
pub fn make_on_container_mouseenter(
    dnd: DndSignals,
    kind: DragKind,
    container_id: u32,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if accepts(dnd.dragging_read.get_untracked(), kind) {
            dnd.drop_target_write.set(Some(DropTarget::Container(container_id)));
        }
    }
}

/// Mouseleave handler
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind document mouseup (drop) and mousemove (drag start) handlers.
/// `on_drop` runs only for real drags that ended over a target.
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(DragItem, DropTarget) + Clone + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging_read.get_untracked();
        let drop_target = dnd.drop_target_read.get_untracked();

        dnd.pending_write.set(None);
        end_drag(&dnd);

        if let (Some(item), Some(target)) = (dragging, drop_target) {
            on_drop(item, target);
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_needs_more_than_five_pixels() {
        assert!(!exceeds_threshold((10, 10), (15, 15)));
        assert!(exceeds_threshold((10, 10), (16, 10)));
        assert!(exceeds_threshold((10, 10), (10, 4)));
    }

    #[test]
    fn test_item_target_ignores_self_and_other_kinds() {
        let dragging = Some(DragItem::card(1));
        assert_eq!(item_target(dragging, DragItem::card(2)), Some(DropTarget::Item(2)));
        assert_eq!(item_target(dragging, DragItem::card(1)), None);
        assert_eq!(item_target(dragging, DragItem::list(2)), None);
        assert_eq!(item_target(None, DragItem::card(2)), None);
    }

    #[test]
    fn test_containers_accept_matching_kind() {
        assert!(accepts(Some(DragItem::card(1)), DragKind::Card));
        assert!(!accepts(Some(DragItem::list(1)), DragKind::Card));
        assert!(!accepts(None, DragKind::List));
    }
}

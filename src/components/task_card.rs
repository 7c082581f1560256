//! Task Card Component
//!
//! Draggable card with inline rename and delete.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::DeleteConfirmButton;
use crate::context::{BoardContext, DragPayload, Services};
use crate::models::{Column, Task};
use leptos_dragdrop::make_on_mousedown;

#[component]
pub fn TaskCard(task: Task, column: Column) -> impl IntoView {
    let ctx = use_context::<BoardContext>().expect("BoardContext should be provided");
    let services = use_context::<Services>().expect("Services should be provided");
    let board = ctx.board;
    let id = task.id;
    let title = task.title.clone();

    let is_editing = move || board.with(|b| b.is_editing(id));
    let is_dragged = move || {
        ctx.dnd
            .dragging_read
            .with(|d| d.is_some_and(|p| p.id == id))
    };
    let card_class = move || if is_dragged() { "task-card dragged" } else { "task-card" };

    let begin_edit = move || {
        // The click that ends a drag is not an edit request
        if !ctx.dnd.drag_just_ended_read.get_untracked() {
            board.update(|b| b.begin_edit(id));
        }
    };
    let commit = move || {
        spawn_local(async move {
            let _ = services.board().commit_edit(&board).await;
        });
    };
    let on_delete = Callback::new(move |_| {
        spawn_local(async move {
            let _ = services.board().delete(&board, id).await;
        });
    });

    let input_ref = NodeRef::<html::Input>::new();
    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    });

    view! {
        <div
            class=card_class
            on:mousedown=make_on_mousedown(ctx.dnd, DragPayload { id, from: column })
        >
            <Show
                when=is_editing
                fallback=move || {
                    let title = title.clone();
                    view! {
                        <span class="task-title" on:dblclick=move |_| begin_edit()>{title}</span>
                        <div class="task-actions">
                            <button
                                class="edit-btn"
                                title="Edit"
                                on:click=move |_| begin_edit()
                            >
                                "✎"
                            </button>
                            <DeleteConfirmButton button_class="delete-btn" on_confirm=on_delete />
                        </div>
                    }
                }
            >
                <input
                    type="text"
                    class="task-edit-input"
                    node_ref=input_ref
                    prop:value=move || {
                        board.with(|b| b.editing.as_ref().map(|d| d.text.clone()).unwrap_or_default())
                    }
                    on:input=move |ev| board.update(|b| b.set_draft(event_target_value(&ev)))
                    on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                        "Enter" => {
                            ev.prevent_default();
                            commit();
                        }
                        "Escape" => board.update(|b| b.cancel_edit()),
                        _ => {}
                    }
                    on:blur=move |_| commit()
                />
                <button
                    class="save-btn"
                    title="Save"
                    on:mousedown=|ev: web_sys::MouseEvent| ev.prevent_default()
                    on:click=move |_| commit()
                >
                    "✓"
                </button>
            </Show>
        </div>
    }
}

//! Board View Component
//!
//! Error banner, new-task form and the three status columns.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{ErrorBanner, NewTaskForm, TaskCard};
use crate::context::{BoardContext, Services};
use crate::models::Column;
use leptos_dragdrop::{make_on_mouseleave, make_on_target_mouseenter};

#[component]
pub fn BoardView() -> impl IntoView {
    let ctx = use_context::<BoardContext>().expect("BoardContext should be provided");
    let services = use_context::<Services>().expect("Services should be provided");

    // Load tasks on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let _ = services.board().load(&ctx.board).await;
        });
    });

    let board_class = move || {
        if ctx.dnd.is_dragging() {
            "board dragging"
        } else {
            "board"
        }
    };

    view! {
        <div class="dashboard-container">
            <ErrorBanner />
            <NewTaskForm />
            <Show
                when=move || !ctx.board.with(|b| b.is_loading())
                fallback=|| view! { <p class="loading">"Loading tasks..."</p> }
            >
                <div class=board_class>
                    {Column::ALL
                        .into_iter()
                        .map(|column| view! { <BoardColumn column=column /> })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

/// One status column; also a drop target
#[component]
fn BoardColumn(column: Column) -> impl IntoView {
    let ctx = use_context::<BoardContext>().expect("BoardContext should be provided");

    let column_class = move || {
        if ctx.dnd.is_drop_target(&column) {
            format!("board-column {} drop-target", column.key())
        } else {
            format!("board-column {}", column.key())
        }
    };

    view! {
        <section
            class=column_class
            on:mouseenter=make_on_target_mouseenter(ctx.dnd, column)
            on:mouseleave=make_on_mouseleave(ctx.dnd)
        >
            <h2 class="column-title">
                {column.title()}
                <span class="column-count">{move || ctx.board.with(|b| b.column(column).len())}</span>
            </h2>
            <div class="column-tasks">
                <For
                    each=move || ctx.board.with(|b| b.column(column).to_vec())
                    key=|task| (task.id, task.title.clone(), task.status)
                    children=move |task| view! { <TaskCard task=task column=column /> }
                />
            </div>
        </section>
    }
}

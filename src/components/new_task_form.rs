//! New Task Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{BoardContext, Services};
use crate::view_model::MAX_TITLE_CHARS;

/// Adds a task to the To Do column
#[component]
pub fn NewTaskForm() -> impl IntoView {
    let ctx = use_context::<BoardContext>().expect("BoardContext should be provided");
    let services = use_context::<Services>().expect("Services should be provided");

    let (new_text, set_new_text) = signal(String::new());

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        set_new_text.set(String::new());
        spawn_local(async move {
            let _ = services.board().create(&ctx.board, &text).await;
        });
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            <input
                type="text"
                placeholder="Add a new task..."
                maxlength=MAX_TITLE_CHARS.to_string()
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}

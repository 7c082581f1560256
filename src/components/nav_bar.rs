//! Nav Bar Component
//!
//! Top bar shown above the board once signed in.

use leptos::prelude::*;

use crate::context::SessionContext;

/// Brand plus logout; logging out lands on the login page
#[component]
pub fn NavBar() -> impl IntoView {
    let session = use_context::<SessionContext>().expect("SessionContext should be provided");

    view! {
        <nav class="nav-bar">
            <span class="nav-brand">"ToDoApp"</span>
            <button class="logout-btn" on:click=move |_| session.logout()>
                "Logout"
            </button>
        </nav>
    }
}

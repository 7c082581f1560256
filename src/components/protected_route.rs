//! Protected Route Component
//!
//! Renders children only while a token is stored; otherwise sends the user
//! back to the login page.

use leptos::prelude::*;

use crate::context::SessionContext;

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let session = use_context::<SessionContext>().expect("SessionContext should be provided");

    // Re-check whenever the flag or the route changes
    Effect::new(move |_| {
        let _ = session.authenticated.get();
        let _ = session.route.get();
        session.enforce_guard();
    });

    view! {
        <Show when=move || session.authenticated.get() && session.is_authenticated()>
            {children()}
        </Show>
    }
}

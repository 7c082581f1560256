//! Error Banner Component
//!
//! Shows the board's last failure; closes on click or after a delay.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::BoardContext;

/// Milliseconds before a message clears itself
const AUTO_DISMISS_MS: u32 = 5_000;

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let ctx = use_context::<BoardContext>().expect("BoardContext should be provided");
    let board = ctx.board;
    let error = Memo::new(move |_| board.with(|b| b.error.clone()));

    Effect::new(move |_| {
        let Some(shown) = error.get() else {
            return;
        };
        spawn_local(async move {
            TimeoutFuture::new(AUTO_DISMISS_MS).await;
            // A newer message gets its own timer
            board.try_update(|b| {
                if b.error.as_deref() == Some(shown.as_str()) {
                    b.dismiss_error();
                }
            });
        });
    });

    view! {
        <Show when=move || error.with(Option::is_some)>
            <div class="error-banner" role="alert">
                <span>{move || error.get().unwrap_or_default()}</span>
                <button class="dismiss-btn" on:click=move |_| board.update(|b| b.dismiss_error())>
                    "×"
                </button>
            </div>
        </Show>
    }
}

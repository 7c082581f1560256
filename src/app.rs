//! To-Do Board Frontend App
//!
//! Wires config, session and services into context and switches between the
//! login page and the protected board.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals};

use crate::api::{ApiClient, AuthClient, ReqwestTransport, TaskService, Transport};
use crate::board::Board;
use crate::components::{BoardView, LoginForm, NavBar, ProtectedRoute};
use crate::config::AppConfig;
use crate::context::{BoardContext, DragPayload, Services, SessionContext};
use crate::models::Column;
use crate::router::{self, Route};
use crate::session::{LocalStorageStore, Session};
use crate::view_model::BoardViewModel;

#[component]
pub fn App() -> impl IntoView {
    let config = Rc::new(AppConfig::from_env());
    let session = Session::new(Rc::new(LocalStorageStore::new(config.token_key.clone())));
    let transport: Rc<dyn Transport> = Rc::new(ReqwestTransport::new());

    let auth = AuthClient::new(config.clone(), transport.clone(), session.clone());
    let tasks = TaskService::new(ApiClient::new(config, transport, session.clone()));
    let services = Services::new(auth, BoardViewModel::new(tasks));

    // A stored token skips the login page
    let initial = match router::current_route() {
        Route::Login if session.is_authenticated() => {
            router::push_route(Route::Board);
            Route::Board
        }
        route => route,
    };
    let session_ctx = SessionContext::new(session, initial);
    router::bind_popstate(move |route| session_ctx.follow_history(route));

    // Board state outlives the board view so document listeners never see disposed signals
    let board = RwSignal::new(Board::new());
    let dnd = create_dnd_signals::<DragPayload, Column>();
    bind_global_mouseup(dnd, move |payload: DragPayload, target: Column| {
        spawn_local(async move {
            let _ = services.board().move_task(&board, payload.id, payload.from, target).await;
        });
    });

    // Previous user's tasks never flash on the next sign-in
    Effect::new(move |_| {
        if !session_ctx.authenticated.get() {
            board.set(Board::new());
        }
    });

    provide_context(session_ctx);
    provide_context(services);
    provide_context(BoardContext { board, dnd });

    view! {
        {move || match session_ctx.route.get() {
            Route::Login => view! { <LoginForm /> }.into_any(),
            Route::Board => view! {
                <ProtectedRoute>
                    <NavBar />
                    <BoardView />
                </ProtectedRoute>
            }
            .into_any(),
        }}
    }
}

//! Application Context
//!
//! Shared state provided via Leptos Context API. Everything here is
//! `Copy`: non-`Send` services sit behind local `StoredValue`s so reactive
//! closures can capture them.

use leptos::prelude::*;
use leptos_dragdrop::DndSignals;

use crate::api::AuthClient;
use crate::board::Board;
use crate::models::{Column, TaskId};
use crate::router::{self, Route, ViewState};
use crate::session::Session;
use crate::view_model::{BoardCell, BoardViewModel};

/// Session plus the signals the router and guard react to
#[derive(Clone, Copy)]
pub struct SessionContext {
    session: StoredValue<Session, LocalStorage>,
    /// Mirrors "a token is stored" for the view tree - read
    pub authenticated: ReadSignal<bool>,
    /// Mirrors "a token is stored" for the view tree - write
    set_authenticated: WriteSignal<bool>,
    /// Current view - read
    pub route: ReadSignal<Route>,
    /// Current view - write
    set_route: WriteSignal<Route>,
}

impl SessionContext {
    pub fn new(session: Session, initial: Route) -> Self {
        let (authenticated, set_authenticated) = signal(session.is_authenticated());
        let (route, set_route) = signal(initial);

        // Any sign-out (button, 401/403, missing token) lands on the login page
        session.set_signed_out_hook(move || {
            set_authenticated.set(false);
            if route.get_untracked() != Route::Login {
                set_route.set(Route::Login);
                router::push_route(Route::Login);
            }
        });

        Self {
            session: StoredValue::new_local(session),
            authenticated,
            set_authenticated,
            route,
            set_route,
        }
    }

    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        self.session.with_value(f)
    }

    pub fn is_authenticated(&self) -> bool {
        self.with_session(Session::is_authenticated)
    }

    pub fn navigate(&self, route: Route) {
        if self.route.get_untracked() != route {
            self.set_route.set(route);
            router::push_route(route);
        }
    }

    /// Browser already changed the URL (back/forward)
    pub fn follow_history(&self, route: Route) {
        self.set_route.set(route);
    }

    /// Token has been stored by the auth client
    pub fn signed_in(&self) {
        self.set_authenticated.set(true);
        self.navigate(Route::Board);
    }

    /// Clone first: the signed-out hook writes signals
    pub fn logout(&self) {
        self.session.get_value().logout();
    }

    /// Re-check the stored token; a stale flag is cleared and the view
    /// moves to the redirect target
    pub fn enforce_guard(&self) {
        let current = ViewState {
            authenticated: self.authenticated.get_untracked(),
            route: self.route.get_untracked(),
        };
        let checked = self.with_session(|session| router::guard(session, current));
        if checked.authenticated != current.authenticated {
            self.set_authenticated.set(checked.authenticated);
        }
        self.navigate(checked.route);
    }
}

/// Service handles for components
#[derive(Clone, Copy)]
pub struct Services {
    auth: StoredValue<AuthClient, LocalStorage>,
    board: StoredValue<BoardViewModel, LocalStorage>,
}

impl Services {
    pub fn new(auth: AuthClient, board: BoardViewModel) -> Self {
        Self {
            auth: StoredValue::new_local(auth),
            board: StoredValue::new_local(board),
        }
    }

    pub fn auth(&self) -> AuthClient {
        self.auth.get_value()
    }

    pub fn board(&self) -> BoardViewModel {
        self.board.get_value()
    }
}

/// What a card carries while being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragPayload {
    pub id: TaskId,
    pub from: Column,
}

/// Board state and its drag-and-drop signals
#[derive(Clone, Copy)]
pub struct BoardContext {
    pub board: RwSignal<Board>,
    pub dnd: DndSignals<DragPayload, Column>,
}

impl BoardCell for RwSignal<Board> {
    fn read<R>(&self, f: impl FnOnce(&Board) -> R) -> Option<R> {
        self.try_with_untracked(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Board) -> R) -> Option<R> {
        self.try_update(f)
    }
}

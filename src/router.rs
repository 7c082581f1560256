//! Routes and Route Guard
//!
//! Two views: the login/register page at `/` and the board at `/dashboard`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Board,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Board => "/dashboard",
        }
    }

    /// Unknown paths fall back to the login page
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/dashboard" => Route::Board,
            _ => Route::Login,
        }
    }
}

/// Route guard verdict for the protected board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Render,
    Redirect(Route),
}

pub fn admit(session: &Session) -> Admission {
    if session.is_authenticated() {
        Admission::Render
    } else {
        Admission::Redirect(Route::Login)
    }
}

/// The parts of view state the guard may correct
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub authenticated: bool,
    pub route: Route,
}

/// Run the guard over `state`: without a token the flag drops and the
/// route becomes the redirect target
pub fn guard(session: &Session, state: ViewState) -> ViewState {
    match admit(session) {
        Admission::Render => state,
        Admission::Redirect(route) => ViewState { authenticated: false, route },
    }
}

/// Route for the page the browser is showing
pub fn current_route() -> Route {
    web_sys::window()
        .and_then(|win| win.location().pathname().ok())
        .map(|path| Route::from_path(&path))
        .unwrap_or(Route::Login)
}

pub fn push_route(route: Route) {
    let Some(history) = web_sys::window().and_then(|win| win.history().ok()) else {
        return;
    };
    if history
        .push_state_with_url(&JsValue::NULL, "", Some(route.path()))
        .is_err()
    {
        tracing::warn!(path = route.path(), "history push failed");
    }
}

/// Follow back/forward buttons
pub fn bind_popstate(on_change: impl Fn(Route) + 'static) {
    let on_popstate = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
        on_change(current_route());
    });
    if let Some(win) = web_sys::window() {
        let _ = win.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
    }
    on_popstate.forget();
}

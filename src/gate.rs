// src/gate.rs
//! Protected-view gating. A pure function of session state: no network,
//! no side effects; the session manager's bootstrap does all the work.

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Render the protected view.
    Granted,
    /// Session still bootstrapping: render a placeholder, not the view.
    Pending,
    /// Send the caller to the unauthenticated entry point.
    RedirectToLogin,
}

pub fn evaluate(session: &Session) -> RouteAccess {
    match session {
        Session::Authenticated(_) => RouteAccess::Granted,
        Session::Bootstrapping => RouteAccess::Pending,
        Session::Unauthenticated => RouteAccess::RedirectToLogin,
    }
}

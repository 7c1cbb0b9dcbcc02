//! Navigation side effects.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Views the session moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
}

impl Route {
    /// Path of the view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the user interface to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every route it is sent to.
///
/// Useful for headless clients, which have no views to switch.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    routes: Mutex<Vec<Route>>,
}

impl NavigationHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route navigated to, oldest first.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent route.
    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl Navigator for NavigationHistory {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigate");
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_records_in_order() {
        let history = NavigationHistory::new();
        assert_eq!(history.current(), None);

        history.navigate(Route::Home);
        history.navigate(Route::Login);

        assert_eq!(history.routes(), vec![Route::Home, Route::Login]);
        assert_eq!(history.current(), Some(Route::Login));
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.to_string(), "/");
        assert_eq!(Route::Login.path(), "/login");
    }
}

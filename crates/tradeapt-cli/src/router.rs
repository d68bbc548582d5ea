//! Screen routing.
//!
//! The dashboard has three routes. The dashboard route shows one of five
//! views; switching views is synchronous and not persisted. The wallet
//! route needs a connected session and the router guards it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    MyAccount,
    Portfolio,
    AuditLogs,
    FindStocks,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Home,
        View::MyAccount,
        View::Portfolio,
        View::AuditLogs,
        View::FindStocks,
    ];

    /// Header title.
    pub fn title(self) -> &'static str {
        match self {
            View::Home => "Home Dashboard",
            View::MyAccount => "My Account Settings",
            View::Portfolio => "Portfolio Management",
            View::AuditLogs => "Audit & Compliance Logs",
            View::FindStocks => "Stock Finder & Analyzer",
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::MyAccount => "My Account",
            View::Portfolio => "Portfolio",
            View::AuditLogs => "Audit Logs",
            View::FindStocks => "Find Stocks",
        }
    }

    /// Heading of the placeholder panel, for views without content yet.
    pub fn placeholder_title(self) -> Option<&'static str> {
        match self {
            View::MyAccount => Some("My Account"),
            View::Portfolio => Some("Portfolio"),
            View::FindStocks => Some("Find Specific Stocks"),
            View::Home | View::AuditLogs => None,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Wallet,
}

impl Route {
    /// Routes that make no sense without a connected wallet.
    pub fn requires_session(self) -> bool {
        matches!(self, Route::Wallet)
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    route: Route,
    view: View,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            route: Route::Dashboard,
            view: View::Home,
        }
    }
}

impl Router {
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Show `view` on the dashboard.
    pub fn navigate(&mut self, view: View) {
        self.route = Route::Dashboard;
        self.view = view;
    }

    pub fn open_login(&mut self) {
        self.route = Route::Login;
    }

    /// Open the wallet page, or the login page without a session.
    pub fn open_wallet(&mut self, has_session: bool) -> Route {
        self.route = if has_session {
            Route::Wallet
        } else {
            Route::Login
        };
        self.route
    }

    pub fn back_to_dashboard(&mut self) {
        self.route = Route::Dashboard;
    }

    /// A wallet connected: leave the login page.
    pub fn on_connected(&mut self) {
        if self.route == Route::Login {
            self.route = Route::Dashboard;
        }
    }

    /// The wallet disconnected: leave wallet-only pages.
    pub fn on_disconnected(&mut self) {
        if self.route.requires_session() {
            self.route = Route::Login;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles() {
        let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();
        assert_eq!(
            titles,
            [
                "Home Dashboard",
                "My Account Settings",
                "Portfolio Management",
                "Audit & Compliance Logs",
                "Stock Finder & Analyzer",
            ]
        );
        assert_eq!(View::FindStocks.placeholder_title(), Some("Find Specific Stocks"));
        assert_eq!(View::AuditLogs.placeholder_title(), None);
    }

    #[test]
    fn index_round_trip() {
        for view in View::ALL {
            assert_eq!(View::from_index(view.index()), Some(view));
        }
        assert_eq!(View::from_index(5), None);
    }

    #[test]
    fn wallet_route_needs_session() {
        let mut router = Router::default();
        assert_eq!(router.open_wallet(false), Route::Login);
        assert_eq!(router.open_wallet(true), Route::Wallet);
    }

    #[test]
    fn connect_leaves_login_only() {
        let mut router = Router::default();
        router.on_connected();
        assert_eq!(router.route(), Route::Dashboard);

        router.open_login();
        router.on_connected();
        assert_eq!(router.route(), Route::Dashboard);
    }

    #[test]
    fn disconnect_leaves_wallet_page() {
        let mut router = Router::default();
        router.navigate(View::Portfolio);
        router.on_disconnected();
        assert_eq!(router.route(), Route::Dashboard);

        router.open_wallet(true);
        router.on_disconnected();
        assert_eq!(router.route(), Route::Login);
        assert_eq!(router.view(), View::Portfolio);
    }
}

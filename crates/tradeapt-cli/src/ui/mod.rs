//! Screen rendering, one module per route.

pub mod dashboard;
pub mod login;
pub mod wallet;
pub mod widgets;

use ratatui::Frame;

use crate::app::App;
use crate::router::Route;

pub fn render(app: &mut App, f: &mut Frame) {
    match app.router.route() {
        Route::Login => login::render(app, f),
        Route::Dashboard => dashboard::render(app, f),
        Route::Wallet => wallet::render(app, f),
    }

    if let Some((msg, _)) = &app.notification {
        widgets::notification(f, msg);
    }
}

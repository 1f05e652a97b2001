//! Interactive terminal UI
//!
//! A search bar, the results grid with its pagination strip, a detail
//! overlay for the selected movie and a transient toast for empty results.

pub mod app;
pub mod colors;
pub mod ui;

pub use app::App;

use crate::catalog::CatalogClient;

/// Run the interactive UI until the user quits
pub fn run(client: CatalogClient) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let mut app = App::new(client);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

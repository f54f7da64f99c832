//! Screen implementations. Each screen is a top-level Component.

pub mod bookings;
pub mod catalog;
pub mod overview;

use crate::component::Component;
use crate::screen::ScreenId;

/// Build every screen, keyed by its id.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    let overview: Box<dyn Component> = Box::new(overview::OverviewScreen::new());
    let catalog: Box<dyn Component> = Box::new(catalog::CatalogScreen::new());
    let bookings: Box<dyn Component> = Box::new(bookings::BookingsScreen::new());
    vec![
        (ScreenId::Overview, overview),
        (ScreenId::Catalog, catalog),
        (ScreenId::Bookings, bookings),
    ]
}

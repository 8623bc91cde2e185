//! Store directory for regular users: search, overall ratings and the
//! user's own rating, with 1-5 keys to rate the highlighted store.

mod render;
mod state;
mod update;

pub use render::render_shopper;
pub use state::ShopperState;
pub use update::{handle_listings_loaded, handle_rating_submitted, handle_shopper_key, refresh};

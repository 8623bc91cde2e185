use ratedesk_core::api::StoreListing;

use crate::common::{Loadable, TextField};

#[derive(Debug)]
pub struct ShopperState {
    pub listings: Loadable<Vec<StoreListing>>,
    pub search: TextField,
    pub searching: bool,
    pub selected: usize,
    /// Last fetch or rating failure, shown above the list.
    pub error: Option<String>,
}

impl ShopperState {
    pub fn new() -> Self {
        Self {
            listings: Loadable::Idle,
            search: TextField::new("Search Stores"),
            searching: false,
            selected: 0,
            error: None,
        }
    }

    pub fn selected_store(&self) -> Option<&StoreListing> {
        self.listings.loaded()?.get(self.selected)
    }
}

impl Default for ShopperState {
    fn default() -> Self {
        Self::new()
    }
}

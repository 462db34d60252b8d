pub mod filter_panel;
pub mod header;
pub mod result_card;
pub mod result_feed;
pub mod search_box;
pub mod variant_manager;

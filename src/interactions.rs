//! Host-facing callbacks for a programme card.
//!
//! A card (or any list row) reports the user's intent through this trait;
//! the hub decides whether the action applies.

/// Actions a host can trigger on a catalog entry.
pub trait CatalogInteractions {
    /// Opens the detail view for `id`. Returns false for unknown ids.
    fn on_select(&mut self, id: &str) -> bool;
    /// Flips the bookmark for `id`. Returns the new bookmark state, or false for unknown ids.
    fn on_bookmark_toggle(&mut self, id: &str) -> bool;
    /// Adds `id` to or removes it from the compare list. Returns true when the
    /// programme is in the list afterwards.
    fn on_compare_toggle(&mut self, id: &str) -> bool;
}

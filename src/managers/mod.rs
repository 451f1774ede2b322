// Hub state managers
// Managers hold the user's working state: bookmarks, the compare list, recent searches.

pub mod bookmark_manager;
pub mod compare_manager;
pub mod recent_searches;

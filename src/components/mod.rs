//! UI Components
//!
//! One module per feature page, plus the shared navigation and toasts.

mod bulletin;
mod calendar;
mod chores;
mod invite;
mod lists;
mod meals;
mod nav;
mod toast;
mod vault;

pub use bulletin::BulletinBoard;
pub use calendar::CalendarPage;
pub use chores::ChoresPage;
pub use invite::InvitePanel;
pub use lists::ListsPage;
pub use meals::MealPlanner;
pub use nav::FeatureNav;
pub use toast::ToastStack;
pub use vault::VaultPage;

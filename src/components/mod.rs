//! UI Components
//!
//! Reusable Leptos components.

mod board_view;
mod delete_confirm_button;
mod error_banner;
mod login_form;
mod nav_bar;
mod new_task_form;
mod protected_route;
mod task_card;

pub use board_view::BoardView;
pub use delete_confirm_button::DeleteConfirmButton;
pub use error_banner::ErrorBanner;
pub use login_form::LoginForm;
pub use nav_bar::NavBar;
pub use new_task_form::NewTaskForm;
pub use protected_route::ProtectedRoute;
pub use task_card::TaskCard;

//! Login and signup screens.

mod render;
mod state;
mod update;

pub use render::{render_login, render_signup};
pub use state::{LoginView, SignupView};
pub use update::{
    handle_login_finished, handle_login_key, handle_signup_finished, handle_signup_key,
};

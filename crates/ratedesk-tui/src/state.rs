//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── session: Session   (last value seen on the session watch)
//! │   ├── view: View         (the mounted screen and its data)
//! │   ├── tasks: Tasks       (task lifecycle state)
//! │   └── banner: Option<Banner>
//! └── overlay: Option<Overlay>   (modal overlays)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can get `&mut self` and `&mut TuiState` simultaneously.

use std::time::{Duration, Instant};

use ratedesk_core::routes::{self, Route};
use ratedesk_core::{Role, Session};

use crate::common::Tasks;
use crate::features::admin::AdminState;
use crate::features::auth::{LoginView, SignupView};
use crate::features::owner::OwnerState;
use crate::features::shopper::ShopperState;
use crate::overlays::Overlay;

/// How long an info banner stays up.
pub const INFO_BANNER_TTL: Duration = Duration::from_secs(4);

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    /// State for a freshly started UI. The caller mounts the initial route.
    pub fn new(session: Session) -> Self {
        Self {
            tui: TuiState::new(session),
            overlay: None,
        }
    }

    pub fn route(&self) -> Route {
        self.tui.view.route()
    }
}

pub struct TuiState {
    pub should_quit: bool,
    pub session: Session,
    pub view: View,
    pub tasks: Tasks,
    pub banner: Option<Banner>,
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(session: Session) -> Self {
        Self {
            should_quit: false,
            session,
            view: View::Login(LoginView::new()),
            tasks: Tasks::default(),
            banner: None,
            spinner_frame: 0,
        }
    }

    pub fn show_info(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner::info(text));
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner::error(text));
    }

    /// Route a persisted session should start on.
    pub fn initial_route(&self) -> Route {
        routes::initial_route(&self.session)
    }
}

/// The mounted screen. Each variant owns its own data; dropping the variant
/// is the view's teardown.
#[derive(Debug)]
pub enum View {
    Login(LoginView),
    Signup(SignupView),
    Admin(Box<AdminState>),
    Owner(OwnerState),
    Shopper(ShopperState),
}

impl View {
    pub fn route(&self) -> Route {
        match self {
            View::Login(_) => Route::Login,
            View::Signup(_) => Route::Signup,
            View::Admin(_) => Route::Dashboard(Role::Admin),
            View::Owner(_) => Route::Dashboard(Role::StoreOwner),
            View::Shopper(_) => Route::Dashboard(Role::User),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Login(_) => "Login",
            View::Signup(_) => "Sign Up",
            View::Admin(_) => "Admin Dashboard",
            View::Owner(_) => "Store Owner Dashboard",
            View::Shopper(_) => "Store Directory",
        }
    }

    /// True while a text input has focus, so plain letters are typed rather
    /// than treated as shortcuts.
    pub fn is_typing(&self) -> bool {
        match self {
            View::Login(_) | View::Signup(_) => true,
            View::Admin(admin) => admin.is_typing(),
            View::Owner(_) => false,
            View::Shopper(shopper) => shopper.searching,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Info,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
            shown_at: Instant::now(),
        }
    }

    /// Info banners fade; errors stay until dismissed.
    pub fn is_expired(&self) -> bool {
        self.kind == BannerKind::Info && self.shown_at.elapsed() >= INFO_BANNER_TTL
    }
}

//! Effect handlers for the TUI runtime.
//!
//! Each handler is a pure async function that performs one backend call and
//! returns the `UiEvent` carrying its result. The runtime spawns them and
//! routes the event through `TaskCompleted`.

use ratedesk_core::api::{
    Credentials, NewStore, NewUser, PasswordUpdate, RatingSubmission, Registration,
};
use ratedesk_core::listing::ListQuery;
use ratedesk_core::{ApiClient, auth};

use crate::events::UiEvent;

/// The shared session is written by `auth::login`; the event carries the
/// value that was stored.
pub async fn login(api: ApiClient, credentials: Credentials) -> UiEvent {
    let result = auth::login(&api, &credentials).await;
    UiEvent::LoginFinished(result.map(|_| api.session().get()))
}

pub async fn signup(api: ApiClient, registration: Registration) -> UiEvent {
    UiEvent::SignupFinished(auth::signup(&api, &registration).await)
}

pub async fn fetch_stats(api: ApiClient) -> UiEvent {
    UiEvent::StatsLoaded(api.admin_stats().await)
}

pub async fn fetch_users(api: ApiClient, query: ListQuery) -> UiEvent {
    UiEvent::UsersLoaded(api.admin_users(&query).await)
}

pub async fn fetch_stores(api: ApiClient, query: ListQuery) -> UiEvent {
    UiEvent::StoresLoaded(api.admin_stores(&query).await)
}

pub async fn create_user(api: ApiClient, user: NewUser) -> UiEvent {
    UiEvent::UserCreated(api.create_user(&user).await)
}

pub async fn create_store(api: ApiClient, store: NewStore) -> UiEvent {
    UiEvent::StoreCreated(api.create_store(&store).await)
}

pub async fn fetch_owner_dashboard(api: ApiClient) -> UiEvent {
    UiEvent::OwnerDashboardLoaded(api.owner_dashboard().await)
}

pub async fn browse_stores(api: ApiClient, search: String) -> UiEvent {
    UiEvent::ListingsLoaded(api.browse_stores(&search).await)
}

pub async fn submit_rating(api: ApiClient, rating: RatingSubmission) -> UiEvent {
    UiEvent::RatingSubmitted(api.submit_rating(rating).await)
}

pub async fn change_password(api: ApiClient, update: PasswordUpdate) -> UiEvent {
    UiEvent::PasswordChanged(api.change_password(&update).await)
}

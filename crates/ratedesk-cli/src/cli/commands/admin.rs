//! Admin command handlers.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use ratedesk_core::api::star_bar;
use ratedesk_core::forms::{StoreForm, UserForm};
use ratedesk_core::listing::{self, ListQuery, SortField};
use ratedesk_core::{ApiClient, Role, messages};

use super::{failure, require_role};

pub async fn stats(api: &ApiClient) -> Result<()> {
    require_role(api, Role::Admin)?;
    let stats = api
        .admin_stats()
        .await
        .map_err(|err| failure(&err, messages::STATS_FAILED))?;

    let mut table = Table::new();
    table.set_header(vec!["Total Users", "Total Stores", "Total Ratings"]);
    table.add_row(vec![
        stats.total_users.to_string(),
        stats.total_stores.to_string(),
        stats.total_ratings.to_string(),
    ]);
    println!("{table}");
    Ok(())
}

fn headers(query: &ListQuery, columns: [SortField; 4]) -> Vec<String> {
    columns
        .into_iter()
        .map(|field| query.sort.header(field))
        .collect()
}

pub async fn users(api: &ApiClient, query: &ListQuery) -> Result<()> {
    require_role(api, Role::Admin)?;
    let mut users = api
        .admin_users(query)
        .await
        .map_err(|err| failure(&err, messages::USERS_FAILED))?;
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }
    listing::sort_users(&mut users, query.sort);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = headers(query, SortField::USER_COLUMNS);
    header.push("Rating".to_string());
    table.set_header(header);
    for user in &users {
        table.add_row(vec![
            user.name.clone(),
            user.email.clone(),
            user.address.clone(),
            user.role.to_string(),
            user.rating_display(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn stores(api: &ApiClient, query: &ListQuery) -> Result<()> {
    require_role(api, Role::Admin)?;
    let mut stores = api
        .admin_stores(query)
        .await
        .map_err(|err| failure(&err, messages::STORES_FAILED))?;
    if stores.is_empty() {
        println!("No stores found.");
        return Ok(());
    }
    listing::sort_stores(&mut stores, query.sort);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers(query, SortField::STORE_COLUMNS));
    for store in &stores {
        table.add_row(vec![
            store.name.clone(),
            store.email.clone(),
            store.address.clone(),
            format!("{} {:.1}/5", star_bar(store.rating), store.rating),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn add_user(api: &ApiClient, form: &UserForm) -> Result<()> {
    require_role(api, Role::Admin)?;
    let user = form.validate()?;
    api.create_user(&user)
        .await
        .map_err(|err| failure(&err, messages::CREATE_USER_FAILED))?;
    println!("{}", messages::CREATE_USER_SUCCESS);
    Ok(())
}

pub async fn add_store(api: &ApiClient, form: &StoreForm) -> Result<()> {
    require_role(api, Role::Admin)?;
    let store = form.validate()?;
    api.create_store(&store)
        .await
        .map_err(|err| failure(&err, messages::CREATE_STORE_FAILED))?;
    println!("{}", messages::CREATE_STORE_SUCCESS);
    Ok(())
}

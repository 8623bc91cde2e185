//! Store browsing and rating for end users.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use ratedesk_core::{ApiClient, Role, forms, messages};

use super::{failure, require_role};

pub async fn list(api: &ApiClient, search: &str) -> Result<()> {
    require_role(api, Role::User)?;
    let stores = api
        .browse_stores(search)
        .await
        .map_err(|err| failure(&err, messages::STORES_FAILED))?;

    if stores.is_empty() {
        if search.trim().is_empty() {
            println!("{}", messages::NO_STORES);
        } else {
            println!("{}", messages::no_stores_matching(search));
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Address", "Overall", "Your Rating"]);
    for store in &stores {
        let yours = store
            .user_rating
            .map_or_else(|| messages::NOT_RATED_YET.to_string(), |r| format!("{r}/5"));
        table.add_row(vec![
            store.id.to_string(),
            store.name.clone(),
            store.address.clone(),
            format!("{:.1}/5", store.rating),
            yours,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn rate(api: &ApiClient, store_id: u64, rating: u8) -> Result<()> {
    let submission = forms::rating_submission(store_id, rating)?;
    require_role(api, Role::User)?;
    api.submit_rating(submission)
        .await
        .map_err(|err| failure(&err, messages::RATING_FAILED))?;
    println!("Rated store {store_id}: {rating}/5");
    Ok(())
}

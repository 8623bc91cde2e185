//! Store owner dashboard.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use ratedesk_core::api::star_bar;
use ratedesk_core::{ApiClient, Role, messages};

use super::{failure, require_role};

pub async fn dashboard(api: &ApiClient) -> Result<()> {
    require_role(api, Role::StoreOwner)?;
    let data = api
        .owner_dashboard()
        .await
        .map_err(|err| failure(&err, messages::OWNER_DASHBOARD_FAILED))?;

    println!(
        "Average rating: {} {:.1}/5",
        star_bar(data.average_rating),
        data.average_rating
    );
    println!("Total ratings: {}", data.ratings.len());

    if data.ratings.is_empty() {
        println!("{}", messages::NO_RATINGS_YET);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Email", "Rating", "Date"]);
    for entry in &data.ratings {
        table.add_row(vec![
            entry.name.clone(),
            entry.email.clone(),
            format!("{}/5", entry.rating),
            entry.date_display(),
        ]);
    }
    println!("{table}");
    Ok(())
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use storefront_api::auth::Role;

#[tokio::test]
async fn catalogue_order_and_approval() -> Result<()> {
    if !common::database_configured() {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = common::client();
    let admin = common::token(Role::Admin);
    let seller = common::token(Role::Seller);

    // Catalogue
    let (status, category) = common::json(
        client
            .post(server.url("/api/v1/categories"))
            .bearer_auth(&admin)
            .json(&json!({ "name": common::unique("Cat"), "image": "https://img.example.com/c.jpg" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();

    let (status, product) = common::json(
        client
            .post(server.url("/api/v1/products"))
            .bearer_auth(&seller)
            .json(&json!({
                "name": "Pencil",
                "price": 15,
                "description": "A sharp graphite pencil",
                "image": "https://img.example.com/p.jpg",
                "categoryId": category_id
            }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["category"]["id"], category_id);
    let product_id = product["id"].as_str().unwrap().to_string();

    let (status, found) = common::json(
        client
            .get(server.url(&format!("/api/v1/products?category_id={}&order_by_price=desc", category_id)))
            .bearer_auth(common::token(Role::Customer))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    // Customer with its own login
    let email = format!("{}@example.com", common::unique("buyer"));
    let (status, customer) = common::json(
        client
            .post(server.url("/api/v1/customers"))
            .bearer_auth(&admin)
            .json(&json!({
                "name": "Ana",
                "lastName": "Lopez",
                "phone": "555-0101",
                "user": { "email": email, "password": "longenough", "role": "customer" }
            }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(customer["user"]["email"], email.as_str());
    let customer_id = customer["id"].as_i64().unwrap();

    let (_, login) = common::json(
        client
            .post(server.url("/auth/login"))
            .json(&json!({ "email": email, "password": "longenough" }))
            .send()
            .await?,
    )
    .await?;
    let buyer = login["token"].as_str().unwrap().to_string();

    // Order
    let (status, order) = common::json(
        client
            .post(server.url("/api/v1/orders"))
            .bearer_auth(&buyer)
            .json(&json!({ "customerId": customer_id, "items": [{ "productId": product_id, "quantity": 2 }] }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"], 30);
    let order_id = order["id"].as_i64().unwrap();

    let (status, line) = common::json(
        client
            .post(server.url(&format!("/api/v1/orders/{}/orderlines", order_id)))
            .bearer_auth(&buyer)
            .json(&json!({ "productId": product_id, "quantity": 1 }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(line["orderId"], order_id);

    let (status, mine) = common::json(
        client
            .get(server.url("/api/v1/profile/my-orders"))
            .bearer_auth(&buyer)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["total"], 45);

    // Customers cannot decide orders; decided orders are final
    let denied = client
        .patch(server.url(&format!("/api/v1/orders/{}", order_id)))
        .bearer_auth(&buyer)
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let (status, approved) = common::json(
        client
            .patch(server.url(&format!("/api/v1/orders/{}", order_id)))
            .bearer_auth(&seller)
            .json(&json!({ "status": "APPROVED" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    let reversed = client
        .patch(server.url(&format!("/api/v1/orders/{}", order_id)))
        .bearer_auth(&seller)
        .json(&json!({ "status": "rejected" }))
        .send()
        .await?;
    assert_eq!(reversed.status(), StatusCode::CONFLICT);

    // Products still reference the category
    let blocked = client
        .delete(server.url(&format!("/api/v1/categories/{}", category_id)))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn catalogue_edits_and_failed_writes() -> Result<()> {
    if !common::database_configured() {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = common::client();
    let admin = common::token(Role::Admin);
    let seller = common::token(Role::Seller);
    let name = common::unique("Shelf");

    let (status, category) = common::json(
        client
            .post(server.url("/api/v1/categories"))
            .bearer_auth(&admin)
            .json(&json!({ "name": name, "image": "https://img.example.com/c.jpg" }))
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();
    let category_url = server.url(&format!("/api/v1/categories/{}", category_id));

    // An empty patch changes nothing
    let (status, patched) =
        common::json(client.patch(&category_url).bearer_auth(&seller).json(&json!({})).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["name"], category["name"]);
    assert_eq!(patched["image"], category["image"]);

    // A product pointing at a missing category is refused and leaves nothing behind
    let ghost = common::unique("Ghost");
    let refused = client
        .post(server.url("/api/v1/products"))
        .bearer_auth(&seller)
        .json(&json!({
            "name": ghost,
            "price": 15,
            "description": "Belongs nowhere",
            "image": "https://img.example.com/p.jpg",
            "categoryId": 999_999_999
        }))
        .send()
        .await?;
    assert_eq!(refused.status(), StatusCode::CONFLICT);

    let (status, found) = common::json(
        client
            .get(server.url(&format!("/api/v1/products?category_id=999999999&name={}", ghost)))
            .bearer_auth(&seller)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(found.as_array().unwrap().is_empty());

    // Sellers cannot create categories, and the refused one never appears
    let denied_name = common::unique("Denied");
    let denied = client
        .post(server.url("/api/v1/categories"))
        .bearer_auth(&seller)
        .json(&json!({ "name": denied_name, "image": "https://img.example.com/c.jpg" }))
        .send()
        .await?;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let (status, found) = common::json(
        client
            .get(server.url(&format!("/api/v1/categories?name={}", denied_name)))
            .bearer_auth(&admin)
            .send()
            .await?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(found.as_array().unwrap().is_empty());

    // Unknown orders cannot be decided
    let missing = client
        .patch(server.url("/api/v1/orders/999999999"))
        .bearer_auth(&seller)
        .json(&json!({ "status": "approved" }))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    // Deleted categories are gone
    let deleted = client.delete(&category_url).bearer_auth(&admin).send().await?;
    assert_eq!(deleted.status(), StatusCode::OK);
    let gone = client.get(&category_url).bearer_auth(&admin).send().await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn product_filters_combine_and_pages_do_not_overlap() -> Result<()> {
    if !common::database_configured() {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = common::client();
    let admin = common::token(Role::Admin);
    let seller = common::token(Role::Seller);

    let (_, category) = common::json(
        client
            .post(server.url("/api/v1/categories"))
            .bearer_auth(&admin)
            .json(&json!({ "name": common::unique("Desk"), "image": "https://img.example.com/c.jpg" }))
            .send()
            .await?,
    )
    .await?;
    let category_id = category["id"].as_i64().unwrap();

    for (name, price) in [("Alpha pen", 20), ("Alpha cup", 30), ("Beta pen", 40)] {
        let created = client
            .post(server.url("/api/v1/products"))
            .bearer_auth(&seller)
            .json(&json!({
                "name": name,
                "price": price,
                "description": "Desk supplies",
                "image": "https://img.example.com/p.jpg",
                "categoryId": category_id
            }))
            .send()
            .await?;
        assert_eq!(created.status(), StatusCode::CREATED);
    }

    let list = |query: String| {
        let url = server.url(&format!("/api/v1/products?category_id={}&{}", category_id, query));
        let request = client.get(url).bearer_auth(&seller);
        async move { common::json(request.send().await?).await }
    };

    // Every filter must hold
    let (status, found) = list("name=Alpha&price_max=25".to_string()).await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = found.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
    assert_eq!(names, vec![json!("Alpha pen")]);

    let (_, found) = list("price=30".to_string()).await?;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "Alpha cup");

    // Consecutive pages are disjoint and together cover everything
    let (_, first) = list("order=asc&offset=0&limit=2".to_string()).await?;
    let (_, second) = list("order=asc&offset=2&limit=2".to_string()).await?;
    let first = first.as_array().unwrap().clone();
    let second = second.as_array().unwrap().clone();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);

    let mut ids: Vec<String> = first.iter().chain(second.iter()).map(|p| p["id"].to_string()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    Ok(())
}

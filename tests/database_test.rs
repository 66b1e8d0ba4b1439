// ABOUTME: Database-layer integration tests over an in-memory SQLite pool
// ABOUTME: Covers shopping-list aggregation, recipe filters, and cascades

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Database layer tests

mod common;
mod helpers;

use foodgram_server::database::RecipeFilter;
use foodgram_server::models::User;

fn make_user(email: &str, username: &str) -> User {
    User::new(
        email.to_owned(),
        username.to_owned(),
        "Test".to_owned(),
        "User".to_owned(),
        "not-a-real-hash".to_owned(),
    )
}

#[tokio::test]
async fn test_shopping_list_groups_by_name_and_unit() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;
    let fixture = common::seed_catalog(resources.as_ref()).await;

    let user = make_user("chef@example.com", "chef");
    db.create_user(&user).await.unwrap();

    let bread = db
        .create_recipe(user.id, "Bread", None, "Bake", 60, &[], &[(fixture.flour, 100)])
        .await
        .unwrap();
    let pasta = db
        .create_recipe(
            user.id,
            "Pasta",
            None,
            "Boil",
            25,
            &[],
            &[(fixture.flour, 50), (fixture.milk, 200)],
        )
        .await
        .unwrap();

    db.add_to_cart(user.id, bread).await.unwrap();
    db.add_to_cart(user.id, pasta).await.unwrap();

    let list = db.shopping_list(user.id).await.unwrap();
    assert_eq!(list.len(), 2);

    let flour = list.iter().find(|e| e.name == "flour").unwrap();
    assert_eq!(flour.total_amount, 150);
    assert_eq!(flour.measurement_unit, "g");

    let milk = list.iter().find(|e| e.name == "milk").unwrap();
    assert_eq!(milk.total_amount, 200);
}

#[tokio::test]
async fn test_same_name_different_unit_not_merged() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;

    let grams = db.create_ingredient("ginger", "g").await.unwrap();
    let pieces = db.create_ingredient("ginger", "pieces").await.unwrap();

    let user = make_user("chef@example.com", "chef");
    db.create_user(&user).await.unwrap();

    let recipe = db
        .create_recipe(
            user.id,
            "Ginger tea",
            None,
            "Steep",
            10,
            &[],
            &[(grams.id, 30), (pieces.id, 2)],
        )
        .await
        .unwrap();
    db.add_to_cart(user.id, recipe).await.unwrap();

    let list = db.shopping_list(user.id).await.unwrap();
    assert_eq!(list.len(), 2, "units must stay separate: {list:?}");
}

#[tokio::test]
async fn test_recipe_filter_combines_author_and_tags() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;
    let fixture = common::seed_catalog(resources.as_ref()).await;

    let alice = make_user("alice@example.com", "alice");
    let bob = make_user("bob@example.com", "bob");
    db.create_user(&alice).await.unwrap();
    db.create_user(&bob).await.unwrap();

    db.create_recipe(
        alice.id,
        "Alice breakfast",
        None,
        "Cook",
        10,
        &[fixture.breakfast_tag],
        &[(fixture.flour, 10)],
    )
    .await
    .unwrap();
    db.create_recipe(
        alice.id,
        "Alice dinner",
        None,
        "Cook",
        10,
        &[fixture.dinner_tag],
        &[(fixture.flour, 10)],
    )
    .await
    .unwrap();
    db.create_recipe(
        bob.id,
        "Bob breakfast",
        None,
        "Cook",
        10,
        &[fixture.breakfast_tag],
        &[(fixture.flour, 10)],
    )
    .await
    .unwrap();

    let filter = RecipeFilter {
        author: Some(alice.id),
        tag_slugs: vec!["breakfast".to_owned()],
        ..RecipeFilter::default()
    };
    let recipes = db.list_recipes(&filter, 10, 0).await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].name, "Alice breakfast");
    assert_eq!(db.count_recipes(&filter).await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleting_recipe_clears_join_rows() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;
    let fixture = common::seed_catalog(resources.as_ref()).await;

    let user = make_user("chef@example.com", "chef");
    db.create_user(&user).await.unwrap();

    let recipe = db
        .create_recipe(
            user.id,
            "Ephemeral",
            None,
            "Cook",
            10,
            &[fixture.breakfast_tag],
            &[(fixture.flour, 10)],
        )
        .await
        .unwrap();
    db.add_favorite(user.id, recipe).await.unwrap();
    db.add_to_cart(user.id, recipe).await.unwrap();

    assert!(db.delete_recipe(recipe).await.unwrap());

    assert!(!db.is_favorited(user.id, recipe).await.unwrap());
    assert_eq!(db.cart_size(user.id).await.unwrap(), 0);
    assert!(db.recipe_ingredient_lines(recipe).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_subscribed_authors_newest_first() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;

    let reader = make_user("reader@example.com", "reader");
    let first = make_user("first@example.com", "first");
    let second = make_user("second@example.com", "second");
    for user in [&reader, &first, &second] {
        db.create_user(user).await.unwrap();
    }

    db.subscribe(reader.id, first.id).await.unwrap();
    db.subscribe(reader.id, second.id).await.unwrap();

    let authors = db.list_subscribed_authors(reader.id, 10, 0).await.unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(db.count_subscriptions(reader.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_unsubscribe_reports_missing_row() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;

    let reader = make_user("reader@example.com", "reader");
    let author = make_user("author@example.com", "author");
    db.create_user(&reader).await.unwrap();
    db.create_user(&author).await.unwrap();

    assert!(!db.unsubscribe(reader.id, author.id).await.unwrap());
    db.subscribe(reader.id, author.id).await.unwrap();
    assert!(db.unsubscribe(reader.id, author.id).await.unwrap());
}

#[tokio::test]
async fn test_update_after_delete_reports_missing_recipe() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;
    let fixture = common::seed_catalog(resources.as_ref()).await;

    let user = make_user("chef@example.com", "chef");
    db.create_user(&user).await.unwrap();
    let recipe = db
        .create_recipe(user.id, "Soup", None, "Simmer", 30, &[], &[(fixture.milk, 200)])
        .await
        .unwrap();
    assert!(db.delete_recipe(recipe).await.unwrap());

    // A delete racing an update must surface as a missing row, not an error
    let updated = db
        .update_recipe(recipe, "Stew", None, "Simmer longer", 45, &[], &[(fixture.milk, 300)])
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn test_password_update_reports_missing_user() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;

    assert!(!db
        .update_password(uuid::Uuid::new_v4(), "orphan-hash")
        .await
        .unwrap());

    let user = make_user("chef@example.com", "chef");
    db.create_user(&user).await.unwrap();
    assert!(db.update_password(user.id, "new-hash").await.unwrap());
}

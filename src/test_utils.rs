//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database and building menus, carts and
//! bookings with sensible defaults.

use crate::{
    core::{
        booking::{self, BookingDetail, NewBooking},
        category::{self, CategoryInput},
        menu::{self, MenuItemDetail, MenuItemInput, NewOption, NewVariant, VariantDetail},
        message::CurrencyFormat,
        order::{Cart, LineItem, OptionSelections, SelectedOption},
        pricing::PricingConfig,
        seating::SeatingSpotInput,
        wizard::CustomerData,
    },
    entities::{category as category_entity, menu_item, menu_variant, variant_option},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// A menu item model that is not stored anywhere.
#[must_use]
pub fn test_menu_model(id: i64, name: &str, price: i64) -> menu_item::Model {
    let now = chrono::Utc::now();
    menu_item::Model {
        id,
        name: name.to_string(),
        price,
        description: None,
        image: None,
        category_id: 1,
        created_at: now,
        updated_at: now,
    }
}

/// Detail of a plain 10.000 item without variants, not stored.
#[must_use]
pub fn test_menu_detail() -> MenuItemDetail {
    MenuItemDetail {
        item: test_menu_model(2, "Es Teh Manis", 10_000),
        category: None,
        variants: Vec::new(),
    }
}

/// Detail of the chicken set with two variants, not stored.
///
/// Same shape as the item created by [`setup_with_menu`].
#[must_use]
pub fn test_menu_detail_with_variants() -> MenuItemDetail {
    let variant = |id: i64, name: &str, options: &[(i64, &str, i64)]| VariantDetail {
        variant: menu_variant::Model {
            id,
            menu_item_id: 1,
            name: name.to_string(),
        },
        options: options
            .iter()
            .map(|&(option_id, option, price)| variant_option::Model {
                id: option_id,
                variant_id: id,
                name: option.to_string(),
                price,
            })
            .collect(),
    };

    MenuItemDetail {
        item: test_menu_model(1, "Paket Ayam Penyet Spesial", 45_000),
        category: Some(category_entity::Model {
            id: 1,
            name: "Paket Buka Puasa".to_string(),
        }),
        variants: vec![
            variant(
                1,
                "Pilihan Bagian Ayam",
                &[(1, "Paha", 0), (2, "Dada", 5000), (3, "Sayap", 0)],
            ),
            variant(
                2,
                "Pilihan Sambal",
                &[(4, "Sambal Terasi", 0), (5, "Sambal Ijo", 2000), (6, "Sambal Matah", 3000)],
            ),
        ],
    }
}

/// Dada (+5.000) and Sambal Terasi, leaving out the variant named `skip`.
/// Pass `""` for a complete selection.
#[must_use]
pub fn full_selection_without(skip: &str) -> OptionSelections {
    [
        ("Pilihan Bagian Ayam", "Dada", 5000),
        ("Pilihan Sambal", "Sambal Terasi", 0),
    ]
    .into_iter()
    .filter(|(variant, _, _)| *variant != skip)
    .map(|(variant, option, price)| {
        (
            variant.to_string(),
            SelectedOption {
                name: option.to_string(),
                price,
            },
        )
    })
    .collect()
}

/// A cart holding two chicken sets with Dada and Sambal Terasi
/// (subtotal 100.000).
pub fn test_cart_for(menu: &MenuItemDetail) -> Result<Cart> {
    let mut cart = Cart::new();
    cart.add(&menu.item, full_selection_without(""))?;
    cart.add(&menu.item, full_selection_without(""))?;
    Ok(cart)
}

/// A line item without options.
#[must_use]
pub fn test_line_item(menu_id: i64, name: &str, price: i64, quantity: u32) -> LineItem {
    LineItem {
        menu_id,
        menu_name: name.to_string(),
        base_price: price,
        selections: OptionSelections::new(),
        quantity,
        subtotal: price * i64::from(quantity),
    }
}

/// Customer data that passes the first wizard gate.
#[must_use]
pub fn test_customer(name: &str) -> CustomerData {
    CustomerData {
        customer_name: name.to_string(),
        phone: "0812-3456-7890".to_string(),
        instagram: Some("@budi".to_string()),
        booking_date: "2025-03-10".to_string(),
        pax: 4,
        seating: "Indoor".to_string(),
    }
}

/// A complete booking submission with a payment proof.
#[must_use]
pub fn test_new_booking(items: Vec<LineItem>) -> NewBooking {
    NewBooking {
        customer: test_customer("Budi"),
        items,
        payment_proof: Some("/uploads/proof.jpg".to_string()),
    }
}

/// Stores a booking for one 45.000 item under `customer_name`.
pub async fn create_test_booking(db: &DatabaseConnection, customer_name: &str) -> Result<BookingDetail> {
    let mut new = test_new_booking(vec![test_line_item(1, "Paket Ayam Penyet", 45_000, 1)]);
    new.customer = test_customer(customer_name);
    booking::create_booking(db, &PricingConfig::default(), &CurrencyFormat::default(), new).await
}

/// Creates a category.
pub async fn create_test_category(db: &DatabaseConnection, name: &str) -> Result<category_entity::Model> {
    category::create_category(
        db,
        CategoryInput {
            name: name.to_string(),
        },
    )
    .await
}

/// Menu input without variants.
#[must_use]
pub fn simple_menu_input(name: &str, price: i64, category_id: i64) -> MenuItemInput {
    MenuItemInput {
        name: name.to_string(),
        price,
        description: None,
        image: None,
        category_id,
        variants: None,
    }
}

/// Seating input with a fixed capacity.
#[must_use]
pub fn seating_input(name: &str, is_active: bool) -> SeatingSpotInput {
    SeatingSpotInput {
        name: name.to_string(),
        description: None,
        image: None,
        capacity: "2-10 orang".to_string(),
        is_active,
    }
}

/// Sets up a database holding one category and the chicken set with its
/// part and sambal variants. Returns (db, stored menu item).
pub async fn setup_with_menu() -> Result<(DatabaseConnection, MenuItemDetail)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Paket Buka Puasa").await?;

    let option = |name: &str, price: i64| NewOption {
        name: name.to_string(),
        price,
    };
    let mut input = simple_menu_input("Paket Ayam Penyet Spesial", 45_000, category.id);
    input.variants = Some(vec![
        NewVariant {
            name: "Pilihan Bagian Ayam".to_string(),
            options: vec![option("Paha", 0), option("Dada", 5000), option("Sayap", 0)],
        },
        NewVariant {
            name: "Pilihan Sambal".to_string(),
            options: vec![
                option("Sambal Terasi", 0),
                option("Sambal Ijo", 2000),
                option("Sambal Matah", 3000),
            ],
        },
    ]);

    let detail = menu::create_menu_item(&db, input).await?;
    Ok((db, detail))
}

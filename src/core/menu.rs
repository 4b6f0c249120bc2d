//! Menu business logic - menu items with their variants and options.
//!
//! Variants and options are written together with their menu item. On update,
//! a supplied variant list replaces the stored one wholesale (delete then
//! recreate inside one transaction); bookings are unaffected because they keep
//! flat snapshots of what was ordered.

use crate::{
    core::{
        order::{OptionSelections, SelectedOption},
        wizard,
    },
    entities::{
        Category, MenuItem, MenuVariant, VariantOption, category, menu_item, menu_variant,
        variant_option,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{info, instrument};

/// A variant together with its options, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDetail {
    /// The variant row
    #[serde(flatten)]
    pub variant: menu_variant::Model,
    /// Options of this variant
    pub options: Vec<variant_option::Model>,
}

impl VariantDetail {
    /// Looks up an option by name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&variant_option::Model> {
        self.options.iter().find(|option| option.name == name)
    }
}

/// A menu item with its category, variants and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDetail {
    /// The menu item row
    #[serde(flatten)]
    pub item: menu_item::Model,
    /// Category the item is listed under
    pub category: Option<category::Model>,
    /// Variants in display order
    pub variants: Vec<VariantDetail>,
}

impl MenuItemDetail {
    /// Looks up a variant by name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&VariantDetail> {
        self.variants.iter().find(|detail| detail.variant.name == name)
    }

    /// Turns variant → option names into a priced selection.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOption`] if a variant or option does not exist
    /// on this item and [`Error::IncompleteSelection`] if a variant is left
    /// without a choice.
    pub fn resolve_selections(&self, chosen: &BTreeMap<String, String>) -> Result<OptionSelections> {
        let mut selections = OptionSelections::new();

        for (variant_name, option_name) in chosen {
            let option = self
                .variant(variant_name)
                .and_then(|variant| variant.option(option_name))
                .ok_or_else(|| Error::UnknownOption {
                    variant: variant_name.clone(),
                    option: option_name.clone(),
                })?;

            selections.select(
                variant_name.clone(),
                SelectedOption {
                    name: option.name.clone(),
                    price: option.price,
                },
            );
        }

        wizard::ensure_selection_complete(self, &selections)?;
        Ok(selections)
    }
}

/// Option payload for create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOption {
    /// Option name
    pub name: String,
    /// Price delta
    #[serde(default)]
    pub price: i64,
}

/// Variant payload for create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVariant {
    /// Variant name
    pub name: String,
    /// Options of the variant
    #[serde(default)]
    pub options: Vec<NewOption>,
}

/// Payload for creating or fully updating a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    /// Display name
    pub name: String,
    /// Base price
    pub price: i64,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional image path or URL
    #[serde(default)]
    pub image: Option<String>,
    /// Category id
    pub category_id: i64,
    /// Variants; on update, `None` keeps the stored ones
    #[serde(default)]
    pub variants: Option<Vec<NewVariant>>,
}

/// Drops blank options, then variants that are unnamed or have no options left.
#[must_use]
pub fn filter_variants(variants: Vec<NewVariant>) -> Vec<NewVariant> {
    variants
        .into_iter()
        .filter_map(|variant| {
            let name = variant.name.trim().to_string();
            let options: Vec<NewOption> = variant
                .options
                .into_iter()
                .filter(|option| !option.name.trim().is_empty())
                .map(|option| NewOption {
                    name: option.name.trim().to_string(),
                    price: option.price,
                })
                .collect();

            (!name.is_empty() && !options.is_empty()).then_some(NewVariant { name, options })
        })
        .collect()
}

fn empty_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Rejects a second variant with the same name, or a repeated option name
/// within one variant. Selections are keyed by these names.
fn ensure_unique_names(variants: &[NewVariant]) -> Result<()> {
    let mut variant_names = HashSet::new();
    for variant in variants {
        if !variant_names.insert(variant.name.as_str()) {
            return Err(Error::validation(format!(
                "Duplicate variant name '{}'",
                variant.name
            )));
        }

        let mut option_names = HashSet::new();
        for option in &variant.options {
            if !option_names.insert(option.name.as_str()) {
                return Err(Error::validation(format!(
                    "Duplicate option '{}' in variant '{}'",
                    option.name, variant.name
                )));
            }
        }
    }
    Ok(())
}

fn prepare_input(mut input: MenuItemInput) -> Result<MenuItemInput> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Menu name cannot be empty"));
    }
    if let Some(variants) = input.variants.take() {
        let variants = filter_variants(variants);
        ensure_unique_names(&variants)?;
        input.variants = Some(variants);
    }
    Ok(input)
}

/// Retrieves every menu item with category, variants and options, ordered by
/// category then id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_menu_items(db: &DatabaseConnection) -> Result<Vec<MenuItemDetail>> {
    let items = MenuItem::find()
        .order_by_asc(menu_item::Column::CategoryId)
        .order_by_asc(menu_item::Column::Id)
        .all(db)
        .await?;
    load_details(db, items).await
}

/// Retrieves a single menu item with category, variants and options.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_menu_item_detail<C>(db: &C, menu_id: i64) -> Result<Option<MenuItemDetail>>
where
    C: ConnectionTrait,
{
    let Some(item) = MenuItem::find_by_id(menu_id).one(db).await? else {
        return Ok(None);
    };
    Ok(load_details(db, vec![item]).await?.pop())
}

async fn load_details<C>(db: &C, items: Vec<menu_item::Model>) -> Result<Vec<MenuItemDetail>>
where
    C: ConnectionTrait,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let item_ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    let category_ids: Vec<i64> = items.iter().map(|item| item.category_id).collect();

    let categories: HashMap<i64, category::Model> = Category::find()
        .filter(category::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|category| (category.id, category))
        .collect();

    let variants = MenuVariant::find()
        .filter(menu_variant::Column::MenuItemId.is_in(item_ids))
        .order_by_asc(menu_variant::Column::Id)
        .all(db)
        .await?;

    let variant_ids: Vec<i64> = variants.iter().map(|variant| variant.id).collect();
    let mut options_by_variant: HashMap<i64, Vec<variant_option::Model>> = HashMap::new();
    if !variant_ids.is_empty() {
        for option in VariantOption::find()
            .filter(variant_option::Column::VariantId.is_in(variant_ids))
            .order_by_asc(variant_option::Column::Id)
            .all(db)
            .await?
        {
            options_by_variant
                .entry(option.variant_id)
                .or_default()
                .push(option);
        }
    }

    let mut variants_by_item: HashMap<i64, Vec<VariantDetail>> = HashMap::new();
    for variant in variants {
        let options = options_by_variant.remove(&variant.id).unwrap_or_default();
        variants_by_item
            .entry(variant.menu_item_id)
            .or_default()
            .push(VariantDetail { variant, options });
    }

    Ok(items
        .into_iter()
        .map(|item| MenuItemDetail {
            category: categories.get(&item.category_id).cloned(),
            variants: variants_by_item.remove(&item.id).unwrap_or_default(),
            item,
        })
        .collect())
}

async fn insert_variants<C>(db: &C, menu_item_id: i64, variants: Vec<NewVariant>) -> Result<()>
where
    C: ConnectionTrait,
{
    for variant in variants {
        let stored = menu_variant::ActiveModel {
            menu_item_id: Set(menu_item_id),
            name: Set(variant.name),
            ..Default::default()
        }
        .insert(db)
        .await?;

        for option in variant.options {
            variant_option::ActiveModel {
                variant_id: Set(stored.id),
                name: Set(option.name),
                price: Set(option.price),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

async fn delete_variants<C>(db: &C, menu_item_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let variant_ids: Vec<i64> = MenuVariant::find()
        .filter(menu_variant::Column::MenuItemId.eq(menu_item_id))
        .all(db)
        .await?
        .into_iter()
        .map(|variant| variant.id)
        .collect();

    if !variant_ids.is_empty() {
        VariantOption::delete_many()
            .filter(variant_option::Column::VariantId.is_in(variant_ids))
            .exec(db)
            .await?;
    }
    MenuVariant::delete_many()
        .filter(menu_variant::Column::MenuItemId.eq(menu_item_id))
        .exec(db)
        .await?;
    Ok(())
}

async fn ensure_category<C>(db: &C, category_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(Error::CategoryNotFound { id: category_id })
}

/// Creates a menu item with its variants and options.
///
/// Variants without a name or without any named option are skipped.
///
/// # Errors
/// Returns an error if:
/// - The name is empty, or variant or option names repeat
/// - The category does not exist
/// - A database write fails (nothing is written in that case)
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_menu_item(db: &DatabaseConnection, input: MenuItemInput) -> Result<MenuItemDetail> {
    let input = prepare_input(input)?;

    let txn = db.begin().await?;
    ensure_category(&txn, input.category_id).await?;

    let now = chrono::Utc::now();
    let item = menu_item::ActiveModel {
        name: Set(input.name.trim().to_string()),
        price: Set(input.price),
        description: Set(empty_to_none(input.description)),
        image: Set(empty_to_none(input.image)),
        category_id: Set(input.category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(variants) = input.variants {
        insert_variants(&txn, item.id, variants).await?;
    }

    let detail = get_menu_item_detail(&txn, item.id)
        .await?
        .ok_or(Error::MenuItemNotFound { id: item.id })?;
    txn.commit().await?;

    info!(menu_id = detail.item.id, variants = detail.variants.len(), "Menu item created");
    Ok(detail)
}

/// Updates a menu item's fields; when `variants` is given, replaces all of
/// its variants and options.
///
/// # Errors
/// Returns an error if:
/// - The name is empty, or variant or option names repeat
/// - The menu item or category does not exist
/// - A database write fails (nothing is written in that case)
#[instrument(skip(db, input))]
pub async fn update_menu_item(
    db: &DatabaseConnection,
    menu_id: i64,
    input: MenuItemInput,
) -> Result<MenuItemDetail> {
    let input = prepare_input(input)?;

    let txn = db.begin().await?;
    let mut item: menu_item::ActiveModel = MenuItem::find_by_id(menu_id)
        .one(&txn)
        .await?
        .ok_or(Error::MenuItemNotFound { id: menu_id })?
        .into();
    ensure_category(&txn, input.category_id).await?;

    item.name = Set(input.name.trim().to_string());
    item.price = Set(input.price);
    item.description = Set(empty_to_none(input.description));
    item.image = Set(empty_to_none(input.image));
    item.category_id = Set(input.category_id);
    item.updated_at = Set(chrono::Utc::now());
    item.update(&txn).await?;

    if let Some(variants) = input.variants {
        delete_variants(&txn, menu_id).await?;
        insert_variants(&txn, menu_id, variants).await?;
    }

    let detail = get_menu_item_detail(&txn, menu_id)
        .await?
        .ok_or(Error::MenuItemNotFound { id: menu_id })?;
    txn.commit().await?;

    info!(menu_id, "Menu item updated");
    Ok(detail)
}

/// Deletes a menu item together with its variants and options.
///
/// # Errors
/// Returns an error if the menu item does not exist or the delete fails.
#[instrument(skip(db))]
pub async fn delete_menu_item(db: &DatabaseConnection, menu_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    MenuItem::find_by_id(menu_id)
        .one(&txn)
        .await?
        .ok_or(Error::MenuItemNotFound { id: menu_id })?;

    delete_variants(&txn, menu_id).await?;
    MenuItem::delete_by_id(menu_id).exec(&txn).await?;
    txn.commit().await?;

    info!(menu_id, "Menu item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_filter_variants() {
        let variants = vec![
            NewVariant {
                name: " Pilihan Sambal ".to_string(),
                options: vec![
                    NewOption {
                        name: "Sambal Ijo".to_string(),
                        price: 2000,
                    },
                    NewOption {
                        name: "  ".to_string(),
                        price: 0,
                    },
                ],
            },
            NewVariant {
                name: String::new(),
                options: vec![NewOption {
                    name: "Orphan".to_string(),
                    price: 0,
                }],
            },
            NewVariant {
                name: "Kosong".to_string(),
                options: Vec::new(),
            },
        ];

        let filtered = filter_variants(variants);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Pilihan Sambal");
        assert_eq!(filtered[0].options.len(), 1);
    }

    #[tokio::test]
    async fn test_create_menu_item_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let input = MenuItemInput {
            name: "   ".to_string(),
            price: 10000,
            description: None,
            image: None,
            category_id: 1,
            variants: None,
        };
        let result = create_menu_item(&db, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_variant_and_option_names_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Minuman").await?;
        let option = |name: &str, price| NewOption {
            name: name.to_string(),
            price,
        };

        let mut input = simple_menu_input("Es Campur", 15000, category.id);
        input.variants = Some(vec![
            NewVariant {
                name: "Ukuran".to_string(),
                options: vec![option("Kecil", 0)],
            },
            NewVariant {
                name: " Ukuran ".to_string(),
                options: vec![option("Besar", 5000)],
            },
        ]);
        let result = create_menu_item(&db, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut input = simple_menu_input("Es Campur", 15000, category.id);
        input.variants = Some(vec![NewVariant {
            name: "Ukuran".to_string(),
            options: vec![option("Besar", 5000), option("Besar ", 7000)],
        }]);
        let result = create_menu_item(&db, input).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(get_all_menu_items(&db).await?.is_empty());

        // Same option name under different variants is fine
        let mut input = simple_menu_input("Es Campur", 15000, category.id);
        input.variants = Some(vec![
            NewVariant {
                name: "Ukuran".to_string(),
                options: vec![option("Biasa", 0)],
            },
            NewVariant {
                name: "Gula".to_string(),
                options: vec![option("Biasa", 0)],
            },
        ]);
        let created = create_menu_item(&db, input).await?;
        assert_eq!(created.variants.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_menu_item_with_variants() -> Result<()> {
        let (db, detail) = setup_with_menu().await?;

        assert_eq!(detail.item.name, "Paket Ayam Penyet Spesial");
        assert_eq!(detail.category.as_ref().unwrap().name, "Paket Buka Puasa");
        assert_eq!(detail.variants.len(), 2);
        assert_eq!(detail.variants[0].variant.name, "Pilihan Bagian Ayam");
        assert_eq!(detail.variants[0].options.len(), 3);
        assert_eq!(detail.variants[1].options[1].price, 2000);

        let all = get_all_menu_items(&db).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], detail);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_menu_item_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_menu_item(&db, simple_menu_input("Es Teh", 8000, 42)).await;
        assert!(matches!(result, Err(Error::CategoryNotFound { id: 42 })));
        assert!(get_all_menu_items(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_menu_item_replaces_variants() -> Result<()> {
        let (db, detail) = setup_with_menu().await?;
        let category_id = detail.item.category_id;

        // Scalar update keeps variants
        let mut input = simple_menu_input("Paket Ayam Bakar", 47000, category_id);
        let updated = update_menu_item(&db, detail.item.id, input.clone()).await?;
        assert_eq!(updated.item.name, "Paket Ayam Bakar");
        assert_eq!(updated.item.price, 47000);
        assert_eq!(updated.variants.len(), 2);

        // Supplying variants replaces them
        input.variants = Some(vec![NewVariant {
            name: "Level Pedas".to_string(),
            options: vec![
                NewOption {
                    name: "Sedang".to_string(),
                    price: 0,
                },
                NewOption {
                    name: "Extra".to_string(),
                    price: 1000,
                },
            ],
        }]);
        let updated = update_menu_item(&db, detail.item.id, input).await?;
        assert_eq!(updated.variants.len(), 1);
        assert_eq!(updated.variants[0].variant.name, "Level Pedas");
        assert_eq!(VariantOption::find().all(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_menu_item_cascades() -> Result<()> {
        let (db, detail) = setup_with_menu().await?;

        delete_menu_item(&db, detail.item.id).await?;
        assert!(get_menu_item_detail(&db, detail.item.id).await?.is_none());
        assert!(MenuVariant::find().all(&db).await?.is_empty());
        assert!(VariantOption::find().all(&db).await?.is_empty());

        let result = delete_menu_item(&db, detail.item.id).await;
        assert!(matches!(result, Err(Error::MenuItemNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_selections() -> Result<()> {
        let (_db, detail) = setup_with_menu().await?;

        let chosen = BTreeMap::from([
            ("Pilihan Bagian Ayam".to_string(), "Dada".to_string()),
            ("Pilihan Sambal".to_string(), "Sambal Matah".to_string()),
        ]);
        let selections = detail.resolve_selections(&chosen)?;
        assert_eq!(selections.price_delta(), 8000);

        let unknown = BTreeMap::from([
            ("Pilihan Bagian Ayam".to_string(), "Ceker".to_string()),
            ("Pilihan Sambal".to_string(), "Sambal Matah".to_string()),
        ]);
        assert!(matches!(
            detail.resolve_selections(&unknown),
            Err(Error::UnknownOption { .. })
        ));
        Ok(())
    }
}

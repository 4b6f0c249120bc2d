//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod booking;
pub mod category;
pub mod menu_item;
pub mod menu_variant;
pub mod order_item;
pub mod seating_spot;
pub mod variant_option;

// Re-export specific types to avoid conflicts
pub use booking::{BookingStatus, Column as BookingColumn, Entity as Booking, Model as BookingModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use menu_item::{Column as MenuItemColumn, Entity as MenuItem, Model as MenuItemModel};
pub use menu_variant::{
    Column as MenuVariantColumn, Entity as MenuVariant, Model as MenuVariantModel,
};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use seating_spot::{
    Column as SeatingSpotColumn, Entity as SeatingSpot, Model as SeatingSpotModel,
};
pub use variant_option::{
    Column as VariantOptionColumn, Entity as VariantOption, Model as VariantOptionModel,
};

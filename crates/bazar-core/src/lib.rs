pub mod app_config;
pub mod cart;
pub mod catalogue;
pub mod checkout;
pub mod config;
pub mod error;
pub mod products;
pub mod reports;
pub mod storage;
pub mod validation;

pub use app_config::{AppConfig, Environment};
pub use cart::{AddMode, AddOutcome, Cart, CartLine, CartNotice, CartStore, CART_STORAGE_KEY};
pub use catalogue::{CatalogueFilters, CatalogueState, Page, SortKey};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError, StorageError};
pub use products::{
    final_price, Category, CategoryNode, EntityId, Product, Subcategory, User, ORPHAN_LABEL,
};
pub use reports::{CategoryIndex, DateRange, InventoryReport};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use validation::{ProductDraft, MAX_CATEGORIES, MAX_PRODUCTS};

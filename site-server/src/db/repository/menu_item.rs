//! Menu Item Repository

use serde::Serialize;

use super::{RepoError, RepoResult};
use crate::db::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::store::{DocumentStore, Filter, Ordering};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_repo_optional_text, validate_repo_text,
};

const COLLECTION: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    store: DocumentStore,
}

impl MenuItemRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// All items, optionally restricted to one category, ordered by name.
    /// Unavailable items are included; the public menu marks them instead
    /// of hiding them.
    pub async fn find_all(&self, category: Option<MenuCategory>) -> RepoResult<Vec<MenuItem>> {
        let mut filters = Vec::new();
        if let Some(category) = category {
            filters.push(Filter::eq(
                "category",
                serde_json::to_value(category).unwrap_or_default(),
            ));
        }
        self.store
            .get_many(COLLECTION, &filters, &[Ordering::asc("name")], None)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        self.store.get_one(COLLECTION, id).await
    }

    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        validate_repo_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_repo_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_repo_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
        if data.price.is_sign_negative() {
            return Err(RepoError::Validation("price must not be negative".into()));
        }

        #[derive(Serialize)]
        struct MenuItemRow {
            name: String,
            description: String,
            price: rust_decimal::Decimal,
            category: MenuCategory,
            #[serde(skip_serializing_if = "Option::is_none")]
            image_url: Option<String>,
            is_available: bool,
        }

        let row = MenuItemRow {
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            image_url: data.image_url,
            is_available: data.is_available.unwrap_or(true),
        };

        self.store.create(COLLECTION, None, &row).await
    }

    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        if let Some(ref name) = data.name {
            validate_repo_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(ref description) = data.description {
            validate_repo_text(description, "description", MAX_NOTE_LEN)?;
        }
        validate_repo_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
        if let Some(price) = data.price
            && price.is_sign_negative()
        {
            return Err(RepoError::Validation("price must not be negative".into()));
        }

        self.store.update(COLLECTION, id, &data).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.store.delete(COLLECTION, id).await
    }
}

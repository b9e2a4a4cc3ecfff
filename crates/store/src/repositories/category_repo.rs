//! Repository for the `categories` collection.

use ideaboard_core::category::{Category, NewCategory, DEFAULT_CATEGORIES};
use ideaboard_core::types::DocId;

use crate::document::{collections::CATEGORIES, Document, Patch};
use crate::error::{StoreReadError, StoreWriteError};
use crate::live::Subscription;
use crate::store::DocumentStore;

fn decode_category(doc: &Document) -> Result<Category, StoreReadError> {
    doc.decode(CATEGORIES)
}

fn category_fields(label: &str, color: &str) -> Patch {
    Patch::new().set("label", label).set("color", color)
}

/// Provides category seeding, reads and writes.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Write the default categories if the collection is empty.
    ///
    /// Defaults are created under their fixed ids with create-if-absent
    /// semantics, so concurrent seeders converge on the same five documents
    /// and never overwrite one another. Once any category exists nothing is
    /// seeded. Returns how many documents this call created.
    pub async fn ensure_seeded(store: &dyn DocumentStore) -> Result<usize, StoreWriteError> {
        if !store.list(CATEGORIES).await?.is_empty() {
            return Ok(0);
        }

        let mut created = 0;
        for seed in DEFAULT_CATEGORIES {
            if store
                .insert_with_id(
                    CATEGORIES,
                    seed.id,
                    category_fields(seed.label, seed.color),
                )
                .await?
            {
                created += 1;
            }
        }

        if created > 0 {
            tracing::info!(created, "Seeded default categories");
        }
        Ok(created)
    }

    /// Seed if needed, then open a live query over all categories.
    ///
    /// A seeding failure is logged, not returned: the subscription is still
    /// useful without defaults.
    pub async fn subscribe(
        store: &dyn DocumentStore,
    ) -> Result<Subscription<Category>, StoreReadError> {
        if let Err(e) = Self::ensure_seeded(store).await {
            tracing::error!(error = %e, "Failed to seed default categories");
        }
        Ok(store.watch(CATEGORIES).await?.typed(decode_category))
    }

    /// Read all categories once.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<Category>, StoreReadError> {
        store
            .list(CATEGORIES)
            .await?
            .iter()
            .map(decode_category)
            .collect()
    }

    /// Insert a category under a generated id.
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewCategory,
    ) -> Result<DocId, StoreWriteError> {
        let id = store
            .insert(CATEGORIES, category_fields(&input.label, &input.color))
            .await?;
        tracing::info!(category_id = %id, "Category created");
        Ok(id)
    }

    /// Remove a category. Ideas that reference it keep the dangling id.
    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<(), StoreWriteError> {
        store.delete(CATEGORIES, id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

//! # Database Module
//!
//! PostgreSQL-backed [`IngredientStore`]. Canonical ingredients are unique by
//! slug and links are unique per (recipe, ingredient); both inserts rely on
//! `ON CONFLICT DO NOTHING`, so concurrent or repeated linkage runs never
//! create duplicates.
//!
//! Recipe ingredient texts are read from the `recipe_ingredient_texts`
//! relation, which the content store provides (a table or a view with
//! `recipe_id`, `locale` and `ingredients_text` columns).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::errors::{LexiconError, LexiconResult};
use crate::ingredient_model::{
    CanonicalIngredient, Locale, RecipeIngredientLink, RecipeText,
};
use crate::linkage::IngredientStore;

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> LexiconResult<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredients (
            id BIGSERIAL PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            locale TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_ingredients (
            recipe_id BIGINT NOT NULL,
            ingredient_id BIGINT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
            locale TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (recipe_id, ingredient_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS recipe_ingredients_ingredient_idx
         ON recipe_ingredients (ingredient_id)",
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Load recipe ingredient texts for the given locales
pub async fn list_recipe_texts(pool: &PgPool, locales: &[Locale]) -> LexiconResult<Vec<RecipeText>> {
    let codes: Vec<String> = locales.iter().map(|l| l.code().to_string()).collect();

    let rows = sqlx::query(
        "SELECT recipe_id, locale, ingredients_text
         FROM recipe_ingredient_texts
         WHERE locale = ANY($1)
         ORDER BY recipe_id, locale",
    )
    .bind(codes)
    .fetch_all(pool)
    .await?;

    let recipes = rows
        .iter()
        .map(|row| -> LexiconResult<RecipeText> {
            Ok(RecipeText {
                recipe_id: row.try_get("recipe_id")?,
                locale: parse_locale(row)?,
                ingredients_text: row.try_get("ingredients_text")?,
            })
        })
        .collect::<LexiconResult<Vec<_>>>()?;

    info!(count = recipes.len(), "Loaded recipe ingredient texts");
    Ok(recipes)
}

fn parse_locale(row: &PgRow) -> LexiconResult<Locale> {
    let code: String = row.try_get("locale")?;
    code.parse()
        .map_err(|_| LexiconError::Store(format!("unsupported locale '{}' in database", code)))
}

fn ingredient_from_row(row: &PgRow) -> LexiconResult<CanonicalIngredient> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(CanonicalIngredient {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        name: row.try_get("name")?,
        locale: parse_locale(row)?,
        created_at,
    })
}

/// [`IngredientStore`] over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_ingredient_by_slug(&self, slug: &str) -> LexiconResult<Option<CanonicalIngredient>> {
        let row = sqlx::query(
            "SELECT id, slug, name, locale, created_at FROM ingredients WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(ingredient_from_row).transpose()
    }
}

#[async_trait]
impl IngredientStore for PgStore {
    async fn find_or_create_ingredient(
        &self,
        slug: &str,
        name: &str,
        locale: Locale,
    ) -> LexiconResult<(CanonicalIngredient, bool)> {
        if let Some(existing) = self.find_ingredient_by_slug(slug).await? {
            return Ok((existing, false));
        }

        let inserted = sqlx::query(
            "INSERT INTO ingredients (slug, name, locale) VALUES ($1, $2, $3)
             ON CONFLICT (slug) DO NOTHING
             RETURNING id, slug, name, locale, created_at",
        )
        .bind(slug)
        .bind(name)
        .bind(locale.code())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(row) => {
                let ingredient = ingredient_from_row(&row)?;
                debug!(slug = %slug, id = ingredient.id, "Inserted canonical ingredient");
                Ok((ingredient, true))
            }
            // another writer inserted the slug between our read and insert
            None => self
                .find_ingredient_by_slug(slug)
                .await?
                .map(|ingredient| (ingredient, false))
                .ok_or_else(|| {
                    LexiconError::Store(format!("ingredient '{}' vanished after conflict", slug))
                }),
        }
    }

    async fn link_recipe_ingredient(&self, link: &RecipeIngredientLink) -> LexiconResult<bool> {
        let result = sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, locale) VALUES ($1, $2, $3)
             ON CONFLICT (recipe_id, ingredient_id) DO NOTHING",
        )
        .bind(link.recipe_id)
        .bind(link.ingredient_id)
        .bind(link.locale.code())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ingredients(&self) -> LexiconResult<Vec<CanonicalIngredient>> {
        let rows = sqlx::query(
            "SELECT id, slug, name, locale, created_at FROM ingredients ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(ingredient_from_row).collect()
    }

    async fn links(&self) -> LexiconResult<Vec<RecipeIngredientLink>> {
        let rows = sqlx::query(
            "SELECT recipe_id, ingredient_id, locale FROM recipe_ingredients
             ORDER BY recipe_id, ingredient_id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> LexiconResult<RecipeIngredientLink> {
                Ok(RecipeIngredientLink {
                    recipe_id: row.try_get("recipe_id")?,
                    ingredient_id: row.try_get("ingredient_id")?,
                    locale: parse_locale(row)?,
                })
            })
            .collect()
    }
}

//! Read-only access to the recipe store.
//!
//! The store is a pre-populated SQLite file with three tables:
//! `ingredients(id, name, name_hu)`, `recipes(id, name, instructions)` and
//! `recipe_ingredients(recipe_id, ingredient_id, quantity)`.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::{FoodeeError, Result};

/// One recipe as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub title: String,
    /// Every ingredient of the recipe as `"<display name>: <quantity>"`
    /// (just the name when the quantity is NULL), joined with `", \n"`
    pub ingredients_summary: String,
    pub instructions: String,
}

// Matches on the canonical `name`, but the summary lists all ingredients of
// each matching recipe by display name. No ORDER BY: order is whatever the
// GROUP BY yields.
const FIND_BY_INGREDIENT: &str = "
    SELECT recipes.name,
           COALESCE(GROUP_CONCAT(COALESCE(ingredients.name_hu, ingredients.name, '') || COALESCE(': ' || recipe_ingredients.quantity, ''), ', \n'), ''),
           COALESCE(recipes.instructions, '')
    FROM recipes
    JOIN recipe_ingredients ON recipes.id = recipe_ingredients.recipe_id
    JOIN ingredients ON recipe_ingredients.ingredient_id = ingredients.id
    WHERE recipes.id IN (
        SELECT recipe_id
        FROM recipe_ingredients
        JOIN ingredients ON recipe_ingredients.ingredient_id = ingredients.id
        WHERE ingredients.name = ?1
    )
    GROUP BY recipes.id
";

/// Recipe lookups against a store file. Holds only the path; every call
/// opens and closes its own read-only connection.
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    database_path: PathBuf,
}

impl RecipeRepository {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// All recipes that use the ingredient whose canonical name is exactly `name`.
    ///
    /// No match is an empty list, not an error.
    pub fn find_by_ingredient(&self, name: &str) -> Result<Vec<Recipe>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(FIND_BY_INGREDIENT)?;
        let rows = stmt.query_map([name], |row| {
            Ok(Recipe {
                title: row.get(0)?,
                ingredients_summary: row.get(1)?,
                instructions: row.get(2)?,
            })
        })?;
        let recipes = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(ingredient = name, count = recipes.len(), "recipe lookup");
        Ok(recipes)
    }

    fn open(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.database_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            FoodeeError::Repository(format!(
                "cannot open {}: {}",
                self.database_path.display(),
                e
            ))
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{create_store, tomato_store};
    use super::*;

    #[test]
    fn test_find_returns_every_recipe_with_full_summary() {
        let (_dir, repo) = tomato_store();

        let mut recipes = repo.find_by_ingredient("Tomato").unwrap();
        recipes.sort_by(|a, b| a.title.cmp(&b.title));

        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].title, "Paradicsomleves");
        assert!(recipes[0].ingredients_summary.contains("Paradicsom: 2"));
        assert!(recipes[0].ingredients_summary.contains("Só: 1"));
        assert!(recipes[0].ingredients_summary.contains(", \n"));
        assert_eq!(recipes[0].instructions, "Főzd meg.");
        assert_eq!(recipes[1].title, "Paradicsomsaláta");
        assert_eq!(recipes[1].ingredients_summary, "Paradicsom: 1");
    }

    #[test]
    fn test_match_uses_canonical_name_only() {
        let (_dir, repo) = tomato_store();
        assert!(repo.find_by_ingredient("Paradicsom").unwrap().is_empty());
        assert!(repo.find_by_ingredient("tomato").unwrap().is_empty());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let (_dir, repo) = tomato_store();
        assert!(repo.find_by_ingredient("Banana").unwrap().is_empty());
    }

    #[test]
    fn test_missing_display_name_falls_back() {
        let (_dir, repo) = create_store(
            "
            INSERT INTO ingredients VALUES (1, 'Basil', NULL);
            INSERT INTO recipes VALUES (1, 'Pesto', NULL);
            INSERT INTO recipe_ingredients VALUES (1, 1, '1 csokor');
            ",
        );
        let recipes = repo.find_by_ingredient("Basil").unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].ingredients_summary, "Basil: 1 csokor");
        assert_eq!(recipes[0].instructions, "");
    }

    #[test]
    fn test_null_quantity_keeps_ingredient_in_summary() {
        let (_dir, repo) = create_store(
            "
            INSERT INTO ingredients VALUES (1, 'Tomato', 'Paradicsom'), (2, 'Salt', 'Só');
            INSERT INTO recipes VALUES (1, 'Paradicsomleves', 'Főzd meg.'), (2, 'Paradicsomsaláta', 'Vágd fel.');
            INSERT INTO recipe_ingredients VALUES (1, 1, '2'), (1, 2, NULL), (2, 1, NULL);
            ",
        );

        let mut recipes = repo.find_by_ingredient("Tomato").unwrap();
        recipes.sort_by(|a, b| a.title.cmp(&b.title));

        assert_eq!(recipes.len(), 2);
        assert!(recipes[0].ingredients_summary.contains("Paradicsom: 2"));
        assert!(recipes[0].ingredients_summary.contains("Só"));
        assert_eq!(recipes[1].ingredients_summary, "Paradicsom");
    }

    #[test]
    fn test_missing_store_is_repository_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = RecipeRepository::new(dir.path().join("absent.db"));
        let err = repo.find_by_ingredient("Tomato").unwrap_err();
        assert!(matches!(err, FoodeeError::Repository(_)));
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn test_malformed_store_is_repository_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("food.db");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        let err = RecipeRepository::new(path).find_by_ingredient("Tomato").unwrap_err();
        assert!(matches!(err, FoodeeError::Repository(_)));
    }

    #[test]
    fn test_store_without_schema_is_repository_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path).unwrap().execute_batch("CREATE TABLE other (x INTEGER);").unwrap();

        let err = RecipeRepository::new(path).find_by_ingredient("Tomato").unwrap_err();
        assert!(matches!(err, FoodeeError::Repository(_)));
    }
}

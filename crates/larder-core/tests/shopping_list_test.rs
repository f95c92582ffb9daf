#![allow(clippy::unwrap_used)]
// End-to-end tests for recipes and shopping lists over the JSON file store.

use std::collections::HashSet;
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use larder_core::{CoreError, Ingredient, Larder, Quantity, RecipeId, RecipeRef, ShoppingItem};

// ── Helpers ─────────────────────────────────────────────────────────

fn open() -> (TempDir, Larder) {
    let dir = tempfile::tempdir().unwrap();
    let larder = Larder::open(dir.path().join("larder.json")).unwrap();
    (dir, larder)
}

fn seed(larder: &Larder) {
    larder
        .recipes()
        .add_recipe(
            "pasta bolo",
            &[
                Ingredient::new("pasta", 500, "g"),
                Ingredient::new("tomato", 500, "g"),
            ],
        )
        .unwrap();
    larder
        .recipes()
        .add_recipe(
            "pasta",
            &[Ingredient::new("pasta", 600, "g"), Ingredient::new("milk", 1, "l")],
        )
        .unwrap();
}

fn qty(raw: &str) -> Quantity {
    raw.parse().unwrap()
}

fn as_set(items: &[ShoppingItem]) -> HashSet<(String, String)> {
    items.iter().map(ShoppingItem::to_pair).collect()
}

fn set_of(pairs: &[(&str, &str)]) -> HashSet<(String, String)> {
    pairs
        .iter()
        .map(|(name, amount)| ((*name).to_owned(), (*amount).to_owned()))
        .collect()
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn aggregation_scenario() {
    let (_dir, larder) = open();
    seed(&larder);
    let list = larder.shopping_list();
    assert!(list.add_recipe_by_title("pasta bolo", 1).unwrap());
    assert!(list.add_recipe_by_title("pasta", 1).unwrap());

    let items = list.generate(None).unwrap();
    assert_eq!(
        as_set(&items),
        set_of(&[("pasta", "1100 g"), ("tomato", "500 g"), ("milk", "1 l")])
    );
}

#[test]
fn generate_writes_export_file() {
    let (dir, larder) = open();
    seed(&larder);
    let list = larder.shopping_list();
    list.add_recipe_by_title("pasta bolo", 1).unwrap();
    list.add_recipe_by_title("pasta", 1).unwrap();

    let out = dir.path().join("list.txt");
    fs::write(&out, "stale content that must disappear\n".repeat(10)).unwrap();
    let items = list.generate(Some(&out)).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, "pasta => 1100 g\ntomato => 500 g\nmilk => 1 l\n");
    assert_eq!(items.len(), 3);
}

#[test]
fn export_to_missing_directory_fails() {
    let (dir, larder) = open();
    seed(&larder);
    larder.shopping_list().add_recipe_by_title("pasta", 1).unwrap();

    let out = dir.path().join("no-such-dir").join("list.txt");
    let err = larder.shopping_list().generate(Some(&out)).unwrap_err();
    assert!(matches!(err, CoreError::Export { .. }));
}

#[test]
fn scaling_by_entry_quantity() {
    let (_dir, larder) = open();
    seed(&larder);
    let list = larder.shopping_list();
    list.add_recipe_by_title("pasta bolo", 2).unwrap();
    list.add_recipe_by_title("pasta bolo", 3).unwrap();

    let items = list.generate(None).unwrap();
    assert_eq!(
        as_set(&items),
        set_of(&[("pasta", "2500 g"), ("tomato", "2500 g")])
    );
}

#[test]
fn decimal_quantities_aggregate() {
    let (_dir, larder) = open();
    larder
        .recipes()
        .add_recipe("vinaigrette", &[Ingredient::new("oil", qty("0.5"), "dl")])
        .unwrap();
    larder
        .shopping_list()
        .add_recipe_by_title("vinaigrette", 3)
        .unwrap();

    let items = larder.shopping_list().generate(None).unwrap();
    assert_eq!(as_set(&items), set_of(&[("oil", "1.5 dl")]));
}

#[test]
fn regeneration_gives_same_set() {
    let (_dir, larder) = open();
    seed(&larder);
    let list = larder.shopping_list();
    list.add_recipe_by_title("pasta bolo", 1).unwrap();
    list.add_recipe_by_title("pasta", 1).unwrap();

    let first = list.generate(None).unwrap();
    let second = list.generate(None).unwrap();
    assert_eq!(as_set(&first), as_set(&second));
}

#[test]
fn deleted_recipe_makes_generation_fail() {
    let (_dir, larder) = open();
    seed(&larder);
    let list = larder.shopping_list();
    list.add_recipe_by_title("pasta", 1).unwrap();
    assert!(larder.recipes().delete_recipe_by_title("pasta").unwrap());

    let err = list.generate(None).unwrap_err();
    match err {
        CoreError::DanglingReference { recipe_id, .. } => {
            assert_eq!(recipe_id, RecipeId::from("2"));
        }
        other => panic!("expected DanglingReference, got {other:?}"),
    }
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("larder.json");
    {
        let larder = Larder::open(&path).unwrap();
        seed(&larder);
        larder.recipes().add_recipe("pasta", &[]).unwrap();
        larder.shopping_list().add_recipe_by_title("pasta", 2).unwrap();
    }

    let larder = Larder::open(&path).unwrap();
    assert_eq!(larder.location(), Some(path.as_path()));
    let titles: Vec<String> = larder
        .recipes()
        .summaries()
        .unwrap()
        .map(|s| s.unwrap().title)
        .collect();
    assert_eq!(titles, vec!["pasta bolo", "pasta", "pasta_01"]);

    let entries = larder.shopping_list().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, 2);

    // Keys keep growing across sessions.
    let added = larder.recipes().add_recipe("soup", &[]).unwrap();
    assert_eq!(added.id, RecipeId::from("4"));
}

#[test]
fn deleted_recipe_stays_dangling_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("larder.json");
    let stale = {
        let larder = Larder::open(&path).unwrap();
        larder.recipes().add_recipe("a", &[Ingredient::new("egg", 1, "pcs")]).unwrap();
        let b = larder
            .recipes()
            .add_recipe("b", &[Ingredient::new("flour", 200, "g")])
            .unwrap();
        assert!(larder.shopping_list().add_recipe_by_id(&b.id, 1).unwrap());
        assert!(larder.recipes().delete_recipe_by_id(&b.id).unwrap());
        b.id
    };
    {
        let larder = Larder::open(&path).unwrap();
        let caviar = larder
            .recipes()
            .add_recipe("caviar", &[Ingredient::new("caviar", 5, "kg")])
            .unwrap();
        assert_ne!(caviar.id, stale);
    }

    let larder = Larder::open(&path).unwrap();
    match larder.shopping_list().generate(None).unwrap_err() {
        CoreError::DanglingReference { recipe_id, .. } => assert_eq!(recipe_id, stale),
        other => panic!("expected DanglingReference, got {other:?}"),
    }
}

#[test]
fn decimal_sums_do_not_depend_on_entry_order() {
    let (_dir, larder) = open();
    for (title, amount) in [("one", "0.1"), ("two", "0.2"), ("three", "0.3")] {
        larder
            .recipes()
            .add_recipe(title, &[Ingredient::new("vinegar", qty(amount), "l")])
            .unwrap();
    }
    let list = larder.shopping_list();
    for title in ["one", "two", "three"] {
        list.add_recipe_by_title(title, 1).unwrap();
    }
    let forward = list.generate(None).unwrap();

    list.clear().unwrap();
    for title in ["three", "two", "one"] {
        list.add_recipe_by_title(title, 1).unwrap();
    }
    let backward = list.generate(None).unwrap();

    assert_eq!(as_set(&forward), set_of(&[("vinegar", "0.6 l")]));
    assert_eq!(as_set(&forward), as_set(&backward));
}

#[test]
fn non_finite_quantities_never_reach_the_store() {
    for raw in ["nan", "inf", "-inf"] {
        assert!(raw.parse::<Quantity>().is_err(), "{raw} parsed");
    }

    let (dir, larder) = open();
    larder
        .recipes()
        .add_recipe("soup", &[Ingredient::new("stock", qty("1e400"), "l")])
        .unwrap();
    drop(larder);

    let reopened = Larder::open(dir.path().join("larder.json")).unwrap();
    let soup = reopened.recipes().get_recipe_by_title("soup").unwrap().unwrap();
    assert_eq!(soup.ingredients[0].quantity, qty("1e400"));
}

#[test]
fn materialized_list_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("larder.json");
    let generated = {
        let larder = Larder::open(&path).unwrap();
        seed(&larder);
        larder.shopping_list().add_recipe_by_title("pasta", 1).unwrap();
        larder.shopping_list().generate(None).unwrap()
    };

    let larder = Larder::open(&path).unwrap();
    assert_eq!(larder.shopping_list().materialized().unwrap(), generated);
}

#[test]
fn entry_lifecycle() {
    let (_dir, larder) = open();
    seed(&larder);
    let list = larder.shopping_list();
    let pasta = larder.recipes().get_recipe_by_title("pasta").unwrap().unwrap();

    assert!(list.add_recipe_by_id(&pasta.id, 1).unwrap());
    assert!(list.update_entry_quantity(&RecipeRef::Id(pasta.id.clone()), 3).unwrap());
    assert_eq!(list.entries_by_title("pasta").unwrap()[0].quantity, 3);

    let items = list.generate(None).unwrap();
    assert_eq!(as_set(&items), set_of(&[("pasta", "1800 g"), ("milk", "3 l")]));

    list.clear().unwrap();
    assert!(list.entries().unwrap().is_empty());
    assert!(larder.recipes().get_recipe_by_id(&pasta.id).unwrap().is_some());
}

//! Structural references: named and self-referential kinds, several
//! targets per field, lists, and editing instances after mapping.

use flowerfield::{
    Field, FieldValue, Kind, Registry, SchemeError, Target, Validator, Value, ValueType, value,
};
use flowerfield_testhelpers::IPanic;
use insta::assert_snapshot;

#[test]
fn kind_can_reference_itself_by_name() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let tree = reg.declare_category("Tree")?;
    reg.declare_kind(
        tree,
        Kind::builder("Node")
            .field(Field::new("name", ValueType::String))
            .field(Field::list_of("children", "Node")),
    )?;

    let record = value!({
        "name": "root",
        "children": [
            { "name": "a", "children": [] },
            { "name": "b", "children": [{ "name": "b1" }] },
        ],
    });
    let root = reg.resolve_and_map(tree, &record)?;
    let children = root.get("children").and_then(FieldValue::as_list).unwrap();
    let b = children[1].as_instance().unwrap();
    let b1 = b.get("children").and_then(FieldValue::as_list).unwrap()[0]
        .as_instance()
        .unwrap();
    assert_eq!(b1.get("name").and_then(FieldValue::as_str), Some("b1"));
    assert_eq!(b1.get("children"), Some(&FieldValue::None));

    assert_eq!(root.to_record(false), record);
    Ok(())
}

#[test]
fn reference_to_undeclared_kind_fails_when_used() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let root = reg.declare_category("Root")?;
    reg.declare_kind(
        root,
        Kind::builder("Box").field(Field::nested("content", "Ghost").nullable()),
    )?;

    // never touched: nothing to resolve
    assert!(reg.resolve_and_map(root, &value!({ "content": null })).is_ok());

    let err = reg
        .resolve_and_map(root, &value!({ "content": { "x": 1 } }))
        .unwrap_err();
    assert!(err.is_configuration());
    assert_snapshot!(err.to_string(), @"field `content` of `Root::Box` references `Ghost`, which is not a declared kind");
    Ok(())
}

#[test]
fn best_target_wins_between_alternatives() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let media = reg.declare_category("Media")?;
    let image = reg.declare_kind(
        media,
        Kind::builder("Image")
            .field(Field::new("src", ValueType::String))
            .field(Field::optional("alt", ValueType::String)),
    )?;
    let video = reg.declare_kind(
        media,
        Kind::builder("Video")
            .field(Field::new("src", ValueType::String))
            .field(Field::optional("poster", ValueType::String))
            .field(Field::optional("loop", ValueType::Bool)),
    )?;
    let post = reg.declare_category("Post")?;
    reg.declare_kind(
        post,
        Kind::builder("Article").field(
            Field::list_of("attachments", Target::Kind(image)).or_nested(Target::Kind(video)),
        ),
    )?;

    let article = reg.resolve_and_map(
        post,
        &value!({
            "attachments": [
                { "src": "a.png", "alt": "a" },
                { "src": "b.mp4", "poster": "b.png", "loop": true },
                { "src": "c" },
            ],
        }),
    )?;
    let kinds: Vec<_> = article
        .get("attachments")
        .and_then(FieldValue::as_list)
        .unwrap()
        .iter()
        .map(|a| a.as_instance().unwrap().kind().id())
        .collect();
    // the last one ties, and Image is listed first
    assert_eq!(kinds, [image, video, image]);
    Ok(())
}

#[test]
fn category_target_resolves_polymorphically() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let shape = reg.declare_category("Shape")?;
    reg.declare_kind(
        shape,
        Kind::builder("Circle").field(Field::new("radius", ValueType::Float)),
    )?;
    reg.declare_kind(
        shape,
        Kind::builder("Square").field(Field::new("side", ValueType::Float)),
    )?;
    let scene = reg.declare_category("Scene")?;
    reg.declare_kind(
        scene,
        Kind::builder("Layer").field(Field::list_of("shapes", shape)),
    )?;

    let layer = reg.resolve_and_map(
        scene,
        &value!({ "shapes": [{ "side": 1 }, { "radius": 0.5 }] }),
    )?;
    let names: Vec<_> = layer
        .get("shapes")
        .and_then(FieldValue::as_list)
        .unwrap()
        .iter()
        .map(|s| s.as_instance().unwrap().kind_name().to_owned())
        .collect();
    assert_eq!(names, ["Square", "Circle"]);

    let err = reg
        .resolve_and_map(scene, &value!({ "shapes": [{ "edges": 3 }] }))
        .unwrap_err();
    assert!(matches!(err, SchemeError::NoMatchingScheme { ref scheme, .. } if scheme == "Shape"));
    Ok(())
}

#[test]
fn lists_of_scalars_and_nested_lists() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let root = reg.declare_category("Root")?;
    reg.declare_kind(
        root,
        Kind::builder("Grid")
            .field(Field::list("rows", [ValueType::Float, ValueType::Null]))
            .field(Field::list("names", ValueType::String)),
    )?;

    let grid = reg.resolve_and_map(
        root,
        &value!({ "rows": [[1, 2.5], [null, 3]], "names": [] }),
    )?;
    assert_eq!(
        grid.to_record(false),
        value!({ "rows": [[1, 2.5], [null, 3]], "names": [] })
    );
    // a null list binds none, like an absent one
    let empty = reg.resolve_and_map(root, &value!({ "rows": null }))?;
    assert_eq!(empty.get("rows"), Some(&FieldValue::None));

    let err = reg
        .resolve_and_map(root, &value!({ "names": ["a", true] }))
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"field `names` of `Root::Grid` expects array of string, found bool");

    let err = reg
        .resolve_and_map(root, &value!({ "names": "a" }))
        .unwrap_err();
    assert!(matches!(err, SchemeError::TypeMismatch { found: ValueType::String, .. }));
    Ok(())
}

#[test]
fn validator_sees_whole_list() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let root = reg.declare_category("Root")?;
    reg.declare_kind(
        root,
        Kind::builder("Bag").field(Field::list("items", ValueType::Integer).validator(
            |value: FieldValue| {
                if value.as_list().is_some_and(|items| items.len() <= 2) {
                    Ok(value)
                } else {
                    Err("at most two items".to_owned())
                }
            },
        )),
    )?;

    assert!(reg.resolve_and_map(root, &value!({ "items": [1, 2] })).is_ok());
    let err = reg
        .resolve_and_map(root, &value!({ "items": [1, 2, 3] }))
        .unwrap_err();
    assert!(matches!(err, SchemeError::ValidationFailed { ref message, .. } if message == "at most two items"));
    Ok(())
}

#[test]
fn set_runs_the_field_pipeline() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let root = reg.declare_category("Root")?;
    reg.declare_kind(
        root,
        Kind::builder("Flower")
            .field(Field::new("color", ValueType::String))
            .field(Field::optional("type", ValueType::String).alias("kind").validator(
                Validator::scalar(|v| match v.as_str() {
                    Some(s) => Ok(Value::from(s.to_uppercase())),
                    None => Err("expected text".to_owned()),
                }),
            )),
    )?;

    let mut rose = reg.resolve_and_map(root, &value!({ "color": "red" }))?;
    assert!(rose.contains_key("kind"));
    assert!(rose.contains_key("type"));
    assert_eq!(rose.len(), 2);

    rose.set(&reg, "kind", &value!("rose"))?;
    assert_eq!(rose.get("type").and_then(FieldValue::as_str), Some("ROSE"));

    let err = rose.set(&reg, "color", &value!(5)).unwrap_err();
    assert!(matches!(err, SchemeError::TypeMismatch { .. }));
    assert_eq!(rose.get("color").and_then(FieldValue::as_str), Some("red"));

    let err = rose.set(&reg, "petals", &value!(5)).unwrap_err();
    assert_snapshot!(err.to_string(), @"`Root::Flower` has no field `petals`");

    rose.unset("type")?;
    assert_eq!(rose.to_record(true), value!({ "color": "red", "kind": null }));

    let pairs: Vec<_> = rose.iter().map(|(k, v)| (k.to_owned(), v.is_none())).collect();
    assert_eq!(pairs, [("color".to_owned(), false), ("kind".to_owned(), true)]);
    Ok(())
}

#[test]
fn set_maps_nested_records_through_the_declaring_registry() -> Result<(), IPanic> {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let root = reg.declare_category("Root")?;
    reg.declare_kind(
        root,
        Kind::builder("Vase").field(Field::nested("flower", "Flower").nullable()),
    )?;
    let flower = reg.declare_kind(
        root,
        Kind::builder("Flower").field(Field::new("color", ValueType::String)),
    )?;

    let mut vase = reg.resolve_and_map(root, &value!({ "flower": null }))?;
    vase.set(&reg, "flower", &value!({ "color": "blue" }))?;
    let inner = vase.get("flower").and_then(FieldValue::as_instance).unwrap();
    assert_eq!(inner.kind().id(), flower);
    assert_eq!(vase.to_record(false), value!({ "flower": { "color": "blue" } }));
    Ok(())
}

#[test]
fn duplicate_keys_within_a_kind_are_rejected() {
    flowerfield_testhelpers::setup();
    let mut reg = Registry::new();
    let root = reg.declare_category("Root").unwrap();
    let err = reg
        .declare_kind(
            root,
            Kind::builder("Clash")
                .field(Field::new("a", ValueType::Bool))
                .field(Field::new("a", ValueType::String)),
        )
        .unwrap_err();
    assert!(err.is_configuration());
    assert_snapshot!(err.to_string(), @"kind `Clash` declares the key `a` more than once");
}

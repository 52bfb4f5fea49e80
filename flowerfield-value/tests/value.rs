use flowerfield_value::{VNumber, VObject, Value, ValueType, value};

#[test]
fn records_keep_insertion_order() {
    flowerfield_testhelpers::setup();
    let mut obj = VObject::new();
    obj.insert("watered", true);
    obj.insert("color", "red");
    obj.insert("petals", 5);
    assert_eq!(obj.keys().map(String::as_str).collect::<Vec<_>>(), ["watered", "color", "petals"]);

    obj.remove("color");
    obj.insert("color", "white");
    assert_eq!(Value::Object(obj).to_string(), r#"{"watered":true,"petals":5,"color":"white"}"#);
}

#[test]
fn integers_and_floats_are_distinct_types() {
    flowerfield_testhelpers::setup();
    assert_eq!(Value::from(3).value_type(), ValueType::Integer);
    assert_eq!(Value::from(3.0).value_type(), ValueType::Float);
    assert_eq!(Value::from(u64::MAX).value_type(), ValueType::Integer);
    assert_eq!(Value::from(f64::NAN), Value::Null);
    assert_eq!(VNumber::from_u64(7), VNumber::from_i64(7));
}

#[test]
fn options_and_iterators_convert() {
    flowerfield_testhelpers::setup();
    let tags: Value = ["red", "white"].into_iter().collect();
    assert_eq!(tags, value!(["red", "white"]));
    assert_eq!(Value::from(None::<&str>), Value::Null);
    assert_eq!(Value::from(Some("x")), "x");

    let obj: VObject = [("a", 1), ("b", 2)].into_iter().collect();
    assert_eq!(Value::from(obj), value!({ "a": 1, "b": 2 }));
}

#[cfg(feature = "json")]
#[test]
fn json_text_round_trip_keeps_types() {
    flowerfield_testhelpers::setup();
    let text = r#"{"size":2.0,"count":2,"tags":["a",null],"pot":{"watered":false}}"#;
    let v = flowerfield_value::from_str(text).unwrap();
    assert_eq!(v.get("size").map(Value::value_type), Some(ValueType::Float));
    assert_eq!(v.get("count").map(Value::value_type), Some(ValueType::Integer));
    assert_eq!(flowerfield_value::to_string(&v).unwrap(), text);
    assert!(flowerfield_value::to_string_pretty(&v).unwrap().contains('\n'));
}

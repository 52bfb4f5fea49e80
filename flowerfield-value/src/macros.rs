/// Builds a [`Value`](crate::Value) from JSON-looking syntax.
///
/// Object keys must be string literals. Any other leaf is an expression
/// converted with `Value::from`.
///
/// ```
/// use flowerfield_value::value;
///
/// let name = "Rose";
/// let v = value!({
///     "type": name,
///     "petals": 5,
///     "colors": ["red", "white"],
///     "pot": null,
/// });
/// assert_eq!(v.get("type").and_then(|t| t.as_str()), Some("Rose"));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };
    ([ $($tt:tt)+ ]) => {{
        let mut items = ::std::vec::Vec::new();
        $crate::__value_array!(items $($tt)+);
        $crate::Value::Array(items)
    }};
    ({}) => {
        $crate::Value::Object($crate::VObject::new())
    };
    ({ $($tt:tt)+ }) => {{
        let mut obj = $crate::VObject::new();
        $crate::__value_object!(obj $($tt)+);
        $crate::Value::Object(obj)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! __value_array {
    ($items:ident) => {};
    ($items:ident null $(, $($rest:tt)*)?) => {
        $items.push($crate::Value::Null);
        $crate::__value_array!($items $($($rest)*)?);
    };
    ($items:ident [ $($inner:tt)* ] $(, $($rest:tt)*)?) => {
        $items.push($crate::value!([ $($inner)* ]));
        $crate::__value_array!($items $($($rest)*)?);
    };
    ($items:ident { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $items.push($crate::value!({ $($inner)* }));
        $crate::__value_array!($items $($($rest)*)?);
    };
    ($items:ident $next:expr $(, $($rest:tt)*)?) => {
        $items.push($crate::value!($next));
        $crate::__value_array!($items $($($rest)*)?);
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! __value_object {
    ($obj:ident) => {};
    ($obj:ident $key:literal : null $(, $($rest:tt)*)?) => {
        $obj.insert($key, $crate::Value::Null);
        $crate::__value_object!($obj $($($rest)*)?);
    };
    ($obj:ident $key:literal : [ $($inner:tt)* ] $(, $($rest:tt)*)?) => {
        $obj.insert($key, $crate::value!([ $($inner)* ]));
        $crate::__value_object!($obj $($($rest)*)?);
    };
    ($obj:ident $key:literal : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $obj.insert($key, $crate::value!({ $($inner)* }));
        $crate::__value_object!($obj $($($rest)*)?);
    };
    ($obj:ident $key:literal : $val:expr $(, $($rest:tt)*)?) => {
        $obj.insert($key, $crate::value!($val));
        $crate::__value_object!($obj $($($rest)*)?);
    };
}

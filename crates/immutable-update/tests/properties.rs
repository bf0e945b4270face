//! Property tests: updates never modify their inputs, untouched siblings are
//! shared, and updates that change nothing return the target itself.

use immutable_update::{update, Value};
use proptest::prelude::*;
use serde_json::{json, Map, Value as Json};

fn leaf() -> impl Strategy<Value = Json> {
    prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Json::String),
    ]
}

fn document() -> impl Strategy<Value = Json> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
            prop::collection::btree_map("[a-e]", inner, 0..4)
                .prop_map(|m| Json::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn object() -> impl Strategy<Value = Map<String, Json>> {
    prop::collection::btree_map("[a-e]", document(), 1..5)
        .prop_map(|m| m.into_iter().collect::<Map<_, _>>())
}

proptest! {
    #[test]
    fn set_leaves_inputs_and_siblings_alone(obj in object(), pick in any::<prop::sample::Index>(), new in document()) {
        let keys: Vec<String> = obj.keys().cloned().collect();
        let key = keys[pick.index(keys.len())].clone();
        let target_json = Json::Object(obj);
        let spec_json = json!({ key.clone(): {"$set": new.clone()} });

        let target = Value::from(target_json.clone());
        let spec = Value::from(spec_json.clone());
        let result = update(&target, &spec).unwrap();

        prop_assert_eq!(target.to_json(), target_json);
        prop_assert_eq!(spec.to_json(), spec_json);
        prop_assert_eq!(result.get(key.as_str()).map(Value::to_json), Some(new));
        for other in keys.iter().filter(|k| **k != key) {
            prop_assert!(result.get(other.as_str()).unwrap().same(target.get(other.as_str()).unwrap()));
        }
    }

    #[test]
    fn setting_the_current_value_returns_the_target(obj in object(), pick in any::<prop::sample::Index>()) {
        let keys: Vec<String> = obj.keys().cloned().collect();
        let key = keys[pick.index(keys.len())].clone();
        let target = Value::from(Json::Object(obj));
        let current = target.get(key.as_str()).cloned().unwrap();
        let spec = Value::object([(key.as_str(), Value::object([("$set", current)]))]);
        prop_assert!(update(&target, &spec).unwrap().same(&target));
    }

    #[test]
    fn push_appends_without_touching_target(items in prop::collection::vec(leaf(), 0..6), extra in prop::collection::vec(leaf(), 0..6)) {
        let target_json = Json::Array(items.clone());
        let target = Value::from(target_json.clone());
        let spec = Value::from(json!({"$push": extra.clone()}));
        let result = update(&target, &spec).unwrap();

        let mut expected = items;
        expected.extend(extra);
        prop_assert_eq!(result.to_json(), Json::Array(expected));
        prop_assert_eq!(target.to_json(), target_json);
    }

    #[test]
    fn set_is_total(target in document(), replacement in document()) {
        let spec = Value::from(json!({"$set": replacement.clone()}));
        let result = update(&Value::from(target), &spec).unwrap();
        prop_assert_eq!(result.to_json(), replacement);
    }

    #[test]
    fn unset_of_absent_keys_returns_the_target(obj in object()) {
        let target = Value::from(Json::Object(obj));
        let spec = Value::from(json!({"$unset": ["zz", "not-a-key"]}));
        prop_assert!(update(&target, &spec).unwrap().same(&target));
    }
}

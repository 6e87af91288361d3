#![allow(missing_docs)]

use std::sync::Arc;
use std::thread;

use sigbridge::codec::{ArrayData, BusValue, NamedShape, ResourceArray, ResourceKind, ResourceValue, TranslateOptions, to_bus_value, to_resource_value};
use sigbridge_testkit::{lamp_registry, object, sig};

fn lamp_state() -> ResourceValue {
	let color = ResourceArray::flat(ArrayData::Double(vec![0.25, 0.5, 1.0])).expect("color builds");
	ResourceValue::Object(object([
		("on", ResourceValue::Bool(true)),
		("level", ResourceValue::Int(42)),
		("color", ResourceValue::Array(color)),
		("origin", ResourceValue::Object(object([("x", ResourceValue::Int(3)), ("y", ResourceValue::Int(-4))]))),
		("serial", ResourceValue::Int(9_007_199_254_740_991)),
		("note", ResourceValue::from("kitchen")),
	]))
}

#[test]
fn registry_fixture_loads_both_flavors() {
	let registry = lamp_registry();
	assert_eq!(registry.len(), 3);
	assert!(matches!(registry.resolve("Point"), Some(NamedShape::Struct(_))));

	let Some(NamedShape::Dict(shape)) = registry.resolve("LampState") else {
		panic!("expected LampState dict");
	};
	assert_eq!(shape.get("color").map(|field| field.kind), Some(ResourceKind::Array));
	assert_eq!(shape.get("origin").map(|field| field.kind), Some(ResourceKind::Object));
	assert_eq!(
		registry.native_signature(&sig("a[Segment]")).expect("segment resolves").to_string(),
		"a((ii)(ii)s)"
	);
}

#[test]
fn lamp_state_round_trips_through_named_dict() {
	let registry = lamp_registry();
	let opt = TranslateOptions::default();
	let token = sig("[LampState]");

	let bus = to_bus_value(&registry, &lamp_state(), &token, None, &opt).expect("lamp state to bus");
	assert_eq!(bus.signature().to_string(), "a{sv}");
	let BusValue::Array { items, .. } = &bus else {
		panic!("expected dict array");
	};
	let level = items.iter().find_map(|item| match item {
		BusValue::DictEntry(key, value) if **key == BusValue::String("level".into()) => Some(value.innermost().clone()),
		_ => None,
	});
	assert_eq!(level, Some(BusValue::Uint16(42)));

	let back = to_resource_value(&registry, &bus, &token, &opt).expect("lamp state to resource");
	assert_eq!(back, lamp_state());
}

#[test]
fn segment_arrays_use_field_names() {
	let registry = lamp_registry();
	let opt = TranslateOptions::default();
	let point = |x: i64, y: i64| ResourceValue::Object(object([("x", ResourceValue::Int(x)), ("y", ResourceValue::Int(y))]));
	let segment = ResourceValue::Object(object([("from", point(0, 0)), ("to", point(2, 5)), ("label", ResourceValue::from("edge"))]));
	let segments = ResourceValue::Array(ResourceArray::from_rows(vec![segment.clone(), segment]).expect("segments build"));

	let token = sig("a[Segment]");
	let bus = to_bus_value(&registry, &segments, &token, None, &opt).expect("segments to bus");
	assert_eq!(bus.signature().to_string(), "a((ii)(ii)s)");
	assert_eq!(bus.array_len(), Some(2));

	let back = to_resource_value(&registry, &bus, &token, &opt).expect("segments to resource");
	assert_eq!(back, segments);
}

#[test]
fn frozen_registry_serves_concurrent_readers() {
	let registry = Arc::new(lamp_registry());
	let handles: Vec<_> = (0..4)
		.map(|_| {
			let registry = Arc::clone(&registry);
			thread::spawn(move || {
				let bus = to_bus_value(&registry, &lamp_state(), &sig("[LampState]"), None, &TranslateOptions::default()).expect("to bus");
				to_resource_value(&registry, &bus, &sig("[LampState]"), &TranslateOptions::default()).expect("to resource")
			})
		})
		.collect();

	for handle in handles {
		assert_eq!(handle.join().expect("reader thread finishes"), lamp_state());
	}
}

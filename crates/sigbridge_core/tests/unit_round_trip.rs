#![allow(missing_docs)]

use sigbridge::codec::{BusValue, ResourceValue, TranslateOptions, TypeRegistry, TypeToken, to_bus_value, to_resource_value};
use sigbridge_testkit::{positional, sig};

fn round_trip(registry: &TypeRegistry, value: &ResourceValue, token: &TypeToken) -> ResourceValue {
	let opt = TranslateOptions::default();
	let bus = to_bus_value(registry, value, token, None, &opt).unwrap_or_else(|err| panic!("{token} to bus: {err}"));
	to_resource_value(registry, &bus, token, &opt).unwrap_or_else(|err| panic!("{token} to resource: {err}"))
}

#[test]
fn integer_scalars_round_trip_at_min_mid_max() {
	let registry = TypeRegistry::new();
	let cases: [(&str, [i64; 3]); 7] = [
		("y", [0, 127, 255]),
		("n", [i64::from(i16::MIN), 0, i64::from(i16::MAX)]),
		("q", [0, 32768, i64::from(u16::MAX)]),
		("i", [i64::from(i32::MIN), -1, i64::from(i32::MAX)]),
		("u", [0, 1 << 31, i64::from(u32::MAX)]),
		("x", [i64::MIN, 0, i64::MAX]),
		("t", [0, 1 << 40, i64::MAX]),
	];

	for (code, values) in cases {
		let token = sig(code);
		for value in values {
			let value = ResourceValue::Int(value);
			assert_eq!(round_trip(&registry, &value, &token), value, "round trip through {code}");
		}
	}
}

#[test]
fn other_scalars_round_trip() {
	let registry = TypeRegistry::new();
	let cases = [
		("b", vec![ResourceValue::Bool(false), ResourceValue::Bool(true)]),
		("d", vec![ResourceValue::Double(f64::MIN), ResourceValue::Double(-0.25), ResourceValue::Double(f64::MAX)]),
		("s", vec![ResourceValue::from(""), ResourceValue::from("lamp"), ResourceValue::from("x".repeat(4096))]),
		("o", vec![ResourceValue::from("/"), ResourceValue::from("/org/example/Lamp_1")]),
		("g", vec![ResourceValue::from(""), ResourceValue::from("a{sv}"), ResourceValue::from("(ia{s(bd)}av)")]),
	];

	for (code, values) in cases {
		let token = sig(code);
		for value in values {
			assert_eq!(round_trip(&registry, &value, &token), value, "round trip through {code}");
		}
	}
}

#[test]
fn struct_round_trips_positionally() {
	let registry = TypeRegistry::new();
	let object = positional([ResourceValue::Bool(true), ResourceValue::Int(1), ResourceValue::from("string")]);
	let token = sig("(bis)");

	let bus = to_bus_value(&registry, &ResourceValue::Object(object.clone()), &token, None, &TranslateOptions::default()).expect("to bus");
	assert_eq!(bus, BusValue::Struct(vec![BusValue::Boolean(true), BusValue::Int32(1), BusValue::String("string".into())]));

	let back = to_resource_value(&registry, &bus, &token, &TranslateOptions::default()).expect("to resource");
	assert_eq!(back, ResourceValue::Object(object));
}

#[test]
fn byte_arrays_stay_byte_strings() {
	let registry = TypeRegistry::new();
	let value = to_resource_value(&registry, &BusValue::Bytes(vec![7, 8, 9]), &sig("ay"), &TranslateOptions::default()).expect("bytes");
	let ResourceValue::ByteString(bytes) = &value else {
		panic!("expected byte string, got {value:?}");
	};
	assert_eq!(bytes.len(), 3);
	assert_eq!(round_trip(&registry, &value, &sig("ay")), value);
}

#[test]
fn empty_arrays_use_the_null_sentinel() {
	let registry = TypeRegistry::new();
	let opt = TranslateOptions::default();
	for code in ["ai", "as", "aai", "a(is)", "av"] {
		let token = sig(code);
		let TypeToken::Array(elem) = &token else {
			panic!("array signature expected");
		};
		let empty = BusValue::Array {
			element: elem.as_ref().clone(),
			items: Vec::new(),
		};

		let value = to_resource_value(&registry, &empty, &token, &opt).expect("empty array translates");
		assert_eq!(value, ResourceValue::Null, "empty {code}");

		let back = to_bus_value(&registry, &value, &token, None, &opt).expect("null translates back");
		assert_eq!(back, empty, "null back to {code}");
	}
}

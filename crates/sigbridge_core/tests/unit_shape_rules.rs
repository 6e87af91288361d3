#![allow(missing_docs)]

use sigbridge::codec::{
	ArrayData, BusValue, ErrorKind, ResourceArray, ResourceValue, TranslateOptions, TypeRegistry, TypeToken, infer_variant_array_signature,
	to_bus_value, to_resource_value,
};
use sigbridge_testkit::{object, sig};

#[test]
fn byte_targets_reject_out_of_range_ints() {
	let registry = TypeRegistry::new();
	let opt = TranslateOptions::default();

	let err = to_bus_value(&registry, &ResourceValue::Int(256), &TypeToken::Byte, None, &opt).expect_err("256 is out of range");
	assert_eq!(err.kind(), ErrorKind::RangeViolation);

	let value = to_bus_value(&registry, &ResourceValue::Int(255), &TypeToken::Byte, None, &opt).expect("255 fits");
	assert_eq!(value, BusValue::Byte(255));
}

#[test]
fn ragged_rows_are_rejected() {
	assert!(ResourceArray::new(&[2, 2], ArrayData::Int(vec![1, 2, 3])).is_err());

	let full = ResourceValue::Array(ResourceArray::flat(ArrayData::Int(vec![1, 2])).expect("row builds"));
	let short = ResourceValue::Array(ResourceArray::flat(ArrayData::Int(vec![3])).expect("row builds"));
	let err = ResourceArray::from_rows(vec![full, short]).expect_err("ragged rows fail");
	assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

	let row = |items: Vec<i32>| BusValue::array(TypeToken::Int32, items.into_iter().map(BusValue::Int32).collect()).expect("row");
	let ragged = BusValue::array(sig("ai"), vec![row(vec![1, 2]), row(vec![3])]).expect("outer array");
	let err = to_resource_value(&TypeRegistry::new(), &ragged, &sig("aai"), &TranslateOptions::default()).expect_err("ragged bus array fails");
	assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn variant_arrays_infer_homogeneity() {
	let same = vec![
		BusValue::variant(BusValue::Int32(1)),
		BusValue::variant(BusValue::Int32(2)),
		BusValue::variant(BusValue::Int32(3)),
	];
	assert_eq!(infer_variant_array_signature(&same), Some(sig("ai")));

	let mixed = vec![BusValue::variant(BusValue::Int32(1)), BusValue::variant(BusValue::String("x".into()))];
	assert_eq!(infer_variant_array_signature(&mixed), Some(sig("(is)")));
}

#[test]
fn named_struct_follows_registered_order() {
	let mut registry = TypeRegistry::new();
	registry
		.register_struct("Struct", [("int", TypeToken::Int32), ("string", TypeToken::String)])
		.expect("struct registers");

	let value = ResourceValue::Object(object([("string", ResourceValue::from("string")), ("int", ResourceValue::Int(1))]));
	let bus = to_bus_value(&registry, &value, &sig("[Struct]"), None, &TranslateOptions::default()).expect("named struct");
	assert_eq!(bus, BusValue::Struct(vec![BusValue::Int32(1), BusValue::String("string".into())]));
}

#[test]
fn unregistered_names_fail() {
	let err = to_bus_value(&TypeRegistry::new(), &ResourceValue::Int(1), &sig("[Nope]"), None, &TranslateOptions::default())
		.expect_err("unknown name fails");
	assert_eq!(err.kind(), ErrorKind::UnresolvedName);
}

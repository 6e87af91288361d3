use crate::codec::{BusValue, ErrorKind, TypeToken};

#[test]
fn byte_arrays_collapse_to_bytes() {
	let value = BusValue::array(TypeToken::Byte, vec![BusValue::Byte(1), BusValue::Byte(2)]).expect("byte array builds");
	assert_eq!(value, BusValue::Bytes(vec![1, 2]));
	assert_eq!(value.signature().to_string(), "ay");
}

#[test]
fn array_rejects_mismatched_elements() {
	let err = BusValue::array(TypeToken::Int32, vec![BusValue::Int32(1), BusValue::String("x".into())]).expect_err("mixed array fails");
	assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn signature_covers_containers() {
	let dict = BusValue::dict(
		TypeToken::String,
		TypeToken::Variant,
		vec![(BusValue::String("a".into()), BusValue::variant(BusValue::Int32(1)))],
	)
	.expect("dict builds");
	assert_eq!(dict.signature().to_string(), "a{sv}");

	let item = BusValue::Struct(vec![BusValue::Boolean(true), dict, BusValue::variant(BusValue::Double(1.5))]);
	assert_eq!(item.signature().to_string(), "(ba{sv}v)");
}

#[test]
fn innermost_unwraps_every_variant_level() {
	let value = BusValue::variant(BusValue::variant(BusValue::variant(BusValue::Uint16(7))));
	assert_eq!(value.innermost(), &BusValue::Uint16(7));
	assert_eq!(value.signature(), TypeToken::Variant);
}

#[test]
fn empty_array_keeps_its_element_type() {
	let value = BusValue::array(TypeToken::String, Vec::new()).expect("empty array builds");
	assert_eq!(value.signature().to_string(), "as");
	assert_eq!(value.array_len(), Some(0));
}

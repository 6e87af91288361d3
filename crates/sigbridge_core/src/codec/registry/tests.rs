use crate::codec::{CodecError, ErrorKind, NamedShape, ResourceKind, TypeRegistry, TypeToken};

#[test]
fn struct_registration_keeps_field_order() {
	let mut registry = TypeRegistry::new();
	registry
		.register_struct("Struct", [("int", TypeToken::Int32), ("string", TypeToken::String)])
		.expect("struct registers");

	let shape = registry.lookup_struct("Struct").expect("struct is registered");
	let names: Vec<&str> = shape.fields.iter().map(|field| field.name.as_ref()).collect();
	assert_eq!(names, ["int", "string"]);
	assert_eq!(shape.struct_token().to_string(), "(is)");
	assert!(registry.lookup_dict("Struct").is_none());
}

#[test]
fn dict_registration_infers_resource_kinds() {
	let mut registry = TypeRegistry::new();
	registry
		.register_dict(
			"Settings",
			[
				("level", TypeToken::Uint16),
				("label", TypeToken::ObjectPath),
				("blob", TypeToken::array_of(TypeToken::Byte)),
			],
		)
		.expect("dict registers");

	let shape = registry.lookup_dict("Settings").expect("dict is registered");
	assert_eq!(shape.get("level").map(|field| field.kind), Some(ResourceKind::Int));
	assert_eq!(shape.get("label").map(|field| field.kind), Some(ResourceKind::String));
	assert_eq!(shape.get("blob").map(|field| field.kind), Some(ResourceKind::ByteString));
	assert!(shape.get("missing").is_none());
}

#[test]
fn re_registration_overwrites() {
	let mut registry = TypeRegistry::new();
	registry.register_struct("Thing", [("a", TypeToken::Int32)]).expect("struct registers");
	registry.register_dict("Thing", [("b", TypeToken::String)]).expect("dict overwrites");

	assert!(matches!(registry.resolve("Thing"), Some(NamedShape::Dict(_))));
	assert_eq!(registry.len(), 1);
}

#[test]
fn duplicate_fields_are_rejected() {
	let mut registry = TypeRegistry::new();
	let err = registry
		.register_struct("Pair", [("a", TypeToken::Int32), ("a", TypeToken::Int32)])
		.expect_err("duplicate field fails");
	assert!(matches!(err, CodecError::DuplicateField { .. }));
}

#[test]
fn native_signature_expands_nested_names() {
	let mut registry = TypeRegistry::new();
	registry.register_struct("Point", [("x", TypeToken::Double), ("y", TypeToken::Double)]).expect("point registers");
	registry
		.register_struct("Line", [("from", TypeToken::Named("Point".into())), ("to", TypeToken::Named("Point".into()))])
		.expect("line registers");
	registry.register_dict("Meta", [("name", TypeToken::String)]).expect("meta registers");

	let token = TypeToken::parse_one("a([Line][Meta])").expect("signature parses");
	let native = registry.native_signature(&token).expect("names resolve");
	assert_eq!(native.to_string(), "a(((dd)(dd))a{sv})");
}

#[test]
fn native_signature_fails_on_unknown_names_and_cycles() {
	let mut registry = TypeRegistry::new();
	let err = registry.native_signature(&TypeToken::Named("Nope".into())).expect_err("unknown name fails");
	assert_eq!(err.kind(), ErrorKind::UnresolvedName);

	registry.register_struct("Loop", [("next", TypeToken::Named("Loop".into()))]).expect("loop registers");
	let err = registry.native_signature(&TypeToken::Named("Loop".into())).expect_err("cycle fails");
	assert!(matches!(err, CodecError::DepthExceeded { .. }));
}

#[test]
fn loads_registry_from_json() {
	let registry = TypeRegistry::from_json(
		r#"{
			"structs": {"Struct": [["int", "i"], ["string", "s"]]},
			"dicts": {"Dict": {"count": "u", "name": "s"}}
		}"#,
	)
	.expect("document loads");

	assert_eq!(registry.len(), 2);
	assert_eq!(registry.lookup_struct("Struct").map(|shape| shape.fields.len()), Some(2));
	assert_eq!(registry.lookup_dict("Dict").and_then(|shape| shape.get("count")).map(|field| field.signature.clone()), Some(TypeToken::Uint32));
}

#[test]
fn json_with_bad_signature_is_rejected() {
	let err = TypeRegistry::from_json(r#"{"structs": {"Bad": [["a", "(i"]]}}"#).expect_err("bad signature fails");
	assert_eq!(err.kind(), ErrorKind::Registry);
}

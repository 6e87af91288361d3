use serde::Serialize;
use sigbridge::codec::{Signature, TypeRegistry, TypeToken, count_complete_types, resource_kind};

use crate::cmd::Result;

#[derive(Serialize)]
struct TokenNode {
	signature: String,
	code: char,
	resource_kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	native: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	children: Vec<TokenNode>,
}

#[derive(Serialize)]
struct ParseReport {
	signature: String,
	complete_types: usize,
	tokens: Vec<TokenNode>,
}

/// Parse `signature` and print its token tree.
pub fn run(registry: &TypeRegistry, signature: &str, json: bool) -> Result<()> {
	let parsed = Signature::parse(signature)?;
	let report = ParseReport {
		signature: parsed.to_string(),
		complete_types: count_complete_types(signature),
		tokens: parsed.tokens().iter().map(|token| token_node(registry, token)).collect(),
	};

	if json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	println!("signature: {}", report.signature);
	println!("complete_types: {}", report.complete_types);
	for node in &report.tokens {
		print_node(node, 0);
	}
	Ok(())
}

fn token_node(registry: &TypeRegistry, token: &TypeToken) -> TokenNode {
	let children = match token {
		TypeToken::Array(elem) => vec![token_node(registry, elem)],
		TypeToken::Struct(members) => members.iter().map(|member| token_node(registry, member)).collect(),
		TypeToken::DictEntry(key, value) => vec![token_node(registry, key), token_node(registry, value)],
		_ => Vec::new(),
	};
	let native = registry
		.native_signature(token)
		.ok()
		.map(|native| native.to_string())
		.filter(|native| *native != token.to_string());

	TokenNode {
		signature: token.to_string(),
		code: token.code(),
		resource_kind: resource_kind(token).as_str(),
		native,
		children,
	}
}

fn print_node(node: &TokenNode, indent: usize) {
	let pad = " ".repeat(indent);
	match &node.native {
		Some(native) => println!("{pad}{} -> {native} ({})", node.signature, node.resource_kind),
		None => println!("{pad}{} ({})", node.signature, node.resource_kind),
	}
	for child in &node.children {
		print_node(child, indent + 2);
	}
}

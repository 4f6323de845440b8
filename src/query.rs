//! Cypher statement construction for both insert paths.

use crate::source::Record;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Name of the list parameter carrying a batch of rows.
pub const BATCH_PARAM: &str = "batch";

pub type QueryParams = HashMap<String, Value>;

fn bare_identifier() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

/// Backtick-quote a label or property key unless it is a bare identifier.
///
/// Keys with spaces (`first name`) always end up quoted.
pub fn quote_identifier(name: &str) -> String {
    if bare_identifier().is_match(name) {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// Embed a value as a single-quoted string literal, escaping `'` as `\'`.
fn string_literal(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!("'{}'", text.replace('\'', "\\'"))
}

/// `CREATE (n:Label {key: 'value', ...})` with every value inlined as a string.
///
/// Null values are left out. Only `'` is escaped, so this must not be fed
/// untrusted input; the bulk statement binds its data as a parameter instead.
pub fn single_node_statement(label: &str, properties: &Record) -> String {
    let props: Vec<String> = properties
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| format!("{}: {}", quote_identifier(key), string_literal(value)))
        .collect();

    if props.is_empty() {
        format!("CREATE (n:{})", quote_identifier(label))
    } else {
        format!("CREATE (n:{} {{{}}})", quote_identifier(label), props.join(", "))
    }
}

/// One node per element of `$batch`, with every element key copied onto it.
pub fn bulk_create_statement(label: &str) -> String {
    format!(
        "UNWIND ${} AS row CREATE (n:{}) SET n += row",
        BATCH_PARAM,
        quote_identifier(label)
    )
}

pub fn batch_params(rows: &[Record]) -> QueryParams {
    let batch = rows.iter().cloned().map(Value::Object).collect();
    let mut params = HashMap::new();
    params.insert(BATCH_PARAM.to_string(), Value::Array(batch));
    params
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Keys every extraction must carry, in schema order.
pub const TOP_LEVEL_KEYS: [&str; 12] = [
    "invoice_number",
    "member_number",
    "invoice_date",
    "service_provider",
    "authorization_status",
    "registration_no",
    "patient",
    "diagnoses",
    "medications",
    "procedures",
    "admission",
    "total_amount",
];

/// Typed view of a fully conforming claim extraction.
///
/// `Option` fields serialize as `null`, so a record never drops a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub invoice_number: Option<String>,
    pub member_number: Option<String>,
    pub invoice_date: Option<String>,
    pub service_provider: Option<String>,
    pub authorization_status: Option<String>,
    pub registration_no: Option<String>,
    pub patient: Patient,
    pub diagnoses: Vec<String>,
    pub medications: Vec<Medication>,
    pub procedures: Vec<String>,
    pub admission: Admission,
    pub total_amount: TotalAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub name: Option<String>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub was_admitted: bool,
    pub admission_date: Option<String>,
    pub discharge_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalAmount {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

impl ClaimRecord {
    /// Returns the typed record when `value` matches the schema exactly.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !check_conformance(value).is_empty() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// One way in which model output departs from the claim schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    NotAnObject,
    MissingKey(String),
    WrongType { path: String, expected: &'static str },
    InvalidDate(String),
    InvalidCurrency(String),
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaViolation::NotAnObject => write!(f, "root is not a JSON object"),
            SchemaViolation::MissingKey(path) => write!(f, "missing key `{}`", path),
            SchemaViolation::WrongType { path, expected } => {
                write!(f, "`{}` should be {}", path, expected)
            }
            SchemaViolation::InvalidDate(path) => write!(f, "`{}` is not a YYYY-MM-DD date", path),
            SchemaViolation::InvalidCurrency(path) => {
                write!(f, "`{}` is not a three-letter ISO 4217 code", path)
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Kind {
    NullableString,
    NullableDate,
    NullableInteger,
    NullableNumber,
    NullableCurrency,
    Boolean,
    StringList,
}

impl Kind {
    fn expected(self) -> &'static str {
        match self {
            Kind::NullableString | Kind::NullableDate | Kind::NullableCurrency => "a string or null",
            Kind::NullableInteger => "an integer or null",
            Kind::NullableNumber => "a number or null",
            Kind::Boolean => "a boolean",
            Kind::StringList => "an array of strings",
        }
    }
}

/// Lists every schema deviation found in `value`. An empty result means the
/// value deserializes cleanly into a [`ClaimRecord`].
pub fn check_conformance(value: &Value) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();
    let Some(root) = value.as_object() else {
        violations.push(SchemaViolation::NotAnObject);
        return violations;
    };

    for key in TOP_LEVEL_KEYS {
        if !root.contains_key(key) {
            violations.push(SchemaViolation::MissingKey(key.to_string()));
        }
    }

    for key in [
        "invoice_number",
        "member_number",
        "service_provider",
        "authorization_status",
        "registration_no",
    ] {
        check_field(root, key, key, Kind::NullableString, &mut violations);
    }
    check_field(root, "invoice_date", "invoice_date", Kind::NullableDate, &mut violations);
    check_field(root, "diagnoses", "diagnoses", Kind::StringList, &mut violations);
    check_field(root, "procedures", "procedures", Kind::StringList, &mut violations);

    if let Some(patient) = nested_object(root, "patient", &mut violations) {
        check_required(patient, "patient", "name", Kind::NullableString, &mut violations);
        check_required(patient, "patient", "age", Kind::NullableInteger, &mut violations);
    }

    if let Some(admission) = nested_object(root, "admission", &mut violations) {
        check_required(admission, "admission", "was_admitted", Kind::Boolean, &mut violations);
        check_required(admission, "admission", "admission_date", Kind::NullableDate, &mut violations);
        check_required(admission, "admission", "discharge_date", Kind::NullableDate, &mut violations);
    }

    if let Some(total) = nested_object(root, "total_amount", &mut violations) {
        check_required(total, "total_amount", "amount", Kind::NullableNumber, &mut violations);
        check_required(total, "total_amount", "currency", Kind::NullableCurrency, &mut violations);
    }

    match root.get("medications") {
        None => {}
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let parent = format!("medications[{}]", index);
                match entry.as_object() {
                    Some(fields) => {
                        for key in ["name", "dosage", "quantity"] {
                            check_required(fields, &parent, key, Kind::NullableString, &mut violations);
                        }
                    }
                    None => violations.push(SchemaViolation::WrongType {
                        path: parent,
                        expected: "an object",
                    }),
                }
            }
        }
        Some(_) => violations.push(SchemaViolation::WrongType {
            path: "medications".to_string(),
            expected: "an array of objects",
        }),
    }

    violations
}

fn nested_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
    violations: &mut Vec<SchemaViolation>,
) -> Option<&'a Map<String, Value>> {
    match root.get(key)? {
        Value::Object(fields) => Some(fields),
        _ => {
            violations.push(SchemaViolation::WrongType {
                path: key.to_string(),
                expected: "an object",
            });
            None
        }
    }
}

fn check_required(
    fields: &Map<String, Value>,
    parent: &str,
    key: &str,
    kind: Kind,
    violations: &mut Vec<SchemaViolation>,
) {
    let path = format!("{}.{}", parent, key);
    if !fields.contains_key(key) {
        violations.push(SchemaViolation::MissingKey(path));
        return;
    }
    check_field(fields, key, &path, kind, violations);
}

fn check_field(
    fields: &Map<String, Value>,
    key: &str,
    path: &str,
    kind: Kind,
    violations: &mut Vec<SchemaViolation>,
) {
    let Some(value) = fields.get(key) else {
        return;
    };

    let type_ok = match (kind, value) {
        (Kind::Boolean, Value::Bool(_)) => true,
        (Kind::Boolean, _) => false,
        (Kind::StringList, Value::Array(items)) => items.iter().all(Value::is_string),
        (Kind::StringList, _) => false,
        (_, Value::Null) => true,
        (Kind::NullableString | Kind::NullableDate | Kind::NullableCurrency, Value::String(_)) => true,
        (Kind::NullableInteger, Value::Number(n)) => n.is_u64(),
        (Kind::NullableNumber, Value::Number(_)) => true,
        _ => false,
    };

    if !type_ok {
        violations.push(SchemaViolation::WrongType {
            path: path.to_string(),
            expected: kind.expected(),
        });
        return;
    }

    if let Value::String(text) = value {
        match kind {
            Kind::NullableDate if !is_iso_date(text) => {
                violations.push(SchemaViolation::InvalidDate(path.to_string()));
            }
            Kind::NullableCurrency if !is_currency_code(text) => {
                violations.push(SchemaViolation::InvalidCurrency(path.to_string()));
            }
            _ => {}
        }
    }
}

fn is_iso_date(text: &str) -> bool {
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok() && text.len() == 10
}

fn is_currency_code(text: &str) -> bool {
    text.len() == 3 && text.chars().all(|c| c.is_ascii_uppercase())
}

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationErrors, ValidationErrorsKind};

lazy_static! {
    /// Regex for validating URL keys (category slugs)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "mens-shoes", "sale2024", "a"
    /// - Invalid: "-shoes", "shoes-", "mens--shoes", "Shoes", "mens_shoes"
    pub static ref URL_KEY_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Pick a single, deterministic message out of a set of validation errors.
///
/// `ValidationErrors` is keyed by a hash map, so fields are visited in
/// `field_order` first and any remaining fields in name order.
pub fn first_violation(errors: &ValidationErrors, field_order: &[&str]) -> Option<String> {
    let all = errors.errors();

    let mut remaining: Vec<&str> = all
        .keys()
        .map(|k| &**k)
        .filter(|k| !field_order.contains(k))
        .collect();
    remaining.sort_unstable();

    field_order
        .iter()
        .copied()
        .chain(remaining)
        .find_map(|field| match all.get(field)? {
            ValidationErrorsKind::Field(errs) => errs.first().map(|err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid ({})", field, err.code),
            }),
            ValidationErrorsKind::Struct(nested) => first_violation(nested, &[]),
            ValidationErrorsKind::List(items) => items
                .values()
                .find_map(|nested| first_violation(nested, &[])),
        })
}

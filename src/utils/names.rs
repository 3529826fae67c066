//! Identifier case variants used when naming generated artifacts.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToUpperCamelCase};
use serde::Serialize;

/// Case variants derived from one user-supplied name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Names {
    /// The name as given.
    pub name: String,
    /// `my-button` -> `MyButton`
    pub class_name: String,
    /// `my-button` -> `myButton`
    pub property_name: String,
    /// `my-button` -> `MY_BUTTON`
    pub constant_name: String,
    /// `MyButton` -> `my-button`
    pub file_name: String,
}

/// Derive every case variant of `name`.
///
/// Hyphens, underscores and whitespace are word separators, as are
/// lower-to-upper transitions, so the transform is stable across the
/// common spellings of the same identifier.
pub fn names(name: &str) -> Names {
    Names {
        name: name.to_string(),
        class_name: name.to_upper_camel_case(),
        property_name: name.to_lower_camel_case(),
        constant_name: name.to_shouty_snake_case(),
        file_name: name.to_kebab_case(),
    }
}

/// First and last character joined by an ellipsis: `secret` → `s...t`.
///
/// A single character is repeated (`x` → `x...x`); an empty password stays empty.
pub fn redact_password(password: &str) -> String {
    match (password.chars().next(), password.chars().last()) {
        (Some(first), Some(last)) => format!("{first}...{last}"),
        _ => String::new(),
    }
}

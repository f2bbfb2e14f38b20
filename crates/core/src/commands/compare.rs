//! Generic equality used when a parser does not provide its own.

use crate::commands::{argument::CompareMode, context::SenderRef, value::Value};

/// Compares two resolved values. Two unresolved values are equal, one
/// unresolved value never equals a resolved one.
///
/// `Auto` tries the identity key, then the case-insensitive name, then raw
/// equality. The other modes force one strategy and report `false` when the
/// field they need is missing on either side.
pub fn is_equal(first: Option<&Value>, second: Option<&Value>, mode: CompareMode) -> bool {
    let (first, second) = match (first, second) {
        (Some(first), Some(second)) => (first, second),
        (None, None) => return true,
        _ => return false,
    };

    if mode == CompareMode::RawEquals {
        return first == second;
    }

    if matches!(mode, CompareMode::Identity | CompareMode::Auto) {
        if let (Some(a), Some(b)) = (first.identity(), second.identity()) {
            return a == b;
        }
        if mode == CompareMode::Identity {
            return false;
        }
    }

    if matches!(mode, CompareMode::Name | CompareMode::Auto) {
        if let (Some(a), Some(b)) = (first.name(), second.name()) {
            return a.eq_ignore_ascii_case(b);
        }
        if mode == CompareMode::Name {
            return false;
        }
    }

    first == second
}

/// Whether `value` refers to `sender`.
pub fn is_sender(sender: &SenderRef, value: Option<&Value>, mode: CompareMode) -> bool {
    let sender = Value::Sender(sender.clone());
    is_equal(value, Some(&sender), mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::value::PlayerRef;

    fn player(id: Option<u128>, name: &str) -> Value {
        Value::Player(PlayerRef::new(id, name))
    }

    #[test]
    fn unresolved_values() {
        assert!(is_equal(None, None, CompareMode::Auto));
        assert!(!is_equal(Some(&Value::Integer(1)), None, CompareMode::Auto));
    }

    #[test]
    fn auto_prefers_identity_over_name() {
        let a = player(Some(1), "Steve");
        let b = player(Some(2), "steve");
        assert!(!is_equal(Some(&a), Some(&b), CompareMode::Auto));
        assert!(is_equal(Some(&a), Some(&b), CompareMode::Name));
    }

    #[test]
    fn auto_falls_back_to_name_then_raw() {
        let a = player(None, "Steve");
        let b = player(Some(2), "STEVE");
        assert!(is_equal(Some(&a), Some(&b), CompareMode::Auto));
        assert!(is_equal(
            Some(&Value::Integer(4)),
            Some(&Value::Integer(4)),
            CompareMode::Auto
        ));
    }

    #[test]
    fn forced_modes_fail_without_their_field() {
        let a = player(None, "Steve");
        let b = player(None, "Steve");
        assert!(!is_equal(Some(&a), Some(&b), CompareMode::Identity));
        assert!(!is_equal(
            Some(&Value::Integer(4)),
            Some(&Value::Integer(4)),
            CompareMode::Name
        ));
        assert!(is_equal(Some(&a), Some(&b), CompareMode::RawEquals));
    }

    #[test]
    fn sender_identity() {
        let alice = SenderRef::player(9, "Alice");
        assert!(is_sender(&alice, Some(&player(Some(9), "Alice")), CompareMode::Auto));
        assert!(!is_sender(&alice, Some(&player(Some(3), "Bob")), CompareMode::Auto));
        assert!(!is_sender(&alice, None, CompareMode::Auto));
    }
}

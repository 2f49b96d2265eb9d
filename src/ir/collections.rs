//! Collection bridging for native callers
//!
//! Thin construction helpers matching the three collection shapes the API
//! promises translators: fixed-length ordered arrays, duplicate-eliminating
//! sets, and ordered lists. Elements are copied by value into the new
//! collection; absent input yields an empty set or list.

use std::collections::HashSet;
use std::hash::Hash;

/// Fixed-length, order-preserving sequence
pub fn make_array<T: Clone>(elements: &[T]) -> Box<[T]> {
    elements.to_vec().into_boxed_slice()
}

/// Unordered, duplicate-eliminating collection; `None` yields an empty set
pub fn make_set<T: Clone + Eq + Hash>(elements: Option<&[T]>) -> HashSet<T> {
    match elements {
        Some(elements) => elements.iter().cloned().collect(),
        None => HashSet::new(),
    }
}

/// Order-preserving collection permitting duplicates; `None` yields an empty list
pub fn make_list<T: Clone>(elements: Option<&[T]>) -> Vec<T> {
    match elements {
        Some(elements) => elements.to_vec(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_preserves_order_and_length() {
        let array = make_array(&[3, 1, 2, 1]);
        assert_eq!(&*array, &[3, 1, 2, 1]);
    }

    #[test]
    fn test_set_eliminates_duplicates() {
        let set = make_set(Some(&[1, 2, 2, 3, 1]));
        assert_eq!(set.len(), 3);
        assert_eq!(set, make_set(Some(&[3, 2, 1])));
        assert!(make_set::<i32>(None).is_empty());
    }

    #[test]
    fn test_list_retains_duplicates_in_order() {
        let list = make_list(Some(&["a", "b", "a"]));
        assert_eq!(list, vec!["a", "b", "a"]);
        assert!(make_list::<&str>(None).is_empty());
    }
}

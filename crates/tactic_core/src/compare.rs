//! Multi-key comparator composition.
//!
//! Any ranking that needs lexicographic tie-breaking (target
//! prioritization, expansion ordering) builds its chain out of
//! [`combine_comparers`].

use std::cmp::Ordering;

/// Boxed three-way comparator over `T`.
pub type Comparer<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Compose an ordered list of comparators into one.
///
/// The combined comparator evaluates each input in order and returns
/// the first non-[`Ordering::Equal`] result, or `Equal` if every
/// comparator agrees. Pure and stateless.
#[must_use]
pub fn combine_comparers<T: 'static>(comparers: Vec<Comparer<T>>) -> Comparer<T> {
    Box::new(move |a, b| {
        for comparer in &comparers {
            let order = comparer(a, b);
            if order != Ordering::Equal {
                return order;
            }
        }
        Ordering::Equal
    })
}

//! Client-side filtering of list responses

/// Values that mean "no filter" when left at their zero value
pub trait ZeroValue {
    fn is_zero(&self) -> bool;
}

impl ZeroValue for i64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl ZeroValue for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ZeroValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> ZeroValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

/// Keep the items whose key equals `filter`, preserving order
///
/// A zero-valued filter keeps everything. No match yields an empty list.
pub fn retain_matching<T, K, F>(mut items: Vec<T>, filter: &K, key: F) -> Vec<T>
where
    K: ZeroValue + PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    if filter.is_zero() {
        return items;
    }

    items.retain(|item| key(item) == filter);
    items
}

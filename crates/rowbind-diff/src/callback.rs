use std::fmt::Display;
use std::marker::PhantomData;

/// Decides how rows relate across two versions of a list.
///
/// `are_items_the_same` must be reflexive and must never call two distinct
/// rows the same; a false positive makes the binder reuse the wrong row.
/// `are_contents_the_same` is only asked about pairs already judged the same
/// item.
pub trait ItemCallback<T> {
    fn are_items_the_same(&self, old: &T, new: &T) -> bool;
    fn are_contents_the_same(&self, old: &T, new: &T) -> bool;
}

/// Callback built from two closures.
#[derive(Clone, Copy)]
pub struct FnCallback<I, C> {
    same_item: I,
    same_content: C,
}

pub fn item_callback<T, I, C>(same_item: I, same_content: C) -> FnCallback<I, C>
where
    I: Fn(&T, &T) -> bool,
    C: Fn(&T, &T) -> bool,
{
    FnCallback {
        same_item,
        same_content,
    }
}

impl<T, I, C> ItemCallback<T> for FnCallback<I, C>
where
    I: Fn(&T, &T) -> bool,
    C: Fn(&T, &T) -> bool,
{
    fn are_items_the_same(&self, old: &T, new: &T) -> bool {
        (self.same_item)(old, new)
    }
    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        (self.same_content)(old, new)
    }
}

/// Identity from a key (e.g. a primary key), content from `PartialEq`.
pub struct KeyedCallback<F, K> {
    key: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> KeyedCallback<F, K> {
    pub fn new<T>(key: F) -> Self
    where
        F: Fn(&T) -> K,
    {
        Self {
            key,
            _key: PhantomData,
        }
    }
}

impl<F: Clone, K> Clone for KeyedCallback<F, K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _key: PhantomData,
        }
    }
}

impl<T, K, F> ItemCallback<T> for KeyedCallback<F, K>
where
    T: PartialEq,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    fn are_items_the_same(&self, old: &T, new: &T) -> bool {
        (self.key)(old) == (self.key)(new)
    }
    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }
}

/// Identity from the rendered `Display` string, content from `PartialEq`.
///
/// Fits rows whose display text is unique per row. Two rows that print the
/// same are treated as the same item.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplayIdentity;

impl<T: Display + PartialEq> ItemCallback<T> for DisplayIdentity {
    fn are_items_the_same(&self, old: &T, new: &T) -> bool {
        old.to_string() == new.to_string()
    }
    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }
}

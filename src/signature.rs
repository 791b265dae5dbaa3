//! Argument passing modes for event signatures
//!
//! An event's signature is a tuple of passing-mode markers fixed when the
//! event type is written down:
//!
//! | Marker | Callback receives | Sharing |
//! |---|---|---|
//! | [`Val<T>`] | `T` | every callback gets its own clone |
//! | [`Mut<T>`] | `&mut T` | one target, reborrowed per callback |
//! | [`Ref<T>`] | `&T` | one target, shared by all callbacks |
//!
//! `Event<(Val<i32>, Mut<i32>, Ref<i32>)>` is fired with
//! `(i32, &mut i32, &i32)` and its callbacks take the same tuple.

use std::marker::PhantomData;

/// Pass by value: each callback receives a clone of the fired value
pub struct Val<T>(PhantomData<fn() -> T>);

/// Pass by mutable reference: callbacks see each other's writes
pub struct Mut<T: ?Sized>(PhantomData<*mut T>);

/// Pass by shared reference
pub struct Ref<T: ?Sized>(PhantomData<*const T>);

/// A single argument slot of a signature
pub trait Arg: 'static {
    /// What the caller supplies and each callback receives
    type Item<'a>;

    /// Produce the copy handed to one callback
    fn reborrow<'s, 'a: 's>(item: &'s mut Self::Item<'a>) -> Self::Item<'s>;
}

impl<T: Clone + 'static> Arg for Val<T> {
    type Item<'a> = T;

    fn reborrow<'s, 'a: 's>(item: &'s mut T) -> T {
        item.clone()
    }
}

impl<T: ?Sized + 'static> Arg for Mut<T> {
    type Item<'a> = &'a mut T;

    fn reborrow<'s, 'a: 's>(item: &'s mut &'a mut T) -> &'s mut T {
        &mut **item
    }
}

impl<T: ?Sized + 'static> Arg for Ref<T> {
    type Item<'a> = &'a T;

    fn reborrow<'s, 'a: 's>(item: &'s mut &'a T) -> &'s T {
        *item
    }
}

/// The full argument list of an event
///
/// Implemented for `()` and for tuples of [`Arg`] markers up to eight
/// elements.
pub trait Signature: 'static {
    /// Tuple of concrete arguments passed to `fire` and to every callback
    type Args<'a>;

    /// Produce the arguments for the next callback in a firing
    fn reborrow<'s, 'a: 's>(args: &'s mut Self::Args<'a>) -> Self::Args<'s>;
}

impl Signature for () {
    type Args<'a> = ();

    fn reborrow<'s, 'a: 's>(_args: &'s mut ()) {}
}

macro_rules! impl_signature {
    ($(($arg:ident, $idx:tt)),+) => {
        impl<$($arg: Arg),+> Signature for ($($arg,)+) {
            type Args<'a> = ($($arg::Item<'a>,)+);

            fn reborrow<'s, 'a: 's>(args: &'s mut Self::Args<'a>) -> Self::Args<'s> {
                ($($arg::reborrow(&mut args.$idx),)+)
            }
        }
    };
}

impl_signature!((A, 0));
impl_signature!((A, 0), (B, 1));
impl_signature!((A, 0), (B, 1), (C, 2));
impl_signature!((A, 0), (B, 1), (C, 2), (D, 3));
impl_signature!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_signature!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
impl_signature!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));
impl_signature!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_val_reborrow_is_independent_copy() {
        let mut args = (String::from("usd"),);
        let mut copy = <(Val<String>,) as Signature>::reborrow(&mut args);
        copy.0.push_str("/cny");

        assert_eq!(args.0, "usd");
        assert_eq!(copy.0, "usd/cny");
    }

    #[test]
    fn test_mut_reborrow_shares_target() {
        let mut total = 1;
        {
            let mut args = (&mut total,);
            *<(Mut<i32>,) as Signature>::reborrow(&mut args).0 += 1;
            *<(Mut<i32>,) as Signature>::reborrow(&mut args).0 *= 10;
        }
        assert_eq!(total, 20);
    }

    #[test]
    fn test_ref_reborrow_keeps_address() {
        let rate = 7.35_f64;
        let mut args = (&rate,);
        let shared = <(Ref<f64>,) as Signature>::reborrow(&mut args);
        assert!(std::ptr::eq(shared.0, &rate));
    }

    #[test]
    fn test_unsized_targets() {
        let mut buf = [0u8; 4];
        let label = "tick";
        {
            let mut args: (&mut [u8], &str) = (&mut buf, label);
            let (bytes, text) = <(Mut<[u8]>, Ref<str>) as Signature>::reborrow(&mut args);
            bytes[0] = text.len() as u8;
        }
        assert_eq!(buf[0], 4);
    }

    #[test]
    fn test_mixed_modes() {
        let mut counter = 0u32;
        let name = String::from("deploy");
        let mut args = (5u64, &mut counter, &name);

        for _ in 0..3 {
            let (value, count, label) =
                <(Val<u64>, Mut<u32>, Ref<String>) as Signature>::reborrow(&mut args);
            assert_eq!(value, 5);
            assert_eq!(label, "deploy");
            *count += 1;
        }

        assert_eq!(counter, 3);
    }
}

//! The choice extension (spec §4.D): lift `Either` injection into the
//! arrow algebra to encode conditionals.
//!
//! Unlike the Python original, where `left`/`right` raise a `ValueError`
//! when handed something that isn't an `Either` (see
//! `core/arrows/kleisli_arrow_choice.py`), Rust's exhaustive `match` over
//! the two-variant `Either` enum makes an unrecognised tag a compile-time
//! impossibility — there is no third variant to mismatch on. The
//! branch-tag-violation error kind in `arrowline-core` is kept for parity
//! with spec §7's taxonomy, but the choice operators below can never
//! actually construct one.

use crate::kleisli::{arr, Kleisli};
use arrowline_core::{Either, State};

impl<S, B, C> Kleisli<S, B, C>
where
    S: 'static,
    B: 'static,
    C: 'static,
{
    /// `left(k) : K (Either b d) (Either c d)` — apply `k` inside a
    /// `Left`, pass `Right` through unchanged.
    pub fn left<D>(self) -> Kleisli<S, Either<B, D>, Either<C, D>>
    where
        C: Send,
        D: Send + 'static,
    {
        Kleisli::new(move |either: Either<B, D>| match either {
            Either::Left(b) => self.run(b).bind(|c| State::unit(Either::Left(c))),
            Either::Right(d) => State::unit(Either::Right(d)),
        })
    }

    /// `right(k)` — the dual of `left`.
    pub fn right<D>(self) -> Kleisli<S, Either<D, B>, Either<D, C>>
    where
        C: Send,
        D: Send + 'static,
    {
        Kleisli::new(move |either: Either<D, B>| match either {
            Either::Left(d) => State::unit(Either::Left(d)),
            Either::Right(b) => self.run(b).bind(|c| State::unit(Either::Right(c))),
        })
    }

    /// `k +++ h : K (Either b b') (Either c c')` — `left(k) >>> right(h)`.
    pub fn choice<B2, C2>(
        self,
        h: Kleisli<S, B2, C2>,
    ) -> Kleisli<S, Either<B, B2>, Either<C, C2>>
    where
        B2: 'static,
        C2: Send + 'static,
        C: Send,
        B2: Send,
    {
        self.left::<B2>().then(h.right::<C>())
    }

    /// `k ||| h : K (Either b c) d` — `(k +++ h) >>> arr(extract)`,
    /// collapsing both tags to the shared output type `C`.
    pub fn merge<B2>(self, h: Kleisli<S, B2, C>) -> Kleisli<S, Either<B, B2>, C>
    where
        B2: Send + 'static,
        C: Send,
    {
        self.choice(h).then(arr(|e: Either<C, C>| e.merge()))
    }
}

/// `test(p) : K b (Either b b)` — `Left(b)` when `p(b)` is truthy, `Right(b)`
/// otherwise. `p` is itself a Kleisli morphism so the predicate can thread
/// and observe state like any other component.
pub fn test<S, B>(p: Kleisli<S, B, bool>) -> Kleisli<S, B, Either<B, B>>
where
    S: 'static,
    B: Clone + Send + 'static,
{
    p.fanout(crate::kleisli::id())
        .then(arr(|(flag, b): (bool, B)| {
            if flag {
                Either::Left(b)
            } else {
                Either::Right(b)
            }
        }))
}

/// `ifc(p, t, e)` — build a conditional component:
/// `test(lift(p)) >>> (t ||| e)`.
pub fn ifc<S, B, C>(
    p: Kleisli<S, B, bool>,
    then_branch: Kleisli<S, B, C>,
    else_branch: Kleisli<S, B, C>,
) -> Kleisli<S, B, C>
where
    S: 'static,
    B: Clone + Send + 'static,
    C: Send + 'static,
{
    test(p).then(then_branch.merge(else_branch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kleisli::arr;

    fn lift<S, B>(f: impl Fn(B) -> bool + Send + Sync + 'static) -> Kleisli<S, B, bool>
    where
        S: 'static,
        B: 'static,
    {
        arr(f)
    }

    #[test]
    fn left_applies_inside_left_and_passes_right_through() {
        let k = arr::<i32, i32, i32>(|x| x + 1).left::<&str>();
        let (out_left, _) = k.run(Either::Left(1)).run(0);
        assert_eq!(out_left, Either::Left(2));

        let k = arr::<i32, i32, i32>(|x| x + 1).left::<&str>();
        let (out_right, _) = k.run(Either::Right("untouched")).run(0);
        assert_eq!(out_right, Either::Right("untouched"));
    }

    #[test]
    fn choice_dispatches_left_and_right_independently() {
        let k = arr::<i32, i32, i32>(|x| x + 1);
        let h = arr::<i32, &str, String>(|s: &str| s.to_uppercase());
        let combined = k.choice(h);

        let (l, _) = combined.run(Either::Left(1)).run(0);
        assert_eq!(l, Either::Left(2));
        let (r, _) = combined.run(Either::Right("hi")).run(0);
        assert_eq!(r, Either::Right("HI".to_string()));
    }

    #[test]
    fn merge_collapses_to_a_shared_output_type() {
        let k = arr::<i32, i32, i32>(|x| x * 2);
        let h = arr::<i32, i32, i32>(|x| x + 100);
        let merged = k.merge(h);

        let (l, _) = merged.run(Either::Left(3)).run(0);
        assert_eq!(l, 6);
        let (r, _) = merged.run(Either::Right(3)).run(0);
        assert_eq!(r, 103);
    }

    #[test]
    fn test_tags_left_when_predicate_is_true() {
        let p: Kleisli<i32, i32, bool> = lift(|x: i32| x % 2 == 0);
        let t = test(p);
        let (l, _) = t.run(4).run(0);
        assert_eq!(l, Either::Left(4));
        let (r, _) = t.run(5).run(0);
        assert_eq!(r, Either::Right(5));
    }

    #[test]
    fn ifc_dispatches_and_untaken_branch_state_is_unaffected() {
        let p: Kleisli<Vec<&str>, i32, bool> = lift(|x: i32| x % 2 == 0);
        let then_branch = Kleisli::<Vec<&str>, i32, i32>::new(|a| {
            State::make(move |mut s: Vec<&str>| {
                s.push("then");
                (a / 2, s)
            })
        });
        let else_branch = Kleisli::<Vec<&str>, i32, i32>::new(|a| {
            State::make(move |mut s: Vec<&str>| {
                s.push("else");
                (3 * a + 1, s)
            })
        });
        let cond = ifc(p, then_branch, else_branch);

        let (a, s) = cond.run(6).run(Vec::new());
        assert_eq!(a, 3);
        assert_eq!(s, vec!["then"]);

        let (a, s) = cond.run(5).run(Vec::new());
        assert_eq!(a, 16);
        assert_eq!(s, vec!["else"]);
    }
}

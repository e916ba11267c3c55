//! The Kleisli morphism (spec §3 "Kleisli morphism K b c", §4.C).
//!
//! `Kleisli<S, B, C>` wraps `b -> State<s, c>`, specialised to the state
//! carrier as its fixed effect (spec §9: "the effect a parameter... the
//! sequential executor uses the state effect directly; the parallel
//! executor uses a state effect whose carrier happens to be `Future`" — in
//! both cases that's still a `State<S, _>`, just with a different `S`).
//! Composition, product, fan-out, and pair splitting/joining are defined
//! once here; §4.D's choice operators and both executors in
//! `arrowline-exec` build on top without needing a second definition of any
//! of this.

use arrowline_core::State;
use std::sync::Arc;

/// `K b c`: a first-class `b -> State<s, c>`.
pub struct Kleisli<S, B, C> {
    f: Arc<dyn Fn(B) -> State<S, C> + Send + Sync>,
}

impl<S, B, C> Clone for Kleisli<S, B, C> {
    fn clone(&self) -> Self {
        Kleisli { f: self.f.clone() }
    }
}

impl<S, B, C> Kleisli<S, B, C>
where
    S: 'static,
    B: 'static,
    C: 'static,
{
    /// Wrap a plain `b -> State<s, c>` function as a Kleisli morphism.
    pub fn new(f: impl Fn(B) -> State<S, C> + Send + Sync + 'static) -> Self {
        Kleisli { f: Arc::new(f) }
    }

    /// `run(k, a)`: apply the morphism to an input, yielding the deferred
    /// state computation.
    pub fn run(&self, b: B) -> State<S, C> {
        (self.f)(b)
    }

    /// `k >>> k'`: sequential composition, `λb. bind(k(b), k')`.
    pub fn then<D>(self, next: Kleisli<S, C, D>) -> Kleisli<S, B, D>
    where
        C: Send,
        D: Send + 'static,
    {
        Kleisli::new(move |b| {
            let next = next.clone();
            self.run(b).bind(move |c| next.run(c))
        })
    }

    /// `first(k)`: apply to the left of a pair, passing the right element
    /// through untouched.
    pub fn first<D>(self) -> Kleisli<S, (B, D), (C, D)>
    where
        C: Send,
        D: Send + 'static,
    {
        Kleisli::new(move |(b, d): (B, D)| self.run(b).bind(move |c| State::unit((c, d))))
    }

    /// `second(k)`: the dual of `first`.
    pub fn second<D>(self) -> Kleisli<S, (D, B), (D, C)>
    where
        C: Send,
        D: Send + 'static,
    {
        Kleisli::new(move |(d, b): (D, B)| self.run(b).bind(move |c| State::unit((d, c))))
    }

    /// `k *** h`: `first(k) >>> second(h)`.
    pub fn product<B2, C2>(self, h: Kleisli<S, B2, C2>) -> Kleisli<S, (B, B2), (C, C2)>
    where
        B2: 'static,
        C2: Send + 'static,
        C: Send,
        B2: Send,
    {
        self.first::<B2>().then(h.second::<C>())
    }

    /// `k &&& h`: fan-out. Defined as `split >>> (k *** h)` exactly, so
    /// both sides of the state thread fire in left-then-right order.
    pub fn fanout<D>(self, h: Kleisli<S, B, D>) -> Kleisli<S, B, (C, D)>
    where
        B: Clone + Send,
        C: Send,
        D: Send + 'static,
    {
        split::<S, B>().then(self.product(h))
    }
}

/// `arr(f)`: the pure lift, `λb. unit(f(b))`.
pub fn arr<S, B, C>(f: impl Fn(B) -> C + Send + Sync + 'static) -> Kleisli<S, B, C>
where
    S: 'static,
    B: 'static,
    C: Send + 'static,
{
    Kleisli::new(move |b| State::unit(f(b)))
}

/// The identity morphism, `arr(id)`.
pub fn id<S, B>() -> Kleisli<S, B, B>
where
    S: 'static,
    B: Send + 'static,
{
    arr(|b| b)
}

/// `split`: duplicate the input into a pair.
pub fn split<S, B>() -> Kleisli<S, B, (B, B)>
where
    S: 'static,
    B: Clone + Send + 'static,
{
    arr(|b: B| (b.clone(), b))
}

/// `unsplit(g)`: join a pair with `g`.
pub fn unsplit<S, C, D, E>(g: impl Fn(C, D) -> E + Send + Sync + 'static) -> Kleisli<S, (C, D), E>
where
    S: 'static,
    C: 'static,
    D: 'static,
    E: Send + 'static,
{
    arr(move |(c, d)| g(c, d))
}

/// `k >> k'` as sugar for `k.then(k')`, mirroring the Python original's use
/// of `__rshift__` for `>>>`.
impl<S, B, C, D> std::ops::Shr<Kleisli<S, C, D>> for Kleisli<S, B, C>
where
    S: 'static,
    B: 'static,
    C: Send + 'static,
    D: Send + 'static,
{
    type Output = Kleisli<S, B, D>;

    fn shr(self, rhs: Kleisli<S, C, D>) -> Self::Output {
        self.then(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrowline_core::State;

    fn logging_state(tag: &'static str) -> impl Fn(i32) -> State<Vec<&'static str>, i32> {
        move |a| {
            State::make(move |mut s: Vec<&'static str>| {
                s.push(tag);
                (a, s)
            })
        }
    }

    #[test]
    fn arr_id_is_identity() {
        let k = id::<i32, i32>();
        let (a, s) = k.run(42).run(0);
        assert_eq!(a, 42);
        assert_eq!(s, 0);
    }

    #[test]
    fn arr_composes_with_function_composition() {
        let f = arr::<i32, i32, i32>(|x| x + 1);
        let g = arr::<i32, i32, i32>(|x| x * 2);
        let composed = f.then(g);
        let (a, _) = composed.run(3).run(0);
        assert_eq!(a, 8); // (3 + 1) * 2
    }

    #[test]
    fn first_applies_to_left_of_pair_only() {
        let k = arr::<i32, i32, i32>(|x| x + 1).first::<&str>();
        let (pair, _) = k.run((1, "unchanged")).run(0);
        assert_eq!(pair, (2, "unchanged"));
    }

    #[test]
    fn then_chains_three_stages_and_threads_state_in_order() {
        let k1 = Kleisli::<Vec<&str>, i32, i32>::new(logging_state("one"));
        let k2 = Kleisli::<Vec<&str>, i32, i32>::new(logging_state("two"));
        let k3 = Kleisli::<Vec<&str>, i32, i32>::new(logging_state("three"));
        let pipeline = k1.then(k2).then(k3);
        let (a, s) = pipeline.run(0).run(Vec::new());
        assert_eq!(a, 0);
        assert_eq!(s, vec!["one", "two", "three"]);
    }

    #[test]
    fn fanout_applies_both_to_the_same_input() {
        let k = arr::<i32, i32, i32>(|x| x + 1);
        let h = arr::<i32, i32, i32>(|x| x * 10);
        let fanned = k.fanout(h);
        let ((c, d), _) = fanned.run(5).run(0);
        assert_eq!((c, d), (6, 50));
    }

    #[test]
    fn fanout_equals_split_then_product() {
        let k = Kleisli::<Vec<&str>, i32, i32>::new(logging_state("left"));
        let h = Kleisli::<Vec<&str>, i32, i32>::new(logging_state("right"));
        let fanned = k.clone().fanout(h.clone());
        let explicit = split::<Vec<&str>, i32>().then(k.product(h));

        let (out1, s1) = fanned.run(7).run(Vec::new());
        let (out2, s2) = explicit.run(7).run(Vec::new());
        assert_eq!(out1, out2);
        assert_eq!(s1, s2);
        assert_eq!(s1, vec!["left", "right"]);
    }

    #[test]
    fn unsplit_joins_a_pair() {
        let u = unsplit::<i32, i32, i32, i32>(|c, d| c + d);
        let (a, _) = u.run((3, 4)).run(0);
        assert_eq!(a, 7);
    }
}

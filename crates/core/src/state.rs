//! The state carrier (spec §3 "State s a", §4.B).
//!
//! A `State<S, A>` is an opaque value wrapping `s -> (a, s)`; it is not
//! executed at construction, only when `run`/`eval`/`exec` applies it to an
//! initial state. Two different initial states run through independently —
//! nothing in a `State` value closes over a particular `s`.

/// A deferred `s -> (a, s)` computation.
pub struct State<S, A> {
    run: Box<dyn FnOnce(S) -> (A, S) + Send>,
}

impl<S, A> State<S, A>
where
    S: 'static,
    A: 'static,
{
    /// The identity effect: produces `a` and leaves the state untouched.
    pub fn unit(a: A) -> Self
    where
        A: Send,
    {
        State::make(move |s| (a, s))
    }

    /// Wrap an arbitrary `s -> (a, s)` function.
    pub fn make(f: impl FnOnce(S) -> (A, S) + Send + 'static) -> Self {
        State { run: Box::new(f) }
    }

    /// Sequential composition: `run(bind(m, f), s0) = let (a, s1) = run(m,
    /// s0) in run(f(a), s1)`.
    pub fn bind<B>(self, f: impl FnOnce(A) -> State<S, B> + Send + 'static) -> State<S, B>
    where
        B: 'static,
    {
        State::make(move |s0| {
            let (a, s1) = (self.run)(s0);
            (f(a).run)(s1)
        })
    }

    /// Apply the computation to an initial state, returning the final value
    /// and the final state.
    pub fn run(self, s0: S) -> (A, S) {
        (self.run)(s0)
    }

    /// Apply the computation, discarding the final state.
    pub fn eval(self, s0: S) -> A {
        self.run(s0).0
    }

    /// Apply the computation, discarding the final value.
    pub fn exec(self, s0: S) -> S {
        self.run(s0).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_leaves_state_unchanged() {
        let m = State::<i32, &str>::unit("hello");
        let (a, s) = m.run(7);
        assert_eq!(a, "hello");
        assert_eq!(s, 7);
    }

    #[test]
    fn bind_threads_state_through_in_order() {
        let m = State::<Vec<&str>, i32>::make(|mut s: Vec<&str>| {
            s.push("first");
            (1, s)
        });
        let m = m.bind(|a| {
            State::make(move |mut s: Vec<&str>| {
                s.push("second");
                (a + 1, s)
            })
        });
        let (a, s) = m.run(Vec::new());
        assert_eq!(a, 2);
        assert_eq!(s, vec!["first", "second"]);
    }

    #[test]
    fn running_the_same_state_value_twice_with_different_seeds_is_independent() {
        // A State value is a plain s -> (a, s) function each time it is
        // constructed; two separately-constructed invocations of the same
        // builder starting from different seeds don't interfere.
        let build = |seed: i32| State::<i32, i32>::make(move |s| (seed + s, s + 1));
        let (a1, s1) = build(10).run(0);
        let (a2, s2) = build(10).run(100);
        assert_eq!((a1, s1), (10, 1));
        assert_eq!((a2, s2), (110, 101));
    }

    #[test]
    fn eval_and_exec_project_run() {
        let m = State::<i32, &str>::make(|s| ("value", s + 1));
        assert_eq!(State::<i32, &str>::make(|s| ("value", s + 1)).eval(0), "value");
        assert_eq!(m.exec(0), 1);
    }
}

//! `Either`, a sum type with two variants used both as a generic tagged
//! union and as the explicit carrier of conditional branches in the arrow
//! algebra (spec §3, §4.D).

/// `Left(b)` or `Right(c)`. Equality is structural on the payload; a `Left`
/// never equals a `Right` regardless of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<B, C> {
    Left(B),
    Right(C),
}

impl<B, C> Either<B, C> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    pub fn left(self) -> Option<B> {
        match self {
            Either::Left(b) => Some(b),
            Either::Right(_) => None,
        }
    }

    pub fn right(self) -> Option<C> {
        match self {
            Either::Left(_) => None,
            Either::Right(c) => Some(c),
        }
    }

    /// Collapse both tags to a common type, as the `|||` operator does at
    /// its final step once left and right have been unified.
    pub fn merge(self) -> B
    where
        C: Into<B>,
    {
        match self {
            Either::Left(b) => b,
            Either::Right(c) => c.into(),
        }
    }

    pub fn map_left<D>(self, f: impl FnOnce(B) -> D) -> Either<D, C> {
        match self {
            Either::Left(b) => Either::Left(f(b)),
            Either::Right(c) => Either::Right(c),
        }
    }

    pub fn map_right<D>(self, f: impl FnOnce(C) -> D) -> Either<B, D> {
        match self {
            Either::Left(b) => Either::Left(b),
            Either::Right(c) => Either::Right(f(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_never_equals_right_even_with_same_payload() {
        let l: Either<i32, i32> = Either::Left(1);
        let r: Either<i32, i32> = Either::Right(1);
        assert_ne!(l, r);
    }

    #[test]
    fn equality_is_structural_on_payload() {
        assert_eq!(Either::<i32, i32>::Left(1), Either::Left(1));
        assert_eq!(Either::<i32, i32>::Right(2), Either::Right(2));
    }

    #[test]
    fn merge_collapses_both_tags() {
        let l: Either<i32, i32> = Either::Left(1);
        let r: Either<i32, i32> = Either::Right(2);
        assert_eq!(l.merge(), 1);
        assert_eq!(r.merge(), 2);
    }
}

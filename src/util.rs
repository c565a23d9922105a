use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

/// A non-negative path length that may be infinite (unreachable).
///
/// Wraps an `f64` so distances can be compared with a total order and used as
/// keys for `min`/`max`. Values are never NaN: graph validation rejects NaN
/// weights and sums of finite non-negative numbers stay comparable.
#[derive(Clone, Copy, Default)]
pub struct Distance(f64);

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    pub fn infinity() -> Self {
        Distance(f64::INFINITY)
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// # Panics
    /// If the distance is infinite.
    pub fn finite_value(self) -> f64 {
        assert!(self.is_finite(), "distance is infinite");
        self.0
    }
}

impl From<f64> for Distance {
    fn from(value: f64) -> Self {
        debug_assert!(!value.is_nan(), "distances are never NaN");
        // `-0.0 + 0.0` is `+0.0`; keeps the total order from splitting zero in two
        Distance(value + 0.0)
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Self) -> Self::Output {
        Distance(self.0 + rhs.0)
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Distance {}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finite() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("∞")
        }
    }
}

/// Disjoint-set forest with path compression and union by rank.
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets of `x` and `y`. Returns `false` if they were already joined.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let (rx, ry) = (self.find(x), self.find(y));
        if rx == ry {
            return false;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            Ordering::Less => self.parent[rx] = ry,
            Ordering::Greater => self.parent[ry] = rx,
            Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
        true
    }
}

/// Result type for tests so they can use `?`.
#[cfg(test)]
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Route `tracing` output through the test harness. Safe to call from every test.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

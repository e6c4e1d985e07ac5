use std::cmp::Ordering;
use std::fmt;

/// Priority of a partial path during backward propagation.
///
/// Shorter paths sort first; at equal length, the path with the higher
/// bottleneck amount sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cost {
    /// Number of edges between this certificate and the target.
    pub length: usize,
    /// Bottleneck trust amount along the path.
    pub amount: u8,
}

impl Cost {
    pub fn new(length: usize, amount: u8) -> Self {
        Self { length, amount }
    }

    /// The cost after prepending one more edge carrying `amount`.
    pub fn extend_by(&self, amount: u8) -> Self {
        Self {
            length: self.length + 1,
            amount: self.amount.min(amount),
        }
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .cmp(&other.length)
            .then_with(|| other.amount.cmp(&self.amount))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(length {}, amount {})", self.length, self.amount)
    }
}

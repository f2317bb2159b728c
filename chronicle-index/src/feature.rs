use std::fmt;

/// One query shape an index can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFeature {
    /// Exact-match lookup.
    Equality,
    /// Ordered range scans.
    Range,
    /// Element lookup inside collection-valued attributes.
    Containment,
    /// At most one entity per key.
    Uniqueness,
    /// Bucketed/approximate keys.
    Quantization,
    /// Cheap "is this key present" checks.
    Membership,
}

impl IndexFeature {
    const ALL: [Self; 6] = [
        Self::Equality,
        Self::Range,
        Self::Containment,
        Self::Uniqueness,
        Self::Quantization,
        Self::Membership,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::Equality => 1,
            Self::Range => 1 << 1,
            Self::Containment => 1 << 2,
            Self::Uniqueness => 1 << 3,
            Self::Quantization => 1 << 4,
            Self::Membership => 1 << 5,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Equality => "equality",
            Self::Range => "range",
            Self::Containment => "containment",
            Self::Uniqueness => "uniqueness",
            Self::Quantization => "quantization",
            Self::Membership => "membership",
        }
    }
}

impl fmt::Display for IndexFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A small set of [`IndexFeature`]s.
///
/// A capability advertises one of these; a request carries one. The
/// capability matches when its set is a superset of the request's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureSet(u8);

impl FeatureSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Builds a set from individual features.
    #[must_use]
    pub fn of(features: &[IndexFeature]) -> Self {
        let mut bits = 0;
        for feature in features {
            bits |= feature.bit();
        }
        Self(bits)
    }

    /// Returns this set extended by one feature.
    #[must_use]
    pub const fn with(self, feature: IndexFeature) -> Self {
        Self(self.0 | feature.bit())
    }

    /// True if the feature is in the set.
    #[must_use]
    pub const fn contains(self, feature: IndexFeature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// True if every feature in `other` is in this set.
    #[must_use]
    pub const fn superset_of(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no feature is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The features in the set.
    pub fn iter(self) -> impl Iterator<Item = IndexFeature> {
        IndexFeature::ALL
            .into_iter()
            .filter(move |f| self.contains(*f))
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for feature in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{feature}")?;
            first = false;
        }
        write!(f, "}}")
    }
}

impl FromIterator<IndexFeature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = IndexFeature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

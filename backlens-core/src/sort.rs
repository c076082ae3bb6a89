// Column sorting for summary tables and the raw backlink list

use crate::analysis::{AnchorBucket, DomainBucket, PageBucket};
use backlens_client::BacklinkRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// The column a table is currently ordered by, and in which direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Copy + PartialEq> SortState<C> {
    pub fn new(column: C, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// State after a sort request on `column`: the same column flips
    /// direction, a different column starts out descending.
    pub fn toggle(self, column: C) -> Self {
        if self.column == column {
            Self::new(column, self.direction.flipped())
        } else {
            Self::new(column, SortDirection::Descending)
        }
    }
}

/// The value a row exposes for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    /// Text compares case-insensitively, numbers by value.
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }

    fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }

    fn number(value: usize) -> Self {
        SortValue::Number(value as f64)
    }
}

/// A row that can be ordered by a named column.
pub trait Sortable {
    type Column: Copy + PartialEq + fmt::Debug;

    fn sort_value(&self, column: Self::Column) -> SortValue;
}

/// Apply a sort request on `column` to `items` held under `state`.
///
/// Returns the reordered copy together with the new state; `items` is left
/// untouched so callers can keep the last computed summary around.
pub fn sort_buckets<T>(
    items: &[T],
    column: T::Column,
    state: SortState<T::Column>,
) -> (Vec<T>, SortState<T::Column>)
where
    T: Sortable + Clone,
{
    let next = state.toggle(column);
    (sorted_by(items, next), next)
}

/// Order `items` by `state` without toggling anything.
pub fn sorted_by<T>(items: &[T], state: SortState<T::Column>) -> Vec<T>
where
    T: Sortable + Clone,
{
    let mut keyed: Vec<(SortValue, &T)> = items
        .iter()
        .map(|item| (item.sort_value(state.column), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match state.direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => b.compare(a),
    });

    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Parse error for column names given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn {
    pub name: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown column '{}' (expected one of: {})",
            self.name,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownColumn {}

macro_rules! columns {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$($alias:literal),+]),+ $(,)? }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const NAMES: &'static [&'static str] = &[$(columns!(@first $($alias),+)),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => columns!(@first $($alias),+),)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownColumn;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($($alias)|+ => Ok($name::$variant),)+
                    _ => Err(UnknownColumn {
                        name: s.to_string(),
                        expected: Self::NAMES,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
    (@first $first:literal $(, $rest:literal)*) => { $first };
}

columns! {
    /// Columns of the anchor text table.
    AnchorColumn {
        Text => ["text", "anchor"],
        Count => ["count"],
        Dofollow => ["dofollow"],
        Nofollow => ["nofollow"],
    }
    default Count
}

columns! {
    /// Columns of the referring domain table.
    DomainColumn {
        Domain => ["domain"],
        Count => ["count"],
        Tld => ["tld"],
        Dofollow => ["dofollow"],
        Nofollow => ["nofollow"],
    }
    default Count
}

columns! {
    /// Columns of the target page table.
    PageColumn {
        Url => ["url", "page"],
        Count => ["count"],
        Dofollow => ["dofollow"],
        Nofollow => ["nofollow"],
    }
    default Count
}

columns! {
    /// Columns of the raw backlink list.
    BacklinkColumn {
        Anchor => ["anchor", "text"],
        Type => ["type", "nf"],
        Source => ["source"],
        Target => ["target"],
    }
    default Anchor
}

impl Sortable for AnchorBucket {
    type Column = AnchorColumn;

    fn sort_value(&self, column: AnchorColumn) -> SortValue {
        match column {
            AnchorColumn::Text => SortValue::text(&self.text),
            AnchorColumn::Count => SortValue::number(self.counts.count),
            AnchorColumn::Dofollow => SortValue::number(self.counts.dofollow),
            AnchorColumn::Nofollow => SortValue::number(self.counts.nofollow),
        }
    }
}

impl Sortable for DomainBucket {
    type Column = DomainColumn;

    fn sort_value(&self, column: DomainColumn) -> SortValue {
        match column {
            DomainColumn::Domain => SortValue::text(&self.domain),
            DomainColumn::Count => SortValue::number(self.counts.count),
            DomainColumn::Tld => SortValue::text(&self.tld),
            DomainColumn::Dofollow => SortValue::number(self.counts.dofollow),
            DomainColumn::Nofollow => SortValue::number(self.counts.nofollow),
        }
    }
}

impl Sortable for PageBucket {
    type Column = PageColumn;

    fn sort_value(&self, column: PageColumn) -> SortValue {
        match column {
            PageColumn::Url => SortValue::text(&self.url),
            PageColumn::Count => SortValue::number(self.counts.count),
            PageColumn::Dofollow => SortValue::number(self.counts.dofollow),
            PageColumn::Nofollow => SortValue::number(self.counts.nofollow),
        }
    }
}

impl Sortable for BacklinkRecord {
    type Column = BacklinkColumn;

    fn sort_value(&self, column: BacklinkColumn) -> SortValue {
        match column {
            BacklinkColumn::Anchor => SortValue::text(self.anchor_text()),
            BacklinkColumn::Type => SortValue::text(self.follow_label()),
            BacklinkColumn::Source => SortValue::text(&self.source),
            BacklinkColumn::Target => SortValue::text(&self.target),
        }
    }
}

//! VPN location table types and sorting.

use std::cmp::Ordering;

/// Ping column value as printed by `list-locations`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ping {
    /// A digit-only ping value.
    Millis(u32),
    /// Anything else, kept verbatim for display.
    Unknown(String),
}

impl Ping {
    /// Digit strings become [`Ping::Millis`], everything else is unknown.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(ms) = raw.parse() {
                return Self::Millis(ms);
            }
        }
        Self::Unknown(raw.to_string())
    }

    /// Numeric pings first in ascending order, unknowns after them as equals.
    fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Millis(a), Self::Millis(b)) => a.cmp(b),
            (Self::Millis(_), Self::Unknown(_)) => Ordering::Less,
            (Self::Unknown(_), Self::Millis(_)) => Ordering::Greater,
            (Self::Unknown(_), Self::Unknown(_)) => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for Ping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{ms}"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// One row of `list-locations`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationEntry {
    pub iso_code: String,
    pub country: String,
    pub city: String,
    pub ping: Ping,
}

impl LocationEntry {
    /// Case-insensitive substring match over ISO, country and city.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.iso_code, &self.country, &self.city]
            .iter()
            .any(|value| value.to_lowercase().contains(&term))
    }
}

/// Sortable column of the location table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationColumn {
    Iso,
    Country,
    City,
    Ping,
}

impl LocationColumn {
    pub const ALL: [Self; 4] = [Self::Iso, Self::Country, Self::City, Self::Ping];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::Country => "Country",
            Self::City => "City",
            Self::Ping => "Ping",
        }
    }

    fn compare(self, a: &LocationEntry, b: &LocationEntry) -> Ordering {
        match self {
            Self::Iso => a.iso_code.cmp(&b.iso_code),
            Self::Country => a.country.cmp(&b.country),
            Self::City => a.city.cmp(&b.city),
            Self::Ping => a.ping.sort_cmp(&b.ping),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Stable sort of `entries` by `column`.
///
/// Descending flips the comparator rather than the result, so rows with equal
/// keys keep their relative order in both directions.
pub fn sort_locations(entries: &mut [LocationEntry], column: LocationColumn, order: SortOrder) {
    match order {
        SortOrder::Ascending => entries.sort_by(|a, b| column.compare(a, b)),
        SortOrder::Descending => entries.sort_by(|a, b| column.compare(b, a)),
    }
}

/// Location list as presented on the Locations tab.
#[derive(Clone, Debug, Default)]
pub struct LocationTable {
    /// Last snapshot, replaced wholesale on every refresh.
    pub entries: Vec<LocationEntry>,
    pub sort_column: Option<LocationColumn>,
    pub sort_order: SortOrder,
    /// Active search term, empty for none.
    pub filter: String,
    /// A `list-locations` query is in flight.
    pub loading: bool,
}

impl LocationTable {
    /// Replace the snapshot and apply the default ping-ascending sort.
    pub fn replace(&mut self, entries: Vec<LocationEntry>) {
        self.entries = entries;
        self.loading = false;
        self.sort_column = Some(LocationColumn::Ping);
        self.sort_order = SortOrder::Ascending;
        sort_locations(&mut self.entries, LocationColumn::Ping, SortOrder::Ascending);
    }

    /// Sort by `column`; choosing the active column again reverses it.
    pub fn sort_by(&mut self, column: LocationColumn) {
        let order = if self.sort_column == Some(column) {
            self.sort_order.reversed()
        } else {
            SortOrder::Ascending
        };
        self.sort_column = Some(column);
        self.sort_order = order;
        sort_locations(&mut self.entries, column, order);
    }

    /// Rows passing the current filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&LocationEntry> {
        if self.filter.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|e| e.matches(&self.filter))
            .collect()
    }
}

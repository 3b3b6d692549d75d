use std::cmp::Ordering;

use crate::catalog::DirEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Time,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Name, SortField::Time, SortField::Type];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Time => "time",
            SortField::Type => "type",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(SortField::Name),
            "time" => Some(SortField::Time),
            "type" => Some(SortField::Type),
            _ => None,
        }
    }
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Build from the raw `sort` / `order` query values. Unknown or missing
    /// values fall back to `name` / `asc`.
    pub fn from_params(sort: Option<&str>, order: Option<&str>) -> Self {
        Self {
            field: sort.and_then(SortField::parse).unwrap_or_default(),
            direction: order.and_then(SortDirection::parse).unwrap_or_default(),
        }
    }

    /// Spec a sort link for `field` should request: flips the direction when
    /// `field` is already active, otherwise starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        let direction = match (self.field == field, self.direction) {
            (true, SortDirection::Asc) => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Self { field, direction }
    }

    pub fn query_string(self) -> String {
        format!("sort={}&order={}", self.field.as_str(), self.direction.as_str())
    }
}

/// Order entries for display.
///
/// Directories precede files for `Name` and `Type`; `Time` orders every
/// entry by modification time alone. `Desc` reverses the comparison inside
/// a group, never the grouping itself.
pub fn order(mut entries: Vec<DirEntry>, spec: SortSpec) -> Vec<DirEntry> {
    entries.sort_by(|a, b| {
        let group = if spec.field == SortField::Time {
            Ordering::Equal
        } else {
            b.is_dir().cmp(&a.is_dir())
        };

        group.then_with(|| {
            let ordering = compare_within_group(a, b, spec.field);
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        })
    });
    entries
}

fn compare_within_group(a: &DirEntry, b: &DirEntry, field: SortField) -> Ordering {
    let primary = match field {
        SortField::Name => Ordering::Equal,
        SortField::Time => a.modified.cmp(&b.modified),
        SortField::Type => a.extension().cmp(&b.extension()),
    };

    primary
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.raw_name.cmp(&b.raw_name))
}

use uuid::Uuid;

/// Typed bind value for a generated `$n` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    Uuid(Uuid),
}

/// Declared type of a filter parameter, used to type its bind value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Text,
    Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Case-sensitive `%value%` containment
    Contains,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Contains => "LIKE",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

/// Many-to-one hop from the listed table to a related one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub table: &'static str,
    pub foreign_key: &'static str,
}

/// A column either on the listed table or on an associated table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Own(&'static str),
    Related(Association, &'static str),
}

impl Column {
    pub fn association(&self) -> Option<Association> {
        match self {
            Column::Own(_) => None,
            Column::Related(assoc, _) => Some(*assoc),
        }
    }

    pub fn to_sql(&self, base_table: &str) -> String {
        match self {
            Column::Own(column) => format!("\"{}\".\"{}\"", base_table, column),
            Column::Related(assoc, column) => format!("\"{}\".\"{}\"", assoc.table, column),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub op: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTarget {
    Field(&'static str),
    Association(Association, &'static str),
}

impl SortTarget {
    pub fn column(&self) -> Column {
        match self {
            SortTarget::Field(c) => Column::Own(c),
            SortTarget::Association(assoc, c) => Column::Related(*assoc, c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub target: SortTarget,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
}

/// Normalised list query: conjunctive predicates, ordered sort keys, optional page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub predicates: Vec<Predicate>,
    pub sort: Vec<SortKey>,
    pub pagination: Option<Pagination>,
}

impl FilterSpec {
    /// Associations that must be joined for the predicates and sort keys
    pub fn associations(&self) -> Vec<Association> {
        let mut out: Vec<Association> = vec![];
        let wanted = self
            .predicates
            .iter()
            .filter_map(|p| p.column.association())
            .chain(self.sort.iter().filter_map(|s| s.target.column().association()));
        for assoc in wanted {
            if !out.contains(&assoc) {
                out.push(assoc);
            }
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}

use serde_json::Value;

/// Value shape a field must coerce into
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Email,
    Uri,
    Uuid,
    Integer,
    Boolean,
    /// Case-insensitive match against a closed set, normalised to the listed spelling
    OneOf(&'static [&'static str]),
    Object(Box<Schema>),
    Array(Box<FieldKind>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    Min(i64),
    Max(i64),
    /// Numeric lower bound taken from a sibling field
    MinRef(&'static str),
    /// Numeric upper bound taken from a sibling field
    MaxRef(&'static str),
}

impl Constraint {
    /// Constraints of the same slot replace each other when a conditional rule applies
    pub(crate) fn same_slot(&self, other: &Constraint) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Overrides applied to a field when a conditional matches
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub presence: Option<Presence>,
    pub constraints: Vec<Constraint>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.presence = Some(Presence::Required);
        self
    }

    pub fn min(mut self, n: i64) -> Self {
        self.constraints.push(Constraint::Min(n));
        self
    }

    pub fn max(mut self, n: i64) -> Self {
        self.constraints.push(Constraint::Max(n));
        self
    }

    pub fn min_ref(mut self, sibling: &'static str) -> Self {
        self.constraints.push(Constraint::MinRef(sibling));
        self
    }

    pub fn max_ref(mut self, sibling: &'static str) -> Self {
        self.constraints.push(Constraint::MaxRef(sibling));
        self
    }
}

#[derive(Debug, Clone)]
pub struct Conditional {
    pub sibling: &'static str,
    pub then: Option<Rule>,
    pub otherwise: Option<Rule>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub constraints: Vec<Constraint>,
    pub default: Option<Value>,
    pub conditionals: Vec<Conditional>,
}

impl Field {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
            constraints: vec![],
            default: None,
            conditionals: vec![],
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn email(name: &'static str) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn uri(name: &'static str) -> Self {
        Self::new(name, FieldKind::Uri)
    }

    pub fn uuid(name: &'static str) -> Self {
        Self::new(name, FieldKind::Uuid)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn one_of(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::OneOf(values))
    }

    pub fn object(name: &'static str, schema: &Schema) -> Self {
        Self::new(name, FieldKind::Object(Box::new(schema.clone())))
    }

    pub fn array(name: &'static str, items: FieldKind) -> Self {
        Self::new(name, FieldKind::Array(Box::new(items)))
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn min_len(mut self, n: usize) -> Self {
        self.constraints.push(Constraint::MinLength(n));
        self
    }

    pub fn max_len(mut self, n: usize) -> Self {
        self.constraints.push(Constraint::MaxLength(n));
        self
    }

    pub fn min(mut self, n: i64) -> Self {
        self.constraints.push(Constraint::Min(n));
        self
    }

    pub fn max(mut self, n: i64) -> Self {
        self.constraints.push(Constraint::Max(n));
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Extra rules applied while `sibling` is present in the payload
    pub fn when_present(mut self, sibling: &'static str, then: Rule) -> Self {
        self.conditionals.push(Conditional { sibling, then: Some(then), otherwise: None });
        self
    }

    /// Extra rules applied while `sibling` is absent from the payload
    pub fn when_absent(mut self, sibling: &'static str, otherwise: Rule) -> Self {
        self.conditionals.push(Conditional { sibling, then: None, otherwise: Some(otherwise) });
        self
    }

    /// Same field with every presence requirement dropped, used to derive patch schemas
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self.default = None;
        self
    }
}

/// Object schema: declared fields plus object-level key relations
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub fields: Vec<Field>,
    /// Groups in which at most one key may appear
    pub exclusive: Vec<&'static [&'static str]>,
    /// Groups in which exactly one key must appear
    pub exactly_one: Vec<&'static [&'static str]>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, ..Default::default() }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn nand(mut self, keys: &'static [&'static str]) -> Self {
        self.exclusive.push(keys);
        self
    }

    pub fn xor(mut self, keys: &'static [&'static str]) -> Self {
        self.exactly_one.push(keys);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Copy of this schema where nothing is required, for partial updates
    pub fn as_patch(&self) -> Schema {
        Schema {
            fields: self.fields.iter().cloned().map(Field::optional).collect(),
            exclusive: self.exclusive.clone(),
            exactly_one: vec![],
        }
    }
}

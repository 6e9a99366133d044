/// Expression tree for the body of a CSS math function.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A number, percentage or dimension.
    Value(Numeric),
    /// `a + b + …`; subtraction is a [`Node::Negate`] child.
    Sum(Vec<Node>),
    /// `a * b * …`; division is a [`Node::Invert`] child.
    Product(Vec<Node>),
    Negate(Box<Node>),
    Invert(Box<Node>),
    /// `min()`, `max()`, `clamp()`, `abs()` or `sign()` that could not be folded yet.
    Function {
        function: MathFunction,
        args: Vec<Node>,
    },
    /// Anything the evaluator carries through as text: identifiers, `var()`, `env()`, ….
    Opaque(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Numeric {
    pub value: f64,
    pub unit: Unit,
}

impl Numeric {
    pub fn number(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Number,
        }
    }

    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            unit: self.unit.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Number,
    Percentage,
    Dimension(String),
}

impl Unit {
    pub fn suffix(&self) -> &str {
        match self {
            Unit::Number => "",
            Unit::Percentage => "%",
            Unit::Dimension(unit) => unit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathFunction {
    Min,
    Max,
    Clamp,
    Abs,
    Sign,
}

impl MathFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "clamp" => Some(Self::Clamp),
            "abs" => Some(Self::Abs),
            "sign" => Some(Self::Sign),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Clamp => "clamp",
            Self::Abs => "abs",
            Self::Sign => "sign",
        }
    }

    /// Accepted argument counts, inclusive.
    pub(crate) fn arity(self) -> (usize, usize) {
        match self {
            Self::Min | Self::Max => (1, usize::MAX),
            Self::Clamp => (3, 3),
            Self::Abs | Self::Sign => (1, 1),
        }
    }
}

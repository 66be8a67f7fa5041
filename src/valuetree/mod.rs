//! A tagged, engine-agnostic view over a decoded rvdata2 object graph.
//!
//! Every concrete RPG Maker VX Ace value - be it a `RPG::Actor`, a `Table`, or a bare
//! array - lands in one [ValueTree] variant. Schema projectors only ever see this
//! shape; they never touch the Marshal byte stream directly.
pub mod marshal;

/// One node of a decoded object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueTree {
    /// A Ruby `Fixnum`/`Bignum`.
    Integer(i64),
    /// A Ruby `Float`.
    Float(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// `nil`.
    Nil,
    /// A Ruby `String`, kept as raw bytes - callers decide how lossy to be.
    ByteString(Vec<u8>),
    /// A Ruby `Symbol`, already resolved through the symbol link table.
    Symbol(String),
    /// A Ruby `Array`.
    Array(Vec<ValueTree>),
    /// A Ruby `Hash`, as an ordered list of key/value pairs.
    Mapping(Vec<(ValueTree, ValueTree)>),
    /// A plain Ruby object (`o`): a class name plus its instance variables, with the
    /// leading `@` already stripped from each attribute name.
    Object {
        /// The object's Ruby class name, e.g. `"RPG::Actor"`.
        class: String,
        /// Instance variable name/value pairs, in declaration order.
        attrs: Vec<(String, ValueTree)>,
    },
    /// A `_dump`/`_load` user-defined object (`u`), such as `Table`: a class name plus
    /// an opaque byte blob only that class knows how to interpret.
    UserDefined {
        /// The object's Ruby class name, e.g. `"Table"`.
        class: String,
        /// The raw bytes passed to the class's `_load` method.
        bytes: Vec<u8>,
    },
}

impl ValueTree {
    /// Returns the string this node holds, decoding lossily, for [ValueTree::ByteString]
    /// and [ValueTree::Symbol] nodes; `None` otherwise.
    pub fn as_str_lossy(&self) -> Option<String> {
        match self {
            ValueTree::ByteString(b) => Some(String::from_utf8_lossy(b).into_owned()),
            ValueTree::Symbol(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Returns the integer this node holds, widening from [ValueTree::Float] only when
    /// the float is already integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ValueTree::Integer(i) => Some(*i),
            ValueTree::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Returns the float this node holds, widening from [ValueTree::Integer].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ValueTree::Float(f) => Some(*f),
            ValueTree::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the elements of an [ValueTree::Array], or an empty slice for [ValueTree::Nil].
    pub fn as_array(&self) -> Option<&[ValueTree]> {
        match self {
            ValueTree::Array(items) => Some(items),
            ValueTree::Nil => Some(&[]),
            _ => None,
        }
    }

    /// Returns `true` unless this node is [ValueTree::Nil] or `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, ValueTree::Nil | ValueTree::Boolean(false))
    }

    /// Looks up an instance variable by name (without the leading `@`) on an
    /// [ValueTree::Object] node.
    pub fn attr(&self, name: &str) -> Option<&ValueTree> {
        match self {
            ValueTree::Object { attrs, .. } => {
                attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Like [ValueTree::attr], but returns `&ValueTree::Nil` instead of `None` when the
    /// attribute is absent or is itself `nil`. Mirrors Ruby's `@foo || default` idiom
    /// used throughout RPG Maker's data classes.
    pub fn attr_or_nil<'a>(&'a self, name: &str) -> &'a ValueTree {
        const NIL: &ValueTree = &ValueTree::Nil;
        self.attr(name).unwrap_or(NIL)
    }

    /// Returns the Ruby class name for [ValueTree::Object] and [ValueTree::UserDefined] nodes.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            ValueTree::Object { class, .. } => Some(class),
            ValueTree::UserDefined { class, .. } => Some(class),
            _ => None,
        }
    }
}

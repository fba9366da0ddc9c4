//! Shared vocabulary between the parser and its receivers.

use std::fmt;

/// Identity of a grammar production, attached to start/end events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Document,
    Block,
    // Literals.
    Number,
    String,
    RawString,
    Constant,
    Color,
    Array,
    // Types.
    Type,
    FunctionType,
    PointerType,
    MultipleType,
    ObjectType,
    ArrayType,
    MapType,
    // Declarations and expressions.
    Declaration,
    Assignment,
    Expression,
    Unary,
    ValuePath,
    IndexAccessor,
    // Selection grammar.
    Selector,
    ObjectSelector,
    Combinator,
    Filter,
    Flag,
    SelectorChain,
    Rule,
    ObjectDefinition,
    // Functions.
    FunctionDeclaration,
    Parameter,
    FunctionCall,
    SelectorCall,
    SingleArgumentCall,
    BuiltinCall,
    Argument,
    // Flow control.
    If,
    Else,
    Switch,
    Case,
    Default,
    Loop,
    For,
    Finally,
    Return,
    Repeat,
    Break,
    Continue,
    // Instructions.
    New,
    Needs,
    Configure,
    Foreign,
    /// Tokens skipped while recovering from a syntax error.
    Invalid,
}

impl NodeKind {
    /// Lower-case name used in tree dumps and style classes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Block => "block",
            Self::Number => "number",
            Self::String => "string",
            Self::RawString => "raw-string",
            Self::Constant => "constant",
            Self::Color => "color",
            Self::Array => "array",
            Self::Type => "type",
            Self::FunctionType => "function-type",
            Self::PointerType => "pointer-type",
            Self::MultipleType => "multiple-type",
            Self::ObjectType => "object-type",
            Self::ArrayType => "array-type",
            Self::MapType => "map-type",
            Self::Declaration => "declaration",
            Self::Assignment => "assignment",
            Self::Expression => "expression",
            Self::Unary => "unary",
            Self::ValuePath => "value-path",
            Self::IndexAccessor => "index-accessor",
            Self::Selector => "selector",
            Self::ObjectSelector => "object-selector",
            Self::Combinator => "combinator",
            Self::Filter => "filter",
            Self::Flag => "flag",
            Self::SelectorChain => "selector-chain",
            Self::Rule => "rule",
            Self::ObjectDefinition => "object-definition",
            Self::FunctionDeclaration => "function-declaration",
            Self::Parameter => "parameter",
            Self::FunctionCall => "function-call",
            Self::SelectorCall => "selector-call",
            Self::SingleArgumentCall => "single-argument-call",
            Self::BuiltinCall => "builtin-call",
            Self::Argument => "argument",
            Self::If => "if",
            Self::Else => "else",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Default => "default",
            Self::Loop => "loop",
            Self::For => "for",
            Self::Finally => "finally",
            Self::Return => "return",
            Self::Repeat => "repeat",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::New => "new",
            Self::Needs => "needs",
            Self::Configure => "configure",
            Self::Foreign => "foreign",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Semantic role of a `data` payload within the currently open node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTag {
    Keyword,
    /// `override` / `insert` on function declarations.
    Modifier,
    Punctuation,
    Operator,
    Comparator,
    Combinator,
    Number,
    StringChunk,
    RawString,
    Color,
    Constant,
    TypeName,
    VarName,
    PropertyName,
    FunctionName,
    ParameterName,
    ElementName,
    ClassName,
    IdName,
    FlagName,
    ObjectKeyword,
    /// Sub-language name of a foreign block.
    Language,
    ForeignContent,
    Whitespace,
    Comment,
    Invalid,
}

impl DataTag {
    /// Whitespace and comments carry no syntax.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

/// Byte span inside the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub offset: usize,
    pub length: usize,
}

impl Range {
    #[must_use]
    pub const fn end(self) -> usize {
        self.offset + self.length
    }
}

/// Where a completed production sits in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
    pub range: Range,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}:")?;
        }
        write!(
            f,
            "{}:{} [{}..{}]",
            self.line,
            self.column,
            self.range.offset,
            self.range.end()
        )
    }
}

/// Cursor position inside the source buffer.
///
/// `line` and `column` are 1-based, `byte_index` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub byte_index: usize,
}

impl Position {
    /// Position of the first character of a buffer.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            byte_index: 0,
        }
    }
}

/// An embedded expression inside a quoted string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    /// Location of the `%` sign.
    pub position: Position,
    /// Byte index just past the placeholder.
    pub end: usize,
    /// `%{...}` when true, `%name` otherwise.
    pub braced: bool,
}

/// Extra information carried by quoted string tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringToken {
    /// Placeholders in source order.
    pub placeholders: Vec<Placeholder>,
}

impl StringToken {
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `..`
    DoubleDot,
    /// `...`
    Ellipsis,
    /// `=`
    Equals,
    /// `==`
    EqualEqual,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `=>`
    FatArrow,
    /// `->`
    Arrow,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// `?`
    Question,
    /// `&`
    Ampersand,
    /// `&&`
    AndAnd,
    /// `|`
    Pipe,
    /// `||`
    OrOr,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `#`
    Hash,
    /// `@`, the object sign.
    At,
    /// `$`, the builtin sign.
    Dollar,
    /// Run of spaces, tabs and line breaks.
    Whitespace,
    /// Identifier or keyword.
    Identifier,
    /// Decimal integer (`42`).
    Integer,
    /// Decimal float (`4.2`).
    Float,
    /// Decimal percentage (`42%`, `4.2%`).
    Percentage,
    /// Hex integer (`0x2a`, or `ff00aa` under hex preference).
    HexInteger,
    /// Hex float (`ff.8` under hex preference).
    HexFloat,
    /// Hex percentage (`ff%` under hex preference).
    HexPercentage,
    /// Double-quoted string (`"..."`).
    DoubleQuoted(StringToken),
    /// Single-quoted string (`'...'`).
    SingleQuoted(StringToken),
    /// Back-quoted raw string (`` `...` ``).
    RawString,
    /// Line comment (`// ...`).
    LineComment,
    /// Block comment (`/* ... */`).
    BlockComment,
    /// Foreign-language block (`<lang> ... </lang>`).
    Foreign { language: String },
    /// Unrecognized character or unterminated literal.
    Invalid,
}

impl TokenKind {
    /// Whitespace and comments.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::LineComment | Self::BlockComment)
    }

    /// Any of the numeric literal kinds.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::Float
                | Self::Percentage
                | Self::HexInteger
                | Self::HexFloat
                | Self::HexPercentage
        )
    }

    /// Hex variants of the numeric literal kinds.
    #[must_use]
    pub const fn is_hex_number(&self) -> bool {
        matches!(self, Self::HexInteger | Self::HexFloat | Self::HexPercentage)
    }

    /// Placeholder information for quoted strings.
    #[must_use]
    pub const fn string_token(&self) -> Option<&StringToken> {
        match self {
            Self::DoubleQuoted(string) | Self::SingleQuoted(string) => Some(string),
            _ => None,
        }
    }

    /// Fixed-text punctuation and operator marks.
    #[must_use]
    pub const fn is_punctuation(&self) -> bool {
        !matches!(
            self,
            Self::Whitespace
                | Self::Identifier
                | Self::Integer
                | Self::Float
                | Self::Percentage
                | Self::HexInteger
                | Self::HexFloat
                | Self::HexPercentage
                | Self::DoubleQuoted(_)
                | Self::SingleQuoted(_)
                | Self::RawString
                | Self::LineComment
                | Self::BlockComment
                | Self::Foreign { .. }
                | Self::Invalid
        )
    }
}

/// A single token with its kind, exact source text, and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    /// Byte index just past the token.
    #[must_use]
    pub fn end(&self) -> usize {
        self.position.byte_index + self.text.len()
    }

    /// Identifier whose text equals `keyword`.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == keyword
    }
}

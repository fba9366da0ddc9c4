use crate::token::{Placeholder, Position, StringToken, Token, TokenKind};

/// Tokenize a whole source string, trivia included.
///
/// Lexing never fails: unknown characters and unterminated literals come
/// back as [`TokenKind::Invalid`] tokens.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}

/// Pull-based lexer over an in-memory buffer.
///
/// Besides plain consumption it supports a peek session that is undone in
/// one call ([`Lexer::reset_peek`]), a single step of history
/// ([`Lexer::rewind`]) and a hex-preference mode that changes how
/// alphanumeric runs are classified.
pub struct Lexer<'a> {
    input: &'a str,
    cursor: Position,
    previous: Option<Position>,
    peek_origin: Option<Position>,
    limit: Option<usize>,
    hex_preferred: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut cursor = Position::start();
        if input.starts_with('\u{FEFF}') {
            cursor.byte_index = '\u{FEFF}'.len_utf8();
        }
        Self {
            input,
            cursor,
            previous: None,
            peek_origin: None,
            limit: None,
            hex_preferred: false,
        }
    }

    /// Current cursor position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.cursor
    }

    #[must_use]
    pub const fn hex_preferred(&self) -> bool {
        self.hex_preferred
    }

    /// Switch hex preference on or off. The caller restores the old value.
    pub const fn set_hex_preferred(&mut self, hex_preferred: bool) {
        self.hex_preferred = hex_preferred;
    }

    /// Bound reading at `limit` bytes; `None` lifts the bound.
    pub const fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// True while a peek session is pending.
    #[must_use]
    pub const fn is_peeking(&self) -> bool {
        self.peek_origin.is_some()
    }

    /// True when no further token can be read.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.cursor.byte_index >= self.end()
    }

    /// Consume the next token. `None` signals the end of the source.
    pub fn next_token(&mut self) -> Option<Token> {
        debug_assert!(
            self.peek_origin.is_none(),
            "next_token called during a pending peek session"
        );
        let before = self.cursor;
        let token = self.read_token()?;
        self.previous = Some(before);
        log::trace!(
            "token {:?} {:?} at {}:{}",
            token.kind,
            token.text,
            token.position.line,
            token.position.column
        );
        Some(token)
    }

    /// Read the next token without committing to it.
    ///
    /// Consecutive peeks walk further ahead; [`Lexer::reset_peek`] undoes
    /// all of them at once.
    pub fn peek_token(&mut self) -> Option<Token> {
        if self.peek_origin.is_none() {
            self.peek_origin = Some(self.cursor);
        }
        self.read_token()
    }

    /// Peek past trivia and return the first significant token.
    pub fn peek_significant(&mut self) -> Option<Token> {
        loop {
            let token = self.peek_token()?;
            if !token.kind.is_trivia() {
                return Some(token);
            }
        }
    }

    /// Undo every peek since the last reset.
    pub const fn reset_peek(&mut self) {
        if let Some(origin) = self.peek_origin.take() {
            self.cursor = origin;
        }
    }

    /// Undo the last real consumption. Only one step of history is kept.
    pub const fn rewind(&mut self) -> bool {
        if self.peek_origin.is_some() {
            return false;
        }
        match self.previous.take() {
            Some(previous) => {
                self.cursor = previous;
                true
            }
            None => false,
        }
    }

    /// Move the cursor to a position previously observed in this buffer.
    pub fn seek(&mut self, position: Position) {
        debug_assert!(
            self.peek_origin.is_none(),
            "seek called during a pending peek session"
        );
        debug_assert!(self.input.is_char_boundary(position.byte_index));
        self.cursor = position;
        self.previous = None;
    }

    /// Source text between two byte indices.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or_default()
    }

    fn end(&self) -> usize {
        self.limit
            .map_or(self.input.len(), |limit| limit.min(self.input.len()))
    }

    fn current(&self) -> Option<char> {
        self.char_at(0)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.input
            .get(self.cursor.byte_index..self.end())?
            .chars()
            .nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.cursor.byte_index += ch.len_utf8();
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        Some(ch)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.current().is_some_and(&predicate) {
            self.advance();
        }
    }

    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        Token {
            kind,
            text: self.input[start.byte_index..self.cursor.byte_index].to_string(),
            position: start,
        }
    }

    fn read_token(&mut self) -> Option<Token> {
        let start = self.cursor;
        let ch = self.current()?;

        let kind = match ch {
            c if c.is_whitespace() => {
                self.advance_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            c if c.is_alphabetic() || c == '_' => {
                if self.hex_preferred && c != '_' {
                    self.read_hex_or_word(start, c)
                } else {
                    self.advance_while(is_word_char);
                    TokenKind::Identifier
                }
            }
            c if c.is_ascii_digit() => {
                if self.hex_preferred {
                    self.read_hex_or_word(start, c)
                } else {
                    self.read_number()
                }
            }
            '"' | '\'' => self.read_string(ch),
            '`' => self.read_raw_string(),
            '/' => self.read_slash(),
            '<' => self.read_angle(),
            '.' => {
                let mut run = 0;
                while run < 3 && self.current() == Some('.') {
                    self.advance();
                    run += 1;
                }
                match run {
                    1 => TokenKind::Dot,
                    2 => TokenKind::DoubleDot,
                    _ => TokenKind::Ellipsis,
                }
            }
            _ => {
                self.advance();
                self.read_operator(ch)
            }
        };

        Some(self.make_token(kind, start))
    }

    fn read_operator(&mut self, ch: char) -> TokenKind {
        let next = self.current();
        let mut pair = |kind: TokenKind| {
            self.advance();
            kind
        };
        match (ch, next) {
            ('=', Some('>')) => pair(TokenKind::FatArrow),
            ('=', Some('=')) => pair(TokenKind::EqualEqual),
            ('-', Some('>')) => pair(TokenKind::Arrow),
            ('!', Some('=')) => pair(TokenKind::NotEqual),
            ('>', Some('=')) => pair(TokenKind::GreaterEqual),
            ('&', Some('&')) => pair(TokenKind::AndAnd),
            ('|', Some('|')) => pair(TokenKind::OrOr),
            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            (':', _) => TokenKind::Colon,
            (';', _) => TokenKind::Semicolon,
            (',', _) => TokenKind::Comma,
            ('=', _) => TokenKind::Equals,
            ('>', _) => TokenKind::Greater,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('%', _) => TokenKind::Percent,
            ('!', _) => TokenKind::Bang,
            ('?', _) => TokenKind::Question,
            ('&', _) => TokenKind::Ampersand,
            ('|', _) => TokenKind::Pipe,
            ('^', _) => TokenKind::Caret,
            ('~', _) => TokenKind::Tilde,
            ('#', _) => TokenKind::Hash,
            ('@', _) => TokenKind::At,
            ('$', _) => TokenKind::Dollar,
            _ => TokenKind::Invalid,
        }
    }

    /// Hex-preferred scan of an alphanumeric run.
    ///
    /// A non-hex letter ends the hex reading and the run is re-read as an
    /// identifier (letter start) or decimal number (digit start).
    fn read_hex_or_word(&mut self, start: Position, first: char) -> TokenKind {
        self.advance_while(|c| c.is_ascii_hexdigit());
        let mut kind = TokenKind::HexInteger;

        if self.current() == Some('.') && self.char_at(1).is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit());
            kind = TokenKind::HexFloat;
        }

        if self.current().is_some_and(is_word_char) {
            self.cursor = start;
            return if first.is_ascii_digit() {
                self.read_number()
            } else {
                self.advance_while(is_word_char);
                TokenKind::Identifier
            };
        }

        if self.current() == Some('%') {
            self.advance();
            kind = TokenKind::HexPercentage;
        }
        kind
    }

    fn read_number(&mut self) -> TokenKind {
        if self.current() == Some('0')
            && matches!(self.char_at(1), Some('x' | 'X'))
            && self.char_at(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance();
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit());
            return TokenKind::HexInteger;
        }

        self.advance_while(|c| c.is_ascii_digit());
        let mut kind = TokenKind::Integer;

        if self.current() == Some('.') && self.char_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
            kind = TokenKind::Float;
        }

        if self.current() == Some('%') {
            self.advance();
            kind = TokenKind::Percentage;
        }
        kind
    }

    fn read_string(&mut self, quote: char) -> TokenKind {
        self.advance(); // opening quote
        let mut string = StringToken::default();

        loop {
            match self.current() {
                None => return TokenKind::Invalid,
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('%') => {
                    let position = self.cursor;
                    match self.char_at(1) {
                        Some('%') => {
                            self.advance();
                            self.advance();
                        }
                        Some('{') => {
                            self.advance();
                            self.skip_braced_placeholder(quote);
                            string.placeholders.push(Placeholder {
                                position,
                                end: self.cursor.byte_index,
                                braced: true,
                            });
                        }
                        Some(c) if c.is_alphabetic() || c == '_' => {
                            self.advance();
                            self.advance_while(is_word_char);
                            while self.current() == Some('.')
                                && self.char_at(1).is_some_and(|c| c.is_alphabetic() || c == '_')
                            {
                                self.advance();
                                self.advance_while(is_word_char);
                            }
                            string.placeholders.push(Placeholder {
                                position,
                                end: self.cursor.byte_index,
                                braced: false,
                            });
                        }
                        _ => {
                            self.advance();
                        }
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        if quote == '"' {
            TokenKind::DoubleQuoted(string)
        } else {
            TokenKind::SingleQuoted(string)
        }
    }

    /// Skip a `{...}` placeholder body, balancing braces and stopping
    /// before the string's own closing quote.
    fn skip_braced_placeholder(&mut self, quote: char) {
        let mut depth = 0usize;
        while let Some(ch) = self.current() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                '\\' => {
                    self.advance();
                }
                c if c == quote => return,
                _ => {}
            }
            self.advance();
        }
    }

    fn read_raw_string(&mut self) -> TokenKind {
        self.advance(); // opening back-quote
        loop {
            match self.advance() {
                None => return TokenKind::Invalid,
                Some('`') => return TokenKind::RawString,
                Some(_) => {}
            }
        }
    }

    fn read_slash(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            Some('/') => {
                self.advance_while(|c| c != '\n');
                TokenKind::LineComment
            }
            Some('*') => {
                self.advance();
                loop {
                    match self.advance() {
                        None => return TokenKind::Invalid,
                        Some('*') if self.current() == Some('/') => {
                            self.advance();
                            return TokenKind::BlockComment;
                        }
                        Some(_) => {}
                    }
                }
            }
            _ => TokenKind::Slash,
        }
    }

    /// `<`, `<=`, or a foreign block `<lang> ... </lang>`.
    fn read_angle(&mut self) -> TokenKind {
        if let Some(kind) = self.try_read_foreign() {
            return kind;
        }
        self.advance();
        if self.current() == Some('=') {
            self.advance();
            TokenKind::LessEqual
        } else {
            TokenKind::Less
        }
    }

    fn try_read_foreign(&mut self) -> Option<TokenKind> {
        let rest = self.input.get(self.cursor.byte_index + 1..self.end())?;
        let name_len = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
            .map_or(rest.len(), |(index, _)| index);
        if name_len == 0 || rest[name_len..].chars().next() != Some('>') {
            return None;
        }

        let language = &rest[..name_len];
        let closing = format!("</{language}>");
        let body_start = name_len + 1;
        let body_end = rest[body_start..].find(&closing)? + body_start;
        let stop = self.cursor.byte_index + 1 + body_end + closing.len();

        while self.cursor.byte_index < stop {
            self.advance();
        }
        Some(TokenKind::Foreign {
            language: language.to_string(),
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

use std::iter::Peekable;
use std::str::Chars;

/// Coarse SQL tokens: just enough to find the leading keyword and the
/// statement boundaries of caller-supplied text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Word(String),
    Number,
    String,
    QuotedIdentifier,
    Semicolon,
    Symbol(char),
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, String> {
        loop {
            self.skip_whitespace();
            let position = self.position;

            let c = match self.peek() {
                None => return Ok(Token::new(TokenKind::Eof, position)),
                Some(c) => c,
            };

            let kind = match c {
                ';' => {
                    self.advance();
                    TokenKind::Semicolon
                }
                '-' => {
                    self.advance();
                    if self.peek() == Some('-') {
                        self.skip_line_comment();
                        continue;
                    }
                    TokenKind::Symbol('-')
                }
                '/' => {
                    self.advance();
                    if self.peek() == Some('*') {
                        self.skip_block_comment()?;
                        continue;
                    }
                    TokenKind::Symbol('/')
                }
                '\'' => {
                    self.read_quoted('\'', "string literal")?;
                    TokenKind::String
                }
                '"' | '`' => {
                    self.read_quoted(c, "quoted identifier")?;
                    TokenKind::QuotedIdentifier
                }
                '[' => {
                    self.read_bracketed()?;
                    TokenKind::QuotedIdentifier
                }
                c if c.is_ascii_digit() => {
                    self.read_number();
                    TokenKind::Number
                }
                c if c.is_alphabetic() || c == '_' => TokenKind::Word(self.read_word()),
                c => {
                    self.advance();
                    TokenKind::Symbol(c)
                }
            };

            return Ok(Token::new(kind, position));
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), String> {
        self.advance(); // consume '*'
        loop {
            match self.advance() {
                None => return Err("Unterminated block comment".to_string()),
                Some('*') => {
                    if self.peek() == Some('/') {
                        self.advance();
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Consumes a literal delimited by `quote`, where a doubled quote is an
    /// escaped quote.
    fn read_quoted(&mut self, quote: char, what: &str) -> Result<(), String> {
        self.advance(); // consume opening quote
        loop {
            match self.advance() {
                None => return Err(format!("Unterminated {}", what)),
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return Ok(());
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn read_bracketed(&mut self) -> Result<(), String> {
        self.advance(); // consume '['
        loop {
            match self.advance() {
                None => return Err("Unterminated quoted identifier".to_string()),
                Some(']') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn read_number(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '.' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<TokenKind> {
        Lexer::new(sql)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_select() {
        let tokens = kinds("SELECT * FROM teams");

        assert_eq!(tokens[0], TokenKind::Word("SELECT".to_string()));
        assert_eq!(tokens[1], TokenKind::Symbol('*'));
        assert_eq!(tokens[2], TokenKind::Word("FROM".to_string()));
        assert_eq!(tokens[3], TokenKind::Word("teams".to_string()));
        assert_eq!(tokens[4], TokenKind::Eof);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = kinds("-- leading\n/* block */ PRAGMA table_info(teams)");
        assert_eq!(tokens[0], TokenKind::Word("PRAGMA".to_string()));
    }

    #[test]
    fn test_semicolon_inside_literals_is_not_a_separator() {
        let tokens = kinds("SELECT 'a;b', \"c;d\", [e;f], `g;h` FROM t");
        assert!(!tokens.contains(&TokenKind::Semicolon));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let tokens = kinds("SELECT 'it''s; fine'");
        assert_eq!(tokens[1], TokenKind::String);
        assert_eq!(tokens[2], TokenKind::Eof);
    }

    #[test]
    fn test_semicolon_token() {
        let tokens = kinds("SELECT 1; DROP TABLE teams");
        assert_eq!(tokens[2], TokenKind::Semicolon);
        assert_eq!(tokens[3], TokenKind::Word("DROP".to_string()));
    }

    #[test]
    fn test_unterminated_input_is_an_error() {
        assert!(Lexer::new("SELECT 'open").tokenize().is_err());
        assert!(Lexer::new("SELECT /* open").tokenize().is_err());
    }

    #[test]
    fn test_token_positions_count_chars() {
        let tokens = Lexer::new("  select x").tokenize().unwrap();
        assert_eq!(tokens[0].position, 2);
        assert_eq!(tokens[1].position, 9);
    }
}

use crate::token::{Token, TokenKind};

/// Character cursor producing tokens on demand. Lines and columns are
/// 1-based and count characters, not bytes.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.src.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
                self.bump();
            }
            // line comment: //
            if self.peek() == Some('/') && self.peek2() == Some('/') {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            // block comment: /* ... */, runs to end of input if unclosed
            if self.peek() == Some('/') && self.peek2() == Some('*') {
                self.bump();
                self.bump();
                while let Some(c) = self.bump() {
                    if c == '*' && self.peek() == Some('/') {
                        self.bump();
                        break;
                    }
                }
                continue;
            }
            break;
        }
    }

    fn token(&self, kind: TokenKind, literal: String, line: usize, column: usize) -> Token {
        let end_column = if self.line == line {
            self.column
        } else {
            column + 1
        };
        Token {
            kind,
            literal,
            line,
            column,
            end_column,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_ws_and_comments();
        let (line, column) = (self.line, self.column);
        let Some(c) = self.bump() else {
            return Token {
                kind: TokenKind::Eof,
                literal: String::new(),
                line,
                column,
                end_column: column + 1,
            };
        };

        // 2- and 3-char operators first
        let multi = match (c, self.peek()) {
            ('=', Some('=')) => Some(TokenKind::Eq),
            ('=', Some('>')) => Some(TokenKind::FatArrow),
            ('!', Some('=')) => Some(TokenKind::NotEq),
            ('<', Some('=')) => Some(TokenKind::Le),
            ('>', Some('=')) => Some(TokenKind::Ge),
            ('+', Some('=')) => Some(TokenKind::PlusAssign),
            ('-', Some('=')) => Some(TokenKind::MinusAssign),
            ('*', Some('=')) => Some(TokenKind::StarAssign),
            ('/', Some('=')) => Some(TokenKind::SlashAssign),
            ('%', Some('=')) => Some(TokenKind::PercentAssign),
            ('+', Some('+')) => Some(TokenKind::Increment),
            ('-', Some('-')) => Some(TokenKind::Decrement),
            ('-', Some('>')) => Some(TokenKind::Arrow),
            ('&', Some('&')) => Some(TokenKind::And),
            ('|', Some('|')) => Some(TokenKind::Or),
            _ => None,
        };
        if let Some(kind) = multi {
            self.bump();
            return self.token(kind, kind.as_str().to_string(), line, column);
        }

        // `.` is a range, a spread, a leading-dot float, or member access
        if c == '.' {
            if self.peek() == Some('.') {
                self.bump();
                if self.peek() == Some('.') {
                    self.bump();
                    return self.token(TokenKind::Spread, "...".into(), line, column);
                }
                return self.token(TokenKind::Range, "..".into(), line, column);
            }
            if matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                let mut s = String::from('.');
                self.take_digits(&mut s);
                return self.token(TokenKind::Float, s, line, column);
            }
            return self.token(TokenKind::Dot, ".".into(), line, column);
        }

        // 1-char punctuation/operators
        let single = match c {
            '=' => Some(TokenKind::Assign),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Asterisk),
            '/' => Some(TokenKind::Slash),
            '%' => Some(TokenKind::Percent),
            '<' => Some(TokenKind::Lt),
            '>' => Some(TokenKind::Gt),
            '!' => Some(TokenKind::Bang),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            '?' => Some(TokenKind::Question),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            _ => None,
        };
        if let Some(kind) = single {
            return self.token(kind, c.to_string(), line, column);
        }

        if c == '"' || c == '`' {
            return self.read_string(c, line, column);
        }

        if c.is_ascii_digit() {
            let mut s = String::from(c);
            self.take_digits(&mut s);
            // `1.5` is a float; `1..5` and `1.foo` are not
            if self.peek() == Some('.') && matches!(self.peek2(), Some(d) if d.is_ascii_digit()) {
                self.bump();
                s.push('.');
                self.take_digits(&mut s);
                return self.token(TokenKind::Float, s, line, column);
            }
            return self.token(TokenKind::Int, s, line, column);
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let mut s = String::from(c);
            while let Some(p) = self.peek() {
                if p.is_ascii_alphanumeric() || p == '_' {
                    s.push(p);
                    self.bump();
                } else {
                    break;
                }
            }
            let kind = TokenKind::keyword(&s).unwrap_or(TokenKind::Ident);
            return self.token(kind, s, line, column);
        }

        self.token(TokenKind::Illegal, c.to_string(), line, column)
    }

    fn take_digits(&mut self, s: &mut String) {
        while let Some(d) = self.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            s.push(d);
            self.bump();
        }
    }

    /// Reads a `"..."` or back-tick string; `quote` has been consumed.
    fn read_string(&mut self, quote: char, line: usize, column: usize) -> Token {
        let mut s = String::new();
        loop {
            match self.bump() {
                None => {
                    return Token {
                        kind: TokenKind::UnterminatedString,
                        literal: s,
                        line,
                        column,
                        end_column: column + 1,
                    };
                }
                Some('\n') if quote == '"' => {
                    return Token {
                        kind: TokenKind::UnterminatedString,
                        literal: s,
                        line,
                        column,
                        end_column: column + 1,
                    };
                }
                Some(c) if c == quote => break,
                Some('\\') => {
                    let Some(esc) = self.bump() else {
                        continue;
                    };
                    s.push(match esc {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        _ => esc,
                    });
                }
                Some(c) => s.push(c),
            }
        }
        self.token(TokenKind::Str, s, line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lx = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lx.next_token();
            out.push(t.kind);
            if t.kind == TokenKind::Eof {
                return out;
            }
        }
    }

    #[test]
    fn dot_disambiguation() {
        use TokenKind::*;
        assert_eq!(kinds("1..5"), vec![Int, Range, Int, Eof]);
        assert_eq!(kinds("1.5"), vec![Float, Eof]);
        assert_eq!(kinds(".5"), vec![Float, Eof]);
        assert_eq!(kinds("a.b"), vec![Ident, Dot, Ident, Eof]);
        assert_eq!(kinds("[...a]"), vec![LBracket, Spread, Ident, RBracket, Eof]);
    }

    #[test]
    fn two_char_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("== != <= >= += -= *= /= %= ++ -- && || => ->"),
            vec![
                Eq,
                NotEq,
                Le,
                Ge,
                PlusAssign,
                MinusAssign,
                StarAssign,
                SlashAssign,
                PercentAssign,
                Increment,
                Decrement,
                And,
                Or,
                FatArrow,
                Arrow,
                Eof
            ]
        );
    }

    #[test]
    fn word_operators_share_kinds() {
        use TokenKind::*;
        assert_eq!(kinds("a and not b or c"), vec![Ident, And, Bang, Ident, Or, Ident, Eof]);
    }

    #[test]
    fn escapes_and_backticks() {
        let mut lx = Lexer::new(r#""a\"b\n\\" `x
y` z"#);
        let s = lx.next_token();
        assert_eq!(s.kind, TokenKind::Str);
        assert_eq!(s.literal, "a\"b\n\\");
        let b = lx.next_token();
        assert_eq!(b.kind, TokenKind::Str);
        assert_eq!(b.literal, "x\ny");
        let z = lx.next_token();
        assert_eq!((z.line, z.column), (2, 4));
    }

    #[test]
    fn unterminated_and_illegal() {
        use TokenKind::*;
        assert_eq!(kinds("\"abc"), vec![UnterminatedString, Eof]);
        assert_eq!(kinds("a @ b"), vec![Ident, Illegal, Ident, Eof]);
        assert_eq!(kinds("é"), vec![Illegal, Eof]);
    }

    #[test]
    fn comments_are_skipped_and_lines_counted() {
        let mut lx = Lexer::new("// one\n/* two\nthree */ x");
        let t = lx.next_token();
        assert_eq!(t.kind, TokenKind::Ident);
        assert_eq!((t.line, t.column, t.end_column), (3, 10, 11));
    }

    #[test]
    fn eof_repeats() {
        let mut lx = Lexer::new("x");
        lx.next_token();
        assert_eq!(lx.next_token().kind, TokenKind::Eof);
        assert_eq!(lx.next_token().kind, TokenKind::Eof);
    }
}
